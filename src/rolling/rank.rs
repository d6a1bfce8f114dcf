use crate::{Backend, error::BackendConstructionError};

use super::{RingBuffer, native_vec};

#[derive(Clone, Debug)]
enum Kernel {
    /// Window values kept sorted; rank queries are a binary search, and
    /// each insert or removal moves the tail.
    Sorted(Vec<f64>),
    /// Linear count over the retained values.
    Scan,
}

/// Rank of the newest value within the last `window` values.
///
/// The native kernel finds positions by binary search, but inserting into
/// and removing from the sorted vector shifts its tail, so a push costs
/// O(log w) comparisons plus an O(w) memmove. The fallback scan is O(w)
/// comparisons.
#[derive(Clone, Debug)]
pub(crate) struct WindowRank {
    values: RingBuffer,
    kernel: Kernel,
}

impl WindowRank {
    pub(crate) fn new(backend: Backend, window: usize) -> Result<Self, BackendConstructionError> {
        let kernel = match backend {
            Backend::Native => Kernel::Sorted(native_vec(window)?),
            Backend::Fallback => Kernel::Scan,
        };

        Ok(Self {
            values: RingBuffer::for_backend(backend, window)?,
            kernel,
        })
    }

    /// Pushes `value` and returns, once full, how many window values
    /// (including `value` itself) are less than or equal to it.
    #[inline]
    pub(crate) fn push(&mut self, value: f64) -> Option<usize> {
        let evicted = self.values.push(value);

        let rank = match &mut self.kernel {
            Kernel::Sorted(sorted) => {
                if let Some(old) = evicted {
                    let at = sorted.partition_point(|v| *v < old);
                    sorted.remove(at);
                }
                let at = sorted.partition_point(|v| *v <= value);
                sorted.insert(at, value);
                at + 1
            }
            Kernel::Scan => self.values.iter().filter(|v| *v <= value).count(),
        };

        self.values.is_full().then_some(rank)
    }

    pub(crate) fn capacity(&self) -> usize {
        self.values.capacity()
    }

    pub(crate) fn clear(&mut self) {
        self.values.clear();
        if let Kernel::Sorted(sorted) = &mut self.kernel {
            sorted.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn both(window: usize) -> [WindowRank; 2] {
        [
            WindowRank::new(Backend::Native, window).unwrap(),
            WindowRank::new(Backend::Fallback, window).unwrap(),
        ]
    }

    #[test]
    fn none_while_filling() {
        for mut rank in both(3) {
            assert_eq!(rank.push(5.0), None);
            assert_eq!(rank.push(1.0), None);
            assert_eq!(rank.push(3.0), Some(2));
        }
    }

    #[test]
    fn ties_count_as_less_or_equal() {
        for mut rank in both(4) {
            for value in [2.0, 2.0, 1.0] {
                rank.push(value);
            }
            assert_eq!(rank.push(2.0), Some(4));
        }
    }

    #[test]
    fn evicted_values_no_longer_count() {
        for mut rank in both(2) {
            rank.push(1.0);
            rank.push(9.0);
            // window [9, 5]
            assert_eq!(rank.push(5.0), Some(1));
            // window [5, 5]
            assert_eq!(rank.push(5.0), Some(2));
        }
    }

    #[test]
    fn sorted_arena_shifts_in_place() {
        let mut rank = WindowRank::new(Backend::Native, 16).unwrap();
        for i in 0..500 {
            rank.push(f64::from((i * 7) % 23));
            let Kernel::Sorted(sorted) = &rank.kernel else {
                panic!("native rank lost its sorted arena");
            };
            assert!(sorted.is_sorted(), "tick {i}");
            assert!(sorted.len() <= 16);
            assert_eq!(sorted.capacity(), 16, "tick {i}");
        }
    }

    #[test]
    fn backends_agree_and_stay_bounded() {
        let [mut native, mut fallback] = both(10);
        for i in 0..3_000 {
            let value = ((f64::from(i) * 2.3).sin() * 5.0).round();
            assert_eq!(native.push(value), fallback.push(value), "tick {i}");
        }
        assert_eq!(native.capacity(), 10);
        if let Kernel::Sorted(sorted) = &native.kernel {
            assert_eq!(sorted.len(), 10);
            assert_eq!(sorted.capacity(), 10);
        }
    }
}
