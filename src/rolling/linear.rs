use crate::{Backend, error::BackendConstructionError};

use super::RingBuffer;

/// `Σy` and `Σ i·y` over a full window, `i = 0` for the oldest value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct LinearSums {
    pub(crate) sum: f64,
    pub(crate) weighted: f64,
}

#[derive(Clone, Copy, Debug)]
enum Kernel {
    /// O(1): `W' = W - (S - y_old) + (n - 1)·y_new`, resynced once per window.
    Running {
        sum: f64,
        weighted: f64,
        since_resync: usize,
    },
    /// O(window) rescan.
    Scan { sum: f64, weighted: f64 },
}

/// Sliding plain and index-weighted sums over the last `window` values.
#[derive(Clone, Debug)]
pub(crate) struct WindowLinear {
    values: RingBuffer,
    kernel: Kernel,
}

#[allow(clippy::cast_precision_loss)]
fn rescan(values: &RingBuffer) -> (f64, f64) {
    values
        .iter()
        .enumerate()
        .fold((0.0, 0.0), |(sum, weighted), (i, y)| {
            (sum + y, (i as f64).mul_add(y, weighted))
        })
}

impl WindowLinear {
    pub(crate) fn new(backend: Backend, window: usize) -> Result<Self, BackendConstructionError> {
        Ok(Self {
            values: RingBuffer::for_backend(backend, window)?,
            kernel: Self::initial(backend),
        })
    }

    fn initial(backend: Backend) -> Kernel {
        match backend {
            Backend::Native => Kernel::Running {
                sum: 0.0,
                weighted: 0.0,
                since_resync: 0,
            },
            Backend::Fallback => Kernel::Scan {
                sum: 0.0,
                weighted: 0.0,
            },
        }
    }

    /// Pushes `value` and returns the window sums once full.
    #[inline]
    #[allow(clippy::cast_precision_loss)]
    pub(crate) fn push(&mut self, value: f64) -> Option<LinearSums> {
        let evicted = self.values.push(value);

        match &mut self.kernel {
            Kernel::Running {
                sum,
                weighted,
                since_resync,
            } => {
                let last = (self.values.len() - 1) as f64;
                match evicted {
                    Some(old) => {
                        *weighted = last.mul_add(value, *weighted - (*sum - old));
                        *sum += value - old;
                        *since_resync += 1;
                    }
                    None => {
                        *weighted = last.mul_add(value, *weighted);
                        *sum += value;
                    }
                }

                if *since_resync >= self.values.capacity() {
                    (*sum, *weighted) = rescan(&self.values);
                    *since_resync = 0;
                }
            }
            Kernel::Scan { sum, weighted } => (*sum, *weighted) = rescan(&self.values),
        }

        self.sums()
    }

    /// Window sums, or `None` while filling.
    #[inline]
    pub(crate) fn sums(&self) -> Option<LinearSums> {
        if !self.values.is_full() {
            return None;
        }

        let (Kernel::Running { sum, weighted, .. } | Kernel::Scan { sum, weighted }) = self.kernel;
        Some(LinearSums { sum, weighted })
    }

    pub(crate) fn capacity(&self) -> usize {
        self.values.capacity()
    }

    pub(crate) fn clear(&mut self) {
        self.values.clear();
        self.kernel = match self.kernel {
            Kernel::Running { .. } => Self::initial(Backend::Native),
            Kernel::Scan { .. } => Self::initial(Backend::Fallback),
        };
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    fn both(window: usize) -> [WindowLinear; 2] {
        [
            WindowLinear::new(Backend::Native, window).unwrap(),
            WindowLinear::new(Backend::Fallback, window).unwrap(),
        ]
    }

    #[test]
    fn weights_start_at_oldest() {
        for mut linear in both(3) {
            assert_eq!(linear.push(1.0), None);
            assert_eq!(linear.push(2.0), None);
            // 0·1 + 1·2 + 2·3 = 8
            assert_eq!(
                linear.push(3.0),
                Some(LinearSums {
                    sum: 6.0,
                    weighted: 8.0
                })
            );
        }
    }

    #[test]
    fn slide_reindexes_window() {
        for mut linear in both(3) {
            for value in [1.0, 2.0, 3.0] {
                linear.push(value);
            }
            // window [2, 3, 10]: 0·2 + 1·3 + 2·10 = 23
            assert_eq!(
                linear.push(10.0),
                Some(LinearSums {
                    sum: 15.0,
                    weighted: 23.0
                })
            );
        }
    }

    #[test]
    fn backends_agree_over_long_streams() {
        let [mut native, mut fallback] = both(11);
        for i in 0..3_000 {
            let value = 50.0 + (f64::from(i) * 0.29).sin() * 4.0;
            if let (Some(a), Some(b)) = (native.push(value), fallback.push(value)) {
                assert!((a.weighted - b.weighted).abs() < 1e-8);
                assert!((a.sum - b.sum).abs() < 1e-9);
            }
        }
        assert_eq!(native.capacity(), 11);
    }

    #[test]
    fn clear_restarts_filling() {
        for mut linear in both(2) {
            linear.push(3.0);
            linear.push(4.0);
            linear.clear();
            assert_eq!(linear.sums(), None);
            linear.push(1.0);
            assert_eq!(
                linear.push(1.0),
                Some(LinearSums {
                    sum: 2.0,
                    weighted: 1.0
                })
            );
        }
    }
}
