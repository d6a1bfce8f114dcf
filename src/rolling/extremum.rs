use crate::{Backend, error::BackendConstructionError};

use super::{RingBuffer, native_arena};

/// Current window extremum and how many ticks ago it occurred.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Extremum {
    pub(crate) value: f64,
    /// 0 when the newest value is the extremum.
    pub(crate) age: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Direction {
    Max,
    Min,
}

impl Direction {
    /// True when `candidate` replaces `incumbent`. Ties go to the newer value.
    #[inline]
    fn supersedes(self, candidate: f64, incumbent: f64) -> bool {
        match self {
            Self::Max => candidate >= incumbent,
            Self::Min => candidate <= incumbent,
        }
    }
}

/// Arena-backed double-ended queue of `(sequence, value)` pairs, monotonic
/// in value from front to back.
#[derive(Clone, Debug)]
struct MonotonicDeque {
    slots: Vec<(u64, f64)>,
    head: usize,
    len: usize,
}

impl MonotonicDeque {
    fn new(window: usize) -> Result<Self, BackendConstructionError> {
        Ok(Self {
            slots: native_arena(window, (0, 0.0))?,
            head: 0,
            len: 0,
        })
    }

    #[inline]
    fn slot(&self, offset: usize) -> usize {
        let slot = self.head + offset;
        if slot >= self.slots.len() {
            slot - self.slots.len()
        } else {
            slot
        }
    }

    #[inline]
    fn front(&self) -> Option<(u64, f64)> {
        (self.len > 0).then(|| self.slots[self.head])
    }

    #[inline]
    fn back(&self) -> Option<(u64, f64)> {
        (self.len > 0).then(|| self.slots[self.slot(self.len - 1)])
    }

    #[inline]
    fn pop_front(&mut self) {
        self.head = self.slot(1);
        self.len -= 1;
    }

    #[inline]
    fn push(&mut self, direction: Direction, window: u64, sequence: u64, value: f64) {
        // entries leaving the window once `sequence` is in
        while let Some((oldest, _)) = self.front() {
            if oldest + window > sequence {
                break;
            }
            self.pop_front();
        }
        while let Some((_, back)) = self.back() {
            if !direction.supersedes(value, back) {
                break;
            }
            self.len -= 1;
        }

        let slot = self.slot(self.len);
        self.slots[slot] = (sequence, value);
        self.len += 1;
    }

    fn clear(&mut self) {
        self.head = 0;
        self.len = 0;
    }
}

#[derive(Clone, Debug)]
enum Kernel {
    /// Amortized O(1).
    Deque(MonotonicDeque),
    /// O(window) scan of the retained values.
    Scan(RingBuffer),
}

/// Sliding maximum or minimum over the last `window` values.
#[derive(Clone, Debug)]
pub(crate) struct WindowExtremum {
    direction: Direction,
    window: usize,
    pushed: u64,
    current: Extremum,
    kernel: Kernel,
}

impl WindowExtremum {
    pub(crate) fn max(backend: Backend, window: usize) -> Result<Self, BackendConstructionError> {
        Self::new(Direction::Max, backend, window)
    }

    pub(crate) fn min(backend: Backend, window: usize) -> Result<Self, BackendConstructionError> {
        Self::new(Direction::Min, backend, window)
    }

    fn new(
        direction: Direction,
        backend: Backend,
        window: usize,
    ) -> Result<Self, BackendConstructionError> {
        let kernel = match backend {
            Backend::Native => Kernel::Deque(MonotonicDeque::new(window)?),
            Backend::Fallback => Kernel::Scan(RingBuffer::new(window)),
        };

        Ok(Self {
            direction,
            window,
            pushed: 0,
            current: Extremum {
                value: 0.0,
                age: 0,
            },
            kernel,
        })
    }

    /// Pushes `value` and returns the window extremum once full.
    #[inline]
    pub(crate) fn push(&mut self, value: f64) -> Option<Extremum> {
        let sequence = self.pushed;
        self.pushed += 1;

        self.current = match &mut self.kernel {
            Kernel::Deque(deque) => {
                deque.push(self.direction, self.window as u64, sequence, value);
                // never empty right after a push
                let (at, extreme) = deque.front().unwrap_or((sequence, value));
                #[allow(clippy::cast_possible_truncation)]
                Extremum {
                    value: extreme,
                    age: (sequence - at) as usize,
                }
            }
            Kernel::Scan(values) => {
                values.push(value);
                let direction = self.direction;
                let (index, extreme) = values
                    .iter()
                    .enumerate()
                    .fold((0, f64::NAN), |best, (index, candidate)| {
                        if best.1.is_nan() || direction.supersedes(candidate, best.1) {
                            (index, candidate)
                        } else {
                            best
                        }
                    });
                Extremum {
                    value: extreme,
                    age: values.len() - 1 - index,
                }
            }
        };

        self.extremum()
    }

    /// Window extremum, or `None` while filling.
    #[inline]
    pub(crate) fn extremum(&self) -> Option<Extremum> {
        (self.pushed >= self.window as u64).then_some(self.current)
    }

    pub(crate) fn capacity(&self) -> usize {
        match &self.kernel {
            Kernel::Deque(deque) => deque.slots.len(),
            Kernel::Scan(values) => values.capacity(),
        }
    }

    pub(crate) fn clear(&mut self) {
        self.pushed = 0;
        match &mut self.kernel {
            Kernel::Deque(deque) => deque.clear(),
            Kernel::Scan(values) => values.clear(),
        }
    }
}
