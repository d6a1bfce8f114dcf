use crate::{Backend, error::BackendConstructionError};

use super::RingBuffer;

/// Running total may not shrink below this fraction of the largest term of
/// an update before it is recomputed from the buffer.
const CANCELLATION_RATIO: f64 = 1e-6;

#[derive(Clone, Copy, Debug)]
enum Kernel {
    /// O(1): add the new value, subtract the evicted one. Resynced from the
    /// buffer once per window. Detected cancellation forces at most one
    /// extra resync per window, so a window that sums to about zero stays
    /// amortized O(1).
    Running {
        sum: f64,
        since_resync: usize,
        guard_armed: bool,
    },
    /// O(window): sum of the buffer.
    Scan { sum: f64 },
}

/// Sliding sum over the last `window` values.
#[derive(Clone, Debug)]
pub(crate) struct WindowSum {
    values: RingBuffer,
    kernel: Kernel,
}

impl WindowSum {
    pub(crate) fn new(backend: Backend, window: usize) -> Result<Self, BackendConstructionError> {
        let kernel = match backend {
            Backend::Native => Kernel::Running {
                sum: 0.0,
                since_resync: 0,
                guard_armed: true,
            },
            Backend::Fallback => Kernel::Scan { sum: 0.0 },
        };

        Ok(Self {
            values: RingBuffer::for_backend(backend, window)?,
            kernel,
        })
    }

    /// Pushes `value` and returns the window sum once full.
    #[inline]
    pub(crate) fn push(&mut self, value: f64) -> Option<f64> {
        let evicted = self.values.push(value);

        match &mut self.kernel {
            Kernel::Running {
                sum,
                since_resync,
                guard_armed,
            } => {
                let mut largest = sum.abs().max(value.abs());
                *sum += value;
                if let Some(old) = evicted {
                    largest = largest.max(old.abs());
                    *sum -= old;
                    *since_resync += 1;
                }

                if *since_resync >= self.values.capacity() {
                    *sum = self.values.iter().sum();
                    *since_resync = 0;
                    *guard_armed = true;
                } else if *guard_armed && sum.abs() < largest * CANCELLATION_RATIO {
                    *sum = self.values.iter().sum();
                    *since_resync = 0;
                    *guard_armed = false;
                }
            }
            Kernel::Scan { sum } => *sum = self.values.iter().sum(),
        }

        self.sum()
    }

    /// Window sum, or `None` while filling.
    #[inline]
    pub(crate) fn sum(&self) -> Option<f64> {
        if !self.values.is_full() {
            return None;
        }

        match self.kernel {
            Kernel::Running { sum, .. } | Kernel::Scan { sum } => Some(sum),
        }
    }

    /// Window mean, or `None` while filling.
    #[inline]
    #[allow(clippy::cast_precision_loss)]
    pub(crate) fn mean(&self) -> Option<f64> {
        self.sum().map(|sum| sum / self.values.capacity() as f64)
    }

    #[inline]
    pub(crate) fn is_full(&self) -> bool {
        self.values.is_full()
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.values.len()
    }

    pub(crate) fn capacity(&self) -> usize {
        self.values.capacity()
    }

    pub(crate) fn clear(&mut self) {
        self.values.clear();
        self.kernel = match self.kernel {
            Kernel::Running { .. } => Kernel::Running {
                sum: 0.0,
                since_resync: 0,
                guard_armed: true,
            },
            Kernel::Scan { .. } => Kernel::Scan { sum: 0.0 },
        };
    }
}
