use crate::{Backend, error::BackendConstructionError};

use super::RingBuffer;

/// Mean and sum of squared deviations of a full window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Moments {
    pub(crate) mean: f64,
    m2: f64,
    count: usize,
}

#[allow(clippy::cast_precision_loss)]
impl Moments {
    #[inline]
    pub(crate) fn population_variance(self) -> f64 {
        self.m2 / self.count as f64
    }

    /// Bessel-corrected variance; 0 for a single sample.
    #[inline]
    pub(crate) fn sample_variance(self) -> f64 {
        if self.count < 2 {
            return 0.0;
        }
        self.m2 / (self.count - 1) as f64
    }

    #[inline]
    pub(crate) fn population_std(self) -> f64 {
        self.population_variance().sqrt()
    }

    #[inline]
    pub(crate) fn sample_std(self) -> f64 {
        self.sample_variance().sqrt()
    }
}

#[derive(Clone, Copy, Debug)]
enum Kernel {
    /// O(1) sliding Welford update, resynced once per window.
    Welford {
        mean: f64,
        m2: f64,
        since_resync: usize,
    },
    /// O(window) two-pass recomputation.
    TwoPass { mean: f64, m2: f64 },
}

/// Sliding mean and variance over the last `window` values.
#[derive(Clone, Debug)]
pub(crate) struct WindowMoments {
    values: RingBuffer,
    kernel: Kernel,
}

fn two_pass(values: &RingBuffer) -> (f64, f64) {
    #[allow(clippy::cast_precision_loss)]
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let m2 = values.iter().map(|x| (x - mean) * (x - mean)).sum();
    (mean, m2)
}

impl WindowMoments {
    pub(crate) fn new(backend: Backend, window: usize) -> Result<Self, BackendConstructionError> {
        Ok(Self {
            values: RingBuffer::for_backend(backend, window)?,
            kernel: Self::initial(backend),
        })
    }

    fn initial(backend: Backend) -> Kernel {
        match backend {
            Backend::Native => Kernel::Welford {
                mean: 0.0,
                m2: 0.0,
                since_resync: 0,
            },
            Backend::Fallback => Kernel::TwoPass { mean: 0.0, m2: 0.0 },
        }
    }

    /// Pushes `value` and returns the window moments once full.
    #[inline]
    #[allow(clippy::cast_precision_loss)]
    pub(crate) fn push(&mut self, value: f64) -> Option<Moments> {
        let evicted = self.values.push(value);

        match &mut self.kernel {
            Kernel::Welford {
                mean,
                m2,
                since_resync,
            } => {
                if let Some(old) = evicted {
                    let previous_mean = *mean;
                    *mean += (value - old) / self.values.capacity() as f64;
                    *m2 += (value - old) * (value - *mean + old - previous_mean);
                    *since_resync += 1;
                } else {
                    let delta = value - *mean;
                    *mean += delta / self.values.len() as f64;
                    *m2 += delta * (value - *mean);
                }
                *m2 = m2.max(0.0);

                if *since_resync >= self.values.capacity() {
                    (*mean, *m2) = two_pass(&self.values);
                    *since_resync = 0;
                }
            }
            Kernel::TwoPass { mean, m2 } => (*mean, *m2) = two_pass(&self.values),
        }

        self.moments()
    }

    /// Window moments, or `None` while filling.
    #[inline]
    pub(crate) fn moments(&self) -> Option<Moments> {
        if !self.values.is_full() {
            return None;
        }

        let (Kernel::Welford { mean, m2, .. } | Kernel::TwoPass { mean, m2 }) = self.kernel;
        Some(Moments {
            mean,
            m2,
            count: self.values.len(),
        })
    }

    pub(crate) fn capacity(&self) -> usize {
        self.values.capacity()
    }

    pub(crate) fn clear(&mut self) {
        self.values.clear();
        self.kernel = match self.kernel {
            Kernel::Welford { .. } => Self::initial(Backend::Native),
            Kernel::TwoPass { .. } => Self::initial(Backend::Fallback),
        };
    }
}
