/// How an exponential accumulator produces its first value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum Seed {
    /// Simple mean of the first `period` values; first output at value
    /// `period`.
    Mean,
    /// The first value itself; output from the first value on.
    First,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Phase {
    Seeding { sum: f64, count: usize },
    Active(f64),
}

/// Exponential accumulator: `s' = s + α·(x - s)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Smoother {
    alpha: f64,
    period: usize,
    seed: Seed,
    phase: Phase,
}

const SEEDING: Phase = Phase::Seeding { sum: 0.0, count: 0 };

impl Smoother {
    /// EMA smoothing, `α = 2 / (period + 1)`.
    #[allow(clippy::cast_precision_loss)]
    pub(crate) fn ema(period: usize, seed: Seed) -> Self {
        Self::with_alpha(2.0 / (period + 1) as f64, period, seed)
    }

    /// Wilder smoothing, `α = 1 / period`.
    #[allow(clippy::cast_precision_loss)]
    pub(crate) fn wilder(period: usize, seed: Seed) -> Self {
        Self::with_alpha(1.0 / period as f64, period, seed)
    }

    pub(crate) fn with_alpha(alpha: f64, period: usize, seed: Seed) -> Self {
        Self {
            alpha,
            period,
            seed,
            phase: SEEDING,
        }
    }

    #[inline]
    #[allow(clippy::cast_precision_loss)]
    pub(crate) fn push(&mut self, value: f64) -> Option<f64> {
        self.phase = match (self.phase, self.seed) {
            (Phase::Active(prev), _) => Phase::Active(self.alpha.mul_add(value - prev, prev)),
            (Phase::Seeding { .. }, Seed::First) => Phase::Active(value),
            (Phase::Seeding { sum, count }, Seed::Mean) => {
                let (sum, count) = (sum + value, count + 1);
                if count == self.period {
                    Phase::Active(sum / self.period as f64)
                } else {
                    Phase::Seeding { sum, count }
                }
            }
        };

        self.value()
    }

    #[inline]
    pub(crate) fn value(&self) -> Option<f64> {
        match self.phase {
            Phase::Active(value) => Some(value),
            Phase::Seeding { .. } => None,
        }
    }

    /// Values the accumulator needs before its first output.
    pub(crate) fn warmup(&self) -> usize {
        match self.seed {
            Seed::Mean => self.period,
            Seed::First => 1,
        }
    }

    pub(crate) fn reset(&mut self) {
        self.phase = SEEDING;
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::test_util::assert_approx;

    #[test]
    fn mean_seed_waits_for_period() {
        let mut ema = Smoother::ema(3, Seed::Mean);
        assert_eq!(ema.push(2.0), None);
        assert_eq!(ema.push(4.0), None);
        // seed = (2 + 4 + 6) / 3
        assert_eq!(ema.push(6.0), Some(4.0));
        // 4 + 0.5 * (8 - 4)
        assert_eq!(ema.push(8.0), Some(6.0));
        assert_eq!(ema.warmup(), 3);
    }

    #[test]
    fn first_seed_outputs_immediately() {
        let mut ema = Smoother::ema(3, Seed::First);
        assert_eq!(ema.push(10.0), Some(10.0));
        assert_eq!(ema.push(20.0), Some(15.0));
        assert_eq!(ema.warmup(), 1);
    }

    #[test]
    fn wilder_uses_reciprocal_period() {
        let mut wilder = Smoother::wilder(4, Seed::Mean);
        for value in [1.0, 2.0, 3.0, 4.0] {
            wilder.push(value);
        }
        // 2.5 + (6.5 - 2.5) / 4
        assert_approx!(wilder.push(6.5).unwrap(), 3.5);
    }

    #[test]
    fn reset_restarts_seeding() {
        let mut ema = Smoother::ema(2, Seed::Mean);
        ema.push(1.0);
        ema.push(3.0);
        ema.reset();
        assert_eq!(ema.value(), None);
        assert_eq!(ema.push(5.0), None);
        assert_eq!(ema.push(7.0), Some(6.0));
    }
}
