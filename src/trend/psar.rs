use std::fmt::{Debug, Display};

use crate::{
    Backend, ConstructionError, Indicator, IndicatorConfig, IndicatorConfigBuilder,
    IndicatorKind, InputError, Params, Price, Schema, Tick, config::Coefficient,
};

/// Configuration for the Parabolic SAR ([`Psar`]) indicator.
///
/// Defaults: acceleration starts at 0.02, steps by 0.02, caps at 0.2.
/// Requires `0 < af_start ≤ af_max` and `af_step > 0`.
///
/// # Example
///
/// ```
/// use quantedge_stream::{IndicatorConfig, IndicatorConfigBuilder, PsarConfig};
///
/// let config = PsarConfig::builder().af_max(0.3).build().unwrap();
/// assert_eq!(config.af_max(), 0.3);
/// assert!(PsarConfig::builder().af_start(0.5).build().is_err());
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct PsarConfig {
    af_start: Coefficient,
    af_step: Coefficient,
    af_max: Coefficient,
}

impl IndicatorConfig for PsarConfig {
    type Builder = PsarConfigBuilder;

    fn builder() -> Self::Builder {
        let defaults = Self::default();
        PsarConfigBuilder {
            af_start: defaults.af_start.get(),
            af_step: defaults.af_step.get(),
            af_max: defaults.af_max.get(),
        }
    }

    fn schema(&self) -> Schema {
        Schema::HLC
    }

    fn required_ticks(&self) -> usize {
        3
    }
}

impl PsarConfig {
    #[must_use]
    pub fn af_start(&self) -> f64 {
        self.af_start.get()
    }

    #[must_use]
    pub fn af_step(&self) -> f64 {
        self.af_step.get()
    }

    #[must_use]
    pub fn af_max(&self) -> f64 {
        self.af_max.get()
    }

    pub(crate) fn from_params(params: &Params) -> Result<Self, ConstructionError> {
        let mut builder = Self::builder();
        if let Some(value) = params.number("af_start") {
            builder = builder.af_start(value);
        }
        if let Some(value) = params.number("af_step") {
            builder = builder.af_step(value);
        }
        if let Some(value) = params.number("af_max") {
            builder = builder.af_max(value);
        }
        builder.build()
    }
}

impl Default for PsarConfig {
    fn default() -> Self {
        Self {
            af_start: Coefficient::of(0.02),
            af_step: Coefficient::of(0.02),
            af_max: Coefficient::of(0.2),
        }
    }
}

impl Display for PsarConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "PsarConfig({}, {}, {})",
            self.af_start, self.af_step, self.af_max
        )
    }
}

/// Builder for [`PsarConfig`].
#[derive(Clone, Copy, Debug)]
pub struct PsarConfigBuilder {
    af_start: f64,
    af_step: f64,
    af_max: f64,
}

impl PsarConfigBuilder {
    #[must_use]
    pub fn af_start(mut self, af_start: f64) -> Self {
        self.af_start = af_start;
        self
    }

    #[must_use]
    pub fn af_step(mut self, af_step: f64) -> Self {
        self.af_step = af_step;
        self
    }

    #[must_use]
    pub fn af_max(mut self, af_max: f64) -> Self {
        self.af_max = af_max;
        self
    }
}

impl IndicatorConfigBuilder<PsarConfig> for PsarConfigBuilder {
    fn build(self) -> Result<PsarConfig, ConstructionError> {
        let af_start = Coefficient::positive("af_start", self.af_start)?;
        let af_step = Coefficient::positive("af_step", self.af_step)?;
        let af_max = Coefficient::positive("af_max", self.af_max)?;

        if af_start.get() > af_max.get() {
            return Err(ConstructionError::Incompatible(
                "af_start must not exceed af_max",
            ));
        }

        Ok(PsarConfig {
            af_start,
            af_step,
            af_max,
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Trend {
    Up,
    Down,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum PsarPhase {
    Empty,
    /// Tick 1 seen.
    Primed {
        high: Price,
        low: Price,
        close: Price,
    },
    Active {
        trend: Trend,
        sar: Price,
        af: f64,
        /// Highest high while long, lowest low while short.
        ep: Price,
        /// (high, low) of t−2 and t−1.
        history: [(Price, Price); 2],
    },
}

/// Parabolic Stop and Reverse (PSAR).
///
/// Tick 2 fixes the initial trend: long when its close is above tick 1's
/// close, short otherwise. The SAR starts at tick 1's low (long) or high
/// (short), and the extreme point at tick 2's high (long) or low (short).
/// From tick 3 on, while long:
///
/// ```text
/// sar = min(sar' + af × (ep − sar'), low[t−1], low[t−2])
/// low < sar  → flip: sar = ep, ep = low, af = af_start
/// otherwise  → high > ep: ep = high, af = min(af + step, max)
/// ```
///
/// and the mirror image while short.
///
/// # Example
///
/// ```
/// use quantedge_stream::{Psar, PsarConfig, Tick};
///
/// let mut psar = Psar::new(PsarConfig::default());
/// assert_eq!(psar.update(&Tick::hlc(10.0, 9.0, 9.5)), Ok(None));
/// assert_eq!(psar.update(&Tick::hlc(10.5, 9.5, 10.0)), Ok(None));
/// assert_eq!(psar.update(&Tick::hlc(11.0, 9.8, 10.8)), Ok(Some(9.0)));
/// assert_eq!(psar.is_long(), Some(true));
/// ```
#[derive(Clone, Debug)]
pub struct Psar {
    config: PsarConfig,
    phase: PsarPhase,
    current: Option<Price>,
}

impl Psar {
    /// Trend of the last computed SAR: `Some(true)` while long.
    #[must_use]
    pub fn is_long(&self) -> Option<bool> {
        match self.phase {
            PsarPhase::Active { trend, .. } if self.current.is_some() => Some(trend == Trend::Up),
            _ => None,
        }
    }
}

impl Indicator for Psar {
    type Config = PsarConfig;
    type Output = Price;

    const KIND: IndicatorKind = IndicatorKind::Psar;

    fn with_backend(config: Self::Config, _backend: Backend) -> Self {
        Self {
            config,
            phase: PsarPhase::Empty,
            current: None,
        }
    }

    fn config(&self) -> &PsarConfig {
        &self.config
    }

    fn update(&mut self, tick: &Tick) -> Result<Option<Price>, InputError> {
        let (high, low, close) = tick.hlc_values()?;
        let af_start = self.config.af_start.get();
        let af_step = self.config.af_step.get();
        let af_max = self.config.af_max.get();

        self.phase = match self.phase {
            PsarPhase::Empty => PsarPhase::Primed { high, low, close },
            PsarPhase::Primed {
                high: first_high,
                low: first_low,
                close: first_close,
            } => {
                let (trend, sar, ep) = if close > first_close {
                    (Trend::Up, first_low, high)
                } else {
                    (Trend::Down, first_high, low)
                };
                PsarPhase::Active {
                    trend,
                    sar,
                    af: af_start,
                    ep,
                    history: [(first_high, first_low), (high, low)],
                }
            }
            PsarPhase::Active {
                trend,
                sar: prev,
                mut af,
                mut ep,
                history: [(high_2, low_2), (high_1, low_1)],
            } => {
                let projected = af.mul_add(ep - prev, prev);
                let (sar, trend) = match trend {
                    Trend::Up => {
                        let sar = projected.min(low_1).min(low_2);
                        if low < sar {
                            let reversal = ep;
                            ep = low;
                            af = af_start;
                            (reversal, Trend::Down)
                        } else {
                            if high > ep {
                                ep = high;
                                af = (af + af_step).min(af_max);
                            }
                            (sar, Trend::Up)
                        }
                    }
                    Trend::Down => {
                        let sar = projected.max(high_1).max(high_2);
                        if high > sar {
                            let reversal = ep;
                            ep = high;
                            af = af_start;
                            (reversal, Trend::Up)
                        } else {
                            if low < ep {
                                ep = low;
                                af = (af + af_step).min(af_max);
                            }
                            (sar, Trend::Down)
                        }
                    }
                };

                self.current = Some(sar);

                PsarPhase::Active {
                    trend,
                    sar,
                    af,
                    ep,
                    history: [(high_1, low_1), (high, low)],
                }
            }
        };

        Ok(self.current)
    }

    fn value(&self) -> Option<Price> {
        self.current
    }

    fn reset(&mut self) {
        self.phase = PsarPhase::Empty;
        self.current = None;
    }

    fn backend(&self) -> Backend {
        Backend::Fallback
    }
}

impl Display for Psar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "PSAR({}, {}, {})",
            self.config.af_start, self.config.af_step, self.config.af_max
        )
    }
}
