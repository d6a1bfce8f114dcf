use std::fmt::{Debug, Display};

use crate::{
    Backend, ConstructionError, Indicator, IndicatorConfig, IndicatorConfigBuilder,
    IndicatorKind, InputError, Params, PriceSource, Schema, Tick, config,
    rolling::{Seed, Smoother},
};

/// Generates the config and builder of a percentage oscillator.
macro_rules! oscillator_config {
    (
        $(#[$meta:meta])*
        $config:ident, $builder:ident, source: $source:expr
    ) => {
        $(#[$meta])*
        #[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
        pub struct $config {
            fast: usize,
            slow: usize,
            signal: usize,
            source: PriceSource,
        }

        impl IndicatorConfig for $config {
            type Builder = $builder;

            fn builder() -> Self::Builder {
                let defaults = Self::default();
                $builder {
                    fast: defaults.fast,
                    slow: defaults.slow,
                    signal: defaults.signal,
                    source: defaults.source,
                }
            }

            fn schema(&self) -> Schema {
                self.source.schema()
            }

            fn required_ticks(&self) -> usize {
                self.slow + self.signal - 1
            }
        }

        impl $config {
            #[must_use]
            pub fn fast(&self) -> usize {
                self.fast
            }

            #[must_use]
            pub fn slow(&self) -> usize {
                self.slow
            }

            #[must_use]
            pub fn signal(&self) -> usize {
                self.signal
            }

            #[must_use]
            pub fn source(&self) -> PriceSource {
                self.source
            }

            pub(crate) fn from_params(params: &Params) -> Result<Self, ConstructionError> {
                let mut builder = Self::builder();
                if let Some(fast) = params.window("fast")? {
                    builder = builder.fast(fast);
                }
                if let Some(slow) = params.window("slow")? {
                    builder = builder.slow(slow);
                }
                if let Some(signal) = params.window("signal")? {
                    builder = builder.signal(signal);
                }
                builder.build()
            }
        }

        impl Default for $config {
            fn default() -> Self {
                Self {
                    fast: 12,
                    slow: 26,
                    signal: 9,
                    source: $source,
                }
            }
        }

        impl Display for $config {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(
                    f,
                    "{}({}, {}, {}, {})",
                    stringify!($config),
                    self.fast,
                    self.slow,
                    self.signal,
                    self.source
                )
            }
        }

        #[doc = concat!("Builder for [`", stringify!($config), "`].")]
        #[derive(Clone, Copy, Debug)]
        pub struct $builder {
            fast: usize,
            slow: usize,
            signal: usize,
            source: PriceSource,
        }

        impl $builder {
            #[must_use]
            pub fn fast(mut self, fast: usize) -> Self {
                self.fast = fast;
                self
            }

            #[must_use]
            pub fn slow(mut self, slow: usize) -> Self {
                self.slow = slow;
                self
            }

            #[must_use]
            pub fn signal(mut self, signal: usize) -> Self {
                self.signal = signal;
                self
            }

            #[must_use]
            pub fn source(mut self, source: PriceSource) -> Self {
                self.source = source;
                self
            }
        }

        impl IndicatorConfigBuilder<$config> for $builder {
            fn build(self) -> Result<$config, ConstructionError> {
                let fast = config::window("fast", self.fast)?;
                let slow = config::window("slow", self.slow)?;
                let signal = config::window("signal", self.signal)?;

                if fast >= slow {
                    return Err(ConstructionError::Incompatible(
                        "fast window must be shorter than slow window",
                    ));
                }

                Ok($config {
                    fast,
                    slow,
                    signal,
                    source: self.source,
                })
            }
        }
    };
}

oscillator_config!(
    /// Configuration for the Percentage Price Oscillator ([`Ppo`]).
    ///
    /// Defaults: fast 12, slow 26, signal 9, source [`PriceSource::Close`].
    PpoConfig, PpoConfigBuilder, source: PriceSource::Close
);

oscillator_config!(
    /// Configuration for the Percentage Volume Oscillator ([`Pvo`]).
    ///
    /// Defaults: fast 12, slow 26, signal 9, source [`PriceSource::Volume`].
    PvoConfig, PvoConfigBuilder, source: PriceSource::Volume
);

/// PPO/PVO output: the oscillator line, its signal line and the histogram.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PpoValue {
    ppo: f64,
    signal: f64,
    histogram: f64,
}

impl PpoValue {
    /// Value with `histogram = ppo − signal`.
    #[must_use]
    pub fn new(ppo: f64, signal: f64) -> Self {
        Self {
            ppo,
            signal,
            histogram: ppo - signal,
        }
    }

    /// `100 × (EMA_fast − EMA_slow) / EMA_slow`.
    #[inline]
    #[must_use]
    pub fn ppo(&self) -> f64 {
        self.ppo
    }

    #[inline]
    #[must_use]
    pub fn signal(&self) -> f64 {
        self.signal
    }

    #[inline]
    #[must_use]
    pub fn histogram(&self) -> f64 {
        self.histogram
    }
}

impl Display for PpoValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "PPO(p: {}, s: {}, h: {})",
            self.ppo, self.signal, self.histogram
        )
    }
}

/// Fast/slow/signal EMA chain shared by PPO and PVO.
#[derive(Clone, Debug)]
struct PercentageOscillator {
    fast: Smoother,
    slow: Smoother,
    signal: Smoother,
    current: Option<PpoValue>,
}

impl PercentageOscillator {
    fn new(fast: usize, slow: usize, signal: usize) -> Self {
        Self {
            fast: Smoother::ema(fast, Seed::Mean),
            slow: Smoother::ema(slow, Seed::Mean),
            signal: Smoother::ema(signal, Seed::Mean),
            current: None,
        }
    }

    fn push(&mut self, value: f64) -> Option<PpoValue> {
        let fast = self.fast.push(value);
        let slow = self.slow.push(value);

        if let (Some(fast), Some(slow)) = (fast, slow) {
            let ppo = if slow == 0.0 {
                0.0
            } else {
                100.0 * (fast - slow) / slow
            };
            self.current = self
                .signal
                .push(ppo)
                .map(|signal| PpoValue::new(ppo, signal));
        }

        self.current
    }

    fn reset(&mut self) {
        self.fast.reset();
        self.slow.reset();
        self.signal.reset();
        self.current = None;
    }
}

/// Percentage Price Oscillator (PPO).
///
/// MACD expressed as a percentage of the slow EMA, so values are
/// comparable across price levels:
///
/// ```text
/// PPO       = 100 × (EMA_fast − EMA_slow) / EMA_slow     (EMA_slow 0 → 0)
/// signal    = EMA_signal(PPO)
/// histogram = PPO − signal
/// ```
#[derive(Clone, Debug)]
pub struct Ppo {
    config: PpoConfig,
    oscillator: PercentageOscillator,
}

impl Indicator for Ppo {
    type Config = PpoConfig;
    type Output = PpoValue;

    const KIND: IndicatorKind = IndicatorKind::Ppo;

    fn with_backend(config: Self::Config, _backend: Backend) -> Self {
        Self {
            config,
            oscillator: PercentageOscillator::new(config.fast, config.slow, config.signal),
        }
    }

    fn config(&self) -> &PpoConfig {
        &self.config
    }

    fn update(&mut self, tick: &Tick) -> Result<Option<PpoValue>, InputError> {
        let value = self.config.source.extract(tick)?;
        Ok(self.oscillator.push(value))
    }

    fn value(&self) -> Option<PpoValue> {
        self.oscillator.current
    }

    fn reset(&mut self) {
        self.oscillator.reset();
    }

    fn backend(&self) -> Backend {
        Backend::Fallback
    }
}

impl Display for Ppo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "PPO({}, {}, {}, {})",
            self.config.fast, self.config.slow, self.config.signal, self.config.source
        )
    }
}

/// Percentage Volume Oscillator (PVO): [`Ppo`] applied to volume.
///
/// # Example
///
/// ```
/// use quantedge_stream::{IndicatorConfig, IndicatorConfigBuilder, Pvo, PvoConfig, Tick};
///
/// let config = PvoConfig::builder().fast(1).slow(2).signal(1).build().unwrap();
/// let mut pvo = Pvo::new(config);
/// pvo.update(&Tick::price(10.0).with_volume(100.0)).unwrap();
/// // EMA1 = 300, EMA2 = (100 + 300) / 2 = 200
/// let value = pvo.update(&Tick::price(10.0).with_volume(300.0)).unwrap().unwrap();
/// assert_eq!(value.ppo(), 50.0);
/// ```
#[derive(Clone, Debug)]
pub struct Pvo {
    config: PvoConfig,
    oscillator: PercentageOscillator,
}

impl Indicator for Pvo {
    type Config = PvoConfig;
    type Output = PpoValue;

    const KIND: IndicatorKind = IndicatorKind::Pvo;

    fn with_backend(config: Self::Config, _backend: Backend) -> Self {
        Self {
            config,
            oscillator: PercentageOscillator::new(config.fast, config.slow, config.signal),
        }
    }

    fn config(&self) -> &PvoConfig {
        &self.config
    }

    fn update(&mut self, tick: &Tick) -> Result<Option<PpoValue>, InputError> {
        let value = self.config.source.extract(tick)?;
        Ok(self.oscillator.push(value))
    }

    fn value(&self) -> Option<PpoValue> {
        self.oscillator.current
    }

    fn reset(&mut self) {
        self.oscillator.reset();
    }

    fn backend(&self) -> Backend {
        Backend::Fallback
    }
}

impl Display for Pvo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "PVO({}, {}, {}, {})",
            self.config.fast, self.config.slow, self.config.signal, self.config.source
        )
    }
}
