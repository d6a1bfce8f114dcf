use std::fmt::{Debug, Display};

use crate::{
    Backend, ConstructionError, Indicator, IndicatorConfig, IndicatorConfigBuilder,
    IndicatorKind, InputError, Params, Schema, Tick, backend, config, rolling::WindowSum,
};

/// Configuration for the [`AwesomeOscillator`].
///
/// Defaults: fast 5, slow 34.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct AwesomeOscillatorConfig {
    fast: usize,
    slow: usize,
}

impl IndicatorConfig for AwesomeOscillatorConfig {
    type Builder = AwesomeOscillatorConfigBuilder;

    fn builder() -> Self::Builder {
        let defaults = Self::default();
        AwesomeOscillatorConfigBuilder {
            fast: defaults.fast,
            slow: defaults.slow,
        }
    }

    fn schema(&self) -> Schema {
        Schema::HL
    }

    fn required_ticks(&self) -> usize {
        self.slow
    }
}

impl AwesomeOscillatorConfig {
    #[must_use]
    pub fn fast(&self) -> usize {
        self.fast
    }

    #[must_use]
    pub fn slow(&self) -> usize {
        self.slow
    }

    pub(crate) fn from_params(params: &Params) -> Result<Self, ConstructionError> {
        let mut builder = Self::builder();
        if let Some(fast) = params.window("fast")? {
            builder = builder.fast(fast);
        }
        if let Some(slow) = params.window("slow")? {
            builder = builder.slow(slow);
        }
        builder.build()
    }
}

impl Default for AwesomeOscillatorConfig {
    fn default() -> Self {
        Self { fast: 5, slow: 34 }
    }
}

impl Display for AwesomeOscillatorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AwesomeOscillatorConfig({}, {})", self.fast, self.slow)
    }
}

/// Builder for [`AwesomeOscillatorConfig`].
#[derive(Clone, Copy, Debug)]
pub struct AwesomeOscillatorConfigBuilder {
    fast: usize,
    slow: usize,
}

impl AwesomeOscillatorConfigBuilder {
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
}

impl IndicatorConfigBuilder<AwesomeOscillatorConfig> for AwesomeOscillatorConfigBuilder {
    fn build(self) -> Result<AwesomeOscillatorConfig, ConstructionError> {
        let fast = config::window("fast", self.fast)?;
        let slow = config::window("slow", self.slow)?;

        if fast >= slow {
            return Err(ConstructionError::Incompatible(
                "fast window must be shorter than slow window",
            ));
        }

        Ok(AwesomeOscillatorConfig { fast, slow })
    }
}

/// Awesome Oscillator: difference of two simple averages of the bar
/// midpoint `(high + low) / 2`.
///
/// # Example
///
/// ```
/// use quantedge_stream::{
///     AwesomeOscillator, AwesomeOscillatorConfig, IndicatorConfig, IndicatorConfigBuilder, Tick,
/// };
///
/// let config = AwesomeOscillatorConfig::builder().fast(1).slow(2).build().unwrap();
/// let mut ao = AwesomeOscillator::new(config);
/// ao.update(&Tick::hlc(11.0, 9.0, 10.0)).unwrap();
/// // midpoints 10 and 14: 14 − 12
/// assert_eq!(ao.update(&Tick::hlc(15.0, 13.0, 14.0)), Ok(Some(2.0)));
/// ```
#[derive(Clone, Debug)]
pub struct AwesomeOscillator {
    config: AwesomeOscillatorConfig,
    backend: Backend,
    fast: WindowSum,
    slow: WindowSum,
    current: Option<f64>,
}

impl Indicator for AwesomeOscillator {
    type Config = AwesomeOscillatorConfig;
    type Output = f64;

    const KIND: IndicatorKind = IndicatorKind::AwesomeOscillator;

    fn with_backend(config: Self::Config, backend: Backend) -> Self {
        backend::construct(Self::KIND, backend, |backend| {
            Ok(Self {
                config,
                backend,
                fast: WindowSum::new(backend, config.fast)?,
                slow: WindowSum::new(backend, config.slow)?,
                current: None,
            })
        })
    }

    fn config(&self) -> &AwesomeOscillatorConfig {
        &self.config
    }

    fn update(&mut self, tick: &Tick) -> Result<Option<f64>, InputError> {
        let (high, low) = tick.hl()?;
        let midpoint = (high + low) / 2.0;

        self.fast.push(midpoint);
        self.slow.push(midpoint);

        if let (Some(fast), Some(slow)) = (self.fast.mean(), self.slow.mean()) {
            self.current = Some(fast - slow);
        }

        Ok(self.current)
    }

    fn value(&self) -> Option<f64> {
        self.current
    }

    fn reset(&mut self) {
        self.fast.clear();
        self.slow.clear();
        self.current = None;
    }

    fn backend(&self) -> Backend {
        self.backend
    }
}

impl Display for AwesomeOscillator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AO({}, {})", self.config.fast, self.config.slow)
    }
}
