use std::fmt::{Debug, Display};

use crate::{
    Backend, ConstructionError, Indicator, IndicatorConfig, IndicatorConfigBuilder,
    IndicatorKind, InputError, Params, Schema, Tick, backend, config,
    rolling::{WindowExtremum, WindowSum},
};

/// Configuration for the Stochastic Oscillator ([`Stochastic`]).
///
/// Defaults: %K window 14, %D window 3.
///
/// # Example
///
/// ```
/// use quantedge_stream::{IndicatorConfig, IndicatorConfigBuilder, StochasticConfig};
///
/// let config = StochasticConfig::builder().k(5).d(3).build().unwrap();
/// assert_eq!(config.required_ticks(), 7);
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct StochasticConfig {
    k: usize,
    d: usize,
}

impl IndicatorConfig for StochasticConfig {
    type Builder = StochasticConfigBuilder;

    fn builder() -> Self::Builder {
        let defaults = Self::default();
        StochasticConfigBuilder {
            k: defaults.k,
            d: defaults.d,
        }
    }

    fn schema(&self) -> Schema {
        Schema::HLC
    }

    fn required_ticks(&self) -> usize {
        self.k + self.d - 1
    }
}

impl StochasticConfig {
    /// Lookback of the high/low range.
    #[must_use]
    pub fn k(&self) -> usize {
        self.k
    }

    /// Smoothing window of %D.
    #[must_use]
    pub fn d(&self) -> usize {
        self.d
    }

    pub(crate) fn from_params(params: &Params) -> Result<Self, ConstructionError> {
        let mut builder = Self::builder();
        if let Some(k) = params.window("k")? {
            builder = builder.k(k);
        }
        if let Some(d) = params.window("d")? {
            builder = builder.d(d);
        }
        builder.build()
    }
}

impl Default for StochasticConfig {
    fn default() -> Self {
        Self { k: 14, d: 3 }
    }
}

impl Display for StochasticConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "StochasticConfig({}, {})", self.k, self.d)
    }
}

/// Builder for [`StochasticConfig`].
#[derive(Clone, Copy, Debug)]
pub struct StochasticConfigBuilder {
    k: usize,
    d: usize,
}

impl StochasticConfigBuilder {
    #[must_use]
    pub fn k(mut self, k: usize) -> Self {
        self.k = k;
        self
    }

    #[must_use]
    pub fn d(mut self, d: usize) -> Self {
        self.d = d;
        self
    }
}

impl IndicatorConfigBuilder<StochasticConfig> for StochasticConfigBuilder {
    fn build(self) -> Result<StochasticConfig, ConstructionError> {
        Ok(StochasticConfig {
            k: config::window("k", self.k)?,
            d: config::window("d", self.d)?,
        })
    }
}

/// Stochastic output: %K and its moving average %D.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StochValue {
    k: f64,
    d: f64,
}

impl StochValue {
    #[must_use]
    pub fn new(k: f64, d: f64) -> Self {
        Self { k, d }
    }

    #[inline]
    #[must_use]
    pub fn k(&self) -> f64 {
        self.k
    }

    #[inline]
    #[must_use]
    pub fn d(&self) -> f64 {
        self.d
    }
}

impl Display for StochValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Stoch(k: {}, d: {})", self.k, self.d)
    }
}

/// `100 × (value − lowest) / (highest − lowest)`, 0 for a flat range.
#[inline]
pub(crate) fn percent_in_range(value: f64, lowest: f64, highest: f64) -> f64 {
    let range = highest - lowest;
    if range == 0.0 {
        0.0
    } else {
        100.0 * (value - lowest) / range
    }
}

/// Stochastic Oscillator.
///
/// ```text
/// %K = 100 × (close − lowest low) / (highest high − lowest low)
/// %D = SMA_d(%K)
/// ```
///
/// over the last `k` ticks. A flat range gives %K = 0.
#[derive(Clone, Debug)]
pub struct Stochastic {
    config: StochasticConfig,
    backend: Backend,
    highs: WindowExtremum,
    lows: WindowExtremum,
    percent_k: WindowSum,
    current: Option<StochValue>,
}

impl Indicator for Stochastic {
    type Config = StochasticConfig;
    type Output = StochValue;

    const KIND: IndicatorKind = IndicatorKind::Stochastic;

    fn with_backend(config: Self::Config, backend: Backend) -> Self {
        backend::construct(Self::KIND, backend, |backend| {
            Ok(Self {
                config,
                backend,
                highs: WindowExtremum::max(backend, config.k)?,
                lows: WindowExtremum::min(backend, config.k)?,
                percent_k: WindowSum::new(backend, config.d)?,
                current: None,
            })
        })
    }

    fn config(&self) -> &StochasticConfig {
        &self.config
    }

    fn update(&mut self, tick: &Tick) -> Result<Option<StochValue>, InputError> {
        let (high, low, close) = tick.hlc_values()?;

        let highest = self.highs.push(high);
        let lowest = self.lows.push(low);

        if let (Some(highest), Some(lowest)) = (highest, lowest) {
            let k = percent_in_range(close, lowest.value, highest.value);
            self.percent_k.push(k);
            self.current = self.percent_k.mean().map(|d| StochValue::new(k, d));
        }

        Ok(self.current)
    }

    fn value(&self) -> Option<StochValue> {
        self.current
    }

    fn reset(&mut self) {
        self.highs.clear();
        self.lows.clear();
        self.percent_k.clear();
        self.current = None;
    }

    fn backend(&self) -> Backend {
        self.backend
    }
}

impl Display for Stochastic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Stoch({}, {})", self.config.k, self.config.d)
    }
}
