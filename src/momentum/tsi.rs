use std::fmt::{Debug, Display};

use crate::{
    Backend, ConstructionError, Indicator, IndicatorConfig, IndicatorConfigBuilder,
    IndicatorKind, InputError, Params, Price, PriceSource, Schema, Tick, config,
    rolling::{Seed, Smoother},
};

/// Configuration for the True Strength Index ([`Tsi`]).
///
/// Defaults: first smoothing 25, second smoothing 13, source
/// [`PriceSource::Close`].
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct TsiConfig {
    first: usize,
    second: usize,
    source: PriceSource,
}

impl IndicatorConfig for TsiConfig {
    type Builder = TsiConfigBuilder;

    fn builder() -> Self::Builder {
        let defaults = Self::default();
        TsiConfigBuilder {
            first: defaults.first,
            second: defaults.second,
            source: defaults.source,
        }
    }

    fn schema(&self) -> Schema {
        self.source.schema()
    }

    fn required_ticks(&self) -> usize {
        self.first + self.second
    }
}

impl TsiConfig {
    #[must_use]
    pub fn first(&self) -> usize {
        self.first
    }

    #[must_use]
    pub fn second(&self) -> usize {
        self.second
    }

    #[must_use]
    pub fn source(&self) -> PriceSource {
        self.source
    }

    pub(crate) fn from_params(params: &Params) -> Result<Self, ConstructionError> {
        let mut builder = Self::builder();
        if let Some(first) = params.window("first")? {
            builder = builder.first(first);
        }
        if let Some(second) = params.window("second")? {
            builder = builder.second(second);
        }
        builder.build()
    }
}

impl Default for TsiConfig {
    fn default() -> Self {
        Self {
            first: 25,
            second: 13,
            source: PriceSource::Close,
        }
    }
}

impl Display for TsiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TsiConfig({}, {}, {})", self.first, self.second, self.source)
    }
}

/// Builder for [`TsiConfig`].
#[derive(Clone, Copy, Debug)]
pub struct TsiConfigBuilder {
    first: usize,
    second: usize,
    source: PriceSource,
}

impl TsiConfigBuilder {
    #[must_use]
    pub fn first(mut self, first: usize) -> Self {
        self.first = first;
        self
    }

    #[must_use]
    pub fn second(mut self, second: usize) -> Self {
        self.second = second;
        self
    }

    #[must_use]
    pub fn source(mut self, source: PriceSource) -> Self {
        self.source = source;
        self
    }
}

impl IndicatorConfigBuilder<TsiConfig> for TsiConfigBuilder {
    fn build(self) -> Result<TsiConfig, ConstructionError> {
        Ok(TsiConfig {
            first: config::window("first", self.first)?,
            second: config::window("second", self.second)?,
            source: self.source,
        })
    }
}

/// Two EMAs in series.
#[derive(Clone, Copy, Debug)]
struct DoubleSmoother {
    first: Smoother,
    second: Smoother,
}

impl DoubleSmoother {
    fn new(first: usize, second: usize) -> Self {
        Self {
            first: Smoother::ema(first, Seed::Mean),
            second: Smoother::ema(second, Seed::Mean),
        }
    }

    fn push(&mut self, value: f64) -> Option<f64> {
        let smoothed = self.first.push(value)?;
        self.second.push(smoothed)
    }

    fn reset(&mut self) {
        self.first.reset();
        self.second.reset();
    }
}

/// True Strength Index (Blau).
///
/// ```text
/// m   = price − prev price
/// TSI = 100 × EMA₂(EMA₁(m)) / EMA₂(EMA₁(|m|))     (denominator 0 → 0)
/// ```
///
/// Both EMAs are seeded with the mean of their first inputs.
#[derive(Clone, Debug)]
pub struct Tsi {
    config: TsiConfig,
    prev_price: Option<Price>,
    momentum: DoubleSmoother,
    magnitude: DoubleSmoother,
    current: Option<f64>,
}

impl Indicator for Tsi {
    type Config = TsiConfig;
    type Output = f64;

    const KIND: IndicatorKind = IndicatorKind::Tsi;

    fn with_backend(config: Self::Config, _backend: Backend) -> Self {
        Self {
            config,
            prev_price: None,
            momentum: DoubleSmoother::new(config.first, config.second),
            magnitude: DoubleSmoother::new(config.first, config.second),
            current: None,
        }
    }

    fn config(&self) -> &TsiConfig {
        &self.config
    }

    fn update(&mut self, tick: &Tick) -> Result<Option<f64>, InputError> {
        let price = self.config.source.extract(tick)?;

        let Some(prev_price) = self.prev_price.replace(price) else {
            return Ok(None);
        };
        let change = price - prev_price;

        let momentum = self.momentum.push(change);
        let magnitude = self.magnitude.push(change.abs());
        if let (Some(momentum), Some(magnitude)) = (momentum, magnitude) {
            self.current = Some(if magnitude == 0.0 {
                0.0
            } else {
                100.0 * momentum / magnitude
            });
        }

        Ok(self.current)
    }

    fn value(&self) -> Option<f64> {
        self.current
    }

    fn reset(&mut self) {
        self.prev_price = None;
        self.momentum.reset();
        self.magnitude.reset();
        self.current = None;
    }

    fn backend(&self) -> Backend {
        Backend::Fallback
    }
}

impl Display for Tsi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "TSI({}, {}, {})",
            self.config.first, self.config.second, self.config.source
        )
    }
}
