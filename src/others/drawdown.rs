use std::fmt::{Debug, Display};

use crate::{
    Backend, ConstructionError, Indicator, IndicatorConfig, IndicatorConfigBuilder,
    IndicatorKind, InputError, Params, Price, PriceSource, Schema, Tick,
    config::{self, Coefficient, source_config},
    rolling::RingBuffer,
};

/// Percentage drawdown of `price` below `peak`; 0 for a non-positive peak.
#[inline]
fn drawdown(peak: Price, price: Price) -> f64 {
    if peak <= 0.0 {
        return 0.0;
    }
    100.0 * (price - peak) / peak
}

/// Deepest drawdown of the sequence, as a non-positive percentage.
fn deepest_drawdown(prices: impl Iterator<Item = Price>) -> f64 {
    let mut peak = f64::NEG_INFINITY;
    prices.fold(0.0_f64, |deepest, price| {
        peak = peak.max(price);
        deepest.min(drawdown(peak, price))
    })
}

source_config!(
    /// Configuration for [`MaxDrawdown`].
    MaxDrawdownConfig, MaxDrawdownConfigBuilder,
    source: PriceSource::Close,
    required_ticks: 1,
);

/// Deepest percentage decline from a running peak since the first tick.
///
/// Always `≤ 0`; 0 on the first tick and while prices only rise.
///
/// # Example
///
/// ```
/// use quantedge_stream::{Indicator, MaxDrawdown, MaxDrawdownConfig, Tick};
///
/// let mut mdd = MaxDrawdown::new(MaxDrawdownConfig::default());
/// for price in [100.0, 80.0, 120.0, 110.0] {
///     mdd.update(&Tick::price(price)).unwrap();
/// }
/// assert_eq!(mdd.value(), Some(-20.0));
/// ```
#[derive(Clone, Debug)]
pub struct MaxDrawdown {
    config: MaxDrawdownConfig,
    peak: Option<Price>,
    deepest: Option<f64>,
}

impl Indicator for MaxDrawdown {
    type Config = MaxDrawdownConfig;
    type Output = f64;

    const KIND: IndicatorKind = IndicatorKind::MaxDrawdown;

    fn with_backend(config: Self::Config, _backend: Backend) -> Self {
        Self {
            config,
            peak: None,
            deepest: None,
        }
    }

    fn config(&self) -> &MaxDrawdownConfig {
        &self.config
    }

    fn update(&mut self, tick: &Tick) -> Result<Option<f64>, InputError> {
        let price = self.config.source.extract(tick)?;

        let peak = self.peak.map_or(price, |peak| peak.max(price));
        self.peak = Some(peak);
        let deepest = self.deepest.unwrap_or(0.0).min(drawdown(peak, price));
        self.deepest = Some(deepest);

        Ok(self.deepest)
    }

    fn value(&self) -> Option<f64> {
        self.deepest
    }

    fn reset(&mut self) {
        self.peak = None;
        self.deepest = None;
    }

    fn backend(&self) -> Backend {
        Backend::Fallback
    }
}

impl Display for MaxDrawdown {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "MDD({})", self.config.source)
    }
}

/// Configuration for the [`CalmarRatio`].
///
/// Defaults: window 252, 252 periods per year, source [`PriceSource::Close`].
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct CalmarRatioConfig {
    window: usize,
    periods_per_year: Coefficient,
    source: PriceSource,
}

impl IndicatorConfig for CalmarRatioConfig {
    type Builder = CalmarRatioConfigBuilder;

    fn builder() -> Self::Builder {
        let defaults = Self::default();
        CalmarRatioConfigBuilder {
            window: defaults.window,
            periods_per_year: defaults.periods_per_year.get(),
            source: defaults.source,
        }
    }

    fn schema(&self) -> Schema {
        self.source.schema()
    }

    fn required_ticks(&self) -> usize {
        self.window
    }
}

impl CalmarRatioConfig {
    #[must_use]
    pub fn window(&self) -> usize {
        self.window
    }

    #[must_use]
    pub fn periods_per_year(&self) -> f64 {
        self.periods_per_year.get()
    }

    #[must_use]
    pub fn source(&self) -> PriceSource {
        self.source
    }

    pub(crate) fn from_params(params: &Params) -> Result<Self, ConstructionError> {
        let mut builder = Self::builder();
        if let Some(window) = params.window("window")? {
            builder = builder.window(window);
        }
        if let Some(periods) = params.number("periods_per_year") {
            builder = builder.periods_per_year(periods);
        }
        builder.build()
    }
}

impl Default for CalmarRatioConfig {
    fn default() -> Self {
        Self {
            window: 252,
            periods_per_year: Coefficient::of(252.0),
            source: PriceSource::Close,
        }
    }
}

impl Display for CalmarRatioConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "CalmarRatioConfig({}, {}, {})",
            self.window, self.periods_per_year, self.source
        )
    }
}

/// Builder for [`CalmarRatioConfig`].
#[derive(Clone, Copy, Debug)]
pub struct CalmarRatioConfigBuilder {
    window: usize,
    periods_per_year: f64,
    source: PriceSource,
}

impl CalmarRatioConfigBuilder {
    #[must_use]
    pub fn window(mut self, window: usize) -> Self {
        self.window = window;
        self
    }

    #[must_use]
    pub fn periods_per_year(mut self, periods: f64) -> Self {
        self.periods_per_year = periods;
        self
    }

    #[must_use]
    pub fn source(mut self, source: PriceSource) -> Self {
        self.source = source;
        self
    }
}

impl IndicatorConfigBuilder<CalmarRatioConfig> for CalmarRatioConfigBuilder {
    fn build(self) -> Result<CalmarRatioConfig, ConstructionError> {
        Ok(CalmarRatioConfig {
            window: config::window("window", self.window)?,
            periods_per_year: Coefficient::positive("periods_per_year", self.periods_per_year)?,
            source: self.source,
        })
    }
}

/// Calmar ratio over a trailing window: annualized window return divided
/// by the depth of the window's maximum drawdown.
///
/// ```text
/// total  = last / first − 1                     (first 0 → 0)
/// annual = total × periods_per_year / window
/// Calmar = annual / |max drawdown|              (drawdown 0 → 0)
/// ```
///
/// The drawdown is rescanned from the retained window on every tick.
#[derive(Clone, Debug)]
pub struct CalmarRatio {
    config: CalmarRatioConfig,
    prices: RingBuffer,
    current: Option<f64>,
}

impl CalmarRatio {
    #[allow(clippy::cast_precision_loss)]
    fn ratio(&self, first: Price, last: Price) -> f64 {
        let depth = deepest_drawdown(self.prices.iter()).abs() / 100.0;
        if depth == 0.0 {
            return 0.0;
        }

        let total = if first == 0.0 { 0.0 } else { last / first - 1.0 };
        let annual = total * self.config.periods_per_year.get() / self.config.window as f64;
        annual / depth
    }
}

impl Indicator for CalmarRatio {
    type Config = CalmarRatioConfig;
    type Output = f64;

    const KIND: IndicatorKind = IndicatorKind::CalmarRatio;

    fn with_backend(config: Self::Config, _backend: Backend) -> Self {
        Self {
            config,
            prices: RingBuffer::new(config.window),
            current: None,
        }
    }

    fn config(&self) -> &CalmarRatioConfig {
        &self.config
    }

    fn update(&mut self, tick: &Tick) -> Result<Option<f64>, InputError> {
        let price = self.config.source.extract(tick)?;

        self.prices.push(price);
        if self.prices.is_full()
            && let Some(first) = self.prices.oldest()
        {
            self.current = Some(self.ratio(first, price));
        }

        Ok(self.current)
    }

    fn value(&self) -> Option<f64> {
        self.current
    }

    fn reset(&mut self) {
        self.prices.clear();
        self.current = None;
    }

    fn backend(&self) -> Backend {
        Backend::Fallback
    }
}

impl Display for CalmarRatio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Calmar({}, {}, {})",
            self.config.window, self.config.periods_per_year, self.config.source
        )
    }
}
