use std::fmt::{Debug, Display};

use crate::{
    Backend, ConstructionError, Indicator, IndicatorConfig, IndicatorConfigBuilder,
    IndicatorKind, InputError, Params, Price, PriceSource, Schema, Tick, backend,
    config::{self, Coefficient},
    others::log_return,
    rolling::WindowMoments,
};

/// Configuration for [`HistoricalVolatility`].
///
/// Defaults: window 20, annualized over 252 periods per year, source
/// [`PriceSource::Close`].
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct HistoricalVolatilityConfig {
    window: usize,
    annualize: bool,
    periods_per_year: Coefficient,
    source: PriceSource,
}

impl IndicatorConfig for HistoricalVolatilityConfig {
    type Builder = HistoricalVolatilityConfigBuilder;

    fn builder() -> Self::Builder {
        let defaults = Self::default();
        HistoricalVolatilityConfigBuilder {
            window: defaults.window,
            annualize: defaults.annualize,
            periods_per_year: defaults.periods_per_year.get(),
            source: defaults.source,
        }
    }

    fn schema(&self) -> Schema {
        self.source.schema()
    }

    fn required_ticks(&self) -> usize {
        self.window + 1
    }
}

impl HistoricalVolatilityConfig {
    /// Number of log returns in the window.
    #[must_use]
    pub fn window(&self) -> usize {
        self.window
    }

    #[must_use]
    pub fn annualize(&self) -> bool {
        self.annualize
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
        if let Some(annualize) = params.flag("annualize")? {
            builder = builder.annualize(annualize);
        }
        if let Some(periods) = params.number("periods_per_year") {
            builder = builder.periods_per_year(periods);
        }
        builder.build()
    }
}

impl Default for HistoricalVolatilityConfig {
    fn default() -> Self {
        Self {
            window: 20,
            annualize: true,
            periods_per_year: Coefficient::of(252.0),
            source: PriceSource::Close,
        }
    }
}

impl Display for HistoricalVolatilityConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "HistoricalVolatilityConfig({}, {}, {}, {})",
            self.window, self.annualize, self.periods_per_year, self.source
        )
    }
}

/// Builder for [`HistoricalVolatilityConfig`].
#[derive(Clone, Copy, Debug)]
pub struct HistoricalVolatilityConfigBuilder {
    window: usize,
    annualize: bool,
    periods_per_year: f64,
    source: PriceSource,
}

impl HistoricalVolatilityConfigBuilder {
    #[must_use]
    pub fn window(mut self, window: usize) -> Self {
        self.window = window;
        self
    }

    #[must_use]
    pub fn annualize(mut self, annualize: bool) -> Self {
        self.annualize = annualize;
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

impl IndicatorConfigBuilder<HistoricalVolatilityConfig> for HistoricalVolatilityConfigBuilder {
    fn build(self) -> Result<HistoricalVolatilityConfig, ConstructionError> {
        Ok(HistoricalVolatilityConfig {
            window: config::window("window", self.window)?,
            annualize: self.annualize,
            periods_per_year: Coefficient::positive("periods_per_year", self.periods_per_year)?,
            source: self.source,
        })
    }
}

/// Historical (close-to-close) volatility: the sample standard deviation
/// of log returns, optionally scaled by `√periods_per_year`.
///
/// A return involving a non-positive price counts as zero.
///
/// # Example
///
/// ```
/// use quantedge_stream::{
///     HistoricalVolatility, HistoricalVolatilityConfig, Indicator, IndicatorConfig,
///     IndicatorConfigBuilder, Tick,
/// };
///
/// let config = HistoricalVolatilityConfig::builder()
///     .window(2)
///     .annualize(false)
///     .build()
///     .unwrap();
/// let mut hv = HistoricalVolatility::new(config);
/// for price in [100.0, 110.0, 121.0] {
///     hv.update(&Tick::price(price)).unwrap();
/// }
/// // identical returns have no spread
/// assert!(hv.value().unwrap().abs() < 1e-12);
/// ```
#[derive(Clone, Debug)]
pub struct HistoricalVolatility {
    config: HistoricalVolatilityConfig,
    backend: Backend,
    returns: WindowMoments,
    prev_price: Option<Price>,
    current: Option<f64>,
}

impl Indicator for HistoricalVolatility {
    type Config = HistoricalVolatilityConfig;
    type Output = f64;

    const KIND: IndicatorKind = IndicatorKind::HistoricalVolatility;

    fn with_backend(config: Self::Config, backend: Backend) -> Self {
        backend::construct(Self::KIND, backend, |backend| {
            Ok(Self {
                config,
                backend,
                returns: WindowMoments::new(backend, config.window)?,
                prev_price: None,
                current: None,
            })
        })
    }

    fn config(&self) -> &HistoricalVolatilityConfig {
        &self.config
    }

    fn update(&mut self, tick: &Tick) -> Result<Option<f64>, InputError> {
        let price = self.config.source.extract(tick)?;

        let Some(prev) = self.prev_price.replace(price) else {
            return Ok(None);
        };

        if let Some(moments) = self.returns.push(log_return(prev, price)) {
            let sigma = moments.sample_std();
            self.current = Some(if self.config.annualize {
                sigma * self.config.periods_per_year.get().sqrt()
            } else {
                sigma
            });
        }

        Ok(self.current)
    }

    fn value(&self) -> Option<f64> {
        self.current
    }

    fn reset(&mut self) {
        self.returns.clear();
        self.prev_price = None;
        self.current = None;
    }

    fn backend(&self) -> Backend {
        self.backend
    }
}

impl Display for HistoricalVolatility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "HV({}, {}, {})",
            self.config.window, self.config.periods_per_year, self.config.source
        )
    }
}
