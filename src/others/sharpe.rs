use std::fmt::{Debug, Display};

use super::log_return;
use crate::{
    Backend, ConstructionError, Indicator, IndicatorConfig, IndicatorConfigBuilder,
    IndicatorKind, InputError, Params, Price, PriceSource, Schema, Tick, backend,
    config::{self, Coefficient},
    rolling::WindowMoments,
};

/// Configuration for the rolling [`SharpeRatio`].
///
/// Defaults: window 252, risk-free rate 0, 252 periods per year, source
/// [`PriceSource::Close`].
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct SharpeRatioConfig {
    window: usize,
    risk_free_rate: Coefficient,
    periods_per_year: Coefficient,
    source: PriceSource,
}

impl IndicatorConfig for SharpeRatioConfig {
    type Builder = SharpeRatioConfigBuilder;

    fn builder() -> Self::Builder {
        let defaults = Self::default();
        SharpeRatioConfigBuilder {
            window: defaults.window,
            risk_free_rate: defaults.risk_free_rate.get(),
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

impl SharpeRatioConfig {
    /// Number of log returns in the window.
    #[must_use]
    pub fn window(&self) -> usize {
        self.window
    }

    /// Annual risk-free rate, as a fraction.
    #[must_use]
    pub fn risk_free_rate(&self) -> f64 {
        self.risk_free_rate.get()
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
        if let Some(rate) = params.number("risk_free_rate") {
            builder = builder.risk_free_rate(rate);
        }
        if let Some(periods) = params.number("periods_per_year") {
            builder = builder.periods_per_year(periods);
        }
        builder.build()
    }
}

impl Default for SharpeRatioConfig {
    fn default() -> Self {
        Self {
            window: 252,
            risk_free_rate: Coefficient::of(0.0),
            periods_per_year: Coefficient::of(252.0),
            source: PriceSource::Close,
        }
    }
}

impl Display for SharpeRatioConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SharpeRatioConfig({}, {}, {}, {})",
            self.window, self.risk_free_rate, self.periods_per_year, self.source
        )
    }
}

/// Builder for [`SharpeRatioConfig`].
#[derive(Clone, Copy, Debug)]
pub struct SharpeRatioConfigBuilder {
    window: usize,
    risk_free_rate: f64,
    periods_per_year: f64,
    source: PriceSource,
}

impl SharpeRatioConfigBuilder {
    #[must_use]
    pub fn window(mut self, window: usize) -> Self {
        self.window = window;
        self
    }

    #[must_use]
    pub fn risk_free_rate(mut self, rate: f64) -> Self {
        self.risk_free_rate = rate;
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

impl IndicatorConfigBuilder<SharpeRatioConfig> for SharpeRatioConfigBuilder {
    fn build(self) -> Result<SharpeRatioConfig, ConstructionError> {
        Ok(SharpeRatioConfig {
            window: config::window("window", self.window)?,
            risk_free_rate: Coefficient::finite("risk_free_rate", self.risk_free_rate)?,
            periods_per_year: Coefficient::positive("periods_per_year", self.periods_per_year)?,
            source: self.source,
        })
    }
}

/// Annualized Sharpe ratio of log returns over a trailing window.
///
/// ```text
/// Sharpe = (mean(r) − rf / periods_per_year) / σ(r) × √periods_per_year
/// ```
///
/// `σ` is the sample standard deviation. A window without dispersion
/// yields 0. Returns involving a non-positive price count as zero.
#[derive(Clone, Debug)]
pub struct SharpeRatio {
    config: SharpeRatioConfig,
    backend: Backend,
    returns: WindowMoments,
    prev_price: Option<Price>,
    current: Option<f64>,
}

impl Indicator for SharpeRatio {
    type Config = SharpeRatioConfig;
    type Output = f64;

    const KIND: IndicatorKind = IndicatorKind::SharpeRatio;

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

    fn config(&self) -> &SharpeRatioConfig {
        &self.config
    }

    fn update(&mut self, tick: &Tick) -> Result<Option<f64>, InputError> {
        let price = self.config.source.extract(tick)?;

        let Some(prev) = self.prev_price.replace(price) else {
            return Ok(None);
        };

        if let Some(moments) = self.returns.push(log_return(prev, price)) {
            let sigma = moments.sample_std();
            let periods = self.config.periods_per_year.get();
            self.current = Some(if sigma == 0.0 {
                0.0
            } else {
                let excess = moments.mean - self.config.risk_free_rate.get() / periods;
                excess / sigma * periods.sqrt()
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

impl Display for SharpeRatio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Sharpe({}, {}, {}, {})",
            self.config.window,
            self.config.risk_free_rate,
            self.config.periods_per_year,
            self.config.source
        )
    }
}
