use std::fmt::{Debug, Display};

use crate::{
    Backend, Indicator, IndicatorKind, InputError, PriceSource, Tick, backend,
    config::window_config, rolling::WindowMoments,
};

window_config!(
    /// Configuration for the rolling [`StdDev`] indicator.
    ///
    /// Defaults: window 20, source [`PriceSource::Close`].
    StdDevConfig, StdDevConfigBuilder,
    window: 20,
    source: PriceSource::Close,
    required_ticks: |window| window,
);

window_config!(
    /// Configuration for the rolling [`Variance`] indicator.
    ///
    /// Defaults: window 20, source [`PriceSource::Close`].
    VarianceConfig, VarianceConfigBuilder,
    window: 20,
    source: PriceSource::Close,
    required_ticks: |window| window,
);

/// Population standard deviation of the last `window` values.
///
/// # Example
///
/// ```
/// use quantedge_stream::{StdDev, StdDevConfig, Tick};
///
/// let mut sd = StdDev::new(StdDevConfig::new(2).unwrap());
/// sd.update(&Tick::price(3.0)).unwrap();
/// assert_eq!(sd.update(&Tick::price(5.0)), Ok(Some(1.0)));
/// ```
#[derive(Clone, Debug)]
pub struct StdDev {
    config: StdDevConfig,
    backend: Backend,
    window: WindowMoments,
    current: Option<f64>,
}

impl Indicator for StdDev {
    type Config = StdDevConfig;
    type Output = f64;

    const KIND: IndicatorKind = IndicatorKind::StdDev;

    fn with_backend(config: Self::Config, backend: Backend) -> Self {
        backend::construct(Self::KIND, backend, |backend| {
            Ok(Self {
                config,
                backend,
                window: WindowMoments::new(backend, config.window)?,
                current: None,
            })
        })
    }

    fn config(&self) -> &StdDevConfig {
        &self.config
    }

    fn update(&mut self, tick: &Tick) -> Result<Option<f64>, InputError> {
        let price = self.config.source.extract(tick)?;

        if let Some(moments) = self.window.push(price) {
            self.current = Some(moments.population_std());
        }

        Ok(self.current)
    }

    fn value(&self) -> Option<f64> {
        self.current
    }

    fn reset(&mut self) {
        self.window.clear();
        self.current = None;
    }

    fn backend(&self) -> Backend {
        self.backend
    }
}

impl Display for StdDev {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "StdDev({}, {})", self.config.window, self.config.source)
    }
}

/// Population variance of the last `window` values.
#[derive(Clone, Debug)]
pub struct Variance {
    config: VarianceConfig,
    backend: Backend,
    window: WindowMoments,
    current: Option<f64>,
}

impl Indicator for Variance {
    type Config = VarianceConfig;
    type Output = f64;

    const KIND: IndicatorKind = IndicatorKind::Variance;

    fn with_backend(config: Self::Config, backend: Backend) -> Self {
        backend::construct(Self::KIND, backend, |backend| {
            Ok(Self {
                config,
                backend,
                window: WindowMoments::new(backend, config.window)?,
                current: None,
            })
        })
    }

    fn config(&self) -> &VarianceConfig {
        &self.config
    }

    fn update(&mut self, tick: &Tick) -> Result<Option<f64>, InputError> {
        let price = self.config.source.extract(tick)?;

        if let Some(moments) = self.window.push(price) {
            self.current = Some(moments.population_variance());
        }

        Ok(self.current)
    }

    fn value(&self) -> Option<f64> {
        self.current
    }

    fn reset(&mut self) {
        self.window.clear();
        self.current = None;
    }

    fn backend(&self) -> Backend {
        self.backend
    }
}

impl Display for Variance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Var({}, {})", self.config.window, self.config.source)
    }
}
