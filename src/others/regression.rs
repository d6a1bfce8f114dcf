use std::fmt::{Debug, Display};

use crate::{
    Backend, ConstructionError, Indicator, IndicatorConfig, IndicatorConfigBuilder,
    IndicatorKind, InputError, Params, PriceSource, Schema, Tick, backend, config,
    rolling::WindowLinear,
};

/// Configuration for the [`LinearRegressionSlope`].
///
/// Defaults: window 14, source [`PriceSource::Close`]. A slope needs at
/// least two points, so the window must be at least 2.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct LinearRegressionSlopeConfig {
    window: usize,
    source: PriceSource,
}

impl IndicatorConfig for LinearRegressionSlopeConfig {
    type Builder = LinearRegressionSlopeConfigBuilder;

    fn builder() -> Self::Builder {
        let defaults = Self::default();
        LinearRegressionSlopeConfigBuilder {
            window: defaults.window,
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

impl LinearRegressionSlopeConfig {
    /// # Errors
    ///
    /// [`ConstructionError`] when `window` is below 2 or too large.
    pub fn new(window: usize) -> Result<Self, ConstructionError> {
        Self::builder().window(window).build()
    }

    #[must_use]
    pub fn window(&self) -> usize {
        self.window
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
        builder.build()
    }
}

impl Default for LinearRegressionSlopeConfig {
    fn default() -> Self {
        Self {
            window: 14,
            source: PriceSource::Close,
        }
    }
}

impl Display for LinearRegressionSlopeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "LinearRegressionSlopeConfig({}, {})",
            self.window, self.source
        )
    }
}

/// Builder for [`LinearRegressionSlopeConfig`].
#[derive(Clone, Copy, Debug)]
pub struct LinearRegressionSlopeConfigBuilder {
    window: usize,
    source: PriceSource,
}

impl LinearRegressionSlopeConfigBuilder {
    #[must_use]
    pub fn window(mut self, window: usize) -> Self {
        self.window = window;
        self
    }

    #[must_use]
    pub fn source(mut self, source: PriceSource) -> Self {
        self.source = source;
        self
    }
}

impl IndicatorConfigBuilder<LinearRegressionSlopeConfig> for LinearRegressionSlopeConfigBuilder {
    fn build(self) -> Result<LinearRegressionSlopeConfig, ConstructionError> {
        let window = config::window("window", self.window)?;
        if window < 2 {
            return Err(ConstructionError::Incompatible(
                "regression window must hold at least two points",
            ));
        }

        Ok(LinearRegressionSlopeConfig {
            window,
            source: self.source,
        })
    }
}

/// Least-squares slope of the window against `x = 0, 1, …, window − 1`
/// (oldest to newest).
///
/// ```text
/// Sxx   = n(n² − 1) / 12
/// Sxy   = Σ i·yᵢ − (n − 1)/2 · Σ yᵢ
/// slope = Sxy / Sxx
/// ```
#[derive(Clone, Debug)]
pub struct LinearRegressionSlope {
    config: LinearRegressionSlopeConfig,
    backend: Backend,
    window: WindowLinear,
    sxx: f64,
    current: Option<f64>,
}

impl Indicator for LinearRegressionSlope {
    type Config = LinearRegressionSlopeConfig;
    type Output = f64;

    const KIND: IndicatorKind = IndicatorKind::LinearRegressionSlope;

    #[allow(clippy::cast_precision_loss)]
    fn with_backend(config: Self::Config, backend: Backend) -> Self {
        let n = config.window as f64;
        backend::construct(Self::KIND, backend, |backend| {
            Ok(Self {
                config,
                backend,
                window: WindowLinear::new(backend, config.window)?,
                sxx: n * (n * n - 1.0) / 12.0,
                current: None,
            })
        })
    }

    fn config(&self) -> &LinearRegressionSlopeConfig {
        &self.config
    }

    #[allow(clippy::cast_precision_loss)]
    fn update(&mut self, tick: &Tick) -> Result<Option<f64>, InputError> {
        let price = self.config.source.extract(tick)?;

        if let Some(sums) = self.window.push(price) {
            let center = (self.config.window - 1) as f64 / 2.0;
            let sxy = center.mul_add(-sums.sum, sums.weighted);
            self.current = Some(sxy / self.sxx);
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

impl Display for LinearRegressionSlope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "LRS({}, {})", self.config.window, self.config.source)
    }
}
