use std::fmt::{Debug, Display};

use crate::{
    Backend, ConstructionError, Indicator, IndicatorConfig, IndicatorConfigBuilder,
    IndicatorKind, InputError, Params, Schema, Tick,
    config::{self, Coefficient},
    rolling::RingBuffer,
};

/// Configuration for the Commodity Channel Index ([`Cci`]) indicator.
///
/// Defaults: window 20, constant 0.015.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct CciConfig {
    window: usize,
    constant: Coefficient,
}

impl IndicatorConfig for CciConfig {
    type Builder = CciConfigBuilder;

    fn builder() -> Self::Builder {
        let defaults = Self::default();
        CciConfigBuilder {
            window: defaults.window,
            constant: defaults.constant.get(),
        }
    }

    fn schema(&self) -> Schema {
        Schema::HLC
    }

    fn required_ticks(&self) -> usize {
        self.window
    }
}

impl CciConfig {
    /// # Errors
    ///
    /// [`ConstructionError`] if `window` is zero or too large.
    pub fn new(window: usize) -> Result<Self, ConstructionError> {
        Self::builder().window(window).build()
    }

    #[must_use]
    pub fn window(&self) -> usize {
        self.window
    }

    /// Scaling constant applied to the mean absolute deviation.
    #[must_use]
    pub fn constant(&self) -> f64 {
        self.constant.get()
    }

    pub(crate) fn from_params(params: &Params) -> Result<Self, ConstructionError> {
        let mut builder = Self::builder();
        if let Some(window) = params.window("window")? {
            builder = builder.window(window);
        }
        if let Some(constant) = params.number("constant") {
            builder = builder.constant(constant);
        }
        builder.build()
    }
}

impl Default for CciConfig {
    fn default() -> Self {
        Self {
            window: 20,
            constant: Coefficient::of(0.015),
        }
    }
}

impl Display for CciConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CciConfig({}, {})", self.window, self.constant)
    }
}

/// Builder for [`CciConfig`].
#[derive(Clone, Copy, Debug)]
pub struct CciConfigBuilder {
    window: usize,
    constant: f64,
}

impl CciConfigBuilder {
    #[must_use]
    pub fn window(mut self, window: usize) -> Self {
        self.window = window;
        self
    }

    #[must_use]
    pub fn constant(mut self, constant: f64) -> Self {
        self.constant = constant;
        self
    }
}

impl IndicatorConfigBuilder<CciConfig> for CciConfigBuilder {
    fn build(self) -> Result<CciConfig, ConstructionError> {
        Ok(CciConfig {
            window: config::window("window", self.window)?,
            constant: Coefficient::positive("constant", self.constant)?,
        })
    }
}

/// Commodity Channel Index (CCI).
///
/// ```text
/// tp  = (high + low + close) / 3
/// CCI = (tp − mean(tp)) / (constant × MAD(tp))
/// ```
///
/// where MAD is the mean absolute deviation from the window mean. A flat
/// window (MAD 0) yields 0. MAD has no incremental form, so each update
/// scans the window.
#[derive(Clone, Debug)]
pub struct Cci {
    config: CciConfig,
    typical: RingBuffer,
    current: Option<f64>,
}

impl Indicator for Cci {
    type Config = CciConfig;
    type Output = f64;

    const KIND: IndicatorKind = IndicatorKind::Cci;

    fn with_backend(config: Self::Config, _backend: Backend) -> Self {
        Self {
            config,
            typical: RingBuffer::new(config.window),
            current: None,
        }
    }

    fn config(&self) -> &CciConfig {
        &self.config
    }

    #[allow(clippy::cast_precision_loss)]
    fn update(&mut self, tick: &Tick) -> Result<Option<f64>, InputError> {
        let (high, low, close) = tick.hlc_values()?;
        let typical = (high + low + close) / 3.0;

        self.typical.push(typical);
        if !self.typical.is_full() {
            return Ok(None);
        }

        let n = self.config.window as f64;
        let mean = self.typical.iter().sum::<f64>() / n;
        let mad = self.typical.iter().map(|tp| (tp - mean).abs()).sum::<f64>() / n;

        let cci = if mad == 0.0 {
            0.0
        } else {
            (typical - mean) / (self.config.constant.get() * mad)
        };
        self.current = Some(cci);

        Ok(self.current)
    }

    fn value(&self) -> Option<f64> {
        self.current
    }

    fn reset(&mut self) {
        self.typical.clear();
        self.current = None;
    }

    fn backend(&self) -> Backend {
        Backend::Fallback
    }
}

impl Display for Cci {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CCI({}, {})", self.config.window, self.config.constant)
    }
}
