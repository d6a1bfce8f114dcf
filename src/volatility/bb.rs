use std::fmt::{Debug, Display};

use crate::{
    Backend, ConstructionError, Indicator, IndicatorConfig, IndicatorConfigBuilder,
    IndicatorKind, InputError, Params, Price, PriceSource, Schema, Tick, backend,
    config::{self, Coefficient},
    rolling::WindowMoments,
};

/// Configuration for the [`BollingerBands`] indicator.
///
/// Defaults: window 20, multiplier 2.0, source [`PriceSource::Close`].
///
/// # Example
///
/// ```
/// use quantedge_stream::{BollingerBandsConfig, IndicatorConfig, IndicatorConfigBuilder};
///
/// let config = BollingerBandsConfig::builder()
///     .window(10)
///     .multiplier(1.5)
///     .build()
///     .unwrap();
///
/// assert_eq!(config.window(), 10);
/// assert_eq!(config.multiplier(), 1.5);
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct BollingerBandsConfig {
    window: usize,
    multiplier: Coefficient,
    source: PriceSource,
}

impl IndicatorConfig for BollingerBandsConfig {
    type Builder = BollingerBandsConfigBuilder;

    fn builder() -> Self::Builder {
        let defaults = Self::default();
        BollingerBandsConfigBuilder {
            window: defaults.window,
            multiplier: defaults.multiplier.get(),
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

impl BollingerBandsConfig {
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

    /// Standard deviation multiplier for the upper and lower bands.
    #[must_use]
    pub fn multiplier(&self) -> f64 {
        self.multiplier.get()
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
        if let Some(multiplier) = params.number("multiplier") {
            builder = builder.multiplier(multiplier);
        }
        builder.build()
    }
}

impl Default for BollingerBandsConfig {
    fn default() -> Self {
        Self {
            window: 20,
            multiplier: Coefficient::of(2.0),
            source: PriceSource::Close,
        }
    }
}

impl Display for BollingerBandsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "BollingerBandsConfig({}, {}, {})",
            self.window, self.source, self.multiplier
        )
    }
}

/// Builder for [`BollingerBandsConfig`].
#[derive(Clone, Copy, Debug)]
pub struct BollingerBandsConfigBuilder {
    window: usize,
    multiplier: f64,
    source: PriceSource,
}

impl BollingerBandsConfigBuilder {
    #[must_use]
    pub fn window(mut self, window: usize) -> Self {
        self.window = window;
        self
    }

    /// Must be positive and finite.
    #[must_use]
    pub fn multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = multiplier;
        self
    }

    #[must_use]
    pub fn source(mut self, source: PriceSource) -> Self {
        self.source = source;
        self
    }
}

impl IndicatorConfigBuilder<BollingerBandsConfig> for BollingerBandsConfigBuilder {
    fn build(self) -> Result<BollingerBandsConfig, ConstructionError> {
        Ok(BollingerBandsConfig {
            window: config::window("window", self.window)?,
            multiplier: Coefficient::positive("multiplier", self.multiplier)?,
            source: self.source,
        })
    }
}

/// Band output shared by Bollinger Bands, Keltner and Donchian channels.
///
/// ```text
/// upper  = middle + offset
/// middle = channel centre
/// lower  = middle − offset
/// ```
///
/// For Donchian channels `upper` and `lower` are the window extremes and
/// `middle` their midpoint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandsValue {
    upper: Price,
    middle: Price,
    lower: Price,
}

impl BandsValue {
    #[must_use]
    pub fn new(upper: Price, middle: Price, lower: Price) -> Self {
        Self {
            upper,
            middle,
            lower,
        }
    }

    #[inline]
    #[must_use]
    pub fn upper(&self) -> Price {
        self.upper
    }

    #[inline]
    #[must_use]
    pub fn middle(&self) -> Price {
        self.middle
    }

    #[inline]
    #[must_use]
    pub fn lower(&self) -> Price {
        self.lower
    }

    /// Band width: `upper − lower`.
    ///
    /// Narrow width indicates consolidation (Bollinger squeeze); wide
    /// width indicates high volatility.
    #[inline]
    #[must_use]
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }
}

impl Display for BandsValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Bands(u: {}, m: {}, l: {})",
            self.upper, self.middle, self.lower
        )
    }
}

/// Bollinger Bands (BB).
///
/// A simple moving average (middle) with upper and lower bands offset by
/// `multiplier` population standard deviations of the window.
///
/// # Example
///
/// ```
/// use quantedge_stream::{BollingerBands, BollingerBandsConfig, Tick};
///
/// let mut bb = BollingerBands::new(BollingerBandsConfig::new(2).unwrap());
/// bb.update(&Tick::price(3.0)).unwrap();
///
/// // window [3, 5]: mean 4, σ 1
/// let value = bb.update(&Tick::price(5.0)).unwrap().unwrap();
/// assert_eq!((value.upper(), value.middle(), value.lower()), (6.0, 4.0, 2.0));
/// ```
#[derive(Clone, Debug)]
pub struct BollingerBands {
    config: BollingerBandsConfig,
    backend: Backend,
    window: WindowMoments,
    current: Option<BandsValue>,
}

impl Indicator for BollingerBands {
    type Config = BollingerBandsConfig;
    type Output = BandsValue;

    const KIND: IndicatorKind = IndicatorKind::BollingerBands;

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

    fn config(&self) -> &BollingerBandsConfig {
        &self.config
    }

    #[inline]
    fn update(&mut self, tick: &Tick) -> Result<Option<BandsValue>, InputError> {
        let price = self.config.source.extract(tick)?;

        if let Some(moments) = self.window.push(price) {
            let offset = moments.population_std() * self.config.multiplier.get();
            self.current = Some(BandsValue::new(
                moments.mean + offset,
                moments.mean,
                moments.mean - offset,
            ));
        }

        Ok(self.current)
    }

    #[inline]
    fn value(&self) -> Option<BandsValue> {
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

impl Display for BollingerBands {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "BB({}, {}, {})",
            self.config.window, self.config.source, self.config.multiplier,
        )
    }
}
