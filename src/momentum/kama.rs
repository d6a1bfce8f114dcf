use std::fmt::{Debug, Display};

use crate::{
    Backend, ConstructionError, Indicator, IndicatorConfig, IndicatorConfigBuilder,
    IndicatorKind, InputError, Params, Price, PriceSource, Schema, Tick, backend, config,
    rolling::{RingBuffer, WindowSum},
};

/// Configuration for Kaufman's Adaptive Moving Average ([`Kama`]).
///
/// Defaults: efficiency window 10, fast 2, slow 30, source
/// [`PriceSource::Close`].
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct KamaConfig {
    window: usize,
    fast: usize,
    slow: usize,
    source: PriceSource,
}

impl IndicatorConfig for KamaConfig {
    type Builder = KamaConfigBuilder;

    fn builder() -> Self::Builder {
        let defaults = Self::default();
        KamaConfigBuilder {
            window: defaults.window,
            fast: defaults.fast,
            slow: defaults.slow,
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

impl KamaConfig {
    /// Lookback of the efficiency ratio.
    #[must_use]
    pub fn window(&self) -> usize {
        self.window
    }

    /// EMA period used when the market trends perfectly.
    #[must_use]
    pub fn fast(&self) -> usize {
        self.fast
    }

    /// EMA period used when the market is pure noise.
    #[must_use]
    pub fn slow(&self) -> usize {
        self.slow
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
        if let Some(fast) = params.window("fast")? {
            builder = builder.fast(fast);
        }
        if let Some(slow) = params.window("slow")? {
            builder = builder.slow(slow);
        }
        builder.build()
    }
}

impl Default for KamaConfig {
    fn default() -> Self {
        Self {
            window: 10,
            fast: 2,
            slow: 30,
            source: PriceSource::Close,
        }
    }
}

impl Display for KamaConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "KamaConfig({}, {}, {}, {})",
            self.window, self.fast, self.slow, self.source
        )
    }
}

/// Builder for [`KamaConfig`].
#[derive(Clone, Copy, Debug)]
pub struct KamaConfigBuilder {
    window: usize,
    fast: usize,
    slow: usize,
    source: PriceSource,
}

impl KamaConfigBuilder {
    #[must_use]
    pub fn window(mut self, window: usize) -> Self {
        self.window = window;
        self
    }

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

    #[must_use]
    pub fn source(mut self, source: PriceSource) -> Self {
        self.source = source;
        self
    }
}

impl IndicatorConfigBuilder<KamaConfig> for KamaConfigBuilder {
    fn build(self) -> Result<KamaConfig, ConstructionError> {
        let window = config::window("window", self.window)?;
        let fast = config::window("fast", self.fast)?;
        let slow = config::window("slow", self.slow)?;

        if fast >= slow {
            return Err(ConstructionError::Incompatible(
                "fast window must be shorter than slow window",
            ));
        }

        Ok(KamaConfig {
            window,
            fast,
            slow,
            source: self.source,
        })
    }
}

/// Kaufman's Adaptive Moving Average (KAMA).
///
/// Smoothing speed follows the efficiency ratio: close to the fast EMA
/// in a clean trend, close to the slow EMA in a choppy market.
///
/// ```text
/// ER   = |price − price[t − window]| / Σ|Δprice|        (Σ 0 → ER 0)
/// sc   = (ER × (2/(fast+1) − 2/(slow+1)) + 2/(slow+1))²
/// KAMA = KAMA' + sc × (price − KAMA')
/// ```
///
/// The first value, at tick `window + 1`, is the price itself.
#[derive(Clone, Debug)]
pub struct Kama {
    config: KamaConfig,
    backend: Backend,
    prices: RingBuffer,
    changes: WindowSum,
    fast_sc: f64,
    slow_sc: f64,
    current: Option<Price>,
}

impl Indicator for Kama {
    type Config = KamaConfig;
    type Output = Price;

    const KIND: IndicatorKind = IndicatorKind::Kama;

    #[allow(clippy::cast_precision_loss)]
    fn with_backend(config: Self::Config, backend: Backend) -> Self {
        backend::construct(Self::KIND, backend, |backend| {
            Ok(Self {
                config,
                backend,
                prices: RingBuffer::for_backend(backend, config.window + 1)?,
                changes: WindowSum::new(backend, config.window)?,
                fast_sc: 2.0 / (config.fast + 1) as f64,
                slow_sc: 2.0 / (config.slow + 1) as f64,
                current: None,
            })
        })
    }

    fn config(&self) -> &KamaConfig {
        &self.config
    }

    fn update(&mut self, tick: &Tick) -> Result<Option<Price>, InputError> {
        let price = self.config.source.extract(tick)?;

        if let Some(prev) = self.prices.newest() {
            self.changes.push((price - prev).abs());
        }
        self.prices.push(price);

        if let (Some(reference), Some(volatility)) = (self.prices.oldest(), self.changes.sum()) {
            let direction = (price - reference).abs();
            let efficiency = if volatility == 0.0 {
                0.0
            } else {
                direction / volatility
            };
            let sc = efficiency
                .mul_add(self.fast_sc - self.slow_sc, self.slow_sc)
                .powi(2);

            self.current = Some(match self.current {
                Some(prev) => sc.mul_add(price - prev, prev),
                None => price,
            });
        }

        Ok(self.current)
    }

    fn value(&self) -> Option<Price> {
        self.current
    }

    fn reset(&mut self) {
        self.prices.clear();
        self.changes.clear();
        self.current = None;
    }

    fn backend(&self) -> Backend {
        self.backend
    }
}

impl Display for Kama {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "KAMA({}, {}, {}, {})",
            self.config.window, self.config.fast, self.config.slow, self.config.source
        )
    }
}
