use std::fmt::{Debug, Display};

use super::{BandsValue, true_range};
use crate::{
    Backend, ConstructionError, Indicator, IndicatorConfig, IndicatorConfigBuilder,
    IndicatorKind, InputError, Params, Price, Schema, Tick,
    config::{self, Coefficient},
    rolling::{Seed, Smoother},
};

/// Configuration for the [`KeltnerChannel`].
///
/// Defaults: EMA window 20, ATR window 10, multiplier 2.0.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct KeltnerChannelConfig {
    window: usize,
    atr_window: usize,
    multiplier: Coefficient,
}

impl IndicatorConfig for KeltnerChannelConfig {
    type Builder = KeltnerChannelConfigBuilder;

    fn builder() -> Self::Builder {
        let defaults = Self::default();
        KeltnerChannelConfigBuilder {
            window: defaults.window,
            atr_window: defaults.atr_window,
            multiplier: defaults.multiplier.get(),
        }
    }

    fn schema(&self) -> Schema {
        Schema::HLC
    }

    fn required_ticks(&self) -> usize {
        self.window.max(self.atr_window)
    }
}

impl KeltnerChannelConfig {
    /// EMA window of the middle line.
    #[must_use]
    pub fn window(&self) -> usize {
        self.window
    }

    #[must_use]
    pub fn atr_window(&self) -> usize {
        self.atr_window
    }

    /// ATR multiplier for the upper and lower lines.
    #[must_use]
    pub fn multiplier(&self) -> f64 {
        self.multiplier.get()
    }

    pub(crate) fn from_params(params: &Params) -> Result<Self, ConstructionError> {
        let mut builder = Self::builder();
        if let Some(window) = params.window("window")? {
            builder = builder.window(window);
        }
        if let Some(window) = params.window("atr_window")? {
            builder = builder.atr_window(window);
        }
        if let Some(multiplier) = params.number("multiplier") {
            builder = builder.multiplier(multiplier);
        }
        builder.build()
    }
}

impl Default for KeltnerChannelConfig {
    fn default() -> Self {
        Self {
            window: 20,
            atr_window: 10,
            multiplier: Coefficient::of(2.0),
        }
    }
}

impl Display for KeltnerChannelConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "KeltnerChannelConfig({}, {}, {})",
            self.window, self.atr_window, self.multiplier
        )
    }
}

/// Builder for [`KeltnerChannelConfig`].
#[derive(Clone, Copy, Debug)]
pub struct KeltnerChannelConfigBuilder {
    window: usize,
    atr_window: usize,
    multiplier: f64,
}

impl KeltnerChannelConfigBuilder {
    #[must_use]
    pub fn window(mut self, window: usize) -> Self {
        self.window = window;
        self
    }

    #[must_use]
    pub fn atr_window(mut self, window: usize) -> Self {
        self.atr_window = window;
        self
    }

    #[must_use]
    pub fn multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = multiplier;
        self
    }
}

impl IndicatorConfigBuilder<KeltnerChannelConfig> for KeltnerChannelConfigBuilder {
    fn build(self) -> Result<KeltnerChannelConfig, ConstructionError> {
        Ok(KeltnerChannelConfig {
            window: config::window("window", self.window)?,
            atr_window: config::window("atr_window", self.atr_window)?,
            multiplier: Coefficient::positive("multiplier", self.multiplier)?,
        })
    }
}

/// Keltner Channel: an EMA of the close with bands at a multiple of ATR.
///
/// ```text
/// middle = EMA_window(close)
/// upper  = middle + multiplier × ATR_atr_window
/// lower  = middle − multiplier × ATR_atr_window
/// ```
///
/// The ATR is Wilder-smoothed and seeded like [`Atr`](super::Atr).
#[derive(Clone, Debug)]
pub struct KeltnerChannel {
    config: KeltnerChannelConfig,
    middle: Smoother,
    atr: Smoother,
    prev_close: Option<Price>,
    current: Option<BandsValue>,
}

impl Indicator for KeltnerChannel {
    type Config = KeltnerChannelConfig;
    type Output = BandsValue;

    const KIND: IndicatorKind = IndicatorKind::KeltnerChannel;

    fn with_backend(config: Self::Config, _backend: Backend) -> Self {
        Self {
            config,
            middle: Smoother::ema(config.window, Seed::Mean),
            atr: Smoother::wilder(config.atr_window, Seed::Mean),
            prev_close: None,
            current: None,
        }
    }

    fn config(&self) -> &KeltnerChannelConfig {
        &self.config
    }

    fn update(&mut self, tick: &Tick) -> Result<Option<BandsValue>, InputError> {
        let (high, low, close) = tick.hlc_values()?;

        let middle = self.middle.push(close);
        let atr = self.atr.push(true_range(high, low, self.prev_close));
        self.prev_close = Some(close);

        if let (Some(middle), Some(atr)) = (middle, atr) {
            let offset = self.config.multiplier.get() * atr;
            self.current = Some(BandsValue::new(middle + offset, middle, middle - offset));
        }

        Ok(self.current)
    }

    fn value(&self) -> Option<BandsValue> {
        self.current
    }

    fn reset(&mut self) {
        self.middle.reset();
        self.atr.reset();
        self.prev_close = None;
        self.current = None;
    }

    fn backend(&self) -> Backend {
        Backend::Fallback
    }
}

impl Display for KeltnerChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "KC({}, {}, {})",
            self.config.window, self.config.atr_window, self.config.multiplier
        )
    }
}
