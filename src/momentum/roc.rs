use std::fmt::{Debug, Display};

use crate::{
    Backend, Indicator, IndicatorKind, InputError, Price, PriceSource, Tick,
    config::window_config, rolling::RingBuffer,
};

window_config!(
    /// Configuration for the Rate of Change ([`Roc`]) indicator.
    ///
    /// Defaults: window 12, source [`PriceSource::Close`].
    RocConfig, RocConfigBuilder,
    window: 12,
    source: PriceSource::Close,
    required_ticks: |window| window + 1,
);

window_config!(
    /// Configuration for the [`Momentum`] indicator.
    ///
    /// Defaults: window 10, source [`PriceSource::Close`].
    MomentumConfig, MomentumConfigBuilder,
    window: 10,
    source: PriceSource::Close,
    required_ticks: |window| window + 1,
);

/// Rate of Change (ROC), in percent.
///
/// ```text
/// ROC = 100 × (price − price[t − window]) / price[t − window]
/// ```
///
/// A zero reference price gives 0.
///
/// # Example
///
/// ```
/// use quantedge_stream::{Roc, RocConfig, Tick};
///
/// let mut roc = Roc::new(RocConfig::new(1).unwrap());
/// roc.update(&Tick::price(50.0)).unwrap();
/// assert_eq!(roc.update(&Tick::price(55.0)), Ok(Some(10.0)));
/// ```
#[derive(Clone, Debug)]
pub struct Roc {
    config: RocConfig,
    prices: RingBuffer,
    current: Option<f64>,
}

impl Indicator for Roc {
    type Config = RocConfig;
    type Output = f64;

    const KIND: IndicatorKind = IndicatorKind::Roc;

    fn with_backend(config: Self::Config, _backend: Backend) -> Self {
        Self {
            config,
            prices: RingBuffer::new(config.window + 1),
            current: None,
        }
    }

    fn config(&self) -> &RocConfig {
        &self.config
    }

    fn update(&mut self, tick: &Tick) -> Result<Option<f64>, InputError> {
        let price = self.config.source.extract(tick)?;

        self.prices.push(price);
        if self.prices.is_full() {
            self.current = self.prices.oldest().map(|reference| {
                if reference == 0.0 {
                    0.0
                } else {
                    100.0 * (price - reference) / reference
                }
            });
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

impl Display for Roc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ROC({}, {})", self.config.window, self.config.source)
    }
}

/// Momentum: the price change over `window` ticks.
///
/// ```text
/// MOM = price − price[t − window]
/// ```
#[derive(Clone, Debug)]
pub struct Momentum {
    config: MomentumConfig,
    prices: RingBuffer,
    current: Option<Price>,
}

impl Indicator for Momentum {
    type Config = MomentumConfig;
    type Output = Price;

    const KIND: IndicatorKind = IndicatorKind::Momentum;

    fn with_backend(config: Self::Config, _backend: Backend) -> Self {
        Self {
            config,
            prices: RingBuffer::new(config.window + 1),
            current: None,
        }
    }

    fn config(&self) -> &MomentumConfig {
        &self.config
    }

    fn update(&mut self, tick: &Tick) -> Result<Option<Price>, InputError> {
        let price = self.config.source.extract(tick)?;

        self.prices.push(price);
        if self.prices.is_full() {
            self.current = self.prices.oldest().map(|reference| price - reference);
        }

        Ok(self.current)
    }

    fn value(&self) -> Option<Price> {
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

impl Display for Momentum {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "MOM({}, {})", self.config.window, self.config.source)
    }
}
