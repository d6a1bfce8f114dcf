use std::fmt::{Debug, Display};

use crate::{
    Backend, Indicator, IndicatorKind, InputError, Price, PriceSource, Tick,
    config::window_config,
    rolling::{Seed, Smoother},
};

window_config!(
    /// Configuration for the Exponential Moving Average ([`Ema`])
    /// indicator.
    ///
    /// # Seeding
    ///
    /// EMA has infinite memory: the seed (SMA of the first `window`
    /// values) influences all subsequent values. Output begins at tick
    /// `window`.
    ///
    /// # Example
    ///
    /// ```
    /// use quantedge_stream::{EmaConfig, IndicatorConfig, IndicatorConfigBuilder, PriceSource};
    ///
    /// let config = EmaConfig::builder()
    ///     .window(20)
    ///     .source(PriceSource::HL2)
    ///     .build()
    ///     .unwrap();
    ///
    /// assert_eq!(config.window(), 20);
    /// assert_eq!(config.required_ticks(), 20);
    /// ```
    EmaConfig, EmaConfigBuilder,
    window: 20,
    source: PriceSource::Close,
    required_ticks: |window| window,
);

/// Exponential Moving Average (EMA).
///
/// Weights recent prices more heavily using a smoothing factor
/// `α = 2 / (window + 1)`. The first value is the SMA of the first
/// `window` prices; each later value is
///
/// ```text
/// EMA = α × price + (1 − α) × EMA_prev
/// ```
///
/// Runs on the fallback backend only: its whole state is two scalars.
///
/// # Example
///
/// ```
/// use quantedge_stream::{Ema, EmaConfig, Tick};
///
/// let mut ema = Ema::new(EmaConfig::new(3).unwrap());
///
/// assert_eq!(ema.update(&Tick::price(2.0)), Ok(None));
/// assert_eq!(ema.update(&Tick::price(4.0)), Ok(None));
/// // SMA seed: (2 + 4 + 6) / 3 = 4
/// assert_eq!(ema.update(&Tick::price(6.0)), Ok(Some(4.0)));
/// // α = 0.5: 0.5 × 8 + 0.5 × 4 = 6
/// assert_eq!(ema.update(&Tick::price(8.0)), Ok(Some(6.0)));
/// ```
#[derive(Clone, Debug)]
pub struct Ema {
    config: EmaConfig,
    smoother: Smoother,
}

impl Indicator for Ema {
    type Config = EmaConfig;
    type Output = Price;

    const KIND: IndicatorKind = IndicatorKind::Ema;

    fn with_backend(config: Self::Config, _backend: Backend) -> Self {
        Self {
            config,
            smoother: Smoother::ema(config.window, Seed::Mean),
        }
    }

    fn config(&self) -> &EmaConfig {
        &self.config
    }

    #[inline]
    fn update(&mut self, tick: &Tick) -> Result<Option<Price>, InputError> {
        let price = self.config.source.extract(tick)?;
        Ok(self.smoother.push(price))
    }

    #[inline]
    fn value(&self) -> Option<Price> {
        self.smoother.value()
    }

    fn reset(&mut self) {
        self.smoother.reset();
    }

    fn backend(&self) -> Backend {
        Backend::Fallback
    }
}

impl Display for Ema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EMA({}, {})", self.config.window, self.config.source)
    }
}
