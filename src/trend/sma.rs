use std::fmt::{Debug, Display};

use crate::{
    Backend, Indicator, IndicatorKind, InputError, Price, PriceSource, Tick, backend,
    config::window_config, rolling::WindowSum,
};

window_config!(
    /// Configuration for the Simple Moving Average ([`Sma`]) indicator.
    ///
    /// Defaults: window 20, source [`PriceSource::Close`].
    ///
    /// # Example
    ///
    /// ```rust
    /// use quantedge_stream::{IndicatorConfig, SmaConfig};
    ///
    /// let config = SmaConfig::new(20).unwrap();
    /// assert_eq!(config.window(), 20);
    /// assert_eq!(config.required_ticks(), 20);
    /// ```
    SmaConfig, SmaConfigBuilder,
    window: 20,
    source: PriceSource::Close,
    required_ticks: |window| window,
);

impl SmaConfig {
    /// SMA on median price: `(high + low) / 2`.
    ///
    /// # Errors
    ///
    /// Same as [`SmaConfig::new`].
    pub fn hl2(window: usize) -> Result<Self, crate::ConstructionError> {
        crate::IndicatorConfigBuilder::build(
            <Self as crate::IndicatorConfig>::builder()
                .window(window)
                .source(PriceSource::HL2),
        )
    }
}

/// Simple Moving Average (SMA).
///
/// Computes the unweighted mean of the last *n* values, where *n* is the
/// configured window length. Returns `None` until the window is full.
///
/// The native kernel keeps a running sum for O(1) updates per tick; the
/// fallback kernel re-adds the window.
///
/// # Example
///
/// ```rust
/// use quantedge_stream::{Sma, SmaConfig, Tick};
///
/// let mut sma = Sma::new(SmaConfig::new(3).unwrap());
///
/// assert_eq!(sma.update(&Tick::price(10.0)), Ok(None));
/// assert_eq!(sma.update(&Tick::price(20.0)), Ok(None));
/// assert_eq!(sma.update(&Tick::price(30.0)), Ok(Some(20.0)));
/// ```
#[derive(Clone, Debug)]
pub struct Sma {
    config: SmaConfig,
    backend: Backend,
    window: WindowSum,
    current: Option<Price>,
}

impl Indicator for Sma {
    type Config = SmaConfig;
    type Output = Price;

    const KIND: IndicatorKind = IndicatorKind::Sma;

    fn with_backend(config: Self::Config, backend: Backend) -> Self {
        backend::construct(Self::KIND, backend, |backend| {
            Ok(Self {
                config,
                backend,
                window: WindowSum::new(backend, config.window)?,
                current: None,
            })
        })
    }

    fn config(&self) -> &SmaConfig {
        &self.config
    }

    #[inline]
    fn update(&mut self, tick: &Tick) -> Result<Option<Price>, InputError> {
        let price = self.config.source.extract(tick)?;

        self.window.push(price);
        self.current = self.window.mean();

        Ok(self.current)
    }

    #[inline]
    fn value(&self) -> Option<Price> {
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

impl Display for Sma {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SMA({}, {})", self.config.window, self.config.source)
    }
}
