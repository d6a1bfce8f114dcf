use std::fmt::{Debug, Display};

use crate::{
    Backend, Indicator, IndicatorKind, InputError, Price, PriceSource, Tick, backend,
    config::window_config,
    rolling::{RingBuffer, WindowSum},
};

window_config!(
    /// Configuration for the Detrended Price Oscillator ([`Dpo`]).
    ///
    /// Defaults: window 20, source [`PriceSource::Close`].
    DpoConfig, DpoConfigBuilder,
    window: 20,
    source: PriceSource::Close,
    required_ticks: |window| window.max(window / 2 + 2),
);

/// Detrended Price Oscillator (DPO).
///
/// Compares the price `window / 2 + 1` ticks back with the current SMA:
///
/// ```text
/// DPO = price[t − (window / 2 + 1)] − SMA_window
/// ```
///
/// # Example
///
/// ```
/// use quantedge_stream::{Dpo, DpoConfig, Tick};
///
/// // lag = 2
/// let mut dpo = Dpo::new(DpoConfig::new(3).unwrap());
/// dpo.update(&Tick::price(1.0)).unwrap();
/// dpo.update(&Tick::price(2.0)).unwrap();
/// // price two ticks back = 1, SMA = 2
/// assert_eq!(dpo.update(&Tick::price(3.0)), Ok(Some(-1.0)));
/// ```
#[derive(Clone, Debug)]
pub struct Dpo {
    config: DpoConfig,
    backend: Backend,
    lagged: RingBuffer,
    window: WindowSum,
    current: Option<Price>,
}

impl Indicator for Dpo {
    type Config = DpoConfig;
    type Output = Price;

    const KIND: IndicatorKind = IndicatorKind::Dpo;

    fn with_backend(config: Self::Config, backend: Backend) -> Self {
        let lag = config.window / 2 + 1;

        backend::construct(Self::KIND, backend, |backend| {
            Ok(Self {
                config,
                backend,
                lagged: RingBuffer::for_backend(backend, lag + 1)?,
                window: WindowSum::new(backend, config.window)?,
                current: None,
            })
        })
    }

    fn config(&self) -> &DpoConfig {
        &self.config
    }

    #[inline]
    fn update(&mut self, tick: &Tick) -> Result<Option<Price>, InputError> {
        let price = self.config.source.extract(tick)?;

        self.lagged.push(price);
        self.window.push(price);

        if self.lagged.is_full() {
            self.current = self
                .window
                .mean()
                .zip(self.lagged.oldest())
                .map(|(sma, lagged)| lagged - sma);
        }

        Ok(self.current)
    }

    #[inline]
    fn value(&self) -> Option<Price> {
        self.current
    }

    fn reset(&mut self) {
        self.lagged.clear();
        self.window.clear();
        self.current = None;
    }

    fn backend(&self) -> Backend {
        self.backend
    }
}

impl Display for Dpo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DPO({}, {})", self.config.window, self.config.source)
    }
}
