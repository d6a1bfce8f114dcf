use std::fmt::{Debug, Display};

use crate::{
    Backend, Indicator, IndicatorKind, InputError, Price, PriceSource, Tick, backend,
    config::window_config, rolling::WindowLinear,
};

window_config!(
    /// Configuration for the Weighted Moving Average ([`Wma`]) indicator.
    ///
    /// Defaults: window 20, source [`PriceSource::Close`].
    WmaConfig, WmaConfigBuilder,
    window: 20,
    source: PriceSource::Close,
    required_ticks: |window| window,
);

/// Linearly Weighted Moving Average (WMA).
///
/// The newest value weighs `window`, the oldest weighs 1:
///
/// ```text
/// WMA = Σ (i + 1) × price_i / (n × (n + 1) / 2)
/// ```
///
/// The native kernel updates the weighted sum in O(1) per tick.
///
/// # Example
///
/// ```
/// use quantedge_stream::{Tick, Wma, WmaConfig};
///
/// let mut wma = Wma::new(WmaConfig::new(3).unwrap());
/// wma.update(&Tick::price(1.0)).unwrap();
/// wma.update(&Tick::price(2.0)).unwrap();
/// // (1×1 + 2×2 + 3×3) / 6
/// assert_eq!(wma.update(&Tick::price(3.0)), Ok(Some(14.0 / 6.0)));
/// ```
#[derive(Clone, Debug)]
pub struct Wma {
    config: WmaConfig,
    backend: Backend,
    window: WindowLinear,
    weight_total: f64,
    current: Option<Price>,
}

impl Indicator for Wma {
    type Config = WmaConfig;
    type Output = Price;

    const KIND: IndicatorKind = IndicatorKind::Wma;

    fn with_backend(config: Self::Config, backend: Backend) -> Self {
        #[allow(clippy::cast_precision_loss)]
        let n = config.window as f64;

        backend::construct(Self::KIND, backend, |backend| {
            Ok(Self {
                config,
                backend,
                window: WindowLinear::new(backend, config.window)?,
                weight_total: n * (n + 1.0) / 2.0,
                current: None,
            })
        })
    }

    fn config(&self) -> &WmaConfig {
        &self.config
    }

    #[inline]
    fn update(&mut self, tick: &Tick) -> Result<Option<Price>, InputError> {
        let price = self.config.source.extract(tick)?;

        self.current = self
            .window
            .push(price)
            .map(|sums| (sums.weighted + sums.sum) / self.weight_total);

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

impl Display for Wma {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "WMA({}, {})", self.config.window, self.config.source)
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::test_util::{assert_near, feed_prices};

    #[test]
    fn weights_newest_most() {
        for backend in [Backend::Native, Backend::Fallback] {
            let mut wma = Wma::with_backend(WmaConfig::new(3).unwrap(), backend);
            let out = feed_prices(&mut wma, &[1.0, 2.0, 3.0, 4.0]);
            assert_eq!(out[..2], [None, None]);
            // (2×1 + 3×2 + 4×3) / 6 = 20 / 6
            assert_near!(out[3].unwrap(), 20.0 / 6.0, 1e-12);
        }
    }

    #[test]
    fn backends_agree_over_long_series() {
        let prices: Vec<f64> = (0..500).map(|i| 50.0 + f64::from(i % 17) * 1.5).collect();
        let mut native = Wma::with_backend(WmaConfig::new(10).unwrap(), Backend::Native);
        let mut fallback = Wma::with_backend(WmaConfig::new(10).unwrap(), Backend::Fallback);

        let native = feed_prices(&mut native, &prices);
        let fallback = feed_prices(&mut fallback, &prices);
        for (n, f) in native.iter().zip(&fallback) {
            match (n, f) {
                (Some(n), Some(f)) => assert_near!(*n, *f, 1e-9),
                _ => assert_eq!(n, f),
            }
        }
    }

    #[test]
    fn reset_clears_window() {
        let mut wma = Wma::new(WmaConfig::new(2).unwrap());
        feed_prices(&mut wma, &[1.0, 2.0]);
        wma.reset();
        assert_eq!(wma.value(), None);
        assert_eq!(feed_prices(&mut wma, &[3.0, 6.0]), vec![None, Some(5.0)]);
    }

    #[test]
    fn display() {
        assert_eq!(Wma::new(WmaConfig::default()).to_string(), "WMA(20, Close)");
    }
}
