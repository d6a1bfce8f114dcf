use std::fmt::{Debug, Display};

use super::typical_price;
use crate::{
    Backend, ConstructionError, Indicator, IndicatorConfig, IndicatorConfigBuilder,
    IndicatorKind, InputError, Params, Price, Schema, Tick, backend,
    config::{self, window_config},
    error::BackendConstructionError,
    rolling::{Seed, Smoother, WindowSum},
};

window_config!(
    /// Configuration for the rolling [`Vwap`].
    ///
    /// Defaults: window 14.
    VwapConfig, VwapConfigBuilder,
    window: 14,
    schema: Schema::HLCV,
    required_ticks: |window| window,
);

/// Configuration for the [`Vwema`].
///
/// Defaults: VWAP window 14, EMA window 20.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct VwemaConfig {
    vwap_window: usize,
    ema_window: usize,
}

impl IndicatorConfig for VwemaConfig {
    type Builder = VwemaConfigBuilder;

    fn builder() -> Self::Builder {
        let defaults = Self::default();
        VwemaConfigBuilder {
            vwap_window: defaults.vwap_window,
            ema_window: defaults.ema_window,
        }
    }

    fn schema(&self) -> Schema {
        Schema::HLCV
    }

    fn required_ticks(&self) -> usize {
        self.vwap_window + self.ema_window - 1
    }
}

impl VwemaConfig {
    #[must_use]
    pub fn vwap_window(&self) -> usize {
        self.vwap_window
    }

    #[must_use]
    pub fn ema_window(&self) -> usize {
        self.ema_window
    }

    pub(crate) fn from_params(params: &Params) -> Result<Self, ConstructionError> {
        let mut builder = Self::builder();
        if let Some(window) = params.window("vwap_window")? {
            builder = builder.vwap_window(window);
        }
        if let Some(window) = params.window("ema_window")? {
            builder = builder.ema_window(window);
        }
        builder.build()
    }
}

impl Default for VwemaConfig {
    fn default() -> Self {
        Self {
            vwap_window: 14,
            ema_window: 20,
        }
    }
}

impl Display for VwemaConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "VwemaConfig({}, {})", self.vwap_window, self.ema_window)
    }
}

/// Builder for [`VwemaConfig`].
#[derive(Clone, Copy, Debug)]
pub struct VwemaConfigBuilder {
    vwap_window: usize,
    ema_window: usize,
}

impl VwemaConfigBuilder {
    #[must_use]
    pub fn vwap_window(mut self, window: usize) -> Self {
        self.vwap_window = window;
        self
    }

    #[must_use]
    pub fn ema_window(mut self, window: usize) -> Self {
        self.ema_window = window;
        self
    }
}

impl IndicatorConfigBuilder<VwemaConfig> for VwemaConfigBuilder {
    fn build(self) -> Result<VwemaConfig, ConstructionError> {
        Ok(VwemaConfig {
            vwap_window: config::window("vwap_window", self.vwap_window)?,
            ema_window: config::window("ema_window", self.ema_window)?,
        })
    }
}

/// Volume-weighted typical price over a window.
#[derive(Clone, Debug)]
struct VolumeWeighted {
    weighted: WindowSum,
    volumes: WindowSum,
}

impl VolumeWeighted {
    fn new(backend: Backend, window: usize) -> Result<Self, BackendConstructionError> {
        Ok(Self {
            weighted: WindowSum::new(backend, window)?,
            volumes: WindowSum::new(backend, window)?,
        })
    }

    /// `Σ tp·V / Σ V`, or the latest typical price when the window traded
    /// no volume.
    fn push(&mut self, tick: &Tick) -> Result<Option<Price>, InputError> {
        let (high, low, close, volume) = tick.hlcv_values()?;
        let typical = typical_price(high, low, close);

        let weighted = self.weighted.push(typical * volume);
        let volumes = self.volumes.push(volume);

        Ok(match (weighted, volumes) {
            (Some(_), Some(volumes)) if volumes == 0.0 => Some(typical),
            (Some(weighted), Some(volumes)) => Some(weighted / volumes),
            _ => None,
        })
    }

    fn clear(&mut self) {
        self.weighted.clear();
        self.volumes.clear();
    }
}

/// Rolling Volume-Weighted Average Price of the typical price
/// `(H + L + C) / 3`.
///
/// # Example
///
/// ```
/// use quantedge_stream::{Tick, Vwap, VwapConfig};
///
/// let mut vwap = Vwap::new(VwapConfig::new(2).unwrap());
/// vwap.update(&Tick::hlcv(10.0, 10.0, 10.0, 300.0)).unwrap();
/// let value = vwap.update(&Tick::hlcv(20.0, 20.0, 20.0, 100.0)).unwrap();
/// assert_eq!(value, Some(12.5));
/// ```
#[derive(Clone, Debug)]
pub struct Vwap {
    config: VwapConfig,
    backend: Backend,
    window: VolumeWeighted,
    current: Option<Price>,
}

impl Indicator for Vwap {
    type Config = VwapConfig;
    type Output = Price;

    const KIND: IndicatorKind = IndicatorKind::Vwap;

    fn with_backend(config: Self::Config, backend: Backend) -> Self {
        backend::construct(Self::KIND, backend, |backend| {
            Ok(Self {
                config,
                backend,
                window: VolumeWeighted::new(backend, config.window)?,
                current: None,
            })
        })
    }

    fn config(&self) -> &VwapConfig {
        &self.config
    }

    fn update(&mut self, tick: &Tick) -> Result<Option<Price>, InputError> {
        if let Some(vwap) = self.window.push(tick)? {
            self.current = Some(vwap);
        }
        Ok(self.current)
    }

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

impl Display for Vwap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "VWAP({})", self.config.window)
    }
}

/// Volume-Weighted EMA: an EMA of the rolling VWAP, seeded with the mean of
/// its first `ema_window` values.
#[derive(Clone, Debug)]
pub struct Vwema {
    config: VwemaConfig,
    backend: Backend,
    vwap: VolumeWeighted,
    ema: Smoother,
}

impl Indicator for Vwema {
    type Config = VwemaConfig;
    type Output = Price;

    const KIND: IndicatorKind = IndicatorKind::Vwema;

    fn with_backend(config: Self::Config, backend: Backend) -> Self {
        backend::construct(Self::KIND, backend, |backend| {
            Ok(Self {
                config,
                backend,
                vwap: VolumeWeighted::new(backend, config.vwap_window)?,
                ema: Smoother::ema(config.ema_window, Seed::Mean),
            })
        })
    }

    fn config(&self) -> &VwemaConfig {
        &self.config
    }

    fn update(&mut self, tick: &Tick) -> Result<Option<Price>, InputError> {
        let Some(vwap) = self.vwap.push(tick)? else {
            return Ok(None);
        };
        Ok(self.ema.push(vwap))
    }

    fn value(&self) -> Option<Price> {
        self.ema.value()
    }

    fn reset(&mut self) {
        self.vwap.clear();
        self.ema.reset();
    }

    fn backend(&self) -> Backend {
        self.backend
    }
}

impl Display for Vwema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "VWEMA({}, {})",
            self.config.vwap_window, self.config.ema_window
        )
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::test_util::{assert_near, feed, hlcv, walk};

    fn bar(price: f64, volume: f64) -> Tick {
        hlcv(price, price, price, volume)
    }

    mod vwap {
        use super::*;

        #[test]
        fn weights_typical_price_by_volume() {
            let mut vwap = Vwap::new(VwapConfig::new(2).unwrap());
            let out = feed(
                &mut vwap,
                &[bar(10.0, 300.0), bar(20.0, 100.0), bar(30.0, 100.0)],
            );
            assert_eq!(out, vec![None, Some(12.5), Some(25.0)]);
        }

        #[test]
        fn zero_volume_window_is_latest_typical_price() {
            let mut vwap = Vwap::new(VwapConfig::new(2).unwrap());
            let out = feed(&mut vwap, &[bar(10.0, 0.0), hlcv(12.0, 9.0, 9.0, 0.0)]);
            assert_eq!(out[1], Some(10.0));
        }

        #[test]
        fn invalid_tick_does_not_advance() {
            let mut vwap = Vwap::new(VwapConfig::new(1).unwrap());
            assert!(vwap.update(&Tick::price(5.0)).is_err());
            assert_eq!(vwap.value(), None);
            assert_eq!(vwap.update(&bar(5.0, 1.0)), Ok(Some(5.0)));
        }

        #[test]
        fn backends_agree() {
            let ticks = walk(100);
            let config = VwapConfig::default();
            let mut native = Vwap::with_backend(config, Backend::Native);
            let mut fallback = Vwap::with_backend(config, Backend::Fallback);
            for (n, f) in feed(&mut native, &ticks).iter().zip(feed(&mut fallback, &ticks)) {
                match (n, f) {
                    (Some(n), Some(f)) => assert_near!(*n, f, 1e-9),
                    (n, f) => assert_eq!(*n, f),
                }
            }
        }

        #[test]
        fn display() {
            assert_eq!(Vwap::new(VwapConfig::default()).to_string(), "VWAP(14)");
        }
    }

    mod vwema {
        use super::*;

        fn vwema(vwap_window: usize, ema_window: usize) -> Vwema {
            Vwema::new(
                VwemaConfig::builder()
                    .vwap_window(vwap_window)
                    .ema_window(ema_window)
                    .build()
                    .unwrap(),
            )
        }

        #[test]
        fn ready_after_both_windows() {
            let mut vwema = vwema(2, 3);
            let out = feed(&mut vwema, &[bar(10.0, 1.0); 5]);
            assert!(out[..3].iter().all(Option::is_none));
            assert_eq!(out[3], Some(10.0));
            assert_eq!(vwema.config().required_ticks(), 4);
        }

        #[test]
        fn smooths_the_vwap() {
            let mut vwema = vwema(1, 2);
            let out = feed(&mut vwema, &[bar(10.0, 1.0), bar(20.0, 1.0), bar(50.0, 1.0)]);
            // seed (10 + 20) / 2 = 15, then 15 + 2/3 × 35
            assert_eq!(out[1], Some(15.0));
            assert_near!(out[2].unwrap(), 15.0 + 70.0 / 3.0, 1e-12);
        }

        #[test]
        fn rejects_zero_ema_window() {
            assert_eq!(
                VwemaConfig::builder().ema_window(0).build(),
                Err(ConstructionError::ZeroWindow { name: "ema_window" })
            );
        }

        #[test]
        fn display() {
            assert_eq!(
                Vwema::new(VwemaConfig::default()).to_string(),
                "VWEMA(14, 20)"
            );
        }
    }
}
