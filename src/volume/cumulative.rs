//! Running volume totals that never forget: OBV, VPT and NVI.

use std::fmt::{Debug, Display};

use crate::{
    Backend, Indicator, IndicatorKind, InputError, Price, Schema, Tick, config::fixed_config,
};

fixed_config!(
    /// Configuration for On-Balance Volume ([`Obv`]).
    ObvConfig, ObvConfigBuilder,
    schema: Schema::CV,
    required_ticks: 1,
);

fixed_config!(
    /// Configuration for Volume-Price Trend ([`Vpt`]).
    VptConfig, VptConfigBuilder,
    schema: Schema::CV,
    required_ticks: 1,
);

fixed_config!(
    /// Configuration for the Negative Volume Index ([`Nvi`]).
    NviConfig, NviConfigBuilder,
    schema: Schema::CV,
    required_ticks: 1,
);

/// Starting level of the negative volume index.
const NVI_BASE: f64 = 1000.0;

/// Relative change from `prev` to `price`, 0 when `prev` is 0.
#[inline]
fn relative_change(prev: Price, price: Price) -> f64 {
    if prev == 0.0 {
        return 0.0;
    }
    (price - prev) / prev
}

/// On-Balance Volume.
///
/// Starts at the first tick's volume; each later tick adds its volume on an
/// up close, subtracts it on a down close and leaves the total unchanged on
/// an equal close.
///
/// # Example
///
/// ```
/// use quantedge_stream::{Obv, ObvConfig, Tick};
///
/// let mut obv = Obv::new(ObvConfig);
/// obv.update(&Tick::price(10.0).with_volume(100.0)).unwrap();
/// obv.update(&Tick::price(11.0).with_volume(50.0)).unwrap();
/// let value = obv.update(&Tick::price(9.0).with_volume(30.0)).unwrap();
/// assert_eq!(value, Some(120.0));
/// ```
#[derive(Clone, Debug)]
pub struct Obv {
    config: ObvConfig,
    prev_close: Option<Price>,
    total: Option<f64>,
}

impl Indicator for Obv {
    type Config = ObvConfig;
    type Output = f64;

    const KIND: IndicatorKind = IndicatorKind::Obv;

    fn with_backend(config: Self::Config, _backend: Backend) -> Self {
        Self {
            config,
            prev_close: None,
            total: None,
        }
    }

    fn config(&self) -> &ObvConfig {
        &self.config
    }

    fn update(&mut self, tick: &Tick) -> Result<Option<f64>, InputError> {
        let (close, volume) = tick.cv_values()?;

        let total = match (self.prev_close.replace(close), self.total) {
            (Some(prev), Some(total)) if close > prev => total + volume,
            (Some(prev), Some(total)) if close < prev => total - volume,
            (_, Some(total)) => total,
            (_, None) => volume,
        };
        self.total = Some(total);

        Ok(self.total)
    }

    fn value(&self) -> Option<f64> {
        self.total
    }

    fn reset(&mut self) {
        self.prev_close = None;
        self.total = None;
    }

    fn backend(&self) -> Backend {
        Backend::Fallback
    }
}

impl Display for Obv {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("OBV")
    }
}

/// Volume-Price Trend: volume weighted by the relative close change,
/// accumulated from zero.
#[derive(Clone, Debug)]
pub struct Vpt {
    config: VptConfig,
    prev_close: Option<Price>,
    total: Option<f64>,
}

impl Indicator for Vpt {
    type Config = VptConfig;
    type Output = f64;

    const KIND: IndicatorKind = IndicatorKind::Vpt;

    fn with_backend(config: Self::Config, _backend: Backend) -> Self {
        Self {
            config,
            prev_close: None,
            total: None,
        }
    }

    fn config(&self) -> &VptConfig {
        &self.config
    }

    fn update(&mut self, tick: &Tick) -> Result<Option<f64>, InputError> {
        let (close, volume) = tick.cv_values()?;

        let step = self
            .prev_close
            .replace(close)
            .map_or(0.0, |prev| volume * relative_change(prev, close));
        let total = self.total.unwrap_or(0.0) + step;
        self.total = Some(total);

        Ok(self.total)
    }

    fn value(&self) -> Option<f64> {
        self.total
    }

    fn reset(&mut self) {
        self.prev_close = None;
        self.total = None;
    }

    fn backend(&self) -> Backend {
        Backend::Fallback
    }
}

impl Display for Vpt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("VPT")
    }
}

/// Negative Volume Index: starts at 1000 and compounds the relative close
/// change only on ticks whose volume fell.
#[derive(Clone, Debug)]
pub struct Nvi {
    config: NviConfig,
    prev: Option<(Price, f64)>,
    index: Option<f64>,
}

impl Indicator for Nvi {
    type Config = NviConfig;
    type Output = f64;

    const KIND: IndicatorKind = IndicatorKind::Nvi;

    fn with_backend(config: Self::Config, _backend: Backend) -> Self {
        Self {
            config,
            prev: None,
            index: None,
        }
    }

    fn config(&self) -> &NviConfig {
        &self.config
    }

    fn update(&mut self, tick: &Tick) -> Result<Option<f64>, InputError> {
        let (close, volume) = tick.cv_values()?;

        let mut index = self.index.unwrap_or(NVI_BASE);
        if let Some((prev_close, prev_volume)) = self.prev.replace((close, volume))
            && volume < prev_volume
        {
            index *= 1.0 + relative_change(prev_close, close);
        }
        self.index = Some(index);

        Ok(self.index)
    }

    fn value(&self) -> Option<f64> {
        self.index
    }

    fn reset(&mut self) {
        self.prev = None;
        self.index = None;
    }

    fn backend(&self) -> Backend {
        Backend::Fallback
    }
}

impl Display for Nvi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("NVI")
    }
}
