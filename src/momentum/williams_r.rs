use std::fmt::{Debug, Display};

use crate::{
    Backend, Indicator, IndicatorKind, InputError, Schema, Tick, backend,
    config::window_config, rolling::WindowExtremum,
};

window_config!(
    /// Configuration for the Williams %R ([`WilliamsR`]) indicator.
    ///
    /// Defaults: window 14.
    WilliamsRConfig, WilliamsRConfigBuilder,
    window: 14,
    schema: Schema::HLC,
    required_ticks: |window| window,
);

/// Williams %R, on the −100..0 scale.
///
/// ```text
/// %R = −100 × (highest high − close) / (highest high − lowest low)
/// ```
///
/// A flat range gives −100.
#[derive(Clone, Debug)]
pub struct WilliamsR {
    config: WilliamsRConfig,
    backend: Backend,
    highs: WindowExtremum,
    lows: WindowExtremum,
    current: Option<f64>,
}

impl Indicator for WilliamsR {
    type Config = WilliamsRConfig;
    type Output = f64;

    const KIND: IndicatorKind = IndicatorKind::WilliamsR;

    fn with_backend(config: Self::Config, backend: Backend) -> Self {
        backend::construct(Self::KIND, backend, |backend| {
            Ok(Self {
                config,
                backend,
                highs: WindowExtremum::max(backend, config.window)?,
                lows: WindowExtremum::min(backend, config.window)?,
                current: None,
            })
        })
    }

    fn config(&self) -> &WilliamsRConfig {
        &self.config
    }

    fn update(&mut self, tick: &Tick) -> Result<Option<f64>, InputError> {
        let (high, low, close) = tick.hlc_values()?;

        let highest = self.highs.push(high);
        let lowest = self.lows.push(low);

        if let (Some(highest), Some(lowest)) = (highest, lowest) {
            let range = highest.value - lowest.value;
            self.current = Some(if range == 0.0 {
                -100.0
            } else {
                -100.0 * (highest.value - close) / range
            });
        }

        Ok(self.current)
    }

    fn value(&self) -> Option<f64> {
        self.current
    }

    fn reset(&mut self) {
        self.highs.clear();
        self.lows.clear();
        self.current = None;
    }

    fn backend(&self) -> Backend {
        self.backend
    }
}

impl Display for WilliamsR {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "%R({})", self.config.window)
    }
}
