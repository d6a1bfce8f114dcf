use std::fmt::{Debug, Display};

use super::typical_price;
use crate::{
    Backend, Indicator, IndicatorKind, InputError, Price, Schema, Tick, backend,
    config::window_config, rolling::WindowSum,
};

window_config!(
    /// Configuration for the Money Flow Index ([`Mfi`]).
    ///
    /// Defaults: window 14.
    MfiConfig, MfiConfigBuilder,
    window: 14,
    schema: Schema::HLCV,
    required_ticks: |window| window + 1,
);

/// Money Flow Index: a volume-weighted RSI of the typical price.
///
/// From the second tick, raw money flow `tp × volume` counts as positive
/// when the typical price rose and negative when it fell. Unchanged prices
/// contribute to neither side.
///
/// ```text
/// MFI = 100 − 100 / (1 + Σ positive / Σ negative)     (Σ negative = 0 → 100)
/// ```
///
/// # Example
///
/// ```
/// use quantedge_stream::{Mfi, MfiConfig, Tick};
///
/// let mut mfi = Mfi::new(MfiConfig::new(2).unwrap());
/// mfi.update(&Tick::hlcv(10.0, 10.0, 10.0, 100.0)).unwrap();
/// mfi.update(&Tick::hlcv(11.0, 11.0, 11.0, 100.0)).unwrap();
/// let value = mfi.update(&Tick::hlcv(12.0, 12.0, 12.0, 100.0)).unwrap();
/// assert_eq!(value, Some(100.0));
/// ```
#[derive(Clone, Debug)]
pub struct Mfi {
    config: MfiConfig,
    backend: Backend,
    positive: WindowSum,
    negative: WindowSum,
    prev_typical: Option<Price>,
    current: Option<f64>,
}

impl Indicator for Mfi {
    type Config = MfiConfig;
    type Output = f64;

    const KIND: IndicatorKind = IndicatorKind::Mfi;

    fn with_backend(config: Self::Config, backend: Backend) -> Self {
        backend::construct(Self::KIND, backend, |backend| {
            Ok(Self {
                config,
                backend,
                positive: WindowSum::new(backend, config.window)?,
                negative: WindowSum::new(backend, config.window)?,
                prev_typical: None,
                current: None,
            })
        })
    }

    fn config(&self) -> &MfiConfig {
        &self.config
    }

    fn update(&mut self, tick: &Tick) -> Result<Option<f64>, InputError> {
        let (high, low, close, volume) = tick.hlcv_values()?;
        let typical = typical_price(high, low, close);

        let Some(prev) = self.prev_typical.replace(typical) else {
            return Ok(None);
        };

        let flow = typical * volume;
        let (up, down) = if typical > prev {
            (flow, 0.0)
        } else if typical < prev {
            (0.0, flow)
        } else {
            (0.0, 0.0)
        };

        let positive = self.positive.push(up);
        let negative = self.negative.push(down);
        if let (Some(positive), Some(negative)) = (positive, negative) {
            self.current = Some(if negative <= 0.0 {
                100.0
            } else {
                100.0 - 100.0 / (1.0 + positive / negative)
            });
        }

        Ok(self.current)
    }

    fn value(&self) -> Option<f64> {
        self.current
    }

    fn reset(&mut self) {
        self.positive.clear();
        self.negative.clear();
        self.prev_typical = None;
        self.current = None;
    }

    fn backend(&self) -> Backend {
        self.backend
    }
}

impl Display for Mfi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "MFI({})", self.config.window)
    }
}
