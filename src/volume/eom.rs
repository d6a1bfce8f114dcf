use std::fmt::{Debug, Display};

use crate::{
    Backend, Indicator, IndicatorKind, InputError, Price, Schema, Tick, backend,
    config::window_config, rolling::WindowSum,
};

/// Volume divisor that keeps box ratios in a readable range.
const VOLUME_SCALE: f64 = 100_000_000.0;

window_config!(
    /// Configuration for Ease of Movement ([`Eom`]).
    ///
    /// Defaults: window 14.
    EomConfig, EomConfigBuilder,
    window: 14,
    schema: Schema::HLV,
    required_ticks: |window| window + 1,
);

/// Ease of Movement: SMA of the single-period EMV.
///
/// ```text
/// EMV = (midpoint − midpoint') × (H − L) / volume × 10⁸     (volume 0 → 0)
/// EOM = SMA_window(EMV)
/// ```
#[derive(Clone, Debug)]
pub struct Eom {
    config: EomConfig,
    backend: Backend,
    emv: WindowSum,
    prev_midpoint: Option<Price>,
    current: Option<f64>,
}

impl Indicator for Eom {
    type Config = EomConfig;
    type Output = f64;

    const KIND: IndicatorKind = IndicatorKind::Eom;

    fn with_backend(config: Self::Config, backend: Backend) -> Self {
        backend::construct(Self::KIND, backend, |backend| {
            Ok(Self {
                config,
                backend,
                emv: WindowSum::new(backend, config.window)?,
                prev_midpoint: None,
                current: None,
            })
        })
    }

    fn config(&self) -> &EomConfig {
        &self.config
    }

    fn update(&mut self, tick: &Tick) -> Result<Option<f64>, InputError> {
        let (high, low, volume) = tick.hlv_values()?;
        let midpoint = (high + low) / 2.0;

        let Some(prev) = self.prev_midpoint.replace(midpoint) else {
            return Ok(None);
        };

        let emv = if volume == 0.0 {
            0.0
        } else {
            (midpoint - prev) * (high - low) / volume * VOLUME_SCALE
        };
        self.emv.push(emv);
        if let Some(mean) = self.emv.mean() {
            self.current = Some(mean);
        }

        Ok(self.current)
    }

    fn value(&self) -> Option<f64> {
        self.current
    }

    fn reset(&mut self) {
        self.emv.clear();
        self.prev_midpoint = None;
        self.current = None;
    }

    fn backend(&self) -> Backend {
        self.backend
    }
}

impl Display for Eom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EOM({})", self.config.window)
    }
}
