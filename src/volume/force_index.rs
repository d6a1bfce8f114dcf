use std::fmt::{Debug, Display};

use crate::{
    Backend, Indicator, IndicatorKind, InputError, Price, Schema, Tick,
    config::window_config,
    rolling::{Seed, Smoother},
};

window_config!(
    /// Configuration for the [`ForceIndex`].
    ///
    /// Defaults: window 13.
    ForceIndexConfig, ForceIndexConfigBuilder,
    window: 13,
    schema: Schema::CV,
    required_ticks: |window| window + 1,
);

/// Force Index: EMA of `(close − previous close) × volume`.
///
/// The EMA is seeded with the mean of the first `window` raw forces, so
/// the first value arrives at tick `window + 1`.
#[derive(Clone, Debug)]
pub struct ForceIndex {
    config: ForceIndexConfig,
    smoother: Smoother,
    prev_close: Option<Price>,
}

impl Indicator for ForceIndex {
    type Config = ForceIndexConfig;
    type Output = f64;

    const KIND: IndicatorKind = IndicatorKind::ForceIndex;

    fn with_backend(config: Self::Config, _backend: Backend) -> Self {
        Self {
            config,
            smoother: Smoother::ema(config.window, Seed::Mean),
            prev_close: None,
        }
    }

    fn config(&self) -> &ForceIndexConfig {
        &self.config
    }

    fn update(&mut self, tick: &Tick) -> Result<Option<f64>, InputError> {
        let (close, volume) = tick.cv_values()?;

        let Some(prev) = self.prev_close.replace(close) else {
            return Ok(None);
        };

        Ok(self.smoother.push((close - prev) * volume))
    }

    fn value(&self) -> Option<f64> {
        self.smoother.value()
    }

    fn reset(&mut self) {
        self.smoother.reset();
        self.prev_close = None;
    }

    fn backend(&self) -> Backend {
        Backend::Fallback
    }
}

impl Display for ForceIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "FI({})", self.config.window)
    }
}
