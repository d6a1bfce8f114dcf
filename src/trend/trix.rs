use std::fmt::{Debug, Display};

use crate::{
    Backend, Indicator, IndicatorKind, InputError, PriceSource, Tick,
    config::window_config,
    rolling::{Seed, Smoother},
};

window_config!(
    /// Configuration for the [`Trix`] indicator.
    ///
    /// Defaults: window 14, source [`PriceSource::Close`].
    TrixConfig, TrixConfigBuilder,
    window: 14,
    source: PriceSource::Close,
    required_ticks: |window| 3 * window - 1,
);

/// Triple-smoothed EMA rate of change (TRIX).
///
/// Three chained SMA-seeded EMAs; the output is the one-tick percent
/// change of the third:
///
/// ```text
/// TRIX = 100 × (E3 − E3') / E3'      (E3' 0 → 0)
/// ```
#[derive(Clone, Debug)]
pub struct Trix {
    config: TrixConfig,
    stages: [Smoother; 3],
    prev: Option<f64>,
    current: Option<f64>,
}

impl Indicator for Trix {
    type Config = TrixConfig;
    type Output = f64;

    const KIND: IndicatorKind = IndicatorKind::Trix;

    fn with_backend(config: Self::Config, _backend: Backend) -> Self {
        Self {
            config,
            stages: [Smoother::ema(config.window, Seed::Mean); 3],
            prev: None,
            current: None,
        }
    }

    fn config(&self) -> &TrixConfig {
        &self.config
    }

    fn update(&mut self, tick: &Tick) -> Result<Option<f64>, InputError> {
        let price = self.config.source.extract(tick)?;

        let [first, second, third] = &mut self.stages;
        let Some(smoothed) = first
            .push(price)
            .and_then(|e1| second.push(e1))
            .and_then(|e2| third.push(e2))
        else {
            return Ok(None);
        };

        if let Some(prev) = self.prev.replace(smoothed) {
            self.current = Some(if prev == 0.0 {
                0.0
            } else {
                100.0 * (smoothed - prev) / prev
            });
        }

        Ok(self.current)
    }

    fn value(&self) -> Option<f64> {
        self.current
    }

    fn reset(&mut self) {
        self.stages.iter_mut().for_each(Smoother::reset);
        self.prev = None;
        self.current = None;
    }

    fn backend(&self) -> Backend {
        Backend::Fallback
    }
}

impl Display for Trix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TRIX({}, {})", self.config.window, self.config.source)
    }
}
