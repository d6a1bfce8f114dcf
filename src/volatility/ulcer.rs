use std::fmt::{Debug, Display};

use crate::{
    Backend, Indicator, IndicatorKind, InputError, PriceSource, Tick, backend,
    config::window_config,
    rolling::{WindowExtremum, WindowSum},
};

window_config!(
    /// Configuration for the [`UlcerIndex`].
    ///
    /// Defaults: window 14, source [`PriceSource::Close`].
    UlcerIndexConfig, UlcerIndexConfigBuilder,
    window: 14,
    source: PriceSource::Close,
    required_ticks: |window| 2 * window - 1,
);

/// Ulcer Index: root mean square of percentage drawdowns from the rolling
/// high.
///
/// ```text
/// Rₜ    = 100 × (price − max_window(price)) / max_window(price)   (max 0 → 0)
/// Ulcer = √(mean_window(R²))
/// ```
///
/// Drawdowns start once the first high window is full, so the first value
/// arrives at tick `2 × window − 1`.
#[derive(Clone, Debug)]
pub struct UlcerIndex {
    config: UlcerIndexConfig,
    backend: Backend,
    highs: WindowExtremum,
    squared_drawdowns: WindowSum,
    current: Option<f64>,
}

impl Indicator for UlcerIndex {
    type Config = UlcerIndexConfig;
    type Output = f64;

    const KIND: IndicatorKind = IndicatorKind::UlcerIndex;

    fn with_backend(config: Self::Config, backend: Backend) -> Self {
        backend::construct(Self::KIND, backend, |backend| {
            Ok(Self {
                config,
                backend,
                highs: WindowExtremum::max(backend, config.window)?,
                squared_drawdowns: WindowSum::new(backend, config.window)?,
                current: None,
            })
        })
    }

    fn config(&self) -> &UlcerIndexConfig {
        &self.config
    }

    fn update(&mut self, tick: &Tick) -> Result<Option<f64>, InputError> {
        let price = self.config.source.extract(tick)?;

        let Some(highest) = self.highs.push(price) else {
            return Ok(None);
        };
        let drawdown = if highest.value == 0.0 {
            0.0
        } else {
            100.0 * (price - highest.value) / highest.value
        };

        self.squared_drawdowns.push(drawdown * drawdown);
        if let Some(mean) = self.squared_drawdowns.mean() {
            self.current = Some(mean.max(0.0).sqrt());
        }

        Ok(self.current)
    }

    fn value(&self) -> Option<f64> {
        self.current
    }

    fn reset(&mut self) {
        self.highs.clear();
        self.squared_drawdowns.clear();
        self.current = None;
    }

    fn backend(&self) -> Backend {
        self.backend
    }
}

impl Display for UlcerIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "UI({}, {})", self.config.window, self.config.source)
    }
}
