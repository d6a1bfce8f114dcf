use std::fmt::{Debug, Display};

use crate::{
    Backend, Indicator, IndicatorKind, InputError, PriceSource, Tick, backend,
    config::window_config, rolling::WindowRank,
};

window_config!(
    /// Configuration for the [`RollingPercentile`].
    ///
    /// Defaults: window 120, source [`PriceSource::Close`].
    RollingPercentileConfig, RollingPercentileConfigBuilder,
    window: 120,
    source: PriceSource::Close,
    required_ticks: |window| window,
);

/// Percentile rank of the newest value within the window: the share of
/// window values less than or equal to it, in percent.
///
/// # Example
///
/// ```
/// use quantedge_stream::{Indicator, RollingPercentile, RollingPercentileConfig, Tick};
///
/// let mut rank = RollingPercentile::new(RollingPercentileConfig::new(4).unwrap());
/// for price in [3.0, 1.0, 4.0] {
///     rank.update(&Tick::price(price)).unwrap();
/// }
/// assert_eq!(rank.update(&Tick::price(2.0)), Ok(Some(50.0)));
/// ```
#[derive(Clone, Debug)]
pub struct RollingPercentile {
    config: RollingPercentileConfig,
    backend: Backend,
    ranks: WindowRank,
    current: Option<f64>,
}

impl Indicator for RollingPercentile {
    type Config = RollingPercentileConfig;
    type Output = f64;

    const KIND: IndicatorKind = IndicatorKind::RollingPercentile;

    fn with_backend(config: Self::Config, backend: Backend) -> Self {
        backend::construct(Self::KIND, backend, |backend| {
            Ok(Self {
                config,
                backend,
                ranks: WindowRank::new(backend, config.window)?,
                current: None,
            })
        })
    }

    fn config(&self) -> &RollingPercentileConfig {
        &self.config
    }

    #[allow(clippy::cast_precision_loss)]
    fn update(&mut self, tick: &Tick) -> Result<Option<f64>, InputError> {
        let price = self.config.source.extract(tick)?;

        if let Some(rank) = self.ranks.push(price) {
            self.current = Some(100.0 * rank as f64 / self.config.window as f64);
        }

        Ok(self.current)
    }

    fn value(&self) -> Option<f64> {
        self.current
    }

    fn reset(&mut self) {
        self.ranks.clear();
        self.current = None;
    }

    fn backend(&self) -> Backend {
        self.backend
    }
}

impl Display for RollingPercentile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Percentile({}, {})",
            self.config.window, self.config.source
        )
    }
}
