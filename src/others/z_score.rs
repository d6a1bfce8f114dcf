use std::fmt::{Debug, Display};

use crate::{
    Backend, Indicator, IndicatorKind, InputError, PriceSource, Tick, backend,
    config::window_config, rolling::WindowMoments,
};

window_config!(
    /// Configuration for the rolling [`ZScore`].
    ///
    /// Defaults: window 20, source [`PriceSource::Close`].
    ZScoreConfig, ZScoreConfigBuilder,
    window: 20,
    source: PriceSource::Close,
    required_ticks: |window| window,
);

/// Distance of the newest value from the window mean, in population
/// standard deviations. A window without dispersion scores 0.
#[derive(Clone, Debug)]
pub struct ZScore {
    config: ZScoreConfig,
    backend: Backend,
    window: WindowMoments,
    current: Option<f64>,
}

impl Indicator for ZScore {
    type Config = ZScoreConfig;
    type Output = f64;

    const KIND: IndicatorKind = IndicatorKind::ZScore;

    fn with_backend(config: Self::Config, backend: Backend) -> Self {
        backend::construct(Self::KIND, backend, |backend| {
            Ok(Self {
                config,
                backend,
                window: WindowMoments::new(backend, config.window)?,
                current: None,
            })
        })
    }

    fn config(&self) -> &ZScoreConfig {
        &self.config
    }

    fn update(&mut self, tick: &Tick) -> Result<Option<f64>, InputError> {
        let price = self.config.source.extract(tick)?;

        if let Some(moments) = self.window.push(price) {
            let sigma = moments.population_std();
            self.current = Some(if sigma == 0.0 {
                0.0
            } else {
                (price - moments.mean) / sigma
            });
        }

        Ok(self.current)
    }

    fn value(&self) -> Option<f64> {
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

impl Display for ZScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ZScore({}, {})", self.config.window, self.config.source)
    }
}
