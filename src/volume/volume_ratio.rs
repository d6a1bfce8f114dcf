use std::fmt::{Debug, Display};

use crate::{
    Backend, Field, Indicator, IndicatorKind, InputError, Schema, Tick, backend,
    config::window_config, rolling::WindowSum,
};

window_config!(
    /// Configuration for the [`VolumeRatio`].
    ///
    /// Defaults: window 50.
    VolumeRatioConfig, VolumeRatioConfigBuilder,
    window: 50,
    schema: Schema::VOLUME,
    required_ticks: |window| window,
);

/// Current volume relative to its moving average; 0 while the average is 0.
#[derive(Clone, Debug)]
pub struct VolumeRatio {
    config: VolumeRatioConfig,
    backend: Backend,
    volumes: WindowSum,
    current: Option<f64>,
}

impl Indicator for VolumeRatio {
    type Config = VolumeRatioConfig;
    type Output = f64;

    const KIND: IndicatorKind = IndicatorKind::VolumeRatio;

    fn with_backend(config: Self::Config, backend: Backend) -> Self {
        backend::construct(Self::KIND, backend, |backend| {
            Ok(Self {
                config,
                backend,
                volumes: WindowSum::new(backend, config.window)?,
                current: None,
            })
        })
    }

    fn config(&self) -> &VolumeRatioConfig {
        &self.config
    }

    fn update(&mut self, tick: &Tick) -> Result<Option<f64>, InputError> {
        let volume = tick.require(Field::Volume)?;

        self.volumes.push(volume);
        if let Some(mean) = self.volumes.mean() {
            self.current = Some(if mean == 0.0 { 0.0 } else { volume / mean });
        }

        Ok(self.current)
    }

    fn value(&self) -> Option<f64> {
        self.current
    }

    fn reset(&mut self) {
        self.volumes.clear();
        self.current = None;
    }

    fn backend(&self) -> Backend {
        self.backend
    }
}

impl Display for VolumeRatio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "VR({})", self.config.window)
    }
}
