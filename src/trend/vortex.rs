use std::fmt::{Debug, Display};

use crate::{
    Backend, Indicator, IndicatorKind, InputError, Schema, Tick, backend,
    config::window_config, rolling::WindowSum, volatility::true_range,
};

window_config!(
    /// Configuration for the Vortex ([`Vortex`]) indicator.
    ///
    /// Defaults: window 14.
    VortexConfig, VortexConfigBuilder,
    window: 14,
    schema: Schema::HLC,
    required_ticks: |window| window + 1,
);

/// Vortex output: the positive and negative vortex lines.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VortexValue {
    plus: f64,
    minus: f64,
}

impl VortexValue {
    #[must_use]
    pub fn new(plus: f64, minus: f64) -> Self {
        Self { plus, minus }
    }

    /// VI+.
    #[inline]
    #[must_use]
    pub fn plus(&self) -> f64 {
        self.plus
    }

    /// VI−.
    #[inline]
    #[must_use]
    pub fn minus(&self) -> f64 {
        self.minus
    }
}

impl Display for VortexValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "VI(+: {}, -: {})", self.plus, self.minus)
    }
}

/// Vortex Indicator (VI).
///
/// Over the last `window` changes:
///
/// ```text
/// VI+ = Σ |high − low'| / Σ TR
/// VI− = Σ |low − high'| / Σ TR
/// ```
///
/// A window with no true range yields `(0, 0)`.
#[derive(Clone, Debug)]
pub struct Vortex {
    config: VortexConfig,
    backend: Backend,
    prev: Option<(f64, f64, f64)>,
    plus: WindowSum,
    minus: WindowSum,
    true_range: WindowSum,
    current: Option<VortexValue>,
}

impl Indicator for Vortex {
    type Config = VortexConfig;
    type Output = VortexValue;

    const KIND: IndicatorKind = IndicatorKind::Vortex;

    fn with_backend(config: Self::Config, backend: Backend) -> Self {
        backend::construct(Self::KIND, backend, |backend| {
            Ok(Self {
                config,
                backend,
                prev: None,
                plus: WindowSum::new(backend, config.window)?,
                minus: WindowSum::new(backend, config.window)?,
                true_range: WindowSum::new(backend, config.window)?,
                current: None,
            })
        })
    }

    fn config(&self) -> &VortexConfig {
        &self.config
    }

    fn update(&mut self, tick: &Tick) -> Result<Option<VortexValue>, InputError> {
        let (high, low, close) = tick.hlc_values()?;

        let Some((prev_high, prev_low, prev_close)) = self.prev.replace((high, low, close)) else {
            return Ok(None);
        };

        let plus = self.plus.push((high - prev_low).abs());
        let minus = self.minus.push((low - prev_high).abs());
        let range = self
            .true_range
            .push(true_range(high, low, Some(prev_close)));

        if let (Some(plus), Some(minus), Some(range)) = (plus, minus, range) {
            self.current = Some(if range == 0.0 {
                VortexValue::new(0.0, 0.0)
            } else {
                VortexValue::new(plus / range, minus / range)
            });
        }

        Ok(self.current)
    }

    fn value(&self) -> Option<VortexValue> {
        self.current
    }

    fn reset(&mut self) {
        self.prev = None;
        self.plus.clear();
        self.minus.clear();
        self.true_range.clear();
        self.current = None;
    }

    fn backend(&self) -> Backend {
        self.backend
    }
}

impl Display for Vortex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "VI({})", self.config.window)
    }
}
