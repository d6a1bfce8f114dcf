use std::fmt::{Debug, Display};

use crate::{
    Backend, ConstructionError, Indicator, IndicatorConfig, IndicatorConfigBuilder,
    IndicatorKind, InputError, Params, Schema, Tick, backend, config,
    error::BackendConstructionError, rolling::WindowSum,
};

/// Configuration for the [`UltimateOscillator`].
///
/// Defaults: periods 7, 14 and 28. Periods must be non-decreasing.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct UltimateOscillatorConfig {
    period1: usize,
    period2: usize,
    period3: usize,
}

impl IndicatorConfig for UltimateOscillatorConfig {
    type Builder = UltimateOscillatorConfigBuilder;

    fn builder() -> Self::Builder {
        let defaults = Self::default();
        UltimateOscillatorConfigBuilder {
            period1: defaults.period1,
            period2: defaults.period2,
            period3: defaults.period3,
        }
    }

    fn schema(&self) -> Schema {
        Schema::HLC
    }

    fn required_ticks(&self) -> usize {
        self.period3
    }
}

impl UltimateOscillatorConfig {
    /// Short period, weighted 4.
    #[must_use]
    pub fn period1(&self) -> usize {
        self.period1
    }

    /// Medium period, weighted 2.
    #[must_use]
    pub fn period2(&self) -> usize {
        self.period2
    }

    /// Long period, weighted 1.
    #[must_use]
    pub fn period3(&self) -> usize {
        self.period3
    }

    pub(crate) fn from_params(params: &Params) -> Result<Self, ConstructionError> {
        let mut builder = Self::builder();
        if let Some(period) = params.window("period1")? {
            builder = builder.period1(period);
        }
        if let Some(period) = params.window("period2")? {
            builder = builder.period2(period);
        }
        if let Some(period) = params.window("period3")? {
            builder = builder.period3(period);
        }
        builder.build()
    }
}

impl Default for UltimateOscillatorConfig {
    fn default() -> Self {
        Self {
            period1: 7,
            period2: 14,
            period3: 28,
        }
    }
}

impl Display for UltimateOscillatorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "UltimateOscillatorConfig({}, {}, {})",
            self.period1, self.period2, self.period3
        )
    }
}

/// Builder for [`UltimateOscillatorConfig`].
#[derive(Clone, Copy, Debug)]
pub struct UltimateOscillatorConfigBuilder {
    period1: usize,
    period2: usize,
    period3: usize,
}

impl UltimateOscillatorConfigBuilder {
    #[must_use]
    pub fn period1(mut self, period: usize) -> Self {
        self.period1 = period;
        self
    }

    #[must_use]
    pub fn period2(mut self, period: usize) -> Self {
        self.period2 = period;
        self
    }

    #[must_use]
    pub fn period3(mut self, period: usize) -> Self {
        self.period3 = period;
        self
    }
}

impl IndicatorConfigBuilder<UltimateOscillatorConfig> for UltimateOscillatorConfigBuilder {
    fn build(self) -> Result<UltimateOscillatorConfig, ConstructionError> {
        let period1 = config::window("period1", self.period1)?;
        let period2 = config::window("period2", self.period2)?;
        let period3 = config::window("period3", self.period3)?;

        if period1 > period2 || period2 > period3 {
            return Err(ConstructionError::Incompatible(
                "periods must be non-decreasing",
            ));
        }

        Ok(UltimateOscillatorConfig {
            period1,
            period2,
            period3,
        })
    }
}

/// Buying pressure and true range sums over one period.
#[derive(Clone, Debug)]
struct PressureAverage {
    pressure: WindowSum,
    range: WindowSum,
}

impl PressureAverage {
    fn new(backend: Backend, period: usize) -> Result<Self, BackendConstructionError> {
        Ok(Self {
            pressure: WindowSum::new(backend, period)?,
            range: WindowSum::new(backend, period)?,
        })
    }

    fn push(&mut self, pressure: f64, range: f64) -> Option<f64> {
        let pressure = self.pressure.push(pressure);
        let range = self.range.push(range);
        let (pressure, range) = (pressure?, range?);
        Some(if range == 0.0 { 0.0 } else { pressure / range })
    }

    fn clear(&mut self) {
        self.pressure.clear();
        self.range.clear();
    }
}

/// Ultimate Oscillator (Williams).
///
/// ```text
/// BP = close − min(low, prev close)
/// TR = max(high, prev close) − min(low, prev close)
/// Aₙ = ΣBP / ΣTR over periodₙ              (ΣTR 0 → 0)
/// UO = 100 × (4·A₁ + 2·A₂ + A₃) / 7
/// ```
///
/// The first tick has no previous close and contributes `close − low` and
/// `high − low`.
#[derive(Clone, Debug)]
pub struct UltimateOscillator {
    config: UltimateOscillatorConfig,
    backend: Backend,
    averages: [PressureAverage; 3],
    prev_close: Option<f64>,
    current: Option<f64>,
}

impl Indicator for UltimateOscillator {
    type Config = UltimateOscillatorConfig;
    type Output = f64;

    const KIND: IndicatorKind = IndicatorKind::UltimateOscillator;

    fn with_backend(config: Self::Config, backend: Backend) -> Self {
        backend::construct(Self::KIND, backend, |backend| {
            Ok(Self {
                config,
                backend,
                averages: [
                    PressureAverage::new(backend, config.period1)?,
                    PressureAverage::new(backend, config.period2)?,
                    PressureAverage::new(backend, config.period3)?,
                ],
                prev_close: None,
                current: None,
            })
        })
    }

    fn config(&self) -> &UltimateOscillatorConfig {
        &self.config
    }

    fn update(&mut self, tick: &Tick) -> Result<Option<f64>, InputError> {
        let (high, low, close) = tick.hlc_values()?;

        let (floor, ceiling) = match self.prev_close {
            Some(prev) => (low.min(prev), high.max(prev)),
            None => (low, high),
        };
        let pressure = close - floor;
        let range = ceiling - floor;
        self.prev_close = Some(close);

        let [short, medium, long] = &mut self.averages;
        let short = short.push(pressure, range);
        let medium = medium.push(pressure, range);
        let long = long.push(pressure, range);

        if let (Some(short), Some(medium), Some(long)) = (short, medium, long) {
            self.current = Some(100.0 * (4.0 * short + 2.0 * medium + long) / 7.0);
        }

        Ok(self.current)
    }

    fn value(&self) -> Option<f64> {
        self.current
    }

    fn reset(&mut self) {
        for average in &mut self.averages {
            average.clear();
        }
        self.prev_close = None;
        self.current = None;
    }

    fn backend(&self) -> Backend {
        self.backend
    }
}

impl Display for UltimateOscillator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "UO({}, {}, {})",
            self.config.period1, self.config.period2, self.config.period3
        )
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::test_util::{assert_near, feed, hlc, walk};

    fn uo(period1: usize, period2: usize, period3: usize) -> UltimateOscillator {
        UltimateOscillator::new(
            UltimateOscillatorConfig::builder()
                .period1(period1)
                .period2(period2)
                .period3(period3)
                .build()
                .unwrap(),
        )
    }

    #[test]
    fn closes_at_highs_give_100() {
        let mut uo = uo(1, 1, 2);
        let out = feed(&mut uo, &[hlc(10.0, 8.0, 10.0), hlc(11.0, 9.0, 11.0)]);
        assert_eq!(out, vec![None, Some(100.0)]);
    }

    #[test]
    fn first_tick_uses_its_own_range() {
        let mut uo = uo(1, 1, 1);
        // BP 1, TR 4 → A = 0.25 for all three periods
        assert_eq!(uo.update(&hlc(12.0, 8.0, 9.0)), Ok(Some(25.0)));
    }

    #[test]
    fn weights_short_period_heaviest() {
        let mut uo = uo(1, 2, 2);
        let out = feed(
            &mut uo,
            &[
                // BP 0, TR 2
                hlc(10.0, 8.0, 8.0),
                // prev close 8: BP 2, TR 2
                hlc(10.0, 9.0, 10.0),
            ],
        );
        // A1 = 1, A2 = A3 = 2/4
        assert_near!(out[1].unwrap(), 100.0 * (4.0 + 1.0 + 0.5) / 7.0, 1e-12);
    }

    #[test]
    fn zero_range_average_is_zero() {
        let mut uo = uo(1, 1, 1);
        assert_eq!(uo.update(&hlc(5.0, 5.0, 5.0)), Ok(Some(0.0)));
    }

    #[test]
    fn periods_must_not_decrease() {
        assert!(matches!(
            UltimateOscillatorConfig::builder().period1(20).build(),
            Err(ConstructionError::Incompatible(_))
        ));
        assert!(
            UltimateOscillatorConfig::builder()
                .period1(14)
                .period2(14)
                .period3(14)
                .build()
                .is_ok()
        );
    }

    #[test]
    fn backends_agree() {
        let ticks = walk(150);
        let config = UltimateOscillatorConfig::default();
        let mut native = UltimateOscillator::with_backend(config, Backend::Native);
        let mut fallback = UltimateOscillator::with_backend(config, Backend::Fallback);
        for (n, f) in feed(&mut native, &ticks).iter().zip(feed(&mut fallback, &ticks)) {
            match (n, f) {
                (Some(n), Some(f)) => assert_near!(*n, f, 1e-9),
                (n, f) => assert_eq!(*n, f),
            }
        }
    }

    #[test]
    fn reset_forgets_previous_close() {
        let mut uo = uo(1, 1, 1);
        uo.update(&hlc(10.0, 8.0, 10.0)).unwrap();
        uo.reset();
        assert_eq!(uo.value(), None);
        assert_eq!(uo.update(&hlc(12.0, 8.0, 9.0)), Ok(Some(25.0)));
    }

    #[test]
    fn display() {
        assert_eq!(uo(7, 14, 28).to_string(), "UO(7, 14, 28)");
        assert_eq!(
            UltimateOscillatorConfig::default().to_string(),
            "UltimateOscillatorConfig(7, 14, 28)"
        );
    }
}
