use std::fmt::{Debug, Display};

use crate::{
    Backend, Indicator, IndicatorKind, InputError, Schema, Tick, backend,
    config::window_config, rolling::WindowExtremum,
};

window_config!(
    /// Configuration for the [`Aroon`] indicator.
    ///
    /// Defaults: window 25. Looks back over `window + 1` ticks.
    AroonConfig, AroonConfigBuilder,
    window: 25,
    schema: Schema::HL,
    required_ticks: |window| window + 1,
);

/// Aroon output: the up and down lines, 0..100.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AroonValue {
    up: f64,
    down: f64,
}

impl AroonValue {
    #[must_use]
    pub fn new(up: f64, down: f64) -> Self {
        Self { up, down }
    }

    #[inline]
    #[must_use]
    pub fn up(&self) -> f64 {
        self.up
    }

    #[inline]
    #[must_use]
    pub fn down(&self) -> f64 {
        self.down
    }

    /// `up − down`.
    #[inline]
    #[must_use]
    pub fn oscillator(&self) -> f64 {
        self.up - self.down
    }
}

impl Display for AroonValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Aroon(up: {}, down: {})", self.up, self.down)
    }
}

/// Aroon indicator.
///
/// Measures how recently the window saw its highest high and lowest low:
///
/// ```text
/// up   = 100 × (window − ticks since highest high) / window
/// down = 100 × (window − ticks since lowest low) / window
/// ```
///
/// On ties the most recent extreme wins.
///
/// # Example
///
/// ```
/// use quantedge_stream::{Aroon, AroonConfig, Tick};
///
/// let mut aroon = Aroon::new(AroonConfig::new(2).unwrap());
/// aroon.update(&Tick::hlc(12.0, 9.0, 10.0)).unwrap();
/// aroon.update(&Tick::hlc(11.0, 8.0, 10.0)).unwrap();
/// let value = aroon.update(&Tick::hlc(10.0, 9.5, 10.0)).unwrap().unwrap();
/// assert_eq!(value.up(), 0.0);
/// assert_eq!(value.down(), 50.0);
/// ```
#[derive(Clone, Debug)]
pub struct Aroon {
    config: AroonConfig,
    backend: Backend,
    highs: WindowExtremum,
    lows: WindowExtremum,
    current: Option<AroonValue>,
}

impl Indicator for Aroon {
    type Config = AroonConfig;
    type Output = AroonValue;

    const KIND: IndicatorKind = IndicatorKind::Aroon;

    fn with_backend(config: Self::Config, backend: Backend) -> Self {
        let span = config.window + 1;

        backend::construct(Self::KIND, backend, |backend| {
            Ok(Self {
                config,
                backend,
                highs: WindowExtremum::max(backend, span)?,
                lows: WindowExtremum::min(backend, span)?,
                current: None,
            })
        })
    }

    fn config(&self) -> &AroonConfig {
        &self.config
    }

    #[allow(clippy::cast_precision_loss)]
    fn update(&mut self, tick: &Tick) -> Result<Option<AroonValue>, InputError> {
        let (high, low) = tick.hl()?;

        let highest = self.highs.push(high);
        let lowest = self.lows.push(low);

        if let (Some(highest), Some(lowest)) = (highest, lowest) {
            let window = self.config.window as f64;
            let line = |age: usize| 100.0 * (window - age as f64) / window;
            self.current = Some(AroonValue::new(line(highest.age), line(lowest.age)));
        }

        Ok(self.current)
    }

    fn value(&self) -> Option<AroonValue> {
        self.current
    }

    fn reset(&mut self) {
        self.highs.clear();
        self.lows.clear();
        self.current = None;
    }

    fn backend(&self) -> Backend {
        self.backend
    }
}

impl Display for Aroon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Aroon({})", self.config.window)
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::test_util::{feed, hlc, walk};

    #[test]
    fn newest_extreme_scores_hundred() {
        let mut aroon = Aroon::new(AroonConfig::new(3).unwrap());
        let ticks: Vec<Tick> = (0..4)
            .map(|i| {
                let base = f64::from(i);
                hlc(base + 1.0, base, base)
            })
            .collect();
        let out = feed(&mut aroon, &ticks);
        assert_eq!(out[..3], [None, None, None]);
        // rising: newest high, oldest low three ticks back
        assert_eq!(out[3], Some(AroonValue::new(100.0, 0.0)));
        assert_eq!(out[3].unwrap().oscillator(), 100.0);
    }

    #[test]
    fn ties_go_to_newest() {
        let mut aroon = Aroon::new(AroonConfig::new(2).unwrap());
        let out = feed(&mut aroon, &[hlc(5.0, 1.0, 3.0); 3]);
        assert_eq!(out[2], Some(AroonValue::new(100.0, 100.0)));
    }

    #[test]
    fn backends_agree() {
        let ticks = walk(80);
        let mut native = Aroon::with_backend(AroonConfig::new(7).unwrap(), Backend::Native);
        let mut fallback = Aroon::with_backend(AroonConfig::new(7).unwrap(), Backend::Fallback);
        assert_eq!(feed(&mut native, &ticks), feed(&mut fallback, &ticks));
    }

    #[test]
    fn display() {
        assert_eq!(Aroon::new(AroonConfig::default()).to_string(), "Aroon(25)");
        assert_eq!(
            AroonValue::new(100.0, 20.0).to_string(),
            "Aroon(up: 100, down: 20)"
        );
    }
}
