use std::fmt::{Debug, Display};

use crate::{
    Backend, ConstructionError, Indicator, IndicatorConfig, IndicatorConfigBuilder,
    IndicatorKind, InputError, Params, PriceSource, Schema, Tick,
    config,
    rolling::{Seed, Smoother},
};

/// Configuration for the Moving Average Convergence Divergence
/// ([`Macd`]) indicator.
///
/// Defaults: fast 12, slow 26, signal 9, source [`PriceSource::Close`].
/// The fast window must be shorter than the slow one.
///
/// # Example
///
/// ```
/// use quantedge_stream::{IndicatorConfig, IndicatorConfigBuilder, MacdConfig};
///
/// let config = MacdConfig::builder().fast(5).slow(35).signal(5).build().unwrap();
/// assert_eq!(config.required_ticks(), 39);
///
/// assert!(MacdConfig::builder().fast(26).slow(12).build().is_err());
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct MacdConfig {
    fast: usize,
    slow: usize,
    signal: usize,
    source: PriceSource,
}

impl IndicatorConfig for MacdConfig {
    type Builder = MacdConfigBuilder;

    fn builder() -> Self::Builder {
        let defaults = Self::default();
        MacdConfigBuilder {
            fast: defaults.fast,
            slow: defaults.slow,
            signal: defaults.signal,
            source: defaults.source,
        }
    }

    fn schema(&self) -> Schema {
        self.source.schema()
    }

    fn required_ticks(&self) -> usize {
        self.slow + self.signal - 1
    }
}

impl MacdConfig {
    #[must_use]
    pub fn fast(&self) -> usize {
        self.fast
    }

    #[must_use]
    pub fn slow(&self) -> usize {
        self.slow
    }

    #[must_use]
    pub fn signal(&self) -> usize {
        self.signal
    }

    #[must_use]
    pub fn source(&self) -> PriceSource {
        self.source
    }

    pub(crate) fn from_params(params: &Params) -> Result<Self, ConstructionError> {
        let mut builder = Self::builder();
        if let Some(fast) = params.window("fast")? {
            builder = builder.fast(fast);
        }
        if let Some(slow) = params.window("slow")? {
            builder = builder.slow(slow);
        }
        if let Some(signal) = params.window("signal")? {
            builder = builder.signal(signal);
        }
        builder.build()
    }
}

impl Default for MacdConfig {
    fn default() -> Self {
        Self {
            fast: 12,
            slow: 26,
            signal: 9,
            source: PriceSource::Close,
        }
    }
}

impl Display for MacdConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "MacdConfig({}, {}, {}, {})",
            self.fast, self.slow, self.signal, self.source
        )
    }
}

/// Builder for [`MacdConfig`].
#[derive(Clone, Copy, Debug)]
pub struct MacdConfigBuilder {
    fast: usize,
    slow: usize,
    signal: usize,
    source: PriceSource,
}

impl MacdConfigBuilder {
    #[must_use]
    pub fn fast(mut self, fast: usize) -> Self {
        self.fast = fast;
        self
    }

    #[must_use]
    pub fn slow(mut self, slow: usize) -> Self {
        self.slow = slow;
        self
    }

    #[must_use]
    pub fn signal(mut self, signal: usize) -> Self {
        self.signal = signal;
        self
    }

    #[must_use]
    pub fn source(mut self, source: PriceSource) -> Self {
        self.source = source;
        self
    }
}

impl IndicatorConfigBuilder<MacdConfig> for MacdConfigBuilder {
    fn build(self) -> Result<MacdConfig, ConstructionError> {
        let fast = config::window("fast", self.fast)?;
        let slow = config::window("slow", self.slow)?;
        let signal = config::window("signal", self.signal)?;

        if fast >= slow {
            return Err(ConstructionError::Incompatible(
                "fast window must be shorter than slow window",
            ));
        }

        Ok(MacdConfig {
            fast,
            slow,
            signal,
            source: self.source,
        })
    }
}

/// MACD output: the MACD line, its signal line and the histogram.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MacdValue {
    macd: f64,
    signal: f64,
    histogram: f64,
}

impl MacdValue {
    /// Value with `histogram = macd − signal`.
    #[must_use]
    pub fn new(macd: f64, signal: f64) -> Self {
        Self {
            macd,
            signal,
            histogram: macd - signal,
        }
    }

    /// `EMA_fast − EMA_slow`.
    #[inline]
    #[must_use]
    pub fn macd(&self) -> f64 {
        self.macd
    }

    /// EMA of the MACD line.
    #[inline]
    #[must_use]
    pub fn signal(&self) -> f64 {
        self.signal
    }

    #[inline]
    #[must_use]
    pub fn histogram(&self) -> f64 {
        self.histogram
    }
}

impl Display for MacdValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "MACD(m: {}, s: {}, h: {})",
            self.macd, self.signal, self.histogram
        )
    }
}

/// Moving Average Convergence Divergence (MACD).
///
/// ```text
/// MACD      = EMA_fast − EMA_slow
/// signal    = EMA_signal(MACD)
/// histogram = MACD − signal
/// ```
///
/// All three averages are SMA-seeded, so the MACD line exists from tick
/// `slow` and the first output appears at tick `slow + signal − 1`.
///
/// # Example
///
/// ```
/// use quantedge_stream::{Indicator, IndicatorConfig, IndicatorConfigBuilder, Macd, MacdConfig, Tick};
///
/// let config = MacdConfig::builder().fast(2).slow(3).signal(2).build().unwrap();
/// let mut macd = Macd::new(config);
///
/// for close in [1.0, 2.0, 3.0] {
///     assert_eq!(macd.update(&Tick::price(close)), Ok(None));
/// }
/// assert!(macd.update(&Tick::price(4.0)).unwrap().is_some());
/// ```
#[derive(Clone, Debug)]
pub struct Macd {
    config: MacdConfig,
    fast: Smoother,
    slow: Smoother,
    signal: Smoother,
    current: Option<MacdValue>,
}

impl Indicator for Macd {
    type Config = MacdConfig;
    type Output = MacdValue;

    const KIND: IndicatorKind = IndicatorKind::Macd;

    fn with_backend(config: Self::Config, _backend: Backend) -> Self {
        Self {
            config,
            fast: Smoother::ema(config.fast, Seed::Mean),
            slow: Smoother::ema(config.slow, Seed::Mean),
            signal: Smoother::ema(config.signal, Seed::Mean),
            current: None,
        }
    }

    fn config(&self) -> &MacdConfig {
        &self.config
    }

    #[inline]
    fn update(&mut self, tick: &Tick) -> Result<Option<MacdValue>, InputError> {
        let price = self.config.source.extract(tick)?;

        let fast = self.fast.push(price);
        let slow = self.slow.push(price);

        if let (Some(fast), Some(slow)) = (fast, slow) {
            let macd = fast - slow;
            self.current = self
                .signal
                .push(macd)
                .map(|signal| MacdValue::new(macd, signal));
        }

        Ok(self.current)
    }

    #[inline]
    fn value(&self) -> Option<MacdValue> {
        self.current
    }

    fn reset(&mut self) {
        self.fast.reset();
        self.slow.reset();
        self.signal.reset();
        self.current = None;
    }

    fn backend(&self) -> Backend {
        Backend::Fallback
    }
}

impl Display for Macd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "MACD({}, {}, {}, {})",
            self.config.fast, self.config.slow, self.config.signal, self.config.source
        )
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::test_util::{assert_near, feed_prices};

    fn macd(fast: usize, slow: usize, signal: usize) -> Macd {
        Macd::new(
            MacdConfig::builder()
                .fast(fast)
                .slow(slow)
                .signal(signal)
                .build()
                .unwrap(),
        )
    }

    mod filling {
        use super::*;

        #[test]
        fn first_value_at_slow_plus_signal_minus_one() {
            let mut macd = macd(2, 3, 2);
            let out = feed_prices(&mut macd, &[1.0, 2.0, 3.0, 4.0, 5.0]);
            assert!(out[..3].iter().all(Option::is_none));
            assert!(out[3].is_some());
            assert_eq!(macd.config().required_ticks(), 4);
        }

        #[test]
        fn linear_trend_has_constant_gap() {
            let mut macd = macd(2, 3, 2);
            // tick 3: EMA2 = 2.5 (seed 1.5 → 2.5), EMA3 = 2 → MACD 0.5
            // tick 4: EMA2 = 3.5, EMA3 = 3 → MACD 0.5, signal seed 0.5
            let out = feed_prices(&mut macd, &[1.0, 2.0, 3.0, 4.0]);
            let value = out[3].unwrap();
            assert_near!(value.macd(), 0.5, 1e-12);
            assert_near!(value.signal(), 0.5, 1e-12);
            assert_eq!(value.histogram(), value.macd() - value.signal());
        }
    }

    mod config {
        use super::*;

        #[test]
        fn fast_must_be_shorter() {
            assert_eq!(
                MacdConfig::builder().fast(26).slow(26).build(),
                Err(ConstructionError::Incompatible(
                    "fast window must be shorter than slow window"
                ))
            );
        }

        #[test]
        fn zero_signal_is_rejected() {
            assert_eq!(
                MacdConfig::builder().signal(0).build(),
                Err(ConstructionError::ZeroWindow { name: "signal" })
            );
        }

        #[test]
        fn from_params_overrides() {
            let params = Params::new().with("fast", 5.0).with("slow", 35.0);
            let config = MacdConfig::from_params(&params).unwrap();
            assert_eq!((config.fast(), config.slow(), config.signal()), (5, 35, 9));
        }

        #[test]
        fn display_config() {
            assert_eq!(
                MacdConfig::default().to_string(),
                "MacdConfig(12, 26, 9, Close)"
            );
        }
    }

    #[test]
    fn display() {
        assert_eq!(macd(12, 26, 9).to_string(), "MACD(12, 26, 9, Close)");
        assert_eq!(
            MacdValue::new(1.5, 1.0).to_string(),
            "MACD(m: 1.5, s: 1, h: 0.5)"
        );
    }

    #[test]
    fn reset_restarts_seeding() {
        let prices = [5.0, 4.0, 6.0, 8.0, 7.0, 9.0, 10.0];
        let mut macd = macd(2, 4, 3);
        let first = feed_prices(&mut macd, &prices);
        macd.reset();
        assert_eq!(macd.value(), None);
        assert_eq!(feed_prices(&mut macd, &prices), first);
    }
}
