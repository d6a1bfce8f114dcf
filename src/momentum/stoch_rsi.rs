use std::fmt::{Debug, Display};

use super::{Rsi, RsiConfig};
use crate::{
    Backend, ConstructionError, Indicator, IndicatorConfig, IndicatorConfigBuilder,
    IndicatorKind, InputError, Params, PriceSource, Schema, Tick, backend, config,
    rolling::{WindowExtremum, WindowSum},
};

/// Configuration for the Stochastic RSI ([`StochRsi`]).
///
/// Defaults: RSI window 14, stochastic window 14, %K 3, %D 3, source
/// [`PriceSource::Close`].
///
/// # Example
///
/// ```
/// use quantedge_stream::{IndicatorConfig, StochRsiConfig};
///
/// assert_eq!(StochRsiConfig::default().required_ticks(), 32);
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct StochRsiConfig {
    rsi: RsiConfig,
    stoch_window: usize,
    k: usize,
    d: usize,
}

impl IndicatorConfig for StochRsiConfig {
    type Builder = StochRsiConfigBuilder;

    fn builder() -> Self::Builder {
        let defaults = Self::default();
        StochRsiConfigBuilder {
            rsi_window: defaults.rsi.window(),
            stoch_window: defaults.stoch_window,
            k: defaults.k,
            d: defaults.d,
            source: defaults.rsi.source(),
        }
    }

    fn schema(&self) -> Schema {
        self.rsi.schema()
    }

    fn required_ticks(&self) -> usize {
        self.rsi.window() + self.stoch_window + self.k + self.d - 2
    }
}

impl StochRsiConfig {
    #[must_use]
    pub fn rsi_window(&self) -> usize {
        self.rsi.window()
    }

    /// Lookback of the RSI high/low range.
    #[must_use]
    pub fn stoch_window(&self) -> usize {
        self.stoch_window
    }

    #[must_use]
    pub fn k(&self) -> usize {
        self.k
    }

    #[must_use]
    pub fn d(&self) -> usize {
        self.d
    }

    #[must_use]
    pub fn source(&self) -> PriceSource {
        self.rsi.source()
    }

    pub(crate) fn from_params(params: &Params) -> Result<Self, ConstructionError> {
        let mut builder = Self::builder();
        if let Some(window) = params.window("rsi_window")? {
            builder = builder.rsi_window(window);
        }
        if let Some(window) = params.window("stoch_window")? {
            builder = builder.stoch_window(window);
        }
        if let Some(k) = params.window("k")? {
            builder = builder.k(k);
        }
        if let Some(d) = params.window("d")? {
            builder = builder.d(d);
        }
        builder.build()
    }
}

impl Default for StochRsiConfig {
    fn default() -> Self {
        Self {
            rsi: RsiConfig::default(),
            stoch_window: 14,
            k: 3,
            d: 3,
        }
    }
}

impl Display for StochRsiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "StochRsiConfig({}, {}, {}, {}, {})",
            self.rsi.window(),
            self.stoch_window,
            self.k,
            self.d,
            self.rsi.source()
        )
    }
}

/// Builder for [`StochRsiConfig`].
#[derive(Clone, Copy, Debug)]
pub struct StochRsiConfigBuilder {
    rsi_window: usize,
    stoch_window: usize,
    k: usize,
    d: usize,
    source: PriceSource,
}

impl StochRsiConfigBuilder {
    #[must_use]
    pub fn rsi_window(mut self, window: usize) -> Self {
        self.rsi_window = window;
        self
    }

    #[must_use]
    pub fn stoch_window(mut self, window: usize) -> Self {
        self.stoch_window = window;
        self
    }

    #[must_use]
    pub fn k(mut self, k: usize) -> Self {
        self.k = k;
        self
    }

    #[must_use]
    pub fn d(mut self, d: usize) -> Self {
        self.d = d;
        self
    }

    #[must_use]
    pub fn source(mut self, source: PriceSource) -> Self {
        self.source = source;
        self
    }
}

impl IndicatorConfigBuilder<StochRsiConfig> for StochRsiConfigBuilder {
    fn build(self) -> Result<StochRsiConfig, ConstructionError> {
        let rsi_window = config::window("rsi_window", self.rsi_window)?;
        Ok(StochRsiConfig {
            rsi: RsiConfig::builder()
                .window(rsi_window)
                .source(self.source)
                .build()?,
            stoch_window: config::window("stoch_window", self.stoch_window)?,
            k: config::window("k", self.k)?,
            d: config::window("d", self.d)?,
        })
    }
}

/// Stochastic RSI output, on the 0..1 scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StochRsiValue {
    stoch_rsi: f64,
    k: f64,
    d: f64,
}

impl StochRsiValue {
    #[must_use]
    pub fn new(stoch_rsi: f64, k: f64, d: f64) -> Self {
        Self { stoch_rsi, k, d }
    }

    /// Position of the latest RSI within its recent range.
    #[inline]
    #[must_use]
    pub fn stoch_rsi(&self) -> f64 {
        self.stoch_rsi
    }

    /// SMA of the stochastic RSI.
    #[inline]
    #[must_use]
    pub fn k(&self) -> f64 {
        self.k
    }

    /// SMA of %K.
    #[inline]
    #[must_use]
    pub fn d(&self) -> f64 {
        self.d
    }
}

impl Display for StochRsiValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "StochRSI(s: {}, k: {}, d: {})",
            self.stoch_rsi, self.k, self.d
        )
    }
}

/// Stochastic RSI: the stochastic oscillator applied to RSI values.
///
/// ```text
/// StochRSI = (RSI − min RSI) / (max RSI − min RSI)   over stoch_window
/// %K       = SMA_k(StochRSI)
/// %D       = SMA_d(%K)
/// ```
///
/// A flat RSI range gives 0.
#[derive(Clone, Debug)]
pub struct StochRsi {
    config: StochRsiConfig,
    backend: Backend,
    rsi: Rsi,
    highest: WindowExtremum,
    lowest: WindowExtremum,
    percent_k: WindowSum,
    percent_d: WindowSum,
    current: Option<StochRsiValue>,
}

impl Indicator for StochRsi {
    type Config = StochRsiConfig;
    type Output = StochRsiValue;

    const KIND: IndicatorKind = IndicatorKind::StochRsi;

    fn with_backend(config: Self::Config, backend: Backend) -> Self {
        backend::construct(Self::KIND, backend, |backend| {
            Ok(Self {
                config,
                backend,
                rsi: Rsi::with_backend(config.rsi, Backend::Fallback),
                highest: WindowExtremum::max(backend, config.stoch_window)?,
                lowest: WindowExtremum::min(backend, config.stoch_window)?,
                percent_k: WindowSum::new(backend, config.k)?,
                percent_d: WindowSum::new(backend, config.d)?,
                current: None,
            })
        })
    }

    fn config(&self) -> &StochRsiConfig {
        &self.config
    }

    fn update(&mut self, tick: &Tick) -> Result<Option<StochRsiValue>, InputError> {
        let price = self.config.rsi.source().extract(tick)?;

        let Some(rsi) = self.rsi.push(price) else {
            return Ok(None);
        };

        let highest = self.highest.push(rsi);
        let lowest = self.lowest.push(rsi);
        let (Some(highest), Some(lowest)) = (highest, lowest) else {
            return Ok(None);
        };

        let range = highest.value - lowest.value;
        let stoch_rsi = if range == 0.0 {
            0.0
        } else {
            (rsi - lowest.value) / range
        };

        self.percent_k.push(stoch_rsi);
        let Some(k) = self.percent_k.mean() else {
            return Ok(None);
        };

        self.percent_d.push(k);
        self.current = self
            .percent_d
            .mean()
            .map(|d| StochRsiValue::new(stoch_rsi, k, d));

        Ok(self.current)
    }

    fn value(&self) -> Option<StochRsiValue> {
        self.current
    }

    fn reset(&mut self) {
        self.rsi.reset();
        self.highest.clear();
        self.lowest.clear();
        self.percent_k.clear();
        self.percent_d.clear();
        self.current = None;
    }

    fn backend(&self) -> Backend {
        self.backend
    }
}

impl Display for StochRsi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "StochRSI({}, {}, {}, {}, {})",
            self.config.rsi.window(),
            self.config.stoch_window,
            self.config.k,
            self.config.d,
            self.config.rsi.source()
        )
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::test_util::{assert_near, feed, feed_prices, walk};

    fn stoch_rsi(rsi: usize, stoch: usize, k: usize, d: usize) -> StochRsi {
        StochRsi::new(
            StochRsiConfig::builder()
                .rsi_window(rsi)
                .stoch_window(stoch)
                .k(k)
                .d(d)
                .build()
                .unwrap(),
        )
    }

    #[test]
    fn ready_after_full_pipeline() {
        let mut indicator = stoch_rsi(2, 3, 2, 2);
        let prices: Vec<f64> = (0..10_u8).map(|i| 10.0 + f64::from(i % 3)).collect();
        let out = feed_prices(&mut indicator, &prices);
        let required = indicator.config().required_ticks();
        assert_eq!(required, 7);
        assert!(out[..required - 1].iter().all(Option::is_none));
        assert!(out[required - 1].is_some());
    }

    #[test]
    fn rsi_at_top_of_range_is_one() {
        // RSI(1): 100 on a rise, 0 on a fall
        let mut indicator = stoch_rsi(1, 2, 1, 1);
        let out = feed_prices(&mut indicator, &[10.0, 9.0, 11.0]);
        assert_eq!(out[2], Some(StochRsiValue::new(1.0, 1.0, 1.0)));
    }

    #[test]
    fn flat_rsi_range_is_zero() {
        let mut indicator = stoch_rsi(1, 2, 1, 1);
        let out = feed_prices(&mut indicator, &[10.0, 11.0, 12.0]);
        // RSI 100 twice
        assert_eq!(out[2], Some(StochRsiValue::new(0.0, 0.0, 0.0)));
    }

    #[test]
    fn k_and_d_smooth_in_sequence() {
        let mut indicator = stoch_rsi(1, 2, 2, 2);
        let out = feed_prices(&mut indicator, &[10.0, 9.0, 11.0, 10.0, 12.0]);
        // stoch: 1, 0, 1 → k: 0.5, 0.5 → d: 0.5
        assert_eq!(out[3], None);
        assert_eq!(out[4], Some(StochRsiValue::new(1.0, 0.5, 0.5)));
    }

    #[test]
    fn backends_agree() {
        let ticks = walk(200);
        let config = StochRsiConfig::default();
        let mut native = StochRsi::with_backend(config, Backend::Native);
        let mut fallback = StochRsi::with_backend(config, Backend::Fallback);
        for (n, f) in feed(&mut native, &ticks).iter().zip(feed(&mut fallback, &ticks)) {
            match (n, f) {
                (Some(n), Some(f)) => {
                    assert_near!(n.stoch_rsi(), f.stoch_rsi(), 1e-9);
                    assert_near!(n.k(), f.k(), 1e-9);
                    assert_near!(n.d(), f.d(), 1e-9);
                }
                (n, f) => assert_eq!(*n, f),
            }
        }
    }

    #[test]
    fn invalid_rsi_window_names_the_parameter() {
        assert_eq!(
            StochRsiConfig::builder().rsi_window(0).build(),
            Err(ConstructionError::ZeroWindow { name: "rsi_window" })
        );
    }

    #[test]
    fn display() {
        assert_eq!(
            StochRsi::new(StochRsiConfig::default()).to_string(),
            "StochRSI(14, 14, 3, 3, Close)"
        );
        assert_eq!(
            StochRsiValue::new(0.5, 0.25, 1.0).to_string(),
            "StochRSI(s: 0.5, k: 0.25, d: 1)"
        );
    }
}
