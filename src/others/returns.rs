//! Percentage returns over one tick, the whole history or a window.

use std::fmt::{Debug, Display};

use crate::{
    Backend, Indicator, IndicatorKind, InputError, Price, PriceSource, Tick,
    config::{source_config, window_config},
    rolling::RingBuffer,
};

/// `100 × (price − base) / base`, 0 when `base` is 0.
#[inline]
fn percent_change(base: Price, price: Price) -> f64 {
    if base == 0.0 {
        return 0.0;
    }
    100.0 * (price - base) / base
}

/// `ln(price / prev)`, 0 unless both prices are positive.
#[inline]
pub(crate) fn log_return(prev: Price, price: Price) -> f64 {
    if prev <= 0.0 || price <= 0.0 {
        return 0.0;
    }
    (price / prev).ln()
}

source_config!(
    /// Configuration for [`DailyReturn`].
    DailyReturnConfig, DailyReturnConfigBuilder,
    source: PriceSource::Close,
    required_ticks: 2,
);

source_config!(
    /// Configuration for [`DailyLogReturn`].
    DailyLogReturnConfig, DailyLogReturnConfigBuilder,
    source: PriceSource::Close,
    required_ticks: 2,
);

source_config!(
    /// Configuration for [`CumulativeReturn`].
    CumulativeReturnConfig, CumulativeReturnConfigBuilder,
    source: PriceSource::Close,
    required_ticks: 1,
);

source_config!(
    /// Configuration for [`CompoundLogReturn`].
    CompoundLogReturnConfig, CompoundLogReturnConfigBuilder,
    source: PriceSource::Close,
    required_ticks: 1,
);

window_config!(
    /// Configuration for [`RollingReturn`].
    ///
    /// Defaults: window 20, source [`PriceSource::Close`].
    RollingReturnConfig, RollingReturnConfigBuilder,
    window: 20,
    source: PriceSource::Close,
    required_ticks: |window| window,
);

/// Percentage change from the previous tick.
///
/// # Example
///
/// ```
/// use quantedge_stream::{DailyReturn, DailyReturnConfig, Indicator, Tick};
///
/// let mut ret = DailyReturn::new(DailyReturnConfig::default());
/// assert_eq!(ret.update(&Tick::price(100.0)), Ok(None));
/// assert_eq!(ret.update(&Tick::price(105.0)), Ok(Some(5.0)));
/// ```
#[derive(Clone, Debug)]
pub struct DailyReturn {
    config: DailyReturnConfig,
    prev: Option<Price>,
    current: Option<f64>,
}

impl Indicator for DailyReturn {
    type Config = DailyReturnConfig;
    type Output = f64;

    const KIND: IndicatorKind = IndicatorKind::DailyReturn;

    fn with_backend(config: Self::Config, _backend: Backend) -> Self {
        Self {
            config,
            prev: None,
            current: None,
        }
    }

    fn config(&self) -> &DailyReturnConfig {
        &self.config
    }

    fn update(&mut self, tick: &Tick) -> Result<Option<f64>, InputError> {
        let price = self.config.source.extract(tick)?;
        if let Some(prev) = self.prev.replace(price) {
            self.current = Some(percent_change(prev, price));
        }
        Ok(self.current)
    }

    fn value(&self) -> Option<f64> {
        self.current
    }

    fn reset(&mut self) {
        self.prev = None;
        self.current = None;
    }

    fn backend(&self) -> Backend {
        Backend::Fallback
    }
}

impl Display for DailyReturn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DR({})", self.config.source)
    }
}

/// Logarithmic change from the previous tick, in percent.
#[derive(Clone, Debug)]
pub struct DailyLogReturn {
    config: DailyLogReturnConfig,
    prev: Option<Price>,
    current: Option<f64>,
}

impl Indicator for DailyLogReturn {
    type Config = DailyLogReturnConfig;
    type Output = f64;

    const KIND: IndicatorKind = IndicatorKind::DailyLogReturn;

    fn with_backend(config: Self::Config, _backend: Backend) -> Self {
        Self {
            config,
            prev: None,
            current: None,
        }
    }

    fn config(&self) -> &DailyLogReturnConfig {
        &self.config
    }

    fn update(&mut self, tick: &Tick) -> Result<Option<f64>, InputError> {
        let price = self.config.source.extract(tick)?;
        if let Some(prev) = self.prev.replace(price) {
            self.current = Some(100.0 * log_return(prev, price));
        }
        Ok(self.current)
    }

    fn value(&self) -> Option<f64> {
        self.current
    }

    fn reset(&mut self) {
        self.prev = None;
        self.current = None;
    }

    fn backend(&self) -> Backend {
        Backend::Fallback
    }
}

impl Display for DailyLogReturn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DLR({})", self.config.source)
    }
}

/// Percentage change since the first tick; 0 on the first tick.
#[derive(Clone, Debug)]
pub struct CumulativeReturn {
    config: CumulativeReturnConfig,
    first: Option<Price>,
    current: Option<f64>,
}

impl Indicator for CumulativeReturn {
    type Config = CumulativeReturnConfig;
    type Output = f64;

    const KIND: IndicatorKind = IndicatorKind::CumulativeReturn;

    fn with_backend(config: Self::Config, _backend: Backend) -> Self {
        Self {
            config,
            first: None,
            current: None,
        }
    }

    fn config(&self) -> &CumulativeReturnConfig {
        &self.config
    }

    fn update(&mut self, tick: &Tick) -> Result<Option<f64>, InputError> {
        let price = self.config.source.extract(tick)?;
        let first = *self.first.get_or_insert(price);
        self.current = Some(percent_change(first, price));
        Ok(self.current)
    }

    fn value(&self) -> Option<f64> {
        self.current
    }

    fn reset(&mut self) {
        self.first = None;
        self.current = None;
    }

    fn backend(&self) -> Backend {
        Backend::Fallback
    }
}

impl Display for CumulativeReturn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CR({})", self.config.source)
    }
}

/// Compounded return from summed log returns, in percent.
///
/// Steps involving a non-positive price contribute nothing, so the result
/// stays defined across gaps where [`CumulativeReturn`] would not.
#[derive(Clone, Debug)]
pub struct CompoundLogReturn {
    config: CompoundLogReturnConfig,
    prev: Option<Price>,
    log_sum: f64,
    current: Option<f64>,
}

impl Indicator for CompoundLogReturn {
    type Config = CompoundLogReturnConfig;
    type Output = f64;

    const KIND: IndicatorKind = IndicatorKind::CompoundLogReturn;

    fn with_backend(config: Self::Config, _backend: Backend) -> Self {
        Self {
            config,
            prev: None,
            log_sum: 0.0,
            current: None,
        }
    }

    fn config(&self) -> &CompoundLogReturnConfig {
        &self.config
    }

    fn update(&mut self, tick: &Tick) -> Result<Option<f64>, InputError> {
        let price = self.config.source.extract(tick)?;
        if let Some(prev) = self.prev.replace(price) {
            self.log_sum += log_return(prev, price);
        }
        self.current = Some(100.0 * self.log_sum.exp_m1());
        Ok(self.current)
    }

    fn value(&self) -> Option<f64> {
        self.current
    }

    fn reset(&mut self) {
        self.prev = None;
        self.log_sum = 0.0;
        self.current = None;
    }

    fn backend(&self) -> Backend {
        Backend::Fallback
    }
}

impl Display for CompoundLogReturn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CLR({})", self.config.source)
    }
}

/// Percentage change across the window, oldest retained value to newest.
#[derive(Clone, Debug)]
pub struct RollingReturn {
    config: RollingReturnConfig,
    prices: RingBuffer,
    current: Option<f64>,
}

impl Indicator for RollingReturn {
    type Config = RollingReturnConfig;
    type Output = f64;

    const KIND: IndicatorKind = IndicatorKind::RollingReturn;

    fn with_backend(config: Self::Config, _backend: Backend) -> Self {
        Self {
            config,
            prices: RingBuffer::new(config.window),
            current: None,
        }
    }

    fn config(&self) -> &RollingReturnConfig {
        &self.config
    }

    fn update(&mut self, tick: &Tick) -> Result<Option<f64>, InputError> {
        let price = self.config.source.extract(tick)?;
        self.prices.push(price);
        if self.prices.is_full()
            && let Some(oldest) = self.prices.oldest()
        {
            self.current = Some(percent_change(oldest, price));
        }
        Ok(self.current)
    }

    fn value(&self) -> Option<f64> {
        self.current
    }

    fn reset(&mut self) {
        self.prices.clear();
        self.current = None;
    }

    fn backend(&self) -> Backend {
        Backend::Fallback
    }
}

impl Display for RollingReturn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RR({}, {})", self.config.window, self.config.source)
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::test_util::{assert_near, feed_prices};

    mod daily {
        use super::*;

        #[test]
        fn percent_change_from_previous() {
            let mut ret = DailyReturn::new(DailyReturnConfig::default());
            let out = feed_prices(&mut ret, &[100.0, 110.0, 99.0]);
            assert_eq!(out[0], None);
            assert_near!(out[1].unwrap(), 10.0, 1e-12);
            assert_near!(out[2].unwrap(), -10.0, 1e-12);
        }

        #[test]
        fn zero_previous_is_zero() {
            let mut ret = DailyReturn::new(DailyReturnConfig::default());
            let out = feed_prices(&mut ret, &[0.0, 5.0]);
            assert_eq!(out[1], Some(0.0));
        }

        #[test]
        fn log_return_in_percent() {
            let mut ret = DailyLogReturn::new(DailyLogReturnConfig::default());
            let out = feed_prices(&mut ret, &[1.0, std::f64::consts::E]);
            assert_near!(out[1].unwrap(), 100.0, 1e-12);
        }

        #[test]
        fn log_return_of_non_positive_is_zero() {
            let mut ret = DailyLogReturn::new(DailyLogReturnConfig::default());
            let out = feed_prices(&mut ret, &[-1.0, 2.0, 0.0]);
            assert_eq!(out[1..], [Some(0.0), Some(0.0)]);
        }

        #[test]
        fn display() {
            assert_eq!(
                DailyReturn::new(DailyReturnConfig::default()).to_string(),
                "DR(Close)"
            );
            assert_eq!(
                DailyLogReturn::new(DailyLogReturnConfig::default()).to_string(),
                "DLR(Close)"
            );
        }
    }

    mod cumulative {
        use super::*;

        #[test]
        fn relative_to_first_price() {
            let mut ret = CumulativeReturn::new(CumulativeReturnConfig::default());
            let out = feed_prices(&mut ret, &[50.0, 55.0, 40.0]);
            assert_eq!(out[0], Some(0.0));
            assert_near!(out[1].unwrap(), 10.0, 1e-12);
            assert_near!(out[2].unwrap(), -20.0, 1e-12);
        }

        #[test]
        fn zero_first_price_is_zero() {
            let mut ret = CumulativeReturn::new(CumulativeReturnConfig::default());
            let out = feed_prices(&mut ret, &[0.0, 10.0]);
            assert_eq!(out[1], Some(0.0));
        }

        #[test]
        fn compound_matches_cumulative_on_positive_prices() {
            let prices = [50.0, 55.0, 40.0, 61.0];
            let mut simple = CumulativeReturn::new(CumulativeReturnConfig::default());
            let mut compound = CompoundLogReturn::new(CompoundLogReturnConfig::default());
            let simple = feed_prices(&mut simple, &prices);
            let compound = feed_prices(&mut compound, &prices);
            for (s, c) in simple.iter().zip(&compound) {
                assert_near!(s.unwrap(), c.unwrap(), 1e-9);
            }
        }

        #[test]
        fn compound_skips_non_positive_steps() {
            let mut ret = CompoundLogReturn::new(CompoundLogReturnConfig::default());
            let out = feed_prices(&mut ret, &[10.0, 0.0, 20.0]);
            assert_eq!(out, vec![Some(0.0), Some(0.0), Some(0.0)]);
        }

        #[test]
        fn reset_forgets_first_price() {
            let mut ret = CumulativeReturn::new(CumulativeReturnConfig::default());
            feed_prices(&mut ret, &[50.0, 100.0]);
            ret.reset();
            assert_eq!(ret.update(&Tick::price(10.0)), Ok(Some(0.0)));
        }
    }

    mod rolling {
        use super::*;

        #[test]
        fn spans_the_window() {
            let mut ret = RollingReturn::new(RollingReturnConfig::new(3).unwrap());
            let out = feed_prices(&mut ret, &[100.0, 1.0, 120.0, 150.0]);
            assert_eq!(out[1], None);
            assert_near!(out[2].unwrap(), 20.0, 1e-12);
            assert_near!(out[3].unwrap(), 14_900.0, 1e-9);
        }

        #[test]
        fn window_of_one_is_flat() {
            let mut ret = RollingReturn::new(RollingReturnConfig::new(1).unwrap());
            assert_eq!(ret.update(&Tick::price(7.0)), Ok(Some(0.0)));
        }

        #[test]
        fn display() {
            assert_eq!(
                RollingReturn::new(RollingReturnConfig::default()).to_string(),
                "RR(20, Close)"
            );
        }
    }
}
