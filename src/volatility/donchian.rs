use std::fmt::{Debug, Display};

use super::BandsValue;
use crate::{
    Backend, Indicator, IndicatorKind, InputError, Price, Schema, Tick, backend,
    config::window_config, error::BackendConstructionError, rolling::WindowExtremum,
};

window_config!(
    /// Configuration for the [`DonchianChannel`].
    ///
    /// Defaults: window 20.
    DonchianChannelConfig, DonchianChannelConfigBuilder,
    window: 20,
    schema: Schema::HL,
    required_ticks: |window| window,
);

window_config!(
    /// Configuration for the high-low [`Range`] indicator.
    ///
    /// Defaults: window 20.
    RangeConfig, RangeConfigBuilder,
    window: 20,
    schema: Schema::HL,
    required_ticks: |window| window,
);

/// Highest high and lowest low over a window.
#[derive(Clone, Debug)]
struct HighLowWindow {
    highs: WindowExtremum,
    lows: WindowExtremum,
}

impl HighLowWindow {
    fn new(backend: Backend, window: usize) -> Result<Self, BackendConstructionError> {
        Ok(Self {
            highs: WindowExtremum::max(backend, window)?,
            lows: WindowExtremum::min(backend, window)?,
        })
    }

    fn push(&mut self, high: Price, low: Price) -> Option<(Price, Price)> {
        let highest = self.highs.push(high);
        let lowest = self.lows.push(low);
        Some((highest?.value, lowest?.value))
    }

    fn clear(&mut self) {
        self.highs.clear();
        self.lows.clear();
    }
}

/// Donchian Channel: the highest high and lowest low of the window, with
/// their midpoint as the middle line.
///
/// # Example
///
/// ```
/// use quantedge_stream::{DonchianChannel, DonchianChannelConfig, Tick};
///
/// let mut dc = DonchianChannel::new(DonchianChannelConfig::new(2).unwrap());
/// dc.update(&Tick::hlc(12.0, 9.0, 10.0)).unwrap();
/// let value = dc.update(&Tick::hlc(11.0, 7.0, 8.0)).unwrap().unwrap();
/// assert_eq!((value.upper(), value.middle(), value.lower()), (12.0, 9.5, 7.0));
/// ```
#[derive(Clone, Debug)]
pub struct DonchianChannel {
    config: DonchianChannelConfig,
    backend: Backend,
    window: HighLowWindow,
    current: Option<BandsValue>,
}

impl Indicator for DonchianChannel {
    type Config = DonchianChannelConfig;
    type Output = BandsValue;

    const KIND: IndicatorKind = IndicatorKind::DonchianChannel;

    fn with_backend(config: Self::Config, backend: Backend) -> Self {
        backend::construct(Self::KIND, backend, |backend| {
            Ok(Self {
                config,
                backend,
                window: HighLowWindow::new(backend, config.window)?,
                current: None,
            })
        })
    }

    fn config(&self) -> &DonchianChannelConfig {
        &self.config
    }

    fn update(&mut self, tick: &Tick) -> Result<Option<BandsValue>, InputError> {
        let (high, low) = tick.hl()?;

        if let Some((highest, lowest)) = self.window.push(high, low) {
            self.current = Some(BandsValue::new(
                highest,
                (highest + lowest) / 2.0,
                lowest,
            ));
        }

        Ok(self.current)
    }

    fn value(&self) -> Option<BandsValue> {
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

impl Display for DonchianChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DC({})", self.config.window)
    }
}

/// Width of the trading range: highest high minus lowest low of the window.
#[derive(Clone, Debug)]
pub struct Range {
    config: RangeConfig,
    backend: Backend,
    window: HighLowWindow,
    current: Option<Price>,
}

impl Indicator for Range {
    type Config = RangeConfig;
    type Output = Price;

    const KIND: IndicatorKind = IndicatorKind::Range;

    fn with_backend(config: Self::Config, backend: Backend) -> Self {
        backend::construct(Self::KIND, backend, |backend| {
            Ok(Self {
                config,
                backend,
                window: HighLowWindow::new(backend, config.window)?,
                current: None,
            })
        })
    }

    fn config(&self) -> &RangeConfig {
        &self.config
    }

    fn update(&mut self, tick: &Tick) -> Result<Option<Price>, InputError> {
        let (high, low) = tick.hl()?;

        if let Some((highest, lowest)) = self.window.push(high, low) {
            self.current = Some(highest - lowest);
        }

        Ok(self.current)
    }

    fn value(&self) -> Option<Price> {
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

impl Display for Range {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Range({})", self.config.window)
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::test_util::{feed, hlc, walk};

    mod donchian {
        use super::*;

        #[test]
        fn tracks_extremes_as_they_leave() {
            let mut dc = DonchianChannel::new(DonchianChannelConfig::new(2).unwrap());
            let out = feed(
                &mut dc,
                &[
                    hlc(15.0, 5.0, 10.0),
                    hlc(12.0, 8.0, 10.0),
                    // the 15/5 bar has left the window
                    hlc(11.0, 9.0, 10.0),
                ],
            );
            assert_eq!(out[1], Some(BandsValue::new(15.0, 10.0, 5.0)));
            assert_eq!(out[2], Some(BandsValue::new(12.0, 10.0, 8.0)));
        }

        #[test]
        fn backends_agree() {
            let ticks = walk(100);
            let config = DonchianChannelConfig::new(7).unwrap();
            let mut native = DonchianChannel::with_backend(config, Backend::Native);
            let mut fallback = DonchianChannel::with_backend(config, Backend::Fallback);
            assert_eq!(feed(&mut native, &ticks), feed(&mut fallback, &ticks));
        }

        #[test]
        fn display() {
            assert_eq!(
                DonchianChannel::new(DonchianChannelConfig::default()).to_string(),
                "DC(20)"
            );
        }
    }

    mod range {
        use super::*;

        #[test]
        fn highest_high_minus_lowest_low() {
            let mut range = Range::new(RangeConfig::new(2).unwrap());
            let out = feed(&mut range, &[hlc(15.0, 5.0, 10.0), hlc(12.0, 8.0, 10.0)]);
            assert_eq!(out, vec![None, Some(10.0)]);
        }

        #[test]
        fn flat_bars_have_zero_range() {
            let mut range = Range::new(RangeConfig::new(3).unwrap());
            let out = feed(&mut range, &[hlc(4.0, 4.0, 4.0); 3]);
            assert_eq!(out[2], Some(0.0));
        }

        #[test]
        fn requires_low() {
            let mut range = Range::new(RangeConfig::new(1).unwrap());
            assert!(range.update(&Tick::price(1.0).with_high(2.0)).is_err());
        }

        #[test]
        fn display() {
            assert_eq!(Range::new(RangeConfig::default()).to_string(), "Range(20)");
        }
    }
}
