use std::fmt::{Debug, Display};

use crate::{
    Backend, Indicator, IndicatorKind, InputError, Price, Schema, Tick,
    config::window_config,
    rolling::{Seed, Smoother},
};

/// Largest of `high − low`, `|high − prev close|` and `|low − prev close|`;
/// plain `high − low` without a previous close.
#[inline]
pub(crate) fn true_range(high: Price, low: Price, prev_close: Option<Price>) -> Price {
    match prev_close {
        Some(prev) => high.max(prev) - low.min(prev),
        None => high - low,
    }
}

window_config!(
    /// Configuration for the Average True Range ([`Atr`]) indicator.
    ///
    /// Defaults: window 14.
    ///
    /// # Example
    ///
    /// ```
    /// use quantedge_stream::{AtrConfig, IndicatorConfig, Schema};
    ///
    /// let config = AtrConfig::new(10).unwrap();
    /// assert_eq!(config.required_ticks(), 10);
    /// assert_eq!(config.schema(), Schema::HLC);
    /// ```
    AtrConfig, AtrConfigBuilder,
    window: 14,
    schema: Schema::HLC,
    required_ticks: |window| window,
);

/// Average True Range (ATR), Wilder's smoothing of the true range.
///
/// The first tick contributes `high − low`. The average is seeded with
/// the mean of the first `window` true ranges, then
///
/// ```text
/// ATR = ATR' + (TR − ATR') / window
/// ```
#[derive(Clone, Debug)]
pub struct Atr {
    config: AtrConfig,
    smoother: Smoother,
    prev_close: Option<Price>,
}

impl Atr {
    #[inline]
    fn push(&mut self, high: Price, low: Price, close: Price) -> Option<Price> {
        let range = true_range(high, low, self.prev_close);
        self.prev_close = Some(close);
        self.smoother.push(range)
    }
}

impl Indicator for Atr {
    type Config = AtrConfig;
    type Output = Price;

    const KIND: IndicatorKind = IndicatorKind::Atr;

    fn with_backend(config: Self::Config, _backend: Backend) -> Self {
        Self {
            config,
            smoother: Smoother::wilder(config.window, Seed::Mean),
            prev_close: None,
        }
    }

    fn config(&self) -> &AtrConfig {
        &self.config
    }

    fn update(&mut self, tick: &Tick) -> Result<Option<Price>, InputError> {
        let (high, low, close) = tick.hlc_values()?;
        Ok(self.push(high, low, close))
    }

    fn value(&self) -> Option<Price> {
        self.smoother.value()
    }

    fn reset(&mut self) {
        self.smoother.reset();
        self.prev_close = None;
    }

    fn backend(&self) -> Backend {
        Backend::Fallback
    }
}

impl Display for Atr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ATR({})", self.config.window)
    }
}
