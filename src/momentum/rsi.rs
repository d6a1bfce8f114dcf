use std::fmt::Display;

use crate::{
    Backend, Indicator, IndicatorKind, InputError, Price, PriceSource, Tick,
    config::window_config,
};

window_config!(
    /// Configuration for the Relative Strength Index ([`Rsi`])
    /// indicator.
    ///
    /// RSI uses Wilder's smoothing, which has infinite memory: the
    /// SMA seed (first `window` price changes) influences all
    /// subsequent values. Output begins at tick `window + 1`.
    ///
    /// # Example
    ///
    /// ```
    /// use quantedge_stream::{IndicatorConfig, RsiConfig};
    ///
    /// let config = RsiConfig::new(14).unwrap();
    /// assert_eq!(config.window(), 14);
    /// assert_eq!(config.required_ticks(), 15);
    /// ```
    RsiConfig, RsiConfigBuilder,
    window: 14,
    source: PriceSource::Close,
    required_ticks: |window| window + 1,
);

#[derive(Clone, Debug)]
enum RsiPhase {
    Seeding {
        sum_gain: f64,
        sum_loss: f64,
        changes: usize,
    },
    Active {
        avg_gain: f64,
        avg_loss: f64,
    },
}

const SEEDING: RsiPhase = RsiPhase::Seeding {
    sum_gain: 0.0,
    sum_loss: 0.0,
    changes: 0,
};

/// Relative Strength Index (RSI) with Wilder's smoothing.
///
/// Measures the speed and magnitude of recent price changes on
/// a 0–100 scale. Values above 70 are conventionally considered
/// overbought; below 30, oversold.
///
/// The first `window` price changes are averaged with a simple
/// mean (SMA seed). After seeding, gains and losses are smoothed
/// with Wilder's method (`α = 1 / window`):
///
/// ```text
/// avg_gain = (prev_avg_gain × (window − 1) + gain) / window
/// avg_loss = (prev_avg_loss × (window − 1) + loss) / window
/// RSI      = 100 × avg_gain / (avg_gain + avg_loss)
/// ```
///
/// An average loss of zero saturates the output at exactly 100.
///
/// # Example
///
/// ```
/// use quantedge_stream::{Rsi, RsiConfig, Tick};
///
/// let mut rsi = Rsi::new(RsiConfig::new(3).unwrap());
///
/// // Seeding: need 3 price changes (4 ticks)
/// assert_eq!(rsi.update(&Tick::price(10.0)), Ok(None));
/// assert_eq!(rsi.update(&Tick::price(12.0)), Ok(None));
/// assert_eq!(rsi.update(&Tick::price(11.0)), Ok(None));
///
/// // Tick 4: changes = +2, −1, +2 → avg_gain=4/3, avg_loss=1/3 → RSI=80
/// let value = rsi.update(&Tick::price(13.0)).unwrap().unwrap();
/// assert!((value - 80.0).abs() < 1e-10);
/// ```
#[derive(Clone, Debug)]
pub struct Rsi {
    config: RsiConfig,
    prev_price: Option<Price>,
    phase: RsiPhase,
    current: Option<Price>,
    window_reciprocal: f64,
    window_minus_one: f64,
}

impl Indicator for Rsi {
    type Config = RsiConfig;
    type Output = Price;

    const KIND: IndicatorKind = IndicatorKind::Rsi;

    fn with_backend(config: Self::Config, _backend: Backend) -> Self {
        Self {
            config,
            prev_price: None,
            phase: SEEDING,
            current: None,
            #[allow(clippy::cast_precision_loss)]
            window_reciprocal: 1.0 / config.window as f64,
            #[allow(clippy::cast_precision_loss)]
            window_minus_one: (config.window - 1) as f64,
        }
    }

    fn config(&self) -> &RsiConfig {
        &self.config
    }

    #[inline]
    fn update(&mut self, tick: &Tick) -> Result<Option<Price>, InputError> {
        let price = self.config.source.extract(tick)?;
        Ok(self.push(price))
    }

    #[inline]
    fn value(&self) -> Option<Price> {
        self.current
    }

    fn reset(&mut self) {
        self.prev_price = None;
        self.phase = SEEDING;
        self.current = None;
    }

    fn backend(&self) -> Backend {
        Backend::Fallback
    }
}

impl Rsi {
    /// Advances on a raw price, bypassing tick extraction.
    #[inline]
    pub(crate) fn push(&mut self, price: Price) -> Option<Price> {
        // first tick: no change yet
        let prev_price = self.prev_price.replace(price)?;
        let (gain, loss) = Self::gain_and_loss(prev_price, price);

        self.current = match &mut self.phase {
            RsiPhase::Seeding {
                sum_gain,
                sum_loss,
                changes,
            } => {
                *sum_gain += gain;
                *sum_loss += loss;
                *changes += 1;

                if *changes == self.config.window {
                    // Seeding complete: output SMA-based RSI
                    let avg_gain = *sum_gain * self.window_reciprocal;
                    let avg_loss = *sum_loss * self.window_reciprocal;
                    self.phase = RsiPhase::Active { avg_gain, avg_loss };
                    Some(Self::rsi_from_averages(avg_gain, avg_loss))
                } else {
                    None
                }
            }

            RsiPhase::Active { avg_gain, avg_loss } => {
                *avg_gain = avg_gain.mul_add(self.window_minus_one, gain) * self.window_reciprocal;
                *avg_loss = avg_loss.mul_add(self.window_minus_one, loss) * self.window_reciprocal;

                Some(Self::rsi_from_averages(*avg_gain, *avg_loss))
            }
        };

        self.current
    }

    #[inline]
    fn gain_and_loss(prev_price: Price, price: Price) -> (Price, Price) {
        let change = price - prev_price;
        let gain = change.max(0.0);
        let loss = (-change).max(0.0);

        (gain, loss)
    }

    #[inline]
    fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
        if avg_loss == 0.0 {
            100.0
        } else {
            100.0 * avg_gain / (avg_gain + avg_loss)
        }
    }
}

impl Display for Rsi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RSI({}, {})", self.config.window, self.config.source)
    }
}
