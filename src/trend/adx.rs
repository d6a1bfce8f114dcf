use std::fmt::{Debug, Display};

use crate::{
    Backend, Indicator, IndicatorKind, InputError, Schema, Tick,
    config::window_config,
    rolling::{Seed, Smoother},
    volatility::true_range,
};

window_config!(
    /// Configuration for the Average Directional Index ([`Adx`]) indicator.
    ///
    /// Defaults: window 14. Needs high, low and close.
    AdxConfig, AdxConfigBuilder,
    window: 14,
    schema: Schema::HLC,
    required_ticks: |window| 2 * window,
);

/// ADX output: trend strength and the two directional indicators.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AdxValue {
    adx: f64,
    plus_di: f64,
    minus_di: f64,
}

impl AdxValue {
    #[must_use]
    pub fn new(adx: f64, plus_di: f64, minus_di: f64) -> Self {
        Self {
            adx,
            plus_di,
            minus_di,
        }
    }

    /// Wilder-smoothed DX, 0..100.
    #[inline]
    #[must_use]
    pub fn adx(&self) -> f64 {
        self.adx
    }

    /// +DI, 0..100.
    #[inline]
    #[must_use]
    pub fn plus_di(&self) -> f64 {
        self.plus_di
    }

    /// −DI, 0..100.
    #[inline]
    #[must_use]
    pub fn minus_di(&self) -> f64 {
        self.minus_di
    }
}

impl Display for AdxValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ADX(adx: {}, +di: {}, -di: {})",
            self.adx, self.plus_di, self.minus_di
        )
    }
}

/// Average Directional Index (ADX) with Wilder's smoothing.
///
/// From the second tick on, true range and directional movement are
/// smoothed with Wilder's method (SMA seed over `window` changes):
///
/// ```text
/// +DM = high − high'   if it exceeds low' − low and is positive, else 0
/// −DM = low' − low     if it exceeds high − high' and is positive, else 0
/// ±DI = 100 × smoothed ±DM / smoothed TR        (TR 0 → 0)
/// DX  = 100 × |+DI − −DI| / (+DI + −DI)         (sum 0 → 0)
/// ADX = Wilder(DX)
/// ```
///
/// DI values exist from tick `window + 1`; ADX from tick `2 × window`.
#[derive(Clone, Debug)]
pub struct Adx {
    config: AdxConfig,
    prev: Option<(f64, f64, f64)>,
    true_range: Smoother,
    plus_dm: Smoother,
    minus_dm: Smoother,
    dx: Smoother,
    current: Option<AdxValue>,
}

fn directional_movement(high: f64, low: f64, prev_high: f64, prev_low: f64) -> (f64, f64) {
    let up = high - prev_high;
    let down = prev_low - low;

    let plus = if up > down && up > 0.0 { up } else { 0.0 };
    let minus = if down > up && down > 0.0 { down } else { 0.0 };

    (plus, minus)
}

fn ratio_percent(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        100.0 * numerator / denominator
    }
}

impl Indicator for Adx {
    type Config = AdxConfig;
    type Output = AdxValue;

    const KIND: IndicatorKind = IndicatorKind::Adx;

    fn with_backend(config: Self::Config, _backend: Backend) -> Self {
        let window = config.window;
        Self {
            config,
            prev: None,
            true_range: Smoother::wilder(window, Seed::Mean),
            plus_dm: Smoother::wilder(window, Seed::Mean),
            minus_dm: Smoother::wilder(window, Seed::Mean),
            dx: Smoother::wilder(window, Seed::Mean),
            current: None,
        }
    }

    fn config(&self) -> &AdxConfig {
        &self.config
    }

    fn update(&mut self, tick: &Tick) -> Result<Option<AdxValue>, InputError> {
        let (high, low, close) = tick.hlc_values()?;

        let Some((prev_high, prev_low, prev_close)) = self.prev.replace((high, low, close)) else {
            return Ok(None);
        };

        let (plus, minus) = directional_movement(high, low, prev_high, prev_low);
        let tr = self.true_range.push(true_range(high, low, Some(prev_close)));
        let plus = self.plus_dm.push(plus);
        let minus = self.minus_dm.push(minus);

        if let (Some(tr), Some(plus), Some(minus)) = (tr, plus, minus) {
            let plus_di = ratio_percent(plus, tr);
            let minus_di = ratio_percent(minus, tr);
            let dx = ratio_percent((plus_di - minus_di).abs(), plus_di + minus_di);

            self.current = self
                .dx
                .push(dx)
                .map(|adx| AdxValue::new(adx, plus_di, minus_di));
        }

        Ok(self.current)
    }

    fn value(&self) -> Option<AdxValue> {
        self.current
    }

    fn reset(&mut self) {
        self.prev = None;
        self.true_range.reset();
        self.plus_dm.reset();
        self.minus_dm.reset();
        self.dx.reset();
        self.current = None;
    }

    fn backend(&self) -> Backend {
        Backend::Fallback
    }
}

impl Display for Adx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ADX({})", self.config.window)
    }
}
