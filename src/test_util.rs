// src/test_util.rs

use crate::{Indicator, Price, Tick};

/// Asserts that two `f64` values are approximately equal using a
/// relative epsilon of `4 * f64::EPSILON`.
macro_rules! assert_approx {
    ($actual:expr, $expected:expr) => {{
        let (a, e) = ($actual, $expected);
        assert!(
            (a - e).abs() <= e.abs() * 4.0 * f64::EPSILON,
            "assert_approx failed: actual={a}, expected={e}, diff={}",
            (a - e).abs(),
        );
    }};
}

/// Asserts that two `f64` values are within an absolute tolerance.
macro_rules! assert_near {
    ($actual:expr, $expected:expr, $tolerance:expr) => {{
        let (a, e, t) = ($actual, $expected, $tolerance);
        assert!(
            (a - e).abs() <= t,
            "assert_near failed: actual={a}, expected={e}, diff={}",
            (a - e).abs(),
        );
    }};
}

pub(crate) use {assert_approx, assert_near};

/// Convenience: close-only tick.
pub fn price(close: Price) -> Tick {
    Tick::price(close)
}

/// Convenience: high/low/close tick.
pub fn hlc(high: Price, low: Price, close: Price) -> Tick {
    Tick::hlc(high, low, close)
}

/// Convenience: high/low/close/volume tick.
pub fn hlcv(high: Price, low: Price, close: Price, volume: f64) -> Tick {
    Tick::hlcv(high, low, close, volume)
}

/// Feeds every tick and collects the outputs, panicking on input errors.
pub fn feed<I: Indicator>(indicator: &mut I, ticks: &[Tick]) -> Vec<Option<I::Output>> {
    ticks
        .iter()
        .map(|tick| indicator.update(tick).unwrap())
        .collect()
}

/// Feeds close prices and collects the outputs.
pub fn feed_prices<I: Indicator>(indicator: &mut I, prices: &[Price]) -> Vec<Option<I::Output>> {
    let ticks: Vec<Tick> = prices.iter().copied().map(Tick::price).collect();
    feed(indicator, &ticks)
}

/// Deterministic synthetic OHLCV walk for state-machine tests.
pub fn walk(len: usize) -> Vec<Tick> {
    let mut close = 100.0;
    (0..len)
        .map(|i| {
            #[allow(clippy::cast_precision_loss)]
            let step = ((i as f64) * 0.7).sin() * 1.3 + ((i as f64) * 0.13).cos() * 0.4;
            let open = close;
            close += step;
            let high = open.max(close) + 0.25 + ((i % 3) as f64) * 0.1;
            let low = open.min(close) - 0.2 - ((i % 4) as f64) * 0.05;
            let volume = 1_000.0 + ((i * 37) % 400) as f64;
            Tick::ohlcv(open, high, low, close, volume)
        })
        .collect()
}
