#![allow(dead_code)]

pub mod bulk;

use quantedge_stream::{Ohlcv, Price, Tick};
use serde::{Deserialize, de::DeserializeOwned};

/// Hourly OHLCV bar parsed from the fixture CSV.
#[derive(Debug, Clone, Deserialize)]
pub struct RefBar {
    pub open_time: u64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Ohlcv for RefBar {
    fn open(&self) -> Price {
        self.open
    }

    fn high(&self) -> Price {
        self.high
    }

    fn low(&self) -> Price {
        self.low
    }

    fn close(&self) -> Price {
        self.close
    }

    fn volume(&self) -> Option<f64> {
        Some(self.volume)
    }
}

const OHLCV_PATH: &str = "tests/fixtures/data/ohlcv-1h.csv";

/// Load the fixture bars.
pub fn load_reference_ohlcvs() -> Vec<RefBar> {
    load_records(OHLCV_PATH, "invalid OHLCV record")
}

/// Fixture bars as full OHLCV ticks.
pub fn load_ticks() -> Vec<Tick> {
    load_reference_ohlcvs().iter().map(Tick::from).collect()
}

/// Column views of the fixture, for the bulk references.
pub struct Series {
    pub high: Vec<f64>,
    pub low: Vec<f64>,
    pub close: Vec<f64>,
    pub volume: Vec<f64>,
}

pub fn load_series() -> Series {
    let bars = load_reference_ohlcvs();
    Series {
        high: bars.iter().map(|bar| bar.high).collect(),
        low: bars.iter().map(|bar| bar.low).collect(),
        close: bars.iter().map(|bar| bar.close).collect(),
        volume: bars.iter().map(|bar| bar.volume).collect(),
    }
}

/// Streaming/bulk tolerance: `max(1e-6 × |expected|, 1e-9)`.
pub fn tolerance(expected: f64) -> f64 {
    (expected.abs() * 1e-6).max(1e-9)
}

/// Assert two f64 values are within tolerance.
pub fn assert_near(actual: f64, expected: f64, tolerance: f64, context: &str) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= tolerance,
        "{context}: expected {expected:.10}, got {actual:.10}, diff {diff:.2e} > tolerance {tolerance:.2e}"
    );
}

/// Assert a streamed series matches its bulk reference bar by bar,
/// readiness included.
pub fn assert_series_match(name: &str, streamed: &[Option<f64>], reference: &[Option<f64>]) {
    assert_eq!(streamed.len(), reference.len(), "{name}: length mismatch");

    for (i, (s, r)) in streamed.iter().zip(reference).enumerate() {
        match (s, r) {
            (None, None) => {}
            (Some(s), Some(r)) => assert_near(*s, *r, tolerance(*r), &format!("{name} at bar {i}")),
            (s, r) => panic!("{name}: readiness mismatch at bar {i}: streamed={s:?}, bulk={r:?}"),
        }
    }
}

/// Generate a streaming-vs-bulk test for a single-value indicator, or for
/// one component of a multi-valued one.
///
/// Usage: `reference_test!(sma_20, Sma::new(SmaConfig::new(20).unwrap()), |s| bulk::sma(&s.close, 20));`
/// or `reference_test!(adx_line, Adx::new(AdxConfig::default()), |v| v.adx(), |s| ...);`
#[allow(unused_macros)]
macro_rules! reference_test {
    ($name:ident, $indicator:expr, |$value:ident| $project:expr, |$series:ident| $reference:expr) => {
        #[test]
        fn $name() {
            let ticks = load_ticks();
            let $series = load_series();
            let mut indicator = $indicator;

            let streamed: Vec<Option<f64>> = ticks
                .iter()
                .map(|tick| indicator.update(tick).unwrap().map(|$value| $project))
                .collect();
            let reference: Vec<Option<f64>> = $reference;

            assert!(
                reference.iter().any(Option::is_some),
                "{}: reference never ready",
                stringify!($name)
            );
            assert_series_match(stringify!($name), &streamed, &reference);
        }
    };
    ($name:ident, $indicator:expr, |$series:ident| $reference:expr) => {
        #[test]
        fn $name() {
            let ticks = load_ticks();
            let $series = load_series();
            let mut indicator = $indicator;

            let streamed: Vec<Option<f64>> = ticks
                .iter()
                .map(|tick| indicator.update(tick).unwrap())
                .collect();
            let reference: Vec<Option<f64>> = $reference;

            assert!(
                reference.iter().any(Option::is_some),
                "{}: reference never ready",
                stringify!($name)
            );
            assert_series_match(stringify!($name), &streamed, &reference);
        }
    };
}

#[allow(unused_imports)]
pub(crate) use reference_test;

fn load_records<D>(path: &str, expect_msg: &str) -> Vec<D>
where
    D: DeserializeOwned,
{
    let mut rdr =
        csv::Reader::from_path(path).unwrap_or_else(|e| panic!("failed to open {path}: {e}"));

    rdr.deserialize().map(|r| r.expect(expect_msg)).collect()
}
