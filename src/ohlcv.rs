/// A price value.
///
/// Semantic alias for [`f64`]. Documents intent in function signatures
/// without introducing newtype construction overhead.
pub type Price = f64;

/// OHLCV bar data that converts into a [`Tick`](crate::Tick).
///
/// Implement this on your own kline/candle type and pass `&bar` wherever an
/// indicator expects a tick: `Tick::from(&bar)` copies every field, so the
/// resulting tick satisfies any indicator schema (volume permitting).
///
/// # Example
///
/// ```
/// use quantedge_stream::{Ohlcv, Price, Tick};
///
/// struct MyKline {
///     o: f64, h: f64, l: f64, c: f64, v: f64,
/// }
///
/// impl Ohlcv for MyKline {
///     fn open(&self) -> Price { self.o }
///     fn high(&self) -> Price { self.h }
///     fn low(&self) -> Price { self.l }
///     fn close(&self) -> Price { self.c }
///     fn volume(&self) -> Option<f64> { Some(self.v) }
/// }
///
/// let tick = Tick::from(&MyKline { o: 1.0, h: 2.0, l: 0.5, c: 1.5, v: 10.0 });
/// assert_eq!(tick.volume(), Some(10.0));
/// ```
pub trait Ohlcv {
    /// Opening price of the bar.
    fn open(&self) -> Price;

    /// Highest price during the bar.
    fn high(&self) -> Price;

    /// Lowest price during the bar.
    fn low(&self) -> Price;

    /// Closing (or latest) price of the bar.
    fn close(&self) -> Price;

    /// Trade volume during the bar. Defaults to `None`.
    ///
    /// Override this for volume-dependent indicators (OBV, MFI, VWAP).
    fn volume(&self) -> Option<f64> {
        None
    }
}
