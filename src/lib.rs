//! Streaming technical analysis indicators for Rust.
//!
//! Every indicator is a state machine fed one [`Tick`] at a time. Values
//! are `None` until [`required_ticks`](IndicatorConfig::required_ticks)
//! ticks have been accepted, and each update costs O(1) amortized (a few
//! indicators scan their window, see their docs).
//!
//! Each indicator type ([`Sma`], [`Rsi`], [`BollingerBands`], …) exposes
//! [`new`](Sma::new), [`update`](Sma::update), and [`value`](Sma::value)
//! as inherent methods, so no trait import is needed. Import [`Indicator`]
//! only for generic code.
//!
//! Kinds are also available dynamically through [`IndicatorKind`] and
//! [`AnyIndicator`], and a whole category can be fed at once with a
//! [`StrategyGroup`].
//!
//! # Backends
//!
//! Window-based kinds run either on incremental native kernels or on a
//! straightforward fallback. The choice is made once per process, see
//! [`active_backend`] and [`DISABLE_NATIVE_ENV`].
//!
//! # Example
//!
//! ```
//! use quantedge_stream::{BollingerBands, BollingerBandsConfig, Tick};
//!
//! let mut bb = BollingerBands::new(BollingerBandsConfig::new(3).unwrap());
//! for close in [10.0, 11.0, 12.0] {
//!     bb.update(&Tick::price(close)).unwrap();
//! }
//! let bands = bb.value().unwrap();
//! assert_eq!(bands.middle(), 11.0);
//! assert!(bands.upper() > bands.middle());
//! ```

mod any;
mod backend;
mod config;
mod error;
mod indicator;
mod kind;
mod momentum;
mod ohlcv;
mod others;
mod price_source;
mod rolling;
mod strategy;
mod tick;
mod trend;
mod value;
mod volatility;
mod volume;

pub use crate::any::AnyIndicator;
pub use crate::backend::{
    Backend, BackendHandle, DISABLE_NATIVE_ENV, active_backend, backend_handle,
    is_native_available, reset_backend, resolve_backend_with,
};
pub use crate::config::{MAX_WINDOW, Params};
pub use crate::error::{ConstructionError, InputError};
pub use crate::indicator::{Indicator, IndicatorConfig, IndicatorConfigBuilder};
pub use crate::kind::{Category, IndicatorKind};
pub use crate::ohlcv::{Ohlcv, Price};
pub use crate::price_source::PriceSource;
pub use crate::strategy::{MemberFailure, StrategyGroup, StrategyGroupBuilder, TickReport};
pub use crate::tick::{Field, Schema, Tick};
pub use crate::value::IndicatorValue;

pub use crate::momentum::*;
pub use crate::others::*;
pub use crate::trend::*;
pub use crate::volatility::*;
pub use crate::volume::*;

macro_rules! impl_indicator_methods {
    ($($type:ty),* $(,)?) => {
        $(
            impl $type {
                /// See [`Indicator::new`].
                #[must_use]
                pub fn new(config: <Self as Indicator>::Config) -> Self {
                    <Self as Indicator>::new(config)
                }

                /// See [`Indicator::update`].
                ///
                /// # Errors
                ///
                /// See [`Indicator::update`].
                #[inline]
                pub fn update(
                    &mut self,
                    tick: &Tick,
                ) -> Result<Option<<Self as Indicator>::Output>, InputError> {
                    <Self as Indicator>::update(self, tick)
                }

                /// See [`Indicator::value`].
                #[must_use]
                #[inline]
                pub fn value(&self) -> Option<<Self as Indicator>::Output> {
                    <Self as Indicator>::value(self)
                }
            }
        )*
    };
}

impl_indicator_methods!(
    Sma,
    Ema,
    Wma,
    Macd,
    Adx,
    Cci,
    Dpo,
    Vortex,
    Trix,
    Aroon,
    Psar,
    Rsi,
    Stochastic,
    WilliamsR,
    Roc,
    Ppo,
    Pvo,
    UltimateOscillator,
    StochRsi,
    Tsi,
    AwesomeOscillator,
    Kama,
    Momentum,
    Atr,
    BollingerBands,
    KeltnerChannel,
    DonchianChannel,
    UlcerIndex,
    StdDev,
    Variance,
    Range,
    HistoricalVolatility,
    Mfi,
    Adi,
    Obv,
    Cmf,
    ForceIndex,
    Eom,
    Vpt,
    Nvi,
    Vwap,
    Vwema,
    VolumeRatio,
    DailyReturn,
    DailyLogReturn,
    CumulativeReturn,
    CompoundLogReturn,
    RollingReturn,
    MaxDrawdown,
    SharpeRatio,
    CalmarRatio,
    ZScore,
    LinearRegressionSlope,
    RollingPercentile,
);

#[cfg(test)]
mod test_util;
