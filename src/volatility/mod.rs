//! Volatility indicators: range, dispersion and channel width.

mod atr;
mod bb;
mod donchian;
mod historical_volatility;
mod keltner;
mod std_dev;
mod ulcer;

pub(crate) use atr::true_range;

pub use atr::{Atr, AtrConfig, AtrConfigBuilder};
pub use bb::{BandsValue, BollingerBands, BollingerBandsConfig, BollingerBandsConfigBuilder};
pub use donchian::{
    DonchianChannel, DonchianChannelConfig, DonchianChannelConfigBuilder, Range, RangeConfig,
    RangeConfigBuilder,
};
pub use historical_volatility::{
    HistoricalVolatility, HistoricalVolatilityConfig, HistoricalVolatilityConfigBuilder,
};
pub use keltner::{KeltnerChannel, KeltnerChannelConfig, KeltnerChannelConfigBuilder};
pub use std_dev::{
    StdDev, StdDevConfig, StdDevConfigBuilder, Variance, VarianceConfig, VarianceConfigBuilder,
};
pub use ulcer::{UlcerIndex, UlcerIndexConfig, UlcerIndexConfigBuilder};
