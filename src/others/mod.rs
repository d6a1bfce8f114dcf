mod drawdown;
mod percentile;
mod regression;
mod returns;
mod sharpe;
mod z_score;

pub(crate) use returns::log_return;

pub use drawdown::{
    CalmarRatio, CalmarRatioConfig, CalmarRatioConfigBuilder, MaxDrawdown, MaxDrawdownConfig,
    MaxDrawdownConfigBuilder,
};
pub use percentile::{RollingPercentile, RollingPercentileConfig, RollingPercentileConfigBuilder};
pub use regression::{
    LinearRegressionSlope, LinearRegressionSlopeConfig, LinearRegressionSlopeConfigBuilder,
};
pub use returns::{
    CompoundLogReturn, CompoundLogReturnConfig, CompoundLogReturnConfigBuilder, CumulativeReturn,
    CumulativeReturnConfig, CumulativeReturnConfigBuilder, DailyLogReturn, DailyLogReturnConfig,
    DailyLogReturnConfigBuilder, DailyReturn, DailyReturnConfig, DailyReturnConfigBuilder,
    RollingReturn, RollingReturnConfig, RollingReturnConfigBuilder,
};
pub use sharpe::{SharpeRatio, SharpeRatioConfig, SharpeRatioConfigBuilder};
pub use z_score::{ZScore, ZScoreConfig, ZScoreConfigBuilder};
