use strum::IntoEnumIterator;

/// Indicator family an [`IndicatorKind`] belongs to, and the token a
/// [`StrategyGroup`](crate::StrategyGroup) is built from.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::IntoStaticStr,
    strum::EnumIter,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Category {
    Trend,
    Momentum,
    Volatility,
    Volume,
    Others,
    /// Every kind, in category order.
    All,
}

impl Category {
    /// Kinds of this category in canonical order.
    pub fn members(self) -> impl Iterator<Item = IndicatorKind> {
        IndicatorKind::iter().filter(move |kind| self == Self::All || kind.category() == self)
    }
}

/// Closed set of indicator kinds.
///
/// Parses from and displays as snake_case names (`"sma"`, `"williams_r"`,
/// `"bollinger_bands"`).
///
/// # Example
///
/// ```
/// use quantedge_stream::{Category, IndicatorKind};
///
/// let kind: IndicatorKind = "stoch_rsi".parse().unwrap();
/// assert_eq!(kind, IndicatorKind::StochRsi);
/// assert_eq!(kind.category(), Category::Momentum);
/// assert_eq!(IndicatorKind::WilliamsR.to_string(), "williams_r");
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
    strum::IntoStaticStr,
    strum::EnumIter,
)]
#[strum(serialize_all = "snake_case")]
pub enum IndicatorKind {
    // trend
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
    // momentum
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
    // volatility
    Atr,
    BollingerBands,
    KeltnerChannel,
    DonchianChannel,
    UlcerIndex,
    StdDev,
    Variance,
    Range,
    HistoricalVolatility,
    // volume
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
    // others
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
}

impl IndicatorKind {
    #[must_use]
    pub const fn category(self) -> Category {
        use IndicatorKind as K;

        match self {
            K::Sma
            | K::Ema
            | K::Wma
            | K::Macd
            | K::Adx
            | K::Cci
            | K::Dpo
            | K::Vortex
            | K::Trix
            | K::Aroon
            | K::Psar => Category::Trend,
            K::Rsi
            | K::Stochastic
            | K::WilliamsR
            | K::Roc
            | K::Ppo
            | K::Pvo
            | K::UltimateOscillator
            | K::StochRsi
            | K::Tsi
            | K::AwesomeOscillator
            | K::Kama
            | K::Momentum => Category::Momentum,
            K::Atr
            | K::BollingerBands
            | K::KeltnerChannel
            | K::DonchianChannel
            | K::UlcerIndex
            | K::StdDev
            | K::Variance
            | K::Range
            | K::HistoricalVolatility => Category::Volatility,
            K::Mfi
            | K::Adi
            | K::Obv
            | K::Cmf
            | K::ForceIndex
            | K::Eom
            | K::Vpt
            | K::Nvi
            | K::Vwap
            | K::Vwema
            | K::VolumeRatio => Category::Volume,
            K::DailyReturn
            | K::DailyLogReturn
            | K::CumulativeReturn
            | K::CompoundLogReturn
            | K::RollingReturn
            | K::MaxDrawdown
            | K::SharpeRatio
            | K::CalmarRatio
            | K::ZScore
            | K::LinearRegressionSlope
            | K::RollingPercentile => Category::Others,
        }
    }

    /// Whether the kind has a native kernel. Kinds whose whole state is a
    /// handful of scalars run on the fallback backend only.
    #[must_use]
    pub const fn has_native(self) -> bool {
        use IndicatorKind as K;

        matches!(
            self,
            K::Sma
                | K::Wma
                | K::Dpo
                | K::Vortex
                | K::Aroon
                | K::Stochastic
                | K::WilliamsR
                | K::UltimateOscillator
                | K::StochRsi
                | K::AwesomeOscillator
                | K::Kama
                | K::BollingerBands
                | K::DonchianChannel
                | K::UlcerIndex
                | K::StdDev
                | K::Variance
                | K::Range
                | K::HistoricalVolatility
                | K::Mfi
                | K::Cmf
                | K::Eom
                | K::Vwap
                | K::Vwema
                | K::VolumeRatio
                | K::SharpeRatio
                | K::ZScore
                | K::LinearRegressionSlope
                | K::RollingPercentile
        )
    }

    /// Parameter names accepted by [`Params`](crate::Params) overrides.
    #[must_use]
    pub const fn parameters(self) -> &'static [&'static str] {
        use IndicatorKind as K;

        match self {
            K::Macd | K::Ppo | K::Pvo => &["fast", "slow", "signal"],
            K::Cci => &["window", "constant"],
            K::Psar => &["af_start", "af_step", "af_max"],
            K::Stochastic => &["k", "d"],
            K::UltimateOscillator => &["period1", "period2", "period3"],
            K::StochRsi => &["rsi_window", "stoch_window", "k", "d"],
            K::Tsi => &["first", "second"],
            K::AwesomeOscillator => &["fast", "slow"],
            K::Kama => &["window", "fast", "slow"],
            K::BollingerBands => &["window", "multiplier"],
            K::KeltnerChannel => &["window", "atr_window", "multiplier"],
            K::HistoricalVolatility => &["window", "annualize", "periods_per_year"],
            K::Vwema => &["vwap_window", "ema_window"],
            K::SharpeRatio => &["window", "risk_free_rate", "periods_per_year"],
            K::CalmarRatio => &["window", "periods_per_year"],
            K::Adi
            | K::Obv
            | K::Vpt
            | K::Nvi
            | K::DailyReturn
            | K::DailyLogReturn
            | K::CumulativeReturn
            | K::CompoundLogReturn
            | K::MaxDrawdown => &[],
            K::Sma
            | K::Ema
            | K::Wma
            | K::Adx
            | K::Dpo
            | K::Vortex
            | K::Trix
            | K::Aroon
            | K::Rsi
            | K::WilliamsR
            | K::Roc
            | K::Momentum
            | K::Atr
            | K::DonchianChannel
            | K::UlcerIndex
            | K::StdDev
            | K::Variance
            | K::Range
            | K::Mfi
            | K::Cmf
            | K::ForceIndex
            | K::Eom
            | K::Vwap
            | K::VolumeRatio
            | K::RollingReturn
            | K::ZScore
            | K::LinearRegressionSlope
            | K::RollingPercentile => &["window"],
        }
    }

    /// Whether `name` is one of [`parameters`](Self::parameters).
    #[must_use]
    pub fn accepts(self, name: &str) -> bool {
        self.parameters().contains(&name)
    }
}
