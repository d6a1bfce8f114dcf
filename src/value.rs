use crate::{
    AdxValue, AroonValue, BandsValue, MacdValue, PpoValue, StochRsiValue, StochValue, VortexValue,
};

use std::fmt::Display;

/// Output of any indicator, for code that handles kinds dynamically.
///
/// Every variant has a headline value ([`primary`](Self::primary)) and named
/// components ([`component`](Self::component)).
///
/// # Example
///
/// ```
/// use quantedge_stream::{BandsValue, IndicatorValue};
///
/// let bands = IndicatorValue::from(BandsValue::new(12.0, 10.0, 8.0));
/// assert_eq!(bands.primary(), 10.0);
/// assert_eq!(bands.component("upper"), Some(12.0));
/// assert_eq!(IndicatorValue::Scalar(3.5).component("value"), Some(3.5));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IndicatorValue {
    Scalar(f64),
    Macd(MacdValue),
    Ppo(PpoValue),
    Adx(AdxValue),
    Bands(BandsValue),
    Stoch(StochValue),
    StochRsi(StochRsiValue),
    Vortex(VortexValue),
    Aroon(AroonValue),
}

impl IndicatorValue {
    /// Headline value: the scalar itself, the MACD/PPO line, ADX, the
    /// middle band, %K, the stochastic RSI, VI+, or the Aroon oscillator.
    #[must_use]
    pub fn primary(&self) -> f64 {
        match self {
            Self::Scalar(value) => *value,
            Self::Macd(v) => v.macd(),
            Self::Ppo(v) => v.ppo(),
            Self::Adx(v) => v.adx(),
            Self::Bands(v) => v.middle(),
            Self::Stoch(v) => v.k(),
            Self::StochRsi(v) => v.stoch_rsi(),
            Self::Vortex(v) => v.plus(),
            Self::Aroon(v) => v.oscillator(),
        }
    }

    /// Component names, in output order.
    #[must_use]
    pub fn components(&self) -> &'static [&'static str] {
        match self {
            Self::Scalar(_) => &["value"],
            Self::Macd(_) => &["macd", "signal", "histogram"],
            Self::Ppo(_) => &["ppo", "signal", "histogram"],
            Self::Adx(_) => &["adx", "plus_di", "minus_di"],
            Self::Bands(_) => &["upper", "middle", "lower"],
            Self::Stoch(_) => &["k", "d"],
            Self::StochRsi(_) => &["stoch_rsi", "k", "d"],
            Self::Vortex(_) => &["plus", "minus"],
            Self::Aroon(_) => &["up", "down", "oscillator"],
        }
    }

    /// Named component, `None` if this value has no such component.
    #[must_use]
    pub fn component(&self, name: &str) -> Option<f64> {
        Some(match (self, name) {
            (Self::Scalar(value), "value") => *value,
            (Self::Macd(v), "macd") => v.macd(),
            (Self::Macd(v), "signal") => v.signal(),
            (Self::Macd(v), "histogram") => v.histogram(),
            (Self::Ppo(v), "ppo") => v.ppo(),
            (Self::Ppo(v), "signal") => v.signal(),
            (Self::Ppo(v), "histogram") => v.histogram(),
            (Self::Adx(v), "adx") => v.adx(),
            (Self::Adx(v), "plus_di") => v.plus_di(),
            (Self::Adx(v), "minus_di") => v.minus_di(),
            (Self::Bands(v), "upper") => v.upper(),
            (Self::Bands(v), "middle") => v.middle(),
            (Self::Bands(v), "lower") => v.lower(),
            (Self::Stoch(v), "k") => v.k(),
            (Self::Stoch(v), "d") => v.d(),
            (Self::StochRsi(v), "stoch_rsi") => v.stoch_rsi(),
            (Self::StochRsi(v), "k") => v.k(),
            (Self::StochRsi(v), "d") => v.d(),
            (Self::Vortex(v), "plus") => v.plus(),
            (Self::Vortex(v), "minus") => v.minus(),
            (Self::Aroon(v), "up") => v.up(),
            (Self::Aroon(v), "down") => v.down(),
            (Self::Aroon(v), "oscillator") => v.oscillator(),
            _ => return None,
        })
    }

    /// The value if it is a plain scalar.
    #[must_use]
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Self::Scalar(value) => Some(*value),
            _ => None,
        }
    }
}

impl Display for IndicatorValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Scalar(value) => write!(f, "{value}"),
            Self::Macd(v) => write!(f, "{v}"),
            Self::Ppo(v) => write!(f, "{v}"),
            Self::Adx(v) => write!(f, "{v}"),
            Self::Bands(v) => write!(f, "{v}"),
            Self::Stoch(v) => write!(f, "{v}"),
            Self::StochRsi(v) => write!(f, "{v}"),
            Self::Vortex(v) => write!(f, "{v}"),
            Self::Aroon(v) => write!(f, "{v}"),
        }
    }
}

macro_rules! impl_from_value {
    ($($variant:ident($type:ty)),* $(,)?) => {
        $(
            impl From<$type> for IndicatorValue {
                fn from(value: $type) -> Self {
                    Self::$variant(value)
                }
            }
        )*
    };
}

impl_from_value!(
    Scalar(f64),
    Macd(MacdValue),
    Ppo(PpoValue),
    Adx(AdxValue),
    Bands(BandsValue),
    Stoch(StochValue),
    StochRsi(StochRsiValue),
    Vortex(VortexValue),
    Aroon(AroonValue),
);
