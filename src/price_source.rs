use crate::{Field, InputError, Price, Schema, Tick};

use std::fmt::{Debug, Display};

/// Series extracted from a [`Tick`] before feeding a single-series
/// indicator.
///
/// Each single-series indicator is configured with a `PriceSource` that
/// determines which value (or derived value) to compute on. The source also
/// determines the indicator's [`Schema`].
#[derive(PartialEq, Eq, Hash, Clone, Copy, Default, Debug)]
pub enum PriceSource {
    /// Opening price.
    Open,
    /// Highest price.
    High,
    /// Closing price.
    #[default]
    Close,
    /// Lowest price.
    Low,
    /// Median price: `(high + low) / 2`.
    HL2,
    /// Typical price: `(high + low + close) / 3`.
    HLC3,
    /// Average price: `(open + high + low + close) / 4`.
    OHLC4,
    /// Weighted close: `(high + low + close + close) / 4`.
    HLCC4,
    /// Traded volume.
    Volume,
}

impl Display for PriceSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

impl PriceSource {
    /// Fields a tick must carry for this source.
    #[must_use]
    pub const fn schema(self) -> Schema {
        match self {
            Self::Open => Schema::of(Field::Open),
            Self::High => Schema::of(Field::High),
            Self::Close => Schema::CLOSE,
            Self::Low => Schema::of(Field::Low),
            Self::HL2 => Schema::HL,
            Self::HLC3 | Self::HLCC4 => Schema::HLC,
            Self::OHLC4 => Schema::OHLC,
            Self::Volume => Schema::VOLUME,
        }
    }

    #[inline]
    pub(crate) fn extract(self, tick: &Tick) -> Result<Price, InputError> {
        Ok(match self {
            Self::Open => tick.require(Field::Open)?,
            Self::High => tick.require(Field::High)?,
            Self::Close => tick.require(Field::Close)?,
            Self::Low => tick.require(Field::Low)?,
            Self::HL2 => {
                let (high, low) = tick.hl()?;
                f64::midpoint(high, low)
            }
            Self::HLC3 => {
                let (high, low, close) = tick.hlc_values()?;
                (high + low + close) / 3.0
            }
            Self::OHLC4 => {
                let open = tick.require(Field::Open)?;
                let (high, low, close) = tick.hlc_values()?;
                (open + high + low + close) / 4.0
            }
            Self::HLCC4 => {
                let (high, low, close) = tick.hlc_values()?;
                (high + low + close + close) / 4.0
            }
            Self::Volume => tick.require(Field::Volume)?,
        })
    }
}
