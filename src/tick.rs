use crate::{InputError, Ohlcv, Price};

use std::fmt::Display;

/// One field of an OHLCV tick.
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
    strum::EnumIter,
    strum::IntoStaticStr,
)]
#[strum(serialize_all = "lowercase")]
pub enum Field {
    Open,
    High,
    Low,
    Close,
    Volume,
}

impl Field {
    const fn bit(self) -> u8 {
        1 << self as u8
    }
}

/// Set of tick fields an indicator (or a strategy group) requires.
///
/// Fields are validated in declaration order (`open`, `high`, `low`, `close`,
/// `volume`), so the reported [`InputError`] is deterministic when several
/// fields are missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Schema {
    bits: u8,
}

impl Schema {
    /// No fields.
    pub const EMPTY: Self = Self { bits: 0 };
    /// Close only: the scalar price case.
    pub const CLOSE: Self = Self::of(Field::Close);
    /// Volume only.
    pub const VOLUME: Self = Self::of(Field::Volume);
    /// High and low.
    pub const HL: Self = Self::of(Field::High).with(Field::Low);
    /// High, low and close.
    pub const HLC: Self = Self::HL.with(Field::Close);
    /// High, low, close and volume.
    pub const HLCV: Self = Self::HLC.with(Field::Volume);
    /// Close and volume.
    pub const CV: Self = Self::CLOSE.with(Field::Volume);
    /// High, low and volume.
    pub const HLV: Self = Self::HL.with(Field::Volume);
    /// Open, high, low and close.
    pub const OHLC: Self = Self::HLC.with(Field::Open);
    /// Every field.
    pub const OHLCV: Self = Self::OHLC.with(Field::Volume);

    /// Schema with a single field.
    #[must_use]
    pub const fn of(field: Field) -> Self {
        Self { bits: field.bit() }
    }

    /// Adds `field` to the set.
    #[must_use]
    pub const fn with(self, field: Field) -> Self {
        Self {
            bits: self.bits | field.bit(),
        }
    }

    /// Set union.
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self {
            bits: self.bits | other.bits,
        }
    }

    /// Set intersection.
    #[must_use]
    pub const fn intersection(self, other: Self) -> Self {
        Self {
            bits: self.bits & other.bits,
        }
    }

    #[must_use]
    pub const fn contains(self, field: Field) -> bool {
        self.bits & field.bit() != 0
    }

    /// True when every field of `other` is also in `self`.
    #[must_use]
    pub const fn covers(self, other: Self) -> bool {
        self.bits & other.bits == other.bits
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.bits == 0
    }

    /// Fields in validation order.
    pub fn fields(self) -> impl Iterator<Item = Field> {
        <Field as strum::IntoEnumIterator>::iter().filter(move |field| self.contains(*field))
    }

    /// Checks that every field of the schema is present and finite.
    ///
    /// # Errors
    ///
    /// The first missing or non-finite field, in validation order.
    pub fn validate(self, tick: &Tick) -> Result<(), InputError> {
        self.fields().try_for_each(|field| tick.require(field).map(drop))
    }
}

impl Display for Schema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            return f.write_str("none");
        }
        for (i, field) in self.fields().enumerate() {
            if i > 0 {
                f.write_str("+")?;
            }
            write!(f, "{field}")?;
        }
        Ok(())
    }
}

/// One market data point.
///
/// Every field is optional: a bare price converts into a close-only tick,
/// an [`Ohlcv`] bar converts into a full tick. Indicators declare the
/// [`Schema`] they need and reject ticks that do not satisfy it with an
/// [`InputError`], without advancing.
///
/// # Example
///
/// ```
/// use quantedge_stream::Tick;
///
/// let scalar = Tick::from(101.5);
/// assert_eq!(scalar.close(), Some(101.5));
/// assert_eq!(scalar.high(), None);
///
/// let bar = Tick::hlc(102.0, 100.0, 101.0).with_volume(1_500.0);
/// assert_eq!(bar.volume(), Some(1_500.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Tick {
    open: Option<Price>,
    high: Option<Price>,
    low: Option<Price>,
    close: Option<Price>,
    volume: Option<f64>,
}

impl Tick {
    /// Close-only tick.
    #[must_use]
    pub const fn price(close: Price) -> Self {
        Self {
            open: None,
            high: None,
            low: None,
            close: Some(close),
            volume: None,
        }
    }

    /// High, low and close.
    #[must_use]
    pub const fn hlc(high: Price, low: Price, close: Price) -> Self {
        Self {
            open: None,
            high: Some(high),
            low: Some(low),
            close: Some(close),
            volume: None,
        }
    }

    /// High, low, close and volume.
    #[must_use]
    pub const fn hlcv(high: Price, low: Price, close: Price, volume: f64) -> Self {
        Self::hlc(high, low, close).with_volume(volume)
    }

    /// Every field.
    #[must_use]
    pub const fn ohlcv(open: Price, high: Price, low: Price, close: Price, volume: f64) -> Self {
        Self::hlcv(high, low, close, volume).with_open(open)
    }

    #[must_use]
    pub const fn with_open(mut self, open: Price) -> Self {
        self.open = Some(open);
        self
    }

    #[must_use]
    pub const fn with_high(mut self, high: Price) -> Self {
        self.high = Some(high);
        self
    }

    #[must_use]
    pub const fn with_low(mut self, low: Price) -> Self {
        self.low = Some(low);
        self
    }

    #[must_use]
    pub const fn with_close(mut self, close: Price) -> Self {
        self.close = Some(close);
        self
    }

    #[must_use]
    pub const fn with_volume(mut self, volume: f64) -> Self {
        self.volume = Some(volume);
        self
    }

    #[must_use]
    pub const fn open(&self) -> Option<Price> {
        self.open
    }

    #[must_use]
    pub const fn high(&self) -> Option<Price> {
        self.high
    }

    #[must_use]
    pub const fn low(&self) -> Option<Price> {
        self.low
    }

    #[must_use]
    pub const fn close(&self) -> Option<Price> {
        self.close
    }

    #[must_use]
    pub const fn volume(&self) -> Option<f64> {
        self.volume
    }

    /// Raw field value, present or not.
    #[must_use]
    pub const fn get(&self, field: Field) -> Option<f64> {
        match field {
            Field::Open => self.open,
            Field::High => self.high,
            Field::Low => self.low,
            Field::Close => self.close,
            Field::Volume => self.volume,
        }
    }

    /// Present and finite field value.
    #[inline]
    pub(crate) fn require(&self, field: Field) -> Result<f64, InputError> {
        match self.get(field) {
            None => Err(InputError::MissingField(field)),
            Some(value) if !value.is_finite() => Err(InputError::NonFinite(field)),
            Some(value) => Ok(value),
        }
    }

    #[inline]
    pub(crate) fn hl(&self) -> Result<(Price, Price), InputError> {
        Ok((self.require(Field::High)?, self.require(Field::Low)?))
    }

    #[inline]
    pub(crate) fn hlc_values(&self) -> Result<(Price, Price, Price), InputError> {
        let (high, low) = self.hl()?;
        Ok((high, low, self.require(Field::Close)?))
    }

    #[inline]
    pub(crate) fn hlcv_values(&self) -> Result<(Price, Price, Price, f64), InputError> {
        let (high, low, close) = self.hlc_values()?;
        Ok((high, low, close, self.require(Field::Volume)?))
    }

    #[inline]
    pub(crate) fn cv_values(&self) -> Result<(Price, f64), InputError> {
        Ok((self.require(Field::Close)?, self.require(Field::Volume)?))
    }

    #[inline]
    pub(crate) fn hlv_values(&self) -> Result<(Price, Price, f64), InputError> {
        let (high, low) = self.hl()?;
        Ok((high, low, self.require(Field::Volume)?))
    }
}

impl From<Price> for Tick {
    fn from(close: Price) -> Self {
        Self::price(close)
    }
}

impl<T: Ohlcv> From<&T> for Tick {
    fn from(bar: &T) -> Self {
        let tick = Self::hlc(bar.high(), bar.low(), bar.close()).with_open(bar.open());
        match bar.volume() {
            Some(volume) => tick.with_volume(volume),
            None => tick,
        }
    }
}
