use crate::ConstructionError;

use std::{
    collections::BTreeMap,
    fmt::Display,
    hash::{Hash, Hasher},
};

/// Largest window any indicator accepts.
pub const MAX_WINDOW: usize = 1_000_000;

pub(crate) fn window(name: &'static str, value: usize) -> Result<usize, ConstructionError> {
    if value == 0 {
        return Err(ConstructionError::ZeroWindow { name });
    }
    if value > MAX_WINDOW {
        return Err(ConstructionError::WindowTooLarge {
            name,
            value,
            max: MAX_WINDOW,
        });
    }
    Ok(value)
}

/// Finite floating-point parameter with bitwise `Eq`/`Hash`, so configs that
/// carry one remain hashable.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Coefficient(f64);

impl Coefficient {
    /// For compile-time defaults only.
    pub(crate) const fn of(value: f64) -> Self {
        Self(value)
    }

    pub(crate) fn finite(name: &'static str, value: f64) -> Result<Self, ConstructionError> {
        if !value.is_finite() {
            return Err(ConstructionError::InvalidParameter {
                name,
                value,
                reason: "must be finite",
            });
        }
        // -0.0 and 0.0 must hash alike
        Ok(Self(if value == 0.0 { 0.0 } else { value }))
    }

    pub(crate) fn positive(name: &'static str, value: f64) -> Result<Self, ConstructionError> {
        let coefficient = Self::finite(name, value)?;
        if value <= 0.0 {
            return Err(ConstructionError::InvalidParameter {
                name,
                value,
                reason: "must be positive",
            });
        }
        Ok(coefficient)
    }

    #[inline]
    pub(crate) const fn get(self) -> f64 {
        self.0
    }
}

impl Eq for Coefficient {}

impl Hash for Coefficient {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

impl Display for Coefficient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Named numeric parameter overrides for dynamically built indicators.
///
/// Window-like parameters must be whole numbers; boolean parameters
/// (`annualize`) take `0` or `1`. Values are validated by the indicator's
/// config builder, so a bad override surfaces as a [`ConstructionError`]
/// at construction.
///
/// # Example
///
/// ```
/// use quantedge_stream::{AnyIndicator, IndicatorKind, Params};
///
/// let params = Params::new().with("window", 5.0);
/// let sma = AnyIndicator::with_params(IndicatorKind::Sma, &params).unwrap();
/// assert_eq!(sma.required_ticks(), 5);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params {
    values: BTreeMap<String, f64>,
}

impl Params {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`set`](Self::set).
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: f64) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: f64) {
        self.values.insert(name.into(), value);
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// `self` with every entry of `other` written over it.
    pub(crate) fn overlay(&self, other: &Self) -> Self {
        let mut merged = self.clone();
        merged
            .values
            .extend(other.values.iter().map(|(name, value)| (name.clone(), *value)));
        merged
    }

    pub(crate) fn window(&self, name: &'static str) -> Result<Option<usize>, ConstructionError> {
        let Some(value) = self.get(name) else {
            return Ok(None);
        };
        if !value.is_finite() || value < 0.0 || value.fract() != 0.0 {
            return Err(ConstructionError::InvalidParameter {
                name,
                value,
                reason: "must be a whole number of ticks",
            });
        }
        // saturating cast; oversized values are rejected by the builder
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        Ok(Some(value as usize))
    }

    pub(crate) fn number(&self, name: &str) -> Option<f64> {
        self.get(name)
    }

    pub(crate) fn flag(&self, name: &'static str) -> Result<Option<bool>, ConstructionError> {
        match self.get(name) {
            None => Ok(None),
            Some(value) if value == 0.0 => Ok(Some(false)),
            Some(value) if value == 1.0 => Ok(Some(true)),
            Some(value) => Err(ConstructionError::InvalidParameter {
                name,
                value,
                reason: "must be 0 or 1",
            }),
        }
    }
}

/// Generates the config, builder and trait impls of an indicator whose only
/// parameter is one window, optionally with a [`PriceSource`](crate::PriceSource).
macro_rules! window_config {
    (
        $(#[$meta:meta])*
        $config:ident, $builder:ident,
        window: $default:expr,
        source: $source:expr,
        required_ticks: |$w:ident| $ready:expr $(,)?
    ) => {
        $(#[$meta])*
        #[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
        pub struct $config {
            window: usize,
            source: $crate::PriceSource,
        }

        impl $config {
            /// Config with the given window and the default source.
            ///
            /// # Errors
            ///
            /// [`ConstructionError`](crate::ConstructionError) if `window` is
            /// zero or above [`MAX_WINDOW`](crate::MAX_WINDOW).
            pub fn new(window: usize) -> Result<Self, $crate::ConstructionError> {
                $crate::IndicatorConfigBuilder::build(
                    <Self as $crate::IndicatorConfig>::builder().window(window),
                )
            }

            #[must_use]
            pub fn window(&self) -> usize {
                self.window
            }

            #[must_use]
            pub fn source(&self) -> $crate::PriceSource {
                self.source
            }

            pub(crate) fn from_params(
                params: &$crate::Params,
            ) -> Result<Self, $crate::ConstructionError> {
                let mut builder = <Self as $crate::IndicatorConfig>::builder();
                if let Some(window) = params.window("window")? {
                    builder = builder.window(window);
                }
                $crate::IndicatorConfigBuilder::build(builder)
            }
        }

        impl Default for $config {
            fn default() -> Self {
                Self {
                    window: $default,
                    source: $source,
                }
            }
        }

        impl std::fmt::Display for $config {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}({}, {})", stringify!($config), self.window, self.source)
            }
        }

        #[doc = concat!("Builder for [`", stringify!($config), "`].")]
        #[derive(Clone, Copy, Debug)]
        pub struct $builder {
            window: usize,
            source: $crate::PriceSource,
        }

        impl $builder {
            #[must_use]
            pub fn window(mut self, window: usize) -> Self {
                self.window = window;
                self
            }

            #[must_use]
            pub fn source(mut self, source: $crate::PriceSource) -> Self {
                self.source = source;
                self
            }
        }

        impl $crate::IndicatorConfigBuilder<$config> for $builder {
            fn build(self) -> Result<$config, $crate::ConstructionError> {
                Ok($config {
                    window: $crate::config::window("window", self.window)?,
                    source: self.source,
                })
            }
        }

        impl $crate::IndicatorConfig for $config {
            type Builder = $builder;

            fn builder() -> $builder {
                let defaults = $config::default();
                $builder {
                    window: defaults.window,
                    source: defaults.source,
                }
            }

            fn schema(&self) -> $crate::Schema {
                self.source.schema()
            }

            fn required_ticks(&self) -> usize {
                let $w = self.window;
                $ready
            }
        }
    };
    (
        $(#[$meta:meta])*
        $config:ident, $builder:ident,
        window: $default:expr,
        schema: $schema:expr,
        required_ticks: |$w:ident| $ready:expr $(,)?
    ) => {
        $(#[$meta])*
        #[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
        pub struct $config {
            window: usize,
        }

        impl $config {
            /// Config with the given window.
            ///
            /// # Errors
            ///
            /// [`ConstructionError`](crate::ConstructionError) if `window` is
            /// zero or above [`MAX_WINDOW`](crate::MAX_WINDOW).
            pub fn new(window: usize) -> Result<Self, $crate::ConstructionError> {
                $crate::IndicatorConfigBuilder::build(
                    <Self as $crate::IndicatorConfig>::builder().window(window),
                )
            }

            #[must_use]
            pub fn window(&self) -> usize {
                self.window
            }

            pub(crate) fn from_params(
                params: &$crate::Params,
            ) -> Result<Self, $crate::ConstructionError> {
                let mut builder = <Self as $crate::IndicatorConfig>::builder();
                if let Some(window) = params.window("window")? {
                    builder = builder.window(window);
                }
                $crate::IndicatorConfigBuilder::build(builder)
            }
        }

        impl Default for $config {
            fn default() -> Self {
                Self { window: $default }
            }
        }

        impl std::fmt::Display for $config {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}({})", stringify!($config), self.window)
            }
        }

        #[doc = concat!("Builder for [`", stringify!($config), "`].")]
        #[derive(Clone, Copy, Debug)]
        pub struct $builder {
            window: usize,
        }

        impl $builder {
            #[must_use]
            pub fn window(mut self, window: usize) -> Self {
                self.window = window;
                self
            }
        }

        impl $crate::IndicatorConfigBuilder<$config> for $builder {
            fn build(self) -> Result<$config, $crate::ConstructionError> {
                Ok($config {
                    window: $crate::config::window("window", self.window)?,
                })
            }
        }

        impl $crate::IndicatorConfig for $config {
            type Builder = $builder;

            fn builder() -> $builder {
                $builder {
                    window: $config::default().window,
                }
            }

            fn schema(&self) -> $crate::Schema {
                $schema
            }

            fn required_ticks(&self) -> usize {
                let $w = self.window;
                $ready
            }
        }
    };
}

/// Generates the config, builder and trait impls of a parameterless
/// indicator.
macro_rules! fixed_config {
    (
        $(#[$meta:meta])*
        $config:ident, $builder:ident,
        schema: $schema:expr,
        required_ticks: $ready:expr $(,)?
    ) => {
        $(#[$meta])*
        #[derive(PartialEq, Eq, Hash, Clone, Copy, Debug, Default)]
        pub struct $config;

        impl $config {
            pub(crate) fn from_params(
                _params: &$crate::Params,
            ) -> Result<Self, $crate::ConstructionError> {
                Ok(Self)
            }
        }

        impl std::fmt::Display for $config {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(stringify!($config))
            }
        }

        #[doc = concat!("Builder for [`", stringify!($config), "`].")]
        #[derive(Clone, Copy, Debug, Default)]
        pub struct $builder;

        impl $crate::IndicatorConfigBuilder<$config> for $builder {
            fn build(self) -> Result<$config, $crate::ConstructionError> {
                Ok($config)
            }
        }

        impl $crate::IndicatorConfig for $config {
            type Builder = $builder;

            fn builder() -> $builder {
                $builder
            }

            fn schema(&self) -> $crate::Schema {
                $schema
            }

            fn required_ticks(&self) -> usize {
                $ready
            }
        }
    };
}

/// Generates the config, builder and trait impls of a parameterless
/// single-series indicator.
macro_rules! source_config {
    (
        $(#[$meta:meta])*
        $config:ident, $builder:ident,
        source: $source:expr,
        required_ticks: $ready:expr $(,)?
    ) => {
        $(#[$meta])*
        #[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
        pub struct $config {
            source: $crate::PriceSource,
        }

        impl $config {
            #[must_use]
            pub fn source(&self) -> $crate::PriceSource {
                self.source
            }

            pub(crate) fn from_params(
                _params: &$crate::Params,
            ) -> Result<Self, $crate::ConstructionError> {
                Ok(Self::default())
            }
        }

        impl Default for $config {
            fn default() -> Self {
                Self { source: $source }
            }
        }

        impl std::fmt::Display for $config {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}({})", stringify!($config), self.source)
            }
        }

        #[doc = concat!("Builder for [`", stringify!($config), "`].")]
        #[derive(Clone, Copy, Debug)]
        pub struct $builder {
            source: $crate::PriceSource,
        }

        impl $builder {
            #[must_use]
            pub fn source(mut self, source: $crate::PriceSource) -> Self {
                self.source = source;
                self
            }
        }

        impl $crate::IndicatorConfigBuilder<$config> for $builder {
            fn build(self) -> Result<$config, $crate::ConstructionError> {
                Ok($config {
                    source: self.source,
                })
            }
        }

        impl $crate::IndicatorConfig for $config {
            type Builder = $builder;

            fn builder() -> $builder {
                $builder {
                    source: $config::default().source,
                }
            }

            fn schema(&self) -> $crate::Schema {
                self.source.schema()
            }

            fn required_ticks(&self) -> usize {
                $ready
            }
        }
    };
}

pub(crate) use {fixed_config, source_config, window_config};
