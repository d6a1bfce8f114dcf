use crate::{Backend, ConstructionError, IndicatorKind, IndicatorValue, InputError, Schema, Tick};

use std::{
    fmt::{Debug, Display},
    hash::Hash,
};

/// Configuration for a technical [`Indicator`].
///
/// Every indicator has a corresponding config type that holds its parameters
/// (windows, smoothing constants, price source). Configs are value types:
/// cheap to copy, compare, and hash. A config that exists has been
/// validated; indicators never re-check parameters.
pub trait IndicatorConfig:
    Sized + Copy + PartialEq + Eq + Hash + Display + Debug + Default + Send + Sync
{
    /// Builder type for constructing this config.
    type Builder: IndicatorConfigBuilder<Self>;

    /// Returns a new builder pre-filled with the default parameters.
    fn builder() -> Self::Builder;

    /// Tick fields the indicator reads.
    fn schema(&self) -> Schema;

    /// Number of successful updates after which the indicator is ready.
    fn required_ticks(&self) -> usize;
}

/// Builder for an [`IndicatorConfig`].
pub trait IndicatorConfigBuilder<Config>
where
    Config: IndicatorConfig,
{
    /// Validates the parameters and builds the config.
    ///
    /// # Errors
    ///
    /// [`ConstructionError`] for a zero or oversized window, a non-finite
    /// or out-of-range parameter, or an incompatible combination.
    fn build(self) -> Result<Config, ConstructionError>;
}

/// A streaming technical indicator.
///
/// Indicators maintain internal state and advance by exactly one step on
/// each successful call to [`update`](Indicator::update). Output is
/// `Ok(None)` until [`required_ticks`](IndicatorConfig::required_ticks)
/// updates have been applied. A tick that lacks a required field (or carries
/// a non-finite one) is rejected with [`InputError`] and leaves the state
/// untouched.
///
/// # Example
///
/// ```
/// use quantedge_stream::{Indicator, IndicatorConfig, Sma, SmaConfig, Tick};
///
/// let mut sma = Sma::new(SmaConfig::new(3).unwrap());
///
/// assert_eq!(sma.update(&Tick::price(10.0)), Ok(None));
/// assert_eq!(sma.update(&Tick::price(20.0)), Ok(None));
/// assert_eq!(sma.update(&Tick::price(30.0)), Ok(Some(20.0)));
/// assert!(sma.is_ready());
/// ```
pub trait Indicator: Sized + Clone + Display + Debug + Send + Sync {
    /// Configuration type for this indicator.
    type Config: IndicatorConfig;

    /// Computed output type. `f64` for simple indicators,
    /// a struct for composite ones (e.g. Bollinger Bands).
    type Output: Copy + Send + Sync + Display + Debug + Into<IndicatorValue>;

    /// Kind tag used by the dynamic layer and backend dispatch.
    const KIND: IndicatorKind;

    /// Creates a new indicator on the process-wide backend.
    ///
    /// Kinds without a native kernel always run on
    /// [`Backend::Fallback`].
    fn new(config: Self::Config) -> Self {
        Self::with_backend(config, crate::backend::backend_for(Self::KIND))
    }

    /// Creates a new indicator on an explicit backend.
    ///
    /// A native request for a kind without a native kernel yields a fallback
    /// instance. If the native kernel cannot be constructed, the instance is
    /// rebuilt on the fallback backend and a warning is logged.
    fn with_backend(config: Self::Config, backend: Backend) -> Self;

    /// The validated configuration.
    fn config(&self) -> &Self::Config;

    /// Feeds one tick and returns the updated value, or `None` while
    /// warming up.
    ///
    /// # Errors
    ///
    /// [`InputError`] if the tick does not satisfy the indicator's
    /// [`Schema`]. State does not advance.
    fn update(&mut self, tick: &Tick) -> Result<Option<Self::Output>, InputError>;

    /// Returns the last computed value without advancing state,
    /// or `None` if not yet ready.
    ///
    /// This is a cached field read: O(1) with no computation.
    fn value(&self) -> Option<Self::Output>;

    /// True once enough ticks have been consumed to produce a value.
    fn is_ready(&self) -> bool {
        self.value().is_some()
    }

    /// Returns to the just-constructed state. Buffers keep their capacity.
    fn reset(&mut self);

    /// Backend this instance runs on.
    fn backend(&self) -> Backend;
}
