use crate::Field;

/// Invalid indicator or strategy parameters.
///
/// Returned by config builders and strategy construction. Never produced by
/// `update`: a config that builds successfully always yields an indicator
/// that accepts well-formed ticks.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum ConstructionError {
    #[error("parameter `{name}` must be at least 1")]
    ZeroWindow { name: &'static str },

    #[error("parameter `{name}` is {value}, the maximum is {max}")]
    WindowTooLarge {
        name: &'static str,
        value: usize,
        max: usize,
    },

    #[error("parameter `{name}` has invalid value {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    #[error("incompatible parameters: {0}")]
    Incompatible(&'static str),

    #[error("unknown indicator `{0}`")]
    UnknownIndicator(String),

    #[error("unknown category `{0}`")]
    UnknownCategory(String),

    #[error("indicator `{indicator}` has no parameter `{name}`")]
    UnknownParameter { indicator: String, name: String },

    #[error("strategy group already contains `{0}`")]
    DuplicateName(String),
}

/// A tick that cannot be applied to an indicator.
///
/// The indicator state is left exactly as it was before the failed call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum InputError {
    #[error("tick is missing required field `{0}`")]
    MissingField(Field),

    #[error("tick field `{0}` is not a finite number")]
    NonFinite(Field),
}

/// Native kernel could not be constructed.
///
/// Never escapes the crate: the dispatcher recovers by rebuilding the
/// indicator on the fallback backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub(crate) enum BackendConstructionError {
    #[error("window {window} exceeds the native kernel limit {limit}")]
    WindowLimit { window: usize, limit: usize },

    #[error("could not reserve {0} slots for the native arena")]
    Allocation(usize),
}
