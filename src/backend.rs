//! Process-wide backend resolution and per-kind dispatch.
//!
//! The backend is resolved once, on first query, from the build's native
//! capability and the [`DISABLE_NATIVE_ENV`] override, then cached in a
//! single atomic. Indicators consult it only at construction.

use crate::{IndicatorKind, error::BackendConstructionError};

use std::sync::atomic::{AtomicU8, Ordering};
use tracing::{debug, warn};

/// Environment variable that forces the fallback backend when set to
/// `1`, `true`, `yes` or `on` (ASCII case-insensitive).
pub const DISABLE_NATIVE_ENV: &str = "QUANTEDGE_DISABLE_NATIVE";

/// Implementation kind an indicator runs on.
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
)]
#[strum(serialize_all = "lowercase")]
pub enum Backend {
    /// Incremental kernels over pre-sized arenas.
    Native,
    /// Straightforward recomputation over the window.
    Fallback,
}

/// Resolved process-wide backend choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BackendHandle {
    backend: Backend,
    forced: bool,
}

const UNRESOLVED: u8 = 0;

impl BackendHandle {
    fn resolve(disable_signal: Option<&str>) -> Self {
        let forced = disable_signal.is_some_and(is_truthy);
        let backend = if !forced && is_native_available() {
            Backend::Native
        } else {
            Backend::Fallback
        };

        Self { backend, forced }
    }

    /// Backend new indicators are built on.
    #[must_use]
    pub fn backend(self) -> Backend {
        self.backend
    }

    /// True when the override signal forced the fallback backend.
    #[must_use]
    pub fn is_forced(self) -> bool {
        self.forced
    }

    /// Build capability, independent of the override.
    #[must_use]
    pub fn native_available(self) -> bool {
        is_native_available()
    }

    const fn encode(self) -> u8 {
        match (self.backend, self.forced) {
            (Backend::Native, _) => 1,
            (Backend::Fallback, false) => 2,
            (Backend::Fallback, true) => 3,
        }
    }

    const fn decode(bits: u8) -> Option<Self> {
        match bits {
            1 => Some(Self {
                backend: Backend::Native,
                forced: false,
            }),
            2 => Some(Self {
                backend: Backend::Fallback,
                forced: false,
            }),
            3 => Some(Self {
                backend: Backend::Fallback,
                forced: true,
            }),
            _ => None,
        }
    }
}

fn is_truthy(signal: &str) -> bool {
    ["1", "true", "yes", "on"]
        .iter()
        .any(|truthy| signal.trim().eq_ignore_ascii_case(truthy))
}

static HANDLE: AtomicU8 = AtomicU8::new(UNRESOLVED);

fn install(handle: BackendHandle) -> BackendHandle {
    match HANDLE.compare_exchange(
        UNRESOLVED,
        handle.encode(),
        Ordering::AcqRel,
        Ordering::Acquire,
    ) {
        Ok(_) => {
            debug!(
                backend = %handle.backend,
                forced = handle.forced,
                "resolved indicator backend"
            );
            handle
        }
        // another thread resolved first, both read the same environment
        Err(current) => BackendHandle::decode(current).unwrap_or(handle),
    }
}

/// Resolves (once) and returns the process-wide backend handle.
#[must_use]
pub fn backend_handle() -> BackendHandle {
    if let Some(handle) = BackendHandle::decode(HANDLE.load(Ordering::Acquire)) {
        return handle;
    }

    let signal = std::env::var(DISABLE_NATIVE_ENV).ok();
    install(BackendHandle::resolve(signal.as_deref()))
}

/// Backend new indicators are built on, for kinds that have a native kernel.
///
/// # Example
///
/// ```
/// use quantedge_stream::{Backend, active_backend, is_native_available};
///
/// if !is_native_available() {
///     assert_eq!(active_backend(), Backend::Fallback);
/// }
/// ```
#[must_use]
pub fn active_backend() -> Backend {
    backend_handle().backend
}

/// Whether this build carries the native kernels, regardless of the
/// override signal.
#[must_use]
pub const fn is_native_available() -> bool {
    cfg!(feature = "native")
}

/// Discards the resolved handle; the next query resolves again from the
/// environment.
#[doc(hidden)]
pub fn reset_backend() {
    HANDLE.store(UNRESOLVED, Ordering::Release);
}

/// Discards the resolved handle and resolves again, reading the override
/// from `disable_signal` instead of the environment.
#[doc(hidden)]
pub fn resolve_backend_with(disable_signal: Option<&str>) -> BackendHandle {
    reset_backend();
    install(BackendHandle::resolve(disable_signal))
}

/// Backend an indicator of `kind` is built on by [`Indicator::new`](crate::Indicator::new).
pub(crate) fn backend_for(kind: IndicatorKind) -> Backend {
    match active_backend() {
        Backend::Native if kind.has_native() => Backend::Native,
        _ => Backend::Fallback,
    }
}

/// Builds on `requested`, recovering from a native construction failure by
/// rebuilding on the fallback backend.
pub(crate) fn construct<T>(
    kind: IndicatorKind,
    requested: Backend,
    build: impl Fn(Backend) -> Result<T, BackendConstructionError>,
) -> T {
    let backend = if kind.has_native() {
        requested
    } else {
        Backend::Fallback
    };

    match build(backend) {
        Ok(built) => built,
        Err(error) => {
            warn!(
                indicator = %kind,
                %error,
                "native kernel construction failed, using fallback backend"
            );
            build(Backend::Fallback)
                .unwrap_or_else(|_| unreachable!("fallback kernels allocate infallibly"))
        }
    }
}
