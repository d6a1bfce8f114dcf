//! Fixed-capacity incremental aggregators shared by the indicators.
//!
//! Every primitive is sized at construction and never allocates on `push`.
//! Primitives built for [`Backend::Native`] run incremental kernels over
//! arenas reserved with `try_reserve_exact`; [`Backend::Fallback`] ones
//! recompute their aggregate from the window on each push.

mod extremum;
mod linear;
mod moments;
mod rank;
mod ring_buffer;
mod smoother;
mod sum;

pub(crate) use extremum::{Extremum, WindowExtremum};
pub(crate) use linear::{LinearSums, WindowLinear};
pub(crate) use moments::{Moments, WindowMoments};
pub(crate) use rank::WindowRank;
pub(crate) use ring_buffer::RingBuffer;
pub(crate) use smoother::{Seed, Smoother};
pub(crate) use sum::WindowSum;

use crate::error::BackendConstructionError;

/// Largest window a native kernel accepts.
pub(crate) const NATIVE_MAX_WINDOW: usize = 65_536;

/// Empty vector with room for exactly `capacity` elements.
pub(crate) fn native_vec<T>(capacity: usize) -> Result<Vec<T>, BackendConstructionError> {
    if capacity > NATIVE_MAX_WINDOW {
        return Err(BackendConstructionError::WindowLimit {
            window: capacity,
            limit: NATIVE_MAX_WINDOW,
        });
    }

    let mut arena = Vec::new();
    arena
        .try_reserve_exact(capacity)
        .map_err(|_| BackendConstructionError::Allocation(capacity))?;
    Ok(arena)
}

/// Vector of `len` copies of `fill`, reserved fallibly.
pub(crate) fn native_arena<T: Clone>(
    len: usize,
    fill: T,
) -> Result<Vec<T>, BackendConstructionError> {
    let mut arena = native_vec(len)?;
    arena.resize(len, fill);
    Ok(arena)
}
