//! # State Models
//!
//! Data structures holding the physical state of a simulation: individual
//! particles with optional capabilities, elastic index ranges over the shared
//! particle buffer, molecule groups, the [`space::Space`] aggregate, and the
//! [`change::Change`] diff used to synchronize a trial state back into the
//! accepted state.
//!
//! All containers are plain data: they never allocate behind the caller's
//! back (beyond `Vec` growth in [`space::Space`]) and never touch a random
//! source.

pub mod change;
pub mod elastic;
pub mod group;
pub mod particle;
pub mod space;
pub mod tensor;

use thiserror::Error;

/// Contract violations raised by the state containers.
///
/// These indicate a bug in the calling move, not bad user input: an elastic
/// span outside its window, a group assignment between windows of different
/// capacity, or a sync diff addressing offsets a group does not hold.
/// Continuing after one of these risks silent state corruption, so callers
/// should treat them as unrecoverable.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum StateError {
    /// A deactivate/activate span lies outside the window it must be in.
    #[error("span [{first}, {last}) lies outside the {window} window [{lo}, {hi})")]
    SpanOutOfWindow {
        first: usize,
        last: usize,
        window: &'static str,
        lo: usize,
        hi: usize,
    },
    /// Group assignment between arena windows of different capacity.
    #[error("group capacity mismatch: destination holds {destination}, source holds {src}")]
    CapacityMismatch { destination: usize, src: usize },
    /// A change entry addresses a group index the space does not have.
    #[error("change addresses group {group}, but the space holds {count} groups")]
    GroupOutOfRange { group: usize, count: usize },
    /// A touched offset is not inside the group's active window after resize.
    #[error("touched offset {offset} out of range for group {group} with {size} active particles")]
    OffsetOutOfRange {
        offset: usize,
        group: usize,
        size: usize,
    },
}
