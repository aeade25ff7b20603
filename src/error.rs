//! Crate-wide error type.
//!
//! Configuration problems and malformed input fail fast, before any model
//! state is built. Numerical degeneracies (zero denominators, flat surprisal
//! profiles) are *not* errors — they are recovered locally with explicit
//! floors and never surface here.

use thiserror::Error;

/// Convenience alias for results produced by this crate.
pub type Result<T> = core::result::Result<T, Error>;

/// Errors raised during configuration validation or sequence parsing.
#[derive(Debug, Error, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// Hierarchy depth below the minimum of one level.
    #[error("n_levels must be at least 1, got {0}")]
    InvalidLevels(usize),

    /// Fewer than one seating-arrangement sample requested.
    #[error("n_samples must be at least 1, got {0}")]
    InvalidSamples(usize),

    /// A per-level parameter list does not match the hierarchy depth.
    ///
    /// Caller-supplied lists are never truncated or padded.
    #[error("{name} has {actual} entries but n_levels is {expected}")]
    LevelCountMismatch {
        /// Which parameter was malformed (`"strength"` or `"decay_constant"`).
        name: &'static str,
        /// The configured hierarchy depth.
        expected: usize,
        /// The length of the supplied list.
        actual: usize,
    },

    /// A strength parameter must be strictly positive at every level.
    #[error("strength at level {level} must be > 0, got {value}")]
    NonPositiveStrength {
        /// Hierarchy level of the offending entry.
        level: usize,
        /// The rejected value.
        value: f64,
    },

    /// A decay-constant list mixes positive and non-positive entries.
    ///
    /// All-non-positive lists select plain (non-decayed) mode; a mixed list
    /// is ambiguous and rejected outright.
    #[error("decay_constant at level {level} must be > 0, got {value}")]
    NonPositiveDecay {
        /// Hierarchy level of the offending entry.
        level: usize,
        /// The rejected value.
        value: f64,
    },

    /// No blocks were supplied; the model is never constructed on empty data.
    #[error("no stimulus blocks to analyze")]
    EmptyInput,

    /// A block is too short to yield a surprisal profile.
    #[error("block {block} has {len} stimuli; at least 2 are required")]
    BlockTooShort {
        /// Offending block number.
        block: u32,
        /// Its length.
        len: usize,
    },

    /// Blocks must all share the same fixed length; upstream extraction is
    /// supposed to guarantee this, and we refuse to silently skip or pad.
    #[error("block {block} has {actual} stimuli, expected {expected}")]
    BlockLengthMismatch {
        /// Offending block number.
        block: u32,
        /// The length established by the first block.
        expected: usize,
        /// The offending block's length.
        actual: usize,
    },
}
