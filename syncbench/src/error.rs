//! Errors reported by syncbench.
//!
//! The primitives themselves have no runtime error channel: an over-release
//! of a saturating semaphore is dropped silently and an absent barrier party
//! blocks the others forever. What *can* be rejected is a contract violation
//! at construction time, and a benchmark run whose output collection does not
//! hold up after the workers join.

/// Possible errors in syncbench.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyncError {
    /// A bounded counter was created with a zero maximum.
    #[error("maximum count must be positive")]
    ZeroMaximum,
    /// A bounded counter was created with more permits than it can hold.
    #[error("initial count {initial} exceeds maximum count {max}")]
    InitialAboveMaximum {
        /// Requested initial count.
        initial: usize,
        /// Requested maximum count.
        max: usize,
    },
    /// A barrier was created without parties.
    #[error("barrier needs at least one party")]
    NoParties,
    /// A benchmark was configured without workers.
    #[error("benchmark needs at least one worker thread")]
    NoWorkers,
    /// A philosopher ring too small to have two distinct forks per seat.
    #[error("philosopher ring needs at least 2 seats, got {0}")]
    RingTooSmall(usize),
    /// A worker thread panicked before it could be joined.
    #[error("worker thread of `{0}` panicked")]
    WorkerPanicked(String),
    /// More workers were inside the primitive at once than it admits.
    #[error("`{name}` let {peak} workers in at once, but admits {capacity}")]
    ExclusionViolated {
        /// Primitive under test.
        name: String,
        /// Most workers observed inside at the same time.
        peak: usize,
        /// Workers the primitive claims to admit.
        capacity: usize,
    },
    /// Appends were lost or duplicated.
    #[error("`{name}` collected {collected} symbols, expected {expected}")]
    CountMismatch {
        /// Primitive under test.
        name: String,
        /// Symbols found after the join.
        collected: usize,
        /// `workers * iterations`.
        expected: usize,
    },
    /// An element that the symbol source never produces.
    #[error("`{name}` collected corrupted symbol {symbol:#04x}")]
    CorruptedSymbol {
        /// Primitive under test.
        name: String,
        /// The offending byte.
        symbol: u8,
    },
}

/// Result type used throughout syncbench.
pub type Result<T> = core::result::Result<T, SyncError>;
