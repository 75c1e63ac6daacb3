//! Error types for table operations.

use std::collections::TryReserveError;

use thiserror::Error;

/// Errors that can occur while growing or reading a table.
///
/// Absent keys are not errors: lookups return `None` and deletes of a
/// missing key are no-ops.
#[derive(Debug, Error)]
pub enum TableError {
    /// Memory for buckets, entries, or a snapshot could not be reserved.
    #[error("allocation failed: {0}")]
    Allocation(#[from] TryReserveError),

    /// Doubling the bucket count would overflow `usize`.
    #[error("capacity overflow: cannot grow beyond {capacity} buckets")]
    CapacityOverflow { capacity: usize },

    /// A thread panicked while holding the table lock.
    #[error("table lock poisoned: {0}")]
    LockPoisoned(String),
}

/// Convenience type alias for table operations.
pub type TableResult<T> = std::result::Result<T, TableError>;
