//! String-keyed hash table with separate chaining.
//!
//! [`KeyValueTable`] maps owned string keys to owned string values. Collisions
//! are resolved by chaining entries within a bucket, and the bucket array
//! doubles whenever an insert would push the load factor above 0.75.
//!
//! # Ownership
//!
//! Callers hand keys and values in as `&str`; the table stores its own copies.
//! Lookups return borrows tied to the table, so nothing a caller holds can
//! outlive a delete, resize, or drop of the table.
//!
//! # Allocation failure
//!
//! Every operation that allocates (construction, insert, value snapshots)
//! reserves memory fallibly and reports failure as [`TableError::Allocation`]
//! instead of aborting the process.
//!
//! # Modules
//!
//! - [`error`] — Error types for table operations
//! - [`hash`] — The djb2 string hash and bucket selection
//! - [`table`] — [`KeyValueTable`] itself
//! - [`shared`] — [`SharedTable`], a mutex-guarded table for shared access

pub mod error;
pub mod hash;
pub mod shared;
pub mod table;

pub use error::{TableError, TableResult};
pub use hash::{bucket_index, djb2};
pub use shared::SharedTable;
pub use table::{Iter, KeyValueTable, DEFAULT_CAPACITY};
