//! Record persistence for dboptima
//!
//! Stores uploaded queries and applied-index records per principal. The
//! analysis core never touches a store; only the upload and apply actions
//! and the dashboard do.
//!
//! # Design Principles
//!
//! - Records are append-only; the only removal is clearing a principal
//! - Every persisted line is checksummed and verified on read
//! - Stores are `Send + Sync` and may be shared between callers

mod checksum;
mod errors;
mod file;
mod memory;

pub use errors::{StoreError, StoreResult};
pub use file::FileStore;
pub use memory::MemoryStore;

/// Per-principal record collection
pub trait RecordStore<T>: Send + Sync {
    /// Appends one record for `principal`.
    fn insert(&self, principal: &str, record: &T) -> StoreResult<()>;

    /// All records of `principal`, in insertion order.
    fn list(&self, principal: &str) -> StoreResult<Vec<T>>;

    /// Removes all records of `principal` and returns how many were removed.
    fn clear(&self, principal: &str) -> StoreResult<usize>;
}

/// Rejects empty or blank principals.
pub fn validate_principal(principal: &str) -> StoreResult<()> {
    if principal.trim().is_empty() {
        return Err(StoreError::InvalidPrincipal(principal.to_string()));
    }
    Ok(())
}
