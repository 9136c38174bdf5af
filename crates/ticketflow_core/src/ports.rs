//! crates/ticketflow_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of where blobs are stored or where time comes from.

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Stored data is corrupt: {0}")]
    Corrupt(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// A synchronous string key-value store, the local-storage equivalent.
///
/// Every value is one whole serialized blob; there are no partial updates.
pub trait KeyValueStore: Send + Sync {
    /// Returns `None` when the key is absent.
    fn get(&self, key: &str) -> PortResult<Option<String>>;

    fn set(&self, key: &str, value: &str) -> PortResult<()>;

    /// Removing an absent key is not an error.
    fn remove(&self, key: &str) -> PortResult<()>;
}

/// Source of wall-clock time used for ticket ids.
pub trait Clock: Send + Sync {
    fn now_millis(&self) -> u64;
}
