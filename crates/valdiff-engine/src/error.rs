//! Error types for the engine crate.
//!
//! Comparison outcomes are never errors: the engine returns difference data.
//! Only registry mutation can fail.

/// Errors that can occur during registry mutation.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The registry lock was poisoned by a panicking writer.
    #[error("comparer registry lock poisoned: {0}")]
    RegistryPoisoned(String),
}

/// Convenience alias for engine results.
pub type EngineResult<T> = Result<T, EngineError>;
