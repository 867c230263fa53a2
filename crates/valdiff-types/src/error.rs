use thiserror::Error;

/// Errors produced by type construction and configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    /// The criteria selects no member kind at all, so a graph walk could
    /// never produce children.
    #[error("invalid criteria: {0}")]
    InvalidCriteria(String),

    /// An array value was declared with dimensions that do not match its
    /// element count.
    #[error("array shape mismatch: dimensions {dims:?} imply {implied} elements, got {actual}")]
    ArrayShape {
        dims: Vec<usize>,
        implied: usize,
        actual: usize,
    },
}
