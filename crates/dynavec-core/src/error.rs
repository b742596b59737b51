//! Shared error type across dynavec crates.

use thiserror::Error;

/// Shared result type.
pub type Result<T> = std::result::Result<T, DynaVecError>;

/// Unified error type used by core and exporter.
#[derive(Debug, Error)]
pub enum DynaVecError {
    /// Creating a new label combination would push the vector past its
    /// cardinality cap. Existing cells stay usable; nothing was mutated.
    #[error("vector {vector} exceeded length limit ({max_length})")]
    CapacityExceeded { vector: String, max_length: usize },

    /// Construction-time option validation failed.
    #[error("invalid vector options: {0}")]
    InvalidOpts(String),

    /// More positional label values than known label names.
    #[error("{given} label values given but only {known} label names known")]
    TooManyValues { given: usize, known: usize },

    /// A collector with the same fully-qualified name is already registered.
    #[error("collector already registered: {0}")]
    DuplicateCollector(String),

    /// Exporter configuration was malformed or out of range.
    #[error("invalid config: {0}")]
    Config(String),
}
