use thiserror::Error;

/// Convenience result type for transformation operations.
pub type TransformResult<T> = Result<T, TransformError>;

/// Error type returned across configuration loading, document I/O and batch runs.
///
/// This is a single error enum shared by the whole crate. Errors are fatal by default:
/// nothing in the crate retries, and the batch orchestrator propagates the first failure
/// unless explicitly told to skip bad documents.
#[derive(Debug, Error)]
pub enum TransformError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A document exists and was read, but its content is not a usable feature collection.
    #[error("malformed document: {message}")]
    Document { message: String },

    /// The configuration document does not have the expected shape.
    #[error("invalid configuration: {message}")]
    Config { message: String },

    /// A property rule uses a transform tag this crate does not implement.
    #[error("unknown transform type '{tag}'")]
    UnknownTransform { tag: String },
}
