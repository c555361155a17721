use thiserror::Error;

/// Custom error type for the SentiRust framework.
#[derive(Error, Debug, PartialEq, Clone)] // PartialEq for easier testing
pub enum SentiError {
    #[error("Shape mismatch: expected {expected:?}, got {actual:?} during operation {operation}")]
    ShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
        operation: String,
    },

    /// `backward` reached a block whose forward value was never computed.
    #[error("Backward called on block '{block}' before its forward value was computed")]
    Uninitialized { block: String },

    #[error("Operation {operation} requires at least one input")]
    EmptyInput { operation: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Malformed input at line {line}: {message}")]
    Format { line: usize, message: String },

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Index out of bounds: index {index} for length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("Lock poisoned: {0}")]
    LockPoisoned(String),
}

impl From<std::io::Error> for SentiError {
    fn from(err: std::io::Error) -> Self {
        SentiError::Io(err.to_string())
    }
}

impl SentiError {
    /// Shorthand used by every shape-validating operation.
    pub(crate) fn shape(operation: &str, expected: Vec<usize>, actual: Vec<usize>) -> Self {
        SentiError::ShapeMismatch {
            expected,
            actual,
            operation: operation.to_string(),
        }
    }
}
