use thiserror::Error;

/// Error type shared by every container and storage operation
#[derive(Error, Debug)]
pub enum Error {
    #[error("shape mismatch: {0}")]
    Shape(String),

    #[error("index out of bounds: index {index}, size {size}")]
    IndexOutOfBounds { index: usize, size: usize },

    #[error("inconsistent row count: expected {expected}, found {found}")]
    InconsistentRowCount { expected: usize, found: usize },

    #[error("length mismatch: expected {expected}, actual {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("label not found: {0}")]
    KeyNotFound(String),

    #[error("duplicate label: {0}")]
    DuplicateLabel(String),

    #[error("malformed hierarchy: {0}")]
    MalformedHierarchy(String),

    #[error("invalid construction: {0}")]
    Construction(String),

    #[error("type error: {0}")]
    Type(String),

    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    #[error("parallel processing error: {0}")]
    Parallel(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error")]
    Io(#[from] std::io::Error),

    #[error("JSON error")]
    Json(#[from] serde_json::Error),

    #[error("TOML error")]
    Toml(#[from] toml::de::Error),

    #[error("YAML error")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Coarse classification of [`Error`] variants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Row or column count mismatches
    Shape,
    /// Unmatched or colliding labels
    Key,
    /// Malformed input that cannot form a valid container
    Runtime,
    /// Operations undefined for an element type
    Type,
    /// Failures of the worker pool itself
    Parallel,
    /// Configuration loading and parsing
    Config,
}

impl Error {
    /// Map this error onto its class
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Shape(_)
            | Error::IndexOutOfBounds { .. }
            | Error::InconsistentRowCount { .. }
            | Error::LengthMismatch { .. } => ErrorKind::Shape,
            Error::KeyNotFound(_) | Error::DuplicateLabel(_) => ErrorKind::Key,
            Error::MalformedHierarchy(_)
            | Error::Construction(_)
            | Error::InvalidOperation(_) => ErrorKind::Runtime,
            Error::Type(_) => ErrorKind::Type,
            Error::Parallel(_) => ErrorKind::Parallel,
            Error::Config(_)
            | Error::Io(_)
            | Error::Json(_)
            | Error::Toml(_)
            | Error::Yaml(_) => ErrorKind::Config,
        }
    }
}
