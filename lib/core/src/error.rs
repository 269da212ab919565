use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the recommendation engine.
///
/// `Validation` is the only variant caused by the caller; everything else
/// signals drift between the loaded artifacts and the request path.
#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    Validation(String),

    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),

    #[error("Incomplete profile: feature '{0}' is missing")]
    IncompleteProfile(String),

    #[error("Model load failure: {0}")]
    ModelLoad(String),

    #[error("Invalid dimension: expected {expected}, got {actual}")]
    InvalidDimension { expected: usize, actual: usize },

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// Build the `"<field> is required"` validation error.
    pub fn required(field: &str) -> Self {
        Error::Validation(format!("{} is required", field))
    }

    /// True when the error was caused by the request rather than the engine.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::Validation(_))
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
