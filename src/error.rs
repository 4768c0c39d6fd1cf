use thiserror::Error;

#[derive(Error, Debug)]
pub enum CubigmaError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    #[error("Alphabet has {symbols} symbols but the lattice holds {volume}")]
    DimensionMismatch { symbols: usize, volume: usize },

    #[error("Cannot encrypt an empty message")]
    EmptyInput,

    #[error("Symbol {0:?} is not present in the lattice")]
    SymbolNotFound(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Type mismatch: {0}")]
    TypeMismatch(String),

    #[error("Invalid ciphertext: {0}")]
    InvalidCiphertext(String),

    #[error("Unsupported mode: {0}")]
    UnsupportedMode(String),
}

impl CubigmaError {
    pub(crate) fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CubigmaError>;
