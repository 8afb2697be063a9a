//! Error types for sqlport.

use thiserror::Error;

/// The main error type for conversion operations.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The source front-end rejected the statement text.
    #[error("Parse error at position {position}: {message}")]
    Parse { position: usize, message: String },

    /// No statement grammar matches the leading text.
    #[error("Unrecognized statement: {0}")]
    Unrecognized(String),

    /// The target dialect has no rendering for a construct.
    #[error("Unsupported construct: {construct}")]
    Unsupported { construct: String },

    /// A source data type with no abstract type behind it.
    #[error("Unsupported data type: {0}")]
    UnsupportedType(String),

    /// A DDL fragment did not match the expected surface grammar.
    #[error("Malformed {what}: {text}")]
    Malformed { what: &'static str, text: String },

    /// Re-tokenizing rendered text failed.
    #[error("Tokenizer error: {0}")]
    Tokenize(String),

    /// The input script could not be decoded as UTF-8.
    #[error("Input is not valid UTF-8: {0}")]
    Encoding(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A worker task failed before returning results.
    #[error("Worker error: {0}")]
    Worker(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConvertError {
    /// Create a parse error at the given position.
    pub fn parse(position: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            position,
            message: message.into(),
        }
    }

    /// Create an unsupported construct error naming the node kind.
    pub fn unsupported(construct: impl Into<String>) -> Self {
        Self::Unsupported {
            construct: construct.into(),
        }
    }

    /// Create a malformed fragment error.
    pub fn malformed(what: &'static str, text: impl Into<String>) -> Self {
        Self::Malformed {
            what,
            text: text.into(),
        }
    }

    /// Short machine-readable name for diagnostics records.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Parse { .. } => "parse",
            Self::Unrecognized(_) => "unrecognized",
            Self::Unsupported { .. } => "unsupported",
            Self::UnsupportedType(_) => "unsupported_type",
            Self::Malformed { .. } => "malformed",
            Self::Tokenize(_) => "tokenize",
            Self::Encoding(_) => "encoding",
            Self::Config(_) => "config",
            Self::Worker(_) => "worker",
            Self::Io(_) => "io",
        }
    }

    /// Script-fatal errors abort a run before any statement is processed.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Io(_) | Self::Encoding(_) | Self::Config(_))
    }
}

/// Result type alias for conversion operations.
pub type ConvertResult<T> = Result<T, ConvertError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ConvertError::parse(5, "unexpected character");
        assert_eq!(
            err.to_string(),
            "Parse error at position 5: unexpected character"
        );
    }

    #[test]
    fn test_unsupported_names_construct() {
        let err = ConvertError::unsupported("table option ROW_FORMAT");
        assert_eq!(err.to_string(), "Unsupported construct: table option ROW_FORMAT");
        assert_eq!(err.kind(), "unsupported");
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_io_is_fatal() {
        let err: ConvertError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(err.is_fatal());
    }
}
