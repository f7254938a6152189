//! Error types for XML-RPC operations.

use thiserror::Error;

/// Result type alias for XML-RPC operations.
pub type Result<T> = std::result::Result<T, Error>;

/// XML-RPC error types.
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success HTTP status.
    #[error("HTTP status {0}")]
    Status(u16),

    /// Endpoint URL could not be parsed.
    #[error("URL error: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Malformed XML-RPC document.
    #[error("Parse error at position {position}: {message}")]
    Parse {
        /// Byte position where the error occurred.
        position: usize,
        /// Description of what went wrong.
        message: String,
    },

    /// The remote procedure reported a fault.
    #[error("Fault {code}: {message}")]
    Fault {
        /// Numeric fault code.
        code: i64,
        /// Fault description from the server.
        message: String,
    },
}

impl Error {
    /// Creates a parse error at the given position.
    #[must_use]
    pub fn parse(position: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            position,
            message: message.into(),
        }
    }

    /// Creates a fault error.
    #[must_use]
    pub fn fault(code: i64, message: impl Into<String>) -> Self {
        Self::Fault {
            code,
            message: message.into(),
        }
    }

    /// Returns the fault code if this error is a remote fault.
    #[must_use]
    pub const fn fault_code(&self) -> Option<i64> {
        match self {
            Self::Fault { code, .. } => Some(*code),
            _ => None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_fault_code() {
        assert_eq!(Error::fault(-9, "bad password").fault_code(), Some(-9));
        assert_eq!(Error::Status(500).fault_code(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Error::fault(-8, "oops").to_string(), "Fault -8: oops");
        assert_eq!(
            Error::parse(12, "unexpected tag").to_string(),
            "Parse error at position 12: unexpected tag"
        );
    }
}
