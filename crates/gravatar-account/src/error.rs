//! Error types for account operations.

use thiserror::Error;

/// Result type alias for account operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by [`AccountClient`](crate::AccountClient).
#[derive(Debug, Error)]
pub enum Error {
    /// Neither a password nor an API key was supplied.
    #[error("Configuration error: a password or an API key is required")]
    MissingCredentials,

    /// The configured endpoint is not a valid URL.
    #[error("Invalid endpoint: {0}")]
    Endpoint(#[from] url::ParseError),

    /// Transport, HTTP or XML-RPC decoding failure.
    #[error("RPC error: {0}")]
    Rpc(gravatar_xmlrpc::Error),

    /// Fault -7: the call must be made over a secure channel.
    #[error("Secure connection required: {0}")]
    Secure(String),

    /// Fault -8: internal server error.
    #[error("Internal server error: {0}")]
    Internal(String),

    /// Fault -9: bad password or API key.
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Fault -10: a required parameter was missing.
    #[error("Missing parameter: {0}")]
    ParameterMissing(String),

    /// Fault -11: a parameter had an incorrect value.
    #[error("Incorrect parameter: {0}")]
    ParameterIncorrect(String),

    /// Fault -100: miscellaneous server error.
    #[error("Server error: {0}")]
    Misc(String),

    /// Any other fault code.
    #[error("Unknown remote error {code}: {message}")]
    Unknown {
        /// Fault code as reported.
        code: i64,
        /// Fault message as reported.
        message: String,
    },

    /// The server could not apply the operation to this address.
    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    /// The server could not fetch or store an image from this URL.
    #[error("Invalid image URL: {0}")]
    InvalidUrl(String),

    /// The server rejected the uploaded image data.
    #[error("Invalid image data")]
    InvalidData,

    /// No image with this id exists in the account.
    #[error("Invalid image id: {0}")]
    InvalidImageId(String),

    /// The response did not have the shape the procedure returns.
    #[error("Unexpected response from {procedure}: {message}")]
    UnexpectedResponse {
        /// Remote procedure name.
        procedure: &'static str,
        /// What was wrong with the response.
        message: String,
    },
}

impl Error {
    /// Maps a remote fault to its error kind.
    #[must_use]
    pub fn from_fault(code: i64, message: impl Into<String>) -> Self {
        let message = message.into();
        match code {
            -7 => Self::Secure(message),
            -8 => Self::Internal(message),
            -9 => Self::Authentication(message),
            -10 => Self::ParameterMissing(message),
            -11 => Self::ParameterIncorrect(message),
            -100 => Self::Misc(message),
            code => Self::Unknown { code, message },
        }
    }

    /// Creates an unexpected-response error.
    #[must_use]
    pub fn unexpected(procedure: &'static str, message: impl Into<String>) -> Self {
        Self::UnexpectedResponse {
            procedure,
            message: message.into(),
        }
    }

    /// Returns the remote fault code for fault-derived errors.
    #[must_use]
    pub const fn fault_code(&self) -> Option<i64> {
        match self {
            Self::Secure(_) => Some(-7),
            Self::Internal(_) => Some(-8),
            Self::Authentication(_) => Some(-9),
            Self::ParameterMissing(_) => Some(-10),
            Self::ParameterIncorrect(_) => Some(-11),
            Self::Misc(_) => Some(-100),
            Self::Unknown { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Returns true if the credentials were rejected.
    #[must_use]
    pub const fn is_auth_error(&self) -> bool {
        matches!(self, Self::Authentication(_))
    }
}

impl From<gravatar_xmlrpc::Error> for Error {
    fn from(err: gravatar_xmlrpc::Error) -> Self {
        match err {
            gravatar_xmlrpc::Error::Fault { code, message } => Self::from_fault(code, message),
            other => Self::Rpc(other),
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::redundant_clone,
    clippy::manual_string_new,
    clippy::needless_collect,
    clippy::unreadable_literal,
    clippy::used_underscore_items,
    clippy::similar_names
)]
mod tests {
    use super::*;

    #[test]
    fn test_known_fault_codes() {
        assert!(matches!(Error::from_fault(-7, "m"), Error::Secure(_)));
        assert!(matches!(Error::from_fault(-8, "m"), Error::Internal(_)));
        assert!(matches!(Error::from_fault(-10, "m"), Error::ParameterMissing(_)));
        assert!(matches!(Error::from_fault(-11, "m"), Error::ParameterIncorrect(_)));
        assert!(matches!(Error::from_fault(-100, "m"), Error::Misc(_)));
    }

    #[test]
    fn test_authentication_keeps_message() {
        let err = Error::from_fault(-9, "Invalid password");
        match &err {
            Error::Authentication(message) => assert_eq!(message, "Invalid password"),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.is_auth_error());
        assert_eq!(err.fault_code(), Some(-9));
    }

    #[test]
    fn test_unknown_fault_code() {
        let err = Error::from_fault(-999, "weird");
        match &err {
            Error::Unknown { code, message } => {
                assert_eq!(*code, -999);
                assert_eq!(message, "weird");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(err.fault_code(), Some(-999));
    }

    #[test]
    fn test_from_rpc_error() {
        let err: Error = gravatar_xmlrpc::Error::fault(-9, "nope").into();
        assert!(err.is_auth_error());

        let err: Error = gravatar_xmlrpc::Error::Status(502).into();
        assert!(matches!(err, Error::Rpc(gravatar_xmlrpc::Error::Status(502))));
        assert_eq!(err.fault_code(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(
            Error::InvalidEmail("b@x.com".into()).to_string(),
            "Invalid email address: b@x.com"
        );
        assert_eq!(
            Error::MissingCredentials.to_string(),
            "Configuration error: a password or an API key is required"
        );
    }
}
