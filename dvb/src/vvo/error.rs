//! VVO client error types.

use super::convert::ConversionError;

/// Kind reported for malformed caller arguments.
pub const VALIDATION_ERROR: &str = "ValidationError";

/// Kind reported for responses that can't be interpreted at all.
pub const GENERIC_ERROR: &str = "Error";

/// Errors from the VVO client.
#[derive(Debug, thiserror::Error)]
pub enum VvoError {
    /// Caller passed an argument the API can't accept. Raised before any request.
    #[error("validation error: {0}")]
    Validation(String),

    /// The provider rejected the request with its own status code.
    #[error("{code}: {message}")]
    Service { code: String, message: String },

    /// The response had no status block, or none we could read.
    #[error("unexpected error: {0}")]
    Unexpected(String),

    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success HTTP status without a status block in the body.
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// JSON deserialization failed.
    #[error("JSON parse error: {message}")]
    Json {
        message: String,
        body: Option<String>,
    },

    /// A response field could not be decoded.
    #[error("conversion error: {0}")]
    Conversion(#[from] ConversionError),
}

impl VvoError {
    /// The error kind: `"ValidationError"`, the provider's status code for
    /// service errors, or `"Error"` for everything else.
    pub fn kind(&self) -> &str {
        match self {
            VvoError::Validation(_) => VALIDATION_ERROR,
            VvoError::Service { code, .. } => code,
            _ => GENERIC_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = VvoError::Service {
            code: "ServiceError".into(),
            message: "stop invalid".into(),
        };
        assert_eq!(err.to_string(), "ServiceError: stop invalid");

        let err = VvoError::Validation("query must not be empty".into());
        assert_eq!(err.to_string(), "validation error: query must not be empty");

        let err = VvoError::Api {
            status: 502,
            message: "Bad Gateway".into(),
        };
        assert_eq!(err.to_string(), "API error 502: Bad Gateway");

        let err = VvoError::Json {
            message: "expected value".into(),
            body: Some("<html>".into()),
        };
        assert!(err.to_string().contains("JSON parse error"));
    }

    #[test]
    fn kinds() {
        assert_eq!(VvoError::Validation(String::new()).kind(), "ValidationError");
        assert_eq!(VvoError::Unexpected(String::new()).kind(), "Error");
        let err = VvoError::Service {
            code: "NoItConnection".into(),
            message: String::new(),
        };
        assert_eq!(err.kind(), "NoItConnection");
    }
}
