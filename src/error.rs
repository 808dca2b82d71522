//! Error types for configuration and dispatch.
//!
//! Verb operations on [`ApiService`](crate::ApiService) never return these
//! directly: every failure they hit is folded into an
//! [`ApiResponse`](crate::ApiResponse) and logged. `Error` is what the
//! builders return and what an [`ApiTransport`](crate::ApiTransport) reports
//! back to the client, which then classifies it.

use http::StatusCode;

/// The main error type for the crate.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Invalid configuration was provided.
    ///
    /// Raised at construction time: empty base endpoint, empty api key,
    /// missing transport, or an invalid default header.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The request URL could not be resolved against the transport host.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// A network-level error occurred (connection refused, DNS failure,
    /// malformed response, etc.).
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    /// The server sent a status line but its body could not be read
    /// (connection dropped mid-body, bad encoding, etc.).
    #[error("Failed to read response body (status {status}): {source}")]
    BodyRead {
        /// The HTTP status code received before the body failed
        status: StatusCode,
        /// The underlying reqwest error
        #[source]
        source: reqwest::Error,
    },

    /// The request timed out or was cancelled before a response arrived.
    #[error("Request timed out")]
    Timeout,

    /// The server answered with a non-2xx status code.
    #[error("Response status code does not indicate success: {status}")]
    Status {
        /// The HTTP status code
        status: StatusCode,
        /// The raw response body
        body: String,
    },

    /// The request payload could not be serialized to JSON.
    #[error("Failed to serialize request: {0}")]
    Serialization(String),

    /// The response body could not be converted into the expected shape.
    #[error("Failed to deserialize response (status {status}): {serde_error}")]
    Deserialization {
        /// The HTTP status code
        status: StatusCode,
        /// The serde error message
        serde_error: String,
    },
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Error::Timeout
        } else {
            Error::Network(err)
        }
    }
}

impl Error {
    /// Returns the HTTP status code associated with this error, if any.
    ///
    /// Network errors only carry one when reqwest saw a response before
    /// failing.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Network(e) => e.status(),
            Error::BodyRead { status, .. } => Some(*status),
            Error::Status { status, .. } => Some(*status),
            Error::Deserialization { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Short name of the error kind, used when an error has no underlying
    /// source to report.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Configuration(_) => "Configuration",
            Error::InvalidUrl(_) => "InvalidUrl",
            Error::Network(_) => "Network",
            Error::BodyRead { .. } => "BodyRead",
            Error::Timeout => "Timeout",
            Error::Status { .. } => "Status",
            Error::Serialization(_) => "Serialization",
            Error::Deserialization { .. } => "Deserialization",
        }
    }
}

/// A specialized `Result` type for this crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_reports_code() {
        let err = Error::Status {
            status: StatusCode::NOT_FOUND,
            body: "missing".to_string(),
        };
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
        assert_eq!(err.kind(), "Status");
        assert_eq!(
            err.to_string(),
            "Response status code does not indicate success: 404 Not Found"
        );
    }

    #[test]
    fn test_timeout_has_no_status() {
        assert_eq!(Error::Timeout.status(), None);
        assert_eq!(Error::Timeout.kind(), "Timeout");
    }

    #[test]
    fn test_url_parse_error_converts() {
        let parse_err = url::Url::parse("not a url").unwrap_err();
        let err: Error = parse_err.into();
        assert!(matches!(err, Error::InvalidUrl(_)));
        assert_eq!(err.status(), None);
    }
}
