//! Mapping error types.

use std::fmt;

use http::Method;

/// Errors produced while mapping a message to an outbound request.
///
/// Every variant is terminal for the current mapping call. The mapper never
/// retries internally and produces no partial descriptor on failure; recovery
/// policy belongs to the caller.
#[derive(Debug)]
pub enum MapperError {
    /// No target URL header on the message and no default URL configured.
    UnresolvedTarget,

    /// A header value or constructed string is not a valid absolute URL.
    MalformedTarget {
        url: String,
        error: url::ParseError,
    },

    /// A well-known header is present but its value is unusable.
    InvalidHeaderType {
        header: &'static str,
        found: String,
    },

    /// Body-bearing method with no payload to extract.
    MissingPayload,

    /// Query-path method with a payload that is not a string-keyed map of
    /// string or string-list values.
    InvalidPayloadShape { method: Method },

    /// The payload variant has no defined serialization.
    UnsupportedPayloadType { found: String },

    /// Non-body method while payload extraction is disabled.
    MethodNotSupported { method: Method },

    /// Unknown charset label, rejected at configuration time.
    UnsupportedCharset { label: String },

    /// The object-serialization collaborator failed.
    Serialization(serde_json::Error),
}

impl fmt::Display for MapperError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapperError::UnresolvedTarget => {
                write!(f, "failed to determine a target URL for message")
            }
            MapperError::MalformedTarget { url, error } => {
                write!(f, "malformed target URL '{}': {}", url, error)
            }
            MapperError::InvalidHeaderType { header, found } => {
                write!(f, "unusable value for header '{}': {}", header, found)
            }
            MapperError::MissingPayload => {
                write!(f, "payload must be present for a body-bearing request")
            }
            MapperError::InvalidPayloadShape { method } => {
                write!(
                    f,
                    "payload must be a map with string keys and string or \
                     string-list values for a '{}' request",
                    method
                )
            }
            MapperError::UnsupportedPayloadType { found } => {
                write!(f, "payload type has no defined serialization: {}", found)
            }
            MapperError::MethodNotSupported { method } => {
                write!(
                    f,
                    "POST or PUT is required when payload extraction is disabled, got '{}'",
                    method
                )
            }
            MapperError::UnsupportedCharset { label } => {
                write!(f, "unsupported charset '{}'", label)
            }
            MapperError::Serialization(e) => {
                write!(f, "object serialization failed: {}", e)
            }
        }
    }
}

impl std::error::Error for MapperError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MapperError::MalformedTarget { error, .. } => Some(error),
            MapperError::Serialization(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for MapperError {
    fn from(e: serde_json::Error) -> Self {
        MapperError::Serialization(e)
    }
}

/// Result type alias for mapping operations.
pub type Result<T> = std::result::Result<T, MapperError>;
