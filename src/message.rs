//! Message envelope and its tagged payload and header values.

use std::collections::HashMap;

use bytes::Bytes;
use http::Uri;
use serde_json::Value;
use url::Url;

use crate::error::{MapperError, Result};

/// Well-known header names read by the mapper.
pub mod header_names {
    /// Target URL for the outbound request.
    pub const REQUEST_URL: &str = "http.request-url";
    /// HTTP method for the outbound request.
    pub const REQUEST_METHOD: &str = "http.request-method";
}

/// A header value carried by a [`Message`].
///
/// The mapper recognizes three shapes for the target URL header: an
/// already-parsed URL, a URI that may still be relative, and a raw string.
/// Anything else is opaque to the mapper and only survives envelope
/// serialization.
#[derive(Debug, Clone)]
pub enum HeaderValue {
    /// An absolute URL, usable directly as a request target.
    Url(Url),
    /// A URI, possibly relative; converted to a URL at resolution time.
    Uri(Uri),
    /// A plain string.
    Text(String),
    /// Any other value; not usable as a request target.
    Other(Value),
}

impl HeaderValue {
    /// Render the value as a plain string, whatever its shape.
    pub(crate) fn render(&self) -> String {
        match self {
            HeaderValue::Url(url) => url.to_string(),
            HeaderValue::Uri(uri) => uri.to_string(),
            HeaderValue::Text(text) => text.clone(),
            HeaderValue::Other(Value::String(s)) => s.clone(),
            HeaderValue::Other(value) => value.to_string(),
        }
    }

    /// Short label for error messages.
    pub(crate) fn type_name(&self) -> &'static str {
        match self {
            HeaderValue::Url(_) => "url",
            HeaderValue::Uri(_) => "uri",
            HeaderValue::Text(_) => "text",
            HeaderValue::Other(_) => "other",
        }
    }

    fn to_json(&self) -> Value {
        match self {
            HeaderValue::Url(url) => Value::String(url.to_string()),
            HeaderValue::Uri(uri) => Value::String(uri.to_string()),
            HeaderValue::Text(text) => Value::String(text.clone()),
            HeaderValue::Other(value) => value.clone(),
        }
    }
}

/// A message payload, classified into a closed set of serializable shapes.
#[derive(Debug, Clone)]
pub enum Payload {
    /// Raw bytes, passed through to the request body unchanged.
    Bytes(Bytes),
    /// Text, encoded with the configured charset.
    Text(String),
    /// A structured value, handed to the object-serialization collaborator.
    Structured(Value),
    /// A value with no defined serialization. Carries a label describing the
    /// value for error reporting.
    Opaque(String),
}

impl Payload {
    /// Build a structured payload from any serializable value.
    pub fn structured<T: serde::Serialize>(value: T) -> Result<Self> {
        let value = serde_json::to_value(value)?;
        Ok(Payload::Structured(value))
    }
}

/// Immutable message envelope: an optional payload plus string-keyed headers.
///
/// Created by the caller per request and discarded after mapping; the mapper
/// only reads it.
#[derive(Debug, Clone)]
pub struct Message {
    payload: Option<Payload>,
    headers: HashMap<String, HeaderValue>,
}

impl Message {
    /// Create a message carrying the given payload.
    pub fn new(payload: Payload) -> Self {
        Self {
            payload: Some(payload),
            headers: HashMap::new(),
        }
    }

    /// Create a message with no payload.
    pub fn without_payload() -> Self {
        Self {
            payload: None,
            headers: HashMap::new(),
        }
    }

    /// Attach a header, replacing any previous value for the same name.
    pub fn with_header(mut self, name: impl Into<String>, value: HeaderValue) -> Self {
        self.headers.insert(name.into(), value);
        self
    }

    /// Get the payload, if any.
    pub fn payload(&self) -> Option<&Payload> {
        self.payload.as_ref()
    }

    /// Get a header value by name.
    pub fn header(&self, name: &str) -> Option<&HeaderValue> {
        self.headers.get(name)
    }

    /// Get all headers.
    pub fn headers(&self) -> &HashMap<String, HeaderValue> {
        &self.headers
    }

    /// Collapse the whole envelope (headers + payload) into one structured
    /// value for serialization when payload extraction is disabled.
    pub(crate) fn envelope_value(&self) -> Result<Value> {
        let mut headers = serde_json::Map::with_capacity(self.headers.len());
        for (name, value) in &self.headers {
            headers.insert(name.clone(), value.to_json());
        }
        let payload = match &self.payload {
            None => Value::Null,
            Some(Payload::Bytes(bytes)) => {
                Value::Array(bytes.iter().map(|b| Value::from(*b)).collect())
            }
            Some(Payload::Text(text)) => Value::String(text.clone()),
            Some(Payload::Structured(value)) => value.clone(),
            Some(Payload::Opaque(label)) => {
                return Err(MapperError::UnsupportedPayloadType {
                    found: label.clone(),
                })
            }
        };
        let mut envelope = serde_json::Map::with_capacity(2);
        envelope.insert("headers".to_string(), Value::Object(headers));
        envelope.insert("payload".to_string(), payload);
        Ok(Value::Object(envelope))
    }
}
