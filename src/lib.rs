//! outbound-http - maps abstract messages onto outbound HTTP requests.
//!
//! This crate is the adapter boundary between an internal messaging
//! abstraction and the HTTP wire protocol: it turns a [`Message`] (an
//! arbitrary payload plus string-keyed headers) into an immutable
//! [`OutboundRequest`] descriptor (target URL, method, content type, body).
//! It performs no I/O of its own; executing the request belongs to a
//! transport collaborator.
//!
//! # Mapping policy
//!
//! - **URL resolution**: a well-known message header names the target URL,
//!   with a configured default as fallback.
//! - **Method semantics**: POST/PUT carry the serialized payload as the
//!   request body; any other method carries a string-keyed payload map as
//!   percent-encoded query parameters instead.
//! - **Payload dispatch**: raw bytes pass through, text is charset-encoded,
//!   structured values go through a pluggable [`ObjectSerializer`]
//!   (JSON by default).
//!
//! # Example
//!
//! ```rust,ignore
//! use outbound_http::{MapperConfig, Message, Payload, RequestMapper};
//!
//! let config = MapperConfig::with_default_url("http://example.org/inbox".parse()?);
//! let mapper = RequestMapper::new(config);
//!
//! let message = Message::new(Payload::Text("hello".to_string()));
//! let request = mapper.map_to_request(&message)?;
//! assert_eq!(request.method(), http::Method::POST);
//! ```

/// Package version from Cargo.toml
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod config;
pub mod error;
pub mod mapper;
pub mod message;
pub mod query;
pub mod request;
pub mod serializer;

// Re-exports for convenience
pub use config::{MapperConfig, SharedConfig};
pub use error::{MapperError, Result};
pub use mapper::RequestMapper;
pub use message::{header_names, HeaderValue, Message, Payload};
pub use query::ParamMap;
pub use request::OutboundRequest;
pub use serializer::{JsonObjectSerializer, ObjectSerializer};
