//! Payload serialization dispatch.

use bytes::Bytes;
use encoding_rs::Encoding;
use serde_json::Value;

use crate::error::{MapperError, Result};
use crate::message::Payload;

/// Object-serialization collaborator for structured payloads.
///
/// The reported content type is `application/x-<format>-serialized-object`,
/// where `<format>` comes from [`format`](ObjectSerializer::format). The
/// encoding must be deterministic enough to honor that label.
pub trait ObjectSerializer: Send + Sync {
    /// Short format label used in the content type.
    fn format(&self) -> &str;

    /// Encode a structured value to bytes.
    fn serialize(&self, value: &Value) -> Result<Vec<u8>>;
}

/// JSON object serializer, the default collaborator.
#[derive(Debug, Default)]
pub struct JsonObjectSerializer;

impl ObjectSerializer for JsonObjectSerializer {
    fn format(&self) -> &str {
        "json"
    }

    fn serialize(&self, value: &Value) -> Result<Vec<u8>> {
        serde_json::to_vec(value).map_err(MapperError::Serialization)
    }
}

pub(crate) fn serialized_object_content_type(serializer: &dyn ObjectSerializer) -> String {
    format!("application/x-{}-serialized-object", serializer.format())
}

/// Convert a payload into body bytes and a content type.
///
/// Dispatch order: raw bytes pass through, text is charset-encoded, any other
/// structured value goes through the object serializer. Opaque payloads have
/// no defined serialization and fail.
pub(crate) fn write_body(
    payload: &Payload,
    charset: &'static Encoding,
    serializer: &dyn ObjectSerializer,
) -> Result<(Bytes, String)> {
    match payload {
        Payload::Bytes(bytes) => Ok((
            bytes.clone(),
            "application/octet-stream".to_string(),
        )),
        Payload::Text(text) => {
            let (encoded, _, _) = charset.encode(text);
            Ok((
                Bytes::from(encoded.into_owned()),
                format!("text/plain; charset={}", charset.name()),
            ))
        }
        Payload::Structured(value) => {
            let encoded = serializer.serialize(value)?;
            Ok((Bytes::from(encoded), serialized_object_content_type(serializer)))
        }
        Payload::Opaque(label) => Err(MapperError::UnsupportedPayloadType {
            found: label.clone(),
        }),
    }
}
