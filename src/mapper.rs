//! Message-to-request assembly.

use std::sync::Arc;

use bytes::Bytes;
use http::Method;
use tracing::{debug, trace};
use url::Url;

use crate::config::{MapperConfig, SharedConfig};
use crate::error::{MapperError, Result};
use crate::message::{header_names, HeaderValue, Message, Payload};
use crate::query::{append_query_params, ParamMap};
use crate::request::OutboundRequest;
use crate::serializer::{
    serialized_object_content_type, write_body, JsonObjectSerializer, ObjectSerializer,
};

/// Maps messages onto immutable outbound HTTP request descriptors.
///
/// Stateless per call beyond the shared configuration snapshot: no I/O, no
/// blocking, no retained state, so concurrent calls run fully in parallel.
pub struct RequestMapper {
    config: SharedConfig,
    serializer: Arc<dyn ObjectSerializer>,
}

impl RequestMapper {
    /// Create a mapper with the default JSON object serializer.
    pub fn new(config: MapperConfig) -> Self {
        Self::with_serializer(config, Arc::new(JsonObjectSerializer))
    }

    /// Create a mapper with a custom object-serialization collaborator.
    pub fn with_serializer(config: MapperConfig, serializer: Arc<dyn ObjectSerializer>) -> Self {
        Self {
            config: SharedConfig::new(config),
            serializer,
        }
    }

    /// Get the shared configuration handle for runtime updates.
    pub fn config(&self) -> &SharedConfig {
        &self.config
    }

    /// Map a message to an outbound request descriptor.
    ///
    /// One configuration snapshot is read at call start and used for the
    /// whole call, so a concurrent configuration swap can never mix, say,
    /// two charsets within one request. All failures are typed
    /// [`MapperError`]s; nothing is produced on failure.
    pub fn map_to_request(&self, message: &Message) -> Result<OutboundRequest> {
        let config = self.config.load();
        let url = resolve_url(message, &config)?;
        let method = resolve_method(message)?;
        debug!(
            url = %url,
            method = %method,
            extract_payload = config.extract_payload,
            "mapping message to outbound request"
        );
        if config.extract_payload {
            self.request_from_payload(message, url, method, &config)
        } else {
            self.request_from_envelope(message, url, method)
        }
    }

    fn request_from_payload(
        &self,
        message: &Message,
        url: Url,
        method: Method,
        config: &MapperConfig,
    ) -> Result<OutboundRequest> {
        if is_body_method(&method) {
            let payload = message.payload().ok_or(MapperError::MissingPayload)?;
            let (body, content_type) =
                write_body(payload, config.charset, self.serializer.as_ref())?;
            Ok(OutboundRequest::new(method, url, Some(content_type), body))
        } else {
            let params = parameter_map(message.payload(), &method)?;
            let url = append_query_params(&url, &params, config.charset)?;
            Ok(OutboundRequest::new(method, url, None, Bytes::new()))
        }
    }

    fn request_from_envelope(
        &self,
        message: &Message,
        url: Url,
        method: Method,
    ) -> Result<OutboundRequest> {
        if !is_body_method(&method) {
            return Err(MapperError::MethodNotSupported { method });
        }
        let envelope = message.envelope_value()?;
        let body = self.serializer.serialize(&envelope)?;
        let content_type = serialized_object_content_type(self.serializer.as_ref());
        Ok(OutboundRequest::new(
            method,
            url,
            Some(content_type),
            Bytes::from(body),
        ))
    }
}

/// Resolve the target URL from the message header or the configured default.
fn resolve_url(message: &Message, config: &MapperConfig) -> Result<Url> {
    match message.header(header_names::REQUEST_URL) {
        Some(HeaderValue::Url(url)) => Ok(url.clone()),
        Some(HeaderValue::Uri(uri)) => parse_target(&uri.to_string()),
        Some(HeaderValue::Text(text)) => parse_target(text),
        Some(other @ HeaderValue::Other(_)) => Err(MapperError::InvalidHeaderType {
            header: header_names::REQUEST_URL,
            found: other.type_name().to_string(),
        }),
        None => {
            trace!("no URL header, falling back to configured default");
            config
                .default_url
                .clone()
                .ok_or(MapperError::UnresolvedTarget)
        }
    }
}

fn parse_target(raw: &str) -> Result<Url> {
    Url::parse(raw).map_err(|error| MapperError::MalformedTarget {
        url: raw.to_string(),
        error,
    })
}

/// Read the method header, normalized to uppercase; defaults to POST.
fn resolve_method(message: &Message) -> Result<Method> {
    let Some(header) = message.header(header_names::REQUEST_METHOD) else {
        return Ok(Method::POST);
    };
    let name = header.render().to_ascii_uppercase();
    Method::from_bytes(name.as_bytes()).map_err(|_| MapperError::InvalidHeaderType {
        header: header_names::REQUEST_METHOD,
        found: name,
    })
}

fn is_body_method(method: &Method) -> bool {
    *method == Method::POST || *method == Method::PUT
}

/// Derive the parameter map for a query-path request.
///
/// Only a structured payload shaped as a string-keyed object with string or
/// string-list values qualifies; anything else is a mapping failure, never a
/// partial result.
fn parameter_map(payload: Option<&Payload>, method: &Method) -> Result<ParamMap> {
    let shape_error = || MapperError::InvalidPayloadShape {
        method: method.clone(),
    };
    let Some(Payload::Structured(serde_json::Value::Object(map))) = payload else {
        return Err(shape_error());
    };
    let mut params = ParamMap::with_capacity(map.len());
    for (key, value) in map {
        let values = match value {
            serde_json::Value::String(s) => vec![s.clone()],
            serde_json::Value::Array(items) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    match item {
                        serde_json::Value::String(s) => out.push(s.clone()),
                        _ => return Err(shape_error()),
                    }
                }
                out
            }
            _ => return Err(shape_error()),
        };
        params.push((key.clone(), values));
    }
    Ok(params)
}
