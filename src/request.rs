//! Outbound request descriptor.

use bytes::Bytes;
use http::header::{CONTENT_LENGTH, CONTENT_TYPE};
use http::Method;
use url::Url;

/// Immutable outbound HTTP request descriptor.
///
/// Produced fully assembled by [`RequestMapper`](crate::mapper::RequestMapper)
/// and handed to the transport collaborator, which performs the actual
/// exchange. The target URL is absolute by construction and the method is
/// already normalized to uppercase.
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    method: Method,
    target_url: Url,
    content_type: Option<String>,
    body: Bytes,
}

impl OutboundRequest {
    pub(crate) fn new(
        method: Method,
        target_url: Url,
        content_type: Option<String>,
        body: Bytes,
    ) -> Self {
        Self {
            method,
            target_url,
            content_type,
            body,
        }
    }

    /// Get the HTTP method.
    #[inline]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Get the absolute target URL.
    #[inline]
    pub fn target_url(&self) -> &Url {
        &self.target_url
    }

    /// Get the content type, if one was determined.
    #[inline]
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Get the request body.
    #[inline]
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Get the content length, derived from the body.
    ///
    /// Absent for query-path requests, which carry no content at all.
    #[inline]
    pub fn content_length(&self) -> Option<usize> {
        if self.content_type.is_some() || !self.body.is_empty() {
            Some(self.body.len())
        } else {
            None
        }
    }
}

impl TryFrom<OutboundRequest> for http::Request<Bytes> {
    type Error = http::Error;

    fn try_from(request: OutboundRequest) -> Result<Self, http::Error> {
        let content_length = request.content_length();
        let mut builder = http::Request::builder()
            .method(request.method)
            .uri(request.target_url.as_str());

        if let Some(content_type) = &request.content_type {
            builder = builder.header(CONTENT_TYPE, content_type.as_str());
        }
        if let Some(length) = content_length {
            builder = builder.header(CONTENT_LENGTH, length);
        }

        builder.body(request.body)
    }
}
