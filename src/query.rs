//! Query-parameter encoding onto a target URL.

use encoding_rs::Encoding;
use percent_encoding::{percent_encode, AsciiSet, NON_ALPHANUMERIC};
use url::Url;

use crate::error::{MapperError, Result};

/// Ordered parameter map: each key carries its values in submission order.
pub type ParamMap = Vec<(String, Vec<String>)>;

/// Characters kept literal in query components (RFC 3986 unreserved set).
const QUERY_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Append the parameter map to the URL's query component.
///
/// Any existing fragment is preserved verbatim: the URL is split at the first
/// `#`, parameters are appended before it, and the fragment is reattached.
/// A `&` separator is only inserted when the buffer does not already end in
/// `?` or `&`, so a URL ending in either never gains a duplicate separator.
pub(crate) fn append_query_params(
    url: &Url,
    params: &ParamMap,
    charset: &'static Encoding,
) -> Result<Url> {
    if params.is_empty() {
        return Ok(url.clone());
    }

    let raw = url.as_str();
    let (mut base, fragment) = match raw.find('#') {
        Some(index) => (raw[..index].to_string(), &raw[index..]),
        None => (raw.to_string(), ""),
    };

    if !base.contains('?') {
        base.push('?');
    }
    for (key, values) in params {
        for value in values {
            if !matches!(base.as_bytes().last(), Some(b'?' | b'&')) {
                base.push('&');
            }
            base.push_str(&encode_component(key, charset));
            base.push('=');
            base.push_str(&encode_component(value, charset));
        }
    }
    base.push_str(fragment);

    Url::parse(&base).map_err(|error| MapperError::MalformedTarget { url: base, error })
}

/// Charset-encode a component, then percent-encode the resulting bytes.
fn encode_component(component: &str, charset: &'static Encoding) -> String {
    let (bytes, _, _) = charset.encode(component);
    percent_encode(&bytes, QUERY_COMPONENT).to_string()
}
