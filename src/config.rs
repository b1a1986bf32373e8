//! Mapper configuration with atomic snapshot swapping.

use std::sync::Arc;

use arc_swap::ArcSwap;
use encoding_rs::{Encoding, UTF_8};
use url::Url;

use crate::error::{MapperError, Result};

/// Immutable mapper configuration snapshot.
#[derive(Debug, Clone)]
pub struct MapperConfig {
    /// Fallback target URL when the message carries no URL header.
    pub default_url: Option<Url>,
    /// Map the payload itself (true) or the whole message envelope (false).
    pub extract_payload: bool,
    /// Charset for text payloads and query-parameter encoding.
    pub charset: &'static Encoding,
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            default_url: None,
            extract_payload: true,
            charset: UTF_8,
        }
    }
}

impl MapperConfig {
    /// Create a configuration with the given default target URL.
    pub fn with_default_url(url: Url) -> Self {
        Self {
            default_url: Some(url),
            ..Self::default()
        }
    }
}

/// Shared, atomically swappable configuration handle.
///
/// Wrapped in an `ArcSwap` so readers take one consistent snapshot per
/// mapping call while setters publish a replacement without locking.
/// Updates are expected to be far less frequent than reads.
#[derive(Clone)]
pub struct SharedConfig {
    inner: Arc<ArcSwap<MapperConfig>>,
}

impl SharedConfig {
    /// Create a handle from an initial configuration.
    pub fn new(config: MapperConfig) -> Self {
        Self {
            inner: Arc::new(ArcSwap::from_pointee(config)),
        }
    }

    /// Get the current configuration snapshot.
    ///
    /// The snapshot stays valid for the caller even if a setter swaps in a
    /// new configuration concurrently.
    pub fn load(&self) -> Arc<MapperConfig> {
        self.inner.load_full()
    }

    /// Replace the default target URL.
    pub fn set_default_url(&self, url: Option<Url>) {
        self.update(|config| config.default_url = url);
    }

    /// Enable or disable payload extraction.
    pub fn set_extract_payload(&self, extract_payload: bool) {
        self.update(|config| config.extract_payload = extract_payload);
    }

    /// Replace the charset by label, e.g. "UTF-8".
    ///
    /// Unknown labels are rejected here, at set-time, never per mapping call.
    pub fn set_charset(&self, label: &str) -> Result<()> {
        let charset = Encoding::for_label(label.as_bytes()).ok_or_else(|| {
            MapperError::UnsupportedCharset {
                label: label.to_string(),
            }
        })?;
        self.update(|config| config.charset = charset);
        Ok(())
    }

    fn update(&self, apply: impl FnOnce(&mut MapperConfig)) {
        let mut next = (**self.inner.load()).clone();
        apply(&mut next);
        self.inner.store(Arc::new(next));
    }
}
