//! Unicode-capable font resolution for badge rendering.
//!
//! Attendee and exhibition names carry diacritics that the PDF builtin
//! fonts cannot encode reliably, so rendering prefers a real TTF/OTF file.
//! Sources are tried in a fixed order: the configured local path, the
//! configured URL, known system font locations, and finally a remote
//! fallback known to cover Latin Extended. The first hit is kept for the
//! process lifetime.

use std::fs;
use std::sync::{Arc, RwLock};

use tracing::{debug, info, warn};

use crate::config::FontsConfig;

/// System font locations known to cover Latin Extended.
const SYSTEM_FONT_PATHS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/Library/Fonts/Arial Unicode.ttf",
];

/// Remote fallback: a broadly Unicode-capable family.
const FALLBACK_FONT_URL: &str =
    "https://github.com/googlefonts/noto-fonts/raw/main/hinted/ttf/NotoSans/NotoSans-Regular.ttf";

/// Resolves and caches one Unicode-capable font for the process lifetime.
#[derive(Clone)]
pub struct FontResolver {
    config: FontsConfig,
    http: reqwest::Client,
    // Single-assignment memo. Two concurrent first-callers may both
    // resolve; the first write wins and every later call reads it.
    cache: Arc<RwLock<Option<Arc<Vec<u8>>>>>,
}

impl FontResolver {
    /// Creates a resolver over the configured sources and HTTP client.
    pub fn new(config: FontsConfig, http: reqwest::Client) -> Self {
        Self {
            config,
            http,
            cache: Arc::new(RwLock::new(None)),
        }
    }

    /// Returns the resolved font bytes, or `None` when every source failed.
    ///
    /// Failure is degraded-but-non-fatal: callers fall back to a builtin
    /// base font and accept that non-ASCII glyphs may render incorrectly.
    /// Only successes are cached, so a later call may still recover.
    pub async fn resolve(&self) -> Option<Arc<Vec<u8>>> {
        if let Some(cached) = self.cache.read().ok().and_then(|guard| guard.clone()) {
            return Some(cached);
        }

        let resolved = Arc::new(self.resolve_uncached().await?);

        match self.cache.write() {
            Ok(mut guard) => Some(guard.get_or_insert_with(|| resolved).clone()),
            Err(_) => Some(resolved),
        }
    }

    async fn resolve_uncached(&self) -> Option<Vec<u8>> {
        if !self.config.path.is_empty() {
            if let Some(bytes) = read_font_file(&self.config.path) {
                info!(path = %self.config.path, "Resolved badge font from configured path");
                return Some(bytes);
            }
        }

        if !self.config.url.is_empty() {
            if let Some(bytes) = self.fetch_font(&self.config.url).await {
                info!(url = %self.config.url, "Resolved badge font from configured URL");
                return Some(bytes);
            }
        }

        for path in SYSTEM_FONT_PATHS {
            if let Some(bytes) = read_font_file(path) {
                info!(path = %path, "Resolved badge font from system location");
                return Some(bytes);
            }
        }

        if let Some(bytes) = self.fetch_font(FALLBACK_FONT_URL).await {
            info!("Resolved badge font from remote fallback");
            return Some(bytes);
        }

        warn!("No badge font source available, falling back to builtin font");
        None
    }

    async fn fetch_font(&self, url: &str) -> Option<Vec<u8>> {
        let response = match self.http.get(url).send().await {
            Ok(r) => r,
            Err(e) => {
                debug!(url = %url, error = %e, "Font fetch failed");
                return None;
            }
        };

        let bytes = match response.error_for_status() {
            Ok(r) => r.bytes().await.ok()?,
            Err(e) => {
                debug!(url = %url, error = %e, "Font fetch returned error status");
                return None;
            }
        };

        let bytes = bytes.to_vec();
        is_font_data(&bytes).then_some(bytes)
    }
}

/// Reads a font file, returning `None` for missing or non-font content.
fn read_font_file(path: &str) -> Option<Vec<u8>> {
    let bytes = fs::read(path).ok()?;
    is_font_data(&bytes).then_some(bytes)
}

/// Cheap sfnt container check: TrueType, OpenType/CFF, legacy Apple
/// TrueType, or a TrueType collection.
fn is_font_data(bytes: &[u8]) -> bool {
    bytes.len() > 4
        && matches!(
            &bytes[..4],
            [0x00, 0x01, 0x00, 0x00] | b"OTTO" | b"true" | b"ttcf"
        )
}
