//! Branding asset resolution for badge rendering.
//!
//! Header and footer artwork is resolved through ordered fallback chains
//! spanning exhibitor-scoped assets, event-scoped assets, and the catalog
//! logo. Stored references are loosely typed strings; each one is
//! classified by prefix and normalized to raw image bytes before any
//! rendering code sees it. Every step is individually fault-tolerant:
//! a missing or unreadable candidate is skipped, and total exhaustion
//! yields `None` so the renderer can paint its placeholder.

use std::path::{Component, Path, PathBuf};

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine as _;
use domain::models::AssetRole;
use persistence::repositories::{BrandingAssetRepository, CatalogEntryRepository};
use sqlx::PgPool;
use tracing::debug;

use crate::config::UploadsConfig;

/// Shape of a stored image reference, discriminated by a cheap prefix check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// `data:image/...;base64,...` — decoded directly to bytes.
    DataUri(String),
    /// Absolute `http(s)://` URL — fetched.
    Url(String),
    /// Site-relative `/api/...` path — resolved against the public base URL.
    ApiPath(String),
    /// Anything else — a path relative to the uploads root.
    UploadPath(String),
}

impl ImageSource {
    /// Classifies a stored reference value.
    pub fn classify(value: &str) -> Self {
        let trimmed = value.trim();
        if trimmed.starts_with("data:") {
            ImageSource::DataUri(trimmed.to_string())
        } else if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            ImageSource::Url(trimmed.to_string())
        } else if trimmed.starts_with("/api/") {
            ImageSource::ApiPath(trimmed.to_string())
        } else {
            ImageSource::UploadPath(trimmed.trim_start_matches('/').to_string())
        }
    }
}

/// Resolves header and footer artwork for one badge.
#[derive(Clone)]
pub struct BrandingResolver {
    assets: BrandingAssetRepository,
    catalog: CatalogEntryRepository,
    uploads: UploadsConfig,
    http: reqwest::Client,
}

impl BrandingResolver {
    pub fn new(pool: PgPool, uploads: UploadsConfig, http: reqwest::Client) -> Self {
        Self {
            assets: BrandingAssetRepository::new(pool.clone()),
            catalog: CatalogEntryRepository::new(pool),
            uploads,
            http,
        }
    }

    /// Resolves the header band image.
    ///
    /// Order: the exhibitor's own background-with-logo asset for this
    /// exhibition, then event-scoped roles from most to least preferred.
    /// `None` means the renderer paints a solid band instead.
    pub async fn resolve_header(
        &self,
        exhibition_id: i64,
        exhibitor_id: Option<i64>,
    ) -> Option<Vec<u8>> {
        if let Some(exhibitor_id) = exhibitor_id {
            let asset = self
                .assets
                .find_current_for_exhibitor(
                    exhibition_id,
                    exhibitor_id,
                    AssetRole::BackgroundWithLogo.into(),
                )
                .await
                .unwrap_or_else(|e| {
                    debug!(error = %e, "Exhibitor header lookup failed");
                    None
                });
            if let Some(asset) = asset {
                if let Some(bytes) = self.load_source(&asset.source).await {
                    return Some(bytes);
                }
            }
        }

        for role in AssetRole::HEADER_FALLBACK_ORDER {
            let asset = self
                .assets
                .find_current_for_event(exhibition_id, role.into())
                .await
                .unwrap_or_else(|e| {
                    debug!(error = %e, role = role.as_str(), "Event header lookup failed");
                    None
                });
            if let Some(asset) = asset {
                if let Some(bytes) = self.load_source(&asset.source).await {
                    return Some(bytes);
                }
            }
        }

        debug!(exhibition_id, "Header artwork exhausted, using placeholder");
        None
    }

    /// Resolves the footer logo.
    ///
    /// Order: the exhibitor's catalog logo for this exhibition, the
    /// exhibitor's GLOBAL catalog logo, then the event's generic logo
    /// asset. `None` means the renderer falls back to a text label.
    pub async fn resolve_footer_logo(
        &self,
        exhibition_id: i64,
        exhibitor_id: Option<i64>,
    ) -> Option<Vec<u8>> {
        if let Some(exhibitor_id) = exhibitor_id {
            let scoped = self
                .catalog
                .find_for_exhibition(exhibitor_id, exhibition_id)
                .await
                .unwrap_or_else(|e| {
                    debug!(error = %e, "Catalog logo lookup failed");
                    None
                });
            if let Some(logo) = scoped.and_then(|e| e.logo) {
                if let Some(bytes) = self.load_source(&logo).await {
                    return Some(bytes);
                }
            }

            let global = self.catalog.find_global(exhibitor_id).await.unwrap_or_else(|e| {
                debug!(error = %e, "GLOBAL catalog logo lookup failed");
                None
            });
            if let Some(logo) = global.and_then(|e| e.logo) {
                if let Some(bytes) = self.load_source(&logo).await {
                    return Some(bytes);
                }
            }
        }

        let asset = self
            .assets
            .find_current_for_event(exhibition_id, AssetRole::EventLogo.into())
            .await
            .unwrap_or_else(|e| {
                debug!(error = %e, "Event logo lookup failed");
                None
            });
        if let Some(asset) = asset {
            if let Some(bytes) = self.load_source(&asset.source).await {
                return Some(bytes);
            }
        }

        debug!(exhibition_id, "Footer logo exhausted, using text label");
        None
    }

    /// Normalizes one stored reference to raw image bytes.
    ///
    /// Returns `None` for any unreadable, unreachable, or non-image
    /// candidate so the caller moves on to the next chain element.
    async fn load_source(&self, value: &str) -> Option<Vec<u8>> {
        let bytes = match ImageSource::classify(value) {
            ImageSource::DataUri(uri) => decode_data_uri(&uri),
            ImageSource::Url(url) => self.fetch(&url).await,
            ImageSource::ApiPath(path) => {
                if self.uploads.public_base_url.is_empty() {
                    debug!(path = %path, "No public base URL configured for API path");
                    None
                } else {
                    let url = format!(
                        "{}{}",
                        self.uploads.public_base_url.trim_end_matches('/'),
                        path
                    );
                    self.fetch(&url).await
                }
            }
            ImageSource::UploadPath(path) => self.read_upload(&path),
        }?;

        // A candidate that does not decode as an image is skipped, not embedded.
        if image::load_from_memory(&bytes).is_err() {
            debug!(value = %value, "Candidate is not a decodable image, skipping");
            return None;
        }

        Some(bytes)
    }

    async fn fetch(&self, url: &str) -> Option<Vec<u8>> {
        let response = match self.http.get(url).send().await {
            Ok(r) => r,
            Err(e) => {
                debug!(url = %url, error = %e, "Asset fetch failed");
                return None;
            }
        };

        match response.error_for_status() {
            Ok(r) => r.bytes().await.ok().map(|b| b.to_vec()),
            Err(e) => {
                debug!(url = %url, error = %e, "Asset fetch returned error status");
                None
            }
        }
    }

    /// Reads an uploads-relative path, probing the legacy root when the
    /// file is absent under the primary root.
    fn read_upload(&self, relative: &str) -> Option<Vec<u8>> {
        let relative = safe_relative_path(relative)?;

        let primary = Path::new(&self.uploads.root).join(&relative);
        if primary.exists() {
            return std::fs::read(&primary).ok();
        }

        if !self.uploads.legacy_root.is_empty() {
            let legacy = Path::new(&self.uploads.legacy_root).join(&relative);
            if legacy.exists() {
                return std::fs::read(&legacy).ok();
            }
        }

        debug!(path = %relative.display(), "Upload not found under any root");
        None
    }
}

/// Rejects path components that would escape the uploads root.
fn safe_relative_path(relative: &str) -> Option<PathBuf> {
    let path = Path::new(relative);
    if path
        .components()
        .all(|c| matches!(c, Component::Normal(_)))
    {
        Some(path.to_path_buf())
    } else {
        None
    }
}

/// Decodes the base64 payload of a `data:` URI.
fn decode_data_uri(uri: &str) -> Option<Vec<u8>> {
    let payload = uri.split_once(',')?.1;
    BASE64_STANDARD.decode(payload.trim()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    // A valid 1x1 white PNG.
    const TINY_PNG_BASE64: &str =
        "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mP8z8BQDwAEhQGAhKmMIQAAAABJRU5ErkJggg==";

    #[test]
    fn test_classify_data_uri() {
        assert_eq!(
            ImageSource::classify("data:image/png;base64,AAAA"),
            ImageSource::DataUri("data:image/png;base64,AAAA".to_string())
        );
    }

    #[test]
    fn test_classify_absolute_url() {
        assert_eq!(
            ImageSource::classify("https://cdn.example.com/logo.png"),
            ImageSource::Url("https://cdn.example.com/logo.png".to_string())
        );
        assert_eq!(
            ImageSource::classify("http://cdn.example.com/logo.png"),
            ImageSource::Url("http://cdn.example.com/logo.png".to_string())
        );
    }

    #[test]
    fn test_classify_api_path() {
        assert_eq!(
            ImageSource::classify("/api/files/logo.png"),
            ImageSource::ApiPath("/api/files/logo.png".to_string())
        );
    }

    #[test]
    fn test_classify_upload_path() {
        assert_eq!(
            ImageSource::classify("branding/17/header.png"),
            ImageSource::UploadPath("branding/17/header.png".to_string())
        );
        // Leading slash outside /api/ is still an uploads-relative path.
        assert_eq!(
            ImageSource::classify("/branding/17/header.png"),
            ImageSource::UploadPath("branding/17/header.png".to_string())
        );
    }

    #[test]
    fn test_classify_trims_whitespace() {
        assert_eq!(
            ImageSource::classify("  https://cdn.example.com/x.png "),
            ImageSource::Url("https://cdn.example.com/x.png".to_string())
        );
    }

    #[test]
    fn test_decode_data_uri() {
        let uri = format!("data:image/png;base64,{}", TINY_PNG_BASE64);
        let bytes = decode_data_uri(&uri).expect("should decode");
        assert_eq!(&bytes[..8], &[0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a]);
    }

    #[test]
    fn test_decode_data_uri_without_comma() {
        assert!(decode_data_uri("data:image/png;base64").is_none());
    }

    #[test]
    fn test_decode_data_uri_invalid_base64() {
        assert!(decode_data_uri("data:image/png;base64,!!!").is_none());
    }

    #[test]
    fn test_safe_relative_path_rejects_traversal() {
        assert!(safe_relative_path("../etc/passwd").is_none());
        assert!(safe_relative_path("branding/../../etc/passwd").is_none());
        assert!(safe_relative_path("branding/logo.png").is_some());
    }

    fn resolver_with_uploads(uploads: UploadsConfig) -> BrandingResolver {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy("postgres://localhost/expo_manager_test")
            .expect("lazy pool");
        BrandingResolver::new(pool, uploads, reqwest::Client::new())
    }

    #[tokio::test]
    async fn test_read_upload_probes_legacy_root() {
        let primary = tempfile::tempdir().unwrap();
        let legacy = tempfile::tempdir().unwrap();
        std::fs::write(legacy.path().join("logo.png"), b"legacy-bytes").unwrap();

        let resolver = resolver_with_uploads(UploadsConfig {
            root: primary.path().to_str().unwrap().to_string(),
            legacy_root: legacy.path().to_str().unwrap().to_string(),
            public_base_url: String::new(),
        });

        assert_eq!(
            resolver.read_upload("logo.png"),
            Some(b"legacy-bytes".to_vec())
        );
    }

    #[tokio::test]
    async fn test_read_upload_prefers_primary_root() {
        let primary = tempfile::tempdir().unwrap();
        let legacy = tempfile::tempdir().unwrap();
        std::fs::write(primary.path().join("logo.png"), b"primary").unwrap();
        std::fs::write(legacy.path().join("logo.png"), b"legacy").unwrap();

        let resolver = resolver_with_uploads(UploadsConfig {
            root: primary.path().to_str().unwrap().to_string(),
            legacy_root: legacy.path().to_str().unwrap().to_string(),
            public_base_url: String::new(),
        });

        assert_eq!(resolver.read_upload("logo.png"), Some(b"primary".to_vec()));
    }

    #[tokio::test]
    async fn test_read_upload_missing_everywhere() {
        let primary = tempfile::tempdir().unwrap();
        let resolver = resolver_with_uploads(UploadsConfig {
            root: primary.path().to_str().unwrap().to_string(),
            legacy_root: String::new(),
            public_base_url: String::new(),
        });

        assert!(resolver.read_upload("missing.png").is_none());
    }

    #[tokio::test]
    async fn test_load_source_rejects_non_image_bytes() {
        let primary = tempfile::tempdir().unwrap();
        std::fs::write(primary.path().join("not-image.png"), b"plain text").unwrap();

        let resolver = resolver_with_uploads(UploadsConfig {
            root: primary.path().to_str().unwrap().to_string(),
            legacy_root: String::new(),
            public_base_url: String::new(),
        });

        let result = resolver.load_source("not-image.png").await;
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_load_source_accepts_data_uri_image() {
        let resolver = resolver_with_uploads(UploadsConfig::default());
        let uri = format!("data:image/png;base64,{}", TINY_PNG_BASE64);

        let result = resolver.load_source(&uri).await;
        assert!(result.is_some());
    }
}
