//! Branding-asset roles.

use serde::{Deserialize, Serialize};

/// Semantic role of a stored branding image.
///
/// At most one current asset exists per (exhibition, exhibitor-or-null,
/// role) tuple; a newer upload for the same tuple supersedes the prior one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetRole {
    /// Colored event background with the organizer logo, used as the badge
    /// header band.
    BackgroundWithLogo,
    /// White (knockout) variant of the event logo.
    WhiteLogo,
    /// Generic event logo, also the footer fallback of last resort.
    EventLogo,
}

impl AssetRole {
    /// Event-scoped roles tried for the header band, most preferred first.
    pub const HEADER_FALLBACK_ORDER: [AssetRole; 3] = [
        AssetRole::BackgroundWithLogo,
        AssetRole::WhiteLogo,
        AssetRole::EventLogo,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AssetRole::BackgroundWithLogo => "background_with_logo",
            AssetRole::WhiteLogo => "white_logo",
            AssetRole::EventLogo => "event_logo",
        }
    }
}
