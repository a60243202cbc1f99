//! Badge pipeline services.

pub mod badge_render;
pub mod branding;
pub mod bulk_package;
pub mod font_resolver;
pub mod qr;

pub use badge_render::BadgeRenderer;
pub use branding::BrandingResolver;
pub use bulk_package::BadgeArchiveBuilder;
pub use font_resolver::FontResolver;
pub use qr::QrEncoder;
