//! Printable badge assembly.
//!
//! A badge is one fixed-size A6 card: a header band with the event
//! artwork, the exhibition title, dates and hours, the attendee identity
//! block, a dashed separator, and a footer row with the exhibitor logo on
//! the left and the QR symbol on the right. Every raster input is
//! normalized to RGB pixels sized to its placement box before embedding,
//! so the mix of formats uploads arrive in never breaks the document.
//!
//! The only fatal outcome is an unknown exhibition. Missing fonts,
//! missing artwork, and QR encoding failures all degrade to the
//! documented placeholders.

use std::io::Cursor;
use std::sync::Arc;

use persistence::entities::AttendeeEntity;
use persistence::repositories::ExhibitionRepository;
use printpdf::image_crate::{self, imageops::FilterType, DynamicImage, Rgb as RgbPixel, RgbImage};
use printpdf::path::PaintMode;
use printpdf::{
    BuiltinFont, Color, Image, ImageTransform, IndirectFontRef, Line, LineDashPattern, Mm,
    PdfDocument, PdfLayerReference, Point, Rect, Rgb,
};
use sqlx::PgPool;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::RenderingConfig;
use crate::services::branding::BrandingResolver;
use crate::services::font_resolver::FontResolver;
use crate::services::qr::QrEncoder;

/// Page geometry in millimeters (A6 portrait card).
const PAGE_WIDTH: f32 = 105.0;
const PAGE_HEIGHT: f32 = 148.0;
const MARGIN: f32 = 8.0;

/// Header band occupies the full page width at the top.
const HEADER_HEIGHT: f32 = 36.0;

/// Footer boxes.
const LOGO_BOX_WIDTH: f32 = 40.0;
const LOGO_BOX_HEIGHT: f32 = 26.0;
const QR_BOX: f32 = 28.0;
const FOOTER_BASELINE: f32 = 11.0;

/// Separator between the identity block and the footer row.
const SEPARATOR_Y: f32 = 46.0;

/// Badge rendering errors.
#[derive(Debug, Error)]
pub enum BadgeRenderError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Document assembly failed: {0}")]
    Pdf(String),
}

/// Everything the card layout needs, already resolved.
pub struct BadgeContent {
    pub exhibition_name: String,
    pub date_range: String,
    pub hours: Option<String>,
    pub full_name: String,
    pub role_title: Option<String>,
    pub company_name: Option<String>,
    pub font: Option<Arc<Vec<u8>>>,
    pub header_image: Option<Vec<u8>>,
    pub footer_logo: Option<Vec<u8>>,
    pub qr_png: Option<Vec<u8>>,
}

/// Renders printable badges for attendees.
#[derive(Clone)]
pub struct BadgeRenderer {
    exhibitions: ExhibitionRepository,
    branding: BrandingResolver,
    fonts: FontResolver,
    rendering: RenderingConfig,
}

impl BadgeRenderer {
    pub fn new(
        pool: PgPool,
        branding: BrandingResolver,
        fonts: FontResolver,
        rendering: RenderingConfig,
    ) -> Self {
        Self {
            exhibitions: ExhibitionRepository::new(pool),
            branding,
            fonts,
            rendering,
        }
    }

    /// Renders one badge.
    ///
    /// Returns `Ok(None)` when the exhibition does not exist; this is the
    /// only case that yields no document. The attendee's stored access
    /// code is used when present; otherwise a display-only code is
    /// synthesized and NOT persisted (persistence belongs to the
    /// registration flow).
    pub async fn render(
        &self,
        exhibition_id: i64,
        attendee: &AttendeeEntity,
        company_name: Option<&str>,
    ) -> Result<Option<Vec<u8>>, BadgeRenderError> {
        let Some(exhibition) = self.exhibitions.find_by_id(exhibition_id).await? else {
            warn!(exhibition_id, "Exhibition not found, badge not rendered");
            return Ok(None);
        };

        let code = match &attendee.access_code {
            Some(code) => code.clone(),
            None => {
                debug!(attendee_id = attendee.id, "Synthesizing display-only access code");
                domain::models::generate_access_code(
                    &exhibition.name,
                    exhibition.id,
                    attendee.exhibitor_id,
                )
            }
        };

        let qr_png = match QrEncoder::encode_png(&code, self.rendering.qr_print_resolution_px) {
            Ok(png) => Some(png),
            Err(e) => {
                warn!(attendee_id = attendee.id, error = %e, "QR encoding failed, badge rendered without symbol");
                None
            }
        };

        let content = BadgeContent {
            date_range: shared::dates::format_date_range(exhibition.starts_on, exhibition.ends_on),
            hours: exhibition.display_hours().map(String::from),
            exhibition_name: exhibition.name,
            full_name: attendee.full_name.clone(),
            role_title: attendee.role_title.clone(),
            company_name: company_name.map(String::from),
            font: self.fonts.resolve().await,
            header_image: self
                .branding
                .resolve_header(exhibition_id, attendee.exhibitor_id)
                .await,
            footer_logo: self
                .branding
                .resolve_footer_logo(exhibition_id, attendee.exhibitor_id)
                .await,
            qr_png,
        };

        compose(&content, self.rendering.dpi).map(Some)
    }
}

/// Assembles the PDF card from resolved content.
pub fn compose(content: &BadgeContent, dpi: f32) -> Result<Vec<u8>, BadgeRenderError> {
    let (doc, page, layer) = PdfDocument::new(
        "Attendee badge",
        Mm(PAGE_WIDTH),
        Mm(PAGE_HEIGHT),
        "badge",
    );
    let layer = doc.get_page(page).get_layer(layer);

    let font = resolve_document_font(&doc, content)?;

    draw_header(&layer, content, dpi);
    draw_identity_block(&layer, content, &font);
    draw_separator(&layer);
    draw_footer(&layer, content, &font, dpi);

    doc.save_to_bytes().map_err(|e| BadgeRenderError::Pdf(e.to_string()))
}

/// Embeds the resolved font, falling back to the builtin base font when no
/// font was resolved or the bytes do not parse. The builtin font cannot
/// encode all of Latin Extended; that is the documented degraded mode.
fn resolve_document_font(
    doc: &printpdf::PdfDocumentReference,
    content: &BadgeContent,
) -> Result<IndirectFontRef, BadgeRenderError> {
    if let Some(bytes) = content.font.as_deref() {
        match doc.add_external_font(Cursor::new(bytes.as_slice())) {
            Ok(font) => return Ok(font),
            Err(e) => warn!(error = %e, "Resolved font rejected by PDF builder, using builtin"),
        }
    }

    doc.add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| BadgeRenderError::Pdf(e.to_string()))
}

fn draw_header(layer: &PdfLayerReference, content: &BadgeContent, dpi: f32) {
    let placed = content.header_image.as_deref().is_some_and(|bytes| {
        embed_image(
            layer,
            bytes,
            0.0,
            PAGE_HEIGHT - HEADER_HEIGHT,
            PAGE_WIDTH,
            HEADER_HEIGHT,
            dpi,
            Fit::Fill,
        )
    });

    if !placed {
        // Solid band placeholder when every artwork source is exhausted.
        layer.set_fill_color(Color::Rgb(Rgb::new(0.13, 0.23, 0.42, None)));
        layer.add_rect(
            Rect::new(
                Mm(0.0),
                Mm(PAGE_HEIGHT - HEADER_HEIGHT),
                Mm(PAGE_WIDTH),
                Mm(PAGE_HEIGHT),
            )
            .with_mode(PaintMode::Fill),
        );
    }
}

fn draw_identity_block(layer: &PdfLayerReference, content: &BadgeContent, font: &IndirectFontRef) {
    layer.set_fill_color(Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None)));
    layer.use_text(
        content.exhibition_name.as_str(),
        15.0,
        Mm(MARGIN),
        Mm(101.0),
        font,
    );

    layer.set_fill_color(Color::Rgb(Rgb::new(0.35, 0.35, 0.35, None)));
    layer.use_text(content.date_range.as_str(), 9.5, Mm(MARGIN), Mm(94.0), font);
    if let Some(hours) = &content.hours {
        layer.use_text(hours.as_str(), 9.5, Mm(MARGIN), Mm(88.5), font);
    }

    layer.set_fill_color(Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None)));
    layer.use_text(content.full_name.as_str(), 13.0, Mm(MARGIN), Mm(74.0), font);

    layer.set_fill_color(Color::Rgb(Rgb::new(0.25, 0.25, 0.25, None)));
    let mut y = 67.0;
    if let Some(role) = &content.role_title {
        layer.use_text(role.as_str(), 10.0, Mm(MARGIN), Mm(y), font);
        y -= 6.5;
    }
    if let Some(company) = &content.company_name {
        layer.use_text(company.as_str(), 10.0, Mm(MARGIN), Mm(y), font);
    }
}

fn draw_separator(layer: &PdfLayerReference) {
    layer.set_outline_color(Color::Rgb(Rgb::new(0.45, 0.45, 0.45, None)));
    layer.set_outline_thickness(0.6);
    layer.set_line_dash_pattern(LineDashPattern {
        dash_1: Some(2),
        gap_1: Some(2),
        ..Default::default()
    });
    layer.add_line(Line {
        points: vec![
            (Point::new(Mm(MARGIN), Mm(SEPARATOR_Y)), false),
            (Point::new(Mm(PAGE_WIDTH - MARGIN), Mm(SEPARATOR_Y)), false),
        ],
        is_closed: false,
    });
    layer.set_line_dash_pattern(LineDashPattern::default());
}

fn draw_footer(
    layer: &PdfLayerReference,
    content: &BadgeContent,
    font: &IndirectFontRef,
    dpi: f32,
) {
    let logo_placed = content.footer_logo.as_deref().is_some_and(|bytes| {
        embed_image(
            layer,
            bytes,
            MARGIN,
            FOOTER_BASELINE,
            LOGO_BOX_WIDTH,
            LOGO_BOX_HEIGHT,
            dpi,
            Fit::Contain,
        )
    });

    if !logo_placed {
        // Text label fallback when no logo resolves anywhere.
        let label = content
            .company_name
            .as_deref()
            .unwrap_or(content.exhibition_name.as_str());
        layer.set_fill_color(Color::Rgb(Rgb::new(0.25, 0.25, 0.25, None)));
        layer.use_text(label, 10.0, Mm(MARGIN), Mm(FOOTER_BASELINE + 10.0), font);
    }

    if let Some(qr) = content.qr_png.as_deref() {
        embed_image(
            layer,
            qr,
            PAGE_WIDTH - MARGIN - QR_BOX,
            FOOTER_BASELINE - 1.0,
            QR_BOX,
            QR_BOX,
            dpi,
            Fit::Exact,
        );
    }
}

/// How an image maps onto its placement box.
#[derive(Clone, Copy)]
enum Fit {
    /// Stretch to the box (header band).
    Fill,
    /// Preserve aspect ratio inside the box, centered (logos).
    Contain,
    /// Stretch with nearest-neighbour sampling (QR modules stay sharp).
    Exact,
}

/// Decodes, resizes and embeds one raster into the layer.
///
/// Returns false when the bytes do not decode; callers then draw their
/// placeholder instead.
fn embed_image(
    layer: &PdfLayerReference,
    bytes: &[u8],
    x_mm: f32,
    y_mm: f32,
    box_w_mm: f32,
    box_h_mm: f32,
    dpi: f32,
    fit: Fit,
) -> bool {
    let Ok(decoded) = image_crate::load_from_memory(bytes) else {
        debug!("Image bytes failed to decode, skipping embed");
        return false;
    };

    let box_w_px = ((box_w_mm / 25.4) * dpi).round().max(1.0) as u32;
    let box_h_px = ((box_h_mm / 25.4) * dpi).round().max(1.0) as u32;

    let resized = match fit {
        Fit::Fill => decoded.resize_exact(box_w_px, box_h_px, FilterType::Triangle),
        Fit::Contain => decoded.resize(box_w_px, box_h_px, FilterType::Triangle),
        Fit::Exact => decoded.resize_exact(box_w_px, box_h_px, FilterType::Nearest),
    };

    let (w_px, h_px) = (resized.width(), resized.height());
    let flattened = DynamicImage::ImageRgb8(flatten_to_rgb(resized));

    // Center the placed image inside its box.
    let placed_w_mm = w_px as f32 / dpi * 25.4;
    let placed_h_mm = h_px as f32 / dpi * 25.4;
    let translate_x = x_mm + (box_w_mm - placed_w_mm) / 2.0;
    let translate_y = y_mm + (box_h_mm - placed_h_mm) / 2.0;

    Image::from_dynamic_image(&flattened).add_to_layer(
        layer.clone(),
        ImageTransform {
            translate_x: Some(Mm(translate_x)),
            translate_y: Some(Mm(translate_y)),
            dpi: Some(dpi),
            ..Default::default()
        },
    );
    true
}

/// Flattens any alpha channel onto white so transparent logos keep a
/// printable background.
fn flatten_to_rgb(image: DynamicImage) -> RgbImage {
    if image.color().has_alpha() {
        let rgba = image.to_rgba8();
        let mut rgb = RgbImage::from_pixel(rgba.width(), rgba.height(), RgbPixel([255, 255, 255]));
        for (x, y, pixel) in rgba.enumerate_pixels() {
            let alpha = pixel[3] as u32;
            let blend = |c: u8| ((c as u32 * alpha + 255 * (255 - alpha)) / 255) as u8;
            rgb.put_pixel(x, y, RgbPixel([blend(pixel[0]), blend(pixel[1]), blend(pixel[2])]));
        }
        rgb
    } else {
        image.to_rgb8()
    }
}
