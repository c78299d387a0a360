//! Text layout for the "LOGO" placeholder.
//!
//! The placeholder is set in a bundled bold sans face (DejaVu Sans Bold) so the output never
//! depends on the fonts installed on the host. Sizes are CSS-style: `font_size` is the em size
//! in pixels, not the line height.

use std::sync::OnceLock;

use rusttype::{point, Font, PositionedGlyph, Scale};
use tracing::warn;

/// Text drawn when no logo image is set.
pub const PLACEHOLDER_TEXT: &str = "LOGO";

static FONT_DATA: &[u8] = include_bytes!("../assets/fonts/DejaVuSans-Bold.ttf");

/// The bundled placeholder face, parsed once.
pub fn placeholder_font() -> Option<&'static Font<'static>> {
    static FONT: OnceLock<Option<Font<'static>>> = OnceLock::new();
    FONT.get_or_init(|| {
        let font = Font::try_from_bytes(FONT_DATA);
        if font.is_none() {
            warn!("Bundled placeholder font failed to parse");
        }
        font
    })
    .as_ref()
}

/// rusttype scales by line height (ascent - descent), so convert from an em size.
fn em_scale(font: &Font<'_>, font_size: f32) -> Scale {
    let metrics = font.v_metrics_unscaled();
    let units_per_em = f32::from(font.units_per_em());
    Scale::uniform(font_size * (metrics.ascent - metrics.descent) / units_per_em)
}

/// Advance width of `text` in pixels, kerning included.
pub fn text_width(font: &Font<'_>, font_size: f32, text: &str) -> f32 {
    if text.is_empty() || font_size <= 0.0 {
        return 0.0;
    }
    font.layout(text, em_scale(font, font_size), point(0.0, 0.0))
        .last()
        .map(|glyph| glyph.position().x + glyph.unpositioned().h_metrics().advance_width)
        .unwrap_or(0.0)
}

/// Lays out `text` centered on `(center_x, center_y)`.
///
/// Horizontal centering uses the advance width, vertical centering the middle of the
/// ascent/descent box, which is how a canvas with `textAlign = center` and
/// `textBaseline = middle` places text. Empty for a zero font size.
pub fn layout_centered<'f>(
    font: &'f Font<'f>,
    text: &str,
    center_x: f32,
    center_y: f32,
    font_size: f32,
) -> Vec<PositionedGlyph<'f>> {
    if font_size <= 0.0 {
        return Vec::new();
    }
    let scale = em_scale(font, font_size);
    let v_metrics = font.v_metrics(scale);
    let origin_x = center_x - text_width(font, font_size, text) / 2.0;
    let baseline_y = center_y + (v_metrics.ascent + v_metrics.descent) / 2.0;
    font.layout(text, scale, point(origin_x, baseline_y)).collect()
}
