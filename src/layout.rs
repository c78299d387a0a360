//! Pure geometry for the overlay: knockout placement, corner radius and logo fitting.
//!
//! Nothing here touches pixels. All rounding follows "round half up" so results match what a
//! canvas-based preview would compute for the same inputs.

use tracing::trace;

/// Pixel units per encoder module used when converting the quiet zone.
pub const PIXELS_PER_MARGIN_UNIT: f64 = 8.0;

/// Share of the knockout's shorter side used as corner radius when rounding is on.
pub const CORNER_RADIUS_FACTOR: f64 = 0.08;

/// An axis-aligned rectangle in raster pixels.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }
}

/// Where a resampled logo lands. The offset may be negative if the logo is larger than the raster.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct LogoPlacement {
    pub x: i64,
    pub y: i64,
    pub width: u32,
    pub height: u32,
}

pub(crate) fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// `round(total * percent / 100)`.
pub fn percent_of(total: u32, percent: u32) -> u32 {
    round_half_up(f64::from(total) * f64::from(percent) / 100.0) as u32
}

/// Converts a pixel quiet zone into encoder modules: `max(0, round(px / 8))`.
pub fn margin_units(margin_px: i32) -> u32 {
    round_half_up(f64::from(margin_px) / PIXELS_PER_MARGIN_UNIT).max(0.0) as u32
}

/// Top-left coordinate of the centered logo square, floored.
pub fn logo_origin(side: u32, logo_side: u32) -> i64 {
    (i64::from(side) - i64::from(logo_side)).div_euclid(2)
}

/// The knockout rectangle: the centered logo square grown by `pad` on every side, clamped to the
/// raster.
pub fn knockout_rect(side: u32, logo_side: u32, pad: u32) -> Rect {
    let origin = logo_origin(side, logo_side);
    let pad = i64::from(pad);
    let side_i = i64::from(side);
    let extent = i64::from(logo_side) + pad * 2;

    let x = (origin - pad).clamp(0, side_i);
    let y = (origin - pad).clamp(0, side_i);
    let width = (side_i - x).min(extent).max(0);
    let height = (side_i - y).min(extent).max(0);

    let rect = Rect {
        x: x as u32,
        y: y as u32,
        width: width as u32,
        height: height as u32,
    };
    trace!(side, logo_side, ?rect, "knockout rect");
    rect
}

/// `floor(min(w, h) * 0.08)` when rounded, `0` otherwise.
pub fn corner_radius(rect: Rect, rounded: bool) -> u32 {
    if !rounded {
        return 0;
    }
    (f64::from(rect.width.min(rect.height)) * CORNER_RADIUS_FACTOR).floor() as u32
}

/// Scales `image_width x image_height` uniformly into a `logo_side` square and centers it on the
/// raster.
///
/// Returns `None` for an image without pixels or a logo side of zero.
pub fn fit_logo(
    image_width: u32,
    image_height: u32,
    logo_side: u32,
    side: u32,
) -> Option<LogoPlacement> {
    if image_width == 0 || image_height == 0 || logo_side == 0 {
        return None;
    }
    let target = f64::from(logo_side);
    let scale = (target / f64::from(image_width)).min(target / f64::from(image_height));
    let width = round_half_up(f64::from(image_width) * scale).max(1.0) as u32;
    let height = round_half_up(f64::from(image_height) * scale).max(1.0) as u32;
    let x = round_half_up((f64::from(side) - f64::from(width)) / 2.0) as i64;
    let y = round_half_up((f64::from(side) - f64::from(height)) / 2.0) as i64;

    Some(LogoPlacement {
        x,
        y,
        width,
        height,
    })
}

/// Font size of the placeholder wordmark: `round(logo_side * 0.28)`.
pub fn placeholder_font_size(logo_side: u32) -> u32 {
    round_half_up(f64::from(logo_side) * 0.28) as u32
}
