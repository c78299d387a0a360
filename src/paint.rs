//! Painting primitives on an `RgbaImage`.
//!
//! Paths are rasterized by tiny-skia into an anti-aliased coverage mask and glyphs by rusttype.
//! Either way the coverage scales the paint alpha and `image`'s own source-over blend is applied,
//! the same one `imageops::overlay` uses for the logo.

use image::imageops::{self, FilterType};
use image::{Pixel, Rgba, RgbaImage};
use rusttype::PositionedGlyph;
use tiny_skia::{FillRule, LineCap, LineJoin, Mask, Path, Stroke, Transform};

use crate::layout::LogoPlacement;
use crate::params::Color;

/// Fills `path` with `color`.
pub fn fill_path(raster: &mut RgbaImage, path: &Path, color: Color) {
    let Some(mut mask) = Mask::new(raster.width(), raster.height()) else {
        return;
    };
    mask.fill_path(path, FillRule::Winding, true, Transform::identity());
    blend_mask(raster, &mask, color);
}

/// Strokes `path` with a line of `width` pixels.
pub fn stroke_path(raster: &mut RgbaImage, path: &Path, width: f32, color: Color) {
    let stroke = Stroke {
        width,
        line_cap: LineCap::Butt,
        line_join: LineJoin::Miter,
        ..Stroke::default()
    };
    if let Some(outline) = path.stroke(&stroke, 1.0) {
        fill_path(raster, &outline, color);
    }
}

/// Blends `color` over every pixel, weighted by the mask coverage.
fn blend_mask(raster: &mut RgbaImage, mask: &Mask, color: Color) {
    for (pixel, &cov) in raster.pixels_mut().zip(mask.data()) {
        blend_coverage(pixel, color, f32::from(cov) / 255.0);
    }
}

/// Source-over of `color` onto `pixel`, with its alpha scaled by `coverage` in `0.0..=1.0`.
fn blend_coverage(pixel: &mut Rgba<u8>, color: Color, coverage: f32) {
    let alpha = (f32::from(color.alpha()) * coverage.clamp(0.0, 1.0)).round() as u8;
    if alpha == 0 {
        return;
    }
    let mut src = color.to_rgba();
    src.0[3] = alpha;
    pixel.blend(&src);
}

/// Fills laid-out glyphs with `color`, clipped to the raster.
pub fn fill_glyphs(raster: &mut RgbaImage, glyphs: &[PositionedGlyph<'_>], color: Color) {
    let (width, height) = raster.dimensions();
    for glyph in glyphs {
        let Some(bb) = glyph.pixel_bounding_box() else {
            continue;
        };
        glyph.draw(|gx, gy, coverage| {
            let x = gx as i32 + bb.min.x;
            let y = gy as i32 + bb.min.y;
            if x < 0 || y < 0 || x as u32 >= width || y as u32 >= height {
                return;
            }
            blend_coverage(raster.get_pixel_mut(x as u32, y as u32), color, coverage);
        });
    }
}

/// Resamples `logo` to the placement size with a Lanczos filter and composites it.
pub fn draw_image(raster: &mut RgbaImage, logo: &RgbaImage, placement: LogoPlacement) {
    let resized = if logo.dimensions() == (placement.width, placement.height) {
        logo.clone()
    } else {
        imageops::resize(logo, placement.width, placement.height, FilterType::Lanczos3)
    };
    imageops::overlay(raster, &resized, placement.x, placement.y);
}
