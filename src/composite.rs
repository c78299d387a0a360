//! The composite renderer.
//!
//! A render pass layers four steps onto one raster, always in this order:
//!
//! 1. base symbol, fully overwriting the raster,
//! 2. opaque knockout pad around the logo area,
//! 3. optional translucent guide outline,
//! 4. logo image, or the "LOGO" placeholder when there is none.
//!
//! Each step opaquely covers what it touches, and the guide is drawn before the logo so it never
//! covers it. Since the base step replaces every pixel, a pass carries no state from earlier
//! passes and identical specs give identical rasters.

use image::RgbaImage;
use tracing::{debug, trace, warn};

use crate::decode::LogoImage;
use crate::error::{RenderError, Result};
use crate::glyphs;
use crate::layout::{self, Rect};
use crate::paint;
use crate::params::{Color, QrCodeEcc, RenderParams};
use crate::path::rounded_rect;
use crate::symbol::{QrSymbolEncoder, SymbolEncoder, SymbolRequest};

/// Knockout fill. Deliberately independent of the symbol background color.
pub const KNOCKOUT_FILL: Color = Color::WHITE;
/// Guide outline: black at 12% opacity.
pub const GUIDE_STROKE: Color = Color::rgba(0, 0, 0, 31);
pub const GUIDE_WIDTH: f32 = 1.0;
/// Placeholder text color.
pub const PLACEHOLDER_FILL: Color = Color::rgb(0x11, 0x18, 0x27);

/// Everything one render pass needs, derived fresh from the current controls.
#[derive(Clone, Copy, Debug)]
pub struct RenderSpec<'a> {
    pub payload: &'a str,
    pub side: u32,
    /// Quiet zone in encoder modules.
    pub quiet_zone_units: u32,
    pub correction_level: QrCodeEcc,
    pub foreground: Color,
    pub background: Color,
    pub logo: Option<&'a LogoImage>,
    pub logo_side: u32,
    pub knockout_pad: u32,
    pub rounded: bool,
    pub show_guide: bool,
}

impl<'a> RenderSpec<'a> {
    pub fn new(params: &'a RenderParams, logo: Option<&'a LogoImage>) -> Self {
        Self {
            payload: params.encoded_payload(),
            side: params.side,
            quiet_zone_units: params.quiet_zone_units(),
            correction_level: params.correction_level,
            foreground: params.foreground,
            background: params.background,
            logo,
            logo_side: params.logo_side(),
            knockout_pad: params.knockout_pad(),
            rounded: params.rounded,
            show_guide: params.show_guide,
        }
    }

    /// The knockout rectangle, always inside the raster.
    pub fn knockout(&self) -> Rect {
        layout::knockout_rect(self.side, self.logo_side, self.knockout_pad)
    }

    pub fn corner_radius(&self) -> u32 {
        layout::corner_radius(self.knockout(), self.rounded)
    }

    fn symbol_request(&self) -> SymbolRequest<'a> {
        SymbolRequest {
            payload: self.payload,
            level: self.correction_level,
            side: self.side,
            margin: self.quiet_zone_units,
            foreground: self.foreground,
            background: self.background,
        }
    }
}

/// Renders [`RenderSpec`]s with a given symbol encoder.
#[derive(Clone, Debug, Default)]
pub struct Compositor<E = QrSymbolEncoder> {
    encoder: E,
}

impl Compositor<QrSymbolEncoder> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<E: SymbolEncoder> Compositor<E> {
    pub fn with_encoder(encoder: E) -> Self {
        Self { encoder }
    }

    pub fn encoder(&self) -> &E {
        &self.encoder
    }

    /// Runs a full pass and returns the finished raster.
    pub fn render(&self, spec: &RenderSpec<'_>) -> Result<RgbaImage> {
        debug!(
            side = spec.side,
            level = %spec.correction_level,
            logo = spec.logo.is_some(),
            "render pass"
        );
        let mut raster = self.base_pass(spec)?;
        knockout_pass(&mut raster, spec);
        if spec.show_guide {
            guide_pass(&mut raster, spec);
        }
        logo_pass(&mut raster, spec);
        Ok(raster)
    }

    /// Runs a full pass and replaces `target` with the result.
    ///
    /// On failure `target` keeps its previous content.
    pub fn render_into(&self, spec: &RenderSpec<'_>, target: &mut RgbaImage) -> Result<()> {
        *target = self.render(spec)?;
        Ok(())
    }

    fn base_pass(&self, spec: &RenderSpec<'_>) -> Result<RgbaImage> {
        self.encoder
            .encode(&spec.symbol_request())
            .map_err(|err| {
                warn!("Base symbol pass failed, Err: {err}");
                RenderError::from(err)
            })
    }
}

fn knockout_pass(raster: &mut RgbaImage, spec: &RenderSpec<'_>) {
    let rect = spec.knockout();
    let radius = spec.corner_radius();
    trace!(?rect, radius, "knockout pass");
    if let Some(path) = rounded_rect(
        rect.x as f32,
        rect.y as f32,
        rect.width as f32,
        rect.height as f32,
        radius as f32,
    ) {
        paint::fill_path(raster, &path, KNOCKOUT_FILL);
    }
}

fn guide_pass(raster: &mut RgbaImage, spec: &RenderSpec<'_>) {
    let rect = spec.knockout();
    let inset = GUIDE_WIDTH / 2.0;
    // Centered on the half-pixel so the 1px line lands on whole pixels.
    if let Some(path) = rounded_rect(
        rect.x as f32 + inset,
        rect.y as f32 + inset,
        rect.width as f32 - GUIDE_WIDTH,
        rect.height as f32 - GUIDE_WIDTH,
        spec.corner_radius() as f32,
    ) {
        paint::stroke_path(raster, &path, GUIDE_WIDTH, GUIDE_STROKE);
    }
}

fn logo_pass(raster: &mut RgbaImage, spec: &RenderSpec<'_>) {
    match spec.logo {
        Some(logo) => {
            if let Some(placement) =
                layout::fit_logo(logo.width(), logo.height(), spec.logo_side, spec.side)
            {
                trace!(?placement, "logo pass");
                paint::draw_image(raster, logo.pixels(), placement);
            }
        }
        None => {
            let Some(font) = glyphs::placeholder_font() else {
                return;
            };
            let font_size = layout::placeholder_font_size(spec.logo_side);
            let center = spec.side as f32 / 2.0;
            trace!(font_size, "placeholder pass");
            let text =
                glyphs::layout_centered(font, glyphs::PLACEHOLDER_TEXT, center, center, font_size as f32);
            paint::fill_glyphs(raster, &text, PLACEHOLDER_FILL);
        }
    }
}
