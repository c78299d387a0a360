//! Base symbol rendering.
//!
//! Encoding itself (segment modes, Reed-Solomon, masking) is delegated to the `qrcode` crate.
//! This module only maps the encoded module grid onto a raster of the requested side, the way a
//! canvas QR renderer does: a fractional `scale = side / (modules + 2 * margin)` with every pixel
//! sampling the module under it.

use image::RgbaImage;
use qrcode::types::QrError;
use qrcode::{EcLevel, QrCode};
use tracing::debug;

use crate::error::EncodeError;
use crate::params::{Color, QrCodeEcc};

impl From<QrCodeEcc> for EcLevel {
    fn from(level: QrCodeEcc) -> Self {
        match level {
            QrCodeEcc::Low => EcLevel::L,
            QrCodeEcc::Medium => EcLevel::M,
            QrCodeEcc::Quartile => EcLevel::Q,
            QrCodeEcc::High => EcLevel::H,
        }
    }
}

/// Everything the encoder needs to draw the base symbol.
#[derive(Clone, Copy, Debug)]
pub struct SymbolRequest<'a> {
    pub payload: &'a str,
    pub level: QrCodeEcc,
    /// Side of the output raster in pixels.
    pub side: u32,
    /// Quiet zone in modules.
    pub margin: u32,
    pub foreground: Color,
    pub background: Color,
}

/// Renders an encoded matrix symbol into a fresh raster.
///
/// Implementations must fail explicitly when the payload does not fit, never fall back to a
/// different level or silently truncate.
pub trait SymbolEncoder {
    fn encode(&self, request: &SymbolRequest<'_>) -> Result<RgbaImage, EncodeError>;
}

/// [`SymbolEncoder`] backed by the `qrcode` crate.
///
/// The error correction level is used as given; it is never boosted.
#[derive(Clone, Copy, Debug, Default)]
pub struct QrSymbolEncoder;

impl SymbolEncoder for QrSymbolEncoder {
    fn encode(&self, request: &SymbolRequest<'_>) -> Result<RgbaImage, EncodeError> {
        let code = QrCode::with_error_correction_level(request.payload.as_bytes(), request.level.into())
            .map_err(|err| match err {
                QrError::DataTooLong => EncodeError::DataTooLong {
                    len: request.payload.len(),
                    level: request.level.letter(),
                },
                other => EncodeError::Rejected(other.to_string()),
            })?;

        let modules = code.width() as u32;
        let dark: Vec<bool> = code
            .to_colors()
            .into_iter()
            .map(|color| color == qrcode::Color::Dark)
            .collect();
        debug!(
            modules,
            level = %request.level,
            side = request.side,
            "encoded symbol"
        );

        rasterize_modules(&dark, modules, request)
    }
}

/// Maps every pixel coordinate along one axis to the module it samples, or `None` inside the quiet
/// zone.
fn axis_lookup(side: u32, modules: u32, margin: u32) -> Vec<Option<u32>> {
    let total = f64::from(modules + 2 * margin);
    let scale = f64::from(side) / total;
    let scaled_margin = f64::from(margin) * scale;
    let end = f64::from(side) - scaled_margin;

    (0..side)
        .map(|i| {
            let p = f64::from(i);
            if p >= scaled_margin && p < end {
                let module = ((p - scaled_margin) / scale).floor() as u32;
                Some(module.min(modules - 1))
            } else {
                None
            }
        })
        .collect()
}

/// Draws a row-major module grid (`true` = dark) onto a `side x side` raster, overwriting every
/// pixel.
pub fn rasterize_modules(
    dark: &[bool],
    modules: u32,
    request: &SymbolRequest<'_>,
) -> Result<RgbaImage, EncodeError> {
    let required = modules + 2 * request.margin;
    if modules == 0 || request.side < required {
        return Err(EncodeError::RasterTooSmall {
            side: request.side,
            required,
        });
    }

    let lookup = axis_lookup(request.side, modules, request.margin);
    let foreground = request.foreground.to_rgba();
    let background = request.background.to_rgba();

    Ok(RgbaImage::from_fn(request.side, request.side, |x, y| {
        match (lookup[x as usize], lookup[y as usize]) {
            (Some(col), Some(row)) if dark[(row * modules + col) as usize] => foreground,
            _ => background,
        }
    }))
}
