use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, RgbaImage};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::debug;

use crate::error::ExportError;

/// Directory used by [`save_png`] when none is given.
pub const DEFAULT_DIRECTORY: &str = "generated";

/// Encodes the raster as PNG.
pub fn encode_png(raster: &RgbaImage) -> Result<Vec<u8>, ExportError> {
    let mut bytes = Vec::new();
    PngEncoder::new(&mut bytes).write_image(
        raster.as_raw(),
        raster.width(),
        raster.height(),
        ExtendedColorType::Rgba8,
    )?;
    Ok(bytes)
}

/// Encodes the raster as a `data:image/png;base64,...` URI.
pub fn to_data_uri(raster: &RgbaImage) -> Result<String, ExportError> {
    Ok(format!(
        "data:image/png;base64,{}",
        STANDARD.encode(encode_png(raster)?)
    ))
}

/// `qr-logo-<unix millis>.png`
pub fn default_filename() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|since_the_epoch| since_the_epoch.as_millis())
        .unwrap_or_default();
    format!("qr-logo-{millis}.png")
}

/// Saves the raster as a PNG file and returns its path.
///
/// # Arguments
///
/// * `raster` - The finished raster.
/// * `directory` - Optional. Target directory, created if missing. Defaults to "generated".
/// * `filename` - Optional. File name; `.png` is appended when it has no extension. Defaults to a
///   timestamp-based name.
pub fn save_png(
    raster: &RgbaImage,
    directory: Option<&Path>,
    filename: Option<&str>,
) -> Result<PathBuf, ExportError> {
    let directory = directory.unwrap_or_else(|| Path::new(DEFAULT_DIRECTORY));
    let filename = match filename {
        Some(name) if Path::new(name).extension().is_some() => name.to_string(),
        Some(name) => format!("{name}.png"),
        None => default_filename(),
    };

    if !directory.exists() {
        fs::create_dir_all(directory)?;
    }

    let file_path = directory.join(filename);
    fs::write(&file_path, encode_png(raster)?)?;
    debug!(path = %file_path.display(), "saved png");
    Ok(file_path)
}
