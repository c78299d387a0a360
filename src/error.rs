//! Error types for rendering, decoding and exporting.

use thiserror::Error;

/// Result type alias for a render pass.
pub type Result<T> = std::result::Result<T, RenderError>;

/// The symbol encoder could not produce a base raster.
///
/// The ways to handle this error include:
///
/// - Raise the error correction tolerance only if the payload is short enough, otherwise lower it.
/// - Shorten the payload.
/// - Increase the raster side or decrease the quiet zone.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// The payload does not fit in any symbol version at the chosen level.
    #[error("Payload of {len} bytes does not fit at error correction level {level}")]
    DataTooLong { len: usize, level: char },

    /// The raster cannot hold one pixel per module plus the quiet zone.
    #[error("Raster side {side}px is smaller than {required} modules")]
    RasterTooSmall { side: u32, required: u32 },

    /// Any other rejection by the encoder.
    #[error("Encoder rejected payload: {0}")]
    Rejected(String),
}

/// The logo bytes could not be turned into a raster.
#[derive(Error, Debug)]
pub enum DecodeError {
    /// A `data:` URI without the `,` separator or with a non-base64 encoding.
    #[error("Malformed data URI: {0}")]
    MalformedDataUri(String),

    /// The base64 body of a data URI is invalid.
    #[error("Invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    /// The image crate could not decode the bytes.
    #[error("Unreadable image: {0}")]
    Image(#[from] image::ImageError),

    /// The image decoded to zero width or height.
    #[error("Image has no pixels ({width}x{height})")]
    Empty { width: u32, height: u32 },

    /// The background decode task went away before delivering a result.
    #[error("Decode task was cancelled")]
    Cancelled,
}

/// The finished raster could not be exported.
#[derive(Error, Debug)]
pub enum ExportError {
    /// Nothing has been rendered successfully yet.
    #[error("No raster available to export")]
    NoRaster,

    /// PNG encoding failed.
    #[error("PNG encoding failed: {0}")]
    Encode(#[from] image::ImageError),

    /// Creating the directory or writing the file failed.
    #[error("Failed to write export: {0}")]
    Io(#[from] std::io::Error),
}

/// A configuration value is outside what the controls allow, or could not be parsed.
#[derive(Error, Debug)]
pub enum ParamsError {
    #[error("{name} = {value} is outside {min}..={max}")]
    OutOfRange {
        name: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },

    #[error("Invalid color {0:?}")]
    InvalidColor(String),

    #[error("Invalid error correction level {0:?}")]
    InvalidLevel(String),

    #[error("Invalid configuration: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors that abort a render pass.
///
/// Both kinds leave the previously rendered raster untouched.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    Decode(#[from] DecodeError),
}
