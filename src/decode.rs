//! Logo image decoding.
//!
//! Logos arrive either as raw encoded bytes (PNG, JPEG, ...) or as a `data:` URI such as a browser
//! file reader produces. Decoding is the only potentially slow step before compositing, so it can
//! run on the rayon pool with the result delivered through a oneshot channel.

use std::borrow::Cow;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use futures::channel::oneshot;
use image::RgbaImage;
use tracing::{debug, error};

use crate::error::DecodeError;

/// A decoded logo, always held as straight-alpha RGBA8.
#[derive(Clone, Debug, PartialEq)]
pub struct LogoImage {
    pixels: RgbaImage,
}

impl LogoImage {
    /// Wraps an already decoded raster.
    pub fn from_rgba(pixels: RgbaImage) -> Result<Self, DecodeError> {
        let (width, height) = pixels.dimensions();
        if width == 0 || height == 0 {
            return Err(DecodeError::Empty { width, height });
        }
        Ok(Self { pixels })
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn into_pixels(self) -> RgbaImage {
        self.pixels
    }
}

/// Returns the encoded image bytes, unwrapping a base64 `data:` URI if `input` is one.
fn image_bytes(input: &[u8]) -> Result<Cow<'_, [u8]>, DecodeError> {
    let trimmed = input.trim_ascii();
    let Some(rest) = trimmed.strip_prefix(b"data:") else {
        return Ok(Cow::Borrowed(input));
    };
    let comma = rest
        .iter()
        .position(|&b| b == b',')
        .ok_or_else(|| DecodeError::MalformedDataUri("missing ',' separator".to_string()))?;
    let (header, body) = (&rest[..comma], &rest[comma + 1..]);
    if !header.ends_with(b";base64") {
        return Err(DecodeError::MalformedDataUri(format!(
            "unsupported encoding in header {:?}",
            String::from_utf8_lossy(header)
        )));
    }
    Ok(Cow::Owned(STANDARD.decode(body)?))
}

/// Decodes raw image bytes or a base64 `data:` URI into a [`LogoImage`].
pub fn decode_logo(input: &[u8]) -> Result<LogoImage, DecodeError> {
    let bytes = image_bytes(input)?;
    let decoded = image::load_from_memory(&bytes)?;
    debug!(
        width = decoded.width(),
        height = decoded.height(),
        "decoded logo"
    );
    LogoImage::from_rgba(decoded.into_rgba8())
}

/// Decodes on the rayon thread pool.
///
/// Dropping the receiver abandons the result; the decode itself still runs to completion.
pub fn decode_logo_async(input: Vec<u8>) -> oneshot::Receiver<Result<LogoImage, DecodeError>> {
    let (oneshot_sender, oneshot_receiver) = oneshot::channel::<Result<LogoImage, DecodeError>>();

    rayon::spawn(move || {
        if let Err(_data) = oneshot_sender.send(decode_logo(&input)) {
            error!("Sending decoded logo to receiver failed, receiver already dropped");
        }
    });

    oneshot_receiver
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba};
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, Rgba([12, 34, 56, 255]));
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_decode_raw_png() {
        let logo = decode_logo(&png_bytes(7, 3)).unwrap();
        assert_eq!((logo.width(), logo.height()), (7, 3));
        assert_eq!(*logo.pixels().get_pixel(0, 0), Rgba([12, 34, 56, 255]));
    }

    #[test]
    fn test_decode_data_uri() {
        let uri = format!("data:image/png;base64,{}", STANDARD.encode(png_bytes(4, 4)));
        let logo = decode_logo(uri.as_bytes()).unwrap();
        assert_eq!((logo.width(), logo.height()), (4, 4));
    }

    #[test]
    fn test_malformed_inputs() {
        assert!(matches!(
            decode_logo(b"not an image"),
            Err(DecodeError::Image(_))
        ));
        assert!(matches!(
            decode_logo(b"data:image/png;base64"),
            Err(DecodeError::MalformedDataUri(_))
        ));
        assert!(matches!(
            decode_logo(b"data:image/svg+xml,%3Csvg%3E"),
            Err(DecodeError::MalformedDataUri(_))
        ));
        assert!(matches!(
            decode_logo(b"data:image/png;base64,@@@@"),
            Err(DecodeError::Base64(_))
        ));
    }

    #[test]
    fn test_decode_async_delivers_result() {
        let receiver = decode_logo_async(png_bytes(5, 9));
        let logo = futures::executor::block_on(receiver).unwrap().unwrap();
        assert_eq!((logo.width(), logo.height()), (5, 9));
    }

    #[test]
    fn test_empty_raster_rejected() {
        assert!(matches!(
            LogoImage::from_rgba(RgbaImage::new(0, 3)),
            Err(DecodeError::Empty {
                width: 0,
                height: 3
            })
        ));
    }
}
