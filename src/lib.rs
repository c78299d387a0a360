//! # qrlogo
//!
//! A Rust library for rendering QR codes with a centered logo.
//!
//! `qrlogo` draws an encoded QR symbol onto a square raster, clears an opaque knockout pad in the
//! middle and places a logo (or a "LOGO" placeholder) inside it. Symbol encoding itself is
//! delegated to the `qrcode` crate; this library is about the layout and compositing on top of it,
//! plus a live preview session that re-renders whenever a control changes.
//!
//! ## Features
//!
//! - Configurable raster side, quiet zone, error correction level and colors.
//! - Knockout pad sized as a percentage of the symbol, with optional rounded corners.
//! - Optional thin guide outline around the pad.
//! - Logos from raw image bytes or `data:` URIs, scaled with a high-quality filter.
//! - Deterministic output: the same parameters always give the same pixels.
//! - PNG export to bytes, data URI or file.
//!
//! ## Installation
//!
//! Add to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! qrlogo = "0.1" # Replace with the latest version
//! ```
//!
//! ## Example
//!
//! Render once with the default controls:
//!
//! ```rust
//! use qrlogo::{Compositor, RenderParams, RenderSpec};
//!
//! let params = RenderParams::default();
//! let raster = Compositor::new().render(&RenderSpec::new(&params, None)).unwrap();
//! assert_eq!(raster.dimensions(), (512, 512));
//! ```
//!
//! Drive a live preview:
//!
//! ```rust
//! use qrlogo::{Preview, QrCodeEcc};
//!
//! let mut preview = Preview::default();
//! preview.set_payload("https://example.com/menu");
//! preview.set_correction_level(QrCodeEcc::Quartile);
//! preview.set_logo_percent(25);
//! preview.refresh().unwrap();
//! let png = preview.export_png().unwrap();
//! assert!(!png.is_empty());
//! ```
//!
//! ## Modules
//!
//! - [`composite`]: The render pass: base symbol, knockout, guide, logo.
//! - [`preview`]: Live preview session with change tracking.
//! - [`params`]: User-adjustable controls and their defaults.
//! - [`layout`]: Knockout and logo geometry.
//! - [`symbol`]: Base symbol rasterization over the `qrcode` crate.
//! - [`decode`]: Logo decoding, synchronous or on the rayon pool.
//! - [`export`]: PNG output.

#![forbid(unsafe_code)]

pub mod composite;
pub mod decode;
pub mod error;
pub mod export;
pub(crate) mod glyphs;
pub mod layout;
pub(crate) mod paint;
pub mod params;
pub(crate) mod path;
pub mod preview;
pub mod symbol;

pub use composite::{Compositor, RenderSpec};
pub use decode::{decode_logo, decode_logo_async, LogoImage};
pub use error::{DecodeError, EncodeError, ExportError, ParamsError, RenderError};
pub use layout::{LogoPlacement, Rect};
pub use params::{Color, QrCodeEcc, RenderParams};
pub use preview::{PassOutcome, PendingPass, Preview, ReadyPass};
pub use symbol::{QrSymbolEncoder, SymbolEncoder, SymbolRequest};
