//! Live preview session.
//!
//! [`Preview`] exclusively owns the controls, the logo bytes and the last finished raster. Every
//! setter that actually changes a value bumps a generation counter; the next pass renders the
//! latest state once, however many changes came in between.
//!
//! Logo decoding may run in the background. A pass started with [`Preview::begin_pass`] remembers
//! the generation it was started for, and [`Preview::complete`] drops it if the controls changed
//! meanwhile, so a late decode can never paint over a newer pass.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::channel::oneshot;
use image::RgbaImage;
use tracing::{debug, warn};

use crate::composite::{Compositor, RenderSpec};
use crate::decode::{self, LogoImage};
use crate::error::{DecodeError, ExportError, RenderError};
use crate::export;
use crate::params::{Color, QrCodeEcc, RenderParams};
use crate::symbol::{QrSymbolEncoder, SymbolEncoder};

/// What a refresh or completion did.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PassOutcome {
    /// A new raster was rendered and committed.
    Committed,
    /// Nothing changed since the last attempt, no pass ran.
    Unchanged,
    /// The pass belonged to an older generation and was discarded.
    Superseded,
}

#[derive(Debug)]
struct LogoSlot {
    bytes: Arc<[u8]>,
    decoded: Option<Arc<LogoImage>>,
}

enum LogoFetch {
    Ready(Arc<LogoImage>),
    Decoding(oneshot::Receiver<Result<LogoImage, DecodeError>>),
}

/// A pass waiting for its logo to decode. Obtained from [`Preview::begin_pass`].
#[must_use = "a pending pass does nothing until awaited and completed"]
pub struct PendingPass {
    generation: u64,
    params: RenderParams,
    logo: Option<LogoFetch>,
}

impl PendingPass {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Waits for the logo decode, if any. This is the only suspension point of a pass.
    pub async fn ready(self) -> ReadyPass {
        let logo = match self.logo {
            None => None,
            Some(LogoFetch::Ready(logo)) => Some(Ok(logo)),
            Some(LogoFetch::Decoding(receiver)) => Some(match receiver.await {
                Ok(result) => result.map(Arc::new),
                Err(oneshot::Canceled) => Err(DecodeError::Cancelled),
            }),
        };
        ReadyPass {
            generation: self.generation,
            params: self.params,
            logo,
        }
    }
}

/// A pass whose inputs are all available. Hand it to [`Preview::complete`].
#[must_use = "a ready pass must be completed to update the preview"]
pub struct ReadyPass {
    generation: u64,
    params: RenderParams,
    logo: Option<Result<Arc<LogoImage>, DecodeError>>,
}

impl ReadyPass {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Interactive render session over a set of controls.
pub struct Preview<E = QrSymbolEncoder> {
    compositor: Compositor<E>,
    params: RenderParams,
    logo: Option<LogoSlot>,
    generation: u64,
    attempted: Option<u64>,
    raster: Option<RgbaImage>,
    notice: Option<String>,
}

impl Default for Preview<QrSymbolEncoder> {
    fn default() -> Self {
        Self::new(RenderParams::default())
    }
}

impl Preview<QrSymbolEncoder> {
    pub fn new(params: RenderParams) -> Self {
        Self::with_compositor(Compositor::new(), params)
    }
}

impl<E: SymbolEncoder> Preview<E> {
    pub fn with_compositor(compositor: Compositor<E>, params: RenderParams) -> Self {
        Self {
            compositor,
            params,
            logo: None,
            generation: 0,
            attempted: None,
            raster: None,
            notice: None,
        }
    }

    pub fn params(&self) -> &RenderParams {
        &self.params
    }

    /// Current generation; increases with every effective change.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether the current generation has not been rendered (or attempted) yet.
    pub fn is_dirty(&self) -> bool {
        self.attempted != Some(self.generation)
    }

    /// The last successfully rendered raster. Stays in place when later passes fail.
    pub fn raster(&self) -> Option<&RgbaImage> {
        self.raster.as_ref()
    }

    /// User-facing message about the last failed pass, cleared by the next success.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Whether a logo has been supplied ("logo loaded").
    pub fn has_logo(&self) -> bool {
        self.logo.is_some()
    }

    fn touch(&mut self) {
        self.generation += 1;
    }

    fn update<T: PartialEq>(&mut self, select: impl FnOnce(&mut RenderParams) -> &mut T, value: T) {
        let field = select(&mut self.params);
        if *field != value {
            *field = value;
            self.touch();
        }
    }

    pub fn set_payload(&mut self, payload: impl Into<String>) {
        self.update(|p| &mut p.payload, payload.into());
    }

    pub fn set_side(&mut self, side: u32) {
        self.update(|p| &mut p.side, side);
    }

    pub fn set_margin(&mut self, margin: i32) {
        self.update(|p| &mut p.margin, margin);
    }

    pub fn set_correction_level(&mut self, level: QrCodeEcc) {
        self.update(|p| &mut p.correction_level, level);
    }

    pub fn set_foreground(&mut self, color: Color) {
        self.update(|p| &mut p.foreground, color);
    }

    pub fn set_background(&mut self, color: Color) {
        self.update(|p| &mut p.background, color);
    }

    pub fn set_logo_percent(&mut self, percent: u32) {
        self.update(|p| &mut p.logo_percent, percent);
    }

    pub fn set_knockout_percent(&mut self, percent: u32) {
        self.update(|p| &mut p.knockout_percent, percent);
    }

    pub fn set_rounded(&mut self, rounded: bool) {
        self.update(|p| &mut p.rounded, rounded);
    }

    pub fn set_show_guide(&mut self, show_guide: bool) {
        self.update(|p| &mut p.show_guide, show_guide);
    }

    /// Replaces every control at once, e.g. after loading a configuration.
    pub fn set_params(&mut self, params: RenderParams) {
        if self.params != params {
            self.params = params;
            self.touch();
        }
    }

    /// Sets the logo from raw image bytes or a `data:` URI. Decoding happens on the next pass.
    pub fn set_logo_bytes(&mut self, bytes: impl Into<Vec<u8>>) {
        let bytes: Vec<u8> = bytes.into();
        let bytes: Arc<[u8]> = Arc::from(bytes);
        if self
            .logo
            .as_ref()
            .is_some_and(|slot| slot.bytes == bytes)
        {
            return;
        }
        self.logo = Some(LogoSlot {
            bytes,
            decoded: None,
        });
        self.touch();
    }

    pub fn clear_logo(&mut self) {
        if self.logo.take().is_some() {
            self.touch();
        }
    }

    /// Restores every default and drops the logo.
    pub fn reset(&mut self) {
        self.params = RenderParams::default();
        self.logo = None;
        self.touch();
    }

    /// Renders the current state synchronously if it changed since the last attempt.
    ///
    /// A failure is recorded as [`Preview::notice`] and returned; the previous raster stays.
    pub fn refresh(&mut self) -> Result<PassOutcome, RenderError> {
        if !self.is_dirty() {
            return Ok(PassOutcome::Unchanged);
        }
        let logo = match &self.logo {
            None => None,
            Some(LogoSlot {
                decoded: Some(logo),
                ..
            }) => Some(Ok(Arc::clone(logo))),
            Some(slot) => Some(decode::decode_logo(&slot.bytes).map(Arc::new)),
        };
        let pass = ReadyPass {
            generation: self.generation,
            params: self.params.clone(),
            logo,
        };
        self.complete(pass)
    }

    /// Snapshots the current state and starts decoding the logo in the background if needed.
    pub fn begin_pass(&self) -> PendingPass {
        let logo = self.logo.as_ref().map(|slot| match &slot.decoded {
            Some(logo) => LogoFetch::Ready(Arc::clone(logo)),
            None => LogoFetch::Decoding(decode::decode_logo_async(slot.bytes.to_vec())),
        });
        debug!(generation = self.generation, "begin pass");
        PendingPass {
            generation: self.generation,
            params: self.params.clone(),
            logo,
        }
    }

    /// Composites a ready pass, unless the controls changed after it was started.
    pub fn complete(&mut self, pass: ReadyPass) -> Result<PassOutcome, RenderError> {
        if pass.generation != self.generation {
            warn!(
                pass = pass.generation,
                current = self.generation,
                "Dropping superseded pass"
            );
            return Ok(PassOutcome::Superseded);
        }
        self.attempted = Some(pass.generation);

        let logo = match pass.logo.transpose() {
            Ok(logo) => logo,
            Err(err) => return Err(self.fail(err.into())),
        };
        if let (Some(slot), Some(logo)) = (self.logo.as_mut(), logo.as_ref()) {
            slot.decoded.get_or_insert_with(|| Arc::clone(logo));
        }

        let spec = RenderSpec::new(&pass.params, logo.as_deref());
        match self.compositor.render(&spec) {
            Ok(raster) => {
                self.raster = Some(raster);
                self.notice = None;
                Ok(PassOutcome::Committed)
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    fn fail(&mut self, err: RenderError) -> RenderError {
        warn!("Render pass failed, Err: {err}");
        self.notice = Some(notice_for(&err));
        err
    }

    /// Encodes the current raster as PNG.
    pub fn export_png(&self) -> Result<Vec<u8>, ExportError> {
        export::encode_png(self.raster.as_ref().ok_or(ExportError::NoRaster)?)
    }

    /// Saves the current raster as a PNG file, see [`export::save_png`].
    pub fn save_png(
        &self,
        directory: Option<&Path>,
        filename: Option<&str>,
    ) -> Result<PathBuf, ExportError> {
        export::save_png(
            self.raster.as_ref().ok_or(ExportError::NoRaster)?,
            directory,
            filename,
        )
    }
}

fn notice_for(err: &RenderError) -> String {
    match err {
        RenderError::Encode(err) => format!(
            "Could not generate the QR code ({err}). Try a shorter text or a lower error correction level."
        ),
        RenderError::Decode(err) => {
            format!("Could not read the logo image ({err}). Try a different image.")
        }
    }
}
