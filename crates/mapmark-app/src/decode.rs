//! Off-thread image decoding.
//!
//! Decoding is the one asynchronous boundary in the app: a worker thread
//! turns an encoded payload into pixels and reports an explicit
//! `Result` over a channel, which the UI drains once per frame. A
//! completion therefore always observes current document state, and
//! failure is representable instead of silent.

use mapmark_core::encoding::{self, DecodeError};
use std::sync::mpsc::{Receiver, Sender, channel};
use std::thread;

/// A decoded raster image ready to upload as a texture.
pub struct DecodedImage {
    /// The payload the pixels came from, unchanged.
    pub data_uri: String,
    pub width: u32,
    pub height: u32,
    /// RGBA8, row-major.
    pub rgba: Vec<u8>,
}

/// What a finished decode was for.
pub enum DecodeOutcome {
    /// A background import or a loaded document's embedded background.
    Background(Result<DecodedImage, DecodeError>),
    /// A marker's attached image, keyed by its payload.
    MarkerImage {
        data_uri: String,
        result: Result<DecodedImage, DecodeError>,
    },
}

/// Hands decode requests to worker threads and collects their outcomes.
pub struct Decoder {
    tx: Sender<DecodeOutcome>,
    rx: Receiver<DecodeOutcome>,
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder {
    pub fn new() -> Self {
        let (tx, rx) = channel();
        Self { tx, rx }
    }

    /// Decode a background payload off-thread. Completion requests
    /// exactly one repaint.
    pub fn decode_background(&self, ctx: &egui::Context, data_uri: String) {
        let tx = self.tx.clone();
        let ctx = ctx.clone();
        thread::spawn(move || {
            let result = decode_data_uri(&data_uri);
            // The receiver only disappears on shutdown.
            let _ = tx.send(DecodeOutcome::Background(result));
            ctx.request_repaint();
        });
    }

    /// Decode a marker image payload off-thread.
    pub fn decode_marker_image(&self, ctx: &egui::Context, data_uri: String) {
        let tx = self.tx.clone();
        let ctx = ctx.clone();
        thread::spawn(move || {
            let result = decode_data_uri(&data_uri);
            let _ = tx.send(DecodeOutcome::MarkerImage { data_uri, result });
            ctx.request_repaint();
        });
    }

    /// Drain finished decodes. Called at the top of every frame.
    pub fn poll(&self) -> Vec<DecodeOutcome> {
        self.rx.try_iter().collect()
    }
}

/// Decode an embedded payload into RGBA pixels.
pub fn decode_data_uri(data_uri: &str) -> Result<DecodedImage, DecodeError> {
    let bytes = encoding::payload_of(data_uri)?;
    let image = image::load_from_memory(&bytes).map_err(|e| DecodeError::Pixels(e.to_string()))?;
    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(DecodedImage {
        data_uri: data_uri.to_owned(),
        width,
        height,
        rgba: rgba.into_raw(),
    })
}
