//! Mapmark Core Library
//!
//! Platform-agnostic data model and interaction logic for the Mapmark
//! 2D map annotator.

pub mod document;
pub mod encoding;
pub mod geometry;
pub mod input;
pub mod interaction;
pub mod popup;

pub use document::{Background, MapDocument, Marker, ParseError, ParsedDocument};
pub use encoding::{DecodeError, ImageFormat};
pub use input::{MouseButton, PointerEvent};
pub use interaction::{DragState, InteractionController, Mode};
pub use popup::{POPUP_SIZE, PopupContent, PopupState};
