//! Canvas rendering: background first, then markers in insertion order.
//!
//! A pure read of the document and mode; invoked every frame by the app
//! shell.

use egui::{Align2, Color32, FontId, Painter, Pos2, Rect, Stroke, TextureHandle};
use mapmark_core::{MapDocument, Mode};

/// Marker circle radius in canvas pixels.
const MARKER_RADIUS: f32 = 6.0;
/// Placeholder fill shown before a background is imported.
const PLACEHOLDER_FILL: Color32 = Color32::from_rgb(0xf0, 0xf0, 0xf0);
const PLACEHOLDER_TEXT: Color32 = Color32::from_rgb(0xcc, 0xcc, 0xcc);

fn marker_fill(mode: Mode) -> Color32 {
    match mode {
        Mode::Edit => Color32::from_rgba_unmultiplied(255, 0, 0, 179),
        Mode::Read => Color32::from_rgba_unmultiplied(0, 100, 255, 179),
    }
}

/// Draw the whole map into `rect`.
///
/// `background` is the uploaded texture for the document's background,
/// when one exists. The canvas rect matches the background's pixel size
/// by invariant, so the image is drawn unscaled at the origin.
pub fn paint_map(
    painter: &Painter,
    rect: Rect,
    document: &MapDocument,
    mode: Mode,
    background: Option<&TextureHandle>,
) {
    match background {
        Some(texture) => {
            painter.image(
                texture.id(),
                rect,
                Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0)),
                Color32::WHITE,
            );
        }
        None => {
            painter.rect_filled(rect, 0.0, PLACEHOLDER_FILL);
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                "Import a background image",
                FontId::proportional(24.0),
                PLACEHOLDER_TEXT,
            );
        }
    }

    let fill = marker_fill(mode);
    for marker in document.markers() {
        let center = rect.min + egui::vec2(marker.x as f32, marker.y as f32);
        painter.circle(center, MARKER_RADIUS, fill, Stroke::new(2.0, Color32::WHITE));

        // Titles are only shown while inspecting the map.
        if mode == Mode::Read {
            painter.text(
                center - egui::vec2(0.0, MARKER_RADIUS + 6.0),
                Align2::CENTER_BOTTOM,
                &marker.title,
                FontId::proportional(12.0),
                Color32::BLACK,
            );
        }
    }
}
