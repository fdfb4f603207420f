//! Popup placement and content selection.

use kurbo::{Point, Size};
use serde::{Deserialize, Serialize};

/// Fixed popup dimensions, in canvas pixels.
pub const POPUP_SIZE: Size = Size::new(400.0, 300.0);

/// Gap between the anchor point and the popup's near edge.
const ANCHOR_OFFSET: f64 = 10.0;

/// Which face the popup shows. Exactly one is visible at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PopupContent {
    /// Editable title/description/image fields with an explicit commit.
    Editor,
    /// Read-only title/description/image, no commit path.
    Viewer,
}

/// An open popup: where it was anchored and what it shows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PopupState {
    pub anchor: Point,
    pub content: PopupContent,
}

/// Compute the popup origin for an anchor point.
///
/// Anchors at `point + (10, 10)`. Flips horizontally when the right edge
/// would cross the canvas, vertically when the bottom edge would, then
/// clamps both coordinates to >= 0. A popup larger than the canvas may
/// still clip off the far edge; that is accepted, not corrected further.
pub fn position_for(point: Point, canvas: Size, popup: Size) -> Point {
    let mut x = point.x + ANCHOR_OFFSET;
    let mut y = point.y + ANCHOR_OFFSET;

    if x + popup.width > canvas.width {
        x = point.x - popup.width - ANCHOR_OFFSET;
    }
    if y + popup.height > canvas.height {
        y = point.y - popup.height - ANCHOR_OFFSET;
    }

    Point::new(x.max(0.0), y.max(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_anchor_offset() {
        let origin = position_for(
            Point::new(50.0, 60.0),
            Size::new(1000.0, 1000.0),
            POPUP_SIZE,
        );
        assert_eq!(origin, Point::new(60.0, 70.0));
    }

    #[test]
    fn test_horizontal_flip() {
        let origin = position_for(
            Point::new(480.0, 100.0),
            Size::new(500.0, 1000.0),
            POPUP_SIZE,
        );
        assert_eq!(origin, Point::new(70.0, 110.0));
    }

    #[test]
    fn test_vertical_flip() {
        let origin = position_for(
            Point::new(100.0, 480.0),
            Size::new(1000.0, 500.0),
            POPUP_SIZE,
        );
        assert_eq!(origin, Point::new(110.0, 170.0));
    }

    #[test]
    fn test_both_flips_near_corner() {
        // Canvas 500x500, popup 400x300, click (480, 480): both flips
        // trigger and the result is already non-negative.
        let origin = position_for(
            Point::new(480.0, 480.0),
            Size::new(500.0, 500.0),
            Size::new(400.0, 300.0),
        );
        assert_eq!(origin, Point::new(70.0, 170.0));
    }

    #[test]
    fn test_clamped_to_zero_on_small_canvas() {
        // Canvas smaller than the popup: the flip lands negative and is
        // clamped to the origin.
        let origin = position_for(Point::new(5.0, 5.0), Size::new(200.0, 200.0), POPUP_SIZE);
        assert_eq!(origin, Point::new(0.0, 0.0));
    }
}
