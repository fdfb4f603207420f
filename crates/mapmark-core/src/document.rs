//! Map document and its JSON (de)serialization.

use crate::geometry::{self, HIT_RADIUS};
use kurbo::{Point, Size};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Title given to a freshly placed marker.
pub const DEFAULT_TITLE: &str = "New Location";
/// Description given to a freshly placed marker.
pub const DEFAULT_DESCRIPTION: &str = "Description goes here...";

/// Document bytes are not a well-formed map document.
#[derive(Debug, Error)]
#[error("invalid map document: {0}")]
pub struct ParseError(#[from] serde_json::Error);

/// A user-placed point annotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub x: f64,
    pub y: f64,
    pub title: String,
    pub description: String,
    /// Attached image as a data URI, or empty when none.
    #[serde(default)]
    pub image: String,
}

impl Marker {
    /// Create a marker at `point` with default content.
    pub fn at(point: Point) -> Self {
        Self {
            x: point.x,
            y: point.y,
            title: DEFAULT_TITLE.to_owned(),
            description: DEFAULT_DESCRIPTION.to_owned(),
            image: String::new(),
        }
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn set_position(&mut self, point: Point) {
        self.x = point.x;
        self.y = point.y;
    }
}

/// The background image markers are placed on. Its natural size fixes the
/// canvas dimensions.
#[derive(Debug, Clone, PartialEq)]
pub struct Background {
    /// Self-contained encoded payload (data URI).
    pub data: String,
    /// Natural width in pixels.
    pub width: u32,
    /// Natural height in pixels.
    pub height: u32,
}

impl Background {
    pub fn size(&self) -> Size {
        Size::new(self.width as f64, self.height as f64)
    }
}

/// Outcome of parsing a saved document.
///
/// Markers are available synchronously; the embedded background image (if
/// any) still needs an asynchronous decode before it becomes a
/// [`Background`].
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedDocument {
    pub markers: Vec<Marker>,
    pub background_image: Option<String>,
}

/// The in-memory annotated map: ordered marker list plus optional
/// background. Marker insertion order is the z-order for hit-testing and
/// is preserved on save/load.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapDocument {
    markers: Vec<Marker>,
    background: Option<Background>,
}

/// On-disk shape of a document.
#[derive(Serialize, Deserialize)]
struct WireDocument {
    #[serde(default)]
    locations: Vec<Marker>,
    #[serde(
        rename = "backgroundImage",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    background_image: Option<String>,
}

impl MapDocument {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn marker(&self, index: usize) -> Option<&Marker> {
        self.markers.get(index)
    }

    pub fn marker_mut(&mut self, index: usize) -> Option<&mut Marker> {
        self.markers.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn background(&self) -> Option<&Background> {
        self.background.as_ref()
    }

    pub fn has_background(&self) -> bool {
        self.background.is_some()
    }

    /// Canvas dimensions, fixed by the background when one exists.
    pub fn canvas_size(&self) -> Option<Size> {
        self.background.as_ref().map(Background::size)
    }

    /// Append a default marker at `point` and return its index.
    ///
    /// Placing a marker only makes sense on a loaded background; without
    /// one this is a defined no-op, not an error.
    pub fn add_marker(&mut self, point: Point) -> Option<usize> {
        if self.background.is_none() {
            return None;
        }
        self.markers.push(Marker::at(point));
        Some(self.markers.len() - 1)
    }

    /// Remove the marker at `index`. No-op when out of range.
    pub fn remove_marker(&mut self, index: usize) -> Option<Marker> {
        if index < self.markers.len() {
            Some(self.markers.remove(index))
        } else {
            None
        }
    }

    /// Replace the background. Existing markers stay where they are, even
    /// if the new image leaves them off-canvas.
    pub fn set_background(&mut self, background: Background) {
        self.background = Some(background);
    }

    /// Replace the whole marker list (used when loading a document).
    pub fn replace_markers(&mut self, markers: Vec<Marker>) {
        self.markers = markers;
    }

    /// Find the marker under `point`, if any.
    pub fn hit_test(&self, point: Point) -> Option<usize> {
        geometry::marker_at_point(point, &self.markers, HIT_RADIUS)
    }

    /// Serialize to the portable document format. The background travels
    /// as its embedded payload, never as an external reference.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        let wire = WireDocument {
            locations: self.markers.clone(),
            background_image: self.background.as_ref().map(|bg| bg.data.clone()),
        };
        serde_json::to_string(&wire)
    }

    /// Parse a saved document.
    ///
    /// Fails with [`ParseError`] on malformed input, touching nothing.
    /// Markers default to an empty list when the field is absent.
    pub fn from_json(json: &str) -> Result<ParsedDocument, ParseError> {
        let wire: WireDocument = serde_json::from_str(json)?;
        Ok(ParsedDocument {
            markers: wire.locations,
            background_image: wire.background_image,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_background() -> Background {
        Background {
            data: "data:image/png;base64,iVBORw0KGgo=".to_owned(),
            width: 800,
            height: 600,
        }
    }

    fn sample_document() -> MapDocument {
        let mut doc = MapDocument::new();
        doc.set_background(sample_background());
        doc.add_marker(Point::new(10.0, 20.0));
        doc.add_marker(Point::new(30.0, 40.0));
        if let Some(marker) = doc.marker_mut(0) {
            marker.title = "Harbor".to_owned();
            marker.description = "Ships dock here".to_owned();
            marker.image = "data:image/jpeg;base64,/9j/4A==".to_owned();
        }
        doc
    }

    #[test]
    fn test_add_marker_requires_background() {
        let mut doc = MapDocument::new();

        assert_eq!(doc.add_marker(Point::new(5.0, 5.0)), None);
        assert!(doc.is_empty());

        doc.set_background(sample_background());
        assert_eq!(doc.add_marker(Point::new(5.0, 5.0)), Some(0));
        assert_eq!(doc.len(), 1);
    }

    #[test]
    fn test_new_marker_defaults() {
        let mut doc = MapDocument::new();
        doc.set_background(sample_background());
        let index = doc.add_marker(Point::new(7.0, 9.0)).unwrap();

        let marker = doc.marker(index).unwrap();
        assert_eq!(marker.title, DEFAULT_TITLE);
        assert_eq!(marker.description, DEFAULT_DESCRIPTION);
        assert!(marker.image.is_empty());
        assert_eq!(marker.position(), Point::new(7.0, 9.0));
    }

    #[test]
    fn test_remove_marker_out_of_range_is_noop() {
        let mut doc = sample_document();

        assert!(doc.remove_marker(5).is_none());
        assert_eq!(doc.len(), 2);
    }

    #[test]
    fn test_canvas_size_follows_background() {
        let mut doc = MapDocument::new();
        assert_eq!(doc.canvas_size(), None);

        doc.set_background(sample_background());
        assert_eq!(doc.canvas_size(), Some(Size::new(800.0, 600.0)));
    }

    #[test]
    fn test_round_trip_preserves_everything() {
        let doc = sample_document();
        let json = doc.to_json().unwrap();
        let parsed = MapDocument::from_json(&json).unwrap();

        assert_eq!(parsed.markers, doc.markers);
        assert_eq!(
            parsed.background_image.as_deref(),
            Some(doc.background().unwrap().data.as_str())
        );
    }

    #[test]
    fn test_round_trip_preserves_marker_order() {
        let mut doc = MapDocument::new();
        doc.set_background(sample_background());
        for i in 0..10 {
            let index = doc.add_marker(Point::new(i as f64, i as f64)).unwrap();
            doc.marker_mut(index).unwrap().title = format!("marker {i}");
        }

        let parsed = MapDocument::from_json(&doc.to_json().unwrap()).unwrap();
        let titles: Vec<_> = parsed.markers.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(
            titles,
            (0..10).map(|i| format!("marker {i}")).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_background_omitted_when_absent() {
        let doc = MapDocument::new();
        let json = doc.to_json().unwrap();

        assert!(!json.contains("backgroundImage"));
        let parsed = MapDocument::from_json(&json).unwrap();
        assert_eq!(parsed.background_image, None);
    }

    #[test]
    fn test_missing_locations_field_defaults_empty() {
        let parsed = MapDocument::from_json("{}").unwrap();
        assert!(parsed.markers.is_empty());
        assert_eq!(parsed.background_image, None);
    }

    #[test]
    fn test_malformed_input_is_a_parse_error() {
        assert!(MapDocument::from_json("not json at all").is_err());
        assert!(MapDocument::from_json("[1, 2, 3]").is_err());
        assert!(MapDocument::from_json("").is_err());
    }

    #[test]
    fn test_parse_failure_leaves_current_document_untouched() {
        let doc = sample_document();
        let before = doc.clone();

        assert!(MapDocument::from_json("{ broken").is_err());
        assert_eq!(doc, before);
    }
}
