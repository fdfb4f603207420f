//! Point-to-marker proximity testing.

use crate::document::Marker;
use kurbo::Point;

/// Hit radius around a marker, in canvas pixels.
pub const HIT_RADIUS: f64 = 10.0;

/// Find the marker at `point`, scanning in insertion order.
///
/// Returns the index of the first marker whose Euclidean distance to
/// `point` is within `radius`. The earliest-inserted marker wins when
/// several overlap.
pub fn marker_at_point(point: Point, markers: &[Marker], radius: f64) -> Option<usize> {
    markers
        .iter()
        .position(|marker| marker.position().distance(point) <= radius)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marker_at(x: f64, y: f64) -> Marker {
        Marker::at(Point::new(x, y))
    }

    #[test]
    fn test_hit_within_radius() {
        let markers = vec![marker_at(100.0, 100.0)];

        assert_eq!(
            marker_at_point(Point::new(105.0, 105.0), &markers, HIT_RADIUS),
            Some(0)
        );
        assert_eq!(
            marker_at_point(Point::new(200.0, 200.0), &markers, HIT_RADIUS),
            None
        );
    }

    #[test]
    fn test_radius_boundary_is_inclusive() {
        let markers = vec![marker_at(0.0, 0.0)];

        assert_eq!(
            marker_at_point(Point::new(10.0, 0.0), &markers, 10.0),
            Some(0)
        );
        assert_eq!(
            marker_at_point(Point::new(10.001, 0.0), &markers, 10.0),
            None
        );
    }

    #[test]
    fn test_earliest_inserted_wins_on_overlap() {
        // Two markers well within each other's hit radius.
        let markers = vec![marker_at(100.0, 100.0), marker_at(103.0, 103.0)];

        // A point closer to the second marker still resolves to the first.
        assert_eq!(
            marker_at_point(Point::new(103.0, 103.0), &markers, HIT_RADIUS),
            Some(0)
        );
    }

    #[test]
    fn test_empty_marker_list() {
        assert_eq!(
            marker_at_point(Point::new(0.0, 0.0), &[], HIT_RADIUS),
            None
        );
    }
}
