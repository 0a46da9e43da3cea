//! Polygon utilities on local tangent-plane coordinates.
//!
//! Polygons are open rings: an ordered vertex slice with at least 3
//! vertices and no duplicated closing vertex; the closing edge between the
//! last and first vertex is implicit. Polygons are assumed simple
//! (non-self-intersecting); that invariant is not validated here because
//! validation would cost more than every caller combined.
//!
//! [`clip_to_scanline`] is the sweep generator's workhorse: it intersects a
//! horizontal line with every edge and pairs the sorted crossings into
//! inside runs, which is what makes non-convex coverage work.

use crate::core::{Bounds, LocalPoint};

/// Tolerance for on-boundary classification, in meters.
const BOUNDARY_EPS: f64 = 1e-9;

/// Absolute polygon area via the shoelace formula.
///
/// Sign-independent and invariant under the choice of starting vertex.
/// Returns 0.0 for fewer than 3 vertices.
pub fn area(polygon: &[LocalPoint]) -> f64 {
    signed_area(polygon).abs()
}

/// Signed shoelace area: positive for counter-clockwise vertex order.
pub fn signed_area(polygon: &[LocalPoint]) -> f64 {
    if polygon.len() < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..polygon.len() {
        let a = polygon[i];
        let b = polygon[(i + 1) % polygon.len()];
        sum += a.x * b.y - b.x * a.y;
    }
    sum * 0.5
}

/// Vertex centroid (arithmetic mean of the vertices).
///
/// Used as the rotation pivot for sweep alignment; for that purpose the
/// vertex mean is sufficient and cheaper than the area centroid.
pub fn centroid(polygon: &[LocalPoint]) -> LocalPoint {
    if polygon.is_empty() {
        return LocalPoint::ZERO;
    }
    let mut sum = LocalPoint::ZERO;
    for p in polygon {
        sum = sum + *p;
    }
    sum * (1.0 / polygon.len() as f64)
}

/// Axis-aligned bounding box of the polygon.
pub fn bounding_box(polygon: &[LocalPoint]) -> Bounds {
    Bounds::from_points(polygon)
}

/// Rotate every vertex about `pivot` by `angle_deg` (counter-clockwise).
pub fn rotate(polygon: &[LocalPoint], angle_deg: f64, pivot: LocalPoint) -> Vec<LocalPoint> {
    let angle = angle_deg.to_radians();
    polygon
        .iter()
        .map(|p| p.rotate_around(&pivot, angle))
        .collect()
}

/// Ray-casting point-in-polygon test.
///
/// Points on the boundary are classified as inside.
pub fn contains_point(polygon: &[LocalPoint], point: LocalPoint) -> bool {
    if polygon.len() < 3 {
        return false;
    }

    // Boundary points count as inside.
    for i in 0..polygon.len() {
        let a = polygon[i];
        let b = polygon[(i + 1) % polygon.len()];
        if point_segment_distance(point, a, b) <= BOUNDARY_EPS {
            return true;
        }
    }

    // Cast a ray toward +x and count crossings. Half-open edge intervals
    // (min_y inclusive, max_y exclusive) ensure a ray through a vertex is
    // counted once.
    let mut inside = false;
    for i in 0..polygon.len() {
        let a = polygon[i];
        let b = polygon[(i + 1) % polygon.len()];
        let crosses = (a.y <= point.y && b.y > point.y) || (b.y <= point.y && a.y > point.y);
        if crosses {
            let t = (point.y - a.y) / (b.y - a.y);
            let x = a.x + t * (b.x - a.x);
            if x > point.x {
                inside = !inside;
            }
        }
    }
    inside
}

/// Intersect a horizontal line at height `y` with the polygon.
///
/// Returns the ordered, disjoint x-intervals where the line lies inside the
/// polygon, computed by intersecting the line with every edge, sorting the
/// crossing x-values, and pairing them into inside/outside runs. Horizontal
/// edges contribute nothing themselves; their neighbors produce the
/// crossings. Half-open edge intervals make a line through a shared vertex
/// yield exactly one crossing.
pub fn clip_to_scanline(polygon: &[LocalPoint], y: f64) -> Vec<(f64, f64)> {
    if polygon.len() < 3 {
        return Vec::new();
    }

    let mut crossings = Vec::new();
    for i in 0..polygon.len() {
        let a = polygon[i];
        let b = polygon[(i + 1) % polygon.len()];
        let crosses = (a.y <= y && b.y > y) || (b.y <= y && a.y > y);
        if crosses {
            let t = (y - a.y) / (b.y - a.y);
            crossings.push(a.x + t * (b.x - a.x));
        }
    }

    crossings.sort_by(|p, q| p.partial_cmp(q).unwrap_or(std::cmp::Ordering::Equal));

    // Pair into inside runs. An odd count can only come from numerically
    // degenerate tangencies; the unpaired crossing is dropped.
    let mut intervals = Vec::with_capacity(crossings.len() / 2);
    for pair in crossings.chunks_exact(2) {
        intervals.push((pair[0], pair[1]));
    }
    intervals
}

/// Distance from a point to a line segment.
pub fn point_segment_distance(point: LocalPoint, a: LocalPoint, b: LocalPoint) -> f64 {
    let ab = b - a;
    let len_sq = ab.dot(&ab);
    if len_sq <= 0.0 {
        return point.distance(&a);
    }
    let t = ((point - a).dot(&ab) / len_sq).clamp(0.0, 1.0);
    point.distance(&a.lerp(&b, t))
}

/// Exact segment-segment intersection test, including collinear overlap.
pub fn segments_intersect(p1: LocalPoint, p2: LocalPoint, q1: LocalPoint, q2: LocalPoint) -> bool {
    let d1 = orientation(q1, q2, p1);
    let d2 = orientation(q1, q2, p2);
    let d3 = orientation(p1, p2, q1);
    let d4 = orientation(p1, p2, q2);

    if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
    {
        return true;
    }

    (d1 == 0.0 && on_segment(q1, q2, p1))
        || (d2 == 0.0 && on_segment(q1, q2, p2))
        || (d3 == 0.0 && on_segment(p1, p2, q1))
        || (d4 == 0.0 && on_segment(p1, p2, q2))
}

#[inline]
fn orientation(a: LocalPoint, b: LocalPoint, c: LocalPoint) -> f64 {
    (b - a).cross(&(c - a))
}

#[inline]
fn on_segment(a: LocalPoint, b: LocalPoint, p: LocalPoint) -> bool {
    p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x) && p.y >= a.y.min(b.y) && p.y <= a.y.max(b.y)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_square() -> Vec<LocalPoint> {
        vec![
            LocalPoint::new(0.0, 0.0),
            LocalPoint::new(0.0, 100.0),
            LocalPoint::new(100.0, 100.0),
            LocalPoint::new(100.0, 0.0),
        ]
    }

    /// Concave "U" shape opening upward: a scanline across the middle
    /// crosses it twice.
    fn u_shape() -> Vec<LocalPoint> {
        vec![
            LocalPoint::new(0.0, 0.0),
            LocalPoint::new(100.0, 0.0),
            LocalPoint::new(100.0, 100.0),
            LocalPoint::new(70.0, 100.0),
            LocalPoint::new(70.0, 30.0),
            LocalPoint::new(30.0, 30.0),
            LocalPoint::new(30.0, 100.0),
            LocalPoint::new(0.0, 100.0),
        ]
    }

    #[test]
    fn test_area_square() {
        assert!((area(&unit_square()) - 10_000.0).abs() < 1e-9);
    }

    #[test]
    fn test_area_start_vertex_invariant() {
        let square = unit_square();
        let base = area(&square);
        for shift in 1..square.len() {
            let mut rotated = square.clone();
            rotated.rotate_left(shift);
            assert!((area(&rotated) - base).abs() < 1e-9);
        }
    }

    #[test]
    fn test_area_orientation_invariant() {
        let mut square = unit_square();
        let base = area(&square);
        square.reverse();
        assert!((area(&square) - base).abs() < 1e-9);
        assert!(signed_area(&square).abs() == area(&square));
    }

    #[test]
    fn test_area_degenerate() {
        assert_eq!(area(&[]), 0.0);
        assert_eq!(area(&[LocalPoint::ZERO, LocalPoint::new(1.0, 1.0)]), 0.0);
    }

    #[test]
    fn test_centroid() {
        let c = centroid(&unit_square());
        assert!((c.x - 50.0).abs() < 1e-9);
        assert!((c.y - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_contains_point() {
        let square = unit_square();
        assert!(contains_point(&square, LocalPoint::new(50.0, 50.0)));
        assert!(!contains_point(&square, LocalPoint::new(150.0, 50.0)));
        assert!(!contains_point(&square, LocalPoint::new(50.0, -0.1)));
    }

    #[test]
    fn test_contains_boundary_is_inside() {
        let square = unit_square();
        // Edge midpoint, corner, and a point on the closing edge.
        assert!(contains_point(&square, LocalPoint::new(0.0, 50.0)));
        assert!(contains_point(&square, LocalPoint::new(0.0, 0.0)));
        assert!(contains_point(&square, LocalPoint::new(50.0, 0.0)));
    }

    #[test]
    fn test_contains_concave() {
        let u = u_shape();
        assert!(contains_point(&u, LocalPoint::new(15.0, 60.0)));
        assert!(contains_point(&u, LocalPoint::new(85.0, 60.0)));
        // Inside the notch.
        assert!(!contains_point(&u, LocalPoint::new(50.0, 60.0)));
        assert!(contains_point(&u, LocalPoint::new(50.0, 15.0)));
    }

    #[test]
    fn test_rotate_about_pivot() {
        let square = unit_square();
        let rotated = rotate(&square, 90.0, LocalPoint::new(50.0, 50.0));
        // Rotating a square about its center by 90 degrees maps corners
        // onto corners and preserves area.
        assert!((area(&rotated) - 10_000.0).abs() < 1e-6);
        assert!((rotated[0].x - 100.0).abs() < 1e-9);
        assert!((rotated[0].y - 0.0).abs() < 1e-9);
    }

    #[test]
    fn test_scanline_convex() {
        let square = unit_square();
        let intervals = clip_to_scanline(&square, 50.0);
        assert_eq!(intervals.len(), 1);
        assert!((intervals[0].0 - 0.0).abs() < 1e-9);
        assert!((intervals[0].1 - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_scanline_concave_two_intervals() {
        let u = u_shape();
        let intervals = clip_to_scanline(&u, 60.0);
        assert_eq!(intervals.len(), 2);
        assert!((intervals[0].0 - 0.0).abs() < 1e-9);
        assert!((intervals[0].1 - 30.0).abs() < 1e-9);
        assert!((intervals[1].0 - 70.0).abs() < 1e-9);
        assert!((intervals[1].1 - 100.0).abs() < 1e-9);

        // Below the notch the shape is one solid run.
        let low = clip_to_scanline(&u, 15.0);
        assert_eq!(low.len(), 1);
        assert!((low[0].1 - low[0].0 - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_scanline_outside() {
        let square = unit_square();
        assert!(clip_to_scanline(&square, 150.0).is_empty());
        assert!(clip_to_scanline(&square, -10.0).is_empty());
    }

    #[test]
    fn test_scanline_through_vertex() {
        // Diamond: a scanline through the left/right vertices must not
        // double-count the crossings.
        let diamond = vec![
            LocalPoint::new(0.0, 50.0),
            LocalPoint::new(50.0, 100.0),
            LocalPoint::new(100.0, 50.0),
            LocalPoint::new(50.0, 0.0),
        ];
        let intervals = clip_to_scanline(&diamond, 50.0);
        assert_eq!(intervals.len(), 1);
        assert!((intervals[0].0 - 0.0).abs() < 1e-9);
        assert!((intervals[0].1 - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_point_segment_distance() {
        let a = LocalPoint::new(0.0, 0.0);
        let b = LocalPoint::new(10.0, 0.0);
        assert!((point_segment_distance(LocalPoint::new(5.0, 3.0), a, b) - 3.0).abs() < 1e-12);
        assert!((point_segment_distance(LocalPoint::new(-4.0, 3.0), a, b) - 5.0).abs() < 1e-12);
        assert!((point_segment_distance(LocalPoint::new(13.0, 4.0), a, b) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_segments_intersect() {
        let a = LocalPoint::new(0.0, 0.0);
        let b = LocalPoint::new(10.0, 10.0);
        let c = LocalPoint::new(0.0, 10.0);
        let d = LocalPoint::new(10.0, 0.0);
        assert!(segments_intersect(a, b, c, d));
        assert!(!segments_intersect(
            a,
            LocalPoint::new(4.0, 4.0),
            c,
            LocalPoint::new(4.0, 6.0)
        ));
        // Shared endpoint counts as intersecting.
        assert!(segments_intersect(a, b, b, d));
        // Collinear overlap.
        assert!(segments_intersect(
            a,
            LocalPoint::new(6.0, 0.0),
            LocalPoint::new(4.0, 0.0),
            LocalPoint::new(10.0, 0.0)
        ));
    }
}
