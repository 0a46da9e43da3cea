//! Area-coverage sweep generation.
//!
//! [`CoveragePlanner::plan_coverage`] turns a boundary polygon into a full
//! coverage flight path, either as a boustrophedon grid sweep or as an
//! inward spiral. Grid sweeps are generated in a rotated frame where the
//! requested scan direction is horizontal; each scanline is clipped to the
//! boundary (handling non-convex shapes with multiple disjoint runs per
//! line), alternated in direction, optionally corner-smoothed with turn
//! arcs for fixed-wing aircraft, and finally converted back to geodetic
//! waypoints.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::core::{Bounds, GeoPoint, LocalPoint};
use crate::error::{PlanError, Result};
use crate::polygon;
use crate::transform::{CoordinateTransformer, RotatedFrame};

use super::{ensure_boundary, ensure_in_range, ensure_positive, vertex_mean, Path};

/// Minimum width for a sweep segment to be emitted, in meters.
const MIN_SEGMENT_WIDTH: f64 = 1e-6;

/// Angular resolution of sampled turn arcs, radians (10 degrees).
const ARC_STEP_RAD: f64 = 0.174_532_925_199_432_95;

/// Safety cap on spiral insetting.
const MAX_SPIRAL_RINGS: usize = 1024;

/// Scan pattern for coverage planning.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanPattern {
    /// Boustrophedon grid sweep (parallel lines, alternating direction).
    #[default]
    Grid,
    /// Inward spiral from the boundary toward the center.
    Spiral,
}

/// Corner of the (rotated) bounding box where a grid sweep begins.
///
/// Picking the corner nearest the launch point saves the transit leg to
/// the survey area.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryLocation {
    /// Sweep upward starting from the left (default).
    #[default]
    BottomLeft,
    /// Sweep upward starting from the right.
    BottomRight,
    /// Sweep downward starting from the left.
    TopLeft,
    /// Sweep downward starting from the right.
    TopRight,
}

/// Parameters for coverage planning.
///
/// Defaults match a typical multirotor survey: 20 m line spacing, scan
/// along east, sharp turns.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CoverageParameters {
    /// Distance between adjacent sweep lines in meters (> 0).
    pub spacing: f64,
    /// Scan direction in degrees counter-clockwise from east, [-180, 180].
    pub angle_deg: f64,
    /// Sweep pattern.
    pub pattern: ScanPattern,
    /// Whether the vehicle is a fixed-wing aircraft.
    pub is_fixed_wing: bool,
    /// Minimum turn radius in meters (> 0 when `smooth_turns` is set).
    pub turn_radius: f64,
    /// Replace sharp corners with sampled turn arcs (fixed-wing only).
    pub smooth_turns: bool,
    /// Number of strips to split the area into (≥ 1).
    pub subdivisions: usize,
    /// Gap between adjacent strips in meters (≥ 0).
    pub region_spacing: f64,
    /// Corner where the grid sweep begins.
    pub entry: EntryLocation,
}

impl Default for CoverageParameters {
    fn default() -> Self {
        Self {
            spacing: 20.0,
            angle_deg: 0.0,
            pattern: ScanPattern::Grid,
            is_fixed_wing: false,
            turn_radius: 50.0,
            smooth_turns: false,
            subdivisions: 1,
            region_spacing: 3.0,
            entry: EntryLocation::BottomLeft,
        }
    }
}

impl CoverageParameters {
    /// Create parameters with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter for line spacing.
    pub fn with_spacing(mut self, spacing: f64) -> Self {
        self.spacing = spacing;
        self
    }

    /// Builder-style setter for the scan angle.
    pub fn with_angle(mut self, angle_deg: f64) -> Self {
        self.angle_deg = angle_deg;
        self
    }

    /// Builder-style setter for the scan pattern.
    pub fn with_pattern(mut self, pattern: ScanPattern) -> Self {
        self.pattern = pattern;
        self
    }

    /// Builder-style setter enabling fixed-wing turn smoothing.
    pub fn with_smooth_turns(mut self, turn_radius: f64) -> Self {
        self.is_fixed_wing = true;
        self.smooth_turns = true;
        self.turn_radius = turn_radius;
        self
    }

    /// Builder-style setter for strip subdivision.
    pub fn with_subdivisions(mut self, subdivisions: usize, region_spacing: f64) -> Self {
        self.subdivisions = subdivisions;
        self.region_spacing = region_spacing;
        self
    }

    /// Builder-style setter for the sweep entry corner.
    pub fn with_entry(mut self, entry: EntryLocation) -> Self {
        self.entry = entry;
        self
    }

    /// Validate the parameter invariants.
    pub fn validate(&self) -> Result<()> {
        ensure_positive("spacing", self.spacing)?;
        ensure_in_range("angle_deg", self.angle_deg, -180.0, 180.0)?;
        if self.smooth_turns {
            ensure_positive("turn_radius", self.turn_radius)?;
        }
        if self.subdivisions < 1 {
            return Err(PlanError::ParameterOutOfRange {
                name: "subdivisions",
                value: self.subdivisions as f64,
                min: 1.0,
                max: f64::INFINITY,
            });
        }
        if !self.region_spacing.is_finite() || self.region_spacing < 0.0 {
            return Err(PlanError::ParameterOutOfRange {
                name: "region_spacing",
                value: self.region_spacing,
                min: 0.0,
                max: f64::INFINITY,
            });
        }
        Ok(())
    }
}

/// Summary statistics for a generated survey.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SurveyStats {
    /// Number of waypoints in the path.
    pub waypoint_count: usize,
    /// Total flight distance in meters.
    pub total_distance_m: f64,
    /// Covered boundary area in square meters.
    pub area_m2: f64,
    /// Estimated flight time in seconds at the given cruise speed.
    pub flight_time_s: f64,
}

/// Full-area coverage path planner.
///
/// Stateless with respect to results: construct once, call
/// [`plan_coverage`](CoveragePlanner::plan_coverage) repeatedly.
#[derive(Clone, Copy, Debug, Default)]
pub struct CoveragePlanner;

impl CoveragePlanner {
    /// Create a new coverage planner.
    pub fn new() -> Self {
        Self
    }

    /// Generate a coverage path over `boundary` (open geodetic ring).
    ///
    /// Returns an empty path when the spacing is too coarse to fit a single
    /// sweep inside the boundary; that is a legitimate outcome, not an
    /// error. Malformed input (degenerate polygon, non-positive spacing,
    /// out-of-range coordinates) fails fast with a [`PlanError`].
    pub fn plan_coverage(&self, boundary: &[GeoPoint], params: &CoverageParameters) -> Result<Path> {
        params.validate()?;
        ensure_boundary(boundary)?;

        let origin = vertex_mean(boundary);
        // Rotate by -angle so the requested scan direction lies along +x.
        let frame = RotatedFrame::new(origin, -params.angle_deg)?;
        let rotated = frame.geo_to_rotated_batch(boundary)?;

        debug!(
            "[Coverage] plan: {} vertices, pattern {:?}, spacing {:.1}m, angle {:.1}deg",
            boundary.len(),
            params.pattern,
            params.spacing,
            params.angle_deg
        );

        let local_path = match params.pattern {
            ScanPattern::Grid => self.plan_grid(&rotated, params),
            ScanPattern::Spiral => self.plan_spiral(&rotated, params),
        };

        debug!("[Coverage] generated {} waypoints", local_path.len());
        Ok(Path::new(frame.rotated_to_geo_batch(&local_path)))
    }

    /// Area of the boundary polygon in square meters.
    pub fn calculate_coverage_area(&self, boundary: &[GeoPoint]) -> Result<f64> {
        ensure_boundary(boundary)?;
        let transformer = CoordinateTransformer::new(vertex_mean(boundary))?;
        let local = transformer.geo_to_local_batch(boundary)?;
        Ok(polygon::area(&local))
    }

    /// Estimated mission time in seconds at `speed_mps` cruise speed.
    pub fn estimate_mission_time(&self, path: &Path, speed_mps: f64) -> Result<f64> {
        ensure_positive("speed", speed_mps)?;
        Ok(path.length_m()? / speed_mps)
    }

    /// Summary statistics for a boundary/path pair.
    pub fn survey_statistics(
        &self,
        boundary: &[GeoPoint],
        path: &Path,
        speed_mps: f64,
    ) -> Result<SurveyStats> {
        let total_distance_m = path.length_m()?;
        Ok(SurveyStats {
            waypoint_count: path.len(),
            total_distance_m,
            area_m2: self.calculate_coverage_area(boundary)?,
            flight_time_s: self.estimate_mission_time(path, speed_mps)?,
        })
    }

    /// Boustrophedon sweep in the rotated frame.
    fn plan_grid(&self, rotated: &[LocalPoint], params: &CoverageParameters) -> Vec<LocalPoint> {
        let bbox = polygon::bounding_box(rotated);
        if bbox.is_empty() {
            return Vec::new();
        }

        if params.subdivisions <= 1 {
            return self.sweep_region(rotated, &bbox, None, params);
        }

        // Split the bounding box into equal strips orthogonal to the scan
        // direction, plan each independently, and concatenate left to
        // right with a region_spacing gap between strips.
        let strip_width = bbox.width() / params.subdivisions as f64;
        let half_gap = params.region_spacing * 0.5;
        let mut out = Vec::new();
        for i in 0..params.subdivisions {
            let mut x0 = bbox.min.x + i as f64 * strip_width;
            let mut x1 = x0 + strip_width;
            if i > 0 {
                x0 += half_gap;
            }
            if i + 1 < params.subdivisions {
                x1 -= half_gap;
            }
            if x1 - x0 <= MIN_SEGMENT_WIDTH {
                continue;
            }
            out.extend(self.sweep_region(rotated, &bbox, Some((x0, x1)), params));
        }
        out
    }

    /// Generate sweep segments for one region (full area or one strip).
    fn sweep_region(
        &self,
        rotated: &[LocalPoint],
        bbox: &Bounds,
        x_range: Option<(f64, f64)>,
        params: &CoverageParameters,
    ) -> Vec<LocalPoint> {
        let height = bbox.height();

        // Spacing coarser than the polygon's extent across the scan lines:
        // a single centered sweep if the polygon still has width, else
        // nothing to sweep.
        let mut ys: Vec<f64> = if params.spacing >= height {
            if bbox.width() > MIN_SEGMENT_WIDTH {
                vec![bbox.center().y]
            } else {
                return Vec::new();
            }
        } else {
            let mut ys = Vec::new();
            let mut y = bbox.min.y;
            while y <= bbox.max.y + 1e-9 {
                ys.push(y);
                y += params.spacing;
            }
            ys
        };

        let top_entry = matches!(params.entry, EntryLocation::TopLeft | EntryLocation::TopRight);
        let right_entry =
            matches!(params.entry, EntryLocation::BottomRight | EntryLocation::TopRight);
        if top_entry {
            ys.reverse();
        }

        // Scanlines exactly on the bbox edges are nudged inward for the
        // clip only; emitted waypoints keep the nominal y.
        let clip_eps = (height * 1e-9).max(1e-9);

        let mut points = Vec::new();
        let mut line_idx = 0usize;
        for &y in &ys {
            let y_clip = y.clamp(bbox.min.y + clip_eps, bbox.max.y - clip_eps);
            let mut intervals = polygon::clip_to_scanline(rotated, y_clip);
            if let Some((x0, x1)) = x_range {
                for iv in intervals.iter_mut() {
                    iv.0 = iv.0.max(x0);
                    iv.1 = iv.1.min(x1);
                }
            }
            intervals.retain(|iv| iv.1 - iv.0 > MIN_SEGMENT_WIDTH);
            if intervals.is_empty() {
                continue;
            }

            // Alternate traversal direction per emitted line; within a
            // line, order the runs consistently with that direction.
            let left_to_right = (line_idx % 2 == 0) != right_entry;
            if left_to_right {
                for (x0, x1) in intervals {
                    points.push(LocalPoint::new(x0, y));
                    points.push(LocalPoint::new(x1, y));
                }
            } else {
                for (x0, x1) in intervals.into_iter().rev() {
                    points.push(LocalPoint::new(x1, y));
                    points.push(LocalPoint::new(x0, y));
                }
            }
            line_idx += 1;
        }

        if params.is_fixed_wing && params.smooth_turns {
            smooth_corners(&points, params.turn_radius)
        } else {
            points
        }
    }

    /// Inward spiral: repeatedly inset the boundary by `spacing`,
    /// appending each ring's closed vertex loop, outermost first.
    fn plan_spiral(&self, rotated: &[LocalPoint], params: &CoverageParameters) -> Vec<LocalPoint> {
        let mut ring: Vec<LocalPoint> = rotated.to_vec();
        // Work on a counter-clockwise ring so the inward normal is the
        // left edge normal.
        if polygon::signed_area(&ring) < 0.0 {
            ring.reverse();
        }

        let initial_area = polygon::area(&ring);
        if initial_area <= MIN_SEGMENT_WIDTH {
            return Vec::new();
        }
        let area_threshold = (initial_area * 0.01).max(1e-6);

        let mut out = Vec::new();
        for _ in 0..MAX_SPIRAL_RINGS {
            out.extend(ring.iter().copied());
            // Close the loop so the vehicle traces the full ring.
            out.push(ring[0]);

            let current_area = polygon::area(&ring);
            let next = match inset_ring(&ring, params.spacing) {
                Some(next) if next.len() >= 3 => next,
                _ => break,
            };
            let next_area = polygon::area(&next);
            if !next_area.is_finite() || next_area < area_threshold || next_area >= current_area {
                break;
            }
            ring = next;
        }
        out
    }
}

/// Offset every edge of a CCW ring inward by `d` and re-intersect adjacent
/// offset edges. Returns `None` when the ring degenerates.
fn inset_ring(ring: &[LocalPoint], d: f64) -> Option<Vec<LocalPoint>> {
    let n = ring.len();
    let mut out = Vec::with_capacity(n);
    for i in 0..n {
        let p_prev = ring[(i + n - 1) % n];
        let p = ring[i];
        let p_next = ring[(i + 1) % n];

        let e1 = p - p_prev;
        let e2 = p_next - p;
        let l1 = e1.length();
        let l2 = e2.length();
        if l1 < 1e-9 || l2 < 1e-9 {
            return None;
        }
        let d1 = e1 * (1.0 / l1);
        let d2 = e2 * (1.0 / l2);

        // Inward (left) normals for a CCW ring.
        let n1 = LocalPoint::new(-d1.y, d1.x);
        let n2 = LocalPoint::new(-d2.y, d2.x);

        let a1 = p_prev + n1 * d;
        let a2 = p + n2 * d;
        let denom = d1.cross(&d2);
        let v = if denom.abs() < 1e-12 {
            // Collinear edges: plain offset.
            p + n1 * d
        } else {
            let t = (a2 - a1).cross(&d2) / denom;
            a1 + d1 * t
        };
        if !v.x.is_finite() || !v.y.is_finite() {
            return None;
        }
        out.push(v);
    }
    Some(out)
}

/// Replace sharp corners of a polyline with sampled turn arcs.
///
/// Corners too tight or legs too short to fit the requested radius get a
/// proportionally reduced arc; degenerate corners are kept sharp rather
/// than risking NaN in the output.
fn smooth_corners(points: &[LocalPoint], turn_radius: f64) -> Vec<LocalPoint> {
    if points.len() < 3 {
        return points.to_vec();
    }

    let mut out = Vec::with_capacity(points.len() * 2);
    out.push(points[0]);
    // Each fillet's incoming leg starts where the previous one ended, so
    // tangent lengths shrink as arcs consume the shared segment.
    let mut prev = points[0];
    for i in 1..points.len() - 1 {
        match fillet_corner(prev, points[i], points[i + 1], turn_radius) {
            Some(arc) => {
                prev = arc[arc.len() - 1];
                out.extend(arc);
            }
            None => {
                prev = points[i];
                out.push(points[i]);
            }
        }
    }
    out.push(points[points.len() - 1]);
    out
}

/// Compute a sampled arc of radius ≤ `radius` tangent to both legs of the
/// corner `prev -> corner -> next`. Returns `None` for corners that should
/// stay sharp (straight-through, full U-turn, or degenerate legs).
fn fillet_corner(
    prev: LocalPoint,
    corner: LocalPoint,
    next: LocalPoint,
    radius: f64,
) -> Option<Vec<LocalPoint>> {
    let e1 = corner - prev;
    let e2 = next - corner;
    let l1 = e1.length();
    let l2 = e2.length();
    if l1 < 1e-9 || l2 < 1e-9 {
        return None;
    }
    let d1 = e1 * (1.0 / l1);
    let d2 = e2 * (1.0 / l2);

    let cross = d1.cross(&d2);
    let dot = d1.dot(&d2).clamp(-1.0, 1.0);
    let turn = cross.abs().atan2(dot);
    if turn < 1e-3 || std::f64::consts::PI - turn < 1e-3 {
        // Straight through, or reversing onto itself (tangent length
        // diverges); keep the corner sharp.
        return None;
    }

    // Tangent offset along each leg; shrink the radius when the legs are
    // too short for the requested one.
    let half_tan = (turn * 0.5).tan();
    let mut t = radius * half_tan;
    let t_max = 0.5 * l1.min(l2);
    let r_eff = if t > t_max {
        t = t_max;
        t_max / half_tan
    } else {
        radius
    };

    let p1 = corner - d1 * t;
    let p2 = corner + d2 * t;
    let side = cross.signum();
    // Arc center sits at distance r_eff perpendicular to the incoming leg,
    // on the turn side.
    let center = p1 + LocalPoint::new(-d1.y, d1.x) * (side * r_eff);

    let start_angle = (p1.y - center.y).atan2(p1.x - center.x);
    let steps = ((turn / ARC_STEP_RAD).ceil() as usize).max(1);
    let mut arc = Vec::with_capacity(steps + 1);
    arc.push(p1);
    for i in 1..steps {
        let ang = start_angle + side * turn * (i as f64 / steps as f64);
        arc.push(center + LocalPoint::new(ang.cos(), ang.sin()) * r_eff);
    }
    arc.push(p2);
    Some(arc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::CoordinateTransformer;

    const ORIGIN: GeoPoint = GeoPoint {
        lat: 24.78,
        lon: 120.99,
    };

    /// Build a geodetic boundary from local meter offsets around ORIGIN.
    fn geo_boundary(corners: &[(f64, f64)]) -> Vec<GeoPoint> {
        let tf = CoordinateTransformer::new(ORIGIN).unwrap();
        corners
            .iter()
            .map(|&(x, y)| tf.local_to_geo(LocalPoint::new(x, y)))
            .collect()
    }

    fn square_100() -> Vec<GeoPoint> {
        geo_boundary(&[(0.0, 0.0), (0.0, 100.0), (100.0, 100.0), (100.0, 0.0)])
    }

    /// Project a path back to local meters about ORIGIN.
    fn to_local(path: &Path) -> Vec<LocalPoint> {
        let tf = CoordinateTransformer::new(ORIGIN).unwrap();
        tf.geo_to_local_batch(path.waypoints()).unwrap()
    }

    fn distinct_levels(values: impl Iterator<Item = f64>, tol: f64) -> Vec<f64> {
        let mut levels: Vec<f64> = Vec::new();
        for v in values {
            if !levels.iter().any(|l| (l - v).abs() < tol) {
                levels.push(v);
            }
        }
        levels.sort_by(|a, b| a.partial_cmp(b).unwrap());
        levels
    }

    #[test]
    fn test_grid_square_six_lines() {
        let planner = CoveragePlanner::new();
        let params = CoverageParameters::new().with_spacing(20.0).with_angle(0.0);
        let path = planner.plan_coverage(&square_100(), &params).unwrap();

        let local = to_local(&path);
        // 6 scan lines at y = 0, 20, 40, 60, 80, 100, two points each.
        assert_eq!(local.len(), 12);
        let levels = distinct_levels(local.iter().map(|p| p.y), 0.01);
        assert_eq!(levels.len(), 6);
        for (i, y) in levels.iter().enumerate() {
            assert!(
                (y - 20.0 * i as f64).abs() < 0.01,
                "line {i} at unexpected y {y}"
            );
        }
    }

    #[test]
    fn test_grid_boustrophedon_alternation() {
        let planner = CoveragePlanner::new();
        let params = CoverageParameters::new().with_spacing(20.0);
        let path = planner.plan_coverage(&square_100(), &params).unwrap();
        let local = to_local(&path);

        // First line runs left-to-right, second right-to-left.
        assert!(local[0].x < local[1].x);
        assert!(local[2].x > local[3].x);
        // The transit between lines connects matching ends.
        assert!((local[1].x - local[2].x).abs() < 0.01);
    }

    #[test]
    fn test_grid_output_within_bbox() {
        let planner = CoveragePlanner::new();
        // Irregular pentagon with an off-axis scan angle.
        let boundary = geo_boundary(&[
            (0.0, 0.0),
            (120.0, 10.0),
            (150.0, 90.0),
            (60.0, 140.0),
            (-20.0, 70.0),
        ]);
        let params = CoverageParameters::new().with_spacing(15.0).with_angle(30.0);
        let path = planner.plan_coverage(&boundary, &params).unwrap();
        assert!(!path.is_empty());

        let tf = CoordinateTransformer::new(ORIGIN).unwrap();
        let local_boundary = tf.geo_to_local_batch(&boundary).unwrap();
        let bbox = polygon::bounding_box(&local_boundary);
        for p in to_local(&path) {
            assert!(
                p.x >= bbox.min.x - 0.01
                    && p.x <= bbox.max.x + 0.01
                    && p.y >= bbox.min.y - 0.01
                    && p.y <= bbox.max.y + 0.01,
                "waypoint ({}, {}) outside bbox",
                p.x,
                p.y
            );
        }
    }

    #[test]
    fn test_grid_concave_multiple_runs() {
        let planner = CoveragePlanner::new();
        // U shape opening upward: scanlines above the notch split in two.
        let boundary = geo_boundary(&[
            (0.0, 0.0),
            (100.0, 0.0),
            (100.0, 100.0),
            (70.0, 100.0),
            (70.0, 30.0),
            (30.0, 30.0),
            (30.0, 100.0),
            (0.0, 100.0),
        ]);
        let params = CoverageParameters::new().with_spacing(20.0);
        let path = planner.plan_coverage(&boundary, &params).unwrap();
        let local = to_local(&path);

        // The line at y = 60 must produce two disjoint runs (4 points).
        let at_60: Vec<_> = local.iter().filter(|p| (p.y - 60.0).abs() < 0.01).collect();
        assert_eq!(at_60.len(), 4);
        // No waypoint inside the notch.
        for p in &local {
            assert!(
                !(p.x > 30.01 && p.x < 69.99 && p.y > 30.01),
                "waypoint ({}, {}) inside notch",
                p.x,
                p.y
            );
        }
    }

    #[test]
    fn test_grid_rotated_scan_direction() {
        let planner = CoveragePlanner::new();
        let params = CoverageParameters::new().with_spacing(20.0).with_angle(90.0);
        let path = planner.plan_coverage(&square_100(), &params).unwrap();
        let local = to_local(&path);

        // Scanning along north: lines are vertical, 6 distinct x levels.
        let levels = distinct_levels(local.iter().map(|p| p.x), 0.01);
        assert_eq!(levels.len(), 6);
    }

    #[test]
    fn test_entry_location_top_right() {
        let planner = CoveragePlanner::new();
        let params = CoverageParameters::new()
            .with_spacing(20.0)
            .with_entry(EntryLocation::TopRight);
        let path = planner.plan_coverage(&square_100(), &params).unwrap();
        let local = to_local(&path);

        assert_eq!(local.len(), 12);
        // Sweep starts at the top-right corner and works downward.
        assert!((local[0].x - 100.0).abs() < 0.01 && (local[0].y - 100.0).abs() < 0.01);
        assert!(local[1].x < local[0].x);
        assert!(local[2].y < local[0].y);
        // Last line is the bottom edge.
        assert!((local[local.len() - 1].y - 0.0).abs() < 0.01);
    }

    #[test]
    fn test_spacing_too_coarse_single_line() {
        let planner = CoveragePlanner::new();
        let params = CoverageParameters::new().with_spacing(500.0);
        let path = planner.plan_coverage(&square_100(), &params).unwrap();
        let local = to_local(&path);

        // One centered sweep line.
        assert_eq!(local.len(), 2);
        assert!((local[0].y - 50.0).abs() < 0.01);
        assert!((local[1].y - 50.0).abs() < 0.01);
    }

    #[test]
    fn test_degenerate_boundary_rejected() {
        let planner = CoveragePlanner::new();
        let params = CoverageParameters::default();
        let two = geo_boundary(&[(0.0, 0.0), (100.0, 0.0)]);
        assert!(matches!(
            planner.plan_coverage(&two, &params),
            Err(PlanError::DegeneratePolygon(2))
        ));
    }

    #[test]
    fn test_invalid_parameters_rejected() {
        let planner = CoveragePlanner::new();
        let boundary = square_100();

        let bad_spacing = CoverageParameters::new().with_spacing(0.0);
        assert!(matches!(
            planner.plan_coverage(&boundary, &bad_spacing),
            Err(PlanError::NonPositiveParameter { name: "spacing", .. })
        ));

        let bad_angle = CoverageParameters::new().with_angle(270.0);
        assert!(matches!(
            planner.plan_coverage(&boundary, &bad_angle),
            Err(PlanError::ParameterOutOfRange { name: "angle_deg", .. })
        ));

        let bad_radius = CoverageParameters::new().with_smooth_turns(0.0);
        assert!(matches!(
            planner.plan_coverage(&boundary, &bad_radius),
            Err(PlanError::NonPositiveParameter { name: "turn_radius", .. })
        ));
    }

    #[test]
    fn test_smooth_turns_insert_arc_points() {
        let planner = CoveragePlanner::new();
        let sharp = CoverageParameters::new().with_spacing(20.0);
        let smooth = CoverageParameters::new().with_spacing(20.0).with_smooth_turns(10.0);

        let boundary = square_100();
        let sharp_path = planner.plan_coverage(&boundary, &sharp).unwrap();
        let smooth_path = planner.plan_coverage(&boundary, &smooth).unwrap();

        assert!(smooth_path.len() > sharp_path.len());
        // Arc points cut corners inward, so the smoothed path stays in the
        // bounding box too.
        for p in to_local(&smooth_path) {
            assert!(p.x >= -0.01 && p.x <= 100.01 && p.y >= -0.01 && p.y <= 100.01);
        }
        for p in to_local(&smooth_path) {
            assert!(p.x.is_finite() && p.y.is_finite());
        }
    }

    #[test]
    fn test_subdivisions_cover_all_strips() {
        let planner = CoveragePlanner::new();
        let params = CoverageParameters::new()
            .with_spacing(20.0)
            .with_subdivisions(2, 4.0);
        let path = planner.plan_coverage(&square_100(), &params).unwrap();
        let local = to_local(&path);
        assert!(!local.is_empty());

        // Points from both strips, with the gap respected around x = 50.
        assert!(local.iter().any(|p| p.x < 48.0));
        assert!(local.iter().any(|p| p.x > 52.0));
        for p in &local {
            assert!(
                p.x <= 48.01 || p.x >= 51.99,
                "waypoint ({}, {}) inside the strip gap",
                p.x,
                p.y
            );
        }
    }

    #[test]
    fn test_spiral_square() {
        let planner = CoveragePlanner::new();
        let params = CoverageParameters::new()
            .with_spacing(15.0)
            .with_pattern(ScanPattern::Spiral);
        let path = planner.plan_coverage(&square_100(), &params).unwrap();
        let local = to_local(&path);

        // Multiple rings: more points than a single closed square loop.
        assert!(local.len() > 5);
        // All rings stay inside the boundary bbox.
        for p in &local {
            assert!(p.x >= -0.01 && p.x <= 100.01 && p.y >= -0.01 && p.y <= 100.01);
        }
        // Later rings are strictly inside: the innermost point is well off
        // the boundary.
        let innermost = local
            .iter()
            .map(|p| {
                let to_edge = p.x.min(100.0 - p.x).min(p.y).min(100.0 - p.y);
                to_edge
            })
            .fold(f64::NEG_INFINITY, f64::max);
        assert!(innermost > 10.0);
    }

    #[test]
    fn test_inset_ring_square() {
        let square = vec![
            LocalPoint::new(0.0, 0.0),
            LocalPoint::new(100.0, 0.0),
            LocalPoint::new(100.0, 100.0),
            LocalPoint::new(0.0, 100.0),
        ];
        let inner = inset_ring(&square, 10.0).unwrap();
        assert_eq!(inner.len(), 4);
        let area = polygon::area(&inner);
        assert!((area - 6400.0).abs() < 1e-6, "inset area {area}");
    }

    #[test]
    fn test_coverage_area_and_time() {
        let planner = CoveragePlanner::new();
        let boundary = square_100();
        let area = planner.calculate_coverage_area(&boundary).unwrap();
        assert!((area - 10_000.0).abs() < 1.0);

        let params = CoverageParameters::new().with_spacing(20.0);
        let path = planner.plan_coverage(&boundary, &params).unwrap();
        let time = planner.estimate_mission_time(&path, 10.0).unwrap();
        let dist = path.length_m().unwrap();
        assert!((time - dist / 10.0).abs() < 1e-9);
        assert!(dist > 600.0); // 6 sweeps of 100 m plus transits.

        let stats = planner.survey_statistics(&boundary, &path, 10.0).unwrap();
        assert_eq!(stats.waypoint_count, path.len());
        assert!((stats.area_m2 - area).abs() < 1e-9);

        assert!(matches!(
            planner.estimate_mission_time(&path, 0.0),
            Err(PlanError::NonPositiveParameter { name: "speed", .. })
        ));
    }

    #[test]
    fn test_fillet_right_angle() {
        let arc = fillet_corner(
            LocalPoint::new(0.0, 0.0),
            LocalPoint::new(10.0, 0.0),
            LocalPoint::new(10.0, 10.0),
            2.0,
        )
        .unwrap();
        assert!(arc.len() >= 2);
        // Tangent points 2m short of the corner on each leg.
        let first = arc[0];
        let last = arc[arc.len() - 1];
        assert!((first.x - 8.0).abs() < 1e-9 && first.y.abs() < 1e-9);
        assert!((last.x - 10.0).abs() < 1e-9 && (last.y - 2.0).abs() < 1e-9);
        // All arc samples at radius 2 from the center (8, 2).
        let center = LocalPoint::new(8.0, 2.0);
        for p in &arc {
            assert!((p.distance(&center) - 2.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_fillet_straight_line_untouched() {
        assert!(fillet_corner(
            LocalPoint::new(0.0, 0.0),
            LocalPoint::new(5.0, 0.0),
            LocalPoint::new(10.0, 0.0),
            2.0,
        )
        .is_none());
    }
}
