//! Path planners: coverage sweeps, grid search, and sampling search.
//!
//! All planners share the same call contract: geodetic inputs, geodetic
//! waypoints out, all internal math in projected meters. Planners are pure
//! with respect to their inputs; a `plan()` call reads its configuration
//! and arguments and produces a fresh [`Path`], holding no references into
//! caller-owned containers between calls.

pub mod coverage;
pub mod grid_search;
pub mod sampling;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core::GeoPoint;
use crate::error::{PlanError, Result};
use crate::transform::CoordinateTransformer;

/// An ordered sequence of geodetic waypoints.
///
/// Coverage planning returns an empty path for a legitimately "too coarse"
/// request; point-to-point planners signal failure with `Ok(None)` instead,
/// so a returned `Path` from those is never empty.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Path {
    waypoints: Vec<GeoPoint>,
}

impl Path {
    /// Create a path from a waypoint sequence.
    pub fn new(waypoints: Vec<GeoPoint>) -> Self {
        Self { waypoints }
    }

    /// Path with no waypoints.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of waypoints.
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Whether the path has no waypoints.
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// The waypoint sequence.
    pub fn waypoints(&self) -> &[GeoPoint] {
        &self.waypoints
    }

    /// Consume the path, returning its waypoints.
    pub fn into_waypoints(self) -> Vec<GeoPoint> {
        self.waypoints
    }

    /// First waypoint, if any.
    pub fn first(&self) -> Option<&GeoPoint> {
        self.waypoints.first()
    }

    /// Last waypoint, if any.
    pub fn last(&self) -> Option<&GeoPoint> {
        self.waypoints.last()
    }

    /// Total path length in meters.
    ///
    /// Computed with the same tangent-plane projection the planners use,
    /// anchored at the first waypoint.
    pub fn length_m(&self) -> Result<f64> {
        if self.waypoints.len() < 2 {
            return Ok(0.0);
        }
        let transformer = CoordinateTransformer::new(self.waypoints[0])?;
        let locals = transformer.geo_to_local_batch(&self.waypoints)?;
        Ok(locals.windows(2).map(|w| w[0].distance(&w[1])).sum())
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a GeoPoint;
    type IntoIter = std::slice::Iter<'a, GeoPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.waypoints.iter()
    }
}

/// Cooperative cancellation for long-running searches.
///
/// Cloneable and cheap to share across threads; searches check the token
/// once per loop iteration. Cancellation yields the same `Ok(None)` result
/// as budget exhaustion; there is no partial-path resumption.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// Create a fresh, un-cancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation of every search holding a clone of this token.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// Entry validation: a parameter that must be strictly positive and finite.
pub(crate) fn ensure_positive(name: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(PlanError::NonPositiveParameter { name, value });
    }
    Ok(())
}

/// Entry validation: a parameter bounded to an inclusive range.
pub(crate) fn ensure_in_range(name: &'static str, value: f64, min: f64, max: f64) -> Result<()> {
    if !value.is_finite() || value < min || value > max {
        return Err(PlanError::ParameterOutOfRange {
            name,
            value,
            min,
            max,
        });
    }
    Ok(())
}

/// Entry validation: a boundary polygon needs at least 3 vertices.
pub(crate) fn ensure_boundary(boundary: &[GeoPoint]) -> Result<()> {
    if boundary.len() < 3 {
        return Err(PlanError::DegeneratePolygon(boundary.len()));
    }
    Ok(())
}

/// Arithmetic mean of a vertex ring, used as the projection origin so the
/// planning area stays centered on the tangent plane.
pub(crate) fn vertex_mean(boundary: &[GeoPoint]) -> GeoPoint {
    let n = boundary.len() as f64;
    let lat = boundary.iter().map(|p| p.lat).sum::<f64>() / n;
    let lon = boundary.iter().map(|p| p.lon).sum::<f64>() / n;
    GeoPoint::new(lat, lon)
}
