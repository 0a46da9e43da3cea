//! Geodetic ⇄ local tangent-plane coordinate conversion.
//!
//! Small-area flat-earth approximation: an equirectangular projection about
//! a fixed origin. The same Earth radius is used everywhere the crate
//! computes distances, so path lengths and mission-time estimates stay
//! consistent with the projection.
//!
//! [`RotatedFrame`] composes the projection with a rotation about the
//! origin; the coverage planner uses it to make the intended scan
//! direction horizontal before generating sweep lines.

use serde::{Deserialize, Serialize};

use crate::core::{GeoPoint, LocalPoint};
use crate::error::{PlanError, Result};

/// Earth mean radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Equirectangular projection about a fixed geodetic origin.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct CoordinateTransformer {
    origin: GeoPoint,
    cos_lat0: f64,
}

impl CoordinateTransformer {
    /// Create a transformer centered on `origin`.
    ///
    /// Fails if the origin is outside the valid WGS84 range or so close to
    /// a pole that the longitude scale degenerates.
    pub fn new(origin: GeoPoint) -> Result<Self> {
        validate_geo(&origin)?;
        let cos_lat0 = origin.lat.to_radians().cos();
        if cos_lat0 < 1e-9 {
            return Err(PlanError::DegenerateGeometry(
                "projection origin at a pole".to_string(),
            ));
        }
        Ok(Self { origin, cos_lat0 })
    }

    /// The projection origin.
    #[inline]
    pub fn origin(&self) -> GeoPoint {
        self.origin
    }

    /// Convert a geodetic point to local east/north meters.
    pub fn geo_to_local(&self, point: GeoPoint) -> Result<LocalPoint> {
        validate_geo(&point)?;
        let x = (point.lon - self.origin.lon).to_radians() * EARTH_RADIUS_M * self.cos_lat0;
        let y = (point.lat - self.origin.lat).to_radians() * EARTH_RADIUS_M;
        Ok(LocalPoint::new(x, y))
    }

    /// Convert local east/north meters back to a geodetic point.
    pub fn local_to_geo(&self, point: LocalPoint) -> GeoPoint {
        let lat = self.origin.lat + (point.y / EARTH_RADIUS_M).to_degrees();
        let lon = self.origin.lon + (point.x / (EARTH_RADIUS_M * self.cos_lat0)).to_degrees();
        GeoPoint::new(lat, lon)
    }

    /// Batch conversion to local coordinates, preserving input order.
    pub fn geo_to_local_batch(&self, points: &[GeoPoint]) -> Result<Vec<LocalPoint>> {
        points.iter().map(|p| self.geo_to_local(*p)).collect()
    }

    /// Batch conversion to geodetic coordinates, preserving input order.
    pub fn local_to_geo_batch(&self, points: &[LocalPoint]) -> Vec<GeoPoint> {
        points.iter().map(|p| self.local_to_geo(*p)).collect()
    }
}

/// A tangent-plane projection composed with a rotation about its origin.
///
/// `geo_to_rotated` maps a geodetic point into a frame where directions at
/// `angle_deg` (counter-clockwise from east) become the +x axis.
#[derive(Clone, Copy, Debug)]
pub struct RotatedFrame {
    transformer: CoordinateTransformer,
    cos_a: f64,
    sin_a: f64,
}

impl RotatedFrame {
    /// Create a rotated frame about `origin` with the given rotation.
    pub fn new(origin: GeoPoint, angle_deg: f64) -> Result<Self> {
        let transformer = CoordinateTransformer::new(origin)?;
        let angle_rad = angle_deg.to_radians();
        Ok(Self {
            transformer,
            cos_a: angle_rad.cos(),
            sin_a: angle_rad.sin(),
        })
    }

    /// Convert a geodetic point into the rotated frame.
    pub fn geo_to_rotated(&self, point: GeoPoint) -> Result<LocalPoint> {
        let local = self.transformer.geo_to_local(point)?;
        Ok(LocalPoint::new(
            local.x * self.cos_a - local.y * self.sin_a,
            local.x * self.sin_a + local.y * self.cos_a,
        ))
    }

    /// Convert a rotated-frame point back to geodetic coordinates.
    pub fn rotated_to_geo(&self, point: LocalPoint) -> GeoPoint {
        let unrotated = LocalPoint::new(
            point.x * self.cos_a + point.y * self.sin_a,
            -point.x * self.sin_a + point.y * self.cos_a,
        );
        self.transformer.local_to_geo(unrotated)
    }

    /// Batch conversion into the rotated frame, preserving input order.
    pub fn geo_to_rotated_batch(&self, points: &[GeoPoint]) -> Result<Vec<LocalPoint>> {
        points.iter().map(|p| self.geo_to_rotated(*p)).collect()
    }

    /// Batch conversion back to geodetic, preserving input order.
    pub fn rotated_to_geo_batch(&self, points: &[LocalPoint]) -> Vec<GeoPoint> {
        points.iter().map(|p| self.rotated_to_geo(*p)).collect()
    }
}

fn validate_geo(point: &GeoPoint) -> Result<()> {
    if !point.is_valid() {
        return Err(PlanError::InvalidCoordinate {
            lat: point.lat,
            lon: point.lon,
        });
    }
    Ok(())
}
