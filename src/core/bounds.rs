//! Axis-aligned bounding boxes in local and geodetic coordinates.
//!
//! [`Bounds`] is the local-frame AABB used for scanline ranges, grid
//! extents and RRT sampling windows. [`GeoBounds`] is the geodetic search
//! rectangle handed to the sampling planners.

use serde::{Deserialize, Serialize};

use super::point::{GeoPoint, LocalPoint};
use crate::error::{PlanError, Result};

/// Axis-aligned bounding box in local meters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// Minimum corner (smallest x and y).
    pub min: LocalPoint,
    /// Maximum corner (largest x and y).
    pub max: LocalPoint,
}

impl Bounds {
    /// Create a new bounding box from min and max corners.
    #[inline]
    pub const fn new(min: LocalPoint, max: LocalPoint) -> Self {
        Self { min, max }
    }

    /// Create an empty (invalid) bounding box that expands to fit any point.
    #[inline]
    pub fn empty() -> Self {
        Self {
            min: LocalPoint::new(f64::INFINITY, f64::INFINITY),
            max: LocalPoint::new(f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    /// Check if the bounds are empty (invalid).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    /// Smallest box containing every point in the slice.
    pub fn from_points(points: &[LocalPoint]) -> Self {
        let mut bounds = Self::empty();
        for p in points {
            bounds.expand_to_include(*p);
        }
        bounds
    }

    /// Width of the bounding box (x extent).
    #[inline]
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    /// Height of the bounding box (y extent).
    #[inline]
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    /// Center of the bounding box.
    #[inline]
    pub fn center(&self) -> LocalPoint {
        LocalPoint::new(
            (self.min.x + self.max.x) * 0.5,
            (self.min.y + self.max.y) * 0.5,
        )
    }

    /// Check if a point is inside the bounding box (edges inclusive).
    #[inline]
    pub fn contains(&self, point: LocalPoint) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }

    /// Expand bounds to include a point.
    #[inline]
    pub fn expand_to_include(&mut self, point: LocalPoint) {
        self.min.x = self.min.x.min(point.x);
        self.min.y = self.min.y.min(point.y);
        self.max.x = self.max.x.max(point.x);
        self.max.y = self.max.y.max(point.y);
    }
}

/// Geodetic search rectangle (south-west / north-east corners, degrees).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    /// South-west corner (min latitude, min longitude).
    pub south_west: GeoPoint,
    /// North-east corner (max latitude, max longitude).
    pub north_east: GeoPoint,
}

impl GeoBounds {
    /// Create a search rectangle from its south-west and north-east corners.
    pub fn new(south_west: GeoPoint, north_east: GeoPoint) -> Result<Self> {
        for corner in [&south_west, &north_east] {
            if !corner.is_valid() {
                return Err(PlanError::InvalidCoordinate {
                    lat: corner.lat,
                    lon: corner.lon,
                });
            }
        }
        if south_west.lat > north_east.lat || south_west.lon > north_east.lon {
            return Err(PlanError::DegenerateGeometry(
                "search rectangle corners are swapped".to_string(),
            ));
        }
        Ok(Self {
            south_west,
            north_east,
        })
    }

    /// Smallest rectangle containing every point in the slice.
    pub fn from_points(points: &[GeoPoint]) -> Result<Self> {
        if points.is_empty() {
            return Err(PlanError::DegenerateGeometry(
                "cannot build a search rectangle from zero points".to_string(),
            ));
        }
        let mut min_lat = f64::INFINITY;
        let mut min_lon = f64::INFINITY;
        let mut max_lat = f64::NEG_INFINITY;
        let mut max_lon = f64::NEG_INFINITY;
        for p in points {
            if !p.is_valid() {
                return Err(PlanError::InvalidCoordinate {
                    lat: p.lat,
                    lon: p.lon,
                });
            }
            min_lat = min_lat.min(p.lat);
            min_lon = min_lon.min(p.lon);
            max_lat = max_lat.max(p.lat);
            max_lon = max_lon.max(p.lon);
        }
        Self::new(
            GeoPoint::new(min_lat, min_lon),
            GeoPoint::new(max_lat, max_lon),
        )
    }

    /// Check if a point lies inside the rectangle (edges inclusive).
    #[inline]
    pub fn contains(&self, point: &GeoPoint) -> bool {
        point.lat >= self.south_west.lat
            && point.lat <= self.north_east.lat
            && point.lon >= self.south_west.lon
            && point.lon <= self.north_east.lon
    }

    /// Geometric center of the rectangle.
    #[inline]
    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(
            (self.south_west.lat + self.north_east.lat) * 0.5,
            (self.south_west.lon + self.north_east.lon) * 0.5,
        )
    }
}
