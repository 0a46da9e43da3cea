//! Geodetic and local tangent-plane point types.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Sub};

/// Geodetic coordinate (WGS84 degrees).
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in degrees, positive north.
    pub lat: f64,
    /// Longitude in degrees, positive east.
    pub lon: f64,
}

impl GeoPoint {
    /// Create a new geodetic point.
    #[inline]
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Check that the coordinate is inside the valid WGS84 range.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && self.lat.abs() <= 90.0
            && self.lon.abs() <= 180.0
    }
}

/// Local tangent-plane coordinate (meters, x east, y north).
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct LocalPoint {
    /// East offset from the projection origin in meters.
    pub x: f64,
    /// North offset from the projection origin in meters.
    pub y: f64,
}

impl LocalPoint {
    /// Origin point.
    pub const ZERO: LocalPoint = LocalPoint { x: 0.0, y: 0.0 };

    /// Create a new local point.
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    #[inline]
    pub fn distance(&self, other: &LocalPoint) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Squared distance (avoids sqrt).
    #[inline]
    pub fn distance_squared(&self, other: &LocalPoint) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// Length (magnitude) as a vector from the origin.
    #[inline]
    pub fn length(&self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Normalize to unit length. Zero vectors are returned unchanged.
    #[inline]
    pub fn normalize(&self) -> LocalPoint {
        let len = self.length();
        if len > 0.0 {
            LocalPoint::new(self.x / len, self.y / len)
        } else {
            *self
        }
    }

    /// Dot product (as vectors).
    #[inline]
    pub fn dot(&self, other: &LocalPoint) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Cross product (z-component of the 3D cross product).
    #[inline]
    pub fn cross(&self, other: &LocalPoint) -> f64 {
        self.x * other.y - self.y * other.x
    }

    /// Rotate around the origin by `angle` radians (counter-clockwise).
    #[inline]
    pub fn rotate(&self, angle: f64) -> LocalPoint {
        let cos_a = angle.cos();
        let sin_a = angle.sin();
        LocalPoint::new(
            self.x * cos_a - self.y * sin_a,
            self.x * sin_a + self.y * cos_a,
        )
    }

    /// Rotate around `pivot` by `angle` radians (counter-clockwise).
    #[inline]
    pub fn rotate_around(&self, pivot: &LocalPoint, angle: f64) -> LocalPoint {
        let shifted = *self - *pivot;
        shifted.rotate(angle) + *pivot
    }

    /// Point at a given fraction along the segment to `other`.
    #[inline]
    pub fn lerp(&self, other: &LocalPoint, t: f64) -> LocalPoint {
        LocalPoint::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }
}

impl Add for LocalPoint {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        LocalPoint::new(self.x + other.x, self.y + other.y)
    }
}

impl Sub for LocalPoint {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        LocalPoint::new(self.x - other.x, self.y - other.y)
    }
}

impl Mul<f64> for LocalPoint {
    type Output = Self;

    #[inline]
    fn mul(self, scalar: f64) -> Self {
        LocalPoint::new(self.x * scalar, self.y * scalar)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geo_point_validity() {
        assert!(GeoPoint::new(24.78, 120.99).is_valid());
        assert!(GeoPoint::new(-90.0, 180.0).is_valid());
        assert!(!GeoPoint::new(90.5, 0.0).is_valid());
        assert!(!GeoPoint::new(0.0, -180.5).is_valid());
        assert!(!GeoPoint::new(f64::NAN, 0.0).is_valid());
    }

    #[test]
    fn test_distance() {
        let a = LocalPoint::new(0.0, 0.0);
        let b = LocalPoint::new(3.0, 4.0);
        assert!((a.distance(&b) - 5.0).abs() < 1e-12);
        assert!((a.distance_squared(&b) - 25.0).abs() < 1e-12);
    }

    #[test]
    fn test_rotate() {
        let p = LocalPoint::new(1.0, 0.0);
        let rotated = p.rotate(std::f64::consts::FRAC_PI_2);
        assert!(rotated.x.abs() < 1e-12);
        assert!((rotated.y - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_rotate_around_pivot() {
        let p = LocalPoint::new(2.0, 1.0);
        let pivot = LocalPoint::new(1.0, 1.0);
        let rotated = p.rotate_around(&pivot, std::f64::consts::PI);
        assert!((rotated.x - 0.0).abs() < 1e-12);
        assert!((rotated.y - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_normalize_zero() {
        let zero = LocalPoint::ZERO;
        assert_eq!(zero.normalize(), zero);

        let v = LocalPoint::new(0.0, 5.0);
        let n = v.normalize();
        assert!((n.length() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_lerp() {
        let a = LocalPoint::new(0.0, 0.0);
        let b = LocalPoint::new(10.0, 20.0);
        let mid = a.lerp(&b, 0.5);
        assert_eq!(mid, LocalPoint::new(5.0, 10.0));
    }
}
