//! Obstacle shapes and collision testing.
//!
//! [`Obstacle`] is a closed tagged enum with one geometric predicate per
//! variant, matched explicitly. The [`CollisionChecker`] owns its obstacle
//! list: callers hand over a `Vec<Obstacle>` when the checker is built,
//! which is the defensive copy that keeps planners independent of
//! caller-side mutation for the duration of a planning call.
//!
//! An empty checker never reports a collision; planners treat a missing
//! checker the same way, meaning "unconstrained".

use serde::{Deserialize, Serialize};

use crate::core::LocalPoint;
use crate::error::{PlanError, Result};
use crate::polygon;

/// An obstacle shape in local tangent-plane coordinates.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Obstacle {
    /// Circular obstacle.
    Circle {
        /// Center in local meters.
        center: LocalPoint,
        /// Radius in meters, strictly positive.
        radius: f64,
    },
    /// Rectangle, optionally rotated about its center.
    Rect {
        /// Center in local meters.
        center: LocalPoint,
        /// Full width (x extent before rotation), strictly positive.
        width: f64,
        /// Full height (y extent before rotation), strictly positive.
        height: f64,
        /// Rotation about the center in degrees, counter-clockwise.
        rotation_deg: f64,
    },
    /// Arbitrary simple polygon.
    Polygon {
        /// Open vertex ring, at least 3 vertices.
        vertices: Vec<LocalPoint>,
    },
}

impl Obstacle {
    /// Check the shape invariants (positive extents, enough vertices).
    pub fn validate(&self) -> Result<()> {
        match self {
            Obstacle::Circle { radius, .. } => {
                if !radius.is_finite() || *radius <= 0.0 {
                    return Err(PlanError::MalformedObstacle(format!(
                        "circle radius must be positive, got {radius}"
                    )));
                }
            }
            Obstacle::Rect { width, height, .. } => {
                if !width.is_finite() || *width <= 0.0 || !height.is_finite() || *height <= 0.0 {
                    return Err(PlanError::MalformedObstacle(format!(
                        "rectangle extents must be positive, got {width}x{height}"
                    )));
                }
            }
            Obstacle::Polygon { vertices } => {
                if vertices.len() < 3 {
                    return Err(PlanError::MalformedObstacle(format!(
                        "polygon obstacle needs at least 3 vertices, got {}",
                        vertices.len()
                    )));
                }
            }
        }
        Ok(())
    }

    /// Check whether a point lies inside (or on the boundary of) the shape.
    pub fn contains(&self, point: LocalPoint) -> bool {
        match self {
            Obstacle::Circle { center, radius } => point.distance(center) <= *radius,
            Obstacle::Rect {
                center,
                width,
                height,
                rotation_deg,
            } => {
                // Transform into the rectangle-local frame and compare
                // against the half-extents.
                let local = (point - *center).rotate(-rotation_deg.to_radians());
                local.x.abs() <= width * 0.5 && local.y.abs() <= height * 0.5
            }
            Obstacle::Polygon { vertices } => polygon::contains_point(vertices, point),
        }
    }

    /// Check whether a segment touches the shape.
    ///
    /// True when either endpoint is inside or the segment crosses the
    /// shape's boundary.
    pub fn intersects_segment(&self, a: LocalPoint, b: LocalPoint) -> bool {
        if self.contains(a) || self.contains(b) {
            return true;
        }
        match self {
            Obstacle::Circle { center, radius } => {
                polygon::point_segment_distance(*center, a, b) <= *radius
            }
            Obstacle::Rect { .. } => {
                let corners = self.rect_corners();
                segment_crosses_ring(a, b, &corners)
            }
            Obstacle::Polygon { vertices } => segment_crosses_ring(a, b, vertices),
        }
    }

    /// World-frame corners of a rectangle obstacle (CCW).
    fn rect_corners(&self) -> Vec<LocalPoint> {
        match self {
            Obstacle::Rect {
                center,
                width,
                height,
                rotation_deg,
            } => {
                let hw = width * 0.5;
                let hh = height * 0.5;
                let angle = rotation_deg.to_radians();
                [
                    LocalPoint::new(-hw, -hh),
                    LocalPoint::new(hw, -hh),
                    LocalPoint::new(hw, hh),
                    LocalPoint::new(-hw, hh),
                ]
                .iter()
                .map(|c| c.rotate(angle) + *center)
                .collect()
            }
            _ => Vec::new(),
        }
    }
}

fn segment_crosses_ring(a: LocalPoint, b: LocalPoint, ring: &[LocalPoint]) -> bool {
    for i in 0..ring.len() {
        let p = ring[i];
        let q = ring[(i + 1) % ring.len()];
        if polygon::segments_intersect(a, b, p, q) {
            return true;
        }
    }
    false
}

/// Point and segment validity tests against a set of obstacles.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CollisionChecker {
    obstacles: Vec<Obstacle>,
}

impl CollisionChecker {
    /// Build a checker from an obstacle list, validating every record.
    pub fn new(obstacles: Vec<Obstacle>) -> Result<Self> {
        for obstacle in &obstacles {
            obstacle.validate()?;
        }
        Ok(Self { obstacles })
    }

    /// Checker with no obstacles; never reports a collision.
    pub fn empty() -> Self {
        Self {
            obstacles: Vec::new(),
        }
    }

    /// The obstacle list.
    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    /// Whether the checker holds any obstacles.
    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    /// Check whether a point collides with any obstacle.
    pub fn is_point_colliding(&self, point: LocalPoint) -> bool {
        self.obstacles.iter().any(|o| o.contains(point))
    }

    /// Check whether a segment collides with any obstacle.
    pub fn is_segment_colliding(&self, a: LocalPoint, b: LocalPoint) -> bool {
        self.obstacles.iter().any(|o| o.intersects_segment(a, b))
    }
}
