//! Error types for VyomaPlan.
//!
//! All validation failures are reported through [`PlanError`] at the public
//! entry point of each planner, before any search work begins. A search that
//! runs its full budget without finding a path is *not* an error: point-to-
//! point planners return `Ok(None)` and the coverage planner returns an
//! empty path, so callers can tell "invalid request" apart from "tried and
//! failed".

use thiserror::Error;

/// VyomaPlan error type.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlanError {
    /// Latitude outside [-90, 90] or longitude outside [-180, 180].
    #[error("coordinate out of range: lat {lat}, lon {lon}")]
    InvalidCoordinate {
        /// Offending latitude in degrees.
        lat: f64,
        /// Offending longitude in degrees.
        lon: f64,
    },

    /// Polygon with fewer than 3 vertices.
    #[error("polygon needs at least 3 vertices, got {0}")]
    DegeneratePolygon(usize),

    /// A parameter that must be strictly positive was not.
    #[error("{name} must be positive, got {value}")]
    NonPositiveParameter {
        /// Parameter name.
        name: &'static str,
        /// Offending value.
        value: f64,
    },

    /// A parameter outside its documented range.
    #[error("{name} must be within [{min}, {max}], got {value}")]
    ParameterOutOfRange {
        /// Parameter name.
        name: &'static str,
        /// Offending value.
        value: f64,
        /// Lower bound (inclusive).
        min: f64,
        /// Upper bound (inclusive).
        max: f64,
    },

    /// Obstacle record that fails its shape invariants.
    #[error("malformed obstacle: {0}")]
    MalformedObstacle(String),

    /// Start or goal point outside the permitted planning area, or sitting
    /// inside an obstacle.
    #[error("{which} lies outside the permitted planning area")]
    OutsidePlanningArea {
        /// Which input point was rejected ("start", "goal", ...).
        which: &'static str,
    },

    /// Geometry that would produce NaN/infinity (zero-length edges,
    /// projection origin at a pole, ...). Guarded at entry rather than
    /// propagated into output paths.
    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(String),

    /// Settings file could not be read or parsed.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<toml::de::Error> for PlanError {
    fn from(e: toml::de::Error) -> Self {
        PlanError::Config(e.to_string())
    }
}

/// VyomaPlan result alias.
pub type Result<T> = std::result::Result<T, PlanError>;
