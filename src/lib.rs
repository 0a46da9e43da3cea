//! # VyomaPlan: UAV Flight-Path Planning Library
//!
//! Flight-path planning for small UAV survey missions: full-area coverage
//! sweeps, grid search (A*/Dijkstra), and sampling search (RRT/RRT*) over
//! geodetic boundary polygons.
//!
//! ## Features
//!
//! - **Coverage Planning**: Boustrophedon grid sweeps and inward spirals
//!   over arbitrary simple polygons, with fixed-wing turn smoothing and
//!   multi-strip subdivision
//! - **Grid Search**: Weighted A* on an 8-connected lattice; weight zero
//!   turns the same search into Dijkstra
//! - **Sampling Search**: RRT and RRT* with injectable, seedable randomness
//! - **Obstacle Avoidance**: Circle, rectangle, and polygon obstacles
//!   shared by all point-to-point planners
//!
//! ## Quick Start
//!
//! ```rust
//! use vyoma_plan::core::GeoPoint;
//! use vyoma_plan::planners::coverage::{CoveragePlanner, CoverageParameters};
//!
//! // A roughly 100 m square survey area.
//! let boundary = vec![
//!     GeoPoint::new(24.7800, 120.9900),
//!     GeoPoint::new(24.7800, 120.9910),
//!     GeoPoint::new(24.7809, 120.9910),
//!     GeoPoint::new(24.7809, 120.9900),
//! ];
//!
//! let planner = CoveragePlanner::new();
//! let params = CoverageParameters::new().with_spacing(20.0);
//! let path = planner.plan_coverage(&boundary, &params)?;
//! println!("{} waypoints, {:.0} m", path.len(), path.length_m()?);
//! # Ok::<(), vyoma_plan::PlanError>(())
//! ```
//!
//! ## Coordinate Conventions
//!
//! - Public inputs and outputs are geodetic WGS84 degrees (latitude
//!   positive north, longitude positive east)
//! - All internal math runs in a local tangent-plane frame in meters
//!   (x east, y north), via [`transform::CoordinateTransformer`]
//! - Every distance-bearing parameter (spacing, step sizes, radii) is in
//!   meters
//!
//! ## Architecture
//!
//! - [`core`]: Point and bounding-box types
//! - [`transform`]: Geodetic ⇄ local projection and rotated frames
//! - [`polygon`]: Area, containment, scanline clipping, intersection
//! - [`collision`]: Obstacle shapes and the collision checker
//! - [`planners`]: Coverage, grid-search, and sampling planners
//! - [`settings`]: TOML-backed mission defaults
//!
//! ## Failure Semantics
//!
//! Malformed input fails fast with a [`PlanError`] before any search work
//! begins. A search that exhausts its budget without reaching the goal is
//! a normal outcome: point-to-point planners return `Ok(None)` and the
//! coverage planner returns an empty [`Path`], never an error.

pub mod collision;
pub mod core;
pub mod error;
pub mod planners;
pub mod polygon;
pub mod settings;
pub mod transform;

// Re-export main types at crate root
pub use collision::{CollisionChecker, Obstacle};
pub use error::{PlanError, Result};
pub use planners::coverage::{
    CoverageParameters, CoveragePlanner, EntryLocation, ScanPattern, SurveyStats,
};
pub use planners::grid_search::{AStarPlanner, GridSearchConfig, Heuristic};
pub use planners::sampling::{RrtPlanner, RrtStarPlanner, SamplingConfig};
pub use planners::{CancelToken, Path};
pub use settings::Settings;
pub use transform::{CoordinateTransformer, RotatedFrame, EARTH_RADIUS_M};
