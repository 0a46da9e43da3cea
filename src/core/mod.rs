//! Fundamental value types: points and bounding boxes.

mod bounds;
mod point;

pub use bounds::{Bounds, GeoBounds};
pub use point::{GeoPoint, LocalPoint};
