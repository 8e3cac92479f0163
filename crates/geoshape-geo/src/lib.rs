//! GeoShape Geo - CRS-aware geometries
//!
//! Wraps `geo` geometries with a coordinate reference system and provides
//! CRS assignment and PROJ-backed reprojection.

pub mod factory;
pub mod models;
pub mod shape;
pub mod transform;

// Re-export key types for convenience
pub use factory::{from_geometry, AnyGeoShape, GeometryInput};
pub use models::{GeometryKind, LinearRing, ShapeGeometry};
pub use shape::{GeoLineString, GeoLinearRing, GeoPoint, GeoPolygon, GeoShape};
pub use transform::{CoordinateTransform, ProjTransformer};

pub use geoshape_core::{Crs, CrsInput, GeoshapeError, OverridePolicy, Result};
