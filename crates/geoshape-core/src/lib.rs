//! GeoShape Core - CRS values, errors, and configuration
//!
//! This crate contains the coordinate reference system model and the shared
//! error and configuration types for the GeoShape crates.

pub mod config;
pub mod crs;
pub mod error;
pub mod models;

pub use crs::{Crs, CrsDefinition, CrsInput};
pub use error::{GeoshapeError, Result};
pub use models::OverridePolicy;
