//! Error types for GeoShape

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeoshapeError {
    // CRS errors
    #[error("Invalid CRS '{input}': {reason}")]
    InvalidCrs { input: String, reason: String },

    #[error(
        "Geometry already has CRS {current} which does not match {requested}. \
         Use an override policy to replace it without transforming, or reproject instead"
    )]
    CrsConflict { current: String, requested: String },

    #[error(
        "Transformer converts {found_source} -> {found_target}, \
         but this operation needs {expected_source} -> {expected_target}"
    )]
    IncompatibleTransformer {
        expected_source: String,
        expected_target: String,
        found_source: String,
        found_target: String,
    },

    #[error("Projection failed: {reason}")]
    Transform { reason: String },

    // Geometry errors
    #[error("No CRS-aware equivalent exists for geometry of type {kind}")]
    UnsupportedGeometry { kind: String },

    // Configuration errors
    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl GeoshapeError {
    pub fn invalid_crs(input: impl Into<String>, reason: impl Into<String>) -> Self {
        GeoshapeError::InvalidCrs { input: input.into(), reason: reason.into() }
    }
}

pub type Result<T> = std::result::Result<T, GeoshapeError>;
