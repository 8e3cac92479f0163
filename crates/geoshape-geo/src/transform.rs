//! CRS transformation

use crate::models::ShapeGeometry;
use geo::Coord;
use geoshape_core::crs::Crs;
use geoshape_core::error::{GeoshapeError, Result};
use proj::Proj;
use std::fmt;

/// A reusable source -> target coordinate mapping
///
/// Building one is the expensive step of a reprojection, so callers
/// converting many geometries to the same CRS should build it once and pass
/// it to [`GeoShape::reproject_with`](crate::GeoShape::reproject_with).
pub trait CoordinateTransform {
    fn source(&self) -> &Crs;

    fn target(&self) -> &Crs;

    fn transform_coord(&self, coord: Coord<f64>) -> Result<Coord<f64>>;
}

/// PROJ-backed transformer
///
/// Uses traditional GIS axis order: x is longitude/easting, y is latitude/northing.
pub struct ProjTransformer {
    source: Crs,
    target: Crs,
    proj: Proj,
}

impl ProjTransformer {
    pub fn new(source: &Crs, target: &Crs) -> Result<Self> {
        tracing::debug!(source = %source, target = %target, "Building coordinate transformer");

        let proj = Proj::new_known_crs(&source.definition(), &target.definition(), None)
            .map_err(|e| GeoshapeError::Transform {
                reason: format!(
                    "Failed to create projection from {} to {}: {}",
                    source, target, e
                ),
            })?;

        Ok(Self { source: source.clone(), target: target.clone(), proj })
    }

    /// Transformer for the opposite direction
    pub fn inverse(&self) -> Result<Self> {
        Self::new(&self.target, &self.source)
    }
}

impl fmt::Debug for ProjTransformer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProjTransformer")
            .field("source", &self.source)
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}

impl CoordinateTransform for ProjTransformer {
    fn source(&self) -> &Crs {
        &self.source
    }

    fn target(&self) -> &Crs {
        &self.target
    }

    fn transform_coord(&self, coord: Coord<f64>) -> Result<Coord<f64>> {
        let (x, y) = self.proj.convert((coord.x, coord.y)).map_err(|e| {
            GeoshapeError::Transform {
                reason: format!("({}, {}) from {}: {}", coord.x, coord.y, self.source, e),
            }
        })?;

        // PROJ reports some out-of-domain inputs as infinities instead of errors
        if !x.is_finite() || !y.is_finite() {
            return Err(GeoshapeError::Transform {
                reason: format!(
                    "({}, {}) is outside the domain of {} -> {}",
                    coord.x, coord.y, self.source, self.target
                ),
            });
        }

        Ok(Coord { x, y })
    }
}

/// Check that a transformer maps `source` to `target`
pub fn check_compatible(
    transformer: &dyn CoordinateTransform,
    source: &Crs,
    target: &Crs,
) -> Result<()> {
    if transformer.source() != source || transformer.target() != target {
        return Err(GeoshapeError::IncompatibleTransformer {
            expected_source: source.to_string(),
            expected_target: target.to_string(),
            found_source: transformer.source().to_string(),
            found_target: transformer.target().to_string(),
        });
    }
    Ok(())
}

/// Apply a transformer to every vertex of a geometry payload
pub fn transform_geometry<G: ShapeGeometry>(
    geometry: &G,
    transformer: &dyn CoordinateTransform,
) -> Result<G> {
    geometry.try_map_vertices(|coord| transformer.transform_coord(coord))
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{line_string, Point};

    #[test]
    fn test_wgs84_to_web_mercator() {
        let wgs84 = Crs::from_epsg(4326).unwrap();
        let mercator = Crs::from_epsg(3857).unwrap();
        let transformer = ProjTransformer::new(&wgs84, &mercator).unwrap();

        let projected = transformer.transform_coord(Coord { x: 0.0, y: 0.0 }).unwrap();
        assert!(projected.x.abs() < 1e-6);
        assert!(projected.y.abs() < 1e-6);

        let projected = transformer.transform_coord(Coord { x: 180.0, y: 0.0 }).unwrap();
        assert!((projected.x - 20_037_508.342_789_244).abs() < 1e-3);
    }

    #[test]
    fn test_inverse_round_trip() {
        let wgs84 = Crs::from_epsg(4326).unwrap();
        let utm = Crs::from_epsg(32633).unwrap();
        let forward = ProjTransformer::new(&wgs84, &utm).unwrap();
        let inverse = forward.inverse().unwrap();

        assert_eq!(inverse.source(), &utm);
        assert_eq!(inverse.target(), &wgs84);

        let original = Coord { x: 15.0, y: 52.0 };
        let back = inverse.transform_coord(forward.transform_coord(original).unwrap()).unwrap();
        assert!((back.x - original.x).abs() < 1e-7);
        assert!((back.y - original.y).abs() < 1e-7);
    }

    #[test]
    fn test_check_compatible() {
        let wgs84 = Crs::from_epsg(4326).unwrap();
        let mercator = Crs::from_epsg(3857).unwrap();
        let transformer = ProjTransformer::new(&wgs84, &mercator).unwrap();

        assert!(check_compatible(&transformer, &wgs84, &mercator).is_ok());

        let err = check_compatible(&transformer, &mercator, &wgs84).unwrap_err();
        assert!(matches!(err, GeoshapeError::IncompatibleTransformer { .. }));
    }

    #[test]
    fn test_transform_geometry_maps_every_vertex() {
        let wgs84 = Crs::from_epsg(4326).unwrap();
        let mercator = Crs::from_epsg(3857).unwrap();
        let transformer = ProjTransformer::new(&wgs84, &mercator).unwrap();

        let line = line_string![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0), (x: 1.0, y: 1.0)];
        let projected = transform_geometry(&line, &transformer).unwrap();

        assert_eq!(projected.0.len(), 3);
        assert!(projected.0[1].x > 100_000.0);
        assert!(projected.0[2].y > 100_000.0);

        let point = transform_geometry(&Point::new(0.0, 0.0), &transformer).unwrap();
        assert!(point.x().abs() < 1e-6);
    }
}
