//! CRS-aware geometry wrapper.
//!
//! [`GeoShape`] composes an immutable geometry payload with an optional
//! [`Crs`]. The payload is shared between values that differ only in their
//! CRS, so metadata-only operations never copy coordinates.

use crate::models::{GeometryKind, LinearRing, ShapeGeometry};
use crate::transform::{check_compatible, transform_geometry, CoordinateTransform, ProjTransformer};
use geo::{Area, Coord, Euclidean, Length, LineString, Point, Polygon};
use geoshape_core::crs::{Crs, CrsInput};
use geoshape_core::error::{GeoshapeError, Result};
use geoshape_core::models::OverridePolicy;
use std::ops::Deref;
use std::sync::Arc;

/// A geometry tagged with an optional coordinate reference system
#[derive(Debug, Clone, PartialEq)]
pub struct GeoShape<G: ShapeGeometry> {
    geometry: Arc<G>,
    crs: Option<Crs>,
}

pub type GeoPoint = GeoShape<Point<f64>>;
pub type GeoLineString = GeoShape<LineString<f64>>;
pub type GeoLinearRing = GeoShape<LinearRing>;
pub type GeoPolygon = GeoShape<Polygon<f64>>;

impl<G: ShapeGeometry> GeoShape<G> {
    /// Build a shape from raw geometry data and any CRS-like input.
    ///
    /// The CRS is resolved before the payload is built. Coordinates are taken
    /// as given, never transformed. Geometries are 2D: a Z ordinate has no
    /// place in the `geo` payload types and cannot be passed.
    ///
    /// ```
    /// use geoshape_geo::GeoPoint;
    ///
    /// let point = GeoPoint::new((-1.0, 1.0), "EPSG:4326")?;
    /// assert_eq!((point.x(), point.y()), (-1.0, 1.0));
    /// # Ok::<(), geoshape_geo::GeoshapeError>(())
    /// ```
    pub fn new(geometry: impl Into<G>, crs: impl Into<CrsInput>) -> Result<Self> {
        let crs = crs.into().resolve()?;
        Ok(Self::from_parts(geometry.into(), crs))
    }

    pub fn from_parts(geometry: G, crs: Option<Crs>) -> Self {
        Self { geometry: Arc::new(geometry), crs }
    }

    pub fn without_crs(geometry: impl Into<G>) -> Self {
        Self::from_parts(geometry.into(), None)
    }

    pub fn geometry(&self) -> &G {
        &self.geometry
    }

    pub fn into_geometry(self) -> G {
        Arc::unwrap_or_clone(self.geometry)
    }

    pub fn crs(&self) -> Option<&Crs> {
        self.crs.as_ref()
    }

    pub fn kind(&self) -> GeometryKind {
        G::KIND
    }

    pub fn coords(&self) -> impl Iterator<Item = Coord<f64>> + '_ {
        self.geometry.vertices()
    }

    /// Whether both values hold the very same payload allocation
    pub fn shares_geometry_with(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.geometry, &other.geometry)
    }

    /// Attach a CRS without touching coordinates, returning a new value.
    ///
    /// Fails with [`GeoshapeError::CrsConflict`] if a different CRS is already
    /// assigned and `policy` does not allow overriding it.
    pub fn assign_crs(&self, crs: impl Into<CrsInput>, policy: OverridePolicy) -> Result<Self> {
        let crs = self.checked_assignment(crs.into(), policy)?;
        Ok(Self { geometry: Arc::clone(&self.geometry), crs })
    }

    /// Like [`assign_crs`](Self::assign_crs), but overwrites this value's CRS.
    ///
    /// On error `self` is left untouched.
    pub fn assign_crs_in_place(
        &mut self,
        crs: impl Into<CrsInput>,
        policy: OverridePolicy,
    ) -> Result<&mut Self> {
        self.crs = self.checked_assignment(crs.into(), policy)?;
        Ok(self)
    }

    fn checked_assignment(&self, input: CrsInput, policy: OverridePolicy) -> Result<Option<Crs>> {
        let crs = input.resolve()?;
        if let Some(current) = &self.crs {
            if crs.as_ref() != Some(current) && !policy.allows_override() {
                return Err(GeoshapeError::CrsConflict {
                    current: current.to_string(),
                    requested: crs.map_or_else(|| "none".to_string(), |c| c.to_string()),
                });
            }
        }
        Ok(crs)
    }

    /// Transform coordinates into `target`, building a transformer on demand.
    ///
    /// A shape without a CRS has nothing to transform from; the target is
    /// simply assigned.
    pub fn reproject(&self, target: impl Into<CrsInput>) -> Result<Self> {
        self.reproject_using(target.into(), None)
    }

    /// Transform coordinates into `target` with a pre-built transformer.
    ///
    /// The transformer must map this shape's CRS to `target`, otherwise
    /// [`GeoshapeError::IncompatibleTransformer`] is returned.
    pub fn reproject_with(
        &self,
        target: impl Into<CrsInput>,
        transformer: &dyn CoordinateTransform,
    ) -> Result<Self> {
        self.reproject_using(target.into(), Some(transformer))
    }

    fn reproject_using(
        &self,
        target: CrsInput,
        transformer: Option<&dyn CoordinateTransform>,
    ) -> Result<Self> {
        let target = target.resolve()?;

        let Some(current) = &self.crs else {
            return self.assign_crs(target, OverridePolicy::Reject);
        };

        let target = target.ok_or_else(|| {
            GeoshapeError::invalid_crs(
                "none",
                format!("a target CRS is required to reproject from {}", current),
            )
        })?;

        if let Some(transformer) = transformer {
            check_compatible(transformer, current, &target)?;
        }

        if *current == target {
            tracing::debug!(crs = %current, "Source and target CRS match, skipping reprojection");
            return Ok(self.clone());
        }

        let geometry = match transformer {
            Some(transformer) => transform_geometry(self.geometry(), transformer)?,
            None => {
                let transformer = ProjTransformer::new(current, &target)?;
                transform_geometry(self.geometry(), &transformer)?
            }
        };

        Ok(Self::from_parts(geometry, Some(target)))
    }
}

impl<G: ShapeGeometry> Deref for GeoShape<G> {
    type Target = G;

    fn deref(&self) -> &G {
        &self.geometry
    }
}

impl<G: ShapeGeometry> From<&GeoShape<G>> for CrsInput {
    fn from(shape: &GeoShape<G>) -> Self {
        CrsInput::Shape(shape.crs.clone())
    }
}

impl GeoShape<LineString<f64>> {
    /// Planar length in CRS units
    pub fn length(&self) -> f64 {
        Euclidean.length(&*self.geometry)
    }
}

impl GeoShape<LinearRing> {
    /// Planar length in CRS units
    pub fn length(&self) -> f64 {
        Euclidean.length(self.geometry.line_string())
    }

    /// Unsigned planar area of the enclosed region
    pub fn area(&self) -> f64 {
        self.geometry.to_polygon().unsigned_area()
    }
}

impl GeoShape<Polygon<f64>> {
    /// Build a polygon from an exterior ring and interior rings
    pub fn from_rings(
        exterior: impl Into<LineString<f64>>,
        interiors: Vec<LineString<f64>>,
        crs: impl Into<CrsInput>,
    ) -> Result<Self> {
        Self::new(Polygon::new(exterior.into(), interiors), crs)
    }

    /// Unsigned planar area in squared CRS units
    pub fn area(&self) -> f64 {
        self.geometry.unsigned_area()
    }
}
