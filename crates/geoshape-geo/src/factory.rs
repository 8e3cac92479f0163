//! Build CRS-aware shapes from arbitrary geometry values.

use crate::models::{geometry_type_name, GeometryKind, LinearRing, ShapeGeometry};
use crate::shape::{GeoLineString, GeoLinearRing, GeoPoint, GeoPolygon, GeoShape};
use crate::transform::CoordinateTransform;
use geo::{Geometry, LineString, Point, Polygon};
use geoshape_core::crs::{Crs, CrsInput};
use geoshape_core::error::{GeoshapeError, Result};
use geoshape_core::models::OverridePolicy;

/// A CRS-aware shape of any supported variant
#[derive(Debug, Clone, PartialEq)]
pub enum AnyGeoShape {
    Point(GeoPoint),
    LineString(GeoLineString),
    LinearRing(GeoLinearRing),
    Polygon(GeoPolygon),
}

macro_rules! each_variant {
    ($value:expr, $shape:ident => $body:expr) => {
        match $value {
            AnyGeoShape::Point($shape) => $body,
            AnyGeoShape::LineString($shape) => $body,
            AnyGeoShape::LinearRing($shape) => $body,
            AnyGeoShape::Polygon($shape) => $body,
        }
    };
}

macro_rules! each_variant_rewrap {
    ($value:expr, $shape:ident => $body:expr) => {
        match $value {
            AnyGeoShape::Point($shape) => $body.map(AnyGeoShape::Point),
            AnyGeoShape::LineString($shape) => $body.map(AnyGeoShape::LineString),
            AnyGeoShape::LinearRing($shape) => $body.map(AnyGeoShape::LinearRing),
            AnyGeoShape::Polygon($shape) => $body.map(AnyGeoShape::Polygon),
        }
    };
}

impl AnyGeoShape {
    pub fn kind(&self) -> GeometryKind {
        each_variant!(self, shape => shape.kind())
    }

    pub fn crs(&self) -> Option<&Crs> {
        each_variant!(self, shape => shape.crs())
    }

    /// Plain `geo` geometry; rings become line strings
    pub fn to_geometry(&self) -> Geometry<f64> {
        each_variant!(self, shape => shape.geometry().to_geometry())
    }

    pub fn assign_crs(&self, crs: impl Into<CrsInput>, policy: OverridePolicy) -> Result<Self> {
        let crs = crs.into();
        each_variant_rewrap!(self, shape => shape.assign_crs(crs, policy))
    }

    pub fn assign_crs_in_place(
        &mut self,
        crs: impl Into<CrsInput>,
        policy: OverridePolicy,
    ) -> Result<&mut Self> {
        let crs = crs.into();
        each_variant!(&mut *self, shape => { shape.assign_crs_in_place(crs, policy)?; });
        Ok(self)
    }

    pub fn reproject(&self, target: impl Into<CrsInput>) -> Result<Self> {
        let target = target.into();
        each_variant_rewrap!(self, shape => shape.reproject(target))
    }

    pub fn reproject_with(
        &self,
        target: impl Into<CrsInput>,
        transformer: &dyn CoordinateTransform,
    ) -> Result<Self> {
        let target = target.into();
        each_variant_rewrap!(self, shape => shape.reproject_with(target, transformer))
    }

    pub fn as_point(&self) -> Option<&GeoPoint> {
        match self {
            AnyGeoShape::Point(shape) => Some(shape),
            _ => None,
        }
    }

    pub fn as_line_string(&self) -> Option<&GeoLineString> {
        match self {
            AnyGeoShape::LineString(shape) => Some(shape),
            _ => None,
        }
    }

    pub fn as_linear_ring(&self) -> Option<&GeoLinearRing> {
        match self {
            AnyGeoShape::LinearRing(shape) => Some(shape),
            _ => None,
        }
    }

    pub fn as_polygon(&self) -> Option<&GeoPolygon> {
        match self {
            AnyGeoShape::Polygon(shape) => Some(shape),
            _ => None,
        }
    }
}

impl<G: ShapeGeometry> From<GeoShape<G>> for AnyGeoShape {
    fn from(shape: GeoShape<G>) -> Self {
        G::into_any(shape)
    }
}

impl From<&AnyGeoShape> for CrsInput {
    fn from(shape: &AnyGeoShape) -> Self {
        CrsInput::Shape(shape.crs().cloned())
    }
}

/// Anything [`from_geometry`] accepts
#[derive(Debug, Clone, PartialEq)]
pub enum GeometryInput {
    /// A plain `geo` geometry
    Geometry(Geometry<f64>),
    /// A plain ring, which `geo::Geometry` cannot represent
    LinearRing(LinearRing),
    /// An already CRS-aware shape
    Shape(AnyGeoShape),
}

impl From<Geometry<f64>> for GeometryInput {
    fn from(geometry: Geometry<f64>) -> Self {
        GeometryInput::Geometry(geometry)
    }
}

impl From<Point<f64>> for GeometryInput {
    fn from(point: Point<f64>) -> Self {
        GeometryInput::Geometry(Geometry::Point(point))
    }
}

impl From<LineString<f64>> for GeometryInput {
    fn from(line: LineString<f64>) -> Self {
        GeometryInput::Geometry(Geometry::LineString(line))
    }
}

impl From<Polygon<f64>> for GeometryInput {
    fn from(polygon: Polygon<f64>) -> Self {
        GeometryInput::Geometry(Geometry::Polygon(polygon))
    }
}

impl From<LinearRing> for GeometryInput {
    fn from(ring: LinearRing) -> Self {
        GeometryInput::LinearRing(ring)
    }
}

impl From<AnyGeoShape> for GeometryInput {
    fn from(shape: AnyGeoShape) -> Self {
        GeometryInput::Shape(shape)
    }
}

impl<G: ShapeGeometry> From<GeoShape<G>> for GeometryInput {
    fn from(shape: GeoShape<G>) -> Self {
        GeometryInput::Shape(shape.into())
    }
}

/// Wrap a geometry in its CRS-aware equivalent, e.g. `Point` -> `GeoPoint`.
///
/// A shape that is already CRS-aware is copied: if it has a CRS it is
/// reprojected to `crs` (an absent `crs` keeps it as is), otherwise `crs` is
/// assigned. Variants without a CRS-aware equivalent (`Multi*`,
/// `GeometryCollection`, `Line`, `Rect`, `Triangle`) fail with
/// [`GeoshapeError::UnsupportedGeometry`].
pub fn from_geometry(
    input: impl Into<GeometryInput>,
    crs: impl Into<CrsInput>,
) -> Result<AnyGeoShape> {
    let crs = crs.into();

    match input.into() {
        GeometryInput::Shape(shape) => {
            if shape.crs().is_some() {
                match crs.resolve()? {
                    Some(target) => shape.reproject(target),
                    None => Ok(shape),
                }
            } else {
                shape.assign_crs(crs, OverridePolicy::Reject)
            }
        }
        GeometryInput::LinearRing(ring) => GeoLinearRing::new(ring, crs).map(AnyGeoShape::from),
        GeometryInput::Geometry(Geometry::Point(point)) => {
            GeoPoint::new(point, crs).map(AnyGeoShape::from)
        }
        GeometryInput::Geometry(Geometry::LineString(line)) => {
            GeoLineString::new(line, crs).map(AnyGeoShape::from)
        }
        GeometryInput::Geometry(Geometry::Polygon(polygon)) => {
            GeoPolygon::new(polygon, crs).map(AnyGeoShape::from)
        }
        GeometryInput::Geometry(other) => Err(GeoshapeError::UnsupportedGeometry {
            kind: geometry_type_name(&other).to_string(),
        }),
    }
}
