//! Geometry payloads that can carry a CRS.
//!
//! The payload types come from the `geo` crate, except [`LinearRing`], which
//! `geo` models as a plain `LineString`.

use crate::factory::AnyGeoShape;
use crate::shape::GeoShape;
use geo::{Coord, CoordsIter, Geometry, LineString, MapCoords, Point, Polygon};
use std::fmt;

/// Supported geometry variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeometryKind {
    Point,
    LineString,
    LinearRing,
    Polygon,
}

impl GeometryKind {
    pub fn name(&self) -> &'static str {
        match self {
            GeometryKind::Point => "Point",
            GeometryKind::LineString => "LineString",
            GeometryKind::LinearRing => "LinearRing",
            GeometryKind::Polygon => "Polygon",
        }
    }
}

impl fmt::Display for GeometryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Type name of any `geo` geometry, used in error messages
pub fn geometry_type_name(geometry: &Geometry<f64>) -> &'static str {
    match geometry {
        Geometry::Point(_) => "Point",
        Geometry::Line(_) => "Line",
        Geometry::LineString(_) => "LineString",
        Geometry::Polygon(_) => "Polygon",
        Geometry::MultiPoint(_) => "MultiPoint",
        Geometry::MultiLineString(_) => "MultiLineString",
        Geometry::MultiPolygon(_) => "MultiPolygon",
        Geometry::GeometryCollection(_) => "GeometryCollection",
        Geometry::Rect(_) => "Rect",
        Geometry::Triangle(_) => "Triangle",
    }
}

/// A closed line string
///
/// Construction closes the ring if the first and last coordinates differ.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearRing(LineString<f64>);

impl LinearRing {
    pub fn new(line: impl Into<LineString<f64>>) -> Self {
        let mut line = line.into();
        line.close();
        Self(line)
    }

    pub fn line_string(&self) -> &LineString<f64> {
        &self.0
    }

    pub fn into_line_string(self) -> LineString<f64> {
        self.0
    }

    /// Polygon whose exterior is this ring
    pub fn to_polygon(&self) -> Polygon<f64> {
        Polygon::new(self.0.clone(), vec![])
    }
}

impl From<LineString<f64>> for LinearRing {
    fn from(line: LineString<f64>) -> Self {
        Self::new(line)
    }
}

impl<C: Into<Coord<f64>>> From<Vec<C>> for LinearRing {
    fn from(coords: Vec<C>) -> Self {
        Self::new(LineString::from(coords))
    }
}

/// Geometry payload of a [`GeoShape`]
///
/// Implemented for the four supported variants. CRS handling lives once on
/// `GeoShape<G>`; this trait only exposes what that handling needs from the
/// payload.
pub trait ShapeGeometry: Clone + PartialEq + fmt::Debug + Send + Sync + 'static {
    const KIND: GeometryKind;

    /// Apply `func` to every vertex, producing a new payload
    fn try_map_vertices<E>(
        &self,
        func: impl Fn(Coord<f64>) -> Result<Coord<f64>, E> + Copy,
    ) -> Result<Self, E>;

    /// All vertices in order
    fn vertices(&self) -> Box<dyn Iterator<Item = Coord<f64>> + '_>;

    /// Plain `geo` geometry
    fn to_geometry(&self) -> Geometry<f64>;

    fn into_any(shape: GeoShape<Self>) -> AnyGeoShape;
}

impl ShapeGeometry for Point<f64> {
    const KIND: GeometryKind = GeometryKind::Point;

    fn try_map_vertices<E>(
        &self,
        func: impl Fn(Coord<f64>) -> Result<Coord<f64>, E> + Copy,
    ) -> Result<Self, E> {
        self.try_map_coords(func)
    }

    fn vertices(&self) -> Box<dyn Iterator<Item = Coord<f64>> + '_> {
        Box::new(self.coords_iter())
    }

    fn to_geometry(&self) -> Geometry<f64> {
        Geometry::Point(*self)
    }

    fn into_any(shape: GeoShape<Self>) -> AnyGeoShape {
        AnyGeoShape::Point(shape)
    }
}

impl ShapeGeometry for LineString<f64> {
    const KIND: GeometryKind = GeometryKind::LineString;

    fn try_map_vertices<E>(
        &self,
        func: impl Fn(Coord<f64>) -> Result<Coord<f64>, E> + Copy,
    ) -> Result<Self, E> {
        self.try_map_coords(func)
    }

    fn vertices(&self) -> Box<dyn Iterator<Item = Coord<f64>> + '_> {
        Box::new(self.coords_iter())
    }

    fn to_geometry(&self) -> Geometry<f64> {
        Geometry::LineString(self.clone())
    }

    fn into_any(shape: GeoShape<Self>) -> AnyGeoShape {
        AnyGeoShape::LineString(shape)
    }
}

impl ShapeGeometry for LinearRing {
    const KIND: GeometryKind = GeometryKind::LinearRing;

    fn try_map_vertices<E>(
        &self,
        func: impl Fn(Coord<f64>) -> Result<Coord<f64>, E> + Copy,
    ) -> Result<Self, E> {
        // Mapping a closed ring vertex-wise keeps it closed
        self.0.try_map_coords(func).map(LinearRing)
    }

    fn vertices(&self) -> Box<dyn Iterator<Item = Coord<f64>> + '_> {
        Box::new(self.0.coords_iter())
    }

    fn to_geometry(&self) -> Geometry<f64> {
        Geometry::LineString(self.0.clone())
    }

    fn into_any(shape: GeoShape<Self>) -> AnyGeoShape {
        AnyGeoShape::LinearRing(shape)
    }
}

impl ShapeGeometry for Polygon<f64> {
    const KIND: GeometryKind = GeometryKind::Polygon;

    fn try_map_vertices<E>(
        &self,
        func: impl Fn(Coord<f64>) -> Result<Coord<f64>, E> + Copy,
    ) -> Result<Self, E> {
        self.try_map_coords(func)
    }

    fn vertices(&self) -> Box<dyn Iterator<Item = Coord<f64>> + '_> {
        Box::new(self.coords_iter())
    }

    fn to_geometry(&self) -> Geometry<f64> {
        Geometry::Polygon(self.clone())
    }

    fn into_any(shape: GeoShape<Self>) -> AnyGeoShape {
        AnyGeoShape::Polygon(shape)
    }
}
