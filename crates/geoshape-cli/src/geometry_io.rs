//! WKT reading and writing

use anyhow::{anyhow, Result};
use geo::{Coord, Geometry, MapCoords};
use wkt::{ToWkt, TryFromWkt};

pub fn parse_wkt(text: &str) -> Result<Geometry<f64>> {
    Geometry::<f64>::try_from_wkt_str(text).map_err(|e| anyhow!("Invalid WKT '{}': {}", text, e))
}

/// WKT with coordinates rounded to `precision` decimal places
pub fn format_wkt(geometry: &Geometry<f64>, precision: usize) -> String {
    let factor = 10f64.powi(precision as i32);
    let round = |v: f64| {
        let rounded = (v * factor).round() / factor;
        // Avoid printing -0
        if rounded == 0.0 {
            0.0
        } else {
            rounded
        }
    };

    geometry.map_coords(|c| Coord { x: round(c.x), y: round(c.y) }).wkt_string()
}
