//! Serializable output structures for JSON mode

use geoshape_core::config::ConfigSource;
use serde::Serialize;
use tabled::Tabled;

/// Output for the inspect command
#[derive(Debug, Serialize)]
pub struct InspectOutput {
    pub input: String,
    pub definition: String,
    pub kind: String,
    pub authority_code: Option<String>,
    pub epsg: Option<u32>,
    pub geographic_wgs84: bool,
}

/// A geometry tagged with its CRS
#[derive(Debug, Serialize)]
pub struct ShapeOutput {
    pub kind: String,
    pub crs: Option<String>,
    pub wkt: String,
}

/// Output for assign and reproject
#[derive(Debug, Serialize)]
pub struct ShapesOutput {
    pub source_crs: Option<String>,
    pub target_crs: String,
    pub shapes: Vec<ShapeOutput>,
}

/// A single configuration entry
#[derive(Debug, Serialize, Tabled)]
pub struct ConfigEntry {
    #[tabled(rename = "Key")]
    pub key: String,
    #[tabled(rename = "Value")]
    pub value: String,
    #[tabled(rename = "Source")]
    #[tabled(display_with = "display_source")]
    pub source: ConfigSource,
}

fn display_source(source: &ConfigSource) -> String {
    format!("{:?}", source)
}
