use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// GeoShape - CRS-aware geometry tool
#[derive(Parser, Debug)]
#[command(name = "geoshape")]
#[command(about = "Attach coordinate reference systems to geometries and reproject them", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Output results in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Configuration file (defaults to ./geoshape.toml when present)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// CRS of input geometries when a command is not told otherwise
    #[arg(long, global = true, value_name = "CRS")]
    pub default_crs: Option<String>,

    /// Decimal places for printed coordinates
    #[arg(long, global = true)]
    pub precision: Option<usize>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve a CRS definition and describe it
    Inspect(InspectArgs),

    /// Attach a CRS to geometries without transforming coordinates
    Assign(AssignArgs),

    /// Transform geometries into another CRS
    Reproject(ReprojectArgs),

    /// Show the effective configuration and where each value comes from
    Config,
}

#[derive(Parser, Debug)]
pub struct InspectArgs {
    /// CRS in any supported notation (EPSG:4326, 4326, a PROJ string, WKT, ...)
    pub crs: String,
}

#[derive(Parser, Debug)]
pub struct AssignArgs {
    /// CRS to attach
    #[arg(long)]
    pub crs: String,

    /// CRS the input geometries already have (defaults to the configured default_crs)
    #[arg(long)]
    pub from: Option<String>,

    /// Replace a differing existing CRS instead of failing
    #[arg(long)]
    pub allow_override: bool,

    /// Geometries as WKT
    #[arg(required = true, value_name = "WKT")]
    pub geometries: Vec<String>,
}

#[derive(Parser, Debug)]
pub struct ReprojectArgs {
    /// Source CRS (defaults to the configured default_crs)
    #[arg(long)]
    pub from: Option<String>,

    /// Target CRS
    #[arg(long)]
    pub to: String,

    /// Geometries as WKT
    #[arg(required = true, value_name = "WKT")]
    pub geometries: Vec<String>,
}
