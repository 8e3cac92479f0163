//! Command implementations

mod assign;
mod config;
mod inspect;
mod reproject;

use crate::cli::{Cli, Commands};
use crate::config_loader::load_config;
use crate::geometry_io::format_wkt;
use crate::output::OutputWriter;
use crate::output_types::ShapeOutput;
use anyhow::Result;
use geoshape_geo::AnyGeoShape;

/// Execute a CLI command
pub fn execute(cli: Cli) -> Result<()> {
    let output = OutputWriter::new(cli.json);
    let allow_override = matches!(&cli.command, Commands::Assign(args) if args.allow_override);
    let config = load_config(&cli, allow_override)?;

    match cli.command {
        Commands::Inspect(args) => inspect::execute(args, &output),
        Commands::Assign(args) => assign::execute(args, &config, &output),
        Commands::Reproject(args) => reproject::execute(args, &config, &output),
        Commands::Config => config::execute(&config, &output),
    }
}

fn shape_output(shape: &AnyGeoShape, precision: usize) -> ShapeOutput {
    ShapeOutput {
        kind: shape.kind().to_string(),
        crs: shape.crs().map(ToString::to_string),
        wkt: format_wkt(&shape.to_geometry(), precision),
    }
}

fn print_shapes(shapes: &[ShapeOutput], output: &OutputWriter) {
    for shape in shapes {
        output.shape(&shape.wkt, shape.crs.as_deref());
    }
}
