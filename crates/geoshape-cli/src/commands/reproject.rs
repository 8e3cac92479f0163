//! Reproject command implementation

use super::{print_shapes, shape_output};
use crate::cli::ReprojectArgs;
use crate::geometry_io::parse_wkt;
use crate::output::OutputWriter;
use crate::output_types::ShapesOutput;
use anyhow::{Context, Result};
use geoshape_core::config::LayeredConfig;
use geoshape_core::Crs;
use geoshape_geo::{from_geometry, ProjTransformer};

pub fn execute(args: ReprojectArgs, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let target = Crs::from_user_input(&args.to)?;
    let source = match &args.from {
        Some(from) => Some(Crs::from_user_input(from)?),
        None => config.default_crs()?,
    };

    // One transformer for the whole batch
    let transformer = match &source {
        Some(source) => Some(ProjTransformer::new(source, &target)?),
        None => {
            output.warning(format!(
                "No source CRS given; geometries are tagged with {} without transforming",
                target
            ));
            None
        }
    };

    let mut shapes = Vec::with_capacity(args.geometries.len());
    for text in &args.geometries {
        let geometry = parse_wkt(text)?;
        let shape = from_geometry(geometry, source.clone())
            .with_context(|| format!("Cannot wrap '{}'", text))?;

        let projected = match &transformer {
            Some(transformer) => shape.reproject_with(&target, transformer),
            None => shape.reproject(&target),
        }
        .with_context(|| format!("Failed to reproject '{}'", text))?;

        shapes.push(shape_output(&projected, config.precision.value));
    }

    tracing::debug!(count = shapes.len(), target = %target, "Reprojected geometries");

    if output.is_json() {
        output.result(ShapesOutput {
            source_crs: source.map(|crs| crs.to_string()),
            target_crs: target.to_string(),
            shapes,
        })?;
    } else {
        print_shapes(&shapes, output);
    }

    Ok(())
}
