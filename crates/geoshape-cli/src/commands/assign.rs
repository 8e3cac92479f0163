//! Assign command implementation

use super::{print_shapes, shape_output};
use crate::cli::AssignArgs;
use crate::geometry_io::parse_wkt;
use crate::output::OutputWriter;
use crate::output_types::ShapesOutput;
use anyhow::{Context, Result};
use geoshape_core::config::LayeredConfig;
use geoshape_core::Crs;
use geoshape_geo::from_geometry;

pub fn execute(args: AssignArgs, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let target = Crs::from_user_input(&args.crs)?;
    let existing = match &args.from {
        Some(from) => Some(Crs::from_user_input(from)?),
        None => config.default_crs()?,
    };
    let policy = config.override_policy.value;

    let mut shapes = Vec::with_capacity(args.geometries.len());
    for text in &args.geometries {
        let geometry = parse_wkt(text)?;
        let mut shape = from_geometry(geometry, existing.clone())
            .with_context(|| format!("Cannot wrap '{}'", text))?;
        shape.assign_crs_in_place(&target, policy)?;
        shapes.push(shape_output(&shape, config.precision.value));
    }

    if output.is_json() {
        output.result(ShapesOutput {
            source_crs: existing.map(|crs| crs.to_string()),
            target_crs: target.to_string(),
            shapes,
        })?;
    } else {
        print_shapes(&shapes, output);
    }

    Ok(())
}
