//! Inspect command implementation

use crate::cli::InspectArgs;
use crate::output::OutputWriter;
use crate::output_types::InspectOutput;
use anyhow::Result;
use geoshape_core::{Crs, CrsDefinition};

pub fn execute(args: InspectArgs, output: &OutputWriter) -> Result<()> {
    let crs = Crs::from_user_input(&args.crs)?;

    let inspection = InspectOutput {
        input: args.crs,
        definition: crs.to_string(),
        kind: kind_name(crs.kind()).to_string(),
        authority_code: crs.authority_code(),
        epsg: crs.epsg(),
        geographic_wgs84: crs.is_geographic_wgs84(),
    };

    if output.is_json() {
        output.result(inspection)?;
    } else {
        output.section("CRS");
        output.kv("Definition", &inspection.definition);
        output.kv("Notation", &inspection.kind);
        if let Some(code) = &inspection.authority_code {
            output.kv("Authority code", code);
        }
        output.kv("WGS 84 lon/lat", if inspection.geographic_wgs84 { "yes" } else { "no" });
    }

    Ok(())
}

fn kind_name(definition: &CrsDefinition) -> &'static str {
    match definition {
        CrsDefinition::Authority { .. } => "authority",
        CrsDefinition::ProjString(_) => "proj-string",
        CrsDefinition::Wkt(_) => "wkt",
        CrsDefinition::ProjJson(_) => "projjson",
        CrsDefinition::Name(_) => "name",
    }
}
