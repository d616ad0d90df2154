use anyhow::{Context, Result};
use soil::query::{Location, PropertyQuery};
use soil::{Depth, SoilProperty, SoilPropertyResponse, ValueKind};

use super::{print_json, ClientOptions};

#[allow(clippy::too_many_arguments)]
pub fn run(
    options: &ClientOptions,
    lat: f64,
    lon: f64,
    depths: Vec<Depth>,
    properties: Vec<SoilProperty>,
    values: Vec<ValueKind>,
    convert: bool,
    json: bool,
) -> Result<()> {
    let client = options.connect()?;

    let query = PropertyQuery::new(Location::new(lat, lon))
        .depths(depths)
        .properties(properties)
        .values(values);

    let response = client
        .soil_properties(&query)
        .context("Failed to query soil properties")?;

    if json {
        return print_json(&response);
    }

    let show_kind = query.values.len() > 1;
    for line in format_lines(&response, convert, show_kind) {
        println!("{}", line);
    }
    Ok(())
}

/// One line per reported statistic; missing statistics are skipped.
fn format_lines(response: &SoilPropertyResponse, convert: bool, show_kind: bool) -> Vec<String> {
    let mut lines = Vec::new();
    for layer in response.layers() {
        let unit = if convert {
            &layer.unit_measure.target_units
        } else {
            &layer.unit_measure.mapped_units
        };

        for depth in &layer.depths {
            for (kind, raw) in depth.values.iter() {
                let value = if convert {
                    match layer.unit_measure.convert(raw) {
                        Some(v) => v,
                        None => continue,
                    }
                } else {
                    raw
                };

                let mut line = format!(
                    "Soil property: {}, Depth: {}, Value: {} {}",
                    layer.name, depth.label, value, unit
                );
                if show_kind {
                    line.push_str(&format!(" ({})", kind));
                }
                lines.push(line);
            }
        }
    }
    lines
}
