use anyhow::{Context, Result};
use soil::query::{Location, PropertyValueQuery};
use soil::{Depth, PropertyValueResponse, SoilProperty};

use super::{print_json, ClientOptions};

pub fn run(
    options: &ClientOptions,
    lat: f64,
    lon: f64,
    depth: Depth,
    property: SoilProperty,
    json: bool,
) -> Result<()> {
    let client = options.connect()?;

    let query = PropertyValueQuery::new(Location::new(lat, lon), depth, property);
    let response = client
        .soil_property_value(&query)
        .with_context(|| format!("Failed to query {} at {}", property, depth))?;

    if json {
        return print_json(&response);
    }

    println!("{}", format_line(&response));
    Ok(())
}

fn format_line(response: &PropertyValueResponse) -> String {
    let p = &response.properties;
    format!("Soil property: {}, Value: {} {}", p.property, p.value, p.unit)
}
