use anyhow::{Context, Result};
use soil::{BoundingBox, SoilTypeSummaryResponse};

use super::{print_json, ClientOptions};

pub fn run(
    options: &ClientOptions,
    min_lon: f64,
    max_lon: f64,
    min_lat: f64,
    max_lat: f64,
    json: bool,
) -> Result<()> {
    let client = options.connect()?;

    let bbox = BoundingBox::new(min_lat, min_lon, max_lat, max_lon);
    let response = client
        .soil_type_summary(&bbox)
        .context("Failed to query soil type summary")?;

    if json {
        return print_json(&response);
    }

    for line in format_lines(&response) {
        println!("{}", line);
    }
    Ok(())
}

fn format_lines(response: &SoilTypeSummaryResponse) -> Vec<String> {
    response
        .summaries()
        .iter()
        .map(|s| format!("Soil type: {}, Count: {}", s.soil_type, s.count))
        .collect()
}
