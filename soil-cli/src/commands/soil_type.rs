use anyhow::{Context, Result};
use soil::query::{Location, SoilTypeQuery};
use soil::SoilTypeResponse;

use super::{print_json, ClientOptions};

pub fn run(
    options: &ClientOptions,
    lat: f64,
    lon: f64,
    top_k: Option<u32>,
    json: bool,
) -> Result<()> {
    let client = options.connect()?;

    let mut query = SoilTypeQuery::new(Location::new(lat, lon));
    if let Some(k) = top_k {
        query = query.top_k(k);
    }

    let response = client
        .soil_type(&query)
        .context("Failed to query soil type")?;

    if json {
        return print_json(&response);
    }

    for line in format_lines(&response) {
        println!("{}", line);
    }
    Ok(())
}

fn format_lines(response: &SoilTypeResponse) -> Vec<String> {
    let mut lines = vec![format!(
        "Most probable soil type: {}",
        response.most_probable()
    )];
    lines.extend(
        response
            .probabilities()
            .iter()
            .map(|p| format!("Soil type: {}, Probability: {}", p.soil_type, p.probability)),
    );
    lines
}
