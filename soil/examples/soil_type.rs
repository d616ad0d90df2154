//! Query the most probable soil type at a point, and a bounding box summary.
//!
//! Run with: cargo run --example soil_type

use soil::query::{Location, SoilTypeQuery};
use soil::{BoundingBox, SoilClient, SoilError};

fn main() -> Result<(), SoilError> {
    let client = SoilClient::from_env()?;
    let location = Location::new(60.1, 9.58);

    let response = client.soil_type(&SoilTypeQuery::new(location))?;
    println!("Most probable soil type: {}", response.most_probable());

    // Top 3 with probabilities; print the runner-up
    let response = client.soil_type(&SoilTypeQuery::new(location).top_k(3))?;
    if let Some(p) = response.probabilities().get(1) {
        println!("Soil type: {}, Probability: {}", p.soil_type, p.probability);
    }

    let bbox = BoundingBox::new(60.1, 9.5, 60.12, 9.6);
    let summary = client.soil_type_summary(&bbox)?;
    for s in summary.summaries().iter().take(2) {
        println!("Soil type: {}, Count: {}", s.soil_type, s.count);
    }

    Ok(())
}
