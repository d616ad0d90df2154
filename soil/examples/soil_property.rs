//! Query layered soil property values at a point.
//!
//! Run with: cargo run --example soil_property
//!
//! Set `SOIL_API_URL` to target a different deployment.

use soil::query::{Location, PropertyQuery};
use soil::{Depth, SoilClient, SoilError, SoilProperty, ValueKind};

fn main() -> Result<(), SoilError> {
    let client = SoilClient::from_env()?;
    let location = Location::new(60.1, 9.58);

    // Mean bulk density in the top layer
    let query = PropertyQuery::new(location)
        .depth(Depth::D0To5)
        .property(SoilProperty::Bdod)
        .value(ValueKind::Mean);
    let response = client.soil_properties(&query)?;

    let bdod = &response.layers()[0];
    let depth = &bdod.depths[0];
    if let Some(value) = depth.values.get(ValueKind::Mean) {
        println!(
            "Soil property: {}, Depth: {}, Value: {} {}",
            bdod.name, depth.label, value, bdod.unit_measure.mapped_units
        );
    }

    // Mean and 5th percentile for two properties at two depths
    let query = PropertyQuery::new(location)
        .depths([Depth::D0To5, Depth::D100To200])
        .properties([SoilProperty::Bdod, SoilProperty::Phh2o])
        .values([ValueKind::Mean, ValueKind::Q05]);
    let response = client.soil_properties(&query)?;

    let phh2o = &response.layers()[1];
    let depth = &phh2o.depths[1];
    if let Some(value) = depth.values.get(ValueKind::Q05) {
        println!(
            "Soil property: {}, Depth: {}, Value: {} {}",
            phh2o.name, depth.label, value, phh2o.unit_measure.mapped_units
        );
    }

    // Same value in conventional units
    if let Some(ph) = phh2o.converted(Depth::D100To200, ValueKind::Q05) {
        println!("  = {} {}", ph, phh2o.unit_measure.target_units);
    }

    Ok(())
}
