use anyhow::Result;
use serde_json::json;
use soil::{SoilProperty, ValueKind};

use super::print_json;

pub fn run(property: SoilProperty, json: bool) -> Result<()> {
    if json {
        let depths: Vec<&str> = property.depths().iter().map(|d| d.label()).collect();
        let values: Vec<&str> = ValueKind::ALL.iter().map(|v| v.as_str()).collect();
        return print_json(&json!({
            "code": property.code(),
            "name": property.name(),
            "mapped_unit": property.mapped_unit(),
            "target_unit": property.target_unit(),
            "conversion_factor": property.conversion_factor(),
            "depths": depths,
            "values": values,
        }));
    }

    for line in describe(property) {
        println!("{}", line);
    }
    Ok(())
}

fn describe(property: SoilProperty) -> Vec<String> {
    let depths: Vec<&str> = property.depths().iter().map(|d| d.label()).collect();

    vec![
        format!("Property: {}", property.code()),
        format!("Name: {}", property.name()),
        String::new(),
        format!("Mapped unit: {}", property.mapped_unit()),
        format!("Target unit: {}", property.target_unit()),
        format!(
            "Conversion: divide by {} ({} -> {})",
            property.conversion_factor(),
            property.mapped_unit(),
            property.target_unit()
        ),
        String::new(),
        format!("Depths: {}", depths.join(", ")),
    ]
}
