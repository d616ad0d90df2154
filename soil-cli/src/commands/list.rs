use anyhow::Result;
use clap::ValueEnum;
use serde_json::{json, Value};
use soil::{Depth, SoilProperty, SoilType, ValueKind};

use super::print_json;

/// Catalogues `soil list` can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Catalog {
    Properties,
    Depths,
    Values,
    SoilTypes,
}

impl Catalog {
    const ALL: [Catalog; 4] = [
        Catalog::Properties,
        Catalog::Depths,
        Catalog::Values,
        Catalog::SoilTypes,
    ];

    fn key(self) -> &'static str {
        match self {
            Catalog::Properties => "properties",
            Catalog::Depths => "depths",
            Catalog::Values => "values",
            Catalog::SoilTypes => "soil_types",
        }
    }

    fn table(self) -> Vec<String> {
        match self {
            Catalog::Properties => properties_table(),
            Catalog::Depths => depths_table(),
            Catalog::Values => values_table(),
            Catalog::SoilTypes => soil_types_table(),
        }
    }

    fn to_json(self) -> Value {
        match self {
            Catalog::Properties => SoilProperty::ALL
                .iter()
                .map(|p| {
                    json!({
                        "code": p.code(),
                        "name": p.name(),
                        "mapped_unit": p.mapped_unit(),
                        "target_unit": p.target_unit(),
                        "conversion_factor": p.conversion_factor(),
                    })
                })
                .collect(),
            Catalog::Depths => Depth::ALL
                .iter()
                .map(|d| {
                    json!({
                        "label": d.label(),
                        "top_depth": d.top(),
                        "bottom_depth": d.bottom(),
                        "unit_depth": d.unit(),
                    })
                })
                .collect(),
            Catalog::Values => ValueKind::ALL
                .iter()
                .map(|v| json!({"name": v.as_str(), "description": v.description()}))
                .collect(),
            Catalog::SoilTypes => SoilType::GROUPS
                .iter()
                .enumerate()
                .map(|(class, t)| json!({"class": class, "name": t.as_str()}))
                .collect(),
        }
    }
}

pub fn run(catalog: Option<Catalog>, json: bool) -> Result<()> {
    let selected: Vec<Catalog> = match catalog {
        Some(c) => vec![c],
        None => Catalog::ALL.to_vec(),
    };

    if json {
        let output: serde_json::Map<String, Value> = selected
            .iter()
            .map(|c| (c.key().to_string(), c.to_json()))
            .collect();
        return print_json(&output);
    }

    for (i, c) in selected.iter().enumerate() {
        if i > 0 {
            println!();
        }
        for line in c.table() {
            println!("{}", line);
        }
    }
    Ok(())
}

fn properties_table() -> Vec<String> {
    let mut lines = vec![
        format!(
            "{:<10} {:<36} {:<12} {:<12} {:>6}",
            "CODE", "NAME", "MAPPED", "TARGET", "FACTOR"
        ),
        "-".repeat(80),
    ];
    lines.extend(SoilProperty::ALL.iter().map(|p| {
        format!(
            "{:<10} {:<36} {:<12} {:<12} {:>6}",
            p.code(),
            p.name(),
            p.mapped_unit(),
            p.target_unit(),
            p.conversion_factor()
        )
    }));
    lines
}

fn depths_table() -> Vec<String> {
    let mut lines = vec![
        format!("{:<12} {:>6} {:>8} {:>6}", "LABEL", "TOP", "BOTTOM", "UNIT"),
        "-".repeat(35),
    ];
    lines.extend(Depth::ALL.iter().map(|d| {
        format!(
            "{:<12} {:>6} {:>8} {:>6}",
            d.label(),
            d.top(),
            d.bottom(),
            d.unit()
        )
    }));
    lines
}

fn values_table() -> Vec<String> {
    let mut lines = vec![
        format!("{:<12} {}", "VALUE", "DESCRIPTION"),
        "-".repeat(60),
    ];
    lines.extend(
        ValueKind::ALL
            .iter()
            .map(|v| format!("{:<12} {}", v.as_str(), v.description())),
    );
    lines
}

fn soil_types_table() -> Vec<String> {
    let mut lines = vec![format!("{:>5}  {}", "CLASS", "SOIL TYPE"), "-".repeat(24)];
    lines.extend(
        SoilType::GROUPS
            .iter()
            .enumerate()
            .map(|(class, t)| format!("{:>5}  {}", class, t)),
    );
    lines
}
