//! Catalogue of the parameters the soil API understands.
//!
//! SoilGrids publishes eleven properties at six standard depth intervals
//! (plus the `0-30cm` interval used only by organic carbon stocks), each with
//! a set of statistics. Values are stored as scaled integers in *mapped units*;
//! dividing by the conversion factor yields the conventional *target unit*.
//!
//! | Code | Mapped unit | Target unit | Factor |
//! |------|-------------|-------------|--------|
//! | bdod | cg/cm³ | kg/dm³ | 100 |
//! | cec | mmol(c)/kg | cmol(c)/kg | 10 |
//! | cfvo | cm³/dm³ | cm³/100cm³ | 10 |
//! | clay | g/kg | % | 10 |
//! | nitrogen | cg/kg | g/kg | 100 |
//! | ocd | hg/m³ | hg/m³ | 10 |
//! | ocs | t/ha | kg/m² | 10 |
//! | phh2o | pH*10 | pH | 10 |
//! | sand | g/kg | % | 10 |
//! | silt | g/kg | % | 10 |
//! | soc | dg/kg | g/kg | 10 |

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SoilError;

/// A soil property published by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SoilProperty {
    Bdod,
    Cec,
    Cfvo,
    Clay,
    Nitrogen,
    Ocd,
    Ocs,
    Phh2o,
    Sand,
    Silt,
    Soc,
}

impl SoilProperty {
    /// Every property, in the order the service documents them.
    pub const ALL: [SoilProperty; 11] = [
        SoilProperty::Bdod,
        SoilProperty::Cec,
        SoilProperty::Cfvo,
        SoilProperty::Clay,
        SoilProperty::Nitrogen,
        SoilProperty::Ocd,
        SoilProperty::Ocs,
        SoilProperty::Phh2o,
        SoilProperty::Sand,
        SoilProperty::Silt,
        SoilProperty::Soc,
    ];

    /// Short code used in query strings (e.g. `"bdod"`).
    pub fn code(self) -> &'static str {
        match self {
            SoilProperty::Bdod => "bdod",
            SoilProperty::Cec => "cec",
            SoilProperty::Cfvo => "cfvo",
            SoilProperty::Clay => "clay",
            SoilProperty::Nitrogen => "nitrogen",
            SoilProperty::Ocd => "ocd",
            SoilProperty::Ocs => "ocs",
            SoilProperty::Phh2o => "phh2o",
            SoilProperty::Sand => "sand",
            SoilProperty::Silt => "silt",
            SoilProperty::Soc => "soc",
        }
    }

    /// Human-readable name as returned in responses.
    pub fn name(self) -> &'static str {
        match self {
            SoilProperty::Bdod => "Bulk density",
            SoilProperty::Cec => "Cation exchange capacity (CEC pH 7)",
            SoilProperty::Cfvo => "Coarse fragments",
            SoilProperty::Clay => "Clay",
            SoilProperty::Nitrogen => "Nitrogen",
            SoilProperty::Ocd => "Organic carbon density",
            SoilProperty::Ocs => "Organic carbon stocks",
            SoilProperty::Phh2o => "pH water",
            SoilProperty::Sand => "Sand",
            SoilProperty::Silt => "Silt",
            SoilProperty::Soc => "Soil organic carbon",
        }
    }

    /// Unit the raw integer values are published in.
    pub fn mapped_unit(self) -> &'static str {
        match self {
            SoilProperty::Bdod => "cg/cm³",
            SoilProperty::Cec => "mmol(c)/kg",
            SoilProperty::Cfvo => "cm³/dm³",
            SoilProperty::Clay | SoilProperty::Sand | SoilProperty::Silt => "g/kg",
            SoilProperty::Nitrogen => "cg/kg",
            SoilProperty::Ocd => "hg/m³",
            SoilProperty::Ocs => "t/ha",
            SoilProperty::Phh2o => "pH*10",
            SoilProperty::Soc => "dg/kg",
        }
    }

    /// Conventional unit after dividing by [`Self::conversion_factor`].
    pub fn target_unit(self) -> &'static str {
        match self {
            SoilProperty::Bdod => "kg/dm³",
            SoilProperty::Cec => "cmol(c)/kg",
            SoilProperty::Cfvo => "cm³/100cm³",
            SoilProperty::Clay | SoilProperty::Sand | SoilProperty::Silt => "%",
            SoilProperty::Nitrogen | SoilProperty::Soc => "g/kg",
            SoilProperty::Ocd => "hg/m³",
            SoilProperty::Ocs => "kg/m²",
            SoilProperty::Phh2o => "pH",
        }
    }

    /// Divisor between mapped and target units.
    pub fn conversion_factor(self) -> u32 {
        match self {
            SoilProperty::Bdod | SoilProperty::Nitrogen => 100,
            _ => 10,
        }
    }

    /// Depth intervals at which this property is published.
    pub fn depths(self) -> &'static [Depth] {
        match self {
            SoilProperty::Ocs => &[Depth::D0To30],
            _ => &Depth::STANDARD,
        }
    }

    /// Whether the service publishes this property at `depth`.
    pub fn is_published_at(self, depth: Depth) -> bool {
        self.depths().contains(&depth)
    }
}

impl fmt::Display for SoilProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for SoilProperty {
    type Err = SoilError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        SoilProperty::ALL
            .into_iter()
            .find(|p| p.code() == lower)
            .ok_or_else(|| {
                SoilError::invalid(
                    "property",
                    format!(
                        "unknown property '{}', expected one of: {}",
                        s,
                        join_codes(SoilProperty::ALL.iter().map(|p| p.code()))
                    ),
                )
            })
    }
}

/// A depth interval below the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Depth {
    #[serde(rename = "0-5cm")]
    D0To5,
    #[serde(rename = "5-15cm")]
    D5To15,
    #[serde(rename = "15-30cm")]
    D15To30,
    #[serde(rename = "30-60cm")]
    D30To60,
    #[serde(rename = "60-100cm")]
    D60To100,
    #[serde(rename = "100-200cm")]
    D100To200,
    #[serde(rename = "0-30cm")]
    D0To30,
}

impl Depth {
    /// All intervals, standard layers first.
    pub const ALL: [Depth; 7] = [
        Depth::D0To5,
        Depth::D5To15,
        Depth::D15To30,
        Depth::D30To60,
        Depth::D60To100,
        Depth::D100To200,
        Depth::D0To30,
    ];

    /// The six stacked layers every property except `ocs` is published at.
    pub const STANDARD: [Depth; 6] = [
        Depth::D0To5,
        Depth::D5To15,
        Depth::D15To30,
        Depth::D30To60,
        Depth::D60To100,
        Depth::D100To200,
    ];

    /// Wire label (e.g. `"0-5cm"`).
    pub fn label(self) -> &'static str {
        match self {
            Depth::D0To5 => "0-5cm",
            Depth::D5To15 => "5-15cm",
            Depth::D15To30 => "15-30cm",
            Depth::D30To60 => "30-60cm",
            Depth::D60To100 => "60-100cm",
            Depth::D100To200 => "100-200cm",
            Depth::D0To30 => "0-30cm",
        }
    }

    /// Top of the interval in centimetres.
    pub fn top(self) -> u32 {
        match self {
            Depth::D0To5 | Depth::D0To30 => 0,
            Depth::D5To15 => 5,
            Depth::D15To30 => 15,
            Depth::D30To60 => 30,
            Depth::D60To100 => 60,
            Depth::D100To200 => 100,
        }
    }

    /// Bottom of the interval in centimetres.
    pub fn bottom(self) -> u32 {
        match self {
            Depth::D0To5 => 5,
            Depth::D5To15 => 15,
            Depth::D15To30 | Depth::D0To30 => 30,
            Depth::D30To60 => 60,
            Depth::D60To100 => 100,
            Depth::D100To200 => 200,
        }
    }

    /// Unit of [`Self::top`] and [`Self::bottom`].
    pub fn unit(self) -> &'static str {
        "cm"
    }
}

impl fmt::Display for Depth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Depth {
    type Err = SoilError;

    /// Accepts both `"0-5cm"` and the older unit-less `"0-5"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().to_lowercase();
        let label = if trimmed.ends_with("cm") {
            trimmed
        } else {
            format!("{}cm", trimmed)
        };
        Depth::ALL
            .into_iter()
            .find(|d| d.label() == label)
            .ok_or_else(|| {
                SoilError::invalid(
                    "depth",
                    format!(
                        "unknown depth '{}', expected one of: {}",
                        s,
                        join_codes(Depth::ALL.iter().map(|d| d.label()))
                    ),
                )
            })
    }
}

/// A statistic reported for each property and depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueKind {
    #[serde(rename = "mean")]
    Mean,
    #[serde(rename = "Q0.05", alias = "Q0_05")]
    Q05,
    #[serde(rename = "Q0.5", alias = "Q0_5")]
    Median,
    #[serde(rename = "Q0.95", alias = "Q0_95")]
    Q95,
    #[serde(rename = "uncertainty")]
    Uncertainty,
}

impl ValueKind {
    pub const ALL: [ValueKind; 5] = [
        ValueKind::Mean,
        ValueKind::Q05,
        ValueKind::Median,
        ValueKind::Q95,
        ValueKind::Uncertainty,
    ];

    /// Wire name (e.g. `"Q0.05"`).
    pub fn as_str(self) -> &'static str {
        match self {
            ValueKind::Mean => "mean",
            ValueKind::Q05 => "Q0.05",
            ValueKind::Median => "Q0.5",
            ValueKind::Q95 => "Q0.95",
            ValueKind::Uncertainty => "uncertainty",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            ValueKind::Mean => "Mean value",
            ValueKind::Q05 => "5th percentile",
            ValueKind::Median => "Median (50th percentile)",
            ValueKind::Q95 => "95th percentile",
            ValueKind::Uncertainty => "Uncertainty (90% prediction interval / median)",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValueKind {
    type Err = SoilError;

    /// Accepts `Q0.05` as well as `Q0_05`; the quantile prefix is case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().replace('_', ".").to_lowercase();
        ValueKind::ALL
            .into_iter()
            .find(|v| v.as_str().to_lowercase() == normalized)
            .ok_or_else(|| {
                SoilError::invalid(
                    "values",
                    format!(
                        "unknown value kind '{}', expected one of: {}",
                        s,
                        join_codes(ValueKind::ALL.iter().map(|v| v.as_str()))
                    ),
                )
            })
    }
}

/// WRB reference soil group reported by the soil type endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoilType {
    Acrisols,
    Albeluvisols,
    Alisols,
    Andosols,
    Arenosols,
    Calcisols,
    Cambisols,
    Chernozems,
    Cryosols,
    Durisols,
    Ferralsols,
    Fluvisols,
    Gleysols,
    Gypsisols,
    Histosols,
    Kastanozems,
    Leptosols,
    Lixisols,
    Luvisols,
    Nitisols,
    Phaeozems,
    Planosols,
    Plinthosols,
    Podzols,
    Regosols,
    Solonchaks,
    Solonetz,
    Stagnosols,
    Umbrisols,
    Vertisols,
    #[serde(
        rename = "No information available",
        alias = "No information available."
    )]
    NoInformation,
}

impl SoilType {
    /// The 30 reference groups, indexed by their raster class value.
    pub const GROUPS: [SoilType; 30] = [
        SoilType::Acrisols,
        SoilType::Albeluvisols,
        SoilType::Alisols,
        SoilType::Andosols,
        SoilType::Arenosols,
        SoilType::Calcisols,
        SoilType::Cambisols,
        SoilType::Chernozems,
        SoilType::Cryosols,
        SoilType::Durisols,
        SoilType::Ferralsols,
        SoilType::Fluvisols,
        SoilType::Gleysols,
        SoilType::Gypsisols,
        SoilType::Histosols,
        SoilType::Kastanozems,
        SoilType::Leptosols,
        SoilType::Lixisols,
        SoilType::Luvisols,
        SoilType::Nitisols,
        SoilType::Phaeozems,
        SoilType::Planosols,
        SoilType::Plinthosols,
        SoilType::Podzols,
        SoilType::Regosols,
        SoilType::Solonchaks,
        SoilType::Solonetz,
        SoilType::Stagnosols,
        SoilType::Umbrisols,
        SoilType::Vertisols,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SoilType::Acrisols => "Acrisols",
            SoilType::Albeluvisols => "Albeluvisols",
            SoilType::Alisols => "Alisols",
            SoilType::Andosols => "Andosols",
            SoilType::Arenosols => "Arenosols",
            SoilType::Calcisols => "Calcisols",
            SoilType::Cambisols => "Cambisols",
            SoilType::Chernozems => "Chernozems",
            SoilType::Cryosols => "Cryosols",
            SoilType::Durisols => "Durisols",
            SoilType::Ferralsols => "Ferralsols",
            SoilType::Fluvisols => "Fluvisols",
            SoilType::Gleysols => "Gleysols",
            SoilType::Gypsisols => "Gypsisols",
            SoilType::Histosols => "Histosols",
            SoilType::Kastanozems => "Kastanozems",
            SoilType::Leptosols => "Leptosols",
            SoilType::Lixisols => "Lixisols",
            SoilType::Luvisols => "Luvisols",
            SoilType::Nitisols => "Nitisols",
            SoilType::Phaeozems => "Phaeozems",
            SoilType::Planosols => "Planosols",
            SoilType::Plinthosols => "Plinthosols",
            SoilType::Podzols => "Podzols",
            SoilType::Regosols => "Regosols",
            SoilType::Solonchaks => "Solonchaks",
            SoilType::Solonetz => "Solonetz",
            SoilType::Stagnosols => "Stagnosols",
            SoilType::Umbrisols => "Umbrisols",
            SoilType::Vertisols => "Vertisols",
            SoilType::NoInformation => "No information available",
        }
    }

    pub fn is_known(self) -> bool {
        self != SoilType::NoInformation
    }
}

impl fmt::Display for SoilType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SoilType {
    type Err = SoilError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_end_matches('.');
        SoilType::GROUPS
            .into_iter()
            .chain(std::iter::once(SoilType::NoInformation))
            .find(|t| t.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| SoilError::invalid("soil_type", format!("unknown soil type '{}'", s)))
    }
}

fn join_codes<'a>(codes: impl Iterator<Item = &'a str>) -> String {
    codes.collect::<Vec<_>>().join(", ")
}
