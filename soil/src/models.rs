//! Response bodies returned by the soil API.
//!
//! Soil responses are GeoJSON-style `Feature` objects: a `geometry` echoing the
//! queried point (or bounding box polygon) and a `properties` object holding
//! the payload. Health probes return small flat objects.
//!
//! Fields the service omits when empty (`probabilities`, individual
//! statistics) are modelled as `Option` so missing and null decode the same.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::catalog::{Depth, SoilProperty, SoilType, ValueKind};
use crate::query::Location;

fn feature_type() -> String {
    "Feature".to_string()
}

/// Point geometry, coordinates in `[longitude, latitude]` order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointGeometry {
    #[serde(rename = "type")]
    pub kind: String,
    pub coordinates: [f64; 2],
}

impl PointGeometry {
    pub fn location(&self) -> Location {
        Location::new(self.coordinates[1], self.coordinates[0])
    }
}

/// Polygon geometry: a list of closed rings of `[longitude, latitude]` positions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolygonGeometry {
    #[serde(rename = "type")]
    pub kind: String,
    pub coordinates: Vec<Vec<[f64; 2]>>,
}

// ---------------------------------------------------------------------------
// Property queries
// ---------------------------------------------------------------------------

/// Response to a layered property query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoilPropertyResponse {
    #[serde(rename = "type", default = "feature_type")]
    pub kind: String,
    pub geometry: PointGeometry,
    pub properties: SoilLayerList,
}

impl SoilPropertyResponse {
    pub fn layers(&self) -> &[SoilLayer] {
        &self.properties.layers
    }

    /// Layer for `property`, if it was part of the query.
    pub fn layer(&self, property: SoilProperty) -> Option<&SoilLayer> {
        self.properties.layers.iter().find(|l| l.code == property)
    }

    /// Shorthand for `layer(property)?.depth(depth)?.values.get(kind)`.
    pub fn value(&self, property: SoilProperty, depth: Depth, kind: ValueKind) -> Option<f64> {
        self.layer(property)?.depth(depth)?.values.get(kind)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoilLayerList {
    pub layers: Vec<SoilLayer>,
}

/// All requested depths for one property.
///
/// Older deployments send a flat `unit` string instead of `unit_measure`;
/// the missing fields are then filled in from the catalogue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawSoilLayer")]
pub struct SoilLayer {
    pub code: SoilProperty,
    pub name: String,
    pub unit_measure: UnitMeasure,
    pub depths: Vec<SoilDepth>,
}

#[derive(Deserialize)]
struct RawSoilLayer {
    code: SoilProperty,
    name: String,
    #[serde(default)]
    unit_measure: Option<UnitMeasure>,
    #[serde(default)]
    unit: Option<String>,
    depths: Vec<SoilDepth>,
}

impl From<RawSoilLayer> for SoilLayer {
    fn from(raw: RawSoilLayer) -> Self {
        let code = raw.code;
        let unit_measure = match (raw.unit_measure, raw.unit) {
            (Some(measure), _) => measure,
            (None, unit) => UnitMeasure::for_property(code, unit),
        };
        SoilLayer {
            code,
            name: raw.name,
            unit_measure,
            depths: raw.depths,
        }
    }
}

impl SoilLayer {
    pub fn depth(&self, depth: Depth) -> Option<&SoilDepth> {
        self.depths.iter().find(|d| d.label == depth)
    }

    /// Statistic at `depth` converted from mapped to target units.
    pub fn converted(&self, depth: Depth, kind: ValueKind) -> Option<f64> {
        let raw = self.depth(depth)?.values.get(kind)?;
        self.unit_measure.convert(raw)
    }
}

/// Units a layer's values are expressed in, and how to convert them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitMeasure {
    /// Divisor from mapped units to target units.
    pub d_factor: u32,
    pub mapped_units: String,
    pub target_units: String,
    #[serde(default)]
    pub uncertainty_unit: String,
}

impl UnitMeasure {
    /// Catalogue units for `property`, with `mapped_units` overridden when given.
    pub fn for_property(property: SoilProperty, mapped_units: Option<String>) -> Self {
        UnitMeasure {
            d_factor: property.conversion_factor(),
            mapped_units: mapped_units.unwrap_or_else(|| property.mapped_unit().to_string()),
            target_units: property.target_unit().to_string(),
            uncertainty_unit: String::new(),
        }
    }

    /// Convert a raw value in mapped units to target units.
    ///
    /// Returns `None` if the conversion factor is zero.
    pub fn convert(&self, raw: f64) -> Option<f64> {
        if self.d_factor == 0 {
            None
        } else {
            Some(raw / f64::from(self.d_factor))
        }
    }
}

/// Statistics for one property at one depth interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoilDepth {
    pub range: DepthRange,
    pub label: Depth,
    pub values: DepthValues,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepthRange {
    pub top_depth: u32,
    pub bottom_depth: u32,
    pub unit_depth: String,
}

/// Requested statistics; any the service had no data for are `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DepthValues {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean: Option<f64>,
    #[serde(rename = "Q0.05", alias = "Q0_05", skip_serializing_if = "Option::is_none")]
    pub q0_05: Option<f64>,
    #[serde(rename = "Q0.5", alias = "Q0_5", skip_serializing_if = "Option::is_none")]
    pub q0_5: Option<f64>,
    #[serde(rename = "Q0.95", alias = "Q0_95", skip_serializing_if = "Option::is_none")]
    pub q0_95: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uncertainty: Option<f64>,
}

impl DepthValues {
    pub fn get(&self, kind: ValueKind) -> Option<f64> {
        match kind {
            ValueKind::Mean => self.mean,
            ValueKind::Q05 => self.q0_05,
            ValueKind::Median => self.q0_5,
            ValueKind::Q95 => self.q0_95,
            ValueKind::Uncertainty => self.uncertainty,
        }
    }

    /// Present statistics in [`ValueKind::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (ValueKind, f64)> + '_ {
        ValueKind::ALL
            .into_iter()
            .filter_map(move |kind| self.get(kind).map(|v| (kind, v)))
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }
}

/// Response to the single-value property query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyValueResponse {
    #[serde(rename = "type", default = "feature_type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<PointGeometry>,
    pub properties: PropertyValue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyValue {
    pub value: Measurement,
    pub unit: String,
    /// Human-readable property name (e.g. "Soil organic carbon").
    pub property: String,
}

/// A scalar that is numeric when data exists and a message string otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Measurement {
    Number(f64),
    Text(String),
}

impl Measurement {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Measurement::Number(v) => Some(*v),
            Measurement::Text(_) => None,
        }
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Measurement::Number(v) => write!(f, "{}", v),
            Measurement::Text(s) => f.write_str(s),
        }
    }
}

// ---------------------------------------------------------------------------
// Soil type queries
// ---------------------------------------------------------------------------

/// Response to a soil-type-at-point query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoilTypeResponse {
    #[serde(rename = "type", default = "feature_type")]
    pub kind: String,
    pub geometry: PointGeometry,
    pub properties: SoilTypeInfo,
}

impl SoilTypeResponse {
    pub fn most_probable(&self) -> SoilType {
        self.properties.most_probable_soil_type
    }

    /// Probabilities in descending order; empty unless `top_k` was requested.
    pub fn probabilities(&self) -> &[SoilTypeProbability] {
        self.properties.probabilities.as_deref().unwrap_or(&[])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoilTypeInfo {
    /// Older deployments call this field `soil_type`.
    #[serde(alias = "soil_type")]
    pub most_probable_soil_type: SoilType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub probabilities: Option<Vec<SoilTypeProbability>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoilTypeProbability {
    pub soil_type: SoilType,
    /// Percentage, 0 to 100.
    pub probability: u32,
}

/// Response to a bounding box summary query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoilTypeSummaryResponse {
    #[serde(rename = "type", default = "feature_type")]
    pub kind: String,
    pub geometry: PolygonGeometry,
    pub properties: SoilTypeSummaryInfo,
}

impl SoilTypeSummaryResponse {
    pub fn summaries(&self) -> &[SoilTypeSummary] {
        &self.properties.summaries
    }

    /// Total number of raster cells counted.
    pub fn total_count(&self) -> u64 {
        self.properties.summaries.iter().map(|s| s.count).sum()
    }

    /// Soil type with the most occurrences; first one wins on ties.
    pub fn dominant(&self) -> Option<&SoilTypeSummary> {
        self.properties
            .summaries
            .iter()
            .reduce(|best, s| if s.count > best.count { s } else { best })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoilTypeSummaryInfo {
    pub summaries: Vec<SoilTypeSummary>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoilTypeSummary {
    pub soil_type: SoilType,
    pub count: u64,
}

// ---------------------------------------------------------------------------
// Health probes
// ---------------------------------------------------------------------------

/// Liveness probe body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Liveness {
    pub message: String,
}

/// Readiness probe body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Readiness {
    pub status: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub results: Vec<CheckResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<f64>,
}

impl Readiness {
    pub fn is_ready(&self) -> bool {
        matches!(
            self.status.to_ascii_lowercase().as_str(),
            "success" | "ok" | "ready"
        )
    }

    /// Checks that did not pass.
    pub fn failed_checks(&self) -> impl Iterator<Item = &CheckResult> {
        self.results.iter().filter(|r| !r.passed)
    }
}

/// One dependency check reported by the readiness probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    #[serde(default)]
    pub checker: String,
    #[serde(default)]
    pub output: String,
    #[serde(default)]
    pub passed: bool,
}
