//! GeoJSON conversion of soil responses.
//!
//! Enable the `geojson` feature to use this module. Responses become
//! [`geojson::Feature`]s with flat properties, which is what GIS tools expect
//! when loading point data:
//!
//! | Response | Property keys |
//! |----------|---------------|
//! | soil type | `soil_type`, `probability_<type>` |
//! | property query | `<code>_<depth>_<value>`, e.g. `bdod_0-5cm_mean` |
//! | summary | `count_<type>`, `total_count` |
//!
//! # Example
//!
//! ```ignore
//! use soil::geojson::soil_type_feature;
//!
//! let response = client.soil_type(&query)?;
//! let feature = soil_type_feature(&response);
//! println!("{}", feature);
//! ```

use geojson::{Feature, GeoJson, Geometry, JsonObject, JsonValue, Value as GeoJsonValue};

use crate::models::{
    PointGeometry, PolygonGeometry, SoilPropertyResponse, SoilTypeResponse,
    SoilTypeSummaryResponse,
};
use crate::query::Location;

/// Flat properties for a soil type response.
pub fn soil_type_properties(response: &SoilTypeResponse) -> JsonObject {
    let mut properties = JsonObject::new();
    properties.insert(
        "soil_type".to_string(),
        JsonValue::from(response.most_probable().as_str()),
    );
    for p in response.probabilities() {
        properties.insert(
            format!("probability_{}", p.soil_type.as_str()),
            JsonValue::from(p.probability),
        );
    }
    properties
}

/// Flat properties for a layered property response, one key per statistic.
///
/// Values stay in mapped units, as returned by the service.
pub fn soil_property_properties(response: &SoilPropertyResponse) -> JsonObject {
    let mut properties = JsonObject::new();
    for layer in response.layers() {
        for depth in &layer.depths {
            for (kind, value) in depth.values.iter() {
                properties.insert(
                    format!(
                        "{}_{}_{}",
                        layer.code.code(),
                        depth.label.label(),
                        kind.as_str()
                    ),
                    JsonValue::from(value),
                );
            }
        }
    }
    properties
}

/// Flat properties for a bounding box summary.
pub fn summary_properties(response: &SoilTypeSummaryResponse) -> JsonObject {
    let mut properties = JsonObject::new();
    for s in response.summaries() {
        properties.insert(
            format!("count_{}", s.soil_type.as_str()),
            JsonValue::from(s.count),
        );
    }
    properties.insert(
        "total_count".to_string(),
        JsonValue::from(response.total_count()),
    );
    properties
}

pub fn soil_type_feature(response: &SoilTypeResponse) -> Feature {
    feature(point(&response.geometry), soil_type_properties(response))
}

pub fn soil_property_feature(response: &SoilPropertyResponse) -> Feature {
    feature(point(&response.geometry), soil_property_properties(response))
}

pub fn summary_feature(response: &SoilTypeSummaryResponse) -> Feature {
    feature(polygon(&response.geometry), summary_properties(response))
}

/// Collect point locations from a GeoJSON document, in document order.
///
/// Accepts a bare geometry, a feature, or a feature collection. Anything that
/// is not a `Point` with at least two coordinates is skipped.
pub fn locations_from_geojson(geojson: &GeoJson) -> Vec<Location> {
    match geojson {
        GeoJson::Geometry(geometry) => point_location(geometry).into_iter().collect(),
        GeoJson::Feature(feature) => feature
            .geometry
            .as_ref()
            .and_then(point_location)
            .into_iter()
            .collect(),
        GeoJson::FeatureCollection(fc) => fc
            .features
            .iter()
            .filter_map(|f| f.geometry.as_ref().and_then(point_location))
            .collect(),
    }
}

/// Location of a `Point` geometry (`[lon, lat, ...]`).
pub fn point_location(geometry: &Geometry) -> Option<Location> {
    match &geometry.value {
        GeoJsonValue::Point(coord) if coord.len() >= 2 => Some(Location::new(coord[1], coord[0])),
        _ => None,
    }
}

fn point(geometry: &PointGeometry) -> Geometry {
    Geometry::new(GeoJsonValue::Point(geometry.coordinates.to_vec()))
}

fn polygon(geometry: &PolygonGeometry) -> Geometry {
    let rings = geometry
        .coordinates
        .iter()
        .map(|ring| ring.iter().map(|pos| pos.to_vec()).collect())
        .collect();
    Geometry::new(GeoJsonValue::Polygon(rings))
}

fn feature(geometry: Geometry, properties: JsonObject) -> Feature {
    Feature {
        bbox: None,
        geometry: Some(geometry),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}
