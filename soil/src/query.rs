//! Typed query parameters for each soil API endpoint.
//!
//! Every request type implements [`Endpoint`], which ties together the
//! relative path, client-side validation, the ordered query string pairs, and
//! the response type the body deserialises into. Validation runs before any
//! network I/O so malformed requests never leave the process.
//!
//! # Example
//!
//! ```
//! use soil::query::{Endpoint, Location, PropertyQuery};
//! use soil::{Depth, SoilProperty, ValueKind};
//!
//! let query = PropertyQuery::new(Location::new(60.1, 9.58))
//!     .depth(Depth::D0To5)
//!     .property(SoilProperty::Bdod)
//!     .value(ValueKind::Mean);
//!
//! assert!(query.validate().is_ok());
//! assert_eq!(
//!     query.query_pairs(),
//!     vec![
//!         ("lon", "9.58".to_string()),
//!         ("lat", "60.1".to_string()),
//!         ("depths", "0-5cm".to_string()),
//!         ("properties", "bdod".to_string()),
//!         ("values", "mean".to_string()),
//!     ]
//! );
//! ```

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::catalog::{Depth, SoilProperty, SoilType, ValueKind};
use crate::error::{Result, SoilError};
use crate::models::{
    Liveness, PropertyValueResponse, Readiness, SoilPropertyResponse, SoilTypeResponse,
    SoilTypeSummaryResponse,
};

/// Southern edge of the region the service accepts.
pub const MIN_LAT: f64 = -90.0;
/// Northern edge of the region the service accepts.
pub const MAX_LAT: f64 = 90.0;
/// Western edge of the region the service accepts.
pub const MIN_LON: f64 = -180.0;
/// Eastern edge of the region the service accepts.
pub const MAX_LON: f64 = 180.0;

/// Largest `top_k` the service can honour: one probability per reference group.
pub const MAX_TOP_K: u32 = SoilType::GROUPS.len() as u32;

/// A request against one endpoint of the soil API.
pub trait Endpoint {
    /// Type the JSON body deserialises into.
    type Response: DeserializeOwned;

    /// Path relative to the configured base URL, without a leading slash.
    fn path(&self) -> &'static str;

    /// Reject parameters the service would refuse.
    fn validate(&self) -> Result<()>;

    /// Query string pairs in send order. List parameters repeat their key.
    fn query_pairs(&self) -> Vec<(&'static str, String)>;
}

/// A point in decimal degrees (WGS84).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lon: f64,
}

impl Location {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Check the point lies inside the service's region of interest.
    pub fn validate(&self) -> Result<()> {
        let inside = self.lat.is_finite()
            && self.lon.is_finite()
            && (MIN_LAT..=MAX_LAT).contains(&self.lat)
            && (MIN_LON..=MAX_LON).contains(&self.lon);
        if inside {
            Ok(())
        } else {
            Err(SoilError::OutOfRegion {
                lat: self.lat,
                lon: self.lon,
            })
        }
    }

    fn push_pairs(&self, pairs: &mut Vec<(&'static str, String)>) {
        pairs.push(("lon", self.lon.to_string()));
        pairs.push(("lat", self.lat.to_string()));
    }
}

/// A geographic bounding box.
///
/// Coordinates are in decimal degrees (WGS84).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Minimum latitude (southern boundary).
    pub min_lat: f64,
    /// Minimum longitude (western boundary).
    pub min_lon: f64,
    /// Maximum latitude (northern boundary).
    pub max_lat: f64,
    /// Maximum longitude (eastern boundary).
    pub max_lon: f64,
}

impl BoundingBox {
    /// Create a new bounding box.
    ///
    /// # Arguments
    ///
    /// * `min_lat` - Southern boundary latitude
    /// * `min_lon` - Western boundary longitude
    /// * `max_lat` - Northern boundary latitude
    /// * `max_lon` - Eastern boundary longitude
    pub fn new(min_lat: f64, min_lon: f64, max_lat: f64, max_lon: f64) -> Self {
        Self {
            min_lat,
            min_lon,
            max_lat,
            max_lon,
        }
    }

    /// Check corner ordering and that both corners are inside the region of interest.
    pub fn validate(&self) -> Result<()> {
        let finite = [self.min_lat, self.min_lon, self.max_lat, self.max_lon]
            .iter()
            .all(|v| v.is_finite());
        if !finite || self.min_lon > self.max_lon || self.min_lat > self.max_lat {
            return Err(SoilError::InvalidBoundingBox {
                min_lon: self.min_lon,
                max_lon: self.max_lon,
                min_lat: self.min_lat,
                max_lat: self.max_lat,
            });
        }
        Location::new(self.min_lat, self.min_lon).validate()?;
        Location::new(self.max_lat, self.max_lon).validate()
    }
}

/// Layered property query: any combination of properties, depths, and statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyQuery {
    pub location: Location,
    pub depths: Vec<Depth>,
    pub properties: Vec<SoilProperty>,
    pub values: Vec<ValueKind>,
}

impl PropertyQuery {
    pub fn new(location: Location) -> Self {
        Self {
            location,
            depths: Vec::new(),
            properties: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Add a depth interval. Duplicates are ignored.
    pub fn depth(mut self, depth: Depth) -> Self {
        push_unique(&mut self.depths, depth);
        self
    }

    pub fn depths(mut self, depths: impl IntoIterator<Item = Depth>) -> Self {
        for depth in depths {
            push_unique(&mut self.depths, depth);
        }
        self
    }

    /// Add a property. Duplicates are ignored.
    pub fn property(mut self, property: SoilProperty) -> Self {
        push_unique(&mut self.properties, property);
        self
    }

    pub fn properties(mut self, properties: impl IntoIterator<Item = SoilProperty>) -> Self {
        for property in properties {
            push_unique(&mut self.properties, property);
        }
        self
    }

    /// Add a statistic. Duplicates are ignored.
    pub fn value(mut self, value: ValueKind) -> Self {
        push_unique(&mut self.values, value);
        self
    }

    pub fn values(mut self, values: impl IntoIterator<Item = ValueKind>) -> Self {
        for value in values {
            push_unique(&mut self.values, value);
        }
        self
    }

    /// Property/depth combinations the service does not publish.
    ///
    /// These are not rejected (the service answers with empty value maps), but
    /// callers usually want to know about them.
    pub fn unpublished_pairs(&self) -> Vec<(SoilProperty, Depth)> {
        self.properties
            .iter()
            .flat_map(|&p| self.depths.iter().map(move |&d| (p, d)))
            .filter(|&(p, d)| !p.is_published_at(d))
            .collect()
    }
}

impl Endpoint for PropertyQuery {
    type Response = SoilPropertyResponse;

    fn path(&self) -> &'static str {
        "property"
    }

    fn validate(&self) -> Result<()> {
        self.location.validate()?;
        if self.depths.is_empty() {
            return Err(SoilError::invalid("depths", "at least one depth is required"));
        }
        if self.properties.is_empty() {
            return Err(SoilError::invalid(
                "properties",
                "at least one property is required",
            ));
        }
        if self.values.is_empty() {
            return Err(SoilError::invalid("values", "at least one value is required"));
        }
        Ok(())
    }

    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(
            2 + self.depths.len() + self.properties.len() + self.values.len(),
        );
        self.location.push_pairs(&mut pairs);
        pairs.extend(self.depths.iter().map(|d| ("depths", d.label().to_string())));
        pairs.extend(
            self.properties
                .iter()
                .map(|p| ("properties", p.code().to_string())),
        );
        pairs.extend(self.values.iter().map(|v| ("values", v.as_str().to_string())));
        pairs
    }
}

/// Single property at a single depth, answered with one scalar value.
///
/// This is the older query form; it uses the singular `depth` and `property`
/// parameter names.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PropertyValueQuery {
    pub location: Location,
    pub depth: Depth,
    pub property: SoilProperty,
}

impl PropertyValueQuery {
    pub fn new(location: Location, depth: Depth, property: SoilProperty) -> Self {
        Self {
            location,
            depth,
            property,
        }
    }
}

impl Endpoint for PropertyValueQuery {
    type Response = PropertyValueResponse;

    fn path(&self) -> &'static str {
        "property"
    }

    fn validate(&self) -> Result<()> {
        self.location.validate()
    }

    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(4);
        self.location.push_pairs(&mut pairs);
        pairs.push(("depth", self.depth.label().to_string()));
        pairs.push(("property", self.property.code().to_string()));
        pairs
    }
}

/// Most probable soil type at a point, optionally with the top-k probabilities.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoilTypeQuery {
    pub location: Location,
    pub top_k: Option<u32>,
}

impl SoilTypeQuery {
    pub fn new(location: Location) -> Self {
        Self {
            location,
            top_k: None,
        }
    }

    /// Also return the `top_k` most probable soil types (0 to 30).
    pub fn top_k(mut self, top_k: u32) -> Self {
        self.top_k = Some(top_k);
        self
    }
}

impl Endpoint for SoilTypeQuery {
    type Response = SoilTypeResponse;

    fn path(&self) -> &'static str {
        "type"
    }

    fn validate(&self) -> Result<()> {
        self.location.validate()?;
        match self.top_k {
            Some(k) if k > MAX_TOP_K => Err(SoilError::invalid(
                "top_k",
                format!("must be between 0 and {}, got {}", MAX_TOP_K, k),
            )),
            _ => Ok(()),
        }
    }

    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(3);
        self.location.push_pairs(&mut pairs);
        if let Some(k) = self.top_k {
            pairs.push(("top_k", k.to_string()));
        }
        pairs
    }
}

/// Soil type occurrence counts within a bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoilTypeSummaryQuery {
    pub bbox: BoundingBox,
}

impl SoilTypeSummaryQuery {
    pub fn new(bbox: BoundingBox) -> Self {
        Self { bbox }
    }
}

impl Endpoint for SoilTypeSummaryQuery {
    type Response = SoilTypeSummaryResponse;

    fn path(&self) -> &'static str {
        "type/summary"
    }

    fn validate(&self) -> Result<()> {
        self.bbox.validate()
    }

    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("min_lon", self.bbox.min_lon.to_string()),
            ("max_lon", self.bbox.max_lon.to_string()),
            ("min_lat", self.bbox.min_lat.to_string()),
            ("max_lat", self.bbox.max_lat.to_string()),
        ]
    }
}

/// Liveness probe.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LivenessQuery;

impl Endpoint for LivenessQuery {
    type Response = Liveness;

    fn path(&self) -> &'static str {
        "health"
    }

    fn validate(&self) -> Result<()> {
        Ok(())
    }

    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        Vec::new()
    }
}

/// Readiness probe; reports whether the upstream data source is reachable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadinessQuery;

impl Endpoint for ReadinessQuery {
    type Response = Readiness;

    fn path(&self) -> &'static str {
        "ready"
    }

    fn validate(&self) -> Result<()> {
        Ok(())
    }

    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        Vec::new()
    }
}

fn push_unique<T: PartialEq>(items: &mut Vec<T>, item: T) {
    if !items.contains(&item) {
        items.push(item);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(list: &[(&'static str, &str)]) -> Vec<(&'static str, String)> {
        list.iter().map(|(k, v)| (*k, v.to_string())).collect()
    }

    #[test]
    fn test_location_validation() {
        assert!(Location::new(60.1, 9.58).validate().is_ok());
        assert!(Location::new(90.0, 180.0).validate().is_ok());
        assert!(Location::new(-90.0, -180.0).validate().is_ok());

        assert!(matches!(
            Location::new(90.5, 0.0).validate(),
            Err(SoilError::OutOfRegion { .. })
        ));
        assert!(Location::new(0.0, -180.1).validate().is_err());
        assert!(Location::new(f64::NAN, 0.0).validate().is_err());
    }

    #[test]
    fn test_single_property_query_pairs() {
        let query = PropertyQuery::new(Location::new(60.1, 9.58))
            .depth(Depth::D0To5)
            .property(SoilProperty::Bdod)
            .value(ValueKind::Mean);

        assert_eq!(query.path(), "property");
        assert!(query.validate().is_ok());
        assert_eq!(
            query.query_pairs(),
            pairs(&[
                ("lon", "9.58"),
                ("lat", "60.1"),
                ("depths", "0-5cm"),
                ("properties", "bdod"),
                ("values", "mean"),
            ])
        );
    }

    #[test]
    fn test_multi_property_query_repeats_keys() {
        let query = PropertyQuery::new(Location::new(60.1, 9.58))
            .depths([Depth::D0To5, Depth::D100To200])
            .properties([SoilProperty::Bdod, SoilProperty::Phh2o])
            .values([ValueKind::Mean, ValueKind::Q05]);

        assert_eq!(
            query.query_pairs(),
            pairs(&[
                ("lon", "9.58"),
                ("lat", "60.1"),
                ("depths", "0-5cm"),
                ("depths", "100-200cm"),
                ("properties", "bdod"),
                ("properties", "phh2o"),
                ("values", "mean"),
                ("values", "Q0.05"),
            ])
        );
    }

    #[test]
    fn test_property_query_dedups_in_order() {
        let query = PropertyQuery::new(Location::new(0.0, 0.0))
            .depths([Depth::D5To15, Depth::D0To5, Depth::D5To15])
            .property(SoilProperty::Clay)
            .property(SoilProperty::Clay);
        assert_eq!(query.depths, vec![Depth::D5To15, Depth::D0To5]);
        assert_eq!(query.properties, vec![SoilProperty::Clay]);
    }

    #[test]
    fn test_property_query_requires_lists() {
        let base = PropertyQuery::new(Location::new(60.1, 9.58));
        let err = base.clone().validate().unwrap_err();
        assert!(err.to_string().contains("depths"));

        let err = base.clone().depth(Depth::D0To5).validate().unwrap_err();
        assert!(err.to_string().contains("properties"));

        let err = base
            .depth(Depth::D0To5)
            .property(SoilProperty::Soc)
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("values"));
    }

    #[test]
    fn test_unpublished_pairs() {
        let query = PropertyQuery::new(Location::new(60.1, 9.58))
            .depths([Depth::D0To5, Depth::D0To30])
            .properties([SoilProperty::Ocs, SoilProperty::Clay])
            .value(ValueKind::Mean);

        assert_eq!(
            query.unpublished_pairs(),
            vec![
                (SoilProperty::Ocs, Depth::D0To5),
                (SoilProperty::Clay, Depth::D0To30),
            ]
        );
    }

    #[test]
    fn test_property_value_query_uses_singular_keys() {
        let query = PropertyValueQuery::new(
            Location::new(60.1, 9.58),
            Depth::D0To5,
            SoilProperty::Soc,
        );
        assert_eq!(
            query.query_pairs(),
            pairs(&[
                ("lon", "9.58"),
                ("lat", "60.1"),
                ("depth", "0-5cm"),
                ("property", "soc"),
            ])
        );
    }

    #[test]
    fn test_soil_type_query() {
        let query = SoilTypeQuery::new(Location::new(60.1, 9.58));
        assert_eq!(query.path(), "type");
        assert_eq!(query.query_pairs(), pairs(&[("lon", "9.58"), ("lat", "60.1")]));

        let query = query.top_k(3);
        assert_eq!(
            query.query_pairs(),
            pairs(&[("lon", "9.58"), ("lat", "60.1"), ("top_k", "3")])
        );
        assert!(query.validate().is_ok());

        assert!(query.top_k(30).validate().is_ok());
        let err = query.top_k(31).validate().unwrap_err();
        assert!(err.to_string().contains("top_k"));

        // Zero is in range and still sent
        let zero = query.top_k(0);
        assert!(zero.validate().is_ok());
        assert_eq!(
            zero.query_pairs(),
            pairs(&[("lon", "9.58"), ("lat", "60.1"), ("top_k", "0")])
        );
    }

    #[test]
    fn test_summary_query_pairs() {
        let query = SoilTypeSummaryQuery::new(BoundingBox::new(60.1, 9.5, 60.12, 9.6));
        assert_eq!(query.path(), "type/summary");
        assert!(query.validate().is_ok());
        assert_eq!(
            query.query_pairs(),
            pairs(&[
                ("min_lon", "9.5"),
                ("max_lon", "9.6"),
                ("min_lat", "60.1"),
                ("max_lat", "60.12"),
            ])
        );
    }

    #[test]
    fn test_bbox_validation() {
        assert!(matches!(
            BoundingBox::new(60.12, 9.5, 60.1, 9.6).validate(),
            Err(SoilError::InvalidBoundingBox { .. })
        ));
        assert!(BoundingBox::new(60.1, 9.6, 60.12, 9.5).validate().is_err());
        assert!(BoundingBox::new(60.1, 9.5, 60.1, 9.5).validate().is_ok());
        assert!(matches!(
            BoundingBox::new(60.0, 170.0, 61.0, 181.0).validate(),
            Err(SoilError::OutOfRegion { .. })
        ));
        assert!(BoundingBox::new(f64::NAN, 0.0, 1.0, 1.0).validate().is_err());
    }

    #[test]
    fn test_health_queries_have_no_params() {
        assert_eq!(LivenessQuery.path(), "health");
        assert!(LivenessQuery.query_pairs().is_empty());
        assert_eq!(ReadinessQuery.path(), "ready");
        assert!(ReadinessQuery.validate().is_ok());
    }
}
