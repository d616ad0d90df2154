//! # soil - Soil Information API Client
//!
//! Typed, blocking client for a SoilGrids-backed soil information service
//! (by default the public OpenEPI deployment).
//!
//! ## Features
//!
//! - **Typed parameters**: properties, depths, statistics and soil types are enums
//! - **Validated queries**: bad coordinates and parameters are rejected before any request
//! - **Typed responses**: layered property values, soil types, summaries, health probes
//! - **Resilient**: configurable timeout, retries on transient failures
//!
//! ## Quick Start
//!
//! ```ignore
//! use soil::{Depth, SoilClient, SoilProperty, ValueKind};
//! use soil::query::{Location, PropertyQuery};
//!
//! let client = SoilClient::from_env()?;
//!
//! let query = PropertyQuery::new(Location::new(60.1, 9.58))
//!     .depths([Depth::D0To5, Depth::D100To200])
//!     .properties([SoilProperty::Bdod, SoilProperty::Phh2o])
//!     .values([ValueKind::Mean, ValueKind::Q05]);
//!
//! let response = client.soil_properties(&query)?;
//! for layer in response.layers() {
//!     for depth in &layer.depths {
//!         for (kind, value) in depth.values.iter() {
//!             println!("{} {} {}: {} {}", layer.name, depth.label, kind, value,
//!                      layer.unit_measure.mapped_units);
//!         }
//!     }
//! }
//! ```
//!
//! ## Endpoints
//!
//! | Method | Path | Response |
//! |--------|------|----------|
//! | [`SoilClient::soil_properties`] | `property` | [`SoilPropertyResponse`] |
//! | [`SoilClient::soil_property_value`] | `property` | [`PropertyValueResponse`] |
//! | [`SoilClient::soil_type`] | `type` | [`SoilTypeResponse`] |
//! | [`SoilClient::soil_type_summary`] | `type/summary` | [`SoilTypeSummaryResponse`] |
//! | [`SoilClient::liveness`] | `health` | [`Liveness`] |
//! | [`SoilClient::readiness`] | `ready` | [`Readiness`] |

pub mod catalog;
pub mod client;
pub mod error;
pub mod models;
pub mod query;

#[cfg(feature = "geojson")]
pub mod geojson;

// Re-export main types at crate root for convenience
pub use catalog::{Depth, SoilProperty, SoilType, ValueKind};
pub use client::{ClientConfig, SoilClient, DEFAULT_BASE_URL};
pub use error::{Result, SoilError};
pub use models::{
    Liveness, PropertyValueResponse, Readiness, SoilPropertyResponse, SoilTypeResponse,
    SoilTypeSummaryResponse,
};
pub use query::{
    BoundingBox, Location, PropertyQuery, PropertyValueQuery, SoilTypeQuery,
    SoilTypeSummaryQuery,
};
