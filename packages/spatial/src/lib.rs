#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Spatial complaint filtering.
//!
//! Parses a user-selected map area (any `GeoJSON` `Polygon` or
//! `MultiPolygon` feature) and narrows a set of geolocated complaints to
//! those inside it with a point-in-polygon test. [`ComplaintView`] keeps the
//! complaint set and selection together and memoizes the filtered result.

mod area;
mod filter;
mod view;

use accountability_records_models::GeolocatedComplaint;
use thiserror::Error;

pub use area::{AreaFeature, parse_area_collection};
pub use filter::{AreaCount, count_by_area, filter_complaints_by_area};
pub use view::ComplaintView;

/// Errors that can occur while reading area geometry.
#[derive(Debug, Error)]
pub enum SpatialError {
    /// The input is not valid `GeoJSON`.
    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),

    /// The feature carries no geometry.
    #[error("Area feature has no geometry")]
    MissingGeometry,

    /// The geometry is not a polygon.
    #[error("Unsupported area geometry {kind}: expected Polygon or MultiPolygon")]
    UnsupportedGeometry {
        /// `GeoJSON` type that was found.
        kind: String,
    },
}

/// Anything with a WGS84 position.
pub trait Geolocated {
    /// Returns `(longitude, latitude)`.
    fn position(&self) -> (f64, f64);
}

impl Geolocated for GeolocatedComplaint {
    fn position(&self) -> (f64, f64) {
        (self.longitude, self.latitude)
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use accountability_records_models::{Complaint, GeolocatedComplaint, RecordId};

    /// Rough bounding box of New Orleans.
    pub fn new_orleans() -> serde_json::Value {
        serde_json::json!({
            "type": "Feature",
            "id": "nola",
            "properties": { "name": "New Orleans" },
            "geometry": {
                "type": "Polygon",
                "coordinates": [[
                    [-90.14, 29.86], [-89.62, 29.86], [-89.62, 30.20],
                    [-90.14, 30.20], [-90.14, 29.86]
                ]]
            }
        })
    }

    pub fn complaint(id: &str, lng: f64, lat: f64) -> GeolocatedComplaint {
        let mut extra = serde_json::Map::new();
        extra.insert("district".to_string(), serde_json::json!("8th"));

        Complaint {
            id: RecordId::new(id),
            tracking_number: Some(format!("2024-{id}")),
            occurred_on: None,
            latitude: Some(lat),
            longitude: Some(lng),
            disposition: None,
            extra,
        }
        .geolocate()
        .expect("fixture coordinates are finite")
    }
}
