//! User-selected map areas.

use geo::{BoundingRect, Coord, Intersects, MultiPolygon, Point, Rect};
use geojson::{Feature, GeoJson};

use crate::SpatialError;

/// Property keys tried, in order, for an area's display name.
const NAME_KEYS: &[&str] = &["name", "NAME", "label"];

/// A polygon the user picked on the map, e.g. a clicked district tile or a
/// drawn selection. Where it came from does not matter; only its geometry
/// and an optional label are kept.
#[derive(Debug, Clone, PartialEq)]
pub struct AreaFeature {
    id: Option<String>,
    name: Option<String>,
    polygon: MultiPolygon<f64>,
    bounds: Option<Rect<f64>>,
}

impl AreaFeature {
    /// Builds an area directly from a polygon.
    #[must_use]
    pub fn new(polygon: MultiPolygon<f64>) -> Self {
        let bounds = polygon.bounding_rect();
        Self {
            id: None,
            name: None,
            polygon,
            bounds,
        }
    }

    /// Attaches a display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Parses a `GeoJSON` document.
    ///
    /// Accepts a `Feature`, a bare geometry, or a `FeatureCollection`
    /// holding exactly one feature.
    ///
    /// # Errors
    ///
    /// * [`SpatialError::GeoJson`] if the text is not valid `GeoJSON`
    /// * [`SpatialError::MissingGeometry`] if the feature has no geometry
    /// * [`SpatialError::UnsupportedGeometry`] for anything that is not a
    ///   `Polygon` or `MultiPolygon`
    pub fn from_geojson_str(geojson_str: &str) -> Result<Self, SpatialError> {
        let geojson: GeoJson = geojson_str.parse()?;
        Self::from_geojson(geojson)
    }

    /// Converts an already-parsed `GeoJSON` JSON value.
    ///
    /// # Errors
    ///
    /// Same as [`AreaFeature::from_geojson_str`].
    pub fn from_json_value(value: serde_json::Value) -> Result<Self, SpatialError> {
        Self::from_geojson(GeoJson::from_json_value(value)?)
    }

    /// Converts a parsed [`GeoJson`] object.
    ///
    /// # Errors
    ///
    /// Same as [`AreaFeature::from_geojson_str`].
    pub fn from_geojson(geojson: GeoJson) -> Result<Self, SpatialError> {
        match geojson {
            GeoJson::Feature(feature) => Self::from_feature(feature),
            GeoJson::Geometry(geometry) => Ok(Self::new(to_multipolygon(geometry)?)),
            GeoJson::FeatureCollection(collection) => {
                let count = collection.features.len();
                let mut features = collection.features.into_iter();
                match (features.next(), count) {
                    (Some(feature), 1) => Self::from_feature(feature),
                    _ => Err(SpatialError::UnsupportedGeometry {
                        kind: format!("FeatureCollection of {count} features"),
                    }),
                }
            }
        }
    }

    /// Converts a single `GeoJSON` feature, keeping its id and name.
    ///
    /// # Errors
    ///
    /// Same as [`AreaFeature::from_geojson_str`].
    pub fn from_feature(feature: Feature) -> Result<Self, SpatialError> {
        let id = feature.id.as_ref().map(|id| match id {
            geojson::feature::Id::String(s) => s.clone(),
            geojson::feature::Id::Number(n) => n.to_string(),
        });

        let name = NAME_KEYS
            .iter()
            .find_map(|key| feature.property(*key).and_then(serde_json::Value::as_str))
            .map(str::to_string);

        let geometry = feature.geometry.ok_or(SpatialError::MissingGeometry)?;

        let mut area = Self::new(to_multipolygon(geometry)?);
        area.id = id;
        area.name = name;
        Ok(area)
    }

    /// Feature id, if the source feature had one.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Display name, if any.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The area's geometry.
    #[must_use]
    pub const fn polygon(&self) -> &MultiPolygon<f64> {
        &self.polygon
    }

    /// Whether `(lng, lat)` lies inside the area.
    ///
    /// Holes are excluded. Points exactly on a ring count as inside.
    #[must_use]
    pub fn contains(&self, lng: f64, lat: f64) -> bool {
        let Some(bounds) = self.bounds else {
            return false;
        };

        if !bounds.intersects(&Coord { x: lng, y: lat }) {
            return false;
        }

        self.polygon.intersects(&Point::new(lng, lat))
    }
}

impl TryFrom<serde_json::Value> for AreaFeature {
    type Error = SpatialError;

    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        Self::from_json_value(value)
    }
}

/// Parses a `FeatureCollection` into one area per feature, e.g. a district
/// boundary layer. Features without polygon geometry are skipped with a
/// warning.
///
/// # Errors
///
/// Returns [`SpatialError::GeoJson`] if the text is not valid `GeoJSON`.
pub fn parse_area_collection(geojson_str: &str) -> Result<Vec<AreaFeature>, SpatialError> {
    let features = match geojson_str.parse::<GeoJson>()? {
        GeoJson::FeatureCollection(collection) => collection.features,
        GeoJson::Feature(feature) => vec![feature],
        GeoJson::Geometry(geometry) => {
            return Ok(vec![AreaFeature::new(to_multipolygon(geometry)?)]);
        }
    };

    let mut areas = Vec::with_capacity(features.len());
    for (i, feature) in features.into_iter().enumerate() {
        match AreaFeature::from_feature(feature) {
            Ok(area) => areas.push(area),
            Err(e) => log::warn!("Skipping area feature {i}: {e}"),
        }
    }

    Ok(areas)
}

/// Converts a `GeoJSON` geometry into a [`MultiPolygon`].
/// Handles both `Polygon` and `MultiPolygon` geometry types.
fn to_multipolygon(geometry: geojson::Geometry) -> Result<MultiPolygon<f64>, SpatialError> {
    let kind = geometry_kind(&geometry.value);
    let geo_geom: geo::Geometry<f64> = geometry.try_into()?;
    match geo_geom {
        geo::Geometry::MultiPolygon(mp) => Ok(mp),
        geo::Geometry::Polygon(p) => Ok(MultiPolygon(vec![p])),
        _ => Err(SpatialError::UnsupportedGeometry {
            kind: kind.to_string(),
        }),
    }
}

const fn geometry_kind(value: &geojson::Value) -> &'static str {
    match value {
        geojson::Value::Point(_) => "Point",
        geojson::Value::MultiPoint(_) => "MultiPoint",
        geojson::Value::LineString(_) => "LineString",
        geojson::Value::MultiLineString(_) => "MultiLineString",
        geojson::Value::Polygon(_) => "Polygon",
        geojson::Value::MultiPolygon(_) => "MultiPolygon",
        geojson::Value::GeometryCollection(_) => "GeometryCollection",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::new_orleans;

    #[test]
    fn parses_feature_with_metadata() {
        let area = AreaFeature::from_json_value(new_orleans()).unwrap();
        assert_eq!(area.id(), Some("nola"));
        assert_eq!(area.name(), Some("New Orleans"));
        assert_eq!(area.polygon().0.len(), 1);
    }

    #[test]
    fn contains_city_point_not_null_island() {
        let area = AreaFeature::from_json_value(new_orleans()).unwrap();
        assert!(area.contains(-90.07, 29.95));
        assert!(!area.contains(0.0, 0.0));
    }

    #[test]
    fn boundary_counts_as_inside() {
        let area = AreaFeature::from_json_value(new_orleans()).unwrap();
        assert!(area.contains(-90.14, 30.0));
        assert!(area.contains(-89.62, 29.86));
    }

    #[test]
    fn holes_are_excluded() {
        let area = AreaFeature::from_geojson_str(
            r#"{"type":"Polygon","coordinates":[
                [[0,0],[10,0],[10,10],[0,10],[0,0]],
                [[4,4],[6,4],[6,6],[4,6],[4,4]]
            ]}"#,
        )
        .unwrap();
        assert!(area.contains(1.0, 1.0));
        assert!(!area.contains(5.0, 5.0));
    }

    #[test]
    fn multipolygon_matches_any_part() {
        let area = AreaFeature::from_geojson_str(
            r#"{"type":"MultiPolygon","coordinates":[
                [[[0,0],[1,0],[1,1],[0,1],[0,0]]],
                [[[5,5],[6,5],[6,6],[5,6],[5,5]]]
            ]}"#,
        )
        .unwrap();
        assert!(area.contains(0.5, 0.5));
        assert!(area.contains(5.5, 5.5));
        assert!(!area.contains(3.0, 3.0));
    }

    #[test]
    fn rejects_non_polygon_geometry() {
        let err = AreaFeature::from_geojson_str(r#"{"type":"Point","coordinates":[-90.0,29.9]}"#)
            .unwrap_err();
        assert!(
            matches!(err, SpatialError::UnsupportedGeometry { ref kind } if kind == "Point"),
            "{err}"
        );
    }

    #[test]
    fn rejects_feature_without_geometry() {
        let err = AreaFeature::from_json_value(serde_json::json!({
            "type": "Feature",
            "properties": {},
            "geometry": null
        }))
        .unwrap_err();
        assert!(matches!(err, SpatialError::MissingGeometry));
    }

    #[test]
    fn rejects_malformed_text() {
        assert!(matches!(
            AreaFeature::from_geojson_str("{not json"),
            Err(SpatialError::GeoJson(_))
        ));
    }

    #[test]
    fn collection_skips_non_polygons() {
        let text = serde_json::json!({
            "type": "FeatureCollection",
            "features": [
                new_orleans(),
                {
                    "type": "Feature",
                    "properties": { "name": "pin" },
                    "geometry": { "type": "Point", "coordinates": [0.0, 0.0] }
                }
            ]
        })
        .to_string();

        let areas = parse_area_collection(&text).unwrap();
        assert_eq!(areas.len(), 1);
        assert_eq!(areas[0].name(), Some("New Orleans"));
    }
}
