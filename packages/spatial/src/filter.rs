//! Predicate filtering of geolocated records by area.
//!
//! Every call is a full linear scan with a bounding-box precheck. Candidate
//! sets are thousands of complaints, not millions, so no index is built.

use serde::Serialize;

use crate::{AreaFeature, Geolocated};

/// Keeps the records whose position falls inside `area`.
///
/// `None` is the identity filter: every record is returned. The input is
/// never modified; the output preserves input order and every field.
#[must_use]
pub fn filter_complaints_by_area<T: Geolocated + Clone>(
    complaints: &[T],
    area: Option<&AreaFeature>,
) -> Vec<T> {
    let Some(area) = area else {
        return complaints.to_vec();
    };

    let kept: Vec<T> = complaints
        .iter()
        .filter(|c| {
            let (lng, lat) = c.position();
            area.contains(lng, lat)
        })
        .cloned()
        .collect();

    log::debug!(
        "Area filter {} kept {} of {} complaints",
        area.name().or_else(|| area.id()).unwrap_or("<unnamed>"),
        kept.len(),
        complaints.len()
    );

    kept
}

/// Number of records inside one area.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaCount {
    /// Feature id of the area.
    pub area_id: Option<String>,
    /// Display name of the area.
    pub area_name: Option<String>,
    /// Records inside it.
    pub count: u64,
}

/// Counts the records inside each of `areas`, for choropleth shading of a
/// boundary layer. Areas may overlap, so a record can count toward more
/// than one area. Output is parallel to `areas`.
#[must_use]
pub fn count_by_area<T: Geolocated>(complaints: &[T], areas: &[AreaFeature]) -> Vec<AreaCount> {
    let positions: Vec<(f64, f64)> = complaints.iter().map(Geolocated::position).collect();

    areas
        .iter()
        .map(|area| AreaCount {
            area_id: area.id().map(str::to_string),
            area_name: area.name().map(str::to_string),
            count: positions
                .iter()
                .filter(|&&(lng, lat)| area.contains(lng, lat))
                .count() as u64,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{complaint, new_orleans};

    #[test]
    fn no_area_returns_input_unchanged() {
        let complaints = vec![
            complaint("1", -90.07, 29.95),
            complaint("2", 0.0, 0.0),
            complaint("3", -73.9, 40.7),
        ];
        let result = filter_complaints_by_area(&complaints, None);
        assert_eq!(result, complaints);
    }

    #[test]
    fn keeps_only_points_inside() {
        let area = AreaFeature::from_json_value(new_orleans()).unwrap();
        let complaints = vec![
            complaint("in-1", -90.07, 29.95),
            complaint("out", 0.0, 0.0),
            complaint("in-2", -89.9, 30.0),
        ];

        let result = filter_complaints_by_area(&complaints, Some(&area));

        let ids: Vec<&str> = result.iter().map(|c| c.complaint.id.as_str()).collect();
        assert_eq!(ids, vec!["in-1", "in-2"]);
        assert_eq!(result[0], complaints[0]);
        assert_eq!(complaints.len(), 3);
    }

    #[test]
    fn filtering_is_idempotent() {
        let area = AreaFeature::from_json_value(new_orleans()).unwrap();
        let complaints = vec![
            complaint("a", -90.07, 29.95),
            complaint("b", -91.0, 29.95),
            complaint("c", -90.0, 30.1),
        ];
        let once = filter_complaints_by_area(&complaints, Some(&area));
        let twice = filter_complaints_by_area(&once, Some(&area));
        assert_eq!(once, twice);
    }

    #[test]
    fn empty_input_empty_output() {
        let area = AreaFeature::from_json_value(new_orleans()).unwrap();
        let none: Vec<accountability_records_models::GeolocatedComplaint> = Vec::new();
        assert!(filter_complaints_by_area(&none, Some(&area)).is_empty());
    }

    #[test]
    fn counts_per_area() {
        let nola = AreaFeature::from_json_value(new_orleans()).unwrap();
        let unit = AreaFeature::from_geojson_str(
            r#"{"type":"Polygon","coordinates":[[[0,0],[1,0],[1,1],[0,1],[0,0]]]}"#,
        )
        .unwrap()
        .with_name("unit");
        let complaints = vec![
            complaint("1", -90.07, 29.95),
            complaint("2", -90.01, 29.97),
            complaint("3", 0.5, 0.5),
            complaint("4", 50.0, 50.0),
        ];

        let counts = count_by_area(&complaints, &[nola, unit]);

        assert_eq!(counts.len(), 2);
        assert_eq!(counts[0].area_id.as_deref(), Some("nola"));
        assert_eq!(counts[0].count, 2);
        assert_eq!(counts[1].area_name.as_deref(), Some("unit"));
        assert_eq!(counts[1].count, 1);
    }
}
