#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Officer, complaint, and linked-record types for the accountability portal.
//!
//! These are the row shapes read from the hosted records database. Officer
//! identity is immutable; every derived counter ([`OfficerCounters`]) is
//! recomputed from the linked records on each ranking request.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Primary key of any record.
///
/// The upstream tables mix text and integer keys, so both JSON strings and
/// JSON numbers are accepted and normalized to a string.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Creates an identifier from anything string-like.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Int(i64),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(s) => Self(s),
            Raw::Int(n) => Self(n.to_string()),
        })
    }
}

/// A sworn officer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Officer {
    /// Database primary key.
    pub id: RecordId,
    /// Full display name.
    pub name: String,
    /// Badge number, if published.
    #[serde(default)]
    pub badge_number: Option<String>,
    /// Current rank (e.g. "Sergeant").
    #[serde(default)]
    pub rank: Option<String>,
    /// Current unit or district assignment.
    #[serde(default)]
    pub unit: Option<String>,
    /// Date of appointment to the department.
    #[serde(default)]
    pub appointment_date: Option<NaiveDate>,
}

/// Who filed the complaint an allegation came from.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ComplainantKind {
    /// A member of the public.
    Civilian,
    /// Another officer or the department itself (rank-initiated).
    Officer,
    /// Not recorded.
    #[default]
    Unknown,
}

/// A single allegation against an officer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Allegation {
    /// Database primary key.
    pub id: RecordId,
    /// The accused officer.
    pub officer_id: RecordId,
    /// The complaint this allegation belongs to.
    #[serde(default)]
    pub complaint_id: Option<RecordId>,
    /// Origin of the complaint.
    #[serde(default)]
    pub complainant: ComplainantKind,
    /// Investigative finding (e.g. "Sustained").
    #[serde(default)]
    pub finding: Option<String>,
}

/// A use-of-force report naming an officer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UseOfForceIncident {
    /// Database primary key.
    pub id: RecordId,
    /// Officer who used force.
    pub officer_id: RecordId,
    /// Date of the incident.
    #[serde(default)]
    pub occurred_on: Option<NaiveDate>,
    /// Type of force (e.g. "Taser").
    #[serde(default)]
    pub force_type: Option<String>,
}

/// A commendation or award given to an officer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Award {
    /// Database primary key.
    pub id: RecordId,
    /// Recipient officer.
    pub officer_id: RecordId,
    /// Date awarded.
    #[serde(default)]
    pub awarded_on: Option<NaiveDate>,
    /// Award name.
    #[serde(default)]
    pub award_type: Option<String>,
}

/// A complaint record as stored, coordinates optional.
///
/// Columns not modeled here are kept verbatim in [`Complaint::extra`] so
/// consumers can render them without this crate knowing about them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Complaint {
    /// Database primary key.
    pub id: RecordId,
    /// Public tracking number.
    #[serde(default)]
    pub tracking_number: Option<String>,
    /// Date the incident occurred.
    #[serde(default)]
    pub occurred_on: Option<NaiveDate>,
    /// WGS84 latitude.
    #[serde(default)]
    pub latitude: Option<f64>,
    /// WGS84 longitude.
    #[serde(default)]
    pub longitude: Option<f64>,
    /// Final disposition.
    #[serde(default)]
    pub disposition: Option<String>,
    /// Pass-through columns.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Complaint {
    /// Attaches the coordinates as required fields.
    ///
    /// Returns `None` when either coordinate is missing or not finite; such
    /// complaints never reach the spatial filter.
    #[must_use]
    pub fn geolocate(self) -> Option<GeolocatedComplaint> {
        let longitude = self.longitude.filter(|v| v.is_finite())?;
        let latitude = self.latitude.filter(|v| v.is_finite())?;
        Some(GeolocatedComplaint {
            complaint: self,
            longitude,
            latitude,
        })
    }
}

/// A complaint known to have a position.
///
/// Serializes as the original record; the coordinates are already present
/// there as the optional `latitude`/`longitude` columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeolocatedComplaint {
    /// The original record, all fields intact.
    #[serde(flatten)]
    pub complaint: Complaint,
    /// WGS84 longitude.
    #[serde(skip)]
    pub longitude: f64,
    /// WGS84 latitude.
    #[serde(skip)]
    pub latitude: f64,
}

/// Keeps only the complaints that carry both coordinates.
#[must_use]
pub fn geolocated(complaints: Vec<Complaint>) -> Vec<GeolocatedComplaint> {
    complaints
        .into_iter()
        .filter_map(Complaint::geolocate)
        .collect()
}

/// One of the five per-officer dimensions the ranking works over.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Metric {
    /// All allegations linked to the officer.
    OfficerAllegations,
    /// The subset of allegations filed by civilians.
    CivilianAllegations,
    /// Use-of-force reports.
    UseOfForce,
    /// Awards and commendations.
    Awards,
    /// Whole years since appointment.
    ServiceYears,
}

impl Metric {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::OfficerAllegations,
            Self::CivilianAllegations,
            Self::UseOfForce,
            Self::Awards,
            Self::ServiceYears,
        ]
    }

    /// Whether a higher raw value means *less* concern.
    ///
    /// Percentiles for these metrics are flipped so that a higher composite
    /// score always reads as a more concerning profile.
    #[must_use]
    pub const fn is_inverted(self) -> bool {
        matches!(self, Self::Awards | Self::ServiceYears)
    }

    /// Human-readable chart label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::OfficerAllegations => "Allegations",
            Self::CivilianAllegations => "Civilian Allegations",
            Self::UseOfForce => "Use of Force",
            Self::Awards => "Awards",
            Self::ServiceYears => "Years of Service",
        }
    }
}

/// Raw per-officer counters, aggregated from linked records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfficerCounters {
    /// The officer these counts belong to.
    pub officer_id: RecordId,
    /// Count of all linked allegations.
    pub officer_allegations: u32,
    /// Count of linked allegations with a civilian complainant.
    pub civilian_allegations: u32,
    /// Count of linked use-of-force reports.
    pub use_of_force: u32,
    /// Count of linked awards.
    pub awards: u32,
    /// Current year minus appointment year, 0 when unknown.
    pub service_years: u32,
    /// `false` when the appointment date was missing and `service_years`
    /// was defaulted to 0.
    pub appointment_known: bool,
}

impl OfficerCounters {
    /// Zeroed counters for an officer with no linked records.
    #[must_use]
    pub const fn empty(officer_id: RecordId) -> Self {
        Self {
            officer_id,
            officer_allegations: 0,
            civilian_allegations: 0,
            use_of_force: 0,
            awards: 0,
            service_years: 0,
            appointment_known: false,
        }
    }

    /// Returns the raw value for `metric`.
    #[must_use]
    pub const fn get(&self, metric: Metric) -> u32 {
        match metric {
            Metric::OfficerAllegations => self.officer_allegations,
            Metric::CivilianAllegations => self.civilian_allegations,
            Metric::UseOfForce => self.use_of_force,
            Metric::Awards => self.awards,
            Metric::ServiceYears => self.service_years,
        }
    }
}
