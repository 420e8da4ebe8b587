#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Read-only access to the accountability records.
//!
//! Each backend implements the [`RecordStore`] trait. Fetch failures are
//! returned to the caller as-is: there is no retry and no partial result.
//! The caller decides how to surface a failed load.

pub mod generation;
pub mod rest;
pub mod snapshot;

use accountability_records_models::{
    Allegation, Award, Complaint, GeolocatedComplaint, Officer, UseOfForceIncident, geolocated,
};
use async_trait::async_trait;
use strum_macros::{AsRefStr, Display, EnumString};

pub use generation::{GenerationToken, RequestGeneration};
pub use rest::RestStore;
pub use snapshot::{Snapshot, SnapshotStore};

/// Errors that can occur while reading records.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("Fetching {table} failed with status {status}")]
    Status {
        /// Table being fetched.
        table: Table,
        /// HTTP status code.
        status: u16,
    },

    /// A table's rows could not be decoded.
    #[error("Failed to decode {table}: {source}")]
    Decode {
        /// Table being decoded.
        table: Table,
        /// Underlying JSON error.
        source: serde_json::Error,
    },

    /// I/O error (file read).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// The tables the portal reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum Table {
    /// `officers`
    Officers,
    /// `allegations`
    Allegations,
    /// `use_of_force`
    UseOfForce,
    /// `awards`
    Awards,
    /// `complaints`
    Complaints,
}

impl Table {
    /// File name of this table inside a snapshot directory.
    #[must_use]
    pub fn file_name(self) -> String {
        format!("{self}.json")
    }
}

/// A read-only source of accountability records.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Human-readable name for log messages.
    fn name(&self) -> &str;

    /// All officers.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the fetch or decode fails.
    async fn officers(&self) -> Result<Vec<Officer>, StoreError>;

    /// All allegations.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the fetch or decode fails.
    async fn allegations(&self) -> Result<Vec<Allegation>, StoreError>;

    /// All use-of-force reports.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the fetch or decode fails.
    async fn use_of_force(&self) -> Result<Vec<UseOfForceIncident>, StoreError>;

    /// All awards.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the fetch or decode fails.
    async fn awards(&self) -> Result<Vec<Award>, StoreError>;

    /// All complaints, with or without coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the fetch or decode fails.
    async fn complaints(&self) -> Result<Vec<Complaint>, StoreError>;
}

/// The four tables the ranking is computed from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RankingInputs {
    /// Officer population.
    pub officers: Vec<Officer>,
    /// Allegations linked to officers.
    pub allegations: Vec<Allegation>,
    /// Use-of-force reports linked to officers.
    pub use_of_force: Vec<UseOfForceIncident>,
    /// Awards linked to officers.
    pub awards: Vec<Award>,
}

/// Fetches the ranking tables concurrently.
///
/// # Errors
///
/// Returns the first [`StoreError`] any of the fetches produces.
pub async fn load_ranking_inputs(store: &dyn RecordStore) -> Result<RankingInputs, StoreError> {
    let (officers, allegations, use_of_force, awards) = tokio::try_join!(
        store.officers(),
        store.allegations(),
        store.use_of_force(),
        store.awards(),
    )?;

    log::info!(
        "Loaded {} officers, {} allegations, {} use-of-force reports, {} awards from {}",
        officers.len(),
        allegations.len(),
        use_of_force.len(),
        awards.len(),
        store.name()
    );

    Ok(RankingInputs {
        officers,
        allegations,
        use_of_force,
        awards,
    })
}

/// Fetches complaints and drops the ones without usable coordinates.
///
/// # Errors
///
/// Returns [`StoreError`] if the fetch fails.
pub async fn load_geolocated_complaints(
    store: &dyn RecordStore,
) -> Result<Vec<GeolocatedComplaint>, StoreError> {
    let complaints = store.complaints().await?;
    let total = complaints.len();
    let located = geolocated(complaints);

    if located.len() < total {
        log::info!(
            "{} of {total} complaints have no coordinates and are left off the map",
            total - located.len()
        );
    }

    Ok(located)
}
