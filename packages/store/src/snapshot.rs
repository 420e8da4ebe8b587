//! Local JSON snapshot of the record tables.
//!
//! A snapshot directory holds one JSON array per table (`officers.json`,
//! `allegations.json`, ...). A missing file reads as an empty table.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use accountability_records_models::{Allegation, Award, Complaint, Officer, UseOfForceIncident};
use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::{RecordStore, StoreError, Table};

/// All tables held in memory.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    /// `officers`
    pub officers: Vec<Officer>,
    /// `allegations`
    pub allegations: Vec<Allegation>,
    /// `use_of_force`
    pub use_of_force: Vec<UseOfForceIncident>,
    /// `awards`
    pub awards: Vec<Award>,
    /// `complaints`
    pub complaints: Vec<Complaint>,
}

enum Source {
    Dir(PathBuf),
    Memory(Arc<Snapshot>),
}

/// [`RecordStore`] backed by a snapshot directory or an in-memory
/// [`Snapshot`].
pub struct SnapshotStore {
    name: String,
    source: Source,
}

impl SnapshotStore {
    /// Reads tables from `dir` on every fetch.
    #[must_use]
    pub fn open(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        Self {
            name: format!("snapshot {}", dir.display()),
            source: Source::Dir(dir),
        }
    }

    /// Serves tables from memory.
    #[must_use]
    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        Self {
            name: "in-memory snapshot".to_string(),
            source: Source::Memory(Arc::new(snapshot)),
        }
    }

    async fn table<T: DeserializeOwned + Clone>(
        &self,
        table: Table,
        pick: impl FnOnce(&Snapshot) -> &Vec<T>,
    ) -> Result<Vec<T>, StoreError> {
        match &self.source {
            Source::Dir(dir) => read_table(dir, table).await,
            Source::Memory(snapshot) => Ok(pick(snapshot).clone()),
        }
    }
}

async fn read_table<T: DeserializeOwned>(dir: &Path, table: Table) -> Result<Vec<T>, StoreError> {
    let path = dir.join(table.file_name());

    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            log::warn!("{} not found, treating {table} as empty", path.display());
            return Ok(Vec::new());
        }
        Err(e) => return Err(e.into()),
    };

    let rows: Vec<T> =
        serde_json::from_slice(&bytes).map_err(|source| StoreError::Decode { table, source })?;
    log::debug!("Read {} {table} rows from {}", rows.len(), path.display());

    Ok(rows)
}

#[async_trait]
impl RecordStore for SnapshotStore {
    fn name(&self) -> &str {
        &self.name
    }

    async fn officers(&self) -> Result<Vec<Officer>, StoreError> {
        self.table(Table::Officers, |s| &s.officers).await
    }

    async fn allegations(&self) -> Result<Vec<Allegation>, StoreError> {
        self.table(Table::Allegations, |s| &s.allegations).await
    }

    async fn use_of_force(&self) -> Result<Vec<UseOfForceIncident>, StoreError> {
        self.table(Table::UseOfForce, |s| &s.use_of_force).await
    }

    async fn awards(&self) -> Result<Vec<Award>, StoreError> {
        self.table(Table::Awards, |s| &s.awards).await
    }

    async fn complaints(&self) -> Result<Vec<Complaint>, StoreError> {
        self.table(Table::Complaints, |s| &s.complaints).await
    }
}
