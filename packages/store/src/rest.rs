//! Hosted database REST client.
//!
//! Reads tables through a PostgREST-style endpoint
//! (`{base_url}/rest/v1/{table}`) using `limit`/`offset` pagination. Every
//! request carries the anonymous API key; the portal never writes.

use accountability_records_models::{Allegation, Award, Complaint, Officer, UseOfForceIncident};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use crate::{RecordStore, StoreError, Table};

/// Default rows per page.
pub const DEFAULT_PAGE_SIZE: u64 = 1000;

/// [`RecordStore`] backed by the hosted database's REST API.
pub struct RestStore {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    page_size: u64,
}

impl RestStore {
    /// Creates a client for the project at `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Overrides the page size. Zero is bumped to 1.
    #[must_use]
    pub fn with_page_size(mut self, page_size: u64) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// URL of one page of `table`.
    #[must_use]
    pub fn page_url(&self, table: Table, limit: u64, offset: u64) -> String {
        format!(
            "{}/rest/v1/{table}?select=*&order=id.asc&limit={limit}&offset={offset}",
            self.base_url
        )
    }

    async fn fetch_all<T: DeserializeOwned>(&self, table: Table) -> Result<Vec<T>, StoreError> {
        let rows = paginate(self.page_size, move |offset| self.fetch_page(table, offset)).await?;

        log::info!("Fetched {} {table} rows", rows.len());

        Ok(rows)
    }

    async fn fetch_page<T: DeserializeOwned>(
        &self,
        table: Table,
        offset: u64,
    ) -> Result<Vec<T>, StoreError> {
        let url = self.page_url(table, self.page_size, offset);
        log::debug!("Fetching {table}: offset={offset}, limit={}", self.page_size);

        let mut request = self.client.get(&url);
        if let Some(key) = &self.api_key {
            request = request.header("apikey", key).bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(status_error(table, status));
        }

        let body = response.bytes().await?;
        decode_page(table, &body)
    }
}

fn status_error(table: Table, status: StatusCode) -> StoreError {
    StoreError::Status {
        table,
        status: status.as_u16(),
    }
}

fn decode_page<T: DeserializeOwned>(table: Table, body: &[u8]) -> Result<Vec<T>, StoreError> {
    serde_json::from_slice(body).map_err(|source| StoreError::Decode { table, source })
}

/// Requests pages at increasing offsets until one comes back shorter than
/// `page_size`. The first failed page aborts the whole read.
async fn paginate<T, F, Fut>(page_size: u64, mut fetch_page: F) -> Result<Vec<T>, StoreError>
where
    F: FnMut(u64) -> Fut,
    Fut: Future<Output = Result<Vec<T>, StoreError>>,
{
    let mut rows: Vec<T> = Vec::new();
    let mut offset: u64 = 0;

    loop {
        let page = fetch_page(offset).await?;
        let count = page.len() as u64;
        rows.extend(page);
        offset += count;

        if count < page_size {
            break;
        }
    }

    Ok(rows)
}

#[async_trait]
impl RecordStore for RestStore {
    fn name(&self) -> &str {
        &self.base_url
    }

    async fn officers(&self) -> Result<Vec<Officer>, StoreError> {
        self.fetch_all(Table::Officers).await
    }

    async fn allegations(&self) -> Result<Vec<Allegation>, StoreError> {
        self.fetch_all(Table::Allegations).await
    }

    async fn use_of_force(&self) -> Result<Vec<UseOfForceIncident>, StoreError> {
        self.fetch_all(Table::UseOfForce).await
    }

    async fn awards(&self) -> Result<Vec<Award>, StoreError> {
        self.fetch_all(Table::Awards).await
    }

    async fn complaints(&self) -> Result<Vec<Complaint>, StoreError> {
        self.fetch_all(Table::Complaints).await
    }
}
