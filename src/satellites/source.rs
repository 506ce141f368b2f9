use async_trait::async_trait;
use reqwest::Client;
use std::collections::HashSet;

use super::catalog::{self, CatalogEntry};
use super::models::{catalog_id_of, TleRecord};
use super::service::SatelliteError;

/// Where raw three-line element text comes from
#[async_trait]
pub trait TleSource: Send + Sync {
    /// Every element set of a CelesTrak group ("stations", "active")
    async fn fetch_group(&self, group: &str) -> Result<String, SatelliteError>;

    /// The element set of a single satellite
    async fn fetch_by_catalog_number(&self, catalog_id: &str) -> Result<String, SatelliteError>;
}

/// CelesTrak GP API in 3LE format
pub struct CelestrakClient {
    client: Client,
    base_url: String,
}

impl CelestrakClient {
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.to_string(),
        }
    }

    async fn get_text(&self, query: &[(&str, &str)]) -> Result<String, SatelliteError> {
        let response = self.client.get(&self.base_url).query(query).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SatelliteError::ApiError(status.as_u16()));
        }

        Ok(response.text().await?)
    }
}

#[async_trait]
impl TleSource for CelestrakClient {
    async fn fetch_group(&self, group: &str) -> Result<String, SatelliteError> {
        tracing::debug!(group = %group, "Fetching TLE group from CelesTrak");
        self.get_text(&[("GROUP", group), ("FORMAT", "3le")]).await
    }

    async fn fetch_by_catalog_number(&self, catalog_id: &str) -> Result<String, SatelliteError> {
        tracing::debug!(catalog_id = %catalog_id, "Fetching single TLE from CelesTrak");
        self.get_text(&[("CATNR", catalog_id), ("FORMAT", "3le")]).await
    }
}

fn is_line1(line: &str) -> bool {
    line.starts_with("1 ")
}

fn is_line2(line: &str) -> bool {
    line.starts_with("2 ")
}

fn record_for(entry: &CatalogEntry, line1: &str, line2: &str) -> TleRecord {
    TleRecord {
        name: entry.name.to_string(),
        line1: line1.to_string(),
        line2: line2.to_string(),
        category: entry.category,
    }
}

/// Curated satellites found in bulk 3LE text.
///
/// Lines are scanned for a name line followed by line 1 and line 2; anything
/// else is skipped one line at a time. Each catalog number is kept once, in
/// the order first seen, and named from the curated catalog.
pub fn parse_curated_three_line(lines: &[&str]) -> Vec<TleRecord> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut records = Vec::new();

    let mut i = 0;
    while i + 2 < lines.len() {
        let line1 = lines[i + 1].trim();
        let line2 = lines[i + 2].trim();

        if !(is_line1(line1) && is_line2(line2)) {
            i += 1;
            continue;
        }

        if let Some(entry) = catalog_id_of(line1).and_then(catalog::lookup) {
            if seen.insert(entry.catalog_id) {
                records.push(record_for(entry, line1, line2));
            }
        }
        i += 3;
    }

    records
}

/// Element set of one curated satellite from a CATNR response
pub fn parse_single_three_line(text: &str, entry: &CatalogEntry) -> Option<TleRecord> {
    let lines: Vec<&str> = text.trim().lines().collect();
    let line1 = lines.get(1)?.trim();
    let line2 = lines.get(2)?.trim();

    if !(is_line1(line1) && is_line2(line2)) {
        return None;
    }

    Some(record_for(entry, line1, line2))
}
