use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;

use super::cache::TleCache;
use super::catalog;
use super::models::{SatellitePosition, TleRecord};
use super::propagation::{propagate_positions, Propagator};
use super::source::{parse_curated_three_line, parse_single_three_line, TleSource};
use crate::error::HttpError;
use crate::impl_into_response;

#[derive(Error, Debug)]
pub enum SatelliteError {
    #[error("Failed to fetch TLE data: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("CelesTrak returned HTTP {0}")]
    ApiError(u16),
}

impl HttpError for SatelliteError {
    fn status_code(&self) -> StatusCode {
        StatusCode::BAD_GATEWAY
    }

    fn error_code(&self) -> Option<&'static str> {
        match self {
            Self::RequestError(_) => Some("REQUEST_ERROR"),
            Self::ApiError(_) => Some("API_ERROR"),
        }
    }
}

impl_into_response!(SatelliteError);

pub struct SatelliteService {
    source: Arc<dyn TleSource>,
    propagator: Arc<dyn Propagator>,
    cache: TleCache,
    groups: Vec<String>,
    individual_fetch_limit: usize,
}

impl SatelliteService {
    pub fn new(
        source: Arc<dyn TleSource>,
        propagator: Arc<dyn Propagator>,
        cache: TleCache,
        groups: Vec<String>,
        individual_fetch_limit: usize,
    ) -> Self {
        Self {
            source,
            propagator,
            cache,
            groups,
            individual_fetch_limit,
        }
    }

    pub async fn fetch_tle_data(&self) -> Arc<Vec<TleRecord>> {
        self.fetch_tle_data_at(Instant::now()).await
    }

    /// Curated element sets, from cache when fresh.
    ///
    /// Bulk groups are tried first; if none answers, the first curated
    /// satellites are fetched one by one. Failures never surface; the result
    /// may be empty.
    pub async fn fetch_tle_data_at(&self, now: Instant) -> Arc<Vec<TleRecord>> {
        if let Some(cached) = self.cache.fresh(now).await {
            tracing::debug!(count = cached.len(), "TLE cache hit");
            metrics::counter!("astroview_tle_cache_total", "result" => "hit").increment(1);
            return cached;
        }
        metrics::counter!("astroview_tle_cache_total", "result" => "miss").increment(1);

        let records = match self.fetch_groups().await {
            Some(lines) => {
                let lines: Vec<&str> = lines.iter().map(String::as_str).collect();
                parse_curated_three_line(&lines)
            }
            None => {
                tracing::warn!("No TLE group could be fetched, falling back to individual queries");
                self.fetch_individually().await
            }
        };

        tracing::info!(count = records.len(), "TLE data refreshed");
        self.cache.store(records, now).await
    }

    /// Lines of every group that answered, or None if none did
    async fn fetch_groups(&self) -> Option<Vec<String>> {
        let mut lines = Vec::new();
        let mut answered = false;

        for group in &self.groups {
            match self.source.fetch_group(group).await {
                Ok(text) => {
                    answered = true;
                    lines.extend(text.trim().lines().map(str::to_string));
                }
                Err(e) => {
                    tracing::warn!(group = %group, error = %e, "TLE group fetch failed");
                    metrics::counter!("astroview_tle_fetch_errors_total", "kind" => "group")
                        .increment(1);
                }
            }
        }

        (answered && !lines.is_empty()).then_some(lines)
    }

    async fn fetch_individually(&self) -> Vec<TleRecord> {
        let mut records = Vec::new();

        for entry in catalog::curated().values().take(self.individual_fetch_limit) {
            match self.source.fetch_by_catalog_number(entry.catalog_id).await {
                Ok(text) => match parse_single_three_line(&text, entry) {
                    Some(record) => records.push(record),
                    None => tracing::debug!(catalog_id = %entry.catalog_id, "No element set in response"),
                },
                Err(e) => {
                    tracing::debug!(catalog_id = %entry.catalog_id, error = %e, "Skipping satellite");
                    metrics::counter!("astroview_tle_fetch_errors_total", "kind" => "single")
                        .increment(1);
                }
            }
        }

        records
    }

    pub fn positions_at(&self, records: &[TleRecord], at: DateTime<Utc>) -> Vec<SatellitePosition> {
        propagate_positions(self.propagator.as_ref(), records, at)
    }

    /// Current positions of all curated satellites with element sets
    pub async fn current_positions(&self) -> Vec<SatellitePosition> {
        let records = self.fetch_tle_data().await;
        self.positions_at(&records, Utc::now())
    }
}
