//! Data source adapter: one best-effort read of the experiment payload.

mod basic;
mod client;

pub use basic::BasicClient;
pub use client::HttpClient;

use anyhow::{Context, Result};
use tracing::{error, info, warn};

use crate::error::DashboardError;
use crate::parser::{ParsedBatch, parse_observations};

/// Performs a GET against `url` and returns the body.
///
/// # Errors
///
/// Fails on an unparseable URL, a transport error, or a non-success status.
pub async fn fetch_bytes<C: HttpClient>(client: &C, url: &str) -> Result<Vec<u8>> {
    let resp = client.get(url.parse()?).await?;
    let status = resp.status();
    if !status.is_success() {
        return Err(DashboardError::HttpStatus {
            status: status.as_u16(),
            url: url.to_string(),
        }
        .into());
    }
    Ok(resp.bytes().await?.to_vec())
}

/// Loads the payload from an `http(s)` URL or a local file path.
pub async fn read_source<C: HttpClient>(client: &C, source: &str) -> Result<Vec<u8>> {
    if source.starts_with("http://") || source.starts_with("https://") {
        fetch_bytes(client, source).await
    } else {
        std::fs::read(source).with_context(|| format!("failed to read {source}"))
    }
}

/// Reads and parses the experiment records at `source`.
#[tracing::instrument(skip(client, source), fields(source = %source))]
pub async fn fetch_observations<C: HttpClient>(client: &C, source: &str) -> Result<ParsedBatch> {
    let bytes = read_source(client, source).await?;
    info!(bytes = bytes.len(), "Experiment payload received");
    let batch = parse_observations(&bytes)?;
    if !batch.rejected.is_empty() {
        warn!(
            rejected = batch.rejected.len(),
            accepted = batch.observations.len(),
            "Some experiment records were malformed and skipped"
        );
    }
    Ok(batch)
}

/// Result of the single best-effort load.
#[derive(Debug, Clone, PartialEq)]
pub enum DataState {
    Loaded(ParsedBatch),
    /// The source answered but held no usable records.
    Empty { rejected: usize },
    /// Transport or payload failure.
    Failed(String),
}

impl DataState {
    pub fn batch(&self) -> Option<&ParsedBatch> {
        match self {
            DataState::Loaded(batch) => Some(batch),
            _ => None,
        }
    }
}

/// Fetches once and folds every outcome into a [`DataState`]. Never retries.
pub async fn load_dataset<C: HttpClient>(client: &C, source: &str) -> DataState {
    match fetch_observations(client, source).await {
        Ok(batch) if batch.is_empty() => {
            warn!(source, rejected = batch.rejected.len(), "No usable experiment records");
            DataState::Empty {
                rejected: batch.rejected.len(),
            }
        }
        Ok(batch) => DataState::Loaded(batch),
        Err(e) => {
            error!(source, error = %e, "Failed to load experiment data");
            DataState::Failed(format!("{e:#}"))
        }
    }
}
