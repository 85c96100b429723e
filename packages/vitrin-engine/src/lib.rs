//! HTTP client for the product search engine.
//!
//! The engine speaks an Elasticsearch-shaped API: `HEAD /` for liveness,
//! `GET /_cluster/health` for cluster status, `POST /{index}/_search` for
//! ranked queries. Failures are returned as errors; routing around them is
//! the service layer's job.

pub mod cluster;
pub mod query;

pub use cluster::{cluster_health, ping};
pub use query::{EngineHit, EngineHits, search};

use std::time::Duration;

use color_eyre::Result;
use reqwest::Client;

fn client(timeout_ms: u64) -> Result<Client> {
	Ok(Client::builder().timeout(Duration::from_millis(timeout_ms)).build()?)
}
