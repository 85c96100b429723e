use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	#[serde(default)]
	pub search: Search,
	#[serde(default)]
	pub health: Health,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
}

#[derive(Debug, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
	pub engine: Engine,
}

#[derive(Debug, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
}

#[derive(Debug, Deserialize)]
pub struct Engine {
	pub url: String,
	pub index: String,
	#[serde(default = "default_request_timeout_ms")]
	pub request_timeout_ms: u64,
	#[serde(default = "default_ping_timeout_ms")]
	pub ping_timeout_ms: u64,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Search {
	pub default_limit: u32,
}
impl Default for Search {
	fn default() -> Self {
		Self { default_limit: 20 }
	}
}

/// Health-gate tuning. The defaults encode the asymmetric TTLs: cached
/// "healthy" is trusted for a minute, cached "unhealthy" is re-probed after
/// ten seconds, and a persistently failing engine is only re-probed every
/// fifty seconds.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Health {
	pub healthy_ttl_secs: u64,
	pub unhealthy_ttl_secs: u64,
	pub backoff_threshold: u32,
	pub backoff_interval_secs: u64,
	pub cluster_health_timeout_secs: u64,
}
impl Default for Health {
	fn default() -> Self {
		Self {
			healthy_ttl_secs: 60,
			unhealthy_ttl_secs: 10,
			backoff_threshold: 5,
			backoff_interval_secs: 50,
			cluster_health_timeout_secs: 2,
		}
	}
}

fn default_request_timeout_ms() -> u64 {
	3_000
}

fn default_ping_timeout_ms() -> u64 {
	1_000
}
