mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Config, Engine, Health, Postgres, Search, Service, Storage};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.dsn.trim().is_empty() {
		return Err(Error::Validation {
			message: "storage.postgres.dsn must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.pool_max_conns == 0 {
		return Err(Error::Validation {
			message: "storage.postgres.pool_max_conns must be greater than zero.".to_string(),
		});
	}
	if cfg.storage.engine.url.trim().is_empty() {
		return Err(Error::Validation {
			message: "storage.engine.url must be non-empty.".to_string(),
		});
	}
	if cfg.storage.engine.index.trim().is_empty() {
		return Err(Error::Validation {
			message: "storage.engine.index must be non-empty.".to_string(),
		});
	}
	if cfg.storage.engine.request_timeout_ms == 0 {
		return Err(Error::Validation {
			message: "storage.engine.request_timeout_ms must be greater than zero.".to_string(),
		});
	}
	if cfg.storage.engine.ping_timeout_ms == 0 {
		return Err(Error::Validation {
			message: "storage.engine.ping_timeout_ms must be greater than zero.".to_string(),
		});
	}
	if cfg.search.default_limit == 0 || cfg.search.default_limit > 100 {
		return Err(Error::Validation {
			message: "search.default_limit must be in the range 1-100.".to_string(),
		});
	}
	if cfg.health.healthy_ttl_secs == 0 {
		return Err(Error::Validation {
			message: "health.healthy_ttl_secs must be greater than zero.".to_string(),
		});
	}
	if cfg.health.unhealthy_ttl_secs == 0 {
		return Err(Error::Validation {
			message: "health.unhealthy_ttl_secs must be greater than zero.".to_string(),
		});
	}
	if cfg.health.unhealthy_ttl_secs > cfg.health.healthy_ttl_secs {
		return Err(Error::Validation {
			message: "health.unhealthy_ttl_secs must not exceed health.healthy_ttl_secs."
				.to_string(),
		});
	}
	if cfg.health.backoff_threshold == 0 {
		return Err(Error::Validation {
			message: "health.backoff_threshold must be greater than zero.".to_string(),
		});
	}
	if cfg.health.backoff_interval_secs < cfg.health.unhealthy_ttl_secs {
		return Err(Error::Validation {
			message: "health.backoff_interval_secs must not undercut health.unhealthy_ttl_secs."
				.to_string(),
		});
	}
	if cfg.health.cluster_health_timeout_secs == 0 {
		return Err(Error::Validation {
			message: "health.cluster_health_timeout_secs must be greater than zero.".to_string(),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	while cfg.storage.engine.url.ends_with('/') {
		cfg.storage.engine.url.pop();
	}
}
