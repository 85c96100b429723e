use std::time::Duration;

use color_eyre::{Result, eyre};
use serde_json::Value;

/// Cheap liveness probe. `Ok(false)` means the engine answered with a
/// non-success status; transport failures surface as errors.
pub async fn ping(cfg: &vitrin_config::Engine) -> Result<bool> {
	let client = crate::client(cfg.ping_timeout_ms)?;
	let res = client.head(format!("{}/", cfg.url)).send().await?;

	Ok(res.status().is_success())
}

/// Cluster status string ("green", "yellow", "red"). The timeout is passed
/// through to the engine so a stuck cluster answers within the bound.
pub async fn cluster_health(cfg: &vitrin_config::Engine, timeout: Duration) -> Result<String> {
	let client = crate::client(timeout.as_millis() as u64)?;
	let url = format!("{}/_cluster/health?timeout={}s", cfg.url, timeout.as_secs().max(1));
	let res = client.get(url).send().await?;
	let json: Value = res.error_for_status()?.json().await?;

	json.get("status")
		.and_then(|status| status.as_str())
		.map(|status| status.to_string())
		.ok_or_else(|| eyre::eyre!("Cluster health response is missing a status field."))
}
