//! TTL-cached circuit breaker around the engine's availability.
//!
//! The cached verdict is trusted for an asymmetric window: a healthy engine
//! is re-checked after `healthy_ttl_secs`, an unhealthy one after
//! `unhealthy_ttl_secs`, and a persistently failing one only every
//! `backoff_interval_secs`. The decide-probe-update sequence runs under one
//! lock so concurrent requests cannot both probe inside a window.

use std::time::Duration;

use time::OffsetDateTime;
use tokio::sync::Mutex;

use crate::EngineProvider;

#[derive(Debug, Clone, Copy, Default)]
struct HealthState {
	available: Option<bool>,
	last_checked_at: Option<OffsetDateTime>,
	consecutive_failures: u32,
}

/// Read-only view of the gate, attached to fallback diagnostics.
#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct HealthSnapshot {
	pub available: Option<bool>,
	pub consecutive_failures: u32,
}

pub struct HealthGate {
	cfg: vitrin_config::Health,
	state: Mutex<HealthState>,
}

impl HealthGate {
	pub fn new(cfg: vitrin_config::Health) -> Self {
		Self { cfg, state: Mutex::new(HealthState::default()) }
	}

	/// Returns the cached verdict when it is still fresh; probes otherwise.
	/// Mutates shared state only on a live probe.
	pub async fn is_available(
		&self,
		engine: &dyn EngineProvider,
		engine_cfg: &vitrin_config::Engine,
	) -> bool {
		let mut state = self.state.lock().await;
		let now = OffsetDateTime::now_utc();

		if let (Some(available), Some(checked_at)) = (state.available, state.last_checked_at) {
			let age = now - checked_at;

			if age < self.effective_ttl(&state) {
				return available;
			}
		}

		let healthy = probe(engine, engine_cfg, self.cfg.cluster_health_timeout_secs).await;

		if healthy {
			if state.available == Some(false) {
				tracing::info!("Engine recovered; resuming engine-first routing.");
			}

			state.consecutive_failures = 0;
		} else {
			state.consecutive_failures += 1;

			tracing::warn!(
				consecutive_failures = state.consecutive_failures,
				"Engine health probe failed."
			);
		}

		state.available = Some(healthy);
		state.last_checked_at = Some(now);

		healthy
	}

	pub async fn snapshot(&self) -> HealthSnapshot {
		let state = self.state.lock().await;

		HealthSnapshot {
			available: state.available,
			consecutive_failures: state.consecutive_failures,
		}
	}

	/// Forgets everything; the next `is_available` call probes again.
	pub async fn reset(&self) {
		*self.state.lock().await = HealthState::default();
	}

	// Past the failure threshold the interval stretches to the backoff
	// value regardless of the cached verdict, so a dead engine is not
	// hammered every unhealthy-TTL.
	fn effective_ttl(&self, state: &HealthState) -> time::Duration {
		let secs = if state.consecutive_failures >= self.cfg.backoff_threshold {
			self.cfg.backoff_interval_secs
		} else if state.available == Some(true) {
			self.cfg.healthy_ttl_secs
		} else {
			self.cfg.unhealthy_ttl_secs
		};

		time::Duration::seconds(secs as i64)
	}
}

/// One live probe: liveness ping, then cluster status with a bounded
/// timeout. `green` and `yellow` count as healthy; `red`, anything else, or
/// any transport error counts as unhealthy.
async fn probe(
	engine: &dyn EngineProvider,
	cfg: &vitrin_config::Engine,
	health_timeout_secs: u64,
) -> bool {
	match engine.ping(cfg).await {
		Ok(true) => {},
		Ok(false) | Err(_) => return false,
	}

	match engine.cluster_health(cfg, Duration::from_secs(health_timeout_secs)).await {
		Ok(status) => matches!(status.as_str(), "green" | "yellow"),
		Err(_) => false,
	}
}
