//! The dispatch and resilience core.
//!
//! A search request prefers the engine path and degrades to the relational
//! path when the engine is gated unavailable or fails mid-flight. Degraded
//! service is signaled in the response, not thrown; only a failure of both
//! paths surfaces as an error.

pub mod engine_search;
pub mod health;
pub mod search;
pub mod store_search;

use std::{future::Future, pin::Pin, sync::Arc, time::Duration};

use serde_json::Value;

use vitrin_config::Config;
use vitrin_domain::SortMode;
use vitrin_engine::EngineHits;
use vitrin_storage::{db::Db, models::ProductHit};

pub use health::{HealthGate, HealthSnapshot};
pub use search::{SearchData, SearchRequest, SearchResponse, Source};

pub type ServiceResult<T> = Result<T, ServiceError>;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Wire client for the search engine. The default implementation speaks the
/// engine's HTTP API via `vitrin-engine`; tests substitute their own.
pub trait EngineProvider
where
	Self: Send + Sync,
{
	fn ping<'a>(
		&'a self,
		cfg: &'a vitrin_config::Engine,
	) -> BoxFuture<'a, color_eyre::Result<bool>>;

	fn cluster_health<'a>(
		&'a self,
		cfg: &'a vitrin_config::Engine,
		timeout: Duration,
	) -> BoxFuture<'a, color_eyre::Result<String>>;

	fn search<'a>(
		&'a self,
		cfg: &'a vitrin_config::Engine,
		index: &'a str,
		body: Value,
	) -> BoxFuture<'a, color_eyre::Result<EngineHits>>;
}

/// Relational fallback path. Listing mode when `query` is `None`, variant
/// matching otherwise.
pub trait CatalogProvider
where
	Self: Send + Sync,
{
	fn fetch<'a>(
		&'a self,
		db: &'a Db,
		query: CatalogQuery,
	) -> BoxFuture<'a, color_eyre::Result<CatalogPage>>;
}

#[derive(Debug, Clone)]
pub struct CatalogQuery {
	pub query: Option<String>,
	pub variants: Vec<String>,
	pub city_id: i32,
	pub page: u32,
	pub limit: u32,
	pub sort: SortMode,
}

#[derive(Debug, Clone)]
pub struct CatalogPage {
	pub items: Vec<ProductHit>,
	pub total: u64,
}

#[derive(Debug)]
pub enum ServiceError {
	InvalidRequest { message: String },
	Engine { message: String },
	Store { message: String },
	Unavailable { page: u32, limit: u32, engine_error: Option<String>, store_error: String },
}

impl std::fmt::Display for ServiceError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::InvalidRequest { message } => write!(f, "Invalid request: {message}"),
			Self::Engine { message } => write!(f, "Engine request failed: {message}"),
			Self::Store { message } => write!(f, "Relational request failed: {message}"),
			Self::Unavailable { store_error, engine_error, .. } => match engine_error {
				Some(engine_error) => write!(
					f,
					"Search unavailable: engine failed ({engine_error}); relational fallback failed ({store_error})."
				),
				None => write!(f, "Search unavailable: relational path failed ({store_error})."),
			},
		}
	}
}

impl std::error::Error for ServiceError {}

impl From<sqlx::Error> for ServiceError {
	fn from(err: sqlx::Error) -> Self {
		Self::Store { message: err.to_string() }
	}
}

impl From<color_eyre::Report> for ServiceError {
	fn from(err: color_eyre::Report) -> Self {
		Self::Engine { message: err.to_string() }
	}
}

#[derive(Clone)]
pub struct Providers {
	pub engine: Arc<dyn EngineProvider>,
	pub catalog: Arc<dyn CatalogProvider>,
}

struct DefaultProviders;

impl EngineProvider for DefaultProviders {
	fn ping<'a>(
		&'a self,
		cfg: &'a vitrin_config::Engine,
	) -> BoxFuture<'a, color_eyre::Result<bool>> {
		Box::pin(vitrin_engine::ping(cfg))
	}

	fn cluster_health<'a>(
		&'a self,
		cfg: &'a vitrin_config::Engine,
		timeout: Duration,
	) -> BoxFuture<'a, color_eyre::Result<String>> {
		Box::pin(vitrin_engine::cluster_health(cfg, timeout))
	}

	fn search<'a>(
		&'a self,
		cfg: &'a vitrin_config::Engine,
		index: &'a str,
		body: Value,
	) -> BoxFuture<'a, color_eyre::Result<EngineHits>> {
		Box::pin(async move { vitrin_engine::search(cfg, index, &body).await })
	}
}

impl CatalogProvider for DefaultProviders {
	fn fetch<'a>(
		&'a self,
		db: &'a Db,
		query: CatalogQuery,
	) -> BoxFuture<'a, color_eyre::Result<CatalogPage>> {
		Box::pin(store_search::fetch(db, query))
	}
}

impl Providers {
	pub fn new(engine: Arc<dyn EngineProvider>, catalog: Arc<dyn CatalogProvider>) -> Self {
		Self { engine, catalog }
	}
}

impl Default for Providers {
	fn default() -> Self {
		let provider = Arc::new(DefaultProviders);

		Self { engine: provider.clone(), catalog: provider }
	}
}

pub struct SearchService {
	pub cfg: Config,
	pub db: Db,
	pub providers: Providers,
	pub health: HealthGate,
}

impl SearchService {
	pub fn new(cfg: Config, db: Db) -> Self {
		let health = HealthGate::new(cfg.health.clone());

		Self { cfg, db, providers: Providers::default(), health }
	}

	pub fn with_providers(cfg: Config, db: Db, providers: Providers) -> Self {
		let health = HealthGate::new(cfg.health.clone());

		Self { cfg, db, providers, health }
	}
}
