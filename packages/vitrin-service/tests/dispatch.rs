//! Routing matrix for the dispatcher, exercised with scripted providers and
//! a lazy pool that never touches a real database.

use std::sync::{
	Arc,
	atomic::{AtomicU32, Ordering},
};

use serde_json::Value;
use sqlx::postgres::PgPoolOptions;

use vitrin_engine::{EngineHit, EngineHits};
use vitrin_service::{
	BoxFuture, CatalogPage, CatalogProvider, CatalogQuery, EngineProvider, Providers,
	SearchRequest, SearchService, ServiceError, Source,
};
use vitrin_storage::db::Db;

struct ScriptedEngine {
	ping_ok: bool,
	search_ok: bool,
	pings: AtomicU32,
	searches: AtomicU32,
}

impl ScriptedEngine {
	fn new(ping_ok: bool, search_ok: bool) -> Self {
		Self { ping_ok, search_ok, pings: AtomicU32::new(0), searches: AtomicU32::new(0) }
	}
}

impl EngineProvider for ScriptedEngine {
	fn ping<'a>(
		&'a self,
		_cfg: &'a vitrin_config::Engine,
	) -> BoxFuture<'a, color_eyre::Result<bool>> {
		self.pings.fetch_add(1, Ordering::SeqCst);

		Box::pin(async move { Ok(self.ping_ok) })
	}

	fn cluster_health<'a>(
		&'a self,
		_cfg: &'a vitrin_config::Engine,
		_timeout: std::time::Duration,
	) -> BoxFuture<'a, color_eyre::Result<String>> {
		Box::pin(async move { Ok("green".to_string()) })
	}

	fn search<'a>(
		&'a self,
		_cfg: &'a vitrin_config::Engine,
		_index: &'a str,
		_body: Value,
	) -> BoxFuture<'a, color_eyre::Result<EngineHits>> {
		self.searches.fetch_add(1, Ordering::SeqCst);

		Box::pin(async move {
			if self.search_ok {
				Ok(EngineHits {
					hits: vec![EngineHit {
						source: product_json("SKU-1"),
						score: Some(4.2),
						highlight: None,
					}],
					total: 1,
					max_score: Some(4.2),
				})
			} else {
				Err(color_eyre::eyre::eyre!("engine timed out"))
			}
		})
	}
}

struct ScriptedCatalog {
	ok: bool,
	calls: AtomicU32,
	last_query: std::sync::Mutex<Option<CatalogQuery>>,
}

impl ScriptedCatalog {
	fn new(ok: bool) -> Self {
		Self { ok, calls: AtomicU32::new(0), last_query: std::sync::Mutex::new(None) }
	}
}

impl CatalogProvider for ScriptedCatalog {
	fn fetch<'a>(
		&'a self,
		_db: &'a Db,
		query: CatalogQuery,
	) -> BoxFuture<'a, color_eyre::Result<CatalogPage>> {
		self.calls.fetch_add(1, Ordering::SeqCst);
		*self.last_query.lock().unwrap() = Some(query);

		Box::pin(async move {
			if self.ok {
				Ok(CatalogPage { items: Vec::new(), total: 0 })
			} else {
				Err(color_eyre::eyre::eyre!("connection refused"))
			}
		})
	}
}

fn product_json(external_id: &str) -> Value {
	serde_json::json!({
		"product_id": "4f6f26a1-9d9c-4b3a-8a68-1c8f8a2f1b11",
		"external_id": external_id,
		"code": "C-1",
		"name": "Milk",
		"description": null,
		"brand": null,
		"category": null,
		"city_id": 7,
		"popularity": 12,
		"in_stock": true,
		"created_at": "2024-01-01T00:00:00Z"
	})
}

fn config() -> vitrin_config::Config {
	vitrin_config::Config {
		service: vitrin_config::Service {
			http_bind: "127.0.0.1:0".to_string(),
			log_level: "info".to_string(),
		},
		storage: vitrin_config::Storage {
			postgres: vitrin_config::Postgres {
				dsn: "postgres://127.0.0.1:1/never_connected".to_string(),
				pool_max_conns: 1,
			},
			engine: vitrin_config::Engine {
				url: "http://127.0.0.1:9200".to_string(),
				index: "products".to_string(),
				request_timeout_ms: 3_000,
				ping_timeout_ms: 1_000,
			},
		},
		search: vitrin_config::Search::default(),
		health: vitrin_config::Health::default(),
	}
}

fn service(engine: Arc<ScriptedEngine>, catalog: Arc<ScriptedCatalog>) -> SearchService {
	let pool = PgPoolOptions::new()
		.connect_lazy("postgres://127.0.0.1:1/never_connected")
		.expect("lazy pool");

	SearchService::with_providers(
		config(),
		Db::from_pool(pool),
		Providers::new(engine, catalog),
	)
}

fn request(query: &str) -> SearchRequest {
	SearchRequest {
		query: query.to_string(),
		page: None,
		limit: None,
		city_id: 7,
		sort: None,
		requester_id: None,
	}
}

#[tokio::test]
async fn empty_query_lists_from_the_store_without_probing() {
	let engine = Arc::new(ScriptedEngine::new(true, true));
	let catalog = Arc::new(ScriptedCatalog::new(true));
	let service = service(engine.clone(), catalog.clone());

	let response = service.search(request("   ")).await.expect("search failed");

	assert_eq!(response.data.source, Source::Relational);
	assert_eq!(engine.pings.load(Ordering::SeqCst), 0);
	assert_eq!(catalog.calls.load(Ordering::SeqCst), 1);

	let query = catalog.last_query.lock().unwrap().clone().expect("catalog query");

	assert!(query.query.is_none());
	assert!(query.variants.is_empty());
}

#[tokio::test]
async fn healthy_engine_serves_the_request() {
	let engine = Arc::new(ScriptedEngine::new(true, true));
	let catalog = Arc::new(ScriptedCatalog::new(true));
	let service = service(engine.clone(), catalog.clone());

	let response = service.search(request("молоко")).await.expect("search failed");

	assert_eq!(response.data.source, Source::Engine);
	assert_eq!(response.data.total, 1);
	assert_eq!(response.data.products[0].product.external_id, "SKU-1");
	assert!(response.data.diagnostics.is_none());
	assert_eq!(catalog.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn gated_unavailable_engine_is_never_searched() {
	let engine = Arc::new(ScriptedEngine::new(false, true));
	let catalog = Arc::new(ScriptedCatalog::new(true));
	let service = service(engine.clone(), catalog.clone());

	let response = service.search(request("молоко")).await.expect("search failed");

	assert_eq!(response.data.source, Source::Relational);
	assert!(response.data.diagnostics.is_none());
	assert_eq!(engine.searches.load(Ordering::SeqCst), 0);
	assert_eq!(catalog.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn mid_flight_engine_failure_falls_back_with_diagnostics() {
	let engine = Arc::new(ScriptedEngine::new(true, false));
	let catalog = Arc::new(ScriptedCatalog::new(true));
	let service = service(engine.clone(), catalog.clone());

	let response = service.search(request("молоко")).await.expect("search failed");

	assert_eq!(response.data.source, Source::RelationalFallback);

	let diagnostics = response.data.diagnostics.expect("diagnostics missing");

	assert!(diagnostics["engine_error"].as_str().unwrap().contains("engine timed out"));
	assert!(diagnostics["engine_health"].is_object());

	let variants = response.data.search_variants.expect("variants missing");

	assert!(variants.contains(&"молоко".to_string()));

	let query = catalog.last_query.lock().unwrap().clone().expect("catalog query");

	assert_eq!(query.query.as_deref(), Some("молоко"));
	assert!(!query.variants.is_empty());
}

#[tokio::test]
async fn both_paths_failing_is_unavailable_with_the_clamped_page() {
	let engine = Arc::new(ScriptedEngine::new(true, false));
	let catalog = Arc::new(ScriptedCatalog::new(false));
	let service = service(engine, catalog);

	let mut req = request("молоко");
	req.page = Some(2);
	req.limit = Some(10);

	let err = service.search(req).await.expect_err("should be unavailable");

	match err {
		ServiceError::Unavailable { page, limit, engine_error, store_error } => {
			assert_eq!(page, 2);
			assert_eq!(limit, 10);
			assert!(engine_error.expect("engine error missing").contains("engine timed out"));
			assert!(store_error.contains("connection refused"));
		},
		other => panic!("unexpected error: {other}"),
	}
}

#[tokio::test]
async fn store_failure_on_listing_has_no_engine_error() {
	let engine = Arc::new(ScriptedEngine::new(true, true));
	let catalog = Arc::new(ScriptedCatalog::new(false));
	let service = service(engine, catalog);

	let err = service.search(request("")).await.expect_err("should be unavailable");

	match err {
		ServiceError::Unavailable { engine_error, .. } => assert!(engine_error.is_none()),
		other => panic!("unexpected error: {other}"),
	}
}

#[tokio::test]
async fn out_of_range_pagination_is_clamped_before_dispatch() {
	let engine = Arc::new(ScriptedEngine::new(true, true));
	let catalog = Arc::new(ScriptedCatalog::new(true));
	let service = service(engine, catalog.clone());

	let mut req = request("");
	req.page = Some(0);
	req.limit = Some(10_000);

	let response = service.search(req).await.expect("search failed");

	assert_eq!(response.data.page, 1);
	assert_eq!(response.data.limit, 100);

	let query = catalog.last_query.lock().unwrap().clone().expect("catalog query");

	assert_eq!(query.page, 1);
	assert_eq!(query.limit, 100);
}
