//! Request dispatch: engine-first, relational on degradation.
//!
//! Routing order per request: an empty query lists straight from the
//! relational store; otherwise the health gate decides whether to try the
//! engine at all, and an engine failure mid-flight falls back to the
//! relational path with diagnostics attached. Only the loss of both paths
//! is an error.

use serde_json::{Value, json};

use vitrin_domain::{SortMode, clamp_limit, clamp_page, parse};

use crate::{CatalogQuery, SearchService, ServiceError, ServiceResult};

#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SearchRequest {
	#[serde(default)]
	pub query: String,
	pub page: Option<u32>,
	pub limit: Option<u32>,
	#[serde(default)]
	pub city_id: i32,
	pub sort: Option<String>,
	pub requester_id: Option<String>,
}

/// A request after clamping. Every downstream path sees these values, so
/// the echoed `page`/`limit` always match what was actually queried.
#[derive(Debug, Clone)]
pub struct ValidRequest {
	pub query: String,
	pub page: u32,
	pub limit: u32,
	pub city_id: i32,
	pub sort: SortMode,
	pub requester_id: Option<String>,
}

impl SearchRequest {
	pub fn clamped(self, default_limit: u32) -> ValidRequest {
		ValidRequest {
			query: self.query.trim().to_string(),
			page: clamp_page(self.page),
			limit: clamp_limit(self.limit, default_limit),
			city_id: self.city_id,
			sort: self.sort.as_deref().map(SortMode::parse).unwrap_or_default(),
			requester_id: self.requester_id,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
	Engine,
	Relational,
	RelationalFallback,
}

#[derive(Debug, serde::Serialize)]
pub struct SearchData {
	pub products: Vec<vitrin_storage::models::ProductHit>,
	pub total: u64,
	pub page: u32,
	pub limit: u32,
	pub source: Source,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub diagnostics: Option<Value>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub search_variants: Option<Vec<String>>,
}

#[derive(Debug, serde::Serialize)]
pub struct SearchResponse {
	pub success: bool,
	pub data: SearchData,
}

impl SearchService {
	pub async fn search(&self, request: SearchRequest) -> ServiceResult<SearchResponse> {
		let req = request.clamped(self.cfg.search.default_limit);

		if req.query.is_empty() {
			return self.relational(&req, Source::Relational, None).await;
		}

		let engine_up = self
			.health
			.is_available(self.providers.engine.as_ref(), &self.cfg.storage.engine)
			.await;

		if !engine_up {
			tracing::debug!(
				query = %req.query,
				"Engine gated unavailable; serving from the relational path."
			);

			return self.relational(&req, Source::Relational, None).await;
		}

		let plan = parse(&req.query);

		match self.engine_search(&req, &plan).await {
			Ok(page) => Ok(SearchResponse {
				success: true,
				data: SearchData {
					products: page.items,
					total: page.total,
					page: req.page,
					limit: req.limit,
					source: Source::Engine,
					diagnostics: None,
					search_variants: None,
				},
			}),
			Err(engine_err) => {
				tracing::warn!(
					query = %req.query,
					error = %engine_err,
					"Engine search failed; falling back to the relational path."
				);

				let diagnostics = json!({
					"engine_error": engine_err.to_string(),
					"engine_health": self.health.snapshot().await,
				});

				self.relational(&req, Source::RelationalFallback, Some((engine_err, diagnostics)))
					.await
			},
		}
	}

	async fn relational(
		&self,
		req: &ValidRequest,
		source: Source,
		engine_failure: Option<(ServiceError, Value)>,
	) -> ServiceResult<SearchResponse> {
		let variants = if req.query.is_empty() {
			tracing::debug!(city_id = req.city_id, "Empty query; listing the catalog.");

			Vec::new()
		} else {
			vitrin_domain::generate(&req.query)
		};
		let catalog_query = CatalogQuery {
			query: (!req.query.is_empty()).then(|| req.query.clone()),
			variants: variants.clone(),
			city_id: req.city_id,
			page: req.page,
			limit: req.limit,
			sort: req.sort,
		};

		match self.providers.catalog.fetch(&self.db, catalog_query).await {
			Ok(page) => {
				let (diagnostics, search_variants) = match engine_failure {
					Some((_, diagnostics)) => (Some(diagnostics), Some(variants)),
					None => (None, None),
				};

				Ok(SearchResponse {
					success: true,
					data: SearchData {
						products: page.items,
						total: page.total,
						page: req.page,
						limit: req.limit,
						source,
						diagnostics,
						search_variants,
					},
				})
			},
			Err(store_err) => {
				tracing::error!(
					query = %req.query,
					error = %store_err,
					"Relational path failed; no path left to serve the request."
				);

				Err(ServiceError::Unavailable {
					page: req.page,
					limit: req.limit,
					engine_error: engine_failure.map(|(err, _)| err.to_string()),
					store_error: store_err.to_string(),
				})
			},
		}
	}
}
