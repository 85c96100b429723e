//! Engine search path: builds the ranked request and maps the hits.
//!
//! Failures here are hard failures propagated to the dispatcher; falling
//! back is never this module's decision.

use serde_json::{Value, json};

use vitrin_domain::{QueryPlan, SortMode};
use vitrin_storage::models::{Product, ProductHit};

use crate::{CatalogPage, SearchService, ServiceError, ServiceResult, search::ValidRequest};

impl SearchService {
	pub(crate) async fn engine_search(
		&self,
		req: &ValidRequest,
		plan: &QueryPlan,
	) -> ServiceResult<CatalogPage> {
		let engine_cfg = &self.cfg.storage.engine;
		let body = build_query_body(
			&req.query,
			plan,
			req.city_id,
			req.page,
			req.limit,
			req.sort,
			engine_cfg.request_timeout_ms,
		);
		let hits = self
			.providers
			.engine
			.search(engine_cfg, &engine_cfg.index, body)
			.await
			.map_err(|err| ServiceError::Engine { message: err.to_string() })?;
		let total = hits.total;
		let items = map_hits(hits);

		Ok(CatalogPage { items, total })
	}
}

/// Assembles the ranked request. Clause weights are additive priorities
/// inside one `bool.should`; stock and popularity multiply the combined
/// score afterwards so a zero-popularity item is never zeroed out.
pub(crate) fn build_query_body(
	query: &str,
	plan: &QueryPlan,
	city_id: i32,
	page: u32,
	limit: u32,
	sort: SortMode,
	timeout_ms: u64,
) -> Value {
	let offset = (page - 1) as u64 * limit as u64;
	let ranked = if query.is_empty() {
		json!({ "match_all": {} })
	} else {
		let mut should = vec![
			json!({ "term": { "external_id": { "value": query, "boost": 1000 } } }),
			json!({ "term": { "code": { "value": query, "boost": 900 } } }),
			json!({ "match_phrase": { "name": { "query": query, "boost": 500 } } }),
			json!({ "match": { "name": {
				"query": query, "operator": "and", "fuzziness": "AUTO", "boost": 200
			} } }),
			json!({ "match": { "name": {
				"query": query, "minimum_should_match": "75%", "fuzziness": "AUTO", "boost": 100
			} } }),
			json!({ "match": { "brand": { "query": query, "fuzziness": "AUTO", "boost": 80 } } }),
			json!({ "match": { "category": { "query": query, "boost": 50 } } }),
			json!({ "wildcard": { "external_id": {
				"value": format!("*{}*", query.to_lowercase()), "boost": 150
			} } }),
			json!({ "match": { "name.autocomplete": { "query": query, "boost": 60 } } }),
			json!({ "multi_match": {
				"query": query,
				"fields": ["name", "description", "brand", "code"],
				"boost": 30
			} }),
			json!({ "nested": {
				"path": "attributes",
				"query": { "match": { "attributes.value": { "query": query, "boost": 40 } } }
			} }),
		];

		for phrase in &plan.exact_phrases {
			should.push(json!({ "match_phrase": { "name": { "query": phrase, "boost": 500 } } }));
		}

		json!({
			"function_score": {
				"query": {
					"bool": {
						"should": should,
						"minimum_should_match": 1,
						"filter": [{ "term": { "city_id": city_id } }]
					}
				},
				"functions": [
					{ "filter": { "term": { "in_stock": true } }, "weight": 1.5 },
					{ "field_value_factor": {
						"field": "popularity", "modifier": "log1p", "missing": 0
					} }
				],
				"score_mode": "multiply",
				"boost_mode": "multiply"
			}
		})
	};

	json!({
		"from": offset,
		"size": limit,
		"timeout": format!("{timeout_ms}ms"),
		"track_total_hits": true,
		"query": ranked,
		"sort": sort_clause(query, sort),
		"highlight": {
			"fields": {
				"name": { "number_of_fragments": 0 },
				"external_id": { "number_of_fragments": 0 },
				"brand": { "number_of_fragments": 0 },
				"description": { "fragment_size": 150, "number_of_fragments": 2 }
			}
		}
	})
}

fn sort_clause(query: &str, sort: SortMode) -> Value {
	match sort {
		SortMode::Name => json!([{ "name.keyword": "asc" }]),
		SortMode::ExternalId => json!([{ "external_id": "asc" }]),
		SortMode::Popularity => json!([{ "popularity": "desc" }]),
		SortMode::Relevance if query.is_empty() => json!([{ "popularity": "desc" }]),
		SortMode::Relevance => {
			json!([{ "_score": "desc" }, { "in_stock": "desc" }, { "popularity": "desc" }])
		},
	}
}

/// Hits whose source does not deserialize into a catalog record are dropped
/// with a warning instead of failing the whole page.
fn map_hits(hits: vitrin_engine::EngineHits) -> Vec<ProductHit> {
	let mut items = Vec::with_capacity(hits.hits.len());

	for hit in hits.hits {
		let product: Product = match serde_json::from_value(hit.source) {
			Ok(product) => product,
			Err(err) => {
				tracing::warn!(error = %err, "Engine hit does not match the catalog record shape.");

				continue;
			},
		};

		items.push(ProductHit {
			product,
			relevance_score: hit.score.unwrap_or(0.0),
			highlights: hit.highlight,
		});
	}

	items
}
