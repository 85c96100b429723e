use std::collections::HashMap;

use color_eyre::{Result, eyre};
use serde_json::Value;

#[derive(Debug, Clone)]
pub struct EngineHits {
	pub hits: Vec<EngineHit>,
	pub total: u64,
	pub max_score: Option<f32>,
}

#[derive(Debug, Clone)]
pub struct EngineHit {
	pub source: Value,
	pub score: Option<f32>,
	pub highlight: Option<HashMap<String, Vec<String>>>,
}

/// Executes a ranked search request. The body is the full engine query DSL;
/// the request-level timeout bounds how long a slow engine is waited out.
pub async fn search(cfg: &vitrin_config::Engine, index: &str, body: &Value) -> Result<EngineHits> {
	let client = crate::client(cfg.request_timeout_ms)?;
	let url = format!("{}/{index}/_search", cfg.url);
	let res = client.post(url).json(body).send().await?;
	let json: Value = res.error_for_status()?.json().await?;

	parse_hits(json)
}

fn parse_hits(json: Value) -> Result<EngineHits> {
	let hits_obj = json
		.get("hits")
		.ok_or_else(|| eyre::eyre!("Search response is missing the hits object."))?;
	// Engines report the total either as a bare integer or as
	// { "value": n, "relation": ... }.
	let total = match hits_obj.get("total") {
		Some(Value::Number(n)) => n.as_u64().unwrap_or(0),
		Some(Value::Object(map)) =>
			map.get("value").and_then(|value| value.as_u64()).unwrap_or(0),
		_ => 0,
	};
	let max_score =
		hits_obj.get("max_score").and_then(|score| score.as_f64()).map(|score| score as f32);
	let raw_hits = hits_obj
		.get("hits")
		.and_then(|hits| hits.as_array())
		.ok_or_else(|| eyre::eyre!("Search response is missing the hits array."))?;

	let mut hits = Vec::with_capacity(raw_hits.len());

	for raw in raw_hits {
		let source = raw
			.get("_source")
			.cloned()
			.ok_or_else(|| eyre::eyre!("Search hit is missing _source."))?;
		let score = raw.get("_score").and_then(|score| score.as_f64()).map(|score| score as f32);
		let highlight = raw.get("highlight").and_then(parse_highlight);

		hits.push(EngineHit { source, score, highlight });
	}

	Ok(EngineHits { hits, total, max_score })
}

fn parse_highlight(raw: &Value) -> Option<HashMap<String, Vec<String>>> {
	let map = raw.as_object()?;
	let mut out = HashMap::with_capacity(map.len());

	for (field, fragments) in map {
		let fragments = fragments
			.as_array()?
			.iter()
			.filter_map(|fragment| fragment.as_str().map(|text| text.to_string()))
			.collect::<Vec<_>>();

		out.insert(field.clone(), fragments);
	}

	Some(out)
}
