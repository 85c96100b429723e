use std::collections::HashMap;

use time::OffsetDateTime;
use uuid::Uuid;

/// A catalog row. The service layer does not interpret fields beyond
/// external_id/code/name, which drive relevance scoring; everything else is
/// carried through to the caller untouched.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, sqlx::FromRow)]
pub struct Product {
	pub product_id: Uuid,
	pub external_id: String,
	pub code: String,
	pub name: String,
	pub description: Option<String>,
	pub brand: Option<String>,
	pub category: Option<String>,
	pub city_id: i32,
	pub popularity: i64,
	pub in_stock: bool,
	#[serde(with = "time::serde::rfc3339")]
	pub created_at: OffsetDateTime,
}

/// A product plus the score injected by whichever path produced it, and
/// highlight spans when the engine supplied them.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ProductHit {
	#[serde(flatten)]
	pub product: Product,
	pub relevance_score: f32,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub highlights: Option<HashMap<String, Vec<String>>>,
}
