//! Relational search path.
//!
//! Two modes share one WHERE builder: listing (no query) pages the city's
//! catalog, matching ORs every query variant across the identifier and text
//! columns. The count and the page run in one transaction so the reported
//! total and the returned rows come from the same snapshot.

use sqlx::{Postgres, QueryBuilder};

use vitrin_domain::SortMode;
use vitrin_storage::{
	db::Db,
	models::{Product, ProductHit},
};

use crate::{CatalogPage, CatalogQuery};

#[derive(sqlx::FromRow)]
struct ScoredRow {
	#[sqlx(flatten)]
	product: Product,
	relevance_score: f32,
}

pub(crate) async fn fetch(db: &Db, q: CatalogQuery) -> color_eyre::Result<CatalogPage> {
	let mut tx = db.pool.begin().await?;
	let mut count = QueryBuilder::new("SELECT count(*) FROM products");

	push_where(&mut count, &q);

	let total: i64 = count.build_query_scalar().fetch_one(&mut *tx).await?;
	let mut select = select_builder(&q);
	let rows: Vec<ScoredRow> = select.build_query_as().fetch_all(&mut *tx).await?;

	tx.commit().await?;

	let items = rows
		.into_iter()
		.map(|row| ProductHit {
			product: row.product,
			relevance_score: row.relevance_score,
			highlights: None,
		})
		.collect();

	Ok(CatalogPage { items, total: total as u64 })
}

fn select_builder<'a>(q: &'a CatalogQuery) -> QueryBuilder<'a, Postgres> {
	let mut builder = QueryBuilder::new(
		"SELECT product_id, external_id, code, name, description, brand, category, city_id, \
		 popularity, in_stock, created_at, ",
	);

	push_score(&mut builder, q.query.as_deref());
	builder.push(" AS relevance_score FROM products");
	push_where(&mut builder, q);
	push_order(&mut builder, q);
	builder.push(" LIMIT ");
	builder.push_bind(q.limit as i64);
	builder.push(" OFFSET ");
	builder.push_bind((q.page as i64 - 1) * q.limit as i64);

	builder
}

/// Tiered relevance. Scored against the caller's original query, not the
/// generated variants, so a literal identifier match always outranks a
/// variant-only match.
fn push_score<'a>(builder: &mut QueryBuilder<'a, Postgres>, query: Option<&'a str>) {
	let Some(query) = query else {
		builder.push("1.0::real");

		return;
	};
	let prefix = format!("{}%", escape_like(query));
	let substring = format!("%{}%", escape_like(query));

	builder.push("(CASE WHEN lower(external_id) = lower(");
	builder.push_bind(query);
	builder.push(") THEN 1000 WHEN lower(code) = lower(");
	builder.push_bind(query);
	builder.push(") THEN 900 WHEN external_id ILIKE ");
	builder.push_bind(prefix.clone());
	builder.push(" THEN 100 WHEN code ILIKE ");
	builder.push_bind(prefix.clone());
	builder.push(" THEN 90 WHEN lower(name) = lower(");
	builder.push_bind(query);
	builder.push(") THEN 80 WHEN name ILIKE ");
	builder.push_bind(prefix);
	builder.push(" THEN 50 WHEN name ILIKE ");
	builder.push_bind(substring);
	builder.push(" THEN 30 ELSE 1 END)::real");
}

fn push_where<'a>(builder: &mut QueryBuilder<'a, Postgres>, q: &'a CatalogQuery) {
	builder.push(" WHERE city_id = ");
	builder.push_bind(q.city_id);

	if q.query.is_none() || q.variants.is_empty() {
		return;
	}

	builder.push(" AND (");

	for (i, variant) in q.variants.iter().enumerate() {
		if i > 0 {
			builder.push(" OR ");
		}

		let prefix = format!("{}%", escape_like(variant));
		let substring = format!("%{}%", escape_like(variant));

		builder.push("lower(external_id) = lower(");
		builder.push_bind(variant.as_str());
		builder.push(") OR lower(code) = lower(");
		builder.push_bind(variant.as_str());
		builder.push(") OR external_id ILIKE ");
		builder.push_bind(prefix.clone());
		builder.push(" OR code ILIKE ");
		builder.push_bind(prefix);
		builder.push(" OR name ILIKE ");
		builder.push_bind(substring.clone());
		builder.push(" OR description ILIKE ");
		builder.push_bind(substring.clone());
		builder.push(" OR brand ILIKE ");
		builder.push_bind(substring);
	}

	builder.push(")");
}

fn push_order(builder: &mut QueryBuilder<'_, Postgres>, q: &CatalogQuery) {
	// No popularity column ranking here; recency stands in for it on the
	// relational path.
	let clause = match (q.query.is_some(), q.sort) {
		(_, SortMode::Name) => " ORDER BY name ASC",
		(_, SortMode::ExternalId) => " ORDER BY external_id ASC",
		(_, SortMode::Popularity) => " ORDER BY created_at DESC",
		(false, SortMode::Relevance) => " ORDER BY created_at DESC",
		(true, SortMode::Relevance) => " ORDER BY relevance_score DESC, name ASC",
	};

	builder.push(clause);
}

fn escape_like(raw: &str) -> String {
	raw.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")
}
