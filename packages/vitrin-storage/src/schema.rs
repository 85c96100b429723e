pub fn render_schema() -> &'static str {
	"\
CREATE TABLE IF NOT EXISTS products (
	product_id UUID PRIMARY KEY,
	external_id TEXT NOT NULL,
	code TEXT NOT NULL,
	name TEXT NOT NULL,
	description TEXT,
	brand TEXT,
	category TEXT,
	city_id INTEGER NOT NULL,
	popularity BIGINT NOT NULL DEFAULT 0,
	in_stock BOOLEAN NOT NULL DEFAULT FALSE,
	created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
CREATE UNIQUE INDEX IF NOT EXISTS products_external_id_city ON products (external_id, city_id);
CREATE INDEX IF NOT EXISTS products_city ON products (city_id);
CREATE INDEX IF NOT EXISTS products_name_lower ON products (lower(name));
CREATE INDEX IF NOT EXISTS products_code ON products (code)"
}
