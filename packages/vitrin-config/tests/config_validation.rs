use vitrin_config::{Config, Engine, Health, Postgres, Search, Service, Storage, validate};

fn valid_config() -> Config {
	Config {
		service: Service {
			http_bind: "127.0.0.1:8080".to_string(),
			log_level: "info".to_string(),
		},
		storage: Storage {
			postgres: Postgres {
				dsn: "postgres://localhost/vitrin".to_string(),
				pool_max_conns: 4,
			},
			engine: Engine {
				url: "http://127.0.0.1:9200".to_string(),
				index: "products".to_string(),
				request_timeout_ms: 3_000,
				ping_timeout_ms: 1_000,
			},
		},
		search: Search::default(),
		health: Health::default(),
	}
}

#[test]
fn default_config_passes_validation() {
	assert!(validate(&valid_config()).is_ok());
}

#[test]
fn empty_dsn_is_rejected() {
	let mut cfg = valid_config();
	cfg.storage.postgres.dsn = "  ".to_string();
	assert!(validate(&cfg).is_err());
}

#[test]
fn zero_pool_size_is_rejected() {
	let mut cfg = valid_config();
	cfg.storage.postgres.pool_max_conns = 0;
	assert!(validate(&cfg).is_err());
}

#[test]
fn empty_engine_url_is_rejected() {
	let mut cfg = valid_config();
	cfg.storage.engine.url = String::new();
	assert!(validate(&cfg).is_err());
}

#[test]
fn oversized_default_limit_is_rejected() {
	let mut cfg = valid_config();
	cfg.search.default_limit = 101;
	assert!(validate(&cfg).is_err());
}

#[test]
fn inverted_ttls_are_rejected() {
	let mut cfg = valid_config();
	cfg.health.unhealthy_ttl_secs = 120;
	assert!(validate(&cfg).is_err());
}

#[test]
fn backoff_shorter_than_unhealthy_ttl_is_rejected() {
	let mut cfg = valid_config();
	cfg.health.backoff_interval_secs = 1;
	assert!(validate(&cfg).is_err());
}

#[test]
fn minimal_toml_applies_section_defaults() {
	let raw = r#"
[service]
http_bind = "127.0.0.1:8080"
log_level = "info"

[storage.postgres]
dsn = "postgres://localhost/vitrin"
pool_max_conns = 4

[storage.engine]
url = "http://127.0.0.1:9200"
index = "products"
"#;
	let cfg: Config = toml::from_str(raw).expect("minimal config parses");
	assert_eq!(cfg.search.default_limit, 20);
	assert_eq!(cfg.health.healthy_ttl_secs, 60);
	assert_eq!(cfg.health.unhealthy_ttl_secs, 10);
	assert_eq!(cfg.health.backoff_interval_secs, 50);
	assert!(validate(&cfg).is_ok());
}
