use std::sync::Arc;

use vitrin_service::SearchService;
use vitrin_storage::db::Db;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<SearchService>,
}
impl AppState {
	pub async fn new(config: vitrin_config::Config) -> color_eyre::Result<Self> {
		let db = Db::connect(&config.storage.postgres).await?;

		db.ensure_schema().await?;

		let service = SearchService::new(config, db);

		Ok(Self { service: Arc::new(service) })
	}
}
