use std::sync::Arc;

use mailsense_service::MailsenseService;
use mailsense_storage::db::Db;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<MailsenseService>,
}
impl AppState {
	pub async fn new(config: mailsense_config::Config) -> color_eyre::Result<Self> {
		let db = Db::connect(&config.storage.postgres).await?;

		db.ensure_schema().await?;

		let service = MailsenseService::new(config, db);

		Ok(Self { service: Arc::new(service) })
	}

	pub fn with_service(service: MailsenseService) -> Self {
		Self { service: Arc::new(service) }
	}
}
