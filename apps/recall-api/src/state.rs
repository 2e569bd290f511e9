use std::sync::Arc;

use recall_service::RecallService;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<RecallService>,
}
impl AppState {
	pub fn new(config: recall_config::Config) -> color_eyre::Result<Self> {
		let service = RecallService::new(config)?;

		Ok(Self { service: Arc::new(service) })
	}
}
