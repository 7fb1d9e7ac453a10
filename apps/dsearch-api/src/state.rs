use std::sync::Arc;

use dsearch_service::{Providers, SearchService};

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<SearchService>,
}
impl AppState {
	pub fn new(config: &dsearch_config::Config) -> color_eyre::Result<Self> {
		let providers = Providers::from_config(config)?;
		let service = SearchService::new(&config.search, providers)?;

		Ok(Self::with_service(service))
	}

	pub fn with_service(service: SearchService) -> Self {
		Self { service: Arc::new(service) }
	}
}
