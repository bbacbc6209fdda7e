use std::sync::Arc;

use assay_service::AssayService;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<AssayService>,
}
impl AppState {
	/// Loads the corpus and builds the recommendation engine before any request is served.
	pub async fn new(config: assay_config::Config) -> color_eyre::Result<Self> {
		let rows = assay_corpus::load_corpus(&config.corpus)?;
		let service = AssayService::build(config, rows).await?;

		Ok(Self::from_service(service))
	}

	pub fn from_service(service: AssayService) -> Self {
		Self { service: Arc::new(service) }
	}
}
