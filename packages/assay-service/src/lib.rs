pub mod catalog;
pub mod embedder;
pub mod index;
pub mod ranking;
pub mod recommend;

mod error;

pub use catalog::MetadataCatalog;
pub use embedder::Embedder;
pub use error::{Error, Result};
pub use index::{CorpusIndex, HistoricalExample};
pub use recommend::RankedResult;

use std::{future::Future, pin::Pin, sync::Arc};

use assay_config::{BACKEND_LOCAL, Config, EmbeddingProviderConfig};
use assay_corpus::CorpusRow;
use assay_providers::embedding;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait EmbeddingProvider
where
	Self: Send + Sync,
{
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, assay_providers::Result<Vec<Vec<f32>>>>;
}

#[derive(Clone)]
pub struct Providers {
	pub embedding: Arc<dyn EmbeddingProvider>,
}

/// Recommends assessments for free-text queries from a corpus of historical examples.
///
/// The corpus index and the metadata catalog are built once and never mutated, so a shared
/// reference serves concurrent requests.
pub struct AssayService {
	pub cfg: Config,
	pub embedder: Embedder,
	pub index: CorpusIndex,
	pub catalog: MetadataCatalog,
}

struct HttpEmbedding;

impl EmbeddingProvider for HttpEmbedding {
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, assay_providers::Result<Vec<Vec<f32>>>> {
		Box::pin(embedding::embed(cfg, texts))
	}
}

#[cfg(feature = "local")]
impl EmbeddingProvider for assay_providers::local::LocalEmbedder {
	fn embed<'a>(
		&'a self,
		_cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, assay_providers::Result<Vec<Vec<f32>>>> {
		Box::pin(assay_providers::local::LocalEmbedder::embed(self, texts))
	}
}

impl Providers {
	pub fn new(embedding: Arc<dyn EmbeddingProvider>) -> Self {
		Self { embedding }
	}

	/// Picks the embedding backend named by `providers.embedding.backend`.
	pub fn from_config(cfg: &EmbeddingProviderConfig) -> Result<Self> {
		match cfg.backend.as_str() {
			BACKEND_LOCAL => local_providers(cfg),
			_ => Ok(Self::default()),
		}
	}
}

impl Default for Providers {
	fn default() -> Self {
		Self { embedding: Arc::new(HttpEmbedding) }
	}
}

impl AssayService {
	pub async fn build(cfg: Config, rows: Vec<CorpusRow>) -> Result<Self> {
		let providers = Providers::from_config(&cfg.providers.embedding)?;

		Self::build_with_providers(cfg, rows, providers).await
	}

	pub async fn build_with_providers(
		cfg: Config,
		rows: Vec<CorpusRow>,
		providers: Providers,
	) -> Result<Self> {
		let embedder = Embedder::new(providers.embedding, cfg.providers.embedding.clone());
		let index = CorpusIndex::build(rows, &embedder).await?;
		let catalog = MetadataCatalog::build(&index);

		tracing::info!(
			examples = index.len(),
			assessments = catalog.len(),
			model = %cfg.providers.embedding.model,
			"Recommendation engine ready."
		);

		Ok(Self { cfg, embedder, index, catalog })
	}

	pub fn from_parts(
		cfg: Config,
		embedder: Embedder,
		index: CorpusIndex,
		catalog: MetadataCatalog,
	) -> Self {
		Self { cfg, embedder, index, catalog }
	}
}

#[cfg(feature = "local")]
fn local_providers(cfg: &EmbeddingProviderConfig) -> Result<Providers> {
	let embedder = assay_providers::local::LocalEmbedder::new(cfg)?;

	Ok(Providers::new(Arc::new(embedder)))
}

#[cfg(not(feature = "local"))]
fn local_providers(_cfg: &EmbeddingProviderConfig) -> Result<Providers> {
	Err(Error::ModelUnavailable {
		message: "The local embedding backend requires the `local` feature.".to_string(),
	})
}
