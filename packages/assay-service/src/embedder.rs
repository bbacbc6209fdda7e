use std::sync::Arc;

use assay_config::EmbeddingProviderConfig;

use crate::{EmbeddingProvider, Error, Result};

/// The single text encoder shared by the corpus index and incoming queries.
///
/// Every vector is checked against `providers.embedding.dimensions`, so the corpus and the
/// queries always live in the same space.
pub struct Embedder {
	provider: Arc<dyn EmbeddingProvider>,
	cfg: EmbeddingProviderConfig,
}
impl Embedder {
	pub fn new(provider: Arc<dyn EmbeddingProvider>, cfg: EmbeddingProviderConfig) -> Self {
		Self { provider, cfg }
	}

	pub fn dimensions(&self) -> usize {
		self.cfg.dimensions as usize
	}

	pub async fn encode(&self, text: &str) -> Result<Vec<f32>> {
		let mut vectors = self.encode_many(&[text.to_string()]).await?;

		vectors.pop().ok_or_else(|| Error::ModelUnavailable {
			message: "Embedding provider returned no vector.".to_string(),
		})
	}

	pub async fn encode_many(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
		let batch_size = (self.cfg.batch_size as usize).max(1);
		let mut out = Vec::with_capacity(texts.len());

		for batch in texts.chunks(batch_size) {
			let vectors = self.provider.embed(&self.cfg, batch).await?;

			if vectors.len() != batch.len() {
				return Err(Error::ModelUnavailable {
					message: format!(
						"Embedding provider returned {} vectors for {} inputs.",
						vectors.len(),
						batch.len()
					),
				});
			}

			for vector in &vectors {
				self.check_vector(vector)?;
			}

			out.extend(vectors);
		}

		Ok(out)
	}

	fn check_vector(&self, vector: &[f32]) -> Result<()> {
		if vector.len() != self.dimensions() {
			return Err(Error::ModelUnavailable {
				message: format!(
					"Embedding dimension mismatch: expected {}, got {}.",
					self.dimensions(),
					vector.len()
				),
			});
		}
		if vector.iter().any(|value| !value.is_finite()) {
			return Err(Error::ModelUnavailable {
				message: "Embedding contains a non-finite value.".to_string(),
			});
		}

		Ok(())
	}
}
