//! In-process sentence embeddings backed by ONNX Runtime through `fastembed`.

use std::sync::{Arc, Mutex};

use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};

use crate::{Error, Result};

pub const DEFAULT_MODEL: &str = "all-MiniLM-L6-v2";

/// A loaded embedding model.
///
/// `TextEmbedding` needs exclusive access while encoding, so calls are serialized behind a mutex
/// and executed on the blocking thread pool.
#[derive(Clone)]
pub struct LocalEmbedder {
	model: Arc<Mutex<TextEmbedding>>,
	batch_size: usize,
}
impl LocalEmbedder {
	pub fn new(cfg: &assay_config::EmbeddingProviderConfig) -> Result<Self> {
		let model = resolve_model(&cfg.model)?;
		let options = InitOptions::new(model).with_show_download_progress(false);
		let embedding = TextEmbedding::try_new(options)
			.map_err(|err| Error::Model { message: err.to_string() })?;

		tracing::info!(model = %cfg.model, "Local embedding model loaded.");

		Ok(Self { model: Arc::new(Mutex::new(embedding)), batch_size: cfg.batch_size as usize })
	}

	pub async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
		if texts.is_empty() {
			return Ok(Vec::new());
		}

		let model = Arc::clone(&self.model);
		let texts = texts.to_vec();
		let batch_size = Some(self.batch_size.max(1));

		tokio::task::spawn_blocking(move || {
			let mut model = model.lock().unwrap_or_else(|err| err.into_inner());

			model.embed(texts, batch_size).map_err(|err| Error::Model { message: err.to_string() })
		})
		.await
		.map_err(|err| Error::Model { message: format!("Embedding task failed: {err}") })?
	}
}

fn resolve_model(name: &str) -> Result<EmbeddingModel> {
	let normalized = name.trim().to_ascii_lowercase();
	let short = normalized.rsplit('/').next().unwrap_or(normalized.as_str());

	match short.trim_end_matches("-onnx") {
		"all-minilm-l6-v2" => Ok(EmbeddingModel::AllMiniLML6V2),
		"all-minilm-l12-v2" => Ok(EmbeddingModel::AllMiniLML12V2),
		"bge-small-en-v1.5" => Ok(EmbeddingModel::BGESmallENV15),
		"bge-base-en-v1.5" => Ok(EmbeddingModel::BGEBaseENV15),
		"nomic-embed-text-v1.5" => Ok(EmbeddingModel::NomicEmbedTextV15),
		_ => Err(Error::InvalidConfig {
			message: format!("Unsupported local embedding model {name:?}."),
		}),
	}
}
