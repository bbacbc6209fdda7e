mod error;

pub use error::{Error, Result};

use std::{
	collections::HashMap,
	env, fs,
	path::{Path, PathBuf},
	sync::{
		Mutex,
		atomic::{AtomicU64, Ordering},
	},
	time::{SystemTime, UNIX_EPOCH},
};

use serde_json::{Map, Value};

use assay_config::{
	BACKEND_HTTP, Config, Corpus, EmbeddingProviderConfig, Providers, Ranking, Service,
};
use assay_corpus::CorpusRow;
use assay_service::{BoxFuture, EmbeddingProvider};

/// Returns fixed vectors per text. Unknown texts embed as the zero vector.
pub struct TableEmbedding {
	dimensions: usize,
	vectors: HashMap<String, Vec<f32>>,
}
impl TableEmbedding {
	pub fn new(dimensions: usize) -> Self {
		Self { dimensions, vectors: HashMap::new() }
	}

	pub fn with(mut self, text: &str, vector: Vec<f32>) -> Self {
		self.vectors.insert(text.to_string(), vector);

		self
	}

	/// Two-dimensional table where each text's cosine similarity with `query` is its score.
	pub fn with_scores(query: &str, scores: &[(&str, f32)]) -> Self {
		scores.iter().fold(Self::new(2).with(query, vec![1.0, 0.0]), |table, (text, score)| {
			table.with(text, vec![*score, (1.0 - score * score).max(0.0).sqrt()])
		})
	}
}
impl EmbeddingProvider for TableEmbedding {
	fn embed<'a>(
		&'a self,
		_cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, assay_providers::Result<Vec<Vec<f32>>>> {
		let vectors: Vec<Vec<f32>> = texts
			.iter()
			.map(|text| self.vectors.get(text).cloned().unwrap_or_else(|| vec![0.0; self.dimensions]))
			.collect();

		Box::pin(async move { Ok(vectors) })
	}
}

/// Deterministic bag-of-words embedding: texts sharing words get similar vectors.
pub struct HashingEmbedding {
	dimensions: usize,
}
impl HashingEmbedding {
	pub fn new(dimensions: usize) -> Self {
		Self { dimensions }
	}

	pub fn vector(&self, text: &str) -> Vec<f32> {
		let mut vector = vec![0.0_f32; self.dimensions];

		for token in text
			.split(|c: char| !c.is_alphanumeric())
			.filter(|token| !token.is_empty())
			.map(str::to_lowercase)
		{
			let hash = fnv1a(token.as_bytes());
			let bucket = (hash % self.dimensions as u64) as usize;
			let sign = if hash >> 63 == 0 { 1.0 } else { -1.0 };

			vector[bucket] += sign;
		}

		let norm = vector.iter().map(|value| value * value).sum::<f32>().sqrt();

		if norm > 0.0 {
			vector.iter_mut().for_each(|value| *value /= norm);
		}

		vector
	}
}
impl EmbeddingProvider for HashingEmbedding {
	fn embed<'a>(
		&'a self,
		_cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, assay_providers::Result<Vec<Vec<f32>>>> {
		let vectors: Vec<Vec<f32>> = texts.iter().map(|text| self.vector(text)).collect();

		Box::pin(async move { Ok(vectors) })
	}
}

/// Always fails, as an unreachable model endpoint would.
pub struct FailingEmbedding;
impl EmbeddingProvider for FailingEmbedding {
	fn embed<'a>(
		&'a self,
		_cfg: &'a EmbeddingProviderConfig,
		_texts: &'a [String],
	) -> BoxFuture<'a, assay_providers::Result<Vec<Vec<f32>>>> {
		let result: assay_providers::Result<Vec<Vec<f32>>> =
			Err(assay_providers::Error::Model { message: "model offline".to_string() });

		Box::pin(async move { result })
	}
}

/// Wraps another provider and records the size of every batch it receives.
pub struct RecordingEmbedding<P> {
	inner: P,
	batches: Mutex<Vec<usize>>,
}
impl<P> RecordingEmbedding<P> {
	pub fn new(inner: P) -> Self {
		Self { inner, batches: Mutex::new(Vec::new()) }
	}

	pub fn batches(&self) -> Vec<usize> {
		self.batches.lock().unwrap_or_else(|err| err.into_inner()).clone()
	}
}
impl<P> EmbeddingProvider for RecordingEmbedding<P>
where
	P: EmbeddingProvider,
{
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, assay_providers::Result<Vec<Vec<f32>>>> {
		self.batches.lock().unwrap_or_else(|err| err.into_inner()).push(texts.len());

		self.inner.embed(cfg, texts)
	}
}

/// A JSON corpus file removed on drop.
pub struct TempCorpus {
	path: PathBuf,
}
impl TempCorpus {
	pub fn write(rows: &[(&str, &str)]) -> Result<Self> {
		let payload: Vec<Value> = rows
			.iter()
			.map(|(query, assessment_ref)| {
				let mut object = Map::new();

				object.insert("Query".to_string(), Value::String(query.to_string()));
				object.insert(
					"Assessment_url".to_string(),
					Value::String(assessment_ref.to_string()),
				);

				Value::Object(object)
			})
			.collect();
		let path = temp_path("json");

		fs::write(&path, serde_json::to_string(&payload)?)?;

		Ok(Self { path })
	}

	pub fn path(&self) -> &Path {
		&self.path
	}
}
impl Drop for TempCorpus {
	fn drop(&mut self) {
		let _ = fs::remove_file(&self.path);
	}
}

/// A complete configuration for an http backend with the given embedding dimensions.
pub fn test_config(dimensions: u32) -> Config {
	Config {
		service: Service { http_bind: "127.0.0.1:0".to_string(), log_level: "info".to_string() },
		corpus: Corpus {
			path: PathBuf::from("corpus.json"),
			sheet: None,
			query_column: "Query".to_string(),
			ref_column: "Assessment_url".to_string(),
		},
		providers: Providers {
			embedding: EmbeddingProviderConfig {
				backend: BACKEND_HTTP.to_string(),
				provider_id: "test".to_string(),
				api_base: "http://127.0.0.1:9".to_string(),
				api_key: "test-key".to_string(),
				path: "/embeddings".to_string(),
				model: "test-embedding".to_string(),
				dimensions,
				timeout_ms: 1_000,
				batch_size: 64,
				default_headers: Map::new(),
			},
		},
		ranking: Ranking::default(),
	}
}

pub fn corpus_rows(pairs: &[(&str, &str)]) -> Vec<CorpusRow> {
	pairs
		.iter()
		.map(|(query, assessment_ref)| CorpusRow {
			query: query.to_string(),
			assessment_ref: assessment_ref.to_string(),
		})
		.collect()
}

pub fn temp_path(extension: &str) -> PathBuf {
	static COUNTER: AtomicU64 = AtomicU64::new(0);

	let nanos = SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_nanos()).unwrap_or(0);
	let ordinal = COUNTER.fetch_add(1, Ordering::SeqCst);
	let pid = std::process::id();

	env::temp_dir().join(format!("assay_test_{nanos}_{pid}_{ordinal}.{extension}"))
}

fn fnv1a(bytes: &[u8]) -> u64 {
	bytes.iter().fold(0xcbf2_9ce4_8422_2325_u64, |hash, byte| {
		(hash ^ u64::from(*byte)).wrapping_mul(0x0100_0000_01b3)
	})
}
