use std::path::PathBuf;

use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub corpus: Corpus,
	pub providers: Providers,
	#[serde(default)]
	pub ranking: Ranking,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	#[serde(default = "default_log_level")]
	pub log_level: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Corpus {
	pub path: PathBuf,
	/// Optional. Workbook sheet holding the historical examples; the first sheet when unset.
	pub sheet: Option<String>,
	#[serde(default = "default_query_column")]
	pub query_column: String,
	#[serde(default = "default_ref_column")]
	pub ref_column: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Providers {
	pub embedding: EmbeddingProviderConfig,
}

#[derive(Clone, Debug, Deserialize)]
pub struct EmbeddingProviderConfig {
	/// Either "http" (OpenAI-compatible endpoint) or "local" (in-process ONNX model).
	pub backend: String,
	pub provider_id: String,
	#[serde(default)]
	pub api_base: String,
	#[serde(default)]
	pub api_key: String,
	#[serde(default = "default_embedding_path")]
	pub path: String,
	pub model: String,
	pub dimensions: u32,
	#[serde(default = "default_timeout_ms")]
	pub timeout_ms: u64,
	#[serde(default = "default_batch_size")]
	pub batch_size: u32,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Ranking {
	pub default_top_k: u32,
	pub max_top_k: u32,
	/// Candidate pool size as a multiple of `top_k`, taken before deduplicating by assessment.
	pub oversample_factor: u32,
}
impl Default for Ranking {
	fn default() -> Self {
		Self { default_top_k: 10, max_top_k: 50, oversample_factor: 3 }
	}
}

fn default_log_level() -> String {
	"info".to_string()
}

fn default_query_column() -> String {
	"Query".to_string()
}

fn default_ref_column() -> String {
	"Assessment_url".to_string()
}

fn default_embedding_path() -> String {
	"/embeddings".to_string()
}

fn default_timeout_ms() -> u64 {
	30_000
}

fn default_batch_size() -> u32 {
	64
}
