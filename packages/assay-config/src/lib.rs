mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Config, Corpus, EmbeddingProviderConfig, Providers, Ranking, Service};

use std::{fs, path::Path};

pub const BACKEND_HTTP: &str = "http";
pub const BACKEND_LOCAL: &str = "local";

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}
	if cfg.corpus.path.as_os_str().is_empty() {
		return Err(Error::Validation { message: "corpus.path must be non-empty.".to_string() });
	}

	for (label, value) in [
		("corpus.query_column", &cfg.corpus.query_column),
		("corpus.ref_column", &cfg.corpus.ref_column),
	] {
		if value.trim().is_empty() {
			return Err(Error::Validation { message: format!("{label} must be non-empty.") });
		}
	}

	if cfg.corpus.query_column == cfg.corpus.ref_column {
		return Err(Error::Validation {
			message: "corpus.query_column and corpus.ref_column must differ.".to_string(),
		});
	}

	let embedding = &cfg.providers.embedding;

	if !matches!(embedding.backend.as_str(), BACKEND_HTTP | BACKEND_LOCAL) {
		return Err(Error::Validation {
			message: "providers.embedding.backend must be one of http or local.".to_string(),
		});
	}
	if embedding.model.trim().is_empty() {
		return Err(Error::Validation {
			message: "providers.embedding.model must be non-empty.".to_string(),
		});
	}
	if embedding.dimensions == 0 {
		return Err(Error::Validation {
			message: "providers.embedding.dimensions must be greater than zero.".to_string(),
		});
	}
	if embedding.batch_size == 0 {
		return Err(Error::Validation {
			message: "providers.embedding.batch_size must be greater than zero.".to_string(),
		});
	}
	if embedding.backend == BACKEND_HTTP {
		for (label, value) in [
			("providers.embedding.api_base", &embedding.api_base),
			("providers.embedding.api_key", &embedding.api_key),
		] {
			if value.trim().is_empty() {
				return Err(Error::Validation {
					message: format!("{label} must be non-empty for the http backend."),
				});
			}
		}

		if embedding.timeout_ms == 0 {
			return Err(Error::Validation {
				message: "providers.embedding.timeout_ms must be greater than zero.".to_string(),
			});
		}
	}
	if cfg.ranking.default_top_k == 0 {
		return Err(Error::Validation {
			message: "ranking.default_top_k must be greater than zero.".to_string(),
		});
	}
	if cfg.ranking.max_top_k < cfg.ranking.default_top_k {
		return Err(Error::Validation {
			message: "ranking.max_top_k must be greater than or equal to ranking.default_top_k."
				.to_string(),
		});
	}
	if cfg.ranking.oversample_factor == 0 {
		return Err(Error::Validation {
			message: "ranking.oversample_factor must be greater than zero.".to_string(),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	if cfg.corpus.sheet.as_deref().map(|sheet| sheet.trim().is_empty()).unwrap_or(false) {
		cfg.corpus.sheet = None;
	}

	cfg.providers.embedding.backend = cfg.providers.embedding.backend.trim().to_ascii_lowercase();
	cfg.corpus.query_column = cfg.corpus.query_column.trim().to_string();
	cfg.corpus.ref_column = cfg.corpus.ref_column.trim().to_string();
}
