pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Embedding model unavailable: {message}")]
	ModelUnavailable { message: String },
	#[error("Corpus contains no historical examples.")]
	EmptyCorpus,
	#[error("Invalid request: query must be non-empty.")]
	EmptyQuery,
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("No metadata for assessment {assessment_ref}.")]
	MissingMetadata { assessment_ref: String },
}
impl From<assay_providers::Error> for Error {
	fn from(err: assay_providers::Error) -> Self {
		Self::ModelUnavailable { message: err.to_string() }
	}
}
