use assay_corpus::CorpusRow;

use crate::{Embedder, Error, Result, ranking};

/// One historical (query, assessment) pair with its query embedding.
#[derive(Clone, Debug)]
pub struct HistoricalExample {
	pub query: String,
	pub assessment_ref: String,
	embedding: Vec<f32>,
	norm: f32,
}
impl HistoricalExample {
	pub fn new(query: String, assessment_ref: String, embedding: Vec<f32>) -> Self {
		let norm = ranking::l2_norm(&embedding);

		Self { query, assessment_ref, embedding, norm }
	}

	pub fn embedding(&self) -> &[f32] {
		&self.embedding
	}

	pub fn norm(&self) -> f32 {
		self.norm
	}
}

/// Embedded historical examples in corpus order. Duplicate pairs are kept.
#[derive(Clone, Debug)]
pub struct CorpusIndex {
	examples: Vec<HistoricalExample>,
}
impl CorpusIndex {
	pub async fn build(rows: Vec<CorpusRow>, embedder: &Embedder) -> Result<Self> {
		if rows.is_empty() {
			return Err(Error::EmptyCorpus);
		}

		let queries: Vec<String> = rows.iter().map(|row| row.query.clone()).collect();
		let embeddings = embedder.encode_many(&queries).await?;
		let examples: Vec<HistoricalExample> = rows
			.into_iter()
			.zip(embeddings)
			.map(|(row, embedding)| HistoricalExample::new(row.query, row.assessment_ref, embedding))
			.collect();

		tracing::info!(examples = examples.len(), dimensions = embedder.dimensions(), "Corpus index built.");

		Ok(Self { examples })
	}

	pub fn examples(&self) -> &[HistoricalExample] {
		&self.examples
	}

	pub fn len(&self) -> usize {
		self.examples.len()
	}

	pub fn is_empty(&self) -> bool {
		self.examples.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn example_norm_matches_its_embedding() {
		let example =
			HistoricalExample::new("Analyst".to_string(), "ref".to_string(), vec![3.0, 4.0]);

		assert_eq!(example.embedding(), &[3.0, 4.0]);
		assert!((example.norm() - 5.0).abs() < 1e-6);
		assert!((example.norm() - ranking::l2_norm(example.embedding())).abs() < 1e-6);
	}
}
