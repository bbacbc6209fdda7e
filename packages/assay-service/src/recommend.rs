use assay_domain::AssessmentRecord;

use crate::{AssayService, Error, Result, ranking};

/// One recommended assessment with the best similarity among its historical examples.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct RankedResult {
	pub record: AssessmentRecord,
	pub similarity_score: f32,
}

impl AssayService {
	/// Returns up to `top_k` distinct assessments, best first.
	///
	/// Scores come from the most similar historical queries. Only the best
	/// `top_k * ranking.oversample_factor` examples are considered, so an assessment whose
	/// examples all fall outside that pool is never returned.
	pub async fn recommend(&self, query: &str, top_k: u32) -> Result<Vec<RankedResult>> {
		if query.trim().is_empty() {
			return Err(Error::EmptyQuery);
		}

		if top_k == 0 {
			return Err(Error::InvalidRequest { message: "top_k must be at least 1.".to_string() });
		}

		let embedding = self.embedder.encode(query).await?;
		let query_norm = ranking::l2_norm(&embedding);
		let examples = self.index.examples();
		let scores: Vec<f32> = examples
			.iter()
			.map(|example| {
				ranking::cosine_with_norms(&embedding, query_norm, example.embedding(), example.norm())
			})
			.collect();
		let pool_size =
			(top_k as usize).saturating_mul(self.cfg.ranking.oversample_factor.max(1) as usize);
		let pool = ranking::candidate_pool(&scores, pool_size);
		let best = ranking::best_score_per_ref(
			pool.iter().map(|&idx| (examples[idx].assessment_ref.as_str(), scores[idx])),
		);
		let ranked = ranking::rank_refs(best, top_k as usize);
		let mut results = Vec::with_capacity(ranked.len());

		for (assessment_ref, similarity_score) in ranked {
			let Some(record) = self.catalog.get(assessment_ref) else {
				let err = Error::MissingMetadata { assessment_ref: assessment_ref.to_string() };

				tracing::warn!(error = %err, "Dropping recommendation without metadata.");

				continue;
			};

			results.push(RankedResult { record: record.clone(), similarity_score });
		}

		tracing::debug!(top_k, pool = pool.len(), results = results.len(), "Query ranked.");

		Ok(results)
	}
}
