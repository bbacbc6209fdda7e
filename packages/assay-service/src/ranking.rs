//! Cosine scoring, candidate pooling, and per-assessment aggregation.

use std::{cmp::Ordering, collections::HashMap};

pub fn l2_norm(vector: &[f32]) -> f32 {
	vector.iter().map(|value| value * value).sum::<f32>().sqrt()
}

pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
	cosine_with_norms(a, l2_norm(a), b, l2_norm(b))
}

/// Cosine similarity with precomputed norms. A zero vector scores 0 against everything.
pub fn cosine_with_norms(a: &[f32], a_norm: f32, b: &[f32], b_norm: f32) -> f32 {
	if a_norm == 0.0 || b_norm == 0.0 {
		return 0.0;
	}

	let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();

	(dot / (a_norm * b_norm)).clamp(-1.0, 1.0)
}

pub fn cmp_f32_desc(a: f32, b: f32) -> Ordering {
	match (a.is_nan(), b.is_nan()) {
		(true, true) => Ordering::Equal,
		(true, false) => Ordering::Greater,
		(false, true) => Ordering::Less,
		(false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
	}
}

/// Indices of the `size` highest scores, best first. Equal scores keep corpus order.
pub fn candidate_pool(scores: &[f32], size: usize) -> Vec<usize> {
	let by_rank =
		|left: &usize, right: &usize| cmp_f32_desc(scores[*left], scores[*right]).then(left.cmp(right));
	let mut indices: Vec<usize> = (0..scores.len()).collect();

	if size == 0 {
		return Vec::new();
	}
	if size < indices.len() {
		indices.select_nth_unstable_by(size - 1, by_rank);
		indices.truncate(size);
	}

	indices.sort_unstable_by(by_rank);

	indices
}

/// Collapses candidates to one entry per assessment holding its best score.
///
/// Assessments keep the position where they first appeared in `candidates`.
pub fn best_score_per_ref<'a, I>(candidates: I) -> Vec<(&'a str, f32)>
where
	I: IntoIterator<Item = (&'a str, f32)>,
{
	let (best, _) = candidates.into_iter().fold(
		(Vec::<(&str, f32)>::new(), HashMap::<&str, usize>::new()),
		|(mut best, mut positions), (assessment_ref, score)| {
			match positions.get(assessment_ref) {
				Some(&pos) => best[pos].1 = best[pos].1.max(score),
				None => {
					positions.insert(assessment_ref, best.len());
					best.push((assessment_ref, score));
				},
			}

			(best, positions)
		},
	);

	best
}

/// Orders aggregated scores best first and keeps `top_k`. The sort is stable.
pub fn rank_refs(mut best: Vec<(&str, f32)>, top_k: usize) -> Vec<(&str, f32)> {
	best.sort_by(|left, right| cmp_f32_desc(left.1, right.1));
	best.truncate(top_k);

	best
}
