use std::sync::Arc;

use assay_domain::{AssessmentRecord, TestType};
use assay_service::{
	AssayService, CorpusIndex, Embedder, Error, MetadataCatalog, Providers, RankedResult,
};
use assay_testkit::{
	FailingEmbedding, HashingEmbedding, RecordingEmbedding, TableEmbedding, corpus_rows,
	test_config,
};

const CORE_JAVA: &str = "https://example.com/products/view/core-java-entry-level-new/";
const OPQ: &str = "https://example.com/products/view/occupational-personality-questionnaire-opq32r/";
const VERIFY: &str = "https://example.com/products/view/verify-numerical-ability/";

async fn table_service(
	scores: &[(&str, f32)],
	pairs: &[(&str, &str)],
	oversample_factor: u32,
) -> AssayService {
	let mut cfg = test_config(2);

	cfg.ranking.oversample_factor = oversample_factor;

	let providers = Providers::new(Arc::new(TableEmbedding::with_scores("query", scores)));

	AssayService::build_with_providers(cfg, corpus_rows(pairs), providers)
		.await
		.expect("Failed to build service.")
}

fn summary(results: &[RankedResult]) -> Vec<(&str, f32)> {
	results
		.iter()
		.map(|result| (result.record.assessment_ref.as_str(), result.similarity_score))
		.collect()
}

fn assert_close(actual: f32, expected: f32) {
	assert!((actual - expected).abs() < 1e-5, "expected {expected}, got {actual}");
}

#[tokio::test]
async fn aggregates_best_score_per_assessment() {
	let service = table_service(
		&[("q1", 0.9), ("q2", 0.7), ("q3", 0.95)],
		&[("q1", CORE_JAVA), ("q2", CORE_JAVA), ("q3", OPQ)],
		3,
	)
	.await;
	let results = service.recommend("query", 2).await.expect("Expected recommendations.");
	let summary = summary(&results);

	assert_eq!(summary.len(), 2);
	assert_eq!(summary[0].0, OPQ);
	assert_close(summary[0].1, 0.95);
	assert_eq!(summary[1].0, CORE_JAVA);
	assert_close(summary[1].1, 0.9);
}

#[tokio::test]
async fn returns_fewer_results_than_requested_when_corpus_is_small() {
	let service = table_service(
		&[("q1", 0.9), ("q2", 0.7), ("q3", 0.95)],
		&[("q1", CORE_JAVA), ("q2", CORE_JAVA), ("q3", OPQ)],
		3,
	)
	.await;
	let results = service.recommend("query", 5).await.expect("Expected recommendations.");

	assert_eq!(results.len(), 2);
}

#[tokio::test]
async fn keeps_the_maximum_not_the_latest_score() {
	let service = table_service(
		&[("q1", 0.9), ("q2", 0.4), ("q3", 0.5)],
		&[("q1", CORE_JAVA), ("q2", CORE_JAVA), ("q3", OPQ)],
		3,
	)
	.await;
	let results = service.recommend("query", 2).await.expect("Expected recommendations.");
	let summary = summary(&results);

	assert_eq!(summary[0].0, CORE_JAVA);
	assert_close(summary[0].1, 0.9);
	assert_eq!(summary[1].0, OPQ);
	assert_close(summary[1].1, 0.5);
}

#[tokio::test]
async fn assessments_outside_the_candidate_pool_are_not_returned() {
	let service = table_service(
		&[("q1", 0.9), ("q2", 0.8), ("q3", 0.7)],
		&[("q1", CORE_JAVA), ("q2", CORE_JAVA), ("q3", OPQ)],
		1,
	)
	.await;
	let results = service.recommend("query", 2).await.expect("Expected recommendations.");

	assert_eq!(summary(&results).iter().map(|(r, _)| *r).collect::<Vec<_>>(), vec![CORE_JAVA]);
}

#[tokio::test]
async fn equal_scores_keep_corpus_order() {
	let service = table_service(
		&[("q1", 0.5), ("q2", 0.5), ("q3", 0.5)],
		&[("q1", VERIFY), ("q2", OPQ), ("q3", CORE_JAVA)],
		3,
	)
	.await;
	let results = service.recommend("query", 3).await.expect("Expected recommendations.");
	let refs: Vec<&str> = summary(&results).iter().map(|(r, _)| *r).collect();

	assert_eq!(refs, vec![VERIFY, OPQ, CORE_JAVA]);
}

#[tokio::test]
async fn rejects_blank_queries() {
	let service = table_service(&[("q1", 0.9)], &[("q1", CORE_JAVA)], 3).await;

	for query in ["", "   ", "\t\n"] {
		let err = service.recommend(query, 3).await.expect_err("Expected empty query error.");

		assert!(matches!(err, Error::EmptyQuery), "{query:?}");
	}
}

#[tokio::test]
async fn rejects_zero_top_k() {
	let service = table_service(&[("q1", 0.9)], &[("q1", CORE_JAVA)], 3).await;
	let err = service.recommend("query", 0).await.expect_err("Expected invalid top_k.");

	assert!(matches!(err, Error::InvalidRequest { .. }));
}

#[tokio::test]
async fn large_top_k_returns_every_distinct_assessment() {
	let service = table_service(
		&[("q1", 0.9), ("q2", 0.7)],
		&[("q1", CORE_JAVA), ("q2", OPQ)],
		3,
	)
	.await;
	let max_top_k = service.cfg.ranking.max_top_k;

	for top_k in [max_top_k + 1, u32::MAX] {
		let results = service.recommend("query", top_k).await.expect("Expected recommendations.");

		assert_eq!(summary(&results).iter().map(|(r, _)| *r).collect::<Vec<_>>(), vec![
			CORE_JAVA, OPQ
		]);
	}
}

#[tokio::test]
async fn repeated_queries_return_identical_results() {
	let cfg = test_config(16);
	let providers = Providers::new(Arc::new(HashingEmbedding::new(16)));
	let service = AssayService::build_with_providers(
		cfg,
		corpus_rows(&[
			("Java developer with Spring", CORE_JAVA),
			("Sales manager personality fit", OPQ),
			("Numerical analyst", VERIFY),
		]),
		providers,
	)
	.await
	.expect("Failed to build service.");
	let first = service.recommend("Java developer", 3).await.expect("Expected recommendations.");
	let second = service.recommend("Java developer", 3).await.expect("Expected recommendations.");

	assert_eq!(first, second);
}

#[tokio::test]
async fn results_are_distinct_and_sorted_with_derived_metadata() {
	let cfg = test_config(256);
	let providers = Providers::new(Arc::new(HashingEmbedding::new(256)));
	let service = AssayService::build_with_providers(
		cfg,
		corpus_rows(&[
			("Java developer with Spring", CORE_JAVA),
			("Senior Java backend engineer", CORE_JAVA),
			("Sales manager personality fit", OPQ),
			("Team lead behaviour profile", OPQ),
			("Numerical analyst", VERIFY),
			("Financial analyst with numbers", VERIFY),
		]),
		providers,
	)
	.await
	.expect("Failed to build service.");
	let results =
		service.recommend("Java engineer for a backend team", 10).await.expect("Expected results.");

	assert_eq!(results.len(), 3);
	assert!(
		results.windows(2).all(|pair| pair[0].similarity_score >= pair[1].similarity_score),
		"{results:?}"
	);
	assert_eq!(results[0].record.assessment_ref, CORE_JAVA);
	assert_eq!(results[0].record.name, "Core Java Entry Level (New)");
	assert_eq!(results[0].record.test_types, vec![TestType::KnowledgeSkills]);

	let mut refs: Vec<&str> =
		results.iter().map(|result| result.record.assessment_ref.as_str()).collect();

	refs.sort_unstable();
	refs.dedup();

	assert_eq!(refs.len(), results.len());
	assert!(results.iter().all(|result| (-1.0..=1.0).contains(&result.similarity_score)));
}

#[tokio::test]
async fn empty_corpus_is_rejected() {
	let providers = Providers::new(Arc::new(HashingEmbedding::new(8)));
	let result = AssayService::build_with_providers(test_config(8), Vec::new(), providers).await;

	assert!(matches!(result, Err(Error::EmptyCorpus)));
}

#[tokio::test]
async fn dimension_mismatch_is_a_model_error() {
	let providers = Providers::new(Arc::new(HashingEmbedding::new(4)));
	let result = AssayService::build_with_providers(
		test_config(8),
		corpus_rows(&[("Java developer", CORE_JAVA)]),
		providers,
	)
	.await;

	assert!(matches!(result, Err(Error::ModelUnavailable { .. })));
}

#[tokio::test]
async fn provider_failures_surface_as_model_unavailable() {
	let providers = Providers::new(Arc::new(FailingEmbedding));
	let result = AssayService::build_with_providers(
		test_config(8),
		corpus_rows(&[("Java developer", CORE_JAVA)]),
		providers,
	)
	.await;

	assert!(matches!(result, Err(Error::ModelUnavailable { .. })));
}

#[tokio::test]
async fn corpus_is_encoded_in_configured_batches() {
	let mut cfg = test_config(8);

	cfg.providers.embedding.batch_size = 2;

	let provider = Arc::new(RecordingEmbedding::new(HashingEmbedding::new(8)));
	let service = AssayService::build_with_providers(
		cfg,
		corpus_rows(&[
			("a", CORE_JAVA),
			("b", CORE_JAVA),
			("c", OPQ),
			("d", OPQ),
			("e", VERIFY),
		]),
		Providers::new(provider.clone()),
	)
	.await
	.expect("Failed to build service.");

	assert_eq!(provider.batches(), vec![2, 2, 1]);
	assert_eq!(service.index.len(), 5);
	assert_eq!(service.catalog.len(), 3);

	service.recommend("a", 1).await.expect("Expected recommendations.");

	assert_eq!(provider.batches(), vec![2, 2, 1, 1]);
}

#[tokio::test]
async fn assessments_without_metadata_are_skipped() {
	let cfg = test_config(2);
	let provider = Arc::new(TableEmbedding::with_scores("query", &[("q1", 0.9), ("q2", 0.95)]));
	let embedder = Embedder::new(provider, cfg.providers.embedding.clone());
	let index = CorpusIndex::build(corpus_rows(&[("q1", CORE_JAVA), ("q2", OPQ)]), &embedder)
		.await
		.expect("Failed to build index.");
	let catalog = MetadataCatalog::from_records([AssessmentRecord::derive(CORE_JAVA)]);
	let service = AssayService::from_parts(cfg, embedder, index, catalog);
	let results = service.recommend("query", 2).await.expect("Expected recommendations.");

	assert_eq!(summary(&results).iter().map(|(r, _)| *r).collect::<Vec<_>>(), vec![CORE_JAVA]);
}

#[test]
fn ranked_results_serialize_with_metadata() {
	let result =
		RankedResult { record: AssessmentRecord::derive(OPQ), similarity_score: 0.5 };
	let value = serde_json::to_value(&result).expect("Failed to serialize result.");

	assert_eq!(value["similarity_score"], 0.5);
	assert_eq!(value["record"]["assessment_ref"], OPQ);
}
