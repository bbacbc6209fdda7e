use std::{
	collections::{HashMap, HashSet},
	path::PathBuf,
	time::Instant,
};

use clap::Parser;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use assay_corpus::{EvalRow, Prediction};
use assay_service::AssayService;

#[derive(Debug, Parser)]
#[command(
	version = assay_cli::VERSION,
	rename_all = "kebab",
	styles = assay_cli::styles(),
)]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: PathBuf,
	/// Queries to predict for. Defaults to the corpus workbook.
	#[arg(long, short = 'd', value_name = "FILE")]
	pub dataset: Option<PathBuf>,
	#[arg(long, value_name = "NAME", default_value = "Test-Set")]
	pub sheet: String,
	#[arg(long, value_name = "NAME", default_value = "Query")]
	pub query_column: String,
	/// Labels column. When set, the report includes retrieval metrics.
	#[arg(long, value_name = "NAME")]
	pub ref_column: Option<String>,
	#[arg(long, value_name = "N")]
	pub top_k: Option<u32>,
	#[arg(long, short = 'o', value_name = "FILE", default_value = "outputs/test_predictions.csv")]
	pub output: PathBuf,
}

#[derive(Debug, Clone, PartialEq)]
struct DatasetQuery {
	query: String,
	expected: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
struct PredictOutput {
	dataset: DatasetInfo,
	settings: PredictSettings,
	summary: PredictSummary,
	queries: Vec<QueryReport>,
}

#[derive(Debug, Serialize)]
struct DatasetInfo {
	path: String,
	sheet: String,
	query_count: usize,
	labeled: bool,
}

#[derive(Debug, Serialize)]
struct PredictSettings {
	config_path: String,
	model: String,
	top_k: u32,
	output: String,
}

#[derive(Debug, Serialize)]
struct PredictSummary {
	prediction_count: usize,
	latency_ms_p50: f64,
	latency_ms_p95: f64,
	#[serde(skip_serializing_if = "Option::is_none")]
	avg_recall_at_k: Option<f64>,
	#[serde(skip_serializing_if = "Option::is_none")]
	avg_precision_at_k: Option<f64>,
	#[serde(skip_serializing_if = "Option::is_none")]
	mean_rr: Option<f64>,
}

#[derive(Debug, Serialize)]
struct QueryReport {
	query: String,
	retrieved_count: usize,
	latency_ms: f64,
	retrieved: Vec<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	expected: Option<Vec<String>>,
	#[serde(skip_serializing_if = "Option::is_none")]
	metrics: Option<Metrics>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
struct Metrics {
	recall_at_k: f64,
	precision_at_k: f64,
	rr: f64,
	relevant_count: usize,
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = assay_config::load(&args.config)?;
	let filter =
		EnvFilter::try_new(&config.service.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

	tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

	let dataset_path = args.dataset.clone().unwrap_or_else(|| config.corpus.path.clone());
	let rows = assay_corpus::load_queries(
		&dataset_path,
		Some(args.sheet.as_str()),
		&args.query_column,
		args.ref_column.as_deref(),
	)?;
	let queries = group_queries(rows, args.ref_column.is_some());
	let top_k = args.top_k.unwrap_or(config.ranking.default_top_k);
	let model = config.providers.embedding.model.clone();
	let corpus = assay_corpus::load_corpus(&config.corpus)?;
	let service = AssayService::build(config, corpus).await?;
	let reports = predict(&service, &queries, top_k).await?;
	let predictions = flatten(&reports);

	assay_corpus::write_predictions(&args.output, &predictions)?;

	let output = PredictOutput {
		dataset: DatasetInfo {
			path: dataset_path.display().to_string(),
			sheet: args.sheet.clone(),
			query_count: queries.len(),
			labeled: args.ref_column.is_some(),
		},
		settings: PredictSettings {
			config_path: args.config.display().to_string(),
			model,
			top_k,
			output: args.output.display().to_string(),
		},
		summary: summarize(&reports, predictions.len()),
		queries: reports,
	};
	let json = serde_json::to_string_pretty(&output)?;

	println!("{json}");

	Ok(())
}

/// Groups labeled rows by query text, keeping first-seen order for queries and labels.
///
/// Unlabeled rows pass through one-to-one, duplicates included.
fn group_queries(rows: Vec<EvalRow>, labeled: bool) -> Vec<DatasetQuery> {
	if !labeled {
		return rows.into_iter().map(|row| DatasetQuery { query: row.query, expected: None }).collect();
	}

	let mut queries: Vec<DatasetQuery> = Vec::new();
	let mut positions: HashMap<String, usize> = HashMap::new();

	for row in rows {
		let pos = *positions.entry(row.query.clone()).or_insert_with(|| {
			queries.push(DatasetQuery { query: row.query.clone(), expected: Some(Vec::new()) });

			queries.len() - 1
		});

		if let (Some(expected), Some(assessment_ref)) =
			(queries[pos].expected.as_mut(), row.assessment_ref)
			&& !expected.contains(&assessment_ref)
		{
			expected.push(assessment_ref);
		}
	}

	queries
}

async fn predict(
	service: &AssayService,
	queries: &[DatasetQuery],
	top_k: u32,
) -> assay_service::Result<Vec<QueryReport>> {
	let mut reports = Vec::with_capacity(queries.len());

	for (idx, item) in queries.iter().enumerate() {
		tracing::info!(query = idx + 1, total = queries.len(), "Predicting.");

		let start = Instant::now();
		let results = service.recommend(&item.query, top_k).await?;
		let latency_ms = start.elapsed().as_secs_f64() * 1_000.0;
		let retrieved: Vec<String> =
			results.into_iter().map(|result| result.record.assessment_ref).collect();
		let metrics = item.expected.as_ref().map(|expected| {
			let expected: HashSet<&str> = expected.iter().map(String::as_str).collect();

			compute_metrics(&retrieved, &expected)
		});

		reports.push(QueryReport {
			query: item.query.clone(),
			retrieved_count: retrieved.len(),
			latency_ms,
			retrieved,
			expected: item.expected.clone(),
			metrics,
		});
	}

	Ok(reports)
}

fn flatten(reports: &[QueryReport]) -> Vec<Prediction> {
	reports
		.iter()
		.flat_map(|report| {
			report.retrieved.iter().map(|assessment_ref| Prediction {
				query: report.query.clone(),
				assessment_ref: assessment_ref.clone(),
			})
		})
		.collect()
}

fn compute_metrics(retrieved: &[String], expected: &HashSet<&str>) -> Metrics {
	let expected_count = expected.len();
	let mut relevant_count = 0_usize;
	let mut first_hit: Option<usize> = None;

	for (idx, assessment_ref) in retrieved.iter().enumerate() {
		if expected.contains(assessment_ref.as_str()) {
			relevant_count += 1;

			if first_hit.is_none() {
				first_hit = Some(idx + 1);
			}
		}
	}

	let rr = first_hit.map(|rank| 1.0 / rank as f64).unwrap_or(0.0);
	let precision_at_k =
		if retrieved.is_empty() { 0.0 } else { relevant_count as f64 / retrieved.len() as f64 };
	let recall_at_k =
		if expected_count == 0 { 0.0 } else { relevant_count as f64 / expected_count as f64 };

	Metrics { recall_at_k, precision_at_k, rr, relevant_count }
}

fn summarize(reports: &[QueryReport], prediction_count: usize) -> PredictSummary {
	let metrics: Vec<Metrics> = reports.iter().filter_map(|report| report.metrics).collect();
	let mean = |value: fn(&Metrics) -> f64| {
		if metrics.is_empty() {
			None
		} else {
			Some(metrics.iter().map(value).sum::<f64>() / metrics.len() as f64)
		}
	};
	let mut latencies_ms: Vec<f64> = reports.iter().map(|report| report.latency_ms).collect();

	latencies_ms.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

	PredictSummary {
		prediction_count,
		latency_ms_p50: percentile(&latencies_ms, 0.50),
		latency_ms_p95: percentile(&latencies_ms, 0.95),
		avg_recall_at_k: mean(|m| m.recall_at_k),
		avg_precision_at_k: mean(|m| m.precision_at_k),
		mean_rr: mean(|m| m.rr),
	}
}

fn percentile(values: &[f64], percentile: f64) -> f64 {
	if values.is_empty() {
		return 0.0;
	}

	let clamped = percentile.clamp(0.0, 1.0);
	let pos = clamped * (values.len() as f64 - 1.0);
	let lower = pos.floor() as usize;
	let upper = pos.ceil() as usize;

	if lower == upper {
		values[lower]
	} else {
		let weight = pos - lower as f64;
		values[lower] * (1.0 - weight) + values[upper] * weight
	}
}
