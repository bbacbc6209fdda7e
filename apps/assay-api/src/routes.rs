use axum::{
	Json, Router,
	extract::{State, rejection::JsonRejection},
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::{Deserialize, Serialize};

use assay_domain::{TestType, metadata};
use assay_service::{Error as ServiceError, RankedResult};

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
	pub status: &'static str,
	pub message: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct RecommendRequest {
	pub query: String,
	/// Optional. Falls back to `ranking.default_top_k`.
	pub top_k: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct RecommendResponse {
	pub query: String,
	pub recommendations: Vec<RecommendationItem>,
	pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct RecommendationItem {
	pub assessment_name: String,
	pub assessment_url: String,
	pub relevance_score: f32,
	pub test_type: String,
	pub test_types: Vec<TestType>,
	pub description: String,
	pub duration: u32,
	pub adaptive_support: &'static str,
	pub remote_support: &'static str,
}
impl From<RankedResult> for RecommendationItem {
	fn from(result: RankedResult) -> Self {
		let record = result.record;
		let test_type =
			record.test_types.iter().map(|test_type| test_type.label()).collect::<Vec<_>>().join(", ");

		Self {
			assessment_name: record.name,
			assessment_url: record.assessment_ref,
			relevance_score: result.similarity_score,
			test_type,
			test_types: record.test_types,
			description: record.description,
			duration: record.duration_minutes,
			adaptive_support: metadata::yes_no(record.adaptive_support),
			remote_support: metadata::yes_no(record.remote_support),
		}
	}
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
}
impl ApiError {
	fn new(status: StatusCode, error_code: impl Into<String>, message: impl Into<String>) -> Self {
		Self { status, error_code: error_code.into(), message: message.into() }
	}
}
impl From<ServiceError> for ApiError {
	fn from(err: ServiceError) -> Self {
		match err {
			ServiceError::EmptyQuery | ServiceError::InvalidRequest { .. } => {
				json_error(StatusCode::BAD_REQUEST, "invalid_request", err.to_string())
			},
			ServiceError::ModelUnavailable { .. } => {
				tracing::error!(error = %err, "Embedding model failed while serving a request.");

				json_error(StatusCode::SERVICE_UNAVAILABLE, "model_unavailable", err.to_string())
			},
			ServiceError::EmptyCorpus | ServiceError::MissingMetadata { .. } => {
				tracing::error!(error = %err, "Recommendation failed.");

				json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal", err.to_string())
			},
		}
	}
}
impl From<JsonRejection> for ApiError {
	fn from(rejection: JsonRejection) -> Self {
		json_error(StatusCode::BAD_REQUEST, "invalid_request", rejection.body_text())
	}
}
impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body = ErrorBody { error_code: self.error_code, message: self.message };

		(self.status, Json(body)).into_response()
	}
}

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/", get(root))
		.route("/health", get(health))
		.route("/recommend", post(recommend))
		.with_state(state)
}

pub fn json_error(status: StatusCode, code: &str, message: impl Into<String>) -> ApiError {
	ApiError::new(status, code, message)
}

async fn health() -> Json<HealthResponse> {
	Json(HealthResponse { status: "healthy", message: "API is running" })
}

async fn root() -> Json<HealthResponse> {
	Json(HealthResponse {
		status: "healthy",
		message: "Assessment recommendation API is running",
	})
}

async fn recommend(
	State(state): State<AppState>,
	payload: Result<Json<RecommendRequest>, JsonRejection>,
) -> Result<Json<RecommendResponse>, ApiError> {
	let Json(payload) = payload?;
	let ranking = &state.service.cfg.ranking;
	let top_k = payload.top_k.unwrap_or(ranking.default_top_k);

	if top_k > ranking.max_top_k {
		return Err(json_error(
			StatusCode::BAD_REQUEST,
			"invalid_request",
			format!("top_k must be at most {}.", ranking.max_top_k),
		));
	}

	let results = state.service.recommend(&payload.query, top_k).await?;
	let recommendations: Vec<RecommendationItem> =
		results.into_iter().map(RecommendationItem::from).collect();

	Ok(Json(RecommendResponse {
		query: payload.query,
		count: recommendations.len(),
		recommendations,
	}))
}
