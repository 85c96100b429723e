use axum::{
	Json, Router,
	extract::State,
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde_json::{Value, json};

use vitrin_service::{SearchRequest, SearchResponse, ServiceError};

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/v1/catalog/search", post(search))
		.with_state(state)
}

async fn health(State(state): State<AppState>) -> Json<Value> {
	let engine = state.service.health.snapshot().await;

	Json(json!({ "status": "ok", "engine": engine }))
}

async fn search(
	State(state): State<AppState>,
	Json(payload): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, ApiError> {
	let response = state.service.search(payload).await?;
	Ok(Json(response))
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error: String,
	error_code: &'static str,
	data: Option<Value>,
}

impl From<ServiceError> for ApiError {
	fn from(err: ServiceError) -> Self {
		match err {
			ServiceError::Unavailable { page, limit, .. } => Self {
				status: StatusCode::SERVICE_UNAVAILABLE,
				error: err.to_string(),
				error_code: "SERVICE_UNAVAILABLE",
				// An empty result page so degraded clients can still render.
				data: Some(json!({ "products": [], "total": 0, "page": page, "limit": limit })),
			},
			ServiceError::InvalidRequest { .. } => Self {
				status: StatusCode::BAD_REQUEST,
				error: err.to_string(),
				error_code: "INVALID_REQUEST",
				data: None,
			},
			ServiceError::Engine { .. } | ServiceError::Store { .. } => Self {
				status: StatusCode::INTERNAL_SERVER_ERROR,
				error: err.to_string(),
				error_code: "INTERNAL_ERROR",
				data: None,
			},
		}
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let mut body = json!({
			"success": false,
			"error": self.error,
			"error_code": self.error_code,
		});

		if let Some(data) = self.data {
			body["data"] = data;
		}

		(self.status, Json(body)).into_response()
	}
}
