use axum::{
	Json, Router,
	extract::{Query, State},
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::get,
};
use serde::Serialize;
use serde_json::Value;

use dsearch_service::{DriveItem, Error as ServiceError, SearchQuery};

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
	Router::new().route("/health", get(health)).route("/search", get(search)).with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn search(
	State(state): State<AppState>,
	Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<Vec<DriveItem>>, ApiError> {
	let query = SearchQuery::from_values(
		params.into_iter().filter(|(key, _)| key == "q").map(|(_, value)| value),
	);
	let items = state.service.search(query).await?;

	Ok(Json(items))
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error: Value,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error: Value,
}
impl ApiError {
	fn new(status: StatusCode, error: impl Into<Value>) -> Self {
		Self { status, error: error.into() }
	}
}
impl From<ServiceError> for ApiError {
	fn from(err: ServiceError) -> Self {
		tracing::warn!(error = %err, "Search request failed.");

		match err {
			ServiceError::UnknownProvider => {
				Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Unknown search provider")
			},
			ServiceError::Upstream { status, body } => Self::new(
				StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
				body,
			),
			ServiceError::Token { .. } => Self::new(
				StatusCode::INTERNAL_SERVER_ERROR,
				"Failed to acquire access token.",
			),
			ServiceError::Index { .. } => {
				Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Failed to query search index.")
			},
			ServiceError::Transport { message, timeout: true } => {
				Self::new(StatusCode::GATEWAY_TIMEOUT, message)
			},
			ServiceError::Transport { message, timeout: false } => {
				Self::new(StatusCode::BAD_GATEWAY, message)
			},
			ServiceError::Config { message } => {
				Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
			},
		}
	}
}
impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		(self.status, Json(ErrorBody { error: self.error })).into_response()
	}
}
