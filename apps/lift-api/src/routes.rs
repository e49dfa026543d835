use axum::{
	Json, Router,
	extract::{Path, Query, State, rejection::JsonRejection},
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::Serialize;

use crate::state::AppState;
use lift_service::{
	AlternativeItem, AlternativesRequest, AutocompleteRequest, BulkWorkout, Error, ImportResponse,
	MuscleInput, MuscleView, MuscleWorkoutsPage, MuscleWorkoutsRequest, Page, PingResponse,
	RebuildReport, SearchItem, SearchRequest, WorkoutView,
};

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/health/ping", get(ping))
		.route("/api/workouts/search", get(search))
		.route("/api/workouts/search/autocomplete", get(autocomplete))
		.route("/api/workouts/{id}/alternatives", get(alternatives))
		.route("/api/workouts/muscles/{code}/workouts", get(workouts_by_muscle))
		.with_state(state)
}

pub fn admin_router(state: AppState) -> Router {
	Router::new()
		.route("/v1/admin/muscles/batch", post(import_muscles))
		.route("/v1/admin/workouts/batch", post(import_workouts))
		.route("/v1/admin/rebuild_embeddings", post(rebuild_embeddings))
		.with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn ping(State(state): State<AppState>) -> Result<Json<PingResponse>, ApiError> {
	let response = state.service.ping().await?;

	Ok(Json(response))
}

async fn search(
	State(state): State<AppState>,
	Query(req): Query<SearchRequest>,
) -> Result<Json<Page<SearchItem>>, ApiError> {
	let response = state.service.search_workouts(req).await?;

	Ok(Json(response))
}

async fn autocomplete(
	State(state): State<AppState>,
	Query(req): Query<AutocompleteRequest>,
) -> Result<Json<Vec<SearchItem>>, ApiError> {
	let response = state.service.autocomplete(req).await?;

	Ok(Json(response))
}

async fn alternatives(
	State(state): State<AppState>,
	Path(id): Path<String>,
	Query(mut req): Query<AlternativesRequest>,
) -> Result<Json<Page<AlternativeItem>>, ApiError> {
	req.id = id;

	let response = state.service.alternatives(req).await?;

	Ok(Json(response))
}

async fn workouts_by_muscle(
	State(state): State<AppState>,
	Path(code): Path<String>,
	Query(mut req): Query<MuscleWorkoutsRequest>,
) -> Result<Json<MuscleWorkoutsPage>, ApiError> {
	req.code = code;

	let response = state.service.workouts_by_muscle(req).await?;

	Ok(Json(response))
}

async fn import_muscles(
	State(state): State<AppState>,
	payload: Result<Json<Vec<MuscleInput>>, JsonRejection>,
) -> Result<Json<ImportResponse<MuscleView>>, ApiError> {
	let Json(muscles) = payload.map_err(invalid_payload)?;
	let response = state.service.import_muscles(muscles).await?;

	Ok(Json(response))
}

async fn import_workouts(
	State(state): State<AppState>,
	payload: Result<Json<Vec<BulkWorkout>>, JsonRejection>,
) -> Result<Json<ImportResponse<WorkoutView>>, ApiError> {
	let Json(workouts) = payload.map_err(invalid_payload)?;
	let response = state.service.import_workouts(workouts).await?;

	Ok(Json(response))
}

async fn rebuild_embeddings(
	State(state): State<AppState>,
) -> Result<Json<RebuildReport>, ApiError> {
	let response = state.service.rebuild_embeddings().await?;

	Ok(Json(response))
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
impl From<Error> for ApiError {
	fn from(err: Error) -> Self {
		match err {
			Error::InvalidRequest { message } =>
				ApiError::new(StatusCode::BAD_REQUEST, "invalid_request", message),
			Error::NotFound { message } => ApiError::new(StatusCode::NOT_FOUND, "not_found", message),
			Error::Conflict { message } => ApiError::new(StatusCode::CONFLICT, "conflict", message),
			Error::Storage { message } => {
				tracing::error!(error = %message, "Request failed in the workout store.");

				ApiError::new(
					StatusCode::INTERNAL_SERVER_ERROR,
					"internal_error",
					"Internal server error.",
				)
			},
		}
	}
}
impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body = ErrorBody { error_code: self.error_code, message: self.message };

		(self.status, Json(body)).into_response()
	}
}

fn invalid_payload(rejection: JsonRejection) -> ApiError {
	ApiError::new(
		StatusCode::BAD_REQUEST,
		"invalid_request",
		format!("Invalid payload format: {}", rejection.body_text()),
	)
}
