use axum::extract::{FromRequestParts, Path, Query, State};
use axum::http::{StatusCode, header::AUTHORIZATION, request::Parts};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use mailsense_service::{
	Error as ServiceError, MetricsResponse, RecentEmailsResponse, RecentTasksResponse,
	SentimentResponse, SignInRequest, SignInResponse, SyncRequest, SyncResponse, TaskStatusRequest,
	TaskStatusResponse, TeamResponse, VolumeResponse,
};
use mailsense_storage::models::Employee;

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/api/health", get(health))
		.route("/api/auth/microsoft", post(sign_in))
		.route("/api/emails/sync", post(sync))
		.route("/api/emails/recent", get(recent_emails))
		.route("/api/dashboard/metrics", get(dashboard_metrics))
		.route("/api/dashboard/sentiment", get(dashboard_sentiment))
		.route("/api/dashboard/email-volume", get(dashboard_email_volume))
		.route("/api/tasks/recent", get(recent_tasks))
		.route("/api/tasks/{id}/status", put(update_task_status))
		.route("/api/employees/team", get(team))
		.with_state(state)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthResponse {
	status: &'static str,
	#[serde(with = "mailsense_service::time_serde")]
	timestamp: OffsetDateTime,
}

#[derive(Debug, Deserialize)]
struct VolumeParams {
	days: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct LimitParams {
	limit: Option<u32>,
}

/// The authenticated caller, resolved from the bearer session token on the
/// Authorization header.
pub struct CurrentEmployee(pub Employee);

impl FromRequestParts<AppState> for CurrentEmployee {
	type Rejection = ApiError;

	async fn from_request_parts(
		parts: &mut Parts,
		state: &AppState,
	) -> Result<Self, Self::Rejection> {
		let header = parts
			.headers
			.get(AUTHORIZATION)
			.and_then(|value| value.to_str().ok())
			.unwrap_or_default();
		let Some(token) = header.strip_prefix("Bearer ") else {
			return Err(json_error(
				StatusCode::UNAUTHORIZED,
				"unauthorized",
				"Missing bearer session token.",
			));
		};
		let employee = state.service.authenticate(token).await?;

		Ok(Self(employee))
	}
}

async fn health() -> Json<HealthResponse> {
	Json(HealthResponse { status: "ok", timestamp: OffsetDateTime::now_utc() })
}

async fn sign_in(
	State(state): State<AppState>,
	Json(payload): Json<SignInRequest>,
) -> Result<Json<SignInResponse>, ApiError> {
	let response = state.service.sign_in(payload).await?;

	Ok(Json(response))
}

async fn sync(
	State(state): State<AppState>,
	CurrentEmployee(employee): CurrentEmployee,
	Json(payload): Json<SyncRequest>,
) -> Result<Json<SyncResponse>, ApiError> {
	let response = state.service.sync(&employee, payload).await?;

	Ok(Json(response))
}

async fn recent_emails(
	State(state): State<AppState>,
	CurrentEmployee(employee): CurrentEmployee,
	Query(params): Query<LimitParams>,
) -> Result<Json<RecentEmailsResponse>, ApiError> {
	let response = state.service.recent_emails(&employee, params.limit).await?;

	Ok(Json(response))
}

async fn dashboard_metrics(
	State(state): State<AppState>,
	CurrentEmployee(employee): CurrentEmployee,
) -> Result<Json<MetricsResponse>, ApiError> {
	let response = state.service.metrics(&employee).await?;

	Ok(Json(response))
}

async fn dashboard_sentiment(
	State(state): State<AppState>,
	CurrentEmployee(employee): CurrentEmployee,
) -> Result<Json<SentimentResponse>, ApiError> {
	let response = state.service.sentiment(&employee).await?;

	Ok(Json(response))
}

async fn dashboard_email_volume(
	State(state): State<AppState>,
	CurrentEmployee(employee): CurrentEmployee,
	Query(params): Query<VolumeParams>,
) -> Result<Json<VolumeResponse>, ApiError> {
	let response = state.service.email_volume(&employee, params.days).await?;

	Ok(Json(response))
}

async fn recent_tasks(
	State(state): State<AppState>,
	CurrentEmployee(employee): CurrentEmployee,
	Query(params): Query<LimitParams>,
) -> Result<Json<RecentTasksResponse>, ApiError> {
	let response = state.service.recent_tasks(&employee, params.limit).await?;

	Ok(Json(response))
}

async fn update_task_status(
	State(state): State<AppState>,
	CurrentEmployee(employee): CurrentEmployee,
	Path(task_id): Path<Uuid>,
	Json(payload): Json<TaskStatusRequest>,
) -> Result<Json<TaskStatusResponse>, ApiError> {
	let response = state.service.update_task_status(&employee, task_id, payload).await?;

	Ok(Json(response))
}

async fn team(
	State(state): State<AppState>,
	CurrentEmployee(employee): CurrentEmployee,
) -> Result<Json<TeamResponse>, ApiError> {
	let response = state.service.team(&employee).await?;

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

	pub fn status(&self) -> StatusCode {
		self.status
	}
}

pub fn json_error(status: StatusCode, code: &str, message: impl Into<String>) -> ApiError {
	ApiError::new(status, code, message)
}

impl From<ServiceError> for ApiError {
	fn from(err: ServiceError) -> Self {
		let message = err.to_string();

		match err {
			ServiceError::InvalidRequest { .. } =>
				json_error(StatusCode::UNPROCESSABLE_ENTITY, "invalid_request", message),
			ServiceError::Unauthorized { .. } =>
				json_error(StatusCode::UNAUTHORIZED, "unauthorized", message),
			ServiceError::CredentialRejected { .. } =>
				json_error(StatusCode::BAD_REQUEST, "credential_rejected", message),
			ServiceError::NotFound { .. } => json_error(StatusCode::NOT_FOUND, "not_found", message),
			ServiceError::Conflict { .. } => json_error(StatusCode::CONFLICT, "conflict", message),
			ServiceError::Provider { .. } =>
				json_error(StatusCode::BAD_GATEWAY, "upstream_error", message),
			ServiceError::Storage { .. } =>
				json_error(StatusCode::INTERNAL_SERVER_ERROR, "storage_error", message),
		}
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body = ErrorBody { error_code: self.error_code, message: self.message };

		(self.status, Json(body)).into_response()
	}
}
