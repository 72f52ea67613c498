use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{post, put};
use axum::{Json, Router};
use camera_bridge_lib::device_state::device_path;
use camera_bridge_lib::error::{RequestSyncError, StoreError};
use camera_bridge_lib::motion::{MOTION_LOGS, MotionLog};
use camera_bridge_lib::request_sync::SyncRequester;
use camera_bridge_lib::store::StateStore;
use google_home::{DeviceState, GoogleHome, Request, Response};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use thiserror::Error;
use tower_http::trace::TraceLayer;
use tracing::debug;

use crate::fake_auth;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
#[error("{source}")]
pub struct ApiError {
    status_code: StatusCode,
    source: BoxError,
}

impl ApiError {
    pub fn new(status_code: StatusCode, source: BoxError) -> Self {
        Self {
            status_code,
            source,
        }
    }
}

impl From<ApiError> for ApiErrorJson {
    fn from(value: ApiError) -> Self {
        let error = ApiErrorJsonError {
            code: value.status_code.as_u16(),
            status: value.status_code.to_string(),
            reason: value.source.to_string(),
        };

        Self { error }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status_code, Json(ApiErrorJson::from(self))).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        let status_code = match err {
            StoreError::InvalidPath(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        Self::new(status_code, err.into())
    }
}

impl From<RequestSyncError> for ApiError {
    fn from(err: RequestSyncError) -> Self {
        let status_code = match err {
            RequestSyncError::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
            RequestSyncError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        Self::new(status_code, err.into())
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct ApiErrorJsonError {
    code: u16,
    status: String,
    reason: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiErrorJson {
    error: ApiErrorJsonError,
}

#[derive(Clone)]
pub struct AppState {
    pub google_home: Arc<GoogleHome>,
    pub store: Arc<dyn StateStore>,
    pub sync_requester: SyncRequester,
}

pub fn router(state: AppState) -> Router {
    // Create google home fulfillment route
    let fulfillment = Router::new().route("/google_home", post(fulfillment));

    // Combine together all the routes
    Router::new()
        .nest("/fulfillment", fulfillment)
        .route("/requestsync", post(request_sync))
        .route("/devices/{id}/state", put(set_state))
        .route("/motion-logs", post(log_motion))
        .merge(fake_auth::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn fulfillment(
    State(state): State<AppState>,
    Json(payload): Json<Request>,
) -> Result<Json<Response>, ApiError> {
    debug!("{payload:#?}");
    let result = state
        .google_home
        .handle_request(payload)
        .await
        .map_err(|err| ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, err.into()))?;

    debug!("{result:#?}");

    Ok(Json(result))
}

async fn request_sync(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    Ok(Json(state.sync_requester.request_sync().await?))
}

/// Write the device state the same way the camera would.
async fn set_state(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(device_state): Json<DeviceState>,
) -> Result<Json<DeviceState>, ApiError> {
    let value = serde_json::to_value(device_state)
        .map_err(|err| ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, err.into()))?;
    state.store.set(&device_path(&id), value).await?;

    Ok(Json(device_state))
}

async fn log_motion(
    State(state): State<AppState>,
    Json(log): Json<MotionLog>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let value = serde_json::to_value(&log)
        .map_err(|err| ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, err.into()))?;
    let id = state.store.push(MOTION_LOGS, value).await?;
    debug!(id, "Logged motion");

    Ok((StatusCode::CREATED, Json(json!({ "id": id }))))
}
