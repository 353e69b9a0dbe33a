//! API request handlers
//!
//! The store endpoints speak the grid's envelope: `{ success, data }` on
//! success and `{ success: false, message }` with a fixed, non-sensitive
//! string on failure. The generate endpoint answers `{ content }` in both
//! directions so the cell always has text to show.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::ai::FormulaRequest;
use crate::types::{Review, ReviewFields, ReviewPatch};
use crate::validate::validate_batch;

use super::server::AppState;

/// Fixed failure messages surfaced to the grid. Operator detail stays in
/// the server log.
pub const FETCH_ERROR: &str = "There was an error fetching the reviews";
pub const CREATE_ERROR: &str = "There was an error creating the review";
pub const UPDATE_ERROR: &str = "There was an error updating the review";

pub fn delete_error(count: usize) -> String {
    format!(
        "There was an error deleting the review{}",
        if count > 1 { "s" } else { "" }
    )
}

/// Success envelope for store endpoints
#[derive(Serialize)]
pub struct DataResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> DataResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Failure envelope for store endpoints
#[derive(Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Bare acknowledgement for delete
#[derive(Serialize)]
pub struct AckResponse {
    pub success: bool,
}

/// A batch of raw records from the grid store. Records stay as JSON
/// values until the batch passes pre-flight validation.
#[derive(Deserialize)]
pub struct WriteBatch {
    pub data: Vec<serde_json::Value>,
}

/// Delete request: the ids the grid wants gone
#[derive(Deserialize)]
pub struct DeleteRequest {
    pub ids: Vec<i64>,
}

/// Generate response: the text the cell displays, success or not
#[derive(Serialize, Deserialize)]
pub struct GenerateResponse {
    pub content: String,
}

fn server_error(message: impl Into<String>) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::new(message)),
    )
        .into_response()
}

fn rejected(message: impl Into<String>) -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(ErrorResponse::new(message)),
    )
        .into_response()
}

/// GET /api/reviews - all rows for the grid store
pub async fn list_reviews(State(state): State<Arc<AppState>>) -> Response {
    match state.store.find_all() {
        Ok(reviews) => (StatusCode::OK, Json(DataResponse::ok(reviews))).into_response(),
        Err(err) => {
            error!(error = %err, "failed to fetch reviews");
            server_error(FETCH_ERROR)
        }
    }
}

/// POST /api/review/create - insert the batch, storage assigns ids
pub async fn create_reviews(
    State(state): State<Arc<AppState>>,
    Json(batch): Json<WriteBatch>,
) -> Response {
    if let Err(err) = validate_batch(&batch.data) {
        return rejected(err.to_string());
    }
    if batch.data.is_empty() {
        return rejected("create batch is empty");
    }

    let mut created: Vec<Review> = Vec::with_capacity(batch.data.len());
    for record in &batch.data {
        // Client-side ids (including phantom ids) are dropped; unknown
        // keys do not survive deserialization into the draft.
        let draft: ReviewFields = match serde_json::from_value(record.clone()) {
            Ok(draft) => draft,
            Err(err) => return rejected(format!("malformed create record: {err}")),
        };
        match state.store.create(&draft) {
            Ok(review) => created.push(review),
            Err(err) => {
                error!(error = %err, "failed to create review");
                return server_error(CREATE_ERROR);
            }
        }
    }

    (StatusCode::CREATED, Json(DataResponse::ok(created))).into_response()
}

/// POST /api/review/update - patch rows by id, echo the patched fields
pub async fn update_reviews(
    State(state): State<Arc<AppState>>,
    Json(batch): Json<WriteBatch>,
) -> Response {
    if let Err(err) = validate_batch(&batch.data) {
        return rejected(err.to_string());
    }
    if batch.data.is_empty() {
        return rejected("update batch is empty");
    }

    let mut echoed: Vec<ReviewPatch> = Vec::with_capacity(batch.data.len());
    for record in &batch.data {
        let patch: ReviewPatch = match serde_json::from_value(record.clone()) {
            Ok(patch) => patch,
            Err(err) => return rejected(format!("malformed update record: {err}")),
        };
        match state.store.update(&patch) {
            Ok(stored) => echoed.push(ReviewPatch {
                id: stored.id,
                fields: stored.fields.masked_by(&patch.fields),
            }),
            Err(err) => {
                error!(error = %err, id = patch.id, "failed to update review");
                return server_error(UPDATE_ERROR);
            }
        }
    }

    (StatusCode::OK, Json(DataResponse::ok(echoed))).into_response()
}

/// POST /api/review/delete - remove rows by id set
pub async fn delete_reviews(
    State(state): State<Arc<AppState>>,
    Json(request): Json<DeleteRequest>,
) -> Response {
    match state.store.delete(&request.ids) {
        Ok(_) => (StatusCode::OK, Json(AckResponse { success: true })).into_response(),
        Err(err) => {
            error!(error = %err, "failed to delete reviews");
            server_error(delete_error(request.ids.len()))
        }
    }
}

/// POST /api/generate - evaluate one `=AI()` formula invocation
///
/// Both directions answer `{ content }`: generated text on success, the
/// fixed error string (with a 500) when the provider call failed. Only a
/// rejected input (empty prompt) gets the `{ success, message }` shape.
pub async fn generate(
    State(state): State<Arc<AppState>>,
    Json(request): Json<FormulaRequest>,
) -> Response {
    match state.proxy.evaluate(request).await {
        Ok(outcome) => {
            let status = if outcome.is_error() {
                StatusCode::INTERNAL_SERVER_ERROR
            } else {
                StatusCode::OK
            };
            (
                status,
                Json(GenerateResponse {
                    content: outcome.into_text(),
                }),
            )
                .into_response()
        }
        Err(err) => rejected(err.to_string()),
    }
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub started_at: chrono::DateTime<chrono::Utc>,
}

/// GET /health - health check
pub async fn health(State(state): State<Arc<AppState>>) -> Response {
    (
        StatusCode::OK,
        Json(DataResponse::ok(HealthResponse {
            status: "healthy".to_string(),
            started_at: state.started_at,
        })),
    )
        .into_response()
}

/// Version response
#[derive(Serialize)]
pub struct VersionResponse {
    pub version: String,
}

/// GET /version - server version
pub async fn version(State(state): State<Arc<AppState>>) -> Response {
    (
        StatusCode::OK,
        Json(DataResponse::ok(VersionResponse {
            version: state.version.clone(),
        })),
    )
        .into_response()
}

/// Root endpoint response
#[derive(Serialize)]
pub struct RootResponse {
    pub name: String,
    pub version: String,
    pub description: String,
    pub endpoints: Vec<EndpointInfo>,
}

#[derive(Serialize)]
pub struct EndpointInfo {
    pub path: String,
    pub method: String,
    pub description: String,
}

/// GET / - API index (shown when no demo UI directory is mounted)
pub async fn root(State(state): State<Arc<AppState>>) -> Response {
    let endpoint = |path: &str, method: &str, description: &str| EndpointInfo {
        path: path.to_string(),
        method: method.to_string(),
        description: description.to_string(),
    };

    let response = RootResponse {
        name: "Relish API Server".to_string(),
        version: state.version.clone(),
        description: "Review grid store with an =AI() cell formula".to_string(),
        endpoints: vec![
            endpoint("/health", "GET", "Health check endpoint"),
            endpoint("/version", "GET", "Get server version"),
            endpoint("/api/reviews", "GET", "All review rows"),
            endpoint("/api/review/create", "POST", "Insert a batch of rows"),
            endpoint("/api/review/update", "POST", "Patch rows by id"),
            endpoint("/api/review/delete", "POST", "Delete rows by id set"),
            endpoint("/api/generate", "POST", "Evaluate an =AI() formula"),
        ],
    };
    (StatusCode::OK, Json(DataResponse::ok(response))).into_response()
}
