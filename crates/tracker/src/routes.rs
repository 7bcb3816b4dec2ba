//! HTTP handlers for the issue API.
//!
//! Domain outcomes (validation failures, unknown ids) are reported as
//! `200 OK` with an `{"error": ...}` body. Only undecodable input and bad
//! `_id` filters produce a `400`.

use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use tracker_core::{FilterParams, Flag, IssueUpdates, NewIssue};

use crate::app::AppState;
use crate::payload::Payload;
use crate::service::ServiceError;

/// Build the axum router with all routes.
pub fn router(state: AppState) -> axum::Router {
    axum::Router::new()
        .route(
            "/api/issues/{project}",
            get(list_issues)
                .post(create_issue)
                .put(update_issue)
                .delete(delete_issue),
        )
        .fallback(not_found)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    error: String,
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    id: Option<Value>,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            id: None,
        }
    }

    fn from_service(err: &ServiceError) -> Self {
        Self {
            error: err.to_string(),
            id: err.id().map(|id| Value::String(id.to_string())),
        }
    }

    /// Like [`ErrorBody::from_service`], but echoes `_id` as the client sent it.
    fn echoing(err: &ServiceError, raw: Option<&RawId>) -> Self {
        let mut body = Self::from_service(err);
        if let (Some(_), Some(raw)) = (&body.id, raw) {
            body.id = Some(raw.echo());
        }
        body
    }
}

#[derive(Debug, Serialize)]
struct ResultBody {
    result: &'static str,
    #[serde(rename = "_id")]
    id: String,
}

/// Runs blocking store work off the async executor.
async fn blocking<T, F>(work: F) -> Result<T, Response>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work).await.map_err(|err| {
        tracing::error!("Internal error: {err}");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorBody::new("internal error")),
        )
            .into_response()
    })
}

fn outcome(err: &ServiceError) -> Response {
    Json(ErrorBody::from_service(err)).into_response()
}

/// An `_id` as found in a mutation body. Forms always carry text; JSON
/// bodies may carry any scalar (or worse).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Other(Value),
}

impl RawId {
    /// The key to look the issue up by, or `None` when the value is falsy
    /// (`null`, `false`, `0`). Empty text is left for the service to reject.
    fn key(&self) -> Option<String> {
        match self {
            Self::Text(s) => Some(s.clone()),
            Self::Other(Value::Null | Value::Bool(false)) => None,
            Self::Other(Value::Number(n)) if n.as_f64() == Some(0.0) => None,
            Self::Other(other) => Some(other.to_string()),
        }
    }

    fn echo(&self) -> Value {
        match self {
            Self::Text(s) => Value::String(s.clone()),
            Self::Other(v) => v.clone(),
        }
    }
}

// -- GET /api/issues/{project} --

async fn list_issues(
    State(state): State<AppState>,
    Path(project): Path<String>,
    params: Result<Query<FilterParams>, QueryRejection>,
) -> Response {
    let Query(params) = match params {
        Ok(params) => params,
        Err(rejection) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorBody::new(format!(
                    "invalid query string: {}",
                    rejection.body_text()
                ))),
            )
                .into_response();
        }
    };

    let service = state.service.clone();
    match blocking(move || service.list(&project, &params)).await {
        Ok(Ok(issues)) => Json(issues).into_response(),
        Ok(Err(err @ ServiceError::InvalidFilter(_))) => {
            (StatusCode::BAD_REQUEST, Json(ErrorBody::new(err.to_string()))).into_response()
        }
        Ok(Err(err)) => {
            tracing::warn!(error = %err, "listing issues failed");
            outcome(&err)
        }
        Err(response) => response,
    }
}

// -- POST /api/issues/{project} --

async fn create_issue(
    State(state): State<AppState>,
    Path(project): Path<String>,
    Payload(new): Payload<NewIssue>,
) -> Response {
    let service = state.service.clone();
    match blocking(move || service.create(&project, new)).await {
        Ok(Ok(issue)) => Json(issue).into_response(),
        Ok(Err(err)) => {
            if let ServiceError::Storage(e) = &err {
                tracing::warn!(error = %e, "creating issue failed");
            }
            outcome(&err)
        }
        Err(response) => response,
    }
}

// -- PUT /api/issues/{project} --

#[derive(Debug, Default, Deserialize)]
struct UpdateBody {
    #[serde(default, rename = "_id")]
    id: Option<RawId>,
    #[serde(default)]
    issue_title: Option<String>,
    #[serde(default)]
    issue_text: Option<String>,
    #[serde(default)]
    created_by: Option<String>,
    #[serde(default)]
    assigned_to: Option<String>,
    #[serde(default)]
    status_text: Option<String>,
    #[serde(default)]
    open: Option<Flag>,
}

impl UpdateBody {
    fn into_parts(self) -> (Option<RawId>, IssueUpdates) {
        let updates = IssueUpdates {
            issue_title: self.issue_title,
            issue_text: self.issue_text,
            created_by: self.created_by,
            assigned_to: self.assigned_to,
            status_text: self.status_text,
            open: self.open,
        };
        (self.id, updates)
    }
}

async fn update_issue(
    State(state): State<AppState>,
    Path(project): Path<String>,
    Payload(body): Payload<UpdateBody>,
) -> Response {
    let (raw, updates) = body.into_parts();
    let key = raw.as_ref().and_then(RawId::key);
    let service = state.service.clone();
    match blocking(move || service.update(&project, key.as_deref(), &updates)).await {
        Ok(Ok(id)) => Json(ResultBody {
            result: "successfully updated",
            id,
        })
        .into_response(),
        Ok(Err(err)) => Json(ErrorBody::echoing(&err, raw.as_ref())).into_response(),
        Err(response) => response,
    }
}

// -- DELETE /api/issues/{project} --

#[derive(Debug, Default, Deserialize)]
struct DeleteBody {
    #[serde(default, rename = "_id")]
    id: Option<RawId>,
}

async fn delete_issue(
    State(state): State<AppState>,
    Path(project): Path<String>,
    Payload(body): Payload<DeleteBody>,
) -> Response {
    let key = body.id.as_ref().and_then(RawId::key);
    let service = state.service.clone();
    match blocking(move || service.delete(&project, key.as_deref())).await {
        Ok(Ok(id)) => Json(ResultBody {
            result: "successfully deleted",
            id,
        })
        .into_response(),
        Ok(Err(err)) => Json(ErrorBody::echoing(&err, body.id.as_ref())).into_response(),
        Err(response) => response,
    }
}

// -- fallback --

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "Not Found")
}
