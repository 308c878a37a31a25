//! REST API handlers for the files and scenes proxy

use axum::{
    body::Bytes,
    extract::{RawQuery, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use futures_util::future::join_all;
use scenic_core::query::{first_value, query_pairs};
use scenic_core::{
    DeleteOutcome, Failure, PageRequest, RemoteError, ResourceData, ResourceKind,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use tracing::{debug, error, info};

use crate::state::AppState;

pub const BODY_REQUIRED: &str = "Body required.";
pub const INVALID_BODY: &str = "Invalid body.";
pub const METHOD_NOT_ALLOWED: &str = "Method not allowed.";
pub const UNKNOWN_ERROR: &str = "Unknown error.";
pub const UNKNOWN_REMOTE_ERROR: &str = "Unknown error from Vertex API.";

/// Error response body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorRes {
    pub message: String,
    pub status: u16,
}

impl ErrorRes {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: status.as_u16(),
        }
    }

    fn bad_request(message: &str) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl IntoResponse for ErrorRes {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self)).into_response()
    }
}

/// Translate a remote failure into the message and status sent to the browser
pub fn to_error_res(err: &RemoteError) -> ErrorRes {
    match err {
        RemoteError::Structured(response) => {
            let first = response.failure.as_ref().and_then(Failure::first);
            let message = first
                .and_then(|e| e.title.as_deref())
                .filter(|title| !title.is_empty())
                .unwrap_or(UNKNOWN_ERROR);
            let status = first
                .and_then(|e| e.status.as_deref())
                .and_then(|s| s.trim().parse::<u16>().ok())
                .and_then(|s| StatusCode::from_u16(s).ok())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            ErrorRes::new(status, message)
        }
        RemoteError::Unknown(_) => {
            ErrorRes::new(StatusCode::INTERNAL_SERVER_ERROR, UNKNOWN_REMOTE_ERROR)
        }
    }
}

#[derive(Debug, Serialize)]
struct ListRes {
    #[serde(skip_serializing_if = "Option::is_none")]
    cursor: Option<String>,
    data: Vec<ResourceData>,
    status: u16,
}

#[derive(Debug, Deserialize)]
struct DeleteReq {
    ids: Vec<String>,
}

#[derive(Debug, Serialize)]
struct DeleteRes {
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    status: u16,
    results: BTreeMap<String, DeleteOutcome>,
}

#[derive(Debug, Serialize)]
struct CreateRes {
    id: String,
    status: u16,
}

/// List files
pub async fn list_files(
    State(state): State<Arc<AppState>>,
    RawQuery(query): RawQuery,
) -> Response {
    list(&state, ResourceKind::Files, query.as_deref()).await
}

/// List scenes
pub async fn list_scenes(
    State(state): State<Arc<AppState>>,
    RawQuery(query): RawQuery,
) -> Response {
    list(&state, ResourceKind::Scenes, query.as_deref()).await
}

/// Delete files by id
pub async fn delete_files(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    delete(&state, ResourceKind::Files, &body).await
}

/// Delete scenes by id
pub async fn delete_scenes(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    delete(&state, ResourceKind::Scenes, &body).await
}

/// Create a file from the request body's attributes
pub async fn create_file(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    if is_blank(&body) {
        return ErrorRes::bad_request(BODY_REQUIRED).into_response();
    }

    let attributes = match serde_json::from_slice::<Value>(&body) {
        Ok(Value::Object(attributes)) if has_name(attributes.get("name")) => attributes,
        _ => return ErrorRes::bad_request(INVALID_BODY).into_response(),
    };

    match state.api.create_file(attributes).await {
        Ok(created) => {
            info!(id = %created.id, "File created");
            Json(CreateRes {
                id: created.id,
                status: StatusCode::OK.as_u16(),
            })
            .into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to create file");
            to_error_res(&e).into_response()
        }
    }
}

/// Any other method on a resource route
pub async fn method_not_allowed() -> Response {
    ErrorRes::new(StatusCode::METHOD_NOT_ALLOWED, METHOD_NOT_ALLOWED).into_response()
}

async fn list(state: &AppState, kind: ResourceKind, query: Option<&str>) -> Response {
    let request = page_request(
        kind,
        query.unwrap_or_default(),
        state.config.proxy.default_page_size,
    );
    debug!(
        resource = %kind,
        page_size = request.page_size,
        cursor = ?request.cursor,
        "Listing resources"
    );

    match state.api.list(kind, &request).await {
        Ok(page) => Json(ListRes {
            cursor: page.cursor,
            data: page.data,
            status: StatusCode::OK.as_u16(),
        })
        .into_response(),
        Err(e) => {
            error!(resource = %kind, error = %e, "Failed to list resources");
            to_error_res(&e).into_response()
        }
    }
}

/// Build the page request from `pageSize`, `cursor`, and (files only) `suppliedId`
fn page_request(kind: ResourceKind, query: &str, default_page_size: u32) -> PageRequest {
    let pairs = query_pairs(query);
    let page_size = first_value(&pairs, "pageSize")
        .and_then(|s| s.parse::<u32>().ok())
        .unwrap_or(default_page_size);
    let non_empty = |name: &str| {
        first_value(&pairs, name)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };

    PageRequest {
        page_size,
        cursor: non_empty("cursor"),
        supplied_id: match kind {
            ResourceKind::Files => non_empty("suppliedId"),
            ResourceKind::Scenes => None,
        },
    }
}

async fn delete(state: &AppState, kind: ResourceKind, body: &[u8]) -> Response {
    if is_blank(body) {
        return ErrorRes::bad_request(BODY_REQUIRED).into_response();
    }
    let Ok(DeleteReq { mut ids }) = serde_json::from_slice::<DeleteReq>(body) else {
        return ErrorRes::bad_request(INVALID_BODY).into_response();
    };

    // One remote delete per distinct id, in request order
    let mut seen = HashSet::new();
    ids.retain(|id| seen.insert(id.clone()));

    info!(resource = %kind, count = ids.len(), "Deleting resources");
    let api = &state.api;
    let results = join_all(ids.iter().map(|id| api.delete(kind, id))).await;

    let mut first_failure = None;
    let mut outcomes = BTreeMap::new();
    for (id, result) in ids.iter().zip(results) {
        let outcome = match result {
            Ok(()) => DeleteOutcome::Deleted,
            Err(e) => {
                error!(resource = %kind, id = %id, error = %e, "Failed to delete resource");
                let res = to_error_res(&e);
                let outcome = DeleteOutcome::Failed {
                    message: res.message.clone(),
                    status: res.status,
                };
                first_failure.get_or_insert(res);
                outcome
            }
        };
        outcomes.insert(id.clone(), outcome);
    }

    match first_failure {
        None => Json(DeleteRes {
            message: None,
            status: StatusCode::OK.as_u16(),
            results: outcomes,
        })
        .into_response(),
        Some(failure) => {
            let status = failure.status_code();
            (
                status,
                Json(DeleteRes {
                    message: Some(failure.message),
                    status: status.as_u16(),
                    results: outcomes,
                }),
            )
                .into_response()
        }
    }
}

fn is_blank(body: &[u8]) -> bool {
    body.iter().all(u8::is_ascii_whitespace)
}

fn has_name(name: Option<&Value>) -> bool {
    matches!(name, Some(Value::String(s)) if !s.is_empty())
}
