//! `/Users` request handlers.

use axum::body::Bytes;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use scim_path::{canonicalize, Record};
use serde::Deserialize;
use serde_json::Value;

use super::envelope::{scim_json, ListResponse};
use super::error::ServerError;
use super::AppState;
use crate::filter::RecordFilter;
use crate::patch;
use crate::record::record_id;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub filter: Option<String>,
    pub start_index: Option<usize>,
    pub count: Option<usize>,
}

/// Parses a request body and lowercases its keys.
fn parse_body(body: &Bytes) -> Result<Value, ServerError> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| ServerError::InvalidSyntax(format!("invalid JSON body: {e}")))?;
    Ok(canonicalize(&value))
}

fn parse_user(body: &Bytes) -> Result<Record, ServerError> {
    match parse_body(body)? {
        Value::Object(map) => Ok(map),
        _ => Err(ServerError::InvalidSyntax("body must be a JSON object".into())),
    }
}

pub async fn list_users(
    State(state): State<AppState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Response, ServerError> {
    let Query(query) =
        query.map_err(|e| ServerError::InvalidSyntax(format!("invalid query: {}", e.body_text())))?;
    let store = state.store.read().await;
    let source = query.filter.as_deref().or(state.default_filter.as_deref());
    let filter = RecordFilter::parse(source, store.atomic_paths())?;
    let result = store.list(&filter);
    let start_index = query.start_index.unwrap_or(1).max(1);
    let page: Vec<&Record> = result
        .resources
        .into_iter()
        .skip(start_index - 1)
        .take(query.count.unwrap_or(usize::MAX))
        .collect();
    tracing::info!(filter = ?source, total = result.total_results, "listed users");
    Ok(scim_json(StatusCode::OK, &ListResponse::new(result.total_results, page, start_index)))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ServerError> {
    let store = state.store.read().await;
    let user = store.get(&id).ok_or_else(|| ServerError::NotFound(id.clone()))?;
    Ok(scim_json(StatusCode::OK, user))
}

pub async fn create_user(State(state): State<AppState>, body: Bytes) -> Result<Response, ServerError> {
    let input = parse_user(&body)?;
    let user = state.store.write().await.create(&input);
    tracing::info!(id = record_id(&user).unwrap_or_default(), "created user");
    Ok(scim_json(StatusCode::CREATED, &user))
}

pub async fn replace_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Response, ServerError> {
    let input = parse_user(&body)?;
    let user = state.store.write().await.replace(&id, &input)?;
    tracing::info!(%id, "replaced user");
    Ok(scim_json(StatusCode::OK, &user))
}

pub async fn patch_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Response, ServerError> {
    let ops = patch::from_json(&parse_body(&body)?)?;
    let (user, report) = state.store.write().await.patch(&id, &ops)?;
    tracing::info!(%id, applied = report.applied, skipped = report.skipped.len(), "patched user");
    Ok(scim_json(StatusCode::OK, &user))
}

pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ServerError> {
    state.store.write().await.remove(&id)?;
    tracing::info!(%id, "deleted user");
    Ok(StatusCode::NO_CONTENT.into_response())
}
