//! SCIM response envelopes.

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use scim_path::Record;
use serde::Serialize;

pub const LIST_RESPONSE_SCHEMA: &str = "urn:ietf:params:scim:api:messages:2.0:ListResponse";
pub const ERROR_SCHEMA: &str = "urn:ietf:params:scim:api:messages:2.0:Error";
pub const SCIM_CONTENT_TYPE: &str = "application/scim+json";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse<'a> {
    pub schemas: [&'static str; 1],
    pub total_results: usize,
    #[serde(rename = "Resources")]
    pub resources: Vec<&'a Record>,
    pub start_index: usize,
    pub items_per_page: usize,
}

impl<'a> ListResponse<'a> {
    pub fn new(total_results: usize, resources: Vec<&'a Record>, start_index: usize) -> Self {
        Self {
            schemas: [LIST_RESPONSE_SCHEMA],
            total_results,
            items_per_page: resources.len(),
            resources,
            start_index,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub schemas: [&'static str; 1],
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scim_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ErrorResponse {
    pub fn new(status: StatusCode, scim_type: Option<&'static str>, detail: Option<String>) -> Self {
        Self { schemas: [ERROR_SCHEMA], status: status.as_u16(), scim_type, detail }
    }
}

/// Serializes `body` as `application/scim+json`.
pub fn scim_json<T: Serialize + ?Sized>(status: StatusCode, body: &T) -> Response {
    match serde_json::to_vec(body) {
        Ok(bytes) => (status, [(header::CONTENT_TYPE, SCIM_CONTENT_TYPE)], bytes).into_response(),
        Err(err) => {
            tracing::error!("failed to encode response: {err}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
