//! Boundary errors and their SCIM error envelopes.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use super::envelope::{scim_json, ErrorResponse};
use crate::filter::FilterError;
use crate::patch::InvalidPatchBody;
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("resource {0:?} not found")]
    NotFound(String),
    #[error("missing or invalid bearer token")]
    Unauthorized,
    #[error(transparent)]
    InvalidFilter(#[from] FilterError),
    #[error("{0}")]
    InvalidSyntax(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::NotFound(_) => StatusCode::NOT_FOUND,
            ServerError::Unauthorized => StatusCode::UNAUTHORIZED,
            ServerError::InvalidFilter(_) | ServerError::InvalidSyntax(_) => StatusCode::BAD_REQUEST,
            ServerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn scim_type(&self) -> Option<&'static str> {
        match self {
            ServerError::InvalidFilter(_) => Some("invalidFilter"),
            ServerError::InvalidSyntax(_) => Some("invalidSyntax"),
            _ => None,
        }
    }
}

impl From<StoreError> for ServerError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => ServerError::NotFound(id),
            other => ServerError::Internal(other.to_string()),
        }
    }
}

impl From<InvalidPatchBody> for ServerError {
    fn from(err: InvalidPatchBody) -> Self {
        ServerError::InvalidSyntax(err.to_string())
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{self}");
        }
        let body = ErrorResponse::new(status, self.scim_type(), Some(self.to_string()));
        scim_json(status, &body)
    }
}
