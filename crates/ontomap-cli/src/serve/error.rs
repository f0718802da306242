//! Mapping of service errors onto HTTP responses.

use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use ontomap_core::OntomapError;

/// Error returned by handlers; renders as `{"detail": "..."}`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

impl ApiError {
    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            detail: detail.into(),
        }
    }
}

impl From<OntomapError> for ApiError {
    fn from(err: OntomapError) -> Self {
        let status = match &err {
            OntomapError::Input(_) => StatusCode::BAD_REQUEST,
            OntomapError::Unclassified(_) | OntomapError::Decode(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            OntomapError::NotFound(_) => StatusCode::NOT_FOUND,
            OntomapError::TooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            OntomapError::Mapping(_)
            | OntomapError::Graph(_)
            | OntomapError::Io { .. }
            | OntomapError::Worker(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!(error = %err, "request failed");
        } else {
            tracing::warn!(error = %err, "request rejected");
        }

        Self {
            status,
            detail: err.to_string(),
        }
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        Self {
            status: err.status(),
            detail: err.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "detail": self.detail }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (OntomapError::Input("x".into()), StatusCode::BAD_REQUEST),
            (OntomapError::Unclassified("a.csv".into()), StatusCode::UNPROCESSABLE_ENTITY),
            (OntomapError::Decode("x".into()), StatusCode::UNPROCESSABLE_ENTITY),
            (OntomapError::NotFound("id".into()), StatusCode::NOT_FOUND),
            (
                OntomapError::TooLarge { size: 2, limit: 1 },
                StatusCode::PAYLOAD_TOO_LARGE,
            ),
            (OntomapError::Worker("panic".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, expected) in cases {
            assert_eq!(ApiError::from(err).status, expected);
        }
    }
}
