use reqwest::StatusCode;
use thiserror::Error;

use crate::domain::errors::DomainError;

/// Errors that can occur when talking to the record API
#[derive(Error, Debug)]
pub enum ApiError {
    /// Rejected request body or query (HTTP 400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Record or collection does not exist (HTTP 404)
    #[error("Resource not found")]
    NotFound,

    /// Conflicting write such as a duplicate id (HTTP 409)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Server-side failure (HTTP 5xx)
    #[error("Server error ({0}): {1}")]
    ServerError(StatusCode, String),

    /// Network or connection error
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Any other non-success status
    #[error("Unexpected response ({0}): {1}")]
    UnknownError(StatusCode, String),
}

impl ApiError {
    /// Classify a non-success response by its status code.
    pub fn from_status(status: StatusCode, body: String) -> Self {
        match status.as_u16() {
            400 => Self::BadRequest(body),
            404 => Self::NotFound,
            409 => Self::Conflict(body),
            500..=599 => Self::ServerError(status, body),
            _ => Self::UnknownError(status, body),
        }
    }

    /// Convert into a domain error for the record addressed by the request.
    pub fn into_domain(self, collection: &str, id: Option<&str>) -> DomainError {
        match (self, id) {
            (Self::NotFound, Some(id)) => DomainError::not_found(collection, id),
            (Self::NotFound, None) => {
                DomainError::Store(format!("Collection '{collection}' not found"))
            }
            (Self::JsonError(err), _) => DomainError::Serialization(err.to_string()),
            (Self::NetworkError(err), _) => DomainError::Store(format!(
                "Could not reach the record API: {err}"
            )),
            (other, _) => DomainError::Store(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_classification() {
        assert!(matches!(
            ApiError::from_status(StatusCode::BAD_REQUEST, "bad".to_string()),
            ApiError::BadRequest(_)
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::NOT_FOUND, String::new()),
            ApiError::NotFound
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::CONFLICT, "dup".to_string()),
            ApiError::Conflict(_)
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::BAD_GATEWAY, String::new()),
            ApiError::ServerError(StatusCode::BAD_GATEWAY, _)
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::UNAUTHORIZED, String::new()),
            ApiError::UnknownError(StatusCode::UNAUTHORIZED, _)
        ));
    }

    #[test]
    fn test_not_found_becomes_domain_not_found() {
        let err = ApiError::NotFound.into_domain("risks", Some("9"));
        assert!(matches!(err, DomainError::NotFound { ref collection, ref id }
            if collection == "risks" && id == "9"));
    }

    #[test]
    fn test_server_error_message_is_kept() {
        let err = ApiError::from_status(StatusCode::INTERNAL_SERVER_ERROR, "db locked".to_string())
            .into_domain("risks", None);
        match err {
            DomainError::Store(msg) => assert!(msg.contains("db locked")),
            other => panic!("Expected Store error, got {other:?}"),
        }
    }
}
