//! Catalog API error type

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApiError {
    #[error("Session expired, please log in again")]
    Unauthorized,
    #[error("You do not have permission to do that")]
    Forbidden,
    #[error("The requested resource does not exist")]
    NotFound,
    #[error("{0}")]
    Conflict(String),
    #[error("File is too large")]
    PayloadTooLarge,
    #[error("Unsupported file format")]
    UnsupportedMedia,
    #[error("{0}")]
    Validation(String),
    #[error("Internal server error")]
    Server,
    #[error("Request failed ({status}): {message}")]
    Other { status: u16, message: String },
    #[error("Network connection failed: {0}")]
    Network(String),
    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),
    #[error("Not an audio file (mp3, flac, wav): {0}")]
    InvalidFile(String),
    #[error("Unexpected response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Map a failed response to the error the user should see
    pub fn from_response(status: StatusCode, body: &str) -> Self {
        let detail = extract_detail(body);

        match status.as_u16() {
            401 => ApiError::Unauthorized,
            403 => ApiError::Forbidden,
            404 => ApiError::NotFound,
            409 => ApiError::Conflict(detail.unwrap_or_else(|| "Resource conflict".to_string())),
            413 => ApiError::PayloadTooLarge,
            415 => ApiError::UnsupportedMedia,
            422 => ApiError::Validation(detail.unwrap_or_else(|| "Validation failed".to_string())),
            500 => ApiError::Server,
            code => ApiError::Other {
                status: code,
                message: detail.unwrap_or_else(|| "Request failed".to_string()),
            },
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            ApiError::Decode(error.without_url().to_string())
        } else {
            ApiError::Network(error.without_url().to_string())
        }
    }
}

/// Pull `detail` or `message` out of an error body. FastAPI validation
/// errors carry a list under `detail`; the first entry's `msg` is used.
fn extract_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;

    let field = value.get("detail").or_else(|| value.get("message"))?;
    match field {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Array(items) => items
            .first()
            .and_then(|item| item.get("msg"))
            .and_then(|msg| msg.as_str())
            .map(str::to_string),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_known_statuses() {
        assert_eq!(ApiError::from_response(StatusCode::UNAUTHORIZED, ""), ApiError::Unauthorized);
        assert_eq!(ApiError::from_response(StatusCode::FORBIDDEN, ""), ApiError::Forbidden);
        assert_eq!(ApiError::from_response(StatusCode::NOT_FOUND, "{}"), ApiError::NotFound);
        assert_eq!(ApiError::from_response(StatusCode::PAYLOAD_TOO_LARGE, ""), ApiError::PayloadTooLarge);
        assert_eq!(ApiError::from_response(StatusCode::UNSUPPORTED_MEDIA_TYPE, ""), ApiError::UnsupportedMedia);
        assert_eq!(ApiError::from_response(StatusCode::INTERNAL_SERVER_ERROR, ""), ApiError::Server);
    }

    #[test]
    fn conflict_uses_server_detail() {
        let err = ApiError::from_response(StatusCode::CONFLICT, r#"{"detail": "Username already registered"}"#);
        assert_eq!(err.to_string(), "Username already registered");

        let err = ApiError::from_response(StatusCode::CONFLICT, "not json");
        assert_eq!(err.to_string(), "Resource conflict");
    }

    #[test]
    fn validation_reads_first_fastapi_message() {
        let body = r#"{"detail": [{"loc": ["body", "name"], "msg": "field required", "type": "missing"}]}"#;
        assert_eq!(
            ApiError::from_response(StatusCode::UNPROCESSABLE_ENTITY, body),
            ApiError::Validation("field required".to_string())
        );
    }

    #[test]
    fn unknown_status_falls_back_to_message_field() {
        let err = ApiError::from_response(StatusCode::BAD_REQUEST, r#"{"message": "bad page"}"#);
        assert_eq!(err, ApiError::Other { status: 400, message: "bad page".to_string() });
        assert!(!err.is_unauthorized());
    }
}
