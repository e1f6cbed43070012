use crate::models::ProfileError;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn internal(err: impl std::error::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: err.to_string(),
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.status, self.message)
    }
}

impl std::error::Error for AppError {}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::internal(err)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::internal(err)
    }
}

impl From<ProfileError> for AppError {
    fn from(err: ProfileError) -> Self {
        Self::bad_request(err.to_string())
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        if self.status.is_server_error() {
            tracing::error!(status = %self.status, "request failed: {}", self.message);
        }
        (self.status, self.message).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_errors_map_to_bad_request() {
        let err: AppError = ProfileError::ZeroPackSize.into();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert!(err.message.contains("pack"));
    }

    #[test]
    fn io_errors_map_to_internal() {
        let err: AppError = std::io::Error::other("disk full").into();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message, "disk full");
    }

    #[test]
    fn mistyped_profile_body_maps_to_bad_request() {
        let body = br#"{"startMonth":1,"startYear":2020,"avgPerDay":10,"perPack":-1,"costPerCig":16}"#;
        let rejection = axum::Json::<crate::models::Profile>::from_bytes(body).unwrap_err();
        let err: AppError = rejection.into();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert!(err.message.contains("perPack"));
    }
}
