use derive_more::{Display, Error};
use log::error;
use ntex::{http, web};

/// Errors surfaced to HTTP clients as JSON.
///
/// The `Internal` variant keeps the underlying message for the log line but
/// never leaks it to the client.
#[derive(Debug, Display, Error)]
pub enum ApiError {
    #[display("resource not found")]
    NotFound,
    #[display("unauthorized")]
    Unauthorized,
    #[display("invalid input: {_0}")]
    InvalidInput(#[error(not(source))] String),
    #[display("conflict: {_0}")]
    Conflict(#[error(not(source))] String),
    #[display("internal server error")]
    Internal(#[error(not(source))] String),
}

impl web::error::WebResponseError for ApiError {
    fn error_response(&self, _: &web::HttpRequest) -> web::HttpResponse {
        error!("{:#?}", self);

        web::HttpResponse::build(self.status_code()).json(&serde_json::json!({
            "error": self.to_string(),
        }))
    }

    fn status_code(&self) -> http::StatusCode {
        match self {
            ApiError::NotFound => http::StatusCode::NOT_FOUND,
            ApiError::Unauthorized => http::StatusCode::UNAUTHORIZED,
            ApiError::InvalidInput(_) => http::StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => http::StatusCode::CONFLICT,
            ApiError::Internal(_) => http::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        ApiError::Internal(format!("{:#}", e))
    }
}

impl From<crate::api::application::ApplicationError> for ApiError {
    fn from(e: crate::api::application::ApplicationError) -> Self {
        use crate::api::application::ApplicationError;
        match e {
            ApplicationError::NotFound(_) => ApiError::NotFound,
            ApplicationError::InvalidTransition { .. } => ApiError::Conflict(e.to_string()),
            ApplicationError::Repo(e) => e.into(),
        }
    }
}

impl From<crate::api::badge::BadgeError> for ApiError {
    fn from(e: crate::api::badge::BadgeError) -> Self {
        use crate::api::badge::BadgeError;
        match e {
            BadgeError::ApplicationNotFound(_)
            | BadgeError::BadgeNotFound(_)
            | BadgeError::SellerNotFound(_) => ApiError::NotFound,
            BadgeError::ApplicationNotQualified { .. } | BadgeError::InvalidTransition { .. } => {
                ApiError::Conflict(e.to_string())
            }
            BadgeError::Repo(e) => e.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ntex::web::error::WebResponseError;

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::NotFound.status_code(), http::StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::Unauthorized.status_code(),
            http::StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::InvalidInput("bad".into()).status_code(),
            http::StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Conflict("dup".into()).status_code(),
            http::StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::Internal("boom".into()).status_code(),
            http::StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_message_is_not_leaked() {
        let err = ApiError::Internal("database is locked".into());
        assert_eq!(err.to_string(), "internal server error");
    }
}
