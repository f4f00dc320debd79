//! Error-to-response mapping.

use actix_web::error::BlockingError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use log::error;
use thiserror::Error;
use wbdata_core::ServiceError;

/// Failure of one HTTP operation.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error("blocking task was cancelled")]
    Blocking(#[from] BlockingError),
}

impl ApiError {
    /// Human-readable body sent to the client.
    fn message(&self) -> &'static str {
        match self {
            Self::Service(ServiceError::InvalidIndicator(_)) => "Invalid Indicator",
            Self::Service(ServiceError::CollectionNotFound(_)) => "Collection does not exist!",
            Self::Service(ServiceError::NoMatch) => "Does not exist!",
            Self::Service(ServiceError::Upstream(_) | ServiceError::MalformedPayload(_)) => {
                "No response received from API"
            }
            Self::Service(_) | Self::Blocking(_) => "Internal server error",
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Service(err) if err.is_client_error() => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            error!(
                "event=http_request module=http status=error http_status={} error={}",
                status.as_u16(),
                self
            );
        }
        HttpResponse::build(status)
            .content_type("text/plain; charset=utf-8")
            .body(self.message())
    }
}
