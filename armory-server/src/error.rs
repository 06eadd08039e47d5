//! HTTP error taxonomy.
//!
//! Every failure a client can see collapses into 400 / 401 / 404 / 500,
//! rendered as a uniform `{"error": true, "code": …, "detail": "…"}`
//! body. Store and I/O failures map to 500 without leaking internals
//! beyond the error's display form.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use armory_store::StoreError;

#[derive(Debug)]
pub struct HttpError {
    pub code: StatusCode,
    pub detail: String,
}

#[derive(Serialize)]
struct ErrorBody {
    error: bool,
    code: u16,
    detail: String,
}

impl HttpError {
    pub fn bad_request(detail: impl Into<String>) -> HttpError {
        HttpError {
            code: StatusCode::BAD_REQUEST,
            detail: detail.into(),
        }
    }

    pub fn unauthorized(detail: impl Into<String>) -> HttpError {
        HttpError {
            code: StatusCode::UNAUTHORIZED,
            detail: detail.into(),
        }
    }

    pub fn not_found(detail: impl Into<String>) -> HttpError {
        HttpError {
            code: StatusCode::NOT_FOUND,
            detail: detail.into(),
        }
    }

    pub fn internal(detail: impl Into<String>) -> HttpError {
        HttpError {
            code: StatusCode::INTERNAL_SERVER_ERROR,
            detail: detail.into(),
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        (
            self.code,
            Json(ErrorBody {
                error: true,
                code: self.code.as_u16(),
                detail: self.detail,
            }),
        )
            .into_response()
    }
}

impl From<StoreError> for HttpError {
    fn from(e: StoreError) -> HttpError {
        log::error!("store failure: {e}");
        HttpError::internal(e.to_string())
    }
}

impl From<std::io::Error> for HttpError {
    fn from(e: std::io::Error) -> HttpError {
        HttpError::internal(e.to_string())
    }
}

/// Errors starting the server itself (before any request exists).
#[derive(Debug, Error)]
pub enum ServeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}
