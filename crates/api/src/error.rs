//! JSON error responses.
//!
//! Every failure leaves the API as `{ "error": CODE, "message": ... }`.
//! Server-side failures are logged and answered with a generic message.

use std::fmt;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use branchbook_core::float::FloatError;
use branchbook_core::ledger::LedgerError;
use branchbook_db::repositories::{BranchError, FloatAccountError, PostingError};
use sea_orm::DbErr;
use serde_json::json;
use tracing::error;
use validator::ValidationErrors;

/// An error ready to be sent to the client.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl ApiError {
    /// Creates an error from a numeric status code.
    pub fn new(status: u16, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            code,
            message: message.into(),
        }
    }

    /// 404 with the given code.
    pub fn not_found(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(404, code, message)
    }

    /// 400 with the given code.
    pub fn bad_request(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(400, code, message)
    }

    /// Logs `err` and hides it behind a generic message.
    fn internal(code: &'static str, err: &dyn fmt::Display) -> Self {
        error!(error = %err, code, "Request failed");
        Self::new(500, code, "An error occurred")
    }

    /// HTTP status of the response.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Machine readable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.code
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(json!({
                "error": self.code,
                "message": self.message
            })),
        )
            .into_response()
    }
}

impl From<LedgerError> for ApiError {
    fn from(e: LedgerError) -> Self {
        let status = e.http_status_code();
        if status >= 500 {
            Self::internal(e.error_code(), &e)
        } else {
            Self::new(status, e.error_code(), e.to_string())
        }
    }
}

impl From<FloatError> for ApiError {
    fn from(e: FloatError) -> Self {
        LedgerError::Float(e).into()
    }
}

impl From<PostingError> for ApiError {
    fn from(e: PostingError) -> Self {
        match e {
            PostingError::Ledger(e) => e.into(),
            PostingError::BranchNotFound(_) => Self::not_found("BRANCH_NOT_FOUND", e.to_string()),
            PostingError::BranchInactive(_) => Self::new(422, "BRANCH_INACTIVE", e.to_string()),
            PostingError::Corrupt(_) => Self::internal("INTERNAL_ERROR", &e),
            PostingError::Database(_) => Self::internal("DATABASE_ERROR", &e),
        }
    }
}

impl From<BranchError> for ApiError {
    fn from(e: BranchError) -> Self {
        match e {
            BranchError::NotFound(_) => Self::not_found("BRANCH_NOT_FOUND", e.to_string()),
            BranchError::DuplicateCode(_) => Self::new(409, "DUPLICATE_BRANCH_CODE", e.to_string()),
            BranchError::Database(_) => Self::internal("DATABASE_ERROR", &e),
        }
    }
}

impl From<FloatAccountError> for ApiError {
    fn from(e: FloatAccountError) -> Self {
        match e {
            FloatAccountError::Float(e) => e.into(),
            FloatAccountError::BranchNotFound(_) => {
                Self::not_found("BRANCH_NOT_FOUND", e.to_string())
            }
            FloatAccountError::Corrupt(_) => Self::internal("INTERNAL_ERROR", &e),
            FloatAccountError::Database(_) => Self::internal("DATABASE_ERROR", &e),
        }
    }
}

impl From<DbErr> for ApiError {
    fn from(e: DbErr) -> Self {
        Self::internal("DATABASE_ERROR", &e)
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(e: ValidationErrors) -> Self {
        Self::bad_request("VALIDATION_ERROR", e.to_string())
    }
}
