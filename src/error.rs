use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::mail::MailError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not Found")]
    NotFound,

    #[error("Bad Request {0}")]
    BadRequest(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden")]
    Forbidden,

    #[error("Product {0} is out of stock")]
    OutOfStock(Uuid),

    #[error("Too many submissions")]
    RateLimited,

    #[error("Database error")]
    DbError(#[from] sqlx::Error),

    #[error("ORM error")]
    OrmError(#[from] sea_orm::DbErr),

    #[error("Mail delivery failed")]
    Mail(#[from] MailError),

    #[error("Internal Server Error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::OutOfStock(_) => StatusCode::CONFLICT,
            AppError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            AppError::DbError(_)
            | AppError::OrmError(_)
            | AppError::Mail(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Machine-readable code clients branch on.
    pub fn code(&self) -> String {
        match self {
            AppError::NotFound => "NOT_FOUND".to_string(),
            AppError::BadRequest(code) => code.clone(),
            AppError::Unauthorized => "UNAUTHORIZED".to_string(),
            AppError::Forbidden => "FORBIDDEN".to_string(),
            AppError::OutOfStock(_) => "OUT_OF_STOCK".to_string(),
            AppError::RateLimited => "rate_limited".to_string(),
            _ => "SERVER_ERROR".to_string(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub ok: bool,
    pub error: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            match &self {
                AppError::DbError(err) => tracing::error!(error = %err, "database error"),
                AppError::OrmError(err) => tracing::error!(error = %err, "orm error"),
                AppError::Mail(err) => tracing::error!(error = %err, "mail error"),
                AppError::Internal(err) => tracing::error!(error = %err, "internal error"),
                _ => {}
            }
        }

        let body = ErrorBody {
            ok: false,
            error: self.code(),
            message: self.to_string(),
        };

        (status, axum::Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stock_conflicts_map_to_409() {
        let err = AppError::OutOfStock(Uuid::nil());
        assert_eq!(err.status(), StatusCode::CONFLICT);
        assert_eq!(err.code(), "OUT_OF_STOCK");
    }

    #[test]
    fn bad_request_carries_its_code() {
        let err = AppError::BadRequest("INVALID_ITEMS".into());
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.code(), "INVALID_ITEMS");
    }

    #[test]
    fn server_errors_hide_details() {
        let err = AppError::Internal(anyhow::anyhow!("secret detail"));
        assert_eq!(err.code(), "SERVER_ERROR");
        assert_eq!(err.to_string(), "Internal Server Error");
    }
}
