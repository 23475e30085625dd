use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::response::{ApiResponse, Meta};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not Found")]
    NotFound,

    #[error("Product not found")]
    ProductNotFound,

    #[error("Favorite not found")]
    FavoriteNotFound,

    #[error("Customer not found")]
    CustomerNotFound,

    #[error("This product is already in your favorites")]
    DuplicateFavorite,

    #[error("You cannot delete your own account")]
    SelfDeletionForbidden,

    #[error("Bad Request {0}")]
    BadRequest(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Persistence error")]
    OrmError(#[from] sea_orm::DbErr),

    #[error("Internal Server Error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Stable machine-readable outcome kind.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::NotFound => "not_found",
            AppError::ProductNotFound => "product_not_found",
            AppError::FavoriteNotFound => "favorite_not_found",
            AppError::CustomerNotFound => "customer_not_found",
            AppError::DuplicateFavorite => "duplicate_favorite",
            AppError::SelfDeletionForbidden => "self_deletion_forbidden",
            AppError::BadRequest(_) => "bad_request",
            AppError::Unauthorized => "unauthorized",
            AppError::OrmError(_) => "persistence_failure",
            AppError::Internal(_) => "internal",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound
            | AppError::ProductNotFound
            | AppError::FavoriteNotFound
            | AppError::CustomerNotFound => StatusCode::NOT_FOUND,
            AppError::DuplicateFavorite => StatusCode::CONFLICT,
            AppError::SelfDeletionForbidden => StatusCode::FORBIDDEN,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::OrmError(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Serialize)]
struct ErrorData {
    code: &'static str,
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            AppError::OrmError(err) => tracing::error!(error = %err, "persistence failure"),
            AppError::Internal(err) => tracing::error!(error = %err, "internal error"),
            _ => {}
        }

        let body = ApiResponse {
            message: self.to_string(),
            data: Some(ErrorData {
                code: self.code(),
                error: self.to_string(),
            }),
            meta: Some(Meta::empty()),
        };

        (status, axum::Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
