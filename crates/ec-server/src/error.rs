//! HTTP error mapping.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use ec_auth::AuthError;
use ec_commerce::CommerceError;
use thiserror::Error;

use crate::envelope::ApiResponse;

/// Errors returned by route handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Commerce(#[from] CommerceError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Malformed request body, query or path.
    #[error("{0}")]
    BadRequest(String),

    /// Unknown route.
    #[error("Route not found: {0}")]
    RouteNotFound(String),

    /// Known route, unsupported method.
    #[error("Method not allowed: {0}")]
    MethodNotAllowed(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Commerce(err) => match err {
                CommerceError::ProductNotFound(_)
                | CommerceError::OrderNotFound(_)
                | CommerceError::CartItemNotFound(_) => StatusCode::NOT_FOUND,
                CommerceError::EmptyCart
                | CommerceError::InvalidQuantity(_)
                | CommerceError::QuantityExceedsLimit(_, _)
                | CommerceError::Validation(_) => StatusCode::BAD_REQUEST,
                CommerceError::InvalidStatusTransition { .. }
                | CommerceError::ProductUnavailable(_) => StatusCode::CONFLICT,
            },
            ApiError::Auth(err) => match err {
                AuthError::InvalidCredentials | AuthError::Unauthenticated => {
                    StatusCode::UNAUTHORIZED
                }
                AuthError::Forbidden(_) => StatusCode::FORBIDDEN,
                AuthError::PasswordHash(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::RouteNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Commerce(err) => match err {
                CommerceError::ProductNotFound(_) => "PRODUCT_NOT_FOUND",
                CommerceError::OrderNotFound(_) => "ORDER_NOT_FOUND",
                CommerceError::CartItemNotFound(_) => "CART_ITEM_NOT_FOUND",
                CommerceError::EmptyCart => "EMPTY_CART",
                CommerceError::InvalidStatusTransition { .. } => "INVALID_STATUS_TRANSITION",
                CommerceError::InvalidQuantity(_) => "INVALID_QUANTITY",
                CommerceError::QuantityExceedsLimit(_, _) => "QUANTITY_EXCEEDS_LIMIT",
                CommerceError::ProductUnavailable(_) => "PRODUCT_UNAVAILABLE",
                CommerceError::Validation(_) => "VALIDATION_ERROR",
            },
            ApiError::Auth(err) => match err {
                AuthError::InvalidCredentials => "INVALID_CREDENTIALS",
                AuthError::Unauthenticated => "UNAUTHENTICATED",
                AuthError::Forbidden(_) => "FORBIDDEN",
                AuthError::PasswordHash(_) => "INTERNAL_ERROR",
            },
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::RouteNotFound(_) => "NOT_FOUND",
            ApiError::MethodNotAllowed(_) => "METHOD_NOT_ALLOWED",
            ApiError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, code = self.code(), "request rejected");
        }

        let body = ApiResponse::failure(self.to_string(), self.code());
        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

pub type ApiResult<T = Response> = Result<T, ApiError>;
