//! Application error type and the API response envelope

use super::codes::ErrorCode;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Application error with a structured error code.
///
/// - [`ErrorCode`] decides the HTTP status at the boundary
/// - `message` is the client-facing `error` string in the envelope
/// - `details` carries optional field-level context
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AppError {
    pub code: ErrorCode,
    pub message: String,
    pub details: Option<Value>,
}

impl AppError {
    /// Create a new error with the default message for the error code
    pub fn new(code: ErrorCode) -> Self {
        Self {
            message: code.message().to_string(),
            code,
            details: None,
        }
    }

    /// Create a new error with a custom message
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Attach structured details to this error
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ValidationFailed, msg)
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InternalError, msg)
    }

    /// Get the HTTP status code for this error
    pub fn http_status(&self) -> StatusCode {
        self.code.http_status()
    }
}

/// Pagination block for list endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total_pages: i64,
    pub total_items: i64,
}

impl Pagination {
    pub fn new(page: i64, limit: i64, total_items: i64) -> Self {
        let total_pages = if limit > 0 {
            (total_items + limit - 1) / limit
        } else {
            0
        };
        Self {
            page,
            limit,
            total_pages,
            total_items,
        }
    }
}

/// Unified API response envelope.
///
/// Every endpoint responds with `{success, data?, message?, error?, details?,
/// pagination?}`; absent fields are omitted from the JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

impl<T> ApiResponse<T> {
    /// Success response with data
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            error: None,
            details: None,
            pagination: None,
        }
    }

    /// Success response with data and a human-readable message
    pub fn success_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::success(data)
        }
    }

    /// Success response for a list endpoint
    pub fn paginated(data: T, pagination: Pagination) -> Self {
        Self {
            pagination: Some(pagination),
            ..Self::success(data)
        }
    }

    /// Failure response that still carries data (e.g. a duplicate-payment
    /// conflict returning the existing payment)
    pub fn failure_with_data(data: T, error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: Some(data),
            message: None,
            error: Some(error.into()),
            details: None,
            pagination: None,
        }
    }
}

impl ApiResponse<()> {
    /// Success response without data
    pub fn message_only(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            message: Some(message.into()),
            error: None,
            details: None,
            pagination: None,
        }
    }

    /// Failure response from an AppError
    pub fn error(err: &AppError) -> Self {
        Self {
            success: false,
            data: None,
            message: None,
            error: Some(err.message.clone()),
            details: err.details.clone(),
            pagination: None,
        }
    }
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;

// ===== Axum Integration =====

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;

        if self.code.is_system() {
            tracing::error!(
                code = %self.code,
                message = %self.message,
                "System error occurred"
            );
        }

        let status = self.http_status();
        let body = ApiResponse::error(&self);
        (status, Json(body)).into_response()
    }
}

impl<T: Serialize> axum::response::IntoResponse for ApiResponse<T> {
    fn into_response(self) -> axum::response::Response {
        axum::Json(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_new() {
        let err = AppError::new(ErrorCode::OrderNotFound);
        assert_eq!(err.code, ErrorCode::OrderNotFound);
        assert_eq!(err.message, "Order not found or doesn't belong to the user");
        assert!(err.details.is_none());
    }

    #[test]
    fn test_app_error_with_details() {
        let err = AppError::validation("Invalid input data")
            .with_details(serde_json::json!({"field": "quantity"}));
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert_eq!(err.details.unwrap()["field"], "quantity");
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::with_message(ErrorCode::NotFound, "Order not found");
        assert_eq!(format!("{}", err), "Order not found");
    }

    #[test]
    fn test_success_envelope_shape() {
        let json = serde_json::to_value(ApiResponse::success(42)).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["data"], 42);
        assert!(json.get("error").is_none());
        assert!(json.get("message").is_none());
        assert!(json.get("pagination").is_none());
    }

    #[test]
    fn test_success_with_message() {
        let resp = ApiResponse::success_with_message("x", "Item added to cart");
        assert!(resp.success);
        assert_eq!(resp.data.as_deref(), Some("x"));
        assert_eq!(resp.message.as_deref(), Some("Item added to cart"));
    }

    #[test]
    fn test_error_envelope_shape() {
        let err = AppError::new(ErrorCode::CartEmpty);
        let json = serde_json::to_value(ApiResponse::error(&err)).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "Cart is empty");
        assert!(json.get("data").is_none());
    }

    #[test]
    fn test_failure_with_data() {
        let resp = ApiResponse::failure_with_data(7, "Payment already exists for this order");
        assert!(!resp.success);
        assert_eq!(resp.data, Some(7));
        assert_eq!(
            resp.error.as_deref(),
            Some("Payment already exists for this order")
        );
    }

    #[test]
    fn test_pagination_math() {
        let p = Pagination::new(1, 10, 25);
        assert_eq!(p.total_pages, 3);

        let p = Pagination::new(1, 10, 30);
        assert_eq!(p.total_pages, 3);

        let p = Pagination::new(1, 10, 0);
        assert_eq!(p.total_pages, 0);

        let p = Pagination::new(2, 100, 1);
        assert_eq!(p.total_pages, 1);
    }

    #[test]
    fn test_paginated_serialization() {
        let resp = ApiResponse::paginated(vec![1, 2], Pagination::new(1, 10, 2));
        let json = serde_json::to_value(resp).unwrap();
        assert_eq!(json["pagination"]["page"], 1);
        assert_eq!(json["pagination"]["limit"], 10);
        assert_eq!(json["pagination"]["total_pages"], 1);
        assert_eq!(json["pagination"]["total_items"], 2);
    }
}
