//! Error codes for the mealflow API
//!
//! Codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Cart errors
//! - 3xxx: Favorite errors
//! - 4xxx: Order errors
//! - 5xxx: Payment errors
//! - 6xxx: Product errors
//! - 9xxx: System errors

use http::StatusCode;
use std::fmt;

/// Unified error code enum, represented as u16 values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,

    // ==================== 1xxx: Auth ====================
    /// No valid session for the request
    NotAuthenticated = 1001,
    /// Session has expired
    SessionExpired = 1005,

    // ==================== 2xxx: Cart ====================
    /// Cart item not found (or owned by another user)
    CartItemNotFound = 2001,
    /// Cart is empty
    CartEmpty = 2002,

    // ==================== 3xxx: Favorite ====================
    /// Favorite not found (or owned by another user)
    FavoriteNotFound = 3001,

    // ==================== 4xxx: Order ====================
    /// Order not found (or owned by another user)
    OrderNotFound = 4001,
    /// Unique order/token number generation exhausted its retry budget
    OrderNumberExhausted = 4002,

    // ==================== 5xxx: Payment ====================
    /// A payment already exists for this order
    PaymentAlreadyExists = 5001,
    /// Invalid payment method
    PaymentInvalidMethod = 5002,

    // ==================== 6xxx: Product ====================
    /// Product not found
    ProductNotFound = 6001,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Default client-facing message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",

            ErrorCode::NotAuthenticated => "Unauthorized: Session not available",
            ErrorCode::SessionExpired => "Session has expired",

            ErrorCode::CartItemNotFound => "Cart item not found or doesn't belong to the user",
            ErrorCode::CartEmpty => "Cart is empty",

            ErrorCode::FavoriteNotFound => {
                "Product not found in favorites or doesn't belong to the user"
            }

            ErrorCode::OrderNotFound => "Order not found or doesn't belong to the user",
            ErrorCode::OrderNumberExhausted => {
                "Could not allocate a unique order number, please retry"
            }

            ErrorCode::PaymentAlreadyExists => "Payment already exists for this order",
            ErrorCode::PaymentInvalidMethod => "Invalid payment method",

            ErrorCode::ProductNotFound => "Product not found",

            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
        }
    }

    /// HTTP status this code maps to at the API boundary
    pub const fn http_status(&self) -> StatusCode {
        match self {
            ErrorCode::ValidationFailed
            | ErrorCode::InvalidRequest
            | ErrorCode::CartEmpty
            | ErrorCode::PaymentInvalidMethod => StatusCode::BAD_REQUEST,

            ErrorCode::NotAuthenticated | ErrorCode::SessionExpired => StatusCode::UNAUTHORIZED,

            ErrorCode::NotFound
            | ErrorCode::CartItemNotFound
            | ErrorCode::FavoriteNotFound
            | ErrorCode::OrderNotFound
            | ErrorCode::ProductNotFound => StatusCode::NOT_FOUND,

            ErrorCode::AlreadyExists | ErrorCode::PaymentAlreadyExists => StatusCode::CONFLICT,

            ErrorCode::Unknown
            | ErrorCode::OrderNumberExhausted
            | ErrorCode::InternalError
            | ErrorCode::DatabaseError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// System-category errors get full server-side logging
    pub const fn is_system(&self) -> bool {
        matches!(
            self,
            ErrorCode::Unknown
                | ErrorCode::OrderNumberExhausted
                | ErrorCode::InternalError
                | ErrorCode::DatabaseError
        )
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Unknown.code(), 1);
        assert_eq!(ErrorCode::ValidationFailed.code(), 2);
        assert_eq!(ErrorCode::NotFound.code(), 3);
        assert_eq!(ErrorCode::AlreadyExists.code(), 4);
        assert_eq!(ErrorCode::NotAuthenticated.code(), 1001);
        assert_eq!(ErrorCode::SessionExpired.code(), 1005);
        assert_eq!(ErrorCode::CartItemNotFound.code(), 2001);
        assert_eq!(ErrorCode::CartEmpty.code(), 2002);
        assert_eq!(ErrorCode::FavoriteNotFound.code(), 3001);
        assert_eq!(ErrorCode::OrderNotFound.code(), 4001);
        assert_eq!(ErrorCode::OrderNumberExhausted.code(), 4002);
        assert_eq!(ErrorCode::PaymentAlreadyExists.code(), 5001);
        assert_eq!(ErrorCode::ProductNotFound.code(), 6001);
        assert_eq!(ErrorCode::InternalError.code(), 9001);
        assert_eq!(ErrorCode::DatabaseError.code(), 9002);
    }

    #[test]
    fn test_http_status() {
        assert_eq!(ErrorCode::CartEmpty.http_status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ErrorCode::ValidationFailed.http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ErrorCode::NotAuthenticated.http_status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ErrorCode::OrderNotFound.http_status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ErrorCode::ProductNotFound.http_status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ErrorCode::PaymentAlreadyExists.http_status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ErrorCode::OrderNumberExhausted.http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ErrorCode::InternalError.http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_messages() {
        assert_eq!(ErrorCode::CartEmpty.message(), "Cart is empty");
        assert_eq!(
            ErrorCode::PaymentAlreadyExists.message(),
            "Payment already exists for this order"
        );
        assert_eq!(ErrorCode::ProductNotFound.message(), "Product not found");
    }

    #[test]
    fn test_is_system() {
        assert!(ErrorCode::InternalError.is_system());
        assert!(ErrorCode::OrderNumberExhausted.is_system());
        assert!(!ErrorCode::CartEmpty.is_system());
        assert!(!ErrorCode::OrderNotFound.is_system());
    }
}
