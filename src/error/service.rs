//! Unified service-layer error type
//!
//! `ServiceError` bridges DB-layer errors (`sqlx::Error`) and the API-layer
//! error (`AppError`). It enables `?` propagation without manual
//! `.map_err(|e| { tracing::error!(...); AppError::new(...) })` boilerplate.

use axum::response::IntoResponse;

use super::codes::ErrorCode;
use super::types::AppError;

/// Service-layer error — only two variants.
///
/// - `Db`: database/infrastructure errors (auto-logged, mapped to InternalError)
/// - `App`: business-rule errors (transparent pass-through to the client)
#[derive(Debug)]
pub enum ServiceError {
    /// Database or infrastructure error
    Db(sqlx::Error),
    /// Business-rule error (already an AppError with the correct ErrorCode)
    App(AppError),
}

impl From<sqlx::Error> for ServiceError {
    fn from(e: sqlx::Error) -> Self {
        ServiceError::Db(e)
    }
}

impl From<AppError> for ServiceError {
    fn from(e: AppError) -> Self {
        ServiceError::App(e)
    }
}

impl From<ServiceError> for AppError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::App(app_err) => app_err,
            ServiceError::Db(db_err) => {
                tracing::error!(error = %db_err, "Service database error");
                AppError::new(ErrorCode::InternalError)
            }
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> axum::response::Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

/// Convenience type alias for service-layer results
pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_passes_through() {
        let err: ServiceError = AppError::new(ErrorCode::CartEmpty).into();
        let app: AppError = err.into();
        assert_eq!(app.code, ErrorCode::CartEmpty);
        assert_eq!(app.message, "Cart is empty");
    }

    #[test]
    fn test_db_error_maps_to_internal() {
        let err: ServiceError = sqlx::Error::RowNotFound.into();
        let app: AppError = err.into();
        assert_eq!(app.code, ErrorCode::InternalError);
    }
}
