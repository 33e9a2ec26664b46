//! Error codes, the API response envelope and the service-layer error type.

pub mod codes;
pub mod service;
pub mod types;

pub use codes::ErrorCode;
pub use service::{ServiceError, ServiceResult};
pub use types::{ApiResponse, AppError, Pagination};
