// Common types and utilities shared across the application

pub mod error;
pub mod pagination;
pub mod validation;

pub use error::{ApiError, ApiResult};
pub use pagination::{Page, PageArgs, PageInfo};
pub use validation::{unique_violation, FieldError};
