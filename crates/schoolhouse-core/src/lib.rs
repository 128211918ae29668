//! # Schoolhouse Core
//!
//! Core types, errors, and utilities for the Schoolhouse API.
//!
//! - [`errors`]: Application error type with HTTP response conversion
//! - [`response`]: The `{ success, message, data }` envelope every endpoint returns
//! - [`pagination`]: Pagination utilities for list endpoints
//! - [`password`]: Password hashing and verification
//!
//! # Example
//!
//! ```ignore
//! use schoolhouse_core::{ApiResponse, AppError, hash_password};
//!
//! let hash = hash_password("secure_password")?;
//! let error = AppError::not_found(anyhow::anyhow!("Class not found"));
//! let body = ApiResponse::ok(vec![1, 2, 3]);
//! ```

pub mod errors;
pub mod pagination;
pub mod password;
pub mod response;

pub use errors::AppError;
pub use pagination::{PaginationMeta, PaginationParams};
pub use password::{hash_password, verify_password};
pub use response::{ApiResponse, MessageResponse};
