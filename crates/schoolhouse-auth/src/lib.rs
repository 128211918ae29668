//! # Schoolhouse Auth
//!
//! Identity tokens for the Schoolhouse API.
//!
//! - [`claims`]: the token payload ([`Claims`])
//! - [`jwt`]: [`TokenService`], which issues and verifies HS256-signed tokens
//!
//! Tokens carry only the subject identifier and the issue/expiry timestamps.
//! Roles and every other attribute are re-read from the user store on each
//! request, so a role change takes effect immediately.
//!
//! # Example
//!
//! ```ignore
//! use schoolhouse_auth::TokenService;
//! use schoolhouse_config::JwtConfig;
//!
//! let tokens = TokenService::new(JwtConfig::from_env()?)?;
//! let token = tokens.issue(user_id)?;
//! assert_eq!(tokens.verify(&token)?, user_id);
//! ```

pub mod claims;
pub mod jwt;

pub use claims::Claims;
pub use jwt::{TokenError, TokenService};
