//! Request gates.
//!
//! A protected request passes three stages, any of which can end it:
//!
//! 1. [`auth::authenticate`] resolves the bearer token to a stored identity (401)
//! 2. a `Require*` extractor from [`role`] checks the caller's role against
//!    the [`policy`] table (403)
//! 3. the service loads the resource and applies the instance check from
//!    [`ownership`] (403, or 400/404 where the failure is about the input)
//!
//! ```ignore
//! use crate::middleware::role::RequireSendMessage;
//!
//! async fn send_message(
//!     State(state): State<AppState>,
//!     RequireSendMessage(user): RequireSendMessage,
//!     Path(id): Path<Uuid>,
//!     ValidatedJson(dto): ValidatedJson<SendMessageDto>,
//! ) -> Result<impl IntoResponse, AppError> {
//!     let message = ConversationService::send_message(&state.store, user.record(), id, dto).await?;
//!     // ...
//! }
//! ```

pub mod auth;
pub mod ownership;
pub mod policy;
pub mod role;
