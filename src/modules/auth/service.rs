use anyhow::anyhow;
use chrono::Utc;
use schoolhouse_auth::TokenService;
use schoolhouse_core::AppError;
use schoolhouse_db::{Filter, Store};
use schoolhouse_models::{
    AuthResponse, LoginRequest, Role, RoleProfile, UpdateProfileDto, UserRecord, UserRequest,
};
use tracing::instrument;

use crate::metrics;
use crate::modules::users::UserService;
use crate::modules::users::service::write_error;

pub const INVALID_CREDENTIALS: &str = "Invalid credentials";

pub struct AuthService;

impl AuthService {
    /// Self-registration. Administrators are only created by another
    /// administrator or from the CLI. A self-registered parent is linked to
    /// their child by name only; an explicit `childId` is reserved for
    /// administrators.
    #[instrument(skip(store, tokens, dto), fields(email = %dto.email, role = %dto.role))]
    pub async fn register(
        store: &Store,
        tokens: &TokenService,
        mut dto: UserRequest,
    ) -> Result<AuthResponse, AppError> {
        if dto.role == Role::Admin {
            return Err(AppError::forbidden(
                "Administrator accounts cannot be self-registered",
            ));
        }

        dto.attributes.child_id = None;

        let user = UserService::create_user(store, dto).await?;
        let token = tokens.issue(user.id)?;
        metrics::track_jwt_issued();

        Ok(AuthResponse {
            token,
            user: user.into(),
        })
    }

    /// Every failure, unknown email or wrong password, reads the same.
    #[instrument(skip(store, tokens, dto), fields(email = %dto.email))]
    pub async fn login(
        store: &Store,
        tokens: &TokenService,
        dto: LoginRequest,
    ) -> Result<AuthResponse, AppError> {
        let email = dto.email.trim().to_lowercase();
        let user: Option<UserRecord> = store.find_one(&Filter::new().eq("email", &email)).await?;

        let Some(user) = user else {
            metrics::track_user_login_failure();
            tracing::warn!("Login failed: unknown email");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        };

        if !user.verify_password(&dto.password)? {
            metrics::track_user_login_failure();
            tracing::warn!(user_id = %user.id, "Login failed: wrong password");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        }

        let token = tokens.issue(user.id)?;
        metrics::track_jwt_issued();
        metrics::track_user_login_success(user.role().as_str());
        tracing::info!(user_id = %user.id, role = %user.role(), "User logged in");

        Ok(AuthResponse {
            token,
            user: user.without_secret().into(),
        })
    }

    /// Updates the caller's own names, phone and password. The password is
    /// re-hashed only when a new one is supplied.
    #[instrument(skip(store, current, dto), fields(user_id = %current.id))]
    pub async fn update_profile(
        store: &Store,
        current: &UserRecord,
        dto: UpdateProfileDto,
    ) -> Result<UserRecord, AppError> {
        let mut user = UserService::load(store, current.id).await?;

        if let Some(first_name) = dto.first_name {
            user.first_name = first_name;
        }
        if let Some(last_name) = dto.last_name {
            user.last_name = last_name;
        }
        if let Some(new_phone) = dto.phone {
            match &mut user.profile {
                RoleProfile::Parent { phone, .. } => *phone = new_phone,
                _ => {
                    return Err(AppError::bad_request(anyhow!(
                        "Only parents have a phone number on their profile"
                    )));
                }
            }
        }
        if let Some(password) = dto.password.as_deref() {
            user.set_password(password)?;
        }
        user.updated_at = Utc::now();

        if !store.replace(&user).await.map_err(write_error)? {
            return Err(AppError::unauthorized(crate::middleware::auth::USER_NOT_FOUND));
        }

        Ok(user.without_secret())
    }
}
