use anyhow::anyhow;
use chrono::Utc;
use schoolhouse_core::AppError;
use schoolhouse_db::{Filter, Store, StoreError};
use schoolhouse_models::{
    Class, PaginatedUsersResponse, ProfileError, Role, RoleAttributes, UpdateUserDto, UserFilterParams,
    UserRecord, UserRequest,
};
use tracing::instrument;
use uuid::Uuid;

use crate::metrics;

pub const EMAIL_EXISTS: &str = "Email already exists";
pub const ROLE_IN_USE: &str = "Cannot change the role of a user who is enrolled in or teaches a class";
pub const USER_IN_USE: &str = "Cannot delete a user who is enrolled in or teaches a class";

pub struct UserService;

impl UserService {
    /// Creates an identity for any role, validating the role's attributes.
    #[instrument(skip(store, dto), fields(email = %dto.email, role = %dto.role))]
    pub async fn create_user(store: &Store, dto: UserRequest) -> Result<UserRecord, AppError> {
        let profile = dto
            .attributes
            .into_profile(dto.role)
            .map_err(profile_error)?;

        let user = UserRecord::new(dto.first_name, dto.last_name, dto.email, &dto.password, profile)?;
        store.insert(&user).await.map_err(write_error)?;

        metrics::track_user_created(user.role().as_str());
        tracing::info!(user_id = %user.id, role = %user.role(), "User created");

        Ok(user.without_secret())
    }

    #[instrument(skip(store))]
    pub async fn list_users(
        store: &Store,
        filters: UserFilterParams,
    ) -> Result<PaginatedUsersResponse, AppError> {
        let filter = match filters.role {
            Some(role) => Filter::new().eq("role", role),
            None => Filter::new(),
        };

        let users: Vec<UserRecord> = store.find(&filter).await?;
        let (page, meta) = filters
            .pagination()
            .paginate(users.into_iter().map(UserRecord::without_secret).collect());

        Ok(PaginatedUsersResponse {
            data: page.into_iter().map(Into::into).collect(),
            meta,
        })
    }

    /// Loads an identity without its password hash; 404 when absent.
    #[instrument(skip(store))]
    pub async fn get_user(store: &Store, id: Uuid) -> Result<UserRecord, AppError> {
        Self::load(store, id).await.map(UserRecord::without_secret)
    }

    /// Admin edit. The role's attributes are re-validated against the merged
    /// result, so switching a user to `teacher` requires a subject as well.
    #[instrument(skip(store, dto))]
    pub async fn update_user(
        store: &Store,
        id: Uuid,
        dto: UpdateUserDto,
    ) -> Result<UserRecord, AppError> {
        let mut user = Self::load(store, id).await?;

        if let Some(first_name) = dto.first_name {
            user.first_name = first_name;
        }
        if let Some(last_name) = dto.last_name {
            user.last_name = last_name;
        }
        if let Some(email) = dto.email {
            user.email = email;
        }
        if let Some(password) = dto.password.as_deref() {
            user.set_password(password)?;
        }

        let role = dto.role.unwrap_or_else(|| user.role());
        if role != user.role() && referenced_by_class(store, &user).await? {
            return Err(AppError::bad_request(anyhow!(ROLE_IN_USE)));
        }
        let attributes = if role == user.role() {
            RoleAttributes::from_profile(&user.profile).merge(dto.attributes)
        } else {
            dto.attributes
        };
        user.profile = attributes.into_profile(role).map_err(profile_error)?;
        user.updated_at = Utc::now();

        if !store.replace(&user).await.map_err(write_error)? {
            return Err(AppError::not_found(anyhow!("User not found")));
        }

        tracing::info!(user_id = %user.id, role = %user.role(), "User updated");
        Ok(user.without_secret())
    }

    #[instrument(skip(store))]
    pub async fn delete_user(store: &Store, actor_id: Uuid, id: Uuid) -> Result<(), AppError> {
        if actor_id == id {
            return Err(AppError::bad_request(anyhow!("You cannot delete your own account")));
        }

        let user = Self::load(store, id).await?;
        if referenced_by_class(store, &user).await? {
            return Err(AppError::bad_request(anyhow!(USER_IN_USE)));
        }

        if !store.delete::<UserRecord>(id).await? {
            return Err(AppError::not_found(anyhow!("User not found")));
        }

        tracing::info!(user_id = %id, "User deleted");
        Ok(())
    }

    /// Full record, including the password hash.
    pub(crate) async fn load(store: &Store, id: Uuid) -> Result<UserRecord, AppError> {
        store
            .get::<UserRecord>(id)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("User not found")))
    }
}

/// A student identity without its hash; 404 for anything else.
pub(crate) async fn find_student(store: &Store, id: Uuid) -> Result<UserRecord, AppError> {
    match store.get::<UserRecord>(id).await? {
        Some(user) if user.role() == Role::Student => Ok(user.without_secret()),
        _ => Err(AppError::not_found(anyhow!("Student not found"))),
    }
}

/// Whether a class still points at `user` as its teacher or as an enrolled
/// student. Such users keep their role until the class lets go of them.
async fn referenced_by_class(store: &Store, user: &UserRecord) -> Result<bool, StoreError> {
    let filter = match user.role() {
        Role::Student => Filter::new().contains("students", user.id),
        Role::Teacher => Filter::new().eq("teacherId", user.id),
        Role::Admin | Role::Parent => return Ok(false),
    };

    Ok(store.find_one::<Class>(&filter).await?.is_some())
}

pub(crate) fn profile_error(error: ProfileError) -> AppError {
    AppError::bad_request(error)
}

/// Duplicate emails become a domain message; anything else stays a 500.
pub(crate) fn write_error(error: StoreError) -> AppError {
    if error.is_duplicate() {
        AppError::bad_request(anyhow!(EMAIL_EXISTS))
    } else {
        AppError::database(error)
    }
}
