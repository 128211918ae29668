//! Identities, roles and role-specific profiles.
//!
//! An identity stores its role together with the attributes that role
//! requires, as a single tagged [`RoleProfile`]. A teacher without a subject or
//! a parent without a phone cannot be represented.

use chrono::{DateTime, NaiveDate, Utc};
use schoolhouse_core::{AppError, PaginationMeta, PaginationParams, hash_password, verify_password};
use schoolhouse_db::{Collection, Document};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::value_types::Email;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Teacher,
    Student,
    Parent,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Admin, Role::Teacher, Role::Student, Role::Parent];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Teacher => "teacher",
            Role::Student => "student",
            Role::Parent => "parent",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| format!("Unknown role '{}'", s))
    }
}

/// The role of an identity together with the attributes that role requires.
///
/// Serialized inline with the identity: `{ "role": "teacher", "subject": ..., ... }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum RoleProfile {
    Admin,
    Teacher {
        subject: String,
        qualifications: String,
    },
    Student {
        grade: String,
        #[serde(rename = "dateOfBirth")]
        date_of_birth: NaiveDate,
    },
    Parent {
        /// Full name of the child as declared at registration.
        #[serde(rename = "childName")]
        child_name: String,
        phone: String,
        /// Explicit link to the child's identity, when known.
        #[serde(rename = "childId", default, skip_serializing_if = "Option::is_none")]
        child_id: Option<Uuid>,
    },
}

impl RoleProfile {
    pub fn role(&self) -> Role {
        match self {
            RoleProfile::Admin => Role::Admin,
            RoleProfile::Teacher { .. } => Role::Teacher,
            RoleProfile::Student { .. } => Role::Student,
            RoleProfile::Parent { .. } => Role::Parent,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ProfileError {
    #[error("Subject and qualifications are required for teachers")]
    Teacher,
    #[error("Grade and date of birth are required for students")]
    Student,
    #[error("Child name and phone are required for parents")]
    Parent,
}

/// Role-specific attributes as they arrive in a request, all optional.
///
/// [`RoleAttributes::into_profile`] keeps the attributes the role needs,
/// rejects the request if any of them is missing, and drops the rest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoleAttributes {
    pub subject: Option<String>,
    pub qualifications: Option<String>,
    pub grade: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub child_name: Option<String>,
    pub phone: Option<String>,
    pub child_id: Option<Uuid>,
}

fn present(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl RoleAttributes {
    pub fn into_profile(self, role: Role) -> Result<RoleProfile, ProfileError> {
        match role {
            Role::Admin => Ok(RoleProfile::Admin),
            Role::Teacher => match (present(self.subject), present(self.qualifications)) {
                (Some(subject), Some(qualifications)) => Ok(RoleProfile::Teacher {
                    subject,
                    qualifications,
                }),
                _ => Err(ProfileError::Teacher),
            },
            Role::Student => match (present(self.grade), self.date_of_birth) {
                (Some(grade), Some(date_of_birth)) => Ok(RoleProfile::Student {
                    grade,
                    date_of_birth,
                }),
                _ => Err(ProfileError::Student),
            },
            Role::Parent => match (present(self.child_name), present(self.phone)) {
                (Some(child_name), Some(phone)) => Ok(RoleProfile::Parent {
                    child_name,
                    phone,
                    child_id: self.child_id,
                }),
                _ => Err(ProfileError::Parent),
            },
        }
    }

    pub fn from_profile(profile: &RoleProfile) -> Self {
        match profile.clone() {
            RoleProfile::Admin => Self::default(),
            RoleProfile::Teacher {
                subject,
                qualifications,
            } => Self {
                subject: Some(subject),
                qualifications: Some(qualifications),
                ..Self::default()
            },
            RoleProfile::Student {
                grade,
                date_of_birth,
            } => Self {
                grade: Some(grade),
                date_of_birth: Some(date_of_birth),
                ..Self::default()
            },
            RoleProfile::Parent {
                child_name,
                phone,
                child_id,
            } => Self {
                child_name: Some(child_name),
                phone: Some(phone),
                child_id,
                ..Self::default()
            },
        }
    }

    /// Attributes in `overrides` replace the ones in `self`.
    pub fn merge(self, overrides: RoleAttributes) -> Self {
        Self {
            subject: overrides.subject.or(self.subject),
            qualifications: overrides.qualifications.or(self.qualifications),
            grade: overrides.grade.or(self.grade),
            date_of_birth: overrides.date_of_birth.or(self.date_of_birth),
            child_name: overrides.child_name.or(self.child_name),
            phone: overrides.phone.or(self.phone),
            child_id: overrides.child_id.or(self.child_id),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// A stored identity, including the password hash.
///
/// The hash is only present when the record was loaded for authentication
/// or update. Records handed to request handlers have it stripped with
/// [`UserRecord::without_secret`].
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    password: Option<String>,
    #[serde(flatten)]
    pub profile: RoleProfile,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserRecord {
    /// Builds a new identity and hashes `password`.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: Email,
        password: &str,
        profile: RoleProfile,
    ) -> Result<Self, AppError> {
        let now = Utc::now();
        let mut record = Self {
            id: Uuid::new_v4(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            email,
            password: None,
            profile,
            created_at: now,
            updated_at: now,
        };
        record.set_password(password)?;
        Ok(record)
    }

    pub fn role(&self) -> Role {
        self.profile.role()
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Replaces the stored hash. The only way the hash changes.
    pub fn set_password(&mut self, password: &str) -> Result<(), AppError> {
        self.password = Some(hash_password(password)?);
        Ok(())
    }

    /// Checks `candidate` against the stored hash.
    ///
    /// Fails instead of returning `false` when the record was loaded without
    /// its hash, so a missing field can never read as a wrong password.
    pub fn verify_password(&self, candidate: &str) -> Result<bool, AppError> {
        let hash = self
            .password
            .as_deref()
            .ok_or_else(|| AppError::internal_error("Password hash not available"))?;
        verify_password(candidate, hash)
    }

    pub fn has_secret(&self) -> bool {
        self.password.is_some()
    }

    pub fn without_secret(mut self) -> Self {
        self.password = None;
        self
    }

    pub fn to_user(&self) -> User {
        User::from(self.clone())
    }
}

impl fmt::Debug for UserRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserRecord")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("role", &self.role())
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .finish_non_exhaustive()
    }
}

impl Document for UserRecord {
    const COLLECTION: Collection = Collection::Users;

    fn id(&self) -> Uuid {
        self.id
    }
}

/// An identity as returned by the API. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    #[serde(flatten)]
    pub profile: RoleProfile,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserRecord> for User {
    fn from(record: UserRecord) -> Self {
        Self {
            id: record.id,
            first_name: record.first_name,
            last_name: record.last_name,
            email: record.email,
            profile: record.profile,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

/// Payload for self-registration and admin-driven creation.
#[derive(Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserRequest {
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    pub email: Email,
    #[validate(length(min = 6, max = 128))]
    pub password: String,
    pub role: Role,
    #[serde(flatten)]
    pub attributes: RoleAttributes,
}

impl fmt::Debug for UserRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserRequest")
            .field("email", &self.email)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

/// Admin edit of any identity. Absent fields are left unchanged.
#[derive(Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserDto {
    #[validate(length(min = 1, max = 100))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub last_name: Option<String>,
    pub email: Option<Email>,
    #[validate(length(min = 6, max = 128))]
    pub password: Option<String>,
    pub role: Option<Role>,
    #[serde(flatten)]
    pub attributes: RoleAttributes,
}

impl fmt::Debug for UpdateUserDto {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpdateUserDto")
            .field("email", &self.email)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

/// Self-service profile update. The role cannot be changed here.
#[derive(Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileDto {
    #[validate(length(min = 1, max = 100))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub last_name: Option<String>,
    /// Parents only.
    #[validate(length(min = 1, max = 32))]
    pub phone: Option<String>,
    #[validate(length(min = 6, max = 128))]
    pub password: Option<String>,
}

impl fmt::Debug for UpdateProfileDto {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpdateProfileDto")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("phone", &self.phone)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Query parameters for listing identities.
#[derive(Debug, Clone, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct UserFilterParams {
    pub role: Option<Role>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl UserFilterParams {
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams {
            page: self.page,
            limit: self.limit,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PaginatedUsersResponse {
    pub data: Vec<User>,
    pub meta: PaginationMeta,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn teacher_attributes() -> RoleAttributes {
        RoleAttributes {
            subject: Some("Mathematics".into()),
            qualifications: Some("MSc".into()),
            ..RoleAttributes::default()
        }
    }

    #[test]
    fn test_role_round_trips_through_str() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
        assert!("superuser".parse::<Role>().is_err());
    }

    #[test]
    fn test_teacher_requires_subject_and_qualifications() {
        let missing_subject = RoleAttributes {
            subject: None,
            ..teacher_attributes()
        };
        assert_eq!(
            missing_subject.into_profile(Role::Teacher),
            Err(ProfileError::Teacher)
        );

        let blank = RoleAttributes {
            qualifications: Some("   ".into()),
            ..teacher_attributes()
        };
        assert_eq!(blank.into_profile(Role::Teacher), Err(ProfileError::Teacher));

        assert_eq!(
            ProfileError::Teacher.to_string(),
            "Subject and qualifications are required for teachers"
        );
    }

    #[test]
    fn test_student_and_parent_requirements() {
        assert_eq!(
            RoleAttributes::default().into_profile(Role::Student),
            Err(ProfileError::Student)
        );
        assert_eq!(
            RoleAttributes {
                child_name: Some("Alex Thompson".into()),
                ..RoleAttributes::default()
            }
            .into_profile(Role::Parent),
            Err(ProfileError::Parent)
        );
        assert_eq!(
            ProfileError::Parent.to_string(),
            "Child name and phone are required for parents"
        );
    }

    #[test]
    fn test_foreign_attributes_are_dropped() {
        let attributes = RoleAttributes {
            grade: Some("10".into()),
            date_of_birth: NaiveDate::from_ymd_opt(2010, 5, 1),
            subject: Some("History".into()),
            phone: Some("555-0100".into()),
            ..RoleAttributes::default()
        };

        let profile = attributes.into_profile(Role::Student).unwrap();
        assert_eq!(
            profile,
            RoleProfile::Student {
                grade: "10".into(),
                date_of_birth: NaiveDate::from_ymd_opt(2010, 5, 1).unwrap(),
            }
        );
        assert_eq!(RoleAttributes::default().into_profile(Role::Admin).unwrap(), RoleProfile::Admin);
    }

    #[test]
    fn test_merge_prefers_overrides() {
        let current = RoleAttributes::from_profile(&RoleProfile::Parent {
            child_name: "Alex Thompson".into(),
            phone: "555-0100".into(),
            child_id: None,
        });
        let merged = current.merge(RoleAttributes {
            phone: Some("555-0199".into()),
            ..RoleAttributes::default()
        });

        assert_eq!(
            merged.into_profile(Role::Parent).unwrap(),
            RoleProfile::Parent {
                child_name: "Alex Thompson".into(),
                phone: "555-0199".into(),
                child_id: None,
            }
        );
    }

    #[test]
    fn test_profile_is_flattened_with_role_tag() {
        let record = UserRecord::new(
            "Jane",
            "Doe",
            Email::new("jane@school.com").unwrap(),
            "secret1",
            teacher_attributes().into_profile(Role::Teacher).unwrap(),
        )
        .unwrap();

        let value = serde_json::to_value(record.to_user()).unwrap();
        assert_eq!(value["role"], "teacher");
        assert_eq!(value["subject"], "Mathematics");
        assert_eq!(value["firstName"], "Jane");
        assert!(value.get("password").is_none());

        let stored = serde_json::to_value(&record).unwrap();
        assert!(stored["password"].as_str().unwrap().starts_with("$2"));
        let back: UserRecord = serde_json::from_value(stored).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_parent_profile_deserializes_from_camel_case() {
        let profile: RoleProfile = serde_json::from_value(json!({
            "role": "parent",
            "childName": "Alex Thompson",
            "phone": "555-0100"
        }))
        .unwrap();

        assert_eq!(profile.role(), Role::Parent);
    }

    #[test]
    fn test_verify_without_secret_is_an_error() {
        let record = UserRecord::new(
            "Ada",
            "Admin",
            Email::new("admin@example.com").unwrap(),
            "admin123",
            RoleProfile::Admin,
        )
        .unwrap();

        assert!(record.verify_password("admin123").unwrap());
        assert!(!record.verify_password("admin124").unwrap());

        let stripped = record.without_secret();
        assert!(!stripped.has_secret());
        assert!(stripped.verify_password("admin123").is_err());
    }

    #[test]
    fn test_hash_changes_only_through_set_password() {
        let mut record = UserRecord::new(
            "Sam",
            "Student",
            Email::new("sam@school.com").unwrap(),
            "original",
            RoleProfile::Admin,
        )
        .unwrap();
        let before = serde_json::to_value(&record).unwrap()["password"].clone();

        record.first_name = "Samuel".into();
        let after_rename = serde_json::to_value(&record).unwrap()["password"].clone();
        assert_eq!(before, after_rename);

        record.set_password("changed").unwrap();
        assert!(record.verify_password("changed").unwrap());
        assert!(!record.verify_password("original").unwrap());
    }

    #[test]
    fn test_debug_redacts_password() {
        let record = UserRecord::new(
            "Ada",
            "Admin",
            Email::new("admin@example.com").unwrap(),
            "admin123",
            RoleProfile::Admin,
        )
        .unwrap();

        let debug = format!("{:?}", record);
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("$2"));
    }
}
