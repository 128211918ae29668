//! Role gate extractors.
//!
//! Each extractor is bound to one [`Operation`] and admits the request only
//! when the caller's role is listed for it in the policy table. Handlers take
//! the extractor instead of [`CurrentUser`]:
//!
//! ```rust,ignore
//! pub async fn create_grade(
//!     State(state): State<AppState>,
//!     RequireCreateGrade(user): RequireCreateGrade,
//!     ValidatedJson(dto): ValidatedJson<CreateGradeDto>,
//! ) -> Result<impl IntoResponse, AppError> { ... }
//! ```
//!
//! [`Operation`]: crate::middleware::policy::Operation
//! [`CurrentUser`]: crate::middleware::auth::CurrentUser

/// Declares an extractor that admits callers whose role the policy table
/// allows for `$operation`.
#[macro_export]
macro_rules! require_roles {
    ($name:ident, $operation:expr) => {
        #[derive(Debug, Clone)]
        pub struct $name(pub $crate::middleware::auth::CurrentUser);

        impl $name {
            pub const OPERATION: $crate::middleware::policy::Operation = $operation;
        }

        impl axum::extract::FromRequestParts<$crate::state::AppState> for $name {
            type Rejection = schoolhouse_core::AppError;

            async fn from_request_parts(
                parts: &mut axum::http::request::Parts,
                state: &$crate::state::AppState,
            ) -> Result<Self, Self::Rejection> {
                let user = <$crate::middleware::auth::CurrentUser as axum::extract::FromRequestParts<
                    $crate::state::AppState,
                >>::from_request_parts(parts, state)
                .await?;

                $crate::middleware::policy::authorize_role(user.record(), Self::OPERATION)?;

                Ok($name(user))
            }
        }
    };
}

use crate::middleware::policy::Operation;

// Profile
require_roles!(RequireGetMe, Operation::GetMe);
require_roles!(RequireUpdateProfile, Operation::UpdateProfile);

// User administration
require_roles!(RequireListUsers, Operation::ListUsers);
require_roles!(RequireCreateUser, Operation::CreateUser);
require_roles!(RequireGetUser, Operation::GetUser);
require_roles!(RequireUpdateUser, Operation::UpdateUser);
require_roles!(RequireDeleteUser, Operation::DeleteUser);

// Classes
require_roles!(RequireListClasses, Operation::ListClasses);
require_roles!(RequireCreateClass, Operation::CreateClass);
require_roles!(RequireGetClass, Operation::GetClass);
require_roles!(RequireUpdateSchedule, Operation::UpdateSchedule);
require_roles!(RequireAddStudent, Operation::AddStudent);
require_roles!(RequireRemoveStudent, Operation::RemoveStudent);
require_roles!(RequireDeleteClass, Operation::DeleteClass);

// Grades
require_roles!(RequireCreateGrade, Operation::CreateGrade);
require_roles!(RequireClassGrades, Operation::ClassGrades);
require_roles!(RequireStudentGrades, Operation::StudentGrades);

// Attendance
require_roles!(RequireMarkAttendance, Operation::MarkAttendance);
require_roles!(RequireClassAttendance, Operation::ClassAttendance);
require_roles!(RequireStudentAttendance, Operation::StudentAttendance);

// Messaging
require_roles!(RequireCreateConversation, Operation::CreateConversation);
require_roles!(RequireListConversations, Operation::ListConversations);
require_roles!(RequireListMessages, Operation::ListMessages);
require_roles!(RequireSendMessage, Operation::SendMessage);

// Events
require_roles!(RequireListEvents, Operation::ListEvents);
require_roles!(RequireCreateEvent, Operation::CreateEvent);
require_roles!(RequireDeleteEvent, Operation::DeleteEvent);

// Parent views
require_roles!(RequireChildProfile, Operation::ChildProfile);
require_roles!(RequireChildGrades, Operation::ChildGrades);
require_roles!(RequireChildAttendance, Operation::ChildAttendance);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::auth::CurrentUser;
    use axum::extract::FromRequestParts;
    use axum::http::{Request, StatusCode};
    use schoolhouse_auth::TokenService;
    use schoolhouse_config::{CorsConfig, JwtConfig};
    use schoolhouse_db::Store;
    use schoolhouse_models::{Email, RoleProfile, UserRecord};

    fn state() -> crate::state::AppState {
        let tokens = TokenService::new(JwtConfig {
            secret: "role-test-secret".into(),
            token_expiry: 3600,
        })
        .unwrap();
        crate::state::AppState::new(Store::memory(), tokens, CorsConfig::from_lookup(|_| None))
    }

    fn user(profile: RoleProfile) -> UserRecord {
        UserRecord::new("Test", "User", Email::new("t@example.com").unwrap(), "secret1", profile)
            .unwrap()
            .without_secret()
    }

    fn parts_with(user: Option<UserRecord>) -> axum::http::request::Parts {
        let (mut parts, _) = Request::builder().uri("/").body(()).unwrap().into_parts();
        if let Some(user) = user {
            parts.extensions.insert(CurrentUser(user));
        }
        parts
    }

    #[tokio::test]
    async fn test_missing_identity_is_unauthenticated() {
        let mut parts = parts_with(None);
        let error = RequireListEvents::from_request_parts(&mut parts, &state())
            .await
            .unwrap_err();

        assert_eq!(error.status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_role_outside_policy_is_forbidden() {
        let student = user(RoleProfile::Student {
            grade: "9".into(),
            date_of_birth: chrono::NaiveDate::from_ymd_opt(2011, 1, 1).unwrap(),
        });
        let mut parts = parts_with(Some(student));

        let error = RequireCreateGrade::from_request_parts(&mut parts, &state())
            .await
            .unwrap_err();

        assert_eq!(error.status, StatusCode::FORBIDDEN);
        let message = error.to_string();
        assert!(message.contains("student"));
        assert!(message.contains("POST /api/grades"));
    }

    #[tokio::test]
    async fn test_allowed_roles_pass() {
        let teacher = user(RoleProfile::Teacher {
            subject: "Math".into(),
            qualifications: "BSc".into(),
        });
        let mut parts = parts_with(Some(teacher.clone()));
        let RequireCreateGrade(current) = RequireCreateGrade::from_request_parts(&mut parts, &state())
            .await
            .unwrap();
        assert_eq!(current.id(), teacher.id);

        let mut parts = parts_with(Some(user(RoleProfile::Admin)));
        assert!(
            RequireCreateGrade::from_request_parts(&mut parts, &state())
                .await
                .is_ok()
        );
    }
}
