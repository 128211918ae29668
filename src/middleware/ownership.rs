//! Instance-level checks.
//!
//! These run inside services after the role gate has passed, once the
//! resource in question has been loaded. Each one corresponds to an
//! [`InstanceCheck`](crate::middleware::policy::InstanceCheck) in the policy
//! table.

use anyhow::anyhow;
use schoolhouse_core::AppError;
use schoolhouse_db::{Filter, Store};
use schoolhouse_models::{Class, Conversation, Event, Role, RoleProfile, UserRecord};
use uuid::Uuid;

pub const NOT_ENROLLED: &str = "Student does not belong to this class";
pub const NOT_PARTICIPANT: &str = "Not authorized to message in this conversation";
pub const CHILD_NOT_FOUND: &str = "Child not found";

/// Admin, or the teacher who owns `class`.
pub fn ensure_class_manager(user: &UserRecord, class: &Class) -> Result<(), AppError> {
    match user.role() {
        Role::Admin => Ok(()),
        Role::Teacher if class.is_taught_by(user.id) => Ok(()),
        _ => Err(AppError::forbidden("Not authorized to manage this class")),
    }
}

/// Admin, the owning teacher, or an enrolled student.
pub fn ensure_class_viewer(user: &UserRecord, class: &Class) -> Result<(), AppError> {
    match user.role() {
        Role::Admin => Ok(()),
        Role::Teacher if class.is_taught_by(user.id) => Ok(()),
        Role::Student if class.is_enrolled(user.id) => Ok(()),
        _ => Err(AppError::forbidden("Not authorized to view this class")),
    }
}

/// Rejects with 400 unless `student_id` is enrolled in `class`.
pub fn ensure_enrolled(class: &Class, student_id: Uuid) -> Result<(), AppError> {
    if class.is_enrolled(student_id) {
        Ok(())
    } else {
        Err(AppError::bad_request(anyhow!(NOT_ENROLLED)))
    }
}

pub fn ensure_participant(user: &UserRecord, conversation: &Conversation) -> Result<(), AppError> {
    if conversation.has_participant(user.id) {
        Ok(())
    } else {
        Err(AppError::forbidden(NOT_PARTICIPANT))
    }
}

/// Admin, or whoever created `event`.
pub fn ensure_event_owner(user: &UserRecord, event: &Event) -> Result<(), AppError> {
    if user.role() == Role::Admin || event.created_by == user.id {
        Ok(())
    } else {
        Err(AppError::forbidden("Not authorized to delete this event"))
    }
}

/// Splits a declared child name on the first space into first and last name.
pub fn split_child_name(child_name: &str) -> Option<(&str, &str)> {
    let (first, last) = child_name.trim().split_once(' ')?;
    let last = last.trim();
    (!first.is_empty() && !last.is_empty()).then_some((first, last))
}

/// Picks the single student whose first and last name match `child_name`
/// exactly. No match and several matches are both "Child not found".
pub fn match_child<'a>(
    child_name: &str,
    candidates: &'a [UserRecord],
) -> Result<&'a UserRecord, AppError> {
    let (first, last) =
        split_child_name(child_name).ok_or_else(|| AppError::not_found(anyhow!(CHILD_NOT_FOUND)))?;

    let mut matches = candidates.iter().filter(|candidate| {
        candidate.role() == Role::Student
            && candidate.first_name == first
            && candidate.last_name == last
    });

    match (matches.next(), matches.next()) {
        (Some(child), None) => Ok(child),
        _ => Err(AppError::not_found(anyhow!(CHILD_NOT_FOUND))),
    }
}

/// Resolves a parent's child to a student identity.
///
/// An explicit `childId` link wins. Without one, the declared child name is
/// matched against student first and last names, which is only as reliable
/// as the names are unique.
pub async fn resolve_child(store: &Store, parent: &UserRecord) -> Result<UserRecord, AppError> {
    let RoleProfile::Parent {
        child_name,
        child_id,
        ..
    } = &parent.profile
    else {
        return Err(AppError::forbidden("Only parents have linked children"));
    };

    if let Some(child_id) = child_id {
        return match store.get::<UserRecord>(*child_id).await? {
            Some(child) if child.role() == Role::Student => Ok(child.without_secret()),
            _ => Err(AppError::not_found(anyhow!(CHILD_NOT_FOUND))),
        };
    }

    let (first, last) =
        split_child_name(child_name).ok_or_else(|| AppError::not_found(anyhow!(CHILD_NOT_FOUND)))?;
    let candidates: Vec<UserRecord> = store
        .find(
            &Filter::new()
                .eq("role", Role::Student)
                .eq("firstName", first)
                .eq("lastName", last),
        )
        .await?;

    match_child(child_name, &candidates).map(|child| child.clone().without_secret())
}

/// Admin, any teacher, the student themself, or the student's parent.
pub async fn ensure_can_view_student(
    store: &Store,
    user: &UserRecord,
    student_id: Uuid,
) -> Result<(), AppError> {
    let allowed = match user.role() {
        Role::Admin | Role::Teacher => true,
        Role::Student => user.id == student_id,
        Role::Parent => match resolve_child(store, user).await {
            Ok(child) => child.id == student_id,
            Err(e) if e.status.is_client_error() => false,
            Err(e) => return Err(e),
        },
    };

    if allowed {
        Ok(())
    } else {
        Err(AppError::forbidden(
            "Not authorized to view this student's records",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use chrono::{NaiveDate, Utc};
    use schoolhouse_models::Email;

    fn record(first: &str, last: &str, profile: RoleProfile) -> UserRecord {
        let email = format!("{}.{}.{}@school.com", first, last, Uuid::new_v4()).to_lowercase();
        UserRecord::new(first, last, Email::new(email).unwrap(), "secret1", profile).unwrap()
    }

    fn student(first: &str, last: &str) -> UserRecord {
        record(
            first,
            last,
            RoleProfile::Student {
                grade: "8".into(),
                date_of_birth: NaiveDate::from_ymd_opt(2012, 4, 2).unwrap(),
            },
        )
    }

    fn teacher() -> UserRecord {
        record(
            "Tess",
            "Teacher",
            RoleProfile::Teacher {
                subject: "Math".into(),
                qualifications: "BSc".into(),
            },
        )
    }

    fn parent_of(child_name: &str, child_id: Option<Uuid>) -> UserRecord {
        record(
            "Pat",
            "Parent",
            RoleProfile::Parent {
                child_name: child_name.into(),
                phone: "555-0100".into(),
                child_id,
            },
        )
    }

    fn class_for(teacher_id: Uuid, students: Vec<Uuid>) -> Class {
        Class {
            id: Uuid::new_v4(),
            name: "Algebra".into(),
            subject: "Math".into(),
            teacher_id,
            students,
            capacity: 10,
            schedule: Vec::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_class_manager_is_admin_or_owner() {
        let owner = teacher();
        let other = teacher();
        let admin = record("Ada", "Admin", RoleProfile::Admin);
        let class = class_for(owner.id, vec![]);

        assert!(ensure_class_manager(&owner, &class).is_ok());
        assert!(ensure_class_manager(&admin, &class).is_ok());
        assert_eq!(
            ensure_class_manager(&other, &class).unwrap_err().status,
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn test_class_viewer_includes_enrolled_students() {
        let enrolled = student("Alex", "Thompson");
        let outsider = student("Sam", "Jones");
        let class = class_for(Uuid::new_v4(), vec![enrolled.id]);

        assert!(ensure_class_viewer(&enrolled, &class).is_ok());
        assert!(ensure_class_viewer(&outsider, &class).is_err());
        assert!(ensure_class_viewer(&parent_of("Alex Thompson", None), &class).is_err());
    }

    #[test]
    fn test_enrollment_failure_is_a_validation_error() {
        let class = class_for(Uuid::new_v4(), vec![Uuid::new_v4()]);
        let error = ensure_enrolled(&class, Uuid::new_v4()).unwrap_err();

        assert_eq!(error.status, StatusCode::BAD_REQUEST);
        assert_eq!(error.client_message(), NOT_ENROLLED);
    }

    #[test]
    fn test_participant_check() {
        let member = teacher();
        let outsider = teacher();
        let conversation = Conversation::new(member.id, [Uuid::new_v4()]);

        assert!(ensure_participant(&member, &conversation).is_ok());
        let error = ensure_participant(&outsider, &conversation).unwrap_err();
        assert_eq!(error.status, StatusCode::FORBIDDEN);
        assert_eq!(error.client_message(), NOT_PARTICIPANT);
    }

    #[test]
    fn test_event_owner_or_admin() {
        let creator = teacher();
        let event = Event {
            id: Uuid::new_v4(),
            title: "Science fair".into(),
            description: None,
            starts_at: Utc::now(),
            location: None,
            created_by: creator.id,
            created_at: Utc::now(),
        };

        assert!(ensure_event_owner(&creator, &event).is_ok());
        assert!(ensure_event_owner(&record("Ada", "Admin", RoleProfile::Admin), &event).is_ok());
        assert!(ensure_event_owner(&teacher(), &event).is_err());
    }

    #[test]
    fn test_split_child_name_on_first_space() {
        assert_eq!(split_child_name("Alex Thompson"), Some(("Alex", "Thompson")));
        assert_eq!(split_child_name("Mary Ann Smith"), Some(("Mary", "Ann Smith")));
        assert_eq!(split_child_name("Alex"), None);
        assert_eq!(split_child_name("  "), None);
    }

    #[test]
    fn test_match_child_requires_exactly_one_student() {
        let alex = student("Alex", "Thompson");
        let sam = student("Sam", "Jones");
        let candidates = vec![alex.clone(), sam];

        assert_eq!(match_child("Alex Thompson", &candidates).unwrap().id, alex.id);

        let missing = match_child("Jordan Lee", &candidates).unwrap_err();
        assert_eq!(missing.status, StatusCode::NOT_FOUND);
        assert_eq!(missing.client_message(), CHILD_NOT_FOUND);

        // Case-sensitive.
        assert!(match_child("alex thompson", &candidates).is_err());

        let twins = vec![alex.clone(), student("Alex", "Thompson")];
        assert!(match_child("Alex Thompson", &twins).is_err());
    }

    #[tokio::test]
    async fn test_resolve_child_by_name_and_by_link() {
        let store = Store::memory();
        let alex = student("Alex", "Thompson");
        let namesake = student("Alex", "Thompson");
        store.insert(&alex).await.unwrap();

        let by_name = resolve_child(&store, &parent_of("Alex Thompson", None))
            .await
            .unwrap();
        assert_eq!(by_name.id, alex.id);
        assert!(!by_name.has_secret());

        store.insert(&namesake).await.unwrap();
        assert!(resolve_child(&store, &parent_of("Alex Thompson", None)).await.is_err());

        let linked = resolve_child(&store, &parent_of("Alex Thompson", Some(namesake.id)))
            .await
            .unwrap();
        assert_eq!(linked.id, namesake.id);
    }

    #[tokio::test]
    async fn test_view_student_scoping() {
        let store = Store::memory();
        let alex = student("Alex", "Thompson");
        let sam = student("Sam", "Jones");
        store.insert(&alex).await.unwrap();
        store.insert(&sam).await.unwrap();
        let parent = parent_of("Alex Thompson", None);

        assert!(ensure_can_view_student(&store, &parent, alex.id).await.is_ok());
        assert!(ensure_can_view_student(&store, &parent, sam.id).await.is_err());
        assert!(ensure_can_view_student(&store, &alex, alex.id).await.is_ok());
        assert!(ensure_can_view_student(&store, &alex, sam.id).await.is_err());
        assert!(ensure_can_view_student(&store, &teacher(), sam.id).await.is_ok());
    }
}
