//! User seeding.
//!
//! Demo users share a single password hash: bcrypt is deliberately slow and
//! hashing once per user would dominate seeding time.

use chrono::NaiveDate;
use fake::Fake;
use fake::faker::name::en::{FirstName, LastName};
use fake::faker::phone_number::en::PhoneNumber;
use schoolhouse_db::Store;
use schoolhouse_models::{Email, RoleProfile, UserRecord};
use uuid::Uuid;

use super::{SeedConfig, SeedError};

pub const DEFAULT_ADMIN_EMAIL: &str = "admin@example.com";
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

/// Password of every generated demo user.
pub const DEMO_PASSWORD: &str = "password123";

const SUBJECTS: &[&str] = &[
    "Mathematics",
    "English",
    "Biology",
    "History",
    "Chemistry",
    "Geography",
];
const QUALIFICATIONS: &[&str] = &["B.Ed", "M.Ed", "BSc", "MSc", "PhD"];

#[derive(Debug, Clone, Default)]
pub struct SeededUsers {
    pub teachers: Vec<UserRecord>,
    pub students: Vec<UserRecord>,
    pub parents: Vec<UserRecord>,
}

/// Creates an administrator. Fails with [`SeedError::AlreadyExists`] if the
/// email is taken.
pub async fn create_admin(
    store: &Store,
    first_name: &str,
    last_name: &str,
    email: &str,
    password: &str,
) -> Result<UserRecord, SeedError> {
    let email = Email::new(email)?;
    let record = UserRecord::new(first_name, last_name, email, password, RoleProfile::Admin)?;

    match store.insert(&record).await {
        Ok(()) => Ok(record),
        Err(e) if e.is_duplicate() => Err(SeedError::AlreadyExists(record.email.into_inner())),
        Err(e) => Err(e.into()),
    }
}

/// Creates `admin@example.com` unless it already exists.
pub async fn seed_default_admin(store: &Store) -> Result<Option<UserRecord>, SeedError> {
    match create_admin(
        store,
        "System",
        "Admin",
        DEFAULT_ADMIN_EMAIL,
        DEFAULT_ADMIN_PASSWORD,
    )
    .await
    {
        Ok(record) => {
            tracing::info!(email = DEFAULT_ADMIN_EMAIL, "Default admin created");
            Ok(Some(record))
        }
        Err(SeedError::AlreadyExists(_)) => {
            tracing::debug!(email = DEFAULT_ADMIN_EMAIL, "Default admin already present");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// Generates teachers, students and parents. Each parent is linked to one
/// seeded student both by name and by id.
pub async fn seed_users(store: &Store, config: &SeedConfig) -> Result<SeededUsers, SeedError> {
    let template = UserRecord::new(
        "Demo",
        "User",
        Email::new("demo@example.com")?,
        DEMO_PASSWORD,
        RoleProfile::Admin,
    )?;
    let mut seeded = SeededUsers::default();

    for idx in 0..config.teachers {
        let profile = RoleProfile::Teacher {
            subject: SUBJECTS[idx % SUBJECTS.len()].to_string(),
            qualifications: QUALIFICATIONS[idx % QUALIFICATIONS.len()].to_string(),
        };
        let user = generate_user(&template, "teacher", idx, fake_name(), profile)?;
        store.insert(&user).await?;
        seeded.teachers.push(user);
    }

    for idx in 0..config.students {
        let profile = RoleProfile::Student {
            grade: (6 + idx % 7).to_string(),
            date_of_birth: fake_birth_date(),
        };
        let user = generate_user(&template, "student", idx, fake_name(), profile)?;
        store.insert(&user).await?;
        seeded.students.push(user);
    }

    for (idx, child) in seeded.students.iter().take(config.parents).enumerate() {
        let profile = RoleProfile::Parent {
            child_name: child.full_name(),
            phone: PhoneNumber().fake(),
            child_id: Some(child.id),
        };
        let name = (FirstName().fake(), child.last_name.clone());
        let user = generate_user(&template, "parent", idx, name, profile)?;
        store.insert(&user).await?;
        seeded.parents.push(user);
    }

    tracing::info!(
        teachers = seeded.teachers.len(),
        students = seeded.students.len(),
        parents = seeded.parents.len(),
        "Seeded demo users"
    );
    Ok(seeded)
}

fn fake_name() -> (String, String) {
    (FirstName().fake(), LastName().fake())
}

fn fake_birth_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(
        (2008..2016i32).fake::<i32>(),
        (1..13u32).fake::<u32>(),
        (1..29u32).fake::<u32>(),
    )
        .unwrap_or_default()
}

fn email_part(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_lowercase()
}

fn generate_user(
    template: &UserRecord,
    role_prefix: &str,
    idx: usize,
    (first_name, last_name): (String, String),
    profile: RoleProfile,
) -> Result<UserRecord, SeedError> {
    let email = Email::new(format!(
        "{}.{}+{}{}@example.com",
        email_part(&first_name),
        email_part(&last_name),
        role_prefix,
        idx
    ))?;

    let mut user = template.clone();
    user.id = Uuid::new_v4();
    user.first_name = first_name;
    user.last_name = last_name;
    user.email = email;
    user.profile = profile;
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use schoolhouse_db::Filter;

    #[tokio::test]
    async fn test_default_admin_can_log_in() {
        let store = Store::memory();
        let admin = seed_default_admin(&store).await.unwrap().unwrap();

        let stored: UserRecord = store.get(admin.id).await.unwrap().unwrap();
        assert_eq!(stored.email, DEFAULT_ADMIN_EMAIL);
        assert!(stored.verify_password(DEFAULT_ADMIN_PASSWORD).unwrap());
    }

    #[tokio::test]
    async fn test_create_admin_rejects_duplicate_email() {
        let store = Store::memory();
        create_admin(&store, "A", "One", "ops@example.com", "secret1")
            .await
            .unwrap();

        let error = create_admin(&store, "A", "Two", "OPS@example.com", "secret2")
            .await
            .unwrap_err();
        assert!(matches!(error, SeedError::AlreadyExists(_)));
    }

    #[tokio::test]
    async fn test_parents_link_to_seeded_children() {
        let store = Store::memory();
        let config = SeedConfig {
            teachers: 1,
            students: 3,
            parents: 2,
            class_capacity: 5,
        };

        let seeded = seed_users(&store, &config).await.unwrap();

        for (parent, child) in seeded.parents.iter().zip(&seeded.students) {
            match &parent.profile {
                RoleProfile::Parent {
                    child_name,
                    child_id,
                    ..
                } => {
                    assert_eq!(child_name, &child.full_name());
                    assert_eq!(*child_id, Some(child.id));
                }
                other => panic!("unexpected profile {:?}", other),
            }
        }

        let students: Vec<UserRecord> = store
            .find(&Filter::new().eq("role", "student"))
            .await
            .unwrap();
        assert_eq!(students.len(), 3);
        assert!(students[0].verify_password(DEMO_PASSWORD).unwrap());
    }
}
