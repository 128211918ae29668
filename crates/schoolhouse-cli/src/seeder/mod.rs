//! Seeding for the document store.
//!
//! - [`users`]: the default administrator and fake teachers, students and parents
//! - [`classes`]: classes assigning seeded students to seeded teachers

pub mod classes;
pub mod users;

use std::time::Instant;

use schoolhouse_core::AppError;
use schoolhouse_db::{Store, StoreError};
use schoolhouse_models::ValueTypeError;

pub use classes::seed_classes;
pub use users::{
    DEFAULT_ADMIN_EMAIL, DEFAULT_ADMIN_PASSWORD, create_admin, seed_default_admin, seed_users,
};

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("{0}")]
    Store(#[from] StoreError),
    #[error("{0}")]
    InvalidEmail(#[from] ValueTypeError),
    #[error("Failed to hash password: {0}")]
    Password(String),
    #[error("A user with email {0} already exists")]
    AlreadyExists(String),
}

impl From<AppError> for SeedError {
    fn from(error: AppError) -> Self {
        SeedError::Password(error.error.to_string())
    }
}

/// How many fake records to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedConfig {
    pub teachers: usize,
    pub students: usize,
    /// Parents are created for the first `parents` students.
    pub parents: usize,
    pub class_capacity: u32,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            teachers: 4,
            students: 40,
            parents: 20,
            class_capacity: 15,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub admins: usize,
    pub teachers: usize,
    pub students: usize,
    pub parents: usize,
    pub classes: usize,
}

/// Seeds the default administrator plus demo users and classes.
pub async fn seed_all(store: &Store, config: SeedConfig) -> Result<SeedSummary, SeedError> {
    let start = Instant::now();

    let admins = usize::from(seed_default_admin(store).await?.is_some());
    let users = seed_users(store, &config).await?;
    let classes = seed_classes(store, &users.teachers, &users.students, config.class_capacity).await?;

    let summary = SeedSummary {
        admins,
        teachers: users.teachers.len(),
        students: users.students.len(),
        parents: users.parents.len(),
        classes: classes.len(),
    };

    tracing::info!(?summary, elapsed_ms = start.elapsed().as_millis() as u64, "Seeding complete");
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use schoolhouse_db::Filter;
    use schoolhouse_models::{Class, UserRecord};

    #[tokio::test]
    async fn test_seed_all_counts() {
        let store = Store::memory();
        let config = SeedConfig {
            teachers: 2,
            students: 6,
            parents: 3,
            class_capacity: 4,
        };

        let summary = seed_all(&store, config).await.unwrap();

        assert_eq!(
            summary,
            SeedSummary {
                admins: 1,
                teachers: 2,
                students: 6,
                parents: 3,
                classes: 2,
            }
        );

        let users: Vec<UserRecord> = store.find(&Filter::new()).await.unwrap();
        assert_eq!(users.len(), 12);

        let classes: Vec<Class> = store.find(&Filter::new()).await.unwrap();
        assert!(classes.iter().all(|class| class.students.len() <= 4));
    }

    #[tokio::test]
    async fn test_seeding_twice_keeps_one_admin() {
        let store = Store::memory();
        let config = SeedConfig {
            teachers: 0,
            students: 0,
            parents: 0,
            class_capacity: 1,
        };

        assert_eq!(seed_all(&store, config).await.unwrap().admins, 1);
        assert_eq!(seed_all(&store, config).await.unwrap().admins, 0);
    }
}
