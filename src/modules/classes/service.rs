use anyhow::anyhow;
use chrono::Utc;
use schoolhouse_core::AppError;
use schoolhouse_db::{Filter, Store};
use schoolhouse_models::{Class, CreateClassDto, Role, UpdateScheduleDto, UserRecord};
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::ownership::{ensure_class_manager, ensure_class_viewer, ensure_enrolled};

pub const CLASS_FULL: &str = "Class is at full capacity";

pub struct ClassService;

impl ClassService {
    /// Classes visible to the caller: all for admins, taught classes for
    /// teachers, enrolled classes for students.
    #[instrument(skip(store, user), fields(user_id = %user.id, role = %user.role()))]
    pub async fn list_classes(store: &Store, user: &UserRecord) -> Result<Vec<Class>, AppError> {
        let filter = match user.role() {
            Role::Admin => Filter::new(),
            Role::Teacher => Filter::new().eq("teacherId", user.id),
            Role::Student => Filter::new().contains("students", user.id),
            Role::Parent => return Ok(Vec::new()),
        };

        Ok(store.find(&filter).await?)
    }

    #[instrument(skip(store, dto), fields(name = %dto.name, teacher_id = %dto.teacher_id))]
    pub async fn create_class(store: &Store, dto: CreateClassDto) -> Result<Class, AppError> {
        load_with_role(store, dto.teacher_id, Role::Teacher).await?;

        let mut students: Vec<Uuid> = Vec::with_capacity(dto.students.len());
        for student_id in dto.students {
            if !students.contains(&student_id) {
                load_with_role(store, student_id, Role::Student).await?;
                students.push(student_id);
            }
        }
        if students.len() > dto.capacity as usize {
            return Err(AppError::bad_request(anyhow!(CLASS_FULL)));
        }

        let now = Utc::now();
        let class = Class {
            id: Uuid::new_v4(),
            name: dto.name,
            subject: dto.subject,
            teacher_id: dto.teacher_id,
            students,
            capacity: dto.capacity,
            schedule: dto.schedule,
            created_at: now,
            updated_at: now,
        };
        store.insert(&class).await?;

        tracing::info!(class_id = %class.id, "Class created");
        Ok(class)
    }

    #[instrument(skip(store, user), fields(user_id = %user.id))]
    pub async fn get_class(store: &Store, user: &UserRecord, id: Uuid) -> Result<Class, AppError> {
        let class = Self::load(store, id).await?;
        ensure_class_viewer(user, &class)?;
        Ok(class)
    }

    #[instrument(skip(store, user, dto), fields(user_id = %user.id))]
    pub async fn update_schedule(
        store: &Store,
        user: &UserRecord,
        id: Uuid,
        dto: UpdateScheduleDto,
    ) -> Result<Class, AppError> {
        let mut class = Self::load(store, id).await?;
        ensure_class_manager(user, &class)?;

        class.schedule = dto.schedule;
        Self::save(store, &mut class).await?;
        Ok(class)
    }

    /// Enrolls a student. Enrolling someone already in the class changes nothing.
    #[instrument(skip(store, user), fields(user_id = %user.id))]
    pub async fn add_student(
        store: &Store,
        user: &UserRecord,
        id: Uuid,
        student_id: Uuid,
    ) -> Result<Class, AppError> {
        let mut class = Self::load(store, id).await?;
        ensure_class_manager(user, &class)?;
        load_with_role(store, student_id, Role::Student).await?;

        if class.is_enrolled(student_id) {
            return Ok(class);
        }
        if class.is_full() {
            return Err(AppError::bad_request(anyhow!(CLASS_FULL)));
        }

        class.students.push(student_id);
        Self::save(store, &mut class).await?;

        tracing::info!(class_id = %class.id, %student_id, "Student enrolled");
        Ok(class)
    }

    #[instrument(skip(store, user), fields(user_id = %user.id))]
    pub async fn remove_student(
        store: &Store,
        user: &UserRecord,
        id: Uuid,
        student_id: Uuid,
    ) -> Result<Class, AppError> {
        let mut class = Self::load(store, id).await?;
        ensure_class_manager(user, &class)?;
        ensure_enrolled(&class, student_id)?;

        class.students.retain(|enrolled| *enrolled != student_id);
        Self::save(store, &mut class).await?;

        tracing::info!(class_id = %class.id, %student_id, "Student removed");
        Ok(class)
    }

    #[instrument(skip(store, user), fields(user_id = %user.id))]
    pub async fn delete_class(store: &Store, user: &UserRecord, id: Uuid) -> Result<(), AppError> {
        let class = Self::load(store, id).await?;
        ensure_class_manager(user, &class)?;

        store.delete::<Class>(id).await?;
        tracing::info!(class_id = %id, "Class deleted");
        Ok(())
    }

    pub(crate) async fn load(store: &Store, id: Uuid) -> Result<Class, AppError> {
        store
            .get::<Class>(id)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Class not found")))
    }

    async fn save(store: &Store, class: &mut Class) -> Result<(), AppError> {
        class.updated_at = Utc::now();
        if !store.replace(class).await? {
            return Err(AppError::not_found(anyhow!("Class not found")));
        }
        Ok(())
    }
}

/// Loads a referenced identity and checks its role. A missing identity and
/// one with the wrong role are both input errors.
pub(crate) async fn load_with_role(
    store: &Store,
    id: Uuid,
    role: Role,
) -> Result<UserRecord, AppError> {
    match store.get::<UserRecord>(id).await? {
        Some(user) if user.role() == role => Ok(user.without_secret()),
        Some(_) => Err(AppError::bad_request(anyhow!("User {} is not a {}", id, role))),
        None => Err(AppError::bad_request(anyhow!("{} {} not found", capitalize(role), id))),
    }
}

fn capitalize(role: Role) -> String {
    let name = role.as_str();
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
