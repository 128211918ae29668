//! Classes, enrollment and weekly schedules.

use chrono::{DateTime, NaiveTime, Utc};
use schoolhouse_db::{Collection, Document};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

const DEFAULT_CAPACITY: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

/// One weekly slot. Overlapping slots are allowed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_slot"))]
pub struct ScheduleEntry {
    pub day: DayOfWeek,
    #[schema(value_type = String, example = "09:00:00")]
    pub start_time: NaiveTime,
    #[schema(value_type = String, example = "10:30:00")]
    pub end_time: NaiveTime,
}

fn validate_slot(entry: &ScheduleEntry) -> Result<(), ValidationError> {
    if entry.start_time >= entry.end_time {
        return Err(ValidationError::new("schedule_slot")
            .with_message("Start time must be before end time".into()));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Class {
    pub id: Uuid,
    pub name: String,
    pub subject: String,
    /// The owning teacher.
    pub teacher_id: Uuid,
    /// Enrolled students, in enrollment order.
    pub students: Vec<Uuid>,
    pub capacity: u32,
    pub schedule: Vec<ScheduleEntry>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Class {
    pub fn is_taught_by(&self, user_id: Uuid) -> bool {
        self.teacher_id == user_id
    }

    pub fn is_enrolled(&self, student_id: Uuid) -> bool {
        self.students.contains(&student_id)
    }

    pub fn is_full(&self) -> bool {
        self.students.len() >= self.capacity as usize
    }
}

impl Document for Class {
    const COLLECTION: Collection = Collection::Classes;

    fn id(&self) -> Uuid {
        self.id
    }
}

fn default_capacity() -> u32 {
    DEFAULT_CAPACITY
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateClassDto {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(min = 1, max = 100))]
    pub subject: String,
    pub teacher_id: Uuid,
    #[serde(default)]
    pub students: Vec<Uuid>,
    #[serde(default = "default_capacity")]
    #[validate(range(min = 1, max = 1000))]
    pub capacity: u32,
    #[serde(default)]
    #[validate(nested)]
    pub schedule: Vec<ScheduleEntry>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateScheduleDto {
    #[validate(nested)]
    pub schedule: Vec<ScheduleEntry>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddStudentDto {
    pub student_id: Uuid,
}
