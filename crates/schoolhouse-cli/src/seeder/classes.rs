//! Class seeding.

use chrono::{NaiveTime, Utc};
use schoolhouse_db::Store;
use schoolhouse_models::{Class, DayOfWeek, RoleProfile, ScheduleEntry, UserRecord};
use uuid::Uuid;

use super::SeedError;

/// Creates one class per teacher and deals students round-robin into them,
/// skipping classes that are already full.
pub async fn seed_classes(
    store: &Store,
    teachers: &[UserRecord],
    students: &[UserRecord],
    capacity: u32,
) -> Result<Vec<Class>, SeedError> {
    if teachers.is_empty() {
        return Ok(Vec::new());
    }

    let mut rosters: Vec<Vec<Uuid>> = vec![Vec::new(); teachers.len()];
    for (idx, student) in students.iter().enumerate() {
        let roster = &mut rosters[idx % teachers.len()];
        if roster.len() < capacity as usize {
            roster.push(student.id);
        }
    }

    let mut classes = Vec::with_capacity(teachers.len());
    for (idx, (teacher, roster)) in teachers.iter().zip(rosters).enumerate() {
        let subject = match &teacher.profile {
            RoleProfile::Teacher { subject, .. } => subject.clone(),
            _ => "General Studies".to_string(),
        };
        let now = Utc::now();
        let class = Class {
            id: Uuid::new_v4(),
            name: format!("{} {}", subject, 101 + idx),
            subject,
            teacher_id: teacher.id,
            students: roster,
            capacity,
            schedule: weekly_slots(idx as u32),
            created_at: now,
            updated_at: now,
        };
        store.insert(&class).await?;
        classes.push(class);
    }

    tracing::info!(count = classes.len(), "Seeded classes");
    Ok(classes)
}

fn weekly_slots(offset: u32) -> Vec<ScheduleEntry> {
    let hour = 8 + offset % 8;
    [DayOfWeek::Monday, DayOfWeek::Wednesday]
        .into_iter()
        .filter_map(|day| {
            Some(ScheduleEntry {
                day,
                start_time: NaiveTime::from_hms_opt(hour, 0, 0)?,
                end_time: NaiveTime::from_hms_opt(hour + 1, 0, 0)?,
            })
        })
        .collect()
}
