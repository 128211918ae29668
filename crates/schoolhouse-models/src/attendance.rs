//! Attendance records.
//!
//! There is at most one record per (class, student, day). The record id is
//! derived from that triple, so marking attendance again is an upsert of the
//! same document rather than a second insert.

use chrono::{DateTime, NaiveDate, Utc};
use schoolhouse_db::{Collection, Document};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::users::User;

const ATTENDANCE_NAMESPACE: Uuid = Uuid::from_u128(0x6f1c_2a4e_9b3d_4c57_a0e8_1d2f_3b4c_5d6e);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    Present,
    Absent,
    Late,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    pub id: Uuid,
    pub class_id: Uuid,
    pub student_id: Uuid,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    pub marked_by: Uuid,
    pub updated_at: DateTime<Utc>,
}

impl AttendanceRecord {
    /// The record id for a (class, student, day) triple.
    pub fn key(class_id: Uuid, student_id: Uuid, date: NaiveDate) -> Uuid {
        let name = format!("{}:{}:{}", class_id, student_id, date);
        Uuid::new_v5(&ATTENDANCE_NAMESPACE, name.as_bytes())
    }

    pub fn new(
        class_id: Uuid,
        student_id: Uuid,
        date: NaiveDate,
        status: AttendanceStatus,
        marked_by: Uuid,
    ) -> Self {
        Self {
            id: Self::key(class_id, student_id, date),
            class_id,
            student_id,
            date,
            status,
            marked_by,
            updated_at: Utc::now(),
        }
    }
}

impl Document for AttendanceRecord {
    const COLLECTION: Collection = Collection::Attendance;

    fn id(&self) -> Uuid {
        self.id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceEntryDto {
    pub student_id: Uuid,
    pub status: AttendanceStatus,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MarkAttendanceDto {
    pub class_id: Uuid,
    pub date: NaiveDate,
    #[validate(length(min = 1, max = 1000))]
    pub records: Vec<AttendanceEntryDto>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AttendanceSummary {
    pub present: usize,
    pub absent: usize,
    pub late: usize,
    pub total: usize,
}

impl AttendanceSummary {
    pub fn from_records(records: &[AttendanceRecord]) -> Self {
        records.iter().fold(Self::default(), |mut summary, record| {
            match record.status {
                AttendanceStatus::Present => summary.present += 1,
                AttendanceStatus::Absent => summary.absent += 1,
                AttendanceStatus::Late => summary.late += 1,
            }
            summary.total += 1;
            summary
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentAttendanceResponse {
    pub student: User,
    pub records: Vec<AttendanceRecord>,
    pub summary: AttendanceSummary,
}
