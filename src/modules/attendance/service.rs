use schoolhouse_core::AppError;
use schoolhouse_db::{Filter, Store};
use schoolhouse_models::{
    AttendanceRecord, AttendanceSummary, MarkAttendanceDto, StudentAttendanceResponse, UserRecord,
};
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::ownership::{ensure_can_view_student, ensure_class_manager, ensure_enrolled};
use crate::modules::classes::ClassService;
use crate::modules::users::service::find_student;

use super::model::AttendanceQuery;

pub struct AttendanceService;

impl AttendanceService {
    /// Marks a day's attendance for a class.
    ///
    /// Every student is checked for enrollment before anything is written.
    /// Each record is then upserted under its (class, student, day) key, so
    /// marking the same day again overwrites the earlier status.
    #[instrument(skip(store, user, dto), fields(user_id = %user.id, class_id = %dto.class_id, date = %dto.date))]
    pub async fn mark(
        store: &Store,
        user: &UserRecord,
        dto: MarkAttendanceDto,
    ) -> Result<Vec<AttendanceRecord>, AppError> {
        let class = ClassService::load(store, dto.class_id).await?;
        ensure_class_manager(user, &class)?;
        for entry in &dto.records {
            ensure_enrolled(&class, entry.student_id)?;
        }

        let mut records = Vec::with_capacity(dto.records.len());
        for entry in dto.records {
            let record =
                AttendanceRecord::new(class.id, entry.student_id, dto.date, entry.status, user.id);
            store.upsert(&record).await?;
            records.push(record);
        }

        tracing::info!(count = records.len(), "Attendance marked");
        Ok(records)
    }

    #[instrument(skip(store, user), fields(user_id = %user.id))]
    pub async fn class_attendance(
        store: &Store,
        user: &UserRecord,
        class_id: Uuid,
        query: AttendanceQuery,
    ) -> Result<Vec<AttendanceRecord>, AppError> {
        let class = ClassService::load(store, class_id).await?;
        ensure_class_manager(user, &class)?;

        let mut filter = Filter::new().eq("classId", class_id);
        if let Some(date) = query.date {
            filter = filter.eq("date", date);
        }

        Ok(store.find(&filter).await?)
    }

    #[instrument(skip(store, user), fields(user_id = %user.id))]
    pub async fn student_attendance(
        store: &Store,
        user: &UserRecord,
        student_id: Uuid,
    ) -> Result<StudentAttendanceResponse, AppError> {
        ensure_can_view_student(store, user, student_id).await?;
        let student = find_student(store, student_id).await?;
        Self::report(store, student).await
    }

    pub(crate) async fn report(
        store: &Store,
        student: UserRecord,
    ) -> Result<StudentAttendanceResponse, AppError> {
        let records: Vec<AttendanceRecord> = store
            .find(&Filter::new().eq("studentId", student.id))
            .await?;
        let summary = AttendanceSummary::from_records(&records);

        Ok(StudentAttendanceResponse {
            student: student.into(),
            records,
            summary,
        })
    }
}
