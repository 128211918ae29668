use chrono::Utc;
use schoolhouse_core::AppError;
use schoolhouse_db::{Filter, Store};
use schoolhouse_models::{
    CreateGradeDto, GradeRecord, StudentGradesResponse, UserRecord, subject_averages,
};
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::ownership::{ensure_can_view_student, ensure_class_manager, ensure_enrolled};
use crate::modules::classes::ClassService;
use crate::modules::users::service::find_student;

pub struct GradeService;

impl GradeService {
    /// Records a grade. The caller must manage the class and the student
    /// must be enrolled in it; nothing is written otherwise.
    #[instrument(skip(store, user, dto), fields(user_id = %user.id, class_id = %dto.class_id, student_id = %dto.student_id))]
    pub async fn create_grade(
        store: &Store,
        user: &UserRecord,
        dto: CreateGradeDto,
    ) -> Result<GradeRecord, AppError> {
        let class = ClassService::load(store, dto.class_id).await?;
        ensure_class_manager(user, &class)?;
        ensure_enrolled(&class, dto.student_id)?;

        let now = Utc::now();
        let grade = GradeRecord {
            id: Uuid::new_v4(),
            student_id: dto.student_id,
            class_id: class.id,
            subject: dto.subject.unwrap_or(class.subject),
            title: dto.title,
            assessment_type: dto.assessment_type,
            score: dto.score,
            max_score: dto.max_score,
            graded_by: user.id,
            date: dto.date.unwrap_or_else(|| now.date_naive()),
            comments: dto.comments,
            created_at: now,
        };
        store.insert(&grade).await?;

        tracing::info!(grade_id = %grade.id, "Grade recorded");
        Ok(grade)
    }

    #[instrument(skip(store, user), fields(user_id = %user.id))]
    pub async fn class_grades(
        store: &Store,
        user: &UserRecord,
        class_id: Uuid,
    ) -> Result<Vec<GradeRecord>, AppError> {
        let class = ClassService::load(store, class_id).await?;
        ensure_class_manager(user, &class)?;

        Ok(store.find(&Filter::new().eq("classId", class_id)).await?)
    }

    #[instrument(skip(store, user), fields(user_id = %user.id))]
    pub async fn student_grades(
        store: &Store,
        user: &UserRecord,
        student_id: Uuid,
    ) -> Result<StudentGradesResponse, AppError> {
        ensure_can_view_student(store, user, student_id).await?;
        let student = find_student(store, student_id).await?;
        Self::report(store, student).await
    }

    /// All grades of `student` with per-subject averages.
    pub(crate) async fn report(
        store: &Store,
        student: UserRecord,
    ) -> Result<StudentGradesResponse, AppError> {
        let grades: Vec<GradeRecord> = store
            .find(&Filter::new().eq("studentId", student.id))
            .await?;
        let averages = subject_averages(&grades);

        Ok(StudentGradesResponse {
            student: student.into(),
            grades,
            averages,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use chrono::NaiveDate;
    use schoolhouse_models::{AssessmentType, Class, Email, RoleProfile};

    async fn user(store: &Store, profile: RoleProfile) -> UserRecord {
        let email = Email::new(format!("{}@school.com", Uuid::new_v4())).unwrap();
        let user = UserRecord::new("Test", "User", email, "secret1", profile).unwrap();
        store.insert(&user).await.unwrap();
        user.without_secret()
    }

    fn teacher_profile() -> RoleProfile {
        RoleProfile::Teacher {
            subject: "Math".into(),
            qualifications: "BEd".into(),
        }
    }

    fn student_profile() -> RoleProfile {
        RoleProfile::Student {
            grade: "9".into(),
            date_of_birth: NaiveDate::from_ymd_opt(2011, 6, 1).unwrap(),
        }
    }

    async fn class(store: &Store, teacher_id: Uuid, students: Vec<Uuid>) -> Class {
        let class = Class {
            id: Uuid::new_v4(),
            name: "Algebra".into(),
            subject: "Math".into(),
            teacher_id,
            students,
            capacity: 30,
            schedule: Vec::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        store.insert(&class).await.unwrap();
        class
    }

    fn dto(class_id: Uuid, student_id: Uuid, score: f64) -> CreateGradeDto {
        CreateGradeDto {
            student_id,
            class_id,
            subject: None,
            title: "Midterm".into(),
            assessment_type: AssessmentType::Exam,
            score,
            max_score: 100.0,
            date: None,
            comments: None,
        }
    }

    #[tokio::test]
    async fn test_grade_for_non_enrolled_student_is_never_written() {
        let store = Store::memory();
        let teacher = user(&store, teacher_profile()).await;
        let outsider = user(&store, student_profile()).await;
        let class = class(&store, teacher.id, vec![]).await;

        let error = GradeService::create_grade(&store, &teacher, dto(class.id, outsider.id, 80.0))
            .await
            .unwrap_err();

        assert_eq!(error.status, StatusCode::BAD_REQUEST);
        assert_eq!(error.client_message(), "Student does not belong to this class");
        let grades: Vec<GradeRecord> = store.find(&Filter::new()).await.unwrap();
        assert!(grades.is_empty());
    }

    #[tokio::test]
    async fn test_subject_defaults_to_class_subject() {
        let store = Store::memory();
        let teacher = user(&store, teacher_profile()).await;
        let pupil = user(&store, student_profile()).await;
        let class = class(&store, teacher.id, vec![pupil.id]).await;

        let grade = GradeService::create_grade(&store, &teacher, dto(class.id, pupil.id, 45.0))
            .await
            .unwrap();
        assert_eq!(grade.subject, "Math");
        assert_eq!(grade.graded_by, teacher.id);

        let report = GradeService::student_grades(&store, &pupil, pupil.id).await.unwrap();
        assert_eq!(report.grades.len(), 1);
        assert_eq!(report.averages[0].average_percentage, 45.0);
    }

    #[tokio::test]
    async fn test_other_teacher_cannot_grade() {
        let store = Store::memory();
        let owner = user(&store, teacher_profile()).await;
        let other = user(&store, teacher_profile()).await;
        let pupil = user(&store, student_profile()).await;
        let class = class(&store, owner.id, vec![pupil.id]).await;

        let error = GradeService::create_grade(&store, &other, dto(class.id, pupil.id, 70.0))
            .await
            .unwrap_err();
        assert_eq!(error.status, StatusCode::FORBIDDEN);
        assert!(GradeService::class_grades(&store, &other, class.id).await.is_err());
    }
}
