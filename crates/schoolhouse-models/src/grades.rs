//! Grade records.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use schoolhouse_db::{Collection, Document};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::users::User;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AssessmentType {
    Exam,
    Quiz,
    Assignment,
    Project,
    Participation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GradeRecord {
    pub id: Uuid,
    pub student_id: Uuid,
    pub class_id: Uuid,
    pub subject: String,
    pub title: String,
    pub assessment_type: AssessmentType,
    pub score: f64,
    pub max_score: f64,
    pub graded_by: Uuid,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl GradeRecord {
    pub fn percentage(&self) -> f64 {
        self.score / self.max_score * 100.0
    }
}

impl Document for GradeRecord {
    const COLLECTION: Collection = Collection::Grades;

    fn id(&self) -> Uuid {
        self.id
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_score"))]
pub struct CreateGradeDto {
    pub student_id: Uuid,
    pub class_id: Uuid,
    /// Defaults to the class subject.
    #[validate(length(min = 1, max = 100))]
    pub subject: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    pub assessment_type: AssessmentType,
    #[validate(range(min = 0.0))]
    pub score: f64,
    #[validate(range(exclusive_min = 0.0))]
    pub max_score: f64,
    pub date: Option<NaiveDate>,
    #[validate(length(max = 1000))]
    pub comments: Option<String>,
}

fn validate_score(dto: &CreateGradeDto) -> Result<(), ValidationError> {
    if dto.score > dto.max_score {
        return Err(ValidationError::new("score")
            .with_message("Score cannot exceed the maximum score".into()));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubjectAverage {
    pub subject: String,
    pub average_percentage: f64,
    pub count: usize,
}

/// Mean percentage per subject, ordered by subject name.
pub fn subject_averages(grades: &[GradeRecord]) -> Vec<SubjectAverage> {
    let mut by_subject: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for grade in grades {
        let entry = by_subject.entry(grade.subject.as_str()).or_default();
        entry.0 += grade.percentage();
        entry.1 += 1;
    }

    by_subject
        .into_iter()
        .map(|(subject, (total, count))| SubjectAverage {
            subject: subject.to_string(),
            average_percentage: (total / count as f64 * 100.0).round() / 100.0,
            count,
        })
        .collect()
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentGradesResponse {
    pub student: User,
    pub grades: Vec<GradeRecord>,
    pub averages: Vec<SubjectAverage>,
}
