mod common;

use axum::http::StatusCode;
use common::TestApp;
use schoolhouse_db::Filter;
use schoolhouse_models::GradeRecord;
use serde_json::{Value, json};
use uuid::Uuid;

fn grade_body(class_id: Uuid, student_id: Uuid, score: f64) -> Value {
    json!({
        "classId": class_id,
        "studentId": student_id,
        "title": "Unit test",
        "assessmentType": "quiz",
        "score": score,
        "maxScore": 50.0
    })
}

async fn grade_count(app: &TestApp) -> usize {
    let grades: Vec<GradeRecord> = app.store().find(&Filter::new()).await.unwrap();
    grades.len()
}

#[tokio::test]
async fn test_grading_a_student_outside_the_class_writes_nothing() {
    let app = TestApp::new();
    let teacher = app.teacher().await;
    let enrolled = app.student().await;
    let outsider = app.student().await;
    let class = app.class(&teacher, &[&enrolled], 30).await;

    let (status, body) = app
        .post("/api/grades", &teacher, grade_body(class.id, outsider.id, 40.0))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Student does not belong to this class");
    assert_eq!(grade_count(&app).await, 0);
}

#[tokio::test]
async fn test_students_cannot_record_grades() {
    let app = TestApp::new();
    let teacher = app.teacher().await;
    let student = app.student().await;
    let class = app.class(&teacher, &[&student], 30).await;

    let (status, body) = app
        .post("/api/grades", &student, grade_body(class.id, student.id, 50.0))
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body["message"].as_str().unwrap().contains("POST /api/grades"));
    assert_eq!(grade_count(&app).await, 0);
}

#[tokio::test]
async fn test_another_teacher_cannot_grade_the_class() {
    let app = TestApp::new();
    let owner = app.teacher().await;
    let other = app.teacher().await;
    let student = app.student().await;
    let class = app.class(&owner, &[&student], 30).await;

    let (status, _) = app
        .post("/api/grades", &other, grade_body(class.id, student.id, 30.0))
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(grade_count(&app).await, 0);
}

#[tokio::test]
async fn test_parent_sees_child_grades_but_not_others() {
    let app = TestApp::new();
    let teacher = app.teacher().await;
    let child = app.student_named("Alex", "Thompson").await;
    let stranger = app.student_named("Jo", "Stranger").await;
    let parent = app.parent_of("Alex Thompson").await;
    let class = app.class(&teacher, &[&child, &stranger], 30).await;

    let (status, body) = app
        .post("/api/grades", &teacher, grade_body(class.id, child.id, 45.0))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["subject"], "Mathematics");

    let (status, body) = app
        .get(&format!("/api/grades/student/{}", child.id), &parent)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["grades"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"]["averages"][0]["subject"], "Mathematics");
    assert_eq!(body["data"]["averages"][0]["averagePercentage"], 90.0);

    let (status, _) = app
        .get(&format!("/api/grades/student/{}", stranger.id), &parent)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .get(&format!("/api/grades/student/{}", child.id), &stranger)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
