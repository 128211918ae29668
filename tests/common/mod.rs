#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use chrono::{NaiveDate, Utc};
use http_body_util::BodyExt;
use schoolhouse::router::init_router;
use schoolhouse::state::AppState;
use schoolhouse_auth::TokenService;
use schoolhouse_config::{CorsConfig, JwtConfig};
use schoolhouse_db::Store;
use schoolhouse_models::{Class, Email, RoleProfile, UserRecord};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

pub const PASSWORD: &str = "password123";
pub const TOKEN_EXPIRY: i64 = 30 * 24 * 60 * 60;

/// A router over a fresh in-memory store.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

impl TestApp {
    pub fn new() -> Self {
        let tokens = TokenService::new(JwtConfig {
            secret: "integration-test-secret-key-0123456789".to_string(),
            token_expiry: TOKEN_EXPIRY,
        })
        .unwrap();
        let state = AppState::new(Store::memory(), tokens, CorsConfig::from_lookup(|_| None));

        Self {
            router: init_router(state.clone()),
            state,
        }
    }

    pub fn store(&self) -> &Store {
        &self.state.store
    }

    pub fn token(&self, user: &UserRecord) -> String {
        self.state.tokens.issue(user.id).unwrap()
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(serde_json::to_vec(&json).unwrap())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        (status, json)
    }

    pub async fn get(&self, uri: &str, user: &UserRecord) -> (StatusCode, Value) {
        let token = self.token(user);
        self.request(Method::GET, uri, Some(&token), None).await
    }

    pub async fn post(&self, uri: &str, user: &UserRecord, body: Value) -> (StatusCode, Value) {
        let token = self.token(user);
        self.request(Method::POST, uri, Some(&token), Some(body)).await
    }

    pub async fn put(&self, uri: &str, user: &UserRecord, body: Value) -> (StatusCode, Value) {
        let token = self.token(user);
        self.request(Method::PUT, uri, Some(&token), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, user: &UserRecord) -> (StatusCode, Value) {
        let token = self.token(user);
        self.request(Method::DELETE, uri, Some(&token), None).await
    }

    async fn insert_user(&self, first: &str, last: &str, profile: RoleProfile) -> UserRecord {
        let email = Email::new(format!(
            "{}.{}.{}@school.test",
            first,
            last,
            &Uuid::new_v4().simple().to_string()[..8]
        ))
        .unwrap();
        let user = UserRecord::new(first, last, email, PASSWORD, profile).unwrap();
        self.store().insert(&user).await.unwrap();
        user.without_secret()
    }

    pub async fn admin(&self) -> UserRecord {
        self.insert_user("Ada", "Admin", RoleProfile::Admin).await
    }

    pub async fn teacher(&self) -> UserRecord {
        self.insert_user(
            "Tess",
            "Teacher",
            RoleProfile::Teacher {
                subject: "Mathematics".into(),
                qualifications: "MSc".into(),
            },
        )
        .await
    }

    pub async fn student_named(&self, first: &str, last: &str) -> UserRecord {
        self.insert_user(
            first,
            last,
            RoleProfile::Student {
                grade: "8".into(),
                date_of_birth: NaiveDate::from_ymd_opt(2012, 3, 14).unwrap(),
            },
        )
        .await
    }

    pub async fn student(&self) -> UserRecord {
        self.student_named("Sam", "Student").await
    }

    pub async fn parent_of(&self, child_name: &str) -> UserRecord {
        self.insert_user(
            "Pat",
            "Parent",
            RoleProfile::Parent {
                child_name: child_name.into(),
                phone: "555-0100".into(),
                child_id: None,
            },
        )
        .await
    }

    /// A class taught by `teacher` with `students` enrolled.
    pub async fn class(&self, teacher: &UserRecord, students: &[&UserRecord], capacity: u32) -> Class {
        let class = Class {
            id: Uuid::new_v4(),
            name: "Algebra I".into(),
            subject: "Mathematics".into(),
            teacher_id: teacher.id,
            students: students.iter().map(|s| s.id).collect(),
            capacity,
            schedule: Vec::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        self.store().insert(&class).await.unwrap();
        class
    }
}
