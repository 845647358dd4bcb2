#![allow(dead_code)]

use chrono::NaiveDate;
use college_tracker::models::{Application, ApplicationStatus, DecisionPlan};
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;

/// A single-connection pool so every query sees the same in-memory database.
pub async fn memory_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("valid date")
}

pub fn application(id: &str, deadline: &str) -> Application {
    Application {
        id: id.to_string(),
        student_id: "student-1".to_string(),
        college_id: "college-1".to_string(),
        college_name: "Oberlin College".to_string(),
        decision_plan: DecisionPlan::RegularDecision,
        deadline: date(deadline),
        decision_date: None,
        status: ApplicationStatus::NotStarted,
        requires_essay: false,
        requires_recommendations: false,
        requires_interview: false,
        requires_portfolio: false,
        requires_supplemental_essays: false,
        application_fee: None,
        fee_waiver: false,
        notes: None,
        created_at: "2024-09-01T00:00:00Z".to_string(),
        updated_at: "2024-09-01T00:00:00Z".to_string(),
    }
}
