mod common;

use std::sync::Arc;
use std::time::Duration;

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{Value, json};
use tower::ServiceExt;

use college_tracker::ai::{AiService, OpenAiChatClient, OpenAiConfig};
use college_tracker::api::{ApplicationDetail, router};
use college_tracker::db::{DocumentStore, SqliteDocumentStore};
use college_tracker::identity::{EmailResolver, ProfileIdentityProvider};
use college_tracker::mail::NoopMailTransport;
use college_tracker::services::{ReminderConfig, ReminderJob};
use college_tracker::state::AppState;

async fn app() -> Router {
    let pool = common::memory_pool().await;
    let store: Arc<dyn DocumentStore> = Arc::new(SqliteDocumentStore::new(pool.clone()));
    let resolver = EmailResolver::new(
        vec![Arc::new(ProfileIdentityProvider::new(store.clone()))],
        Duration::from_secs(1),
    );
    let reminders = Arc::new(ReminderJob::new(
        store,
        resolver,
        Arc::new(NoopMailTransport),
        ReminderConfig::default(),
    ));
    let chat = OpenAiChatClient::new(OpenAiConfig {
        api_key: None,
        base_url: "http://127.0.0.1:9".to_string(),
        model: "test-model".to_string(),
        timeout_secs: 1,
    })
    .unwrap();

    router(AppState {
        db: pool,
        ai: Arc::new(AiService::new(Arc::new(chat))),
        reminders,
    })
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, value)
}

fn new_application() -> Value {
    json!({
        "student_id": "student-1",
        "college_id": "oberlin",
        "college_name": "Oberlin College",
        "decision_plan": "early_decision",
        "deadline": "2099-11-01",
        "requires_essay": true,
        "requires_recommendations": true,
        "requires_supplemental_essays": true
    })
}

#[tokio::test]
async fn test_health() {
    let app = app().await;
    let (status, _) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_create_application_persists_derived_records() {
    let app = app().await;
    let (status, body) = send(&app, "POST", "/applications", Some(new_application())).await;
    assert_eq!(status, StatusCode::CREATED);

    let detail: ApplicationDetail = serde_json::from_value(body).unwrap();
    assert_eq!(detail.timeline.len(), 3);
    assert_eq!(detail.tasks.len(), 7);
    assert_eq!(detail.tasks[0].id, format!("recommendations-{}", detail.application.id));

    let (status, tasks) = send(&app, "GET", &format!("/applications/{}/tasks", detail.application.id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(tasks.as_array().unwrap().len(), 7);

    let (_, list) = send(&app, "GET", "/applications?student_id=student-1", None).await;
    assert_eq!(list.as_array().unwrap().len(), 1);
    let (_, other) = send(&app, "GET", "/applications?student_id=someone-else", None).await;
    assert!(other.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_unknown_decision_plan_is_rejected() {
    let app = app().await;
    let mut body = new_application();
    body["decision_plan"] = json!("super_early");
    let (status, _) = send(&app, "POST", "/applications", Some(body)).await;
    assert!(status.is_client_error());
}

#[tokio::test]
async fn test_regenerate_keeps_completion_and_drops_stale_records() {
    let app = app().await;
    let (_, body) = send(&app, "POST", "/applications", Some(new_application())).await;
    let detail: ApplicationDetail = serde_json::from_value(body).unwrap();
    let app_id = detail.application.id.clone();

    let (status, task) = send(
        &app,
        "PATCH",
        &format!("/tasks/transcript-{}", app_id),
        Some(json!({ "completed": true, "notes": "counselor emailed" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(task["completed"], json!(true));
    assert!(task["completed_date"].is_string());

    let (_, body) = send(
        &app,
        "PATCH",
        &format!("/applications/{}", app_id),
        Some(json!({ "decision_date": "2100-03-15", "notes": "visit in spring" })),
    )
    .await;
    let detail: ApplicationDetail = serde_json::from_value(body).unwrap();
    assert_eq!(detail.timeline.len(), 4);

    // Fields left out of the body are untouched.
    let (_, body) = send(
        &app,
        "PATCH",
        &format!("/applications/{}", app_id),
        Some(json!({ "status": "in_progress" })),
    )
    .await;
    let detail: ApplicationDetail = serde_json::from_value(body).unwrap();
    assert_eq!(detail.application.decision_date, Some(common::date("2100-03-15")));
    assert_eq!(detail.application.notes.as_deref(), Some("visit in spring"));
    assert!(detail.timeline.iter().any(|e| e.id == format!("decision-{}", app_id)));

    let (status, body) = send(
        &app,
        "PATCH",
        &format!("/applications/{}", app_id),
        Some(json!({
            "deadline": "2099-12-01",
            "requires_essay": false,
            "decision_date": null,
            "notes": null
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let detail: ApplicationDetail = serde_json::from_value(body).unwrap();
    assert_eq!(detail.application.decision_date, None);
    assert_eq!(detail.application.notes, None);
    assert_eq!(detail.timeline.len(), 2);
    assert!(detail.timeline.iter().all(|e| !e.id.starts_with("decision-")));
    // Essay and supplemental essay tasks are gone.
    assert_eq!(detail.tasks.len(), 5);
    assert!(detail.tasks.iter().all(|t| !t.id.starts_with("essay-")));

    let transcript = detail
        .tasks
        .iter()
        .find(|t| t.id == format!("transcript-{}", app_id))
        .unwrap();
    assert!(transcript.completed);
    assert_eq!(transcript.notes, "counselor emailed");
    assert_eq!(transcript.due_date, common::date("2099-12-01"));
}

#[tokio::test]
async fn test_task_assignee_can_be_set_and_cleared() {
    let app = app().await;
    let (_, body) = send(&app, "POST", "/applications", Some(new_application())).await;
    let uri = format!("/tasks/transcript-{}", body["application"]["id"].as_str().unwrap());

    let (_, task) = send(&app, "PATCH", &uri, Some(json!({ "assigned_to": "counselor" }))).await;
    assert_eq!(task["assigned_to"], json!("counselor"));

    let (_, task) = send(&app, "PATCH", &uri, Some(json!({ "notes": "requested" }))).await;
    assert_eq!(task["assigned_to"], json!("counselor"));

    let (status, task) = send(&app, "PATCH", &uri, Some(json!({ "assigned_to": null }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(task["assigned_to"], Value::Null);
    assert_eq!(task["notes"], json!("requested"));
}

#[tokio::test]
async fn test_out_of_range_dates_are_rejected() {
    let app = app().await;

    let mut body = new_application();
    body["deadline"] = json!("1850-01-01");
    let (status, _) = send(&app, "POST", "/applications", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // A few days after the earliest date chrono can represent.
    let mut body = new_application();
    body["deadline"] = json!("-262143-01-05");
    let (status, _) = send(&app, "POST", "/applications", Some(body)).await;
    assert!(status.is_client_error());

    let (_, created) = send(&app, "POST", "/applications", Some(new_application())).await;
    let uri = format!("/applications/{}", created["application"]["id"].as_str().unwrap());
    let (status, _) = send(&app, "PATCH", &uri, Some(json!({ "decision_date": "1800-06-01" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, detail) = send(&app, "GET", &uri, None).await;
    assert_eq!(detail["application"]["decision_date"], Value::Null);
}

#[tokio::test]
async fn test_complete_timeline_event_and_missing_ids() {
    let app = app().await;
    let (_, body) = send(&app, "POST", "/applications", Some(new_application())).await;
    let detail: ApplicationDetail = serde_json::from_value(body).unwrap();

    let uri = format!("/timeline/deadline-{}/complete", detail.application.id);
    let (status, event) = send(&app, "PATCH", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(event["completed"], json!(true));

    let (status, _) = send(&app, "PATCH", "/timeline/nope/complete", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, "GET", "/applications/nope", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_options_tables_are_exhaustive() {
    let app = app().await;
    let (status, body) = send(&app, "GET", "/options", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["decision_plans"].as_array().unwrap().len(), 5);
    assert_eq!(body["application_statuses"].as_array().unwrap().len(), 8);
    assert_eq!(body["task_categories"].as_array().unwrap().len(), 9);
    assert_eq!(body["application_statuses"][0]["label"], json!("Not Started"));
    assert!(body["task_priorities"][0]["color"].is_string());
}

#[tokio::test]
async fn test_run_reminders_uses_profile_emails() {
    let app = app().await;
    let (status, _) = send(
        &app,
        "PUT",
        "/users/student-1",
        Some(json!({ "email": "student@example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Deadline far in the future: nothing to remind about.
    let (_, body) = send(&app, "POST", "/applications", Some(new_application())).await;
    let app_id = body["application"]["id"].as_str().unwrap().to_string();

    let (status, stats) = send(&app, "POST", "/reminders/run", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["scanned"], json!(7));
    assert_eq!(stats["students"], json!(0));

    // Pull one task into the past so it becomes overdue.
    send(
        &app,
        "PATCH",
        &format!("/tasks/essay-{}", app_id),
        Some(json!({ "due_date": "2001-01-01" })),
    )
    .await;

    let (_, stats) = send(&app, "POST", "/reminders/run", None).await;
    assert_eq!(stats["overdue"], json!(1));
    assert_eq!(stats["students"], json!(1));
    assert_eq!(stats["no_email"], json!(0));
    // The noop transport stands in for a missing mail credential.
    assert_eq!(stats["skipped_no_credential"], json!(1));
}

#[tokio::test]
async fn test_ai_without_key_is_a_config_error() {
    let app = app().await;
    let (status, body) = send(&app, "POST", "/ai/recommendations", Some(json!({ "gpa": 3.8 }))).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body["message"].as_str().unwrap().contains("OPENAI_API_KEY"));
}
