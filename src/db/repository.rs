use chrono::{NaiveDate, Utc};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::warn;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{
    Application, NewApplicationRequest, Task, TimelineEvent, UpdateApplicationRequest,
    UpdateTaskRequest, UpsertUserProfileRequest, UserProfile,
};
use crate::services::deadline_deriver;

pub const APPLICATIONS: &str = "applications";
pub const TASKS: &str = "tasks";
pub const TIMELINE_EVENTS: &str = "timeline_events";
pub const USERS: &str = "users";

/// A schemaless record as stored. Typed views are decoded from `body`.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub body: Value,
}

fn decode_row(id: String, body: String) -> Result<Document, AppError> {
    Ok(Document { id, body: serde_json::from_str(&body)? })
}

pub async fn list_documents(db: &SqlitePool, collection: &str) -> Result<Vec<Document>, AppError> {
    let rows: Vec<(String, String)> = sqlx::query_as(
        "SELECT id, body FROM documents WHERE collection = ? ORDER BY id",
    )
    .bind(collection)
    .fetch_all(db)
    .await?;

    let mut documents = Vec::with_capacity(rows.len());
    for (id, body) in rows {
        match decode_row(id.clone(), body) {
            Ok(doc) => documents.push(doc),
            Err(e) => warn!("Skipping undecodable document {}/{}: {}", collection, id, e),
        }
    }
    Ok(documents)
}

async fn get_document_in(
    conn: &mut SqliteConnection,
    collection: &str,
    id: &str,
) -> Result<Option<Document>, AppError> {
    let row: Option<(String, String)> = sqlx::query_as(
        "SELECT id, body FROM documents WHERE collection = ? AND id = ?",
    )
    .bind(collection)
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    row.map(|(id, body)| decode_row(id, body)).transpose()
}

pub async fn get_document(
    db: &SqlitePool,
    collection: &str,
    id: &str,
) -> Result<Option<Document>, AppError> {
    let mut conn = db.acquire().await?;
    get_document_in(&mut conn, collection, id).await
}

async fn put_document_in(
    conn: &mut SqliteConnection,
    collection: &str,
    id: &str,
    body: &Value,
) -> Result<(), AppError> {
    let now = Utc::now().to_rfc3339();
    sqlx::query(
        r#"
        INSERT INTO documents (collection, id, body, updated_at)
        VALUES (?1, ?2, ?3, ?4)
        ON CONFLICT (collection, id) DO UPDATE
        SET body = excluded.body,
            updated_at = excluded.updated_at
        "#,
    )
    .bind(collection)
    .bind(id)
    .bind(body.to_string())
    .bind(now)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

pub async fn put_document(
    db: &SqlitePool,
    collection: &str,
    id: &str,
    body: &Value,
) -> Result<(), AppError> {
    let mut conn = db.acquire().await?;
    put_document_in(&mut conn, collection, id, body).await
}

async fn delete_document_in(
    conn: &mut SqliteConnection,
    collection: &str,
    id: &str,
) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM documents WHERE collection = ? AND id = ?")
        .bind(collection)
        .bind(id)
        .execute(&mut *conn)
        .await?
        .rows_affected();
    Ok(result > 0)
}

async fn get_typed<T: DeserializeOwned>(
    db: &SqlitePool,
    collection: &str,
    id: &str,
) -> Result<Option<T>, AppError> {
    match get_document(db, collection, id).await? {
        Some(doc) => Ok(Some(serde_json::from_value(doc.body)?)),
        None => Ok(None),
    }
}

async fn put_typed<T: Serialize>(
    db: &SqlitePool,
    collection: &str,
    id: &str,
    value: &T,
) -> Result<(), AppError> {
    put_document(db, collection, id, &serde_json::to_value(value)?).await
}

/// Decodes every document in a collection, skipping the ones that don't fit `T`.
async fn list_typed<T: DeserializeOwned>(
    db: &SqlitePool,
    collection: &str,
) -> Result<Vec<T>, AppError> {
    let mut out = Vec::new();
    for doc in list_documents(db, collection).await? {
        match serde_json::from_value::<T>(doc.body) {
            Ok(value) => out.push(value),
            Err(e) => warn!("Skipping malformed {} document {}: {}", collection, doc.id, e),
        }
    }
    Ok(out)
}

pub async fn fetch_applications(
    db: &SqlitePool,
    student_id: Option<&str>,
) -> Result<Vec<Application>, AppError> {
    let mut apps: Vec<Application> = list_typed(db, APPLICATIONS).await?;
    if let Some(student_id) = student_id {
        apps.retain(|a| a.student_id == student_id);
    }
    apps.sort_by(|a, b| a.deadline.cmp(&b.deadline).then_with(|| a.id.cmp(&b.id)));
    Ok(apps)
}

pub async fn find_application(db: &SqlitePool, id: &str) -> Result<Option<Application>, AppError> {
    get_typed(db, APPLICATIONS, id).await
}

pub async fn insert_application(
    db: &SqlitePool,
    req: NewApplicationRequest,
) -> Result<Application, AppError> {
    let now = Utc::now().to_rfc3339();
    let app = Application {
        id: Uuid::new_v4().to_string(),
        student_id: req.student_id,
        college_id: req.college_id,
        college_name: req.college_name,
        decision_plan: req.decision_plan,
        deadline: req.deadline,
        decision_date: req.decision_date,
        status: req.status,
        requires_essay: req.requires_essay,
        requires_recommendations: req.requires_recommendations,
        requires_interview: req.requires_interview,
        requires_portfolio: req.requires_portfolio,
        requires_supplemental_essays: req.requires_supplemental_essays,
        application_fee: req.application_fee,
        fee_waiver: req.fee_waiver,
        notes: req.notes,
        created_at: now.clone(),
        updated_at: now,
    };

    put_typed(db, APPLICATIONS, &app.id, &app).await?;
    Ok(app)
}

pub async fn update_application(
    db: &SqlitePool,
    id: &str,
    req: UpdateApplicationRequest,
) -> Result<Option<Application>, AppError> {
    let mut current = match find_application(db, id).await? {
        Some(app) => app,
        None => return Ok(None),
    };

    req.apply_to(&mut current);
    current.updated_at = Utc::now().to_rfc3339();

    put_typed(db, APPLICATIONS, id, &current).await?;
    Ok(Some(current))
}

pub async fn fetch_tasks_for_application(
    db: &SqlitePool,
    application_id: &str,
) -> Result<Vec<Task>, AppError> {
    let mut tasks: Vec<Task> = list_typed(db, TASKS).await?;
    tasks.retain(|t| t.application_id == application_id);
    tasks.sort_by(|a, b| a.due_date.cmp(&b.due_date).then_with(|| a.id.cmp(&b.id)));
    Ok(tasks)
}

pub async fn fetch_timeline_for_application(
    db: &SqlitePool,
    application_id: &str,
) -> Result<Vec<TimelineEvent>, AppError> {
    let mut events: Vec<TimelineEvent> = list_typed(db, TIMELINE_EVENTS).await?;
    events.retain(|e| e.application_id.as_deref() == Some(application_id));
    events.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.id.cmp(&b.id)));
    Ok(events)
}

pub async fn find_task(db: &SqlitePool, id: &str) -> Result<Option<Task>, AppError> {
    get_typed(db, TASKS, id).await
}

pub async fn update_task(
    db: &SqlitePool,
    id: &str,
    req: UpdateTaskRequest,
    today: NaiveDate,
) -> Result<Option<Task>, AppError> {
    let mut current = match find_task(db, id).await? {
        Some(t) => t,
        None => return Ok(None),
    };

    req.apply_to(&mut current, today);
    put_typed(db, TASKS, id, &current).await?;
    Ok(Some(current))
}

pub async fn complete_timeline_event(
    db: &SqlitePool,
    id: &str,
) -> Result<Option<TimelineEvent>, AppError> {
    let mut event: TimelineEvent = match get_typed(db, TIMELINE_EVENTS, id).await? {
        Some(e) => e,
        None => return Ok(None),
    };

    event.completed = true;
    put_typed(db, TIMELINE_EVENTS, id, &event).await?;
    Ok(Some(event))
}

pub async fn upsert_user_profile(
    db: &SqlitePool,
    id: &str,
    req: UpsertUserProfileRequest,
) -> Result<UserProfile, AppError> {
    let profile = UserProfile {
        id: id.to_string(),
        email: req.email,
        display_name: req.display_name,
    };
    put_typed(db, USERS, id, &profile).await?;
    Ok(profile)
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DerivedWriteStats {
    pub events_written: usize,
    pub tasks_written: usize,
    pub removed: usize,
}

/// Persists freshly derived records for one application in a single transaction.
///
/// Records that already exist keep their user-owned fields (completion, notes,
/// assignee, reminder state). Derived ids that the current derivation no
/// longer produces are deleted; anything else in the collections is untouched.
pub async fn save_derived_records(
    db: &SqlitePool,
    application_id: &str,
    events: &[TimelineEvent],
    tasks: &[Task],
) -> Result<DerivedWriteStats, AppError> {
    let mut stats = DerivedWriteStats::default();
    let mut tx = db.begin().await?;

    for event in events {
        let mut merged = event.clone();
        if let Some(doc) = get_document_in(&mut tx, TIMELINE_EVENTS, &event.id).await? {
            if let Ok(existing) = serde_json::from_value::<TimelineEvent>(doc.body) {
                merged.completed = existing.completed;
                merged.reminder_sent = existing.reminder_sent;
            }
        }
        put_document_in(&mut tx, TIMELINE_EVENTS, &merged.id, &serde_json::to_value(&merged)?).await?;
        stats.events_written += 1;
    }

    for task in tasks {
        let mut merged = task.clone();
        if let Some(doc) = get_document_in(&mut tx, TASKS, &task.id).await? {
            if let Ok(existing) = serde_json::from_value::<Task>(doc.body) {
                merged.completed = existing.completed;
                merged.completed_date = existing.completed_date;
                merged.notes = existing.notes;
                merged.assigned_to = existing.assigned_to;
            }
        }
        put_document_in(&mut tx, TASKS, &merged.id, &serde_json::to_value(&merged)?).await?;
        stats.tasks_written += 1;
    }

    for id in deadline_deriver::possible_event_ids(application_id) {
        if !events.iter().any(|e| e.id == id) && delete_document_in(&mut tx, TIMELINE_EVENTS, &id).await? {
            stats.removed += 1;
        }
    }
    for id in deadline_deriver::possible_task_ids(application_id) {
        if !tasks.iter().any(|t| t.id == id) && delete_document_in(&mut tx, TASKS, &id).await? {
            stats.removed += 1;
        }
    }

    tx.commit().await?;
    Ok(stats)
}
