use axum::Json;
use axum::extract::{Path, Query};
use axum::routing::{patch, post, put};
use axum::{Router, extract::State, http::StatusCode, routing::get};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::ai::{
    ApplicationGuidance, CollegeRecommendations, EssayAnalysisRequest, EssayIdeas,
    EssayIdeasRequest, StudentProfile,
};
use crate::db::repository;
use crate::error::AppError;
use crate::models::*;
use crate::services::{ReminderStats, derive_tasks, derive_timeline};
use crate::state::AppState;

#[derive(Deserialize)]
struct ApplicationQueryParams {
    student_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApplicationDetail {
    pub application: Application,
    pub timeline: Vec<TimelineEvent>,
    pub tasks: Vec<Task>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/options", get(options))
        .route("/applications", get(list_applications).post(create_application))
        .route("/applications/{id}", get(get_application).patch(update_application))
        .route("/applications/{id}/timeline", get(list_timeline))
        .route("/applications/{id}/tasks", get(list_tasks))
        .route("/applications/{id}/guidance", post(application_guidance))
        .route("/tasks/{id}", patch(update_task))
        .route("/timeline/{id}/complete", patch(complete_timeline_event))
        .route("/users/{id}", put(upsert_user))
        .route("/reminders/run", post(run_reminders))
        .route("/ai/recommendations", post(college_recommendations))
        .route("/ai/essay-ideas", post(essay_ideas))
        .route("/ai/essay-analysis", post(essay_analysis))
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    sqlx::query("select 1").execute(&state.db).await?;
    Ok(StatusCode::OK)
}

async fn options() -> Json<OptionTables> {
    Json(OptionTables::build())
}

async fn list_applications(
    State(state): State<AppState>,
    Query(params): Query<ApplicationQueryParams>,
) -> Result<Json<Vec<Application>>, AppError> {
    let apps = repository::fetch_applications(&state.db, params.student_id.as_deref()).await?;
    Ok(Json(apps))
}

fn unsupported_date(date: NaiveDate) -> AppError {
    AppError::BadRequest(format!(
        "date {} is outside the supported range ({}-{})",
        date,
        application::EARLIEST_SUPPORTED_YEAR,
        application::LATEST_SUPPORTED_YEAR
    ))
}

/// Derives and stores the timeline and checklist for `app`, then reads them back.
async fn regenerate(state: &AppState, app: Application) -> Result<ApplicationDetail, AppError> {
    let events = derive_timeline(&app);
    let tasks = derive_tasks(&app);
    let stats = repository::save_derived_records(&state.db, &app.id, &events, &tasks).await?;
    info!(
        "Derived records for application {}: {} events, {} tasks, {} removed",
        app.id, stats.events_written, stats.tasks_written, stats.removed
    );

    Ok(ApplicationDetail {
        timeline: repository::fetch_timeline_for_application(&state.db, &app.id).await?,
        tasks: repository::fetch_tasks_for_application(&state.db, &app.id).await?,
        application: app,
    })
}

async fn create_application(
    State(state): State<AppState>,
    Json(req): Json<NewApplicationRequest>,
) -> Result<(StatusCode, Json<ApplicationDetail>), AppError> {
    if req.student_id.trim().is_empty() || req.college_name.trim().is_empty() {
        return Err(AppError::BadRequest("student_id and college_name are required".to_string()));
    }
    if let Some(date) = req.unsupported_date() {
        return Err(unsupported_date(date));
    }
    let app = repository::insert_application(&state.db, req).await?;
    let detail = regenerate(&state, app).await?;
    Ok((StatusCode::CREATED, Json(detail)))
}

async fn get_application(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApplicationDetail>, AppError> {
    let app = repository::find_application(&state.db, &id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(ApplicationDetail {
        timeline: repository::fetch_timeline_for_application(&state.db, &id).await?,
        tasks: repository::fetch_tasks_for_application(&state.db, &id).await?,
        application: app,
    }))
}

async fn update_application(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateApplicationRequest>,
) -> Result<Json<ApplicationDetail>, AppError> {
    if let Some(date) = req.unsupported_date() {
        return Err(unsupported_date(date));
    }
    let app = repository::update_application(&state.db, &id, req)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(regenerate(&state, app).await?))
}

async fn list_timeline(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<TimelineEvent>>, AppError> {
    Ok(Json(repository::fetch_timeline_for_application(&state.db, &id).await?))
}

async fn list_tasks(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Task>>, AppError> {
    Ok(Json(repository::fetch_tasks_for_application(&state.db, &id).await?))
}

async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateTaskRequest>,
) -> Result<Json<Task>, AppError> {
    let today = Utc::now().date_naive();
    let task = repository::update_task(&state.db, &id, req, today)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(task))
}

async fn complete_timeline_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TimelineEvent>, AppError> {
    let event = repository::complete_timeline_event(&state.db, &id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(event))
}

async fn upsert_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpsertUserProfileRequest>,
) -> Result<Json<UserProfile>, AppError> {
    Ok(Json(repository::upsert_user_profile(&state.db, &id, req).await?))
}

async fn run_reminders(State(state): State<AppState>) -> Json<ReminderStats> {
    Json(state.reminders.run(Utc::now()).await)
}

async fn college_recommendations(
    State(state): State<AppState>,
    Json(profile): Json<StudentProfile>,
) -> Result<Json<CollegeRecommendations>, AppError> {
    Ok(Json(state.ai.generate_college_recommendations(&profile).await?))
}

async fn essay_ideas(
    State(state): State<AppState>,
    Json(req): Json<EssayIdeasRequest>,
) -> Result<Json<EssayIdeas>, AppError> {
    Ok(Json(state.ai.generate_essay_ideas(&req).await?))
}

async fn essay_analysis(
    State(state): State<AppState>,
    Json(req): Json<EssayAnalysisRequest>,
) -> Result<Json<EssayAnalysis>, AppError> {
    Ok(Json(state.ai.analyze_essay(&req).await?))
}

async fn application_guidance(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApplicationGuidance>, AppError> {
    let app = repository::find_application(&state.db, &id)
        .await?
        .ok_or(AppError::NotFound)?;
    let today = Utc::now().date_naive();
    Ok(Json(state.ai.generate_application_guidance(&app, today).await?))
}
