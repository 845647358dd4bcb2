use std::sync::Arc;

use sqlx::SqlitePool;

use crate::ai::AiService;
use crate::services::ReminderJob;

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub ai: Arc<AiService>,
    pub reminders: Arc<ReminderJob>,
}
