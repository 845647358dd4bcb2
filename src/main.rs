use std::sync::Arc;

use sqlx::sqlite::SqlitePoolOptions;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use college_tracker::ai::{AiService, OpenAiChatClient};
use college_tracker::api::router;
use college_tracker::config::AppConfig;
use college_tracker::db::{DocumentStore, SqliteDocumentStore};
use college_tracker::identity::{
    EmailResolver, FirebaseIdentityProvider, IdentityProvider, ProfileIdentityProvider,
};
use college_tracker::mail::SendGridTransport;
use college_tracker::services::{ReminderJob, ReminderScheduler};
use college_tracker::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "college_tracker=debug".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::new_from_env()?;

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    let store: Arc<dyn DocumentStore> = Arc::new(SqliteDocumentStore::new(pool.clone()));
    let call_timeout = config.reminders.call_timeout;

    let mut providers: Vec<Arc<dyn IdentityProvider>> = Vec::new();
    if config.identity.is_configured() {
        providers.push(Arc::new(FirebaseIdentityProvider::new(config.identity.clone(), call_timeout)?));
    } else {
        warn!("Identity provider credentials not set, resolving emails from user profiles only");
    }
    providers.push(Arc::new(ProfileIdentityProvider::new(store.clone())));
    let resolver = EmailResolver::new(providers, call_timeout);

    if config.mail.api_key.is_none() {
        warn!("SENDGRID_API_KEY not set, reminder emails will be logged instead of sent");
    }
    let mailer = Arc::new(SendGridTransport::new(config.mail.clone(), call_timeout)?);

    let reminders = Arc::new(ReminderJob::new(
        store.clone(),
        resolver,
        mailer,
        config.reminders.clone(),
    ));
    let ai = Arc::new(AiService::new(Arc::new(OpenAiChatClient::new(config.openai.clone())?)));

    let scheduler = ReminderScheduler::new(reminders.clone(), config.schedule);
    tokio::spawn(scheduler.start());

    let state = AppState { db: pool.clone(), ai, reminders };

    let app = router(state);

    info!("listening on http://{}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
