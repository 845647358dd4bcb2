use std::env;
use std::net::SocketAddr;
use std::str::FromStr;

use crate::ai::OpenAiConfig;
use crate::error::AppError;
use crate::identity::FirebaseIdentityConfig;
use crate::mail::SendGridConfig;
use crate::services::reminder_job::ReminderConfig;
use crate::services::scheduler::DailySchedule;

/// Reads a variable, treating unset and blank the same way.
pub(crate) fn optional_var(key: &str) -> Option<String> {
    env::var(key).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

pub(crate) fn var_or(key: &str, default: &str) -> String {
    optional_var(key).unwrap_or_else(|| default.to_string())
}

pub(crate) fn parse_var<T: FromStr>(key: &str, default: T) -> Result<T, AppError> {
    match optional_var(key) {
        Some(raw) => raw
            .parse::<T>()
            .map_err(|_| AppError::Config(format!("{} has an invalid value: {}", key, raw))),
        None => Ok(default),
    }
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub mail: SendGridConfig,
    pub openai: OpenAiConfig,
    pub identity: FirebaseIdentityConfig,
    pub reminders: ReminderConfig,
    pub schedule: DailySchedule,
}

impl AppConfig {
    pub fn new_from_env() -> Result<Self, AppError> {
        let bind_addr = parse_var("BIND_ADDR", SocketAddr::from(([127, 0, 0, 1], 3000)))?;

        Ok(Self {
            database_url: var_or("DATABASE_URL", "sqlite://college_tracker.db?mode=rwc"),
            bind_addr,
            mail: SendGridConfig::new_from_env(),
            openai: OpenAiConfig::new_from_env()?,
            identity: FirebaseIdentityConfig::new_from_env(),
            reminders: ReminderConfig::new_from_env()?,
            schedule: DailySchedule::new_from_env()?,
        })
    }
}
