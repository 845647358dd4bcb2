use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeDelta, TimeZone, Utc};
use serde::Serialize;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::config::parse_var;
use crate::db::{DocumentStore, repository::{Document, TASKS}};
use crate::error::AppError;
use crate::identity::EmailResolver;
use crate::mail::{DispatchOutcome, MailTransport, OutgoingEmail};
use crate::services::digest::{DIGEST_SUBJECT, render_digest};

pub const DEFAULT_WINDOW_DAYS: i64 = 2;
/// Largest accepted look-ahead.
pub const MAX_WINDOW_DAYS: i64 = 365;
/// Students reminded at the same time.
pub const DEFAULT_CONCURRENCY: usize = 8;
pub const MAX_CONCURRENCY: usize = 64;

#[derive(Clone, Debug)]
pub struct ReminderConfig {
    /// Look-ahead for "due soon", in `0..=MAX_WINDOW_DAYS`.
    pub window_days: i64,
    /// Upper bound on concurrent identity lookups and sends.
    pub concurrency: usize,
    /// Upper bound on any single store, identity or mail call.
    pub call_timeout: Duration,
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            window_days: DEFAULT_WINDOW_DAYS,
            concurrency: DEFAULT_CONCURRENCY,
            call_timeout: Duration::from_secs(10),
        }
    }
}

impl ReminderConfig {
    pub fn new(window_days: i64, concurrency: usize, call_timeout: Duration) -> Result<Self, AppError> {
        if !(0..=MAX_WINDOW_DAYS).contains(&window_days) {
            return Err(AppError::Config(format!(
                "REMINDER_WINDOW_DAYS must be between 0 and {}, got {}",
                MAX_WINDOW_DAYS, window_days
            )));
        }
        if !(1..=MAX_CONCURRENCY).contains(&concurrency) {
            return Err(AppError::Config(format!(
                "REMINDER_CONCURRENCY must be between 1 and {}, got {}",
                MAX_CONCURRENCY, concurrency
            )));
        }
        Ok(Self { window_days, concurrency, call_timeout })
    }

    pub fn new_from_env() -> Result<Self, AppError> {
        Self::new(
            parse_var("REMINDER_WINDOW_DAYS", DEFAULT_WINDOW_DAYS)?,
            parse_var("REMINDER_CONCURRENCY", DEFAULT_CONCURRENCY)?,
            Duration::from_secs(parse_var("EXTERNAL_CALL_TIMEOUT_SECS", 10u64)?),
        )
    }
}

/// A task document that passed read-boundary validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ReminderCandidate {
    pub id: String,
    pub student_id: String,
    pub title: String,
    pub due: DateTime<Utc>,
    pub completed: bool,
}

impl ReminderCandidate {
    /// Requires a non-empty `student_id` and a parseable `due_date`.
    pub fn from_document(doc: &Document) -> Option<Self> {
        let body = &doc.body;
        let student_id = body
            .get("student_id")
            .and_then(|v| v.as_str())
            .filter(|s| !s.trim().is_empty())?;
        let due = body.get("due_date").and_then(|v| v.as_str()).and_then(parse_due)?;
        let title = body
            .get("title")
            .and_then(|v| v.as_str())
            .filter(|s| !s.trim().is_empty())
            .unwrap_or("Untitled task");
        let completed = body.get("completed").and_then(|v| v.as_bool()).unwrap_or(false)
            || body.get("status").and_then(|v| v.as_str()) == Some("completed");

        Some(Self {
            id: doc.id.clone(),
            student_id: student_id.to_string(),
            title: title.to_string(),
            due,
            completed,
        })
    }
}

/// Accepts RFC 3339, a naive `YYYY-MM-DDTHH:MM:SS` (read as UTC) or a bare
/// date (midnight UTC).
pub fn parse_due(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Some(Utc.from_utc_datetime(&naive));
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
    date.and_hms_opt(0, 0, 0).map(|naive| Utc.from_utc_datetime(&naive))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Urgency {
    Overdue,
    DueSoon,
}

pub fn classify(candidate: &ReminderCandidate, now: DateTime<Utc>, window: TimeDelta) -> Option<Urgency> {
    if candidate.completed {
        return None;
    }
    if candidate.due < now {
        Some(Urgency::Overdue)
    } else if candidate.due <= now + window {
        Some(Urgency::DueSoon)
    } else {
        None
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StudentReminders {
    pub student_id: String,
    pub overdue: Vec<ReminderCandidate>,
    pub due_soon: Vec<ReminderCandidate>,
}

/// Groups classified tasks by student. Each sublist is ordered by due date.
pub fn group_by_student(
    classified: Vec<(ReminderCandidate, Urgency)>,
) -> HashMap<String, StudentReminders> {
    let mut groups: HashMap<String, StudentReminders> = HashMap::new();
    for (candidate, urgency) in classified {
        let group = groups
            .entry(candidate.student_id.clone())
            .or_insert_with(|| StudentReminders {
                student_id: candidate.student_id.clone(),
                ..Default::default()
            });
        match urgency {
            Urgency::Overdue => group.overdue.push(candidate),
            Urgency::DueSoon => group.due_soon.push(candidate),
        }
    }
    for group in groups.values_mut() {
        group.overdue.sort_by_key(|c| c.due);
        group.due_soon.sort_by_key(|c| c.due);
    }
    groups
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct ReminderStats {
    pub scanned: usize,
    pub skipped_invalid: usize,
    pub overdue: usize,
    pub due_soon: usize,
    pub students: usize,
    pub sent: usize,
    pub skipped_no_credential: usize,
    pub no_email: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StudentOutcome {
    Dispatched(DispatchOutcome),
    NoEmail,
    Failed,
}

/// Daily scan of task documents that emails each student a digest of overdue
/// and due-soon work.
pub struct ReminderJob {
    store: Arc<dyn DocumentStore>,
    resolver: EmailResolver,
    mailer: Arc<dyn MailTransport>,
    config: ReminderConfig,
}

impl ReminderJob {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        resolver: EmailResolver,
        mailer: Arc<dyn MailTransport>,
        config: ReminderConfig,
    ) -> Self {
        Self { store, resolver, mailer, config }
    }

    /// Runs one pass. Never fails; per-student problems are logged and counted.
    pub async fn run(&self, now: DateTime<Utc>) -> ReminderStats {
        info!("Starting reminder run at {}", now.to_rfc3339());
        let mut stats = ReminderStats::default();

        let documents = match tokio::time::timeout(self.config.call_timeout, self.store.list_all(TASKS)).await {
            Ok(Ok(docs)) => docs,
            Ok(Err(e)) => {
                warn!("Reminder run aborted, task scan failed: {}", e);
                return stats;
            }
            Err(_) => {
                warn!("Reminder run aborted, task scan timed out");
                return stats;
            }
        };
        stats.scanned = documents.len();

        // Same bounds as `ReminderConfig::new`.
        let window = TimeDelta::days(self.config.window_days.clamp(0, MAX_WINDOW_DAYS));
        let concurrency = self.config.concurrency.clamp(1, MAX_CONCURRENCY);
        let mut legacy = 0;
        let mut classified = Vec::new();
        for doc in &documents {
            let Some(candidate) = ReminderCandidate::from_document(doc) else {
                if doc.body.get("due_date").is_none() && doc.body.get("start_date").is_some() {
                    legacy += 1;
                }
                debug!("Skipping task {} (missing student_id or due_date)", doc.id);
                stats.skipped_invalid += 1;
                continue;
            };
            if let Some(urgency) = classify(&candidate, now, window) {
                match urgency {
                    Urgency::Overdue => stats.overdue += 1,
                    Urgency::DueSoon => stats.due_soon += 1,
                }
                classified.push((candidate, urgency));
            }
        }
        if legacy > 0 {
            warn!("{} task documents still use start_date instead of due_date and were skipped", legacy);
        }

        let groups = group_by_student(classified);
        stats.students = groups.len();

        let semaphore = Arc::new(Semaphore::new(concurrency));
        let mut set = JoinSet::new();
        for (_, group) in groups {
            let resolver = self.resolver.clone();
            let mailer = self.mailer.clone();
            let timeout = self.config.call_timeout;
            let sem = semaphore.clone();
            set.spawn(async move {
                let Ok(_permit) = sem.acquire().await else {
                    return StudentOutcome::Failed;
                };
                remind_student(&resolver, mailer.as_ref(), timeout, group).await
            });
        }

        while let Some(joined) = set.join_next().await {
            match joined {
                Ok(StudentOutcome::Dispatched(DispatchOutcome::Sent)) => stats.sent += 1,
                Ok(StudentOutcome::Dispatched(DispatchOutcome::Skipped)) => stats.skipped_no_credential += 1,
                Ok(StudentOutcome::NoEmail) => stats.no_email += 1,
                Ok(StudentOutcome::Failed) => stats.failed += 1,
                Err(e) => {
                    warn!("Reminder branch panicked: {}", e);
                    stats.failed += 1;
                }
            }
        }

        info!("Reminder run completed: {:?}", stats);
        stats
    }
}

async fn remind_student(
    resolver: &EmailResolver,
    mailer: &dyn MailTransport,
    timeout: Duration,
    group: StudentReminders,
) -> StudentOutcome {
    let Some(email) = resolver.resolve(&group.student_id).await else {
        info!("No email found for student {}, skipping reminder", group.student_id);
        return StudentOutcome::NoEmail;
    };

    let message = OutgoingEmail {
        to: email,
        subject: DIGEST_SUBJECT.to_string(),
        body_text: render_digest(&group.overdue, &group.due_soon),
    };

    match tokio::time::timeout(timeout, mailer.send(&message)).await {
        Ok(Ok(outcome)) => {
            if outcome == DispatchOutcome::Sent {
                info!(
                    "Reminder sent to student {} ({} overdue, {} due soon)",
                    group.student_id,
                    group.overdue.len(),
                    group.due_soon.len()
                );
            }
            StudentOutcome::Dispatched(outcome)
        }
        Ok(Err(e)) => {
            warn!("Failed to send reminder to student {}: {}", group.student_id, e);
            StudentOutcome::Failed
        }
        Err(_) => {
            warn!("Reminder email to student {} timed out", group.student_id);
            StudentOutcome::Failed
        }
    }
}
