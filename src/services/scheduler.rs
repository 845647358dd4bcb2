use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, FixedOffset, NaiveTime, TimeDelta, TimeZone, Utc};
use tracing::info;

use crate::config::parse_var;
use crate::error::AppError;
use crate::services::reminder_job::ReminderJob;

/// A fixed wall-clock time in a fixed UTC offset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DailySchedule {
    time: NaiveTime,
    offset: FixedOffset,
}

impl DailySchedule {
    pub fn new(hour: u32, minute: u32, utc_offset_hours: i32) -> Result<Self, AppError> {
        let time = NaiveTime::from_hms_opt(hour, minute, 0)
            .ok_or_else(|| AppError::Config(format!("invalid reminder time {:02}:{:02}", hour, minute)))?;
        let offset = FixedOffset::east_opt(utc_offset_hours * 3600)
            .ok_or_else(|| AppError::Config(format!("invalid UTC offset: {}", utc_offset_hours)))?;
        Ok(Self { time, offset })
    }

    /// 09:00 US Eastern (standard time).
    pub fn new_from_env() -> Result<Self, AppError> {
        Self::new(
            parse_var("REMINDER_HOUR", 9u32)?,
            parse_var("REMINDER_MINUTE", 0u32)?,
            parse_var("REMINDER_UTC_OFFSET_HOURS", -5i32)?,
        )
    }

    /// The first scheduled instant strictly after `now`.
    pub fn next_run_after(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let local_date = now.with_timezone(&self.offset).date_naive();
        let to_utc = |date: chrono::NaiveDate| {
            let local = date.and_time(self.time);
            Utc.from_utc_datetime(&(local - TimeDelta::seconds(self.offset.local_minus_utc() as i64)))
        };

        let today = to_utc(local_date);
        if today > now {
            today
        } else {
            to_utc(local_date + TimeDelta::days(1))
        }
    }
}

/// Daily reminder trigger. Runs never overlap: each one is awaited before the
/// next sleep starts.
pub struct ReminderScheduler {
    job: Arc<ReminderJob>,
    schedule: DailySchedule,
}

impl ReminderScheduler {
    pub fn new(job: Arc<ReminderJob>, schedule: DailySchedule) -> Self {
        Self { job, schedule }
    }

    pub async fn start(self) {
        info!("Starting reminder scheduler");

        loop {
            let now = Utc::now();
            let next = self.schedule.next_run_after(now);
            let wait = (next - now).to_std().unwrap_or(Duration::ZERO);
            info!("Next reminder run at {}", next.to_rfc3339());
            tokio::time::sleep(wait).await;

            // The job logs its own failures; the loop always continues.
            let stats = self.job.run(Utc::now()).await;
            info!("Scheduled reminder run finished - sent {}, failed {}", stats.sent, stats.failed);
        }
    }
}
