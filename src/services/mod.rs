pub mod deadline_deriver;
pub mod digest;
pub mod reminder_job;
pub mod scheduler;

pub use deadline_deriver::{derive_tasks, derive_timeline};
pub use reminder_job::{ReminderConfig, ReminderJob, ReminderStats};
pub use scheduler::{DailySchedule, ReminderScheduler};
