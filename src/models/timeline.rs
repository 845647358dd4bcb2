use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const DEFAULT_REMINDER_DAYS: u32 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventCategory {
    Deadline,
    Reminder,
    Milestone,
    Decision,
}

impl EventCategory {
    pub const ALL: [EventCategory; 4] = [
        EventCategory::Deadline,
        EventCategory::Reminder,
        EventCategory::Milestone,
        EventCategory::Decision,
    ];

    pub fn label(self) -> &'static str {
        match self {
            EventCategory::Deadline => "Deadline",
            EventCategory::Reminder => "Reminder",
            EventCategory::Milestone => "Milestone",
            EventCategory::Decision => "Decision",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            EventCategory::Deadline => "#dc2626",
            EventCategory::Reminder => "#2563eb",
            EventCategory::Milestone => "#16a34a",
            EventCategory::Decision => "#7c3aed",
        }
    }
}

fn default_reminder_days() -> u32 {
    DEFAULT_REMINDER_DAYS
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEvent {
    pub id: String,
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    pub category: EventCategory,
    #[serde(default)]
    pub college_name: Option<String>,
    #[serde(default)]
    pub application_id: Option<String>,
    #[serde(default)]
    pub task_id: Option<String>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub important: bool,
    #[serde(default)]
    pub reminder_sent: bool,
    #[serde(default = "default_reminder_days")]
    pub reminder_days_before: u32,
}
