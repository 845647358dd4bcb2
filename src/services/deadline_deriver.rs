//! Derives timeline events and checklist tasks from an application's deadline.
//!
//! Both functions are pure: the same application always yields the same
//! records with the same ids in the same order, so callers can regenerate
//! freely and upsert by id.

use chrono::{NaiveDate, TimeDelta};

use crate::models::{
    Application, EventCategory, Task, TaskCategory, TaskPriority, TimelineEvent,
    DEFAULT_REMINDER_DAYS,
};

/// Days before the master deadline that essays are due.
pub const ESSAY_LEAD_DAYS: i64 = 14;
/// Days before the master deadline that recommendations are due.
pub const RECOMMENDATION_LEAD_DAYS: i64 = 21;

const EVENT_TAGS: [&str; 4] = ["deadline", "essay-deadline", "recommendation-deadline", "decision"];
const TASK_TAGS: [&str; 7] = [
    "application",
    "essay",
    "supplemental-essays",
    "recommendations",
    "transcript",
    "test-scores",
    "financial-aid",
];

fn derived_id(tag: &str, application_id: &str) -> String {
    format!("{}-{}", tag, application_id)
}

/// Saturates at `NaiveDate::MIN` so derivation stays total for any date.
fn days_before(date: NaiveDate, days: i64) -> NaiveDate {
    date.checked_sub_signed(TimeDelta::days(days)).unwrap_or(NaiveDate::MIN)
}

/// Every timeline id the deriver can produce for this application.
pub fn possible_event_ids(application_id: &str) -> Vec<String> {
    EVENT_TAGS.iter().map(|tag| derived_id(tag, application_id)).collect()
}

/// Every task id the deriver can produce for this application.
pub fn possible_task_ids(application_id: &str) -> Vec<String> {
    TASK_TAGS.iter().map(|tag| derived_id(tag, application_id)).collect()
}

pub fn derive_timeline(app: &Application) -> Vec<TimelineEvent> {
    let event = |tag: &str, title: String, description: String, date: NaiveDate, category| {
        TimelineEvent {
            id: derived_id(tag, &app.id),
            title,
            description,
            date,
            category,
            college_name: Some(app.college_name.clone()),
            application_id: Some(app.id.clone()),
            task_id: None,
            completed: false,
            important: true,
            reminder_sent: false,
            reminder_days_before: DEFAULT_REMINDER_DAYS,
        }
    };

    let mut events = vec![event(
        "deadline",
        format!("{} application deadline", app.college_name),
        format!("{} deadline for {}", app.decision_plan.label(), app.college_name),
        app.deadline,
        EventCategory::Deadline,
    )];

    if app.requires_essay {
        events.push(event(
            "essay-deadline",
            format!("{} essays due", app.college_name),
            format!("Finish all essays for {} two weeks before the deadline", app.college_name),
            days_before(app.deadline, ESSAY_LEAD_DAYS),
            EventCategory::Deadline,
        ));
    }

    if app.requires_recommendations {
        events.push(event(
            "recommendation-deadline",
            format!("{} recommendations due", app.college_name),
            format!("Recommendation letters for {} should be submitted", app.college_name),
            days_before(app.deadline, RECOMMENDATION_LEAD_DAYS),
            EventCategory::Deadline,
        ));
    }

    if let Some(decision_date) = app.decision_date {
        events.push(event(
            "decision",
            format!("{} decision release", app.college_name),
            format!("Admission decision expected from {}", app.college_name),
            decision_date,
            EventCategory::Decision,
        ));
    }

    events.sort_by_key(|e| e.date);
    events
}

pub fn derive_tasks(app: &Application) -> Vec<Task> {
    let task = |tag: &str, title: String, description: String, category, due_date, priority| Task {
        id: derived_id(tag, &app.id),
        application_id: app.id.clone(),
        student_id: app.student_id.clone(),
        title,
        description,
        category,
        due_date,
        completed_date: None,
        completed: false,
        priority,
        notes: String::new(),
        assigned_to: None,
    };

    let college = &app.college_name;
    let mut tasks = vec![task(
        "application",
        format!("Submit {} application", college),
        format!("Complete and submit the {} application", app.decision_plan.label()),
        TaskCategory::Application,
        app.deadline,
        TaskPriority::High,
    )];

    if app.requires_essay {
        let essay_due = days_before(app.deadline, ESSAY_LEAD_DAYS);
        tasks.push(task(
            "essay",
            format!("Finish {} essay", college),
            "Write, revise and proofread the main essay".to_string(),
            TaskCategory::Essay,
            essay_due,
            TaskPriority::High,
        ));
        if app.requires_supplemental_essays {
            tasks.push(task(
                "supplemental-essays",
                format!("Finish {} supplemental essays", college),
                "Draft and polish every supplemental prompt".to_string(),
                TaskCategory::Essay,
                essay_due,
                TaskPriority::High,
            ));
        }
    }

    if app.requires_recommendations {
        tasks.push(task(
            "recommendations",
            format!("Request {} recommendations", college),
            "Confirm recommenders have submitted their letters".to_string(),
            TaskCategory::Recommendation,
            days_before(app.deadline, RECOMMENDATION_LEAD_DAYS),
            TaskPriority::High,
        ));
    }

    tasks.push(task(
        "transcript",
        format!("Send transcript to {}", college),
        "Ask the school counselor to send an official transcript".to_string(),
        TaskCategory::Transcript,
        app.deadline,
        TaskPriority::Medium,
    ));
    tasks.push(task(
        "test-scores",
        format!("Send test scores to {}", college),
        "Submit official test scores if required or reported".to_string(),
        TaskCategory::TestScores,
        app.deadline,
        TaskPriority::Medium,
    ));
    tasks.push(task(
        "financial-aid",
        format!("Complete {} financial aid forms", college),
        "Submit FAFSA, CSS Profile or institutional forms as required".to_string(),
        TaskCategory::FinancialAid,
        app.deadline,
        TaskPriority::Medium,
    ));

    tasks.sort_by_key(|t| t.due_date);
    tasks
}
