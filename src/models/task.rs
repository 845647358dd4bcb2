use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::patch::present;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskCategory {
    Application,
    Essay,
    Recommendation,
    Transcript,
    TestScores,
    FinancialAid,
    Interview,
    Portfolio,
    Other,
}

impl TaskCategory {
    pub const ALL: [TaskCategory; 9] = [
        TaskCategory::Application,
        TaskCategory::Essay,
        TaskCategory::Recommendation,
        TaskCategory::Transcript,
        TaskCategory::TestScores,
        TaskCategory::FinancialAid,
        TaskCategory::Interview,
        TaskCategory::Portfolio,
        TaskCategory::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            TaskCategory::Application => "Application",
            TaskCategory::Essay => "Essay",
            TaskCategory::Recommendation => "Recommendation",
            TaskCategory::Transcript => "Transcript",
            TaskCategory::TestScores => "Test Scores",
            TaskCategory::FinancialAid => "Financial Aid",
            TaskCategory::Interview => "Interview",
            TaskCategory::Portfolio => "Portfolio",
            TaskCategory::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    High,
    #[default]
    Medium,
    Low,
}

impl TaskPriority {
    pub const ALL: [TaskPriority; 3] = [TaskPriority::High, TaskPriority::Medium, TaskPriority::Low];

    pub fn label(self) -> &'static str {
        match self {
            TaskPriority::High => "High",
            TaskPriority::Medium => "Medium",
            TaskPriority::Low => "Low",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            TaskPriority::High => "#dc2626",
            TaskPriority::Medium => "#d97706",
            TaskPriority::Low => "#16a34a",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Assignee {
    Student,
    Counselor,
    Parent,
    Recommender,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub application_id: String,
    pub student_id: String,
    pub title: String,
    pub description: String,
    pub category: TaskCategory,
    pub due_date: NaiveDate,
    #[serde(default)]
    pub completed_date: Option<NaiveDate>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub priority: TaskPriority,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub assigned_to: Option<Assignee>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub completed: Option<bool>,
    pub priority: Option<TaskPriority>,
    pub notes: Option<String>,
    /// `null` unassigns the task.
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<Option<Assignee>>,
}

impl UpdateTaskRequest {
    /// Applies the edit. Toggling `completed` stamps or clears `completed_date`.
    pub fn apply_to(self, task: &mut Task, today: NaiveDate) {
        if let Some(title) = self.title {
            task.title = title;
        }
        if let Some(description) = self.description {
            task.description = description;
        }
        if let Some(due_date) = self.due_date {
            task.due_date = due_date;
        }
        if let Some(completed) = self.completed {
            if completed && !task.completed {
                task.completed_date = Some(today);
            } else if !completed {
                task.completed_date = None;
            }
            task.completed = completed;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(notes) = self.notes {
            task.notes = notes;
        }
        if let Some(assigned_to) = self.assigned_to {
            task.assigned_to = assigned_to;
        }
    }
}
