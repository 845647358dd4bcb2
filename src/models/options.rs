use serde::Serialize;

use super::{ApplicationStatus, DecisionPlan, EssayStatus, EventCategory, TaskCategory, TaskPriority};

/// One selectable value of a closed enum, as clients render it.
#[derive(Debug, Clone, Serialize)]
pub struct OptionEntry<T> {
    pub value: T,
    pub label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OptionTables {
    pub decision_plans: Vec<OptionEntry<DecisionPlan>>,
    pub application_statuses: Vec<OptionEntry<ApplicationStatus>>,
    pub task_categories: Vec<OptionEntry<TaskCategory>>,
    pub task_priorities: Vec<OptionEntry<TaskPriority>>,
    pub event_categories: Vec<OptionEntry<EventCategory>>,
    pub essay_statuses: Vec<OptionEntry<EssayStatus>>,
}

impl OptionTables {
    pub fn build() -> Self {
        Self {
            decision_plans: DecisionPlan::ALL
                .iter()
                .map(|&p| OptionEntry { value: p, label: p.label(), color: None })
                .collect(),
            application_statuses: ApplicationStatus::ALL
                .iter()
                .map(|&s| OptionEntry { value: s, label: s.label(), color: Some(s.color()) })
                .collect(),
            task_categories: TaskCategory::ALL
                .iter()
                .map(|&c| OptionEntry { value: c, label: c.label(), color: None })
                .collect(),
            task_priorities: TaskPriority::ALL
                .iter()
                .map(|&p| OptionEntry { value: p, label: p.label(), color: Some(p.color()) })
                .collect(),
            event_categories: EventCategory::ALL
                .iter()
                .map(|&c| OptionEntry { value: c, label: c.label(), color: Some(c.color()) })
                .collect(),
            essay_statuses: EssayStatus::ALL
                .iter()
                .map(|&s| OptionEntry { value: s, label: s.label(), color: None })
                .collect(),
        }
    }
}
