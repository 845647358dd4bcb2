use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::patch::present;

/// Deadlines and decision dates must fall within these years.
pub const EARLIEST_SUPPORTED_YEAR: i32 = 1900;
pub const LATEST_SUPPORTED_YEAR: i32 = 9999;

pub fn is_supported_date(date: NaiveDate) -> bool {
    (EARLIEST_SUPPORTED_YEAR..=LATEST_SUPPORTED_YEAR).contains(&date.year())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionPlan {
    EarlyDecision,
    EarlyAction,
    RestrictiveEarlyAction,
    RegularDecision,
    Rolling,
}

impl DecisionPlan {
    pub const ALL: [DecisionPlan; 5] = [
        DecisionPlan::EarlyDecision,
        DecisionPlan::EarlyAction,
        DecisionPlan::RestrictiveEarlyAction,
        DecisionPlan::RegularDecision,
        DecisionPlan::Rolling,
    ];

    pub fn label(self) -> &'static str {
        match self {
            DecisionPlan::EarlyDecision => "Early Decision",
            DecisionPlan::EarlyAction => "Early Action",
            DecisionPlan::RestrictiveEarlyAction => "Restrictive Early Action",
            DecisionPlan::RegularDecision => "Regular Decision",
            DecisionPlan::Rolling => "Rolling Admission",
        }
    }

    /// Whether an acceptance under this plan commits the student to enroll.
    pub fn is_binding(self) -> bool {
        matches!(self, DecisionPlan::EarlyDecision)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    #[default]
    NotStarted,
    InProgress,
    Submitted,
    UnderReview,
    Accepted,
    Rejected,
    Waitlisted,
    Deferred,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 8] = [
        ApplicationStatus::NotStarted,
        ApplicationStatus::InProgress,
        ApplicationStatus::Submitted,
        ApplicationStatus::UnderReview,
        ApplicationStatus::Accepted,
        ApplicationStatus::Rejected,
        ApplicationStatus::Waitlisted,
        ApplicationStatus::Deferred,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ApplicationStatus::NotStarted => "Not Started",
            ApplicationStatus::InProgress => "In Progress",
            ApplicationStatus::Submitted => "Submitted",
            ApplicationStatus::UnderReview => "Under Review",
            ApplicationStatus::Accepted => "Accepted",
            ApplicationStatus::Rejected => "Rejected",
            ApplicationStatus::Waitlisted => "Waitlisted",
            ApplicationStatus::Deferred => "Deferred",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            ApplicationStatus::NotStarted => "#6b7280",
            ApplicationStatus::InProgress => "#2563eb",
            ApplicationStatus::Submitted => "#7c3aed",
            ApplicationStatus::UnderReview => "#d97706",
            ApplicationStatus::Accepted => "#16a34a",
            ApplicationStatus::Rejected => "#dc2626",
            ApplicationStatus::Waitlisted => "#ca8a04",
            ApplicationStatus::Deferred => "#ea580c",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub id: String,
    pub student_id: String,
    pub college_id: String,
    pub college_name: String,
    pub decision_plan: DecisionPlan,
    pub deadline: NaiveDate,
    #[serde(default)]
    pub decision_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: ApplicationStatus,
    #[serde(default)]
    pub requires_essay: bool,
    #[serde(default)]
    pub requires_recommendations: bool,
    #[serde(default)]
    pub requires_interview: bool,
    #[serde(default)]
    pub requires_portfolio: bool,
    #[serde(default)]
    pub requires_supplemental_essays: bool,
    #[serde(default)]
    pub application_fee: Option<f64>,
    #[serde(default)]
    pub fee_waiver: bool,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewApplicationRequest {
    pub student_id: String,
    pub college_id: String,
    pub college_name: String,
    pub decision_plan: DecisionPlan,
    pub deadline: NaiveDate,
    #[serde(default)]
    pub decision_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: ApplicationStatus,
    #[serde(default)]
    pub requires_essay: bool,
    #[serde(default)]
    pub requires_recommendations: bool,
    #[serde(default)]
    pub requires_interview: bool,
    #[serde(default)]
    pub requires_portfolio: bool,
    #[serde(default)]
    pub requires_supplemental_essays: bool,
    #[serde(default)]
    pub application_fee: Option<f64>,
    #[serde(default)]
    pub fee_waiver: bool,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateApplicationRequest {
    pub college_name: Option<String>,
    pub decision_plan: Option<DecisionPlan>,
    pub deadline: Option<NaiveDate>,
    /// `null` clears the decision date.
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub decision_date: Option<Option<NaiveDate>>,
    pub status: Option<ApplicationStatus>,
    pub requires_essay: Option<bool>,
    pub requires_recommendations: Option<bool>,
    pub requires_interview: Option<bool>,
    pub requires_portfolio: Option<bool>,
    pub requires_supplemental_essays: Option<bool>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub application_fee: Option<Option<f64>>,
    pub fee_waiver: Option<bool>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub notes: Option<Option<String>>,
}

impl NewApplicationRequest {
    /// Returns the first out-of-range date, if any.
    pub fn unsupported_date(&self) -> Option<NaiveDate> {
        std::iter::once(self.deadline)
            .chain(self.decision_date)
            .find(|d| !is_supported_date(*d))
    }
}

impl UpdateApplicationRequest {
    /// Returns the first out-of-range date, if any.
    pub fn unsupported_date(&self) -> Option<NaiveDate> {
        self.deadline
            .into_iter()
            .chain(self.decision_date.flatten())
            .find(|d| !is_supported_date(*d))
    }

    pub fn apply_to(self, app: &mut Application) {
        if let Some(college_name) = self.college_name {
            app.college_name = college_name;
        }
        if let Some(plan) = self.decision_plan {
            app.decision_plan = plan;
        }
        if let Some(deadline) = self.deadline {
            app.deadline = deadline;
        }
        if let Some(v) = self.decision_date {
            app.decision_date = v;
        }
        if let Some(status) = self.status {
            app.status = status;
        }
        if let Some(v) = self.requires_essay {
            app.requires_essay = v;
        }
        if let Some(v) = self.requires_recommendations {
            app.requires_recommendations = v;
        }
        if let Some(v) = self.requires_interview {
            app.requires_interview = v;
        }
        if let Some(v) = self.requires_portfolio {
            app.requires_portfolio = v;
        }
        if let Some(v) = self.requires_supplemental_essays {
            app.requires_supplemental_essays = v;
        }
        if let Some(v) = self.application_fee {
            app.application_fee = v;
        }
        if let Some(v) = self.fee_waiver {
            app.fee_waiver = v;
        }
        if let Some(v) = self.notes {
            app.notes = v;
        }
    }
}
