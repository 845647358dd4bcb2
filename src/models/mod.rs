pub mod application;
pub mod essay;
pub mod options;
pub mod patch;
pub mod task;
pub mod timeline;
pub mod user;

pub use application::{
    Application, ApplicationStatus, DecisionPlan, NewApplicationRequest, UpdateApplicationRequest,
    is_supported_date,
};
pub use essay::{Essay, EssayAnalysis, EssayScores, EssayStatus};
pub use options::{OptionEntry, OptionTables};
pub use task::{Assignee, Task, TaskCategory, TaskPriority, UpdateTaskRequest};
pub use timeline::{EventCategory, TimelineEvent, DEFAULT_REMINDER_DAYS};
pub use user::{UpsertUserProfileRequest, UserProfile};
