use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StudentProfile {
    #[serde(default)]
    pub gpa: Option<f32>,
    #[serde(default)]
    pub sat_score: Option<u32>,
    #[serde(default)]
    pub act_score: Option<u32>,
    #[serde(default)]
    pub intended_major: Option<String>,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub extracurriculars: Vec<String>,
    #[serde(default)]
    pub preferred_location: Option<String>,
    #[serde(default)]
    pub preferred_size: Option<String>,
    #[serde(default)]
    pub budget: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchoolFit {
    Reach,
    Target,
    Safety,
}

impl SchoolFit {
    /// Loose match on whatever wording the model used.
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.to_lowercase();
        if label.contains("reach") {
            Some(SchoolFit::Reach)
        } else if label.contains("target") || label.contains("match") {
            Some(SchoolFit::Target)
        } else if label.contains("safety") || label.contains("likely") {
            Some(SchoolFit::Safety)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchoolRecommendation {
    pub name: String,
    pub fit: Option<SchoolFit>,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CollegeRecommendations {
    pub schools: Vec<SchoolRecommendation>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EssayIdeasRequest {
    pub prompt: String,
    #[serde(default)]
    pub college_name: Option<String>,
    #[serde(default)]
    pub background: Option<String>,
    #[serde(default)]
    pub interests: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EssayIdea {
    pub title: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EssayIdeas {
    pub ideas: Vec<EssayIdea>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EssayAnalysisRequest {
    pub content: String,
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub college_name: Option<String>,
    #[serde(default)]
    pub word_limit: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApplicationGuidance {
    pub next_steps: Vec<String>,
    #[serde(default)]
    pub tips: Vec<String>,
}
