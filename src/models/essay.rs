use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EssayStatus {
    #[default]
    Draft,
    InProgress,
    Review,
    Final,
}

impl EssayStatus {
    pub const ALL: [EssayStatus; 4] = [
        EssayStatus::Draft,
        EssayStatus::InProgress,
        EssayStatus::Review,
        EssayStatus::Final,
    ];

    pub fn label(self) -> &'static str {
        match self {
            EssayStatus::Draft => "Draft",
            EssayStatus::InProgress => "In Progress",
            EssayStatus::Review => "In Review",
            EssayStatus::Final => "Final",
        }
    }
}

/// Per-dimension scores on a 1-10 scale.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EssayScores {
    #[serde(default)]
    pub content: u8,
    #[serde(default)]
    pub structure: u8,
    #[serde(default)]
    pub style: u8,
    #[serde(default)]
    pub grammar: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EssayAnalysis {
    pub overall_score: u8,
    #[serde(default)]
    pub scores: EssayScores,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub improvements: Vec<String>,
    #[serde(default)]
    pub summary: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Essay {
    pub id: String,
    pub student_id: String,
    #[serde(default)]
    pub application_id: Option<String>,
    pub title: String,
    pub prompt: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub word_limit: Option<usize>,
    #[serde(default)]
    pub status: EssayStatus,
    #[serde(default)]
    pub ai_feedback: Option<EssayAnalysis>,
}

impl Essay {
    pub fn word_count(&self) -> usize {
        word_count(&self.content)
    }

    pub fn character_count(&self) -> usize {
        character_count(&self.content)
    }

    pub fn is_over_limit(&self) -> bool {
        is_over_limit(&self.content, self.word_limit)
    }
}

/// Counts whitespace-separated words.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Counts characters (Unicode scalar values), whitespace included.
pub fn character_count(text: &str) -> usize {
    text.chars().count()
}

pub fn is_over_limit(text: &str, word_limit: Option<usize>) -> bool {
    word_limit.is_some_and(|limit| word_count(text) > limit)
}
