pub mod client;
pub mod dto;
pub mod parse;
pub mod prompts;

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{error, warn};

pub use client::{ChatCompletion, CompletionRequest, OpenAiChatClient, OpenAiConfig};
pub use dto::{
    ApplicationGuidance, CollegeRecommendations, EssayAnalysisRequest, EssayIdeas,
    EssayIdeasRequest, StudentProfile,
};

use crate::error::AppError;
use crate::models::{Application, EssayAnalysis};

fn failure(what: &str) -> AppError {
    AppError::Ai(format!(
        "Failed to generate {}. Please check your API key and try again.",
        what
    ))
}

/// Prompt-building and response-parsing over a chat-completion backend.
pub struct AiService {
    chat: Arc<dyn ChatCompletion>,
}

impl AiService {
    pub fn new(chat: Arc<dyn ChatCompletion>) -> Self {
        Self { chat }
    }

    fn ensure_configured(&self) -> Result<(), AppError> {
        if self.chat.is_configured() {
            Ok(())
        } else {
            Err(AppError::Config(client::MISSING_KEY_MESSAGE.to_string()))
        }
    }

    async fn ask<T>(
        &self,
        what: &str,
        request: CompletionRequest,
        parse: fn(&str) -> Option<T>,
    ) -> Result<T, AppError> {
        let text = match self.chat.complete(&request).await {
            Ok(text) => text,
            Err(AppError::Config(msg)) => return Err(AppError::Config(msg)),
            Err(e) => {
                error!("{} request failed: {}", what, e);
                return Err(failure(what));
            }
        };

        parse(&text).ok_or_else(|| {
            warn!("Could not parse {} from model output ({} chars)", what, text.len());
            failure(what)
        })
    }

    pub async fn generate_college_recommendations(
        &self,
        profile: &StudentProfile,
    ) -> Result<CollegeRecommendations, AppError> {
        self.ensure_configured()?;
        let request = prompts::college_recommendations(profile);
        self.ask("college recommendations", request, parse::parse_recommendations).await
    }

    pub async fn generate_essay_ideas(&self, req: &EssayIdeasRequest) -> Result<EssayIdeas, AppError> {
        self.ensure_configured()?;
        if req.prompt.trim().is_empty() {
            return Err(AppError::BadRequest("Essay prompt is required".to_string()));
        }
        let request = prompts::essay_ideas(req);
        self.ask("essay ideas", request, parse::parse_essay_ideas).await
    }

    pub async fn analyze_essay(&self, req: &EssayAnalysisRequest) -> Result<EssayAnalysis, AppError> {
        self.ensure_configured()?;
        if req.content.trim().is_empty() {
            return Err(AppError::BadRequest("Essay content is required".to_string()));
        }
        let request = prompts::essay_analysis(req);
        self.ask("essay analysis", request, parse::parse_analysis).await
    }

    pub async fn generate_application_guidance(
        &self,
        app: &Application,
        today: NaiveDate,
    ) -> Result<ApplicationGuidance, AppError> {
        self.ensure_configured()?;
        let request = prompts::application_guidance(app, today);
        self.ask("application guidance", request, parse::parse_guidance).await
    }
}
