use std::fmt::Write;

use chrono::NaiveDate;

use crate::ai::client::CompletionRequest;
use crate::ai::dto::{EssayAnalysisRequest, EssayIdeasRequest, StudentProfile};
use crate::models::Application;
use crate::models::essay::word_count;

const SYSTEM_COUNSELOR: &str = "You are an experienced college admissions counselor. \
Give specific, honest and encouraging advice. Always answer with the JSON object requested and nothing else.";

fn push_line(out: &mut String, label: &str, value: Option<String>) {
    if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
        let _ = writeln!(out, "- {}: {}", label, value);
    }
}

fn join(items: &[String]) -> Option<String> {
    (!items.is_empty()).then(|| items.join(", "))
}

pub fn college_recommendations(profile: &StudentProfile) -> CompletionRequest {
    let mut user = String::from("Recommend 8 to 10 colleges for this student.\n\nStudent profile:\n");
    push_line(&mut user, "GPA", profile.gpa.map(|g| format!("{:.2}", g)));
    push_line(&mut user, "SAT", profile.sat_score.map(|s| s.to_string()));
    push_line(&mut user, "ACT", profile.act_score.map(|s| s.to_string()));
    push_line(&mut user, "Intended major", profile.intended_major.clone());
    push_line(&mut user, "Interests", join(&profile.interests));
    push_line(&mut user, "Extracurriculars", join(&profile.extracurriculars));
    push_line(&mut user, "Preferred location", profile.preferred_location.clone());
    push_line(&mut user, "Preferred size", profile.preferred_size.clone());
    push_line(&mut user, "Budget", profile.budget.clone());
    user.push_str(
        "\nMix reach, target and safety schools. Respond as JSON: \
{\"schools\": [{\"name\": string, \"fit\": \"reach\" | \"target\" | \"safety\", \"reason\": string}]}",
    );

    CompletionRequest {
        system: SYSTEM_COUNSELOR.to_string(),
        user,
        max_tokens: 1500,
        temperature: 0.7,
    }
}

pub fn essay_ideas(req: &EssayIdeasRequest) -> CompletionRequest {
    let mut user = String::from("Brainstorm 5 distinct essay ideas for this prompt.\n\n");
    let _ = writeln!(user, "Prompt: {}", req.prompt);
    push_line(&mut user, "College", req.college_name.clone());
    push_line(&mut user, "Student background", req.background.clone());
    push_line(&mut user, "Interests", join(&req.interests));
    user.push_str(
        "\nEach idea needs a short title and a two-sentence description of the angle. \
Respond as JSON: {\"ideas\": [{\"title\": string, \"description\": string}]}",
    );

    CompletionRequest {
        system: SYSTEM_COUNSELOR.to_string(),
        user,
        max_tokens: 1000,
        temperature: 0.8,
    }
}

pub fn essay_analysis(req: &EssayAnalysisRequest) -> CompletionRequest {
    let mut user = String::from("Review this college application essay.\n\n");
    push_line(&mut user, "Prompt", req.prompt.clone());
    push_line(&mut user, "College", req.college_name.clone());
    let words = word_count(&req.content);
    match req.word_limit {
        Some(limit) => {
            let _ = writeln!(user, "- Length: {} words (limit {})", words, limit);
        }
        None => {
            let _ = writeln!(user, "- Length: {} words", words);
        }
    }
    let _ = write!(user, "\nEssay:\n\"\"\"\n{}\n\"\"\"\n", req.content);
    user.push_str(
        "\nScore each dimension from 1 to 10. Respond as JSON: \
{\"overall_score\": number, \"scores\": {\"content\": number, \"structure\": number, \"style\": number, \"grammar\": number}, \
\"strengths\": [string], \"improvements\": [string], \"summary\": string}",
    );

    CompletionRequest {
        system: SYSTEM_COUNSELOR.to_string(),
        user,
        max_tokens: 1500,
        temperature: 0.3,
    }
}

pub fn application_guidance(app: &Application, today: NaiveDate) -> CompletionRequest {
    let days_left = (app.deadline - today).num_days();
    let mut requirements = Vec::new();
    if app.requires_essay {
        requirements.push("essay".to_string());
    }
    if app.requires_supplemental_essays {
        requirements.push("supplemental essays".to_string());
    }
    if app.requires_recommendations {
        requirements.push("recommendation letters".to_string());
    }
    if app.requires_interview {
        requirements.push("interview".to_string());
    }
    if app.requires_portfolio {
        requirements.push("portfolio".to_string());
    }

    let mut user = String::from("Give a student a concrete plan for finishing this application.\n\n");
    let _ = writeln!(user, "- College: {}", app.college_name);
    let _ = writeln!(user, "- Decision plan: {}", app.decision_plan.label());
    let _ = writeln!(user, "- Deadline: {} ({} days from today)", app.deadline, days_left);
    let _ = writeln!(user, "- Current status: {}", app.status.label());
    push_line(&mut user, "Requirements", join(&requirements));
    if app.decision_plan.is_binding() {
        user.push_str("- This plan is binding if admitted.\n");
    }
    user.push_str(
        "\nRespond as JSON: {\"next_steps\": [string], \"tips\": [string]}",
    );

    CompletionRequest {
        system: SYSTEM_COUNSELOR.to_string(),
        user,
        max_tokens: 1000,
        temperature: 0.7,
    }
}
