//! Turns free-form model output into structured results.
//!
//! Models are asked for JSON but regularly wrap it in prose or code fences, or
//! ignore the format entirely. JSON is tried first; list-shaped results fall
//! back to reading bulleted or numbered lines.

use serde::Deserialize;

use crate::ai::dto::{
    ApplicationGuidance, CollegeRecommendations, EssayIdea, EssayIdeas, SchoolFit,
    SchoolRecommendation,
};
use crate::models::{EssayAnalysis, EssayScores};

/// Finds the JSON payload in a reply: a fenced block if present, otherwise the
/// outermost `{...}` or `[...]` span.
pub fn extract_json(text: &str) -> Option<&str> {
    if let Some(start) = text.find("```") {
        let after = text[start + 3..].trim_start_matches(|c: char| c.is_ascii_alphabetic());
        if let Some(end) = after.find("```") {
            let inner = after[..end].trim();
            if !inner.is_empty() {
                return Some(inner);
            }
        }
    }

    let open = text.find(['{', '['])?;
    let close_char = if text[open..].starts_with('{') { '}' } else { ']' };
    let close = text.rfind(close_char)?;
    (close > open).then(|| &text[open..=close])
}

fn parse_json<T: for<'de> Deserialize<'de>>(text: &str) -> Option<T> {
    extract_json(text).and_then(|json| serde_json::from_str(json).ok())
}

/// Bulleted (`-`, `*`, `•`) or numbered (`1.`, `2)`) lines, markers stripped.
pub fn list_items(text: &str) -> Vec<String> {
    text.lines()
        .filter_map(|line| {
            let line = line.trim();
            let rest = if let Some(rest) = line
                .strip_prefix("- ")
                .or_else(|| line.strip_prefix("* "))
                .or_else(|| line.strip_prefix("• "))
            {
                rest
            } else {
                let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
                if digits == 0 {
                    return None;
                }
                line[digits..]
                    .strip_prefix(". ")
                    .or_else(|| line[digits..].strip_prefix(") "))?
            };
            let cleaned = rest.replace("**", "").trim().to_string();
            (!cleaned.is_empty()).then_some(cleaned)
        })
        .collect()
}

/// Splits "Name - reason" / "Name: reason" into its two halves.
fn split_item(item: &str) -> (String, String) {
    for sep in [" - ", " – ", ": "] {
        if let Some((head, tail)) = item.split_once(sep) {
            return (head.trim().to_string(), tail.trim().to_string());
        }
    }
    (item.trim().to_string(), String::new())
}

#[derive(Deserialize)]
struct RawSchool {
    #[serde(alias = "college", alias = "school")]
    name: String,
    #[serde(default, alias = "category", alias = "type")]
    fit: Option<String>,
    #[serde(default, alias = "reasoning", alias = "why")]
    reason: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SchoolsPayload {
    Wrapped {
        #[serde(alias = "colleges", alias = "recommendations")]
        schools: Vec<RawSchool>,
    },
    Bare(Vec<RawSchool>),
}

pub fn parse_recommendations(text: &str) -> Option<CollegeRecommendations> {
    let schools: Vec<SchoolRecommendation> = match parse_json::<SchoolsPayload>(text) {
        Some(SchoolsPayload::Wrapped { schools }) | Some(SchoolsPayload::Bare(schools)) => schools
            .into_iter()
            .map(|s| SchoolRecommendation {
                fit: s.fit.as_deref().and_then(SchoolFit::from_label),
                name: s.name,
                reason: s.reason,
            })
            .collect(),
        None => list_items(text)
            .iter()
            .map(|item| {
                let (name, reason) = split_item(item);
                SchoolRecommendation { fit: SchoolFit::from_label(&reason), name, reason }
            })
            .collect(),
    };

    let schools: Vec<_> = schools.into_iter().filter(|s| !s.name.is_empty()).collect();
    (!schools.is_empty()).then_some(CollegeRecommendations { schools })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IdeasPayload {
    Wrapped { ideas: Vec<EssayIdea> },
    Bare(Vec<EssayIdea>),
}

pub fn parse_essay_ideas(text: &str) -> Option<EssayIdeas> {
    let ideas: Vec<EssayIdea> = match parse_json::<IdeasPayload>(text) {
        Some(IdeasPayload::Wrapped { ideas }) | Some(IdeasPayload::Bare(ideas)) => ideas,
        None => list_items(text)
            .iter()
            .map(|item| {
                let (title, description) = split_item(item);
                EssayIdea { title, description }
            })
            .collect(),
    };

    let ideas: Vec<_> = ideas.into_iter().filter(|i| !i.title.is_empty()).collect();
    (!ideas.is_empty()).then_some(EssayIdeas { ideas })
}

#[derive(Deserialize, Default)]
struct RawScores {
    content: Option<f64>,
    structure: Option<f64>,
    style: Option<f64>,
    grammar: Option<f64>,
}

#[derive(Deserialize)]
struct RawAnalysis {
    #[serde(alias = "score", alias = "overall")]
    overall_score: f64,
    #[serde(default)]
    scores: RawScores,
    #[serde(default)]
    strengths: Vec<String>,
    #[serde(default, alias = "weaknesses", alias = "suggestions")]
    improvements: Vec<String>,
    #[serde(default, alias = "feedback")]
    summary: String,
}

fn clamp_score(score: f64) -> u8 {
    score.round().clamp(1.0, 10.0) as u8
}

/// Scored feedback has no sensible non-JSON fallback, so this is JSON only.
/// Dimensions the model left out inherit the overall score.
pub fn parse_analysis(text: &str) -> Option<EssayAnalysis> {
    let raw: RawAnalysis = parse_json(text)?;
    let overall = clamp_score(raw.overall_score);
    let dim = |v: Option<f64>| v.map(clamp_score).unwrap_or(overall);

    Some(EssayAnalysis {
        overall_score: overall,
        scores: EssayScores {
            content: dim(raw.scores.content),
            structure: dim(raw.scores.structure),
            style: dim(raw.scores.style),
            grammar: dim(raw.scores.grammar),
        },
        strengths: raw.strengths,
        improvements: raw.improvements,
        summary: raw.summary,
    })
}

#[derive(Deserialize)]
struct RawGuidance {
    #[serde(alias = "steps")]
    next_steps: Vec<String>,
    #[serde(default)]
    tips: Vec<String>,
}

pub fn parse_guidance(text: &str) -> Option<ApplicationGuidance> {
    if let Some(raw) = parse_json::<RawGuidance>(text) {
        if !raw.next_steps.is_empty() {
            return Some(ApplicationGuidance { next_steps: raw.next_steps, tips: raw.tips });
        }
    }
    let steps = list_items(text);
    (!steps.is_empty()).then_some(ApplicationGuidance { next_steps: steps, tips: Vec::new() })
}
