use serde::{Deserialize, Serialize};

use crate::llm_client::TokenUsage;

/// Sentinel the model uses when the rule's subject is absent from the resume.
pub const TRIGGER_NOT_FOUND: &str = "Section not found";

/// What in the resume triggered a verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "String")]
pub enum Trigger {
    Matched(String),
    NotFound,
}

impl From<Option<String>> for Trigger {
    fn from(raw: Option<String>) -> Self {
        match raw.as_deref().map(str::trim) {
            None | Some("") => Trigger::NotFound,
            Some(text) if text.eq_ignore_ascii_case(TRIGGER_NOT_FOUND) => Trigger::NotFound,
            Some(text) => Trigger::Matched(text.to_string()),
        }
    }
}

impl From<Trigger> for String {
    fn from(trigger: Trigger) -> Self {
        match trigger {
            Trigger::Matched(text) => text,
            Trigger::NotFound => TRIGGER_NOT_FOUND.to_string(),
        }
    }
}

/// One rule's graded outcome.
///
/// `rule`, `category` and `weight` always come from the rubric definition, never from
/// the model. `weighted_penalty` may hold the model's arithmetic until scoring
/// recomputes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleVerdict {
    pub rule: String,
    pub category: String,
    pub weight: u32,
    pub penalty: u32,
    pub weighted_penalty: u32,
    pub note: String,
    pub suggestion: String,
    pub trigger: Trigger,
    pub keywords: Option<String>,
}

/// Output of one group evaluation. Folded into the merge and then dropped.
#[derive(Debug, Clone)]
pub struct GroupResult {
    pub verdicts: Vec<RuleVerdict>,
    pub usage: TokenUsage,
    pub attempts: u32,
}

/// Letter grade bands, evaluated high to low.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Grade {
    Excellent,
    Strong,
    Fair,
    Weak,
    #[serde(rename = "Needs Work")]
    NeedsWork,
}

impl Grade {
    pub fn from_score(score: f64) -> Self {
        if score >= 90.0 {
            Grade::Excellent
        } else if score >= 75.0 {
            Grade::Strong
        } else if score >= 60.0 {
            Grade::Fair
        } else if score >= 40.0 {
            Grade::Weak
        } else {
            Grade::NeedsWork
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationSummary {
    pub total_weighted_penalty: u32,
    pub max_possible_penalty: u32,
    pub final_score: f64,
    pub grade: Grade,
    pub overview: String,
    pub top_3_actionable_fixes: Vec<String>,
}

/// Terminal artifact of one evaluation. Never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub rules: Vec<RuleVerdict>,
    pub summary: EvaluationSummary,
    pub usage: TokenUsage,
}
