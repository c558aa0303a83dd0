//! Verdict validation — the boundary where untrusted model output becomes `RuleVerdict`s.
//!
//! Every violation is a `VerdictError`, which the group evaluator treats as a failed
//! attempt. Nothing unchecked reaches scoring.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::evaluation::models::{RuleVerdict, Trigger};
use crate::llm_client::strip_json_fences;
use crate::rubric::{RubricGroup, MAX_RULE_PENALTY};

#[derive(Debug, Error)]
pub enum VerdictError {
    #[error("response is not valid JSON: {0}")]
    NotJson(#[from] serde_json::Error),

    #[error("expected a JSON array of rule objects, got {0}")]
    NotArray(&'static str),

    #[error("entry {index}: {reason}")]
    InvalidEntry { index: usize, reason: String },

    #[error("entry {index}: penalty {penalty} is outside 0-10")]
    PenaltyOutOfRange { index: usize, penalty: u32 },

    #[error("entry {index}: rule '{rule}' is not part of group '{group}'")]
    UnknownRule {
        index: usize,
        rule: String,
        group: &'static str,
    },

    #[error("entry {index}: rule '{rule}' appears more than once")]
    DuplicateRule { index: usize, rule: String },
}

/// Shape the model is asked to produce. Only the fields we rely on are required.
#[derive(Debug, Deserialize)]
struct CandidateVerdict {
    rule: String,
    penalty: u32,
    #[serde(default)]
    weighted_penalty: Option<f64>,
    note: String,
    suggestion: String,
    #[serde(default)]
    trigger: Option<String>,
    #[serde(default)]
    keywords: Option<Keywords>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Keywords {
    Text(String),
    List(Vec<String>),
}

impl Keywords {
    fn into_text(self) -> Option<String> {
        let text = match self {
            Keywords::Text(text) => text.trim().to_string(),
            Keywords::List(items) => items
                .iter()
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join(", "),
        };
        (!text.is_empty()).then_some(text)
    }
}

/// Parses a group response into verdicts ordered by rubric position.
///
/// Coverage is NOT checked here: a response missing a rule still parses. The
/// coordinator enforces one-verdict-per-rule across the merged set.
pub fn parse_group_verdicts(
    raw: &str,
    group: &RubricGroup<'_>,
) -> Result<Vec<RuleVerdict>, VerdictError> {
    let value: Value = serde_json::from_str(strip_json_fences(raw))?;

    let entries = match value {
        Value::Array(entries) => entries,
        other => return Err(VerdictError::NotArray(json_kind(&other))),
    };

    let mut placed: Vec<(usize, RuleVerdict)> = Vec::with_capacity(entries.len());

    for (index, entry) in entries.into_iter().enumerate() {
        let candidate: CandidateVerdict =
            serde_json::from_value(entry).map_err(|e| VerdictError::InvalidEntry {
                index,
                reason: e.to_string(),
            })?;

        if candidate.penalty > MAX_RULE_PENALTY {
            return Err(VerdictError::PenaltyOutOfRange {
                index,
                penalty: candidate.penalty,
            });
        }

        let position =
            group
                .position_of(&candidate.rule)
                .ok_or_else(|| VerdictError::UnknownRule {
                    index,
                    rule: candidate.rule.clone(),
                    group: group.name,
                })?;

        if placed.iter().any(|(p, _)| *p == position) {
            return Err(VerdictError::DuplicateRule {
                index,
                rule: candidate.rule,
            });
        }

        let def = &group.rules[position];
        let weighted_penalty = candidate
            .weighted_penalty
            .filter(|v| v.is_finite() && *v >= 0.0)
            .map(|v| v.round() as u32)
            .unwrap_or(candidate.penalty * def.weight);

        placed.push((
            position,
            RuleVerdict {
                rule: def.rule.to_string(),
                category: def.category.to_string(),
                weight: def.weight,
                penalty: candidate.penalty,
                weighted_penalty,
                note: candidate.note,
                suggestion: candidate.suggestion,
                trigger: Trigger::from(candidate.trigger),
                keywords: candidate.keywords.and_then(Keywords::into_text),
            },
        ));
    }

    placed.sort_by_key(|(position, _)| *position);
    Ok(placed.into_iter().map(|(_, verdict)| verdict).collect())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
