//! Rubric — the static rule table and its fixed partition into evaluation groups.
//!
//! The rubric never changes at runtime. `validate_rubric()` runs once at startup;
//! a failure there is a configuration bug and aborts the process.

use serde::Serialize;
use thiserror::Error;

mod rules;

pub use rules::RUBRIC;
use rules::{FORMATTING, KEYWORD_RELEVANCE, READABILITY, RESUME_STRUCTURE, WORK_EXPERIENCE};

pub const RUBRIC_SIZE: usize = 28;

/// Maximum penalty any rule can receive.
pub const MAX_RULE_PENALTY: u32 = 10;

/// Σ(weight × MAX_RULE_PENALTY) over the rubric. Part of the scoring contract:
/// scores are normalized against this constant, never against live data.
pub const MAX_POSSIBLE_PENALTY: u32 = 820;

/// A single static rubric rule. Serialized verbatim into group prompts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RuleDefinition {
    pub rule: &'static str,
    pub category: &'static str,
    pub weight: u32,
    pub evaluation_guideline: &'static str,
}

/// One entry of the partition layout: a category and how many consecutive rules it spans.
#[derive(Debug, Clone, Copy)]
pub struct GroupSpec {
    pub name: &'static str,
    pub size: usize,
}

/// Category boundaries of the canonical rubric, in rubric order.
pub const GROUP_LAYOUT: [GroupSpec; 5] = [
    GroupSpec {
        name: KEYWORD_RELEVANCE,
        size: 7,
    },
    GroupSpec {
        name: RESUME_STRUCTURE,
        size: 6,
    },
    GroupSpec {
        name: WORK_EXPERIENCE,
        size: 3,
    },
    GroupSpec {
        name: READABILITY,
        size: 8,
    },
    GroupSpec {
        name: FORMATTING,
        size: 4,
    },
];

/// A contiguous rubric slice graded in one reasoning-service call.
#[derive(Debug, Clone, Copy)]
pub struct RubricGroup<'a> {
    /// Position of the group in rubric order.
    pub index: usize,
    pub name: &'static str,
    /// Rubric index of `rules[0]`.
    pub offset: usize,
    pub rules: &'a [RuleDefinition],
}

impl RubricGroup<'_> {
    /// Finds the definition a verdict refers to. Matching ignores case and surrounding whitespace.
    pub fn position_of(&self, rule: &str) -> Option<usize> {
        let needle = rule.trim();
        self.rules
            .iter()
            .position(|def| def.rule.eq_ignore_ascii_case(needle))
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RubricError {
    #[error("rubric layout covers {layout_total} rules but the rubric has {rubric_len}")]
    LayoutMismatch {
        layout_total: usize,
        rubric_len: usize,
    },

    #[error("rule '{rule}' has category '{category}' but sits inside group '{group}'")]
    CategoryBoundary {
        group: &'static str,
        rule: &'static str,
        category: &'static str,
    },

    #[error("rubric maximum penalty is {actual}, expected {expected}")]
    MaxPenalty { expected: u32, actual: u32 },
}

/// Splits `rules` into contiguous groups following `layout`.
///
/// The concatenation of the returned slices is exactly `rules`.
pub fn partition<'a>(
    rules: &'a [RuleDefinition],
    layout: &[GroupSpec],
) -> Result<Vec<RubricGroup<'a>>, RubricError> {
    let layout_total: usize = layout.iter().map(|spec| spec.size).sum();
    if layout_total != rules.len() {
        return Err(RubricError::LayoutMismatch {
            layout_total,
            rubric_len: rules.len(),
        });
    }

    let mut groups = Vec::with_capacity(layout.len());
    let mut remaining = rules;
    let mut offset = 0;

    for (index, spec) in layout.iter().enumerate() {
        let (head, tail) = remaining.split_at(spec.size);
        if let Some(stray) = head.iter().find(|def| def.category != spec.name) {
            return Err(RubricError::CategoryBoundary {
                group: spec.name,
                rule: stray.rule,
                category: stray.category,
            });
        }
        groups.push(RubricGroup {
            index,
            name: spec.name,
            offset,
            rules: head,
        });
        offset += spec.size;
        remaining = tail;
    }

    Ok(groups)
}

/// The five canonical evaluation groups.
pub fn rubric_groups() -> Result<Vec<RubricGroup<'static>>, RubricError> {
    partition(&RUBRIC, &GROUP_LAYOUT)
}

/// Σ(weight × MAX_RULE_PENALTY) for a rule set.
pub fn max_penalty_of(rules: &[RuleDefinition]) -> u32 {
    rules.iter().map(|def| def.weight * MAX_RULE_PENALTY).sum()
}

/// Startup check: partition is consistent and the rubric honours the scoring constant.
pub fn validate_rubric() -> Result<(), RubricError> {
    rubric_groups()?;

    let actual = max_penalty_of(&RUBRIC);
    if actual != MAX_POSSIBLE_PENALTY {
        return Err(RubricError::MaxPenalty {
            expected: MAX_POSSIBLE_PENALTY,
            actual,
        });
    }

    Ok(())
}
