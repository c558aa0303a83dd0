//! Scoring Engine — pure reduction of merged verdicts into score, grade and fixes.
//!
//! Score = 100 − (Σ penalty × weight) / 820 × 100, one decimal.
//! The model's own arithmetic is never trusted.

use tracing::debug;

use crate::evaluation::models::{Grade, RuleVerdict};
use crate::rubric::MAX_POSSIBLE_PENALTY;

const TOP_FIX_COUNT: usize = 3;

/// Everything in the summary except the overview sentence.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreCard {
    pub total_weighted_penalty: u32,
    pub max_possible_penalty: u32,
    pub final_score: f64,
    pub grade: Grade,
    pub top_fixes: Vec<String>,
}

/// Overwrites every `weighted_penalty` with `penalty × weight`.
pub fn recompute_weighted_penalties(verdicts: &mut [RuleVerdict]) {
    for verdict in verdicts.iter_mut() {
        let local = verdict.penalty * verdict.weight;
        if verdict.weighted_penalty != local {
            debug!(
                "Correcting weighted_penalty for '{}': upstream={}, local={}",
                verdict.rule, verdict.weighted_penalty, local
            );
            verdict.weighted_penalty = local;
        }
    }
}

/// 100 − total/820 × 100, clamped to [0, 100] and rounded to one decimal.
pub fn compute_final_score(total_weighted_penalty: u32) -> f64 {
    let raw = 100.0 - (total_weighted_penalty as f64 / MAX_POSSIBLE_PENALTY as f64) * 100.0;
    (raw.clamp(0.0, 100.0) * 10.0).round() / 10.0
}

/// Suggestions of the highest weighted penalties. Ties keep rubric order.
pub fn top_fixes(verdicts: &[RuleVerdict], count: usize) -> Vec<String> {
    let mut ranked: Vec<&RuleVerdict> = verdicts.iter().collect();
    // stable: equal penalties stay in rubric order
    ranked.sort_by(|a, b| b.weighted_penalty.cmp(&a.weighted_penalty));
    ranked
        .into_iter()
        .take(count)
        .map(|v| v.suggestion.clone())
        .collect()
}

/// Recomputes weighted penalties in place and scores the result.
pub fn score_verdicts(verdicts: &mut [RuleVerdict]) -> ScoreCard {
    recompute_weighted_penalties(verdicts);

    let total_weighted_penalty: u32 = verdicts.iter().map(|v| v.weighted_penalty).sum();
    let final_score = compute_final_score(total_weighted_penalty);

    ScoreCard {
        total_weighted_penalty,
        max_possible_penalty: MAX_POSSIBLE_PENALTY,
        final_score,
        grade: Grade::from_score(final_score),
        top_fixes: top_fixes(verdicts, TOP_FIX_COUNT),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::models::Trigger;
    use crate::rubric::RUBRIC;

    fn verdicts_with(penalty: impl Fn(usize) -> u32) -> Vec<RuleVerdict> {
        RUBRIC
            .iter()
            .enumerate()
            .map(|(i, def)| RuleVerdict {
                rule: def.rule.to_string(),
                category: def.category.to_string(),
                weight: def.weight,
                penalty: penalty(i),
                weighted_penalty: 0,
                note: String::new(),
                suggestion: format!("fix #{i}"),
                trigger: Trigger::NotFound,
                keywords: None,
            })
            .collect()
    }

    #[test]
    fn test_zero_penalty_scores_perfect() {
        let mut verdicts = verdicts_with(|_| 0);
        let card = score_verdicts(&mut verdicts);
        assert_eq!(card.total_weighted_penalty, 0);
        assert_eq!(card.final_score, 100.0);
        assert_eq!(card.grade, Grade::Excellent);
        assert_eq!(card.max_possible_penalty, 820);
        // all tied → first three in rubric order
        assert_eq!(card.top_fixes, vec!["fix #0", "fix #1", "fix #2"]);
    }

    #[test]
    fn test_max_penalty_scores_zero() {
        let mut verdicts = verdicts_with(|_| 10);
        let card = score_verdicts(&mut verdicts);
        assert_eq!(card.total_weighted_penalty, 820);
        assert_eq!(card.final_score, 0.0);
        assert_eq!(card.grade, Grade::NeedsWork);
    }

    #[test]
    fn test_score_stays_within_bounds_for_every_total() {
        for total in 0..=MAX_POSSIBLE_PENALTY {
            let score = compute_final_score(total);
            assert!((0.0..=100.0).contains(&score), "total {total} → {score}");
        }
    }

    #[test]
    fn test_score_rounds_to_one_decimal() {
        // 100 − 1/820×100 = 99.878…
        assert_eq!(compute_final_score(1), 99.9);
        // 100 − 82/820×100 = 90.0
        assert_eq!(compute_final_score(82), 90.0);
        // 100 − 205/820×100 = 75.0
        assert_eq!(compute_final_score(205), 75.0);
    }

    #[test]
    fn test_upstream_weighted_penalty_is_overridden() {
        let mut verdicts = verdicts_with(|i| if i == 0 { 2 } else { 0 });
        verdicts[0].weighted_penalty = 999;
        verdicts[5].weighted_penalty = 40;

        let card = score_verdicts(&mut verdicts);

        assert_eq!(verdicts[0].weighted_penalty, 2 * RUBRIC[0].weight);
        assert_eq!(verdicts[5].weighted_penalty, 0);
        assert_eq!(card.total_weighted_penalty, 2 * RUBRIC[0].weight);
        for v in &verdicts {
            assert_eq!(v.weighted_penalty, v.penalty * v.weight);
        }
    }

    #[test]
    fn test_top_fixes_follow_weighted_penalty_descending() {
        // distinct penalties on three rules with different weights
        let mut verdicts = verdicts_with(|i| match i {
            13 => 6, // Quantified Achievements, weight 5 → 30
            20 => 5, // Spelling and Grammar, weight 4 → 20
            3 => 9,  // Keywords in Experience Context, weight 3 → 27
            _ => 1,
        });
        let card = score_verdicts(&mut verdicts);
        assert_eq!(card.top_fixes, vec!["fix #13", "fix #3", "fix #20"]);
    }

    #[test]
    fn test_top_fix_ties_break_by_rubric_order() {
        // weight 5 rules: index 13 and 24; both penalty 2 → 10 each
        let mut verdicts = verdicts_with(|i| if i == 13 || i == 24 { 2 } else { 0 });
        let card = score_verdicts(&mut verdicts);
        assert_eq!(card.top_fixes, vec!["fix #13", "fix #24", "fix #0"]);
    }

    #[test]
    fn test_top_fixes_with_fewer_than_three_entries() {
        let verdicts = verdicts_with(|_| 0);
        assert_eq!(top_fixes(&verdicts[..2], 3), vec!["fix #0", "fix #1"]);
    }
}
