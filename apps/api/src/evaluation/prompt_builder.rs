use crate::evaluation::prompts::{EVALUATION_INSTRUCTIONS, GROUP_PROMPT_TEMPLATE};
use crate::rubric::RubricGroup;

/// Renders one group's grading prompt: global instructions, the group's rules as JSON,
/// the output-schema contract, then the resume verbatim.
///
/// The resume is substituted last so text inside it that happens to look like a
/// placeholder is never expanded.
pub fn build_group_prompt(
    group: &RubricGroup<'_>,
    resume_text: &str,
) -> Result<String, serde_json::Error> {
    let rules_json = serde_json::to_string_pretty(group.rules)?;

    Ok(GROUP_PROMPT_TEMPLATE
        .replace("{instructions}", EVALUATION_INSTRUCTIONS)
        .replace("{rule_count}", &group.rules.len().to_string())
        .replace("{rules_json}", &rules_json)
        .replace("{resume_text}", resume_text))
}
