// All LLM prompt constants for the evaluation module.

/// System prompt for rule-group grading — enforces JSON-only output.
pub const GROUP_EVALUATION_SYSTEM: &str =
    "You are a strict resume evaluator trained in ATS-based rules. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON array. \
    Do NOT use markdown code fences.";

/// Temperature for rule-group grading. Deterministic-leaning.
pub const GROUP_EVALUATION_TEMPERATURE: f32 = 0.0;

/// Global grading instructions shared by every group prompt.
pub const EVALUATION_INSTRUCTIONS: &str = r#"Your task is to evaluate the resume below against a strict, weighted rubric.

Evaluation Instructions:
- Review the resume against each rule provided.
- For each rule, assign a penalty (0-10) based on its `evaluation_guideline`.
- Fill in: `penalty`, `note`, `suggestion`, `trigger` (the phrase found, or "Section not found"), and `keywords` (if relevant).
- Compute `weighted_penalty = penalty x weight`.
- Do not leave any rule empty, even if the content is missing.
- Copy each `rule` name exactly as given.

Penalty Scale:
0 = Fully meets the rule
1-2 = Minor issue
3-4 = Somewhat lacking
5-6 = Noticeably flawed
7-8 = Major issue
9-10 = Critical or completely missing"#;

/// Per-group prompt template.
/// Replace: {instructions}, {rule_count}, {rules_json}, {resume_text}
pub const GROUP_PROMPT_TEMPLATE: &str = r#"{instructions}

Analyze ONLY the following {rule_count} rules:
{rules_json}

- Do not include a summary.
- Do not return any extra text, commentary, or markdown.
- Respond ONLY with a JSON array containing exactly one object per rule above, in this format:
[
  {
    "rule": "string",
    "category": "string",
    "weight": integer,
    "penalty": integer,
    "weighted_penalty": integer,
    "note": "string",
    "suggestion": "string",
    "trigger": "string|null",
    "keywords": "string|null"
  }
]

Resume:
{resume_text}"#;

/// System prompt for the overview sentence.
pub const OVERVIEW_SYSTEM: &str = "You are a strict resume evaluator. \
    Given rule objects with penalties and notes, generate a 1-sentence summary of resume quality. \
    Be objective, specific, and use professional tone.";

/// Slightly warmer than grading; the sentence is advisory.
pub const OVERVIEW_TEMPERATURE: f32 = 0.3;

/// Overview prompt template. Replace: {rules_json}
pub const OVERVIEW_PROMPT_TEMPLATE: &str = r#"Here are the rule evaluations:
{rules_json}

Return only the 1-sentence summary. No formatting."#;

/// Used whenever the overview call fails or returns nothing usable.
pub const OVERVIEW_FALLBACK: &str = "Evaluation complete based on 28-point rubric.";
