//! The canonical 28-rule resume rubric. Order here IS rubric order.

use super::{RuleDefinition, RUBRIC_SIZE};

pub const KEYWORD_RELEVANCE: &str = "Keyword Relevance";
pub const RESUME_STRUCTURE: &str = "Resume Structure";
pub const WORK_EXPERIENCE: &str = "Work Experience";
pub const READABILITY: &str = "Readability";
pub const FORMATTING: &str = "Formatting";

const fn rule(
    rule: &'static str,
    category: &'static str,
    weight: u32,
    evaluation_guideline: &'static str,
) -> RuleDefinition {
    RuleDefinition {
        rule,
        category,
        weight,
        evaluation_guideline,
    }
}

pub static RUBRIC: [RuleDefinition; RUBRIC_SIZE] = [
    // Keyword Relevance
    rule(
        "Job-Relevant Hard Skills",
        KEYWORD_RELEVANCE,
        4,
        "Penalize when concrete, role-relevant technical or domain skills are missing or buried. 0 if core skills are explicit and prominent.",
    ),
    rule(
        "Industry Keyword Coverage",
        KEYWORD_RELEVANCE,
        4,
        "Check for standard industry terminology an ATS would search for. Penalize generic wording where accepted terms exist.",
    ),
    rule(
        "Tools and Technologies Named",
        KEYWORD_RELEVANCE,
        3,
        "Tools, platforms, languages and frameworks should be named explicitly rather than implied ('cloud experience' vs 'AWS Lambda').",
    ),
    rule(
        "Keywords in Experience Context",
        KEYWORD_RELEVANCE,
        3,
        "Keywords should appear inside experience bullets, not only in a skills list. Penalize skills that are never demonstrated.",
    ),
    rule(
        "Role Title Alignment",
        KEYWORD_RELEVANCE,
        3,
        "Job titles and the headline should use recognizable, searchable titles. Penalize vague or internal-only titles.",
    ),
    rule(
        "Certifications and Credentials",
        KEYWORD_RELEVANCE,
        2,
        "Relevant certifications, licenses or credentials should be listed with issuer. Minor penalty if absent where customary.",
    ),
    rule(
        "No Keyword Stuffing",
        KEYWORD_RELEVANCE,
        2,
        "Penalize repeated or unnatural keyword lists, hidden text, or terms with no supporting evidence.",
    ),
    // Resume Structure
    rule(
        "Complete Contact Information",
        RESUME_STRUCTURE,
        3,
        "Name, email, phone and location (city/region) should be present at the top. Professional profile links are a plus.",
    ),
    rule(
        "Professional Summary Present",
        RESUME_STRUCTURE,
        3,
        "A short summary or headline should state role, seniority and core strengths. Penalize missing or generic objectives.",
    ),
    rule(
        "Standard Section Headings",
        RESUME_STRUCTURE,
        3,
        "Use conventional headings (Experience, Education, Skills). Penalize creative headings an ATS may not map.",
    ),
    rule(
        "Logical Section Order",
        RESUME_STRUCTURE,
        2,
        "Sections should be ordered by relevance to the candidate's level, typically Summary, Experience, Skills, Education.",
    ),
    rule(
        "Education Section Complete",
        RESUME_STRUCTURE,
        2,
        "Degree, institution and graduation year (or expected date) should be present. Penalize missing institution or degree.",
    ),
    rule(
        "Dedicated Skills Section",
        RESUME_STRUCTURE,
        3,
        "A clearly labelled skills section should group skills by type. Penalize when skills are only scattered through prose.",
    ),
    // Work Experience
    rule(
        "Quantified Achievements",
        WORK_EXPERIENCE,
        5,
        "Bullets should carry measurable results (numbers, percentages, scale, money, time). Penalize in proportion to unquantified bullets.",
    ),
    rule(
        "Reverse Chronological Order with Dates",
        WORK_EXPERIENCE,
        3,
        "Roles should be listed most recent first with start and end dates for each position.",
    ),
    rule(
        "Employment Gaps Addressed",
        WORK_EXPERIENCE,
        2,
        "Gaps longer than six months should be explained or covered by other activity. 0 when no gaps exist.",
    ),
    // Readability
    rule(
        "Strong Action Verbs",
        READABILITY,
        3,
        "Bullets should open with specific action verbs. Penalize 'responsible for', 'worked on', 'helped with'.",
    ),
    rule(
        "Concise Bullet Points",
        READABILITY,
        3,
        "Bullets should be one to two lines. Penalize dense paragraphs and bullets over roughly 30 words.",
    ),
    rule(
        "No First-Person Pronouns",
        READABILITY,
        2,
        "Resume voice omits 'I', 'me', 'my', 'we'. Penalize each recurring use.",
    ),
    rule(
        "Consistent Verb Tense",
        READABILITY,
        2,
        "Current role in present tense, past roles in past tense. Penalize mixing within a role.",
    ),
    rule(
        "Spelling and Grammar",
        READABILITY,
        4,
        "Penalize typos, grammatical errors and inconsistent capitalization. Any error in a heading or title is major.",
    ),
    rule(
        "No Buzzwords or Cliches",
        READABILITY,
        2,
        "Penalize empty phrases such as 'team player', 'hard-working', 'synergy', 'go-getter' without evidence.",
    ),
    rule(
        "Achievements over Duties",
        READABILITY,
        3,
        "Bullets should describe outcomes and impact rather than restate job duties.",
    ),
    rule(
        "Appropriate Length",
        READABILITY,
        2,
        "One page for under ten years of experience, at most two pages otherwise. Penalize padding and excessive length.",
    ),
    // Formatting
    rule(
        "ATS-Parseable Layout",
        FORMATTING,
        5,
        "Single-column, linear text flow. Penalize multi-column layouts, text boxes, headers/footers holding key data.",
    ),
    rule(
        "Consistent Date and Style Formatting",
        FORMATTING,
        3,
        "Dates, bullet symbols and heading styles should follow one consistent pattern throughout.",
    ),
    rule(
        "No Images, Tables or Graphics",
        FORMATTING,
        3,
        "Penalize photos, icons, skill bars, charts and tables that an ATS cannot read.",
    ),
    rule(
        "Readable Fonts and Spacing",
        FORMATTING,
        3,
        "Standard fonts, consistent sizes, adequate whitespace between sections. Penalize cramped or decorative text.",
    ),
];
