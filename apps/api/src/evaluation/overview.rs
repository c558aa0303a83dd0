//! Overview Synthesizer — one advisory call that summarizes the verdict set in a sentence.
//!
//! Never fails the evaluation: any error or unusable reply yields `OVERVIEW_FALLBACK`.

use std::time::Duration;

use tracing::warn;

use crate::evaluation::models::RuleVerdict;
use crate::evaluation::prompts::{
    OVERVIEW_FALLBACK, OVERVIEW_PROMPT_TEMPLATE, OVERVIEW_SYSTEM, OVERVIEW_TEMPERATURE,
};
use crate::llm_client::{strip_json_fences, CompletionRequest, ReasoningService, TokenUsage};

#[derive(Debug, Clone, PartialEq)]
pub struct Overview {
    pub sentence: String,
    /// Zero when the call never produced a response.
    pub usage: TokenUsage,
}

impl Overview {
    fn fallback(usage: TokenUsage) -> Self {
        Self {
            sentence: OVERVIEW_FALLBACK.to_string(),
            usage,
        }
    }
}

/// Single attempt, no retry.
pub async fn synthesize_overview(
    llm: &dyn ReasoningService,
    verdicts: &[RuleVerdict],
    timeout: Duration,
) -> Overview {
    let rules_json = match serde_json::to_string_pretty(verdicts) {
        Ok(json) => json,
        Err(e) => {
            warn!("Overview skipped, verdicts did not serialize: {e}");
            return Overview::fallback(TokenUsage::default());
        }
    };
    let prompt = OVERVIEW_PROMPT_TEMPLATE.replace("{rules_json}", &rules_json);

    let request = CompletionRequest {
        system: OVERVIEW_SYSTEM,
        prompt: &prompt,
        temperature: OVERVIEW_TEMPERATURE,
    };

    let completion = match tokio::time::timeout(timeout, llm.complete(request)).await {
        Ok(Ok(completion)) => completion,
        Ok(Err(e)) => {
            warn!("Overview call failed, using fallback: {e}");
            return Overview::fallback(TokenUsage::default());
        }
        Err(_) => {
            warn!("Overview call timed out after {timeout:?}, using fallback");
            return Overview::fallback(TokenUsage::default());
        }
    };

    match completion.content.as_deref().and_then(clean_sentence) {
        Some(sentence) => Overview {
            sentence,
            usage: completion.usage,
        },
        None => {
            warn!("Overview call returned no usable sentence, using fallback");
            Overview::fallback(completion.usage)
        }
    }
}

/// Normalizes the reply to one line of plain text: removes fences, decodes a JSON
/// string if the model sent one, trims wrapping quotes, keeps the first non-empty line.
fn clean_sentence(raw: &str) -> Option<String> {
    let text = strip_json_fences(raw);
    let decoded = serde_json::from_str::<String>(text).ok();
    let text = decoded.as_deref().unwrap_or(text);

    let line = text.lines().map(str::trim).find(|l| !l.is_empty())?;
    let line = line.trim_matches(|c| c == '"' || c == '\'').trim();

    (!line.is_empty()).then(|| line.to_string())
}
