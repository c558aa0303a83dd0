use crate::config::Config;
use crate::llm_client::TokenUsage;

/// USD per million tokens, split by direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pricing {
    pub prompt_usd_per_mtok: f64,
    pub completion_usd_per_mtok: f64,
}

impl Pricing {
    pub fn from_config(config: &Config) -> Self {
        Self {
            prompt_usd_per_mtok: config.prompt_price_per_mtok,
            completion_usd_per_mtok: config.completion_price_per_mtok,
        }
    }

    /// Estimated spend for `usage`, rounded to 6 decimals.
    pub fn cost_usd(&self, usage: &TokenUsage) -> f64 {
        let raw = usage.prompt_tokens as f64 * self.prompt_usd_per_mtok / 1_000_000.0
            + usage.completion_tokens as f64 * self.completion_usd_per_mtok / 1_000_000.0;
        (raw * 1_000_000.0).round() / 1_000_000.0
    }
}
