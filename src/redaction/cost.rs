//! Provider token cost tracking and estimation

use crate::adapters::provider::TokenUsage;
use crate::config::PricingConfig;
use serde::{Deserialize, Serialize};

/// Prompt tokens added to every chunk by the extraction instructions
pub const PROMPT_OVERHEAD_TOKENS: u64 = 500;

/// Rough bytes-per-token ratio for English text
const BYTES_PER_TOKEN: u64 = 4;

/// Token and cost accumulator for a single `redact` call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CostTracker {
    /// Prompt tokens consumed
    pub input_tokens: u64,
    /// Completion tokens consumed
    pub output_tokens: u64,
    /// Successful provider requests
    pub requests_made: u64,
    /// Accumulated cost in USD
    pub total_cost: f64,
}

impl CostTracker {
    /// Account for one or more provider calls
    pub fn record(&mut self, usage: TokenUsage, pricing: &PricingConfig) {
        self.input_tokens += usage.input_tokens;
        self.output_tokens += usage.output_tokens;
        self.requests_made += usage.requests;
        self.total_cost += token_cost(usage.input_tokens, usage.output_tokens, pricing);
    }

    /// Total tokens in both directions
    pub fn total_tokens(&self) -> u64 {
        self.input_tokens + self.output_tokens
    }
}

/// Up-front cost estimate for a text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostEstimate {
    /// Chunks the text will be split into
    pub chunks_required: usize,
    /// Provider requests the strategy would issue
    pub api_calls_needed: usize,
    /// Estimated prompt tokens
    pub estimated_input_tokens: u64,
    /// Estimated completion tokens
    pub estimated_output_tokens: u64,
    /// Sum of both
    pub estimated_total_tokens: u64,
    /// Estimated cost in USD
    pub estimated_cost_usd: f64,
}

impl CostEstimate {
    /// Estimate the provider cost of processing `text_len` bytes in `chunks`.
    ///
    /// Input is `text_len / 4` plus a fixed prompt overhead per chunk; output
    /// is a tenth of input. Strategies that never call a provider
    /// (`uses_provider == false`) estimate zero everywhere except chunk count.
    pub fn estimate(
        text_len: usize,
        chunks: usize,
        uses_provider: bool,
        pricing: &PricingConfig,
    ) -> Self {
        if !uses_provider || chunks == 0 {
            return Self {
                chunks_required: chunks,
                api_calls_needed: 0,
                estimated_input_tokens: 0,
                estimated_output_tokens: 0,
                estimated_total_tokens: 0,
                estimated_cost_usd: 0.0,
            };
        }

        let input = text_len as u64 / BYTES_PER_TOKEN + PROMPT_OVERHEAD_TOKENS * chunks as u64;
        let output = input / 10;

        Self {
            chunks_required: chunks,
            api_calls_needed: chunks,
            estimated_input_tokens: input,
            estimated_output_tokens: output,
            estimated_total_tokens: input + output,
            estimated_cost_usd: token_cost(input, output, pricing),
        }
    }
}

fn token_cost(input_tokens: u64, output_tokens: u64, pricing: &PricingConfig) -> f64 {
    (input_tokens as f64 / 1000.0) * pricing.input_cost_per_1k
        + (output_tokens as f64 / 1000.0) * pricing.output_cost_per_1k
}
