//! Estimate command implementation
//!
//! Prints the provider cost estimate for a text file. No provider calls are
//! made.

use super::{prepare, DetectionArgs, Prepared};
use crate::redaction::TextSource;
use clap::Args;

/// Arguments for the estimate command
#[derive(Args, Debug)]
pub struct EstimateArgs {
    /// Input text file
    pub input: String,

    #[command(flatten)]
    pub detection: DetectionArgs,

    /// Print the estimate as JSON
    #[arg(long)]
    pub json: bool,
}

impl EstimateArgs {
    /// Execute the estimate command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(input = %self.input, "Starting estimate command");

        let Prepared { engine, document } =
            match prepare(config_path, &self.input, |config| self.detection.apply(config)) {
                Ok(prepared) => prepared,
                Err(code) => return Ok(code),
            };

        let text = document.full_text();
        let estimate = engine.estimate(&text);

        if self.json {
            println!("{}", serde_json::to_string_pretty(&estimate)?);
            return Ok(0);
        }

        println!("💰 Cost estimate: {}", self.input);
        println!();
        println!("  Strategy:            {}", engine.config().detection.strategy);
        println!("  Text Length:         {} bytes", text.len());
        println!("  Chunks Required:     {}", estimate.chunks_required);
        println!("  API Calls Needed:    {}", estimate.api_calls_needed);
        println!("  Input Tokens:        ~{}", estimate.estimated_input_tokens);
        println!("  Output Tokens:       ~{}", estimate.estimated_output_tokens);
        println!("  Total Tokens:        ~{}", estimate.estimated_total_tokens);
        println!("  Estimated Cost:      ${:.6}", estimate.estimated_cost_usd);
        println!();

        Ok(0)
    }
}
