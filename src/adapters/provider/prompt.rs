//! Extraction prompt for chat-model providers

use crate::redaction::models::PiiCategory;
use std::fmt::Write;

fn describe(category: &PiiCategory) -> String {
    match category {
        PiiCategory::Name => "Full names of people (first name + last name)".to_string(),
        PiiCategory::NameWithTitle => {
            "A person's name followed by a parenthetical job title or organisation".to_string()
        }
        PiiCategory::Title => "Job titles that identify a specific person".to_string(),
        PiiCategory::Phone => {
            "Phone numbers in any format (xxx-xxx-xxxx, (xxx) xxx-xxxx, etc.)".to_string()
        }
        PiiCategory::Email => "Email addresses".to_string(),
        PiiCategory::Address => {
            "Physical addresses (street addresses, not just city/state)".to_string()
        }
        PiiCategory::Ssn => "Social Security Numbers (xxx-xx-xxxx format)".to_string(),
        PiiCategory::CreditCard => "Credit card numbers (any format)".to_string(),
        PiiCategory::Date => "Specific dates that could identify individuals".to_string(),
        PiiCategory::IpAddress => "IP addresses".to_string(),
        PiiCategory::Url => "URLs that point to personal resources".to_string(),
        PiiCategory::Password => "Passwords".to_string(),
        PiiCategory::ApiKey => "API keys".to_string(),
        PiiCategory::AuthToken => "Authentication or access tokens".to_string(),
        PiiCategory::Other(label) => format!("Any {}", label.to_lowercase().replace('_', " ")),
    }
}

/// Build the extraction prompt for one chunk.
///
/// An empty category list asks for every known category.
pub fn build_prompt(text: &str, categories: &[PiiCategory], confidence_threshold: f32) -> String {
    let all;
    let categories = if categories.is_empty() {
        all = PiiCategory::KNOWN.to_vec();
        &all[..]
    } else {
        categories
    };

    let mut category_list = String::new();
    for category in categories {
        let _ = writeln!(category_list, "- {}: {}", category.label(), describe(category));
    }

    format!(
        r#"You are an expert PII detection system. Analyze the following text and identify ALL personally identifiable information.

CATEGORIES TO DETECT:
{category_list}
INSTRUCTIONS:
1. Find every instance of PII in the text
2. For each PII found, provide: exact text, category, confidence (0-1), start position, end position, and brief reasoning
3. Positions are zero-based offsets into the text below; end is exclusive
4. Pay special attention to contextual clues (e.g., "Phone:", "SSN:", "Email:")
5. Only report items with confidence of at least {confidence_threshold:.2}
6. Include 2-3 words of context around each PII item

RESPONSE FORMAT (JSON):
{{
  "entities": [
    {{
      "text": "exact PII text found",
      "category": "one of the categories above",
      "confidence": 0.95,
      "start_pos": 123,
      "end_pos": 135,
      "context": "surrounding text context",
      "reasoning": "why this is PII"
    }}
  ]
}}

TEXT TO ANALYZE:
{text}

RESPONSE (JSON only):"#
    )
}
