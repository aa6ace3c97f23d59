//! Redaction token presets

use crate::redaction::config::TokenConfig;
use crate::redaction::models::PiiCategory;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Named token preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RedactionStyle {
    /// `[NAME_REDACTED]`, `[PHONE_REDACTED]`, ...
    #[default]
    Standard,
    /// `[REDACTED]` for everything
    Minimal,
    /// `[PERSON_NAME_REDACTED]`, `[PHONE_NUMBER_REDACTED]`, ...
    Detailed,
}

impl fmt::Display for RedactionStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Standard => write!(f, "standard"),
            Self::Minimal => write!(f, "minimal"),
            Self::Detailed => write!(f, "detailed"),
        }
    }
}

impl FromStr for RedactionStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "standard" => Ok(Self::Standard),
            "minimal" => Ok(Self::Minimal),
            "detailed" => Ok(Self::Detailed),
            _ => Err(format!(
                "Invalid redaction style '{s}'. Must be one of: standard, minimal, detailed"
            )),
        }
    }
}

fn standard_token(category: &PiiCategory) -> Option<&'static str> {
    Some(match category {
        PiiCategory::Name => "[NAME_REDACTED]",
        PiiCategory::NameWithTitle => "[NAME_REDACTED] (TITLE_REDACTED)",
        PiiCategory::Title => "[TITLE_REDACTED]",
        PiiCategory::Phone => "[PHONE_REDACTED]",
        PiiCategory::Email => "[EMAIL_REDACTED]",
        PiiCategory::Address => "[ADDRESS_REDACTED]",
        PiiCategory::Ssn => "[SSN_REDACTED]",
        PiiCategory::CreditCard => "[CREDIT_CARD_REDACTED]",
        PiiCategory::Date => "[DATE_REDACTED]",
        PiiCategory::IpAddress => "[IP_REDACTED]",
        PiiCategory::Url => "[URL_REDACTED]",
        PiiCategory::Password => "[PASSWORD_REDACTED]",
        PiiCategory::ApiKey => "[API_KEY_REDACTED]",
        PiiCategory::AuthToken => "[TOKEN_REDACTED]",
        PiiCategory::Other(_) => return None,
    })
}

fn detailed_token(category: &PiiCategory) -> Option<&'static str> {
    Some(match category {
        PiiCategory::Name => "[PERSON_NAME_REDACTED]",
        PiiCategory::NameWithTitle => "[PERSON_NAME_REDACTED] (JOB_TITLE_REDACTED)",
        PiiCategory::Title => "[JOB_TITLE_REDACTED]",
        PiiCategory::Phone => "[PHONE_NUMBER_REDACTED]",
        PiiCategory::Email => "[EMAIL_ADDRESS_REDACTED]",
        PiiCategory::Address => "[PHYSICAL_ADDRESS_REDACTED]",
        PiiCategory::Ssn => "[SSN_REDACTED]",
        PiiCategory::CreditCard => "[CREDIT_CARD_NUMBER_REDACTED]",
        PiiCategory::Date => "[DATE_REDACTED]",
        PiiCategory::IpAddress => "[IP_ADDRESS_REDACTED]",
        PiiCategory::Url => "[WEB_ADDRESS_REDACTED]",
        PiiCategory::Password => "[PASSWORD_REDACTED]",
        PiiCategory::ApiKey => "[API_KEY_REDACTED]",
        PiiCategory::AuthToken => "[AUTH_TOKEN_REDACTED]",
        PiiCategory::Other(_) => return None,
    })
}

/// Category to token lookup for one style plus overrides
#[derive(Debug, Clone, Default)]
pub struct TokenTable {
    style: RedactionStyle,
    overrides: HashMap<PiiCategory, String>,
}

impl TokenTable {
    /// Create a table for a preset
    pub fn new(style: RedactionStyle) -> Self {
        Self {
            style,
            overrides: HashMap::new(),
        }
    }

    /// Build a table from `[redaction]` configuration
    pub fn from_config(config: &TokenConfig) -> Self {
        config
            .overrides
            .iter()
            .fold(Self::new(config.style), |table, (category, token)| {
                table.with_override(PiiCategory::parse(category), token.clone())
            })
    }

    /// Override the token for one category
    #[must_use]
    pub fn with_override(mut self, category: PiiCategory, token: impl Into<String>) -> Self {
        self.overrides.insert(category, token.into());
        self
    }

    /// Active preset
    pub fn style(&self) -> RedactionStyle {
        self.style
    }

    /// Token for a category.
    ///
    /// Overrides win over the preset. Categories outside the known set get
    /// `[{LABEL}_REDACTED]` in every style.
    pub fn token_for(&self, category: &PiiCategory) -> Cow<'_, str> {
        if let Some(token) = self.overrides.get(category) {
            return Cow::Borrowed(token.as_str());
        }

        let preset = match self.style {
            RedactionStyle::Standard => standard_token(category),
            RedactionStyle::Detailed => detailed_token(category),
            RedactionStyle::Minimal => match category {
                PiiCategory::Other(_) => None,
                _ => Some("[REDACTED]"),
            },
        };

        match preset {
            Some(token) => Cow::Borrowed(token),
            None => Cow::Owned(format!("[{}_REDACTED]", category.label())),
        }
    }
}
