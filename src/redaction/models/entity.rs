//! PII entity data models

use serde::{Deserialize, Serialize};
use std::fmt;

/// PII category enumeration
///
/// The known categories form a closed set so every token table is exhaustive.
/// Anything a detector reports outside that set is kept as [`PiiCategory::Other`]
/// with a normalized upper-case label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PiiCategory {
    /// Person names ("John Smith", "Mary J. Watson")
    Name,
    /// A person name immediately followed by a parenthetical title
    NameWithTitle,
    /// Job titles and roles
    Title,
    /// Telephone numbers
    Phone,
    /// Email addresses
    Email,
    /// Street addresses
    Address,
    /// US Social Security Numbers
    Ssn,
    /// Payment card numbers
    CreditCard,
    /// Calendar dates
    Date,
    /// IPv4 addresses
    IpAddress,
    /// Web URLs
    Url,
    /// Passwords following a label
    Password,
    /// API keys following a label
    ApiKey,
    /// Bearer/auth tokens following a label
    AuthToken,
    /// Category reported by a detector that is not in the known set
    Other(String),
}

impl PiiCategory {
    /// All known (non-`Other`) categories
    pub const KNOWN: [PiiCategory; 14] = [
        Self::Name,
        Self::NameWithTitle,
        Self::Title,
        Self::Phone,
        Self::Email,
        Self::Address,
        Self::Ssn,
        Self::CreditCard,
        Self::Date,
        Self::IpAddress,
        Self::Url,
        Self::Password,
        Self::ApiKey,
        Self::AuthToken,
    ];

    /// Parse a category from configuration names, provider labels or canonical labels.
    ///
    /// Matching ignores case and separators, so `phone_numbers`, `PhoneNumber`
    /// and `PHONE` all resolve to [`PiiCategory::Phone`]. Unrecognized input
    /// becomes [`PiiCategory::Other`]. A leading `other:` skips the alias table
    /// and keeps the rest verbatim as the `Other` label.
    pub fn parse(raw: &str) -> Self {
        if let Some(label) = raw.strip_prefix(OTHER_PREFIX) {
            return Self::Other(label.to_string());
        }

        let key: String = raw
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();

        match key.as_str() {
            "name" | "names" | "person" | "persons" | "personname" | "fullname" => Self::Name,
            "namewithtitle" | "nameandtitle" | "namestitles" => Self::NameWithTitle,
            "title" | "titles" | "persontype" | "jobtitle" | "occupation" => Self::Title,
            "phone" | "phones" | "phonenumber" | "phonenumbers" | "telephone" => Self::Phone,
            "email" | "emails" | "emailaddress" | "emailaddresses" => Self::Email,
            "address" | "addresses" | "physicaladdress" | "streetaddress" => Self::Address,
            "ssn" | "socialsecuritynumber" | "ussocialsecuritynumber" => Self::Ssn,
            "creditcard" | "creditcards" | "creditcardnumber" | "creditcardnumbers" => {
                Self::CreditCard
            }
            "date" | "dates" | "datetime" | "dateofbirth" | "dob" => Self::Date,
            "ip" | "ipaddress" | "ipaddresses" => Self::IpAddress,
            "url" | "urls" | "webaddress" => Self::Url,
            "password" | "passwords" => Self::Password,
            "apikey" | "apikeys" => Self::ApiKey,
            "token" | "tokens" | "authtoken" | "authtokens" | "accesstoken" => Self::AuthToken,
            _ => Self::Other(normalize_label(raw)),
        }
    }

    /// Canonical upper-case label
    pub fn label(&self) -> &str {
        match self {
            Self::Name => "NAME",
            Self::NameWithTitle => "NAME_WITH_TITLE",
            Self::Title => "TITLE",
            Self::Phone => "PHONE",
            Self::Email => "EMAIL",
            Self::Address => "ADDRESS",
            Self::Ssn => "SSN",
            Self::CreditCard => "CREDIT_CARD",
            Self::Date => "DATE",
            Self::IpAddress => "IP_ADDRESS",
            Self::Url => "URL",
            Self::Password => "PASSWORD",
            Self::ApiKey => "API_KEY",
            Self::AuthToken => "AUTH_TOKEN",
            Self::Other(label) => label,
        }
    }

    /// Whether this category is enabled by an allow-list.
    ///
    /// An empty list enables everything. Enabling names also enables the
    /// name-with-title form.
    pub fn is_enabled_by(&self, allowed: &[PiiCategory]) -> bool {
        if allowed.is_empty() || allowed.contains(self) {
            return true;
        }
        matches!(self, Self::NameWithTitle) && allowed.contains(&Self::Name)
    }

    /// Check if this category identifies credentials rather than a person
    pub fn is_credential(&self) -> bool {
        matches!(self, Self::Password | Self::ApiKey | Self::AuthToken)
    }
}

/// Serialized prefix of an `Other` label that collides with a known alias
const OTHER_PREFIX: &str = "other:";

/// Upper-case a free-form category name into `WORD_WORD` form.
fn normalize_label(raw: &str) -> String {
    let mut label = String::with_capacity(raw.len());
    let mut pending_sep = false;
    for c in raw.trim().chars() {
        if c.is_alphanumeric() {
            if pending_sep && !label.is_empty() {
                label.push('_');
            }
            pending_sep = false;
            label.extend(c.to_uppercase());
        } else {
            pending_sep = true;
        }
    }
    if label.is_empty() {
        "UNKNOWN".to_string()
    } else {
        label
    }
}

impl fmt::Display for PiiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<String> for PiiCategory {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<&str> for PiiCategory {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

impl From<PiiCategory> for String {
    fn from(value: PiiCategory) -> Self {
        match value {
            // labels that would parse as something else keep a marker
            PiiCategory::Other(label) if PiiCategory::parse(&label).label() != label => {
                format!("{OTHER_PREFIX}{label}")
            }
            other => other.label().to_string(),
        }
    }
}

/// Detection method used to identify PII
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionMethod {
    /// Plain pattern: the whole match is the entity
    Pattern,
    /// Label-anchored pattern: only the captured value is the entity
    ContextualPattern,
    /// Remote entity recognition provider
    Provider,
}

/// Detected PII entity
///
/// Offsets are byte offsets on `char` boundaries, half-open (`start..end`).
/// They are chunk-relative while inside a detector and original-text relative
/// everywhere else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// The exact text covered by `start..end`
    pub text: String,
    /// Category of PII
    pub category: PiiCategory,
    /// Confidence score (0.0 - 1.0)
    pub confidence: f32,
    /// Start offset (inclusive)
    pub start: usize,
    /// End offset (exclusive)
    pub end: usize,
    /// Surrounding context reported by the detector
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    /// Detector's explanation for the match
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
    /// Detection method used
    pub detection_method: DetectionMethod,
}

impl Entity {
    /// Create a new entity with full confidence
    pub fn new(
        text: impl Into<String>,
        category: PiiCategory,
        start: usize,
        end: usize,
        detection_method: DetectionMethod,
    ) -> Self {
        Self {
            text: text.into(),
            category,
            confidence: 1.0,
            start,
            end,
            context: None,
            reasoning: None,
            detection_method,
        }
    }

    /// Set the confidence score, clamped to `0.0..=1.0` (NaN becomes 0)
    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = if confidence.is_nan() {
            0.0
        } else {
            confidence.clamp(0.0, 1.0)
        };
        self
    }

    /// Attach detector-reported context
    pub fn with_context(mut self, context: Option<String>) -> Self {
        self.context = context.filter(|c| !c.is_empty());
        self
    }

    /// Attach detector reasoning
    pub fn with_reasoning(mut self, reasoning: Option<String>) -> Self {
        self.reasoning = reasoning.filter(|r| !r.is_empty());
        self
    }

    /// Length of the span in bytes
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the span is empty
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Half-open interval intersection test
    pub fn overlaps(&self, other: &Entity) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Shift the span by a chunk's start offset
    pub fn offset_by(mut self, offset: usize) -> Self {
        self.start += offset;
        self.end += offset;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("names", PiiCategory::Name ; "config plural")]
    #[test_case("Person", PiiCategory::Name ; "provider label")]
    #[test_case("phone_numbers", PiiCategory::Phone ; "snake case plural")]
    #[test_case("PhoneNumber", PiiCategory::Phone ; "camel case")]
    #[test_case("USSocialSecurityNumber", PiiCategory::Ssn ; "azure ssn label")]
    #[test_case("credit_cards", PiiCategory::CreditCard ; "credit cards")]
    #[test_case("IP_ADDRESS", PiiCategory::IpAddress ; "canonical label")]
    #[test_case("NAME_WITH_TITLE", PiiCategory::NameWithTitle ; "name with title")]
    #[test_case("api-key", PiiCategory::ApiKey ; "dashed")]
    fn test_parse_known_categories(raw: &str, expected: PiiCategory) {
        assert_eq!(PiiCategory::parse(raw), expected);
    }

    #[test]
    fn test_parse_unknown_category() {
        let category = PiiCategory::parse("medical record number");
        assert_eq!(
            category,
            PiiCategory::Other("MEDICAL_RECORD_NUMBER".to_string())
        );
        assert_eq!(category.label(), "MEDICAL_RECORD_NUMBER");

        assert_eq!(PiiCategory::parse("  ***  ").label(), "UNKNOWN");
    }

    #[test]
    fn test_label_round_trips_through_parse() {
        for category in PiiCategory::KNOWN {
            assert_eq!(PiiCategory::parse(category.label()), category);
        }
    }

    #[test]
    fn test_category_serializes_as_label() {
        let json = serde_json::to_string(&PiiCategory::CreditCard).unwrap();
        assert_eq!(json, "\"CREDIT_CARD\"");

        let parsed: PiiCategory = serde_json::from_str("\"emails\"").unwrap();
        assert_eq!(parsed, PiiCategory::Email);
    }

    #[test]
    fn test_other_labels_survive_serde() {
        for category in [
            PiiCategory::Other("PERSON_TYPE".to_string()),
            PiiCategory::Other("ORGANIZATION".to_string()),
            PiiCategory::Other("lower case".to_string()),
        ] {
            let json = serde_json::to_string(&category).unwrap();
            let parsed: PiiCategory = serde_json::from_str(&json).unwrap();
            assert_eq!(parsed, category);
        }

        // labels that cannot be mistaken for an alias stay unmarked
        let json = serde_json::to_string(&PiiCategory::Other("ORGANIZATION".to_string())).unwrap();
        assert_eq!(json, "\"ORGANIZATION\"");
        let json = serde_json::to_string(&PiiCategory::Other("PERSON_TYPE".to_string())).unwrap();
        assert_eq!(json, "\"other:PERSON_TYPE\"");
    }

    #[test]
    fn test_is_enabled_by() {
        let allowed = vec![PiiCategory::Name, PiiCategory::Email];
        assert!(PiiCategory::Name.is_enabled_by(&allowed));
        assert!(PiiCategory::NameWithTitle.is_enabled_by(&allowed));
        assert!(!PiiCategory::Phone.is_enabled_by(&allowed));
        assert!(PiiCategory::Phone.is_enabled_by(&[]));
    }

    #[test]
    fn test_overlaps_is_half_open() {
        let a = Entity::new("abc", PiiCategory::Name, 0, 3, DetectionMethod::Pattern);
        let b = Entity::new("def", PiiCategory::Name, 3, 6, DetectionMethod::Pattern);
        let c = Entity::new("cd", PiiCategory::Name, 2, 4, DetectionMethod::Pattern);

        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&c));
        assert!(c.overlaps(&b));
    }

    #[test]
    fn test_confidence_is_clamped() {
        let entity = Entity::new("x", PiiCategory::Ssn, 0, 1, DetectionMethod::Provider);
        assert_eq!(entity.clone().with_confidence(1.7).confidence, 1.0);
        assert_eq!(entity.clone().with_confidence(-0.2).confidence, 0.0);
        assert_eq!(entity.with_confidence(f32::NAN).confidence, 0.0);
    }

    #[test]
    fn test_offset_by() {
        let entity = Entity::new("555", PiiCategory::Phone, 4, 7, DetectionMethod::Pattern)
            .offset_by(100);
        assert_eq!((entity.start, entity.end), (104, 107));
        assert_eq!(entity.len(), 3);
    }
}
