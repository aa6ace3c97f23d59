//! Configuration loading, substitution and override tests

use radact::config::load_config;
use radact::domain::RadactError;
use radact::redaction::{DetectionStrategy, PiiCategory, RedactionEngine, RedactionStyle};
use secrecy::ExposeSecret;
use std::io::Write;
use std::sync::Mutex;
use tempfile::NamedTempFile;

// Environment variables are process-wide; serialize every test that loads config
static ENV_MUTEX: Mutex<()> = Mutex::new(());

fn lock_env() -> std::sync::MutexGuard<'static, ()> {
    ENV_MUTEX.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

fn clear_overrides() {
    for key in [
        "RADACT_APPLICATION_LOG_LEVEL",
        "RADACT_DETECTION_STRATEGY",
        "RADACT_DETECTION_CONFIDENCE_THRESHOLD",
        "RADACT_DETECTION_CHUNK_SIZE",
        "RADACT_DETECTION_OVERLAP_SIZE",
        "RADACT_DETECTION_MAX_CONCURRENCY",
        "RADACT_REDACTION_STYLE",
        "RADACT_PROVIDER_ENDPOINT",
        "RADACT_PROVIDER_API_KEY",
        "RADACT_PROVIDER_DEPLOYMENT",
    ] {
        std::env::remove_var(key);
    }
}

const FULL_CONFIG: &str = r#"
[application]
name = "radact-test"
log_level = "debug"

[detection]
strategy = "hybrid"
confidence_threshold = 0.85
chunk_size = 2000
overlap_size = 100
max_concurrency = 8
categories = ["names", "phone_numbers", "emails", "ssn"]

[redaction]
style = "detailed"

[redaction.overrides]
ssn = "[GOV_ID]"

[provider]
endpoint = "https://my-resource.openai.azure.com"
api_key = "${RADACT_IT_API_KEY}"
deployment = "gpt-4o"
timeout_seconds = 30

[provider.retry]
max_retries = 5
initial_delay_ms = 250

[provider.pricing]
input_cost_per_1k = 0.0025
output_cost_per_1k = 0.01
cost_alert_threshold = 2.5

[audit]
enabled = false
"#;

#[test]
fn test_load_full_config_with_substitution() {
    let _guard = lock_env();
    clear_overrides();
    std::env::set_var("RADACT_IT_API_KEY", "secret-from-env");

    let file = write_config(FULL_CONFIG);
    let config = load_config(file.path()).unwrap();
    std::env::remove_var("RADACT_IT_API_KEY");

    assert_eq!(config.application.name, "radact-test");
    assert_eq!(config.detection.strategy, DetectionStrategy::Hybrid);
    assert!((config.detection.confidence_threshold - 0.85).abs() < 1e-6);
    assert_eq!(config.detection.chunk_size, 2000);
    assert_eq!(config.detection.max_concurrency, 8);
    assert_eq!(
        config.detection.categories,
        vec![
            PiiCategory::Name,
            PiiCategory::Phone,
            PiiCategory::Email,
            PiiCategory::Ssn
        ]
    );
    assert_eq!(config.redaction.style, RedactionStyle::Detailed);
    assert_eq!(config.redaction.overrides["ssn"], "[GOV_ID]");

    let provider = config.provider.as_ref().unwrap();
    assert_eq!(provider.api_key.expose_secret().as_str(), "secret-from-env");
    assert_eq!(provider.deployment, "gpt-4o");
    assert_eq!(provider.retry.max_retries, 5);
    assert_eq!(provider.retry.initial_delay_ms, 250);
    // unspecified retry fields keep their defaults
    assert_eq!(provider.retry.max_delay_ms, 30000);
    assert!((provider.pricing.cost_alert_threshold - 2.5).abs() < 1e-9);
}

#[test]
fn test_missing_substitution_variable() {
    let _guard = lock_env();
    clear_overrides();
    std::env::remove_var("RADACT_IT_API_KEY");

    let file = write_config(FULL_CONFIG);
    let err = load_config(file.path()).unwrap_err();

    assert!(matches!(err, RadactError::Configuration(_)));
    assert!(err.to_string().contains("RADACT_IT_API_KEY"));
}

#[test]
fn test_env_overrides_win_over_file() {
    let _guard = lock_env();
    clear_overrides();
    std::env::set_var("RADACT_DETECTION_CHUNK_SIZE", "500");
    std::env::set_var("RADACT_REDACTION_STYLE", "minimal");

    let file = write_config("[detection]\nchunk_size = 4000\noverlap_size = 100\n");
    let result = load_config(file.path());
    clear_overrides();

    let config = result.unwrap();
    assert_eq!(config.detection.chunk_size, 500);
    assert_eq!(config.redaction.style, RedactionStyle::Minimal);
}

#[test]
fn test_invalid_override_value() {
    let _guard = lock_env();
    clear_overrides();
    std::env::set_var("RADACT_DETECTION_STRATEGY", "telepathy");

    let file = write_config("");
    let result = load_config(file.path());
    clear_overrides();

    let err = result.unwrap_err();
    assert!(err.to_string().contains("RADACT_DETECTION_STRATEGY"));
}

#[test]
fn test_provider_section_created_from_env() {
    let _guard = lock_env();
    clear_overrides();
    std::env::set_var("RADACT_PROVIDER_ENDPOINT", "https://env.openai.azure.com");
    std::env::set_var("RADACT_PROVIDER_API_KEY", "env-key");

    let file = write_config("[detection]\nstrategy = \"provider\"\n");
    let result = load_config(file.path());
    clear_overrides();

    let config = result.unwrap();
    let provider = config.provider.as_ref().unwrap();
    assert_eq!(provider.endpoint, "https://env.openai.azure.com");
    assert_eq!(provider.deployment, "gpt-4o-mini");
    assert!(RedactionEngine::new(config).is_ok());
}

#[test]
fn test_strategy_requiring_provider_without_one() {
    let _guard = lock_env();
    clear_overrides();

    let file = write_config("[detection]\nstrategy = \"hybrid\"\n");
    let err = load_config(file.path()).unwrap_err();

    assert!(matches!(err, RadactError::Configuration(_)));
    assert!(err.to_string().contains("provider"));
}

#[test]
fn test_invalid_threshold_rejected() {
    let _guard = lock_env();
    clear_overrides();

    let file = write_config("[detection]\nconfidence_threshold = 1.5\n");
    let err = load_config(file.path()).unwrap_err();

    assert!(err.to_string().contains("confidence_threshold"));
}

#[test]
fn test_overlap_must_be_smaller_than_chunk() {
    let _guard = lock_env();
    clear_overrides();

    let file = write_config("[detection]\nchunk_size = 100\noverlap_size = 100\n");
    assert!(load_config(file.path()).is_err());
}

#[test]
fn test_plain_http_endpoint_rejected() {
    let _guard = lock_env();
    clear_overrides();

    let file = write_config(
        "[detection]\nstrategy = \"provider\"\n\n[provider]\nendpoint = \"http://insecure.example.com\"\napi_key = \"k\"\n",
    );
    let err = load_config(file.path()).unwrap_err();

    assert!(err.to_string().contains("https"));
}

#[test]
fn test_unknown_style_rejected() {
    let _guard = lock_env();
    clear_overrides();

    let file = write_config("[redaction]\nstyle = \"fancy\"\n");
    assert!(matches!(
        load_config(file.path()),
        Err(RadactError::Configuration(_))
    ));
}

#[test]
fn test_custom_pattern_library() {
    let _guard = lock_env();
    clear_overrides();

    let dir = tempfile::tempdir().unwrap();
    let library = dir.path().join("custom.toml");
    std::fs::write(
        &library,
        "[[patterns]]\nname = \"employee_id\"\ncategory = \"EMPLOYEE_ID\"\npatterns = ['\\bEMP-\\d{6}\\b']\n",
    )
    .unwrap();

    let file = write_config(&format!(
        "[detection]\ncategories = []\npattern_library = \"{}\"\n",
        library.display()
    ));
    let config = load_config(file.path()).unwrap();

    let engine = RedactionEngine::new(config).unwrap();
    let rt = tokio::runtime::Runtime::new().unwrap();
    let result = rt
        .block_on(engine.redact("Badge EMP-004211 issued"))
        .unwrap();
    assert_eq!(result.redacted_text, "Badge [EMPLOYEE_ID_REDACTED] issued");
}
