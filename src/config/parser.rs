use std::path::Path;
use crate::errors::QrTraceError;
use super::credentials::resolve_credential;
use super::schema::CONFIG_SCHEMA;
use super::types::AppConfig;
use tracing::warn;

pub async fn parse_config(path: &Path) -> Result<AppConfig, QrTraceError> {
    if !path.exists() {
        return Err(QrTraceError::Config(format!("Config file not found: {}", path.display())));
    }

    let metadata = tokio::fs::metadata(path).await?;
    if metadata.len() > 1_048_576 {
        return Err(QrTraceError::Config("Config file exceeds 1MB limit".into()));
    }

    let content = tokio::fs::read_to_string(path).await?;
    let yaml: serde_yaml::Value = serde_yaml::from_str(&content)?;

    // JSON Schema validation (advisory)
    validate_schema(&yaml)?;

    let mut config: AppConfig = serde_yaml::from_value(yaml)?;

    resolve_credentials(&mut config);
    validate_semantics(&config)?;

    Ok(config)
}

/// Validate config against the JSON schema for structural correctness.
fn validate_schema(yaml: &serde_yaml::Value) -> Result<(), QrTraceError> {
    // Convert YAML value to JSON for schema validation
    let json_str = serde_json::to_string(yaml)
        .map_err(|e| QrTraceError::Config(format!("Config conversion error: {}", e)))?;
    let json_value: serde_json::Value = serde_json::from_str(&json_str)
        .map_err(|e| QrTraceError::Config(format!("Config conversion error: {}", e)))?;

    let compiled = jsonschema::JSONSchema::compile(&CONFIG_SCHEMA)
        .map_err(|e| QrTraceError::Config(format!("Schema compilation error: {}", e)))?;

    let result = compiled.validate(&json_value);
    if let Err(errors) = result {
        for e in errors {
            warn!(validation_error = %format!("{} at {}", e, e.instance_path), "Config schema warning");
        }
    }

    Ok(())
}

/// Resolve `$ENV_VAR` references in credential fields.
fn resolve_credentials(config: &mut AppConfig) {
    if let Some(key) = &config.classifier.api_key {
        config.classifier.api_key = Some(resolve_credential(key));
    }
    if let Some(sid) = &config.gateway.account_sid {
        config.gateway.account_sid = Some(resolve_credential(sid));
    }
    if let Some(token) = &config.gateway.auth_token {
        config.gateway.auth_token = Some(resolve_credential(token));
    }
    if let Some(number) = &config.gateway.from_number {
        config.gateway.from_number = Some(resolve_credential(number));
    }
}

/// Reject values the typed config cannot express as invalid.
fn validate_semantics(config: &AppConfig) -> Result<(), QrTraceError> {
    let threshold = config.classifier.confidence_threshold;
    if !(0.0..=1.0).contains(&threshold) {
        return Err(QrTraceError::Config(format!(
            "classifier.confidence_threshold must be within [0, 1], got {}",
            threshold
        )));
    }

    if config.browser.timeout_secs == 0 {
        return Err(QrTraceError::Config("browser.timeout_secs must be at least 1".into()));
    }

    if config.gateway.debug_trigger.trim().is_empty() {
        return Err(QrTraceError::Config("gateway.debug_trigger must not be empty".into()));
    }

    if !config.gateway.is_configured() {
        warn!("SMS gateway credentials not configured; replies will be logged only");
    }
    if !config.classifier.is_enabled() {
        warn!("Classifier API key not configured; submissions will be stored unclassified");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    #[test]
    fn test_validate_semantics_bad_threshold() {
        let mut config = AppConfig::default();
        config.classifier.confidence_threshold = 1.5;
        assert!(validate_semantics(&config).is_err());
    }

    #[test]
    fn test_validate_semantics_zero_timeout() {
        let mut config = AppConfig::default();
        config.browser.timeout_secs = 0;
        assert!(validate_semantics(&config).is_err());
    }

    #[test]
    fn test_validate_semantics_empty_trigger() {
        let mut config = AppConfig::default();
        config.gateway.debug_trigger = "  ".to_string();
        assert!(validate_semantics(&config).is_err());
    }

    #[test]
    fn test_validate_semantics_defaults_ok() {
        assert!(validate_semantics(&AppConfig::default()).is_ok());
    }

    #[tokio::test]
    async fn test_parse_config_missing_file() {
        let result = parse_config(Path::new("/nonexistent/qrtrace.yaml")).await;
        assert!(matches!(result, Err(QrTraceError::Config(_))));
    }

    #[tokio::test]
    async fn test_parse_config_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        tokio::fs::write(
            &path,
            "browser:\n  timeout_secs: 15\n  headless: true\n  max_screenshot_width: 800\n  max_screenshot_height: 600\nclassifier:\n  provider: anthropic\n  confidence_threshold: 0.5\n  skip_duplicates: false\n  timeout_secs: 30\n",
        )
        .await
        .unwrap();

        let config = parse_config(&path).await.unwrap();
        assert_eq!(config.browser.timeout_secs, 15);
        assert_eq!(config.classifier.confidence_threshold, 0.5);
        assert!(!config.classifier.skip_duplicates);
    }
}
