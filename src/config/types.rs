use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub browser: BrowserConfig,
    #[serde(default)]
    pub classifier: ClassifierConfig,
    #[serde(default)]
    pub gateway: GatewayConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "0.0.0.0".to_string(), port: 5000 }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    pub database_path: String,
    pub images_dir: String,
    pub screenshots_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: "data/qrtrace.db".to_string(),
            images_dir: "data/images".to_string(),
            screenshots_dir: "data/screenshots".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BrowserConfig {
    /// Bounded wait for page navigation, in seconds.
    pub timeout_secs: u64,
    pub headless: bool,
    /// Screenshots are downscaled to fit within these bounds before storage.
    pub max_screenshot_width: u32,
    pub max_screenshot_height: u32,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            headless: true,
            max_screenshot_width: 1280,
            max_screenshot_height: 720,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClassifierConfig {
    pub provider: String,
    pub model: Option<String>,
    /// API key, or a `$ENV_VAR` reference resolved at load time.
    pub api_key: Option<String>,
    /// Below this confidence the record is flagged for manual review.
    pub confidence_threshold: f64,
    /// Reuse the stored classification for already-classified duplicates.
    pub skip_duplicates: bool,
    /// Bounded wait for the classifier request, in seconds.
    pub timeout_secs: u64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            provider: "anthropic".to_string(),
            model: None,
            api_key: Some("$ANTHROPIC_API_KEY".to_string()),
            confidence_threshold: 0.7,
            skip_duplicates: true,
            timeout_secs: 60,
        }
    }
}

impl ClassifierConfig {
    pub fn is_enabled(&self) -> bool {
        self.api_key.as_ref().map_or(false, |k| !k.is_empty() && !k.starts_with('$'))
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GatewayConfig {
    pub account_sid: Option<String>,
    pub auth_token: Option<String>,
    pub from_number: Option<String>,
    /// Case-insensitive caption substring that activates debug mode.
    pub debug_trigger: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            account_sid: Some("$TWILIO_ACCOUNT_SID".to_string()),
            auth_token: Some("$TWILIO_AUTH_TOKEN".to_string()),
            from_number: Some("$TWILIO_PHONE_NUMBER".to_string()),
            debug_trigger: "no log".to_string(),
        }
    }
}

impl GatewayConfig {
    pub fn is_configured(&self) -> bool {
        let set = |v: &Option<String>| {
            v.as_ref().map_or(false, |s| !s.is_empty() && !s.starts_with('$'))
        };
        set(&self.account_sid) && set(&self.auth_token) && set(&self.from_number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_values() {
        let config = AppConfig::default();
        assert_eq!(config.browser.timeout_secs, 30);
        assert!(config.browser.headless);
        assert_eq!(config.browser.max_screenshot_width, 1280);
        assert_eq!(config.browser.max_screenshot_height, 720);
        assert_eq!(config.classifier.confidence_threshold, 0.7);
        assert!(config.classifier.skip_duplicates);
        assert_eq!(config.gateway.debug_trigger, "no log");
    }

    #[test]
    fn test_classifier_disabled_with_unresolved_key() {
        let config = ClassifierConfig::default();
        // "$ANTHROPIC_API_KEY" unresolved means classification is off
        assert!(!config.is_enabled());
    }

    #[test]
    fn test_classifier_enabled_with_literal_key() {
        let config = ClassifierConfig {
            api_key: Some("sk-test".to_string()),
            ..Default::default()
        };
        assert!(config.is_enabled());
    }

    #[test]
    fn test_gateway_unconfigured_by_default() {
        assert!(!GatewayConfig::default().is_configured());
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let yaml = "browser:\n  timeout_secs: 10\n  headless: false\n  max_screenshot_width: 640\n  max_screenshot_height: 480\n";
        let config: AppConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.browser.timeout_secs, 10);
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.classifier.confidence_threshold, 0.7);
    }
}
