use crate::errors::QrTraceError;
use super::provider::LLMProvider;
use super::anthropic::AnthropicProvider;

pub fn create_provider(
    provider_name: &str,
    api_key: &str,
    model: Option<&str>,
    timeout_secs: u64,
) -> Result<Box<dyn LLMProvider>, QrTraceError> {
    match provider_name {
        "anthropic" => Ok(Box::new(AnthropicProvider::new(api_key, model, timeout_secs))),
        other => Err(QrTraceError::Config(format!("Unknown classifier provider: {}", other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_anthropic_provider() {
        let provider = create_provider("anthropic", "sk-test", None, 30).unwrap();
        assert_eq!(provider.provider_name(), "anthropic");
    }

    #[test]
    fn test_create_unknown_provider() {
        let result = create_provider("watson", "key", None, 30);
        assert!(matches!(result, Err(QrTraceError::Config(_))));
    }
}
