use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

use crate::config::credentials::redact_credentials;
use crate::config::GatewayConfig;
use crate::errors::QrTraceError;

use super::Notifier;

/// Sends replies through the Twilio Messages API with basic-auth account
/// credentials.
pub struct TwilioNotifier {
    client: Client,
    account_sid: String,
    auth_token: String,
    from_number: String,
    base_url: String,
}

impl TwilioNotifier {
    /// Returns None when the gateway credentials are unresolved; callers fall
    /// back to a logging notifier.
    pub fn from_config(config: &GatewayConfig) -> Option<Self> {
        if !config.is_configured() {
            return None;
        }
        Some(Self {
            client: Client::new(),
            account_sid: config.account_sid.clone()?,
            auth_token: config.auth_token.clone()?,
            from_number: config.from_number.clone()?,
            base_url: "https://api.twilio.com".to_string(),
        })
    }
}

#[async_trait]
impl Notifier for TwilioNotifier {
    async fn send(&self, to: &str, body: &str) -> Result<(), QrTraceError> {
        let url = format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.base_url, self.account_sid
        );

        let resp = self
            .client
            .post(&url)
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&[("To", to), ("From", &self.from_number), ("Body", body)])
            .send()
            .await
            .map_err(|e| QrTraceError::Notification(format!("SMS send failed: {}", e)))?;

        let status = resp.status();
        if !status.is_success() {
            let detail =
                redact_credentials(&resp.text().await.unwrap_or_default(), &[&self.auth_token]);
            warn!(%status, detail, "Twilio rejected the message");
            return Err(QrTraceError::Notification(format!(
                "Twilio returned {}",
                status
            )));
        }

        debug!(to, chars = body.len(), "Reply delivered");
        Ok(())
    }
}
