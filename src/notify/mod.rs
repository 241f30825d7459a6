pub mod twilio;

use async_trait::async_trait;
use tracing::info;

use crate::errors::QrTraceError;

pub use twilio::TwilioNotifier;

/// Outbound reply channel. The pipeline composes the message; delivery is a
/// separate concern so it can be swapped for a logger when no gateway is
/// configured.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, to: &str, body: &str) -> Result<(), QrTraceError>;
}

/// Fallback notifier used when no SMS gateway credentials are present.
/// Replies land in the log instead of on the wire.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, to: &str, body: &str) -> Result<(), QrTraceError> {
        info!(to, body, "SMS gateway not configured; reply logged only");
        Ok(())
    }
}
