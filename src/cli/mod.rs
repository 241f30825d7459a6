pub mod commands;
pub mod process;
pub mod serve;
pub mod stats;

use std::sync::Arc;

use crate::classify::ClassificationGate;
use crate::config::AppConfig;
use crate::db::Database;
use crate::errors::QrTraceError;
use crate::inspect::ChromiumInspector;
use crate::notify::{LogNotifier, Notifier, TwilioNotifier};
use crate::pipeline::SubmissionPipeline;

pub use commands::{Cli, Commands};

/// Load configuration from an optional path; absent means built-in defaults.
pub async fn load_config(path: Option<&str>) -> Result<AppConfig, QrTraceError> {
    match path {
        Some(path) => crate::config::parse_config(std::path::Path::new(path)).await,
        None => Ok(AppConfig::default()),
    }
}

/// Open the store named by the configuration; schema setup happens on open.
pub fn open_database(config: &AppConfig) -> Result<Database, QrTraceError> {
    Database::new(&config.storage.database_path)
}

/// Assemble the shared pipeline from configuration: real browser inspector,
/// cost-gated classifier, and the SMS gateway (or a log fallback).
pub fn build_pipeline(db: Database, config: &AppConfig) -> Result<Arc<SubmissionPipeline>, QrTraceError> {
    let inspector = Arc::new(ChromiumInspector::new(
        config.browser.clone(),
        &config.storage.screenshots_dir,
    ));
    let gate = ClassificationGate::from_config(&config.classifier)?;
    let notifier: Arc<dyn Notifier> = match TwilioNotifier::from_config(&config.gateway) {
        Some(twilio) => Arc::new(twilio),
        None => Arc::new(LogNotifier),
    };

    Ok(Arc::new(SubmissionPipeline::new(db, inspector, gate, notifier, config.clone())))
}
