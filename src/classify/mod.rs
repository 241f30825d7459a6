pub mod classifier;
pub mod gate;

use tracing::{info, warn};

use crate::config::ClassifierConfig;
use crate::errors::QrTraceError;
use crate::inspect::InspectionOutcome;
use crate::llm::{create_provider, LLMProvider};
use crate::models::{Category, Classification, QrCode};

pub use classifier::classify_destination;
pub use gate::should_classify;

/// What the classification stage produced for one submission. `Reused` means
/// a stored verdict was surfaced without spending a classifier call.
#[derive(Debug, Clone)]
pub enum ClassificationOutcome {
    Classified(Classification),
    Reused(Classification),
    Unclassified { reason: String },
}

impl ClassificationOutcome {
    pub fn classification(&self) -> Option<&Classification> {
        match self {
            ClassificationOutcome::Classified(c) | ClassificationOutcome::Reused(c) => Some(c),
            ClassificationOutcome::Unclassified { .. } => None,
        }
    }

    /// Only a fresh verdict; reused ones are already persisted.
    pub fn fresh(&self) -> Option<&Classification> {
        match self {
            ClassificationOutcome::Classified(c) => Some(c),
            _ => None,
        }
    }
}

/// Cost-gated classifier front end. Holds the provider (if configured) and
/// the skip/review policy; every failure mode folds into an
/// `Unclassified` outcome so the pipeline never aborts on classifier trouble.
pub struct ClassificationGate {
    provider: Option<Box<dyn LLMProvider>>,
    confidence_threshold: f64,
    skip_duplicates: bool,
}

/// Rebuild a `Classification` from the stored columns of a code row.
fn stored_classification(code: &QrCode) -> Option<Classification> {
    let category = code.classification.as_deref()?;
    Some(Classification {
        category: Category::parse(category),
        confidence: code.classification_confidence.unwrap_or(0.0),
        is_malicious: code.is_malicious,
        summary: String::new(),
    })
}

impl ClassificationGate {
    pub fn new(
        provider: Option<Box<dyn LLMProvider>>,
        confidence_threshold: f64,
        skip_duplicates: bool,
    ) -> Self {
        Self { provider, confidence_threshold, skip_duplicates }
    }

    pub fn from_config(config: &ClassifierConfig) -> Result<Self, QrTraceError> {
        let provider = if config.is_enabled() {
            let api_key = config.api_key.as_deref().unwrap_or_default();
            let provider =
                create_provider(&config.provider, api_key, config.model.as_deref(), config.timeout_secs)?;
            info!(provider = %config.provider, model = provider.model_name(), "Classifier enabled");
            Some(provider)
        } else {
            info!("Classifier disabled; submissions will not be categorized");
            None
        };
        Ok(Self::new(provider, config.confidence_threshold, config.skip_duplicates))
    }

    /// Low confidence sends the record to manual review.
    pub fn needs_review(&self, classification: &Classification) -> bool {
        classification.confidence < self.confidence_threshold
    }

    pub async fn evaluate(
        &self,
        payload: &str,
        inspection: &InspectionOutcome,
        code: &QrCode,
        is_duplicate: bool,
    ) -> ClassificationOutcome {
        if !should_classify(is_duplicate, code.has_classification(), self.skip_duplicates) {
            if let Some(prior) = stored_classification(code) {
                return ClassificationOutcome::Reused(prior);
            }
        }

        let Some(provider) = &self.provider else {
            return ClassificationOutcome::Unclassified { reason: "classifier not configured".into() };
        };

        match classify_destination(provider.as_ref(), payload, inspection).await {
            Ok(verdict) => ClassificationOutcome::Classified(verdict),
            Err(e) => {
                warn!(error = %e, "Classification failed; continuing without a verdict");
                ClassificationOutcome::Unclassified { reason: e.to_string() }
            }
        }
    }
}
