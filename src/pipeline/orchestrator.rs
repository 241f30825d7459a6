use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info, warn};

use crate::classify::{ClassificationGate, ClassificationOutcome};
use crate::config::AppConfig;
use crate::db::{fingerprint, Database, DestinationUpdate};
use crate::errors::QrTraceError;
use crate::imaging::{self, artifacts, DecodeOutcome};
use crate::inspect::Inspector;
use crate::models::{NewSighting, QrCode};
use crate::notify::Notifier;

use super::reply;
use super::state::{IdentityResult, ProcessingResult, Submission};

/// Sequences one submission through extraction, decoding, identity
/// resolution, inspection, classification, finalize and reply. One instance
/// is shared across concurrent executions; per-submission state lives on the
/// stack of `handle`.
pub struct SubmissionPipeline {
    db: Database,
    inspector: Arc<dyn Inspector>,
    gate: ClassificationGate,
    notifier: Arc<dyn Notifier>,
    config: AppConfig,
}

impl SubmissionPipeline {
    pub fn new(
        db: Database,
        inspector: Arc<dyn Inspector>,
        gate: ClassificationGate,
        notifier: Arc<dyn Notifier>,
        config: AppConfig,
    ) -> Self {
        Self { db, inspector, gate, notifier, config }
    }

    /// Run the full pipeline and reply. Fatal submission failures collapse
    /// into a generic error reply; nothing here takes down the process or
    /// touches other in-flight submissions.
    pub async fn handle(&self, submission: Submission) {
        let message = match self.process(&submission).await {
            Ok(message) => message,
            Err(e) => {
                error!(sender = %submission.sender, error = %e, "Submission processing failed");
                reply::processing_error_reply()
            }
        };

        // Reply delivery is best-effort; a gateway hiccup must not fail a
        // submission that was already analyzed and persisted.
        if let Err(e) = self.notifier.send(&submission.sender, &message).await {
            warn!(sender = %submission.sender, error = %e, "Reply delivery failed");
        }
    }

    /// Send a standalone message through the configured notifier.
    pub async fn notify(&self, to: &str, body: &str) -> Result<(), QrTraceError> {
        self.notifier.send(to, body).await
    }

    /// The pipeline proper, returning the composed reply text. Errors out of
    /// here are the fatal class only; expected-empty and degraded outcomes
    /// are carried inside the result.
    pub async fn process(&self, submission: &Submission) -> Result<String, QrTraceError> {
        let debug_mode = self.is_debug(&submission.caption);
        if debug_mode {
            info!(sender = %submission.sender, "Debug mode active; persistence suppressed");
        }

        let metadata = imaging::extract_metadata(&submission.image);

        let payload = match imaging::decode_qr(&submission.image)? {
            DecodeOutcome::Decoded(payload) => payload,
            DecodeOutcome::NotFound => {
                // Expected-empty outcome, reported plainly with zero writes
                info!(sender = %submission.sender, "No decodable code in image");
                return Ok(reply::no_code_reply());
            }
        };

        let identity = self.resolve_identity(&payload, debug_mode)?;
        let record = identity.record().clone();
        info!(
            code_id = %record.id,
            duplicate = identity.is_duplicate(),
            debug_mode,
            "Payload resolved"
        );

        // Inspection and classification always run, debug mode or not, so the
        // sender gets full diagnostic feedback.
        let inspection = self.inspector.inspect(&payload, &record.id).await;
        let classification =
            self.gate.evaluate(&payload, &inspection, &record, identity.is_duplicate()).await;

        let needs_review = match &classification {
            ClassificationOutcome::Classified(c) => self.gate.needs_review(c),
            ClassificationOutcome::Reused(_) => record.needs_review,
            ClassificationOutcome::Unclassified { .. } => false,
        };

        let result = ProcessingResult {
            metadata,
            identity,
            inspection,
            classification,
            needs_review,
            debug_mode,
        };

        if !debug_mode {
            self.finalize(submission, &result).await?;
        }

        Ok(reply::format_reply(&result))
    }

    fn is_debug(&self, caption: &str) -> bool {
        let trigger = self.config.gateway.debug_trigger.to_lowercase();
        !trigger.is_empty() && caption.to_lowercase().contains(&trigger)
    }

    /// Resolve the payload against the store. In debug mode the store is
    /// not consulted at all: a payload-derived transient stands in for the
    /// row, so analysis always runs from scratch and nothing stored leaks
    /// into the report.
    fn resolve_identity(
        &self,
        payload: &str,
        debug_mode: bool,
    ) -> Result<IdentityResult, QrTraceError> {
        if debug_mode {
            return Ok(IdentityResult::Transient { record: transient_record(payload) });
        }

        let (record, is_new) = self.db.find_or_create_code(payload)?;
        Ok(IdentityResult::Persisted { record, is_new })
    }

    /// Durable writes for a non-debug submission: image artifact, then the
    /// sighting row plus destination/classification updates as one
    /// transaction.
    async fn finalize(
        &self,
        submission: &Submission,
        result: &ProcessingResult,
    ) -> Result<(), QrTraceError> {
        let record = result.identity.record();

        let image_path = artifacts::save_image(
            &self.config.storage.images_dir,
            &submission.sender,
            &submission.image,
        )
        .await?;

        let timestamp = result
            .metadata
            .timestamp
            .map(|t| t.and_utc().to_rfc3339())
            .unwrap_or_else(|| Utc::now().to_rfc3339());

        let sighting = NewSighting {
            latitude: result.metadata.latitude,
            longitude: result.metadata.longitude,
            timestamp,
            image_path: Some(image_path),
            screenshot_path: result
                .inspection
                .capture()
                .and_then(|c| c.screenshot_path.clone()),
            device_make: result.metadata.device_make.clone(),
            device_model: result.metadata.device_model.clone(),
            submitted_by: Some(submission.sender.clone()),
        };

        let destination = result.inspection.capture().map(|capture| DestinationUpdate {
            destination_url: record.qr_content.clone(),
            final_url: Some(capture.final_url.clone()),
            site_title: capture.title.clone(),
        });

        // Only a fresh verdict is written; reused ones are already stored and
        // an absent one must not blank a prior.
        let classification = result.classification.fresh().map(|c| (c, result.needs_review));

        self.db.finalize_submission(&record.id, &sighting, destination.as_ref(), classification)?;
        info!(code_id = %record.id, "Submission finalized");
        Ok(())
    }
}

fn transient_record(payload: &str) -> QrCode {
    QrCode {
        id: uuid::Uuid::new_v4().to_string(),
        content_hash: fingerprint(payload),
        qr_content: payload.to_string(),
        first_seen: Utc::now().to_rfc3339(),
        times_found: 1,
        destination_url: None,
        final_url: None,
        site_title: None,
        classification: None,
        classification_confidence: None,
        is_malicious: false,
        needs_review: false,
    }
}
