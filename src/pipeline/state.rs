use crate::classify::ClassificationOutcome;
use crate::imaging::CaptureMetadata;
use crate::inspect::InspectionOutcome;
use crate::models::QrCode;

/// One inbound submission as received from the gateway: the first image
/// attachment, the free-text caption, and the sender identifier.
#[derive(Debug, Clone)]
pub struct Submission {
    pub image: Vec<u8>,
    pub caption: String,
    pub sender: String,
}

/// How the decoded payload resolved against the store. `Transient` is the
/// debug-mode stand-in: structurally a code record, but the store was never
/// consulted to produce it, so it is never a duplicate and always analyzed
/// from scratch.
#[derive(Debug, Clone)]
pub enum IdentityResult {
    Persisted { record: QrCode, is_new: bool },
    Transient { record: QrCode },
}

impl IdentityResult {
    pub fn record(&self) -> &QrCode {
        match self {
            IdentityResult::Persisted { record, .. } | IdentityResult::Transient { record } => {
                record
            }
        }
    }

    pub fn is_duplicate(&self) -> bool {
        match self {
            IdentityResult::Persisted { is_new, .. } => !is_new,
            IdentityResult::Transient { .. } => false,
        }
    }
}

/// Everything one pipeline execution learned about a submission. Built by
/// the orchestrator, consumed by the reply formatter, then discarded; never
/// persisted as its own row.
#[derive(Debug)]
pub struct ProcessingResult {
    pub metadata: CaptureMetadata,
    pub identity: IdentityResult,
    pub inspection: InspectionOutcome,
    pub classification: ClassificationOutcome,
    /// Low classifier confidence flags the record for manual audit.
    pub needs_review: bool,
    pub debug_mode: bool,
}
