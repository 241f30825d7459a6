use serde::{Deserialize, Serialize};

/// Canonical record for one unique QR content value. One row per distinct
/// content hash; sightings reference it and never outlive it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QrCode {
    pub id: String,
    /// SHA-256 hex digest of the decoded payload bytes; the uniqueness key.
    pub content_hash: String,
    pub qr_content: String,
    pub first_seen: String,
    /// Sighting counter; incremented on every non-debug resolution, never
    /// decremented.
    pub times_found: i64,
    pub destination_url: Option<String>,
    pub final_url: Option<String>,
    pub site_title: Option<String>,
    pub classification: Option<String>,
    pub classification_confidence: Option<f64>,
    pub is_malicious: bool,
    pub needs_review: bool,
}

impl QrCode {
    pub fn has_classification(&self) -> bool {
        self.classification.is_some()
    }
}
