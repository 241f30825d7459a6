use serde::{Deserialize, Serialize};

/// One physical observation of a QR code: image, capture location and time.
/// Append-only research data; never mutated or deleted once written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sighting {
    pub id: String,
    pub qr_code_id: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Capture time from EXIF when present, otherwise receipt time.
    pub timestamp: String,
    pub image_path: Option<String>,
    pub screenshot_path: Option<String>,
    pub device_make: Option<String>,
    pub device_model: Option<String>,
    pub submitted_by: Option<String>,
    pub created_at: String,
}

/// Fields for a new sighting row, gathered by the pipeline before finalize.
#[derive(Debug, Clone, Default)]
pub struct NewSighting {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub timestamp: String,
    pub image_path: Option<String>,
    pub screenshot_path: Option<String>,
    pub device_make: Option<String>,
    pub device_model: Option<String>,
    pub submitted_by: Option<String>,
}
