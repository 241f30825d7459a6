//! Deterministic text layout for the outbound reply. Every submission gets
//! exactly one message; which lines appear depends on what the pipeline
//! managed to learn.

use crate::pipeline::state::ProcessingResult;

const CONTENT_PREVIEW_LEN: usize = 80;
const TITLE_PREVIEW_LEN: usize = 60;

pub const NO_MEDIA_PROMPT: &str = "Please send an image of a QR code!";

pub fn no_code_reply() -> String {
    "No QR code found in image. Try a clearer, closer photo.".to_string()
}

pub fn processing_error_reply() -> String {
    "Sorry, something went wrong processing your image. Please try again.".to_string()
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let preview: String = text.chars().take(max).collect();
    format!("{}...", preview)
}

pub fn format_reply(result: &ProcessingResult) -> String {
    let record = result.identity.record();
    let mut message = String::new();

    if result.debug_mode {
        message.push_str("[DEBUG MODE - NOT SAVED]\n\nQR Code Analyzed:\n\n");
    } else {
        message.push_str("QR Code Processed!\n\n");
        if result.identity.is_duplicate() {
            message.push_str(&format!("DUPLICATE (found {}x)\n\n", record.times_found));
        } else {
            message.push_str("NEW QR CODE\n\n");
        }
    }

    message.push_str(&format!(
        "Content: {}\n\n",
        truncate(&record.qr_content, CONTENT_PREVIEW_LEN)
    ));

    // Redirect note only when navigation landed somewhere else
    if let Some(capture) = result.inspection.capture() {
        if capture.final_url != record.qr_content {
            message.push_str(&format!(
                "Redirects to: {}\n\n",
                truncate(&capture.final_url, TITLE_PREVIEW_LEN)
            ));
        }
    }

    if let (Some(lat), Some(lon)) = (result.metadata.latitude, result.metadata.longitude) {
        message.push_str(&format!("Location: {:.6}, {:.6}\n\n", lat, lon));
    }

    if let Some(class) = result.classification.classification() {
        message.push_str(&format!("Type: {}\n", class.category.as_str().to_uppercase()));
        message.push_str(&format!("Confidence: {:.0}%\n", class.confidence * 100.0));

        if class.is_malicious {
            message.push_str("\nWARNING: FLAGGED AS MALICIOUS!\n");
        } else if result.needs_review {
            message.push_str("\nFlagged for manual review\n");
        }
    }

    if let Some(title) = result.inspection.capture().and_then(|c| c.title.as_deref()) {
        message.push_str(&format!("\nSite: {}\n", truncate(title, TITLE_PREVIEW_LEN)));
    }

    if !result.debug_mode {
        message.push_str(&format!("\nTotal sightings: {}x", record.times_found));
    }

    message
}
