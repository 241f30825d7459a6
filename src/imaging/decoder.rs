use image::imageops;
use image::GrayImage;
use crate::errors::QrTraceError;
use tracing::debug;

/// Outcome of locating a machine-readable code in an image. Absence is a
/// normal result, not an error; only unreadable image bytes are fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeOutcome {
    Decoded(String),
    NotFound,
}

/// Locate and decode the first QR code in the image. Field photography is
/// frequently low quality, so a failed direct decode is retried against a
/// contrast-stretched copy and the three remaining quarter rotations before
/// giving up.
pub fn decode_qr(bytes: &[u8]) -> Result<DecodeOutcome, QrTraceError> {
    let img = image::load_from_memory(bytes)
        .map_err(|e| QrTraceError::Image(format!("Unreadable image: {}", e)))?;
    let luma = img.to_luma8();

    if let Some(content) = try_decode(luma.clone()) {
        return Ok(DecodeOutcome::Decoded(content));
    }

    let stretched = imageops::contrast(&luma, 40.0);
    if let Some(content) = try_decode(stretched) {
        debug!("Decoded after contrast stretch");
        return Ok(DecodeOutcome::Decoded(content));
    }

    for (label, rotated) in [
        ("90", imageops::rotate90(&luma)),
        ("180", imageops::rotate180(&luma)),
        ("270", imageops::rotate270(&luma)),
    ] {
        if let Some(content) = try_decode(rotated) {
            debug!(rotation = label, "Decoded after rotation");
            return Ok(DecodeOutcome::Decoded(content));
        }
    }

    Ok(DecodeOutcome::NotFound)
}

/// Decode the first grid that yields valid content. Multi-code images are
/// out of scope; only the first located code is processed.
fn try_decode(img: GrayImage) -> Option<String> {
    let mut prepared = rqrr::PreparedImage::prepare(img);
    for grid in prepared.detect_grids() {
        if let Ok((_, content)) = grid.decode() {
            return Some(content);
        }
    }
    None
}
