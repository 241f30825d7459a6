use std::path::{Path, PathBuf};
use chrono::Utc;
use crate::errors::QrTraceError;

/// Strip anything that should not land in a filename (phone numbers arrive
/// as `+1555...`, payload keys may carry slashes).
fn sanitize(part: &str) -> String {
    part.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect()
}

fn unique_name(prefix: &str, ext: &str) -> String {
    let stamp = Utc::now().format("%Y%m%d_%H%M%S");
    let tag = &uuid::Uuid::new_v4().to_string()[..8];
    format!("{}_{}_{}.{}", sanitize(prefix), stamp, tag, ext)
}

/// Persist the submitted image under the images directory. The sighting row
/// stores the returned path; the bytes themselves stay outside the store.
pub async fn save_image(dir: &str, sender: &str, bytes: &[u8]) -> Result<String, QrTraceError> {
    tokio::fs::create_dir_all(dir).await?;
    let path: PathBuf = Path::new(dir).join(unique_name(sender, "jpg"));
    tokio::fs::write(&path, bytes).await?;
    Ok(path.to_string_lossy().into_owned())
}

/// Downscale a captured screenshot to fit within the configured bounds and
/// persist it under the screenshots directory.
pub async fn save_screenshot(
    dir: &str,
    key: &str,
    png_bytes: &[u8],
    max_width: u32,
    max_height: u32,
) -> Result<String, QrTraceError> {
    let img = image::load_from_memory(png_bytes)
        .map_err(|e| QrTraceError::Image(format!("Unreadable screenshot: {}", e)))?;

    let bounded = if img.width() > max_width || img.height() > max_height {
        img.thumbnail(max_width, max_height)
    } else {
        img
    };

    tokio::fs::create_dir_all(dir).await?;
    let path: PathBuf = Path::new(dir).join(unique_name(key, "png"));
    let mut bytes = Vec::new();
    bounded
        .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
        .map_err(|e| QrTraceError::Image(format!("Screenshot encode failed: {}", e)))?;
    tokio::fs::write(&path, &bytes).await?;
    Ok(path.to_string_lossy().into_owned())
}
