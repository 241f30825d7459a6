use std::time::Duration;
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::browser::{
    SetDownloadBehaviorBehavior, SetDownloadBehaviorParams,
};
use chromiumoxide::cdp::browser_protocol::page::{
    CaptureScreenshotFormat, CaptureScreenshotParams,
};
use futures::StreamExt;
use url::Url;
use crate::config;
use crate::errors::QrTraceError;
use crate::imaging::artifacts;
use tracing::{debug, warn};

use super::safety::{check_url_safety, parse_browsable};
use super::{InspectionOutcome, PageCapture};

/// Upper bound on the visible-text excerpt handed to the classifier.
const TEXT_PREVIEW_LEN: usize = 300;

/// Seam for destination inspection so the pipeline can be exercised without
/// a real browser.
#[async_trait]
pub trait Inspector: Send + Sync {
    /// Inspect the destination a decoded payload points to. All failures are
    /// folded into the outcome; inspection is never fatal to a submission.
    async fn inspect(&self, payload: &str, key: &str) -> InspectionOutcome;
}

/// Navigates QR destinations in a throwaway headless Chromium instance.
/// Every inspection gets a fresh browser launch: no cookies, storage or DOM
/// state survive between submissions, and teardown runs on every exit path.
pub struct ChromiumInspector {
    browser_config: config::BrowserConfig,
    screenshots_dir: String,
}

impl ChromiumInspector {
    pub fn new(browser_config: config::BrowserConfig, screenshots_dir: &str) -> Self {
        Self { browser_config, screenshots_dir: screenshots_dir.to_string() }
    }

    async fn navigate_and_capture(&self, url: &Url, key: &str) -> Result<PageCapture, QrTraceError> {
        let mut builder = BrowserConfig::builder().incognito();
        if !self.browser_config.headless {
            builder = builder.with_head();
        }
        let launch_config = builder
            .build()
            .map_err(|e| QrTraceError::Browser(format!("Browser launch config: {}", e)))?;

        let (mut browser, mut handler) = Browser::launch(launch_config)
            .await
            .map_err(|e| QrTraceError::Browser(format!("Browser launch failed: {}", e)))?;

        // The CDP event loop must be polled for the browser to make progress
        let handler_task = tokio::spawn(async move {
            while handler.next().await.is_some() {}
        });

        let timeout = Duration::from_secs(self.browser_config.timeout_secs);
        let nav = tokio::time::timeout(timeout, capture_page(&browser, url)).await;

        // Teardown is unconditional; a leaked browser context outlives the
        // submission and starves concurrent executions.
        if let Err(e) = browser.close().await {
            warn!(error = %e, "Browser close failed");
        }
        let _ = browser.wait().await;
        handler_task.abort();

        let (final_url, title, text_preview, screenshot) = match nav {
            Err(_) => {
                return Err(QrTraceError::Timeout(format!(
                    "Navigation exceeded {}s",
                    self.browser_config.timeout_secs
                )))
            }
            Ok(result) => result?,
        };

        // Screenshot storage is best-effort; the capture is still useful
        // without it.
        let screenshot_path = match artifacts::save_screenshot(
            &self.screenshots_dir,
            key,
            &screenshot,
            self.browser_config.max_screenshot_width,
            self.browser_config.max_screenshot_height,
        )
        .await
        {
            Ok(path) => Some(path),
            Err(e) => {
                warn!(error = %e, "Screenshot save failed");
                None
            }
        };

        Ok(PageCapture { final_url, title, text_preview, screenshot_path, warnings: Vec::new() })
    }
}

async fn capture_page(
    browser: &Browser,
    url: &Url,
) -> Result<(String, Option<String>, Option<String>, Vec<u8>), QrTraceError> {
    // Downloads are refused outright; a destination must never drop files
    let deny = SetDownloadBehaviorParams::builder()
        .behavior(SetDownloadBehaviorBehavior::Deny)
        .build()
        .map_err(QrTraceError::Browser)?;
    browser
        .execute(deny)
        .await
        .map_err(|e| QrTraceError::Browser(format!("Download policy failed: {}", e)))?;

    let page = browser
        .new_page(url.as_str())
        .await
        .map_err(|e| QrTraceError::Browser(format!("Navigation failed: {}", e)))?;

    page.wait_for_navigation()
        .await
        .map_err(|e| QrTraceError::Browser(format!("Page load failed: {}", e)))?;

    let final_url = page
        .url()
        .await
        .map_err(|e| QrTraceError::Browser(format!("URL query failed: {}", e)))?
        .unwrap_or_else(|| url.to_string());

    let title = page.get_title().await.ok().flatten();

    // Visible text is classifier context; losing it is not worth failing
    // the capture over.
    let text_preview = page
        .evaluate("document.body ? document.body.innerText : ''")
        .await
        .ok()
        .and_then(|result| result.into_value::<String>().ok())
        .map(|text| text.trim().chars().take(TEXT_PREVIEW_LEN).collect::<String>())
        .filter(|text| !text.is_empty());

    let screenshot = page
        .screenshot(CaptureScreenshotParams::builder().format(CaptureScreenshotFormat::Png).build())
        .await
        .map_err(|e| QrTraceError::Browser(format!("Screenshot failed: {}", e)))?;

    Ok((final_url, title, text_preview, screenshot))
}

#[async_trait]
impl Inspector for ChromiumInspector {
    async fn inspect(&self, payload: &str, key: &str) -> InspectionOutcome {
        let Some(url) = parse_browsable(payload) else {
            return InspectionOutcome::NotBrowsable;
        };

        let warnings = check_url_safety(&url);
        if !warnings.is_empty() {
            debug!(url = %url, ?warnings, "Navigation rejected by safety pre-check");
            return InspectionOutcome::UnsafePrecheck { warnings };
        }

        match self.navigate_and_capture(&url, key).await {
            Ok(capture) => InspectionOutcome::Navigated(capture),
            Err(e) => {
                warn!(url = %url, error = %e, "Navigation failed");
                InspectionOutcome::NavigationFailed { reason: e.to_string() }
            }
        }
    }
}
