pub mod browser;
pub mod safety;

pub use browser::{ChromiumInspector, Inspector};

/// Details captured from a successfully navigated destination.
#[derive(Debug, Clone)]
pub struct PageCapture {
    /// URL after redirects resolved.
    pub final_url: String,
    pub title: Option<String>,
    /// Bounded excerpt of the page's visible text, classifier context only.
    pub text_preview: Option<String>,
    pub screenshot_path: Option<String>,
    /// Safety warnings carried through for classifier context.
    pub warnings: Vec<String>,
}

/// Outcome of destination inspection. Only `Navigated` carries a capture;
/// every other variant is a normal, non-fatal result the pipeline threads
/// through to the reply and the classifier.
#[derive(Debug, Clone)]
pub enum InspectionOutcome {
    /// Payload is not an http/https URI; inspection does not apply.
    NotBrowsable,
    /// Pre-navigation safety check rejected the URI; nothing was visited.
    UnsafePrecheck { warnings: Vec<String> },
    Navigated(PageCapture),
    NavigationFailed { reason: String },
}

impl InspectionOutcome {
    pub fn capture(&self) -> Option<&PageCapture> {
        match self {
            InspectionOutcome::Navigated(capture) => Some(capture),
            _ => None,
        }
    }

}
