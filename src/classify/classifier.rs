use tracing::debug;

use crate::errors::QrTraceError;
use crate::inspect::InspectionOutcome;
use crate::llm::LLMProvider;
use crate::models::{Category, Classification};

const SYSTEM_PROMPT: &str = "You analyze QR code destinations found on posters, flyers, and stickers \
in public spaces. Assess what the destination is and whether it poses a risk to someone who scans it. \
Be conservative: flag anything resembling phishing, credential harvesting, malware delivery, or \
deceptive redirects as malicious.";

/// Assemble the classification prompt from the decoded payload and whatever
/// the destination inspection produced. Non-URL payloads and failed
/// navigations are still classified; the prompt just says less.
pub fn build_prompt(payload: &str, inspection: &InspectionOutcome) -> String {
    let mut prompt = format!("QR code content: {}\n", payload);

    match inspection {
        InspectionOutcome::NotBrowsable => {
            prompt.push_str("The content is not a browsable URL; classify the raw content itself.\n");
        }
        InspectionOutcome::UnsafePrecheck { warnings } => {
            prompt.push_str("The URL was NOT visited because it failed safety checks:\n");
            for w in warnings {
                prompt.push_str(&format!("- {}\n", w));
            }
        }
        InspectionOutcome::Navigated(capture) => {
            prompt.push_str(&format!("Final URL after redirects: {}\n", capture.final_url));
            if let Some(title) = &capture.title {
                prompt.push_str(&format!("Page title: {}\n", title));
            }
            if let Some(text) = &capture.text_preview {
                prompt.push_str(&format!("Visible page text: {}\n", text));
            }
            for w in &capture.warnings {
                prompt.push_str(&format!("Safety warning: {}\n", w));
            }
        }
        InspectionOutcome::NavigationFailed { reason } => {
            prompt.push_str(&format!("Visiting the URL failed: {}\n", reason));
        }
    }

    prompt.push_str(
        "\nRespond with exactly these four lines:\n\
         CATEGORY: one of promotional, informational, malicious, other\n\
         CONFIDENCE: a number between 0.0 and 1.0\n\
         MALICIOUS: yes or no\n\
         SUMMARY: one sentence describing the destination\n",
    );
    prompt
}

/// Parse the line-oriented verdict. Missing CATEGORY is an error; a bad or
/// missing CONFIDENCE degrades to 0.0 rather than discarding the verdict.
pub fn parse_classification(text: &str) -> Result<Classification, QrTraceError> {
    let mut category: Option<Category> = None;
    let mut confidence: f64 = 0.0;
    let mut is_malicious = false;
    let mut summary = String::new();

    for line in text.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim();
        match key.trim().to_uppercase().as_str() {
            "CATEGORY" => category = Some(Category::parse(value)),
            "CONFIDENCE" => {
                confidence = value.parse::<f64>().unwrap_or(0.0).clamp(0.0, 1.0);
            }
            "MALICIOUS" => {
                is_malicious = matches!(value.to_lowercase().as_str(), "yes" | "true");
            }
            "SUMMARY" => summary = value.to_string(),
            _ => {}
        }
    }

    let category = category
        .ok_or_else(|| QrTraceError::LLMApi("Classifier response missing CATEGORY line".into()))?;

    // A malicious category implies the flag even if the MALICIOUS line disagrees.
    if category == Category::Malicious {
        is_malicious = true;
    }

    Ok(Classification { category, confidence, is_malicious, summary })
}

pub async fn classify_destination(
    provider: &dyn LLMProvider,
    payload: &str,
    inspection: &InspectionOutcome,
) -> Result<Classification, QrTraceError> {
    let prompt = build_prompt(payload, inspection);
    let response = provider.complete(&prompt, Some(SYSTEM_PROMPT)).await?;
    let verdict = parse_classification(&response.content)?;
    debug!(
        category = %verdict.category,
        confidence = verdict.confidence,
        malicious = verdict.is_malicious,
        "Destination classified"
    );
    Ok(verdict)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inspect::PageCapture;

    #[test]
    fn test_parse_complete_response() {
        let text = "CATEGORY: promotional\nCONFIDENCE: 0.92\nMALICIOUS: no\nSUMMARY: Restaurant menu page.";
        let verdict = parse_classification(text).unwrap();
        assert_eq!(verdict.category, Category::Promotional);
        assert!((verdict.confidence - 0.92).abs() < 1e-9);
        assert!(!verdict.is_malicious);
        assert_eq!(verdict.summary, "Restaurant menu page.");
    }

    #[test]
    fn test_parse_clamps_confidence() {
        let text = "CATEGORY: other\nCONFIDENCE: 3.5\nMALICIOUS: no\nSUMMARY: x";
        let verdict = parse_classification(text).unwrap();
        assert_eq!(verdict.confidence, 1.0);
    }

    #[test]
    fn test_parse_bad_confidence_degrades_to_zero() {
        let text = "CATEGORY: informational\nCONFIDENCE: high\nMALICIOUS: no\nSUMMARY: x";
        let verdict = parse_classification(text).unwrap();
        assert_eq!(verdict.confidence, 0.0);
    }

    #[test]
    fn test_parse_unknown_category_becomes_other() {
        let text = "CATEGORY: scam\nCONFIDENCE: 0.8\nMALICIOUS: yes\nSUMMARY: x";
        let verdict = parse_classification(text).unwrap();
        assert_eq!(verdict.category, Category::Other);
        assert!(verdict.is_malicious);
    }

    #[test]
    fn test_parse_malicious_category_forces_flag() {
        let text = "CATEGORY: malicious\nCONFIDENCE: 0.9\nMALICIOUS: no\nSUMMARY: phishing";
        let verdict = parse_classification(text).unwrap();
        assert!(verdict.is_malicious);
    }

    #[test]
    fn test_parse_missing_category_errors() {
        let text = "CONFIDENCE: 0.9\nMALICIOUS: no\nSUMMARY: x";
        assert!(parse_classification(text).is_err());
    }

    #[test]
    fn test_prompt_includes_capture_details() {
        let inspection = InspectionOutcome::Navigated(PageCapture {
            final_url: "https://example.com/landing".into(),
            title: Some("Example Landing".into()),
            text_preview: Some("Welcome to our spring sale".into()),
            screenshot_path: None,
            warnings: vec!["URL is unusually long".into()],
        });
        let prompt = build_prompt("https://example.com", &inspection);
        assert!(prompt.contains("https://example.com/landing"));
        assert!(prompt.contains("Example Landing"));
        assert!(prompt.contains("Visible page text: Welcome to our spring sale"));
        assert!(prompt.contains("unusually long"));
    }

    #[test]
    fn test_prompt_omits_absent_page_text() {
        let inspection = InspectionOutcome::Navigated(PageCapture {
            final_url: "https://example.com".into(),
            title: None,
            text_preview: None,
            screenshot_path: None,
            warnings: Vec::new(),
        });
        let prompt = build_prompt("https://example.com", &inspection);
        assert!(!prompt.contains("Visible page text"));
    }

    #[test]
    fn test_prompt_for_non_browsable_payload() {
        let prompt = build_prompt("WIFI:S:cafe;T:WPA;P:secret;;", &InspectionOutcome::NotBrowsable);
        assert!(prompt.contains("not a browsable URL"));
    }
}
