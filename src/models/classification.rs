use serde::{Deserialize, Serialize};

/// Destination category assigned by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Promotional,
    Informational,
    Malicious,
    Other,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Promotional => "promotional",
            Category::Informational => "informational",
            Category::Malicious => "malicious",
            Category::Other => "other",
        }
    }

    /// Parse a classifier-reported category, falling back to Other for
    /// anything outside the enumerated set.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "promotional" => Category::Promotional,
            "informational" => Category::Informational,
            "malicious" => Category::Malicious,
            _ => Category::Other,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized classifier verdict for one QR code destination.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Classification {
    pub category: Category,
    /// Confidence in [0, 1].
    pub confidence: f64,
    pub is_malicious: bool,
    pub summary: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parse_known() {
        assert_eq!(Category::parse("promotional"), Category::Promotional);
        assert_eq!(Category::parse("  MALICIOUS "), Category::Malicious);
        assert_eq!(Category::parse("informational"), Category::Informational);
    }

    #[test]
    fn test_category_parse_unknown_falls_back() {
        assert_eq!(Category::parse("scam"), Category::Other);
        assert_eq!(Category::parse(""), Category::Other);
    }

    #[test]
    fn test_category_serialization() {
        let json = serde_json::to_string(&Category::Promotional).unwrap();
        assert_eq!(json, "\"promotional\"");
    }
}
