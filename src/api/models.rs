use serde::Deserialize;

/// Inbound webhook form, as posted by the SMS gateway. Only the first media
/// attachment is consumed.
#[derive(Debug, Deserialize)]
pub struct InboundSms {
    #[serde(rename = "From")]
    pub from: String,
    #[serde(rename = "Body", default)]
    pub body: String,
    /// Gateways post this as a string; parsed leniently.
    #[serde(rename = "NumMedia", default)]
    pub num_media: String,
    #[serde(rename = "MediaUrl0", default)]
    pub media_url: Option<String>,
    #[serde(rename = "MediaContentType0", default)]
    pub media_content_type: Option<String>,
}

impl InboundSms {
    pub fn media_count(&self) -> usize {
        self.num_media.trim().parse().unwrap_or(0)
    }
}

#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default)]
    pub offset: usize,
}

fn default_limit() -> usize {
    50
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inbound_form_parses() {
        let form = "From=%2B15550001111&Body=no+log&NumMedia=1&MediaUrl0=https%3A%2F%2Fexample.com%2Fm.jpg";
        let sms: InboundSms = serde_urlencoded::from_str(form).unwrap();
        assert_eq!(sms.from, "+15550001111");
        assert_eq!(sms.body, "no log");
        assert_eq!(sms.media_count(), 1);
        assert_eq!(sms.media_url.as_deref(), Some("https://example.com/m.jpg"));
    }

    #[test]
    fn test_missing_media_fields_default() {
        let sms: InboundSms = serde_urlencoded::from_str("From=%2B15550001111").unwrap();
        assert_eq!(sms.media_count(), 0);
        assert!(sms.media_url.is_none());
        assert!(sms.body.is_empty());
    }
}
