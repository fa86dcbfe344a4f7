//! Webhook field extraction.
//!
//! The provider may deliver the same callback as a query string (GET) or a
//! form body (POST) depending on the configured callback method. Both are
//! percent-decoded and merged; body fields win over query fields.

use std::collections::HashMap;

use url::form_urlencoded;

#[derive(Debug, Default, Clone)]
pub struct WebhookParams {
    fields: HashMap<String, String>,
}

impl WebhookParams {
    pub fn parse(query: Option<&str>, body: &[u8]) -> Self {
        let mut fields = HashMap::new();
        if let Some(query) = query {
            fields.extend(form_urlencoded::parse(query.as_bytes()).into_owned());
        }
        fields.extend(form_urlencoded::parse(body).into_owned());
        Self { fields }
    }

    /// Non-empty value of `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// First non-empty value among `keys`.
    pub fn get_any(&self, keys: &[&str]) -> Option<&str> {
        keys.iter().find_map(|key| self.get(key))
    }

    pub fn owned(&self, key: &str) -> Option<String> {
        self.get(key).map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_query() {
        let params = WebhookParams::parse(Some("CallSid=CA1&CallStatus=in-progress"), b"");
        assert_eq!(params.get("CallSid"), Some("CA1"));
        assert_eq!(params.get("CallStatus"), Some("in-progress"));
    }

    #[test]
    fn test_parse_form_body_percent_decoded() {
        let params = WebhookParams::parse(
            None,
            b"CallSid=CA1&Timestamp=Tue%2C+01+Jul+2025+10%3A00%3A00+%2B0000",
        );
        assert_eq!(
            params.get("Timestamp"),
            Some("Tue, 01 Jul 2025 10:00:00 +0000")
        );
    }

    #[test]
    fn test_body_overrides_query() {
        let params = WebhookParams::parse(Some("CallSid=FromQuery"), b"CallSid=FromBody");
        assert_eq!(params.get("CallSid"), Some("FromBody"));
    }

    #[test]
    fn test_empty_values_are_absent() {
        let params = WebhookParams::parse(Some("AnsweredBy="), b"");
        assert_eq!(params.get("AnsweredBy"), None);
        assert_eq!(params.get("Missing"), None);
    }

    #[test]
    fn test_get_any() {
        let params = WebhookParams::parse(Some("callbacksource=call-progress-events"), b"");
        assert_eq!(
            params.get_any(&["CallbackSource", "callbacksource"]),
            Some("call-progress-events")
        );
    }
}
