//! Minimal voice markup responses.
//!
//! The provider only ever needs two documents from us: "play this URL" for the
//! connect webhook and an empty acknowledgement for everything else.

use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};

pub const CONTENT_TYPE: &str = "text/xml";

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// Direct the provider to play a single audio URL.
pub fn play(url: &str) -> String {
    format!(
        "{XML_DECLARATION}<Response><Play>{}</Play></Response>",
        escape_xml(url)
    )
}

/// Neutral acknowledgement.
pub fn empty() -> String {
    format!("{XML_DECLARATION}<Response/>")
}

/// Always `200 OK` with the markup content type.
pub fn respond(body: String) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, HeaderValue::from_static(CONTENT_TYPE))],
        body,
    )
        .into_response()
}

fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_play_escapes_query_string() {
        let body = play("https://a.example/audio.wav?recording=RE1&x=2");
        assert_eq!(
            body,
            r#"<?xml version="1.0" encoding="UTF-8"?><Response><Play>https://a.example/audio.wav?recording=RE1&amp;x=2</Play></Response>"#
        );
    }

    #[test]
    fn test_empty_response() {
        assert_eq!(
            empty(),
            r#"<?xml version="1.0" encoding="UTF-8"?><Response/>"#
        );
    }

    #[test]
    fn test_respond_sets_content_type() {
        let response = respond(empty());
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/xml"
        );
    }
}
