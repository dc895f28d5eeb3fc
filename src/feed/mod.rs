//! RSS parsing, upstream response validation, and filtered re-serialization.

use crate::domain::model::Listing;
use crate::utils::error::{FilterError, Result};
use chrono::Utc;
use quick_xml::escape::escape;
use quick_xml::events::Event;
use quick_xml::Reader;

/// Non-job placeholder the Taleo feed appends as its last item.
const SENTINEL_MARKER: &str = "More Jobs Available";

const DEFAULT_CHANNEL_TITLE: &str =
    "WHO Geneva Professional/Director Vacancies (filtered)";
const DEFAULT_CHANNEL_DESCRIPTION: &str = "Filtered WHO job feed: Geneva-based \
positions at Professional and Director grade (P1-P6, D1-D2). Source: WHO Careers RSS.";

/// Rejects upstream responses that cannot be a feed: empty bodies, HTML
/// documents (Taleo serves a login or error page when it blocks a client),
/// and structurally broken XML. Fatal; runs before any classification work.
pub fn validate_feed_response(text: &str) -> Result<()> {
    let stripped = text.trim();
    if stripped.is_empty() {
        return Err(FilterError::EmptyFeed);
    }

    let lower = stripped.to_lowercase();
    if lower.starts_with("<!doctype") || lower.starts_with("<html") {
        return Err(FilterError::HtmlResponse {
            snippet: snippet(stripped),
        });
    }

    // Well-formedness scan; the tolerant item parser runs separately. The
    // reader accepts bare text without complaint, so a document with no root
    // element at all (a plain-text error page, a JSON body) must be caught
    // explicitly or it would sail through and produce an empty output feed.
    let mut reader = Reader::from_str(text);
    let mut buf = Vec::new();
    let mut saw_root = false;
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(_)) | Ok(Event::Empty(_)) => saw_root = true,
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(FilterError::FeedParseError {
                    reason: e.to_string(),
                    snippet: snippet(stripped),
                });
            }
        }
        buf.clear();
    }

    if !saw_root {
        return Err(FilterError::FeedParseError {
            reason: "no XML root element".to_string(),
            snippet: snippet(stripped),
        });
    }

    Ok(())
}

fn snippet(text: &str) -> String {
    text.chars().take(500).collect()
}

/// Parses RSS text into listings, in document order.
///
/// Tolerant by design: junk input yields an empty vec, and a mid-stream
/// reader error returns whatever was collected before it. Sentinel items are
/// dropped here and never become listings; a `content:encoded` child is
/// folded into the description.
pub fn parse_feed(xml: &str) -> Vec<Listing> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut listings = Vec::new();
    let mut buf = Vec::new();

    let mut in_item = false;
    let mut current_tag = String::new();
    let mut title = String::new();
    let mut link = String::new();
    let mut description = String::new();
    let mut pub_date = String::new();
    let mut content_encoded = String::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                if name == "item" {
                    in_item = true;
                    title.clear();
                    link.clear();
                    description.clear();
                    pub_date.clear();
                    content_encoded.clear();
                    current_tag.clear();
                } else if in_item {
                    current_tag = name;
                }
            }
            Ok(Event::Text(t)) if in_item => {
                let text = t.unescape().unwrap_or_default();
                append_field(
                    &current_tag,
                    text.trim(),
                    &mut title,
                    &mut link,
                    &mut description,
                    &mut pub_date,
                    &mut content_encoded,
                );
            }
            Ok(Event::CData(t)) if in_item => {
                let raw = t.into_inner();
                let text = String::from_utf8_lossy(&raw).to_string();
                append_field(
                    &current_tag,
                    text.trim(),
                    &mut title,
                    &mut link,
                    &mut description,
                    &mut pub_date,
                    &mut content_encoded,
                );
            }
            Ok(Event::End(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                if name == "item" && in_item {
                    in_item = false;
                    if !content_encoded.is_empty() {
                        if !description.is_empty() {
                            description.push(' ');
                        }
                        description.push_str(&content_encoded);
                    }
                    if !title.contains(SENTINEL_MARKER) {
                        listings.push(Listing::new(
                            title.clone(),
                            link.clone(),
                            description.clone(),
                            pub_date.clone(),
                        ));
                    }
                } else {
                    current_tag.clear();
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                tracing::warn!("Feed parse stopped early: {}", e);
                break;
            }
        }
        buf.clear();
    }

    listings
}

#[allow(clippy::too_many_arguments)]
fn append_field(
    tag: &str,
    text: &str,
    title: &mut String,
    link: &mut String,
    description: &mut String,
    pub_date: &mut String,
    content_encoded: &mut String,
) {
    if text.is_empty() {
        return;
    }
    let target = match tag {
        "title" => title,
        "link" => link,
        "description" => description,
        "pubDate" => pub_date,
        "content:encoded" => content_encoded,
        _ => return,
    };
    if !target.is_empty() {
        target.push(' ');
    }
    target.push_str(text);
}

struct ChannelMeta {
    title: String,
    link: String,
    description: String,
}

impl Default for ChannelMeta {
    fn default() -> Self {
        Self {
            title: DEFAULT_CHANNEL_TITLE.to_string(),
            link: String::new(),
            description: DEFAULT_CHANNEL_DESCRIPTION.to_string(),
        }
    }
}

/// Channel-level title/link/description from the original document; defaults
/// when the document is unusable (the serializer then emits a valid skeleton).
fn parse_channel_meta(xml: &str) -> ChannelMeta {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut meta = ChannelMeta {
        title: String::new(),
        link: String::new(),
        description: String::new(),
    };
    let mut buf = Vec::new();
    let mut current_tag = String::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                if name == "item" {
                    // Channel metadata precedes the items.
                    break;
                }
                current_tag = name;
            }
            Ok(Event::Text(t)) => {
                let text = t.unescape().unwrap_or_default();
                match current_tag.as_str() {
                    "title" => meta.title = text.trim().to_string(),
                    "link" => meta.link = text.trim().to_string(),
                    "description" => meta.description = text.trim().to_string(),
                    _ => {}
                }
            }
            Ok(Event::End(_)) => {
                current_tag.clear();
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(_) => break,
        }
        buf.clear();
    }

    if meta.title.is_empty() && meta.description.is_empty() {
        ChannelMeta::default()
    } else {
        meta
    }
}

/// Re-emits a valid RSS 2.0 document containing only the accepted listings,
/// preserving each item's original fields and adding a permalink guid equal
/// to the link. Falls back to an empty skeleton with default channel fields
/// when the original document cannot be parsed.
pub fn build_filtered_feed(original_xml: &str, accepted: &[Listing]) -> String {
    let meta = parse_channel_meta(original_xml);

    let mut out = String::new();
    out.push_str("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n");
    out.push_str("<rss version=\"2.0\">\n");
    out.push_str("  <channel>\n");
    push_element(&mut out, "    ", "title", &meta.title);
    if !meta.link.is_empty() {
        push_element(&mut out, "    ", "link", &meta.link);
    }
    push_element(&mut out, "    ", "description", &meta.description);
    push_element(
        &mut out,
        "    ",
        "lastBuildDate",
        &Utc::now().format("%a, %d %b %Y %H:%M:%S +0000").to_string(),
    );

    for item in accepted {
        out.push_str("    <item>\n");
        push_element(&mut out, "      ", "title", &item.title);
        push_element(&mut out, "      ", "link", &item.link);
        if !item.published_at.is_empty() {
            push_element(&mut out, "      ", "pubDate", &item.published_at);
        }
        push_element(&mut out, "      ", "description", &item.description);
        out.push_str(&format!(
            "      <guid isPermaLink=\"true\">{}</guid>\n",
            escape(item.link.as_str())
        ));
        out.push_str("    </item>\n");
    }

    out.push_str("  </channel>\n");
    out.push_str("</rss>\n");
    out
}

fn push_element(out: &mut String, indent: &str, name: &str, value: &str) {
    out.push_str(&format!(
        "{indent}<{name}>{}</{name}>\n",
        escape(value)
    ));
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RSS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>WHO Jobs</title>
    <link>https://careers.who.int</link>
    <description>Current vacancies</description>
    <item>
      <title>Health Officer, P4, Geneva</title>
      <link>https://careers.who.int/job/1</link>
      <description>A P4 role in Geneva.</description>
      <pubDate>Mon, 01 Jan 2024 00:00:00 GMT</pubDate>
    </item>
    <item>
      <title>Admin Clerk, GS-4, Manila</title>
      <link>https://careers.who.int/job/2</link>
      <description>A GS role in Manila.</description>
      <pubDate>Mon, 01 Jan 2024 00:00:00 GMT</pubDate>
    </item>
    <item>
      <title>More Jobs Available on our site</title>
      <link>https://careers.who.int</link>
      <description></description>
      <pubDate>Mon, 01 Jan 2024 00:00:00 GMT</pubDate>
    </item>
  </channel>
</rss>"#;

    #[test]
    fn test_parse_feed_drops_sentinel() {
        let items = parse_feed(SAMPLE_RSS);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, "Health Officer, P4, Geneva");
        assert_eq!(items[0].link, "https://careers.who.int/job/1");
        assert_eq!(items[0].published_at, "Mon, 01 Jan 2024 00:00:00 GMT");
        assert_eq!(items[1].title, "Admin Clerk, GS-4, Manila");
    }

    #[test]
    fn test_parse_feed_merges_content_encoded() {
        let xml = r#"<rss version="2.0"><channel><item>
            <title>Officer, P4, Geneva</title>
            <link>https://careers.who.int/job/9</link>
            <description>Short.</description>
            <content:encoded><![CDATA[Duty Station: Geneva. Grade: P4.]]></content:encoded>
        </item></channel></rss>"#;
        let items = parse_feed(xml);
        assert_eq!(items.len(), 1);
        assert_eq!(
            items[0].description,
            "Short. Duty Station: Geneva. Grade: P4."
        );
    }

    #[test]
    fn test_parse_feed_invalid_input_yields_empty() {
        assert!(parse_feed("this is not xml at all").is_empty());
        assert!(parse_feed("<html><body><p>Not an RSS feed</p></body></html>").is_empty());
        assert!(parse_feed("").is_empty());
    }

    #[test]
    fn test_validate_accepts_rss() {
        let xml = r#"<?xml version="1.0"?><rss><channel></channel></rss>"#;
        assert!(validate_feed_response(xml).is_ok());
        assert!(validate_feed_response(r#"<rss version="2.0"><channel></channel></rss>"#).is_ok());
    }

    #[test]
    fn test_validate_rejects_empty() {
        assert!(matches!(
            validate_feed_response(""),
            Err(FilterError::EmptyFeed)
        ));
        assert!(matches!(
            validate_feed_response("   \n  "),
            Err(FilterError::EmptyFeed)
        ));
    }

    #[test]
    fn test_validate_rejects_html() {
        let html = "<html><head><title>Login</title></head><body>Please log in</body></html>";
        assert!(matches!(
            validate_feed_response(html),
            Err(FilterError::HtmlResponse { .. })
        ));

        let doctype = "<!DOCTYPE html><html><body>Error</body></html>";
        assert!(matches!(
            validate_feed_response(doctype),
            Err(FilterError::HtmlResponse { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_rootless_bodies() {
        // Plain-text and JSON error pages parse as bare text events; without
        // a root element they are not a feed and must not become an empty
        // output document.
        assert!(matches!(
            validate_feed_response("Service temporarily unavailable, please try again later."),
            Err(FilterError::FeedParseError { .. })
        ));
        assert!(matches!(
            validate_feed_response(r#"{"status": "error", "message": "rate limited"}"#),
            Err(FilterError::FeedParseError { .. })
        ));
    }

    #[test]
    fn test_build_filtered_feed_keeps_only_accepted() {
        let accepted = parse_feed(SAMPLE_RSS)
            .into_iter()
            .filter(|l| l.link == "https://careers.who.int/job/1")
            .collect::<Vec<_>>();

        let rss = build_filtered_feed(SAMPLE_RSS, &accepted);
        assert!(rss.contains("Health Officer, P4, Geneva"));
        assert!(rss.contains(
            r#"<guid isPermaLink="true">https://careers.who.int/job/1</guid>"#
        ));
        assert!(rss.contains("Mon, 01 Jan 2024 00:00:00 GMT"));
        assert!(rss.contains("A P4 role in Geneva."));
        assert!(!rss.contains("Admin Clerk"));
        assert!(!rss.contains("More Jobs Available"));
        // Channel metadata carried over from the source document.
        assert!(rss.contains("WHO Jobs"));
    }

    #[test]
    fn test_build_filtered_feed_escapes_markup() {
        let mut listing = Listing::new(
            "Officer <P4> & Adviser".to_string(),
            "https://careers.who.int/job/3?a=1&b=2".to_string(),
            String::new(),
            String::new(),
        );
        listing.description = "Reports to the D1 & above".to_string();
        let rss = build_filtered_feed(SAMPLE_RSS, &[listing]);
        assert!(rss.contains("Officer &lt;P4&gt; &amp; Adviser"));
        assert!(rss.contains("a=1&amp;b=2"));
    }

    #[test]
    fn test_build_filtered_feed_invalid_original() {
        let rss = build_filtered_feed("not xml", &[]);
        assert!(rss.contains("<?xml"));
        assert!(rss.contains("<rss"));
        assert!(rss.contains(DEFAULT_CHANNEL_TITLE));
    }
}
