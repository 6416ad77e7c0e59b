//! Post pages: title and body extraction.
//!
//! The blog platform renders the article inside a `mainFrame` iframe; the
//! outer document only carries the `<title>`. Parse functions are sync and
//! take the raw HTML so no parsed document is held across an await.

use scraper::{Html, Selector};
use serde::Serialize;
use url::Url;

use crate::error::{HarvestError, Result};

/// Spans holding article text inside the frame document.
const BODY_SPAN_SELECTOR: &str = "p span.se-fs-";
const MAIN_FRAME_SELECTOR: &str = "iframe#mainFrame";

/// Placeholder body for posts whose article text cannot be located.
pub const NO_CONTENT_PLACEHOLDER: &str = "No content found";

/// One scraped post, as exported.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct PostRecord {
    pub title: String,
    pub content: String,
}

fn selector(css: &'static str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| HarvestError::Parse(format!("selector {css}: {e}")))
}

/// Text of the document's `<title>`, trimmed. Missing titles are a parse
/// failure: the page did not render.
pub fn extract_title(html: &str) -> Result<String> {
    let sel = selector("title")?;
    let document = Html::parse_document(html);
    let title = document
        .select(&sel)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .ok_or_else(|| HarvestError::Parse("document has no <title>".to_string()))?;
    Ok(title)
}

/// The article frame URL, if the post document embeds one, resolved against
/// the post URL.
pub fn extract_frame_url(html: &str, post_url: &str) -> Result<Option<String>> {
    let sel = selector(MAIN_FRAME_SELECTOR)?;
    let base = Url::parse(post_url)
        .map_err(|e| HarvestError::Parse(format!("post URL {post_url}: {e}")))?;

    let document = Html::parse_document(html);
    let Some(src) = document
        .select(&sel)
        .next()
        .and_then(|frame| frame.value().attr("src"))
    else {
        return Ok(None);
    };

    let resolved = base
        .join(src)
        .map_err(|e| HarvestError::Parse(format!("frame src {src}: {e}")))?;
    Ok(Some(resolved.to_string()))
}

/// Article body: the text of every matching span, one paragraph per line.
/// An article with no matching spans is not an error; it gets the
/// placeholder, matching how sparse or delisted posts behave.
pub fn extract_body(html: &str) -> Result<String> {
    let sel = selector(BODY_SPAN_SELECTOR)?;
    let document = Html::parse_document(html);

    let paragraphs: Vec<String> = document
        .select(&sel)
        .map(|span| span.text().collect::<String>())
        .filter(|text| !text.trim().is_empty())
        .collect();

    let body = paragraphs.join("\n").trim().to_string();
    if body.is_empty() {
        Ok(NO_CONTENT_PLACEHOLDER.to_string())
    } else {
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn title_is_trimmed_text() {
        let html = "<html><head><title>  My Post </title></head><body></body></html>";
        assert_eq!(extract_title(html).unwrap(), "My Post");
    }

    #[test]
    fn missing_title_is_a_parse_error() {
        let err = extract_title("<html><body></body></html>").unwrap_err();
        assert!(matches!(err, HarvestError::Parse(_)));
    }

    #[test]
    fn frame_url_resolves_relative_src() {
        let html = r#"<html><body><iframe id="mainFrame" src="/PostView.naver?blogId=alice&logNo=1"></iframe></body></html>"#;
        let frame = extract_frame_url(html, "https://blog.example.com/alice/1").unwrap();
        assert_eq!(
            frame.as_deref(),
            Some("https://blog.example.com/PostView.naver?blogId=alice&logNo=1")
        );
    }

    #[test]
    fn document_without_frame_yields_none() {
        let frame = extract_frame_url("<html><body></body></html>", "https://b.example.com/p")
            .unwrap();
        assert!(frame.is_none());
    }

    #[test]
    fn body_joins_spans_with_newlines() {
        let html = r#"
            <html><body>
              <p><span class="se-fs-">first paragraph</span></p>
              <p><span class="se-fs-">second paragraph</span></p>
              <p><span class="other">ignored</span></p>
            </body></html>
        "#;
        assert_eq!(
            extract_body(html).unwrap(),
            "first paragraph\nsecond paragraph"
        );
    }

    #[test]
    fn empty_body_gets_placeholder() {
        let html = r#"<html><body><p><span class="se-fs-">   </span></p></body></html>"#;
        assert_eq!(extract_body(html).unwrap(), NO_CONTENT_PLACEHOLDER);
    }
}
