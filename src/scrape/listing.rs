//! Theme listing pages: URL composition and post-link extraction.

use scraper::{Html, Selector};
use tracing::debug;
use url::Url;

use crate::error::{HarvestError, Result};

/// Anchor carrying a post link on the theme listing page.
const POST_LINK_SELECTOR: &str = "a.desc_inner";

/// Compose the listing URL for one page of a theme directory.
pub fn listing_url(
    base_url: &str,
    directory_no: u32,
    active_directory_seq: u32,
    page: u32,
) -> Result<String> {
    let mut url = Url::parse(base_url)
        .map_err(|e| HarvestError::Configuration(format!("base URL {base_url}: {e}")))?;
    url.set_path("/ThemePost.naver");
    url.query_pairs_mut()
        .append_pair("directoryNo", &directory_no.to_string())
        .append_pair("activeDirectorySeq", &active_directory_seq.to_string())
        .append_pair("currentPage", &page.to_string());
    Ok(url.to_string())
}

/// Extract post URLs from a listing page, resolved against `base_url`.
/// Anchors without an href are skipped.
pub fn extract_post_links(html: &str, base_url: &str) -> Result<Vec<String>> {
    let selector = Selector::parse(POST_LINK_SELECTOR)
        .map_err(|e| HarvestError::Parse(format!("selector {POST_LINK_SELECTOR}: {e}")))?;
    let base = Url::parse(base_url)
        .map_err(|e| HarvestError::Configuration(format!("base URL {base_url}: {e}")))?;

    let document = Html::parse_document(html);
    let mut links = Vec::new();
    for anchor in document.select(&selector) {
        match anchor.value().attr("href") {
            Some(href) => match base.join(href) {
                Ok(resolved) => links.push(resolved.to_string()),
                Err(e) => debug!("Skipping unresolvable href {}: {}", href, e),
            },
            None => debug!("Skipping post anchor without href"),
        }
    }
    Ok(links)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn listing_url_carries_directory_and_page() {
        let url = listing_url("https://section.blog.example.com", 27, 3, 2).unwrap();
        assert_eq!(
            url,
            "https://section.blog.example.com/ThemePost.naver?directoryNo=27&activeDirectorySeq=3&currentPage=2"
        );
    }

    #[test]
    fn listing_url_rejects_garbage_base() {
        assert!(listing_url("not a url", 27, 3, 1).is_err());
    }

    #[test]
    fn extracts_absolute_and_relative_links() {
        let html = r#"
            <html><body>
              <a class="desc_inner" href="https://blog.example.com/alice/1">a</a>
              <a class="desc_inner" href="/bob/2">b</a>
              <a class="other" href="https://blog.example.com/ignored">c</a>
              <a class="desc_inner">no href</a>
            </body></html>
        "#;

        let links = extract_post_links(html, "https://section.blog.example.com").unwrap();
        assert_eq!(
            links,
            vec![
                "https://blog.example.com/alice/1".to_string(),
                "https://section.blog.example.com/bob/2".to_string(),
            ]
        );
    }

    #[test]
    fn empty_page_yields_no_links() {
        let links = extract_post_links("<html></html>", "https://example.com").unwrap();
        assert!(links.is_empty());
    }
}
