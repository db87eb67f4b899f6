//! Page-title fetch strategy for product-name resolution.
//!
//! Regex-based `<title>` extraction is a pragmatic heuristic, not a full
//! HTML parser; it stays isolated here so it can be swapped for a proper
//! parser without touching callers.

use std::sync::LazyLock;

use regex::Regex;

static TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<title[^>]*>([^<]+)</title>").expect("valid title regex"));

// Retailer site-name suffixes like " - Amazon.com" or " | Walmart".
static RETAILER_SUFFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\s*[-|]+\s*(Amazon|Walmart|Target|eBay|Best Buy|Nordstrom|Coach|Sephora|Ulta).*$",
    )
    .expect("valid suffix regex")
});

// Titles containing these markers are bot-block or error pages, not
// product names.
const BAD_TITLE_MARKERS: &[&str] = &[
    "access denied",
    "403",
    "404",
    "not found",
    "error",
    "just a moment",
];

const MAX_TITLE_LEN: usize = 120;

/// Fetches the page at `url` and extracts a cleaned `<title>` text.
///
/// Returns `None` on any failure: network error, non-2xx status, missing
/// title tag, or a title that looks like an error page. The caller falls
/// back to the URL-slug heuristic, so failures here are logged at debug
/// and swallowed.
pub async fn fetch_page_title(client: &reqwest::Client, url: &str) -> Option<String> {
    let response = match client.get(url).send().await {
        Ok(resp) => resp,
        Err(err) => {
            tracing::debug!(url, error = %err, "page title fetch skipped");
            return None;
        }
    };
    if !response.status().is_success() {
        tracing::debug!(url, status = %response.status(), "page title fetch returned non-2xx");
        return None;
    }
    let html = response.text().await.ok()?;
    extract_title(&html)
}

/// Pulls the `<title>` text out of an HTML document and cleans it.
fn extract_title(html: &str) -> Option<String> {
    let raw = TITLE_RE.captures(html)?.get(1)?.as_str();
    let stripped = RETAILER_SUFFIX_RE.replace(raw, "");
    let title = crate::truncate(unescape_entities(stripped.trim()).trim(), MAX_TITLE_LEN);

    if title.is_empty() {
        return None;
    }
    let lowered = title.to_lowercase();
    if BAD_TITLE_MARKERS.iter().any(|m| lowered.contains(m)) {
        return None;
    }
    Some(title)
}

fn unescape_entities(input: &str) -> String {
    input
        .replace("&amp;", "&")
        .replace("&#39;", "'")
        .replace("&quot;", "\"")
}
