//! Product-name resolution.
//!
//! Turns a raw user input (a product URL or free text) into a search-ready
//! product name. URL inputs are resolved by fetching the page `<title>`
//! first, falling back to a slug heuristic on the URL path. Fetch failures
//! are recovered locally and never surfaced to the caller.

pub mod slug;
pub mod title;

use reqwest::Url;

const MAX_NAME_LEN: usize = 120;

/// Resolves a raw input into a product name suitable for shopping search.
///
/// Free-text inputs are cleaned and truncated. URL inputs go through the
/// page-title fetch, then the slug heuristic. Returns `None` when no
/// candidate name can be produced.
pub async fn resolve(client: &reqwest::Client, raw_input: &str) -> Option<String> {
    let trimmed = raw_input.trim();
    if trimmed.is_empty() {
        return None;
    }

    if !is_http_url(trimmed) {
        let cleaned = collapse_whitespace(trimmed);
        return (!cleaned.is_empty()).then(|| truncate(&cleaned, MAX_NAME_LEN));
    }

    if let Some(name) = title::fetch_page_title(client, trimmed).await {
        return Some(name);
    }
    slug::extract_name_from_url(trimmed)
}

fn is_http_url(input: &str) -> bool {
    Url::parse(input)
        .map(|u| matches!(u.scheme(), "http" | "https"))
        .unwrap_or(false)
}

fn collapse_whitespace(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Truncates on a char boundary at or below `max` bytes.
pub(crate) fn truncate(input: &str, max: usize) -> String {
    if input.len() <= max {
        return input.to_string();
    }
    let mut end = max;
    while !input.is_char_boundary(end) {
        end -= 1;
    }
    input[..end].trim_end().to_string()
}
