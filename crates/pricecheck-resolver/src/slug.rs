//! URL-slug fallback for product-name resolution.
//!
//! No HTTP request needed: picks the most descriptive path segment and
//! cleans it into words. Used when the page-title fetch fails or is
//! blocked.

use reqwest::Url;

const MAX_SLUG_NAME_LEN: usize = 80;

// Path tokens that never carry the product name.
const SKIP_SEGMENTS: &[&str] = &[
    "products", "product", "p", "dp", "item", "items", "shop", "store", "buy", "detail",
    "details", "pd", "ip",
];

/// Extracts a product name from the URL path.
///
/// Drops known non-product segments and segments of three characters or
/// fewer, then keeps the longest remaining segment on the assumption that
/// the longest slug is the most descriptive. Returns `None` for malformed
/// URLs or when no candidate segment survives.
#[must_use]
pub fn extract_name_from_url(raw: &str) -> Option<String> {
    let url = Url::parse(raw).ok()?;
    let segments: Vec<&str> = url.path_segments()?.filter(|s| !s.is_empty()).collect();

    let slug = segments
        .into_iter()
        .filter(|s| !SKIP_SEGMENTS.contains(&s.to_lowercase().as_str()) && s.len() > 3)
        .max_by(|a, b| match a.len().cmp(&b.len()) {
            // First-seen wins ties, so reverse the comparison for equals.
            std::cmp::Ordering::Equal => std::cmp::Ordering::Greater,
            other => other,
        })?;

    let cleaned = clean_slug(slug);
    (!cleaned.is_empty()).then(|| crate::truncate(&cleaned, MAX_SLUG_NAME_LEN))
}

/// Separator runs become spaces, everything non-alphanumeric is stripped,
/// whitespace is collapsed.
fn clean_slug(slug: &str) -> String {
    let spaced: String = slug
        .chars()
        .map(|c| if c == '-' || c == '_' { ' ' } else { c })
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == ' ' {
                c
            } else {
                ' '
            }
        })
        .collect();
    spaced.split_whitespace().collect::<Vec<_>>().join(" ")
}
