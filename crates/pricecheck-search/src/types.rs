//! Wire types for the shopping-search API response.

use pricecheck_core::RawListing;
use serde::Deserialize;

/// Top-level search response envelope. Only `shopping_results` is read;
/// everything else the API sends is ignored.
#[derive(Debug, Deserialize)]
pub struct ShoppingSearchResponse {
    #[serde(default)]
    pub shopping_results: Vec<ShoppingResultItem>,
}

/// One raw result row. Fields are heterogeneous across retailers: the
/// pre-parsed `extracted_price` may be absent while a display string like
/// `"$24.99"` is present, or vice versa.
#[derive(Debug, Deserialize)]
pub struct ShoppingResultItem {
    pub source: Option<String>,
    pub title: Option<String>,
    pub extracted_price: Option<f64>,
    pub price: Option<String>,
    #[serde(default)]
    pub extensions: Vec<String>,
}

impl From<ShoppingResultItem> for RawListing {
    fn from(item: ShoppingResultItem) -> Self {
        RawListing {
            store: item.source.unwrap_or_else(|| "Unknown".to_string()),
            title: item.title.unwrap_or_default(),
            extracted_price: item.extracted_price,
            raw_price_text: item.price,
            extensions: item.extensions,
        }
    }
}
