//! Domain types shared across the price-check pipeline.

use serde::{Deserialize, Serialize};

/// Maximum number of price options returned to the caller.
pub const MAX_TOP_OPTIONS: usize = 5;

/// Upper sanity bound on a listing price; anything above this is treated as
/// parsing garbage and discarded.
pub const MAX_SANE_PRICE: f64 = 50_000.0;

/// Rounds a price to two decimal places.
#[must_use]
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Categorical judgment comparing an asserted price to market data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Steal,
    Fair,
    Overpriced,
}

/// Short badge attached to a price option, classified from retailer
/// extension text. Not guaranteed present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriceNote {
    #[serde(rename = "free shipping")]
    FreeShipping,
    #[serde(rename = "on sale")]
    OnSale,
    #[serde(rename = "clearance")]
    Clearance,
}

/// One retailer's price for the product. At most one per store (the
/// cheapest observed); lists of options are always price-ascending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceOption {
    pub store: String,
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<PriceNote>,
}

/// Min/max over the kept price options, cents-rounded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    pub low: f64,
    pub high: f64,
}

/// The outcome of a successful price check.
///
/// `top_options` is never empty — "no comparable prices" is signalled by the
/// normalizer returning `None`, not by an empty list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceCheckResult {
    pub verdict: Verdict,
    pub range: PriceRange,
    pub top_options: Vec<PriceOption>,
}

/// One raw shopping-search listing before normalization. Transient;
/// discarded once a [`PriceCheckResult`] is built.
#[derive(Debug, Clone)]
pub struct RawListing {
    pub store: String,
    pub title: String,
    pub extracted_price: Option<f64>,
    pub raw_price_text: Option<String>,
    pub extensions: Vec<String>,
}
