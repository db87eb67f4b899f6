//! Curated allow-list of known retailers used as the price authority.
//!
//! A store name matches when it equals an entry case-insensitively, or when
//! it contains an entry of four or more characters as a whole word. The
//! word-boundary requirement keeps short names from matching inside
//! unrelated ones ("Cross Courtage" must not match "ross").

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

/// Retailers treated as authoritative for price comparison.
pub const KNOWN_RETAILERS: &[&str] = &[
    // Department stores
    "amazon",
    "walmart",
    "target",
    "nordstrom",
    "macys",
    "macy's",
    "bloomingdales",
    "bloomingdale's",
    "jcpenney",
    "neiman marcus",
    "saks fifth avenue",
    "marshalls",
    "tj maxx",
    "tjmaxx",
    "ross",
    "burlington",
    "kohls",
    "kohl's",
    // Beauty
    "sephora",
    "sephora.com",
    "ulta",
    "ulta beauty",
    "glossier",
    "fenty beauty",
    "nars cosmetics",
    "mac cosmetics",
    "clinique",
    "estee lauder",
    "bobbi brown",
    "charlotte tilbury",
    "rare beauty",
    "too faced",
    "urban decay",
    "benefit cosmetics",
    "tarte",
    // Fashion
    "nike",
    "adidas",
    "lululemon",
    "gap",
    "old navy",
    "zara",
    "h&m",
    "anthropologie",
    "free people",
    "urban outfitters",
    "asos",
    "revolve",
    "ssense",
    "farfetch",
    "net-a-porter",
    "shein",
    "temu",
    "uniqlo",
    "mango",
    "cos stores",
    "everlane",
    "abercrombie",
    // Luxury
    "coach",
    "coachoutlet.com",
    "kate spade",
    "michael kors",
    "tory burch",
    "gucci",
    "louis vuitton",
    "prada",
    "burberry",
    "harrods",
    "selfridges",
    "selfridges.com",
    // Electronics
    "best buy",
    "b&h photo",
    "apple",
    "samsung",
    "sony",
    "dell",
    "hp",
    "lenovo",
    "microsoft",
    "gamestop",
    // Home
    "wayfair",
    "home depot",
    "lowes",
    "ikea",
    "williams sonoma",
    "pottery barn",
    "crate & barrel",
    "west elm",
    "cb2",
    // Shoes / sports
    "zappos",
    "footlocker",
    "finish line",
    "dick's sporting goods",
    "rei",
    "nike.com",
    "adidas.com",
    // Pets
    "petco",
    "petsmart",
    "chewy",
    // Marketplace / resale
    "ebay",
    "etsy",
    "poshmark",
    "mercari",
    "depop",
    // Grocery / drugstore
    "walgreens",
    "cvs",
    "costco",
    "sam's club",
    // Catch-all for brand official stores
    "overstock",
    "qvc",
    "hsn",
    "bath & body works",
    "victoria's secret",
    "dyson",
    "dyson.com",
    "dollar tree",
    "five below",
];

static EXACT: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| KNOWN_RETAILERS.iter().copied().collect());

// Single precompiled alternation over names long enough for a whole-word
// scan (length >= 4). Short names like "gap" or "cvs" still match exactly.
static WORD_SCAN: LazyLock<Regex> = LazyLock::new(|| {
    let alternation = KNOWN_RETAILERS
        .iter()
        .filter(|name| name.len() >= 4)
        .map(|name| regex::escape(name))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)\b(?:{alternation})\b")).expect("valid retailer alternation")
});

/// Returns `true` when the store name is, or contains as a whole word, a
/// known retailer.
#[must_use]
pub fn is_known_retailer(store: &str) -> bool {
    let lowered = store.trim().to_lowercase();
    if EXACT.contains(lowered.as_str()) {
        return true;
    }
    WORD_SCAN.is_match(store)
}

#[cfg(test)]
#[path = "retailers_test.rs"]
mod tests;
