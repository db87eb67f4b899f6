//! Normalization from raw shopping listings to a [`PriceCheckResult`],
//! including the verdict rules.
//!
//! The pipeline: price extraction and sanity bounds, trusted-retailer
//! filter, per-store dedup (cheapest kept), ascending rank capped at five,
//! then the steal/fair/overpriced verdict.

use std::collections::HashMap;

use pricecheck_core::{
    retailers, round_cents, PriceCheckResult, PriceNote, PriceOption, PriceRange, RawListing,
    Verdict, MAX_SANE_PRICE, MAX_TOP_OPTIONS,
};

/// Normalizes raw listings into a [`PriceCheckResult`].
///
/// Returns `None` when no listing survives price extraction — the caller
/// reports that as a "no prices found" outcome, never as an empty result.
#[must_use]
pub fn normalize(listings: &[RawListing], user_price: Option<f64>) -> Option<PriceCheckResult> {
    let options: Vec<PriceOption> = listings
        .iter()
        .filter_map(|listing| {
            let price = extract_price(listing)?;
            Some(PriceOption {
                store: listing.store.clone(),
                price,
                note: extract_note(&listing.extensions),
            })
        })
        .collect();

    if options.is_empty() {
        return None;
    }

    // Known retailers are the price authority when present; when none
    // match, showing unfamiliar retailers beats showing nothing.
    let known: Vec<PriceOption> = options
        .iter()
        .filter(|o| retailers::is_known_retailer(&o.store))
        .cloned()
        .collect();
    let filtered = if known.is_empty() { options } else { known };

    // Dedup by store, keeping the cheapest offer per store.
    let mut by_store: HashMap<String, PriceOption> = HashMap::new();
    for opt in filtered {
        match by_store.get(&opt.store) {
            Some(existing) if existing.price <= opt.price => {}
            _ => {
                by_store.insert(opt.store.clone(), opt);
            }
        }
    }

    let mut top_options: Vec<PriceOption> = by_store.into_values().collect();
    top_options.sort_by(|a, b| a.price.total_cmp(&b.price));
    top_options.truncate(MAX_TOP_OPTIONS);

    // Round to cents before computing range and verdict so that a verdict
    // recomputed later from the stored options sees identical numbers.
    for opt in &mut top_options {
        opt.price = round_cents(opt.price);
    }

    let range = PriceRange {
        low: top_options[0].price,
        high: top_options[top_options.len() - 1].price,
    };
    let verdict = compute_verdict(&top_options, user_price);

    Some(PriceCheckResult {
        verdict,
        range,
        top_options,
    })
}

/// Computes the verdict for a ranked, capped option list.
///
/// Public so the orchestrator can recompute a cached result's verdict
/// against the current user price; the cached price list is reused but the
/// verdict is never stale.
///
/// With a positive user price: steal at or below 105% of the cheapest
/// option, overpriced at or above 115% of the median (lower-middle index
/// for even counts — a deliberate tie-break, not an average). Without one,
/// the listing spread itself decides, with an absolute-gap guard so a tiny
/// range cannot read as overpriced.
#[must_use]
pub fn compute_verdict(top_options: &[PriceOption], user_price: Option<f64>) -> Verdict {
    let Some(cheapest) = top_options.first().map(|o| o.price) else {
        return Verdict::Fair;
    };
    let low = cheapest;
    let high = top_options[top_options.len() - 1].price;
    let median = top_options[top_options.len() / 2].price;

    match user_price {
        Some(price) if price > 0.0 => {
            if price <= cheapest * 1.05 {
                Verdict::Steal
            } else if price >= median * 1.15 {
                Verdict::Overpriced
            } else {
                Verdict::Fair
            }
        }
        _ => {
            if cheapest <= high * 0.6 {
                Verdict::Steal
            } else if cheapest >= high * 0.92 && high - low > 5.0 {
                Verdict::Overpriced
            } else {
                Verdict::Fair
            }
        }
    }
}

/// Extracts a usable price: the pre-parsed field when present, otherwise
/// the display text with everything non-numeric stripped. Prices outside
/// `(0, 50 000]` are parsing garbage and discarded.
fn extract_price(listing: &RawListing) -> Option<f64> {
    let price = listing.extracted_price.or_else(|| {
        let text = listing.raw_price_text.as_deref()?;
        let digits: String = text.chars().filter(|c| c.is_ascii_digit() || *c == '.').collect();
        digits.parse::<f64>().ok()
    })?;

    (price > 0.0 && price <= MAX_SANE_PRICE).then_some(price)
}

/// Classifies free-form badge text into a short note.
fn extract_note(extensions: &[String]) -> Option<PriceNote> {
    if extensions.is_empty() {
        return None;
    }
    let joined = extensions.join(" ").to_lowercase();
    if joined.contains("free shipping") || joined.contains("free delivery") {
        Some(PriceNote::FreeShipping)
    } else if joined.contains("sale") || joined.contains("% off") {
        Some(PriceNote::OnSale)
    } else if joined.contains("clearance") {
        Some(PriceNote::Clearance)
    } else {
        None
    }
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
