//! The price-check request orchestrator.
//!
//! One request walks: Validate → RateCheck → CacheLookup → [ResolveName]
//! → Search → Normalize → CacheWrite → Respond. The quota slot is charged
//! exactly once per request, right after validation, whether or not the
//! downstream steps succeed.

use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};

use pricecheck_core::{PriceOption, PriceRange, Verdict};
use pricecheck_search::{compute_verdict, normalize};

use crate::cache::ResultCache;
use crate::middleware::RequestId;

use super::{ApiError, AppState};

const MAX_NAME_LEN: usize = 120;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct PriceCheckRequest {
    #[serde(default)]
    product_name: Option<String>,
    #[serde(default)]
    user_price: Option<f64>,
    #[serde(default)]
    device_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct PriceCheckResponse {
    verdict: Verdict,
    range: PriceRange,
    top_options: Vec<PriceOption>,
    remaining: u32,
    cached: bool,
}

pub(super) async fn price_check(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<PriceCheckRequest>,
) -> Result<Json<PriceCheckResponse>, ApiError> {
    // Validate — fail fast before spending quota or upstream calls.
    let raw_name = body.product_name.unwrap_or_default();
    let trimmed = raw_name.trim();
    if trimmed.chars().count() < 2 {
        return Err(ApiError::new("bad_request", "Missing product name"));
    }
    let clean_name = truncate(trimmed, MAX_NAME_LEN);

    let user_price = match body.user_price {
        Some(p) if !p.is_finite() || p < 0.0 => {
            return Err(ApiError::new("bad_request", "Invalid price"));
        }
        Some(p) if p > 0.0 => Some(p),
        _ => None,
    };

    let client_id = body
        .device_id
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| "unknown".to_string());

    tracing::info!(
        request_id = %req_id.0,
        product = %clean_name,
        user_price = ?user_price,
        client_id = %client_id,
        "price check requested"
    );

    // RateCheck — the attempt costs a slot regardless of what follows.
    let decision = state.quota.check_and_consume(&client_id);
    if !decision.allowed {
        return Err(ApiError::quota_exceeded(format!(
            "You have used all {} price checks today. Come back tomorrow!",
            state.quota.max_per_day()
        )));
    }

    // CacheLookup — the cached price list is reused, but the verdict is
    // recomputed against the current user price so it is never stale.
    let cache_key = ResultCache::normalize_key(&clean_name);
    if let Some(cached) = state.cache.get(&cache_key) {
        let verdict = compute_verdict(&cached.top_options, user_price);
        return Ok(Json(PriceCheckResponse {
            verdict,
            range: cached.range,
            top_options: cached.top_options,
            remaining: decision.remaining,
            cached: true,
        }));
    }

    let Some(search) = state.search.as_ref() else {
        return Err(ApiError::new(
            "upstream_unconfigured",
            "Price search is not configured. Add a SerpAPI key to the environment.",
        ));
    };

    // ResolveName — URLs become product names; plain text passes through
    // cleaned. Unresolvable input is a client error, not an upstream one.
    let Some(search_name) = pricecheck_resolver::resolve(&state.resolver_client, &clean_name).await
    else {
        return Err(ApiError::new(
            "bad_request",
            "Could not determine a product name from that input",
        ));
    };

    let listings = search.search(&search_name).await.map_err(|e| {
        tracing::error!(request_id = %req_id.0, error = %e, "shopping search failed");
        ApiError::new("upstream_error", "Price search failed. Try again in a bit.")
    })?;

    // Normalize — an empty outcome is a valid result, surfaced as 404 and
    // never written to the cache.
    let Some(result) = normalize(&listings, user_price) else {
        return Err(ApiError::new(
            "not_found",
            format!("No comparison prices found for \"{search_name}\""),
        ));
    };

    state.cache.set(&cache_key, result.clone());

    Ok(Json(PriceCheckResponse {
        verdict: result.verdict,
        range: result.range,
        top_options: result.top_options,
        remaining: decision.remaining,
        cached: false,
    }))
}

fn truncate(input: &str, max: usize) -> String {
    if input.len() <= max {
        return input.to_string();
    }
    let mut end = max;
    while !input.is_char_boundary(end) {
        end -= 1;
    }
    input[..end].trim_end().to_string()
}
