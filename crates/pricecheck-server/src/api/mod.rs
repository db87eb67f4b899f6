mod price_check;

use std::sync::Arc;

use axum::{
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use pricecheck_search::SearchClient;

use crate::cache::ResultCache;
use crate::middleware::request_id;
use crate::rate_limit::DailyQuota;

#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<ResultCache>,
    pub quota: Arc<DailyQuota>,
    /// `None` when no upstream credential is configured; price checks then
    /// degrade to a 503 instead of crashing the process.
    pub search: Option<Arc<SearchClient>>,
    pub resolver_client: reqwest::Client,
}

/// Failure payload: a short machine-readable kind plus a human-readable
/// message the UI renders directly.
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining: Option<u32>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: code.into(),
            message: message.into(),
            remaining: None,
        }
    }

    pub fn quota_exceeded(message: impl Into<String>) -> Self {
        Self {
            error: "quota_exceeded".to_string(),
            message: message.into(),
            remaining: Some(0),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.as_str() {
            "bad_request" => StatusCode::BAD_REQUEST,
            "not_found" => StatusCode::NOT_FOUND,
            "quota_exceeded" => StatusCode::TOO_MANY_REQUESTS,
            "upstream_unconfigured" => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

#[derive(Debug, Serialize)]
struct HealthData {
    ok: bool,
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static("x-request-id"),
        ])
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/api/price-check", post(price_check::price_check))
        .layer(axum::middleware::from_fn(request_id))
        .layer(TraceLayer::new_for_http())
        .layer(build_cors())
        .with_state(state)
}

// Root route doubles as the deploy platform's health probe.
async fn root() -> &'static str {
    "pricecheck API up"
}

async fn health() -> Json<HealthData> {
    Json(HealthData { ok: true })
}

#[cfg(test)]
mod tests {
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use chrono::{TimeZone, Utc};
    use serde_json::json;
    use tower::ServiceExt;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use pricecheck_core::{PriceCheckResult, PriceOption, PriceRange, Verdict};

    use super::*;
    use crate::clock::test_support::ManualClock;
    use crate::clock::Clock;

    fn test_state(search: Option<Arc<SearchClient>>, max_per_day: u32) -> AppState {
        let clock: Arc<dyn Clock> = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2026, 2, 25, 9, 0, 0).unwrap(),
        ));
        AppState {
            cache: Arc::new(ResultCache::new(12, Arc::clone(&clock))),
            quota: Arc::new(DailyQuota::new(max_per_day, clock)),
            search,
            resolver_client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(5))
                .build()
                .expect("resolver client"),
        }
    }

    fn search_client(base_url: &str) -> Arc<SearchClient> {
        Arc::new(SearchClient::with_base_url("test-key", 5, base_url).expect("search client"))
    }

    fn post_price_check(body: &serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/price-check")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .expect("request")
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        serde_json::from_slice(&bytes).expect("json parse")
    }

    #[tokio::test]
    async fn health_returns_ok() {
        let app = build_app(test_state(None, 3));
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["ok"], json!(true));
    }

    #[tokio::test]
    async fn request_id_header_is_echoed() {
        let app = build_app(test_state(None, 3));
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .header("x-request-id", "test-req-42")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(
            response.headers().get("x-request-id").unwrap(),
            "test-req-42"
        );
    }

    #[tokio::test]
    async fn missing_product_name_is_rejected_before_any_quota_spend() {
        let app = build_app(test_state(None, 3));

        for body in [json!({}), json!({ "productName": " x " })] {
            let response = app
                .clone()
                .oneshot(post_price_check(&body))
                .await
                .expect("response");
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            let json = body_json(response).await;
            assert_eq!(json["error"], "bad_request");
        }
    }

    #[tokio::test]
    async fn negative_user_price_is_rejected() {
        let app = build_app(test_state(None, 3));
        let response = app
            .oneshot(post_price_check(
                &json!({ "productName": "ceramic mug", "userPrice": -5.0 }),
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn missing_credential_degrades_to_503() {
        let app = build_app(test_state(None, 3));
        let response = app
            .oneshot(post_price_check(&json!({ "productName": "ceramic mug" })))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let json = body_json(response).await;
        assert_eq!(json["error"], "upstream_unconfigured");
    }

    #[tokio::test]
    async fn quota_exhaustion_returns_429_and_failed_attempts_cost_a_slot() {
        // One slot per day, no upstream configured: the first request
        // consumes the slot even though it ends in a 503.
        let app = build_app(test_state(None, 1));
        let body = json!({ "productName": "ceramic mug", "deviceId": "device-1" });

        let first = app
            .clone()
            .oneshot(post_price_check(&body))
            .await
            .expect("response");
        assert_eq!(first.status(), StatusCode::SERVICE_UNAVAILABLE);

        let second = app
            .clone()
            .oneshot(post_price_check(&body))
            .await
            .expect("response");
        assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
        let json = body_json(second).await;
        assert_eq!(json["error"], "quota_exceeded");
        assert_eq!(json["remaining"], json!(0));

        // A different device still has its own slot.
        let other = app
            .oneshot(post_price_check(
                &json!({ "productName": "ceramic mug", "deviceId": "device-2" }),
            ))
            .await
            .expect("response");
        assert_eq!(other.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn cache_hit_recomputes_verdict_for_current_user_price() {
        let state = test_state(None, 3);
        state.cache.set(
            "stanley quencher 40oz",
            PriceCheckResult {
                verdict: Verdict::Fair,
                range: PriceRange {
                    low: 19.99,
                    high: 25.0,
                },
                top_options: vec![
                    PriceOption {
                        store: "Walmart".to_string(),
                        price: 19.99,
                        note: None,
                    },
                    PriceOption {
                        store: "Target".to_string(),
                        price: 25.0,
                        note: None,
                    },
                ],
            },
        );
        let app = build_app(state);

        // Cache hit works even with no upstream configured, and the
        // verdict follows the caller's asserted price: 18 <= 19.99 * 1.05.
        let response = app
            .oneshot(post_price_check(&json!({
                "productName": "  Stanley Quencher 40oz ",
                "userPrice": 18.0,
                "deviceId": "device-1"
            })))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["cached"], json!(true));
        assert_eq!(json["verdict"], "steal");
        assert_eq!(json["remaining"], json!(2));
        assert_eq!(json["topOptions"].as_array().map(Vec::len), Some(2));
    }

    #[tokio::test]
    async fn full_price_check_flow_caches_the_second_call() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search.json"))
            .and(query_param("q", "blue ceramic mug"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&json!({
                "shopping_results": [
                    { "source": "Target", "title": "Mug", "extracted_price": 25.0 },
                    { "source": "Walmart", "title": "Mug", "extracted_price": 19.99 },
                    { "source": "RandomBlog", "title": "Mug", "extracted_price": 5.0 }
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let app = build_app(test_state(Some(search_client(&server.uri())), 3));

        let first = app
            .clone()
            .oneshot(post_price_check(
                &json!({ "productName": "blue ceramic mug", "deviceId": "device-1" }),
            ))
            .await
            .expect("response");
        assert_eq!(first.status(), StatusCode::OK);
        let json = body_json(first).await;
        assert_eq!(json["cached"], json!(false));
        assert_eq!(json["verdict"], "fair");
        assert_eq!(json["remaining"], json!(2));
        // RandomBlog is filtered out by the known-retailer list.
        let stores: Vec<&str> = json["topOptions"]
            .as_array()
            .unwrap()
            .iter()
            .map(|o| o["store"].as_str().unwrap())
            .collect();
        assert_eq!(stores, vec!["Walmart", "Target"]);
        assert_eq!(json["range"]["low"], json!(19.99));
        assert_eq!(json["range"]["high"], json!(25.0));

        // Second call with a different user price: served from cache (the
        // mock's expect(1) proves no second upstream call) with a
        // recomputed verdict.
        let second = app
            .oneshot(post_price_check(&json!({
                "productName": "blue ceramic mug",
                "userPrice": 18.0,
                "deviceId": "device-1"
            })))
            .await
            .expect("response");
        assert_eq!(second.status(), StatusCode::OK);
        let json = body_json(second).await;
        assert_eq!(json["cached"], json!(true));
        assert_eq!(json["verdict"], "steal");
        assert_eq!(json["remaining"], json!(1));
    }

    #[tokio::test]
    async fn no_surviving_listings_returns_404_and_skips_the_cache() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search.json"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(&json!({ "shopping_results": [] })),
            )
            .expect(2)
            .mount(&server)
            .await;

        let app = build_app(test_state(Some(search_client(&server.uri())), 3));
        let body = json!({ "productName": "nonexistent widget", "deviceId": "device-1" });

        for _ in 0..2 {
            let response = app
                .clone()
                .oneshot(post_price_check(&body))
                .await
                .expect("response");
            // 404 both times — a not-found outcome is never cached.
            assert_eq!(response.status(), StatusCode::NOT_FOUND);
            let json = body_json(response).await;
            assert_eq!(json["error"], "not_found");
        }
    }

    #[tokio::test]
    async fn upstream_failure_maps_to_500() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search.json"))
            .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
            .mount(&server)
            .await;

        let app = build_app(test_state(Some(search_client(&server.uri())), 3));
        let response = app
            .oneshot(post_price_check(
                &json!({ "productName": "ceramic mug", "deviceId": "device-1" }),
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(json["error"], "upstream_error");
    }

    #[tokio::test]
    async fn url_input_is_resolved_before_searching() {
        // Product page: blocked title forces the slug fallback.
        let product_site = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/item/owala-freesip-24oz-water-bottle"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("<html><head><title>Just a moment...</title></head></html>"),
            )
            .mount(&product_site)
            .await;

        let search_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search.json"))
            .and(query_param("q", "owala freesip 24oz water bottle"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&json!({
                "shopping_results": [
                    { "source": "Amazon", "title": "Owala", "extracted_price": 24.99 }
                ]
            })))
            .expect(1)
            .mount(&search_server)
            .await;

        let app = build_app(test_state(Some(search_client(&search_server.uri())), 3));
        let url = format!(
            "{}/item/owala-freesip-24oz-water-bottle",
            product_site.uri()
        );
        let response = app
            .oneshot(post_price_check(
                &json!({ "productName": url, "deviceId": "device-1" }),
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["topOptions"][0]["store"], "Amazon");
    }
}
