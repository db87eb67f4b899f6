mod api;
mod cache;
mod clock;
mod middleware;
mod rate_limit;
mod scheduler;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::api::{build_app, AppState};
use crate::cache::ResultCache;
use crate::clock::{Clock, SystemClock};
use crate::rate_limit::DailyQuota;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = pricecheck_core::load_app_config_from_env()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let cache = Arc::new(ResultCache::new(config.cache_ttl_hours, Arc::clone(&clock)));
    let quota = Arc::new(DailyQuota::new(config.max_checks_per_day, clock));

    let search = match config.serpapi_key.as_deref() {
        Some(key) => Some(Arc::new(pricecheck_search::SearchClient::new(
            key,
            config.search_timeout_secs,
        )?)),
        None => {
            tracing::warn!("SERPAPI_KEY is not set; price checks will answer 503");
            None
        }
    };

    let resolver_client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(config.resolver_timeout_secs))
        .user_agent(config.user_agent.clone())
        .build()?;

    let _scheduler = scheduler::build_scheduler(Arc::clone(&cache), Arc::clone(&quota)).await?;

    let app = build_app(AppState {
        cache,
        quota,
        search,
        resolver_client,
    });

    tracing::info!(
        bind_addr = %config.bind_addr,
        env = %config.env,
        max_checks_per_day = config.max_checks_per_day,
        cache_ttl_hours = config.cache_ttl_hours,
        "starting pricecheck server"
    );

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
