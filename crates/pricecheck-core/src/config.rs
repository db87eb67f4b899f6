use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if values are present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if values are present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual environment
/// so it can be tested with a pure `HashMap` lookup — no `set_var`/`remove_var` needed.
///
/// The upstream credential (`SERPAPI_KEY`) is deliberately optional: a missing
/// key degrades price checks to a 503 response rather than failing startup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let env = parse_environment(&or_default("PRICECHECK_ENV", "development"))?;
    let bind_addr = parse_addr("PRICECHECK_BIND_ADDR", "0.0.0.0:3456")?;
    let log_level = or_default("PRICECHECK_LOG_LEVEL", "info");
    let serpapi_key = lookup("SERPAPI_KEY").ok().filter(|k| !k.trim().is_empty());

    let max_checks_per_day = parse_u32("MAX_CHECKS_PER_USER_PER_DAY", "3")?;
    let cache_ttl_hours = parse_u64("CACHE_TTL_HOURS", "12")?;
    let resolver_timeout_secs = parse_u64("PRICECHECK_RESOLVER_TIMEOUT_SECS", "6")?;
    let search_timeout_secs = parse_u64("PRICECHECK_SEARCH_TIMEOUT_SECS", "10")?;
    let user_agent = or_default(
        "PRICECHECK_USER_AGENT",
        "Mozilla/5.0 (compatible; PriceCheckBot/1.0)",
    );

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        serpapi_key,
        max_checks_per_day,
        cache_ttl_hours,
        resolver_timeout_secs,
        search_timeout_secs,
        user_agent,
    })
}

fn parse_environment(raw: &str) -> Result<Environment, ConfigError> {
    match raw {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "PRICECHECK_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
