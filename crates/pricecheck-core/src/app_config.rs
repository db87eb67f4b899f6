use std::net::SocketAddr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub serpapi_key: Option<String>,
    pub max_checks_per_day: u32,
    pub cache_ttl_hours: u64,
    pub resolver_timeout_secs: u64,
    pub search_timeout_secs: u64,
    pub user_agent: String,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field(
                "serpapi_key",
                &self.serpapi_key.as_ref().map(|_| "[redacted]"),
            )
            .field("max_checks_per_day", &self.max_checks_per_day)
            .field("cache_ttl_hours", &self.cache_ttl_hours)
            .field("resolver_timeout_secs", &self.resolver_timeout_secs)
            .field("search_timeout_secs", &self.search_timeout_secs)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}
