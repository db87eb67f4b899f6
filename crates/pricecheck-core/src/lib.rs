pub mod app_config;
mod config;
pub mod retailers;
pub mod types;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use types::{
    round_cents, PriceCheckResult, PriceNote, PriceOption, PriceRange, RawListing, Verdict,
    MAX_SANE_PRICE, MAX_TOP_OPTIONS,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
