//! Configuration management for the Call Service
//!
//! Loads configuration from environment variables with sensible defaults.

use anyhow::{Context, Result};
use jnavi_common::policy::{
    CallPolicy, ToppingKind, CHOI_MASHI, NOODLE_FIRMNESS_TOPPING_ID, NOODLE_PREFIX,
    NOODLE_QUANTITY_TOPPING_ID,
};
use jnavi_common::ToppingId;
use std::env;
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// API server host
    pub host: String,

    /// API server port
    pub port: u16,

    /// Base URL of the REST backend (`/stores`, `/toppings/calloptions`)
    pub backend_url: String,

    /// Per-request timeout for backend calls
    pub backend_timeout_secs: u64,

    /// Topping id spoken as "麺" + firmness
    pub noodle_firmness_topping_id: ToppingId,

    /// Topping id spoken as "麺" + quantity
    pub noodle_quantity_topping_id: ToppingId,

    /// Option names implied by naming the topping alone
    pub minimal_increase_names: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if it exists (for local development)
        dotenvy::dotenv().ok();

        let config = Config {
            host: env::var("CALL_SERVICE_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),

            port: env::var("CALL_SERVICE_PORT")
                .unwrap_or_else(|_| "8090".to_string())
                .parse()
                .context("Invalid CALL_SERVICE_PORT")?,

            backend_url: env::var("BACKEND_URL")
                .unwrap_or_else(|_| "http://127.0.0.1:3000".to_string())
                .trim_end_matches('/')
                .to_string(),

            backend_timeout_secs: env::var("BACKEND_TIMEOUT_SECS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .context("Invalid BACKEND_TIMEOUT_SECS")?,

            noodle_firmness_topping_id: env::var("NOODLE_FIRMNESS_TOPPING_ID")
                .unwrap_or_else(|_| NOODLE_FIRMNESS_TOPPING_ID.to_string())
                .parse()
                .context("Invalid NOODLE_FIRMNESS_TOPPING_ID")?,

            noodle_quantity_topping_id: env::var("NOODLE_QUANTITY_TOPPING_ID")
                .unwrap_or_else(|_| NOODLE_QUANTITY_TOPPING_ID.to_string())
                .parse()
                .context("Invalid NOODLE_QUANTITY_TOPPING_ID")?,

            minimal_increase_names: parse_names(
                &env::var("MINIMAL_INCREASE_NAMES").unwrap_or_else(|_| CHOI_MASHI.to_string()),
            ),
        };

        // Validate configuration
        config.validate()?;

        Ok(config)
    }

    /// Validate configuration
    fn validate(&self) -> Result<()> {
        if self.port == 0 {
            anyhow::bail!("CALL_SERVICE_PORT must be greater than 0");
        }

        if self.backend_timeout_secs == 0 {
            anyhow::bail!("BACKEND_TIMEOUT_SECS must be greater than 0");
        }

        if self.noodle_firmness_topping_id == self.noodle_quantity_topping_id {
            anyhow::bail!("Noodle firmness and quantity toppings must differ");
        }

        if self.minimal_increase_names.is_empty() {
            anyhow::bail!("MINIMAL_INCREASE_NAMES must name at least one option");
        }

        Ok(())
    }

    /// Get the API server address
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn backend_timeout(&self) -> Duration {
        Duration::from_secs(self.backend_timeout_secs)
    }

    /// Wording policy for catalogs and call text
    pub fn call_policy(&self) -> CallPolicy {
        CallPolicy {
            noodle_toppings: vec![
                (self.noodle_firmness_topping_id, ToppingKind::NoodleFirmness),
                (self.noodle_quantity_topping_id, ToppingKind::NoodleQuantity),
            ],
            minimal_increase_names: self.minimal_increase_names.iter().cloned().collect(),
            noodle_prefix: NOODLE_PREFIX.to_string(),
        }
    }
}

fn parse_names(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}
