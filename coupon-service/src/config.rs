use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct CouponConfig {
    pub shop_domain: String,
    pub admin_token: String,
    pub api_version: String,
    pub lookup_timeout: Duration,
    pub allowed_origins: Vec<String>,
}

impl CouponConfig {
    /// Credentials are required up front so a misconfigured deployment fails
    /// at startup instead of surfacing per-request lookup failures.
    pub fn from_env() -> Result<Self> {
        let shop_domain = env::var("SHOP_NAME").context("SHOP_NAME must be set")?;
        let admin_token =
            env::var("SHOPIFY_ACCESS_TOKEN").context("SHOPIFY_ACCESS_TOKEN must be set")?;
        let api_version =
            env::var("SHOPIFY_API_VERSION").unwrap_or_else(|_| "2025-10".to_string());
        let lookup_timeout_secs = env::var("RULE_LOOKUP_TIMEOUT_SECONDS")
            .ok()
            .and_then(|value| value.parse::<u64>().ok())
            .unwrap_or(10);
        let allowed_origins = env::var("ALLOWED_ORIGINS")
            .map(|value| {
                value
                    .split(',')
                    .map(|origin| origin.trim().to_string())
                    .filter(|origin| !origin.is_empty())
                    .collect::<Vec<_>>()
            })
            .unwrap_or_else(|_| vec!["http://localhost:3000".to_string()]);

        Ok(Self {
            shop_domain,
            admin_token,
            api_version,
            lookup_timeout: Duration::from_secs(lookup_timeout_secs.max(1)),
            allowed_origins,
        })
    }

    pub fn admin_base_url(&self) -> String {
        format!("https://{}", self.shop_domain)
    }
}
