use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::debug;

use crate::config::CouponConfig;
use crate::rule::{normalize, DiscountCodeLookup, DiscountRule, PriceRuleDoc};

/// Outcome of a code lookup. `NotFound` is an authoritative negative answer;
/// inconclusive failures surface as `ProviderError` instead.
#[derive(Debug)]
pub enum RuleLookup {
    Found(DiscountRule),
    NotFound,
}

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("rule provider request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("rule provider returned status {status}: {body}")]
    Upstream { status: u16, body: String },
    #[error("rule provider returned malformed payload: {0}")]
    MalformedResponse(String),
}

impl ProviderError {
    /// Stable low-cardinality label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            ProviderError::Http(_) => "http",
            ProviderError::Upstream { .. } => "upstream_status",
            ProviderError::MalformedResponse(_) => "malformed_response",
        }
    }
}

/// Capability the evaluation pipeline depends on. Production wires in
/// `ShopifyRuleProvider`; tests substitute a fixture.
#[async_trait]
pub trait RuleProvider: Send + Sync {
    async fn lookup_rule(&self, code: &str) -> Result<RuleLookup, ProviderError>;
}

pub struct ShopifyRuleProvider {
    client: Client,
    base_url: String,
    token: String,
    api_version: String,
}

impl ShopifyRuleProvider {
    pub fn new(client: Client, base_url: String, token: String, api_version: String) -> Self {
        Self { client, base_url, token, api_version }
    }

    pub fn from_config(config: &CouponConfig) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(config.lookup_timeout).build()?;
        Ok(Self::new(
            client,
            config.admin_base_url(),
            config.admin_token.clone(),
            config.api_version.clone(),
        ))
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<Option<T>, ProviderError> {
        let resp = self
            .client
            .get(url)
            .query(query)
            .header("X-Shopify-Access-Token", &self.token)
            .header("Content-Type", "application/json")
            .send()
            .await?;
        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ProviderError::Upstream {
                status: status.as_u16(),
                body: truncate_body(body),
            });
        }
        let parsed = resp
            .json::<T>()
            .await
            .map_err(|e| ProviderError::MalformedResponse(e.to_string()))?;
        Ok(Some(parsed))
    }
}

#[async_trait]
impl RuleProvider for ShopifyRuleProvider {
    /// Two sequential lookups: code string to rule reference, then reference
    /// to the full price rule. Callers only ever see the merged result.
    async fn lookup_rule(&self, code: &str) -> Result<RuleLookup, ProviderError> {
        let lookup_url = format!(
            "{}/admin/api/{}/discount_codes/lookup.json",
            self.base_url, self.api_version
        );
        // Shopify answers the lookup via redirect; reqwest follows it.
        let Some(lookup) = self
            .get_json::<DiscountCodeLookup>(&lookup_url, &[("code", code)])
            .await?
        else {
            return Ok(RuleLookup::NotFound);
        };

        let rule_url = format!(
            "{}/admin/api/{}/price_rules/{}.json",
            self.base_url, self.api_version, lookup.discount_code.price_rule_id
        );
        let Some(doc) = self.get_json::<PriceRuleDoc>(&rule_url, &[]).await? else {
            // Dangling reference: the code exists but resolves to no rule.
            debug!(code, "discount code references a missing price rule");
            return Ok(RuleLookup::NotFound);
        };

        Ok(RuleLookup::Found(normalize(
            &lookup.discount_code,
            doc.price_rule,
        )))
    }
}

fn truncate_body(body: String) -> String {
    const MAX: usize = 512;
    if body.len() <= MAX {
        body
    } else {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        body[..end].to_string()
    }
}
