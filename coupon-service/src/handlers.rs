use axum::extract::State;
use axum::Json;
use common_http_errors::ApiError;
use common_money::Money;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::app::AppState;
use crate::evaluate::{evaluate, EvaluationResult, IneligibleReason};
use crate::provider::RuleLookup;

#[derive(Debug, Deserialize)]
pub struct ValidateRequest {
    #[serde(default)]
    pub code: Option<String>,
    /// Missing, null, or non-numeric totals are treated as an empty cart.
    #[serde(rename = "cartTotalCents", default, deserialize_with = "lenient_cents")]
    pub cart_total_cents: Option<i64>,
}

/// Storefronts send whatever they have; a total that is not a whole number
/// of cents must degrade to zero, not reject the request.
fn lenient_cents<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(serde_json::Value::Number(n)) => n.as_i64(),
        Some(serde_json::Value::String(s)) => s.trim().parse::<i64>().ok(),
        _ => None,
    })
}

#[derive(Debug, Serialize)]
pub struct DiscountPayload {
    #[serde(rename = "amountCents")]
    pub amount_cents: i64,
    #[serde(rename = "originalTotalCents")]
    pub original_total_cents: i64,
    #[serde(rename = "newTotalCents")]
    pub new_total_cents: i64,
}

#[derive(Debug, Serialize)]
pub struct ValidateResponse {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<&'static str>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount: Option<DiscountPayload>,
}

pub async fn validate_coupon(
    State(state): State<AppState>,
    Json(req): Json<ValidateRequest>,
) -> Result<Json<ValidateResponse>, ApiError> {
    let trace_id = Uuid::new_v4();
    let code = req.code.as_deref().map(str::trim).unwrap_or("");
    if code.is_empty() {
        return Err(ApiError::BadRequest {
            code: "missing_code",
            trace_id: Some(trace_id),
            message: Some("No coupon provided".into()),
        });
    }
    let total = req.cart_total_cents.unwrap_or(0).max(0);

    // Provider failure is inconclusive and must never read as "invalid
    // coupon"; it maps to a gateway error the storefront can retry on.
    let lookup = state.provider.lookup_rule(code).await.map_err(|e| {
        state.metrics.record_provider_failure(e.kind());
        warn!(error = %e, %trace_id, "rule provider lookup failed");
        ApiError::bad_gateway("rule_provider_failure", &e, Some(trace_id))
    })?;

    let rule = match &lookup {
        RuleLookup::Found(rule) => Some(rule),
        RuleLookup::NotFound => None,
    };
    let result = evaluate(rule, total);
    state.metrics.record_evaluation(outcome_label(&result));
    info!(%trace_id, outcome = outcome_label(&result), "evaluated coupon");

    Ok(Json(to_response(code, result)))
}

fn outcome_label(result: &EvaluationResult) -> &'static str {
    match result {
        EvaluationResult::Eligible { .. } => "eligible",
        EvaluationResult::Ineligible { reason } => match reason {
            IneligibleReason::NotFound => "not_found",
            IneligibleReason::Inactive => "inactive",
            IneligibleReason::BelowMinimumSubtotal { .. } => "below_minimum_subtotal",
            IneligibleReason::UsageLimitReached { .. } => "usage_limit_reached",
            IneligibleReason::MalformedRule => "malformed_rule",
        },
    }
}

/// Business ineligibility is an expected outcome, reported with 200 and
/// `valid: false` rather than an error status.
fn to_response(code: &str, result: EvaluationResult) -> ValidateResponse {
    match result {
        EvaluationResult::Eligible {
            discount_cents,
            original_total_cents,
            new_total_cents,
        } => ValidateResponse {
            valid: true,
            reason: None,
            message: format!("Valid coupon: {code}"),
            discount: Some(DiscountPayload {
                amount_cents: discount_cents,
                original_total_cents,
                new_total_cents,
            }),
        },
        EvaluationResult::Ineligible { reason } => {
            let (label, message) = match &reason {
                IneligibleReason::NotFound => {
                    ("not_found", "Discount code not found".to_string())
                }
                IneligibleReason::Inactive => {
                    ("inactive", "Discount code is not active".to_string())
                }
                IneligibleReason::BelowMinimumSubtotal { minimum_cents, .. } => (
                    "below_minimum_subtotal",
                    format!(
                        "A minimum subtotal of {} is required",
                        Money::from_cents(*minimum_cents)
                    ),
                ),
                IneligibleReason::UsageLimitReached { limit, count } => (
                    "usage_limit_reached",
                    format!("Discount code usage limit reached ({count}/{limit})"),
                ),
                IneligibleReason::MalformedRule => (
                    "malformed_rule",
                    "Discount code cannot be applied".to_string(),
                ),
            };
            ValidateResponse { valid: false, reason: Some(label), message, discount: None }
        }
    }
}
