use bigdecimal::BigDecimal;
use serde::{Deserialize, Deserializer};
use std::str::FromStr;

/// Activation state of a discount rule. `Unknown` means the provider schema
/// did not expose a status at all, which is not evidence of inactivity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleStatus {
    Active,
    Inactive,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Percentage,
    FixedAmount,
    Unknown,
}

/// Provider-agnostic discount rule, normalized from whatever shape the
/// upstream platform returned. Magnitudes stay decimal here; conversion to
/// integer cents happens exactly once, inside evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscountRule {
    pub id: String,
    pub status: RuleStatus,
    pub value_kind: ValueKind,
    pub value: Option<BigDecimal>,
    pub minimum_subtotal: Option<BigDecimal>,
    pub usage_limit: Option<u32>,
    pub usage_count: u32,
}

// --- Raw Shopify Admin REST payloads ---

/// Step-1 response of the lookup chain: code string to rule reference.
#[derive(Debug, Deserialize)]
pub struct DiscountCodeLookup {
    pub discount_code: DiscountCodeBody,
}

#[derive(Debug, Deserialize)]
pub struct DiscountCodeBody {
    pub id: i64,
    pub price_rule_id: i64,
    pub code: String,
    #[serde(default)]
    pub usage_count: Option<u32>,
}

/// Step-2 response: the dereferenced price rule carrying eligibility fields.
#[derive(Debug, Deserialize)]
pub struct PriceRuleDoc {
    pub price_rule: PriceRuleBody,
}

#[derive(Debug, Deserialize)]
pub struct PriceRuleBody {
    pub id: i64,
    #[serde(default)]
    pub value_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub value: Option<BigDecimal>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub usage_limit: Option<u32>,
    #[serde(default)]
    pub prerequisite_subtotal_range: Option<SubtotalRange>,
}

#[derive(Debug, Deserialize)]
pub struct SubtotalRange {
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub greater_than_or_equal_to: Option<BigDecimal>,
}

/// Decimal magnitudes arrive as strings ("-10.0") or bare numbers depending
/// on provider mood. A value that parses as neither stays `None` so the
/// evaluator can report the rule as malformed instead of failing the request.
fn lenient_decimal<'de, D>(deserializer: D) -> Result<Option<BigDecimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw.as_ref().and_then(decimal_from_value))
}

fn decimal_from_value(value: &serde_json::Value) -> Option<BigDecimal> {
    match value {
        serde_json::Value::String(s) => BigDecimal::from_str(s.trim()).ok(),
        serde_json::Value::Number(n) => BigDecimal::from_str(&n.to_string()).ok(),
        _ => None,
    }
}

/// Merge the two lookup steps into one normalized rule. The intermediate
/// price-rule reference never leaves this module's callers.
pub fn normalize(code_ref: &DiscountCodeBody, rule: PriceRuleBody) -> DiscountRule {
    let status = match rule.status.as_deref() {
        Some(s) if s.eq_ignore_ascii_case("active") => RuleStatus::Active,
        Some(s)
            if s.eq_ignore_ascii_case("expired")
                || s.eq_ignore_ascii_case("disabled")
                || s.eq_ignore_ascii_case("scheduled")
                || s.eq_ignore_ascii_case("inactive") =>
        {
            RuleStatus::Inactive
        }
        _ => RuleStatus::Unknown,
    };
    let value_kind = match rule.value_type.as_deref() {
        Some(s) if s.eq_ignore_ascii_case("percentage") => ValueKind::Percentage,
        Some(s) if s.eq_ignore_ascii_case("fixed_amount") => ValueKind::FixedAmount,
        _ => ValueKind::Unknown,
    };

    DiscountRule {
        id: rule.id.to_string(),
        status,
        value_kind,
        value: rule.value,
        minimum_subtotal: rule
            .prerequisite_subtotal_range
            .and_then(|range| range.greater_than_or_equal_to),
        usage_limit: rule.usage_limit,
        usage_count: code_ref.usage_count.unwrap_or(0),
    }
}
