use bigdecimal::BigDecimal;
use common_money::{round_half_away, to_minor_units};

use crate::rule::{DiscountRule, RuleStatus, ValueKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IneligibleReason {
    NotFound,
    Inactive,
    BelowMinimumSubtotal { minimum_cents: i64, subtotal_cents: i64 },
    UsageLimitReached { limit: u32, count: u32 },
    MalformedRule,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvaluationResult {
    Eligible {
        discount_cents: i64,
        original_total_cents: i64,
        new_total_cents: i64,
    },
    Ineligible {
        reason: IneligibleReason,
    },
}

/// Pure eligibility-and-amount evaluation. Total over its inputs: a negative
/// subtotal clamps to zero, and no input shape can make it fail.
///
/// Checks run in a fixed order so the first failing condition determines the
/// reported reason.
pub fn evaluate(rule: Option<&DiscountRule>, original_total_cents: i64) -> EvaluationResult {
    let total = original_total_cents.max(0);

    let Some(rule) = rule else {
        return ineligible(IneligibleReason::NotFound);
    };

    // A status the provider never reported is not evidence of inactivity.
    if rule.status == RuleStatus::Inactive {
        return ineligible(IneligibleReason::Inactive);
    }

    if let Some(minimum) = &rule.minimum_subtotal {
        match to_minor_units(minimum) {
            Ok(minimum_cents) => {
                let minimum_cents = minimum_cents.max(0);
                if total < minimum_cents {
                    return ineligible(IneligibleReason::BelowMinimumSubtotal {
                        minimum_cents,
                        subtotal_cents: total,
                    });
                }
            }
            Err(_) => return ineligible(IneligibleReason::MalformedRule),
        }
    }

    if let Some(limit) = rule.usage_limit {
        if rule.usage_count >= limit {
            return ineligible(IneligibleReason::UsageLimitReached {
                limit,
                count: rule.usage_count,
            });
        }
    }

    let discount_cents = match rule.value_kind {
        ValueKind::Percentage => match rule.value.as_ref() {
            // The product is taken at full decimal precision and rounded
            // exactly once, so fractional rates like 0.014% survive intact.
            Some(value) => {
                let amount = value.abs() * BigDecimal::from(total) / BigDecimal::from(100);
                match round_half_away(&amount) {
                    Ok(cents) => cents.min(total),
                    Err(_) => return ineligible(IneligibleReason::MalformedRule),
                }
            }
            None => return ineligible(IneligibleReason::MalformedRule),
        },
        ValueKind::FixedAmount => match rule.value.as_ref().map(to_minor_units) {
            Some(Ok(cents)) => cents.abs().min(total),
            _ => return ineligible(IneligibleReason::MalformedRule),
        },
        // A rule that passed all gates but has an unrecognized value shape is
        // a zero-value discount, not an error; blocking checkout on a data
        // surprise is the worse outcome.
        ValueKind::Unknown => 0,
    };

    EvaluationResult::Eligible {
        discount_cents,
        original_total_cents: total,
        new_total_cents: total - discount_cents,
    }
}

fn ineligible(reason: IneligibleReason) -> EvaluationResult {
    EvaluationResult::Ineligible { reason }
}
