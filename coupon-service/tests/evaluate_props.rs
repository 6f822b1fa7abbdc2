use bigdecimal::BigDecimal;
use proptest::prelude::*;
use proptest::test_runner::TestCaseError;
use std::str::FromStr;

use coupon_service::evaluate::{evaluate, EvaluationResult};
use coupon_service::rule::{DiscountRule, RuleStatus, ValueKind};

fn percentage_rule(percent: i32) -> DiscountRule {
    DiscountRule {
        id: "42".into(),
        status: RuleStatus::Active,
        value_kind: ValueKind::Percentage,
        value: Some(BigDecimal::from(percent)),
        minimum_subtotal: None,
        usage_limit: None,
        usage_count: 0,
    }
}

fn fixed_rule(major_units: &str) -> DiscountRule {
    DiscountRule {
        value_kind: ValueKind::FixedAmount,
        value: Some(BigDecimal::from_str(major_units).unwrap()),
        ..percentage_rule(0)
    }
}

proptest! {
    // Invariant: 0 <= discount <= subtotal, and the new total is the exact
    // integer difference.
    #[test]
    fn discount_bounded_and_totals_exact(percent in 0i32..=100, total in 0i64..100_000_000) {
        let rule = percentage_rule(percent);
        match evaluate(Some(&rule), total) {
            EvaluationResult::Eligible { discount_cents, original_total_cents, new_total_cents } => {
                prop_assert!(discount_cents >= 0);
                prop_assert!(discount_cents <= original_total_cents);
                prop_assert_eq!(original_total_cents, total);
                prop_assert_eq!(new_total_cents, original_total_cents - discount_cents);
            }
            other => prop_assert!(false, "expected eligible, got {:?}", other),
        }
    }

    // Percentage discounts never shrink when the subtotal grows.
    #[test]
    fn percentage_monotonic_in_subtotal(percent in 0i32..=100, total in 0i64..10_000_000, bump in 1i64..10_000) {
        let rule = percentage_rule(percent);
        let smaller = match evaluate(Some(&rule), total) {
            EvaluationResult::Eligible { discount_cents, .. } => discount_cents,
            other => return Err(TestCaseError::fail(format!("unexpected {other:?}"))),
        };
        let larger = match evaluate(Some(&rule), total + bump) {
            EvaluationResult::Eligible { discount_cents, .. } => discount_cents,
            other => return Err(TestCaseError::fail(format!("unexpected {other:?}"))),
        };
        prop_assert!(larger >= smaller);
    }

    // Evaluation is pure: re-running with identical inputs yields an
    // identical result.
    #[test]
    fn fixed_amount_idempotent(total in 0i64..10_000_000) {
        let rule = fixed_rule("20.00");
        let first = evaluate(Some(&rule), total);
        let second = evaluate(Some(&rule), total);
        prop_assert_eq!(first, second);
    }

    // Fixed discounts clamp to the subtotal and never drive the total
    // negative.
    #[test]
    fn fixed_amount_never_exceeds_subtotal(total in 0i64..5_000) {
        let rule = fixed_rule("20.00");
        match evaluate(Some(&rule), total) {
            EvaluationResult::Eligible { discount_cents, new_total_cents, .. } => {
                prop_assert!(discount_cents <= total);
                prop_assert!(new_total_cents >= 0);
                prop_assert_eq!(discount_cents, total.min(2000));
            }
            other => prop_assert!(false, "expected eligible, got {:?}", other),
        }
    }
}
