use bigdecimal::BigDecimal;
use common_money::{round_half_away, to_minor_units, Money};
use proptest::prelude::*;
use std::str::FromStr;

proptest! {
    // Conversion agrees with integer reasoning: a value written as whole
    // cents converts to exactly those cents.
    #[test]
    fn whole_cents_round_trip(cents in -1_000_000i64..1_000_000) {
        let s = format!("{}.{:02}", cents / 100, (cents % 100).abs());
        let s = if cents < 0 && cents / 100 == 0 { format!("-{s}") } else { s };
        let bd = BigDecimal::from_str(&s).unwrap();
        prop_assert_eq!(to_minor_units(&bd), Ok(cents));
    }

    // Midpoint values (exactly half a cent) round away from zero.
    #[test]
    fn midpoint_rounds_away_from_zero(base_cents in 0i64..100_000) {
        let s = format!("{}.{:02}5", base_cents / 100, base_cents % 100);
        let bd = BigDecimal::from_str(&s).unwrap();
        prop_assert_eq!(to_minor_units(&bd), Ok(base_cents + 1));
        let neg = BigDecimal::from_str(&format!("-{s}")).unwrap();
        prop_assert_eq!(to_minor_units(&neg), Ok(-(base_cents + 1)));
    }

    // Rounding to whole units matches the integer half-up formula at tenths
    // precision, in both directions from zero.
    #[test]
    fn round_half_away_matches_integer_formula(tenths in 0i64..100_000_000) {
        let bd = BigDecimal::from(tenths) / BigDecimal::from(10);
        prop_assert_eq!(round_half_away(&bd), Ok((tenths + 5) / 10));
        let neg = BigDecimal::from(-tenths) / BigDecimal::from(10);
        prop_assert_eq!(round_half_away(&neg), Ok(-((tenths + 5) / 10)));
    }

    // Display/value agreement for the cents wrapper.
    #[test]
    fn money_display_parses_back(cents in -1_000_000i64..1_000_000) {
        let rendered = Money::from_cents(cents).to_string();
        let bd = BigDecimal::from_str(&rendered).unwrap();
        prop_assert_eq!(to_minor_units(&bd), Ok(cents));
    }
}
