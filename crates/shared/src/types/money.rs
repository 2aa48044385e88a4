//! Rupiah formatting for user-facing amounts.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! All amounts in the system are `rust_decimal::Decimal` values in whole
//! rupiah; this module only renders them for humans.

use rust_decimal::Decimal;

/// Formats a whole-rupiah amount as `Rp 1.234.567`.
///
/// Fractional parts are dropped; stored amounts are whole rupiah already.
#[must_use]
pub fn format_idr(amount: Decimal) -> String {
    let whole = amount.trunc().to_string();
    let (sign, digits) = whole
        .strip_prefix('-')
        .map_or(("", whole.as_str()), |rest| ("-", rest));

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i != 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    format!("{sign}Rp {grouped}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case(dec!(0), "Rp 0")]
    #[case(dec!(500), "Rp 500")]
    #[case(dec!(1000), "Rp 1.000")]
    #[case(dec!(193000), "Rp 193.000")]
    #[case(dec!(1231000), "Rp 1.231.000")]
    #[case(dec!(2000000), "Rp 2.000.000")]
    #[case(dec!(1234567890), "Rp 1.234.567.890")]
    fn test_format_idr(#[case] amount: Decimal, #[case] expected: &str) {
        assert_eq!(format_idr(amount), expected);
    }

    #[test]
    fn test_format_idr_drops_fraction() {
        assert_eq!(format_idr(dec!(1230769.23)), "Rp 1.230.769");
    }

    #[test]
    fn test_format_idr_negative() {
        assert_eq!(format_idr(dec!(-1500)), "-Rp 1.500");
    }
}
