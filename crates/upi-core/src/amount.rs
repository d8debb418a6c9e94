//! # Amount Formatting
//!
//! Display helpers for amount strings taken from payloads or typed in by the
//! user. Amounts travel through the decoder as strings; only these helpers
//! interpret them numerically.
//!
//! Parsing is lenient in the way payment screens need: surrounding
//! whitespace is ignored and the longest leading decimal number is used
//! (`"12.5 INR"` reads as `12.5`). Input with no leading number, or one
//! that overflows to infinity, formats as `0.00`.
//!
//! ## Rounding
//!
//! Rounding to paise is decimal half away from zero on the number as
//! written: `1.005` is `1.01` and `2.675` is `2.68`, whatever the nearest
//! binary float happens to be. Numbers beyond the 96-bit [`Decimal`] range
//! fall back to their `f64` value printed with two decimals.

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};

/// Rendering of an absent or unreadable amount.
pub const ZERO_AMOUNT: &str = "0.00";

/// Read the leading decimal number of `input`.
///
/// Accepts an optional sign, digits with an optional fraction (`1`, `1.`,
/// `.5`, `1.25`) and an optional exponent. Returns `None` when no number
/// leads the string or the value is not finite.
pub fn parse_amount(input: &str) -> Option<f64> {
    leading_number(input)?
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

/// Format an amount with exactly two decimal places.
///
/// No currency symbol, no thousands separators; see the module docs for
/// the rounding rule.
///
/// ```
/// use upi_core::format_amount;
///
/// assert_eq!(format_amount(Some("7")), "7.00");
/// assert_eq!(format_amount(Some("1.005")), "1.01");
/// assert_eq!(format_amount(None), "0.00");
/// assert_eq!(format_amount(Some("abc")), "0.00");
/// ```
pub fn format_amount(amount: Option<&str>) -> String {
    amount
        .and_then(leading_number)
        .and_then(two_decimals)
        .unwrap_or_else(|| ZERO_AMOUNT.to_string())
}

/// As [`format_amount`], with Indian digit grouping of the integer part
/// (`1234567.5` → `12,34,567.50`).
pub fn format_amount_grouped(amount: Option<&str>) -> String {
    let plain = format_amount(amount);
    let (sign, unsigned) = match plain.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", plain.as_str()),
    };
    let (int_part, frac_part) = unsigned.split_once('.').unwrap_or((unsigned, "00"));
    format!("{sign}{}.{frac_part}", group_indian(int_part))
}

/// The longest leading number of `input` as written, or `None`.
fn leading_number(input: &str) -> Option<&str> {
    let s = input.trim_start();
    let b = s.as_bytes();
    let mut i = 0;

    if matches!(b.first(), Some(b'+' | b'-')) {
        i += 1;
    }
    let int_start = i;
    while i < b.len() && b[i].is_ascii_digit() {
        i += 1;
    }
    let mut digits = i - int_start;

    if b.get(i) == Some(&b'.') {
        let frac_start = i + 1;
        let mut j = frac_start;
        while j < b.len() && b[j].is_ascii_digit() {
            j += 1;
        }
        if digits > 0 || j > frac_start {
            digits += j - frac_start;
            i = j;
        }
    }
    if digits == 0 {
        return None;
    }

    if matches!(b.get(i), Some(b'e' | b'E')) {
        let mut j = i + 1;
        if matches!(b.get(j), Some(b'+' | b'-')) {
            j += 1;
        }
        let exp_start = j;
        while j < b.len() && b[j].is_ascii_digit() {
            j += 1;
        }
        if j > exp_start {
            i = j;
        }
    }

    Some(&s[..i])
}

/// Round a number token to hundredths. `None` if it is not finite as `f64`.
fn two_decimals(token: &str) -> Option<String> {
    let value = token.parse::<f64>().ok().filter(|v| v.is_finite())?;
    let cents = decimal_cents(token).unwrap_or_else(|| match format!("{value:.2}") {
        text if text == "-0.00" => ZERO_AMOUNT.to_string(),
        text => text,
    });
    Some(cents)
}

fn decimal_cents(token: &str) -> Option<String> {
    let (mantissa, exponent) = match token.find(|c: char| c == 'e' || c == 'E') {
        Some(idx) => (&token[..idx], Some(&token[idx + 1..])),
        None => (token, None),
    };
    let mantissa = canonical_mantissa(mantissa);
    let value = match exponent {
        Some(exp) => Decimal::from_scientific(&format!("{mantissa}e{exp}")).ok()?,
        None => Decimal::from_str(&mantissa).ok()?,
    };

    let mut cents = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    if cents.is_zero() {
        cents.set_sign_positive(true);
    }
    cents.rescale(2);
    Some(cents.to_string())
}

/// Spell a mantissa the way `Decimal::from_str` expects: no `+`, no bare
/// `.5` or `1.`.
fn canonical_mantissa(mantissa: &str) -> String {
    let (sign, digits) = match mantissa.as_bytes().first() {
        Some(b'-') => ("-", &mantissa[1..]),
        Some(b'+') => ("", &mantissa[1..]),
        _ => ("", mantissa),
    };
    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits, ""));
    let int_part = if int_part.is_empty() { "0" } else { int_part };
    if frac_part.is_empty() {
        format!("{sign}{int_part}")
    } else {
        format!("{sign}{int_part}.{frac_part}")
    }
}

/// Group integer digits as `xx,xx,xxx`: the last three, then pairs.
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();
    format!("{},{tail}", groups.join(","))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_decimal_rendering() {
        assert_eq!(format_amount(Some("7")), "7.00");
        assert_eq!(format_amount(Some("100.00")), "100.00");
        assert_eq!(format_amount(Some("0.5")), "0.50");
        assert_eq!(format_amount(Some("150")), "150.00");
        assert_eq!(format_amount(Some("1234567.891")), "1234567.89");
    }

    #[test]
    fn rounding_half_away_from_zero() {
        assert_eq!(format_amount(Some("0.125")), "0.13");
        assert_eq!(format_amount(Some("-0.125")), "-0.13");
        assert_eq!(format_amount(Some("9.999")), "10.00");
    }

    #[test]
    fn ties_round_on_the_written_decimal() {
        // None of these ties is exactly representable as f64.
        assert_eq!(format_amount(Some("0.015")), "0.02");
        assert_eq!(format_amount(Some("1.005")), "1.01");
        assert_eq!(format_amount(Some("2.675")), "2.68");
        assert_eq!(format_amount(Some("10.075")), "10.08");
        assert_eq!(format_amount(Some("0.075")), "0.08");
        assert_eq!(format_amount(Some("-1.005")), "-1.01");
        assert_eq!(format_amount(Some("1.0049999")), "1.00");
        assert_eq!(format_amount_grouped(Some("100000.005")), "1,00,000.01");
    }

    #[test]
    fn tiny_negatives_are_unsigned_zero() {
        assert_eq!(format_amount(Some("-0.001")), "0.00");
        assert_eq!(format_amount(Some("-0")), "0.00");
    }

    #[test]
    fn exponent_ties_round_as_written() {
        assert_eq!(format_amount(Some("1.005e0")), "1.01");
        assert_eq!(format_amount(Some("100.5e-2")), "1.01");
        assert_eq!(format_amount(Some("2.5e-3")), "0.00");
    }

    #[test]
    fn out_of_decimal_range_falls_back() {
        let huge = format_amount(Some("1e30"));
        assert!(huge.starts_with("1000000000000000019884624838656"), "{huge}");
        assert!(huge.ends_with(".00"));
        assert_eq!(format_amount(Some("1e-40")), "0.00");
        assert_eq!(format_amount(Some("-1e-40")), "0.00");
    }

    #[test]
    fn unreadable_amounts_are_zero() {
        assert_eq!(format_amount(None), "0.00");
        assert_eq!(format_amount(Some("")), "0.00");
        assert_eq!(format_amount(Some("abc")), "0.00");
        assert_eq!(format_amount(Some(".")), "0.00");
        assert_eq!(format_amount(Some("-")), "0.00");
        assert_eq!(format_amount(Some("Infinity")), "0.00");
        assert_eq!(format_amount(Some("1e400")), "0.00");
    }

    #[test]
    fn leading_number_is_used() {
        assert_eq!(format_amount(Some("  12.5 INR")), "12.50");
        assert_eq!(format_amount(Some("3abc")), "3.00");
        assert_eq!(format_amount(Some("1.")), "1.00");
        assert_eq!(format_amount(Some(".25")), "0.25");
        assert_eq!(format_amount(Some("1e2")), "100.00");
        assert_eq!(format_amount(Some("1e")), "1.00");
        assert_eq!(format_amount(Some("+4")), "4.00");
    }

    #[test]
    fn parse_amount_values() {
        assert_eq!(parse_amount("42"), Some(42.0));
        assert_eq!(parse_amount("-1.5"), Some(-1.5));
        assert_eq!(parse_amount("1,000"), Some(1.0));
        assert_eq!(parse_amount("abc"), None);
        assert_eq!(parse_amount("1e999"), None);
    }

    #[test]
    fn indian_grouping() {
        assert_eq!(format_amount_grouped(Some("7")), "7.00");
        assert_eq!(format_amount_grouped(Some("999")), "999.00");
        assert_eq!(format_amount_grouped(Some("1000")), "1,000.00");
        assert_eq!(format_amount_grouped(Some("123456")), "1,23,456.00");
        assert_eq!(format_amount_grouped(Some("1234567.5")), "12,34,567.50");
        assert_eq!(format_amount_grouped(Some("-1234567.5")), "-12,34,567.50");
        assert_eq!(format_amount_grouped(Some("100000000")), "10,00,00,000.00");
        assert_eq!(format_amount_grouped(None), "0.00");
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Output always has exactly two fractional digits and never panics.
        #[test]
        fn always_two_decimals(input in "\\PC{0,24}") {
            let out = format_amount(Some(&input));
            let (_, frac) = out.rsplit_once('.').unwrap();
            prop_assert_eq!(frac.len(), 2);
            prop_assert!(!out.contains(','));
        }

        /// Whole rupee amounts render with a `.00` suffix.
        #[test]
        fn integers_render_exactly(n in 0u32..10_000_000) {
            prop_assert_eq!(format_amount(Some(&n.to_string())), format!("{n}.00"));
        }

        /// Grouping only inserts separators; digits are unchanged.
        #[test]
        fn grouping_preserves_digits(n in 0u64..1_000_000_000_000) {
            let s = n.to_string();
            let grouped = format_amount_grouped(Some(&s));
            prop_assert_eq!(grouped.replace(',', ""), format_amount(Some(&s)));
        }
    }
}
