use rust_decimal::Decimal;
use tax_core::calculations::common::round_half_up;
use thiserror::Error;

/// Error returned when a string cannot be parsed as a [`Decimal`].
#[derive(Debug, Error)]
#[error("invalid decimal '{input}': {source}")]
pub struct ParseDecimalError {
    input: String,
    #[source]
    source: rust_decimal::Error,
}

/// Error returned when a string cannot be parsed as a whole number.
#[derive(Debug, Error)]
#[error("invalid whole number '{input}': {source}")]
pub struct ParseCountError {
    input: String,
    #[source]
    source: std::num::ParseIntError,
}

/// Normalizes input for number parsing: trims whitespace and removes commas
/// (thousands separator) and a leading dollar sign.
fn normalize_number_input(s: &str) -> String {
    let trimmed = s.trim();
    trimmed
        .strip_prefix('$')
        .unwrap_or(trimmed)
        .replace(',', "")
}

/// Parses a string into a [`Decimal`].
///
/// Handles comma as thousands separator (e.g. `"1,234.56"`) and an optional
/// leading `$`. Empty or whitespace-only input is treated as 0.
/// Returns an error and logs when the input is invalid (non-empty but not parseable).
pub fn parse_decimal(s: &str) -> Result<Decimal, ParseDecimalError> {
    let normalized = normalize_number_input(s);
    if normalized.is_empty() {
        return Ok(Decimal::ZERO);
    }
    normalized.parse().map_err(|e| {
        tracing::warn!(input = %s, "invalid decimal: {}", e);
        ParseDecimalError {
            input: s.to_string(),
            source: e,
        }
    })
}

/// Parses a count such as age or dependents. Empty input is 0.
pub fn parse_count(s: &str) -> Result<u32, ParseCountError> {
    let normalized = normalize_number_input(s);
    if normalized.is_empty() {
        return Ok(0);
    }
    normalized.parse().map_err(|e| {
        tracing::warn!(input = %s, "invalid whole number: {}", e);
        ParseCountError {
            input: s.to_string(),
            source: e,
        }
    })
}

/// Formats an amount as Australian dollars with thousands separators,
/// e.g. `$43,462.00` or `-$538.00`.
pub fn format_currency(amount: Decimal) -> String {
    let rounded = round_half_up(amount);
    let text = format!("{:.2}", rounded.abs());
    let (whole, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}${grouped}.{cents}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn parse_decimal_accepts_comma_thousands_separator() {
        assert_eq!(parse_decimal("1,234.56").unwrap(), dec!(1234.56));
        assert_eq!(parse_decimal("1,234,567.89").unwrap(), dec!(1234567.89));
    }

    #[test]
    fn parse_decimal_accepts_dollar_sign() {
        assert_eq!(parse_decimal("$85,000").unwrap(), dec!(85000));
    }

    #[test]
    fn parse_decimal_trim_whitespace() {
        assert_eq!(parse_decimal("  123.45  ").unwrap(), dec!(123.45));
    }

    #[test]
    fn parse_decimal_empty_treated_as_zero() {
        assert_eq!(parse_decimal("").unwrap(), Decimal::ZERO);
        assert_eq!(parse_decimal("   ").unwrap(), Decimal::ZERO);
    }

    #[test]
    fn parse_decimal_invalid_returns_error() {
        assert!(parse_decimal("abc").is_err());
        assert!(parse_decimal("12k").is_err());
    }

    #[test]
    fn parse_count_handles_empty_and_invalid() {
        assert_eq!(parse_count("").unwrap(), 0);
        assert_eq!(parse_count(" 3 ").unwrap(), 3);
        assert!(parse_count("-1").is_err());
        assert!(parse_count("2.5").is_err());
    }

    #[test]
    fn format_currency_groups_thousands() {
        assert_eq!(format_currency(dec!(43462)), "$43,462.00");
        assert_eq!(format_currency(dec!(1234567.891)), "$1,234,567.89");
        assert_eq!(format_currency(dec!(999)), "$999.00");
    }

    #[test]
    fn format_currency_negative_and_zero() {
        assert_eq!(format_currency(dec!(-538)), "-$538.00");
        assert_eq!(format_currency(dec!(0)), "$0.00");
    }
}
