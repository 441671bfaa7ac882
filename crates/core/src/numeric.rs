//! Numeric parsing policy for catalogue values.
//!
//! Catalogue sources disagree on whether `price` and `rating` are JSON numbers
//! or strings. Both are accepted here, as long as the string holds a plain
//! decimal number. Everything else is rejected at the catalogue boundary so
//! downstream code only ever sees finite, non-negative values.

use serde_json::Value;

use crate::error::{DomainError, DomainResult};

/// Highest rating a product can carry.
pub const MAX_RATING: f64 = 5.0;

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn parse_number(value: &Value) -> DomainResult<f64> {
    let n = match value {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| DomainError::validation(format!("{n} is not representable")))?,
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| DomainError::validation(format!("{s:?} is not a number")))?,
        other => {
            return Err(DomainError::validation(format!(
                "expected a number, found {}",
                describe(other)
            )));
        }
    };

    if !n.is_finite() {
        return Err(DomainError::validation("value must be finite"));
    }
    Ok(n)
}

/// Parse a price (whole currency units, may carry decimals).
pub fn parse_price(value: &Value) -> DomainResult<f64> {
    let price = parse_number(value)?;
    if price < 0.0 {
        return Err(DomainError::validation("price cannot be negative"));
    }
    Ok(price)
}

/// Parse a rating in `0..=MAX_RATING`.
pub fn parse_rating(value: &Value) -> DomainResult<f64> {
    let rating = parse_number(value)?;
    if !(0.0..=MAX_RATING).contains(&rating) {
        return Err(DomainError::validation(format!(
            "rating must be between 0 and {MAX_RATING}"
        )));
    }
    Ok(rating)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn numbers_and_numeric_strings_are_accepted() {
        assert_eq!(parse_price(&json!(545)).unwrap(), 545.0);
        assert_eq!(parse_price(&json!("425")).unwrap(), 425.0);
        assert_eq!(parse_price(&json!(" 399.50 ")).unwrap(), 399.5);
        assert_eq!(parse_rating(&json!("4.6")).unwrap(), 4.6);
    }

    #[test]
    fn non_numeric_values_are_rejected() {
        assert!(parse_price(&json!("₹545")).is_err());
        assert!(parse_price(&json!(null)).is_err());
        assert!(parse_price(&json!(true)).is_err());
        assert!(parse_price(&json!("")).is_err());
        assert!(parse_price(&json!("NaN")).is_err());
        assert!(parse_price(&json!("inf")).is_err());
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let err = parse_price(&json!(-1)).unwrap_err();
        assert!(matches!(err, DomainError::Validation(msg) if msg.contains("negative")));
        assert!(parse_rating(&json!(5.1)).is_err());
        assert!(parse_rating(&json!(-0.5)).is_err());
        assert_eq!(parse_rating(&json!(5)).unwrap(), 5.0);
    }

    proptest! {
        /// Property: a number and its string rendering parse to the same price.
        #[test]
        fn string_and_number_forms_agree(price in 0u32..1_000_000u32) {
            let from_number = parse_price(&json!(price)).unwrap();
            let from_string = parse_price(&json!(price.to_string())).unwrap();
            prop_assert_eq!(from_number, from_string);
        }
    }
}
