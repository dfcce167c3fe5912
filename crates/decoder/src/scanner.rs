//! Operand classification: a small character-class scanner.
//!
//! An optional sign followed by only digits is an int; sign, digits, a
//! decimal point and optional further digits (at least one digit
//! present) is a float; anything else is text with its first and last
//! characters stripped — the delimiting quotes. No escape processing, so
//! a quote character cannot appear inside a text literal.

use waffle_common::Value;

/// Classify a single operand token into a [`Value`].
///
/// The only failure is an integer literal too large for i64.
pub(crate) fn classify(token: &str) -> Result<Value, String> {
    if int_shape(token) {
        return token
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|_| format!("integer literal '{token}' out of range"));
    }
    if float_shape(token) {
        return token
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|_| format!("malformed float literal '{token}'"));
    }
    Ok(Value::Text(strip_delimiters(token)))
}

fn unsigned(token: &str) -> &str {
    token.strip_prefix(['+', '-']).unwrap_or(token)
}

fn all_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn int_shape(token: &str) -> bool {
    all_digits(unsigned(token))
}

fn float_shape(token: &str) -> bool {
    match unsigned(token).split_once('.') {
        Some((whole, frac)) => {
            (all_digits(whole) && (frac.is_empty() || all_digits(frac)))
                || (whole.is_empty() && all_digits(frac))
        }
        None => false,
    }
}

fn strip_delimiters(token: &str) -> String {
    let mut chars = token.chars();
    chars.next();
    chars.next_back();
    chars.as_str().to_string()
}
