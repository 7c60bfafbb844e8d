//! Input sanitization.
//!
//! Pure functions turning untyped JSON input into a canonical value, or
//! `None` when the input is unusable. Sanitization never fails loudly; an
//! absent result is reported later by validation if the field is required.
//!
//! Text: trim, strip markup, escape HTML-reserved characters, then reject
//! empty results. Numbers: accept JSON numbers and numeric strings, and take
//! the absolute value unless the field allows negatives. Negative input for an
//! unsigned field is coerced, not rejected.
//!
//! # Examples
//!
//! ```
//! use catalog_core::{sanitize_number, sanitize_text};
//! use serde_json::json;
//!
//! assert_eq!(sanitize_text(&json!("  <b>Tom & Jerry</b> ")).as_deref(), Some("Tom &amp; Jerry"));
//! assert_eq!(sanitize_text(&json!("   ")), None);
//! assert_eq!(sanitize_number(&json!(-5), false), Some(5.into()));
//! assert_eq!(sanitize_number(&json!("12.5"), true).unwrap().as_f64(), Some(12.5));
//! assert_eq!(sanitize_number(&json!("twelve"), false), None);
//! ```

use serde_json::{Number, Value};

use crate::descriptor::{FieldDescriptor, FieldKind};
use crate::record::FieldValue;

/// Sanitizes a raw value according to a field's descriptor.
pub fn sanitize(descriptor: &FieldDescriptor, raw: &Value) -> Option<FieldValue> {
    match descriptor.kind {
        FieldKind::Text => sanitize_text(raw).map(FieldValue::Text),
        FieldKind::Numeric => {
            sanitize_number(raw, descriptor.allow_negative).map(FieldValue::Number)
        }
    }
}

/// Returns a trimmed, tag-stripped, HTML-escaped non-empty string.
///
/// Non-string input yields `None`.
pub fn sanitize_text(raw: &Value) -> Option<String> {
    let Value::String(s) = raw else {
        return None;
    };
    let escaped = escape_html(&strip_tags(s.trim()));
    if escaped.is_empty() {
        None
    } else {
        Some(escaped)
    }
}

/// Returns the numeric value of `raw`, made absolute unless `allow_negative`.
///
/// JSON numbers are taken as-is; strings are accepted when they hold a
/// finite decimal number. Integers stay integers, and floats with no
/// fractional part (`10.0`, `1e3`) become integers.
pub fn sanitize_number(raw: &Value, allow_negative: bool) -> Option<Number> {
    let number = match raw {
        Value::Number(n) => n.clone(),
        Value::String(s) => parse_numeric(s)?,
        _ => return None,
    };
    let number = if allow_negative {
        number
    } else {
        absolute(&number)?
    };
    Some(integral(number))
}

/// Largest magnitude below which every integral `f64` converts exactly.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

fn integral(n: Number) -> Number {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < MAX_EXACT_INTEGER => {
            Number::from(f as i64)
        }
        _ => n,
    }
}

fn parse_numeric(s: &str) -> Option<Number> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(i) = s.parse::<i64>() {
        return Some(Number::from(i));
    }
    // Rust accepts "inf"/"nan" spellings; only plain decimal forms are numeric here.
    if !s
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'))
    {
        return None;
    }
    s.parse::<f64>().ok().and_then(Number::from_f64)
}

fn absolute(n: &Number) -> Option<Number> {
    if let Some(i) = n.as_i64() {
        return Some(Number::from(i.unsigned_abs()));
    }
    if n.is_u64() {
        return Some(n.clone());
    }
    n.as_f64().and_then(|f| Number::from_f64(f.abs()))
}

/// Removes markup tags, keeping the text between them.
///
/// A `<` followed by whitespace is literal text. Quoted attribute values may
/// contain `>`. An unterminated tag swallows the rest of the input.
fn strip_tags(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '<' || chars.peek().is_none_or(|next| next.is_whitespace()) {
            out.push(c);
            continue;
        }
        let mut quote: Option<char> = None;
        for inner in chars.by_ref() {
            match (quote, inner) {
                (None, '"' | '\'') => quote = Some(inner),
                (Some(q), _) if inner == q => quote = None,
                (None, '>') => break,
                _ => {}
            }
        }
    }
    out
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_text_rejects_non_strings() {
        assert_eq!(sanitize_text(&json!(1)), None);
        assert_eq!(sanitize_text(&json!(null)), None);
        assert_eq!(sanitize_text(&json!(true)), None);
        assert_eq!(sanitize_text(&json!(["a"])), None);
    }

    #[test]
    fn test_text_trims_before_emptiness_check() {
        assert_eq!(sanitize_text(&json!(" \t\n")), None);
        assert_eq!(sanitize_text(&json!("  Widget  ")).as_deref(), Some("Widget"));
    }

    #[test]
    fn test_text_strips_tags() {
        assert_eq!(
            sanitize_text(&json!("<script>alert(1)</script>Widget")).as_deref(),
            Some("alert(1)Widget")
        );
        assert_eq!(sanitize_text(&json!("<b></b>")), None);
        assert_eq!(
            sanitize_text(&json!("<a title=\"x > y\">link</a>")).as_deref(),
            Some("link")
        );
    }

    #[test]
    fn test_text_keeps_lone_angle_bracket() {
        assert_eq!(sanitize_text(&json!("a < b")).as_deref(), Some("a &lt; b"));
    }

    #[test]
    fn test_text_escapes_reserved_characters() {
        assert_eq!(
            sanitize_text(&json!("Tom's \"best\" & co")).as_deref(),
            Some("Tom&#039;s &quot;best&quot; &amp; co")
        );
    }

    #[test]
    fn test_text_zero_is_a_value() {
        assert_eq!(sanitize_text(&json!("0")).as_deref(), Some("0"));
    }

    #[test]
    fn test_number_accepts_json_numbers() {
        assert_eq!(sanitize_number(&json!(700), false), Some(Number::from(700)));
        assert_eq!(sanitize_number(&json!(9.99), false).unwrap().as_f64(), Some(9.99));
    }

    #[test]
    fn test_number_accepts_numeric_strings() {
        assert_eq!(sanitize_number(&json!(" 42 "), false), Some(Number::from(42)));
        assert_eq!(sanitize_number(&json!("1e3"), false).unwrap().as_f64(), Some(1000.0));
        assert_eq!(sanitize_number(&json!(".5"), false).unwrap().as_f64(), Some(0.5));
    }

    #[test]
    fn test_number_integral_floats_become_integers() {
        assert_eq!(sanitize_number(&json!(10.0), false), Some(Number::from(10)));
        assert_eq!(sanitize_number(&json!("1e3"), false), Some(Number::from(1000)));
        assert_eq!(sanitize_number(&json!("-4.0"), true), Some(Number::from(-4)));
        assert_eq!(sanitize_number(&json!(-0.0), false), Some(Number::from(0)));
        assert!(sanitize_number(&json!(10.5), false).unwrap().is_f64());
        assert!(sanitize_number(&json!(1e300), false).unwrap().is_f64());
    }

    #[test]
    fn test_number_rejects_non_numeric() {
        assert_eq!(sanitize_number(&json!("one"), false), None);
        assert_eq!(sanitize_number(&json!(""), false), None);
        assert_eq!(sanitize_number(&json!("inf"), false), None);
        assert_eq!(sanitize_number(&json!("NaN"), false), None);
        assert_eq!(sanitize_number(&json!("0x1A"), false), None);
        assert_eq!(sanitize_number(&json!(true), false), None);
        assert_eq!(sanitize_number(&json!(null), false), None);
    }

    // Negative input for unsigned fields is made positive, not rejected.
    #[test]
    fn test_number_negative_coerced_to_absolute() {
        assert_eq!(sanitize_number(&json!(-5), false), Some(Number::from(5)));
        assert_eq!(sanitize_number(&json!("-2.5"), false).unwrap().as_f64(), Some(2.5));
        assert_eq!(
            sanitize_number(&json!(i64::MIN), false),
            Some(Number::from(i64::MIN.unsigned_abs()))
        );
    }

    #[test]
    fn test_number_signed_keeps_sign() {
        assert_eq!(sanitize_number(&json!(-5), true), Some(Number::from(-5)));
    }

    #[test]
    fn test_sanitize_dispatches_on_kind() {
        let text = FieldDescriptor::text("name");
        let number = FieldDescriptor::numeric("price");
        assert_eq!(
            sanitize(&text, &json!(" x ")),
            Some(FieldValue::Text("x".to_string()))
        );
        assert_eq!(
            sanitize(&number, &json!(-3)),
            Some(FieldValue::Number(Number::from(3)))
        );
        assert_eq!(sanitize(&number, &json!("x")), None);
    }
}
