use crate::value::FormValue;

/// Leaf coercion: integer, then float, then the raw text. A number is only
/// produced when re-formatting it gives back exactly `raw`.
pub fn coerce_scalar(raw: &str) -> FormValue {
    if let Some(value) = parse_canonical_i64(raw) {
        return FormValue::Integer(value);
    }
    if let Some(value) = parse_canonical_f64(raw) {
        return FormValue::Float(value);
    }
    FormValue::Text(raw.to_string())
}

/// Returns the sequence slot addressed by `raw`, or `None` when the key is
/// not a canonical non-negative integer that fits a `usize`.
pub fn parse_index(raw: &str) -> Option<usize> {
    parse_canonical_usize(raw)
}

/// True for a plain digit run without leading zeros, even past `usize`.
pub(crate) fn is_index_like(raw: &str) -> bool {
    if parse_canonical_usize(raw).is_some() {
        return true;
    }
    raw.len() > 1 && !raw.starts_with('0') && raw.bytes().all(|b| b.is_ascii_digit())
}

pub fn canonical_i64(value: i64) -> String {
    let mut buffer = itoa::Buffer::new();
    buffer.format(value).to_string()
}

fn parse_canonical_usize(raw: &str) -> Option<usize> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let value: usize = raw.parse().ok()?;
    let mut buffer = itoa::Buffer::new();
    (buffer.format(value) == raw).then_some(value)
}

fn parse_canonical_i64(raw: &str) -> Option<i64> {
    let value: i64 = raw.parse().ok()?;
    let mut buffer = itoa::Buffer::new();
    (buffer.format(value) == raw).then_some(value)
}

/// A float is accepted only where the JSON writer and the browser's
/// `Number#toString` agree on the text, so the value reads back unchanged
/// from either side.
fn parse_canonical_f64(raw: &str) -> Option<f64> {
    let value: f64 = raw.parse().ok()?;
    if !value.is_finite() {
        return None;
    }
    (canonical_f64(value) == raw && script_f64(value) == raw).then_some(value)
}

/// The text `serde_json` writes for `value` (ryu's shortest form). Non-finite
/// values render as `null`.
pub fn canonical_f64(value: f64) -> String {
    if !value.is_finite() {
        return "null".to_string();
    }
    let mut buffer = ryu::Buffer::new();
    buffer.format_finite(value).to_string()
}

/// `Number#toString` rendering: plain decimal for magnitudes in
/// `[1e-6, 1e21)`, `d.ddde±n` outside.
pub(crate) fn script_f64(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    let mut buffer = ryu::Buffer::new();
    let (digits, point) = significant_digits(buffer.format_finite(value.abs()));
    let count = digits.len() as i32;

    let mut out = String::with_capacity(digits.len() + 8);
    if value < 0.0 {
        out.push('-');
    }
    if count <= point && point <= 21 {
        out.push_str(&digits);
        out.extend(std::iter::repeat_n('0', (point - count) as usize));
    } else if 0 < point && point <= 21 {
        let (whole, fraction) = digits.split_at(point as usize);
        out.push_str(whole);
        out.push('.');
        out.push_str(fraction);
    } else if -6 < point && point <= 0 {
        out.push_str("0.");
        out.extend(std::iter::repeat_n('0', (-point) as usize));
        out.push_str(&digits);
    } else {
        let (lead, tail) = digits.split_at(1);
        out.push_str(lead);
        if !tail.is_empty() {
            out.push('.');
            out.push_str(tail);
        }
        let exponent = point - 1;
        out.push('e');
        out.push(if exponent < 0 { '-' } else { '+' });
        out.push_str(itoa::Buffer::new().format(exponent.unsigned_abs()));
    }
    out
}

/// Splits unsigned ryu output into its significant digits and the position
/// of the decimal point, so that the value is `0.<digits> * 10^point`.
fn significant_digits(text: &str) -> (String, i32) {
    let (mantissa, exponent) = match text.split_once('e') {
        Some((mantissa, exponent)) => (mantissa, exponent.parse::<i32>().unwrap_or(0)),
        None => (text, 0),
    };
    let (whole, fraction) = mantissa.split_once('.').unwrap_or((mantissa, ""));

    let joined = format!("{whole}{fraction}");
    let significant = joined.trim_start_matches('0');
    let leading = (joined.len() - significant.len()) as i32;
    let digits = significant.trim_end_matches('0').to_string();
    (digits, whole.len() as i32 + exponent - leading)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[rstest::rstest]
    #[case("0", 0)]
    #[case("42", 42)]
    #[case("-17", -17)]
    #[case("9223372036854775807", i64::MAX)]
    #[case("-9223372036854775808", i64::MIN)]
    fn test_coerce_integers(#[case] raw: &str, #[case] expected: i64) {
        assert_eq!(coerce_scalar(raw), FormValue::Integer(expected));
    }

    #[rstest::rstest]
    #[case("1.5", 1.5)]
    #[case("-0.25", -0.25)]
    #[case("0.1", 0.1)]
    #[case("0.001", 0.001)]
    #[case("123.456", 123.456)]
    #[case("1e-7", 1e-7)]
    #[case("-2.5e-9", -2.5e-9)]
    fn test_coerce_floats(#[case] raw: &str, #[case] expected: f64) {
        assert_eq!(coerce_scalar(raw), FormValue::Float(expected));
    }

    #[rstest::rstest]
    #[case("007")]
    #[case("+5")]
    #[case("-0")]
    #[case("1.0")]
    #[case("3.0")]
    #[case("-0.0")]
    #[case("1.50")]
    #[case(".5")]
    #[case("1e3")]
    #[case(" 5")]
    #[case("5 ")]
    #[case("NaN")]
    #[case("inf")]
    #[case("12345678901234567890")]
    #[case("100000000000000000000")]
    #[case("1e20")]
    #[case("1e21")]
    #[case("1e+21")]
    #[case("0.0000001")]
    #[case("0.000001")]
    #[case("1e-6")]
    #[case("")]
    #[case("abc")]
    #[case("0x1F")]
    fn test_coerce_keeps_non_canonical_text(#[case] raw: &str) {
        assert_eq!(coerce_scalar(raw), FormValue::Text(raw.to_string()));
    }

    #[rstest::rstest]
    fn test_parse_index() {
        assert_eq!(parse_index("0"), Some(0));
        assert_eq!(parse_index("10"), Some(10));
        assert_eq!(parse_index("4000000000"), Some(4_000_000_000));
        assert_eq!(parse_index("007"), None);
        assert_eq!(parse_index("-1"), None);
        assert_eq!(parse_index("+1"), None);
        assert_eq!(parse_index("1a"), None);
        assert_eq!(parse_index(""), None);
        assert_eq!(parse_index("99999999999999999999999"), None);
    }

    #[rstest::rstest]
    fn test_is_index_like() {
        assert!(is_index_like("0"));
        assert!(is_index_like("4000000000"));
        assert!(is_index_like("99999999999999999999999"));
        assert!(!is_index_like("007"));
        assert!(!is_index_like("name"));
        assert!(!is_index_like(""));
    }

    #[rstest::rstest]
    fn test_canonical_f64_matches_serde_json() {
        for value in [1.5, 1e20, 1e21, 1e-7, 0.001, 3.0, -2.5e-3] {
            let expected = serde_json::to_string(&value).unwrap();
            assert_eq!(canonical_f64(value), expected);
        }
        assert_eq!(canonical_f64(f64::NAN), "null");
    }

    #[rstest::rstest]
    #[case(1e21, "1e+21")]
    #[case(1e20, "100000000000000000000")]
    #[case(1.5e21, "1.5e+21")]
    #[case(1e-7, "1e-7")]
    #[case(1.25e-7, "1.25e-7")]
    #[case(1e-6, "0.000001")]
    #[case(-2.5e-3, "-0.0025")]
    #[case(123.456, "123.456")]
    #[case(3.0, "3")]
    #[case(-0.0, "0")]
    fn test_script_f64(#[case] value: f64, #[case] expected: &str) {
        assert_eq!(script_f64(value), expected);
    }

    #[rstest::rstest]
    fn test_canonical_i64() {
        assert_eq!(canonical_i64(0), "0");
        assert_eq!(canonical_i64(-42), "-42");
    }

    #[rstest::rstest]
    #[case("123")]
    #[case("-8")]
    #[case("3.25")]
    #[case("0.001")]
    #[case("1e-7")]
    fn test_round_trip_is_identity(#[case] raw: &str) {
        let value = coerce_scalar(raw);
        let rendered = match &value {
            FormValue::Integer(value) => canonical_i64(*value),
            FormValue::Float(value) => canonical_f64(*value),
            other => panic!("expected a number, got {other:?}"),
        };
        assert_eq!(rendered, raw);
        assert_eq!(serde_json::to_string(&value).unwrap(), raw);
    }
}
