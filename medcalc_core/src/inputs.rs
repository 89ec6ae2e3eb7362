//! # Input Values
//!
//! The per-session map of field values and the permissive text parser that
//! feeds it. Entry never fails: text that is not a number is stored as `0`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Mutable {field id → number} map for one open calculator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InputValueSet {
    values: BTreeMap<String, f64>,
}

impl InputValueSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of `id`, if it has been set.
    pub fn get(&self, id: &str) -> Option<f64> {
        self.values.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.values.contains_key(id)
    }

    /// Store an already-numeric value (choice selections, defaults).
    pub fn set(&mut self, id: impl Into<String>, value: f64) {
        self.values.insert(id.into(), value);
    }

    /// Parse `raw` and store it; unparseable text is stored as `0`.
    ///
    /// Returns the stored value.
    pub fn set_raw(&mut self, id: impl Into<String>, raw: &str) -> f64 {
        let value = parse_numeric(raw);
        self.set(id, value);
        value
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for InputValueSet {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// Parse the longest numeric prefix of `raw`, or `0` if there is none.
///
/// Leading whitespace is skipped. Accepted: optional sign, then either
/// `Infinity` or digits with an optional fraction and exponent
/// (`"12"`, `"-.5"`, `"1e3"`, `"7."`). Trailing garbage is ignored, so
/// `"12abc"` reads as `12`. The result is never NaN.
///
/// ```rust
/// use medcalc_core::inputs::parse_numeric;
///
/// assert_eq!(parse_numeric("70.5"), 70.5);
/// assert_eq!(parse_numeric(" 12 kg"), 12.0);
/// assert_eq!(parse_numeric("abc"), 0.0);
/// assert_eq!(parse_numeric(""), 0.0);
/// ```
pub fn parse_numeric(raw: &str) -> f64 {
    let s = raw.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }

    if s[end..].starts_with("Infinity") {
        return if s.starts_with('-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }

    let int_digits = count_digits(&bytes[end..]);
    end += int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = count_digits(&bytes[end + 1..]);
        if int_digits > 0 || frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }

    if int_digits == 0 && frac_digits == 0 {
        return 0.0;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits = count_digits(&bytes[exp_end..]);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    s[..end].parse().unwrap_or(0.0)
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_numbers() {
        assert_eq!(parse_numeric("70"), 70.0);
        assert_eq!(parse_numeric("-3.25"), -3.25);
        assert_eq!(parse_numeric("+4"), 4.0);
        assert_eq!(parse_numeric(".5"), 0.5);
        assert_eq!(parse_numeric("7."), 7.0);
        assert_eq!(parse_numeric("1e3"), 1000.0);
        assert_eq!(parse_numeric("2.5E-1"), 0.25);
    }

    #[test]
    fn test_parse_prefix() {
        assert_eq!(parse_numeric("12abc"), 12.0);
        assert_eq!(parse_numeric("  8.5 mg"), 8.5);
        assert_eq!(parse_numeric("3e"), 3.0);
        assert_eq!(parse_numeric("3e+"), 3.0);
        assert_eq!(parse_numeric("1.2.3"), 1.2);
    }

    #[test]
    fn test_parse_failures_are_zero() {
        assert_eq!(parse_numeric(""), 0.0);
        assert_eq!(parse_numeric("   "), 0.0);
        assert_eq!(parse_numeric("abc"), 0.0);
        assert_eq!(parse_numeric("-"), 0.0);
        assert_eq!(parse_numeric("."), 0.0);
        assert_eq!(parse_numeric("NaN"), 0.0);
        assert_eq!(parse_numeric("inf"), 0.0);
    }

    #[test]
    fn test_parse_infinity() {
        assert_eq!(parse_numeric("Infinity"), f64::INFINITY);
        assert_eq!(parse_numeric("-Infinity"), f64::NEG_INFINITY);
    }

    #[test]
    fn test_set_raw_stores_zero_on_garbage() {
        let mut values = InputValueSet::new();
        values.set("weight", 70.0);
        assert_eq!(values.set_raw("weight", "abc"), 0.0);
        assert_eq!(values.get("weight"), Some(0.0));
    }

    #[test]
    fn test_serialization_is_plain_map() {
        let values: InputValueSet = [("sbp", 120.0), ("dbp", 80.0)].into_iter().collect();
        let json = serde_json::to_string(&values).unwrap();
        assert_eq!(json, r#"{"dbp":80.0,"sbp":120.0}"#);
        let roundtrip: InputValueSet = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip, values);
    }
}
