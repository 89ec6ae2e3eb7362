//! # Result Formatting
//!
//! Display formatting for formula results. Every calculator owns its own
//! precision, so these helpers take the number of decimals explicitly.
//!
//! The rules are those of a clinical reference display rather than Rust's
//! defaults:
//!
//! | Case | Rust `format!` | Here |
//! |------|----------------|------|
//! | exact tie `2.5` to 0 dp | `"2"` (half-even) | `"3"` (half away from zero) |
//! | `f64::INFINITY` | `"inf"` | `"Infinity"` |
//! | `-0.0` | `"-0"` | `"0"` |
//! | `1e21` | `"1000000000000000000000"` | `"1e+21"` |
//!
//! Non-finite values are never intercepted: a division by zero shows up as
//! `"Infinity"` or `"NaN"` in the result value.

/// Magnitude at which fixed-point output switches to exponent notation.
const EXPONENT_THRESHOLD: f64 = 1e21;

/// Format `x` with exactly `decimals` digits after the point.
///
/// Rounds on the exact binary value: `1.005` is really `1.00499…` and
/// becomes `"1.00"`, while an exact tie such as `0.125` rounds away from
/// zero to `"0.13"`.
///
/// ```rust
/// use medcalc_core::format::fixed;
///
/// assert_eq!(fixed(22.857142, 1), "22.9");
/// assert_eq!(fixed(2.5, 0), "3");
/// assert_eq!(fixed(f64::INFINITY, 1), "Infinity");
/// ```
pub fn fixed(x: f64, decimals: usize) -> String {
    if !x.is_finite() {
        return non_finite(x).to_string();
    }
    let magnitude = x.abs();
    if magnitude >= EXPONENT_THRESHOLD {
        return number(x);
    }

    // `{:.*}` breaks exact ties to even, so those are bumped by hand
    let body = if exact_fraction_digits(magnitude) == decimals + 1 {
        let expanded = format!("{:.*}", decimals + 1, magnitude);
        increment_last_digit(expanded[..expanded.len() - 1].trim_end_matches('.'))
    } else {
        format!("{:.*}", decimals, magnitude)
    };

    if x < 0.0 {
        format!("-{}", body)
    } else {
        body
    }
}

/// Round half toward positive infinity (`-2.5` → `-2`, `2.5` → `3`).
pub fn round_half_up(x: f64) -> f64 {
    if !x.is_finite() {
        return x;
    }
    let floor = x.floor();
    if x - floor >= 0.5 {
        floor + 1.0
    } else {
        floor
    }
}

/// Round to a whole number and render it (`93.33` → `"93"`).
pub fn whole(x: f64) -> String {
    number(round_half_up(x))
}

/// Shortest round-trip rendering of a number (`4.5` → `"4.5"`, `3.0` → `"3"`).
pub fn number(x: f64) -> String {
    if !x.is_finite() {
        return non_finite(x).to_string();
    }
    if x == 0.0 {
        return "0".to_string();
    }
    let magnitude = x.abs();
    if magnitude >= EXPONENT_THRESHOLD || magnitude < 1e-6 {
        let exp = format!("{:e}", x);
        return match exp.split_once('e') {
            Some((mantissa, power)) if !power.starts_with('-') => {
                format!("{}e+{}", mantissa, power)
            }
            _ => exp,
        };
    }
    let shortest = format!("{}", magnitude);
    let body = prefer_even_neighbor(magnitude, shortest);
    if x < 0.0 {
        format!("-{}", body)
    } else {
        body
    }
}

/// When `magnitude` sits exactly halfway between two equally short
/// renderings, pick the one ending in an even digit.
fn prefer_even_neighbor(magnitude: f64, shortest: String) -> String {
    let kept = shortest.split_once('.').map_or(0, |(_, frac)| frac.len());
    if exact_fraction_digits(magnitude) != kept + 1 || !ends_odd(&shortest) {
        return shortest;
    }
    let expanded = format!("{:.*}", kept + 1, magnitude);
    let below = expanded[..expanded.len() - 1].trim_end_matches('.').to_string();
    let other = if below == shortest {
        increment_last_digit(&below)
    } else {
        below
    };
    if other.parse::<f64>() == Ok(magnitude) {
        other
    } else {
        shortest
    }
}

fn ends_odd(digits: &str) -> bool {
    digits
        .bytes()
        .last()
        .is_some_and(|b| b.is_ascii_digit() && (b - b'0') % 2 == 1)
}

fn non_finite(x: f64) -> &'static str {
    if x.is_nan() {
        "NaN"
    } else if x > 0.0 {
        "Infinity"
    } else {
        "-Infinity"
    }
}

/// Number of digits after the point in the exact decimal expansion of a
/// finite `x`.
///
/// A binary fraction always ends in `5`, so `x` is an exact tie at
/// `d` decimals precisely when this returns `d + 1`.
fn exact_fraction_digits(x: f64) -> usize {
    let bits = x.to_bits();
    let biased = ((bits >> 52) & 0x7ff) as i32;
    let mut mantissa = bits & ((1u64 << 52) - 1);
    let mut exponent = if biased == 0 {
        -1074
    } else {
        mantissa |= 1u64 << 52;
        biased - 1075
    };
    if mantissa == 0 {
        return 0;
    }
    exponent += mantissa.trailing_zeros() as i32;
    if exponent >= 0 {
        0
    } else {
        (-exponent) as usize
    }
}

/// Add one unit in the last place of a plain decimal string (`"9.99"` →
/// `"10.00"`).
fn increment_last_digit(digits: &str) -> String {
    let mut bytes = digits.as_bytes().to_vec();
    for i in (0..bytes.len()).rev() {
        match bytes[i] {
            b'.' => continue,
            b'9' => bytes[i] = b'0',
            b => {
                bytes[i] = b + 1;
                return String::from_utf8_lossy(&bytes).into_owned();
            }
        }
    }
    let mut carried = String::with_capacity(bytes.len() + 1);
    carried.push('1');
    carried.push_str(&String::from_utf8_lossy(&bytes));
    carried
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_basic() {
        assert_eq!(fixed(22.857142857, 1), "22.9");
        assert_eq!(fixed(93.333333, 0), "93");
        assert_eq!(fixed(3.0, 2), "3.00");
        assert_eq!(fixed(-4.25, 1), "-4.3");
    }

    #[test]
    fn test_fixed_ties_round_away_from_zero() {
        assert_eq!(fixed(0.5, 0), "1");
        assert_eq!(fixed(2.5, 0), "3");
        assert_eq!(fixed(0.125, 2), "0.13");
        assert_eq!(fixed(-2.5, 0), "-3");
    }

    #[test]
    fn test_fixed_uses_binary_value() {
        // 1.005 is stored as 1.00499999999999989...
        assert_eq!(fixed(1.005, 2), "1.00");
        // 0.35 is stored as 0.34999999999999997...
        assert_eq!(fixed(0.35, 1), "0.3");
    }

    #[test]
    fn test_fixed_large_ties() {
        // ulp is 0.25 here, larger than half of the last kept place
        assert_eq!(fixed(-1535832881927490.2, 1), "-1535832881927490.3");
        assert_eq!(fixed(4503599627370495.5, 0), "4503599627370496");
        assert_eq!(fixed(9.5, 0), "10");
        assert_eq!(fixed(0.375, 2), "0.38");
    }

    #[test]
    fn test_fixed_non_finite() {
        assert_eq!(fixed(f64::INFINITY, 1), "Infinity");
        assert_eq!(fixed(f64::NEG_INFINITY, 0), "-Infinity");
        assert_eq!(fixed(f64::NAN, 2), "NaN");
        assert_eq!(fixed(100.0 / 0.0, 1), "Infinity");
    }

    #[test]
    fn test_fixed_zero_sign() {
        assert_eq!(fixed(-0.0, 1), "0.0");
        assert_eq!(fixed(-0.04, 1), "-0.0");
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(2.5), 3.0);
        assert_eq!(round_half_up(-2.5), -2.0);
        assert_eq!(round_half_up(2.4999), 2.0);
        assert!(round_half_up(f64::NAN).is_nan());
    }

    #[test]
    fn test_whole() {
        assert_eq!(whole(93.3333), "93");
        assert_eq!(whole(-0.2), "0");
        assert_eq!(whole(f64::NAN), "NaN");
    }

    #[test]
    fn test_number() {
        assert_eq!(number(3.0), "3");
        assert_eq!(number(4.5), "4.5");
        assert_eq!(number(-1.0), "-1");
        assert_eq!(number(-0.0), "0");
        assert_eq!(number(1e21), "1e+21");
        assert_eq!(number(1.5e-7), "1.5e-7");
        assert_eq!(number(f64::INFINITY), "Infinity");
    }

    #[test]
    fn test_number_halfway_prefers_even_digit() {
        // Stored as …199.25: ".2" and ".3" both round-trip
        assert_eq!(number(956606864929199.2), "956606864929199.2");
        assert_eq!(number(-956606864929199.2), "-956606864929199.2");
        assert_eq!(number(0.1), "0.1");
        assert_eq!(number(2.5), "2.5");
    }

    #[test]
    fn test_exact_fraction_digits() {
        assert_eq!(exact_fraction_digits(3.0), 0);
        assert_eq!(exact_fraction_digits(2.5), 1);
        assert_eq!(exact_fraction_digits(0.125), 3);
        assert_eq!(exact_fraction_digits(1e300), 0);
        assert_eq!(exact_fraction_digits(f64::from_bits(1)), 1074);
    }

    #[test]
    fn test_increment_last_digit() {
        assert_eq!(increment_last_digit("1.24"), "1.25");
        assert_eq!(increment_last_digit("9.99"), "10.00");
        assert_eq!(increment_last_digit("99"), "100");
    }
}
