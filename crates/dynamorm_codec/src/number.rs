//! Canonical text for number attributes.
//!
//! The store carries numbers as decimal text, so `7`, `7.0` and `0.7e1` are
//! the same number spelled three ways. Comparisons and key lookups go through
//! [`normalize_number`] so the spelling does not matter.

use crate::error::{CodecError, CodecResult};

/// Longest run of zeros written out before switching to exponent form.
const MAX_PLAIN_ZEROS: i64 = 40;

/// Returns the canonical spelling of a decimal number.
///
/// The result has no sign on zero, no leading zeros in the integer part, no
/// trailing zeros in the fraction, and no decimal point for integral values.
/// Very large or very small magnitudes use `E` exponent form. The conversion
/// is exact: no digits are rounded away.
///
/// # Errors
///
/// Returns [`CodecError::InvalidNumber`] if `text` is not a decimal number.
///
/// # Example
///
/// ```rust
/// use dynamorm_codec::normalize_number;
///
/// assert_eq!(normalize_number("7.0").unwrap(), "7");
/// assert_eq!(normalize_number("-0.50").unwrap(), "-0.5");
/// assert_eq!(normalize_number("1.5e3").unwrap(), "1500");
/// ```
pub fn normalize_number(text: &str) -> CodecResult<String> {
    let invalid = || CodecError::invalid_number(text);
    let trimmed = text.trim();

    let (negative, unsigned) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let (mantissa, exponent) = match unsigned.find(['e', 'E']) {
        Some(at) => {
            let exponent: i32 = unsigned[at + 1..].parse().map_err(|_| invalid())?;
            (&unsigned[..at], i64::from(exponent))
        }
        None => (unsigned, 0),
    };

    let (whole, fraction) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
    if whole.is_empty() && fraction.is_empty() || !all_digits(whole) || !all_digits(fraction) {
        return Err(invalid());
    }

    let digits = format!("{whole}{fraction}");
    let significant = digits.trim_start_matches('0').trim_end_matches('0');
    if significant.is_empty() {
        return Ok("0".to_string());
    }

    // Position of the decimal point relative to the first significant digit.
    let leading = (digits.len() - digits.trim_start_matches('0').len()) as i64;
    let point = whole.len() as i64 - leading + exponent;
    let width = significant.len() as i64;

    let body = if point >= width && point - width <= MAX_PLAIN_ZEROS {
        format!("{significant}{}", "0".repeat((point - width) as usize))
    } else if point > 0 && point < width {
        let (int, frac) = significant.split_at(point as usize);
        format!("{int}.{frac}")
    } else if point <= 0 && -point <= MAX_PLAIN_ZEROS {
        format!("0.{}{significant}", "0".repeat((-point) as usize))
    } else {
        let (first, rest) = significant.split_at(1);
        if rest.is_empty() {
            format!("{first}E{}", point - 1)
        } else {
            format!("{first}.{rest}E{}", point - 1)
        }
    };

    Ok(if negative { format!("-{body}") } else { body })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn norm(text: &str) -> String {
        normalize_number(text).unwrap()
    }

    #[test]
    fn integers_are_unchanged() {
        assert_eq!(norm("7"), "7");
        assert_eq!(norm("-42"), "-42");
        assert_eq!(norm("18446744073709551615"), "18446744073709551615");
    }

    #[test]
    fn spellings_of_the_same_number_agree() {
        for text in ["7", "7.0", "07", "+7", "7.000", "0.7e1", "70E-1", " 7 "] {
            assert_eq!(norm(text), "7", "{text}");
        }
    }

    #[test]
    fn zero_has_one_spelling() {
        for text in ["0", "-0", "0.000", "+0e10", ".0", "0."] {
            assert_eq!(norm(text), "0", "{text}");
        }
    }

    #[test]
    fn fractions_keep_every_digit() {
        assert_eq!(norm("2.250"), "2.25");
        assert_eq!(norm("-0.050"), "-0.05");
        let precise = "0.1000000000000000000000000000000000001";
        assert_eq!(norm(precise), precise);
        assert_eq!(norm("1.5e3"), "1500");
        assert_eq!(norm("125e-2"), "1.25");
    }

    #[test]
    fn extreme_magnitudes_use_exponents() {
        assert_eq!(norm("1e100"), "1E100");
        assert_eq!(norm("-12.5e-60"), "-1.25E-59");
        assert_eq!(norm("1e100"), norm("10e99"));
    }

    #[test]
    fn rejects_non_numbers() {
        for text in ["", "-", ".", "thirty", "1.2.3", "1e", "e5", "0x10", "NaN", "inf", "1_000"] {
            assert!(
                matches!(normalize_number(text), Err(CodecError::InvalidNumber { .. })),
                "{text}"
            );
        }
    }
}
