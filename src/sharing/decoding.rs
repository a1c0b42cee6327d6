use std::num::ParseIntError;

use num_bigint::BigInt;
use num_traits::Num;
use thiserror::Error;

pub const MIN_RADIX: u32 = 2;
pub const MAX_RADIX: u32 = 36;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("base {base:?} is not a decimal integer: {source}")]
    InvalidBase {
        base: String,
        #[source]
        source: ParseIntError,
    },
    #[error("radix {0} is outside the supported range 2..=36")]
    UnsupportedRadix(i64),
    #[error("value has no digits")]
    EmptyValue,
    #[error("character {digit:?} is not a valid digit in radix {radix}")]
    InvalidDigit { digit: char, radix: u32 },
}

/// Decodes a signed numeral written in `base` into an exact integer.
///
/// `base` is read as a decimal radix within 2..=36. Digits above 9 are the
/// letters `a` to `z`, case-insensitive. Unlike `BigInt::from_str_radix`,
/// underscore separators are rejected.
pub fn decode(value: &str, base: &str) -> Result<BigInt, DecodeError> {
    let radix = parse_radix(base)?;

    let digits = value
        .strip_prefix('-')
        .or_else(|| value.strip_prefix('+'))
        .unwrap_or(value);
    if digits.is_empty() {
        return Err(DecodeError::EmptyValue);
    }
    if let Some(digit) = digits.chars().find(|c| c.to_digit(radix).is_none()) {
        return Err(DecodeError::InvalidDigit { digit, radix });
    }

    // Every character was validated above, parsing can only fail on an empty input
    let magnitude = BigInt::from_str_radix(digits, radix).map_err(|_| DecodeError::EmptyValue)?;
    if value.starts_with('-') {
        return Ok(-magnitude);
    }
    Ok(magnitude)
}

fn parse_radix(base: &str) -> Result<u32, DecodeError> {
    let radix = base
        .parse::<i64>()
        .map_err(|source| DecodeError::InvalidBase {
            base: base.to_string(),
            source,
        })?;
    if !(i64::from(MIN_RADIX)..=i64::from(MAX_RADIX)).contains(&radix) {
        return Err(DecodeError::UnsupportedRadix(radix));
    }
    Ok(radix as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_common_bases() {
        assert_eq!(decode("111", "2").unwrap(), BigInt::from(7));
        assert_eq!(decode("213", "4").unwrap(), BigInt::from(39));
        assert_eq!(decode("12", "10").unwrap(), BigInt::from(12));
        assert_eq!(decode("1a", "16").unwrap(), BigInt::from(26));
        assert_eq!(decode("zz", "36").unwrap(), BigInt::from(36 * 36 - 1));
    }

    #[test]
    fn test_decode_is_case_insensitive() {
        assert_eq!(decode("FF", "16").unwrap(), decode("ff", "16").unwrap());
        assert_eq!(decode("aBcD", "16").unwrap(), BigInt::from(0xabcd));
    }

    #[test]
    fn test_decode_signed_values() {
        assert_eq!(decode("-101", "2").unwrap(), BigInt::from(-5));
        assert_eq!(decode("+101", "2").unwrap(), BigInt::from(5));
        assert_eq!(decode("-0", "10").unwrap(), BigInt::from(0));
    }

    #[test]
    fn test_decode_beyond_machine_words() {
        let value = "f".repeat(64);
        let decoded = decode(&value, "16").unwrap();
        let expected = (BigInt::from(1) << 256) - 1;
        assert_eq!(decoded, expected);
    }

    #[test]
    fn test_decode_round_trip() {
        for _ in 0..200 {
            let n = BigInt::from(rand::random::<u128>()) * rand::random::<u64>();
            let radix = rand::random_range(2..=16_u32);
            let numeral = n.to_str_radix(radix);
            assert_eq!(decode(&numeral, &radix.to_string()).unwrap(), n);
        }
    }

    #[test]
    fn test_decode_rejects_invalid_digit() {
        assert_eq!(
            decode("102", "2"),
            Err(DecodeError::InvalidDigit {
                digit: '2',
                radix: 2
            })
        );
        assert_eq!(
            decode("1g", "16"),
            Err(DecodeError::InvalidDigit {
                digit: 'g',
                radix: 16
            })
        );
        assert!(matches!(
            decode("1_000", "10"),
            Err(DecodeError::InvalidDigit { digit: '_', .. })
        ));
        assert!(matches!(
            decode(" 12", "10"),
            Err(DecodeError::InvalidDigit { digit: ' ', .. })
        ));
    }

    #[test]
    fn test_decode_rejects_empty_value() {
        assert_eq!(decode("", "10"), Err(DecodeError::EmptyValue));
        assert_eq!(decode("-", "10"), Err(DecodeError::EmptyValue));
    }

    #[test]
    fn test_decode_rejects_invalid_base() {
        assert!(matches!(
            decode("10", "ten"),
            Err(DecodeError::InvalidBase { .. })
        ));
        assert!(matches!(decode("10", ""), Err(DecodeError::InvalidBase { .. })));
        assert_eq!(decode("10", "1"), Err(DecodeError::UnsupportedRadix(1)));
        assert_eq!(decode("10", "37"), Err(DecodeError::UnsupportedRadix(37)));
        assert_eq!(decode("10", "-16"), Err(DecodeError::UnsupportedRadix(-16)));
    }
}
