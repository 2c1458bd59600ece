//! Lossless text encoding for arbitrary-precision decimals.
//!
//! Document stores only understand primitive scalars, so every decimal field
//! travels as a string. [`encode`] and [`decode`] are exact inverses: no
//! digit and no scale is lost, whatever the magnitude or fractional length.
//!
//! [`decode_or_zero`] is the lenient entry point used when hydrating stored
//! records. It never fails: malformed text decodes to zero and the failure is
//! handed back to the caller instead of aborting the read.
//!
//! Decoded values are limited to [`MAX_SCALE`] digits of scale either way.
//! Arithmetic on a value like `1e20000000` expands it to millions of digits,
//! so such text is rejected like any other corruption.

use bigdecimal::BigDecimal;
use num_traits::Zero;
use std::str::FromStr;
use thiserror::Error;

/// Largest accepted scale magnitude, in decimal digits.
pub const MAX_SCALE: i64 = 1_000;

/// Errors raised when stored text is not a decimal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// The stored text was empty or whitespace only.
    #[error("empty decimal text")]
    Empty,
    /// The stored text could not be parsed as a decimal.
    #[error("malformed decimal text {text:?}: {reason}")]
    Malformed {
        /// The offending text.
        text: String,
        /// Parser message.
        reason: String,
    },
    /// The stored text is a decimal whose exponent is out of bounds.
    #[error("decimal text {text:?} has scale {scale}, beyond the accepted bound")]
    OutOfRange {
        /// The offending text.
        text: String,
        /// Scale the text decoded to.
        scale: i64,
    },
}

/// Outcome of a lenient decode.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded {
    /// The decoded value, zero when decoding failed.
    pub value: BigDecimal,
    /// Set when the text could not be decoded.
    pub error: Option<CodecError>,
}

impl Decoded {
    /// Returns true if the value is a substituted zero.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        self.error.is_some()
    }
}

/// Encodes a decimal as its canonical text form.
#[must_use]
pub fn encode(value: &BigDecimal) -> String {
    value.to_string()
}

/// Decodes text produced by [`encode`].
///
/// Surrounding whitespace is ignored. Plain and exponent notation are both
/// accepted.
///
/// # Errors
/// Returns [`CodecError`] if the text is empty, malformed, or its scale
/// exceeds [`MAX_SCALE`].
pub fn decode(text: &str) -> Result<BigDecimal, CodecError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(CodecError::Empty);
    }
    let value = BigDecimal::from_str(trimmed).map_err(|e| CodecError::Malformed {
        text: text.to_string(),
        reason: e.to_string(),
    })?;

    let (_, scale) = value.as_bigint_and_exponent();
    if scale.unsigned_abs() > MAX_SCALE.unsigned_abs() {
        return Err(CodecError::OutOfRange {
            text: text.to_string(),
            scale,
        });
    }
    Ok(value)
}

/// Decodes text, substituting zero when it is not a decimal.
#[must_use]
pub fn decode_or_zero(text: &str) -> Decoded {
    match decode(text) {
        Ok(value) => Decoded { value, error: None },
        Err(error) => Decoded {
            value: BigDecimal::zero(),
            error: Some(error),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(text: &str) {
        let value = BigDecimal::from_str(text).unwrap();
        let decoded = decode(&encode(&value)).unwrap();
        assert_eq!(decoded, value, "roundtrip of {text}");
    }

    #[test]
    fn test_roundtrip_zero_and_integers() {
        roundtrip("0");
        roundtrip("1");
        roundtrip("-42");
        roundtrip("115792089237316195423570985008687907853269984665640564039457584007913129639935");
    }

    #[test]
    fn test_roundtrip_long_fractions() {
        roundtrip("0.000000000000000001");
        roundtrip("1.123456789012345678901234567890123456789");
        roundtrip("-0.00000000000000000000000000000000000000000007");
        roundtrip("1e-40");
        roundtrip("5e30");
    }

    #[test]
    fn test_roundtrip_division_tail() {
        let third = BigDecimal::from(1) / BigDecimal::from(3);
        assert!(third.as_bigint_and_exponent().1 > 28);
        assert_eq!(decode(&encode(&third)).unwrap(), third);
    }

    #[test]
    fn test_encode_is_stable() {
        let value = BigDecimal::from_str("1234.5678").unwrap();
        let once = encode(&value);
        let twice = encode(&decode(&once).unwrap());
        assert_eq!(once, twice);
        assert_eq!(once, "1234.5678");
    }

    #[test]
    fn test_decode_trims_whitespace() {
        assert_eq!(decode(" 1.5 ").unwrap(), BigDecimal::from_str("1.5").unwrap());
    }

    #[test]
    fn test_decode_rejects_empty() {
        assert_eq!(decode(""), Err(CodecError::Empty));
        assert_eq!(decode("   "), Err(CodecError::Empty));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(decode("abc"), Err(CodecError::Malformed { .. })));
        assert!(matches!(decode("1.2.3"), Err(CodecError::Malformed { .. })));
    }

    #[test]
    fn test_decode_rejects_huge_exponents() {
        assert!(matches!(
            decode("1e20000000"),
            Err(CodecError::OutOfRange { scale: -20_000_000, .. })
        ));
        assert!(matches!(decode("1e-5000"), Err(CodecError::OutOfRange { .. })));
        assert!(decode("1e900000000000000000").is_err());

        let decoded = decode_or_zero("1e20000000");
        assert!(decoded.is_failure());
        assert!(decoded.value.is_zero());
    }

    #[test]
    fn test_decode_accepts_scale_at_bound() {
        assert!(decode("1e1000").is_ok());
        assert!(decode("1e-1000").is_ok());
    }

    #[test]
    fn test_decode_or_zero_flags_failure() {
        let decoded = decode_or_zero("not-a-number");
        assert!(decoded.is_failure());
        assert!(decoded.value.is_zero());

        let decoded = decode_or_zero("2.5");
        assert!(!decoded.is_failure());
        assert_eq!(decoded.value, BigDecimal::from_str("2.5").unwrap());
    }
}
