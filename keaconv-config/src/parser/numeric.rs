//! Numeric literal codec
//!
//! Converts number tokens to fixed width big-endian byte strings. The base
//! is inferred when zero: `0x` means hex, a leading `0` followed by a digit
//! means octal, anything else decimal. Negative values are bounded by
//! `2^(width-1)`, non-negative ones by `2^width - 1`.

use thiserror::Error;

/// Failure to convert a number token
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NumberError {
    #[error("Bogus number: {text}")]
    Bogus { text: String },

    #[error("Bogus number {text}: digit {digit} not in base {base}")]
    InvalidDigit { text: String, digit: u32, base: u32 },

    #[error("{text} exceeds max ({max}) for precision")]
    Overflow { text: String, max: u64 },

    #[error("Unexpected integer size: {0}")]
    UnsupportedWidth(u32),
}

/// Sign and magnitude of a number token
fn magnitude(text: &str, base: u32) -> Result<(bool, u64), NumberError> {
    let bogus = || NumberError::Bogus {
        text: text.to_string(),
    };
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };

    let (base, digits) = match base {
        0 => {
            if let Some(hex) = digits
                .strip_prefix("0x")
                .or_else(|| digits.strip_prefix("0X"))
            {
                (16, hex)
            } else if digits.len() > 1
                && digits.starts_with('0')
                && digits.as_bytes()[1].is_ascii_digit()
            {
                (8, &digits[1..])
            } else {
                (10, digits)
            }
        }
        base => (base, digits),
    };

    if digits.is_empty() {
        return Err(bogus());
    }

    let mut value: u64 = 0;
    for c in digits.chars() {
        let digit = c.to_digit(36).ok_or_else(bogus)?;
        if digit >= base {
            return Err(NumberError::InvalidDigit {
                text: text.to_string(),
                digit,
                base,
            });
        }
        value = value
            .checked_mul(u64::from(base))
            .and_then(|v| v.checked_add(u64::from(digit)))
            .ok_or_else(|| NumberError::Overflow {
                text: text.to_string(),
                max: u64::MAX,
            })?;
    }
    Ok((negative, value))
}

/// Convert `text` to a `width` bit big-endian value
pub fn convert(text: &str, base: u32, width: u32) -> Result<Vec<u8>, NumberError> {
    if !matches!(width, 8 | 16 | 32) {
        return Err(NumberError::UnsupportedWidth(width));
    }
    let (negative, value) = magnitude(text, base)?;

    let max = if negative {
        1u64 << (width - 1)
    } else {
        (1u64 << width) - 1
    };
    if value > max {
        return Err(NumberError::Overflow {
            text: text.to_string(),
            max,
        });
    }

    let encoded = if negative {
        value.wrapping_neg()
    } else {
        value
    };
    let bytes = encoded.to_be_bytes();
    Ok(bytes[8 - (width as usize / 8)..].to_vec())
}

/// Read back a big-endian value produced by [`convert`]
pub fn decode(bytes: &[u8], signed: bool) -> i64 {
    let mut value: u64 = 0;
    for b in bytes {
        value = (value << 8) | u64::from(*b);
    }
    let bits = bytes.len() * 8;
    if signed && bits > 0 && bits < 64 && value >> (bits - 1) == 1 {
        (value as i64) - (1i64 << bits)
    } else {
        value as i64
    }
}

/// Integer value of a number token, base inferred
pub fn parse_integer(text: &str) -> Result<i64, NumberError> {
    let (negative, value) = magnitude(text, 0)?;
    let value = i64::try_from(value).map_err(|_| NumberError::Overflow {
        text: text.to_string(),
        max: i64::MAX as u64,
    })?;
    Ok(if negative { -value } else { value })
}

/// Leading decimal digits of `text`, zero when there are none
pub fn leading_decimal(text: &str) -> u32 {
    text.bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0u32, |acc, b| acc.saturating_mul(10).saturating_add(u32::from(b - b'0')))
}
