use core::fmt;
use core::str::FromStr;

use thiserror::Error;

use crate::decode::{expect_byte, Decode, DecodeError};
use crate::encode::Encode;
use crate::DECIMAL_POSITION;

const DIGITS: &[u8] = b"0123456789";

/// A signed weight reading with two fractional digits.
///
/// `Weight` stores the reading as a whole number of hundredths of a display
/// unit, so `70.15 kg` is held as `7015`. On the wire the magnitude occupies a
/// fixed six-digit field, which bounds every value to `±9999.99`.
///
/// # Invariants
///
/// - `|hundredths| <= Weight::MAX_HUNDREDTHS`.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Weight {
    hundredths: i32,
}

impl Weight {
    /// Largest magnitude, in hundredths, that fits the six-digit field.
    pub const MAX_HUNDREDTHS: i32 = 999_999;

    pub const ZERO: Self = Self { hundredths: 0 };

    /// Creates a new [`Weight`] from a count of hundredths.
    ///
    /// # Panics
    ///
    /// Panics if `|hundredths|` exceeds [`Weight::MAX_HUNDREDTHS`].
    pub const fn new(hundredths: i32) -> Self {
        match Self::try_new(hundredths) {
            Ok(weight) => weight,
            Err(_) => panic!("Weight does not fit in the six-digit magnitude field"),
        }
    }

    /// Tries to create a new [`Weight`] from a count of hundredths.
    ///
    /// # Errors
    ///
    /// Returns a [`WeightRangeError`] if `|hundredths|` exceeds
    /// [`Weight::MAX_HUNDREDTHS`].
    pub const fn try_new(hundredths: i32) -> Result<Self, WeightRangeError> {
        if hundredths.unsigned_abs() > Self::MAX_HUNDREDTHS as u32 {
            Err(WeightRangeError {
                hundredths: hundredths as i64,
            })
        } else {
            Ok(Self { hundredths })
        }
    }

    /// Converts a floating point reading, truncating toward zero past the
    /// second fractional digit.
    ///
    /// # Errors
    ///
    /// Returns a [`WeightRangeError`] if the value is not finite or does not
    /// fit the magnitude field.
    pub fn from_f64(value: f64) -> Result<Self, WeightRangeError> {
        if !value.is_finite() {
            return Err(WeightRangeError {
                hundredths: if value.is_sign_negative() { i64::MIN } else { i64::MAX },
            });
        }

        // `as` truncates toward zero and saturates.
        let hundredths = (value * 100.0) as i64;
        i32::try_from(hundredths)
            .map_err(|_| WeightRangeError { hundredths })
            .and_then(Self::try_new)
    }

    /// Returns the inner count of hundredths.
    pub const fn hundredths(self) -> i32 {
        self.hundredths
    }

    /// Returns the reading as a float in display units.
    pub fn as_f64(self) -> f64 {
        self.hundredths as f64 / 100.0
    }

    pub const fn is_negative(self) -> bool {
        self.hundredths < 0
    }

    /// Sign character sent ahead of the magnitude.
    pub const fn sign(self) -> u8 {
        if self.is_negative() { b'-' } else { b'+' }
    }

    /// Magnitude rendered as six zero-padded ASCII digits.
    pub fn digits(self) -> [u8; 6] {
        let mut magnitude = self.hundredths.unsigned_abs();
        let mut digits = [b'0'; 6];
        for digit in digits.iter_mut().rev() {
            *digit = b'0' + (magnitude % 10) as u8;
            magnitude /= 10;
        }
        digits
    }
}

impl fmt::Display for Weight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let magnitude = self.hundredths.unsigned_abs();
        if self.is_negative() {
            f.write_str("-")?;
        }
        write!(f, "{}.{:02}", magnitude / 100, magnitude % 100)
    }
}

impl FromStr for Weight {
    type Err = ParseWeightError;

    /// Parses a decimal reading such as `70.15`, `-2.15` or `+3`.
    ///
    /// Fractional digits past the second are truncated.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (negative, unsigned) = match s.as_bytes().first() {
            Some(b'-') => (true, &s[1..]),
            Some(b'+') => (false, &s[1..]),
            _ => (false, s),
        };

        let (whole, fraction) = match unsigned.split_once('.') {
            Some((whole, fraction)) => (whole, fraction),
            None => (unsigned, ""),
        };
        if whole.is_empty() && fraction.is_empty() {
            return Err(ParseWeightError::Empty);
        }

        let mut hundredths: i64 = 0;
        for c in whole.chars() {
            let digit = c.to_digit(10).ok_or(ParseWeightError::InvalidDigit(c))?;
            hundredths = hundredths * 10 + digit as i64;
            if hundredths > Weight::MAX_HUNDREDTHS as i64 {
                return Err(WeightRangeError {
                    hundredths: hundredths * 100,
                }
                .into());
            }
        }

        let mut scale = 10;
        hundredths *= 100;
        for (i, c) in fraction.chars().enumerate() {
            let digit = c.to_digit(10).ok_or(ParseWeightError::InvalidDigit(c))?;
            if i < 2 {
                hundredths += digit as i64 * scale;
                scale /= 10;
            }
        }

        if negative {
            hundredths = -hundredths;
        }

        i32::try_from(hundredths)
            .map_err(|_| WeightRangeError { hundredths })
            .and_then(Self::try_new)
            .map_err(Into::into)
    }
}

/// `SIGN DIGITS×6 DECIMAL_POS`
impl Encode for Weight {
    fn size(&self) -> usize {
        8
    }

    fn encode(&self, data: &mut [u8]) {
        data[0] = self.sign();
        self.digits().encode(&mut data[1..]);
        data[7] = DECIMAL_POSITION;
    }
}

impl Decode for Weight {
    fn decode(data: &mut &[u8]) -> Result<Self, DecodeError> {
        let sign = expect_byte::<Self>(data, "sign", b"+-")?;

        let mut magnitude: i32 = 0;
        for _ in 0..6 {
            let digit = expect_byte::<Self>(data, "digit", DIGITS)?;
            magnitude = magnitude * 10 + (digit - b'0') as i32;
        }

        expect_byte::<Self>(data, "decimal position", &[DECIMAL_POSITION])?;

        // Six digits never exceed `MAX_HUNDREDTHS`.
        Ok(Self {
            hundredths: if sign == b'-' { -magnitude } else { magnitude },
        })
    }
}

/// Returned when a value does not fit the six-digit magnitude field.
#[derive(Error, Clone, Copy, PartialEq, Eq, Debug)]
#[error("{hundredths} hundredths does not fit in the six-digit magnitude field")]
pub struct WeightRangeError {
    pub hundredths: i64,
}

#[derive(Error, Clone, Copy, PartialEq, Eq, Debug)]
pub enum ParseWeightError {
    #[error("cannot parse a weight from an empty string")]
    Empty,

    #[error("invalid character {0:?} in weight")]
    InvalidDigit(char),

    #[error(transparent)]
    OutOfRange(#[from] WeightRangeError),
}
