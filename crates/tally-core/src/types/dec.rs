use std::fmt;
use std::str::FromStr;

use primitive_types::U256;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Number of fractional digits carried by [`Dec`]
pub const DEC_PRECISION: usize = 18;

const SCALE: u128 = 1_000_000_000_000_000_000;

/// Unsigned fixed-point decimal with 18 fractional digits.
///
/// Every operation truncates toward zero; intermediates are widened to 256
/// bits so only a result that does not fit back into 128 bits is reported
/// as [`CoreError::Overflow`].
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Dec(u128);

impl Dec {
    pub const ZERO: Dec = Dec(0);
    pub const ONE: Dec = Dec(SCALE);

    /// Build from raw units (value × 10^18)
    pub const fn from_raw(raw: u128) -> Self {
        Dec(raw)
    }

    pub fn from_int(value: u128) -> Result<Self, CoreError> {
        value.checked_mul(SCALE).map(Dec).ok_or(CoreError::Overflow)
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// `numerator / denominator`, truncated at 18 digits
    pub fn ratio(numerator: u128, denominator: Dec) -> Result<Dec, CoreError> {
        if denominator.is_zero() {
            return Err(CoreError::DivisionByZero);
        }
        let scaled = U256::from(numerator) * U256::from(SCALE) * U256::from(SCALE);
        narrow(scaled / U256::from(denominator.0)).map(Dec)
    }

    /// `floor(self × other)` as an integer amount
    pub fn mul_truncate(self, other: Dec) -> Result<u128, CoreError> {
        let product = U256::from(self.0) * U256::from(other.0);
        narrow(product / (U256::from(SCALE) * U256::from(SCALE)))
    }

    /// Integer part, dropping the fraction
    pub fn truncate(self) -> u128 {
        self.0 / SCALE
    }
}

fn narrow(value: U256) -> Result<u128, CoreError> {
    if value > U256::from(u128::MAX) {
        return Err(CoreError::Overflow);
    }
    Ok(value.as_u128())
}

impl FromStr for Dec {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CoreError::InvalidDecimal(s.to_string());

        let (int_part, frac_part) = match s.split_once('.') {
            Some((int_part, frac_part)) if !frac_part.is_empty() => (int_part, frac_part),
            Some(_) => return Err(invalid()),
            None => (s, ""),
        };

        let digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if int_part.is_empty() || !digits(int_part) || !digits(frac_part) {
            return Err(invalid());
        }
        if frac_part.len() > DEC_PRECISION {
            return Err(invalid());
        }

        let int: u128 = int_part.parse().map_err(|_| CoreError::Overflow)?;
        let frac: u128 = if frac_part.is_empty() {
            0
        } else {
            format!("{:0<width$}", frac_part, width = DEC_PRECISION)
                .parse()
                .map_err(|_| invalid())?
        };

        int.checked_mul(SCALE)
            .and_then(|v| v.checked_add(frac))
            .map(Dec)
            .ok_or(CoreError::Overflow)
    }
}

impl TryFrom<String> for Dec {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Dec> for String {
    fn from(dec: Dec) -> Self {
        dec.to_string()
    }
}

impl fmt::Display for Dec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:018}", self.0 / SCALE, self.0 % SCALE)
    }
}

impl fmt::Debug for Dec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Dec({})", self)
    }
}
