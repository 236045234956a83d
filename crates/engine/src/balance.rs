use std::{fmt, str::FromStr};

use crate::EngineError;

/// Account balance represented as **integer cents**.
///
/// Use this type for all monetary values to avoid floating-point drift.
/// Balances are never negative and carry exactly two decimals of precision.
///
/// # Examples
///
/// ```rust
/// use engine::Balance;
///
/// let amount = Balance::try_from(12_34i64).unwrap();
/// assert_eq!(amount.minor(), 1234);
/// assert_eq!(amount.to_string(), "12.34");
/// ```
///
/// Parsing from user input (accepts `.` or `,` as decimal separator; rejects
/// more than 2 decimals and negative amounts):
///
/// ```rust
/// use engine::Balance;
///
/// assert_eq!("10".parse::<Balance>().unwrap().minor(), 1000);
/// assert_eq!("10,5".parse::<Balance>().unwrap().minor(), 1050);
/// assert!("12.345".parse::<Balance>().is_err());
/// assert!("-1".parse::<Balance>().is_err());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Balance(i64);

impl Balance {
    pub const ZERO: Balance = Balance(0);

    /// Returns the raw value in cents.
    #[must_use]
    pub const fn minor(self) -> i64 {
        self.0
    }

    /// Returns `true` if the balance is 0.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl TryFrom<i64> for Balance {
    type Error = EngineError;

    fn try_from(minor: i64) -> Result<Self, Self::Error> {
        if minor < 0 {
            return Err(EngineError::InvalidAmount(
                "balance cannot be negative".to_string(),
            ));
        }
        Ok(Balance(minor))
    }
}

impl TryFrom<f64> for Balance {
    type Error = EngineError;

    /// Converts a JSON number into cents, rounding to two decimals.
    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if !value.is_finite() {
            return Err(EngineError::InvalidAmount("invalid amount".to_string()));
        }
        if value < 0.0 {
            return Err(EngineError::InvalidAmount(
                "balance cannot be negative".to_string(),
            ));
        }
        let cents = (value * 100.0).round();
        if cents > i64::MAX as f64 {
            return Err(EngineError::InvalidAmount("amount too large".to_string()));
        }
        Ok(Balance(cents as i64))
    }
}

impl From<Balance> for i64 {
    fn from(value: Balance) -> Self {
        value.0
    }
}

impl FromStr for Balance {
    type Err = EngineError;

    /// Parses a decimal string into cents.
    ///
    /// Accepts `.` or `,` as decimal separator.
    ///
    /// Validation rules:
    /// - max 2 fractional digits (rejects `12.345`)
    /// - rejects negative, empty, and otherwise malformed strings
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let empty = || EngineError::InvalidAmount("empty amount".to_string());
        let invalid = || EngineError::InvalidAmount("invalid amount".to_string());
        let overflow = || EngineError::InvalidAmount("amount too large".to_string());

        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(empty());
        }
        if trimmed.starts_with('-') {
            return Err(EngineError::InvalidAmount(
                "balance cannot be negative".to_string(),
            ));
        }
        let trimmed = trimmed.strip_prefix('+').unwrap_or(trimmed).trim();
        if trimmed.is_empty() {
            return Err(empty());
        }

        let normalized = trimmed.replace(',', ".");
        let mut parts = normalized.split('.');
        let units_str = parts.next().ok_or_else(invalid)?;
        let cents_str = parts.next();

        if parts.next().is_some() {
            return Err(invalid());
        }

        if units_str.is_empty() || !units_str.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }

        let units: i64 = units_str.parse().map_err(|_| invalid())?;

        let cents: i64 = match cents_str {
            None | Some("") => 0,
            Some(frac) => {
                if !frac.chars().all(|c| c.is_ascii_digit()) {
                    return Err(invalid());
                }
                match frac.len() {
                    1 => frac.parse::<i64>().map_err(|_| invalid())? * 10,
                    2 => frac.parse::<i64>().map_err(|_| invalid())?,
                    _ => return Err(EngineError::InvalidAmount("too many decimals".to_string())),
                }
            }
        };

        let total = units
            .checked_mul(100)
            .and_then(|v| v.checked_add(cents))
            .ok_or_else(overflow)?;

        Ok(Balance(total))
    }
}
