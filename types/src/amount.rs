//! HBAR and token amount types.
//!
//! Amounts are fixed-point integers to avoid floating-point errors. HBAR is
//! counted in tinybars; token amounts in the token's smallest unit.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Neg;
use std::str::FromStr;

use crate::error::HbarError;

/// Decimals used for every token this wallet creates and transfers.
pub const TOKEN_DECIMALS: u32 = 2;

/// A signed HBAR amount in tinybars.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Hbar(i64);

impl Hbar {
    pub const ZERO: Self = Self(0);

    /// Tinybars per HBAR.
    pub const TINYBARS_PER_HBAR: i64 = 100_000_000;

    const FRACTION_DIGITS: usize = 8;

    pub fn from_tinybars(tinybars: i64) -> Self {
        Self(tinybars)
    }

    pub fn from_hbars(hbars: i64) -> Result<Self, HbarError> {
        hbars
            .checked_mul(Self::TINYBARS_PER_HBAR)
            .map(Self)
            .ok_or_else(|| HbarError::AmountOverflow(format!("{hbars} HBAR")))
    }

    pub fn tinybars(&self) -> i64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn is_negative(&self) -> bool {
        self.0 < 0
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }
}

impl Neg for Hbar {
    type Output = Self;
    fn neg(self) -> Self {
        Self(-self.0)
    }
}

/// Parses a decimal HBAR string such as `"10"`, `"1.5"` or `"-0.25"`.
impl FromStr for Hbar {
    type Err = HbarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || HbarError::InvalidHbar(s.to_string());
        let (negative, digits) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };
        let (whole, fraction) = match digits.split_once('.') {
            Some((w, f)) => (w, f),
            None => (digits, ""),
        };
        if whole.is_empty() && fraction.is_empty() {
            return Err(invalid());
        }
        if !whole.bytes().all(|b| b.is_ascii_digit())
            || !fraction.bytes().all(|b| b.is_ascii_digit())
            || fraction.len() > Self::FRACTION_DIGITS
            || (digits.contains('.') && fraction.is_empty())
        {
            return Err(invalid());
        }

        let whole: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid())?
        };
        let mut fraction_tinybars: i64 = 0;
        if !fraction.is_empty() {
            let padded = format!("{fraction:0<width$}", width = Self::FRACTION_DIGITS);
            fraction_tinybars = padded.parse().map_err(|_| invalid())?;
        }

        let tinybars = whole
            .checked_mul(Self::TINYBARS_PER_HBAR)
            .and_then(|t| t.checked_add(fraction_tinybars))
            .ok_or_else(|| HbarError::AmountOverflow(s.to_string()))?;
        Ok(Self(if negative { -tinybars } else { tinybars }))
    }
}

/// Renders as `"<hbars> ℏ"` with trailing fractional zeros trimmed.
impl fmt::Display for Hbar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let per = Self::TINYBARS_PER_HBAR as u64;
        let whole = abs / per;
        let fraction = abs % per;
        if fraction == 0 {
            write!(f, "{sign}{whole} ℏ")
        } else {
            let fraction = format!("{fraction:08}");
            write!(f, "{sign}{whole}.{} ℏ", fraction.trim_end_matches('0'))
        }
    }
}

/// A token amount in the token's smallest unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TokenAmount(u64);

impl TokenAmount {
    pub const ZERO: Self = Self(0);

    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }

    /// Convert a whole-unit amount typed by a user (e.g. `"5"`) into smallest
    /// units using [`TOKEN_DECIMALS`].
    pub fn from_whole_units(s: &str) -> Result<Self, HbarError> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(HbarError::InvalidTokenAmount(s.to_string()));
        }
        let whole: u64 = s
            .parse()
            .map_err(|_| HbarError::AmountOverflow(s.to_string()))?;
        whole
            .checked_mul(10u64.pow(TOKEN_DECIMALS))
            .map(Self)
            .ok_or_else(|| HbarError::AmountOverflow(s.to_string()))
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }
}

impl fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_whole_hbars() {
        assert_eq!("10".parse::<Hbar>().unwrap().tinybars(), 1_000_000_000);
    }

    #[test]
    fn parses_fractional_hbars() {
        assert_eq!("1.5".parse::<Hbar>().unwrap().tinybars(), 150_000_000);
        assert_eq!("0.00000001".parse::<Hbar>().unwrap().tinybars(), 1);
        assert_eq!(".5".parse::<Hbar>().unwrap().tinybars(), 50_000_000);
    }

    #[test]
    fn parses_negative_hbars() {
        assert_eq!("-0.25".parse::<Hbar>().unwrap().tinybars(), -25_000_000);
    }

    #[test]
    fn rejects_bad_hbar_text() {
        for bad in ["", "-", ".", "abc", "1.", "1.123456789", "1e5", "1,5", "--1"] {
            assert!(bad.parse::<Hbar>().is_err(), "{bad:?} should not parse");
        }
    }

    #[test]
    fn rejects_overflowing_hbar() {
        let err = "99999999999999999".parse::<Hbar>().unwrap_err();
        assert!(matches!(err, HbarError::AmountOverflow(_)));
    }

    #[test]
    fn display_trims_trailing_zeros() {
        assert_eq!(Hbar::from_tinybars(1_000_000_000).to_string(), "10 ℏ");
        assert_eq!(Hbar::from_tinybars(150_000_000).to_string(), "1.5 ℏ");
        assert_eq!(Hbar::from_tinybars(-1).to_string(), "-0.00000001 ℏ");
        assert_eq!(Hbar::ZERO.to_string(), "0 ℏ");
    }

    #[test]
    fn token_amount_scales_by_decimals() {
        assert_eq!(TokenAmount::from_whole_units("5").unwrap().raw(), 500);
        assert_eq!(TokenAmount::from_whole_units("0").unwrap().raw(), 0);
    }

    #[test]
    fn token_amount_rejects_non_integers() {
        for bad in ["", "1.5", "-3", "abc", " 4"] {
            assert!(TokenAmount::from_whole_units(bad).is_err(), "{bad:?}");
        }
    }

    #[test]
    fn token_amount_overflow() {
        assert!(TokenAmount::from_whole_units(&u64::MAX.to_string()).is_err());
    }
}
