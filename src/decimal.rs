use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};
use std::str::FromStr;

/// Money value in minor currency units (pennies), with fractional precision
/// for sub-penny interest remainders. Stored balances only ever hold whole
/// pennies; the fractional part exists in transit between settlements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);
    /// one whole penny, the minimum depositable unit
    pub const ONE_PENNY: Money = Money(Decimal::ONE);

    /// create from a whole number of pennies
    pub fn from_pennies(pennies: u64) -> Self {
        Money(Decimal::from(pennies))
    }

    /// create from decimal pennies
    pub fn from_decimal(d: Decimal) -> Self {
        Money(d)
    }

    /// create from string with exact parsing
    pub fn from_str_exact(s: &str) -> Result<Self, rust_decimal::Error> {
        Ok(Money(Decimal::from_str(s)?))
    }

    /// get underlying decimal
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// whole pennies contained in this value, fraction discarded
    pub fn whole_pennies(&self) -> u64 {
        self.0.trunc().to_u64().unwrap_or(0)
    }

    /// split into whole pennies plus fractional remainder; the two parts
    /// always reconstruct the original value exactly
    pub fn split(&self) -> (u64, Money) {
        let whole = self.0.trunc();
        (
            whole.to_u64().unwrap_or(0),
            Money(self.0 - whole),
        )
    }

    /// check if zero
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// check if strictly below one penny
    pub fn is_below_minimum_unit(&self) -> bool {
        self.0 < Decimal::ONE
    }

    /// round to specified decimal places
    pub fn round_dp(&self, dp: u32) -> Self {
        Money(self.0.round_dp(dp))
    }

    /// minimum of two values
    pub fn min(self, other: Self) -> Self {
        Money(self.0.min(other.0))
    }

    /// maximum of two values
    pub fn max(self, other: Self) -> Self {
        Money(self.0.max(other.0))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Money {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Money::from_str_exact(s)
    }
}

impl From<Decimal> for Money {
    fn from(d: Decimal) -> Self {
        Money::from_decimal(d)
    }
}

impl From<u64> for Money {
    fn from(pennies: u64) -> Self {
        Money::from_pennies(pennies)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, other: Money) -> Money {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Money) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, other: Money) -> Money {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Money) {
        self.0 -= other.0;
    }
}

/// Annual interest rate as a percentage (0.93 means 0.93% per year).
/// The zero value doubles as the "not yet assigned" sentinel on accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct Rate(Decimal);

impl Rate {
    /// sentinel for an account with no rate assigned yet
    pub const UNSET: Rate = Rate(Decimal::ZERO);

    /// create from a percentage value (e.g. 0.93 for 0.93%/year)
    pub fn from_percent(d: Decimal) -> Self {
        Rate(d)
    }

    /// get as percentage
    pub fn as_percent(&self) -> Decimal {
        self.0
    }

    /// get as a fraction (0.93% -> 0.0093)
    pub fn as_fraction(&self) -> Decimal {
        self.0 / Decimal::from(100)
    }

    /// whether this is the unassigned sentinel
    pub fn is_unset(&self) -> bool {
        self.0.is_zero()
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

impl From<Decimal> for Rate {
    fn from(d: Decimal) -> Self {
        Rate::from_percent(d)
    }
}
