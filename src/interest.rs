use rust_decimal::Decimal;

use crate::config::SettlementConfig;
use crate::decimal::{Money, Rate};
use crate::errors::{AccountError, Result};

/// computes the interest due for a single settlement
pub struct InterestCalculator {
    intervals_per_year: u32,
}

impl InterestCalculator {
    pub fn new(config: SettlementConfig) -> Self {
        Self {
            intervals_per_year: config.intervals_per_year(),
        }
    }

    /// interest accrued over the elapsed intervals, in fractional pennies.
    ///
    /// zero intervals accrue nothing; exactly one accrues
    /// `balance * (rate / 100) / intervals_per_year` in exact decimal
    /// arithmetic. More than one interval is rejected: missed intervals are
    /// never summed, callers must settle every interval to stay caught up
    pub fn accrued(&self, balance: u64, annual_rate: Rate, elapsed_intervals: u64) -> Result<Money> {
        if elapsed_intervals > 1 {
            return Err(AccountError::TooManyMissedIntervals {
                elapsed: elapsed_intervals,
            });
        }
        if elapsed_intervals == 0 {
            return Ok(Money::ZERO);
        }

        let interest = Decimal::from(balance) * annual_rate.as_fraction()
            / Decimal::from(self.intervals_per_year);
        Ok(Money::from_decimal(interest))
    }
}

impl Default for InterestCalculator {
    fn default() -> Self {
        Self::new(SettlementConfig::default())
    }
}
