use crate::config::RateTable;
use crate::decimal::Rate;
use crate::errors::{AccountError, Result};

/// picks the applicable annual rate for a monthly income
pub struct RateSelector {
    table: RateTable,
}

impl RateSelector {
    pub fn new(table: RateTable) -> Self {
        Self { table }
    }

    /// select the rate for the given monthly income in pennies.
    ///
    /// income below 1 penny takes the zero-floor default tier regardless of
    /// other tiers; otherwise the first tier in table order whose band
    /// contains the income wins
    pub fn select_rate(&self, monthly_income: u64) -> Result<Rate> {
        if monthly_income < 1 {
            if let Some(tier) = self.table.zero_floor_tier() {
                return Ok(tier.annual_rate);
            }
        }

        self.table
            .tiers()
            .iter()
            .find(|tier| tier.matches(monthly_income))
            .map(|tier| tier.annual_rate)
            .ok_or(AccountError::NoApplicableRate { monthly_income })
    }
}

impl Default for RateSelector {
    fn default() -> Self {
        Self::new(RateTable::standard())
    }
}
