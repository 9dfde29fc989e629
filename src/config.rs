use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::decimal::Rate;
use crate::errors::{AccountError, Result};

/// reference payout interval: interest settles every 3 days
pub const PAYOUT_INTERVAL_DAYS: u32 = 3;

/// an income band mapped to a fixed annual rate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateTier {
    pub annual_rate: Rate,
    /// lower income bound in pennies, inclusive
    pub min_income: u64,
    /// upper income bound in pennies, inclusive; 0 means unbounded
    pub max_income: u64,
}

impl RateTier {
    pub fn new(annual_rate: Rate, min_income: u64, max_income: u64) -> Self {
        Self {
            annual_rate,
            min_income,
            max_income,
        }
    }

    /// whether this tier has no upper income bound. The zero-floor tier
    /// (min 0, max 0) is not unbounded: it covers only zero/unknown income
    pub fn is_unbounded(&self) -> bool {
        self.max_income == 0 && self.min_income > 0
    }

    pub fn matches(&self, monthly_income: u64) -> bool {
        monthly_income >= self.min_income
            && (self.is_unbounded() || monthly_income <= self.max_income)
    }
}

/// ordered tier table; tiers must be mutually exclusive and jointly
/// exhaustive over all incomes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateTable {
    tiers: Vec<RateTier>,
}

impl RateTable {
    pub fn new(tiers: Vec<RateTier>) -> Result<Self> {
        let table = Self { tiers };
        table.validate()?;
        Ok(table)
    }

    /// the reference tier configuration: 0.50% for unknown income,
    /// 0.93% up to 4999 pennies monthly, 1.02% from 5000 up
    pub fn standard() -> Self {
        Self {
            tiers: vec![
                RateTier::new(Rate::from_percent(dec!(0.5)), 0, 0),
                RateTier::new(Rate::from_percent(dec!(0.93)), 1, 4999),
                RateTier::new(Rate::from_percent(dec!(1.02)), 5000, 0),
            ],
        }
    }

    pub fn tiers(&self) -> &[RateTier] {
        &self.tiers
    }

    /// zero-floor default tier, used for zero/unknown income
    pub fn zero_floor_tier(&self) -> Option<&RateTier> {
        self.tiers.iter().find(|tier| tier.min_income == 0)
    }

    fn validate(&self) -> Result<()> {
        if self.tiers.is_empty() {
            return Err(AccountError::InvalidConfiguration {
                message: "rate table has no tiers".to_string(),
            });
        }
        if self.zero_floor_tier().is_none() {
            return Err(AccountError::InvalidConfiguration {
                message: "rate table has no zero-floor tier".to_string(),
            });
        }
        // bounded tiers must not overlap each other
        for (i, a) in self.tiers.iter().enumerate() {
            for b in self.tiers.iter().skip(i + 1) {
                if a.min_income == 0 || b.min_income == 0 {
                    continue;
                }
                let a_max = if a.is_unbounded() { u64::MAX } else { a.max_income };
                let b_max = if b.is_unbounded() { u64::MAX } else { b.max_income };
                if a.min_income <= b_max && b.min_income <= a_max {
                    return Err(AccountError::InvalidConfiguration {
                        message: format!(
                            "tiers overlap: [{}, {}] and [{}, {}]",
                            a.min_income, a.max_income, b.min_income, b.max_income
                        ),
                    });
                }
            }
        }
        Ok(())
    }
}

impl Default for RateTable {
    fn default() -> Self {
        Self::standard()
    }
}

/// settlement cadence configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementConfig {
    pub payout_interval_days: u32,
}

impl SettlementConfig {
    pub fn new(payout_interval_days: u32) -> Self {
        Self {
            payout_interval_days,
        }
    }

    /// whole settlement intervals in a 365-day year (121 for 3-day intervals)
    pub fn intervals_per_year(&self) -> u32 {
        365 / self.payout_interval_days
    }
}

impl Default for SettlementConfig {
    fn default() -> Self {
        Self::new(PAYOUT_INTERVAL_DAYS)
    }
}
