use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::types::UserId;

/// snapshot of the externally-held account, rebuilt from the ledger at the
/// start of every operation and discarded after
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountSnapshot {
    pub user_id: UserId,
    /// monthly income in pennies, 0 means unknown
    pub monthly_income: u64,
    pub active: bool,
    /// annual rate, `Rate::UNSET` until assigned on first open
    pub interest_rate: Rate,
    /// whole pennies, never fractional
    pub total_balance: u64,
    /// most recent settlement; a never-settled account reports "now",
    /// meaning zero elapsed time
    pub last_payout_date: DateTime<Utc>,
    /// sub-penny remainder carried from the previous settlement
    pub skipped_payout: Money,
}

impl AccountSnapshot {
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn has_rate(&self) -> bool {
        !self.interest_rate.is_unset()
    }
}
