use chrono::{DateTime, Utc};

use crate::config::SettlementConfig;

/// computes elapsed whole payout intervals since the last settlement
pub struct PayoutScheduler {
    config: SettlementConfig,
}

impl PayoutScheduler {
    pub fn new(config: SettlementConfig) -> Self {
        Self { config }
    }

    /// whole intervals between the last payout and now: absolute whole-day
    /// difference, floor-divided by the interval length. Zero inside the
    /// first interval window; never negative
    pub fn elapsed_intervals(&self, last_payout: DateTime<Utc>, now: DateTime<Utc>) -> u64 {
        let days = (now - last_payout).num_days().unsigned_abs();
        days / u64::from(self.config.payout_interval_days)
    }
}

impl Default for PayoutScheduler {
    fn default() -> Self {
        Self::new(SettlementConfig::default())
    }
}
