use hourglass_rs::SafeTimeProvider;
use log::debug;

use crate::config::SettlementConfig;
use crate::decimal::Money;
use crate::errors::Result;
use crate::events::{AccountEvent, EventStore};
use crate::interest::InterestCalculator;
use crate::ledger::LedgerClient;
use crate::schedule::PayoutScheduler;
use crate::state::AccountSnapshot;

/// outcome of one settlement attempt. Every variant is an expected result;
/// faults (missed intervals, ledger write failures) travel as errors
#[derive(Debug, Clone, PartialEq)]
pub enum SettlementResult {
    /// no whole interval has elapsed yet; steady state, not a failure
    NoPayoutDue,
    /// an interval elapsed but nothing accrued (zero balance or unset rate)
    ZeroInterestAccrued,
    /// accrued value plus carry is still under one penny; carried forward,
    /// balance untouched
    BelowMinimumUnit { carried: Money },
    /// whole pennies deposited, sub-penny remainder carried to next cycle
    Settled {
        new_balance: u64,
        amount_paid: u64,
        total_due: Money,
        remainder: Money,
    },
}

/// orchestrates one payout: due-ness, interest, remainder merge, split,
/// and the ledger persistence sequence
pub struct SettlementEngine {
    scheduler: PayoutScheduler,
    calculator: InterestCalculator,
}

impl SettlementEngine {
    pub fn new(config: SettlementConfig) -> Self {
        Self {
            scheduler: PayoutScheduler::new(config),
            calculator: InterestCalculator::new(config),
        }
    }

    /// run one settlement against a fresh snapshot.
    ///
    /// Persistence on the settled path happens strictly in the order
    /// deposit -> reset remainder -> set new remainder -> log transaction,
    /// so that a partial failure after the deposit leaves the remainder
    /// recoverable from the transaction log. No multi-step atomicity is
    /// assumed from the ledger.
    pub fn settle<L: LedgerClient>(
        &self,
        snapshot: &AccountSnapshot,
        ledger: &mut L,
        time_provider: &SafeTimeProvider,
        events: &mut EventStore,
    ) -> Result<SettlementResult> {
        let now = time_provider.now();

        let elapsed = self
            .scheduler
            .elapsed_intervals(snapshot.last_payout_date, now);
        if elapsed == 0 {
            debug!("no payout due for {}", snapshot.user_id);
            return Ok(SettlementResult::NoPayoutDue);
        }

        let interest =
            self.calculator
                .accrued(snapshot.total_balance, snapshot.interest_rate, elapsed)?;
        if interest.is_zero() {
            debug!("zero interest accrued for {}", snapshot.user_id);
            return Ok(SettlementResult::ZeroInterestAccrued);
        }

        events.emit(AccountEvent::InterestAccrued {
            user_id: snapshot.user_id,
            amount: interest,
            timestamp: now,
        });

        let total_due = interest + snapshot.skipped_payout;
        if total_due.is_below_minimum_unit() {
            // observed ledger behavior: the new interest value alone replaces
            // the stored remainder, it is not added to it
            ledger.set_skipped_payout(interest)?;
            ledger.record_transaction(now, true, snapshot.user_id)?;

            events.emit(AccountEvent::PayoutCarried {
                user_id: snapshot.user_id,
                carried: interest,
                timestamp: now,
            });
            debug!(
                "payout below minimum unit for {}, carrying {}",
                snapshot.user_id, interest
            );
            return Ok(SettlementResult::BelowMinimumUnit { carried: interest });
        }

        let (amount_paid, remainder) = total_due.split();

        let new_balance = ledger.deposit(amount_paid)?;
        ledger.reset_skipped_payout()?;
        ledger.set_skipped_payout(remainder)?;
        ledger.record_transaction(now, true, snapshot.user_id)?;

        events.emit(AccountEvent::PayoutSettled {
            user_id: snapshot.user_id,
            amount_paid,
            new_balance,
            remainder,
            timestamp: now,
        });
        debug!(
            "settled {} pennies for {}, remainder {}",
            amount_paid, snapshot.user_id, remainder
        );

        Ok(SettlementResult::Settled {
            new_balance,
            amount_paid,
            total_due,
            remainder,
        })
    }
}

impl Default for SettlementEngine {
    fn default() -> Self {
        Self::new(SettlementConfig::default())
    }
}
