use chrono::{DateTime, Utc};
use hourglass_rs::{SafeTimeProvider, TimeSource};
use log::warn;

use crate::config::{RateTable, SettlementConfig};
use crate::errors::{AccountError, Result};
use crate::events::{AccountEvent, EventStore};
use crate::ledger::LedgerClient;
use crate::outcome::{ErrorCode, Outcome};
use crate::rates::RateSelector;
use crate::settlement::{SettlementEngine, SettlementResult};
use crate::state::AccountSnapshot;
use crate::types::UserId;

/// per-user façade over the ledger and the settlement machinery.
///
/// Each operation re-activates the account by fetching a fresh snapshot
/// from the ledger; an inactive account short-circuits with a structured
/// `AccountNotActive` outcome and performs no further work. Sessions own
/// their ledger handle, so two sessions for two users never share mutable
/// state.
pub struct AccountSession<L: LedgerClient> {
    user_id: UserId,
    ledger: L,
    rate_selector: RateSelector,
    engine: SettlementEngine,
    events: EventStore,
}

impl<L: LedgerClient> AccountSession<L> {
    /// session with the standard rate table and settlement cadence
    pub fn new(user_id: UserId, ledger: L) -> Self {
        let config = SettlementConfig::default();
        Self {
            user_id,
            ledger,
            rate_selector: RateSelector::new(RateTable::standard()),
            engine: SettlementEngine::new(config),
            events: EventStore::new(),
        }
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// drain events collected by the operations so far
    pub fn take_events(&mut self) -> Vec<AccountEvent> {
        self.events.take_events()
    }

    /// pull a fresh snapshot of the externally-held account state
    fn activate(&self, now: DateTime<Utc>) -> AccountSnapshot {
        let profile = self.ledger.fetch_account();
        AccountSnapshot {
            user_id: self.user_id,
            monthly_income: profile.monthly_income,
            active: profile.active,
            interest_rate: self.ledger.interest_rate(),
            total_balance: self.ledger.balance(),
            last_payout_date: self.ledger.last_payout_date(now),
            skipped_payout: self.ledger.skipped_payout(),
        }
    }

    /// open the interest account with system time
    pub fn open_interest_account_now(&mut self) -> Outcome {
        let time = SafeTimeProvider::new(TimeSource::System);
        self.open_interest_account(&time)
    }

    /// open and activate the interest account.
    ///
    /// Idempotent: a rate is selected and persisted only the first time,
    /// when the fetched rate is still the unset sentinel; afterwards the
    /// persisted rate is reused unconditionally
    pub fn open_interest_account(&mut self, time_provider: &SafeTimeProvider) -> Outcome {
        let now = time_provider.now();
        let snapshot = self.activate(now);
        if !snapshot.is_active() {
            return Outcome::account_not_active();
        }

        let rate = if snapshot.has_rate() {
            snapshot.interest_rate
        } else {
            match self.rate_selector.select_rate(snapshot.monthly_income) {
                Ok(rate) => {
                    if let Err(err) = self.ledger.set_interest_rate(rate) {
                        return Outcome::failed(ErrorCode::RateAssignment, err.to_string());
                    }
                    self.events.emit(AccountEvent::RateAssigned {
                        user_id: self.user_id,
                        rate,
                        timestamp: now,
                    });
                    rate
                }
                Err(err) => {
                    return Outcome::failed(ErrorCode::RateAssignment, err.to_string());
                }
            }
        };

        Outcome::ok("account opened and active")
            .with_data("rate", rate.as_percent().to_string())
    }

    /// creation of interest accounts by third parties is not offered.
    ///
    /// Probes for an existing active account first and fails with
    /// `AccountAlreadyActive` when one is found; otherwise always fails
    /// with `NotSupported`. Never returns `Ok` — the asymmetry is kept for
    /// compatibility with current callers
    pub fn create_interest_account(&mut self) -> Result<Outcome> {
        let profile = self.ledger.fetch_account();
        if profile.active {
            return Err(AccountError::AccountAlreadyActive);
        }
        Err(AccountError::NotSupported)
    }

    /// deposit with system time
    pub fn deposit_funds_now(&mut self, amount: i64) -> Result<Outcome> {
        let time = SafeTimeProvider::new(TimeSource::System);
        self.deposit_funds(amount, &time)
    }

    /// deposit whole pennies into the account.
    ///
    /// Amounts below one penny are rejected before any ledger call. A
    /// ledger failure on the write itself is escalated as a fatal error:
    /// silently failing a deposit would lose money
    pub fn deposit_funds(
        &mut self,
        amount: i64,
        time_provider: &SafeTimeProvider,
    ) -> Result<Outcome> {
        let now = time_provider.now();
        let snapshot = self.activate(now);
        if !snapshot.is_active() {
            return Ok(Outcome::account_not_active());
        }

        if amount < 1 {
            return Ok(Outcome::failed(
                ErrorCode::InvalidDeposit,
                AccountError::InvalidDepositAmount { amount }.to_string(),
            ));
        }

        let new_balance =
            self.ledger
                .deposit(amount as u64)
                .map_err(|err| AccountError::DepositFailed {
                    message: err.to_string(),
                })?;

        self.events.emit(AccountEvent::FundsDeposited {
            user_id: self.user_id,
            amount: amount as u64,
            new_balance,
            timestamp: now,
        });

        Ok(Outcome::ok("funds have been successfully deposited")
            .with_data("totalBalance", new_balance))
    }

    /// payout with system time
    pub fn payout_now(&mut self) -> Outcome {
        let time = SafeTimeProvider::new(TimeSource::System);
        self.payout(&time)
    }

    /// settle accrued interest into the balance, merging any carried
    /// sub-penny remainder
    pub fn payout(&mut self, time_provider: &SafeTimeProvider) -> Outcome {
        let snapshot = self.activate(time_provider.now());
        if !snapshot.is_active() {
            return Outcome::account_not_active();
        }

        let result = self
            .engine
            .settle(&snapshot, &mut self.ledger, time_provider, &mut self.events);

        match result {
            Ok(SettlementResult::NoPayoutDue) => Outcome::ok("no payout due this interval"),
            Ok(SettlementResult::ZeroInterestAccrued) => {
                Outcome::ok("no interest accrued this interval")
            }
            Ok(SettlementResult::BelowMinimumUnit { carried }) => {
                Outcome::ok("payout below one penny, remainder carried forward")
                    .with_data("skippedPayout", carried.to_string())
            }
            Ok(SettlementResult::Settled {
                new_balance,
                total_due,
                remainder,
                ..
            }) => Outcome::ok("interest has been successfully paid out")
                .with_data("totalBalance", new_balance)
                .with_data("totalPaid", total_due.to_string())
                .with_data("skippedPayout", remainder.to_string()),
            Err(err @ AccountError::TooManyMissedIntervals { .. }) => {
                Outcome::failed(ErrorCode::InterestCalculation, err.to_string())
            }
            Err(err) => {
                warn!("payout failed for {}: {}", self.user_id, err);
                Outcome::failed(ErrorCode::Default, err.to_string())
            }
        }
    }

    /// statement with system time
    pub fn list_statement_now(&mut self) -> Outcome {
        let time = SafeTimeProvider::new(TimeSource::System);
        self.list_statement(&time)
    }

    /// list the transaction statement, most-recent first
    pub fn list_statement(&mut self, time_provider: &SafeTimeProvider) -> Outcome {
        let snapshot = self.activate(time_provider.now());
        if !snapshot.is_active() {
            return Outcome::account_not_active();
        }

        let statement = self.ledger.statement();
        let transactions = serde_json::to_value(&statement).unwrap_or_default();
        Outcome::ok("statement retrieved").with_data("transactions", transactions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decimal::{Money, Rate};
    use crate::ledger::InMemoryLedger;
    use chrono::{Duration, TimeZone, Utc};
    use rust_decimal_macros::dec;
    use serde_json::Value;

    fn test_time() -> SafeTimeProvider {
        SafeTimeProvider::new(TimeSource::Test(
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        ))
    }

    fn active_session(monthly_income: u64) -> AccountSession<InMemoryLedger> {
        let user_id = UserId::random();
        let ledger = InMemoryLedger::new(user_id, monthly_income);
        AccountSession::new(user_id, ledger)
    }

    #[test]
    fn test_open_assigns_rate_from_income_tier() {
        let time = test_time();
        let mut session = active_session(4000);
        let outcome = session.open_interest_account(&time);

        assert!(outcome.success);
        assert_eq!(outcome.data_value("rate"), Some(&Value::from("0.93")));
        assert_eq!(
            session.ledger().interest_rate(),
            Rate::from_percent(dec!(0.93))
        );
    }

    #[test]
    fn test_open_is_idempotent() {
        let time = test_time();
        let mut session = active_session(6000);
        assert!(session.open_interest_account(&time).success);
        let second = session.open_interest_account(&time);

        assert!(second.success);
        // persisted rate reused, not re-selected or re-written
        assert_eq!(second.data_value("rate"), Some(&Value::from("1.02")));
        assert_eq!(
            session.ledger().interest_rate(),
            Rate::from_percent(dec!(1.02))
        );
    }

    #[test]
    fn test_open_with_unknown_income_takes_zero_floor() {
        let time = test_time();
        let mut session = active_session(0);
        let outcome = session.open_interest_account(&time);

        assert!(outcome.success);
        assert_eq!(outcome.data_value("rate"), Some(&Value::from("0.5")));
    }

    #[test]
    fn test_open_inactive_account_short_circuits() {
        let time = test_time();
        let user_id = UserId::random();
        let ledger = InMemoryLedger::inactive(user_id);
        let mut session = AccountSession::new(user_id, ledger);

        let outcome = session.open_interest_account(&time);
        assert!(!outcome.success);
        assert_eq!(outcome.error_code, ErrorCode::AccountNotActive);
        assert!(session.ledger().interest_rate().is_unset());
    }

    #[test]
    fn test_create_on_active_account_is_rejected() {
        let mut session = active_session(4000);
        assert!(matches!(
            session.create_interest_account(),
            Err(AccountError::AccountAlreadyActive)
        ));
    }

    #[test]
    fn test_create_is_not_supported() {
        let user_id = UserId::random();
        let ledger = InMemoryLedger::inactive(user_id);
        let mut session = AccountSession::new(user_id, ledger);

        assert!(matches!(
            session.create_interest_account(),
            Err(AccountError::NotSupported)
        ));
    }

    #[test]
    fn test_deposit_below_minimum_rejected_before_ledger_call() {
        let time = test_time();
        let mut session = active_session(4000);

        for amount in [0, -5] {
            let outcome = session.deposit_funds(amount, &time).unwrap();
            assert!(!outcome.success);
            assert_eq!(outcome.error_code, ErrorCode::InvalidDeposit);
        }
        assert_eq!(session.ledger().balance(), 0);
        assert_eq!(session.ledger().transaction_count(), 0);
    }

    #[test]
    fn test_deposit_returns_ledger_reported_balance() {
        let time = test_time();
        let mut session = active_session(4000);
        let outcome = session.deposit_funds(50, &time).unwrap();

        assert!(outcome.success);
        assert_eq!(outcome.data_value("totalBalance"), Some(&Value::from(50u64)));
        assert_eq!(session.ledger().balance(), 50);
    }

    #[test]
    fn test_deposit_failure_is_fatal() {
        let time = test_time();
        let user_id = UserId::random();
        let mut ledger = InMemoryLedger::new(user_id, 4000);
        ledger.set_fail_deposits(true);
        let mut session = AccountSession::new(user_id, ledger);

        assert!(matches!(
            session.deposit_funds(50, &time),
            Err(AccountError::DepositFailed { .. })
        ));
    }

    #[test]
    fn test_deposit_inactive_account_makes_no_ledger_call() {
        let time = test_time();
        let user_id = UserId::random();
        let ledger = InMemoryLedger::inactive(user_id);
        let mut session = AccountSession::new(user_id, ledger);

        let outcome = session.deposit_funds(50, &time).unwrap();
        assert_eq!(outcome.error_code, ErrorCode::AccountNotActive);
        assert_eq!(session.ledger().balance(), 0);
    }

    #[test]
    fn test_payout_full_cycle() {
        let time = test_time();
        let control = time.test_control().unwrap();
        let user_id = UserId::random();
        let opened_at = time.now();
        let ledger = InMemoryLedger::new(user_id, 4000)
            .with_balance(600_000)
            .with_rate(Rate::from_percent(dec!(0.93)))
            .with_last_payout(opened_at);
        let mut session = AccountSession::new(user_id, ledger);

        // same interval: steady-state no-payout, twice
        let first = session.payout(&time);
        assert!(first.success);
        assert_eq!(first.message, "no payout due this interval");
        assert!(session.payout(&time).success);
        assert_eq!(session.ledger().balance(), 600_000);

        // one full interval later the interest lands, minus the carry
        control.advance(Duration::days(3));
        let settled = session.payout(&time);
        assert!(settled.success);
        assert_eq!(
            settled.data_value("totalBalance"),
            Some(&Value::from(600_046u64))
        );
        assert_eq!(session.ledger().balance(), 600_046);
        assert!(!session.ledger().skipped_payout().is_zero());
    }

    #[test]
    fn test_payout_missed_intervals_is_structured_failure() {
        let time = test_time();
        let control = time.test_control().unwrap();
        let user_id = UserId::random();
        let opened_at = time.now();
        let ledger = InMemoryLedger::new(user_id, 4000)
            .with_balance(600_000)
            .with_rate(Rate::from_percent(dec!(0.93)))
            .with_last_payout(opened_at);
        let mut session = AccountSession::new(user_id, ledger);

        control.advance(Duration::days(7));
        let outcome = session.payout(&time);

        assert!(!outcome.success);
        assert_eq!(outcome.error_code, ErrorCode::InterestCalculation);
        assert_eq!(session.ledger().balance(), 600_000);
    }

    #[test]
    fn test_payout_inactive_account_short_circuits() {
        let time = test_time();
        let user_id = UserId::random();
        let ledger = InMemoryLedger::inactive(user_id);
        let mut session = AccountSession::new(user_id, ledger);

        let outcome = session.payout(&time);
        assert_eq!(outcome.error_code, ErrorCode::AccountNotActive);
    }

    #[test]
    fn test_list_statement_returns_transactions() {
        let time = test_time();
        let mut session = active_session(4000);
        session.deposit_funds(25, &time).unwrap();
        session.deposit_funds(75, &time).unwrap();

        let outcome = session.list_statement(&time);
        assert!(outcome.success);
        let transactions = outcome.data_value("transactions").unwrap();
        assert_eq!(transactions.as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_sessions_do_not_share_state() {
        let time = test_time();
        let mut first = active_session(4000);
        let mut second = active_session(4000);

        first.deposit_funds(100, &time).unwrap();
        assert_eq!(first.ledger().balance(), 100);
        assert_eq!(second.ledger().balance(), 0);

        second.open_interest_account(&time);
        assert!(second.ledger().interest_rate() == Rate::from_percent(dec!(0.93)));
        assert!(first.ledger().interest_rate().is_unset());
    }

    #[test]
    fn test_events_are_collected_and_drained() {
        let time = test_time();
        let mut session = active_session(4000);
        session.open_interest_account(&time);
        session.deposit_funds(50, &time).unwrap();

        let events = session.take_events();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], AccountEvent::RateAssigned { .. }));
        assert!(matches!(events[1], AccountEvent::FundsDeposited { .. }));
        assert!(session.take_events().is_empty());
    }

    #[test]
    fn test_conservation_over_consecutive_payouts() {
        // the user never loses sub-penny value: over several cycles the
        // deposited pennies plus the final carry equal the raw accruals
        let time = test_time();
        let control = time.test_control().unwrap();
        let user_id = UserId::random();
        let opened_at = time.now();
        let ledger = InMemoryLedger::new(user_id, 4000)
            .with_balance(600_000)
            .with_rate(Rate::from_percent(dec!(0.93)))
            .with_last_payout(opened_at);
        let mut session = AccountSession::new(user_id, ledger);

        let mut total_accrued = Money::ZERO;
        let mut total_paid = Money::ZERO;
        for _ in 0..4 {
            let balance_before = session.ledger().balance();
            control.advance(Duration::days(3));
            let outcome = session.payout(&time);
            assert!(outcome.success);

            total_accrued += Money::from_decimal(
                rust_decimal::Decimal::from(balance_before) * dec!(0.0093) / dec!(121),
            );
            total_paid += Money::from_pennies(session.ledger().balance() - balance_before);
        }

        assert_eq!(total_paid + session.ledger().skipped_payout(), total_accrued);
    }
}
