use chrono::{DateTime, Utc};

use crate::decimal::{Money, Rate};
use crate::errors::{AccountError, Result};
use crate::types::{AccountProfile, Transaction, TransactionKind, UserId};

/// contract for the external account/ledger service. All operations are
/// keyed by the session's user.
///
/// Read operations degrade to documented defaults when the remote side
/// misbehaves (inactive profile, `Rate::UNSET`, zero balance, empty
/// statement) — callers must treat those as "unknown", not "confirmed
/// zero". Write operations surface failure through `Result`; nothing here
/// retries.
pub trait LedgerClient {
    /// current account existence and metadata
    fn fetch_account(&self) -> AccountProfile;

    /// assigned annual rate, `Rate::UNSET` if none yet
    fn interest_rate(&self) -> Rate;

    /// persist the rate; fails if one is already assigned
    fn set_interest_rate(&mut self, rate: Rate) -> Result<()>;

    /// current balance in whole pennies
    fn balance(&self) -> u64;

    /// add whole pennies to the balance, returning the new balance.
    /// a failure here is fatal for deposit flows and must not be swallowed
    fn deposit(&mut self, pennies: u64) -> Result<u64>;

    /// sum of previously stored sub-penny remainder records
    fn skipped_payout(&self) -> Money;

    /// store a remainder value for the next settlement
    fn set_skipped_payout(&mut self, amount: Money) -> Result<()>;

    /// clear stored remainder records after they were paid out
    fn reset_skipped_payout(&mut self) -> Result<()>;

    /// transaction records, most-recent first
    fn statement(&self) -> Vec<Transaction>;

    /// log that a settlement ran for the user
    fn record_transaction(
        &mut self,
        timestamp: DateTime<Utc>,
        concluded: bool,
        user_id: UserId,
    ) -> Result<()>;

    /// timestamp of the most recent payout transaction in the statement.
    /// a never-settled account reports `now`, i.e. zero elapsed time
    fn last_payout_date(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        self.statement()
            .iter()
            .find(|tx| tx.kind == TransactionKind::Payout)
            .map(|tx| tx.timestamp)
            .unwrap_or(now)
    }
}

/// in-process ledger holding the account state directly. Stands where the
/// remote service would in production; doubles as the test collaborator.
#[derive(Debug, Clone)]
pub struct InMemoryLedger {
    user_id: UserId,
    active: bool,
    monthly_income: u64,
    rate: Rate,
    balance: u64,
    skipped: Vec<Money>,
    transactions: Vec<Transaction>,
    fail_deposits: bool,
}

impl InMemoryLedger {
    /// an active account with the given monthly income and no history
    pub fn new(user_id: UserId, monthly_income: u64) -> Self {
        Self {
            user_id,
            active: true,
            monthly_income,
            rate: Rate::UNSET,
            balance: 0,
            skipped: Vec::new(),
            transactions: Vec::new(),
            fail_deposits: false,
        }
    }

    /// an account the ledger does not recognise as usable
    pub fn inactive(user_id: UserId) -> Self {
        let mut ledger = Self::new(user_id, 0);
        ledger.active = false;
        ledger
    }

    pub fn with_balance(mut self, pennies: u64) -> Self {
        self.balance = pennies;
        self
    }

    pub fn with_rate(mut self, rate: Rate) -> Self {
        self.rate = rate;
        self
    }

    /// seed a payout transaction so the interval clock starts from `timestamp`
    pub fn with_last_payout(mut self, timestamp: DateTime<Utc>) -> Self {
        self.transactions.insert(
            0,
            Transaction {
                timestamp,
                kind: TransactionKind::Payout,
                concluded: true,
                user_id: self.user_id,
            },
        );
        self
    }

    /// make subsequent deposits fail, for exercising the fatal path
    pub fn set_fail_deposits(&mut self, fail: bool) {
        self.fail_deposits = fail;
    }

    pub fn transaction_count(&self) -> usize {
        self.transactions.len()
    }
}

impl LedgerClient for InMemoryLedger {
    fn fetch_account(&self) -> AccountProfile {
        AccountProfile {
            active: self.active,
            monthly_income: self.monthly_income,
        }
    }

    fn interest_rate(&self) -> Rate {
        self.rate
    }

    fn set_interest_rate(&mut self, rate: Rate) -> Result<()> {
        if !self.rate.is_unset() {
            return Err(AccountError::RateAlreadyAssigned);
        }
        self.rate = rate;
        Ok(())
    }

    fn balance(&self) -> u64 {
        self.balance
    }

    fn deposit(&mut self, pennies: u64) -> Result<u64> {
        if self.fail_deposits {
            return Err(AccountError::LedgerUnavailable {
                message: "deposit endpoint unavailable".to_string(),
            });
        }
        self.balance += pennies;
        self.transactions.insert(
            0,
            Transaction {
                timestamp: Utc::now(),
                kind: TransactionKind::Deposit,
                concluded: true,
                user_id: self.user_id,
            },
        );
        Ok(self.balance)
    }

    fn skipped_payout(&self) -> Money {
        self.skipped
            .iter()
            .fold(Money::ZERO, |total, record| total + *record)
    }

    fn set_skipped_payout(&mut self, amount: Money) -> Result<()> {
        // a new record replaces what was stored before; accumulation across
        // records only happens between reset boundaries
        self.skipped.clear();
        self.skipped.push(amount);
        Ok(())
    }

    fn reset_skipped_payout(&mut self) -> Result<()> {
        self.skipped.clear();
        Ok(())
    }

    fn statement(&self) -> Vec<Transaction> {
        self.transactions.clone()
    }

    fn record_transaction(
        &mut self,
        timestamp: DateTime<Utc>,
        concluded: bool,
        user_id: UserId,
    ) -> Result<()> {
        self.transactions.insert(
            0,
            Transaction {
                timestamp,
                kind: TransactionKind::Payout,
                concluded,
                user_id,
            },
        );
        Ok(())
    }
}
