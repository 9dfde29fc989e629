use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::types::UserId;

/// all events that can be emitted during account operations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AccountEvent {
    RateAssigned {
        user_id: UserId,
        rate: Rate,
        timestamp: DateTime<Utc>,
    },
    FundsDeposited {
        user_id: UserId,
        amount: u64,
        new_balance: u64,
        timestamp: DateTime<Utc>,
    },
    InterestAccrued {
        user_id: UserId,
        amount: Money,
        timestamp: DateTime<Utc>,
    },
    PayoutSettled {
        user_id: UserId,
        amount_paid: u64,
        new_balance: u64,
        remainder: Money,
        timestamp: DateTime<Utc>,
    },
    PayoutCarried {
        user_id: UserId,
        carried: Money,
        timestamp: DateTime<Utc>,
    },
}

/// event store for collecting events during operations
#[derive(Debug, Default)]
pub struct EventStore {
    events: Vec<AccountEvent>,
}

impl EventStore {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn emit(&mut self, event: AccountEvent) {
        self.events.push(event);
    }

    pub fn take_events(&mut self) -> Vec<AccountEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[AccountEvent] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}
