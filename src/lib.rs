pub mod config;
pub mod decimal;
pub mod errors;
pub mod events;
pub mod interest;
pub mod ledger;
pub mod outcome;
pub mod rates;
pub mod schedule;
pub mod session;
pub mod settlement;
pub mod state;
pub mod types;

// re-export key types
pub use config::{RateTable, RateTier, SettlementConfig, PAYOUT_INTERVAL_DAYS};
pub use decimal::{Money, Rate};
pub use errors::{AccountError, Result};
pub use events::{AccountEvent, EventStore};
pub use interest::InterestCalculator;
pub use ledger::{InMemoryLedger, LedgerClient};
pub use outcome::{ErrorCode, Outcome};
pub use rates::RateSelector;
pub use schedule::PayoutScheduler;
pub use session::AccountSession;
pub use settlement::{SettlementEngine, SettlementResult};
pub use state::AccountSnapshot;
pub use types::{AccountProfile, Transaction, TransactionKind, UserId};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
