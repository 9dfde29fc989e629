use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::{Uuid, Variant};

use crate::errors::{AccountError, Result};

/// validated user identifier: must carry the UUID v4 shape
/// (version nibble 4, RFC 4122 variant)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    pub fn new(uuid: Uuid) -> Result<Self> {
        if uuid.get_version_num() == 4 && uuid.get_variant() == Variant::RFC4122 {
            Ok(UserId(uuid))
        } else {
            Err(AccountError::InvalidUserId {
                value: uuid.to_string(),
            })
        }
    }

    pub fn parse(value: &str) -> Result<Self> {
        let uuid = Uuid::parse_str(value).map_err(|_| AccountError::InvalidUserId {
            value: value.to_string(),
        })?;
        Self::new(uuid)
    }

    /// generate a fresh valid identifier
    pub fn random() -> Self {
        UserId(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for UserId {
    type Err = AccountError;

    fn from_str(s: &str) -> Result<Self> {
        UserId::parse(s)
    }
}

/// account existence and metadata as reported by the ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountProfile {
    /// whether the ledger confirms the account exists and is usable
    pub active: bool,
    /// monthly income in pennies, 0 means unknown/unspecified
    pub monthly_income: u64,
}

/// kind of statement transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionKind {
    Payout,
    Deposit,
}

/// a single statement entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub timestamp: DateTime<Utc>,
    pub kind: TransactionKind,
    pub concluded: bool,
    pub user_id: UserId,
}
