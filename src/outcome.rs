use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// numeric error codes carried on every operation outcome, mirroring the
/// remote service's error-code table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    None = 0,
    Default = 1,
    AccountNotActive = 2,
    RateAssignment = 3,
    InvalidDeposit = 4,
    InterestCalculation = 5,
}

/// uniform result envelope returned by every session operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    pub success: bool,
    pub error_code: ErrorCode,
    pub message: String,
    pub data: Map<String, Value>,
}

impl Outcome {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            error_code: ErrorCode::None,
            message: message.into(),
            data: Map::new(),
        }
    }

    pub fn failed(error_code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            success: false,
            error_code,
            message: message.into(),
            data: Map::new(),
        }
    }

    pub fn account_not_active() -> Self {
        Self::failed(
            ErrorCode::AccountNotActive,
            "account is not active",
        )
    }

    /// attach a data entry
    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    pub fn data_value(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }
}
