use thiserror::Error;

#[derive(Error, Debug)]
pub enum AccountError {
    #[error("user id does not match the UUID v4 shape: {value}")]
    InvalidUserId {
        value: String,
    },

    #[error("invalid deposit amount: {amount}, minimum is 1 penny")]
    InvalidDepositAmount {
        amount: i64,
    },

    #[error("account is not active")]
    AccountNotActive,

    #[error("user already has an active account")]
    AccountAlreadyActive,

    #[error("no interest rate is available for monthly income {monthly_income}")]
    NoApplicableRate {
        monthly_income: u64,
    },

    #[error("interest rate already set for active account")]
    RateAlreadyAssigned,

    #[error("{elapsed} payout intervals elapsed, catch-up of missed intervals is not implemented")]
    TooManyMissedIntervals {
        elapsed: u64,
    },

    #[error("deposit failed fatally, contact support: {message}")]
    DepositFailed {
        message: String,
    },

    #[error("ledger call failed: {message}")]
    LedgerUnavailable {
        message: String,
    },

    #[error("invalid rate table configuration: {message}")]
    InvalidConfiguration {
        message: String,
    },

    #[error("functionality not available")]
    NotSupported,
}

pub type Result<T> = std::result::Result<T, AccountError>;
