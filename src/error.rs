use crate::domain::order::OrderId;
use crate::domain::stage::Stage;
use rust_decimal::Decimal;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, EngineError>;

/// A proposed update that failed validation.
///
/// Every variant carries enough data for the caller to render an exact,
/// actionable message. Rejections never mutate order state.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RejectReason {
    #[error("a note is required for every update")]
    MissingNote,
    #[error("{0:?} is not a valid payment amount")]
    InvalidAmount(String),
    #[error("payment amounts cannot be negative")]
    NegativeAmount,
    #[error("payment of {payment} exceeds the remaining balance of {balance}")]
    ExceedsBalance { payment: Decimal, balance: Decimal },
    #[error("cannot mark as \"{}\" while a balance of {balance} remains", .candidate.label())]
    BalanceRemaining { candidate: Stage, balance: Decimal },
    #[error("cannot mark as \"{}\" until the order has reached the fitting stage", .candidate.label())]
    FittingIncomplete { candidate: Stage },
    #[error("cannot move back from \"{}\" to \"{}\"", .current.label(), .candidate.label())]
    StageRegression { current: Stage, candidate: Stage },
    #[error("unknown stage {0:?}")]
    UnknownStage(String),
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("update rejected: {0}")]
    Rejected(#[from] RejectReason),
    #[error("order {0} not found")]
    OrderNotFound(OrderId),
    #[error("order {0} already exists")]
    DuplicateOrder(OrderId),
    #[error("malformed record: {0}")]
    MalformedRecord(String),
    #[error("storage error: {0}")]
    Storage(String),
    #[error("notification error: {0}")]
    Notification(String),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl EngineError {
    /// The validation reason, if this error is a rejection.
    pub fn rejection(&self) -> Option<&RejectReason> {
        match self {
            Self::Rejected(reason) => Some(reason),
            _ => None,
        }
    }
}
