use crate::domain::money::{Amount, Balance};
use crate::domain::stage::Stage;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

pub type OrderId = u64;

/// Opaque reference to an externally stored attachment image.
///
/// The engine never touches the binary itself; uploading and serving it is
/// the attachment store's concern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentRef(String);

impl AttachmentRef {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One immutable audit entry in an order's history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateRecord {
    pub timestamp: DateTime<Utc>,
    pub note: String,
    /// The stage in effect after this record was applied.
    pub stage_at_record: Stage,
    /// Zero when the update carried no payment.
    pub payment_delta: Amount,
    pub attachment: Option<AttachmentRef>,
}

/// Derived payment standing, shown alongside the balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    NoPayment,
    PartialPayment,
    FullyPaid,
}

/// One bespoke-garment job.
///
/// Invariants: `current_stage` is always a member of the status table,
/// `amount_paid` never exceeds `total_amount`, and `history` is append-only
/// in chronological order. The update recorder is the sole mutator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    id: OrderId,
    current_stage: Stage,
    total_amount: Balance,
    amount_paid: Balance,
    history: Vec<UpdateRecord>,
}

impl Order {
    /// A freshly placed order: at the start of the pipeline, nothing paid.
    pub fn new(id: OrderId, total_amount: Amount) -> Self {
        Self {
            id,
            current_stage: Stage::Concept,
            total_amount: total_amount.into(),
            amount_paid: Balance::ZERO,
            history: Vec::new(),
        }
    }

    pub fn id(&self) -> OrderId {
        self.id
    }

    pub fn current_stage(&self) -> Stage {
        self.current_stage
    }

    pub fn total_amount(&self) -> Balance {
        self.total_amount
    }

    pub fn amount_paid(&self) -> Balance {
        self.amount_paid
    }

    /// Remaining balance. Always recomputed, never stored.
    pub fn balance(&self) -> Balance {
        self.total_amount - self.amount_paid
    }

    pub fn payment_status(&self) -> PaymentStatus {
        if self.balance().is_settled() {
            PaymentStatus::FullyPaid
        } else if self.amount_paid.value().is_zero() {
            PaymentStatus::NoPayment
        } else {
            PaymentStatus::PartialPayment
        }
    }

    pub fn history(&self) -> &[UpdateRecord] {
        &self.history
    }

    /// Applies a committed record. Crate-private: all mutation flows
    /// through the update recorder.
    pub(crate) fn apply(&mut self, record: UpdateRecord) {
        self.current_stage = record.stage_at_record;
        self.amount_paid += record.payment_delta.into();
        self.history.push(record);
    }

    /// Timestamp for the next record, strictly after the last one.
    pub(crate) fn next_timestamp(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self.history.last() {
            Some(last) if now <= last.timestamp => last.timestamp + Duration::microseconds(1),
            _ => now,
        }
    }
}
