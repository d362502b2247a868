//! The sole mutator of order state. A proposed update is checked by the
//! ledger and the transition validator, confirmed by the caller, then
//! committed as one append-only record under a per-order critical section.

use crate::application::ledger::{self, Prospective};
use crate::application::validator;
use crate::domain::money::Amount;
use crate::domain::order::{AttachmentRef, Order, OrderId, UpdateRecord};
use crate::domain::ports::{NotificationDispatcherBox, OrderStoreBox};
use crate::domain::stage::Stage;
use crate::error::{EngineError, RejectReason, Result};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

/// A staff actor's proposed update, before validation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UpdateDraft {
    /// `None` keeps the current stage (note- or payment-only update).
    pub stage: Option<Stage>,
    pub payment: Option<Amount>,
    pub note: String,
    pub attachment: Option<AttachmentRef>,
}

impl UpdateDraft {
    pub fn note(note: impl Into<String>) -> Self {
        Self {
            note: note.into(),
            ..Self::default()
        }
    }

    pub fn with_stage(mut self, stage: Stage) -> Self {
        self.stage = Some(stage);
        self
    }

    pub fn with_payment(mut self, payment: Amount) -> Self {
        self.payment = Some(payment);
        self
    }

    pub fn with_attachment(mut self, attachment: AttachmentRef) -> Self {
        self.attachment = Some(attachment);
        self
    }
}

/// Proof that a draft passed validation, handed back to the caller for the
/// confirmation prompt. Committing re-runs the checks against the current
/// order, so the token can be held across a prompt without going stale.
/// Dropping it cancels the update with no state change.
#[derive(Debug, Clone)]
pub struct PendingUpdate {
    order_id: OrderId,
    draft: UpdateDraft,
    stage_after: Stage,
    prospective: Prospective,
}

impl PendingUpdate {
    pub fn order_id(&self) -> OrderId {
        self.order_id
    }

    /// The stage the order will be at once committed.
    pub fn stage_after(&self) -> Stage {
        self.stage_after
    }

    /// The would-be ledger totals, for the confirmation prompt.
    pub fn prospective(&self) -> Prospective {
        self.prospective
    }
}

/// Appends validated updates to orders and keeps their ledgers current.
///
/// Owns the storage and notification ports. Commits are atomic per order:
/// the checks, the mutation, and the save all happen under that order's
/// lock, and a failed save leaves the stored order untouched.
pub struct UpdateRecorder {
    orders: OrderStoreBox,
    dispatcher: NotificationDispatcherBox,
    locks: Mutex<HashMap<OrderId, Arc<Mutex<()>>>>,
}

impl UpdateRecorder {
    pub fn new(orders: OrderStoreBox, dispatcher: NotificationDispatcherBox) -> Self {
        Self {
            orders,
            dispatcher,
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Seeds a new order at the start of the pipeline.
    pub async fn open_order(&self, id: OrderId, total_amount: Amount) -> Result<Order> {
        let lock = self.order_lock(id).await;
        let _guard = lock.lock().await;

        if self.orders.get(id).await?.is_some() {
            return Err(EngineError::DuplicateOrder(id));
        }
        let order = Order::new(id, total_amount);
        self.orders.store(order.clone()).await?;
        info!(order = id, total = %order.total_amount().value(), "order opened");
        Ok(order)
    }

    pub async fn order(&self, id: OrderId) -> Result<Order> {
        self.orders
            .get(id)
            .await?
            .ok_or(EngineError::OrderNotFound(id))
    }

    /// Stages an update may legally move this order to right now.
    pub async fn legal_candidates(&self, id: OrderId) -> Result<Vec<Stage>> {
        Ok(validator::legal_candidates(&self.order(id).await?))
    }

    /// Validates a draft without mutating anything, returning the token the
    /// caller exchanges for a commit once the actor confirms.
    pub async fn prepare(&self, id: OrderId, draft: UpdateDraft) -> Result<PendingUpdate> {
        let order = self.order(id).await?;
        let (stage_after, prospective) = check(&order, &draft)?;
        Ok(PendingUpdate {
            order_id: id,
            draft,
            stage_after,
            prospective,
        })
    }

    /// Commits a confirmed update.
    ///
    /// The checks run again on the freshly loaded order inside the critical
    /// section, so validation results can never be applied stale. On
    /// success the record is persisted and the dispatcher is informed;
    /// notification failure is logged and does not reverse the commit.
    pub async fn commit(&self, pending: PendingUpdate) -> Result<UpdateRecord> {
        let PendingUpdate {
            order_id, draft, ..
        } = pending;

        let lock = self.order_lock(order_id).await;
        let _guard = lock.lock().await;

        let mut order = self.order(order_id).await?;
        let (stage_after, _) = check(&order, &draft)?;

        let record = UpdateRecord {
            timestamp: order.next_timestamp(Utc::now()),
            note: draft.note.trim().to_string(),
            stage_at_record: stage_after,
            payment_delta: draft.payment.unwrap_or(Amount::ZERO),
            attachment: draft.attachment,
        };
        order.apply(record.clone());
        self.orders.store(order.clone()).await?;

        info!(
            order = order_id,
            stage = %record.stage_at_record,
            payment = %record.payment_delta.value(),
            "update committed"
        );
        if let Err(e) = self.dispatcher.notify(&order, &record).await {
            warn!(order = order_id, error = %e, "notification failed; commit stands");
        }
        Ok(record)
    }

    /// `prepare` + `commit` in one call, for callers without a
    /// confirmation prompt.
    pub async fn submit(&self, id: OrderId, draft: UpdateDraft) -> Result<UpdateRecord> {
        let pending = self.prepare(id, draft).await?;
        self.commit(pending).await
    }

    /// Consumes the recorder and returns the final state of all orders.
    pub async fn into_results(self) -> Result<Vec<Order>> {
        self.orders.all_orders().await
    }

    async fn order_lock(&self, id: OrderId) -> Arc<Mutex<()>> {
        self.locks.lock().await.entry(id).or_default().clone()
    }
}

/// The full pre-commit check sequence. Pure: note, then ledger, then
/// transition against the prospective balance, first failure wins.
fn check(order: &Order, draft: &UpdateDraft) -> std::result::Result<(Stage, Prospective), RejectReason> {
    if draft.note.trim().is_empty() {
        return Err(RejectReason::MissingNote);
    }

    let prospective = ledger::apply_payment(order, draft.payment.unwrap_or(Amount::ZERO))?;
    let stage_after = draft.stage.unwrap_or_else(|| order.current_stage());
    validator::validate(order, stage_after, prospective.balance)?;

    Ok((stage_after, prospective))
}
