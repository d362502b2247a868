//! Balance bookkeeping for an order. Validation and commit are separate
//! steps: the ledger proves a payment legal and reports the would-be
//! totals, the recorder applies them.

use crate::domain::money::{Amount, Balance};
use crate::domain::order::Order;
use crate::error::RejectReason;
use serde::Serialize;

/// The totals an order would carry after a payment is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Prospective {
    pub amount_paid: Balance,
    pub balance: Balance,
}

/// Checks a payment against the order's remaining balance.
///
/// Zero is a valid no-op payment. Overpayment is rejected outright rather
/// than clamped; negative and unparsable amounts never get this far (see
/// [`Amount`]).
pub fn apply_payment(order: &Order, payment: Amount) -> Result<Prospective, RejectReason> {
    let balance = order.balance();
    if Balance::from(payment) > balance {
        return Err(RejectReason::ExceedsBalance {
            payment: payment.value(),
            balance: balance.value(),
        });
    }

    let amount_paid = order.amount_paid() + payment.into();
    Ok(Prospective {
        amount_paid,
        balance: order.total_amount() - amount_paid,
    })
}
