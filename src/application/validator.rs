//! Decides whether a requested stage change is legal, independent of any
//! presentation concern. Rules apply in order; the first failure wins.

use crate::domain::money::Balance;
use crate::domain::order::Order;
use crate::domain::stage::{STATUS_ORDER, Stage};
use crate::error::RejectReason;

/// Validates a move from the order's current stage to `candidate`.
///
/// `prospective_balance` is the balance after any payment submitted in the
/// same update, so a payment and a release transition can land together.
/// Staying at the same stage is always legal; it carries note-only and
/// payment-only updates.
pub fn validate(
    order: &Order,
    candidate: Stage,
    prospective_balance: Balance,
) -> Result<(), RejectReason> {
    let current = order.current_stage();

    if candidate.rank() < current.rank() {
        return Err(RejectReason::StageRegression { current, candidate });
    }

    if candidate.is_release() {
        if !prospective_balance.is_settled() {
            return Err(RejectReason::BalanceRemaining {
                candidate,
                balance: prospective_balance.value(),
            });
        }
        // Fitting is judged on the stage in effect before the move, not the
        // candidate itself.
        if !current.fitting_complete() {
            return Err(RejectReason::FittingIncomplete { candidate });
        }
    }

    Ok(())
}

/// All stages an update may legally move the order to right now, assuming
/// no payment accompanies the move. Presentation layers disable everything
/// not in this set instead of re-implementing the rules.
pub fn legal_candidates(order: &Order) -> Vec<Stage> {
    let balance = order.balance();
    STATUS_ORDER
        .into_iter()
        .filter(|&candidate| validate(order, candidate, balance).is_ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::money::Amount;
    use rust_decimal_macros::dec;

    fn order_at(stage: Stage, total: Amount, paid: Amount) -> Order {
        let mut order = Order::new(1, total);
        order.apply(crate::domain::order::UpdateRecord {
            timestamp: chrono::Utc::now(),
            note: "setup".to_string(),
            stage_at_record: stage,
            payment_delta: paid,
            attachment: None,
        });
        order
    }

    fn amount(value: rust_decimal::Decimal) -> Amount {
        Amount::new(value).unwrap()
    }

    #[test]
    fn test_every_backward_move_is_rejected() {
        for (i, &from) in STATUS_ORDER.iter().enumerate() {
            let order = order_at(from, amount(dec!(100)), Amount::ZERO);
            for &to in &STATUS_ORDER[..i] {
                assert_eq!(
                    validate(&order, to, order.balance()),
                    Err(RejectReason::StageRegression {
                        current: from,
                        candidate: to
                    }),
                    "{from} -> {to} should be a regression"
                );
            }
        }
    }

    #[test]
    fn test_same_stage_is_always_legal() {
        for stage in STATUS_ORDER {
            if stage.is_release() {
                continue; // release stages go through the gate below
            }
            let order = order_at(stage, amount(dec!(100)), Amount::ZERO);
            assert_eq!(validate(&order, stage, order.balance()), Ok(()));
        }
    }

    #[test]
    fn test_release_blocked_by_balance_before_fitting() {
        // Both gates fail; balance must be reported first.
        let order = order_at(Stage::Sewing, amount(dec!(5000)), amount(dec!(1000)));
        assert_eq!(
            validate(&order, Stage::PickedUp, order.balance()),
            Err(RejectReason::BalanceRemaining {
                candidate: Stage::PickedUp,
                balance: dec!(4000),
            })
        );
    }

    #[test]
    fn test_release_blocked_by_incomplete_fitting() {
        let order = order_at(Stage::Sewing, amount(dec!(5000)), amount(dec!(5000)));
        assert_eq!(
            validate(&order, Stage::Done, order.balance()),
            Err(RejectReason::FittingIncomplete {
                candidate: Stage::Done
            })
        );
    }

    #[test]
    fn test_release_allowed_when_paid_and_fitted() {
        let order = order_at(Stage::Fitting, amount(dec!(5000)), amount(dec!(5000)));
        assert_eq!(validate(&order, Stage::PickedUp, order.balance()), Ok(()));
        assert_eq!(validate(&order, Stage::Done, order.balance()), Ok(()));
    }

    #[test]
    fn test_release_gate_uses_prospective_balance() {
        let order = order_at(Stage::Fitting, amount(dec!(5000)), amount(dec!(3000)));
        // As stored the balance blocks release, but a payment in the same
        // update can settle it.
        assert!(validate(&order, Stage::PickedUp, order.balance()).is_err());
        assert_eq!(validate(&order, Stage::PickedUp, Balance::ZERO), Ok(()));
    }

    #[test]
    fn test_legal_candidates_agree_with_validate() {
        let order = order_at(Stage::Cutting, amount(dec!(5000)), amount(dec!(5000)));
        let legal = legal_candidates(&order);

        for candidate in STATUS_ORDER {
            assert_eq!(
                legal.contains(&candidate),
                validate(&order, candidate, order.balance()).is_ok()
            );
        }
        // Paid in full but below the fitting checkpoint: everything forward
        // of cutting except the release stages.
        assert!(legal.contains(&Stage::Cutting));
        assert!(legal.contains(&Stage::Ready));
        assert!(!legal.contains(&Stage::Concept));
        assert!(!legal.contains(&Stage::PickedUp));
        assert!(!legal.contains(&Stage::Done));
    }
}
