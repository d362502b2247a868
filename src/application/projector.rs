//! Read-only progress views derived from an order's current stage.
//! Purely computed; nothing here is ever persisted.

use crate::domain::order::Order;
use crate::domain::stage::{STATUS_ORDER, Stage};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Progress {
    pub percent_complete: f64,
    pub stages: Vec<StageProgress>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StageProgress {
    pub stage: Stage,
    pub completed: bool,
    pub current: bool,
}

/// Projects the order onto the progress tracker: percentage along the
/// pipeline plus a completion flag per stage.
pub fn project(order: &Order) -> Progress {
    let rank = order.current_stage().rank();
    let span = (STATUS_ORDER.len() - 1) as f64;
    let percent_complete = (rank as f64 / span * 100.0).clamp(0.0, 100.0);

    let stages = STATUS_ORDER
        .into_iter()
        .map(|stage| StageProgress {
            stage,
            completed: stage.rank() <= rank,
            current: stage.rank() == rank,
        })
        .collect();

    Progress {
        percent_complete,
        stages,
    }
}
