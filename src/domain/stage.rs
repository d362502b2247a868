use crate::error::RejectReason;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One step of the production pipeline.
///
/// The wire names (`material_selection`, `picked_up`, ...) are the canonical
/// identifiers; [`Stage::label`] carries the client-facing spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Concept,
    Sketching,
    Designing,
    MaterialSelection,
    PatternMaking,
    Cutting,
    Sewing,
    Materializing,
    Fitting,
    Alterations,
    FinalFitting,
    Ready,
    PickedUp,
    Done,
}

/// Canonical pipeline order, first stage to last. Every forward/backward
/// decision in the crate compares ranks against this table.
pub const STATUS_ORDER: [Stage; 14] = [
    Stage::Concept,
    Stage::Sketching,
    Stage::Designing,
    Stage::MaterialSelection,
    Stage::PatternMaking,
    Stage::Cutting,
    Stage::Sewing,
    Stage::Materializing,
    Stage::Fitting,
    Stage::Alterations,
    Stage::FinalFitting,
    Stage::Ready,
    Stage::PickedUp,
    Stage::Done,
];

/// Earliest stage at which the release gate's fitting condition holds.
pub const FITTING_CHECKPOINT: Stage = Stage::Fitting;

impl Stage {
    /// Zero-based position in [`STATUS_ORDER`].
    pub const fn rank(self) -> usize {
        match self {
            Stage::Concept => 0,
            Stage::Sketching => 1,
            Stage::Designing => 2,
            Stage::MaterialSelection => 3,
            Stage::PatternMaking => 4,
            Stage::Cutting => 5,
            Stage::Sewing => 6,
            Stage::Materializing => 7,
            Stage::Fitting => 8,
            Stage::Alterations => 9,
            Stage::FinalFitting => 10,
            Stage::Ready => 11,
            Stage::PickedUp => 12,
            Stage::Done => 13,
        }
    }

    /// Terminal stages, reachable only through the release gate.
    pub const fn is_release(self) -> bool {
        matches!(self, Stage::PickedUp | Stage::Done)
    }

    /// Whether an order currently at this stage has completed fitting.
    pub const fn fitting_complete(self) -> bool {
        self.rank() >= FITTING_CHECKPOINT.rank()
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Stage::Concept => "concept",
            Stage::Sketching => "sketching",
            Stage::Designing => "designing",
            Stage::MaterialSelection => "material_selection",
            Stage::PatternMaking => "pattern_making",
            Stage::Cutting => "cutting",
            Stage::Sewing => "sewing",
            Stage::Materializing => "materializing",
            Stage::Fitting => "fitting",
            Stage::Alterations => "alterations",
            Stage::FinalFitting => "final_fitting",
            Stage::Ready => "ready",
            Stage::PickedUp => "picked_up",
            Stage::Done => "done",
        }
    }

    /// Display label used in client-facing messages.
    pub const fn label(self) -> &'static str {
        match self {
            Stage::Concept => "Concept",
            Stage::Sketching => "Sketching",
            Stage::Designing => "Designing",
            Stage::MaterialSelection => "Material Selection",
            Stage::PatternMaking => "Pattern Making",
            Stage::Cutting => "Cutting",
            Stage::Sewing => "Sewing",
            Stage::Materializing => "Materializing",
            Stage::Fitting => "Fitting",
            Stage::Alterations => "Alterations",
            Stage::FinalFitting => "Final Fitting",
            Stage::Ready => "Ready",
            Stage::PickedUp => "Picked up",
            Stage::Done => "Done",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Stage {
    type Err = RejectReason;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        STATUS_ORDER
            .iter()
            .copied()
            .find(|stage| stage.as_str() == s)
            .ok_or_else(|| RejectReason::UnknownStage(s.to_string()))
    }
}
