//! Per-archive build state machine
//!
//! ```text
//! NeverBuilt ──first pass──▶ Built
//!                             │ ▲
//!   manifest differs ─────────┘ │ (archive rewritten)
//!   manifest unchanged ─────────┘ (archive untouched)
//! ```
//!
//! There is no failure state: a failed pass leaves the target where it was.

use serde::{Deserialize, Serialize};

/// Whether an archive target has been produced before
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetState {
    /// No manifest snapshot exists for the target
    #[default]
    NeverBuilt,
    /// A manifest snapshot was recorded by an earlier pass
    Built,
}

/// What a packaging pass did to its archive target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PassOutcome {
    /// First pass for the target; the archive was written
    FirstBuild,
    /// The manifest changed; the archive was rewritten
    Rewritten,
    /// The manifest is unchanged; the archive step was skipped
    Untouched,
}

impl TargetState {
    /// Check if a pass outcome is possible from this state
    pub fn can_transition_to(&self, outcome: PassOutcome) -> bool {
        use PassOutcome::*;
        use TargetState::*;
        matches!(
            (self, outcome),
            (NeverBuilt, FirstBuild) | (Built, Rewritten) | (Built, Untouched)
        )
    }

    /// Outcome of a pass from this state given the staleness decision
    pub fn outcome(&self, stale: bool) -> PassOutcome {
        match (self, stale) {
            (TargetState::NeverBuilt, _) => PassOutcome::FirstBuild,
            (TargetState::Built, true) => PassOutcome::Rewritten,
            (TargetState::Built, false) => PassOutcome::Untouched,
        }
    }

    /// State after a pass completes
    pub fn after(&self, _outcome: PassOutcome) -> TargetState {
        TargetState::Built
    }
}

impl PassOutcome {
    /// Check if the archive was (re)written by this pass
    pub fn wrote_archive(&self) -> bool {
        !matches!(self, PassOutcome::Untouched)
    }
}

impl std::fmt::Display for TargetState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TargetState::NeverBuilt => write!(f, "NeverBuilt"),
            TargetState::Built => write!(f, "Built"),
        }
    }
}

impl std::fmt::Display for PassOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PassOutcome::FirstBuild => write!(f, "first build"),
            PassOutcome::Rewritten => write!(f, "rewritten"),
            PassOutcome::Untouched => write!(f, "up to date"),
        }
    }
}
