//! Discrete stage selection for the lift.
//!
//! A small state machine advancing/retreating an index into the
//! configured stage table from directional-pad edges, with a
//! reset-button edge that requests a sensor re-zero instead of a stage
//! change. All transitions are single-edge: a held input fires once,
//! on the cycle where it becomes active.

use serde::{Deserialize, Serialize};

use atlas_common::consts::MAX_STAGES;

use crate::snapshot::PovDirection;

/// Ordered lift target positions [sensor units], fixed at config load.
pub type StageTable = heapless::Vec<i32, MAX_STAGES>;

/// How a directional-pad edge moves the stage index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StagePolicy {
    /// Move one stage per edge, saturating at the table ends.
    #[default]
    Step,
    /// Jump straight to the last (up) or first (down) stage.
    Jump,
}

/// Side effect requested by a transition, routed by the cycle
/// orchestrator to the position capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageAction {
    /// Re-zero the external lift position reference.
    ZeroSensor,
}

/// Stage selection state machine.
///
/// Persists across cycles; owned exclusively by the control loop.
/// Invariant: `index < table_len` for every non-empty table.
#[derive(Debug, Clone, Default)]
pub struct StageSelector {
    index: usize,
    prev_pov: PovDirection,
    prev_reset: bool,
}

impl StageSelector {
    /// Create a selector at stage 0 with cleared edge latches.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current stage index.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Return to stage 0 and clear edge latches.
    ///
    /// Called on re-entry into teleoperated mode. An input still held
    /// from a previous session counts as a fresh press on the first
    /// cycle back.
    pub fn reset(&mut self) {
        self.index = 0;
        self.prev_pov = PovDirection::None;
        self.prev_reset = false;
    }

    /// Evaluate one cycle of transitions.
    ///
    /// Priority order: POV up edge, POV down edge, reset-button edge.
    /// At most one transition fires per cycle; the reset edge leaves
    /// the index unchanged and requests [`StageAction::ZeroSensor`].
    pub fn apply(
        &mut self,
        pov: PovDirection,
        reset_pressed: bool,
        table_len: usize,
        policy: StagePolicy,
    ) -> Option<StageAction> {
        let up_edge = pov == PovDirection::Up && self.prev_pov != PovDirection::Up;
        let down_edge = pov == PovDirection::Down && self.prev_pov != PovDirection::Down;
        let reset_edge = reset_pressed && !self.prev_reset;
        self.prev_pov = pov;
        self.prev_reset = reset_pressed;

        let last = table_len.saturating_sub(1);
        let mut action = None;
        if up_edge {
            self.index = match policy {
                StagePolicy::Step => (self.index + 1).min(last),
                StagePolicy::Jump => last,
            };
        } else if down_edge {
            self.index = match policy {
                StagePolicy::Step => self.index.saturating_sub(1),
                StagePolicy::Jump => 0,
            };
        } else if reset_edge {
            action = Some(StageAction::ZeroSensor);
        }

        debug_assert!(table_len == 0 || self.index <= last);
        action
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> StageTable {
        StageTable::from_slice(&[0, 26000]).unwrap()
    }

    #[test]
    fn up_edge_advances_exactly_once_while_held() {
        let t = table();
        let mut sel = StageSelector::new();
        for _ in 0..10 {
            sel.apply(PovDirection::Up, false, t.len(), StagePolicy::Step);
        }
        assert_eq!(sel.index(), 1);
    }

    #[test]
    fn release_and_repress_advances_again() {
        let mut sel = StageSelector::new();
        let len = 4;
        sel.apply(PovDirection::Up, false, len, StagePolicy::Step);
        sel.apply(PovDirection::None, false, len, StagePolicy::Step);
        sel.apply(PovDirection::Up, false, len, StagePolicy::Step);
        assert_eq!(sel.index(), 2);
    }

    #[test]
    fn step_policy_saturates_at_table_ends() {
        let t = table();
        let mut sel = StageSelector::new();
        for _ in 0..3 {
            sel.apply(PovDirection::Up, false, t.len(), StagePolicy::Step);
            sel.apply(PovDirection::None, false, t.len(), StagePolicy::Step);
        }
        assert_eq!(sel.index(), t.len() - 1);

        for _ in 0..5 {
            sel.apply(PovDirection::Down, false, t.len(), StagePolicy::Step);
            sel.apply(PovDirection::None, false, t.len(), StagePolicy::Step);
        }
        assert_eq!(sel.index(), 0);
    }

    #[test]
    fn jump_policy_goes_to_extremes() {
        let len = 5;
        let mut sel = StageSelector::new();
        sel.apply(PovDirection::Up, false, len, StagePolicy::Jump);
        assert_eq!(sel.index(), 4);
        sel.apply(PovDirection::None, false, len, StagePolicy::Jump);
        sel.apply(PovDirection::Down, false, len, StagePolicy::Jump);
        assert_eq!(sel.index(), 0);
    }

    #[test]
    fn up_has_priority_over_down_within_a_cycle() {
        // A pad can only report one direction, but a transition from
        // Down straight to Up is an up edge, not a down edge.
        let mut sel = StageSelector::new();
        let len = 3;
        sel.apply(PovDirection::Down, false, len, StagePolicy::Step);
        sel.apply(PovDirection::Up, false, len, StagePolicy::Step);
        assert_eq!(sel.index(), 1);
    }

    #[test]
    fn reset_edge_requests_zero_without_moving_stage() {
        let mut sel = StageSelector::new();
        let len = 2;
        sel.apply(PovDirection::Up, false, len, StagePolicy::Step);
        assert_eq!(sel.index(), 1);

        let action = sel.apply(PovDirection::None, true, len, StagePolicy::Step);
        assert_eq!(action, Some(StageAction::ZeroSensor));
        assert_eq!(sel.index(), 1);

        // Held reset does not re-fire.
        let action = sel.apply(PovDirection::None, true, len, StagePolicy::Step);
        assert_eq!(action, None);
    }

    #[test]
    fn stage_change_wins_over_reset_in_same_cycle() {
        let mut sel = StageSelector::new();
        let action = sel.apply(PovDirection::Up, true, 2, StagePolicy::Step);
        assert_eq!(action, None);
        assert_eq!(sel.index(), 1);
    }

    #[test]
    fn reset_returns_to_stage_zero_and_clears_latches() {
        let mut sel = StageSelector::new();
        let len = 3;
        sel.apply(PovDirection::Up, true, len, StagePolicy::Step);
        sel.reset();
        assert_eq!(sel.index(), 0);

        // A still-held POV fires again after reset: the latch cleared.
        sel.apply(PovDirection::Up, false, len, StagePolicy::Step);
        assert_eq!(sel.index(), 1);
    }
}
