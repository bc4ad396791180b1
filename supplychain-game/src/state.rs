//! Running session state.
use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::constants::{SATISFACTION_MAX, SATISFACTION_MIN};
use crate::termination::EndReason;

/// Mutable per-session state, advanced once per completed round.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameState {
    /// One-based round currently awaiting a decision (or the final round once over).
    pub round_number: u32,
    pub cash: i64,
    pub inventory: u32,
    /// Always within `[0, 100]`.
    pub satisfaction: i32,
    pub cumulative_costs: i64,
    pub is_over: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub termination_reason: Option<EndReason>,
}

impl GameState {
    /// Fresh state at the start of a session.
    #[must_use]
    pub fn initial(cfg: &GameConfig) -> Self {
        Self {
            round_number: 1,
            cash: cfg.initial_cash,
            inventory: cfg.initial_inventory,
            satisfaction: clamp_satisfaction(i64::from(cfg.initial_satisfaction)),
            cumulative_costs: 0,
            is_over: false,
            termination_reason: None,
        }
    }

    /// Order that tops inventory up to the midpoint of expected demand.
    #[must_use]
    pub fn suggested_order_quantity(&self, cfg: &GameConfig) -> u32 {
        cfg.demand_range
            .midpoint()
            .saturating_sub(self.inventory)
            .min(cfg.max_order_quantity)
    }
}

/// Clamp a raw satisfaction value into the valid band.
#[must_use]
pub fn clamp_satisfaction(raw: i64) -> i32 {
    let clamped = raw.clamp(i64::from(SATISFACTION_MIN), i64::from(SATISFACTION_MAX));
    i32::try_from(clamped).unwrap_or(SATISFACTION_MIN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_state_uses_config() {
        let cfg = GameConfig::default();
        let state = GameState::initial(&cfg);
        assert_eq!(state.round_number, 1);
        assert_eq!(state.cash, 50_000);
        assert_eq!(state.inventory, 100);
        assert_eq!(state.satisfaction, 80);
        assert_eq!(state.cumulative_costs, 0);
        assert!(!state.is_over);
        assert!(state.termination_reason.is_none());
    }

    #[test]
    fn suggestion_tops_up_to_mid_demand() {
        let cfg = GameConfig::default();
        let mut state = GameState::initial(&cfg);
        assert_eq!(state.suggested_order_quantity(&cfg), 50);
        state.inventory = 400;
        assert_eq!(state.suggested_order_quantity(&cfg), 0);
    }

    #[test]
    fn clamp_covers_extremes() {
        assert_eq!(clamp_satisfaction(-5_000), 0);
        assert_eq!(clamp_satisfaction(105), 100);
        assert_eq!(clamp_satisfaction(i64::MAX), 100);
        assert_eq!(clamp_satisfaction(42), 42);
    }
}
