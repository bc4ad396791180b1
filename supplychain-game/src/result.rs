//! End game result calculation
use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::ledger::RoundLedgerEntry;
use crate::session::score;
use crate::state::GameState;
use crate::termination::EndReason;

/// Complete summary of a finished game for the result screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultSummary {
    pub ending: EndReason,
    pub headline: String,
    pub rounds_played: u32,
    pub score: f64,
    pub final_cash: i64,
    pub satisfaction: i32,
    pub cumulative_costs: i64,
    pub total_revenue: i64,
    pub units_sold: u64,
    pub stockout_units: u64,
    pub disruptions: u32,
    pub damage_events: u32,
}

impl ResultSummary {
    /// Build the summary from state and ledger; `None` while the game runs.
    #[must_use]
    pub fn from_parts(
        state: &GameState,
        ledger: &[RoundLedgerEntry],
        cfg: &GameConfig,
    ) -> Option<Self> {
        if !state.is_over {
            return None;
        }
        let ending = state.termination_reason?;
        let count = |pred: fn(&RoundLedgerEntry) -> bool| {
            u32::try_from(ledger.iter().filter(|e| pred(e)).count()).unwrap_or(u32::MAX)
        };
        Some(Self {
            ending,
            headline: ending.headline(state, cfg),
            rounds_played: u32::try_from(ledger.len()).unwrap_or(u32::MAX),
            score: score(state),
            final_cash: state.cash,
            satisfaction: state.satisfaction,
            cumulative_costs: state.cumulative_costs,
            total_revenue: ledger.iter().map(|e| e.revenue).sum(),
            units_sold: ledger.iter().map(|e| u64::from(e.sold)).sum(),
            stockout_units: ledger.iter().map(|e| u64::from(e.unmet)).sum(),
            disruptions: count(|e| e.disrupted),
            damage_events: count(|e| e.damage_applied),
        })
    }

    /// Score rounded to the nearest whole unit for display.
    #[must_use]
    pub fn display_score(&self) -> String {
        format!("{:.0}", self.score)
    }
}
