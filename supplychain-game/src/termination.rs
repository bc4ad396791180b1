//! End-of-game checks.
use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::state::GameState;

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    /// Cash fell to or below the bankruptcy threshold.
    Bankruptcy,
    /// Satisfaction fell to or below the low-satisfaction threshold.
    CustomerExodus,
    /// The final round was completed.
    EndOfTerm,
}

impl EndReason {
    /// Stable lowercase label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Bankruptcy => "bankruptcy",
            Self::CustomerExodus => "customer exodus",
            Self::EndOfTerm => "end of term",
        }
    }

    /// Long-form game-over message for the final screen.
    #[must_use]
    pub fn headline(self, state: &GameState, cfg: &GameConfig) -> String {
        match self {
            Self::Bankruptcy => "Bankruptcy! Your company ran out of cash.".to_string(),
            Self::CustomerExodus => format!(
                "Customer Exodus! Satisfaction dropped to {}%.",
                state.satisfaction
            ),
            Self::EndOfTerm => format!(
                "End of Term! You've completed {} months.",
                cfg.max_rounds
            ),
        }
    }
}

impl std::fmt::Display for EndReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Evaluate end conditions; the first matching condition wins.
#[must_use]
pub fn check(state: &GameState, cfg: &GameConfig) -> Option<EndReason> {
    if state.cash <= cfg.bankruptcy_threshold {
        Some(EndReason::Bankruptcy)
    } else if state.satisfaction <= cfg.low_satisfaction_threshold {
        Some(EndReason::CustomerExodus)
    } else if state.round_number >= cfg.max_rounds {
        Some(EndReason::EndOfTerm)
    } else {
        None
    }
}
