use log::{info, warn};
use std::sync::Arc;
use thiserror::Error;

use crate::catalog::Catalog;
use crate::config::{ConfigError, GameConfig};
use crate::constants::{SCORE_COST_DIVISOR, SCORE_SATISFACTION_WEIGHT};
use crate::decision::{Decision, DecisionError};
use crate::events::{RoundEvents, events_for};
use crate::ledger::RoundLedgerEntry;
use crate::numbers::i64_to_f64;
use crate::outcomes::{OutcomeSource, SeededOutcomes};
use crate::resolver::{RoundResolution, resolve};
use crate::result::ResultSummary;
use crate::state::GameState;
use crate::termination::{self, EndReason};

/// Reasons `advance_round` or `final_score` refuse to run.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("invalid decision: {0}")]
    InvalidDecision(#[from] DecisionError),
    #[error("the game is already over ({0})")]
    GameOver(EndReason),
    #[error("the game is still in progress")]
    NotOver,
}

/// Owns one player's running game: state, ledger, and the outcome source.
///
/// The catalog is shared read-only; everything else belongs to this session.
#[derive(Debug, Clone)]
pub struct GameSession<O = SeededOutcomes> {
    config: GameConfig,
    catalog: Arc<Catalog>,
    outcomes: O,
    state: GameState,
    ledger: Vec<RoundLedgerEntry>,
    last_events: RoundEvents,
}

impl GameSession<SeededOutcomes> {
    /// Session drawing its outcomes from a user-visible seed.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the configuration is invalid.
    pub fn seeded(
        config: GameConfig,
        catalog: Arc<Catalog>,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        Self::new(config, catalog, SeededOutcomes::from_seed(seed))
    }

    /// Deterministically reseed the outcome streams and restart the game.
    pub fn reseed(&mut self, seed: u64) {
        self.outcomes = SeededOutcomes::from_seed(seed);
        self.reset();
    }

    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.outcomes.seed()
    }
}

impl<O: OutcomeSource> GameSession<O> {
    /// Construct a fresh session.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the configuration is invalid.
    pub fn new(
        config: GameConfig,
        catalog: Arc<Catalog>,
        outcomes: O,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let state = GameState::initial(&config);
        Ok(Self {
            config,
            catalog,
            outcomes,
            state,
            ledger: Vec::new(),
            last_events: RoundEvents::new(),
        })
    }

    /// Restore the initial state and clear the ledger. The outcome source
    /// keeps its position.
    pub fn reset(&mut self) {
        self.state = GameState::initial(&self.config);
        self.ledger.clear();
        self.last_events.clear();
    }

    /// Resolve one round with the given decision.
    ///
    /// Validation happens before anything is drawn or mutated, so a rejected
    /// call leaves the session exactly as it was.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::GameOver`] once the game has ended and
    /// [`SessionError::InvalidDecision`] for out-of-range quantities or
    /// unknown catalog ids.
    pub fn advance_round(
        &mut self,
        decision: &Decision,
    ) -> Result<&RoundLedgerEntry, SessionError> {
        if self.state.is_over {
            let reason = self.state.termination_reason.unwrap_or(EndReason::EndOfTerm);
            warn!("decision submitted after the game ended ({reason})");
            return Err(SessionError::GameOver(reason));
        }
        let resolved = decision
            .checked_quantity(self.config.max_order_quantity)
            .and_then(|quantity| self.catalog.resolve(decision, quantity))
            .inspect_err(|err| {
                warn!(
                    "rejected decision for round {}: {err}",
                    self.state.round_number
                );
            })?;

        let RoundResolution { mut state, entry } =
            resolve(&self.state, &resolved, &self.config, &mut self.outcomes);

        if let Some(reason) = termination::check(&state, &self.config) {
            state.is_over = true;
            state.termination_reason = Some(reason);
            info!("game over after round {}: {reason}", state.round_number);
        } else {
            state.round_number += 1;
        }

        self.last_events = events_for(&entry);
        self.state = state;
        let index = self.ledger.len();
        self.ledger.push(entry);
        Ok(&self.ledger[index])
    }

    /// `cash + satisfaction * 100 - cumulative_costs / 10`, available once the
    /// game is over.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotOver`] while the game is still running.
    pub fn final_score(&self) -> Result<f64, SessionError> {
        if !self.state.is_over {
            return Err(SessionError::NotOver);
        }
        Ok(score(&self.state))
    }

    /// End-of-game summary, or `None` while the game is running.
    #[must_use]
    pub fn summary(&self) -> Option<ResultSummary> {
        ResultSummary::from_parts(&self.state, &self.ledger, &self.config)
    }

    /// Order that tops inventory up to the midpoint of expected demand.
    #[must_use]
    pub fn suggested_order_quantity(&self) -> u32 {
        self.state.suggested_order_quantity(&self.config)
    }

    #[must_use]
    pub const fn state(&self) -> &GameState {
        &self.state
    }

    #[must_use]
    pub fn ledger(&self) -> &[RoundLedgerEntry] {
        &self.ledger
    }

    #[must_use]
    pub fn latest_entry(&self) -> Option<&RoundLedgerEntry> {
        self.ledger.last()
    }

    /// Events for the most recently resolved round.
    #[must_use]
    pub fn last_events(&self) -> &RoundEvents {
        &self.last_events
    }

    #[must_use]
    pub const fn is_over(&self) -> bool {
        self.state.is_over
    }

    #[must_use]
    pub const fn termination_reason(&self) -> Option<EndReason> {
        self.state.termination_reason
    }

    #[must_use]
    pub const fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub const fn outcomes(&self) -> &O {
        &self.outcomes
    }

    pub const fn outcomes_mut(&mut self) -> &mut O {
        &mut self.outcomes
    }
}

pub(crate) fn score(state: &GameState) -> f64 {
    i64_to_f64(state.cash) + f64::from(state.satisfaction) * SCORE_SATISFACTION_WEIGHT
        - i64_to_f64(state.cumulative_costs) / SCORE_COST_DIVISOR
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcomes::{RoundDraws, ScriptedOutcomes};

    fn scripted(config: GameConfig, draws: RoundDraws) -> GameSession<ScriptedOutcomes> {
        GameSession::new(
            config,
            Arc::new(Catalog::standard().clone()),
            ScriptedOutcomes::repeating(draws),
        )
        .unwrap()
    }

    fn steady_draws() -> RoundDraws {
        RoundDraws {
            demand: 150,
            ..RoundDraws::default()
        }
    }

    #[test]
    fn advance_increments_round_and_records_entry() {
        let mut session = scripted(GameConfig::default(), steady_draws());
        let entry = session
            .advance_round(&Decision::new("alpha", "standard", 150))
            .unwrap()
            .clone();
        assert_eq!(entry.round, 1);
        assert_eq!(entry.cash_delta(), 3_550);
        assert_eq!(session.state().round_number, 2);
        assert_eq!(session.ledger().len(), 1);
        assert_eq!(session.latest_entry(), Some(&entry));
        assert_eq!(session.last_events().len(), 3);
        assert!(!session.is_over());
        assert_eq!(session.final_score(), Err(SessionError::NotOver));
        assert!(session.summary().is_none());
    }

    #[test]
    fn rejected_decisions_leave_session_untouched() {
        let mut session = scripted(GameConfig::default(), steady_draws());
        session
            .advance_round(&Decision::new("beta", "express", 100))
            .unwrap();
        let state_before = session.state().clone();
        let ledger_before = session.ledger().to_vec();
        let pending_before = session.outcomes().pending_rounds();

        for decision in [
            Decision::new("beta", "express", -1),
            Decision::new("beta", "express", 1_001),
            Decision::new("delta", "express", 10),
            Decision::new("beta", "zeppelin", 10),
        ] {
            let err = session.advance_round(&decision).unwrap_err();
            assert!(matches!(err, SessionError::InvalidDecision(_)));
            assert_eq!(session.state(), &state_before);
            assert_eq!(session.ledger(), ledger_before.as_slice());
        }
        assert_eq!(session.outcomes().pending_rounds(), pending_before);
    }

    #[test]
    fn game_ends_exactly_at_max_rounds() {
        let cfg = GameConfig::default();
        let max_rounds = cfg.max_rounds;
        let mut session = scripted(cfg, steady_draws());
        for round in 1..=max_rounds {
            assert_eq!(session.state().round_number, round);
            assert!(!session.is_over(), "ended early at round {round}");
            session
                .advance_round(&Decision::new("alpha", "express", 150))
                .unwrap();
        }
        assert!(session.is_over());
        assert_eq!(session.termination_reason(), Some(EndReason::EndOfTerm));
        assert_eq!(session.state().round_number, max_rounds);
        assert_eq!(session.ledger().len(), max_rounds as usize);

        let err = session
            .advance_round(&Decision::new("alpha", "express", 150))
            .unwrap_err();
        assert_eq!(err, SessionError::GameOver(EndReason::EndOfTerm));
        assert_eq!(session.ledger().len(), max_rounds as usize);
    }

    #[test]
    fn bankruptcy_outranks_exodus() {
        let cfg = GameConfig {
            initial_cash: 100,
            initial_inventory: 0,
            initial_satisfaction: 31,
            ..GameConfig::default()
        };
        let mut session = scripted(
            cfg,
            RoundDraws {
                demand: 220,
                ..RoundDraws::default()
            },
        );
        session
            .advance_round(&Decision::new("gamma", "budget", 0))
            .unwrap();
        let state = session.state();
        assert!(state.cash <= 0);
        assert!(state.satisfaction <= 30);
        assert_eq!(session.termination_reason(), Some(EndReason::Bankruptcy));
        assert_eq!(state.round_number, 1);
    }

    #[test]
    fn final_score_combines_cash_satisfaction_and_costs() {
        let cfg = GameConfig {
            max_rounds: 1,
            ..GameConfig::default()
        };
        let mut session = scripted(cfg, steady_draws());
        session
            .advance_round(&Decision::new("alpha", "standard", 150))
            .unwrap();
        assert!(session.is_over());
        // 53_550 + 85 * 100 - 3_950 / 10
        let expected = 53_550.0 + 8_500.0 - 395.0;
        assert!((session.final_score().unwrap() - expected).abs() < 1e-9);
        let summary = session.summary().unwrap();
        assert_eq!(summary.ending, EndReason::EndOfTerm);
        assert_eq!(summary.rounds_played, 1);
    }

    #[test]
    fn reset_restores_initial_state() {
        let mut session = scripted(GameConfig::default(), steady_draws());
        session
            .advance_round(&Decision::new("alpha", "standard", 10))
            .unwrap();
        session.reset();
        assert_eq!(session.state(), &GameState::initial(session.config()));
        assert!(session.ledger().is_empty());
        assert!(session.last_events().is_empty());
        assert_eq!(session.suggested_order_quantity(), 50);
    }

    #[test]
    fn invalid_config_is_refused() {
        let cfg = GameConfig {
            max_rounds: 0,
            ..GameConfig::default()
        };
        let err = GameSession::seeded(cfg, Arc::new(Catalog::standard().clone()), 1).unwrap_err();
        assert_eq!(err, ConfigError::NoRounds);
    }

    #[test]
    fn full_term_at_every_limit_stays_in_range() {
        use crate::catalog::{SupplierProfile, YieldOutcome};
        use crate::config::DemandRange;
        use crate::constants::{
            CASH_LIMIT, FLAT_FEE_LIMIT, MAX_ROUNDS_LIMIT, QUANTITY_LIMIT, UNIT_PRICE_LIMIT,
        };

        let supplier = SupplierProfile {
            id: "dear".to_string(),
            name: "Dear Supply".to_string(),
            description: String::new(),
            unit_cost: UNIT_PRICE_LIMIT,
            yield_outcomes: vec![YieldOutcome::new(1.0, 1.0)],
        };
        let mut transporter = Catalog::standard().transporters()[0].clone();
        transporter.unit_cost = UNIT_PRICE_LIMIT;
        transporter.disruption_fee = FLAT_FEE_LIMIT;
        let catalog = Catalog::new(vec![supplier], vec![transporter]).unwrap();

        // Zero demand piles every shipment into inventory, maximising holding costs.
        let cfg = GameConfig {
            max_rounds: MAX_ROUNDS_LIMIT,
            initial_cash: CASH_LIMIT,
            initial_inventory: QUANTITY_LIMIT,
            holding_cost_per_unit: UNIT_PRICE_LIMIT,
            stockout_penalty_per_unit: UNIT_PRICE_LIMIT,
            selling_price_per_unit: UNIT_PRICE_LIMIT,
            demand_range: DemandRange::new(0, 0),
            low_satisfaction_threshold: 0,
            bankruptcy_threshold: i64::MIN,
            max_order_quantity: QUANTITY_LIMIT,
            ..GameConfig::default()
        };
        let mut session = GameSession::new(
            cfg,
            Arc::new(catalog),
            ScriptedOutcomes::repeating(RoundDraws {
                disrupted: true,
                ..RoundDraws::default()
            }),
        )
        .unwrap();

        let decision = Decision::new("dear", "express", i64::from(QUANTITY_LIMIT));
        while !session.is_over() {
            session.advance_round(&decision).unwrap().audit().unwrap();
        }
        assert_eq!(session.ledger().len(), MAX_ROUNDS_LIMIT as usize);
        assert_eq!(session.termination_reason(), Some(EndReason::EndOfTerm));
        assert!(session.state().cash < 0);
        assert!(session.state().cumulative_costs > 0);
        assert!(session.final_score().unwrap().is_finite());
    }

    #[test]
    fn reseed_replays_identically() {
        let catalog = Arc::new(Catalog::standard().clone());
        let mut session = GameSession::seeded(GameConfig::default(), catalog, 2024).unwrap();
        let decision = Decision::new("gamma", "budget", 180);
        while !session.is_over() {
            session.advance_round(&decision).unwrap();
        }
        let first_run = session.ledger().to_vec();
        let first_state = session.state().clone();

        session.reseed(2024);
        assert_eq!(session.seed(), 2024);
        while !session.is_over() {
            session.advance_round(&decision).unwrap();
        }
        assert_eq!(session.ledger(), first_run.as_slice());
        assert_eq!(session.state(), &first_state);
    }
}
