use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use std::collections::BTreeMap;

use supplychain_game::constants::{SATISFACTION_MAX, SATISFACTION_MIN};
use supplychain_game::{DataLoader, Decision, EndReason, GameEngine, ResultSummary};

use super::policy::GameplayStrategy;
use super::seeds::iteration_seed;

/// Outcome of one automated game.
#[derive(Debug, Clone, Serialize)]
pub struct PlayRecord {
    pub strategy: GameplayStrategy,
    pub seed: u64,
    pub iteration: usize,
    pub summary: ResultSummary,
    pub violations: Vec<String>,
}

impl PlayRecord {
    #[must_use]
    pub fn passed(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Per-strategy rollup of [`PlayRecord`]s.
#[derive(Debug, Clone, Serialize)]
pub struct StrategyAggregate {
    pub strategy: GameplayStrategy,
    pub games: usize,
    pub mean_score: f64,
    pub min_score: f64,
    pub max_score: f64,
    pub mean_final_cash: f64,
    pub mean_satisfaction: f64,
    pub mean_rounds: f64,
    pub end_of_term: usize,
    pub bankruptcies: usize,
    pub customer_exoduses: usize,
    pub violations: usize,
}

/// Play one full game with `strategy`, auditing every round as it lands.
///
/// # Errors
///
/// Returns an error if the session cannot be created, a decision is
/// rejected, or the game finishes without a summary.
pub fn play_game<L: DataLoader>(
    engine: &GameEngine<L>,
    strategy: GameplayStrategy,
    seed: u64,
    iteration: usize,
    verbose: bool,
) -> Result<PlayRecord> {
    let mut session = engine
        .create_session(seed)
        .with_context(|| format!("creating session for seed {seed}"))?;
    let mut policy = strategy.create_policy(seed);
    let mut violations = Vec::new();
    let max_rounds = session.config().max_rounds;

    while !session.is_over() {
        let round = session.state().round_number;
        if round > max_rounds {
            violations.push(format!("round {round} exceeds the {max_rounds}-round term"));
            break;
        }
        let inventory_before = session.state().inventory;
        let decision = policy.decide(session.state(), session.catalog(), session.config());
        log::debug!("{} round {round}: {decision:?}", policy.name());

        let entry = session
            .advance_round(&decision)
            .with_context(|| format!("{strategy} rejected on seed {seed} round {round}"))?
            .clone();

        if let Err(message) = entry.audit() {
            violations.push(message);
        }
        let expected_inventory = (u64::from(inventory_before) + u64::from(entry.received))
            .checked_sub(u64::from(entry.sold));
        if expected_inventory != Some(u64::from(entry.ending_inventory)) {
            violations.push(format!(
                "round {round}: ending inventory {} does not conserve units",
                entry.ending_inventory
            ));
        }
        let satisfaction = session.state().satisfaction;
        if !(SATISFACTION_MIN..=SATISFACTION_MAX).contains(&satisfaction) {
            violations.push(format!("round {round}: satisfaction {satisfaction} out of bounds"));
        }
        if !session.config().demand_range.contains(entry.demand) {
            violations.push(format!("round {round}: demand {} outside range", entry.demand));
        }

        if verbose {
            println!(
                "   {} seed {seed} month {round}: {}",
                strategy.label().cyan(),
                decision_line(&decision)
            );
            for event in session.last_events() {
                println!("      {event}");
            }
        }
    }

    let summary = session
        .summary()
        .with_context(|| format!("{strategy} on seed {seed} ended without a summary"))?;
    if verbose {
        println!("   {} {}", "→".bright_black(), summary.headline);
    }

    Ok(PlayRecord {
        strategy,
        seed,
        iteration,
        summary,
        violations,
    })
}

fn decision_line(decision: &Decision) -> String {
    format!(
        "order {} from {} via {}",
        decision.order_quantity, decision.supplier, decision.transporter
    )
}

/// Play every strategy against every seed for `iterations` games each,
/// advancing the seed per iteration.
///
/// # Errors
///
/// Propagates the first game that fails to complete.
pub fn run_sweep<L: DataLoader>(
    engine: &GameEngine<L>,
    strategies: &[GameplayStrategy],
    seeds: &[u64],
    iterations: usize,
    verbose: bool,
) -> Result<Vec<PlayRecord>> {
    let iterations = iterations.max(1);
    let mut records = Vec::with_capacity(strategies.len() * seeds.len() * iterations);

    for &strategy in strategies {
        for &seed in seeds {
            for iteration in 0..iterations {
                let game_seed = iteration_seed(seed, iteration);
                records.push(play_game(engine, strategy, game_seed, iteration, verbose)?);
            }
        }
    }

    Ok(records)
}

#[derive(Default)]
struct AggregateBuilder {
    games: usize,
    score_sum: f64,
    min_score: f64,
    max_score: f64,
    cash_sum: f64,
    satisfaction_sum: f64,
    rounds_sum: f64,
    endings: [usize; 3],
    violations: usize,
}

impl AggregateBuilder {
    fn ingest(&mut self, record: &PlayRecord) {
        let summary = &record.summary;
        if self.games == 0 {
            self.min_score = summary.score;
            self.max_score = summary.score;
        } else {
            self.min_score = self.min_score.min(summary.score);
            self.max_score = self.max_score.max(summary.score);
        }
        self.games += 1;
        self.score_sum += summary.score;
        #[allow(clippy::cast_precision_loss)]
        {
            self.cash_sum += summary.final_cash as f64;
        }
        self.satisfaction_sum += f64::from(summary.satisfaction);
        self.rounds_sum += f64::from(summary.rounds_played);
        let slot = match summary.ending {
            EndReason::EndOfTerm => 0,
            EndReason::Bankruptcy => 1,
            EndReason::CustomerExodus => 2,
        };
        self.endings[slot] += 1;
        self.violations += record.violations.len();
    }

    fn finish(self, strategy: GameplayStrategy) -> StrategyAggregate {
        let denom = f64::from(u32::try_from(self.games.max(1)).unwrap_or(u32::MAX));
        StrategyAggregate {
            strategy,
            games: self.games,
            mean_score: self.score_sum / denom,
            min_score: self.min_score,
            max_score: self.max_score,
            mean_final_cash: self.cash_sum / denom,
            mean_satisfaction: self.satisfaction_sum / denom,
            mean_rounds: self.rounds_sum / denom,
            end_of_term: self.endings[0],
            bankruptcies: self.endings[1],
            customer_exoduses: self.endings[2],
            violations: self.violations,
        }
    }
}

/// Roll records up per strategy, in strategy order.
#[must_use]
pub fn aggregate_records(records: &[PlayRecord]) -> Vec<StrategyAggregate> {
    let mut builders: BTreeMap<GameplayStrategy, AggregateBuilder> = BTreeMap::new();
    for record in records {
        builders.entry(record.strategy).or_default().ingest(record);
    }
    builders
        .into_iter()
        .map(|(strategy, builder)| builder.finish(strategy))
        .collect()
}
