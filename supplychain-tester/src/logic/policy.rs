use std::fmt;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::Serialize;
use supplychain_game::{Catalog, Decision, GameConfig, GameState};

/// Policy interface for automated play strategies.
pub trait PlayerPolicy {
    /// Name used for logging/debug output.
    fn name(&self) -> &'static str;

    /// Produce the decision for the round `state` is about to play.
    fn decide(&mut self, state: &GameState, catalog: &Catalog, config: &GameConfig) -> Decision;
}

/// Built-in gameplay strategies for automated runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GameplayStrategy {
    Steady,
    Premium,
    Budget,
    Random,
}

impl GameplayStrategy {
    pub const ALL: [Self; 4] = [Self::Steady, Self::Premium, Self::Budget, Self::Random];

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Steady => "steady",
            Self::Premium => "premium",
            Self::Budget => "budget",
            Self::Random => "random",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Steady => "Steady",
            Self::Premium => "Premium",
            Self::Budget => "Budget",
            Self::Random => "Random",
        }
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Steady => "beta + standard, orders to the demand midpoint corrected for yield",
            Self::Premium => "alpha + express, carries safety stock above the midpoint",
            Self::Budget => "gamma + budget, orders the bare midpoint gap",
            Self::Random => "uniform random supplier, transporter and quantity",
        }
    }

    #[must_use]
    pub fn parse(token: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|strategy| strategy.key().eq_ignore_ascii_case(token.trim()))
    }

    #[must_use]
    pub fn create_policy(self, seed: u64) -> Box<dyn PlayerPolicy + Send> {
        match self {
            Self::Steady => Box::new(SteadyPolicy),
            Self::Premium => Box::new(PremiumPolicy),
            Self::Budget => Box::new(BudgetPolicy),
            Self::Random => Box::new(RandomPolicy::new(seed)),
        }
    }
}

impl fmt::Display for GameplayStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

struct SteadyPolicy;
struct PremiumPolicy;
struct BudgetPolicy;

struct RandomPolicy {
    rng: ChaCha20Rng,
}

impl RandomPolicy {
    fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }
}

/// Preferred pairing, falling back to the first catalog entries when a
/// custom catalog lacks the preferred ids.
fn pairing(catalog: &Catalog, supplier: &str, transporter: &str) -> (String, String) {
    let supplier = catalog
        .supplier(supplier)
        .or_else(|| catalog.suppliers().first())
        .map_or_else(|| supplier.to_string(), |profile| profile.id.clone());
    let transporter = catalog
        .transporter(transporter)
        .or_else(|| catalog.transporters().first())
        .map_or_else(|| transporter.to_string(), |profile| profile.id.clone());
    (supplier, transporter)
}

fn capped(quantity: u32, config: &GameConfig) -> i64 {
    i64::from(quantity.min(config.max_order_quantity))
}

impl PlayerPolicy for SteadyPolicy {
    fn name(&self) -> &'static str {
        "Steady"
    }

    fn decide(&mut self, state: &GameState, catalog: &Catalog, config: &GameConfig) -> Decision {
        let (supplier, transporter) = pairing(catalog, "beta", "standard");
        let gap = state.suggested_order_quantity(config);
        let expected = catalog
            .supplier(&supplier)
            .map_or(1.0, supplychain_game::SupplierProfile::expected_yield);
        let corrected = if expected > 0.0 {
            (f64::from(gap) / expected).ceil()
        } else {
            f64::from(gap)
        };
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let quantity = corrected.min(f64::from(config.max_order_quantity)) as u32;
        Decision::new(supplier, transporter, capped(quantity, config))
    }
}

impl PlayerPolicy for PremiumPolicy {
    fn name(&self) -> &'static str {
        "Premium"
    }

    fn decide(&mut self, state: &GameState, catalog: &Catalog, config: &GameConfig) -> Decision {
        let (supplier, transporter) = pairing(catalog, "alpha", "express");
        let safety = config
            .demand_range
            .max
            .saturating_sub(config.demand_range.midpoint());
        let quantity = state.suggested_order_quantity(config).saturating_add(safety);
        Decision::new(supplier, transporter, capped(quantity, config))
    }
}

impl PlayerPolicy for BudgetPolicy {
    fn name(&self) -> &'static str {
        "Budget"
    }

    fn decide(&mut self, state: &GameState, catalog: &Catalog, config: &GameConfig) -> Decision {
        let (supplier, transporter) = pairing(catalog, "gamma", "budget");
        let quantity = state.suggested_order_quantity(config);
        Decision::new(supplier, transporter, capped(quantity, config))
    }
}

impl PlayerPolicy for RandomPolicy {
    fn name(&self) -> &'static str {
        "Random"
    }

    fn decide(&mut self, _state: &GameState, catalog: &Catalog, config: &GameConfig) -> Decision {
        let suppliers = catalog.suppliers();
        let transporters = catalog.transporters();
        let supplier = if suppliers.is_empty() {
            String::new()
        } else {
            suppliers[self.rng.gen_range(0..suppliers.len())].id.clone()
        };
        let transporter = if transporters.is_empty() {
            String::new()
        } else {
            transporters[self.rng.gen_range(0..transporters.len())].id.clone()
        };
        let ceiling = config
            .demand_range
            .max
            .saturating_mul(2)
            .min(config.max_order_quantity);
        let quantity = self.rng.gen_range(0..=ceiling);
        Decision::new(supplier, transporter, i64::from(quantity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixtures() -> (GameState, &'static Catalog, GameConfig) {
        let config = GameConfig::default();
        (GameState::initial(&config), Catalog::standard(), config)
    }

    fn assert_valid(decision: &Decision, catalog: &Catalog, config: &GameConfig) {
        let quantity = decision
            .checked_quantity(config.max_order_quantity)
            .expect("quantity within bounds");
        assert!(catalog.resolve(decision, quantity).is_ok());
    }

    #[test]
    fn parse_accepts_keys_case_insensitively() {
        assert_eq!(GameplayStrategy::parse("Steady"), Some(GameplayStrategy::Steady));
        assert_eq!(GameplayStrategy::parse(" budget "), Some(GameplayStrategy::Budget));
        assert_eq!(GameplayStrategy::parse("reckless"), None);
        for strategy in GameplayStrategy::ALL {
            assert_eq!(GameplayStrategy::parse(strategy.key()), Some(strategy));
            assert_eq!(strategy.to_string(), strategy.label());
        }
    }

    #[test]
    fn steady_corrects_for_expected_yield() {
        let (state, catalog, config) = fixtures();
        let decision = GameplayStrategy::Steady
            .create_policy(1)
            .decide(&state, catalog, &config);
        assert_eq!(decision.supplier, "beta");
        assert_eq!(decision.transporter, "standard");
        let gap = i64::from(state.suggested_order_quantity(&config));
        assert!(decision.order_quantity >= gap);
        assert_valid(&decision, catalog, &config);
    }

    #[test]
    fn premium_adds_safety_stock() {
        let (state, catalog, config) = fixtures();
        let decision = GameplayStrategy::Premium
            .create_policy(1)
            .decide(&state, catalog, &config);
        assert_eq!(decision.supplier, "alpha");
        assert_eq!(decision.transporter, "express");
        assert_eq!(decision.order_quantity, 50 + 70);
    }

    #[test]
    fn budget_orders_the_midpoint_gap() {
        let (state, catalog, config) = fixtures();
        let decision = GameplayStrategy::Budget
            .create_policy(1)
            .decide(&state, catalog, &config);
        assert_eq!(
            (decision.supplier.as_str(), decision.transporter.as_str()),
            ("gamma", "budget")
        );
        assert_eq!(decision.order_quantity, 50);
    }

    #[test]
    fn random_policy_is_reproducible_and_valid() {
        let (state, catalog, config) = fixtures();
        let mut first = GameplayStrategy::Random.create_policy(9);
        let mut second = GameplayStrategy::Random.create_policy(9);
        for _ in 0..50 {
            let a = first.decide(&state, catalog, &config);
            let b = second.decide(&state, catalog, &config);
            assert_eq!(a, b);
            assert_valid(&a, catalog, &config);
        }
    }

    #[test]
    fn pairing_falls_back_to_first_entries() {
        let catalog = Catalog::standard();
        let (supplier, transporter) = pairing(catalog, "omega", "teleport");
        assert_eq!(supplier, catalog.suppliers()[0].id);
        assert_eq!(transporter, catalog.transporters()[0].id);
    }
}
