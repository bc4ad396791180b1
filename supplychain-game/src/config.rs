//! Tunable session configuration.
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{
    BANKRUPTCY_THRESHOLD, CASH_LIMIT, DEMAND_MAX, DEMAND_MIN, HOLDING_COST_PER_UNIT,
    INITIAL_CASH, INITIAL_INVENTORY, INITIAL_SATISFACTION, LOW_SATISFACTION_THRESHOLD,
    MAX_ORDER_QUANTITY, MAX_ROUNDS, MAX_ROUNDS_LIMIT, QUANTITY_LIMIT, SATISFACTION_BONUS,
    SATISFACTION_MAX, SATISFACTION_MIN, SATISFACTION_PENALTY_PER_UNIT, SELLING_PRICE_PER_UNIT,
    STOCKOUT_PENALTY_PER_UNIT, UNIT_PRICE_LIMIT,
};

/// Inclusive demand bounds for a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DemandRange {
    pub min: u32,
    pub max: u32,
}

impl DemandRange {
    #[must_use]
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    /// Midpoint of the range, rounded down.
    #[must_use]
    pub const fn midpoint(self) -> u32 {
        self.min + (self.max.saturating_sub(self.min)) / 2
    }

    #[must_use]
    pub const fn contains(self, demand: u32) -> bool {
        demand >= self.min && demand <= self.max
    }
}

impl Default for DemandRange {
    fn default() -> Self {
        Self::new(DEMAND_MIN, DEMAND_MAX)
    }
}

/// Errors raised when configuration invariants are violated.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("demand minimum {min} exceeds maximum {max}")]
    DemandRange { min: u32, max: u32 },
    #[error("max_rounds must be at least 1")]
    NoRounds,
    #[error("{field} must be between 0 and 100 (got {value})")]
    SatisfactionRange { field: &'static str, value: i32 },
    #[error("{field} must not be negative (got {value})")]
    Negative { field: &'static str, value: i64 },
    #[error("{field} exceeds the limit of {limit} (got {value})")]
    TooLarge {
        field: &'static str,
        value: i64,
        limit: i64,
    },
    #[error("configuration JSON is malformed: {0}")]
    Parse(String),
}

/// Session parameters. Every field falls back to its default when omitted
/// from serialized input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub max_rounds: u32,
    pub initial_cash: i64,
    pub initial_inventory: u32,
    pub initial_satisfaction: i32,
    pub holding_cost_per_unit: i64,
    pub stockout_penalty_per_unit: i64,
    pub selling_price_per_unit: i64,
    pub demand_range: DemandRange,
    pub low_satisfaction_threshold: i32,
    pub bankruptcy_threshold: i64,
    pub max_order_quantity: u32,
    pub satisfaction_bonus: i32,
    pub satisfaction_penalty_per_unit: i32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            max_rounds: MAX_ROUNDS,
            initial_cash: INITIAL_CASH,
            initial_inventory: INITIAL_INVENTORY,
            initial_satisfaction: INITIAL_SATISFACTION,
            holding_cost_per_unit: HOLDING_COST_PER_UNIT,
            stockout_penalty_per_unit: STOCKOUT_PENALTY_PER_UNIT,
            selling_price_per_unit: SELLING_PRICE_PER_UNIT,
            demand_range: DemandRange::default(),
            low_satisfaction_threshold: LOW_SATISFACTION_THRESHOLD,
            bankruptcy_threshold: BANKRUPTCY_THRESHOLD,
            max_order_quantity: MAX_ORDER_QUANTITY,
            satisfaction_bonus: SATISFACTION_BONUS,
            satisfaction_penalty_per_unit: SATISFACTION_PENALTY_PER_UNIT,
        }
    }
}

impl GameConfig {
    /// Parse a configuration from JSON and validate it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON or the first
    /// validation failure.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let cfg: Self =
            serde_json::from_str(json).map_err(|err| ConfigError::Parse(err.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Validate configuration invariants.
    ///
    /// Besides consistency checks, every quantity and money field is held
    /// under the limits in [`constants`](crate::constants) so no round can
    /// overflow.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] describing the first violated invariant.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.demand_range.min > self.demand_range.max {
            return Err(ConfigError::DemandRange {
                min: self.demand_range.min,
                max: self.demand_range.max,
            });
        }
        if self.max_rounds == 0 {
            return Err(ConfigError::NoRounds);
        }
        for (field, value) in [
            ("initial_satisfaction", self.initial_satisfaction),
            ("low_satisfaction_threshold", self.low_satisfaction_threshold),
        ] {
            if !(SATISFACTION_MIN..=SATISFACTION_MAX).contains(&value) {
                return Err(ConfigError::SatisfactionRange { field, value });
            }
        }
        for (field, value) in [
            ("holding_cost_per_unit", self.holding_cost_per_unit),
            ("stockout_penalty_per_unit", self.stockout_penalty_per_unit),
            ("selling_price_per_unit", self.selling_price_per_unit),
            ("satisfaction_bonus", i64::from(self.satisfaction_bonus)),
            (
                "satisfaction_penalty_per_unit",
                i64::from(self.satisfaction_penalty_per_unit),
            ),
        ] {
            if value < 0 {
                return Err(ConfigError::Negative { field, value });
            }
        }
        for (field, value, limit) in [
            ("max_rounds", i64::from(self.max_rounds), i64::from(MAX_ROUNDS_LIMIT)),
            (
                "initial_inventory",
                i64::from(self.initial_inventory),
                i64::from(QUANTITY_LIMIT),
            ),
            (
                "max_order_quantity",
                i64::from(self.max_order_quantity),
                i64::from(QUANTITY_LIMIT),
            ),
            ("demand_range.max", i64::from(self.demand_range.max), i64::from(QUANTITY_LIMIT)),
            ("holding_cost_per_unit", self.holding_cost_per_unit, UNIT_PRICE_LIMIT),
            ("stockout_penalty_per_unit", self.stockout_penalty_per_unit, UNIT_PRICE_LIMIT),
            ("selling_price_per_unit", self.selling_price_per_unit, UNIT_PRICE_LIMIT),
            ("initial_cash", self.initial_cash.saturating_abs(), CASH_LIMIT),
        ] {
            if value > limit {
                return Err(ConfigError::TooLarge {
                    field,
                    value,
                    limit,
                });
            }
        }
        Ok(())
    }
}
