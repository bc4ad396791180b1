//! Centralized balance and tuning constants for the supply chain engine.
//!
//! These are the defaults a fresh [`GameConfig`](crate::GameConfig) starts
//! from, plus the fixed scoring weights.

// Session defaults ----------------------------------------------------------
pub const MAX_ROUNDS: u32 = 12;
pub const INITIAL_CASH: i64 = 50_000;
pub const INITIAL_INVENTORY: u32 = 100;
pub const INITIAL_SATISFACTION: i32 = 80;

// Per-unit economics --------------------------------------------------------
pub const HOLDING_COST_PER_UNIT: i64 = 2;
pub const STOCKOUT_PENALTY_PER_UNIT: i64 = 30;
pub const SELLING_PRICE_PER_UNIT: i64 = 50;

// Demand --------------------------------------------------------------------
pub const DEMAND_MIN: u32 = 80;
pub const DEMAND_MAX: u32 = 220;
pub const MAX_ORDER_QUANTITY: u32 = 1_000;

// Satisfaction --------------------------------------------------------------
pub const SATISFACTION_MIN: i32 = 0;
pub const SATISFACTION_MAX: i32 = 100;
pub const SATISFACTION_BONUS: i32 = 5;
pub const SATISFACTION_PENALTY_PER_UNIT: i32 = 2;

// Termination thresholds ----------------------------------------------------
pub const LOW_SATISFACTION_THRESHOLD: i32 = 30;
pub const BANKRUPTCY_THRESHOLD: i64 = 0;

// Validation limits ---------------------------------------------------------
// With every value at its limit, a full term of rounds keeps cash and
// cumulative costs within i64 and inventory within u32.
pub const MAX_ROUNDS_LIMIT: u32 = 1_000;
pub const QUANTITY_LIMIT: u32 = 1_000_000;
pub const UNIT_PRICE_LIMIT: i64 = 1_000_000;
pub const FLAT_FEE_LIMIT: i64 = 1_000_000_000;
pub const CASH_LIMIT: i64 = 1_000_000_000_000_000;

// Scoring -------------------------------------------------------------------
pub const SCORE_SATISFACTION_WEIGHT: f64 = 100.0;
pub const SCORE_COST_DIVISOR: f64 = 10.0;

// Catalog validation --------------------------------------------------------
pub(crate) const PROBABILITY_SUM_TOLERANCE: f64 = 1e-6;

// Event presentation keys ---------------------------------------------------
pub(crate) const EVENT_SUPPLIER_SHORTFALL: &str = "event.supplier.shortfall";
pub(crate) const EVENT_SUPPLIER_FULFILLED: &str = "event.supplier.fulfilled";
pub(crate) const EVENT_TRANSPORT_DISRUPTION: &str = "event.transport.disruption";
pub(crate) const EVENT_TRANSPORT_DAMAGE: &str = "event.transport.damage";
pub(crate) const EVENT_DEMAND: &str = "event.demand";
pub(crate) const EVENT_STOCKOUT: &str = "event.demand.stockout";
pub(crate) const EVENT_DEMAND_MET: &str = "event.demand.met";

// RNG stream domains --------------------------------------------------------
pub(crate) const STREAM_YIELD: &[u8] = b"yield";
pub(crate) const STREAM_DISRUPTION: &[u8] = b"disruption";
pub(crate) const STREAM_DAMAGE: &[u8] = b"damage";
pub(crate) const STREAM_DEMAND: &[u8] = b"demand";
