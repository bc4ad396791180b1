//! Round resolution: the state-transition function of the game.
use log::debug;

use crate::config::GameConfig;
use crate::decision::ResolvedDecision;
use crate::ledger::RoundLedgerEntry;
use crate::numbers::floor_units;
use crate::outcomes::OutcomeSource;
use crate::state::{GameState, clamp_satisfaction};

/// Next state plus the ledger entry describing how it was reached.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundResolution {
    pub state: GameState,
    pub entry: RoundLedgerEntry,
}

/// Resolve one round.
///
/// Depends only on its arguments and the draws taken from `outcomes`, in the
/// order yield, disruption, damage, demand. Round number and termination
/// fields are carried over untouched.
///
/// Plain integer arithmetic is used throughout; it cannot overflow once
/// `cfg` and the catalog have passed validation.
pub fn resolve<O>(
    state: &GameState,
    decision: &ResolvedDecision<'_>,
    cfg: &GameConfig,
    outcomes: &mut O,
) -> RoundResolution
where
    O: OutcomeSource + ?Sized,
{
    let supplier = decision.supplier;
    let transporter = decision.transporter;

    // Procurement
    let yield_fraction = outcomes.sample_yield(supplier);
    let procured = floor_units(decision.order_quantity, yield_fraction);
    let sourcing_cost = i64::from(procured) * supplier.unit_cost;

    // Transport
    let transport_base_cost = i64::from(procured) * transporter.unit_cost;
    let disrupted = outcomes.sample_disruption(transporter);
    let disruption_fee = if disrupted {
        transporter.disruption_fee
    } else {
        0
    };
    let transport_cost = transport_base_cost + disruption_fee;
    let damage_applied = outcomes.sample_damage(transporter) && procured > 0;
    let damaged = if damage_applied {
        floor_units(procured, transporter.damage_fraction)
    } else {
        0
    };
    let received = procured - damaged;

    // Fulfillment
    let available = state.inventory.saturating_add(received);
    let demand = outcomes.sample_demand(cfg.demand_range);
    let sold = available.min(demand);
    let unmet = demand - sold;
    let revenue = i64::from(sold) * cfg.selling_price_per_unit;

    let raw_satisfaction = if unmet > 0 {
        i64::from(state.satisfaction)
            - i64::from(unmet) * i64::from(cfg.satisfaction_penalty_per_unit)
    } else {
        i64::from(state.satisfaction) + i64::from(cfg.satisfaction_bonus)
    };
    let satisfaction = clamp_satisfaction(raw_satisfaction);

    let stockout_cost = i64::from(unmet) * cfg.stockout_penalty_per_unit;
    let ending_inventory = available - sold;
    let holding_cost = i64::from(ending_inventory) * cfg.holding_cost_per_unit;

    let round_total_cost = sourcing_cost + transport_cost + stockout_cost + holding_cost;
    let cash = state.cash + revenue - round_total_cost;
    let cumulative_costs = state.cumulative_costs + round_total_cost;

    debug!(
        "round {} resolved: procured={procured} received={received} demand={demand} sold={sold} cost={round_total_cost} cash={cash}",
        state.round_number
    );

    let next = GameState {
        cash,
        inventory: ending_inventory,
        satisfaction,
        cumulative_costs,
        ..state.clone()
    };
    let entry = RoundLedgerEntry {
        round: state.round_number,
        supplier: supplier.id.clone(),
        transporter: transporter.id.clone(),
        supplier_name: supplier.display_label(),
        transporter_name: transporter.display_label(),
        order_quantity: decision.order_quantity,
        yield_fraction,
        procured,
        sourcing_cost,
        transport_base_cost,
        disrupted,
        disruption_fee,
        transport_cost,
        damage_applied,
        damaged,
        received,
        available,
        demand,
        sold,
        unmet,
        revenue,
        stockout_cost,
        ending_inventory,
        holding_cost,
        round_total_cost,
        cash_before: state.cash,
        cash_after: cash,
        satisfaction_before: state.satisfaction,
        satisfaction_after: satisfaction,
        cumulative_costs_after: cumulative_costs,
    };
    RoundResolution { state: next, entry }
}
