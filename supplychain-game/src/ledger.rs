//! Append-only record of resolved rounds.
use serde::{Deserialize, Serialize};

use crate::constants::{SATISFACTION_MAX, SATISFACTION_MIN};

/// Every quantity computed while resolving one round.
///
/// Entries are written once by the resolver and only read for reporting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundLedgerEntry {
    pub round: u32,
    /// Catalog ids of the chosen profiles.
    pub supplier: String,
    pub transporter: String,
    /// Labels the player saw when choosing, so events need only this entry.
    pub supplier_name: String,
    pub transporter_name: String,

    // Procurement
    pub order_quantity: u32,
    pub yield_fraction: f64,
    pub procured: u32,
    pub sourcing_cost: i64,

    // Transport
    pub transport_base_cost: i64,
    pub disrupted: bool,
    /// Flat fee charged this round; zero when no disruption occurred.
    pub disruption_fee: i64,
    pub transport_cost: i64,
    /// True only when damage was rolled and applied to a non-empty shipment.
    pub damage_applied: bool,
    pub damaged: u32,
    pub received: u32,

    // Fulfillment
    pub available: u32,
    pub demand: u32,
    pub sold: u32,
    pub unmet: u32,
    pub revenue: i64,
    pub stockout_cost: i64,
    pub ending_inventory: u32,
    pub holding_cost: i64,
    pub round_total_cost: i64,

    // Resulting state
    pub cash_before: i64,
    pub cash_after: i64,
    pub satisfaction_before: i32,
    pub satisfaction_after: i32,
    pub cumulative_costs_after: i64,
}

impl RoundLedgerEntry {
    /// Net cash movement for the round.
    #[must_use]
    pub const fn cash_delta(&self) -> i64 {
        self.revenue - self.round_total_cost
    }

    #[must_use]
    pub const fn had_stockout(&self) -> bool {
        self.unmet > 0
    }

    /// True when the supplier delivered less than ordered.
    #[must_use]
    pub fn had_shortfall(&self) -> bool {
        self.yield_fraction < 1.0
    }

    /// Recompute the derived arithmetic and report the first mismatch.
    ///
    /// # Errors
    ///
    /// Returns a description of the first inconsistent field.
    pub fn audit(&self) -> Result<(), String> {
        let checks = [
            (
                "received",
                self.received == self.procured.saturating_sub(self.damaged),
            ),
            ("sold<=demand", self.sold <= self.demand),
            ("sold<=available", self.sold <= self.available),
            ("unmet", self.demand.checked_sub(self.sold) == Some(self.unmet)),
            (
                "ending_inventory",
                self.available.checked_sub(self.sold) == Some(self.ending_inventory),
            ),
            (
                "transport_cost",
                self.transport_cost == self.transport_base_cost + self.disruption_fee,
            ),
            (
                "round_total_cost",
                self.round_total_cost
                    == self.sourcing_cost
                        + self.transport_cost
                        + self.stockout_cost
                        + self.holding_cost,
            ),
            ("cash_after", self.cash_after == self.cash_before + self.cash_delta()),
            (
                "satisfaction_after",
                (SATISFACTION_MIN..=SATISFACTION_MAX).contains(&self.satisfaction_after),
            ),
        ];
        match checks.iter().find(|(_, ok)| !ok) {
            Some((field, _)) => Err(format!("round {} ledger mismatch: {field}", self.round)),
            None => Ok(()),
        }
    }
}
