//! Structured round events derived from ledger entries.
//!
//! Events are a pure function of a [`RoundLedgerEntry`]; presentation layers
//! pick styling from `severity` and wording from `kind` or the `Display` impl
//! without inspecting message text.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::constants::{
    EVENT_DEMAND, EVENT_DEMAND_MET, EVENT_STOCKOUT, EVENT_SUPPLIER_FULFILLED,
    EVENT_SUPPLIER_SHORTFALL, EVENT_TRANSPORT_DAMAGE, EVENT_TRANSPORT_DISRUPTION,
};
use crate::ledger::RoundLedgerEntry;
use crate::numbers::fraction_to_percent;

/// A round emits at most five events; keep them inline.
pub type RoundEvents = SmallVec<[RoundEvent; 5]>;

/// Severity tier for a round event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventSeverity {
    Info,
    Success,
    Warning,
}

/// Mechanical event kind with its payload.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EventKind {
    SupplierShortfall {
        supplier: String,
        supplier_name: String,
        yield_percent: u32,
        procured: u32,
        ordered: u32,
    },
    SupplierFulfilled {
        supplier: String,
        supplier_name: String,
        procured: u32,
    },
    DisruptionFee {
        transporter: String,
        transporter_name: String,
        fee: i64,
    },
    TransportDamage {
        transporter: String,
        transporter_name: String,
        damaged: u32,
        received: u32,
    },
    Demand {
        units: u32,
    },
    Stockout {
        units: u32,
    },
    DemandMet {
        sold: u32,
    },
}

impl EventKind {
    #[must_use]
    pub const fn severity(&self) -> EventSeverity {
        match self {
            Self::SupplierShortfall { .. }
            | Self::DisruptionFee { .. }
            | Self::TransportDamage { .. }
            | Self::Stockout { .. } => EventSeverity::Warning,
            Self::SupplierFulfilled { .. } | Self::DemandMet { .. } => EventSeverity::Success,
            Self::Demand { .. } => EventSeverity::Info,
        }
    }

    /// Stable key for presentation-layer lookup.
    #[must_use]
    pub const fn ui_key(&self) -> &'static str {
        match self {
            Self::SupplierShortfall { .. } => EVENT_SUPPLIER_SHORTFALL,
            Self::SupplierFulfilled { .. } => EVENT_SUPPLIER_FULFILLED,
            Self::DisruptionFee { .. } => EVENT_TRANSPORT_DISRUPTION,
            Self::TransportDamage { .. } => EVENT_TRANSPORT_DAMAGE,
            Self::Demand { .. } => EVENT_DEMAND,
            Self::Stockout { .. } => EVENT_STOCKOUT,
            Self::DemandMet { .. } => EVENT_DEMAND_MET,
        }
    }
}

/// Structured event emitted for a resolved round.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoundEvent {
    pub round: u32,
    /// Position within the round's event list.
    pub seq: u8,
    #[serde(flatten)]
    pub kind: EventKind,
    pub severity: EventSeverity,
    pub ui_key: String,
}

impl RoundEvent {
    #[must_use]
    pub fn new(round: u32, seq: u8, kind: EventKind) -> Self {
        Self {
            round,
            seq,
            severity: kind.severity(),
            ui_key: kind.ui_key().to_string(),
            kind,
        }
    }
}

impl std::fmt::Display for RoundEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            EventKind::SupplierShortfall {
                supplier_name,
                yield_percent,
                procured,
                ordered,
                ..
            } => write!(
                f,
                "Supplier '{supplier_name}' only provided {yield_percent}% of your order ({procured}/{ordered} units)."
            ),
            EventKind::SupplierFulfilled {
                supplier_name,
                procured,
                ..
            } => write!(
                f,
                "Supplier '{supplier_name}' successfully provided all {procured} ordered units."
            ),
            EventKind::DisruptionFee {
                transporter_name,
                fee,
                ..
            } => write!(
                f,
                "Transport Disruption! A ${fee} fee was applied for '{transporter_name}'."
            ),
            EventKind::TransportDamage {
                transporter_name,
                damaged,
                received,
                ..
            } => write!(
                f,
                "Transport Damage! {damaged} units were damaged using '{transporter_name}'. Received {received} units."
            ),
            EventKind::Demand { units } => write!(f, "Demand this month: {units} units."),
            EventKind::Stockout { units } => {
                write!(f, "Stockout! Could not meet {units} units of demand.")
            }
            EventKind::DemandMet { sold } => write!(f, "All demand met! Sold {sold} units."),
        }
    }
}

/// Derive the ordered event list for a ledger entry.
#[must_use]
pub fn events_for(entry: &RoundLedgerEntry) -> RoundEvents {
    let mut kinds: SmallVec<[EventKind; 5]> = SmallVec::new();

    if entry.had_shortfall() {
        kinds.push(EventKind::SupplierShortfall {
            supplier: entry.supplier.clone(),
            supplier_name: entry.supplier_name.clone(),
            yield_percent: fraction_to_percent(entry.yield_fraction),
            procured: entry.procured,
            ordered: entry.order_quantity,
        });
    } else {
        kinds.push(EventKind::SupplierFulfilled {
            supplier: entry.supplier.clone(),
            supplier_name: entry.supplier_name.clone(),
            procured: entry.procured,
        });
    }
    if entry.disrupted {
        kinds.push(EventKind::DisruptionFee {
            transporter: entry.transporter.clone(),
            transporter_name: entry.transporter_name.clone(),
            fee: entry.disruption_fee,
        });
    }
    if entry.damage_applied {
        kinds.push(EventKind::TransportDamage {
            transporter: entry.transporter.clone(),
            transporter_name: entry.transporter_name.clone(),
            damaged: entry.damaged,
            received: entry.received,
        });
    }
    kinds.push(EventKind::Demand {
        units: entry.demand,
    });
    if entry.had_stockout() {
        kinds.push(EventKind::Stockout { units: entry.unmet });
    } else {
        kinds.push(EventKind::DemandMet { sold: entry.sold });
    }

    kinds
        .into_iter()
        .zip(0u8..)
        .map(|(kind, seq)| RoundEvent::new(entry.round, seq, kind))
        .collect()
}
