//! Static supplier and transporter reference data.
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::OnceLock;
use thiserror::Error;

use crate::constants::{FLAT_FEE_LIMIT, PROBABILITY_SUM_TOLERANCE, UNIT_PRICE_LIMIT};
use crate::decision::{Decision, DecisionError, ResolvedDecision};

/// A single discrete yield outcome for a supplier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YieldOutcome {
    /// Chance of this outcome; all outcomes of a supplier sum to 1.
    pub probability: f64,
    /// Share of the ordered quantity actually procured, in (0, 1].
    pub fraction: f64,
}

impl YieldOutcome {
    #[must_use]
    pub const fn new(probability: f64, fraction: f64) -> Self {
        Self {
            probability,
            fraction,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplierProfile {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub unit_cost: i64,
    pub yield_outcomes: Vec<YieldOutcome>,
}

impl SupplierProfile {
    /// Probability-weighted mean yield fraction.
    #[must_use]
    pub fn expected_yield(&self) -> f64 {
        self.yield_outcomes
            .iter()
            .map(|outcome| outcome.probability * outcome.fraction)
            .sum()
    }

    /// True when every outcome delivers the full order.
    #[must_use]
    pub fn is_reliable(&self) -> bool {
        self.yield_outcomes
            .iter()
            .all(|outcome| outcome.probability <= 0.0 || outcome.fraction >= 1.0)
    }

    /// Name and description as offered to the player, e.g.
    /// `Gamma Source (Cheap & Risky)`.
    #[must_use]
    pub fn display_label(&self) -> String {
        display_label(&self.name, &self.description)
    }

    fn validate(&self) -> Result<(), CatalogError> {
        check_cost(&self.id, "unit_cost", self.unit_cost, UNIT_PRICE_LIMIT)?;
        if self.yield_outcomes.is_empty() {
            return Err(CatalogError::EmptyYieldOutcomes(self.id.clone()));
        }
        for outcome in &self.yield_outcomes {
            if !outcome.probability.is_finite() || outcome.probability < 0.0 {
                return Err(CatalogError::NegativeProbability {
                    id: self.id.clone(),
                    value: outcome.probability,
                });
            }
            if !(outcome.fraction > 0.0 && outcome.fraction <= 1.0) {
                return Err(CatalogError::YieldFractionRange {
                    id: self.id.clone(),
                    value: outcome.fraction,
                });
            }
        }
        let total: f64 = self.yield_outcomes.iter().map(|o| o.probability).sum();
        if (total - 1.0).abs() > PROBABILITY_SUM_TOLERANCE {
            return Err(CatalogError::ProbabilitySum {
                id: self.id.clone(),
                total,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportProfile {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Cost per procured unit shipped.
    pub unit_cost: i64,
    pub disruption_probability: f64,
    /// Flat fee charged when a disruption occurs, independent of quantity.
    pub disruption_fee: i64,
    pub damage_probability: f64,
    /// Share of the shipment lost when damage occurs.
    pub damage_fraction: f64,
}

impl TransportProfile {
    #[must_use]
    pub fn display_label(&self) -> String {
        display_label(&self.name, &self.description)
    }

    fn validate(&self) -> Result<(), CatalogError> {
        check_cost(&self.id, "unit_cost", self.unit_cost, UNIT_PRICE_LIMIT)?;
        check_cost(&self.id, "disruption_fee", self.disruption_fee, FLAT_FEE_LIMIT)?;
        for (field, value) in [
            ("disruption_probability", self.disruption_probability),
            ("damage_probability", self.damage_probability),
            ("damage_fraction", self.damage_fraction),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(CatalogError::UnitRange {
                    id: self.id.clone(),
                    field,
                    value,
                });
            }
        }
        Ok(())
    }
}

fn display_label(name: &str, description: &str) -> String {
    if description.is_empty() {
        name.to_string()
    } else {
        format!("{name} ({description})")
    }
}

fn check_cost(id: &str, field: &'static str, value: i64, limit: i64) -> Result<(), CatalogError> {
    if value < 0 {
        return Err(CatalogError::NegativeCost {
            id: id.to_string(),
            field,
            value,
        });
    }
    if value > limit {
        return Err(CatalogError::CostTooLarge {
            id: id.to_string(),
            field,
            value,
            limit,
        });
    }
    Ok(())
}

/// Errors raised when catalog reference data is inconsistent.
#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    #[error("catalog has no suppliers")]
    NoSuppliers,
    #[error("catalog has no transporters")]
    NoTransporters,
    #[error("duplicate catalog id `{0}`")]
    DuplicateId(String),
    #[error("supplier `{0}` has no yield outcomes")]
    EmptyYieldOutcomes(String),
    #[error("supplier `{id}` has a negative or non-finite probability ({value})")]
    NegativeProbability { id: String, value: f64 },
    #[error("supplier `{id}` yield probabilities sum to {total:.6}, expected 1")]
    ProbabilitySum { id: String, total: f64 },
    #[error("supplier `{id}` yield fraction {value} outside (0, 1]")]
    YieldFractionRange { id: String, value: f64 },
    #[error("`{id}` {field} must be between 0 and 1 (got {value})")]
    UnitRange {
        id: String,
        field: &'static str,
        value: f64,
    },
    #[error("`{id}` {field} must not be negative (got {value})")]
    NegativeCost {
        id: String,
        field: &'static str,
        value: i64,
    },
    #[error("`{id}` {field} exceeds the limit of {limit} (got {value})")]
    CostTooLarge {
        id: String,
        field: &'static str,
        value: i64,
        limit: i64,
    },
    #[error("catalog JSON is malformed: {0}")]
    Parse(String),
}

/// Read-only set of suppliers and transporters offered to the player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CatalogData", into = "CatalogData")]
pub struct Catalog {
    suppliers: Vec<SupplierProfile>,
    transporters: Vec<TransportProfile>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CatalogData {
    suppliers: Vec<SupplierProfile>,
    transporters: Vec<TransportProfile>,
}

impl TryFrom<CatalogData> for Catalog {
    type Error = CatalogError;

    fn try_from(data: CatalogData) -> Result<Self, Self::Error> {
        Self::new(data.suppliers, data.transporters)
    }
}

impl From<Catalog> for CatalogData {
    fn from(catalog: Catalog) -> Self {
        Self {
            suppliers: catalog.suppliers,
            transporters: catalog.transporters,
        }
    }
}

impl Catalog {
    /// Build a catalog, validating every profile.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] describing the first inconsistency found.
    pub fn new(
        suppliers: Vec<SupplierProfile>,
        transporters: Vec<TransportProfile>,
    ) -> Result<Self, CatalogError> {
        let catalog = Self {
            suppliers,
            transporters,
        };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Parse and validate a catalog from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Parse`] for malformed JSON, or the validation
    /// error for well-formed but inconsistent data.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let data: CatalogData =
            serde_json::from_str(json).map_err(|err| CatalogError::Parse(err.to_string()))?;
        Self::try_from(data)
    }

    /// Shared instance of the built-in catalog.
    #[must_use]
    pub fn standard() -> &'static Self {
        static CATALOG: OnceLock<Catalog> = OnceLock::new();
        CATALOG.get_or_init(Self::standard_data)
    }

    fn standard_data() -> Self {
        Self {
            suppliers: vec![
                SupplierProfile {
                    id: "alpha".to_string(),
                    name: "Alpha Goods".to_string(),
                    description: "Reliable & Pricey".to_string(),
                    unit_cost: 20,
                    yield_outcomes: vec![YieldOutcome::new(1.0, 1.0)],
                },
                SupplierProfile {
                    id: "beta".to_string(),
                    name: "Beta Stock".to_string(),
                    description: "Standard".to_string(),
                    unit_cost: 15,
                    yield_outcomes: vec![YieldOutcome::new(0.9, 1.0), YieldOutcome::new(0.1, 0.7)],
                },
                SupplierProfile {
                    id: "gamma".to_string(),
                    name: "Gamma Source".to_string(),
                    description: "Cheap & Risky".to_string(),
                    unit_cost: 10,
                    yield_outcomes: vec![
                        YieldOutcome::new(0.6, 1.0),
                        YieldOutcome::new(0.3, 0.5),
                        YieldOutcome::new(0.1, 0.2),
                    ],
                },
            ],
            transporters: vec![
                TransportProfile {
                    id: "express".to_string(),
                    name: "Express Freight".to_string(),
                    description: "Fast & Secure".to_string(),
                    unit_cost: 8,
                    disruption_probability: 0.05,
                    disruption_fee: 200,
                    damage_probability: 0.01,
                    damage_fraction: 0.05,
                },
                TransportProfile {
                    id: "standard".to_string(),
                    name: "Standard Shipping".to_string(),
                    description: "Balanced".to_string(),
                    unit_cost: 5,
                    disruption_probability: 0.15,
                    disruption_fee: 150,
                    damage_probability: 0.03,
                    damage_fraction: 0.10,
                },
                TransportProfile {
                    id: "budget".to_string(),
                    name: "Budget Haul".to_string(),
                    description: "Slow & Risky".to_string(),
                    unit_cost: 3,
                    disruption_probability: 0.30,
                    disruption_fee: 100,
                    damage_probability: 0.05,
                    damage_fraction: 0.15,
                },
            ],
        }
    }

    /// Check every profile and the uniqueness of ids.
    ///
    /// # Errors
    ///
    /// Returns the first [`CatalogError`] encountered.
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.suppliers.is_empty() {
            return Err(CatalogError::NoSuppliers);
        }
        if self.transporters.is_empty() {
            return Err(CatalogError::NoTransporters);
        }
        let mut seen = HashSet::new();
        for supplier in &self.suppliers {
            if !seen.insert(supplier.id.as_str()) {
                return Err(CatalogError::DuplicateId(supplier.id.clone()));
            }
            supplier.validate()?;
        }
        let mut seen = HashSet::new();
        for transporter in &self.transporters {
            if !seen.insert(transporter.id.as_str()) {
                return Err(CatalogError::DuplicateId(transporter.id.clone()));
            }
            transporter.validate()?;
        }
        Ok(())
    }

    #[must_use]
    pub fn suppliers(&self) -> &[SupplierProfile] {
        &self.suppliers
    }

    #[must_use]
    pub fn transporters(&self) -> &[TransportProfile] {
        &self.transporters
    }

    #[must_use]
    pub fn supplier(&self, id: &str) -> Option<&SupplierProfile> {
        self.suppliers.iter().find(|supplier| supplier.id == id)
    }

    #[must_use]
    pub fn transporter(&self, id: &str) -> Option<&TransportProfile> {
        self.transporters
            .iter()
            .find(|transporter| transporter.id == id)
    }

    /// Resolve a player decision against this catalog.
    ///
    /// # Errors
    ///
    /// Returns [`DecisionError::UnknownSupplier`] or
    /// [`DecisionError::UnknownTransporter`] for ids not in the catalog.
    pub fn resolve<'a>(
        &'a self,
        decision: &Decision,
        order_quantity: u32,
    ) -> Result<ResolvedDecision<'a>, DecisionError> {
        let supplier = self
            .supplier(&decision.supplier)
            .ok_or_else(|| DecisionError::UnknownSupplier(decision.supplier.clone()))?;
        let transporter = self
            .transporter(&decision.transporter)
            .ok_or_else(|| DecisionError::UnknownTransporter(decision.transporter.clone()))?;
        Ok(ResolvedDecision {
            supplier,
            transporter,
            order_quantity,
        })
    }
}
