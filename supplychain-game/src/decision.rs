//! Player input for a single round.
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::{SupplierProfile, TransportProfile};

/// Raw decision as submitted by the presentation layer.
///
/// `order_quantity` is signed so out-of-range input can be rejected with a
/// validation error instead of failing to parse.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Decision {
    pub supplier: String,
    pub transporter: String,
    pub order_quantity: i64,
}

impl Decision {
    #[must_use]
    pub fn new(
        supplier: impl Into<String>,
        transporter: impl Into<String>,
        order_quantity: i64,
    ) -> Self {
        Self {
            supplier: supplier.into(),
            transporter: transporter.into(),
            order_quantity,
        }
    }

    /// Check the order quantity against the configured bound.
    ///
    /// # Errors
    ///
    /// Returns [`DecisionError::NegativeQuantity`] or
    /// [`DecisionError::QuantityAboveMax`].
    pub fn checked_quantity(&self, max: u32) -> Result<u32, DecisionError> {
        if self.order_quantity < 0 {
            return Err(DecisionError::NegativeQuantity(self.order_quantity));
        }
        match u32::try_from(self.order_quantity) {
            Ok(quantity) if quantity <= max => Ok(quantity),
            _ => Err(DecisionError::QuantityAboveMax {
                requested: self.order_quantity,
                max,
            }),
        }
    }
}

/// Decision whose identifiers and quantity have been validated.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedDecision<'a> {
    pub supplier: &'a SupplierProfile,
    pub transporter: &'a TransportProfile,
    pub order_quantity: u32,
}

/// Reasons a decision is rejected before any state changes.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DecisionError {
    #[error("order quantity cannot be negative (got {0})")]
    NegativeQuantity(i64),
    #[error("order quantity {requested} exceeds the maximum of {max}")]
    QuantityAboveMax { requested: i64, max: u32 },
    #[error("unknown supplier `{0}`")]
    UnknownSupplier(String),
    #[error("unknown transporter `{0}`")]
    UnknownTransporter(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantity_bounds_are_inclusive() {
        assert_eq!(Decision::new("a", "b", 0).checked_quantity(1_000), Ok(0));
        assert_eq!(
            Decision::new("a", "b", 1_000).checked_quantity(1_000),
            Ok(1_000)
        );
        assert_eq!(
            Decision::new("a", "b", 1_001).checked_quantity(1_000),
            Err(DecisionError::QuantityAboveMax {
                requested: 1_001,
                max: 1_000
            })
        );
        assert_eq!(
            Decision::new("a", "b", -1).checked_quantity(1_000),
            Err(DecisionError::NegativeQuantity(-1))
        );
        assert!(
            Decision::new("a", "b", i64::MAX)
                .checked_quantity(u32::MAX)
                .is_err()
        );
    }
}
