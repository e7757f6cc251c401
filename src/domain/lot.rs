//! Purchase lot tracking.

use serde::{Deserialize, Serialize};

/// A discrete purchase record. Every buy creates its own lot, never merged
/// with earlier ones, so the original cost basis survives partial sells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lot {
    pub quantity: i64,
    pub purchase_price: f64,
}

impl Lot {
    pub fn new(quantity: i64, purchase_price: f64) -> Self {
        Lot {
            quantity,
            purchase_price,
        }
    }

    pub fn market_value(&self, price: f64) -> f64 {
        self.quantity as f64 * price
    }

    pub fn unrealized_pnl(&self, price: f64) -> f64 {
        self.quantity as f64 * (price - self.purchase_price)
    }
}
