use crate::value_objects::{Price, Quantity};
use serde::{Deserialize, Serialize};

/// Represents a single aggregated price level in an order book
///
/// `update_id` is the sequence number of the snapshot or diff that last
/// touched this level.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PriceLevel {
    pub price: Price,
    pub quantity: Quantity,
    pub update_id: u64,
}

impl PriceLevel {
    pub fn new(price: Price, quantity: Quantity, update_id: u64) -> Self {
        PriceLevel {
            price,
            quantity,
            update_id,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.quantity.is_zero()
    }
}

impl PartialEq for PriceLevel {
    fn eq(&self, other: &Self) -> bool {
        self.price == other.price
    }
}

impl Eq for PriceLevel {}
