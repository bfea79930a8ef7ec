//! Cart models and the optimistic total computation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::catalog::{Product, ProductId, Variation};

/// Cart-line identifier assigned by the gateway.  A line without one cannot
/// be updated or removed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct CartItemId(pub String);

impl std::fmt::Display for CartItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One line in the shopper's basket.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Server-assigned line id, required for update and removal.
    #[serde(rename = "_id", default)]
    pub id: Option<CartItemId>,
    pub product_id: ProductId,
    /// Index into the product's variation list at the time of adding.
    /// Not a stable identifier: upstream edits to the product can shift it.
    pub variation_index: usize,
    pub quantity: u32,
    /// Display snapshot attached by the gateway; not authoritative for
    /// pricing beyond what total reconciliation already covers.
    #[serde(default)]
    pub product: Option<Product>,
    #[serde(default)]
    pub variation: Option<Variation>,
}

/// The basket as last reported by the gateway, possibly carrying an
/// optimistic mutation that has not been reconciled yet.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Cart {
    #[serde(default)]
    pub items: Vec<CartItem>,
    /// Server-computed value.  Recomputed locally only between a mutation
    /// and the reconciling fetch that overwrites it.
    #[serde(default, with = "rust_decimal::serde::float")]
    pub total: Decimal,
}

impl Cart {
    /// A cart with no items and a zero total.
    pub fn empty() -> Self {
        Self::default()
    }
}

/// An add-to-cart action captured while no session exists, replayed in
/// insertion order after sign-in.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PendingCartItem {
    pub product_id: ProductId,
    pub variation_index: usize,
    pub quantity: u32,
}

/// Sum of `variation.price × quantity` over the given lines.  Lines without
/// a variation snapshot contribute zero.
pub fn cart_total(items: &[CartItem]) -> Decimal {
    items
        .iter()
        .filter_map(|item| {
            item.variation
                .as_ref()
                .map(|v| v.price * Decimal::from(item.quantity))
        })
        .sum()
}
