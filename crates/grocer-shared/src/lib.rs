//! # grocer-shared
//!
//! Domain types shared across the Grocer client crates: catalog, cart,
//! order, and user models, all serde-derived with the camelCase field names
//! the gateway speaks.  Monetary amounts are `rust_decimal::Decimal`,
//! carried as plain JSON numbers on the wire.

pub mod cart;
pub mod catalog;
pub mod order;
pub mod user;

pub use cart::{cart_total, Cart, CartItem, CartItemId, PendingCartItem};
pub use catalog::{Category, CategoryId, Product, ProductId, Variation};
pub use order::{
    Address, AddressId, DeliveryDay, NewAddress, Order, OrderId, PaymentMethod, PlaceOrder,
    RecurringDetails,
};
pub use user::{ProfileUpdate, Session, UserProfile};
