//! # grocer-gateway
//!
//! Typed client for the remote storefront API: authentication, catalog,
//! cart, addresses, and orders.  The gateway is an opaque collaborator;
//! this crate shapes requests, attaches the bearer token the caller
//! provides, and surfaces the server's own error messages verbatim where
//! they exist.  It never retries and never refreshes credentials.

pub mod addresses;
pub mod auth;
pub mod cart;
pub mod catalog;
pub mod client;
pub mod config;
pub mod orders;

mod error;

pub use client::Gateway;
pub use config::GatewayConfig;
pub use error::GatewayError;
