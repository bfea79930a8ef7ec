//! # grocer-store
//!
//! Local persistence for the Grocer client.  Exactly two things live here,
//! both surviving process restarts: the signed-in session (user profile and
//! bearer token, stored jointly) and the queue of cart additions deferred
//! while no session exists.  The crate exposes a synchronous [`Database`]
//! handle that wraps a `rusqlite::Connection` and provides typed helpers
//! for each concern.

pub mod database;
pub mod migrations;
pub mod pending;
pub mod session;

mod error;

pub use database::Database;
pub use error::StoreError;
