//! # grocer-client
//!
//! The storefront engine: session lifecycle, cart synchronization with
//! guest-checkout deferral, catalog browsing, and checkout.  The view
//! layer calls into [`Storefront`] and observes its state; it never
//! mutates that state directly.

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod events;
pub mod session;
pub mod state;

mod error;

pub use cart::{AddToCart, FailedReplay, ReplayReport};
pub use error::ClientError;
pub use events::StateEvent;
pub use session::SignInOutcome;
pub use state::{AppState, Storefront};

use tracing_subscriber::{fmt, EnvFilter};

/// Initialise logging for an embedding application.
///
/// Honours `RUST_LOG`; defaults to debug for the engine crates and warn
/// for everything else.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("grocer_client=debug,grocer_gateway=debug,grocer_store=info,warn")
    });

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}
