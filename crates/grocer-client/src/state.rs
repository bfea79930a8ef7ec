//! Application state shared across all storefront operations.
//!
//! [`AppState`] is wrapped in `Arc<Mutex<_>>` and owned by [`Storefront`].
//! Operations lock it only at well-defined points -- never across an
//! `await` -- so state changes land whole at each resume point.

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::broadcast;

use grocer_gateway::{Gateway, GatewayConfig};
use grocer_shared::{Cart, Session, UserProfile};
use grocer_store::Database;

use crate::error::{ClientError, Result};
use crate::events::StateEvent;

/// Central application state.
pub struct AppState {
    /// The signed-in session.  `None` while browsing as a guest.
    pub session: Option<Session>,

    /// The basket as last reported by the gateway, plus any optimistic
    /// mutation not yet reconciled.
    pub cart: Cart,

    /// Whether a cart mutation is currently in flight.
    pub cart_busy: bool,

    /// Human-readable error from the most recent failed cart operation.
    /// Cleared when the next mutation starts.
    pub last_cart_error: Option<String>,

    /// Handle to the local database holding the session and the deferred
    /// guest-cart queue.
    pub db: Database,
}

/// Handle to the storefront engine.
///
/// Cheap to clone; all clones share the same state.
#[derive(Clone)]
pub struct Storefront {
    pub(crate) state: Arc<Mutex<AppState>>,
    pub(crate) gateway: Gateway,
    pub(crate) events: broadcast::Sender<StateEvent>,
}

impl Storefront {
    /// Open the storefront over the default local database, restoring a
    /// persisted session if one exists.
    pub fn new(config: &GatewayConfig) -> Result<Self> {
        let db = Database::new()?;
        Self::with_database(config, db)
    }

    /// Open the storefront over an explicit database handle.
    pub fn with_database(config: &GatewayConfig, db: Database) -> Result<Self> {
        let gateway = Gateway::new(config)?;

        let session = db.load_session()?;
        if let Some(ref s) = session {
            tracing::info!(email = %s.user.email, "restored persisted session");
        }

        let (events, _) = broadcast::channel(64);
        let state = AppState {
            session,
            cart: Cart::empty(),
            cart_busy: false,
            last_cart_error: None,
            db,
        };

        Ok(Self {
            state: Arc::new(Mutex::new(state)),
            gateway,
            events,
        })
    }

    /// Subscribe to state-change notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<StateEvent> {
        self.events.subscribe()
    }

    /// Snapshot of the current cart.
    pub fn cart(&self) -> Result<Cart> {
        Ok(self.lock()?.cart.clone())
    }

    /// The signed-in user, if any.
    pub fn current_user(&self) -> Result<Option<UserProfile>> {
        Ok(self.lock()?.session.as_ref().map(|s| s.user.clone()))
    }

    /// Whether a session is present.
    pub fn is_authenticated(&self) -> Result<bool> {
        Ok(self.lock()?.session.is_some())
    }

    /// Whether a cart mutation is in flight.
    pub fn cart_busy(&self) -> Result<bool> {
        Ok(self.lock()?.cart_busy)
    }

    /// Error from the most recent failed cart operation, if any.
    pub fn last_cart_error(&self) -> Result<Option<String>> {
        Ok(self.lock()?.last_cart_error.clone())
    }

    pub(crate) fn lock(&self) -> Result<MutexGuard<'_, AppState>> {
        self.state.lock().map_err(|_| ClientError::StatePoisoned)
    }
}
