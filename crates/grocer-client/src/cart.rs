//! The cart synchronization engine.
//!
//! Every mutation follows the same discipline: optionally apply an
//! optimistic local change, call the gateway, then reconcile by fetching
//! the authoritative cart.  Quantity changes and removals reconcile on
//! success and failure alike, so an optimistic change never outlives a
//! settled network call.  Guests never reach the network; their additions
//! are queued locally and replayed once, in order, after sign-in.

use serde::Serialize;
use tracing::{error, info, warn};

use grocer_gateway::GatewayError;
use grocer_shared::{cart_total, CartItemId, PendingCartItem, ProductId};

use crate::error::{ClientError, Result};
use crate::events::{emit, StateEvent};
use crate::state::Storefront;

/// Outcome of an add-to-cart request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum AddToCart {
    /// The item was sent to the gateway and the cart re-fetched.
    Added,
    /// No session: the item was queued locally.  The caller should route
    /// the shopper to sign-in.  This is a success, not a failure.
    DeferredForLogin,
}

/// What happened when the deferred guest-cart queue was replayed.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplayReport {
    /// Number of queued additions attempted.
    pub attempted: usize,
    /// Additions the gateway rejected.  They are dropped, not retried;
    /// the queue is cleared regardless.
    pub failed: Vec<FailedReplay>,
}

/// One queued addition the gateway rejected during replay.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FailedReplay {
    pub item: PendingCartItem,
    pub reason: String,
}

impl Storefront {
    /// Fetch the authoritative cart and replace local state with it,
    /// server-computed total included.
    ///
    /// A no-op for guests.  If the session ends while the request is in
    /// flight, the stale response is discarded rather than repopulating a
    /// cart nobody owns.
    pub async fn fetch_cart(&self) -> Result<()> {
        let Some(token) = self.session_token()? else {
            return Ok(());
        };

        let fetched = self.gateway.cart(&token).await;

        let mut guard = self.lock()?;
        if guard.session.is_none() {
            // Signed out while the request was in flight.
            return Ok(());
        }
        match fetched {
            Ok(cart) => {
                guard.cart = cart;
                drop(guard);
                emit(&self.events, StateEvent::CartChanged);
                Ok(())
            }
            Err(e) => {
                guard.last_cart_error = Some(e.to_string());
                drop(guard);
                emit(&self.events, StateEvent::CartChanged);
                Err(e.into())
            }
        }
    }

    /// Add an item to the cart.
    ///
    /// Guests get the item queued locally and are signalled to sign in;
    /// that branch touches neither the network nor the in-memory cart.
    /// Signed-in shoppers get no optimistic insert: the gateway call is
    /// followed by a reconciling fetch, and on failure the cart stays in
    /// its pre-attempt state.
    pub async fn add_to_cart(
        &self,
        product_id: ProductId,
        variation_index: usize,
        quantity: u32,
    ) -> Result<AddToCart> {
        {
            let guard = self.lock()?;
            if guard.session.is_none() {
                let item = PendingCartItem {
                    product_id: product_id.clone(),
                    variation_index,
                    quantity,
                };
                guard.db.append_pending_item(&item)?;
                drop(guard);
                info!(product = %product_id, quantity, "cart addition deferred until sign-in");
                return Ok(AddToCart::DeferredForLogin);
            }
        }

        let token = self.begin_mutation()?;
        let sent = self
            .gateway
            .add_cart_item(&token, &product_id, variation_index, quantity)
            .await;

        let result = match sent {
            Ok(()) => self.fetch_cart().await.map(|()| AddToCart::Added),
            Err(e) => {
                error!(product = %product_id, error = %e, "add to cart failed");
                self.record_cart_error(&e)?;
                Err(e.into())
            }
        };

        self.finish_mutation()?;
        result
    }

    /// Replay cart additions queued while signed out.
    ///
    /// Items are sent strictly in insertion order; later additions may
    /// depend on server state left by earlier ones.  The queue is cleared
    /// after the attempt no matter what, so one permanently failing item
    /// cannot wedge every future sign-in.  Failures are reported and
    /// logged, not retried.
    pub(crate) async fn replay_pending_items(&self) -> Result<Option<ReplayReport>> {
        let (token, pending) = {
            let guard = self.lock()?;
            let Some(session) = guard.session.as_ref() else {
                return Ok(None);
            };
            (session.token.clone(), guard.db.list_pending_items()?)
        };

        if pending.is_empty() {
            return Ok(None);
        }

        info!(count = pending.len(), "replaying deferred cart additions");

        let attempted = pending.len();
        let mut failed = Vec::new();
        for item in pending {
            let sent = self
                .gateway
                .add_cart_item(&token, &item.product_id, item.variation_index, item.quantity)
                .await;
            if let Err(e) = sent {
                warn!(product = %item.product_id, error = %e, "deferred cart addition rejected");
                failed.push(FailedReplay {
                    item,
                    reason: e.to_string(),
                });
            }
        }

        {
            let guard = self.lock()?;
            guard.db.clear_pending_items()?;
        }

        Ok(Some(ReplayReport { attempted, failed }))
    }

    /// Change a line's quantity.
    ///
    /// The new quantity is applied optimistically and the total recomputed
    /// before the gateway call; the follow-up fetch replaces both with the
    /// server's values whether the call succeeded or not.  The call is
    /// issued even when no local line matches the id; the fetch settles
    /// the outcome either way.
    pub async fn update_quantity(&self, item_id: &CartItemId, quantity: u32) -> Result<()> {
        let token = self.begin_mutation()?;

        {
            let mut guard = self.lock()?;
            let mut changed = false;
            for item in &mut guard.cart.items {
                if item.id.as_ref() == Some(item_id) {
                    item.quantity = quantity;
                    changed = true;
                }
            }
            if changed {
                let total = cart_total(&guard.cart.items);
                guard.cart.total = total;
            }
            drop(guard);
            if changed {
                emit(&self.events, StateEvent::CartChanged);
            }
        }

        let sent = self.gateway.update_cart_item(&token, item_id, quantity).await;
        if let Err(ref e) = sent {
            error!(item = %item_id, error = %e, "quantity update failed");
        }

        let result = self.settle(sent).await;
        self.finish_mutation()?;
        result
    }

    /// Remove a line from the cart.
    ///
    /// The one mutation that validates its identifier up front: an empty
    /// id is rejected locally, logged, and never reaches the network.
    pub async fn remove_item(&self, item_id: &CartItemId) -> Result<()> {
        if item_id.0.trim().is_empty() {
            error!("cannot remove cart item: id is empty");
            return Err(ClientError::MissingItemId);
        }

        let token = self.begin_mutation()?;

        {
            let mut guard = self.lock()?;
            let before = guard.cart.items.len();
            guard.cart.items.retain(|item| item.id.as_ref() != Some(item_id));
            let changed = guard.cart.items.len() != before;
            if changed {
                let total = cart_total(&guard.cart.items);
                guard.cart.total = total;
            }
            drop(guard);
            if changed {
                emit(&self.events, StateEvent::CartChanged);
            }
        }

        let sent = self.gateway.remove_cart_item(&token, item_id).await;
        if let Err(ref e) = sent {
            error!(item = %item_id, error = %e, "remove failed");
        }

        let result = self.settle(sent).await;
        self.finish_mutation()?;
        result
    }

    // ------------------------------------------------------------------
    // Mutate-then-reconcile plumbing
    // ------------------------------------------------------------------

    /// Always fetch the authoritative cart after a mutation has settled.
    /// A failed mutation still reconciles (discarding the optimistic
    /// change), and its own error wins over any fetch error.
    async fn settle(&self, sent: std::result::Result<(), GatewayError>) -> Result<()> {
        let refetch = self.fetch_cart().await;

        match sent {
            Ok(()) => refetch,
            Err(e) => {
                if let Err(fetch_err) = refetch {
                    warn!(error = %fetch_err, "reconciling fetch after failed mutation also failed");
                }
                self.record_cart_error(&e)?;
                Err(e.into())
            }
        }
    }

    fn session_token(&self) -> Result<Option<String>> {
        Ok(self.lock()?.session.as_ref().map(|s| s.token.clone()))
    }

    /// Assert the busy flag, clear the previous error, and hand back the
    /// token the mutation will run under.
    fn begin_mutation(&self) -> Result<String> {
        let mut guard = self.lock()?;
        let Some(session) = guard.session.as_ref() else {
            return Err(ClientError::NotAuthenticated);
        };
        let token = session.token.clone();
        guard.cart_busy = true;
        guard.last_cart_error = None;
        drop(guard);
        emit(&self.events, StateEvent::CartChanged);
        Ok(token)
    }

    fn finish_mutation(&self) -> Result<()> {
        let mut guard = self.lock()?;
        guard.cart_busy = false;
        drop(guard);
        emit(&self.events, StateEvent::CartChanged);
        Ok(())
    }

    fn record_cart_error(&self, e: &GatewayError) -> Result<()> {
        let mut guard = self.lock()?;
        guard.last_cart_error = Some(e.to_string());
        drop(guard);
        emit(&self.events, StateEvent::CartChanged);
        Ok(())
    }
}
