//! Address book and checkout.

use tracing::{info, warn};

use grocer_shared::{Address, AddressId, NewAddress, Order, OrderId, PlaceOrder};

use crate::error::{ClientError, Result};
use crate::state::Storefront;

impl Storefront {
    /// Saved delivery addresses.
    pub async fn addresses(&self) -> Result<Vec<Address>> {
        let token = self.require_token()?;
        Ok(self.gateway.addresses(&token).await?)
    }

    /// Save a new address; the returned value carries its server-assigned
    /// id.
    pub async fn add_address(&self, address: &NewAddress) -> Result<Address> {
        let token = self.require_token()?;
        Ok(self.gateway.add_address(&token, address).await?)
    }

    /// Overwrite an existing address.
    pub async fn update_address(&self, id: &AddressId, address: &NewAddress) -> Result<()> {
        let token = self.require_token()?;
        Ok(self.gateway.update_address(&token, id, address).await?)
    }

    /// Delete an address.
    pub async fn delete_address(&self, id: &AddressId) -> Result<()> {
        let token = self.require_token()?;
        Ok(self.gateway.delete_address(&token, id).await?)
    }

    /// Place an order for the current cart.
    ///
    /// Local preconditions are checked before any network call: a session,
    /// a non-empty cart, a selected address, and a coherent recurring
    /// schedule when one is requested.
    pub async fn place_order(&self, order: &PlaceOrder) -> Result<Order> {
        let token = {
            let guard = self.lock()?;
            let Some(session) = guard.session.as_ref() else {
                return Err(ClientError::NotAuthenticated);
            };
            if guard.cart.items.is_empty() {
                return Err(ClientError::EmptyCart);
            }
            session.token.clone()
        };

        validate_order(order)?;

        let placed = self.gateway.place_order(&token, order).await?;
        info!(order = %placed.id, recurring = order.is_recurring, "order placed");

        // The order consumes the cart server-side; resynchronize.
        if let Err(e) = self.fetch_cart().await {
            warn!(error = %e, "cart fetch after order failed");
        }

        Ok(placed)
    }

    /// Orders placed by this account.
    pub async fn orders(&self) -> Result<Vec<Order>> {
        let token = self.require_token()?;
        Ok(self.gateway.orders(&token).await?)
    }

    /// One order with its line detail.
    pub async fn order(&self, id: &OrderId) -> Result<Order> {
        let token = self.require_token()?;
        Ok(self.gateway.order(&token, id).await?)
    }

    fn require_token(&self) -> Result<String> {
        self.lock()?
            .session
            .as_ref()
            .map(|s| s.token.clone())
            .ok_or(ClientError::NotAuthenticated)
    }
}

/// Checkout preconditions the client enforces before any network call.
fn validate_order(order: &PlaceOrder) -> Result<()> {
    if order.address_id.0.trim().is_empty() {
        return Err(ClientError::MissingAddress);
    }

    if let Some(ref details) = order.recurring_details {
        if details.delivery_days.is_empty() {
            return Err(ClientError::NoDeliveryDays);
        }
        if details.end_date <= details.start_date {
            return Err(ClientError::EndBeforeStart);
        }
    }

    Ok(())
}
