//! Order endpoints.

use tracing::debug;

use grocer_shared::{Order, OrderId, PlaceOrder};

use crate::client::{decode, Gateway};
use crate::error::Result;

impl Gateway {
    /// Create an order from the current cart.  Not idempotent.
    pub async fn place_order(&self, token: &str, order: &PlaceOrder) -> Result<Order> {
        debug!(address = %order.address_id, recurring = order.is_recurring, "POST /orders/create");
        let resp = self
            .post("/orders/create")
            .bearer_auth(token)
            .json(order)
            .send()
            .await?;
        decode(resp).await
    }

    /// Orders placed by this account.
    pub async fn orders(&self, token: &str) -> Result<Vec<Order>> {
        let resp = self.get("/orders").bearer_auth(token).send().await?;
        decode(resp).await
    }

    /// One order with its line detail.
    pub async fn order(&self, token: &str, id: &OrderId) -> Result<Order> {
        let resp = self
            .get(&format!("/orders/{id}"))
            .bearer_auth(token)
            .send()
            .await?;
        decode(resp).await
    }
}
