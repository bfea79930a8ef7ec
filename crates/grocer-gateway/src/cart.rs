//! Cart endpoints.

use serde::Serialize;
use tracing::debug;

use grocer_shared::{Cart, CartItemId, ProductId};

use crate::client::{decode, unit, Gateway};
use crate::error::Result;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AddItemBody<'a> {
    product_id: &'a ProductId,
    variation_index: usize,
    quantity: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateItemBody<'a> {
    item_id: &'a CartItemId,
    quantity: u32,
}

impl Gateway {
    /// The current cart for the session, including the server-computed
    /// total.
    pub async fn cart(&self, token: &str) -> Result<Cart> {
        let resp = self.get("/cart").bearer_auth(token).send().await?;
        decode(resp).await
    }

    /// Add a line to the cart.  Additive, not idempotent.
    pub async fn add_cart_item(
        &self,
        token: &str,
        product_id: &ProductId,
        variation_index: usize,
        quantity: u32,
    ) -> Result<()> {
        debug!(product = %product_id, quantity, "POST /cart/add");
        let resp = self
            .post("/cart/add")
            .bearer_auth(token)
            .json(&AddItemBody {
                product_id,
                variation_index,
                quantity,
            })
            .send()
            .await?;
        unit(resp).await
    }

    /// Set a line's quantity.
    pub async fn update_cart_item(
        &self,
        token: &str,
        item_id: &CartItemId,
        quantity: u32,
    ) -> Result<()> {
        debug!(item = %item_id, quantity, "PUT /cart/update");
        let resp = self
            .put("/cart/update")
            .bearer_auth(token)
            .json(&UpdateItemBody { item_id, quantity })
            .send()
            .await?;
        unit(resp).await
    }

    /// Remove a line from the cart.
    pub async fn remove_cart_item(&self, token: &str, item_id: &CartItemId) -> Result<()> {
        debug!(item = %item_id, "DELETE /cart/item");
        let resp = self
            .delete(&format!("/cart/item/{item_id}"))
            .bearer_auth(token)
            .send()
            .await?;
        unit(resp).await
    }
}
