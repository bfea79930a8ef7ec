//! Address book endpoints.

use serde::Deserialize;

use grocer_shared::{Address, AddressId, NewAddress};

use crate::client::{decode, unit, Gateway};
use crate::error::Result;

#[derive(Debug, Deserialize)]
struct AddressList {
    #[serde(default)]
    addresses: Vec<Address>,
}

impl Gateway {
    /// Saved addresses.  A response without the list means none exist yet.
    pub async fn addresses(&self, token: &str) -> Result<Vec<Address>> {
        let resp = self.get("/auth/address").bearer_auth(token).send().await?;
        let list: AddressList = decode(resp).await?;
        Ok(list.addresses)
    }

    /// Save a new address; the response carries the server-assigned id.
    pub async fn add_address(&self, token: &str, address: &NewAddress) -> Result<Address> {
        let resp = self
            .post("/auth/address")
            .bearer_auth(token)
            .json(address)
            .send()
            .await?;
        decode(resp).await
    }

    /// Overwrite an existing address.
    pub async fn update_address(
        &self,
        token: &str,
        id: &AddressId,
        address: &NewAddress,
    ) -> Result<()> {
        let resp = self
            .put(&format!("/auth/address/{id}"))
            .bearer_auth(token)
            .json(address)
            .send()
            .await?;
        unit(resp).await
    }

    /// Delete an address.
    ///
    /// Deletion lives under `/user/addresses/`, unlike the other address
    /// routes.  The divergence is the server's.
    pub async fn delete_address(&self, token: &str, id: &AddressId) -> Result<()> {
        let resp = self
            .delete(&format!("/user/addresses/{id}"))
            .bearer_auth(token)
            .send()
            .await?;
        unit(resp).await
    }
}
