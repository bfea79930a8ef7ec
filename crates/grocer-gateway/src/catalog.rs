//! Catalog endpoints.  These are public; no token is attached.

use grocer_shared::{Category, CategoryId, Product, ProductId};

use crate::client::{decode, Gateway};
use crate::error::Result;

impl Gateway {
    /// The full product list.
    pub async fn products(&self) -> Result<Vec<Product>> {
        let resp = self.get("/products").send().await?;
        decode(resp).await
    }

    /// Products belonging to one category.
    pub async fn products_by_category(&self, category: &CategoryId) -> Result<Vec<Product>> {
        let resp = self
            .get(&format!("/products/category/{category}"))
            .send()
            .await?;
        decode(resp).await
    }

    /// A single product with its variations.
    pub async fn product(&self, id: &ProductId) -> Result<Product> {
        let resp = self.get(&format!("/products/{id}")).send().await?;
        decode(resp).await
    }

    /// All categories.
    pub async fn categories(&self) -> Result<Vec<Category>> {
        let resp = self.get("/categories").send().await?;
        decode(resp).await
    }
}
