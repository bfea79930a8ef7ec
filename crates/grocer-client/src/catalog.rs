//! Catalog browsing pass-throughs.
//!
//! Nothing is cached here: the view layer asks, the gateway answers.

use grocer_shared::{Category, CategoryId, Product, ProductId};

use crate::error::Result;
use crate::state::Storefront;

impl Storefront {
    /// The full product list.
    pub async fn products(&self) -> Result<Vec<Product>> {
        Ok(self.gateway.products().await?)
    }

    /// Products belonging to one category.
    pub async fn products_by_category(&self, category: &CategoryId) -> Result<Vec<Product>> {
        Ok(self.gateway.products_by_category(category).await?)
    }

    /// A single product with its variations.
    pub async fn product(&self, id: &ProductId) -> Result<Product> {
        Ok(self.gateway.product(id).await?)
    }

    /// All categories.
    pub async fn categories(&self) -> Result<Vec<Category>> {
        Ok(self.gateway.categories().await?)
    }
}
