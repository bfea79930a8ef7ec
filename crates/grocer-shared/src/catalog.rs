//! Catalog models returned by the gateway.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Product identifier minted by the gateway.  Opaque to the client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ProductId(pub String);

impl std::fmt::Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Category identifier minted by the gateway.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct CategoryId(pub String);

impl std::fmt::Display for CategoryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One purchasable pack size of a product.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Variation {
    /// Pack-size label shown to the shopper, e.g. `"500g"`.
    #[serde(default)]
    pub quantity: String,
    /// Unit price for this pack size.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
}

/// A product in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub category: Option<CategoryId>,
    #[serde(default)]
    pub description: String,
    /// Variations are positional: cart lines reference them by index.
    #[serde(default)]
    pub variations: Vec<Variation>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Product {
    /// Price of the first variation, or zero when the product has none.
    pub fn default_price(&self) -> Decimal {
        self.variations.first().map(|v| v.price).unwrap_or_default()
    }

    /// Pack-size label of the first variation.
    pub fn default_pack_size(&self) -> Option<&str> {
        self.variations.first().map(|v| v.quantity.as_str())
    }

    /// First product image, if any.
    pub fn image_url(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}

/// A product category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    #[serde(default)]
    pub icon: String,
    /// Parent category for nested taxonomies.
    #[serde(default)]
    pub parent: Option<CategoryId>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Category {
    /// Icon image URL, if one is set.
    pub fn icon_url(&self) -> Option<&str> {
        if self.icon.is_empty() {
            None
        } else {
            Some(self.icon.as_str())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_from_gateway_json() {
        let json = r#"{
            "id": "p-1",
            "name": "Organic Milk",
            "images": ["https://cdn.example/milk.jpg"],
            "category": "c-dairy",
            "variations": [
                { "quantity": "500ml", "price": 30 },
                { "quantity": "1l", "price": 55.5 }
            ]
        }"#;

        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id, ProductId("p-1".into()));
        assert_eq!(product.default_price(), Decimal::from(30));
        assert_eq!(product.default_pack_size(), Some("500ml"));
        assert_eq!(product.image_url(), Some("https://cdn.example/milk.jpg"));
        assert_eq!(product.variations[1].price, "55.5".parse().unwrap());
    }

    #[test]
    fn product_without_variations_prices_at_zero() {
        let json = r#"{ "id": "p-2", "name": "Mystery Box" }"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.default_price(), Decimal::ZERO);
        assert_eq!(product.default_pack_size(), None);
        assert_eq!(product.image_url(), None);
    }

    #[test]
    fn category_icon_is_optional() {
        let json = r#"{ "id": "c-1", "name": "Dairy" }"#;
        let category: Category = serde_json::from_str(json).unwrap();
        assert_eq!(category.icon_url(), None);
    }
}
