//! Product stock model
//!
//! Three inventory shapes exist:
//! - unmanaged: `quantity_available` is `None`, stock is unlimited
//! - managed aggregate: `quantity_available` + `is_out_of_stock`
//! - size variants: per-size quantity/price entries whose quantities sum
//!   to the aggregate `quantity_available`

use serde::{Deserialize, Serialize};

/// Per-size stock-and-price entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SizeVariant {
    pub size: String,
    pub quantity: i32,
    pub price: f64,
}

/// Catalog product (the slice of it the order engine reads and writes)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    /// Post ID
    pub id: String,
    pub seller_id: String,
    pub title: String,
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// `None` means inventory is not managed for this product
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity_available: Option<i32>,
    #[serde(default)]
    pub is_out_of_stock: bool,
    /// Empty when the product has no size variants
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub size_variants: Vec<SizeVariant>,
}

impl Product {
    pub fn has_variants(&self) -> bool {
        !self.size_variants.is_empty()
    }

    /// Sum of all variant quantities
    pub fn variant_total(&self) -> i32 {
        self.size_variants.iter().map(|v| v.quantity).sum()
    }

    /// Unit price for a purchase, honoring the variant price when a size
    /// is selected
    pub fn unit_price(&self, selected_size: Option<&str>) -> f64 {
        selected_size
            .and_then(|s| self.size_variants.iter().find(|v| v.size == s))
            .map(|v| v.price)
            .unwrap_or(self.price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_total_and_price() {
        let product = Product {
            id: "post-1".to_string(),
            seller_id: "seller-1".to_string(),
            title: "Hoodie".to_string(),
            price: 100.0,
            image: None,
            quantity_available: Some(5),
            is_out_of_stock: false,
            size_variants: vec![
                SizeVariant { size: "M".to_string(), quantity: 2, price: 100.0 },
                SizeVariant { size: "L".to_string(), quantity: 3, price: 110.0 },
            ],
        };
        assert_eq!(product.variant_total(), 5);
        assert_eq!(product.unit_price(Some("L")), 110.0);
        assert_eq!(product.unit_price(Some("XL")), 100.0);
        assert_eq!(product.unit_price(None), 100.0);
    }

    #[test]
    fn test_unmanaged_product() {
        let product = Product {
            id: "post-2".to_string(),
            seller_id: "seller-1".to_string(),
            title: "Sticker".to_string(),
            price: 5.0,
            image: None,
            quantity_available: None,
            is_out_of_stock: false,
            size_variants: vec![],
        };
        assert!(!product.has_variants());
        // Size selection on a variant-less product falls back to the base price
        assert_eq!(product.unit_price(Some("M")), 5.0);
    }
}
