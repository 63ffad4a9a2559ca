//! Inventory list with debounced search, and stock adjustment on the product
//! screen.

mod render;
mod update;

use std::time::Duration;

pub use render::{render_inventory, render_product_detail};
use storeadmin_core::api::{Product, filter_low_stock};
pub use update::{
    handle_detail_key, handle_list_key, handle_product_loaded, handle_products_loaded,
    handle_stock_updated, mount_detail, mount_list,
};

use crate::common::SearchBox;
use crate::state::Loadable;

#[derive(Debug)]
pub struct InventoryState {
    pub search: SearchBox,
    pub products: Loadable<Vec<Product>>,
    pub low_stock_only: bool,
    pub selected: usize,
}

impl InventoryState {
    pub fn new(debounce: Duration) -> Self {
        Self {
            search: SearchBox::new(debounce),
            products: Loadable::Idle,
            low_stock_only: false,
            selected: 0,
        }
    }

    pub fn visible(&self) -> Vec<&Product> {
        self.products
            .loaded()
            .map(|products| filter_low_stock(products, self.low_stock_only))
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProductDetailState {
    pub product: Loadable<Product>,
    /// Unsaved change to the stock level.
    pub adjustment: i64,
}

impl ProductDetailState {
    /// Stock level after the pending adjustment.
    pub fn target_stock(&self) -> Option<i64> {
        self.product
            .loaded()
            .map(|product| product.stock + self.adjustment)
    }

    pub fn adjust(&mut self, delta: i64) {
        let Some(product) = self.product.loaded() else {
            return;
        };
        // Never below zero.
        self.adjustment = (self.adjustment + delta).max(-product.stock.max(0));
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_adjustment_stops_at_zero() {
        let product: Product =
            serde_json::from_value(json!({"id": 3, "name": "Oat Milk", "stock": 2})).unwrap();
        let mut detail = ProductDetailState {
            product: Loadable::Loaded(product),
            adjustment: 0,
        };
        detail.adjust(-1);
        detail.adjust(-1);
        detail.adjust(-1);
        assert_eq!(detail.target_stock(), Some(0));
        detail.adjust(5);
        assert_eq!(detail.target_stock(), Some(5));
    }

    #[test]
    fn test_low_stock_toggle_filters_visible() {
        let products: Vec<Product> = serde_json::from_value(json!([
            {"id": 1, "name": "Beans", "stock": 40},
            {"id": 2, "name": "Filters", "stock": 3, "lowStock": true},
            {"id": 3, "name": "Cups", "stock": 0}
        ]))
        .unwrap();
        let mut state = InventoryState::new(Duration::ZERO);
        state.products = Loadable::Loaded(products);
        assert_eq!(state.visible().len(), 3);
        state.low_stock_only = true;
        let names: Vec<_> = state.visible().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Filters", "Cups"]);
    }
}
