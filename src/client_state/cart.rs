use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::{StateStore, load_json, save_json};
use crate::dto::orders::{OrderLine, PlaceOrderRequest};

pub const CART_STORAGE_KEY: &str = "nutthings.cart.v1";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CartItem {
    /// Product id.
    pub id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    pub title: String,
    /// Unit price in cents.
    pub price: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub quantity: u32,
    /// `None` means stock is unknown and quantities are not capped.
    #[serde(default)]
    pub stock: Option<u32>,
}

/// What a product card hands to the cart; quantity is supplied separately.
#[derive(Debug, Clone, PartialEq)]
pub struct CartProduct {
    pub id: Uuid,
    pub slug: Option<String>,
    pub title: String,
    pub price: i64,
    pub image: Option<String>,
    pub stock: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    items: Vec<CartItem>,
    open: bool,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restores the persisted lines; corrupt data gives an empty cart.
    pub fn load(store: &dyn StateStore) -> Self {
        Self {
            items: load_json(store, CART_STORAGE_KEY).unwrap_or_default(),
            open: false,
        }
    }

    pub fn save(&self, store: &mut dyn StateStore) {
        save_json(store, CART_STORAGE_KEY, &self.items);
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    /// Merges into an existing line for the same product, capped at stock.
    pub fn add_item(&mut self, product: CartProduct, qty: u32) {
        let max = product.stock.unwrap_or(u32::MAX);
        match self.items.iter_mut().find(|line| line.id == product.id) {
            Some(line) => {
                let quantity = line.quantity.saturating_add(qty).min(max);
                *line = CartItem {
                    id: product.id,
                    slug: product.slug,
                    title: product.title,
                    price: product.price,
                    image: product.image,
                    quantity,
                    stock: product.stock,
                };
            }
            None => self.items.push(CartItem {
                id: product.id,
                slug: product.slug,
                title: product.title,
                price: product.price,
                image: product.image,
                quantity: qty.min(max),
                stock: product.stock,
            }),
        }
        self.open = true;
    }

    pub fn remove_item(&mut self, id: Uuid) {
        self.items.retain(|line| line.id != id);
    }

    /// Sets a quantity within `1..=stock`.
    pub fn update_qty(&mut self, id: Uuid, qty: u32) {
        if let Some(line) = self.items.iter_mut().find(|line| line.id == id) {
            let capped = line.stock.map_or(qty, |stock| qty.min(stock));
            line.quantity = capped.max(1);
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Sum of price × quantity, in cents.
    pub fn total(&self) -> i64 {
        self.items
            .iter()
            .map(|line| line.price * i64::from(line.quantity))
            .sum()
    }

    /// Number of units across all lines, saturating at `u32::MAX`.
    pub fn count(&self) -> u32 {
        self.items
            .iter()
            .fold(0u32, |acc, line| acc.saturating_add(line.quantity))
    }

    pub fn to_order_request(&self, email: Option<String>) -> PlaceOrderRequest {
        PlaceOrderRequest {
            items: self
                .items
                .iter()
                .map(|line| OrderLine {
                    product_id: line.id,
                    quantity: i64::from(line.quantity),
                })
                .collect(),
            email,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client_state::MemoryStore;

    fn nut(id: u128, price: i64, stock: Option<u32>) -> CartProduct {
        CartProduct {
            id: Uuid::from_u128(id),
            slug: Some(format!("nut-{id}")),
            title: format!("Nut {id}"),
            price,
            image: None,
            stock,
        }
    }

    #[test]
    fn adding_twice_merges_and_caps_at_stock() {
        let mut cart = Cart::new();
        cart.add_item(nut(1, 500, Some(5)), 3);
        cart.add_item(nut(1, 500, Some(5)), 4);
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].quantity, 5);
        assert!(cart.is_open());
    }

    #[test]
    fn adding_twice_without_stock_sums() {
        let mut cart = Cart::new();
        cart.add_item(nut(1, 500, None), 3);
        cart.add_item(nut(1, 500, None), 4);
        assert_eq!(cart.items()[0].quantity, 7);
    }

    #[test]
    fn new_line_respects_stock() {
        let mut cart = Cart::new();
        cart.add_item(nut(2, 100, Some(2)), 9);
        assert_eq!(cart.items()[0].quantity, 2);
    }

    #[test]
    fn removing_unknown_id_is_noop() {
        let mut cart = Cart::new();
        cart.add_item(nut(1, 500, None), 1);
        let before = cart.clone();
        cart.remove_item(Uuid::from_u128(99));
        assert_eq!(cart, before);
    }

    #[test]
    fn totals_sum_price_times_quantity() {
        let mut cart = Cart::new();
        cart.add_item(nut(1, 250, None), 2);
        cart.add_item(nut(2, 1000, None), 3);
        assert_eq!(cart.total(), 250 * 2 + 1000 * 3);
        assert_eq!(cart.count(), 5);
    }

    #[test]
    fn count_saturates_on_huge_quantities() {
        let mut cart = Cart::new();
        cart.add_item(nut(1, 1, None), u32::MAX);
        cart.add_item(nut(2, 1, None), 2);
        assert_eq!(cart.count(), u32::MAX);
    }

    #[test]
    fn update_qty_stays_within_bounds() {
        let mut cart = Cart::new();
        cart.add_item(nut(1, 100, Some(4)), 1);
        cart.update_qty(Uuid::from_u128(1), 0);
        assert_eq!(cart.items()[0].quantity, 1);
        cart.update_qty(Uuid::from_u128(1), 10);
        assert_eq!(cart.items()[0].quantity, 4);
    }

    #[test]
    fn persists_through_the_store() {
        let mut store = MemoryStore::new();
        let mut cart = Cart::new();
        cart.add_item(nut(1, 100, Some(4)), 2);
        cart.save(&mut store);

        let restored = Cart::load(&store);
        assert_eq!(restored.items(), cart.items());
        assert!(!restored.is_open());
    }

    #[test]
    fn corrupt_storage_loads_empty() {
        let mut store = MemoryStore::new();
        store.set(CART_STORAGE_KEY, "{oops".to_string());
        assert!(Cart::load(&store).items().is_empty());
    }

    #[test]
    fn builds_order_request_lines() {
        let mut cart = Cart::new();
        cart.add_item(nut(1, 100, None), 2);
        let request = cart.to_order_request(Some("a@b.de".into()));
        assert_eq!(request.items.len(), 1);
        assert_eq!(request.items[0].quantity, 2);
        assert_eq!(request.email.as_deref(), Some("a@b.de"));
    }
}
