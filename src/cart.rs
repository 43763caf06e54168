//! Session-scoped shopping carts.
//!
//! Carts are keyed by a caller-supplied session identifier and expire after a
//! configured idle TTL — there is no process-wide cart and no constant key.
//! Line items capture the unit price at add time; the total is always the
//! plain sum over line items.

use std::time::{Duration, Instant};

use indexmap::IndexMap;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::types::{Product, ProductId};

/// Cart operation failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CartError {
    #[error("Item not found in cart: {0}")]
    ItemNotFound(ProductId),

    #[error("Invalid quantity: {0}")]
    InvalidQuantity(u32),
}

/// One cart line. `unit_price` is the selling rate observed when the item was
/// first added; later catalog price changes do not retroactively reprice it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartItem {
    pub product_id: ProductId,
    pub name: String,
    pub quantity: u32,
    pub unit_price: f64,
}

/// A session's cart. Ephemeral server state; never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct Cart {
    pub session_id: String,
    pub items: Vec<CartItem>,
    pub total: f64,
    #[serde(skip)]
    touched_at: Instant,
}

impl Cart {
    fn new(session_id: &str) -> Self {
        Self {
            session_id: session_id.to_string(),
            items: Vec::new(),
            total: 0.0,
            touched_at: Instant::now(),
        }
    }

    fn recompute_total(&mut self) {
        self.total = self
            .items
            .iter()
            .map(|item| item.unit_price * f64::from(item.quantity))
            .sum();
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// All live carts, keyed by session id.
#[derive(Debug)]
pub struct CartStore {
    carts: IndexMap<String, Cart>,
    ttl: Duration,
}

impl CartStore {
    /// A store whose carts expire after `ttl` of inactivity. A zero TTL makes
    /// every cart expire immediately (useful in tests).
    pub fn new(ttl: Duration) -> Self {
        Self {
            carts: IndexMap::new(),
            ttl,
        }
    }

    fn is_expired(&self, cart: &Cart) -> bool {
        cart.touched_at.elapsed() >= self.ttl
    }

    /// Fetch a session's cart. An expired cart is evicted and reported as
    /// absent.
    pub fn get(&mut self, session_id: &str) -> Option<&Cart> {
        let expired = self
            .carts
            .get(session_id)
            .is_some_and(|cart| self.is_expired(cart));
        if expired {
            debug!(session_id, "cart expired, evicting");
            self.carts.shift_remove(session_id);
            return None;
        }
        self.carts.get(session_id)
    }

    /// Fetch or create, refreshing the idle timer.
    pub fn get_or_create(&mut self, session_id: &str) -> &Cart {
        if self
            .carts
            .get(session_id)
            .is_some_and(|cart| self.is_expired(cart))
        {
            self.carts.shift_remove(session_id);
        }
        let cart = self
            .carts
            .entry(session_id.to_string())
            .or_insert_with(|| Cart::new(session_id));
        cart.touched_at = Instant::now();
        cart
    }

    /// Add a product to a session's cart, merging quantity onto an existing
    /// line. The product's current selling rate becomes the line's unit price
    /// on first add.
    pub fn add(
        &mut self,
        session_id: &str,
        product: &Product,
        quantity: u32,
    ) -> Result<&Cart, CartError> {
        if quantity == 0 {
            return Err(CartError::InvalidQuantity(quantity));
        }
        self.get_or_create(session_id);
        let cart = self
            .carts
            .get_mut(session_id)
            .expect("cart created just above");

        match cart.items.iter_mut().find(|i| i.product_id == product.id) {
            Some(item) => item.quantity += quantity,
            None => cart.items.push(CartItem {
                product_id: product.id.clone(),
                name: product.name.clone(),
                quantity,
                unit_price: product.selling_rate,
            }),
        }
        cart.recompute_total();
        cart.touched_at = Instant::now();
        debug!(session_id, product_id = %product.id, quantity, "cart item added");
        Ok(cart)
    }

    /// Set an existing line's quantity.
    pub fn set_quantity(
        &mut self,
        session_id: &str,
        product_id: &str,
        quantity: u32,
    ) -> Result<&Cart, CartError> {
        if quantity == 0 {
            return Err(CartError::InvalidQuantity(quantity));
        }
        let cart = self
            .carts
            .get_mut(session_id)
            .ok_or_else(|| CartError::ItemNotFound(product_id.to_string()))?;
        let item = cart
            .items
            .iter_mut()
            .find(|i| i.product_id == product_id)
            .ok_or_else(|| CartError::ItemNotFound(product_id.to_string()))?;
        item.quantity = quantity;
        cart.recompute_total();
        cart.touched_at = Instant::now();
        Ok(cart)
    }

    /// Remove a line from a session's cart.
    pub fn remove(&mut self, session_id: &str, product_id: &str) -> Result<&Cart, CartError> {
        let cart = self
            .carts
            .get_mut(session_id)
            .ok_or_else(|| CartError::ItemNotFound(product_id.to_string()))?;
        let before = cart.items.len();
        cart.items.retain(|i| i.product_id != product_id);
        if cart.items.len() == before {
            return Err(CartError::ItemNotFound(product_id.to_string()));
        }
        cart.recompute_total();
        cart.touched_at = Instant::now();
        Ok(cart)
    }

    /// Empty a session's cart (keeps the session alive).
    pub fn clear(&mut self, session_id: &str) -> &Cart {
        let cart = self
            .carts
            .entry(session_id.to_string())
            .or_insert_with(|| Cart::new(session_id));
        cart.items.clear();
        cart.recompute_total();
        cart.touched_at = Instant::now();
        cart
    }

    /// Evict every expired session; returns how many were dropped.
    pub fn sweep_expired(&mut self) -> usize {
        let before = self.carts.len();
        let ttl = self.ttl;
        self.carts.retain(|_, cart| cart.touched_at.elapsed() < ttl);
        before - self.carts.len()
    }

    pub fn session_count(&self) -> usize {
        self.carts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOUR: Duration = Duration::from_secs(3600);

    fn product(id: &str, price: f64) -> Product {
        Product::new(id, format!("Product {id}"), "CPU").with_price(price)
    }

    #[test]
    fn test_sessions_are_isolated() {
        let mut store = CartStore::new(HOUR);
        store.add("alice", &product("p-1", 100.0), 1).unwrap();
        store.add("bob", &product("p-2", 50.0), 2).unwrap();

        assert_eq!(store.get("alice").unwrap().items.len(), 1);
        assert_eq!(store.get("bob").unwrap().total, 100.0);
        assert_eq!(store.session_count(), 2);
    }

    #[test]
    fn test_add_merges_quantity_and_keeps_price() {
        let mut store = CartStore::new(HOUR);
        store.add("s", &product("p-1", 100.0), 1).unwrap();
        // Price changed in the catalog; the line keeps its captured price
        store.add("s", &product("p-1", 120.0), 2).unwrap();

        let cart = store.get("s").unwrap();
        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items[0].quantity, 3);
        assert_eq!(cart.items[0].unit_price, 100.0);
        assert_eq!(cart.total, 300.0);
    }

    #[test]
    fn test_total_is_line_item_sum() {
        let mut store = CartStore::new(HOUR);
        store.add("s", &product("p-1", 100.0), 2).unwrap();
        store.add("s", &product("p-2", 25.5), 4).unwrap();

        let cart = store.get("s").unwrap();
        let expected: f64 = cart
            .items
            .iter()
            .map(|i| i.unit_price * f64::from(i.quantity))
            .sum();
        assert_eq!(cart.total, expected);
        assert_eq!(cart.total, 302.0);
    }

    #[test]
    fn test_set_quantity_and_remove() {
        let mut store = CartStore::new(HOUR);
        store.add("s", &product("p-1", 10.0), 1).unwrap();
        store.set_quantity("s", "p-1", 5).unwrap();
        assert_eq!(store.get("s").unwrap().total, 50.0);

        store.remove("s", "p-1").unwrap();
        assert!(store.get("s").unwrap().is_empty());
        assert_eq!(store.get("s").unwrap().total, 0.0);
    }

    #[test]
    fn test_zero_quantity_rejected() {
        let mut store = CartStore::new(HOUR);
        let err = store.add("s", &product("p-1", 10.0), 0).unwrap_err();
        assert_eq!(err, CartError::InvalidQuantity(0));
    }

    #[test]
    fn test_missing_item_errors() {
        let mut store = CartStore::new(HOUR);
        store.add("s", &product("p-1", 10.0), 1).unwrap();
        let err = store.set_quantity("s", "ghost", 2).unwrap_err();
        assert_eq!(err, CartError::ItemNotFound("ghost".into()));
        let err = store.remove("s", "ghost").unwrap_err();
        assert_eq!(err, CartError::ItemNotFound("ghost".into()));
    }

    #[test]
    fn test_expired_cart_is_invisible() {
        // Zero TTL: every cart is expired the moment it is read back
        let mut store = CartStore::new(Duration::ZERO);
        store.add("s", &product("p-1", 10.0), 1).unwrap();
        assert!(store.get("s").is_none());
        assert_eq!(store.session_count(), 0);
    }

    #[test]
    fn test_sweep_expired() {
        let mut store = CartStore::new(Duration::ZERO);
        store.add("a", &product("p-1", 10.0), 1).unwrap();
        store.add("b", &product("p-2", 10.0), 1).unwrap();
        assert_eq!(store.sweep_expired(), 2);
        assert_eq!(store.session_count(), 0);

        let mut keeper = CartStore::new(HOUR);
        keeper.add("a", &product("p-1", 10.0), 1).unwrap();
        assert_eq!(keeper.sweep_expired(), 0);
    }

    #[test]
    fn test_clear_keeps_session() {
        let mut store = CartStore::new(HOUR);
        store.add("s", &product("p-1", 10.0), 3).unwrap();
        let cart = store.clear("s");
        assert!(cart.items.is_empty());
        assert_eq!(cart.total, 0.0);
        assert_eq!(store.session_count(), 1);
    }
}
