//! Orders and quotations.
//!
//! Human-readable display ids (`O-001`, `Q-001`) are issued from per-kind
//! atomic counters, so concurrent creations cannot collide the way a
//! count-then-format scheme does. Deletion is soft: deleted records drop out
//! of listings but can be restored.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::catalog::CatalogStore;
use crate::types::ProductId;

/// Order workflow failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OrderError {
    #[error("Order has no items")]
    EmptyOrder,

    #[error("Invalid quantity {quantity} for product {product_id}")]
    InvalidQuantity { product_id: ProductId, quantity: u32 },

    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    #[error("Order not found: {0}")]
    UnknownOrder(String),
}

/// Record kind: a confirmed-intent order or a quotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderKind {
    Order,
    Quotation,
}

impl OrderKind {
    fn prefix(&self) -> &'static str {
        match self {
            OrderKind::Order => "O",
            OrderKind::Quotation => "Q",
        }
    }
}

/// Workflow status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatus::Pending => write!(f, "Pending"),
            OrderStatus::Confirmed => write!(f, "Confirmed"),
            OrderStatus::Cancelled => write!(f, "Cancelled"),
        }
    }
}

/// Customer contact block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    pub address: String,
}

/// One order line; `unit_price` is the selling rate at order time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub product_id: ProductId,
    pub quantity: u32,
    pub unit_price: f64,
}

/// An order or quotation record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// `O-NNN` or `Q-NNN`.
    pub display_id: String,
    /// Original quotation id, kept when a quotation converts to an order.
    #[serde(default)]
    pub quote_id: Option<String>,
    pub kind: OrderKind,
    pub customer: Customer,
    pub items: Vec<LineItem>,
    pub total: f64,
    pub status: OrderStatus,
    #[serde(default)]
    pub deleted: bool,
}

/// Listing filter; `None` means "any".
#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    pub kind: Option<OrderKind>,
    pub status: Option<OrderStatus>,
    pub include_deleted: bool,
}

/// In-memory order book with atomic display-id issuance.
#[derive(Debug)]
pub struct OrderBook {
    orders: Vec<Order>,
    order_seq: AtomicU64,
    quote_seq: AtomicU64,
    /// Minimum digits in the numeric part of a display id.
    pad: usize,
}

impl Default for OrderBook {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderBook {
    pub fn new() -> Self {
        Self::with_padding(3)
    }

    pub fn with_padding(pad: usize) -> Self {
        Self {
            orders: Vec::new(),
            order_seq: AtomicU64::new(0),
            quote_seq: AtomicU64::new(0),
            pad,
        }
    }

    fn issue_display_id(&self, kind: OrderKind) -> String {
        let seq = match kind {
            OrderKind::Order => &self.order_seq,
            OrderKind::Quotation => &self.quote_seq,
        };
        let n = seq.fetch_add(1, Ordering::SeqCst) + 1;
        format!("{}-{:0pad$}", kind.prefix(), n, pad = self.pad)
    }

    /// Create an order or quotation. Items must be non-empty with positive
    /// quantities; unit prices are resolved from the catalog at creation.
    pub fn create(
        &mut self,
        kind: OrderKind,
        customer: Customer,
        requested: &[(ProductId, u32)],
        catalog: &dyn CatalogStore,
    ) -> Result<&Order, OrderError> {
        if requested.is_empty() {
            return Err(OrderError::EmptyOrder);
        }

        let mut items = Vec::with_capacity(requested.len());
        for (product_id, quantity) in requested {
            if *quantity == 0 {
                return Err(OrderError::InvalidQuantity {
                    product_id: product_id.clone(),
                    quantity: *quantity,
                });
            }
            let product = catalog
                .find_product(product_id)
                .ok_or_else(|| OrderError::ProductNotFound(product_id.clone()))?;
            items.push(LineItem {
                product_id: product_id.clone(),
                quantity: *quantity,
                unit_price: product.selling_rate,
            });
        }

        let total = items
            .iter()
            .map(|i| i.unit_price * f64::from(i.quantity))
            .sum();
        let display_id = self.issue_display_id(kind);
        info!(display_id = %display_id, total, "order created");

        self.orders.push(Order {
            display_id,
            quote_id: None,
            kind,
            customer,
            items,
            total,
            status: OrderStatus::Pending,
            deleted: false,
        });
        Ok(self.orders.last().expect("order pushed just above"))
    }

    pub fn get(&self, display_id: &str) -> Option<&Order> {
        self.orders.iter().find(|o| o.display_id == display_id)
    }

    fn get_mut(&mut self, display_id: &str) -> Result<&mut Order, OrderError> {
        self.orders
            .iter_mut()
            .find(|o| o.display_id == display_id)
            .ok_or_else(|| OrderError::UnknownOrder(display_id.to_string()))
    }

    /// List records, creation order, honoring the filter. Soft-deleted
    /// records are excluded unless asked for.
    pub fn list(&self, filter: &OrderFilter) -> Vec<&Order> {
        self.orders
            .iter()
            .filter(|o| filter.include_deleted || !o.deleted)
            .filter(|o| filter.kind.is_none_or(|k| o.kind == k))
            .filter(|o| filter.status.is_none_or(|s| o.status == s))
            .collect()
    }

    pub fn update_status(
        &mut self,
        display_id: &str,
        status: OrderStatus,
    ) -> Result<&Order, OrderError> {
        let order = self.get_mut(display_id)?;
        order.status = status;
        info!(display_id, status = %status, "order status updated");
        Ok(self.get(display_id).expect("updated above"))
    }

    /// Convert a quotation into an order: a fresh `O-NNN` id is issued and
    /// the quotation id is kept for reference.
    pub fn convert_quotation(&mut self, display_id: &str) -> Result<&Order, OrderError> {
        let order_id = {
            let record = self.get_mut(display_id)?;
            if record.kind != OrderKind::Quotation {
                return Err(OrderError::UnknownOrder(display_id.to_string()));
            }
            record.kind = OrderKind::Order;
            record.quote_id = Some(record.display_id.clone());
            let order_id = self.issue_display_id(OrderKind::Order);
            let record = self.get_mut(display_id)?;
            record.display_id = order_id.clone();
            order_id
        };
        info!(quote_id = display_id, order_id = %order_id, "quotation converted");
        Ok(self.get(&order_id).expect("converted above"))
    }

    pub fn soft_delete(&mut self, display_id: &str) -> Result<(), OrderError> {
        self.get_mut(display_id)?.deleted = true;
        Ok(())
    }

    pub fn restore(&mut self, display_id: &str) -> Result<(), OrderError> {
        self.get_mut(display_id)?.deleted = false;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Order> {
        self.orders.iter()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
#[path = "orders_tests.rs"]
mod tests;
