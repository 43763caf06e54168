//! Dashboard statistics.
//!
//! One pass over the catalog and one over the order book; pure read, nothing
//! cached. The stat set mirrors what the admin dashboard renders.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::orders::{Order, OrderKind, OrderStatus};
use crate::types::{Product, ProductStatus, ProductSummary};

/// Aggregate view over catalog and orders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_products: usize,
    /// Product count per category display name, first-seen order.
    pub products_by_category: IndexMap<String, usize>,
    /// Sum of quantity across all products.
    pub total_stock_units: u64,
    /// Products at or below the low-stock threshold (excluding inactive).
    pub low_stock: Vec<ProductSummary>,
    pub out_of_stock: usize,
    pub orders_by_status: StatusCounts,
    pub quotations_by_status: StatusCounts,
    /// Revenue over confirmed orders (not quotations).
    pub confirmed_revenue: f64,
}

/// Pending/confirmed/cancelled tallies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub pending: usize,
    pub confirmed: usize,
    pub cancelled: usize,
}

impl StatusCounts {
    fn bump(&mut self, status: OrderStatus) {
        match status {
            OrderStatus::Pending => self.pending += 1,
            OrderStatus::Confirmed => self.confirmed += 1,
            OrderStatus::Cancelled => self.cancelled += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.pending + self.confirmed + self.cancelled
    }
}

/// Compute the dashboard over a catalog snapshot and the live (non-deleted)
/// order records.
pub fn dashboard_stats<'a>(
    products: &[Product],
    orders: impl Iterator<Item = &'a Order>,
    low_stock_threshold: u32,
) -> DashboardStats {
    let mut products_by_category: IndexMap<String, usize> = IndexMap::new();
    let mut total_stock_units: u64 = 0;
    let mut low_stock = Vec::new();
    let mut out_of_stock = 0;

    for product in products {
        *products_by_category
            .entry(product.category.clone())
            .or_insert(0) += 1;
        total_stock_units += u64::from(product.quantity);

        if product.status == ProductStatus::OutOfStock || product.quantity == 0 {
            out_of_stock += 1;
        } else if product.status == ProductStatus::Active
            && product.quantity <= low_stock_threshold
        {
            low_stock.push(product.summary());
        }
    }

    let mut orders_by_status = StatusCounts::default();
    let mut quotations_by_status = StatusCounts::default();
    let mut confirmed_revenue = 0.0;

    for order in orders.filter(|o| !o.deleted) {
        match order.kind {
            OrderKind::Order => {
                orders_by_status.bump(order.status);
                if order.status == OrderStatus::Confirmed {
                    confirmed_revenue += order.total;
                }
            }
            OrderKind::Quotation => quotations_by_status.bump(order.status),
        }
    }

    DashboardStats {
        total_products: products.len(),
        products_by_category,
        total_stock_units,
        low_stock,
        out_of_stock,
        orders_by_status,
        quotations_by_status,
        confirmed_revenue,
    }
}
