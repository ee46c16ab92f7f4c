//! Read-only projections over the product and withdrawal lists.
//!
//! Every function recomputes from its input; nothing is cached. Groupings keep
//! the order in which keys were first seen, and empty input gives empty output.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::hash::Hash;

use serde::Serialize;

use crate::domain::{Product, ProductId, Withdrawal};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
}

impl CategoryCount {
    /// Fraction of `max` this category represents, for proportional bars.
    pub fn share(&self, max: usize) -> f64 {
        if max == 0 {
            return 0.0;
        }
        self.count as f64 / max as f64
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProductTotal {
    pub product_id: ProductId,
    pub quantity: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionCount {
    pub section: String,
    pub count: usize,
}

pub fn low_stock_products(products: &[Product]) -> Vec<&Product> {
    products.iter().filter(|p| p.is_low_stock()).collect()
}

pub fn category_distribution(products: &[Product]) -> Vec<CategoryCount> {
    tally(products.iter().map(|p| (p.category.as_str(), 1)))
        .into_iter()
        .map(|(category, count)| CategoryCount {
            category: category.to_string(),
            count: count as usize,
        })
        .collect()
}

pub fn max_count(counts: &[CategoryCount]) -> usize {
    counts.iter().map(|c| c.count).max().unwrap_or(0)
}

/// Units withdrawn per product across all withdrawals, largest first.
///
/// Ties keep the order in which the products first appeared.
pub fn top_withdrawn_products(withdrawals: &[Withdrawal], limit: usize) -> Vec<ProductTotal> {
    let lines = withdrawals.iter().flat_map(|w| &w.items);
    let mut totals: Vec<ProductTotal> = tally(lines.map(|item| (item.product_id, u64::from(item.quantity))))
        .into_iter()
        .map(|(product_id, quantity)| ProductTotal { product_id, quantity })
        .collect();
    // sort_by is stable
    totals.sort_by(|a, b| b.quantity.cmp(&a.quantity));
    totals.truncate(limit);
    totals
}

pub fn section_distribution(withdrawals: &[Withdrawal]) -> Vec<SectionCount> {
    tally(withdrawals.iter().map(|w| (w.withdrawer_section.as_str(), 1)))
        .into_iter()
        .map(|(section, count)| SectionCount {
            section: section.to_string(),
            count: count as usize,
        })
        .collect()
}

/// Sums amounts per key in one pass, keys in first-seen order.
fn tally<K: Copy + Eq + Hash>(entries: impl Iterator<Item = (K, u64)>) -> Vec<(K, u64)> {
    let mut slots: HashMap<K, usize> = HashMap::new();
    let mut totals: Vec<(K, u64)> = Vec::new();
    for (key, amount) in entries {
        match slots.entry(key) {
            Entry::Occupied(slot) => totals[*slot.get()].1 += amount,
            Entry::Vacant(slot) => {
                slot.insert(totals.len());
                totals.push((key, amount));
            }
        }
    }
    totals
}

/// Dashboard summary: headline totals plus the four projections.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InventoryReport {
    pub product_count: usize,
    pub total_stock: u64,
    pub low_stock_count: usize,
    pub withdrawal_count: usize,
    pub items_withdrawn: u64,
    pub low_stock: Vec<Product>,
    pub categories: Vec<CategoryCount>,
    pub top_withdrawn: Vec<ProductTotal>,
    pub sections: Vec<SectionCount>,
}

impl InventoryReport {
    pub fn build(products: &[Product], withdrawals: &[Withdrawal], top_limit: usize) -> Self {
        let low_stock: Vec<Product> = low_stock_products(products).into_iter().cloned().collect();
        Self {
            product_count: products.len(),
            total_stock: products.iter().map(|p| u64::from(p.stock)).sum(),
            low_stock_count: low_stock.len(),
            withdrawal_count: withdrawals.len(),
            items_withdrawn: withdrawals.iter().map(|w| w.total_items).sum(),
            low_stock,
            categories: category_distribution(products),
            top_withdrawn: top_withdrawn_products(withdrawals, top_limit),
            sections: section_distribution(withdrawals),
        }
    }
}
