//! Report types and the pure summary computation.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::ledger::{LedgerTransaction, TransactionType};
use crate::material::{Material, MaterialCategory};

/// Sum of `quantity * unit_price` per transaction type, as stored in debit or credit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionTotals {
    /// Purchases.
    pub purchases: Decimal,
    /// Sales.
    pub sales: Decimal,
    /// Payments.
    pub payments: Decimal,
    /// Receipts.
    pub receipts: Decimal,
}

impl TransactionTotals {
    fn add(&mut self, kind: TransactionType, amount: Decimal) {
        let slot = match kind {
            TransactionType::Purchase => &mut self.purchases,
            TransactionType::Sale => &mut self.sales,
            TransactionType::Payment => &mut self.payments,
            TransactionType::Receipt => &mut self.receipts,
        };
        *slot = slot.saturating_add(amount);
    }
}

/// Stock value of one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryStockValue {
    /// The category.
    pub category: MaterialCategory,
    /// Number of materials in it.
    pub material_count: usize,
    /// Sum of quantity times reference price.
    pub value: Decimal,
}

/// Dashboard summary for one caller.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    /// Totals by transaction type.
    pub totals: TransactionTotals,
    /// Number of transactions counted.
    pub transaction_count: usize,
    /// One row per category, in production order.
    pub stock_value: Vec<CategoryStockValue>,
    /// Materials at or below their threshold.
    pub low_stock: Vec<Material>,
}

/// Computes the summary over already scoped records.
#[must_use]
pub fn summarize(materials: &[Material], transactions: &[LedgerTransaction]) -> ReportSummary {
    let mut totals = TransactionTotals::default();
    for tx in transactions {
        totals.add(tx.transaction_type, tx.debit + tx.credit);
    }

    let stock_value = MaterialCategory::ALL
        .into_iter()
        .map(|category| {
            let in_category = materials.iter().filter(|m| m.category == category);
            CategoryStockValue {
                category,
                material_count: in_category.clone().count(),
                value: in_category
                    .map(Material::stock_value)
                    .fold(Decimal::ZERO, Decimal::saturating_add),
            }
        })
        .collect();

    let low_stock = materials
        .iter()
        .filter(|m| m.is_low_stock())
        .cloned()
        .collect();

    ReportSummary {
        totals,
        transaction_count: transactions.len(),
        stock_value,
        low_stock,
    }
}
