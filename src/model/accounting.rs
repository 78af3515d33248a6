//! Ledger and stock records, summarised for the finance assistant.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordKind {
    Income,
    Expense,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialRecord {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: RecordKind,
    pub category: String,
    pub amount: f64,
    pub date: NaiveDate,
    #[serde(default)]
    pub description: String,
    /// Set on fee payments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub id: String,
    pub name: String,
    pub category: String,
    pub quantity: u32,
    pub unit_price: f64,
    pub last_updated: NaiveDate,
}

/// Everything the finance analysis is given.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialData {
    #[serde(default)]
    pub records: Vec<FinancialRecord>,
    #[serde(default)]
    pub inventory: Vec<InventoryItem>,
}

impl FinancialData {
    /// Sum of all records of `kind`. Folds from positive zero so that an empty
    /// total prints as `0`, not `-0`.
    pub fn total(&self, kind: RecordKind) -> f64 {
        self.records
            .iter()
            .filter(|r| r.kind == kind)
            .fold(0.0, |total, r| total + r.amount)
    }

    pub fn inventory_value(&self) -> f64 {
        self.inventory
            .iter()
            .fold(0.0, |total, i| total + f64::from(i.quantity) * i.unit_price)
    }

    /// The category of the single largest expense. The earliest record wins
    /// a tie.
    pub fn top_expense_category(&self) -> Option<&str> {
        self.records
            .iter()
            .filter(|r| r.kind == RecordKind::Expense)
            .fold(None, |top: Option<&FinancialRecord>, r| match top {
                Some(t) if t.amount >= r.amount => Some(t),
                _ => Some(r),
            })
            .map(|r| r.category.as_str())
    }

    /// One-line summary in the form the analysis prompt expects.
    pub fn summary(&self) -> String {
        let income = self.total(RecordKind::Income);
        let expense = self.total(RecordKind::Expense);
        format!(
            "Total Income: {income}. Total Expense: {expense}. Net: {}. Top Expense Category: {}. Inventory Value: {}.",
            income - expense,
            self.top_expense_category().unwrap_or("None"),
            self.inventory_value()
        )
    }
}
