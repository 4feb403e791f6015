//! Sale Model

use crate::order::LineItem;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One sold line, referencing the catalog entry it came from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleLine {
    pub reference_id: String,
    pub name: String,
    pub quantity: i32,
    pub unit_price: f64,
}

impl From<&LineItem> for SaleLine {
    fn from(item: &LineItem) -> Self {
        Self {
            reference_id: item.item_id.clone(),
            name: item.name.clone(),
            quantity: item.quantity,
            unit_price: item.unit_price,
        }
    }
}

/// Create sale payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalePayload {
    /// Beverage/food lines
    pub products: Vec<SaleLine>,
    /// Ceramic lines
    pub ceramics: Vec<SaleLine>,
    /// Negative for expenses
    pub total_amount: f64,
    pub customer: Option<String>,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub is_expense: bool,
}

/// Expense validation errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExpenseError {
    #[error("Expense description is required")]
    MissingDescription,

    #[error("Expense amount must be a positive number, got {0}")]
    InvalidAmount(f64),
}

impl SalePayload {
    /// Build an expense entry: no items, negative total
    pub fn expense(
        description: impl Into<String>,
        amount: f64,
        date: DateTime<Utc>,
    ) -> Result<Self, ExpenseError> {
        let description = description.into();
        if description.trim().is_empty() {
            return Err(ExpenseError::MissingDescription);
        }
        if !amount.is_finite() || amount <= 0.0 {
            return Err(ExpenseError::InvalidAmount(amount));
        }
        Ok(Self {
            products: Vec::new(),
            ceramics: Vec::new(),
            total_amount: -amount.abs(),
            customer: Some(description),
            date,
            is_expense: true,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty() && self.ceramics.is_empty()
    }
}

/// Sale as confirmed by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sale {
    pub id: String,
    pub products: Vec<SaleLine>,
    pub ceramics: Vec<SaleLine>,
    pub total_amount: f64,
    pub customer: Option<String>,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub is_expense: bool,
}

impl Sale {
    /// Expenses are flagged, older ones only carry a negative total
    pub fn is_expense_entry(&self) -> bool {
        self.is_expense || self.total_amount < 0.0
    }

    /// Human-readable summary, e.g. `2x Café, 1x Vasija`
    pub fn description(&self) -> String {
        if self.is_expense_entry() {
            return self.customer.clone().unwrap_or_else(|| "Expense".to_string());
        }
        let items: Vec<String> = self
            .products
            .iter()
            .chain(self.ceramics.iter())
            .map(|line| format!("{}x {}", line.quantity, line.name))
            .collect();
        if items.is_empty() {
            "Sale without items".to_string()
        } else {
            items.join(", ")
        }
    }
}
