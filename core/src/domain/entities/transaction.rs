//! Financial transactions (income and expenses).

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::common::{clean, missing_text, optional_date};
use crate::errors::ValidationError;

pub const DEFAULT_CURRENCY: &str = "TRY";
pub const DEFAULT_TRANSACTION_STATUS: &str = "completed";
pub const PENDING_STATUS: &str = "pending";

pub const INCOME_CATEGORIES: &[&str] = &[
    "crop_sales",
    "livestock_sales",
    "dairy_sales",
    "subsidy",
    "rental",
    "other_income",
];

pub const EXPENSE_CATEGORIES: &[&str] = &[
    "seed",
    "fertilizer",
    "pesticide",
    "feed",
    "veterinary",
    "fuel",
    "equipment",
    "labor",
    "irrigation",
    "maintenance",
    "other_expense",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            other => Err(ValidationError::InvalidType {
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub category: String,
    pub description: String,
    pub amount: f64,
    pub currency: String,
    pub date: NaiveDate,
    pub status: String,
    pub payment_method: Option<String>,
    pub receipt: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    #[serde(rename = "type")]
    pub transaction_type: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub amount: Option<f64>,
    pub currency: Option<String>,
    pub date: Option<String>,
    pub status: Option<String>,
    pub payment_method: Option<String>,
    pub receipt: Option<String>,
    pub notes: Option<String>,
}

impl NewTransaction {
    pub fn into_transaction(self, user_id: Uuid) -> Result<Transaction, ValidationError> {
        let mut missing = missing_text(&[
            ("type", &self.transaction_type),
            ("category", &self.category),
            ("description", &self.description),
        ]);
        if !self.amount.map(|a| a > 0.0).unwrap_or(false) {
            missing.push("amount");
        }
        if clean(self.date.clone()).is_none() {
            missing.push("date");
        }
        if !missing.is_empty() {
            return Err(ValidationError::missing_fields(missing));
        }

        let transaction_type: TransactionType =
            self.transaction_type.as_deref().unwrap_or_default().parse()?;
        let date = optional_date("date", self.date.as_deref())?
            .ok_or_else(|| ValidationError::missing_fields(["date"]))?;

        let now = Utc::now();
        Ok(Transaction {
            id: Uuid::new_v4(),
            user_id,
            transaction_type,
            category: clean(self.category).unwrap_or_default(),
            description: clean(self.description).unwrap_or_default(),
            amount: self.amount.unwrap_or_default(),
            currency: clean(self.currency).unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            date,
            status: clean(self.status).unwrap_or_else(|| DEFAULT_TRANSACTION_STATUS.to_string()),
            payment_method: clean(self.payment_method),
            receipt: clean(self.receipt),
            notes: clean(self.notes),
            created_at: now,
            updated_at: now,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionUpdate {
    #[serde(rename = "type")]
    pub transaction_type: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub amount: Option<f64>,
    pub currency: Option<String>,
    pub date: Option<String>,
    pub status: Option<String>,
    pub payment_method: Option<String>,
    pub receipt: Option<String>,
    pub notes: Option<String>,
}

impl TransactionUpdate {
    pub fn apply(self, transaction: &mut Transaction) -> Result<(), ValidationError> {
        if let Some(raw) = clean(self.transaction_type) {
            transaction.transaction_type = raw.parse()?;
        }
        if let Some(amount) = self.amount {
            if amount <= 0.0 {
                return Err(ValidationError::invalid_request("amount must be positive"));
            }
            transaction.amount = amount;
        }
        if let Some(date) = optional_date("date", self.date.as_deref())? {
            transaction.date = date;
        }
        for (slot, value) in [
            (&mut transaction.category, self.category),
            (&mut transaction.description, self.description),
            (&mut transaction.currency, self.currency),
            (&mut transaction.status, self.status),
        ] {
            if let Some(value) = clean(value) {
                *slot = value;
            }
        }
        for (slot, value) in [
            (&mut transaction.payment_method, self.payment_method),
            (&mut transaction.receipt, self.receipt),
            (&mut transaction.notes, self.notes),
        ] {
            if value.is_some() {
                *slot = clean(value);
            }
        }
        transaction.updated_at = Utc::now();
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionFilter {
    pub transaction_type: Option<TransactionType>,
    pub category: Option<String>,
    pub status: Option<String>,
    /// Inclusive lower bound on `date`
    pub start_date: Option<NaiveDate>,
    /// Inclusive upper bound on `date`
    pub end_date: Option<NaiveDate>,
}

/// Income and expense totals over a date range
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinanceTotals {
    pub income: f64,
    pub expense: f64,
    /// Sum of amounts still in `pending` status
    pub pending: f64,
    pub count: i64,
}

impl FinanceTotals {
    pub fn net(&self) -> f64 {
        self.income - self.expense
    }

    /// Net profit as a percentage of income, zero without income
    pub fn margin(&self) -> f64 {
        if self.income > 0.0 {
            self.net() / self.income * 100.0
        } else {
            0.0
        }
    }
}

/// Income and expense within one month (`YYYY-MM`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyFinance {
    pub month: String,
    pub income: f64,
    pub expense: f64,
}

impl MonthlyFinance {
    pub fn empty(month: impl Into<String>) -> Self {
        Self {
            month: month.into(),
            income: 0.0,
            expense: 0.0,
        }
    }

    pub fn profit(&self) -> f64 {
        self.income - self.expense
    }
}
