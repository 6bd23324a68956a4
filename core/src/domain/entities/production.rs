//! Harvest and production records.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::common::{clean, missing_text, optional_date, CategoryAmount};
use crate::errors::ValidationError;

pub const DEFAULT_PRODUCTION_STATUS: &str = "active";

/// Categories offered to every user in addition to their own
pub const PRODUCTION_CATEGORIES: &[&str] = &[
    "grain", "vegetable", "fruit", "dairy", "meat", "egg", "honey", "feed", "other",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Production {
    pub id: Uuid,
    pub user_id: Uuid,
    pub land_id: Option<Uuid>,
    pub name: String,
    pub category: String,
    pub amount: f64,
    pub unit: String,
    pub harvest_date: Option<NaiveDate>,
    pub quality: Option<String>,
    pub storage_location: Option<String>,
    pub status: String,
    pub price: Option<f64>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Production {
    /// Stock value (`amount * price`), zero when unpriced
    pub fn value(&self) -> f64 {
        self.amount * self.price.unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduction {
    pub land_id: Option<Uuid>,
    pub name: Option<String>,
    pub category: Option<String>,
    pub amount: Option<f64>,
    pub unit: Option<String>,
    pub harvest_date: Option<String>,
    pub quality: Option<String>,
    pub storage_location: Option<String>,
    pub status: Option<String>,
    pub price: Option<f64>,
    pub notes: Option<String>,
}

impl NewProduction {
    pub fn into_production(self, user_id: Uuid) -> Result<Production, ValidationError> {
        let mut missing = missing_text(&[("name", &self.name), ("category", &self.category)]);
        if !self.amount.map(|a| a > 0.0).unwrap_or(false) {
            missing.push("amount");
        }
        if clean(self.unit.clone()).is_none() {
            missing.push("unit");
        }
        if !missing.is_empty() {
            return Err(ValidationError::missing_fields(missing));
        }

        let now = Utc::now();
        Ok(Production {
            id: Uuid::new_v4(),
            user_id,
            land_id: self.land_id,
            name: clean(self.name).unwrap_or_default(),
            category: clean(self.category).unwrap_or_default(),
            amount: self.amount.unwrap_or_default(),
            unit: clean(self.unit).unwrap_or_default(),
            harvest_date: optional_date("harvestDate", self.harvest_date.as_deref())?,
            quality: clean(self.quality),
            storage_location: clean(self.storage_location),
            status: clean(self.status).unwrap_or_else(|| DEFAULT_PRODUCTION_STATUS.to_string()),
            price: self.price,
            notes: clean(self.notes),
            created_at: now,
            updated_at: now,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductionUpdate {
    pub land_id: Option<Uuid>,
    pub name: Option<String>,
    pub category: Option<String>,
    pub amount: Option<f64>,
    pub unit: Option<String>,
    pub harvest_date: Option<String>,
    pub quality: Option<String>,
    pub storage_location: Option<String>,
    pub status: Option<String>,
    pub price: Option<f64>,
    pub notes: Option<String>,
}

impl ProductionUpdate {
    pub fn apply(self, production: &mut Production) -> Result<(), ValidationError> {
        if let Some(amount) = self.amount {
            if amount <= 0.0 {
                return Err(ValidationError::invalid_request("amount must be positive"));
            }
            production.amount = amount;
        }
        if let Some(date) = optional_date("harvestDate", self.harvest_date.as_deref())? {
            production.harvest_date = Some(date);
        }
        if self.land_id.is_some() {
            production.land_id = self.land_id;
        }
        if let Some(name) = clean(self.name) {
            production.name = name;
        }
        if let Some(category) = clean(self.category) {
            production.category = category;
        }
        if let Some(unit) = clean(self.unit) {
            production.unit = unit;
        }
        if let Some(status) = clean(self.status) {
            production.status = status;
        }
        if self.price.is_some() {
            production.price = self.price;
        }
        for (slot, value) in [
            (&mut production.quality, self.quality),
            (&mut production.storage_location, self.storage_location),
            (&mut production.notes, self.notes),
        ] {
            if value.is_some() {
                *slot = clean(value);
            }
        }
        production.updated_at = Utc::now();
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductionFilter {
    pub category: Option<String>,
    pub status: Option<String>,
    pub land_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductionStatistics {
    pub total_products: i64,
    pub total_amount: f64,
    pub total_value: f64,
    pub by_category: Vec<CategoryAmount>,
}

/// Produced amount of one category within one month (`YYYY-MM`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyProduction {
    pub month: String,
    pub category: String,
    pub amount: f64,
}
