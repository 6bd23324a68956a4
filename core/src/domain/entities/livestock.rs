//! Livestock (individual animals) with their health and milk records.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::common::{clean, missing_text, optional_date, CategoryCount};
use crate::errors::ValidationError;

pub const DEFAULT_HEALTH_STATUS: &str = "healthy";

/// An animal identified by its ear tag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Animal {
    pub id: Uuid,
    pub user_id: Uuid,
    pub tag_number: String,
    #[serde(rename = "type")]
    pub animal_type: String,
    pub breed: Option<String>,
    pub gender: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub weight: Option<f64>,
    pub health_status: String,
    pub location: Option<String>,
    pub mother: Option<String>,
    pub father: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAnimal {
    pub tag_number: Option<String>,
    #[serde(rename = "type")]
    pub animal_type: Option<String>,
    pub breed: Option<String>,
    pub gender: Option<String>,
    pub birth_date: Option<String>,
    pub weight: Option<f64>,
    pub health_status: Option<String>,
    pub location: Option<String>,
    pub mother: Option<String>,
    pub father: Option<String>,
    pub notes: Option<String>,
}

impl NewAnimal {
    pub fn into_animal(self, user_id: Uuid) -> Result<Animal, ValidationError> {
        let missing = missing_text(&[
            ("tagNumber", &self.tag_number),
            ("type", &self.animal_type),
        ]);
        if !missing.is_empty() {
            return Err(ValidationError::missing_fields(missing));
        }

        let now = Utc::now();
        Ok(Animal {
            id: Uuid::new_v4(),
            user_id,
            tag_number: clean(self.tag_number).unwrap_or_default(),
            animal_type: clean(self.animal_type).unwrap_or_default(),
            breed: clean(self.breed),
            gender: clean(self.gender),
            birth_date: optional_date("birthDate", self.birth_date.as_deref())?,
            weight: self.weight,
            health_status: clean(self.health_status)
                .unwrap_or_else(|| DEFAULT_HEALTH_STATUS.to_string()),
            location: clean(self.location),
            mother: clean(self.mother),
            father: clean(self.father),
            notes: clean(self.notes),
            created_at: now,
            updated_at: now,
        })
    }
}

/// Partial update for an animal. The tag number is immutable.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimalUpdate {
    #[serde(rename = "type")]
    pub animal_type: Option<String>,
    pub breed: Option<String>,
    pub gender: Option<String>,
    pub birth_date: Option<String>,
    pub weight: Option<f64>,
    pub health_status: Option<String>,
    pub location: Option<String>,
    pub mother: Option<String>,
    pub father: Option<String>,
    pub notes: Option<String>,
}

impl AnimalUpdate {
    pub fn apply(self, animal: &mut Animal) -> Result<(), ValidationError> {
        if let Some(birth_date) = optional_date("birthDate", self.birth_date.as_deref())? {
            animal.birth_date = Some(birth_date);
        }
        if let Some(animal_type) = clean(self.animal_type) {
            animal.animal_type = animal_type;
        }
        if let Some(health_status) = clean(self.health_status) {
            animal.health_status = health_status;
        }
        if self.weight.is_some() {
            animal.weight = self.weight;
        }
        for (slot, value) in [
            (&mut animal.breed, self.breed),
            (&mut animal.gender, self.gender),
            (&mut animal.location, self.location),
            (&mut animal.mother, self.mother),
            (&mut animal.father, self.father),
            (&mut animal.notes, self.notes),
        ] {
            if value.is_some() {
                *slot = clean(value);
            }
        }
        animal.updated_at = Utc::now();
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnimalFilter {
    pub animal_type: Option<String>,
    pub health_status: Option<String>,
    /// Matches tag number or breed
    pub search: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LivestockStatistics {
    pub total: i64,
    pub by_health_status: Vec<CategoryCount>,
    pub by_type: Vec<CategoryCount>,
    pub average_weight: f64,
}

impl LivestockStatistics {
    /// Number of animals with the given health status
    pub fn count_with_status(&self, status: &str) -> i64 {
        self.by_health_status
            .iter()
            .filter(|c| c.name.eq_ignore_ascii_case(status))
            .map(|c| c.count)
            .sum()
    }
}

/// Veterinary visit, vaccination or treatment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthRecord {
    pub id: Uuid,
    pub livestock_id: Uuid,
    #[serde(rename = "type")]
    pub record_type: String,
    pub description: String,
    pub date: NaiveDate,
    pub veterinarian: Option<String>,
    pub cost: Option<f64>,
    pub notes: Option<String>,
    pub next_checkup: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewHealthRecord {
    #[serde(rename = "type")]
    pub record_type: Option<String>,
    pub description: Option<String>,
    pub date: Option<String>,
    pub veterinarian: Option<String>,
    pub cost: Option<f64>,
    pub notes: Option<String>,
    pub next_checkup: Option<String>,
}

impl NewHealthRecord {
    pub fn into_record(self, livestock_id: Uuid) -> Result<HealthRecord, ValidationError> {
        let missing = missing_text(&[
            ("type", &self.record_type),
            ("description", &self.description),
            ("date", &self.date),
        ]);
        if !missing.is_empty() {
            return Err(ValidationError::missing_fields(missing));
        }
        let date = optional_date("date", self.date.as_deref())?
            .ok_or_else(|| ValidationError::missing_fields(["date"]))?;

        Ok(HealthRecord {
            id: Uuid::new_v4(),
            livestock_id,
            record_type: clean(self.record_type).unwrap_or_default(),
            description: clean(self.description).unwrap_or_default(),
            date,
            veterinarian: clean(self.veterinarian),
            cost: self.cost,
            notes: clean(self.notes),
            next_checkup: optional_date("nextCheckup", self.next_checkup.as_deref())?,
            created_at: Utc::now(),
        })
    }
}

/// Milk yield of one animal on one day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MilkRecord {
    pub id: Uuid,
    pub livestock_id: Uuid,
    pub date: NaiveDate,
    pub amount: f64,
    pub quality: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMilkRecord {
    pub date: Option<String>,
    pub amount: Option<f64>,
    pub quality: Option<String>,
    pub notes: Option<String>,
}

impl NewMilkRecord {
    pub fn into_record(self, livestock_id: Uuid) -> Result<MilkRecord, ValidationError> {
        let mut missing = missing_text(&[("date", &self.date)]);
        if !self.amount.map(|a| a > 0.0).unwrap_or(false) {
            missing.push("amount");
        }
        if !missing.is_empty() {
            return Err(ValidationError::missing_fields(missing));
        }
        let date = optional_date("date", self.date.as_deref())?
            .ok_or_else(|| ValidationError::missing_fields(["date"]))?;

        Ok(MilkRecord {
            id: Uuid::new_v4(),
            livestock_id,
            date,
            amount: self.amount.unwrap_or_default(),
            quality: clean(self.quality),
            notes: clean(self.notes),
            created_at: Utc::now(),
        })
    }
}
