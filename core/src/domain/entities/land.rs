//! Land parcels and the field activities recorded on them.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::common::{clean, missing_text, optional_date};
use crate::errors::ValidationError;

pub const DEFAULT_LAND_STATUS: &str = "active";

/// Geographic position of a parcel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoLocation {
    pub latitude: f64,
    pub longitude: f64,
    pub address: Option<String>,
}

/// A land parcel owned by a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Land {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub area: f64,
    pub unit: String,
    pub crop: Option<String>,
    pub status: String,
    pub last_activity: Option<DateTime<Utc>>,
    pub productivity: f64,
    pub location: Option<GeoLocation>,
    pub soil_type: Option<String>,
    pub irrigation_type: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request payload for creating a land parcel
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLand {
    pub name: Option<String>,
    pub area: Option<f64>,
    pub unit: Option<String>,
    pub crop: Option<String>,
    pub status: Option<String>,
    pub productivity: Option<f64>,
    pub location: Option<GeoLocation>,
    pub soil_type: Option<String>,
    pub irrigation_type: Option<String>,
}

impl NewLand {
    /// Validates required fields and builds the entity
    pub fn into_land(self, user_id: Uuid) -> Result<Land, ValidationError> {
        let mut missing = missing_text(&[("name", &self.name), ("unit", &self.unit)]);
        if !self.area.map(|a| a > 0.0).unwrap_or(false) {
            missing.push("area");
        }
        if !missing.is_empty() {
            return Err(ValidationError::missing_fields(missing));
        }

        let now = Utc::now();
        Ok(Land {
            id: Uuid::new_v4(),
            user_id,
            name: clean(self.name).unwrap_or_default(),
            area: self.area.unwrap_or_default(),
            unit: clean(self.unit).unwrap_or_default(),
            crop: clean(self.crop),
            status: clean(self.status).unwrap_or_else(|| DEFAULT_LAND_STATUS.to_string()),
            last_activity: None,
            productivity: self.productivity.unwrap_or(0.0),
            location: self.location,
            soil_type: clean(self.soil_type),
            irrigation_type: clean(self.irrigation_type),
            created_at: now,
            updated_at: now,
        })
    }
}

/// Partial update for a land parcel
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LandUpdate {
    pub name: Option<String>,
    pub area: Option<f64>,
    pub unit: Option<String>,
    pub crop: Option<String>,
    pub status: Option<String>,
    pub productivity: Option<f64>,
    pub location: Option<GeoLocation>,
    pub soil_type: Option<String>,
    pub irrigation_type: Option<String>,
}

impl LandUpdate {
    pub fn apply(self, land: &mut Land) -> Result<(), ValidationError> {
        if let Some(area) = self.area {
            if area <= 0.0 {
                return Err(ValidationError::invalid_request("area must be positive"));
            }
            land.area = area;
        }
        if let Some(name) = clean(self.name) {
            land.name = name;
        }
        if let Some(unit) = clean(self.unit) {
            land.unit = unit;
        }
        if let Some(status) = clean(self.status) {
            land.status = status;
        }
        if self.crop.is_some() {
            land.crop = clean(self.crop);
        }
        if let Some(productivity) = self.productivity {
            land.productivity = productivity;
        }
        if self.location.is_some() {
            land.location = self.location;
        }
        if self.soil_type.is_some() {
            land.soil_type = clean(self.soil_type);
        }
        if self.irrigation_type.is_some() {
            land.irrigation_type = clean(self.irrigation_type);
        }
        land.updated_at = Utc::now();
        Ok(())
    }
}

/// List filters for lands
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LandFilter {
    pub status: Option<String>,
    pub crop: Option<String>,
    /// Case-insensitive substring of the name
    pub search: Option<String>,
}

/// Crop share within a user's lands
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CropShare {
    pub crop: String,
    pub count: i64,
    pub area: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LandStatistics {
    pub total_lands: i64,
    pub total_area: f64,
    pub active_lands: i64,
    pub average_productivity: f64,
    pub crop_distribution: Vec<CropShare>,
}

/// Production yield of one parcel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LandProductivity {
    pub land_id: Uuid,
    pub name: String,
    pub crop: Option<String>,
    pub area: f64,
    pub productivity: f64,
    pub total_production: f64,
    pub yield_per_area: f64,
}

impl LandProductivity {
    pub fn new(land: &Land, total_production: f64) -> Self {
        let yield_per_area = if land.area > 0.0 {
            total_production / land.area
        } else {
            0.0
        };
        Self {
            land_id: land.id,
            name: land.name.clone(),
            crop: land.crop.clone(),
            area: land.area,
            productivity: land.productivity,
            total_production,
            yield_per_area,
        }
    }
}

/// Field work (ploughing, sowing, spraying) recorded on a parcel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LandActivity {
    pub id: Uuid,
    pub land_id: Uuid,
    #[serde(rename = "type")]
    pub activity_type: String,
    pub description: String,
    pub scheduled_date: Option<NaiveDate>,
    pub actual_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub cost: Option<f64>,
    pub result: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLandActivity {
    #[serde(rename = "type")]
    pub activity_type: Option<String>,
    pub description: Option<String>,
    pub scheduled_date: Option<String>,
    pub actual_date: Option<String>,
    pub notes: Option<String>,
    pub cost: Option<f64>,
    pub result: Option<String>,
}

impl NewLandActivity {
    pub fn into_activity(self, land_id: Uuid) -> Result<LandActivity, ValidationError> {
        let missing = missing_text(&[
            ("type", &self.activity_type),
            ("description", &self.description),
        ]);
        if !missing.is_empty() {
            return Err(ValidationError::missing_fields(missing));
        }

        Ok(LandActivity {
            id: Uuid::new_v4(),
            land_id,
            activity_type: clean(self.activity_type).unwrap_or_default(),
            description: clean(self.description).unwrap_or_default(),
            scheduled_date: optional_date("scheduledDate", self.scheduled_date.as_deref())?,
            actual_date: optional_date("actualDate", self.actual_date.as_deref())?,
            notes: clean(self.notes),
            cost: self.cost,
            result: clean(self.result),
            created_at: Utc::now(),
        })
    }
}
