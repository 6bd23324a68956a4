//! Per-user application and notification preferences
//!
//! Preferences are held in process memory and reset on restart.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::errors::ValidationError;

const LANGUAGES: &[&str] = &["tr", "en"];
const THEMES: &[&str] = &["light", "dark", "system"];
const UNIT_SYSTEMS: &[&str] = &["metric", "imperial"];

/// Application preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSettings {
    pub language: String,
    pub currency: String,
    pub units: String,
    pub area_unit: String,
    pub theme: String,
    pub date_format: String,
    pub timezone: String,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            language: "tr".to_string(),
            currency: "TRY".to_string(),
            units: "metric".to_string(),
            area_unit: "decare".to_string(),
            theme: "light".to_string(),
            date_format: "DD/MM/YYYY".to_string(),
            timezone: "Europe/Istanbul".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsUpdate {
    pub language: Option<String>,
    pub currency: Option<String>,
    pub units: Option<String>,
    pub area_unit: Option<String>,
    pub theme: Option<String>,
    pub date_format: Option<String>,
    pub timezone: Option<String>,
}

impl SettingsUpdate {
    fn apply(self, settings: &mut UserSettings) -> Result<(), ValidationError> {
        check_choice("language", self.language.as_deref(), LANGUAGES)?;
        check_choice("theme", self.theme.as_deref(), THEMES)?;
        check_choice("units", self.units.as_deref(), UNIT_SYSTEMS)?;

        for (slot, value) in [
            (&mut settings.language, self.language),
            (&mut settings.currency, self.currency.map(|c| c.to_uppercase())),
            (&mut settings.units, self.units),
            (&mut settings.area_unit, self.area_unit),
            (&mut settings.theme, self.theme),
            (&mut settings.date_format, self.date_format),
            (&mut settings.timezone, self.timezone),
        ] {
            if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
                *slot = value.trim().to_string();
            }
        }
        Ok(())
    }
}

fn check_choice(field: &str, value: Option<&str>, allowed: &[&str]) -> Result<(), ValidationError> {
    match value {
        Some(v) if !allowed.contains(&v.trim()) => Err(ValidationError::invalid_request(format!(
            "{} must be one of: {}",
            field,
            allowed.join(", ")
        ))),
        _ => Ok(()),
    }
}

/// Which notifications a user wants to receive
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSettings {
    pub email_notifications: bool,
    pub push_notifications: bool,
    pub sms_notifications: bool,
    pub task_reminders: bool,
    pub weather_alerts: bool,
    pub health_alerts: bool,
    pub financial_alerts: bool,
    /// Local time of the daily digest (`HH:MM`)
    pub reminder_time: String,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            email_notifications: true,
            push_notifications: true,
            sms_notifications: false,
            task_reminders: true,
            weather_alerts: true,
            health_alerts: true,
            financial_alerts: true,
            reminder_time: "08:00".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSettingsUpdate {
    pub email_notifications: Option<bool>,
    pub push_notifications: Option<bool>,
    pub sms_notifications: Option<bool>,
    pub task_reminders: Option<bool>,
    pub weather_alerts: Option<bool>,
    pub health_alerts: Option<bool>,
    pub financial_alerts: Option<bool>,
    pub reminder_time: Option<String>,
}

impl NotificationSettingsUpdate {
    fn apply(self, settings: &mut NotificationSettings) -> Result<(), ValidationError> {
        if let Some(time) = self.reminder_time {
            if chrono::NaiveTime::parse_from_str(time.trim(), "%H:%M").is_err() {
                return Err(ValidationError::invalid_request("reminderTime must be HH:MM"));
            }
            settings.reminder_time = time.trim().to_string();
        }
        for (slot, value) in [
            (&mut settings.email_notifications, self.email_notifications),
            (&mut settings.push_notifications, self.push_notifications),
            (&mut settings.sms_notifications, self.sms_notifications),
            (&mut settings.task_reminders, self.task_reminders),
            (&mut settings.weather_alerts, self.weather_alerts),
            (&mut settings.health_alerts, self.health_alerts),
            (&mut settings.financial_alerts, self.financial_alerts),
        ] {
            if let Some(value) = value {
                *slot = value;
            }
        }
        Ok(())
    }
}

/// In-memory preference store
#[derive(Debug, Default)]
pub struct SettingsService {
    settings: RwLock<HashMap<Uuid, UserSettings>>,
    notifications: RwLock<HashMap<Uuid, NotificationSettings>>,
}

impl SettingsService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored preferences, or defaults for users who never saved any
    pub async fn get(&self, user_id: Uuid) -> UserSettings {
        self.settings
            .read()
            .await
            .get(&user_id)
            .cloned()
            .unwrap_or_default()
    }

    pub async fn update(
        &self,
        user_id: Uuid,
        update: SettingsUpdate,
    ) -> Result<UserSettings, ValidationError> {
        let mut store = self.settings.write().await;
        let mut settings = store.get(&user_id).cloned().unwrap_or_default();
        update.apply(&mut settings)?;
        store.insert(user_id, settings.clone());
        Ok(settings)
    }

    pub async fn notification_settings(&self, user_id: Uuid) -> NotificationSettings {
        self.notifications
            .read()
            .await
            .get(&user_id)
            .cloned()
            .unwrap_or_default()
    }

    pub async fn update_notification_settings(
        &self,
        user_id: Uuid,
        update: NotificationSettingsUpdate,
    ) -> Result<NotificationSettings, ValidationError> {
        let mut store = self.notifications.write().await;
        let mut settings = store.get(&user_id).cloned().unwrap_or_default();
        update.apply(&mut settings)?;
        store.insert(user_id, settings.clone());
        Ok(settings)
    }
}
