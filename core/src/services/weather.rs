//! Weather lookups for a farm location
//!
//! No external provider is called. Figures are synthesized from the
//! coordinates and the calendar date with a seeded generator, so the same
//! place and day always produce the same weather.

use std::f64::consts::PI;

use chrono::{DateTime, Datelike, Duration, NaiveDate, Timelike, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;

pub const DEFAULT_FORECAST_DAYS: u32 = 7;
pub const MAX_FORECAST_DAYS: u32 = 7;

const FROST_THRESHOLD_C: f64 = 0.0;
const HEAT_THRESHOLD_C: f64 = 35.0;
const HEAVY_RAIN_MM: f64 = 25.0;
const STRONG_WIND_KMH: f64 = 45.0;

/// A validated latitude/longitude pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// Parse raw `lat`/`lon` query values
    ///
    /// # Errors
    ///
    /// * `MissingCoordinates` - Either value absent or blank
    /// * `InvalidCoordinates` - Not a number or out of range
    pub fn parse(lat: Option<&str>, lon: Option<&str>) -> Result<Self, ValidationError> {
        let lat = lat.map(str::trim).filter(|v| !v.is_empty());
        let lon = lon.map(str::trim).filter(|v| !v.is_empty());
        let (lat, lon) = match (lat, lon) {
            (Some(lat), Some(lon)) => (lat, lon),
            _ => return Err(ValidationError::MissingCoordinates),
        };

        let latitude: f64 = lat.parse().map_err(|_| ValidationError::InvalidCoordinates)?;
        let longitude: f64 = lon.parse().map_err(|_| ValidationError::InvalidCoordinates)?;
        Self::new(latitude, longitude)
    }

    pub fn new(latitude: f64, longitude: f64) -> Result<Self, ValidationError> {
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(ValidationError::InvalidCoordinates);
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    fn seed(&self, date: NaiveDate) -> u64 {
        let lat = (self.latitude * 1000.0).round() as i64;
        let lon = (self.longitude * 1000.0).round() as i64;
        let day = date.num_days_from_ce() as i64;
        (lat.wrapping_mul(73_856_093) ^ lon.wrapping_mul(19_349_663) ^ day.wrapping_mul(83_492_791))
            as u64
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentWeather {
    pub location: Coordinates,
    pub temperature: f64,
    pub feels_like: f64,
    pub humidity: u32,
    pub pressure: u32,
    pub wind_speed: f64,
    pub wind_direction: u32,
    pub precipitation: f64,
    pub uv_index: u32,
    pub condition: String,
    pub observed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyForecast {
    pub date: NaiveDate,
    pub temp_min: f64,
    pub temp_max: f64,
    pub humidity: u32,
    pub precipitation: f64,
    pub precipitation_chance: u32,
    pub wind_speed: f64,
    pub condition: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    Frost,
    Heat,
    HeavyRain,
    StrongWind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgriculturalAlert {
    #[serde(rename = "type")]
    pub kind: AlertKind,
    pub severity: String,
    pub date: NaiveDate,
    pub title: String,
    pub message: String,
    pub recommendations: Vec<String>,
}

/// Deterministic weather source
#[derive(Debug, Clone, Copy, Default)]
pub struct WeatherService;

impl WeatherService {
    pub fn new() -> Self {
        Self
    }

    /// Conditions at `now` for the given location
    pub fn current(&self, location: Coordinates, now: DateTime<Utc>) -> CurrentWeather {
        let day = self.day(location, now.date_naive());
        let hour = now.hour() as f64;
        // Coolest around 05:00, warmest around 15:00
        let diurnal = ((hour - 9.0) / 24.0 * 2.0 * PI).sin().mul_add(0.5, 0.5);
        let temperature = round1(day.temp_min + (day.temp_max - day.temp_min) * diurnal);

        let mut rng = StdRng::seed_from_u64(location.seed(now.date_naive()) ^ hour as u64);
        let wind_chill = if day.wind_speed > 20.0 { day.wind_speed / 10.0 } else { 0.0 };

        CurrentWeather {
            location,
            temperature,
            feels_like: round1(temperature - wind_chill),
            humidity: day.humidity,
            pressure: rng.gen_range(1000..=1030),
            wind_speed: day.wind_speed,
            wind_direction: rng.gen_range(0..360),
            precipitation: day.precipitation,
            uv_index: uv_index(location.latitude, now.date_naive(), &day.condition),
            condition: day.condition,
            observed_at: now,
        }
    }

    /// Daily forecast starting today; `days` is clamped to 1..=7
    pub fn forecast(&self, location: Coordinates, today: NaiveDate, days: u32) -> Vec<DailyForecast> {
        let days = days.clamp(1, MAX_FORECAST_DAYS);
        (0..days)
            .map(|offset| self.day(location, today + Duration::days(offset as i64)))
            .collect()
    }

    /// Frost, heat, heavy rain and strong wind warnings over the coming week
    pub fn agricultural_alerts(&self, location: Coordinates, today: NaiveDate) -> Vec<AgriculturalAlert> {
        self.forecast(location, today, MAX_FORECAST_DAYS)
            .iter()
            .flat_map(alerts_for)
            .collect()
    }

    fn day(&self, location: Coordinates, date: NaiveDate) -> DailyForecast {
        let mut rng = StdRng::seed_from_u64(location.seed(date));

        let mean = seasonal_mean(location.latitude, date) + rng.gen_range(-3.0..3.0);
        let spread = rng.gen_range(6.0..14.0);
        let humidity = rng.gen_range(30..95);
        let precipitation_chance: u32 = if humidity > 70 {
            rng.gen_range(40..100)
        } else {
            rng.gen_range(0..40)
        };
        let precipitation = if precipitation_chance > 50 {
            round1(rng.gen_range(0.5..40.0))
        } else {
            0.0
        };
        let wind_speed = round1(rng.gen_range(2.0..55.0));

        let temp_min = round1(mean - spread / 2.0);
        let temp_max = round1(mean + spread / 2.0);
        let condition = condition_for(precipitation, temp_min, humidity);

        DailyForecast {
            date,
            temp_min,
            temp_max,
            humidity,
            precipitation,
            precipitation_chance,
            wind_speed,
            condition: condition.to_string(),
        }
    }
}

/// Mean daily temperature from latitude and season
fn seasonal_mean(latitude: f64, date: NaiveDate) -> f64 {
    let base = 27.0 - latitude.abs() * 0.4;
    let amplitude = (latitude.abs() / 90.0) * 22.0;
    // Peak of summer around day 200 in the north, day 17 in the south
    let peak = if latitude >= 0.0 { 200.0 } else { 17.0 };
    let phase = (date.ordinal() as f64 - peak) / 365.25 * 2.0 * PI;
    base + amplitude * phase.cos() - amplitude / 2.0
}

fn condition_for(precipitation: f64, temp_min: f64, humidity: u32) -> &'static str {
    if precipitation > 0.0 && temp_min <= 0.0 {
        "snow"
    } else if precipitation >= HEAVY_RAIN_MM {
        "heavy_rain"
    } else if precipitation > 0.0 {
        "rain"
    } else if humidity > 75 {
        "cloudy"
    } else if humidity > 55 {
        "partly_cloudy"
    } else {
        "sunny"
    }
}

fn uv_index(latitude: f64, date: NaiveDate, condition: &str) -> u32 {
    let clear = seasonal_mean(latitude, date).clamp(0.0, 35.0) / 3.0;
    let factor = match condition {
        "sunny" => 1.0,
        "partly_cloudy" => 0.7,
        _ => 0.3,
    };
    (clear * factor).round() as u32
}

fn alerts_for(day: &DailyForecast) -> Vec<AgriculturalAlert> {
    let mut alerts = Vec::new();

    if day.temp_min <= FROST_THRESHOLD_C {
        alerts.push(AgriculturalAlert {
            kind: AlertKind::Frost,
            severity: severity(day.temp_min <= -5.0),
            date: day.date,
            title: "Frost warning".to_string(),
            message: format!("Minimum temperature of {:.1}°C expected", day.temp_min),
            recommendations: vec![
                "Cover sensitive seedlings overnight".to_string(),
                "Protect irrigation lines from freezing".to_string(),
                "Keep livestock sheltered".to_string(),
            ],
        });
    }
    if day.temp_max >= HEAT_THRESHOLD_C {
        alerts.push(AgriculturalAlert {
            kind: AlertKind::Heat,
            severity: severity(day.temp_max >= 40.0),
            date: day.date,
            title: "Heat stress warning".to_string(),
            message: format!("Maximum temperature of {:.1}°C expected", day.temp_max),
            recommendations: vec![
                "Irrigate early in the morning or late in the evening".to_string(),
                "Provide shade and extra water for animals".to_string(),
            ],
        });
    }
    if day.precipitation >= HEAVY_RAIN_MM {
        alerts.push(AgriculturalAlert {
            kind: AlertKind::HeavyRain,
            severity: severity(day.precipitation >= 35.0),
            date: day.date,
            title: "Heavy rain warning".to_string(),
            message: format!("{:.1} mm of rain expected", day.precipitation),
            recommendations: vec![
                "Postpone spraying and fertilizer application".to_string(),
                "Clear drainage channels".to_string(),
            ],
        });
    }
    if day.wind_speed >= STRONG_WIND_KMH {
        alerts.push(AgriculturalAlert {
            kind: AlertKind::StrongWind,
            severity: severity(day.wind_speed >= 50.0),
            date: day.date,
            title: "Strong wind warning".to_string(),
            message: format!("Winds up to {:.1} km/h expected", day.wind_speed),
            recommendations: vec![
                "Avoid spraying".to_string(),
                "Secure greenhouse covers and loose equipment".to_string(),
            ],
        });
    }

    alerts
}

fn severity(high: bool) -> String {
    if high { "high" } else { "medium" }.to_string()
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn konya() -> Coordinates {
        Coordinates::new(37.87, 32.48).unwrap()
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_coordinate_parsing() {
        assert_eq!(
            Coordinates::parse(None, Some("32.4")),
            Err(ValidationError::MissingCoordinates)
        );
        assert_eq!(
            Coordinates::parse(Some(""), Some("32.4")),
            Err(ValidationError::MissingCoordinates)
        );
        assert_eq!(
            Coordinates::parse(Some("abc"), Some("32.4")),
            Err(ValidationError::InvalidCoordinates)
        );
        assert_eq!(
            Coordinates::parse(Some("91"), Some("32.4")),
            Err(ValidationError::InvalidCoordinates)
        );
        assert_eq!(
            Coordinates::parse(Some("10"), Some("-181")),
            Err(ValidationError::InvalidCoordinates)
        );
        assert!(Coordinates::parse(Some("-90"), Some("180")).is_ok());
    }

    #[test]
    fn test_forecast_is_deterministic() {
        let service = WeatherService::new();
        let a = service.forecast(konya(), day(2024, 6, 1), 7);
        let b = service.forecast(konya(), day(2024, 6, 1), 7);
        assert_eq!(a, b);
        assert_eq!(a.len(), 7);
        assert_eq!(a[6].date, day(2024, 6, 7));
        assert!(a.iter().all(|d| d.temp_min <= d.temp_max));
    }

    #[test]
    fn test_forecast_days_clamped() {
        let service = WeatherService::new();
        assert_eq!(service.forecast(konya(), day(2024, 1, 1), 0).len(), 1);
        assert_eq!(service.forecast(konya(), day(2024, 1, 1), 30).len(), 7);
    }

    #[test]
    fn test_current_matches_day() {
        let service = WeatherService::new();
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 15, 0, 0).unwrap();
        let current = service.current(konya(), now);
        let today = &service.forecast(konya(), now.date_naive(), 1)[0];
        assert!(current.temperature >= today.temp_min - 0.1);
        assert!(current.temperature <= today.temp_max + 0.1);
        assert_eq!(current, service.current(konya(), now));
    }

    #[test]
    fn test_alerts_follow_thresholds() {
        let service = WeatherService::new();
        let today = day(2024, 1, 15);
        let forecast = service.forecast(konya(), today, 7);
        let alerts = service.agricultural_alerts(konya(), today);

        let frosty_days = forecast.iter().filter(|d| d.temp_min <= 0.0).count();
        let frost_alerts = alerts.iter().filter(|a| a.kind == AlertKind::Frost).count();
        assert_eq!(frosty_days, frost_alerts);

        let windy_days = forecast.iter().filter(|d| d.wind_speed >= 45.0).count();
        let wind_alerts = alerts.iter().filter(|a| a.kind == AlertKind::StrongWind).count();
        assert_eq!(windy_days, wind_alerts);
    }

    #[test]
    fn test_seasons_flip_across_equator() {
        let north_summer = seasonal_mean(45.0, day(2024, 7, 15));
        let north_winter = seasonal_mean(45.0, day(2024, 1, 15));
        let south_summer = seasonal_mean(-45.0, day(2024, 1, 15));
        assert!(north_summer > north_winter);
        assert!(south_summer > seasonal_mean(-45.0, day(2024, 7, 15)));
    }
}
