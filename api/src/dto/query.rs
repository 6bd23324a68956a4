//! Query-string parameters
//!
//! Every value arrives as an optional string so that a malformed number
//! falls back to its default instead of failing extraction. Filters that
//! carry typed values (dates, enums, ids) are parsed here and report a
//! validation error on bad input.

use agri_core::domain::entities::common::{optional_date, optional_datetime, optional_period_end};
use agri_core::domain::entities::event::EventFilter;
use agri_core::domain::entities::land::LandFilter;
use agri_core::domain::entities::livestock::AnimalFilter;
use agri_core::domain::entities::notification::NotificationFilter;
use agri_core::domain::entities::production::ProductionFilter;
use agri_core::domain::entities::transaction::TransactionFilter;
use agri_core::errors::ValidationError;
use agri_shared::types::Pagination;
use serde::Deserialize;
use uuid::Uuid;

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn number(value: &Option<String>) -> Option<u32> {
    value.as_deref().and_then(|v| v.trim().parse().ok())
}

fn pagination(page: &Option<String>, limit: &Option<String>) -> Pagination {
    Pagination::parse(page.as_deref(), limit.as_deref())
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LandQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub status: Option<String>,
    pub crop: Option<String>,
    pub search: Option<String>,
}

impl LandQuery {
    pub fn pagination(&self) -> Pagination {
        pagination(&self.page, &self.limit)
    }

    pub fn filter(&self) -> LandFilter {
        LandFilter {
            status: non_blank(&self.status),
            crop: non_blank(&self.crop),
            search: non_blank(&self.search),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnimalQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    #[serde(rename = "type")]
    pub animal_type: Option<String>,
    pub health_status: Option<String>,
    pub search: Option<String>,
}

impl AnimalQuery {
    pub fn pagination(&self) -> Pagination {
        pagination(&self.page, &self.limit)
    }

    pub fn filter(&self) -> AnimalFilter {
        AnimalFilter {
            animal_type: non_blank(&self.animal_type),
            health_status: non_blank(&self.health_status),
            search: non_blank(&self.search),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductionQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub category: Option<String>,
    pub status: Option<String>,
    pub land_id: Option<String>,
}

impl ProductionQuery {
    pub fn pagination(&self) -> Pagination {
        pagination(&self.page, &self.limit)
    }

    pub fn filter(&self) -> Result<ProductionFilter, ValidationError> {
        let land_id = match non_blank(&self.land_id) {
            Some(raw) => Some(
                Uuid::parse_str(&raw)
                    .map_err(|_| ValidationError::invalid_request("landId must be a UUID"))?,
            ),
            None => None,
        };
        Ok(ProductionFilter {
            category: non_blank(&self.category),
            status: non_blank(&self.status),
            land_id,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransactionQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    #[serde(rename = "type")]
    pub transaction_type: Option<String>,
    pub category: Option<String>,
    pub status: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl TransactionQuery {
    pub fn pagination(&self) -> Pagination {
        pagination(&self.page, &self.limit)
    }

    pub fn filter(&self) -> Result<TransactionFilter, ValidationError> {
        Ok(TransactionFilter {
            transaction_type: non_blank(&self.transaction_type)
                .map(|t| t.parse())
                .transpose()?,
            category: non_blank(&self.category),
            status: non_blank(&self.status),
            start_date: optional_date("startDate", self.start_date.as_deref())?,
            end_date: optional_date("endDate", self.end_date.as_deref())?,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EventQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    #[serde(rename = "type")]
    pub event_type: Option<String>,
    pub status: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl EventQuery {
    pub fn pagination(&self) -> Pagination {
        pagination(&self.page, &self.limit)
    }

    pub fn filter(&self) -> Result<EventFilter, ValidationError> {
        Ok(EventFilter {
            event_type: non_blank(&self.event_type),
            status: non_blank(&self.status).map(|s| s.parse()).transpose()?,
            start_date: optional_datetime("startDate", self.start_date.as_deref())?,
            end_date: optional_period_end("endDate", self.end_date.as_deref())?,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NotificationQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    #[serde(rename = "type")]
    pub notification_type: Option<String>,
    pub is_read: Option<String>,
}

impl NotificationQuery {
    pub fn pagination(&self) -> Pagination {
        pagination(&self.page, &self.limit)
    }

    pub fn filter(&self) -> Result<NotificationFilter, ValidationError> {
        let is_read = match non_blank(&self.is_read).as_deref() {
            None => None,
            Some("true") => Some(true),
            Some("false") => Some(false),
            Some(_) => {
                return Err(ValidationError::invalid_request(
                    "isRead must be true or false",
                ))
            }
        };
        Ok(NotificationFilter {
            notification_type: non_blank(&self.notification_type),
            is_read,
        })
    }
}

/// `?limit=` for feeds
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LimitQuery {
    pub limit: Option<String>,
}

impl LimitQuery {
    pub fn value(&self) -> Option<u32> {
        number(&self.limit)
    }
}

/// `?months=` for charts and analyses
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MonthsQuery {
    pub months: Option<String>,
}

impl MonthsQuery {
    pub fn value(&self) -> Option<u32> {
        number(&self.months)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PeriodQuery {
    pub period: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct WeatherQuery {
    pub lat: Option<String>,
    pub lon: Option<String>,
    pub days: Option<String>,
}

impl WeatherQuery {
    pub fn days(&self) -> Option<u32> {
        number(&self.days)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ReportCatalogQuery {
    #[serde(rename = "type")]
    pub report_type: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ComparisonQuery {
    pub period1: Option<String>,
    pub period2: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use agri_core::domain::entities::event::EventStatus;
    use agri_core::domain::entities::transaction::TransactionType;

    fn some(value: &str) -> Option<String> {
        Some(value.to_string())
    }

    #[test]
    fn test_blank_filters_are_ignored() {
        let query = LandQuery {
            status: some("  "),
            crop: some("wheat"),
            ..LandQuery::default()
        };
        let filter = query.filter();
        assert_eq!(filter.status, None);
        assert_eq!(filter.crop.as_deref(), Some("wheat"));
    }

    #[test]
    fn test_unparsable_pagination_uses_defaults() {
        let query = LandQuery {
            page: some("abc"),
            limit: some("500"),
            ..LandQuery::default()
        };
        assert_eq!(query.pagination(), Pagination::default());
    }

    #[test]
    fn test_transaction_filter_parses_type_and_dates() {
        let query = TransactionQuery {
            transaction_type: some("Income"),
            start_date: some("2024-04-01"),
            ..TransactionQuery::default()
        };
        let filter = query.filter().unwrap();
        assert_eq!(filter.transaction_type, Some(TransactionType::Income));
        assert!(filter.start_date.is_some());
        assert!(filter.end_date.is_none());
    }

    #[test]
    fn test_transaction_filter_rejects_bad_date() {
        let query = TransactionQuery {
            end_date: some("yesterday"),
            ..TransactionQuery::default()
        };
        assert!(matches!(
            query.filter(),
            Err(ValidationError::InvalidDate { .. })
        ));
    }

    #[test]
    fn test_event_status_filter() {
        let query = EventQuery {
            status: some("in_progress"),
            ..EventQuery::default()
        };
        assert_eq!(query.filter().unwrap().status, Some(EventStatus::InProgress));

        let query = EventQuery {
            status: some("done"),
            ..EventQuery::default()
        };
        assert!(matches!(
            query.filter(),
            Err(ValidationError::InvalidStatus { .. })
        ));
    }

    #[test]
    fn test_is_read_filter() {
        let query = NotificationQuery {
            is_read: some("false"),
            ..NotificationQuery::default()
        };
        assert_eq!(query.filter().unwrap().is_read, Some(false));

        let query = NotificationQuery {
            is_read: some("maybe"),
            ..NotificationQuery::default()
        };
        assert!(query.filter().is_err());
    }

    #[test]
    fn test_production_land_id_must_be_uuid() {
        let query = ProductionQuery {
            land_id: some("not-a-uuid"),
            ..ProductionQuery::default()
        };
        assert!(query.filter().is_err());
    }
}
