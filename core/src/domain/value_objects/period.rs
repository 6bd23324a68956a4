//! Reporting periods and calendar month arithmetic.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;

/// Half-open date range `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Last day included in the range
    pub fn last_day(&self) -> NaiveDate {
        self.end.pred_opt().unwrap_or(self.start)
    }
}

/// Period selector used by finance summaries and generated reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportPeriod {
    #[default]
    Month,
    Quarter,
    Year,
}

impl ReportPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportPeriod::Month => "month",
            ReportPeriod::Quarter => "quarter",
            ReportPeriod::Year => "year",
        }
    }

    /// The calendar month, quarter or year containing `today`
    pub fn range_containing(&self, today: NaiveDate) -> DateRange {
        let (start_month, span) = match self {
            ReportPeriod::Month => (today.month(), 1),
            ReportPeriod::Quarter => ((today.month0() / 3) * 3 + 1, 3),
            ReportPeriod::Year => (1, 12),
        };
        let start = NaiveDate::from_ymd_opt(today.year(), start_month, 1).unwrap_or(today);
        let end = start
            .checked_add_months(Months::new(span))
            .unwrap_or(start);
        DateRange { start, end }
    }
}

impl fmt::Display for ReportPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportPeriod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "month" | "monthly" => Ok(ReportPeriod::Month),
            "quarter" | "quarterly" => Ok(ReportPeriod::Quarter),
            "year" | "yearly" | "annual" => Ok(ReportPeriod::Year),
            other => Err(ValidationError::InvalidPeriod {
                value: other.to_string(),
            }),
        }
    }
}

/// `YYYY-MM` key of the month containing `date`
pub fn month_key(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

/// Date range covering the month named by a `YYYY-MM` key
pub fn month_range(key: &str) -> Result<DateRange, ValidationError> {
    let key = key.trim();
    let start = NaiveDate::parse_from_str(&format!("{}-01", key), "%Y-%m-%d")
        .ok()
        .filter(|_| key.len() == 7)
        .ok_or_else(|| ValidationError::InvalidPeriod {
            value: key.to_string(),
        })?;
    let end = start
        .checked_add_months(Months::new(1))
        .ok_or_else(|| ValidationError::InvalidPeriod {
            value: key.to_string(),
        })?;
    Ok(DateRange { start, end })
}

/// First day of the month `months_back` months before the month of `today`
pub fn months_ago(today: NaiveDate, months_back: u32) -> NaiveDate {
    let first = today.with_day(1).unwrap_or(today);
    first
        .checked_sub_months(Months::new(months_back))
        .unwrap_or(first)
}

/// The last `count` month keys ending with the month of `today`, oldest first
pub fn trailing_months(today: NaiveDate, count: u32) -> Vec<String> {
    (0..count)
        .rev()
        .map(|back| month_key(months_ago(today, back)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_period_ranges() {
        let today = date(2024, 8, 17);
        assert_eq!(
            ReportPeriod::Month.range_containing(today),
            DateRange { start: date(2024, 8, 1), end: date(2024, 9, 1) }
        );
        assert_eq!(
            ReportPeriod::Quarter.range_containing(today),
            DateRange { start: date(2024, 7, 1), end: date(2024, 10, 1) }
        );
        assert_eq!(
            ReportPeriod::Year.range_containing(today),
            DateRange { start: date(2024, 1, 1), end: date(2025, 1, 1) }
        );
    }

    #[test]
    fn test_period_parsing() {
        assert_eq!("".parse::<ReportPeriod>().unwrap(), ReportPeriod::Month);
        assert_eq!("Quarterly".parse::<ReportPeriod>().unwrap(), ReportPeriod::Quarter);
        assert!("decade".parse::<ReportPeriod>().is_err());
    }

    #[test]
    fn test_month_range() {
        let range = month_range("2024-12").unwrap();
        assert_eq!(range.start, date(2024, 12, 1));
        assert_eq!(range.end, date(2025, 1, 1));
        assert_eq!(range.last_day(), date(2024, 12, 31));
        assert!(month_range("2024-13").is_err());
        assert!(month_range("2024-1").is_err());
    }

    #[test]
    fn test_trailing_months() {
        let months = trailing_months(date(2024, 2, 29), 3);
        assert_eq!(months, vec!["2023-12", "2024-01", "2024-02"]);
    }
}
