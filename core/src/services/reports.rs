//! Report catalog, on-demand JSON reports and period comparisons

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use agri_shared::validation::{is_missing, normalize_filter};

use crate::domain::entities::common::missing_text;
use crate::domain::entities::transaction::TransactionType;
use crate::domain::value_objects::{month_range, DateRange, ReportPeriod};
use crate::errors::{DomainError, DomainResult, ValidationError};
use crate::repositories::Repositories;

/// The only output format produced
pub const JSON_FORMAT: &str = "json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportType {
    Financial,
    Production,
    Livestock,
    Land,
}

impl ReportType {
    pub const ALL: [ReportType; 4] = [
        ReportType::Financial,
        ReportType::Production,
        ReportType::Livestock,
        ReportType::Land,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportType::Financial => "financial",
            ReportType::Production => "production",
            ReportType::Livestock => "livestock",
            ReportType::Land => "land",
        }
    }

    fn title(&self) -> &'static str {
        match self {
            ReportType::Financial => "Financial Report",
            ReportType::Production => "Production Report",
            ReportType::Livestock => "Livestock Report",
            ReportType::Land => "Land Report",
        }
    }

    fn description(&self) -> &'static str {
        match self {
            ReportType::Financial => "Income, expense and profitability analysis",
            ReportType::Production => "Production volume and value by category",
            ReportType::Livestock => "Herd size, health status and weights",
            ReportType::Land => "Land use, crops and productivity",
        }
    }
}

impl fmt::Display for ReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        ReportType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or(ValidationError::InvalidType { value: s })
    }
}

/// Catalog entry describing a report that can be generated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDefinition {
    #[serde(rename = "type")]
    pub report_type: ReportType,
    pub title: String,
    pub description: String,
    pub periods: Vec<String>,
    pub formats: Vec<String>,
}

impl From<ReportType> for ReportDefinition {
    fn from(report_type: ReportType) -> Self {
        Self {
            report_type,
            title: report_type.title().to_string(),
            description: report_type.description().to_string(),
            periods: [ReportPeriod::Month, ReportPeriod::Quarter, ReportPeriod::Year]
                .iter()
                .map(|p| p.as_str().to_string())
                .collect(),
            formats: vec![JSON_FORMAT.to_string()],
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateReportRequest {
    #[serde(rename = "type")]
    pub report_type: Option<String>,
    pub period: Option<String>,
    pub format: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedReport {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub report_type: ReportType,
    pub title: String,
    pub period: ReportPeriod,
    pub range: DateRange,
    pub format: String,
    pub status: String,
    pub generated_at: DateTime<Utc>,
    pub data: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceMetrics {
    /// Share of scheduled events that were completed
    pub efficiency: f64,
    /// Average land productivity, capped at 100
    pub productivity: f64,
    /// Profit margin of the current year, floored at 0
    pub profitability: f64,
    /// Share of the herd in good health
    pub herd_health: f64,
    pub overall: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricComparison {
    pub period1: f64,
    pub period2: f64,
    /// Percentage change from `period1` to `period2`
    pub change: f64,
    pub trend: String,
}

impl MetricComparison {
    fn new(period1: f64, period2: f64) -> Self {
        let change = percent_change(period1, period2);
        let trend = if change > 0.0 {
            "up"
        } else if change < 0.0 {
            "down"
        } else {
            "stable"
        };
        Self {
            period1,
            period2,
            change,
            trend: trend.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodComparison {
    pub period1: String,
    pub period2: String,
    pub income: MetricComparison,
    pub expense: MetricComparison,
    pub profit: MetricComparison,
    pub production: MetricComparison,
}

#[derive(Clone)]
pub struct ReportService {
    repos: Repositories,
}

impl ReportService {
    pub fn new(repos: Repositories) -> Self {
        Self { repos }
    }

    /// Report definitions, optionally narrowed to one type
    pub fn catalog(&self, filter: Option<&str>) -> Result<Vec<ReportDefinition>, ValidationError> {
        match normalize_filter(filter) {
            None => Ok(ReportType::ALL.into_iter().map(ReportDefinition::from).collect()),
            Some(raw) => Ok(vec![raw.parse::<ReportType>()?.into()]),
        }
    }

    /// Computes a report over the period containing `today`
    ///
    /// # Errors
    ///
    /// * `MissingFields` - `type` or `format` absent
    /// * `UnsupportedFormat` - Anything but `json`
    /// * `InvalidType` / `InvalidPeriod` - Unknown selector values
    pub async fn generate(
        &self,
        user_id: Uuid,
        request: GenerateReportRequest,
        today: NaiveDate,
    ) -> DomainResult<GeneratedReport> {
        let missing = missing_text(&[("type", &request.report_type), ("format", &request.format)]);
        if !missing.is_empty() {
            return Err(ValidationError::missing_fields(missing).into());
        }

        let format = request.format.unwrap_or_default().trim().to_lowercase();
        if format != JSON_FORMAT {
            return Err(ValidationError::UnsupportedFormat { format }.into());
        }
        let report_type: ReportType = request.report_type.unwrap_or_default().parse()?;
        let period: ReportPeriod = if is_missing(&request.period) {
            ReportPeriod::default()
        } else {
            request.period.unwrap_or_default().parse()?
        };
        let range = period.range_containing(today);

        let data = match report_type {
            ReportType::Financial => self.financial_data(user_id, range).await?,
            ReportType::Production => self.production_data(user_id, range).await?,
            ReportType::Livestock => self.livestock_data(user_id).await?,
            ReportType::Land => self.land_data(user_id).await?,
        };

        tracing::info!(user_id = %user_id, report = %report_type, period = %period, "Report generated");

        Ok(GeneratedReport {
            id: Uuid::new_v4(),
            report_type,
            title: format!("{} ({})", report_type.title(), period),
            period,
            range,
            format,
            status: "completed".to_string(),
            generated_at: Utc::now(),
            data,
        })
    }

    pub async fn performance(&self, user_id: Uuid, today: NaiveDate) -> DomainResult<PerformanceMetrics> {
        let events = self.repos.events.statistics(user_id, Utc::now()).await?;
        let lands = self.repos.lands.statistics(user_id).await?;
        let livestock = self.repos.livestock.statistics(user_id).await?;
        let finance = self
            .repos
            .transactions
            .totals(user_id, ReportPeriod::Year.range_containing(today))
            .await?;

        let efficiency = ratio(events.completed, events.total);
        let productivity = round1(lands.average_productivity.clamp(0.0, 100.0));
        let profitability = round1(finance.margin().clamp(0.0, 100.0));
        let herd_health = ratio(livestock.count_with_status("healthy"), livestock.total);
        let overall = round1((efficiency + productivity + profitability + herd_health) / 4.0);

        Ok(PerformanceMetrics {
            efficiency,
            productivity,
            profitability,
            herd_health,
            overall,
        })
    }

    /// Compares two `YYYY-MM` months
    pub async fn comparison(
        &self,
        user_id: Uuid,
        period1: Option<&str>,
        period2: Option<&str>,
    ) -> DomainResult<PeriodComparison> {
        let (p1, p2) = match (
            period1.map(str::trim).filter(|p| !p.is_empty()),
            period2.map(str::trim).filter(|p| !p.is_empty()),
        ) {
            (Some(p1), Some(p2)) => (p1, p2),
            _ => return Err(ValidationError::MissingPeriods.into()),
        };
        let r1 = month_range(p1)?;
        let r2 = month_range(p2)?;

        let f1 = self.repos.transactions.totals(user_id, r1).await?;
        let f2 = self.repos.transactions.totals(user_id, r2).await?;
        let prod1 = self.repos.production.total_amount(user_id, r1).await?;
        let prod2 = self.repos.production.total_amount(user_id, r2).await?;

        Ok(PeriodComparison {
            period1: p1.to_string(),
            period2: p2.to_string(),
            income: MetricComparison::new(f1.income, f2.income),
            expense: MetricComparison::new(f1.expense, f2.expense),
            profit: MetricComparison::new(f1.net(), f2.net()),
            production: MetricComparison::new(prod1, prod2),
        })
    }

    async fn financial_data(&self, user_id: Uuid, range: DateRange) -> Result<Value, DomainError> {
        let totals = self.repos.transactions.totals(user_id, range).await?;
        let monthly = self.repos.transactions.monthly(user_id, range.start).await?;
        let expenses = self
            .repos
            .transactions
            .by_category(user_id, TransactionType::Expense, range.start)
            .await?;
        Ok(json!({
            "totalIncome": totals.income,
            "totalExpense": totals.expense,
            "netProfit": totals.net(),
            "profitMargin": round1(totals.margin()),
            "pendingPayments": totals.pending,
            "transactionCount": totals.count,
            "monthly": monthly
                .iter()
                .map(|m| json!({"month": m.month, "income": m.income, "expense": m.expense, "profit": m.profit()}))
                .collect::<Vec<_>>(),
            "expenseByCategory": expenses,
        }))
    }

    async fn production_data(&self, user_id: Uuid, range: DateRange) -> Result<Value, DomainError> {
        let stats = self.repos.production.statistics(user_id).await?;
        let in_period = self.repos.production.total_amount(user_id, range).await?;
        let monthly = self
            .repos
            .production
            .monthly_by_category(user_id, range.start)
            .await?;
        Ok(json!({
            "totalProducts": stats.total_products,
            "totalAmount": stats.total_amount,
            "totalValue": stats.total_value,
            "periodAmount": in_period,
            "byCategory": stats.by_category,
            "monthly": monthly,
        }))
    }

    async fn livestock_data(&self, user_id: Uuid) -> Result<Value, DomainError> {
        let stats = self.repos.livestock.statistics(user_id).await?;
        serde_json::to_value(stats).map_err(|e| DomainError::internal(e.to_string()))
    }

    async fn land_data(&self, user_id: Uuid) -> Result<Value, DomainError> {
        let stats = self.repos.lands.statistics(user_id).await?;
        let productivity = self.repos.lands.productivity_analysis(user_id).await?;
        Ok(json!({
            "statistics": stats,
            "productivity": productivity,
        }))
    }
}

/// Percentage change, 100 when growing from zero
pub fn percent_change(from: f64, to: f64) -> f64 {
    if from == 0.0 {
        return if to > 0.0 { 100.0 } else if to < 0.0 { -100.0 } else { 0.0 };
    }
    round1((to - from) / from.abs() * 100.0)
}

fn ratio(part: i64, whole: i64) -> f64 {
    if whole <= 0 {
        0.0
    } else {
        round1(part as f64 / whole as f64 * 100.0)
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
