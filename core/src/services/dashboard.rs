//! Dashboard aggregates assembled from the resource repositories

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::common::ActivityItem;
use crate::domain::entities::transaction::MonthlyFinance;
use crate::domain::value_objects::{months_ago, trailing_months, ReportPeriod};
use crate::errors::DomainResult;
use crate::repositories::Repositories;

pub const DEFAULT_ACTIVITY_LIMIT: u32 = 10;
pub const MAX_ACTIVITY_LIMIT: u32 = 50;
pub const DEFAULT_CHART_MONTHS: u32 = 6;
pub const MAX_CHART_MONTHS: u32 = 24;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimalSummary {
    pub total: i64,
    pub healthy: i64,
    pub sick: i64,
    pub pregnant: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LandSummary {
    pub total: i64,
    pub total_area: f64,
    pub active: i64,
    pub productivity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinanceSummary {
    pub monthly_income: f64,
    pub monthly_expense: f64,
    pub net_profit: f64,
    /// Month-over-month change in income, e.g. `+12.5%`
    pub trend: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummary {
    pub total: i64,
    pub categories: usize,
    pub total_value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub animals: AnimalSummary,
    pub lands: LandSummary,
    pub finance: FinanceSummary,
    pub products: ProductSummary,
}

/// One point of the income/expense chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeExpensePoint {
    pub month: String,
    pub income: f64,
    pub expense: f64,
    pub profit: f64,
}

/// Production amounts of one month keyed by category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductionPoint {
    pub month: String,
    pub total: f64,
    pub categories: BTreeMap<String, f64>,
}

/// Read-only dashboard queries
#[derive(Clone)]
pub struct DashboardService {
    repos: Repositories,
}

impl DashboardService {
    pub fn new(repos: Repositories) -> Self {
        Self { repos }
    }

    pub async fn summary(&self, user_id: Uuid, today: NaiveDate) -> DomainResult<DashboardSummary> {
        let livestock = self.repos.livestock.statistics(user_id).await?;
        let lands = self.repos.lands.statistics(user_id).await?;
        let production = self.repos.production.statistics(user_id).await?;

        let this_month = ReportPeriod::Month.range_containing(today);
        let last_month = ReportPeriod::Month.range_containing(months_ago(today, 1));
        let current = self.repos.transactions.totals(user_id, this_month).await?;
        let previous = self.repos.transactions.totals(user_id, last_month).await?;

        Ok(DashboardSummary {
            animals: AnimalSummary {
                total: livestock.total,
                healthy: livestock.count_with_status("healthy"),
                sick: livestock.count_with_status("sick"),
                pregnant: livestock.count_with_status("pregnant"),
            },
            lands: LandSummary {
                total: lands.total_lands,
                total_area: lands.total_area,
                active: lands.active_lands,
                productivity: lands.average_productivity,
            },
            finance: FinanceSummary {
                monthly_income: current.income,
                monthly_expense: current.expense,
                net_profit: current.net(),
                trend: income_trend(current.income, previous.income),
            },
            products: ProductSummary {
                total: production.total_products,
                categories: production.by_category.len(),
                total_value: production.total_value,
            },
        })
    }

    /// Newest entries across livestock, production, transactions and events
    pub async fn recent_activities(
        &self,
        user_id: Uuid,
        limit: Option<u32>,
    ) -> DomainResult<Vec<ActivityItem>> {
        let limit = activity_limit(limit);
        let per_source = limit as i64;

        let mut items = self.repos.livestock.recent_activity(user_id, per_source).await?;
        items.extend(self.repos.production.recent_activity(user_id, per_source).await?);
        items.extend(self.repos.transactions.recent_activity(user_id, per_source).await?);
        items.extend(self.repos.events.recent_activity(user_id, per_source).await?);

        items.sort_by(|a, b| b.date.cmp(&a.date));
        items.truncate(limit as usize);
        Ok(items)
    }

    /// Monthly income and expense for the trailing `months`, empty months included
    pub async fn income_expense_chart(
        &self,
        user_id: Uuid,
        today: NaiveDate,
        months: Option<u32>,
    ) -> DomainResult<Vec<IncomeExpensePoint>> {
        let months = chart_months(months);
        let since = months_ago(today, months - 1);
        let rows = self.repos.transactions.monthly(user_id, since).await?;
        Ok(fill_months(trailing_months(today, months), rows))
    }

    /// Monthly production amount per category for the trailing `months`
    pub async fn production_chart(
        &self,
        user_id: Uuid,
        today: NaiveDate,
        months: Option<u32>,
    ) -> DomainResult<Vec<ProductionPoint>> {
        let months = chart_months(months);
        let since = months_ago(today, months - 1);
        let rows = self
            .repos
            .production
            .monthly_by_category(user_id, since)
            .await?;

        let mut points: Vec<ProductionPoint> = trailing_months(today, months)
            .into_iter()
            .map(|month| ProductionPoint {
                month,
                total: 0.0,
                categories: BTreeMap::new(),
            })
            .collect();
        for row in rows {
            if let Some(point) = points.iter_mut().find(|p| p.month == row.month) {
                point.total += row.amount;
                *point.categories.entry(row.category).or_insert(0.0) += row.amount;
            }
        }
        Ok(points)
    }
}

pub fn activity_limit(limit: Option<u32>) -> u32 {
    match limit {
        None | Some(0) => DEFAULT_ACTIVITY_LIMIT,
        Some(n) => n.min(MAX_ACTIVITY_LIMIT),
    }
}

pub fn chart_months(months: Option<u32>) -> u32 {
    months
        .unwrap_or(DEFAULT_CHART_MONTHS)
        .clamp(1, MAX_CHART_MONTHS)
}

/// Signed percentage change of income against the previous month
pub fn income_trend(current: f64, previous: f64) -> String {
    let change = if previous > 0.0 {
        (current - previous) / previous * 100.0
    } else if current > 0.0 {
        100.0
    } else {
        0.0
    };
    format!("{:+.1}%", change)
}

fn fill_months(keys: Vec<String>, rows: Vec<MonthlyFinance>) -> Vec<IncomeExpensePoint> {
    keys.into_iter()
        .map(|month| {
            let row = rows
                .iter()
                .find(|r| r.month == month)
                .cloned()
                .unwrap_or_else(|| MonthlyFinance::empty(month.clone()));
            IncomeExpensePoint {
                profit: row.profit(),
                month,
                income: row.income,
                expense: row.expense,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_income_trend_formatting() {
        assert_eq!(income_trend(1125.0, 1000.0), "+12.5%");
        assert_eq!(income_trend(500.0, 1000.0), "-50.0%");
        assert_eq!(income_trend(0.0, 0.0), "+0.0%");
        assert_eq!(income_trend(10.0, 0.0), "+100.0%");
    }

    #[test]
    fn test_limits() {
        assert_eq!(activity_limit(None), 10);
        assert_eq!(activity_limit(Some(0)), 10);
        assert_eq!(activity_limit(Some(25)), 25);
        assert_eq!(activity_limit(Some(500)), 50);
        assert_eq!(chart_months(None), 6);
        assert_eq!(chart_months(Some(0)), 1);
        assert_eq!(chart_months(Some(36)), 24);
    }

    #[test]
    fn test_fill_months_inserts_empty_months() {
        let keys = vec!["2024-01".to_string(), "2024-02".to_string(), "2024-03".to_string()];
        let rows = vec![MonthlyFinance {
            month: "2024-02".to_string(),
            income: 300.0,
            expense: 100.0,
        }];
        let points = fill_months(keys, rows);

        assert_eq!(points.len(), 3);
        assert_eq!(points[0].income, 0.0);
        assert_eq!(points[1].profit, 200.0);
        assert_eq!(points[2].month, "2024-03");
    }
}
