//! Income, expenses and their summaries

use actix_web::{web, HttpResponse};
use agri_core::domain::entities::transaction::{
    NewTransaction, Transaction, TransactionType, TransactionUpdate, EXPENSE_CATEGORIES,
    INCOME_CATEGORIES,
};
use agri_core::domain::value_objects::{months_ago, DateRange, ReportPeriod};
use agri_core::errors::ResourceKind;
use agri_core::services::dashboard::{chart_months, IncomeExpensePoint};
use chrono::{NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::app::AppState;
use crate::dto::query::{MonthsQuery, PeriodQuery, TransactionQuery};
use crate::handlers::{response, ApiResult, OptionExt, ResultExt};
use crate::middleware::{AuthContext, RequestId};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/summary", web::get().to(summary))
        .route("/categories", web::get().to(categories))
        .route("/analysis", web::get().to(analysis))
        .service(
            web::resource("/transactions")
                .route(web::get().to(list_transactions))
                .route(web::post().to(create_transaction)),
        )
        .service(
            web::resource("/transactions/{id}")
                .route(web::get().to(get_transaction))
                .route(web::put().to(update_transaction))
                .route(web::delete().to(delete_transaction)),
        );
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinanceSummary {
    pub period: ReportPeriod,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_income: f64,
    pub total_expense: f64,
    pub net_profit: f64,
    pub profit_margin: f64,
    pub pending_payments: f64,
    pub transaction_count: i64,
}

#[derive(Debug, Serialize)]
pub struct CategoryCatalog {
    pub income: &'static [&'static str],
    pub expense: &'static [&'static str],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseShare {
    pub category: String,
    pub count: i64,
    pub amount: f64,
    pub percentage: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinanceAnalysis {
    pub months: u32,
    pub monthly: Vec<IncomeExpensePoint>,
    pub expense_by_category: Vec<ExpenseShare>,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Totals for the calendar month, quarter or year containing today
pub async fn summary(
    state: web::Data<AppState>,
    auth: AuthContext,
    request_id: RequestId,
    query: web::Query<PeriodQuery>,
) -> ApiResult<HttpResponse> {
    let period: ReportPeriod = query
        .period
        .as_deref()
        .unwrap_or_default()
        .parse()
        .or_api(&request_id)?;
    let range: DateRange = period.range_containing(Utc::now().date_naive());

    let totals = state
        .repos
        .transactions
        .totals(auth.user_id, range)
        .await
        .or_api(&request_id)?;

    Ok(response::ok(
        FinanceSummary {
            period,
            start_date: range.start,
            end_date: range.last_day(),
            total_income: totals.income,
            total_expense: totals.expense,
            net_profit: totals.net(),
            profit_margin: round2(totals.margin()),
            pending_payments: totals.pending,
            transaction_count: totals.count,
        },
        &request_id,
    ))
}

pub async fn categories(request_id: RequestId) -> HttpResponse {
    response::ok(
        CategoryCatalog {
            income: INCOME_CATEGORIES,
            expense: EXPENSE_CATEGORIES,
        },
        &request_id,
    )
}

/// Monthly income and expense plus the expense split by category
pub async fn analysis(
    state: web::Data<AppState>,
    auth: AuthContext,
    request_id: RequestId,
    query: web::Query<MonthsQuery>,
) -> ApiResult<HttpResponse> {
    let today = Utc::now().date_naive();
    let months = chart_months(query.value());

    let monthly = state
        .dashboard
        .income_expense_chart(auth.user_id, today, Some(months))
        .await
        .or_api(&request_id)?;
    let expenses = state
        .repos
        .transactions
        .by_category(auth.user_id, TransactionType::Expense, months_ago(today, months - 1))
        .await
        .or_api(&request_id)?;

    let total: f64 = expenses.iter().map(|c| c.amount).sum();
    let expense_by_category = expenses
        .into_iter()
        .map(|c| ExpenseShare {
            percentage: if total > 0.0 {
                round2(c.amount / total * 100.0)
            } else {
                0.0
            },
            category: c.category,
            count: c.count,
            amount: c.amount,
        })
        .collect();

    Ok(response::ok(
        FinanceAnalysis {
            months,
            monthly,
            expense_by_category,
        },
        &request_id,
    ))
}

async fn owned_transaction(
    state: &AppState,
    auth: &AuthContext,
    id: Uuid,
    request_id: &RequestId,
) -> ApiResult<Transaction> {
    state
        .repos
        .transactions
        .find_by_id(auth.user_id, id)
        .await
        .or_api(request_id)?
        .or_missing(ResourceKind::Transaction, request_id)
}

pub async fn list_transactions(
    state: web::Data<AppState>,
    auth: AuthContext,
    request_id: RequestId,
    query: web::Query<TransactionQuery>,
) -> ApiResult<HttpResponse> {
    let filter = query.filter().or_api(&request_id)?;
    let page = state
        .repos
        .transactions
        .list(auth.user_id, &filter, query.pagination())
        .await
        .or_api(&request_id)?;
    Ok(response::ok(page, &request_id))
}

pub async fn get_transaction(
    state: web::Data<AppState>,
    auth: AuthContext,
    request_id: RequestId,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let transaction = owned_transaction(&state, &auth, path.into_inner(), &request_id).await?;
    Ok(response::ok(transaction, &request_id))
}

pub async fn create_transaction(
    state: web::Data<AppState>,
    auth: AuthContext,
    request_id: RequestId,
    body: web::Json<NewTransaction>,
) -> ApiResult<HttpResponse> {
    let transaction = body
        .into_inner()
        .into_transaction(auth.user_id)
        .or_api(&request_id)?;
    let transaction = state
        .repos
        .transactions
        .create(transaction)
        .await
        .or_api(&request_id)?;

    tracing::info!(
        user_id = %auth.user_id,
        transaction_id = %transaction.id,
        kind = transaction.transaction_type.as_str(),
        "Transaction recorded"
    );
    Ok(response::created(transaction, "Transaction created", &request_id))
}

pub async fn update_transaction(
    state: web::Data<AppState>,
    auth: AuthContext,
    request_id: RequestId,
    path: web::Path<Uuid>,
    body: web::Json<TransactionUpdate>,
) -> ApiResult<HttpResponse> {
    let mut transaction = owned_transaction(&state, &auth, path.into_inner(), &request_id).await?;
    body.into_inner().apply(&mut transaction).or_api(&request_id)?;

    let transaction = state
        .repos
        .transactions
        .update(transaction)
        .await
        .or_api(&request_id)?;
    Ok(response::ok_with_message(transaction, "Transaction updated", &request_id))
}

pub async fn delete_transaction(
    state: web::Data<AppState>,
    auth: AuthContext,
    request_id: RequestId,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let deleted = state
        .repos
        .transactions
        .delete(auth.user_id, path.into_inner())
        .await
        .or_api(&request_id)?;
    deleted.then_some(()).or_missing(ResourceKind::Transaction, &request_id)?;
    Ok(response::message("Transaction deleted", &request_id))
}
