//! Integration tests for transaction, event and notification repositories

mod common;

use agri_core::domain::entities::event::{EventFilter, EventStatus, NewEvent};
use agri_core::domain::entities::notification::{Notification, NotificationFilter};
use agri_core::domain::entities::transaction::{
    NewTransaction, TransactionFilter, TransactionType,
};
use agri_core::domain::value_objects::month_range;
use agri_shared::types::Pagination;
use chrono::{Duration, NaiveDate, SecondsFormat, TimeZone, Utc};
use uuid::Uuid;

use common::{seed_user, setup, TestDb};

async fn add_transaction(
    db: &TestDb,
    user_id: Uuid,
    kind: &str,
    category: &str,
    amount: f64,
    date: &str,
    status: Option<&str>,
) {
    let transaction = NewTransaction {
        transaction_type: Some(kind.to_string()),
        category: Some(category.to_string()),
        description: Some(format!("{} {}", kind, category)),
        amount: Some(amount),
        date: Some(date.to_string()),
        status: status.map(str::to_string),
        ..Default::default()
    }
    .into_transaction(user_id)
    .unwrap();
    db.repos.transactions.create(transaction).await.unwrap();
}

async fn seed_finances(db: &TestDb, user_id: Uuid) {
    add_transaction(db, user_id, "income", "crop_sales", 5000.0, "2024-03-05", None).await;
    add_transaction(db, user_id, "expense", "seed", 800.0, "2024-03-10", None).await;
    add_transaction(db, user_id, "expense", "fuel", 200.0, "2024-03-28", Some("pending")).await;
    add_transaction(db, user_id, "income", "dairy_sales", 1200.0, "2024-04-02", None).await;
    add_transaction(db, user_id, "expense", "seed", 300.0, "2024-04-15", None).await;
}

#[tokio::test]
async fn test_transaction_totals_within_month() {
    let db = setup().await;
    let user = seed_user(&db, "farmer@example.com").await;
    seed_finances(&db, user).await;

    let march = db
        .repos
        .transactions
        .totals(user, month_range("2024-03").unwrap())
        .await
        .unwrap();
    assert_eq!(march.income, 5000.0);
    assert_eq!(march.expense, 1000.0);
    assert_eq!(march.pending, 200.0);
    assert_eq!(march.count, 3);
    assert_eq!(march.net(), 4000.0);

    let empty = db
        .repos
        .transactions
        .totals(user, month_range("2023-01").unwrap())
        .await
        .unwrap();
    assert_eq!(empty.count, 0);
    assert_eq!(empty.margin(), 0.0);
}

#[tokio::test]
async fn test_transaction_monthly_and_categories() {
    let db = setup().await;
    let user = seed_user(&db, "farmer@example.com").await;
    seed_finances(&db, user).await;

    let since = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let monthly = db.repos.transactions.monthly(user, since).await.unwrap();
    assert_eq!(monthly.len(), 2);
    assert_eq!(monthly[0].month, "2024-03");
    assert_eq!(monthly[0].profit(), 4000.0);
    assert_eq!(monthly[1].month, "2024-04");
    assert_eq!(monthly[1].income, 1200.0);

    let expenses = db
        .repos
        .transactions
        .by_category(user, TransactionType::Expense, since)
        .await
        .unwrap();
    assert_eq!(expenses[0].category, "seed");
    assert_eq!(expenses[0].count, 2);
    assert_eq!(expenses[0].amount, 1100.0);
    assert_eq!(expenses[1].category, "fuel");
}

#[tokio::test]
async fn test_transaction_filters() {
    let db = setup().await;
    let user = seed_user(&db, "farmer@example.com").await;
    let other = seed_user(&db, "other@example.com").await;
    seed_finances(&db, user).await;
    add_transaction(&db, other, "income", "subsidy", 999.0, "2024-03-01", None).await;

    let income = TransactionFilter {
        transaction_type: Some(TransactionType::Income),
        ..Default::default()
    };
    let page = db
        .repos
        .transactions
        .list(user, &income, Pagination::default())
        .await
        .unwrap();
    assert_eq!(page.pagination.total, 2);
    assert_eq!(page.items[0].category, "dairy_sales");

    let april = TransactionFilter {
        start_date: NaiveDate::from_ymd_opt(2024, 4, 1),
        end_date: NaiveDate::from_ymd_opt(2024, 4, 30),
        ..Default::default()
    };
    let page = db
        .repos
        .transactions
        .list(user, &april, Pagination::default())
        .await
        .unwrap();
    assert_eq!(page.pagination.total, 2);

    let pending = TransactionFilter {
        status: Some("pending".to_string()),
        ..Default::default()
    };
    let page = db
        .repos
        .transactions
        .list(user, &pending, Pagination::default())
        .await
        .unwrap();
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].amount, 200.0);
}

fn event(title: &str, start: chrono::DateTime<Utc>, status: Option<&str>) -> NewEvent {
    NewEvent {
        title: Some(title.to_string()),
        event_type: Some("task".to_string()),
        start_date: Some(start.to_rfc3339_opts(SecondsFormat::Secs, true)),
        status: status.map(str::to_string),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_event_statistics_relative_to_now() {
    let db = setup().await;
    let user = seed_user(&db, "farmer@example.com").await;
    let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();

    for payload in [
        event("Late spraying", now - Duration::days(2), None),
        event("Vet visit", now + Duration::days(3), None),
        event("Harvest", now + Duration::days(20), None),
        event("Sowing", now - Duration::days(10), Some("completed")),
    ] {
        let event = payload.into_event(user).unwrap();
        db.repos.events.create(event).await.unwrap();
    }

    let stats = db.repos.events.statistics(user, now).await.unwrap();
    assert_eq!(stats.total, 4);
    assert_eq!(stats.pending, 3);
    assert_eq!(stats.completed, 1);
    assert_eq!(stats.overdue, 1);
    assert_eq!(stats.upcoming, 1);
    assert_eq!(stats.by_type[0].name, "task");
    assert_eq!(stats.by_type[0].count, 4);
}

#[tokio::test]
async fn test_event_status_update_and_filters() {
    let db = setup().await;
    let user = seed_user(&db, "farmer@example.com").await;
    let other = seed_user(&db, "other@example.com").await;
    let start = Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap();
    let created = db
        .repos
        .events
        .create(event("Irrigation", start, None).into_event(user).unwrap())
        .await
        .unwrap();
    assert_eq!(created.status, EventStatus::Pending);

    let foreign = db
        .repos
        .events
        .update_status(other, created.id, EventStatus::Completed)
        .await
        .unwrap();
    assert!(foreign.is_none());

    let updated = db
        .repos
        .events
        .update_status(user, created.id, EventStatus::Completed)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.status, EventStatus::Completed);
    assert_eq!(updated.start_date, start);

    let completed = EventFilter {
        status: Some(EventStatus::Completed),
        ..Default::default()
    };
    let page = db
        .repos
        .events
        .list(user, &completed, Pagination::default())
        .await
        .unwrap();
    assert_eq!(page.pagination.total, 1);

    assert!(db.repos.events.delete(user, created.id).await.unwrap());
    assert!(db.repos.events.find_by_id(user, created.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_notifications_read_state() {
    let db = setup().await;
    let user = seed_user(&db, "farmer@example.com").await;
    let other = seed_user(&db, "other@example.com").await;

    let first = db
        .repos
        .notifications
        .create(Notification::new(user, "weather", "Frost warning", "Cover seedlings"))
        .await
        .unwrap();
    for title in ["Vet visit due", "Low feed stock"] {
        db.repos
            .notifications
            .create(Notification::new(user, "reminder", title, "Check the calendar").with_priority("high"))
            .await
            .unwrap();
    }
    assert_eq!(db.repos.notifications.unread_count(user).await.unwrap(), 3);

    assert!(!db.repos.notifications.mark_read(other, first.id).await.unwrap());
    assert!(db.repos.notifications.mark_read(user, first.id).await.unwrap());
    assert_eq!(db.repos.notifications.unread_count(user).await.unwrap(), 2);

    let unread = NotificationFilter {
        is_read: Some(false),
        ..Default::default()
    };
    let page = db
        .repos
        .notifications
        .list(user, &unread, Pagination::default())
        .await
        .unwrap();
    assert_eq!(page.pagination.total, 2);
    assert!(page.items.iter().all(|n| n.priority == "high"));

    assert_eq!(db.repos.notifications.mark_all_read(user).await.unwrap(), 2);
    assert_eq!(db.repos.notifications.unread_count(user).await.unwrap(), 0);
    assert!(db.repos.notifications.delete(user, first.id).await.unwrap());
}
