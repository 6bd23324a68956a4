//! Validation rules of resource payloads

use chrono::{Datelike, NaiveDate};
use uuid::Uuid;

use crate::domain::entities::*;
use crate::errors::ValidationError;

#[test]
fn test_new_land_requires_name_area_unit() {
    let err = NewLand::default().into_land(Uuid::new_v4()).unwrap_err();
    assert_eq!(
        err,
        ValidationError::missing_fields(["name", "unit", "area"])
    );

    let err = NewLand {
        name: Some("North field".into()),
        unit: Some("decare".into()),
        area: Some(0.0),
        ..Default::default()
    }
    .into_land(Uuid::new_v4())
    .unwrap_err();
    assert_eq!(err, ValidationError::missing_fields(["area"]));
}

#[test]
fn test_new_land_defaults() {
    let land = NewLand {
        name: Some(" North field ".into()),
        unit: Some("decare".into()),
        area: Some(12.5),
        crop: Some("".into()),
        ..Default::default()
    }
    .into_land(Uuid::new_v4())
    .unwrap();

    assert_eq!(land.name, "North field");
    assert_eq!(land.status, "active");
    assert_eq!(land.productivity, 0.0);
    assert!(land.crop.is_none());
}

#[test]
fn test_land_update_rejects_non_positive_area() {
    let mut land = NewLand {
        name: Some("Plot".into()),
        unit: Some("ha".into()),
        area: Some(3.0),
        ..Default::default()
    }
    .into_land(Uuid::new_v4())
    .unwrap();

    let err = LandUpdate {
        area: Some(-1.0),
        ..Default::default()
    }
    .apply(&mut land);
    assert!(err.is_err());
    assert_eq!(land.area, 3.0);

    LandUpdate {
        crop: Some("wheat".into()),
        ..Default::default()
    }
    .apply(&mut land)
    .unwrap();
    assert_eq!(land.crop.as_deref(), Some("wheat"));
}

#[test]
fn test_new_animal_requires_tag_and_type() {
    let err = NewAnimal {
        animal_type: Some("cattle".into()),
        ..Default::default()
    }
    .into_animal(Uuid::new_v4())
    .unwrap_err();
    assert_eq!(err, ValidationError::missing_fields(["tagNumber"]));

    let animal = NewAnimal {
        tag_number: Some("TR-001".into()),
        animal_type: Some("cattle".into()),
        birth_date: Some("2022-04-01".into()),
        ..Default::default()
    }
    .into_animal(Uuid::new_v4())
    .unwrap();
    assert_eq!(animal.health_status, "healthy");
    assert_eq!(animal.birth_date.unwrap().year(), 2022);
}

#[test]
fn test_bad_birth_date_is_invalid_date() {
    let err = NewAnimal {
        tag_number: Some("TR-002".into()),
        animal_type: Some("sheep".into()),
        birth_date: Some("yesterday".into()),
        ..Default::default()
    }
    .into_animal(Uuid::new_v4())
    .unwrap_err();
    assert!(matches!(err, ValidationError::InvalidDate { .. }));
}

#[test]
fn test_milk_record_requires_positive_amount() {
    let err = NewMilkRecord {
        date: Some("2024-05-01".into()),
        amount: Some(0.0),
        ..Default::default()
    }
    .into_record(Uuid::new_v4())
    .unwrap_err();
    assert_eq!(err, ValidationError::missing_fields(["amount"]));
}

#[test]
fn test_transaction_type_is_validated() {
    let payload = NewTransaction {
        transaction_type: Some("gift".into()),
        category: Some("seed".into()),
        description: Some("Wheat seed".into()),
        amount: Some(250.0),
        date: Some("2024-03-01".into()),
        ..Default::default()
    };
    let err = payload.into_transaction(Uuid::new_v4()).unwrap_err();
    assert!(matches!(err, ValidationError::InvalidType { .. }));
}

#[test]
fn test_transaction_defaults() {
    let tx = NewTransaction {
        transaction_type: Some("Expense".into()),
        category: Some("seed".into()),
        description: Some("Wheat seed".into()),
        amount: Some(250.0),
        date: Some("2024-03-01T08:00:00Z".into()),
        ..Default::default()
    }
    .into_transaction(Uuid::new_v4())
    .unwrap();

    assert_eq!(tx.transaction_type, TransactionType::Expense);
    assert_eq!(tx.currency, "TRY");
    assert_eq!(tx.status, "completed");
    assert_eq!(tx.date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
}

#[test]
fn test_finance_totals_margin() {
    let totals = FinanceTotals {
        income: 1000.0,
        expense: 750.0,
        pending: 0.0,
        count: 2,
    };
    assert_eq!(totals.net(), 250.0);
    assert_eq!(totals.margin(), 25.0);
    assert_eq!(FinanceTotals::default().margin(), 0.0);
}

#[test]
fn test_event_status_parsing() {
    assert_eq!("in_progress".parse::<EventStatus>().unwrap(), EventStatus::InProgress);
    assert!(matches!(
        "done".parse::<EventStatus>(),
        Err(ValidationError::InvalidStatus { .. })
    ));
    assert!(EventStatus::Pending.is_open());
    assert!(!EventStatus::Cancelled.is_open());
}

#[test]
fn test_new_event_requires_start_date() {
    let err = NewEvent {
        title: Some("Vaccination".into()),
        event_type: Some("health".into()),
        ..Default::default()
    }
    .into_event(Uuid::new_v4())
    .unwrap_err();
    assert_eq!(err, ValidationError::missing_fields(["startDate"]));
}

#[test]
fn test_production_value() {
    let production = NewProduction {
        name: Some("Wheat".into()),
        category: Some("grain".into()),
        amount: Some(10.0),
        unit: Some("ton".into()),
        price: Some(8500.0),
        ..Default::default()
    }
    .into_production(Uuid::new_v4())
    .unwrap();
    assert_eq!(production.value(), 85_000.0);
    assert_eq!(production.status, "active");
}

#[test]
fn test_land_productivity_yield() {
    let land = NewLand {
        name: Some("Plot".into()),
        unit: Some("ha".into()),
        area: Some(4.0),
        ..Default::default()
    }
    .into_land(Uuid::new_v4())
    .unwrap();
    let analysis = LandProductivity::new(&land, 10.0);
    assert_eq!(analysis.yield_per_area, 2.5);
}

#[test]
fn test_bare_end_date_covers_the_whole_day() {
    use crate::domain::entities::common::optional_period_end;
    use chrono::Timelike;

    let end = optional_period_end("endDate", Some("2024-03-15")).unwrap().unwrap();
    assert_eq!(end.date_naive(), NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
    assert_eq!((end.hour(), end.minute(), end.second()), (23, 59, 59));

    let exact = optional_period_end("endDate", Some("2024-03-15T10:00:00Z")).unwrap().unwrap();
    assert_eq!(exact.hour(), 10);

    assert!(optional_period_end("endDate", Some("   ")).unwrap().is_none());
    assert!(matches!(
        optional_period_end("endDate", Some("15.03.2024")),
        Err(ValidationError::InvalidDate { .. })
    ));
}
