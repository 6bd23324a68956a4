//! Integration tests for land, livestock and production repositories

mod common;

use agri_core::domain::entities::land::{Land, LandFilter, NewLand, NewLandActivity};
use agri_core::domain::entities::livestock::{
    AnimalFilter, NewAnimal, NewHealthRecord, NewMilkRecord,
};
use agri_core::domain::entities::production::{NewProduction, Production, ProductionFilter};
use agri_core::domain::value_objects::month_range;
use agri_core::errors::DomainError;
use agri_shared::types::Pagination;
use chrono::NaiveDate;
use uuid::Uuid;

use common::{seed_user, setup, TestDb};

fn land(name: &str, area: f64, crop: Option<&str>, status: Option<&str>) -> NewLand {
    NewLand {
        name: Some(name.to_string()),
        area: Some(area),
        unit: Some("decare".to_string()),
        crop: crop.map(str::to_string),
        status: status.map(str::to_string),
        ..Default::default()
    }
}

async fn add_land(db: &TestDb, user_id: Uuid, payload: NewLand) -> Land {
    let land = payload.into_land(user_id).unwrap();
    db.repos.lands.create(land).await.unwrap()
}

async fn add_production(
    db: &TestDb,
    user_id: Uuid,
    land_id: Option<Uuid>,
    category: &str,
    amount: f64,
    price: Option<f64>,
    harvest: &str,
) -> Production {
    let production = NewProduction {
        land_id,
        name: Some(format!("{} harvest", category)),
        category: Some(category.to_string()),
        amount: Some(amount),
        unit: Some("kg".to_string()),
        harvest_date: Some(harvest.to_string()),
        price,
        ..Default::default()
    }
    .into_production(user_id)
    .unwrap();
    db.repos.production.create(production).await.unwrap()
}

#[tokio::test]
async fn test_land_list_filters_and_pagination() {
    let db = setup().await;
    let user = seed_user(&db, "farmer@example.com").await;
    let other = seed_user(&db, "other@example.com").await;

    add_land(&db, user, land("North Field", 10.0, Some("wheat"), None)).await;
    add_land(&db, user, land("South Field", 5.0, Some("corn"), None)).await;
    add_land(&db, user, land("Old Orchard", 2.5, Some("wheat"), Some("fallow"))).await;
    add_land(&db, other, land("Neighbour", 99.0, Some("wheat"), None)).await;

    let all = db
        .repos
        .lands
        .list(user, &LandFilter::default(), Pagination::new(1, 2))
        .await
        .unwrap();
    assert_eq!(all.items.len(), 2);
    assert_eq!(all.pagination.total, 3);
    assert_eq!(all.pagination.total_pages, 2);

    let wheat = LandFilter {
        crop: Some("wheat".to_string()),
        ..Default::default()
    };
    let page = db.repos.lands.list(user, &wheat, Pagination::default()).await.unwrap();
    assert_eq!(page.pagination.total, 2);

    let search = LandFilter {
        search: Some("field".to_string()),
        status: Some("active".to_string()),
        ..Default::default()
    };
    let page = db.repos.lands.list(user, &search, Pagination::default()).await.unwrap();
    assert_eq!(page.pagination.total, 2);
}

#[tokio::test]
async fn test_land_statistics_and_scoping() {
    let db = setup().await;
    let user = seed_user(&db, "farmer@example.com").await;
    let other = seed_user(&db, "other@example.com").await;

    let north = add_land(&db, user, land("North", 10.0, Some("wheat"), None)).await;
    add_land(&db, user, land("South", 5.0, Some("wheat"), Some("fallow"))).await;

    let stats = db.repos.lands.statistics(user).await.unwrap();
    assert_eq!(stats.total_lands, 2);
    assert_eq!(stats.total_area, 15.0);
    assert_eq!(stats.active_lands, 1);
    assert_eq!(stats.crop_distribution.len(), 1);
    assert_eq!(stats.crop_distribution[0].count, 2);

    assert!(db.repos.lands.find_by_id(other, north.id).await.unwrap().is_none());
    assert!(!db.repos.lands.delete(other, north.id).await.unwrap());

    let empty = db.repos.lands.statistics(other).await.unwrap();
    assert_eq!(empty.total_lands, 0);
    assert_eq!(empty.total_area, 0.0);
}

#[tokio::test]
async fn test_land_update_round_trip() {
    let db = setup().await;
    let user = seed_user(&db, "farmer@example.com").await;
    let mut stored = add_land(&db, user, land("North", 10.0, None, None)).await;

    stored.crop = Some("barley".to_string());
    stored.area = 12.5;
    db.repos.lands.update(stored.clone()).await.unwrap();

    let reloaded = db.repos.lands.find_by_id(user, stored.id).await.unwrap().unwrap();
    assert_eq!(reloaded.crop.as_deref(), Some("barley"));
    assert_eq!(reloaded.area, 12.5);
}

#[tokio::test]
async fn test_land_activity_stamps_last_activity() {
    let db = setup().await;
    let user = seed_user(&db, "farmer@example.com").await;
    let field = add_land(&db, user, land("North", 10.0, None, None)).await;
    assert!(field.last_activity.is_none());

    let activity = NewLandActivity {
        activity_type: Some("sowing".to_string()),
        description: Some("Winter wheat".to_string()),
        actual_date: Some("2024-10-15".to_string()),
        cost: Some(1200.0),
        ..Default::default()
    }
    .into_activity(field.id)
    .unwrap();
    db.repos.lands.add_activity(activity).await.unwrap();

    let activities = db.repos.lands.list_activities(field.id).await.unwrap();
    assert_eq!(activities.len(), 1);
    assert_eq!(activities[0].actual_date, NaiveDate::from_ymd_opt(2024, 10, 15));

    let reloaded = db.repos.lands.find_by_id(user, field.id).await.unwrap().unwrap();
    assert!(reloaded.last_activity.is_some());
}

#[tokio::test]
async fn test_productivity_analysis_and_land_delete() {
    let db = setup().await;
    let user = seed_user(&db, "farmer@example.com").await;
    let field = add_land(&db, user, land("North", 10.0, Some("wheat"), None)).await;
    let produced =
        add_production(&db, user, Some(field.id), "grain", 4000.0, Some(8.0), "2024-07-10").await;

    let analysis = db.repos.lands.productivity_analysis(user).await.unwrap();
    assert_eq!(analysis.len(), 1);
    assert_eq!(analysis[0].total_production, 4000.0);
    assert_eq!(analysis[0].yield_per_area, 400.0);

    assert!(db.repos.lands.delete(user, field.id).await.unwrap());
    let orphan = db
        .repos
        .production
        .find_by_id(user, produced.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(orphan.land_id, None);
}

#[tokio::test]
async fn test_livestock_tags_are_unique() {
    let db = setup().await;
    let user = seed_user(&db, "farmer@example.com").await;
    let cow = NewAnimal {
        tag_number: Some("TR-001".to_string()),
        animal_type: Some("cattle".to_string()),
        ..Default::default()
    };

    let created = db
        .repos
        .livestock
        .create(cow.clone().into_animal(user).unwrap())
        .await
        .unwrap();
    assert_eq!(created.health_status, "healthy");
    assert!(db.repos.livestock.tag_exists("TR-001").await.unwrap());

    let duplicate = db.repos.livestock.create(cow.into_animal(user).unwrap()).await;
    assert!(matches!(duplicate, Err(DomainError::Conflict { .. })));
}

#[tokio::test]
async fn test_livestock_statistics_and_search() {
    let db = setup().await;
    let user = seed_user(&db, "farmer@example.com").await;
    for (tag, kind, breed, status, weight) in [
        ("C-1", "cattle", "Holstein", "healthy", 600.0),
        ("C-2", "cattle", "Simmental", "sick", 500.0),
        ("S-1", "sheep", "Merino", "pregnant", 70.0),
    ] {
        let animal = NewAnimal {
            tag_number: Some(tag.to_string()),
            animal_type: Some(kind.to_string()),
            breed: Some(breed.to_string()),
            health_status: Some(status.to_string()),
            weight: Some(weight),
            ..Default::default()
        }
        .into_animal(user)
        .unwrap();
        db.repos.livestock.create(animal).await.unwrap();
    }

    let stats = db.repos.livestock.statistics(user).await.unwrap();
    assert_eq!(stats.total, 3);
    assert_eq!(stats.count_with_status("sick"), 1);
    assert_eq!(stats.average_weight, 390.0);
    assert_eq!(stats.by_type[0].name, "cattle");
    assert_eq!(stats.by_type[0].count, 2);

    let holstein = AnimalFilter {
        search: Some("holst".to_string()),
        ..Default::default()
    };
    let page = db.repos.livestock.list(user, &holstein, Pagination::default()).await.unwrap();
    assert_eq!(page.pagination.total, 1);

    let categories = db.repos.livestock.categories(user).await.unwrap();
    assert_eq!(categories.len(), 2);
}

#[tokio::test]
async fn test_health_and_milk_records() {
    let db = setup().await;
    let user = seed_user(&db, "farmer@example.com").await;
    let cow = NewAnimal {
        tag_number: Some("TR-100".to_string()),
        animal_type: Some("cattle".to_string()),
        ..Default::default()
    }
    .into_animal(user)
    .unwrap();
    let cow = db.repos.livestock.create(cow).await.unwrap();

    let record = NewHealthRecord {
        record_type: Some("vaccination".to_string()),
        description: Some("Foot and mouth".to_string()),
        date: Some("2024-04-01".to_string()),
        next_checkup: Some("2024-10-01".to_string()),
        ..Default::default()
    }
    .into_record(cow.id)
    .unwrap();
    db.repos.livestock.add_health_record(record).await.unwrap();

    for (day, amount) in [("2024-04-01", 21.5), ("2024-04-02", 23.0)] {
        let milk = NewMilkRecord {
            date: Some(day.to_string()),
            amount: Some(amount),
            ..Default::default()
        }
        .into_record(cow.id)
        .unwrap();
        db.repos.livestock.add_milk_record(milk).await.unwrap();
    }

    let health = db.repos.livestock.list_health_records(cow.id).await.unwrap();
    assert_eq!(health.len(), 1);
    assert_eq!(health[0].next_checkup, NaiveDate::from_ymd_opt(2024, 10, 1));

    let milk = db.repos.livestock.list_milk_records(cow.id).await.unwrap();
    assert_eq!(milk.len(), 2);
    assert_eq!(milk[0].amount, 23.0);

    assert!(db.repos.livestock.delete(user, cow.id).await.unwrap());
    assert!(db.repos.livestock.list_milk_records(cow.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_production_statistics_and_months() {
    let db = setup().await;
    let user = seed_user(&db, "farmer@example.com").await;
    add_production(&db, user, None, "grain", 100.0, Some(2.0), "2024-01-15").await;
    add_production(&db, user, None, "grain", 50.0, None, "2024-02-03").await;
    add_production(&db, user, None, "fruit", 30.0, Some(10.0), "2024-02-20").await;

    let stats = db.repos.production.statistics(user).await.unwrap();
    assert_eq!(stats.total_products, 3);
    assert_eq!(stats.total_amount, 180.0);
    assert_eq!(stats.total_value, 500.0);
    assert_eq!(stats.by_category[0].category, "grain");

    let since = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
    let monthly = db.repos.production.monthly_by_category(user, since).await.unwrap();
    assert_eq!(monthly.len(), 2);
    assert!(monthly.iter().all(|m| m.month == "2024-02"));

    let february = db
        .repos
        .production
        .total_amount(user, month_range("2024-02").unwrap())
        .await
        .unwrap();
    assert_eq!(february, 80.0);

    let fruit = ProductionFilter {
        category: Some("fruit".to_string()),
        ..Default::default()
    };
    let page = db.repos.production.list(user, &fruit, Pagination::default()).await.unwrap();
    assert_eq!(page.items.len(), 1);

    let categories = db.repos.production.categories(user).await.unwrap();
    assert_eq!(categories, vec!["fruit", "grain"]);
}
