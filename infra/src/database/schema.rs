//! Schema bootstrap
//!
//! Every statement is `IF NOT EXISTS`, so bootstrapping runs at each
//! startup and against every test pool.

use sqlx::SqlitePool;

use crate::InfrastructureError;

const TABLES: &[(&str, &str)] = &[
    (
        "users",
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            email TEXT NOT NULL UNIQUE,
            password TEXT NOT NULL,
            avatar TEXT,
            role TEXT NOT NULL DEFAULT 'farmer',
            farm_name TEXT,
            location TEXT,
            is_verified INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    ),
    (
        "lands",
        r#"
        CREATE TABLE IF NOT EXISTS lands (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            name TEXT NOT NULL,
            area REAL NOT NULL,
            unit TEXT NOT NULL,
            crop TEXT,
            status TEXT NOT NULL DEFAULT 'active',
            last_activity TEXT,
            productivity REAL NOT NULL DEFAULT 0,
            latitude REAL,
            longitude REAL,
            address TEXT,
            soil_type TEXT,
            irrigation_type TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    ),
    (
        "livestock",
        r#"
        CREATE TABLE IF NOT EXISTS livestock (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            tag_number TEXT NOT NULL UNIQUE,
            type TEXT NOT NULL,
            breed TEXT,
            gender TEXT,
            birth_date TEXT,
            weight REAL,
            health_status TEXT NOT NULL DEFAULT 'healthy',
            location TEXT,
            mother TEXT,
            father TEXT,
            notes TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    ),
    (
        "production",
        r#"
        CREATE TABLE IF NOT EXISTS production (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            land_id TEXT REFERENCES lands(id) ON DELETE SET NULL,
            name TEXT NOT NULL,
            category TEXT NOT NULL,
            amount REAL NOT NULL,
            unit TEXT NOT NULL,
            harvest_date TEXT,
            quality TEXT,
            storage_location TEXT,
            status TEXT NOT NULL DEFAULT 'active',
            price REAL,
            notes TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    ),
    (
        "transactions",
        r#"
        CREATE TABLE IF NOT EXISTS transactions (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            type TEXT NOT NULL CHECK (type IN ('income', 'expense')),
            category TEXT NOT NULL,
            description TEXT NOT NULL,
            amount REAL NOT NULL,
            currency TEXT NOT NULL DEFAULT 'TRY',
            date TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'completed',
            payment_method TEXT,
            receipt TEXT,
            notes TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    ),
    (
        "events",
        r#"
        CREATE TABLE IF NOT EXISTS events (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            title TEXT NOT NULL,
            description TEXT,
            type TEXT NOT NULL,
            start_date TEXT NOT NULL,
            end_date TEXT,
            is_all_day INTEGER NOT NULL DEFAULT 0,
            status TEXT NOT NULL DEFAULT 'pending',
            priority TEXT NOT NULL DEFAULT 'medium',
            location TEXT,
            related_entity_type TEXT,
            related_entity_id TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    ),
    (
        "notifications",
        r#"
        CREATE TABLE IF NOT EXISTS notifications (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            title TEXT NOT NULL,
            message TEXT NOT NULL,
            type TEXT NOT NULL,
            priority TEXT NOT NULL DEFAULT 'medium',
            is_read INTEGER NOT NULL DEFAULT 0,
            related_entity_type TEXT,
            related_entity_id TEXT,
            created_at TEXT NOT NULL
        )
        "#,
    ),
    (
        "health_records",
        r#"
        CREATE TABLE IF NOT EXISTS health_records (
            id TEXT PRIMARY KEY,
            livestock_id TEXT NOT NULL REFERENCES livestock(id) ON DELETE CASCADE,
            type TEXT NOT NULL,
            description TEXT NOT NULL,
            date TEXT NOT NULL,
            veterinarian TEXT,
            cost REAL,
            notes TEXT,
            next_checkup TEXT,
            created_at TEXT NOT NULL
        )
        "#,
    ),
    (
        "milk_production",
        r#"
        CREATE TABLE IF NOT EXISTS milk_production (
            id TEXT PRIMARY KEY,
            livestock_id TEXT NOT NULL REFERENCES livestock(id) ON DELETE CASCADE,
            date TEXT NOT NULL,
            amount REAL NOT NULL,
            quality TEXT,
            notes TEXT,
            created_at TEXT NOT NULL
        )
        "#,
    ),
    (
        "land_activities",
        r#"
        CREATE TABLE IF NOT EXISTS land_activities (
            id TEXT PRIMARY KEY,
            land_id TEXT NOT NULL REFERENCES lands(id) ON DELETE CASCADE,
            type TEXT NOT NULL,
            description TEXT NOT NULL,
            scheduled_date TEXT,
            actual_date TEXT,
            notes TEXT,
            cost REAL,
            result TEXT,
            created_at TEXT NOT NULL
        )
        "#,
    ),
];

const INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_lands_user_id ON lands(user_id)",
    "CREATE INDEX IF NOT EXISTS idx_livestock_user_id ON livestock(user_id)",
    "CREATE INDEX IF NOT EXISTS idx_production_user_id ON production(user_id)",
    "CREATE INDEX IF NOT EXISTS idx_production_land_id ON production(land_id)",
    "CREATE INDEX IF NOT EXISTS idx_transactions_user_id ON transactions(user_id)",
    "CREATE INDEX IF NOT EXISTS idx_transactions_date ON transactions(user_id, date)",
    "CREATE INDEX IF NOT EXISTS idx_events_user_id ON events(user_id)",
    "CREATE INDEX IF NOT EXISTS idx_events_start_date ON events(user_id, start_date)",
    "CREATE INDEX IF NOT EXISTS idx_notifications_user_id ON notifications(user_id)",
    "CREATE INDEX IF NOT EXISTS idx_health_records_livestock_id ON health_records(livestock_id)",
    "CREATE INDEX IF NOT EXISTS idx_milk_production_livestock_id ON milk_production(livestock_id)",
    "CREATE INDEX IF NOT EXISTS idx_land_activities_land_id ON land_activities(land_id)",
];

/// Names of the tables created by [`initialize_schema`], in creation order
pub fn table_names() -> impl Iterator<Item = &'static str> {
    TABLES.iter().map(|(name, _)| *name)
}

/// Create all tables and indexes that do not exist yet
pub async fn initialize_schema(pool: &SqlitePool) -> Result<(), InfrastructureError> {
    tracing::info!("Initializing database schema");

    for (name, ddl) in TABLES {
        sqlx::query(ddl).execute(pool).await.map_err(|e| {
            tracing::error!(table = name, "Failed to create table: {}", e);
            InfrastructureError::Schema(format!("table {}: {}", name, e))
        })?;
    }
    for ddl in INDEXES {
        sqlx::query(ddl).execute(pool).await.map_err(|e| {
            tracing::error!("Failed to create index: {}", e);
            InfrastructureError::Schema(e.to_string())
        })?;
    }

    tracing::info!(tables = TABLES.len(), "Database schema ready");
    Ok(())
}
