use std::str::FromStr;

use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};

/// Categories seeded into an empty store: (name, color)
const DEFAULT_CATEGORIES: [(&str, &str); 3] = [
    ("Work", "#58a6ff"),
    ("Personal", "#3fb950"),
    ("Misc", "#f0883e"),
];

const CREATE_TABLES: &str = r#"
    CREATE TABLE IF NOT EXISTS categories (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE,
        color TEXT NOT NULL DEFAULT '#58a6ff',
        created_at DATETIME DEFAULT CURRENT_TIMESTAMP
    );

    CREATE TABLE IF NOT EXISTS tasks (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL,
        description TEXT DEFAULT '',
        created_date TEXT NOT NULL,
        assigned_date TEXT NOT NULL,
        completed_date TEXT,
        is_completed BOOLEAN DEFAULT FALSE,
        category_id INTEGER,
        created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
        updated_at DATETIME DEFAULT CURRENT_TIMESTAMP,
        FOREIGN KEY (category_id) REFERENCES categories(id) ON DELETE SET NULL
    );
"#;

const CREATE_INDEXES: &str = r#"
    CREATE INDEX IF NOT EXISTS idx_assigned_date ON tasks(assigned_date);
    CREATE INDEX IF NOT EXISTS idx_completed_date ON tasks(completed_date);
    CREATE INDEX IF NOT EXISTS idx_category_id ON tasks(category_id);
"#;

/// Open the single-file store, creating it when missing.
///
/// Foreign keys are not enforced on these connections: a task may point at a
/// category id that does not exist, and category deletion detaches tasks
/// explicitly (see `services::categories::delete_category`).
pub async fn connect(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(false);

    SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
}

/// Create or upgrade the schema and seed default categories. Idempotent.
pub async fn init_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(CREATE_TABLES).execute(pool).await?;

    ensure_category_column(pool).await?;

    sqlx::query(CREATE_INDEXES).execute(pool).await?;

    seed_default_categories(pool).await?;

    Ok(())
}

/// Stores created before categories existed lack `tasks.category_id`.
async fn ensure_category_column(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let columns = sqlx::query("PRAGMA table_info(tasks)").fetch_all(pool).await?;

    let mut has_category_id = false;
    for row in &columns {
        let name: String = row.try_get("name")?;
        if name == "category_id" {
            has_category_id = true;
            break;
        }
    }

    if !has_category_id {
        log::info!("Adding category_id column to tasks");
        sqlx::query(
            "ALTER TABLE tasks ADD COLUMN category_id INTEGER REFERENCES categories(id) ON DELETE SET NULL",
        )
        .execute(pool)
        .await?;
    }

    Ok(())
}

async fn seed_default_categories(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM categories")
        .fetch_one(pool)
        .await?;

    if count > 0 {
        return Ok(());
    }

    let now = Utc::now();
    for (name, color) in DEFAULT_CATEGORIES {
        sqlx::query("INSERT OR IGNORE INTO categories (name, color, created_at) VALUES (?, ?, ?)")
            .bind(name)
            .bind(color)
            .bind(now)
            .execute(pool)
            .await?;
    }

    log::info!("Seeded {} default categories", DEFAULT_CATEGORIES.len());

    Ok(())
}

/// In-memory store with the full schema, for tests.
///
/// A single connection keeps every query on the same in-memory database.
#[cfg(test)]
pub async fn test_pool() -> SqlitePool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .unwrap()
        .foreign_keys(false);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .unwrap();

    init_schema(&pool).await.unwrap();

    pool
}
