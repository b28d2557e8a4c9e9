use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};

pub struct Database {
    pub pool: SqlitePool,
}

impl Database {
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        // An in-memory database must stay on a single connection: every
        // additional pooled connection would open its own empty database.
        let max_connections = if database_url.contains(":memory:") {
            1
        } else {
            10
        };

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        // Append-only audit table; no schema versioning.
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS financial_records (
                id TEXT PRIMARY KEY,
                industry TEXT,
                revenue TEXT,
                profit TEXT,
                risk_level TEXT,
                ai_summary TEXT,
                created_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&pool)
        .await?;

        Ok(Self { pool })
    }
}
