use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::info;

pub async fn create_pool(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    info!("Opening database...");

    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    info!("Database connection established");

    Ok(pool)
}

pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    info!("Running database migrations...");

    // Read and execute migrations in order
    let migrations = [
        include_str!("../../migrations/001_users.sql"),
        include_str!("../../migrations/002_report_gate.sql"),
    ];

    for (i, migration) in migrations.iter().enumerate() {
        info!("Running migration {}", i + 1);
        // Split migration by semicolons and execute each statement
        for statement in migration.split(';') {
            let statement = statement.trim();
            if !statement.is_empty() {
                // Skip if the object already exists (idempotent migrations)
                if let Err(e) = sqlx::query(statement).execute(pool).await {
                    let err_str = e.to_string();
                    if !err_str.contains("already exists") {
                        return Err(e);
                    }
                }
            }
        }
    }

    info!("Migrations completed successfully");
    Ok(())
}
