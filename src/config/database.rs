use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use std::env;
use std::time::Duration;

/// Connect to Postgres. Every request here is a handful of short queries
/// (the heaviest path loads one user's tracking history), so the pool
/// defaults stay small and are only raised via env when a deployment
/// actually needs it.
pub async fn get_database() -> Result<DatabaseConnection, DbErr> {
    let database_url = env::var("DATABASE_URL")
        .map_err(|_| DbErr::Custom("DATABASE_URL must be set".to_string()))?;

    let mut options = ConnectOptions::new(database_url);
    options
        .max_connections(env_u32("DB_MAX_CONNECTIONS", 5))
        .min_connections(env_u32("DB_MIN_CONNECTIONS", 1))
        .connect_timeout(Duration::from_secs(10))
        .acquire_timeout(Duration::from_secs(10))
        .idle_timeout(Duration::from_secs(600))
        .sqlx_logging(true);

    Database::connect(options).await
}

fn env_u32(name: &str, default: u32) -> u32 {
    env::var(name)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}
