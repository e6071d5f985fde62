use std::time::Duration;

use sqlx::{mysql::MySqlPoolOptions, MySql, Pool};

use super::environment::Config;

pub type DbPool = Pool<MySql>;

/// Connects the shared pool. Acquisition is bounded so a stalled database
/// cannot hold a request worker indefinitely.
pub async fn init_db(config: &Config) -> Result<DbPool, sqlx::Error> {
    MySqlPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_acquire_timeout_secs))
        .connect(&config.database_url)
        .await
}

pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
