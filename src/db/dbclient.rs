use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::error::Result;

pub struct DBClient {
    pool: SqlitePool,
}

impl DBClient {
    /// Connects to `db_url` and brings the schema up to date.
    pub async fn new(db_url: &str, max_connections: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(db_url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        let client = Self { pool };
        client.migrate().await?;
        Ok(client)
    }

    /// Ephemeral store for tests. Pinned to a single connection that is never recycled, since
    /// every SQLite in-memory connection opens its own empty database.
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        let client = Self { pool };
        client.migrate().await?;
        Ok(client)
    }

    async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    pub fn conn(&self) -> &SqlitePool {
        &self.pool
    }
}
