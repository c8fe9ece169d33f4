//! SQLite connection pool and migration tooling.

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use thiserror::Error;

use bookstore_kernel::settings::DatabaseSettings;

pub mod migrate;

pub use migrate::migrate;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("invalid database url '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("failed to connect to database: {0}")]
    Connect(#[source] sqlx::Error),

    #[error("migration {module}/{id} failed: {source}")]
    Migration {
        module: String,
        id: String,
        #[source]
        source: sqlx::Error,
    },

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

fn is_in_memory(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

/// Open a connection pool for the configured database
///
/// File databases are created when missing. An in-memory database lives only as
/// long as its connection, so it is pinned to one connection that never idles out.
pub async fn connect(settings: &DatabaseSettings) -> Result<SqlitePool, DbError> {
    let options = SqliteConnectOptions::from_str(&settings.url)
        .map_err(|source| DbError::InvalidUrl {
            url: settings.url.clone(),
            source,
        })?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool_options = if is_in_memory(&settings.url) {
        SqlitePoolOptions::new()
            .min_connections(1)
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(settings.max_connections.max(1))
    };

    let pool = pool_options
        .connect_with(options)
        .await
        .map_err(DbError::Connect)?;

    tracing::info!(
        target: "bookstore-db",
        url = %settings.url,
        "database pool ready"
    );

    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_in_memory_urls() {
        assert!(is_in_memory("sqlite::memory:"));
        assert!(is_in_memory("sqlite://file?mode=memory&cache=shared"));
        assert!(!is_in_memory("sqlite://bookstore.db"));
    }

    #[tokio::test]
    async fn in_memory_pool_keeps_state_between_queries() {
        let pool = connect(&DatabaseSettings::in_memory()).await.unwrap();

        sqlx::query("CREATE TABLE t (v INTEGER NOT NULL)")
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query("INSERT INTO t (v) VALUES (7)")
            .execute(&pool)
            .await
            .unwrap();

        let (v,): (i64,) = sqlx::query_as("SELECT v FROM t")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(v, 7);
    }
}
