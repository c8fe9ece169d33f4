use sqlx::SqlitePool;

use bookstore_kernel::Migration;

use crate::DbError;

const LEDGER_DDL: &str = r#"
    CREATE TABLE IF NOT EXISTS _migrations (
        module     TEXT NOT NULL,
        id         TEXT NOT NULL,
        applied_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
        PRIMARY KEY (module, id)
    )
"#;

/// Apply every migration not yet recorded in `_migrations`
///
/// Each migration runs in its own transaction together with its ledger row.
/// Returns how many migrations were applied.
pub async fn migrate(pool: &SqlitePool, migrations: &[(String, Migration)]) -> Result<usize, DbError> {
    sqlx::query(LEDGER_DDL).execute(pool).await?;

    let mut applied = 0;
    for (module, migration) in migrations {
        let already: Option<(String,)> =
            sqlx::query_as("SELECT id FROM _migrations WHERE module = ? AND id = ?")
                .bind(module)
                .bind(migration.id)
                .fetch_optional(pool)
                .await?;

        if already.is_some() {
            tracing::debug!(target: "bookstore-db", %module, id = migration.id, "migration already applied");
            continue;
        }

        let wrap = |source| DbError::Migration {
            module: module.clone(),
            id: migration.id.to_string(),
            source,
        };

        let mut tx = pool.begin().await?;
        sqlx::query(migration.up)
            .execute(&mut *tx)
            .await
            .map_err(wrap)?;
        sqlx::query("INSERT INTO _migrations (module, id) VALUES (?, ?)")
            .bind(module)
            .bind(migration.id)
            .execute(&mut *tx)
            .await
            .map_err(wrap)?;
        tx.commit().await?;

        tracing::info!(target: "bookstore-db", %module, id = migration.id, "applied migration");
        applied += 1;
    }

    Ok(applied)
}
