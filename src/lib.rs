//! Bookstore catalog service.
//!
//! Wires the service modules onto the kernel's module registry, applies their
//! migrations and serves them over HTTP.

pub mod modules;

use anyhow::Context;
use sqlx::SqlitePool;

use bookstore_kernel::{settings::Settings, InitCtx, ModuleRegistry};

/// Re-export commonly used types
pub use modules::*;

/// Registry holding every service module over the given pool
pub fn build_registry(pool: &SqlitePool) -> ModuleRegistry {
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, pool);
    registry
}

/// Apply all pending module migrations, returning how many ran
pub async fn apply_migrations(registry: &ModuleRegistry, pool: &SqlitePool) -> anyhow::Result<usize> {
    let migrations = registry.collect_migrations();
    let applied = bookstore_db::migrate(pool, &migrations)
        .await
        .context("failed to apply migrations")?;

    tracing::info!(applied, total = migrations.len(), "migrations complete");
    Ok(applied)
}

/// Connect to the configured database and bring its schema up to date
pub async fn migrate(settings: &Settings) -> anyhow::Result<usize> {
    let pool = bookstore_db::connect(&settings.database)
        .await
        .context("failed to connect to database")?;
    let registry = build_registry(&pool);

    let applied = apply_migrations(&registry, &pool).await?;
    pool.close().await;
    Ok(applied)
}

/// Run the full service lifecycle: init, migrate, start, serve, stop
pub async fn serve(settings: Settings) -> anyhow::Result<()> {
    tracing::info!(
        env = ?settings.environment,
        db = %settings.database.url,
        "bookstore bootstrap starting"
    );

    let pool = bookstore_db::connect(&settings.database)
        .await
        .context("failed to connect to database")?;
    let registry = build_registry(&pool);
    let ctx = InitCtx {
        settings: &settings,
        db: &pool,
    };

    registry.init_modules(&ctx).await?;
    apply_migrations(&registry, &pool).await?;
    registry.start_modules(&ctx).await?;

    tracing::info!("bookstore bootstrap complete");

    let served = bookstore_http::start_server(&registry, &settings).await;

    registry.stop_modules().await?;
    pool.close().await;

    served
}
