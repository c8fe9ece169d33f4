pub mod books;

use bookstore_kernel::ModuleRegistry;
use sqlx::SqlitePool;

/// Register every service module with the registry
pub fn register_all(registry: &mut ModuleRegistry, pool: &SqlitePool) {
    registry.register(books::create_module(pool.clone()));
}
