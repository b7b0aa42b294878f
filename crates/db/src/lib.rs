//! Persistence for projects, tasks, activity entries and users.
//!
//! Callers depend on the [`Store`] trait and receive an implementation
//! explicitly (`Arc<dyn Store>`). [`PgStore`] is the durable backend;
//! [`MemoryStore`] keeps the same semantics in process.

pub mod seed;
pub mod store;

use sqlx::postgres::PgPoolOptions;

pub use store::memory::MemoryStore;
pub use store::postgres::PgStore;
pub use store::{NewUser, Store, StoreError, StoreResult, UserCredentials};

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to verify the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply the embedded migrations in `crates/db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
