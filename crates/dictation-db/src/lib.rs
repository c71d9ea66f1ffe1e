//! # dictation-db
//!
//! SQLite database layer for the dictation backend.
//!
//! This crate provides:
//! - Connection pool management
//! - Schema migrations (`migrations/` at the workspace root)
//! - The favorites repository behind [`dictation_core::FavoritesRepository`]
//!
//! ## Example
//!
//! ```rust,ignore
//! use dictation_db::Database;
//! use dictation_core::FavoritesRepository;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("sqlite://data.db").await?;
//!     db.migrate().await?;
//!
//!     let favorites = db.favorites.get("alice").await;
//!     println!("alice has {} favorites", favorites.len());
//!     Ok(())
//! }
//! ```
pub mod favorites;
pub mod pool;

// Re-export core types
pub use dictation_core::*;

pub use favorites::{decode_targets, encode_targets, SqliteFavoritesRepository};
pub use pool::{create_pool, create_pool_with_config, PoolConfig};

/// Combined database context with all repositories.
#[derive(Clone)]
pub struct Database {
    /// The underlying connection pool.
    pub pool: sqlx::Pool<sqlx::Sqlite>,
    /// Favorites repository, one record per account.
    pub favorites: SqliteFavoritesRepository,
}

impl Database {
    /// Create a new Database instance from a connection pool.
    pub fn new(pool: sqlx::Pool<sqlx::Sqlite>) -> Self {
        Self {
            favorites: SqliteFavoritesRepository::new(pool.clone()),
            pool,
        }
    }

    /// Create a new Database instance by connecting to the given URL.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = create_pool(url).await?;
        Ok(Self::new(pool))
    }

    /// Create with custom pool configuration.
    pub async fn connect_with_config(url: &str, config: PoolConfig) -> Result<Self> {
        let pool = create_pool_with_config(url, config).await?;
        Ok(Self::new(pool))
    }

    /// Run pending migrations.
    ///
    /// The initial migration uses `CREATE TABLE IF NOT EXISTS`, so databases
    /// created before migrations were tracked are adopted as-is.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| Error::Database(sqlx::Error::Migrate(Box::new(e))))?;
        Ok(())
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &sqlx::Pool<sqlx::Sqlite> {
        &self.pool
    }

    /// Close all pooled connections.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
