//! Persistence subsystem.
//!
//! # Data Flow
//! ```text
//! handler (validated input)
//!     → Store method
//!     → one SQLite transaction per mutating call
//!         → existence / referential checks
//!         → write
//!         → re-read (bikes joined with their category)
//!     → commit, or roll back on drop
//! ```
//!
//! # Design Decisions
//! - `foreign_keys` is on for every pooled connection; the schema restricts
//!   category deletes while bikes reference them
//! - Ids come from SQLite (`AUTOINCREMENT`), never from clients
//! - No optimistic locking: concurrent updates to one row are last-writer-wins
//! - Write transactions start with `BEGIN IMMEDIATE` and the pool sets a busy
//!   timeout, so concurrent writers queue instead of failing fast

mod bikes;
mod categories;
pub mod error;
mod schema;

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use sqlx::{Sqlite, Transaction};

use crate::config::DatabaseConfig;

pub use error::{StoreError, StoreResult};

/// Handle to the catalog database. Cheap to clone.
#[derive(Debug, Clone)]
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    /// Open (creating if absent) the database file and ensure the tables exist.
    pub async fn connect(config: &DatabaseConfig) -> StoreResult<Self> {
        let options = SqliteConnectOptions::new()
            .filename(&config.path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_millis(config.busy_timeout_ms))
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await?;

        schema::apply(&pool).await?;
        tracing::info!(
            path = %config.path,
            max_connections = config.max_connections,
            "Database ready"
        );

        Ok(Self { pool })
    }

    /// A private in-memory database. Everything is lost when the store is dropped.
    pub async fn in_memory() -> StoreResult<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

        // An in-memory database lives and dies with its connection, so the pool
        // holds exactly one and never recycles it.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        schema::apply(&pool).await?;
        Ok(Self { pool })
    }

    /// Close every pooled connection, waiting for in-flight queries.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Write transaction that takes the database write lock at `BEGIN`, so
    /// concurrent writers queue on the busy timeout.
    async fn begin_write(&self) -> StoreResult<Transaction<'static, Sqlite>> {
        Ok(self.pool.begin_with("BEGIN IMMEDIATE").await?)
    }
}
