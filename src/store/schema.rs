//! Table definitions, applied idempotently at startup.

use sqlx::SqlitePool;

/// Statements run in order on every connect.
///
/// `AUTOINCREMENT` keeps ids monotonic: a deleted row's id is never handed out
/// again. `ON DELETE RESTRICT` makes SQLite refuse to orphan a bike even if a
/// caller bypasses the store's own check.
const SCHEMA: &[&str] = &[
    r#"CREATE TABLE IF NOT EXISTS category (
        id   INTEGER PRIMARY KEY AUTOINCREMENT,
        name VARCHAR(50) NOT NULL CHECK (length(trim(name)) > 0 AND length(name) <= 50)
    )"#,
    r#"CREATE TABLE IF NOT EXISTS bike (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        name        VARCHAR(100) NOT NULL CHECK (length(trim(name)) > 0 AND length(name) <= 100),
        price       REAL    NOT NULL CHECK (price >= 0),
        stock       INTEGER NOT NULL CHECK (stock >= 0),
        category_id INTEGER NOT NULL REFERENCES category (id) ON DELETE RESTRICT
    )"#,
    "CREATE INDEX IF NOT EXISTS bike_category_id ON bike (category_id)",
];

pub(crate) async fn apply(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    Ok(())
}
