//! Bike persistence. Every read joins the owning category for its name.

use sqlx::SqliteConnection;

use super::categories::find_category;
use super::error::is_foreign_key_violation;
use super::{Store, StoreError, StoreResult};
use crate::model::{Bike, BikeChanges, NewBike};

macro_rules! select_bike {
    ($tail:literal) => {
        concat!(
            "SELECT b.id, b.name, b.price, b.stock, b.category_id, c.name AS category_name ",
            "FROM bike b JOIN category c ON c.id = b.category_id ",
            $tail
        )
    };
}

impl Store {
    /// Insert a bike. Fails with [`StoreError::CategoryNotFound`] before writing
    /// anything if `category_id` names no category.
    pub async fn create_bike(&self, new: NewBike) -> StoreResult<Bike> {
        let mut tx = self.begin_write().await?;
        find_category(&mut tx, new.category_id).await?;

        let result = sqlx::query(
            "INSERT INTO bike (name, price, stock, category_id) VALUES (?, ?, ?, ?)",
        )
        .bind(&new.name)
        .bind(new.price)
        .bind(new.stock)
        .bind(new.category_id)
        .execute(&mut *tx)
        .await
        .map_err(|err| referential(err, new.category_id))?;

        let bike = find_bike(&mut tx, result.last_insert_rowid()).await?;
        tx.commit().await?;
        Ok(bike)
    }

    pub async fn get_bike(&self, id: i64) -> StoreResult<Bike> {
        let mut conn = self.pool.acquire().await?;
        find_bike(&mut conn, id).await
    }

    /// All bikes in insertion order.
    pub async fn list_bikes(&self) -> StoreResult<Vec<Bike>> {
        let bikes = sqlx::query_as::<_, Bike>(select_bike!("ORDER BY b.id"))
            .fetch_all(&self.pool)
            .await?;
        Ok(bikes)
    }

    /// Apply the supplied fields. The bike must exist, then a supplied
    /// `category_id` must name an existing category; either miss aborts the
    /// transaction with nothing written.
    pub async fn update_bike(&self, id: i64, changes: BikeChanges) -> StoreResult<Bike> {
        let mut tx = self.begin_write().await?;
        let current = find_bike(&mut tx, id).await?;

        if changes.is_empty() {
            tx.commit().await?;
            return Ok(current);
        }

        if let Some(category_id) = changes.category_id {
            find_category(&mut tx, category_id).await?;
        }

        sqlx::query(
            "UPDATE bike SET \
                name = COALESCE(?, name), \
                price = COALESCE(?, price), \
                stock = COALESCE(?, stock), \
                category_id = COALESCE(?, category_id) \
             WHERE id = ?",
        )
        .bind(changes.name)
        .bind(changes.price)
        .bind(changes.stock)
        .bind(changes.category_id)
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(|err| referential(err, changes.category_id.unwrap_or(current.category_id)))?;

        let bike = find_bike(&mut tx, id).await?;
        tx.commit().await?;
        Ok(bike)
    }

    pub async fn delete_bike(&self, id: i64) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM bike WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::BikeNotFound(id));
        }
        Ok(())
    }
}

async fn find_bike(conn: &mut SqliteConnection, id: i64) -> StoreResult<Bike> {
    sqlx::query_as::<_, Bike>(select_bike!("WHERE b.id = ?"))
        .bind(id)
        .fetch_optional(conn)
        .await?
        .ok_or(StoreError::BikeNotFound(id))
}

/// A foreign key failure on a bike write means the category vanished between
/// the check and the write.
fn referential(err: sqlx::Error, category_id: i64) -> StoreError {
    if is_foreign_key_violation(&err) {
        StoreError::CategoryNotFound(category_id)
    } else {
        err.into()
    }
}
