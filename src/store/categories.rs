//! Category persistence.

use sqlx::SqliteConnection;

use super::error::is_foreign_key_violation;
use super::{Store, StoreError, StoreResult};
use crate::model::{Category, CategoryChanges, NewCategory};

impl Store {
    pub async fn create_category(&self, new: NewCategory) -> StoreResult<Category> {
        let result = sqlx::query("INSERT INTO category (name) VALUES (?)")
            .bind(&new.name)
            .execute(&self.pool)
            .await?;

        Ok(Category {
            id: result.last_insert_rowid(),
            name: new.name,
        })
    }

    pub async fn get_category(&self, id: i64) -> StoreResult<Category> {
        let mut conn = self.pool.acquire().await?;
        find_category(&mut conn, id).await
    }

    /// All categories in insertion order.
    pub async fn list_categories(&self) -> StoreResult<Vec<Category>> {
        let categories = sqlx::query_as::<_, Category>("SELECT id, name FROM category ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(categories)
    }

    /// Apply the supplied fields; an empty change set returns the row untouched.
    pub async fn update_category(&self, id: i64, changes: CategoryChanges) -> StoreResult<Category> {
        let mut tx = self.begin_write().await?;
        let mut category = find_category(&mut tx, id).await?;

        if let Some(name) = changes.name {
            sqlx::query("UPDATE category SET name = ? WHERE id = ?")
                .bind(&name)
                .bind(id)
                .execute(&mut *tx)
                .await?;
            category.name = name;
        }

        tx.commit().await?;
        Ok(category)
    }

    /// Remove a category. Refused with [`StoreError::CategoryInUse`] while any
    /// bike still references it.
    pub async fn delete_category(&self, id: i64) -> StoreResult<()> {
        let mut tx = self.begin_write().await?;
        find_category(&mut tx, id).await?;

        let bikes = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM bike WHERE category_id = ?")
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;
        if bikes > 0 {
            return Err(StoreError::CategoryInUse { id, bikes });
        }

        sqlx::query("DELETE FROM category WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|err| {
                if is_foreign_key_violation(&err) {
                    StoreError::CategoryInUse { id, bikes: 1 }
                } else {
                    err.into()
                }
            })?;

        tx.commit().await?;
        Ok(())
    }
}

pub(super) async fn find_category(conn: &mut SqliteConnection, id: i64) -> StoreResult<Category> {
    sqlx::query_as::<_, Category>("SELECT id, name FROM category WHERE id = ?")
        .bind(id)
        .fetch_optional(conn)
        .await?
        .ok_or(StoreError::CategoryNotFound(id))
}
