use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::entries::repo_types::{FoodEntry, FoodEntryRow, NewFoodEntry};

/// Persistence of a user's food entries.
#[async_trait]
pub trait EntryStore: Send + Sync {
    async fn insert(&self, user_id: Uuid, entry: NewFoodEntry) -> anyhow::Result<FoodEntry>;

    /// Entries logged in `[from, to)`, oldest first.
    async fn list_between(
        &self,
        user_id: Uuid,
        from: OffsetDateTime,
        to: OffsetDateTime,
    ) -> anyhow::Result<Vec<FoodEntry>>;

    async fn find(&self, user_id: Uuid, id: Uuid) -> anyhow::Result<Option<FoodEntry>>;

    /// Removes the entry and returns it, or `None` if the user owns no such entry.
    async fn delete(&self, user_id: Uuid, id: Uuid) -> anyhow::Result<Option<FoodEntry>>;
}

#[derive(Clone)]
pub struct PgEntryStore {
    db: PgPool,
}

impl PgEntryStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

fn convert(rows: Vec<FoodEntryRow>) -> anyhow::Result<Vec<FoodEntry>> {
    rows.into_iter().map(FoodEntry::try_from).collect()
}

#[async_trait]
impl EntryStore for PgEntryStore {
    async fn insert(&self, user_id: Uuid, entry: NewFoodEntry) -> anyhow::Result<FoodEntry> {
        let row = sqlx::query_as::<_, FoodEntryRow>(
            r#"
            INSERT INTO food_entries (id, user_id, food_name, calories, meal_type, logged_at, image_key)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, user_id, food_name, calories, meal_type, logged_at, image_key
            "#,
        )
        .bind(entry.id)
        .bind(user_id)
        .bind(&entry.food_name)
        .bind(i32::try_from(entry.calories).context("calories out of range")?)
        .bind(entry.meal_type.as_str())
        .bind(entry.logged_at)
        .bind(entry.image_key.as_deref())
        .fetch_one(&self.db)
        .await
        .context("insert food entry")?;
        row.try_into()
    }

    async fn list_between(
        &self,
        user_id: Uuid,
        from: OffsetDateTime,
        to: OffsetDateTime,
    ) -> anyhow::Result<Vec<FoodEntry>> {
        let rows = sqlx::query_as::<_, FoodEntryRow>(
            r#"
            SELECT id, user_id, food_name, calories, meal_type, logged_at, image_key
              FROM food_entries
             WHERE user_id = $1
               AND logged_at >= $2
               AND logged_at < $3
             ORDER BY logged_at ASC
            "#,
        )
        .bind(user_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.db)
        .await
        .context("list food entries")?;
        convert(rows)
    }

    async fn find(&self, user_id: Uuid, id: Uuid) -> anyhow::Result<Option<FoodEntry>> {
        let row = sqlx::query_as::<_, FoodEntryRow>(
            r#"
            SELECT id, user_id, food_name, calories, meal_type, logged_at, image_key
              FROM food_entries
             WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.db)
        .await
        .context("find food entry")?;
        row.map(FoodEntry::try_from).transpose()
    }

    async fn delete(&self, user_id: Uuid, id: Uuid) -> anyhow::Result<Option<FoodEntry>> {
        let row = sqlx::query_as::<_, FoodEntryRow>(
            r#"
            DELETE FROM food_entries
             WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, food_name, calories, meal_type, logged_at, image_key
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.db)
        .await
        .context("delete food entry")?;
        row.map(FoodEntry::try_from).transpose()
    }
}
