use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::profile::repo_types::{Profile, ProfileRow, ProfileUpdate};

#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn get(&self, user_id: Uuid) -> anyhow::Result<Option<Profile>>;

    /// Creates the profile or replaces every field of the existing one.
    async fn upsert(&self, user_id: Uuid, update: ProfileUpdate) -> anyhow::Result<Profile>;
}

#[derive(Clone)]
pub struct PgProfileStore {
    db: PgPool,
}

impl PgProfileStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProfileStore for PgProfileStore {
    async fn get(&self, user_id: Uuid) -> anyhow::Result<Option<Profile>> {
        let row = sqlx::query_as::<_, ProfileRow>(
            r#"
            SELECT user_id, age, weight, height, gender, daily_calorie_goal,
                   doctor_deficit_plan, updated_at
              FROM profiles
             WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await
        .context("load profile")?;
        row.map(Profile::try_from).transpose()
    }

    async fn upsert(&self, user_id: Uuid, update: ProfileUpdate) -> anyhow::Result<Profile> {
        let row = sqlx::query_as::<_, ProfileRow>(
            r#"
            INSERT INTO profiles (user_id, age, weight, height, gender, daily_calorie_goal,
                                  doctor_deficit_plan, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, now())
            ON CONFLICT (user_id) DO UPDATE
               SET age = EXCLUDED.age,
                   weight = EXCLUDED.weight,
                   height = EXCLUDED.height,
                   gender = EXCLUDED.gender,
                   daily_calorie_goal = EXCLUDED.daily_calorie_goal,
                   doctor_deficit_plan = EXCLUDED.doctor_deficit_plan,
                   updated_at = now()
            RETURNING user_id, age, weight, height, gender, daily_calorie_goal,
                      doctor_deficit_plan, updated_at
            "#,
        )
        .bind(user_id)
        .bind(i32::try_from(update.age).context("age out of range")?)
        .bind(update.weight)
        .bind(update.height)
        .bind(update.gender.as_str())
        .bind(i32::try_from(update.daily_calorie_goal).context("goal out of range")?)
        .bind(&update.doctor_deficit_plan)
        .fetch_one(&self.db)
        .await
        .context("upsert profile")?;
        row.try_into()
    }
}
