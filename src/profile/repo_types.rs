use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::insights::goal::Gender;

/// Body metrics and calorie goal captured during onboarding.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub age: u32,
    /// Kilograms.
    pub weight: f64,
    /// Centimetres.
    pub height: f64,
    pub gender: Gender,
    pub daily_calorie_goal: u32,
    pub doctor_deficit_plan: String,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Validated profile fields, ready to be upserted.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileUpdate {
    pub age: u32,
    pub weight: f64,
    pub height: f64,
    pub gender: Gender,
    pub daily_calorie_goal: u32,
    pub doctor_deficit_plan: String,
}

impl ProfileUpdate {
    pub fn into_profile(self, updated_at: OffsetDateTime) -> Profile {
        Profile {
            age: self.age,
            weight: self.weight,
            height: self.height,
            gender: self.gender,
            daily_calorie_goal: self.daily_calorie_goal,
            doctor_deficit_plan: self.doctor_deficit_plan,
            updated_at,
        }
    }
}

#[derive(Debug, FromRow)]
pub struct ProfileRow {
    pub user_id: Uuid,
    pub age: i32,
    pub weight: f64,
    pub height: f64,
    pub gender: String,
    pub daily_calorie_goal: i32,
    pub doctor_deficit_plan: String,
    pub updated_at: OffsetDateTime,
}

impl TryFrom<ProfileRow> for Profile {
    type Error = anyhow::Error;

    fn try_from(r: ProfileRow) -> Result<Self, Self::Error> {
        let bad = |field: &str| anyhow::anyhow!("invalid {field} on profile of {}", r.user_id);
        Ok(Self {
            age: u32::try_from(r.age).map_err(|_| bad("age"))?,
            weight: r.weight,
            height: r.height,
            gender: r.gender.parse().map_err(anyhow::Error::msg)?,
            daily_calorie_goal: u32::try_from(r.daily_calorie_goal)
                .map_err(|_| bad("daily_calorie_goal"))?,
            doctor_deficit_plan: r.doctor_deficit_plan,
            updated_at: r.updated_at,
        })
    }
}
