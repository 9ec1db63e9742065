use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::insights::aggregate::Logged;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    #[default]
    Snack,
}

impl MealType {
    pub fn as_str(self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
            MealType::Snack => "snack",
        }
    }
}

impl std::str::FromStr for MealType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "breakfast" => Ok(MealType::Breakfast),
            "lunch" => Ok(MealType::Lunch),
            "dinner" => Ok(MealType::Dinner),
            "snack" => Ok(MealType::Snack),
            other => Err(format!("unknown meal type: {other}")),
        }
    }
}

/// A logged food item. Entries are never edited, only created or deleted.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FoodEntry {
    pub id: Uuid,
    #[serde(skip)]
    pub user_id: Uuid,
    pub food_name: String,
    pub calories: u32,
    pub meal_type: MealType,
    #[serde(rename = "date", with = "time::serde::rfc3339")]
    pub logged_at: OffsetDateTime,
    #[serde(rename = "hasImage", serialize_with = "serialize_has_image")]
    pub image_key: Option<String>,
}

fn serialize_has_image<S: serde::Serializer>(key: &Option<String>, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_bool(key.is_some())
}

impl FoodEntry {
    pub fn has_image(&self) -> bool {
        self.image_key.is_some()
    }
}

impl Logged for FoodEntry {
    fn logged_at(&self) -> OffsetDateTime {
        self.logged_at
    }

    fn calories(&self) -> u32 {
        self.calories
    }
}

/// Validated entry ready to be stored.
#[derive(Debug, Clone)]
pub struct NewFoodEntry {
    pub id: Uuid,
    pub food_name: String,
    pub calories: u32,
    pub meal_type: MealType,
    pub logged_at: OffsetDateTime,
    pub image_key: Option<String>,
}

impl NewFoodEntry {
    pub fn into_entry(self, user_id: Uuid) -> FoodEntry {
        FoodEntry {
            id: self.id,
            user_id,
            food_name: self.food_name,
            calories: self.calories,
            meal_type: self.meal_type,
            logged_at: self.logged_at,
            image_key: self.image_key,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub struct FoodEntryRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub food_name: String,
    pub calories: i32,
    pub meal_type: String,
    pub logged_at: OffsetDateTime,
    pub image_key: Option<String>,
}

impl TryFrom<FoodEntryRow> for FoodEntry {
    type Error = anyhow::Error;

    fn try_from(r: FoodEntryRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: r.id,
            user_id: r.user_id,
            food_name: r.food_name,
            calories: u32::try_from(r.calories)
                .map_err(|_| anyhow::anyhow!("negative calories on entry {}", r.id))?,
            meal_type: r.meal_type.parse().map_err(anyhow::Error::msg)?,
            logged_at: r.logged_at,
            image_key: r.image_key,
        })
    }
}
