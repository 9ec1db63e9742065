use serde::{Deserialize, Serialize};

use crate::{
    auth::dto::PublicUser,
    insights::goal::Gender,
    profile::repo_types::Profile,
};

/// Onboarding form. Metrics arrive as loosely typed numbers from the client;
/// [`crate::profile::services::validate_update`] turns them into a
/// [`crate::profile::repo_types::ProfileUpdate`].
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub age: Option<f64>,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub height: Option<f64>,
    #[serde(default)]
    pub gender: Option<Gender>,
    #[serde(default)]
    pub daily_calorie_goal: Option<f64>,
    #[serde(default)]
    pub doctor_deficit_plan: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    #[serde(flatten)]
    pub user: PublicUser,
    pub profile: Option<Profile>,
}

/// Raw form values; anything unparseable counts as missing.
#[derive(Debug, Default, Deserialize)]
pub struct SuggestedGoalQuery {
    pub age: Option<String>,
    pub weight: Option<String>,
    pub height: Option<String>,
    pub gender: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestedGoalResponse {
    pub suggested_goal: Option<u32>,
}
