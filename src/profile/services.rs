use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    insights::goal::{
        clamp_goal, goal_in_range, goal_or_default, suggested_goal, Gender, MAX_DAILY_GOAL,
        MIN_DAILY_GOAL,
    },
    profile::{
        dto::{SuggestedGoalQuery, UpdateProfileRequest},
        repo_types::ProfileUpdate,
    },
    state::AppState,
};

pub const MAX_AGE: u32 = 120;

fn positive(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v > 0.0)
}

/// Checks the onboarding form and resolves the daily goal: the explicit goal
/// when given (must lie in 800..=5000), else the suggestion from the body
/// metrics clamped into that band, else the default.
pub fn validate_update(req: UpdateProfileRequest) -> AppResult<ProfileUpdate> {
    let (Some(age), Some(weight), Some(height)) =
        (positive(req.age), positive(req.weight), positive(req.height))
    else {
        return Err(AppError::Validation("Please fill in all required fields".into()));
    };

    let age = age.round();
    if age < 1.0 || age > f64::from(MAX_AGE) {
        return Err(AppError::Validation(format!(
            "Age must be between 1 and {MAX_AGE}"
        )));
    }
    let age = age as u32;
    let gender = req.gender.unwrap_or_default();

    let explicit = match req.daily_calorie_goal {
        None => None,
        Some(goal) => {
            let goal = goal.round();
            if !goal.is_finite() || goal < 0.0 || !goal_in_range(goal as u32) {
                return Err(AppError::Validation(format!(
                    "Daily calorie goal must be between {MIN_DAILY_GOAL} and {MAX_DAILY_GOAL}"
                )));
            }
            Some(goal as u32)
        }
    };
    let suggested =
        suggested_goal(Some(age), Some(weight), Some(height), gender).map(clamp_goal);

    Ok(ProfileUpdate {
        age,
        weight,
        height,
        gender,
        daily_calorie_goal: goal_or_default(explicit, suggested),
        doctor_deficit_plan: req
            .doctor_deficit_plan
            .map(|p| p.trim().to_string())
            .unwrap_or_default(),
    })
}

fn lenient_number(raw: Option<&str>) -> Option<f64> {
    raw.and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

/// Suggestion for the onboarding form. Missing or malformed metrics give
/// `None`; a fractional age is truncated.
pub fn suggest_from_query(q: &SuggestedGoalQuery) -> Option<u32> {
    let age = lenient_number(q.age.as_deref())
        .map(f64::trunc)
        .filter(|a| *a >= 1.0 && *a <= f64::from(MAX_AGE))
        .map(|a| a as u32);
    let gender = q
        .gender
        .as_deref()
        .and_then(|g| g.trim().parse::<Gender>().ok())
        .unwrap_or_default();
    suggested_goal(
        age,
        lenient_number(q.weight.as_deref()),
        lenient_number(q.height.as_deref()),
        gender,
    )
    .map(clamp_goal)
}

/// Goal the user's days are measured against; the default when no profile
/// exists yet.
pub async fn effective_goal(state: &AppState, user_id: Uuid) -> anyhow::Result<u32> {
    let profile = state.profiles.get(user_id).await?;
    Ok(goal_or_default(profile.map(|p| p.daily_calorie_goal), None))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::insights::goal::Gender;

    fn form(goal: Option<f64>) -> UpdateProfileRequest {
        UpdateProfileRequest {
            age: Some(25.0),
            weight: Some(70.0),
            height: Some(175.0),
            gender: Some(Gender::Male),
            daily_calorie_goal: goal,
            doctor_deficit_plan: Some("  500 kcal deficit  ".into()),
        }
    }

    #[test]
    fn missing_metrics_are_rejected() {
        let mut req = form(None);
        req.height = None;
        let err = validate_update(req).unwrap_err();
        assert_eq!(err.to_string(), "Please fill in all required fields");

        let mut req = form(None);
        req.weight = Some(0.0);
        assert!(matches!(validate_update(req), Err(AppError::Validation(_))));
    }

    #[test]
    fn age_must_be_plausible() {
        let mut req = form(None);
        req.age = Some(130.0);
        assert!(matches!(validate_update(req), Err(AppError::Validation(_))));
    }

    #[test]
    fn goal_falls_back_to_suggestion() {
        let update = validate_update(form(None)).expect("valid");
        assert_eq!(update.daily_calorie_goal, 2009);
        assert_eq!(update.doctor_deficit_plan, "500 kcal deficit");
    }

    #[test]
    fn explicit_goal_is_kept_when_in_range() {
        assert_eq!(
            validate_update(form(Some(1750.0))).unwrap().daily_calorie_goal,
            1750
        );
        assert!(matches!(
            validate_update(form(Some(799.0))),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            validate_update(form(Some(5001.0))),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn stored_suggestion_stays_within_band() {
        let low = UpdateProfileRequest {
            age: Some(90.0),
            weight: Some(35.0),
            height: Some(140.0),
            gender: Some(Gender::Female),
            ..Default::default()
        };
        assert_eq!(validate_update(low).unwrap().daily_calorie_goal, MIN_DAILY_GOAL);

        let high = UpdateProfileRequest {
            age: Some(20.0),
            weight: Some(300.0),
            height: Some(230.0),
            gender: Some(Gender::Male),
            ..Default::default()
        };
        assert_eq!(validate_update(high).unwrap().daily_calorie_goal, MAX_DAILY_GOAL);
    }

    fn query(age: &str, weight: &str, height: &str) -> SuggestedGoalQuery {
        SuggestedGoalQuery {
            age: Some(age.into()),
            weight: Some(weight.into()),
            height: Some(height.into()),
            gender: Some("male".into()),
        }
    }

    #[test]
    fn query_values_are_parsed_leniently() {
        assert_eq!(suggest_from_query(&query("25", "70", "175")), Some(2009));
        assert_eq!(suggest_from_query(&query("25.5", "70", "175")), Some(2009));
        assert_eq!(suggest_from_query(&query(" 25 ", "70.0", "175")), Some(2009));
        assert_eq!(suggest_from_query(&query("abc", "70", "175")), None);
        assert_eq!(suggest_from_query(&query("", "70", "175")), None);
        assert_eq!(suggest_from_query(&query("25", "NaN", "175")), None);
        assert_eq!(suggest_from_query(&SuggestedGoalQuery::default()), None);

        let mut unknown_gender = query("25", "70", "175");
        unknown_gender.gender = Some("robot".into());
        assert_eq!(suggest_from_query(&unknown_gender), Some(1909));
    }

    #[test]
    fn gender_defaults_to_neutral() {
        let mut req = form(None);
        req.gender = None;
        let update = validate_update(req).unwrap();
        assert_eq!(update.gender, Gender::PreferNotToSay);
        assert_eq!(update.daily_calorie_goal, 1909);
    }
}
