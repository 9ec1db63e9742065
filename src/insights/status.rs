use serde::Serialize;

/// Above this share of the goal a day is far above goal.
pub const STATUS_FAR_ABOVE_PCT: f64 = 120.0;
/// Above this share of the goal a day is slightly above goal.
pub const STATUS_ABOVE_PCT: f64 = 100.0;
/// From this share of the goal (inclusive) a day is within goal.
pub const STATUS_WITHIN_MIN_PCT: f64 = 80.0;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum StatusCategory {
    FarAbove,
    Above,
    Within,
    Below,
}

/// Fixed presentation attached to each category.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct StatusDisplay {
    pub color: &'static str,
    pub icon: &'static str,
    pub message: &'static str,
    pub hex: &'static str,
}

impl StatusCategory {
    pub fn display(self) -> StatusDisplay {
        match self {
            StatusCategory::FarAbove => StatusDisplay {
                color: "red",
                icon: "🔴",
                message: "Far above goal",
                hex: "#ef4444",
            },
            StatusCategory::Above => StatusDisplay {
                color: "yellow",
                icon: "🟨",
                message: "Slightly above goal",
                hex: "#eab308",
            },
            StatusCategory::Within => StatusDisplay {
                color: "green",
                icon: "🟩",
                message: "Within goal",
                hex: "#22c55e",
            },
            StatusCategory::Below => StatusDisplay {
                color: "blue",
                icon: "🔵",
                message: "Below goal",
                hex: "#3b82f6",
            },
        }
    }
}

/// Bar color for a chart point; empty days get a lighter blue.
pub const EMPTY_DAY_HEX: &str = "#93c5fd";

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StatusResult {
    pub category: StatusCategory,
    /// Consumed calories as a percentage of the goal.
    pub percentage: f64,
    /// `percentage` capped at 100, for progress bars.
    pub progress: f64,
    pub rounded_percentage: u32,
    pub display: StatusDisplay,
}

pub fn percentage_of_goal(consumed: u32, goal: u32) -> f64 {
    if consumed == 0 {
        return 0.0;
    }
    f64::from(consumed) / f64::from(goal) * 100.0
}

/// Classifies a day's intake against `goal`. `goal` must be positive.
pub fn classify(consumed: u32, goal: u32) -> StatusResult {
    let percentage = percentage_of_goal(consumed, goal);
    let category = if consumed == 0 {
        StatusCategory::Below
    } else if percentage > STATUS_FAR_ABOVE_PCT {
        StatusCategory::FarAbove
    } else if percentage > STATUS_ABOVE_PCT {
        StatusCategory::Above
    } else if percentage >= STATUS_WITHIN_MIN_PCT {
        StatusCategory::Within
    } else {
        StatusCategory::Below
    };

    StatusResult {
        category,
        percentage,
        progress: percentage.min(100.0),
        rounded_percentage: percentage.round() as u32,
        display: category.display(),
    }
}

pub fn chart_color(consumed: u32, goal: u32) -> &'static str {
    if consumed == 0 {
        return EMPTY_DAY_HEX;
    }
    classify(consumed, goal).display.hex
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_below_regardless_of_percentage() {
        let s = classify(0, 2000);
        assert_eq!(s.category, StatusCategory::Below);
        assert_eq!(s.percentage, 0.0);
        assert_eq!(s.display.color, "blue");
    }

    #[test]
    fn boundaries() {
        assert_eq!(classify(2401, 2000).category, StatusCategory::FarAbove);
        assert_eq!(classify(2400, 2000).category, StatusCategory::Above);
        assert_eq!(classify(2001, 2000).category, StatusCategory::Above);
        assert_eq!(classify(2000, 2000).category, StatusCategory::Within);
        assert_eq!(classify(1600, 2000).category, StatusCategory::Within);
        assert_eq!(classify(1599, 2000).category, StatusCategory::Below);
    }

    #[test]
    fn progress_is_capped_and_rounded() {
        let s = classify(3000, 2000);
        assert_eq!(s.percentage, 150.0);
        assert_eq!(s.progress, 100.0);
        assert_eq!(s.rounded_percentage, 150);
        assert_eq!(s.display.message, "Far above goal");

        let s = classify(1234, 2000);
        assert_eq!(s.rounded_percentage, 62);
    }

    #[test]
    fn chart_colors() {
        assert_eq!(chart_color(0, 2000), EMPTY_DAY_HEX);
        assert_eq!(chart_color(100, 2000), "#3b82f6");
        assert_eq!(chart_color(1900, 2000), "#22c55e");
        assert_eq!(chart_color(2200, 2000), "#eab308");
        assert_eq!(chart_color(2500, 2000), "#ef4444");
    }

    #[test]
    fn category_serializes_kebab_case() {
        let json = serde_json::to_value(classify(2500, 2000)).unwrap();
        assert_eq!(json["category"], "far-above");
        assert_eq!(json["display"]["icon"], "🔴");
        assert_eq!(json["roundedPercentage"], 125);
    }
}
