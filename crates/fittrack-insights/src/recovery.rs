//! Recovery recommendations from sleep and fatigue logs.

use serde::{Deserialize, Serialize};

/// One day of the recovery log. Fatigue is on a 0-10 scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecoveryDay {
    pub day: String,
    pub sleep_hours: f64,
    #[serde(default)]
    pub rest_day: bool,
    pub fatigue_level: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    Prioritize,
    Monitor,
    Excellent,
}

impl Recommendation {
    pub fn message(&self) -> &'static str {
        match self {
            Self::Prioritize => "Prioritize recovery!",
            Self::Monitor => "Keep monitoring.",
            Self::Excellent => "Excellent recovery!",
        }
    }
}

/// Heavy fatigue or short sleep always wins over the "excellent" band.
pub fn recommendation(fatigue: f64, sleep_hours: f64) -> Recommendation {
    if fatigue >= 7.0 || sleep_hours < 6.0 {
        Recommendation::Prioritize
    } else if fatigue <= 3.0 && sleep_hours >= 8.0 {
        Recommendation::Excellent
    } else {
        Recommendation::Monitor
    }
}

/// Tips shown alongside a rough-streak alert.
pub const RECOVERY_TIPS: &[&str] = &[
    "Try guided meditation or breathing exercises.",
    "Stay hydrated throughout the day.",
    "Take a walk outdoors to refresh mentally.",
    "Avoid screens before bedtime for better sleep.",
    "Eat nutritious meals rich in protein and antioxidants.",
];

/// True once two consecutive days had under 6 hours of sleep, or two
/// consecutive days had fatigue above 7.
pub fn rough_streak(days: &[RecoveryDay]) -> bool {
    let mut sleep_streak = 0;
    let mut fatigue_streak = 0;

    for d in days {
        sleep_streak = if d.sleep_hours < 6.0 { sleep_streak + 1 } else { 0 };
        fatigue_streak = if d.fatigue_level > 7.0 { fatigue_streak + 1 } else { 0 };

        if sleep_streak >= 2 || fatigue_streak >= 2 {
            tracing::debug!("Rough recovery streak ending {}", d.day);
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(name: &str, sleep: f64, fatigue: f64) -> RecoveryDay {
        RecoveryDay {
            day: name.to_string(),
            sleep_hours: sleep,
            rest_day: false,
            fatigue_level: fatigue,
        }
    }

    #[test]
    fn test_recommendation_bands() {
        assert_eq!(recommendation(7.0, 9.0), Recommendation::Prioritize);
        assert_eq!(recommendation(2.0, 5.5), Recommendation::Prioritize);
        assert_eq!(recommendation(3.0, 8.0), Recommendation::Excellent);
        assert_eq!(recommendation(4.0, 8.0), Recommendation::Monitor);
        assert_eq!(recommendation(2.0, 7.0), Recommendation::Monitor);
    }

    #[test]
    fn test_two_short_nights_in_a_row() {
        let days = vec![day("Mon", 5.0, 2.0), day("Tue", 5.5, 2.0), day("Wed", 8.0, 2.0)];
        assert!(rough_streak(&days));
    }

    #[test]
    fn test_non_consecutive_short_nights() {
        let days = vec![day("Mon", 5.0, 2.0), day("Tue", 7.0, 2.0), day("Wed", 5.0, 2.0)];
        assert!(!rough_streak(&days));
    }

    #[test]
    fn test_fatigue_streak_is_strictly_above_seven() {
        let at_seven = vec![day("Mon", 8.0, 7.0), day("Tue", 8.0, 7.0)];
        assert!(!rough_streak(&at_seven));

        let above = vec![day("Mon", 8.0, 8.0), day("Tue", 8.0, 9.0)];
        assert!(rough_streak(&above));
    }

    #[test]
    fn test_empty_log_has_no_streak() {
        assert!(!rough_streak(&[]));
    }

    #[test]
    fn test_day_deserialization() {
        let d: RecoveryDay =
            serde_json::from_str(r#"{"day":"Mon","sleepHours":6.5,"fatigueLevel":4}"#).unwrap();
        assert_eq!(d.sleep_hours, 6.5);
        assert!(!d.rest_day);
    }
}
