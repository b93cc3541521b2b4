//! Weekly activity totals with a week-over-week comparison.

use serde::{Deserialize, Deserializer, Serialize};

/// One day of training. Negative amounts are rejected when deserializing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayActivity {
    pub day: String,
    /// Minutes trained
    #[serde(deserialize_with = "non_negative")]
    pub time: f64,
    /// Kilometres covered
    #[serde(deserialize_with = "non_negative")]
    pub distance: f64,
    /// Average speed in km/h
    #[serde(deserialize_with = "non_negative")]
    pub speed: f64,
}

fn non_negative<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(serde::de::Error::custom(format!(
            "expected a non-negative number, got {}",
            value
        )))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WeekTotals {
    pub total_time: f64,
    pub total_distance: f64,
    /// Mean of the daily speeds; `None` for an empty week.
    pub avg_speed: Option<f64>,
    /// Fastest day; `None` for an empty week.
    pub best_speed: Option<f64>,
    /// Minutes trained compared with the other week (positive = more).
    pub time_diff: f64,
    /// `time_diff` as a percentage of the other week; 0 when that week is empty.
    pub time_diff_pct: f64,
}

pub fn week_totals(week: &[DayActivity], compared_to: &[DayActivity]) -> WeekTotals {
    let total_time: f64 = week.iter().map(|d| d.time).sum();
    let total_distance: f64 = week.iter().map(|d| d.distance).sum();

    let avg_speed =
        (!week.is_empty()).then(|| week.iter().map(|d| d.speed).sum::<f64>() / week.len() as f64);
    let best_speed = week.iter().map(|d| d.speed).reduce(f64::max);

    let previous_time: f64 = compared_to.iter().map(|d| d.time).sum();
    let time_diff = total_time - previous_time;
    let time_diff_pct = if previous_time != 0.0 {
        time_diff / previous_time * 100.0
    } else {
        0.0
    };

    WeekTotals {
        total_time,
        total_distance,
        avg_speed,
        best_speed,
        time_diff,
        time_diff_pct,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(day: &str, time: f64, distance: f64, speed: f64) -> DayActivity {
        DayActivity {
            day: day.to_string(),
            time,
            distance,
            speed,
        }
    }

    #[test]
    fn test_totals_against_previous_week() {
        let this_week = vec![day("Mon", 40.0, 6.0, 9.0), day("Tue", 30.0, 5.0, 10.0)];
        let last_week = vec![day("Mon", 30.0, 4.0, 8.0), day("Tue", 20.0, 3.0, 7.5)];

        let totals = week_totals(&this_week, &last_week);
        assert_eq!(totals.total_time, 70.0);
        assert_eq!(totals.total_distance, 11.0);
        assert_eq!(totals.avg_speed, Some(9.5));
        assert_eq!(totals.best_speed, Some(10.0));
        assert_eq!(totals.time_diff, 20.0);
        assert_eq!(totals.time_diff_pct, 40.0);
    }

    #[test]
    fn test_empty_previous_week_has_zero_pct() {
        let this_week = vec![day("Mon", 40.0, 6.0, 9.0)];
        let totals = week_totals(&this_week, &[]);
        assert_eq!(totals.time_diff, 40.0);
        assert_eq!(totals.time_diff_pct, 0.0);
    }

    #[test]
    fn test_empty_week_has_no_speeds() {
        let totals = week_totals(&[], &[day("Mon", 10.0, 1.0, 6.0)]);
        assert_eq!(totals.avg_speed, None);
        assert_eq!(totals.best_speed, None);
        assert_eq!(totals.time_diff, -10.0);
        assert_eq!(totals.time_diff_pct, -100.0);
    }

    #[test]
    fn test_day_deserialization() {
        let d: DayActivity =
            serde_json::from_str(r#"{"day":"Sat","time":50,"distance":8.3,"speed":11}"#).unwrap();
        assert_eq!(d.time, 50.0);
        assert_eq!(d.speed, 11.0);
    }

    #[test]
    fn test_negative_day_values_are_rejected() {
        let err = serde_json::from_str::<DayActivity>(
            r#"{"day":"Sun","time":-65,"distance":1.0,"speed":5}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("non-negative"));

        assert!(serde_json::from_str::<DayActivity>(
            r#"{"day":"Sun","time":10,"distance":-0.5,"speed":5}"#
        )
        .is_err());
    }
}
