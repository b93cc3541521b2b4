//! Display formatting for sessions and weather.
//!
//! Every function takes the caller's [`UnitSettings`] explicitly. Times are
//! rendered in UTC.

use fittrack_core::{DistanceUnit, TimeUnit, UnitSettings};

use crate::time::parse_timestamp;
use crate::types::{Session, WeatherObservation, WeatherStats};

/// Shown wherever a value is unknown.
pub const PLACEHOLDER: &str = "—";

const KM_PER_MILE: f64 = 1.609_344;

pub fn format_distance(km: f64, units: &UnitSettings) -> String {
    match units.distance_unit {
        DistanceUnit::Meters => format!("{:.0} m", km * 1000.0),
        DistanceUnit::Kilometers => format!("{:.2} km", km),
        DistanceUnit::Miles => format!("{:.2} mi", km / KM_PER_MILE),
    }
}

/// Format a duration given in whole minutes.
pub fn format_duration(minutes: i64, units: &UnitSettings) -> String {
    match units.time_unit {
        TimeUnit::Minutes => format!("{} min", minutes),
        TimeUnit::HoursMinutes => {
            let sign = if minutes < 0 { "-" } else { "" };
            let abs = minutes.unsigned_abs();
            format!("{}{}:{:02}", sign, abs / 60, abs % 60)
        }
    }
}

/// Session length in whole minutes, when both timestamps parse and the end
/// is not before the start.
pub fn session_minutes(session: &Session) -> Option<i64> {
    let start = parse_timestamp(&session.start_time)?;
    let end = parse_timestamp(&session.end_time)?;
    let minutes = (end - start).num_minutes();
    (minutes >= 0).then_some(minutes)
}

/// `YYYY-MM-DD HH:MM` for a timestamp, or the raw string when it doesn't parse.
pub fn format_timestamp(ts: &str) -> String {
    parse_timestamp(ts)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| ts.to_string())
}

/// One line of the sessions table.
pub fn session_row(session: &Session, units: &UnitSettings) -> String {
    let sport = session.sport.as_deref().unwrap_or(PLACEHOLDER);
    let distance = session
        .distance_km
        .map(|km| format_distance(km, units))
        .unwrap_or_else(|| PLACEHOLDER.to_string());
    let duration = session_minutes(session)
        .map(|m| format_duration(m, units))
        .unwrap_or_else(|| PLACEHOLDER.to_string());

    format!(
        "{:>5}  {:<16}  {:<16}  {:<10}  {:>10}  {:>8}",
        session.id,
        format_timestamp(&session.start_time),
        format_timestamp(&session.end_time),
        sport,
        distance,
        duration
    )
}

/// Badge for the observation nearest the session start, e.g.
/// `20.0°C, 1.5mm @ 10:30:00`. Missing readings show as 0.
pub fn weather_badge(observation: Option<&WeatherObservation>) -> String {
    let Some(obs) = observation else {
        return PLACEHOLDER.to_string();
    };

    let time = parse_timestamp(&obs.timestamp)
        .map(|dt| dt.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| obs.timestamp.clone());

    format!(
        "{:.1}°C, {:.1}mm @ {}",
        obs.temperature_c.unwrap_or(0.0),
        obs.precipitation_mm.unwrap_or(0.0),
        time
    )
}

/// Lines of the session weather stats panel.
pub fn stats_lines(stats: &WeatherStats) -> Vec<String> {
    vec![
        format!("Avg temp: {:.1}°C", stats.avg_temp_c),
        format!("Avg humidity: {:.0}%", stats.avg_humidity_pct),
        format!("Max wind: {:.1} m/s", stats.max_wind_ms),
        format!("Total rain: {:.1} mm", stats.total_precip_mm),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn units(distance_unit: DistanceUnit, time_unit: TimeUnit) -> UnitSettings {
        UnitSettings {
            distance_unit,
            time_unit,
        }
    }

    fn session(start: &str, end: &str) -> Session {
        Session {
            id: 12,
            user_id: 1,
            start_time: start.to_string(),
            end_time: end.to_string(),
            sport: None,
            distance_km: Some(5.0),
            avg_hr: None,
            calories: None,
            steps: None,
            lat: 0.0,
            lon: 0.0,
        }
    }

    #[test]
    fn test_format_distance_units() {
        assert_eq!(format_distance(5.0, &units(DistanceUnit::Meters, TimeUnit::Minutes)), "5000 m");
        assert_eq!(format_distance(5.0, &units(DistanceUnit::Kilometers, TimeUnit::Minutes)), "5.00 km");
        assert_eq!(format_distance(1.609344, &units(DistanceUnit::Miles, TimeUnit::Minutes)), "1.00 mi");
    }

    #[test]
    fn test_format_duration_units() {
        assert_eq!(format_duration(95, &units(DistanceUnit::Kilometers, TimeUnit::Minutes)), "95 min");
        assert_eq!(format_duration(95, &units(DistanceUnit::Kilometers, TimeUnit::HoursMinutes)), "1:35");
        assert_eq!(format_duration(5, &units(DistanceUnit::Kilometers, TimeUnit::HoursMinutes)), "0:05");
        assert_eq!(format_duration(-65, &units(DistanceUnit::Kilometers, TimeUnit::HoursMinutes)), "-1:05");
    }

    #[test]
    fn test_session_minutes() {
        assert_eq!(session_minutes(&session("2025-03-01T10:00:00Z", "2025-03-01T10:45:30Z")), Some(45));
        assert_eq!(session_minutes(&session("2025-03-01T10:00:00Z", "2025-03-01T09:00:00Z")), None);
        assert_eq!(session_minutes(&session("bad", "2025-03-01T09:00:00Z")), None);
    }

    #[test]
    fn test_session_row_uses_placeholders() {
        let mut s = session("2025-03-01T10:00:00Z", "broken");
        s.distance_km = None;
        let row = session_row(&s, &UnitSettings::default());
        assert!(row.contains("2025-03-01 10:00"));
        assert!(row.contains("broken"));
        assert_eq!(row.matches(PLACEHOLDER).count(), 3);
    }

    #[test]
    fn test_weather_badge() {
        let obs = WeatherObservation {
            timestamp: "2025-03-01T10:30:00Z".into(),
            temperature_c: Some(22.0),
            precipitation_mm: Some(1.5),
            ..Default::default()
        };
        assert_eq!(weather_badge(Some(&obs)), "22.0°C, 1.5mm @ 10:30:00");
    }

    #[test]
    fn test_weather_badge_missing_values_and_no_match() {
        let obs = WeatherObservation {
            timestamp: "2025-03-01T10:30:00Z".into(),
            ..Default::default()
        };
        assert_eq!(weather_badge(Some(&obs)), "0.0°C, 0.0mm @ 10:30:00");
        assert_eq!(weather_badge(None), PLACEHOLDER);
    }

    #[test]
    fn test_stats_lines() {
        let lines = stats_lines(&WeatherStats {
            avg_temp_c: 21.0,
            avg_humidity_pct: 64.4,
            max_wind_ms: 3.26,
            total_precip_mm: 1.5,
        });
        assert_eq!(
            lines,
            vec![
                "Avg temp: 21.0°C",
                "Avg humidity: 64%",
                "Max wind: 3.3 m/s",
                "Total rain: 1.5 mm",
            ]
        );
    }
}
