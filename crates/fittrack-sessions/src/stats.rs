//! Aggregate weather statistics over a session's observations.

use crate::types::{FieldCoverage, WeatherObservation, WeatherStats};

/// Compute average temperature and humidity, maximum wind and total
/// precipitation. Returns `None` for an empty slice.
///
/// Missing readings count as 0 and still count toward the averages'
/// denominator, so sparse data pulls the averages down. Check
/// [`field_coverage`] before trusting an average.
pub fn aggregate(observations: &[WeatherObservation]) -> Option<WeatherStats> {
    if observations.is_empty() {
        return None;
    }

    let n = observations.len() as f64;

    let max_wind_ms = observations
        .iter()
        .map(|o| o.wind_speed_ms.unwrap_or(0.0))
        .fold(f64::NEG_INFINITY, f64::max);

    Some(WeatherStats {
        avg_temp_c: sum_or_zero(observations, |o| o.temperature_c) / n,
        avg_humidity_pct: sum_or_zero(observations, |o| o.humidity_pct) / n,
        max_wind_ms,
        total_precip_mm: sum_or_zero(observations, |o| o.precipitation_mm),
    })
}

fn sum_or_zero(
    observations: &[WeatherObservation],
    field: impl Fn(&WeatherObservation) -> Option<f64>,
) -> f64 {
    observations.iter().map(|o| field(o).unwrap_or(0.0)).sum()
}

/// Count how many observations carry each reading.
pub fn field_coverage(observations: &[WeatherObservation]) -> FieldCoverage {
    observations
        .iter()
        .fold(FieldCoverage { total: observations.len(), ..Default::default() }, |mut c, o| {
            c.temperature += usize::from(o.temperature_c.is_some());
            c.humidity += usize::from(o.humidity_pct.is_some());
            c.wind += usize::from(o.wind_speed_ms.is_some());
            c.precipitation += usize::from(o.precipitation_mm.is_some());
            c
        })
}
