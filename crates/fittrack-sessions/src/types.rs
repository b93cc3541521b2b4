use serde::{Deserialize, Serialize};

/// A recorded activity session as returned by `GET /sessions/`.
///
/// Timestamps are kept as the ISO-8601 strings the backend sent; parse them
/// with [`crate::time::parse_timestamp`] when a value is needed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: i64,
    pub user_id: i64,
    pub start_time: String,
    pub end_time: String,
    pub sport: Option<String>,
    pub distance_km: Option<f64>,
    pub avg_hr: Option<f64>,
    pub calories: Option<f64>,
    pub steps: Option<u64>,
    pub lat: f64,
    pub lon: f64,
}

/// A single weather reading taken during (or near) a session.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WeatherObservation {
    pub timestamp: String,
    pub temperature_c: Option<f64>,
    pub apparent_temp_c: Option<f64>,
    pub humidity_pct: Option<f64>,
    pub precipitation_mm: Option<f64>,
    pub wind_speed_ms: Option<f64>,
}

/// Aggregate weather over a session's observations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WeatherStats {
    pub avg_temp_c: f64,
    pub avg_humidity_pct: f64,
    pub max_wind_ms: f64,
    pub total_precip_mm: f64,
}

/// How many observations actually carried each reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct FieldCoverage {
    pub total: usize,
    pub temperature: usize,
    pub humidity: usize,
    pub wind: usize,
    pub precipitation: usize,
}

impl FieldCoverage {
    /// True when any averaged field is missing from at least one observation,
    /// meaning the corresponding average in [`WeatherStats`] is understated.
    pub fn is_sparse(&self) -> bool {
        self.temperature < self.total || self.humidity < self.total
    }
}
