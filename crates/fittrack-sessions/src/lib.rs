//! Sessions and weather for FitTrack
//!
//! Fetches recorded sessions and their weather observations from the backend,
//! matches each session start to the nearest observation and aggregates the
//! observations into summary stats.

pub mod client;
pub mod error;
pub mod format;
pub mod matcher;
pub mod selection;
pub mod service;
pub mod stats;
pub mod time;
pub mod types;

pub use client::{SessionClient, SessionQuery};
pub use error::FetchError;
pub use matcher::nearest_observation;
pub use selection::{Selection, SelectionState, SelectionTicket};
pub use service::{SessionsService, SessionsSnapshot, WeatherView};
pub use stats::{aggregate, field_coverage};
pub use types::*;
