//! Per-selection weather loading state machine.
//!
//! `Idle -> Loading(id) -> Ready | Failed`. Every `begin` bumps a generation
//! counter; a completion is applied only when its ticket carries the current
//! generation, so the most recent selection always wins.

use std::sync::Arc;

use crate::error::FetchError;
use crate::types::WeatherObservation;

#[derive(Debug, Clone, Default, PartialEq)]
pub enum SelectionState {
    #[default]
    Idle,
    Loading {
        session_id: i64,
    },
    Ready {
        session_id: i64,
        observations: Arc<[WeatherObservation]>,
    },
    Failed {
        session_id: i64,
        message: String,
    },
}

impl SelectionState {
    /// Session the state refers to, if any.
    pub fn session_id(&self) -> Option<i64> {
        match self {
            Self::Idle => None,
            Self::Loading { session_id }
            | Self::Ready { session_id, .. }
            | Self::Failed { session_id, .. } => Some(*session_id),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading { .. })
    }

    /// The observation snapshot, when loaded.
    pub fn observations(&self) -> Option<&Arc<[WeatherObservation]>> {
        match self {
            Self::Ready { observations, .. } => Some(observations),
            _ => None,
        }
    }
}

/// Proof that a request was started for a particular selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionTicket {
    generation: u64,
    session_id: i64,
}

impl SelectionTicket {
    pub fn session_id(&self) -> i64 {
        self.session_id
    }
}

#[derive(Debug, Default)]
pub struct Selection {
    generation: u64,
    state: SelectionState,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    /// Start loading weather for `session_id`, superseding any request in flight.
    pub fn begin(&mut self, session_id: i64) -> SelectionTicket {
        self.generation += 1;
        if let SelectionState::Loading { session_id: previous } = self.state {
            tracing::debug!("Selection {} supersedes in-flight load for {}", session_id, previous);
        }
        self.state = SelectionState::Loading { session_id };
        SelectionTicket {
            generation: self.generation,
            session_id,
        }
    }

    /// Apply a finished request. Returns `false` when the ticket is stale and
    /// the result was discarded.
    pub fn complete(
        &mut self,
        ticket: SelectionTicket,
        result: Result<Vec<WeatherObservation>, FetchError>,
    ) -> bool {
        if ticket.generation != self.generation {
            tracing::debug!(
                "Discarding stale weather result for session {} (generation {} < {})",
                ticket.session_id,
                ticket.generation,
                self.generation
            );
            return false;
        }

        self.state = match result {
            Ok(observations) => SelectionState::Ready {
                session_id: ticket.session_id,
                observations: observations.into(),
            },
            Err(err) => {
                tracing::warn!("Weather load failed for session {}: {}", ticket.session_id, err);
                SelectionState::Failed {
                    session_id: ticket.session_id,
                    message: err.message().to_string(),
                }
            }
        };
        true
    }

    /// Drop the current selection. Any request in flight becomes stale.
    pub fn clear(&mut self) {
        self.generation += 1;
        self.state = SelectionState::Idle;
    }
}
