use crate::airport::AirportId;
use crate::flight::FlightNumber;
use thiserror::Error;

/// Failures reported by tower operations. None of them leave the tower in a
/// partially updated state.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TowerError {
    /// Departure time was not a valid `HH:MM` time of day.
    #[error("invalid time format '{input}', expected HH:MM")]
    InvalidTimeFormat { input: String },

    /// No scheduled or runway-assigned flight carries this number.
    #[error("flight {number} not found")]
    FlightNotFound { number: FlightNumber },

    /// Routes must have a positive distance.
    #[error("route {from} - {to} must have a positive distance")]
    InvalidDistance { from: AirportId, to: AirportId },

    #[error("scenario could not be loaded: {0}")]
    Scenario(String),
}

impl From<std::io::Error> for TowerError {
    fn from(err: std::io::Error) -> Self {
        TowerError::Scenario(err.to_string())
    }
}

impl From<serde_json::Error> for TowerError {
    fn from(err: serde_json::Error) -> Self {
        TowerError::Scenario(err.to_string())
    }
}
