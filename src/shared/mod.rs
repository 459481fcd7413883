pub mod time;

pub use time::*;

use thiserror::Error;

/// Number of characters in a vehicle identification number.
pub const VIN_LENGTH: usize = 17;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Id must be a positive integer, got {0}")]
    InvalidId(i64),
    #[error("VIN must contain {VIN_LENGTH} characters, got {0}")]
    InvalidVin(usize),
    #[error("Invalid driver status: {0}")]
    InvalidStatus(String),
    #[error("Rating must be between 1 and 5, got {0}")]
    InvalidRating(i64),
    #[error("End time {end} is before start time {start}")]
    EndBeforeStart { start: Timestamp, end: Timestamp },
    #[error("Trip from {start} to {end} is too long")]
    SpanTooLong { start: Timestamp, end: Timestamp },
    #[error("Could not parse timestamp: {0}")]
    InvalidTimestamp(String),
    #[error("Trip {0} has a cost or rating but no end time")]
    OutcomeWithoutEnd(u32),
    #[error("Trip {trip_id} belongs to driver {expected}, not driver {actual}")]
    TripNotForDriver {
        trip_id: u32,
        expected: u32,
        actual: u32,
    },
    #[error("Trip {trip_id} references {kind} {expected} but was connected to {actual}")]
    ForeignKeyMismatch {
        trip_id: u32,
        kind: &'static str,
        expected: u32,
        actual: u32,
    },
}

/// Checks that an identifier is a positive integer that fits the id space.
pub fn validate_id(id: i64) -> Result<u32, ValidationError> {
    match u32::try_from(id) {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(ValidationError::InvalidId(id)),
    }
}
