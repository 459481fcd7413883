use crate::dispatcher::Driver;

/// Chooses which driver takes a new trip.
pub trait MatchingPolicy {
    /// Returns the store index of the chosen driver, or None if nobody can
    /// take the trip.
    fn select(&self, drivers: &[Driver]) -> Option<u32>;
}

/// First available driver in load order.
///
/// Ignores ratings, history and everything else about the drivers, so the
/// outcome only depends on the order of the driver table.
#[derive(Debug, Default, Clone, Copy)]
pub struct FirstAvailable;

impl MatchingPolicy for FirstAvailable {
    fn select(&self, drivers: &[Driver]) -> Option<u32> {
        drivers
            .iter()
            .find(|driver| driver.is_available())
            .map(|driver| driver.index)
    }
}
