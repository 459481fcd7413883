use std::{collections::HashMap, fmt, path::PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};

mod models;
mod source;
pub use models::*;

use crate::{
    matching::{FirstAvailable, MatchingPolicy},
    shared::{self, ValidationError, validate_id},
    storage::{self, Storage},
};

type IdToIndex = HashMap<u32, u32>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Storage error: {0}")]
    Storage(#[from] storage::Error),
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
    #[error("Duplicate {kind} id: {id}")]
    DuplicateId { kind: &'static str, id: u32 },
    #[error("Trip {trip_id} references unknown driver {driver_id}")]
    UnknownDriver { trip_id: u32, driver_id: u32 },
    #[error("Trip {trip_id} references unknown passenger {passenger_id}")]
    UnknownPassenger { trip_id: u32, passenger_id: u32 },
    #[error("Passenger id does not match any entry: {0}")]
    PassengerNotFound(u32),
}

/// Owns every driver, passenger and trip and hands out new trips.
///
/// Entities point at each other through indexes into the stores held here,
/// so a trip is stored once no matter how many lists it appears in.
#[derive(Debug, Clone, Default)]
pub struct Dispatcher {
    drivers: Vec<Driver>,
    passengers: Vec<Passenger>,
    trips: Vec<Trip>,

    driver_lookup: IdToIndex,
    passenger_lookup: IdToIndex,
    trip_lookup: IdToIndex,
}

impl Dispatcher {
    /// Loads every table from `storage` and connects trips to their drivers
    /// and passengers.
    /// Fails if a row is invalid, an id repeats, or a trip points nowhere.
    pub fn new(storage: Storage) -> Result<Self, self::Error> {
        Self::default().load(storage)
    }

    /// Loads the tables from CSV files in `path` using the default file names.
    pub fn from_directory<P: Into<PathBuf>>(path: P) -> Result<Self, self::Error> {
        Self::new(Storage::default().from_directory(path))
    }

    pub fn drivers(&self) -> &[Driver] {
        &self.drivers
    }

    pub fn passengers(&self) -> &[Passenger] {
        &self.passengers
    }

    pub fn trips(&self) -> &[Trip] {
        &self.trips
    }

    /// Get the passenger with the given id.
    /// Fails for ids that are not positive, None if no passenger has the id.
    pub fn find_passenger(&self, id: i64) -> Result<Option<&Passenger>, self::Error> {
        let id = validate_id(id)?;
        Ok(self
            .passenger_lookup
            .get(&id)
            .map(|index| &self.passengers[*index as usize]))
    }

    /// Get the driver with the given id.
    /// Fails for ids that are not positive, None if no driver has the id.
    pub fn find_driver(&self, id: i64) -> Result<Option<&Driver>, self::Error> {
        let id = validate_id(id)?;
        Ok(self
            .driver_lookup
            .get(&id)
            .map(|index| &self.drivers[*index as usize]))
    }

    pub fn find_trip(&self, id: i64) -> Result<Option<&Trip>, self::Error> {
        let id = validate_id(id)?;
        Ok(self
            .trip_lookup
            .get(&id)
            .map(|index| &self.trips[*index as usize]))
    }

    pub fn trips_for_driver<'a>(&'a self, driver: &'a Driver) -> impl Iterator<Item = &'a Trip> {
        driver.trips(&self.trips)
    }

    pub fn trips_for_passenger<'a>(
        &'a self,
        passenger: &'a Passenger,
    ) -> impl Iterator<Item = &'a Trip> {
        passenger.trips(&self.trips)
    }

    /// Starts a trip for the passenger with the first available driver.
    ///
    /// Returns None, and changes nothing, when every driver is unavailable.
    /// The passenger id is only checked once a driver is found. Otherwise the driver becomes unavailable and the new trip is added to
    /// the driver, the passenger and the trip store.
    pub fn request_trip(&mut self, passenger_id: i64) -> Result<Option<&Trip>, self::Error> {
        self.request_trip_with(passenger_id, &FirstAvailable)
    }

    /// Same as [`Dispatcher::request_trip`] with a custom matching policy.
    pub fn request_trip_with<M>(
        &mut self,
        passenger_id: i64,
        policy: &M,
    ) -> Result<Option<&Trip>, self::Error>
    where
        M: MatchingPolicy + ?Sized,
    {
        let Some(driver_idx) = policy.select(&self.drivers) else {
            debug!("No driver available for passenger {passenger_id}");
            return Ok(None);
        };
        let Some(driver) = self
            .drivers
            .get(driver_idx as usize)
            .filter(|driver| driver.is_available())
        else {
            warn!("Matching picked driver index {driver_idx} which is not available");
            return Ok(None);
        };

        let passenger_id = validate_id(passenger_id)?;
        let passenger_idx = *self
            .passenger_lookup
            .get(&passenger_id)
            .ok_or(self::Error::PassengerNotFound(passenger_id))?;
        let passenger = &self.passengers[passenger_idx as usize];

        let mut trip = Trip::new(
            self.next_trip_id(),
            i64::from(driver.id),
            i64::from(passenger.id),
            shared::now(),
        )?;
        trip.index = self.trips.len() as u32;
        trip.connect(passenger, driver)?;

        let driver = &mut self.drivers[driver_idx as usize];
        driver.add_trip(&trip)?;
        driver.status = DriverStatus::Unavailable;
        self.passengers[passenger_idx as usize].add_trip(&trip);

        info!(
            "Assigned trip {} to driver {} for passenger {}",
            trip.id, trip.driver_id, trip.passenger_id
        );
        self.trip_lookup.insert(trip.id, trip.index);
        self.trips.push(trip);
        Ok(self.trips.last())
    }

    /// One past the highest trip id in the store.
    fn next_trip_id(&self) -> i64 {
        let max = self.trips.iter().map(|trip| trip.id).max().unwrap_or(0);
        i64::from(max) + 1
    }
}

impl fmt::Display for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} trips, {} drivers, {} passengers",
            self.trips.len(),
            self.drivers.len(),
            self.passengers.len()
        )
    }
}
