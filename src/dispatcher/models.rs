use std::{fmt, str::FromStr, sync::Arc};

use crate::{
    pricing::{self, driver_payout},
    shared::{
        Duration, Timestamp, VIN_LENGTH, ValidationError, parse_timestamp, validate_id,
    },
    storage::{
        Config, Record,
        models::{DriverRecord, PassengerRecord, TripRecord},
    },
};

/// Placeholder index for entities that are not in a dispatcher's store yet.
pub const UNINDEXED: u32 = u32::MAX;

/// Whether a driver can take a new trip.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum DriverStatus {
    #[default]
    Available,
    Unavailable,
}

impl DriverStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "AVAILABLE",
            Self::Unavailable => "UNAVAILABLE",
        }
    }
}

impl FromStr for DriverStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AVAILABLE" => Ok(Self::Available),
            "UNAVAILABLE" => Ok(Self::Unavailable),
            other => Err(ValidationError::InvalidStatus(other.to_string())),
        }
    }
}

impl fmt::Display for DriverStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Someone who rides.
#[derive(Debug, Clone)]
pub struct Passenger {
    /// Position in the dispatcher's passenger store.
    pub index: u32,
    pub id: u32,
    pub name: Arc<str>,
    pub phone_number: Arc<str>,
    /// Indexes into the trip store, in the order the trips were added.
    pub trips: Vec<u32>,
}

impl Passenger {
    pub fn new(id: i64, name: &str, phone_number: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            index: UNINDEXED,
            id: validate_id(id)?,
            name: name.into(),
            phone_number: phone_number.into(),
            trips: Vec::new(),
        })
    }

    pub fn add_trip(&mut self, trip: &Trip) {
        self.trips.push(trip.index);
    }

    /// This passenger's trips, resolved against the trip store.
    pub fn trips<'a>(&'a self, store: &'a [Trip]) -> impl Iterator<Item = &'a Trip> + 'a {
        resolve(&self.trips, store)
    }

    /// Total spent on completed trips.
    pub fn net_expenditures(&self, store: &[Trip]) -> f64 {
        self.trips(store)
            .filter(|trip| trip.is_completed())
            .filter_map(|trip| trip.cost)
            .fold(0.0, |total, cost| total + cost)
    }

    /// Total time spent riding, over completed trips.
    pub fn total_time_spent(&self, store: &[Trip]) -> Duration {
        self.trips(store).filter_map(Trip::duration).sum()
    }
}

impl Record for Passenger {
    type Raw = PassengerRecord;
    const KIND: &'static str = "passenger";

    fn file_name(config: &Config) -> &str {
        &config.passengers_file_name
    }

    fn id(&self) -> u32 {
        self.id
    }

    fn from_raw(raw: Self::Raw) -> Result<Self, ValidationError> {
        Self::new(raw.id, &raw.name, &raw.phone_num)
    }
}

/// Someone who drives.
#[derive(Debug, Clone)]
pub struct Driver {
    /// Position in the dispatcher's driver store.
    pub index: u32,
    pub id: u32,
    pub name: Arc<str>,
    /// Vehicle identification number, always [`VIN_LENGTH`] characters.
    pub vin: Arc<str>,
    pub status: DriverStatus,
    /// Indexes into the trip store, in the order the trips were added.
    pub trips: Vec<u32>,
}

impl Driver {
    pub fn new(id: i64, name: &str, vin: &str) -> Result<Self, ValidationError> {
        let id = validate_id(id)?;
        let vin_length = vin.chars().count();
        if vin_length != VIN_LENGTH {
            return Err(ValidationError::InvalidVin(vin_length));
        }
        Ok(Self {
            index: UNINDEXED,
            id,
            name: name.into(),
            vin: vin.into(),
            status: DriverStatus::default(),
            trips: Vec::new(),
        })
    }

    pub fn with_status(mut self, status: DriverStatus) -> Self {
        self.status = status;
        self
    }

    pub fn is_available(&self) -> bool {
        self.status == DriverStatus::Available
    }

    /// Registers a trip this driver drove.
    pub fn add_trip(&mut self, trip: &Trip) -> Result<(), ValidationError> {
        if trip.driver_id != self.id {
            return Err(ValidationError::TripNotForDriver {
                trip_id: trip.id,
                expected: trip.driver_id,
                actual: self.id,
            });
        }
        self.trips.push(trip.index);
        Ok(())
    }

    /// This driver's trips, resolved against the trip store.
    pub fn trips<'a>(&'a self, store: &'a [Trip]) -> impl Iterator<Item = &'a Trip> + 'a {
        resolve(&self.trips, store)
    }

    /// Mean rating over rated completed trips, to one decimal. Zero if nothing
    /// is rated.
    pub fn average_rating(&self, store: &[Trip]) -> f64 {
        let (total, count) = self
            .trips(store)
            .filter(|trip| trip.is_completed())
            .filter_map(|trip| trip.rating)
            .fold((0u32, 0u32), |(total, count), rating| {
                (total + u32::from(rating), count + 1)
            });
        if count == 0 {
            return 0.0;
        }
        pricing::round_to(f64::from(total) / f64::from(count), 1)
    }

    /// Driver's share of every costed completed trip, to two decimals.
    pub fn total_revenue(&self, store: &[Trip]) -> f64 {
        let revenue = self
            .trips(store)
            .filter(|trip| trip.is_completed())
            .filter_map(|trip| trip.cost)
            .map(driver_payout)
            .fold(0.0, |total, payout| total + payout);
        pricing::round_to(revenue, 2)
    }
}

impl Record for Driver {
    type Raw = DriverRecord;
    const KIND: &'static str = "driver";

    fn file_name(config: &Config) -> &str {
        &config.drivers_file_name
    }

    fn id(&self) -> u32 {
        self.id
    }

    fn from_raw(raw: Self::Raw) -> Result<Self, ValidationError> {
        let status = raw.status.parse()?;
        Ok(Self::new(raw.id, &raw.name, &raw.vin)?.with_status(status))
    }
}

/// A single ride of one passenger with one driver.
///
/// A trip without an end time is in progress and carries neither cost nor
/// rating.
#[derive(Debug, Clone)]
pub struct Trip {
    /// Position in the dispatcher's trip store.
    pub index: u32,
    pub id: u32,
    /// Raw foreign key into the driver table.
    pub driver_id: u32,
    /// Raw foreign key into the passenger table.
    pub passenger_id: u32,
    /// Resolved driver index, set by [`Trip::connect`].
    pub driver_idx: Option<u32>,
    /// Resolved passenger index, set by [`Trip::connect`].
    pub passenger_idx: Option<u32>,
    pub start_time: Timestamp,
    pub end_time: Option<Timestamp>,
    pub cost: Option<f64>,
    /// Between 1 and 5 when present.
    pub rating: Option<u8>,
}

impl Trip {
    /// Creates an in-progress trip.
    pub fn new(
        id: i64,
        driver_id: i64,
        passenger_id: i64,
        start_time: Timestamp,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            index: UNINDEXED,
            id: validate_id(id)?,
            driver_id: validate_id(driver_id)?,
            passenger_id: validate_id(passenger_id)?,
            driver_idx: None,
            passenger_idx: None,
            start_time,
            end_time: None,
            cost: None,
            rating: None,
        })
    }

    pub fn with_end_time(mut self, end_time: Timestamp) -> Result<Self, ValidationError> {
        if end_time < self.start_time {
            return Err(ValidationError::EndBeforeStart {
                start: self.start_time,
                end: end_time,
            });
        }
        if Duration::between(&self.start_time, &end_time).is_none() {
            return Err(ValidationError::SpanTooLong {
                start: self.start_time,
                end: end_time,
            });
        }
        self.end_time = Some(end_time);
        Ok(self)
    }

    pub fn with_cost(mut self, cost: f64) -> Self {
        self.cost = Some(cost);
        self
    }

    pub fn with_rating(mut self, rating: i64) -> Result<Self, ValidationError> {
        match u8::try_from(rating) {
            Ok(value @ 1..=5) => {
                self.rating = Some(value);
                Ok(self)
            }
            _ => Err(ValidationError::InvalidRating(rating)),
        }
    }

    pub fn is_completed(&self) -> bool {
        self.end_time.is_some()
    }

    /// Time from start to end. None while the trip is in progress.
    /// `with_end_time` only accepts spans that fit, so a completed trip always
    /// has a duration.
    pub fn duration(&self) -> Option<Duration> {
        let end_time = self.end_time.as_ref()?;
        Duration::between(&self.start_time, end_time)
    }

    /// Links the trip to the entities behind its raw foreign keys.
    /// Registering the trip on both entities is left to the caller.
    pub fn connect(&mut self, passenger: &Passenger, driver: &Driver) -> Result<(), ValidationError> {
        if passenger.id != self.passenger_id {
            return Err(ValidationError::ForeignKeyMismatch {
                trip_id: self.id,
                kind: Passenger::KIND,
                expected: self.passenger_id,
                actual: passenger.id,
            });
        }
        if driver.id != self.driver_id {
            return Err(ValidationError::ForeignKeyMismatch {
                trip_id: self.id,
                kind: Driver::KIND,
                expected: self.driver_id,
                actual: driver.id,
            });
        }
        self.passenger_idx = Some(passenger.index);
        self.driver_idx = Some(driver.index);
        Ok(())
    }

    pub fn is_connected(&self) -> bool {
        self.driver_idx.is_some() && self.passenger_idx.is_some()
    }

    pub fn driver<'a>(&self, drivers: &'a [Driver]) -> Option<&'a Driver> {
        drivers.get(self.driver_idx? as usize)
    }

    pub fn passenger<'a>(&self, passengers: &'a [Passenger]) -> Option<&'a Passenger> {
        passengers.get(self.passenger_idx? as usize)
    }
}

impl Record for Trip {
    type Raw = TripRecord;
    const KIND: &'static str = "trip";

    fn file_name(config: &Config) -> &str {
        &config.trips_file_name
    }

    fn id(&self) -> u32 {
        self.id
    }

    fn from_raw(raw: Self::Raw) -> Result<Self, ValidationError> {
        let start_time = parse_timestamp(&raw.start_time)
            .ok_or_else(|| ValidationError::InvalidTimestamp(raw.start_time.clone()))?;
        let mut trip = Self::new(raw.id, raw.driver_id, raw.passenger_id, start_time)?;
        if raw.end_time.is_none() && (raw.cost.is_some() || raw.rating.is_some()) {
            return Err(ValidationError::OutcomeWithoutEnd(trip.id));
        }
        if let Some(end_time) = raw.end_time {
            let end_time = parse_timestamp(&end_time)
                .ok_or_else(|| ValidationError::InvalidTimestamp(end_time.clone()))?;
            trip = trip.with_end_time(end_time)?;
        }
        if let Some(cost) = raw.cost {
            trip = trip.with_cost(cost);
        }
        if let Some(rating) = raw.rating {
            trip = trip.with_rating(rating)?;
        }
        Ok(trip)
    }
}

fn resolve<'a>(indexes: &'a [u32], store: &'a [Trip]) -> impl Iterator<Item = &'a Trip> + 'a {
    indexes
        .iter()
        .filter_map(move |index| store.get(*index as usize))
}
