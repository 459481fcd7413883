use std::{collections::HashMap, time::Instant};

use tracing::{debug, info};

use crate::{
    dispatcher::{self, Dispatcher, Driver, IdToIndex, Passenger, Trip},
    storage::{Record, Storage},
};

impl Dispatcher {
    pub(super) fn load(mut self, storage: Storage) -> Result<Self, dispatcher::Error> {
        let now = Instant::now();
        self.load_passengers(&storage)?;
        self.load_trips(&storage)?;
        self.load_drivers(&storage)?;
        self.connect_trips()?;
        info!("Loaded {} in {:?}", self, now.elapsed());
        Ok(self)
    }

    fn load_passengers(&mut self, storage: &Storage) -> Result<(), dispatcher::Error> {
        let mut passengers = Passenger::load_all(storage)?;
        passengers
            .iter_mut()
            .enumerate()
            .for_each(|(i, passenger)| passenger.index = i as u32);
        self.passenger_lookup = build_lookup(&passengers)?;
        self.passengers = passengers;
        Ok(())
    }

    fn load_trips(&mut self, storage: &Storage) -> Result<(), dispatcher::Error> {
        let mut trips = Trip::load_all(storage)?;
        trips
            .iter_mut()
            .enumerate()
            .for_each(|(i, trip)| trip.index = i as u32);
        self.trip_lookup = build_lookup(&trips)?;
        self.trips = trips;
        Ok(())
    }

    fn load_drivers(&mut self, storage: &Storage) -> Result<(), dispatcher::Error> {
        let mut drivers = Driver::load_all(storage)?;
        drivers
            .iter_mut()
            .enumerate()
            .for_each(|(i, driver)| driver.index = i as u32);
        self.driver_lookup = build_lookup(&drivers)?;
        self.drivers = drivers;
        Ok(())
    }

    /// Resolves every trip's raw driver and passenger ids and registers the
    /// trip on both of them.
    /// Has to run after all three tables are loaded.
    fn connect_trips(&mut self) -> Result<(), dispatcher::Error> {
        debug!("Connecting trips...");
        let now = Instant::now();
        for trip in self.trips.iter_mut() {
            let passenger_idx = *self.passenger_lookup.get(&trip.passenger_id).ok_or(
                dispatcher::Error::UnknownPassenger {
                    trip_id: trip.id,
                    passenger_id: trip.passenger_id,
                },
            )?;
            let driver_idx = *self.driver_lookup.get(&trip.driver_id).ok_or(
                dispatcher::Error::UnknownDriver {
                    trip_id: trip.id,
                    driver_id: trip.driver_id,
                },
            )?;

            let passenger = &mut self.passengers[passenger_idx as usize];
            let driver = &mut self.drivers[driver_idx as usize];
            trip.connect(passenger, driver)?;
            passenger.add_trip(trip);
            driver.add_trip(trip)?;
        }
        debug!(
            "Connecting {} trips took {:?}",
            self.trips.len(),
            now.elapsed()
        );
        Ok(())
    }
}

fn build_lookup<T: Record>(values: &[T]) -> Result<IdToIndex, dispatcher::Error> {
    let mut lookup: IdToIndex = HashMap::with_capacity(values.len());
    for (i, value) in values.iter().enumerate() {
        if lookup.insert(value.id(), i as u32).is_some() {
            return Err(dispatcher::Error::DuplicateId {
                kind: T::KIND,
                id: value.id(),
            });
        }
    }
    Ok(lookup)
}
