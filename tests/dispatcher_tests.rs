use rideshare::{
    dispatcher::{self, Dispatcher},
    prelude::*,
    storage::DEFAULT_DIRECTORY,
};

fn test_data_directory() -> String {
    format!("{}/tests/test_data", env!("CARGO_MANIFEST_DIR"))
}

fn build_test_dispatcher() -> Dispatcher {
    Dispatcher::from_directory(test_data_directory()).unwrap()
}

/// Always picks the first driver, available or not.
struct FirstInFleet;

impl MatchingPolicy for FirstInFleet {
    fn select(&self, drivers: &[Driver]) -> Option<u32> {
        drivers.first().map(|driver| driver.index)
    }
}

#[test]
fn loads_development_data_by_default_test() {
    let directory = format!("{}/{}", env!("CARGO_MANIFEST_DIR"), DEFAULT_DIRECTORY);
    let trips_path = format!("{}/trips.csv", directory);
    // Count lines in the file, minus the header
    let rows = std::fs::read_to_string(trips_path).unwrap().lines().count() - 1;

    // Tests run from the package root, where the default directory lives.
    let dispatcher = Dispatcher::new(Storage::default()).unwrap();

    assert_eq!(dispatcher.trips().len(), rows);
    assert!(!dispatcher.drivers().is_empty());
    assert!(!dispatcher.passengers().is_empty());
}

#[test]
fn summary_test() {
    let dispatcher = build_test_dispatcher();
    assert_eq!(
        dispatcher.to_string(),
        "5 trips, 3 drivers, 8 passengers"
    );
}

#[test]
fn loads_passengers_test() {
    let dispatcher = build_test_dispatcher();
    let first = dispatcher.passengers().first().unwrap();
    let last = dispatcher.passengers().last().unwrap();

    assert_eq!(&*first.name, "Passenger 1");
    assert_eq!(first.id, 1);
    assert_eq!(&*last.name, "Passenger 8");
    assert_eq!(last.id, 8);
}

#[test]
fn loads_drivers_test() {
    let dispatcher = build_test_dispatcher();
    let first = dispatcher.drivers().first().unwrap();
    let last = dispatcher.drivers().last().unwrap();

    assert_eq!(&*first.name, "Driver 1 (unavailable)");
    assert_eq!(first.id, 1);
    assert_eq!(first.status, DriverStatus::Unavailable);
    assert_eq!(&*last.name, "Driver 3 (no trips)");
    assert_eq!(last.id, 3);
    assert_eq!(last.status, DriverStatus::Available);
}

#[test]
fn loads_trips_test() {
    let dispatcher = build_test_dispatcher();
    let trip = dispatcher.find_trip(4).unwrap().unwrap();

    assert_eq!(trip.driver_id, 1);
    assert_eq!(trip.passenger_id, 4);
    assert_eq!(trip.cost, Some(1.5));
    assert_eq!(trip.rating, Some(2));
    assert_eq!(trip.duration(), Some(Duration::from_minutes(10)));
}

#[test]
fn connects_trips_and_passengers_test() {
    let dispatcher = build_test_dispatcher();
    for trip in dispatcher.trips() {
        let passenger = trip.passenger(dispatcher.passengers()).unwrap();
        assert_eq!(passenger.id, trip.passenger_id);
        assert!(passenger.trips.contains(&trip.index));
    }
}

#[test]
fn connects_trips_and_drivers_test() {
    let dispatcher = build_test_dispatcher();
    for trip in dispatcher.trips() {
        let driver = trip.driver(dispatcher.drivers()).unwrap();
        assert_eq!(driver.id, trip.driver_id);
        assert!(driver.trips.contains(&trip.index));
    }
}

#[test]
fn trip_lists_keep_load_order_test() {
    let dispatcher = build_test_dispatcher();
    let driver = dispatcher.find_driver(1).unwrap().unwrap();
    let ids: Vec<u32> = dispatcher
        .trips_for_driver(driver)
        .map(|trip| trip.id)
        .collect();
    assert_eq!(ids, vec![1, 2, 4]);

    let driver = dispatcher.find_driver(3).unwrap().unwrap();
    assert_eq!(dispatcher.trips_for_driver(driver).count(), 0);
}

#[test]
fn find_passenger_test() {
    let dispatcher = build_test_dispatcher();
    let passenger = dispatcher.find_passenger(2).unwrap().unwrap();
    assert_eq!(passenger.id, 2);
    assert!(dispatcher.find_passenger(99).unwrap().is_none());
}

#[test]
fn find_passenger_bad_id_test() {
    let dispatcher = build_test_dispatcher();
    assert!(matches!(
        dispatcher.find_passenger(0),
        Err(dispatcher::Error::Validation(ValidationError::InvalidId(0)))
    ));
    assert!(dispatcher.find_passenger(-2).is_err());
}

#[test]
fn find_driver_test() {
    let dispatcher = build_test_dispatcher();
    let driver = dispatcher.find_driver(2).unwrap().unwrap();
    assert_eq!(driver.id, 2);
    assert!(dispatcher.find_driver(4).unwrap().is_none());
}

#[test]
fn find_driver_bad_id_test() {
    let dispatcher = build_test_dispatcher();
    assert!(matches!(
        dispatcher.find_driver(0),
        Err(dispatcher::Error::Validation(ValidationError::InvalidId(0)))
    ));
}

#[test]
fn loaded_metrics_test() {
    let dispatcher = build_test_dispatcher();
    let trips = dispatcher.trips();

    let driver = dispatcher.find_driver(1).unwrap().unwrap();
    assert_eq!(driver.average_rating(trips), 3.3);
    assert_eq!(driver.total_revenue(trips), 12.16);

    let driver = dispatcher.find_driver(2).unwrap().unwrap();
    assert_eq!(driver.average_rating(trips), 4.5);
    assert_eq!(driver.total_revenue(trips), 25.36);

    let driver = dispatcher.find_driver(3).unwrap().unwrap();
    assert_eq!(driver.average_rating(trips), 0.0);
    assert_eq!(driver.total_revenue(trips), 0.0);

    let passenger = dispatcher.find_passenger(2).unwrap().unwrap();
    assert_eq!(passenger.net_expenditures(trips), 27.0);
    assert_eq!(passenger.total_time_spent(trips), Duration::from_minutes(48));
}

#[test]
fn request_trip_test() {
    let mut dispatcher = build_test_dispatcher();
    let initial_trips = dispatcher.find_passenger(8).unwrap().unwrap().trips.len();

    let trip = dispatcher.request_trip(8).unwrap().unwrap().clone();

    assert_eq!(trip.id, 6);
    assert_eq!(trip.passenger_id, 8);
    assert_eq!(trip.driver_id, 2);
    assert!(!trip.is_completed());
    assert_eq!(trip.cost, None);
    assert_eq!(trip.rating, None);
    assert!(trip.is_connected());
    assert_eq!(dispatcher.trips().len(), 6);
    assert_eq!(dispatcher.find_trip(6).unwrap().map(|t| t.index), Some(trip.index));

    let driver = dispatcher.find_driver(2).unwrap().unwrap();
    assert_eq!(driver.status, DriverStatus::Unavailable);
    assert_eq!(driver.trips.last(), Some(&trip.index));

    let passenger = dispatcher.find_passenger(8).unwrap().unwrap();
    assert_eq!(passenger.trips.len(), initial_trips + 1);
    assert_eq!(passenger.trips.last(), Some(&trip.index));
}

#[test]
fn request_trip_does_not_change_driver_metrics_test() {
    let mut dispatcher = build_test_dispatcher();
    let driver = dispatcher.find_driver(2).unwrap().unwrap();
    let rating = driver.average_rating(dispatcher.trips());
    let revenue = driver.total_revenue(dispatcher.trips());

    dispatcher.request_trip(1).unwrap().unwrap();

    let driver = dispatcher.find_driver(2).unwrap().unwrap();
    assert_eq!(driver.trips.len(), 3);
    assert_eq!(driver.average_rating(dispatcher.trips()), rating);
    assert_eq!(driver.total_revenue(dispatcher.trips()), revenue);
}

#[test]
fn request_trip_without_available_drivers_test() {
    let mut dispatcher = build_test_dispatcher();
    dispatcher.request_trip(8).unwrap().unwrap();
    dispatcher.request_trip(6).unwrap().unwrap();

    let statuses: Vec<DriverStatus> = dispatcher.drivers().iter().map(|d| d.status).collect();
    let trips = dispatcher.trips().len();
    let passenger_trips = dispatcher.find_passenger(3).unwrap().unwrap().trips.len();

    assert!(dispatcher.request_trip(3).unwrap().is_none());

    let after: Vec<DriverStatus> = dispatcher.drivers().iter().map(|d| d.status).collect();
    assert_eq!(after, statuses);
    assert!(after.iter().all(|status| *status == DriverStatus::Unavailable));
    assert_eq!(dispatcher.trips().len(), trips);
    assert_eq!(
        dispatcher.find_passenger(3).unwrap().unwrap().trips.len(),
        passenger_trips
    );
}

#[test]
fn request_trip_assigns_sequential_ids_test() {
    let mut dispatcher = build_test_dispatcher();
    let first = dispatcher.request_trip(8).unwrap().unwrap().id;
    let second = dispatcher.request_trip(7).unwrap().unwrap().id;
    assert_eq!((first, second), (6, 7));
    assert_eq!(dispatcher.find_trip(7).unwrap().unwrap().driver_id, 3);
}

#[test]
fn request_trip_unknown_passenger_test() {
    let mut dispatcher = build_test_dispatcher();
    assert!(matches!(
        dispatcher.request_trip(42),
        Err(dispatcher::Error::PassengerNotFound(42))
    ));
    assert!(matches!(
        dispatcher.request_trip(0),
        Err(dispatcher::Error::Validation(ValidationError::InvalidId(0)))
    ));
    assert_eq!(dispatcher.trips().len(), 5);
    assert!(dispatcher.find_driver(2).unwrap().unwrap().is_available());
}

#[test]
fn request_trip_busy_fleet_skips_passenger_check_test() {
    let mut dispatcher = build_test_dispatcher();
    dispatcher.request_trip(8).unwrap().unwrap();
    dispatcher.request_trip(6).unwrap().unwrap();

    assert!(dispatcher.request_trip(0).unwrap().is_none());
    assert!(dispatcher.request_trip(42).unwrap().is_none());
    assert!(dispatcher.request_trip(-7).unwrap().is_none());
    assert_eq!(dispatcher.trips().len(), 7);
}

#[test]
fn request_trip_with_unavailable_pick_test() {
    let mut dispatcher = build_test_dispatcher();
    // Driver 1 is unavailable, so the pick is refused.
    assert!(
        dispatcher
            .request_trip_with(8, &FirstInFleet)
            .unwrap()
            .is_none()
    );
    assert_eq!(dispatcher.trips().len(), 5);
}

#[test]
fn request_trip_with_policy_test() {
    let mut dispatcher = build_test_dispatcher();
    let trip = dispatcher
        .request_trip_with(5, &FirstAvailable)
        .unwrap()
        .unwrap();
    assert_eq!(trip.driver_id, 2);
}
