#[derive(Debug, Clone)]
pub struct Config {
    pub drivers_file_name: String,
    pub passengers_file_name: String,
    pub trips_file_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            drivers_file_name: "drivers.csv".into(),
            passengers_file_name: "passengers.csv".into(),
            trips_file_name: "trips.csv".into(),
        }
    }
}
