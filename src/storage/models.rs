//! Raw rows as they appear in storage, before any validation.

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct DriverRecord {
    pub id: i64,
    pub name: String,
    pub vin: String,
    pub status: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct PassengerRecord {
    pub id: i64,
    pub name: String,
    pub phone_num: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct TripRecord {
    pub id: i64,
    pub driver_id: i64,
    pub passenger_id: i64,
    pub start_time: String,
    pub end_time: Option<String>,
    pub cost: Option<f64>,
    pub rating: Option<i64>,
}
