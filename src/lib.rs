pub mod dispatcher;
pub mod matching;
pub mod pricing;
pub mod shared;
pub mod storage;

pub mod prelude {
    pub use crate::dispatcher::{Dispatcher, Driver, DriverStatus, Passenger, Trip};
    pub use crate::matching::{FirstAvailable, MatchingPolicy};
    pub use crate::shared::{Duration, Timestamp, ValidationError};
    pub use crate::storage::{Config, Record, Storage};
}
