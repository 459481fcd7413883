//! Driver payout rules.

/// Flat fee kept from every trip that costs more than the fee itself.
pub const TRIP_FEE: f64 = 1.65;

/// Share of the fee-adjusted cost paid to the driver.
pub const PAYOUT_RATE: f64 = 0.8;

/// What the driver earns from a trip that cost `cost`.
///
/// Formula: `(cost - TRIP_FEE) * PAYOUT_RATE`, with no fee taken when the
/// cost does not exceed the fee.
pub fn driver_payout(cost: f64) -> f64 {
    if cost > TRIP_FEE {
        (cost - TRIP_FEE) * PAYOUT_RATE
    } else {
        cost * PAYOUT_RATE
    }
}

/// Rounds half away from zero to `places` decimal places.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
