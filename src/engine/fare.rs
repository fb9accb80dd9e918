use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::entities::{find_active, CarType, PriceQuote, TripType};

/// One-way fares are shown rounded to the nearest multiple of this.
pub const ROUNDING_STEP: f64 = 25.0;
pub const DRIVER_ALLOWANCE_PER_DAY: f64 = 300.0;

const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

#[derive(Clone, Debug, PartialEq, Error)]
pub enum FareError {
    #[error("unknown or inactive car type: {0}")]
    UnknownCarType(String),
    #[error("invalid distance: {0} km")]
    InvalidDistance(f64),
}

pub fn round_to_nearest(value: f64, step: f64) -> f64 {
    (value / step).round() * step
}

/// Days billed for a round trip: started days between pickup and drop-off, at least one.
pub fn number_of_days(pickup: DateTime<Utc>, dropoff: DateTime<Utc>) -> u32 {
    let seconds = (dropoff - pickup).num_seconds();
    if seconds <= 0 {
        return 1;
    }

    let days = (seconds + SECONDS_PER_DAY - 1) / SECONDS_PER_DAY;
    u32::try_from(days).unwrap_or(u32::MAX).max(1)
}

/// Prices a trip for one car type. Pure: same inputs, same quote.
pub fn quote(
    distance_km: f64,
    trip_type: TripType,
    car_type: &CarType,
    number_of_days: Option<u32>,
) -> Result<PriceQuote, FareError> {
    if !car_type.is_active || !car_type.has_valid_rates() {
        return Err(FareError::UnknownCarType(car_type.name.clone()));
    }

    if trip_type == TripType::LocalRide {
        return Ok(PriceQuote::LocalRide);
    }

    if !distance_km.is_finite() || distance_km < 0.0 {
        return Err(FareError::InvalidDistance(distance_km));
    }

    let billable_km = car_type.billable_distance(distance_km);

    match trip_type {
        TripType::OneWay => Ok(PriceQuote::OneWay {
            rate: car_type.rate_per_km,
            total_price: round_to_nearest(billable_km * car_type.rate_per_km, ROUNDING_STEP),
        }),
        TripType::RoundTrip => {
            let days = number_of_days.unwrap_or(1).max(1);
            let driver_allowance = f64::from(days) * DRIVER_ALLOWANCE_PER_DAY;

            Ok(PriceQuote::RoundTrip {
                min_rate: car_type.min_rate_per_km,
                max_rate: car_type.max_rate_per_km,
                driver_allowance,
                min_total: billable_km * car_type.min_rate_per_km + driver_allowance,
                max_total: billable_km * car_type.max_rate_per_km + driver_allowance,
                number_of_days: days,
            })
        }
        TripType::LocalRide => Ok(PriceQuote::LocalRide),
    }
}

/// Looks the car type up among the active entries first; fails closed when absent.
pub fn quote_by_name(
    distance_km: f64,
    trip_type: TripType,
    car_types: &[CarType],
    car_type_name: &str,
    number_of_days: Option<u32>,
) -> Result<(CarType, PriceQuote), FareError> {
    let car_type = find_active(car_types, car_type_name)
        .ok_or_else(|| FareError::UnknownCarType(car_type_name.to_string()))?;

    let quote = quote(distance_km, trip_type, car_type, number_of_days)?;

    Ok((car_type.clone(), quote))
}
