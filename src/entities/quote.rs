use serde::{Deserialize, Serialize};

use crate::entities::TripType;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "trip_type", rename_all = "snake_case")]
pub enum PriceQuote {
    OneWay {
        rate: f64,
        total_price: f64,
    },
    RoundTrip {
        min_rate: f64,
        max_rate: f64,
        driver_allowance: f64,
        min_total: f64,
        max_total: f64,
        number_of_days: u32,
    },
    /// Local rides are booked without a price.
    LocalRide,
}

impl PriceQuote {
    pub fn trip_type(&self) -> TripType {
        match self {
            Self::OneWay { .. } => TripType::OneWay,
            Self::RoundTrip { .. } => TripType::RoundTrip,
            Self::LocalRide => TripType::LocalRide,
        }
    }

    /// Price recorded on the booking: the fixed fare, or the midpoint of a round-trip range.
    pub fn booking_price(&self) -> Option<f64> {
        match self {
            Self::OneWay { total_price, .. } => Some(*total_price),
            Self::RoundTrip {
                min_total,
                max_total,
                ..
            } => Some((min_total + max_total) / 2.0),
            Self::LocalRide => None,
        }
    }
}
