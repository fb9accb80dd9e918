use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::engine::fare;
use crate::entities::validation::{is_valid_location, InputValidationError, Validator};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TripType {
    #[serde(rename = "one-way", alias = "one_way")]
    OneWay,
    #[serde(rename = "round-trip", alias = "round_trip")]
    RoundTrip,
    #[serde(rename = "city", alias = "local", alias = "local_ride")]
    LocalRide,
}

impl TripType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OneWay => "one-way",
            Self::RoundTrip => "round-trip",
            Self::LocalRide => "city",
        }
    }

    /// Local rides skip location, distance and price collection.
    pub fn needs_route(&self) -> bool {
        !matches!(self, Self::LocalRide)
    }
}

/// Trip details as entered in the booking form.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TripRequest {
    #[serde(default)]
    pub pickup: String,
    #[serde(default)]
    pub dropoff: String,
    pub trip_type: TripType,
    pub pickup_date: DateTime<Utc>,
    #[serde(default)]
    pub dropoff_date: Option<DateTime<Utc>>,
}

impl TripRequest {
    pub fn one_way(pickup: &str, dropoff: &str, pickup_date: DateTime<Utc>) -> Self {
        Self {
            pickup: pickup.into(),
            dropoff: dropoff.into(),
            trip_type: TripType::OneWay,
            pickup_date,
            dropoff_date: None,
        }
    }

    pub fn round_trip(
        pickup: &str,
        dropoff: &str,
        pickup_date: DateTime<Utc>,
        dropoff_date: DateTime<Utc>,
    ) -> Self {
        Self {
            pickup: pickup.into(),
            dropoff: dropoff.into(),
            trip_type: TripType::RoundTrip,
            pickup_date,
            dropoff_date: Some(dropoff_date),
        }
    }

    pub fn local_ride(pickup_date: DateTime<Utc>) -> Self {
        Self {
            pickup: String::new(),
            dropoff: String::new(),
            trip_type: TripType::LocalRide,
            pickup_date,
            dropoff_date: None,
        }
    }

    pub fn validate(&self, now: DateTime<Utc>) -> Result<(), InputValidationError> {
        let mut v = Validator::new();

        if self.trip_type.needs_route() {
            v.check(
                is_valid_location(&self.pickup),
                "pickupLocation",
                "enter a pickup location of at least 3 characters",
            );
            v.check(
                is_valid_location(&self.dropoff),
                "dropoffLocation",
                "enter a drop-off location of at least 3 characters",
            );
        }

        v.check(
            self.pickup_date >= now,
            "pickupDate",
            "pickup date cannot be in the past",
        );

        if self.trip_type == TripType::RoundTrip {
            match self.dropoff_date {
                None => {
                    v.check(false, "dropoffDate", "drop-off date is required for round trips");
                }
                Some(dropoff_date) => {
                    v.check(
                        dropoff_date > self.pickup_date,
                        "dropoffDate",
                        "drop-off date must be after pickup date",
                    );
                }
            }
        }

        v.finish()
    }

    /// Pickup, drop-off and trip type are what a distance estimate depends on.
    pub fn same_route(&self, other: &TripRequest) -> bool {
        self.trip_type == other.trip_type
            && self.pickup.trim() == other.pickup.trim()
            && self.dropoff.trim() == other.dropoff.trim()
    }

    pub fn number_of_days(&self) -> Option<u32> {
        match (self.trip_type, self.dropoff_date) {
            (TripType::RoundTrip, Some(dropoff_date)) => {
                Some(fare::number_of_days(self.pickup_date, dropoff_date))
            }
            _ => None,
        }
    }
}
