use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::decimal::decimal;
use crate::entities::{ContactDetails, SelectedCar, TripRequest, TripType};

/// Body of `POST /api/inquiry/create-booking/`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingPayload {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub trip_type: TripType,
    pub pickup_location: String,
    pub dropoff_location: String,
    pub pickup_date: DateTime<Utc>,
    pub dropoff_date: Option<DateTime<Utc>>,
    pub car_type: String,
    pub total_price: f64,
    pub distance: f64,
    pub special_requests: String,
}

impl BookingPayload {
    pub fn new(contact: &ContactDetails, trip: &TripRequest, selected: &SelectedCar) -> Self {
        let distance = selected
            .distance
            .as_ref()
            .map(|d| d.distance_km)
            .unwrap_or(0.0);

        Self {
            name: contact.name.trim().into(),
            email: contact.email.trim().into(),
            phone: contact.phone_digits(),
            trip_type: trip.trip_type,
            pickup_location: trip.pickup.trim().into(),
            dropoff_location: trip.dropoff.trim().into(),
            pickup_date: trip.pickup_date,
            dropoff_date: match trip.trip_type {
                TripType::RoundTrip => trip.dropoff_date,
                _ => None,
            },
            car_type: selected.car_type.name.clone(),
            total_price: selected.quote.booking_price().unwrap_or(0.0),
            distance,
            special_requests: contact.special_requests.clone().unwrap_or_default(),
        }
    }

    /// Monetary and distance fields cut to two decimals, as the backend stores them.
    pub fn rounded(mut self) -> Self {
        self.total_price = round_to_cents(self.total_price);
        self.distance = round_to_cents(self.distance);
        self
    }
}

pub fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// What the client keeps after a successful submission.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BookingReceipt {
    pub booking_id: String,
    pub data: Option<BookingRecord>,
}

/// Server-confirmed booking as echoed by the creation endpoint. Read-only.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookingRecord {
    pub id: Option<i64>,
    pub booking_id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub pickup_location: String,
    pub dropoff_location: String,
    pub pickup_date: String,
    pub dropoff_date: Option<String>,
    pub car_type: Option<String>,
    pub trip_type: String,
    #[serde(deserialize_with = "decimal")]
    pub distance: f64,
    #[serde(deserialize_with = "decimal")]
    pub total_price: f64,
    pub status: String,
    pub created_at: Option<String>,
}

/// Booking as returned by the lookup endpoint, in the backend's model naming.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InquiryRecord {
    pub id: Option<i64>,
    pub booking_id: String,
    pub name: String,
    pub email: String,
    pub number: String,
    pub origin: String,
    pub destination: String,
    pub datetime: String,
    pub return_datetime: Option<String>,
    pub car_type_name: Option<String>,
    pub trip_type: String,
    #[serde(deserialize_with = "decimal")]
    pub distance_km: f64,
    #[serde(deserialize_with = "decimal")]
    pub price: f64,
    pub special_requests: Option<String>,
    pub status: String,
    pub status_display: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CarAvailability {
    pub car_id: String,
    pub available: bool,
    pub car_name: String,
    pub car_type: String,
}
