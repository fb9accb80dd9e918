use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::entities::{
    BookingSession, CarAvailability, CarType, ContactDetails, DistanceEstimate, InquiryRecord,
    PriceQuote, TripRequest, TripType,
};
use crate::error::Error;

#[async_trait]
pub trait CatalogAPI {
    /// Active car types, from the backend or the built-in table.
    async fn car_types(&self) -> Result<Vec<CarType>, Error>;

    async fn available_cars_by_type(&self) -> Result<HashMap<String, Vec<String>>, Error>;

    async fn car_availability(&self, car_id: &str) -> Result<CarAvailability, Error>;
}

#[async_trait]
pub trait QuoteAPI {
    async fn resolve_distance(&self, pickup: &str, dropoff: &str)
        -> Result<DistanceEstimate, Error>;

    async fn create_quote(
        &self,
        distance_km: f64,
        trip_type: TripType,
        car_type: &str,
        number_of_days: Option<u32>,
    ) -> Result<PriceQuote, Error>;
}

#[async_trait]
pub trait SessionAPI {
    async fn create_session(&self) -> Result<BookingSession, Error>;
    async fn find_session(&self, id: Uuid) -> Result<BookingSession, Error>;
    async fn enter_trip(&self, id: Uuid, trip: TripRequest) -> Result<BookingSession, Error>;
    async fn resolve_session_distance(&self, id: Uuid) -> Result<BookingSession, Error>;
    async fn select_car(&self, id: Uuid, car_type: &str) -> Result<BookingSession, Error>;
    async fn deselect_car(&self, id: Uuid) -> Result<BookingSession, Error>;
    async fn reset_session(&self, id: Uuid) -> Result<BookingSession, Error>;
}

#[async_trait]
pub trait BookingAPI {
    async fn submit_booking(
        &self,
        id: Uuid,
        contact: ContactDetails,
    ) -> Result<BookingSession, Error>;

    async fn find_booking(&self, booking_id: &str) -> Result<InquiryRecord, Error>;
}

pub trait API: CatalogAPI + QuoteAPI + SessionAPI + BookingAPI {}

pub type DynAPI = Arc<dyn API + Send + Sync>;
