use super::{fare, Engine};

use async_trait::async_trait;

use crate::{
    api::QuoteAPI,
    entities::{
        is_valid_location, DistanceEstimate, FieldError, InputValidationError, PriceQuote,
        TripType,
    },
    error::Error,
};

#[async_trait]
impl QuoteAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn resolve_distance(
        &self,
        pickup: &str,
        dropoff: &str,
    ) -> Result<DistanceEstimate, Error> {
        let mut errors = Vec::new();

        if !is_valid_location(pickup) {
            errors.push(FieldError::new(
                "pickupLocation",
                "enter a pickup location of at least 3 characters",
            ));
        }
        if !is_valid_location(dropoff) {
            errors.push(FieldError::new(
                "dropoffLocation",
                "enter a drop-off location of at least 3 characters",
            ));
        }
        if !errors.is_empty() {
            return Err(InputValidationError { errors }.into());
        }

        Ok(self.resolver.resolve(pickup.trim(), dropoff.trim()).await)
    }

    #[tracing::instrument(skip(self))]
    async fn create_quote(
        &self,
        distance_km: f64,
        trip_type: TripType,
        car_type: &str,
        number_of_days: Option<u32>,
    ) -> Result<PriceQuote, Error> {
        let catalog = self.catalog().await;

        let (_, quote) =
            fare::quote_by_name(distance_km, trip_type, catalog, car_type, number_of_days)?;

        Ok(quote)
    }
}
