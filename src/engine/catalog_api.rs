use super::Engine;

use std::collections::HashMap;

use async_trait::async_trait;

use crate::{
    api::CatalogAPI,
    entities::{CarAvailability, CarType},
    error::{invalid_input_error, Error},
};

#[async_trait]
impl CatalogAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn car_types(&self) -> Result<Vec<CarType>, Error> {
        let active = self
            .catalog()
            .await
            .iter()
            .filter(|c| c.is_active)
            .cloned()
            .collect();

        Ok(active)
    }

    #[tracing::instrument(skip(self))]
    async fn available_cars_by_type(&self) -> Result<HashMap<String, Vec<String>>, Error> {
        match self.backend.available_cars_by_type().await {
            Ok(cars) => Ok(cars),
            Err(err) => {
                tracing::warn!("{}, showing no available cars", err);
                Ok(HashMap::new())
            }
        }
    }

    #[tracing::instrument(skip(self))]
    async fn car_availability(&self, car_id: &str) -> Result<CarAvailability, Error> {
        let car_id = car_id.trim();

        if car_id.is_empty() {
            return Err(invalid_input_error("car id is required"));
        }

        self.backend.car_availability(car_id).await
    }
}
