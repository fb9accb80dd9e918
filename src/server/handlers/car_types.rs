use std::collections::HashMap;

use axum::extract::{Extension, Json, Path};

use crate::api::{CatalogAPI, DynAPI};
use crate::entities::{CarAvailability, CarType};
use crate::error::Error;

pub async fn list(Extension(api): Extension<DynAPI>) -> Result<Json<Vec<CarType>>, Error> {
    let car_types = api.car_types().await?;

    Ok(car_types.into())
}

pub async fn available(
    Extension(api): Extension<DynAPI>,
) -> Result<Json<HashMap<String, Vec<String>>>, Error> {
    let cars = api.available_cars_by_type().await?;

    Ok(cars.into())
}

pub async fn availability(
    Extension(api): Extension<DynAPI>,
    Path(car_id): Path<String>,
) -> Result<Json<CarAvailability>, Error> {
    let availability = api.car_availability(&car_id).await?;

    Ok(availability.into())
}
