use axum::extract::{Extension, Json, Query};
use serde::{Deserialize, Serialize};

use crate::api::{DynAPI, QuoteAPI};
use crate::entities::{DistanceEstimate, PriceQuote, TripType};
use crate::error::Error;

#[derive(Serialize, Deserialize)]
pub struct DistanceParams {
    #[serde(default)]
    pickup: String,
    #[serde(default)]
    dropoff: String,
}

/// Estimate plus the ETA shown next to it.
#[derive(Serialize, Deserialize)]
pub struct DistanceResponse {
    #[serde(flatten)]
    estimate: DistanceEstimate,
    eta_seconds: f64,
}

#[derive(Serialize, Deserialize)]
pub struct CreateParams {
    distance_km: f64,
    trip_type: TripType,
    car_type: String,
    #[serde(default)]
    number_of_days: Option<u32>,
}

pub async fn distance(
    Extension(api): Extension<DynAPI>,
    Query(params): Query<DistanceParams>,
) -> Result<Json<DistanceResponse>, Error> {
    let estimate = api
        .resolve_distance(&params.pickup, &params.dropoff)
        .await?;

    Ok(DistanceResponse {
        eta_seconds: estimate.eta_seconds(),
        estimate,
    }
    .into())
}

pub async fn create(
    Extension(api): Extension<DynAPI>,
    Json(params): Json<CreateParams>,
) -> Result<Json<PriceQuote>, Error> {
    let quote = api
        .create_quote(
            params.distance_km,
            params.trip_type,
            &params.car_type,
            params.number_of_days,
        )
        .await?;

    Ok(quote.into())
}
