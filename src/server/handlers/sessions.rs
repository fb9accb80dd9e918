use axum::extract::{Extension, Json, Path};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::{BookingAPI, DynAPI, SessionAPI};
use crate::entities::{BookingSession, ContactDetails, TripRequest};
use crate::error::Error;

#[derive(Serialize, Deserialize)]
pub struct SelectCarParams {
    car_type: String,
}

pub async fn create(Extension(api): Extension<DynAPI>) -> Result<Json<BookingSession>, Error> {
    let session = api.create_session().await?;

    Ok(session.into())
}

pub async fn find(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<Uuid>,
) -> Result<Json<BookingSession>, Error> {
    let session = api.find_session(id).await?;

    Ok(session.into())
}

pub async fn enter_trip(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<Uuid>,
    Json(trip): Json<TripRequest>,
) -> Result<Json<BookingSession>, Error> {
    let session = api.enter_trip(id, trip).await?;

    Ok(session.into())
}

pub async fn resolve_distance(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<Uuid>,
) -> Result<Json<BookingSession>, Error> {
    let session = api.resolve_session_distance(id).await?;

    Ok(session.into())
}

pub async fn select_car(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<Uuid>,
    Json(params): Json<SelectCarParams>,
) -> Result<Json<BookingSession>, Error> {
    let session = api.select_car(id, &params.car_type).await?;

    Ok(session.into())
}

pub async fn deselect_car(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<Uuid>,
) -> Result<Json<BookingSession>, Error> {
    let session = api.deselect_car(id).await?;

    Ok(session.into())
}

#[axum_macros::debug_handler]
pub async fn submit(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<Uuid>,
    Json(contact): Json<ContactDetails>,
) -> Result<Json<BookingSession>, Error> {
    let session = api.submit_booking(id, contact).await?;

    Ok(session.into())
}

pub async fn reset(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<Uuid>,
) -> Result<Json<BookingSession>, Error> {
    let session = api.reset_session(id).await?;

    Ok(session.into())
}
