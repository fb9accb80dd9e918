use axum::extract::{Extension, Json, Path};

use crate::api::{BookingAPI, DynAPI};
use crate::entities::InquiryRecord;
use crate::error::Error;

pub async fn find(
    Extension(api): Extension<DynAPI>,
    Path(booking_id): Path<String>,
) -> Result<Json<InquiryRecord>, Error> {
    let booking = api.find_booking(&booking_id).await?;

    Ok(booking.into())
}
