use super::Engine;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::{
    api::BookingAPI,
    entities::{BookingSession, ContactDetails, InquiryRecord},
    error::{invalid_input_error, Error},
};

#[async_trait]
impl BookingAPI for Engine {
    #[tracing::instrument(skip(self, contact))]
    async fn submit_booking(
        &self,
        id: Uuid,
        contact: ContactDetails,
    ) -> Result<BookingSession, Error> {
        let now = Utc::now();

        // validation failures return here, before anything is sent
        let (attempt, payload) = self
            .update_session(id, |session| session.begin_submit(&contact, now))
            .await?;

        match self.backend.create_booking(&payload).await {
            Ok(receipt) => {
                tracing::info!("session {} confirmed as {}", id, receipt.booking_id);

                self.update_session(id, |session| {
                    session.finish_submit(attempt, receipt)?;
                    Ok(session.clone())
                })
                .await
            }
            Err(err) => {
                let err = Error::from(err);

                self.update_session(id, |session| session.fail_submit(attempt, err.clone()))
                    .await?;

                Err(err)
            }
        }
    }

    #[tracing::instrument(skip(self))]
    async fn find_booking(&self, booking_id: &str) -> Result<InquiryRecord, Error> {
        let booking_id = booking_id.trim();

        if booking_id.is_empty() {
            return Err(invalid_input_error("booking id is required"));
        }

        self.backend.find_booking(booking_id).await
    }
}
