use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::validation::Validator;
use crate::entities::{
    BookingPayload, BookingReceipt, CarType, ContactDetails, DistanceEstimate, PriceQuote,
    TripRequest,
};
use crate::error::{
    invalid_input_error, invalid_state_error, submission_in_progress_error, Error,
};

/// A car the visitor clicked, bound to the quote and distance it was priced with.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SelectedCar {
    pub car_type: CarType,
    pub quote: PriceQuote,
    pub distance: Option<DistanceEstimate>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "snake_case")]
pub enum Status {
    Idle,
    LocationsEntered,
    DistanceResolving,
    DistanceResolved,
    CarSelected,
    Submitting,
    Confirmed { booking_id: String },
}

impl Status {
    pub fn name(&self) -> String {
        match self {
            Self::Idle => "idle".into(),
            Self::LocationsEntered => "locations_entered".into(),
            Self::DistanceResolving => "distance_resolving".into(),
            Self::DistanceResolved => "distance_resolved".into(),
            Self::CarSelected => "car_selected".into(),
            Self::Submitting => "submitting".into(),
            Self::Confirmed { booking_id: _ } => "confirmed".into(),
        }
    }

    /// States in which an awaited network call owns the session.
    pub fn is_in_flight(&self) -> bool {
        matches!(self, Self::DistanceResolving | Self::Submitting)
    }
}

/// One visitor's pass through the booking modal.
///
/// Failed distance lookups and failed submissions do not park the session in a
/// separate state: the error is kept in `last_error` and the session goes back
/// to the stable state it left, so nothing the visitor entered is lost.
///
/// Every lookup or submission gets an attempt number when it starts. Its
/// outcome is only applied while that attempt is still the current one.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BookingSession {
    pub id: Uuid,
    pub status: Status,
    pub trip: Option<TripRequest>,
    pub distance: Option<DistanceEstimate>,
    pub selected: Option<SelectedCar>,
    pub receipt: Option<BookingReceipt>,
    pub last_error: Option<Error>,
    #[serde(skip)]
    attempt: u64,
}

impl Default for BookingSession {
    fn default() -> Self {
        Self::new()
    }
}

impl BookingSession {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            status: Status::Idle,
            trip: None,
            distance: None,
            selected: None,
            receipt: None,
            last_error: None,
            attempt: 0,
        }
    }

    fn next_attempt(&mut self) -> u64 {
        self.attempt += 1;
        self.attempt
    }

    fn is_current(&self, status: Status, attempt: u64) -> bool {
        self.status == status && self.attempt == attempt
    }

    pub fn trip(&self) -> Result<&TripRequest, Error> {
        self.trip
            .as_ref()
            .ok_or_else(|| invalid_state_error("trip details have not been entered"))
    }

    #[tracing::instrument(skip(self, trip), fields(session = %self.id))]
    pub fn enter_trip(&mut self, trip: TripRequest, now: DateTime<Utc>) -> Result<(), Error> {
        match self.status {
            Status::DistanceResolving => {
                return Err(invalid_state_error("distance is still being resolved"))
            }
            Status::Submitting => return Err(submission_in_progress_error()),
            Status::Confirmed { booking_id: _ } => {
                return Err(invalid_state_error("booking is already confirmed"))
            }
            _ => (),
        }

        trip.validate(now)?;

        let keep_distance = trip.trip_type.needs_route()
            && self.distance.is_some()
            && self
                .trip
                .as_ref()
                .map(|previous| previous.same_route(&trip))
                .unwrap_or(false);

        if !keep_distance {
            self.distance = None;
        }

        self.selected = None;
        self.last_error = None;
        self.trip = Some(trip);
        self.status = match keep_distance {
            true => Status::DistanceResolved,
            false => Status::LocationsEntered,
        };

        Ok(())
    }

    /// Moves into `DistanceResolving` and hands back the attempt number with
    /// the locations to resolve.
    #[tracing::instrument(skip(self), fields(session = %self.id))]
    pub fn begin_resolving(&mut self) -> Result<(u64, String, String), Error> {
        if self.status != Status::LocationsEntered {
            return Err(invalid_state_error("enter trip details before resolving distance"));
        }

        let trip = self.trip()?;

        if !trip.trip_type.needs_route() {
            return Err(invalid_state_error("local rides are booked without a distance"));
        }

        let pickup = trip.pickup.trim().to_string();
        let dropoff = trip.dropoff.trim().to_string();
        self.status = Status::DistanceResolving;

        Ok((self.next_attempt(), pickup, dropoff))
    }

    #[tracing::instrument(skip(self), fields(session = %self.id))]
    pub fn finish_resolving(
        &mut self,
        attempt: u64,
        estimate: DistanceEstimate,
    ) -> Result<(), Error> {
        if !self.is_current(Status::DistanceResolving, attempt) {
            return Err(invalid_state_error("distance lookup is no longer current"));
        }

        self.distance = Some(estimate);
        self.last_error = None;
        self.status = Status::DistanceResolved;

        Ok(())
    }

    #[tracing::instrument(skip(self), fields(session = %self.id))]
    pub fn abort_resolving(&mut self, attempt: u64, error: Error) -> Result<(), Error> {
        if !self.is_current(Status::DistanceResolving, attempt) {
            return Err(invalid_state_error("distance lookup is no longer current"));
        }

        self.last_error = Some(error);
        self.status = Status::LocationsEntered;

        Ok(())
    }

    /// Binds a priced car to the session. Can be repeated to switch cars.
    #[tracing::instrument(skip(self, car_type, quote), fields(session = %self.id))]
    pub fn select_car(&mut self, car_type: CarType, quote: PriceQuote) -> Result<(), Error> {
        let trip = self.trip()?;

        let allowed = match self.status {
            Status::DistanceResolved | Status::CarSelected => true,
            Status::LocationsEntered => !trip.trip_type.needs_route(),
            _ => false,
        };

        if !allowed {
            return Err(invalid_state_error("resolve the distance before choosing a car"));
        }

        if quote.trip_type() != trip.trip_type {
            return Err(invalid_input_error("quote does not match the trip type"));
        }

        self.selected = Some(SelectedCar {
            car_type,
            quote,
            distance: self.distance.clone(),
        });
        self.last_error = None;
        self.status = Status::CarSelected;

        Ok(())
    }

    #[tracing::instrument(skip(self), fields(session = %self.id))]
    pub fn deselect_car(&mut self) -> Result<(), Error> {
        if self.status != Status::CarSelected {
            return Err(invalid_state_error("no car is selected"));
        }

        self.selected = None;
        self.status = match self.distance {
            Some(_) => Status::DistanceResolved,
            None => Status::LocationsEntered,
        };

        Ok(())
    }

    /// Runs the full form validation and moves into `Submitting`.
    ///
    /// Only one submission can be in flight: a second call while `Submitting`
    /// is rejected without touching the session.
    #[tracing::instrument(skip(self, contact), fields(session = %self.id))]
    pub fn begin_submit(
        &mut self,
        contact: &ContactDetails,
        now: DateTime<Utc>,
    ) -> Result<(u64, BookingPayload), Error> {
        match self.status {
            Status::Submitting => return Err(submission_in_progress_error()),
            Status::CarSelected => (),
            _ => return Err(invalid_state_error("choose a car before confirming")),
        }

        let trip = self.trip()?;
        let selected = self
            .selected
            .as_ref()
            .ok_or_else(|| invalid_state_error("choose a car before confirming"))?;

        let mut v = Validator::new();
        if let Err(err) = trip.validate(now) {
            v.extend(err.errors);
        }
        v.extend(contact.validate());
        v.finish()?;

        let payload = BookingPayload::new(contact, trip, selected);

        self.last_error = None;
        self.status = Status::Submitting;

        Ok((self.next_attempt(), payload))
    }

    #[tracing::instrument(skip(self, receipt), fields(session = %self.id))]
    pub fn finish_submit(&mut self, attempt: u64, receipt: BookingReceipt) -> Result<(), Error> {
        if !self.is_current(Status::Submitting, attempt) {
            return Err(invalid_state_error("no submission in progress"));
        }

        self.status = Status::Confirmed {
            booking_id: receipt.booking_id.clone(),
        };
        self.receipt = Some(receipt);

        Ok(())
    }

    /// Returns to `CarSelected` keeping the selection so the visitor can retry.
    #[tracing::instrument(skip(self), fields(session = %self.id))]
    pub fn fail_submit(&mut self, attempt: u64, error: Error) -> Result<(), Error> {
        if !self.is_current(Status::Submitting, attempt) {
            return Err(invalid_state_error("no submission in progress"));
        }

        self.last_error = Some(error);
        self.status = Status::CarSelected;

        Ok(())
    }

    /// Modal closed or confirmation handed off: back to an empty session.
    ///
    /// A submission cannot be abandoned once sent. A distance lookup can, and
    /// its result is dropped when it arrives.
    #[tracing::instrument(skip(self), fields(session = %self.id))]
    pub fn reset(&mut self) -> Result<(), Error> {
        if self.status == Status::Submitting {
            return Err(submission_in_progress_error());
        }

        let (id, attempt) = (self.id, self.attempt);
        *self = Self::new();
        self.id = id;
        self.attempt = attempt;

        Ok(())
    }
}
