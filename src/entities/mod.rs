mod booking;
mod car_type;
mod contact;
pub(crate) mod decimal;
mod distance;
mod quote;
mod session;
mod trip;
mod validation;

pub use booking::{
    round_to_cents, BookingPayload, BookingReceipt, BookingRecord, CarAvailability,
    InquiryRecord,
};
pub use car_type::{fallback_car_types, find_active, CarType, DEFAULT_RATE_SPREAD};
pub use contact::ContactDetails;
pub use distance::{DistanceEstimate, DistanceSource};
pub use quote::PriceQuote;
pub use session::{BookingSession, SelectedCar, Status as SessionStatus};
pub use trip::{TripRequest, TripType};
pub use validation::{is_valid_location, FieldError, InputValidationError};
