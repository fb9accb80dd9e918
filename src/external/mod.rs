mod booking_backend;
mod distance_matrix;

pub use booking_backend::{interpret_submission, BookingBackend, HttpBookingBackend, SubmitError};
pub use distance_matrix::{DistanceMatrixClient, DistanceProvider, ProviderDistance, ProviderError};
