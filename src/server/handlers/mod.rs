pub mod bookings;
pub mod car_types;
pub mod quotes;
pub mod sessions;
