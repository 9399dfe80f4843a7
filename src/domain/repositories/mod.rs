pub mod bookings;
pub mod directory;
pub mod notifications;
pub mod payments;
pub mod reviews;
