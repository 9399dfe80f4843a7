pub mod bookings;
pub mod caller;
pub mod enums;
pub mod notifications;
pub mod pagination;
pub mod payments;
pub mod reviews;
