pub mod booking_change_logs;
pub mod bookings;
pub mod notification_preferences;
pub mod notifications;
pub mod payments;
pub mod refunds;
pub mod review_comments;
pub mod review_helpful_votes;
pub mod reviews;
pub mod services;
pub mod users;
