pub mod booking_payment_statuses;
pub mod booking_statuses;
pub mod currencies;
pub mod location_types;
pub mod notification_channels;
pub mod notification_statuses;
pub mod notification_types;
pub mod payment_methods;
pub mod payment_statuses;
pub mod refund_policies;
pub mod review_statuses;
