use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::bookings;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = bookings)]
pub struct BookingEntity {
    pub id: Uuid,
    pub client_id: Uuid,
    pub provider_id: Uuid,
    pub service_id: Uuid,
    pub status: String,
    pub payment_status: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration_minutes: i32,
    pub price_minor: i64,
    pub location_type: String,
    pub meeting_link: String,
    pub address: String,
    pub special_requests: String,
    pub cancellation_reason: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub cancelled_at: Option<DateTime<Utc>>,
}

impl BookingEntity {
    pub fn is_party(&self, user_id: Uuid) -> bool {
        self.client_id == user_id || self.provider_id == user_id
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = bookings)]
pub struct InsertBookingEntity {
    pub client_id: Uuid,
    pub provider_id: Uuid,
    pub service_id: Uuid,
    pub status: String,
    pub payment_status: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration_minutes: i32,
    pub price_minor: i64,
    pub location_type: String,
    pub meeting_link: String,
    pub address: String,
    pub special_requests: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, AsChangeset)]
#[diesel(table_name = bookings)]
pub struct EditBookingEntity {
    pub status: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub duration_minutes: Option<i32>,
    pub meeting_link: Option<String>,
    pub address: Option<String>,
    pub special_requests: Option<String>,
    pub cancellation_reason: Option<String>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

impl Default for EditBookingEntity {
    fn default() -> Self {
        Self {
            status: None,
            start_time: None,
            end_time: None,
            duration_minutes: None,
            meeting_link: None,
            address: None,
            special_requests: None,
            cancellation_reason: None,
            cancelled_at: None,
            updated_at: Utc::now(),
        }
    }
}
