use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::booking_change_logs;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = booking_change_logs)]
pub struct BookingChangeLogEntity {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub previous_status: String,
    pub new_status: String,
    pub changed_by: Option<Uuid>,
    pub reason: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = booking_change_logs)]
pub struct InsertBookingChangeLogEntity {
    pub booking_id: Uuid,
    pub previous_status: String,
    pub new_status: String,
    pub changed_by: Option<Uuid>,
    pub reason: String,
    pub timestamp: DateTime<Utc>,
}
