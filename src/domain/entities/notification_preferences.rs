use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::user_notification_preferences;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = user_notification_preferences, primary_key(user_id))]
pub struct NotificationPreferenceEntity {
    pub user_id: Uuid,
    pub email_notifications_enabled: bool,
    pub sms_notifications_enabled: bool,
    pub push_notifications_enabled: bool,
    pub in_app_notifications_enabled: bool,
    pub booking_notifications: bool,
    pub review_notifications: bool,
    pub promotion_notifications: bool,
    pub system_notifications: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Row inserted the first time a user's preferences are read. Every toggle
/// falls back to its column default.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = user_notification_preferences)]
pub struct InsertNotificationPreferenceEntity {
    pub user_id: Uuid,
}

#[derive(Debug, Clone, PartialEq, AsChangeset)]
#[diesel(table_name = user_notification_preferences)]
pub struct EditNotificationPreferenceEntity {
    pub email_notifications_enabled: Option<bool>,
    pub sms_notifications_enabled: Option<bool>,
    pub push_notifications_enabled: Option<bool>,
    pub in_app_notifications_enabled: Option<bool>,
    pub booking_notifications: Option<bool>,
    pub review_notifications: Option<bool>,
    pub promotion_notifications: Option<bool>,
    pub system_notifications: Option<bool>,
    pub updated_at: DateTime<Utc>,
}
