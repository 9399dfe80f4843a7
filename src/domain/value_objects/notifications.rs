use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    entities::{
        notification_preferences::{
            EditNotificationPreferenceEntity, NotificationPreferenceEntity,
        },
        notifications::NotificationEntity,
    },
    value_objects::{
        enums::{
            notification_channels::NotificationChannel,
            notification_statuses::NotificationStatus, notification_types::NotificationType,
        },
        pagination::Pagination,
    },
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NotificationModel {
    pub id: Uuid,
    pub recipient_id: Uuid,
    #[serde(rename = "type")]
    pub notification_type: NotificationType,
    pub channel: NotificationChannel,
    pub status: NotificationStatus,
    pub title: String,
    pub message: String,
    pub data: serde_json::Value,
    pub is_read: bool,
    pub read_at: Option<DateTime<Utc>>,
    pub sent_at: Option<DateTime<Utc>>,
    pub delivered_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl NotificationModel {
    pub fn from_entity(entity: NotificationEntity) -> Result<Self> {
        Ok(Self {
            id: entity.id,
            recipient_id: entity.recipient_id,
            notification_type: entity.type_.parse()?,
            channel: entity.channel.parse()?,
            status: entity.status.parse()?,
            title: entity.title,
            message: entity.message,
            data: entity.data,
            is_read: entity.is_read,
            read_at: entity.read_at,
            sent_at: entity.sent_at,
            delivered_at: entity.delivered_at,
            created_at: entity.created_at,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NotificationListFilter {
    pub recipient_id: Uuid,
    pub unread_only: bool,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NotificationPreferenceModel {
    pub user_id: Uuid,
    pub email_notifications_enabled: bool,
    pub sms_notifications_enabled: bool,
    pub push_notifications_enabled: bool,
    pub in_app_notifications_enabled: bool,
    pub booking_notifications: bool,
    pub review_notifications: bool,
    pub promotion_notifications: bool,
    pub system_notifications: bool,
    pub updated_at: DateTime<Utc>,
}

impl From<NotificationPreferenceEntity> for NotificationPreferenceModel {
    fn from(entity: NotificationPreferenceEntity) -> Self {
        Self {
            user_id: entity.user_id,
            email_notifications_enabled: entity.email_notifications_enabled,
            sms_notifications_enabled: entity.sms_notifications_enabled,
            push_notifications_enabled: entity.push_notifications_enabled,
            in_app_notifications_enabled: entity.in_app_notifications_enabled,
            booking_notifications: entity.booking_notifications,
            review_notifications: entity.review_notifications,
            promotion_notifications: entity.promotion_notifications,
            system_notifications: entity.system_notifications,
            updated_at: entity.updated_at,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UpdateNotificationPreferenceModel {
    pub email_notifications_enabled: Option<bool>,
    pub sms_notifications_enabled: Option<bool>,
    pub push_notifications_enabled: Option<bool>,
    pub in_app_notifications_enabled: Option<bool>,
    pub booking_notifications: Option<bool>,
    pub review_notifications: Option<bool>,
    pub promotion_notifications: Option<bool>,
    pub system_notifications: Option<bool>,
}

impl UpdateNotificationPreferenceModel {
    pub fn to_entity(&self) -> EditNotificationPreferenceEntity {
        EditNotificationPreferenceEntity {
            email_notifications_enabled: self.email_notifications_enabled,
            sms_notifications_enabled: self.sms_notifications_enabled,
            push_notifications_enabled: self.push_notifications_enabled,
            in_app_notifications_enabled: self.in_app_notifications_enabled,
            booking_notifications: self.booking_notifications,
            review_notifications: self.review_notifications,
            promotion_notifications: self.promotion_notifications,
            system_notifications: self.system_notifications,
            updated_at: Utc::now(),
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn notification(recipient_id: Uuid) -> NotificationEntity {
        let now = Utc::now();
        NotificationEntity {
            id: Uuid::new_v4(),
            recipient_id,
            type_: NotificationType::BookingConfirmed.to_string(),
            channel: NotificationChannel::InApp.to_string(),
            status: NotificationStatus::Pending.to_string(),
            title: "Booking confirmed".to_string(),
            message: "Your booking was confirmed".to_string(),
            data: serde_json::json!({}),
            is_read: false,
            read_at: None,
            sent_at: None,
            delivered_at: None,
            failed_at: None,
            failure_reason: String::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::notification;
    use super::*;

    #[test]
    fn notification_type_serializes_under_type_key() {
        let model = NotificationModel::from_entity(notification(Uuid::new_v4())).unwrap();
        let json = serde_json::to_value(&model).unwrap();
        assert_eq!(json["type"], "booking_confirmed");
        assert_eq!(json["channel"], "in_app");
    }
}
