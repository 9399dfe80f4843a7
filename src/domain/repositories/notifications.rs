use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockall::automock;
use uuid::Uuid;

use crate::domain::{
    entities::{
        notification_preferences::{
            EditNotificationPreferenceEntity, NotificationPreferenceEntity,
        },
        notifications::NotificationEntity,
    },
    value_objects::notifications::NotificationListFilter,
};

#[automock]
#[async_trait]
pub trait NotificationRepository {
    async fn list(&self, filter: &NotificationListFilter) -> Result<Vec<NotificationEntity>>;
    async fn find_by_id(&self, notification_id: Uuid) -> Result<Option<NotificationEntity>>;
    /// Sets `is_read`; `read_at` is only written when it is still empty.
    async fn mark_read(
        &self,
        notification_id: Uuid,
        read_at: DateTime<Utc>,
    ) -> Result<NotificationEntity>;
    async fn get_or_create_preferences(&self, user_id: Uuid)
    -> Result<NotificationPreferenceEntity>;
    async fn update_preferences(
        &self,
        user_id: Uuid,
        edit_preference_entity: EditNotificationPreferenceEntity,
    ) -> Result<NotificationPreferenceEntity>;
}
