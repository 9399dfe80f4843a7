use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain::{
        entities::{
            notification_preferences::{
                EditNotificationPreferenceEntity, InsertNotificationPreferenceEntity,
                NotificationPreferenceEntity,
            },
            notifications::NotificationEntity,
        },
        repositories::notifications::NotificationRepository,
        value_objects::notifications::NotificationListFilter,
    },
    infrastructure::postgres::{
        postgres_connection::PgPoolSquad,
        schema::{notifications, user_notification_preferences},
    },
};

pub struct NotificationPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl NotificationPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

fn ensure_preferences(conn: &mut PgConnection, user_id: Uuid) -> QueryResult<usize> {
    diesel::insert_into(user_notification_preferences::table)
        .values(&InsertNotificationPreferenceEntity { user_id })
        .on_conflict(user_notification_preferences::user_id)
        .do_nothing()
        .execute(conn)
}

#[async_trait]
impl NotificationRepository for NotificationPostgres {
    async fn list(&self, filter: &NotificationListFilter) -> Result<Vec<NotificationEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let mut query = notifications::table
            .filter(notifications::recipient_id.eq(filter.recipient_id))
            .select(NotificationEntity::as_select())
            .into_boxed();

        if filter.unread_only {
            query = query.filter(notifications::is_read.eq(false));
        }

        let results = query
            .order(notifications::created_at.desc())
            .limit(filter.pagination.limit)
            .offset(filter.pagination.offset)
            .load::<NotificationEntity>(&mut conn)?;

        Ok(results)
    }

    async fn find_by_id(&self, notification_id: Uuid) -> Result<Option<NotificationEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let notification = notifications::table
            .find(notification_id)
            .select(NotificationEntity::as_select())
            .first::<NotificationEntity>(&mut conn)
            .optional()?;

        Ok(notification)
    }

    async fn mark_read(
        &self,
        notification_id: Uuid,
        read_at: DateTime<Utc>,
    ) -> Result<NotificationEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let notification = conn.transaction::<NotificationEntity, diesel::result::Error, _>(|tx| {
            diesel::update(notifications::table.find(notification_id))
                .set((
                    notifications::is_read.eq(true),
                    notifications::updated_at.eq(read_at),
                ))
                .execute(tx)?;

            // The first read wins.
            diesel::update(
                notifications::table
                    .find(notification_id)
                    .filter(notifications::read_at.is_null()),
            )
            .set(notifications::read_at.eq(Some(read_at)))
            .execute(tx)?;

            notifications::table
                .find(notification_id)
                .select(NotificationEntity::as_select())
                .first::<NotificationEntity>(tx)
        })?;

        Ok(notification)
    }

    async fn get_or_create_preferences(
        &self,
        user_id: Uuid,
    ) -> Result<NotificationPreferenceEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let preferences =
            conn.transaction::<NotificationPreferenceEntity, diesel::result::Error, _>(|tx| {
                ensure_preferences(tx, user_id)?;

                user_notification_preferences::table
                    .find(user_id)
                    .select(NotificationPreferenceEntity::as_select())
                    .first::<NotificationPreferenceEntity>(tx)
            })?;

        Ok(preferences)
    }

    async fn update_preferences(
        &self,
        user_id: Uuid,
        edit_preference_entity: EditNotificationPreferenceEntity,
    ) -> Result<NotificationPreferenceEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let preferences =
            conn.transaction::<NotificationPreferenceEntity, diesel::result::Error, _>(|tx| {
                ensure_preferences(tx, user_id)?;

                diesel::update(user_notification_preferences::table.find(user_id))
                    .set(&edit_preference_entity)
                    .returning(NotificationPreferenceEntity::as_select())
                    .get_result::<NotificationPreferenceEntity>(tx)
            })?;

        Ok(preferences)
    }
}
