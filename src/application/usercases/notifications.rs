use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::domain::{
    repositories::notifications::NotificationRepository,
    value_objects::{
        caller::Caller,
        notifications::{
            NotificationListFilter, NotificationModel, NotificationPreferenceModel,
            UpdateNotificationPreferenceModel,
        },
        pagination::PaginationQuery,
    },
};

#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("{0}")]
    Validation(String),
    #[error("notification not found")]
    NotFound,
    #[error("you are not the recipient of this notification")]
    Forbidden,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl NotificationError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            NotificationError::Validation(_) => StatusCode::BAD_REQUEST,
            NotificationError::NotFound => StatusCode::NOT_FOUND,
            NotificationError::Forbidden => StatusCode::FORBIDDEN,
            NotificationError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type UseCaseResult<T> = std::result::Result<T, NotificationError>;

pub struct NotificationUseCase<N>
where
    N: NotificationRepository + Send + Sync + 'static,
{
    notification_repo: Arc<N>,
}

impl<N> NotificationUseCase<N>
where
    N: NotificationRepository + Send + Sync + 'static,
{
    pub fn new(notification_repo: Arc<N>) -> Self {
        Self { notification_repo }
    }

    pub async fn list(
        &self,
        caller: Caller,
        query: PaginationQuery,
    ) -> UseCaseResult<Vec<NotificationModel>> {
        self.list_filtered(caller, query, false).await
    }

    pub async fn list_unread(
        &self,
        caller: Caller,
        query: PaginationQuery,
    ) -> UseCaseResult<Vec<NotificationModel>> {
        self.list_filtered(caller, query, true).await
    }

    /// Idempotent: a notification keeps the `read_at` of its first read.
    pub async fn mark_read(
        &self,
        caller: Caller,
        notification_id: Uuid,
    ) -> UseCaseResult<NotificationModel> {
        let user_id = caller.user_id;
        let notification = self
            .notification_repo
            .find_by_id(notification_id)
            .await
            .map_err(|err| {
                error!(%notification_id, db_error = ?err, "notifications: failed to load notification");
                NotificationError::Internal(err)
            })?
            .ok_or(NotificationError::NotFound)?;

        if notification.recipient_id != user_id {
            warn!(
                %user_id,
                %notification_id,
                status = axum::http::StatusCode::FORBIDDEN.as_u16(),
                "notifications: mark read by non-recipient"
            );
            return Err(NotificationError::Forbidden);
        }

        if notification.read_at.is_some() {
            debug!(%notification_id, "notifications: already read");
            return NotificationModel::from_entity(notification).map_err(NotificationError::Internal);
        }

        let notification = self
            .notification_repo
            .mark_read(notification_id, Utc::now())
            .await
            .map_err(|err| {
                error!(%notification_id, db_error = ?err, "notifications: failed to mark read");
                NotificationError::Internal(err)
            })?;

        info!(%user_id, %notification_id, "notifications: marked read");
        NotificationModel::from_entity(notification).map_err(NotificationError::Internal)
    }

    pub async fn get_preferences(
        &self,
        caller: Caller,
    ) -> UseCaseResult<NotificationPreferenceModel> {
        let user_id = caller.user_id;
        let preferences = self
            .notification_repo
            .get_or_create_preferences(user_id)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "notifications: failed to load preferences");
                NotificationError::Internal(err)
            })?;

        Ok(NotificationPreferenceModel::from(preferences))
    }

    pub async fn update_preferences(
        &self,
        caller: Caller,
        update_preference_model: UpdateNotificationPreferenceModel,
    ) -> UseCaseResult<NotificationPreferenceModel> {
        let user_id = caller.user_id;
        let preferences = self
            .notification_repo
            .update_preferences(user_id, update_preference_model.to_entity())
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "notifications: failed to update preferences");
                NotificationError::Internal(err)
            })?;

        info!(%user_id, "notifications: preferences updated");
        Ok(NotificationPreferenceModel::from(preferences))
    }

    async fn list_filtered(
        &self,
        caller: Caller,
        query: PaginationQuery,
        unread_only: bool,
    ) -> UseCaseResult<Vec<NotificationModel>> {
        let pagination = query.validate().map_err(NotificationError::Validation)?;
        let filter = NotificationListFilter {
            recipient_id: caller.user_id,
            unread_only,
            pagination,
        };

        let notifications = self.notification_repo.list(&filter).await.map_err(|err| {
            error!(user_id = %caller.user_id, db_error = ?err, "notifications: failed to list notifications");
            NotificationError::Internal(err)
        })?;

        notifications
            .into_iter()
            .map(|notification| {
                NotificationModel::from_entity(notification).map_err(NotificationError::Internal)
            })
            .collect()
    }
}
