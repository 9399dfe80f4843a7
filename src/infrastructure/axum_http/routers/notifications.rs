use crate::{
    application::usercases::notifications::NotificationUseCase,
    domain::{
        repositories::notifications::NotificationRepository,
        value_objects::{
            notifications::UpdateNotificationPreferenceModel, pagination::PaginationQuery,
        },
    },
    infrastructure::{
        axum_http::{auth::AuthUser, error_responses::AppError},
        postgres::{
            postgres_connection::PgPoolSquad, repositories::notifications::NotificationPostgres,
        },
    },
};
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::{get, post},
};
use std::sync::Arc;
use uuid::Uuid;

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let notification_repository = NotificationPostgres::new(Arc::clone(&db_pool));
    let usecase = NotificationUseCase::new(Arc::new(notification_repository));

    Router::new()
        .route("/notifications", get(list_notifications))
        .route("/notifications/unread", get(list_unread_notifications))
        .route(
            "/notifications/preferences",
            get(get_preferences)
                .put(update_preferences)
                .patch(update_preferences),
        )
        .route("/notifications/:id/mark-read", post(mark_read))
        .with_state(Arc::new(usecase))
}

pub async fn list_notifications<N>(
    State(usecase): State<Arc<NotificationUseCase<N>>>,
    auth: AuthUser,
    Query(query): Query<PaginationQuery>,
) -> impl IntoResponse
where
    N: NotificationRepository + Send + Sync + 'static,
{
    match usecase.list(auth.caller(), query).await {
        Ok(notifications) => Json(notifications).into_response(),
        Err(err) => AppError::from(err).into_response(),
    }
}

pub async fn list_unread_notifications<N>(
    State(usecase): State<Arc<NotificationUseCase<N>>>,
    auth: AuthUser,
    Query(query): Query<PaginationQuery>,
) -> impl IntoResponse
where
    N: NotificationRepository + Send + Sync + 'static,
{
    match usecase.list_unread(auth.caller(), query).await {
        Ok(notifications) => Json(notifications).into_response(),
        Err(err) => AppError::from(err).into_response(),
    }
}

pub async fn mark_read<N>(
    State(usecase): State<Arc<NotificationUseCase<N>>>,
    auth: AuthUser,
    Path(notification_id): Path<Uuid>,
) -> impl IntoResponse
where
    N: NotificationRepository + Send + Sync + 'static,
{
    match usecase.mark_read(auth.caller(), notification_id).await {
        Ok(notification) => Json(notification).into_response(),
        Err(err) => AppError::from(err).into_response(),
    }
}

pub async fn get_preferences<N>(
    State(usecase): State<Arc<NotificationUseCase<N>>>,
    auth: AuthUser,
) -> impl IntoResponse
where
    N: NotificationRepository + Send + Sync + 'static,
{
    match usecase.get_preferences(auth.caller()).await {
        Ok(preferences) => Json(preferences).into_response(),
        Err(err) => AppError::from(err).into_response(),
    }
}

pub async fn update_preferences<N>(
    State(usecase): State<Arc<NotificationUseCase<N>>>,
    auth: AuthUser,
    Json(update_preference_model): Json<UpdateNotificationPreferenceModel>,
) -> impl IntoResponse
where
    N: NotificationRepository + Send + Sync + 'static,
{
    match usecase
        .update_preferences(auth.caller(), update_preference_model)
        .await
    {
        Ok(preferences) => Json(preferences).into_response(),
        Err(err) => AppError::from(err).into_response(),
    }
}
