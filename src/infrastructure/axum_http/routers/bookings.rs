use crate::{
    application::usercases::bookings::BookingUseCase,
    domain::{
        repositories::{bookings::BookingRepository, directory::DirectoryRepository},
        value_objects::bookings::{
            BookingListQuery, CancelBookingModel, CreateBookingModel, UpdateBookingModel,
            UpdateBookingStatusModel,
        },
    },
    infrastructure::{
        axum_http::{auth::AuthUser, error_responses::AppError},
        postgres::{
            postgres_connection::PgPoolSquad,
            repositories::{bookings::BookingPostgres, directory::DirectoryPostgres},
        },
    },
};
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let booking_repository = BookingPostgres::new(Arc::clone(&db_pool));
    let directory_repository = DirectoryPostgres::new(Arc::clone(&db_pool));
    let usecase =
        BookingUseCase::new(Arc::new(booking_repository), Arc::new(directory_repository));

    Router::new()
        .route("/bookings", get(list_bookings).post(create_booking))
        .route(
            "/bookings/:id",
            get(get_booking)
                .put(update_booking)
                .patch(update_booking)
                .delete(delete_booking),
        )
        .route("/bookings/:id/status", post(update_booking_status))
        .route("/bookings/:id/cancel", post(cancel_booking))
        .route("/bookings/:id/change-logs", get(list_change_logs))
        .route("/clients/:id/bookings", get(list_client_bookings))
        .route("/providers/:id/bookings", get(list_provider_bookings))
        .with_state(Arc::new(usecase))
}

pub async fn list_bookings<B, D>(
    State(usecase): State<Arc<BookingUseCase<B, D>>>,
    auth: AuthUser,
    Query(query): Query<BookingListQuery>,
) -> impl IntoResponse
where
    B: BookingRepository + Send + Sync + 'static,
    D: DirectoryRepository + Send + Sync + 'static,
{
    match usecase.list(auth.caller(), query).await {
        Ok(bookings) => Json(bookings).into_response(),
        Err(err) => AppError::from(err).into_response(),
    }
}

pub async fn create_booking<B, D>(
    State(usecase): State<Arc<BookingUseCase<B, D>>>,
    auth: AuthUser,
    Json(create_booking_model): Json<CreateBookingModel>,
) -> impl IntoResponse
where
    B: BookingRepository + Send + Sync + 'static,
    D: DirectoryRepository + Send + Sync + 'static,
{
    info!(user_id = %auth.user_id, "bookings: create request received");
    match usecase.create(auth.caller(), create_booking_model).await {
        Ok(booking) => (StatusCode::CREATED, Json(booking)).into_response(),
        Err(err) => AppError::from(err).into_response(),
    }
}

pub async fn get_booking<B, D>(
    State(usecase): State<Arc<BookingUseCase<B, D>>>,
    auth: AuthUser,
    Path(booking_id): Path<Uuid>,
) -> impl IntoResponse
where
    B: BookingRepository + Send + Sync + 'static,
    D: DirectoryRepository + Send + Sync + 'static,
{
    match usecase.get(auth.caller(), booking_id).await {
        Ok(booking) => Json(booking).into_response(),
        Err(err) => AppError::from(err).into_response(),
    }
}

pub async fn update_booking<B, D>(
    State(usecase): State<Arc<BookingUseCase<B, D>>>,
    auth: AuthUser,
    Path(booking_id): Path<Uuid>,
    Json(update_booking_model): Json<UpdateBookingModel>,
) -> impl IntoResponse
where
    B: BookingRepository + Send + Sync + 'static,
    D: DirectoryRepository + Send + Sync + 'static,
{
    match usecase
        .update(auth.caller(), booking_id, update_booking_model)
        .await
    {
        Ok(booking) => Json(booking).into_response(),
        Err(err) => AppError::from(err).into_response(),
    }
}

pub async fn delete_booking<B, D>(
    State(usecase): State<Arc<BookingUseCase<B, D>>>,
    auth: AuthUser,
    Path(booking_id): Path<Uuid>,
) -> impl IntoResponse
where
    B: BookingRepository + Send + Sync + 'static,
    D: DirectoryRepository + Send + Sync + 'static,
{
    match usecase.delete(auth.caller(), booking_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => AppError::from(err).into_response(),
    }
}

pub async fn update_booking_status<B, D>(
    State(usecase): State<Arc<BookingUseCase<B, D>>>,
    auth: AuthUser,
    Path(booking_id): Path<Uuid>,
    Json(update_status_model): Json<UpdateBookingStatusModel>,
) -> impl IntoResponse
where
    B: BookingRepository + Send + Sync + 'static,
    D: DirectoryRepository + Send + Sync + 'static,
{
    match usecase
        .update_status(auth.caller(), booking_id, update_status_model)
        .await
    {
        Ok(booking) => Json(booking).into_response(),
        Err(err) => AppError::from(err).into_response(),
    }
}

pub async fn cancel_booking<B, D>(
    State(usecase): State<Arc<BookingUseCase<B, D>>>,
    auth: AuthUser,
    Path(booking_id): Path<Uuid>,
    cancel_booking_model: Option<Json<CancelBookingModel>>,
) -> impl IntoResponse
where
    B: BookingRepository + Send + Sync + 'static,
    D: DirectoryRepository + Send + Sync + 'static,
{
    let cancel_booking_model = cancel_booking_model
        .map(|Json(model)| model)
        .unwrap_or_default();

    match usecase
        .cancel(auth.caller(), booking_id, cancel_booking_model)
        .await
    {
        Ok(booking) => Json(booking).into_response(),
        Err(err) => AppError::from(err).into_response(),
    }
}

pub async fn list_change_logs<B, D>(
    State(usecase): State<Arc<BookingUseCase<B, D>>>,
    auth: AuthUser,
    Path(booking_id): Path<Uuid>,
) -> impl IntoResponse
where
    B: BookingRepository + Send + Sync + 'static,
    D: DirectoryRepository + Send + Sync + 'static,
{
    match usecase.change_logs(auth.caller(), booking_id).await {
        Ok(change_logs) => Json(change_logs).into_response(),
        Err(err) => AppError::from(err).into_response(),
    }
}

pub async fn list_client_bookings<B, D>(
    State(usecase): State<Arc<BookingUseCase<B, D>>>,
    auth: AuthUser,
    Path(client_id): Path<Uuid>,
    Query(query): Query<BookingListQuery>,
) -> impl IntoResponse
where
    B: BookingRepository + Send + Sync + 'static,
    D: DirectoryRepository + Send + Sync + 'static,
{
    match usecase.list_for_client(auth.caller(), client_id, query).await {
        Ok(bookings) => Json(bookings).into_response(),
        Err(err) => AppError::from(err).into_response(),
    }
}

pub async fn list_provider_bookings<B, D>(
    State(usecase): State<Arc<BookingUseCase<B, D>>>,
    auth: AuthUser,
    Path(provider_id): Path<Uuid>,
    Query(query): Query<BookingListQuery>,
) -> impl IntoResponse
where
    B: BookingRepository + Send + Sync + 'static,
    D: DirectoryRepository + Send + Sync + 'static,
{
    match usecase
        .list_for_provider(auth.caller(), provider_id, query)
        .await
    {
        Ok(bookings) => Json(bookings).into_response(),
        Err(err) => AppError::from(err).into_response(),
    }
}
