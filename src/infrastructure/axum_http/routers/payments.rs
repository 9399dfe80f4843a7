use crate::{
    application::usercases::payments::PaymentUseCase,
    config::config_model::DotEnvyConfig,
    domain::{
        repositories::{bookings::BookingRepository, payments::PaymentRepository},
        value_objects::{
            pagination::PaginationQuery,
            payments::{CreatePaymentModel, CreateRefundModel, UpdatePaymentModel},
        },
    },
    infrastructure::{
        axum_http::{auth::AuthUser, error_responses::AppError},
        postgres::{
            postgres_connection::PgPoolSquad,
            repositories::{bookings::BookingPostgres, payments::PaymentPostgres},
        },
    },
};
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

pub fn routes(db_pool: Arc<PgPoolSquad>, config: Arc<DotEnvyConfig>) -> Router {
    let payment_repository = PaymentPostgres::new(Arc::clone(&db_pool));
    let booking_repository = BookingPostgres::new(Arc::clone(&db_pool));
    let usecase = PaymentUseCase::new(
        Arc::new(payment_repository),
        Arc::new(booking_repository),
        config.refund_policy,
    );

    Router::new()
        .route(
            "/bookings/:id/payment",
            get(get_booking_payment).post(create_booking_payment),
        )
        .route("/payments", get(list_payments))
        .route(
            "/payments/:id",
            get(get_payment).put(update_payment).patch(update_payment),
        )
        .route(
            "/payments/:id/refunds",
            get(list_refunds).post(create_refund),
        )
        .route("/users/:id/payments", get(list_user_payments))
        .with_state(Arc::new(usecase))
}

pub async fn get_booking_payment<P, B>(
    State(usecase): State<Arc<PaymentUseCase<P, B>>>,
    auth: AuthUser,
    Path(booking_id): Path<Uuid>,
) -> impl IntoResponse
where
    P: PaymentRepository + Send + Sync + 'static,
    B: BookingRepository + Send + Sync + 'static,
{
    // A booking without a payment answers `null`.
    match usecase.get_for_booking(auth.caller(), booking_id).await {
        Ok(payment) => Json(payment).into_response(),
        Err(err) => AppError::from(err).into_response(),
    }
}

pub async fn create_booking_payment<P, B>(
    State(usecase): State<Arc<PaymentUseCase<P, B>>>,
    auth: AuthUser,
    Path(booking_id): Path<Uuid>,
    Json(create_payment_model): Json<CreatePaymentModel>,
) -> impl IntoResponse
where
    P: PaymentRepository + Send + Sync + 'static,
    B: BookingRepository + Send + Sync + 'static,
{
    match usecase
        .create_for_booking(auth.caller(), booking_id, create_payment_model)
        .await
    {
        Ok(payment) => (StatusCode::CREATED, Json(payment)).into_response(),
        Err(err) => AppError::from(err).into_response(),
    }
}

pub async fn list_payments<P, B>(
    State(usecase): State<Arc<PaymentUseCase<P, B>>>,
    auth: AuthUser,
    Query(query): Query<PaginationQuery>,
) -> impl IntoResponse
where
    P: PaymentRepository + Send + Sync + 'static,
    B: BookingRepository + Send + Sync + 'static,
{
    match usecase.list_all(auth.caller(), query).await {
        Ok(payments) => Json(payments).into_response(),
        Err(err) => AppError::from(err).into_response(),
    }
}

pub async fn get_payment<P, B>(
    State(usecase): State<Arc<PaymentUseCase<P, B>>>,
    auth: AuthUser,
    Path(payment_id): Path<Uuid>,
) -> impl IntoResponse
where
    P: PaymentRepository + Send + Sync + 'static,
    B: BookingRepository + Send + Sync + 'static,
{
    match usecase.get(auth.caller(), payment_id).await {
        Ok(payment) => Json(payment).into_response(),
        Err(err) => AppError::from(err).into_response(),
    }
}

pub async fn update_payment<P, B>(
    State(usecase): State<Arc<PaymentUseCase<P, B>>>,
    auth: AuthUser,
    Path(payment_id): Path<Uuid>,
    Json(update_payment_model): Json<UpdatePaymentModel>,
) -> impl IntoResponse
where
    P: PaymentRepository + Send + Sync + 'static,
    B: BookingRepository + Send + Sync + 'static,
{
    match usecase
        .update(auth.caller(), payment_id, update_payment_model)
        .await
    {
        Ok(payment) => Json(payment).into_response(),
        Err(err) => AppError::from(err).into_response(),
    }
}

pub async fn list_user_payments<P, B>(
    State(usecase): State<Arc<PaymentUseCase<P, B>>>,
    auth: AuthUser,
    Path(user_id): Path<Uuid>,
    Query(query): Query<PaginationQuery>,
) -> impl IntoResponse
where
    P: PaymentRepository + Send + Sync + 'static,
    B: BookingRepository + Send + Sync + 'static,
{
    match usecase.list_for_user(auth.caller(), user_id, query).await {
        Ok(payments) => Json(payments).into_response(),
        Err(err) => AppError::from(err).into_response(),
    }
}

pub async fn list_refunds<P, B>(
    State(usecase): State<Arc<PaymentUseCase<P, B>>>,
    auth: AuthUser,
    Path(payment_id): Path<Uuid>,
) -> impl IntoResponse
where
    P: PaymentRepository + Send + Sync + 'static,
    B: BookingRepository + Send + Sync + 'static,
{
    match usecase.list_refunds(auth.caller(), payment_id).await {
        Ok(refunds) => Json(refunds).into_response(),
        Err(err) => AppError::from(err).into_response(),
    }
}

pub async fn create_refund<P, B>(
    State(usecase): State<Arc<PaymentUseCase<P, B>>>,
    auth: AuthUser,
    Path(payment_id): Path<Uuid>,
    Json(create_refund_model): Json<CreateRefundModel>,
) -> impl IntoResponse
where
    P: PaymentRepository + Send + Sync + 'static,
    B: BookingRepository + Send + Sync + 'static,
{
    info!(user_id = %auth.user_id, %payment_id, "payments: refund request received");
    match usecase
        .create_refund(auth.caller(), payment_id, create_refund_model)
        .await
    {
        Ok(refund) => (StatusCode::CREATED, Json(refund)).into_response(),
        Err(err) => AppError::from(err).into_response(),
    }
}
