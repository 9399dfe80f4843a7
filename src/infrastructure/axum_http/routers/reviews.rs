use crate::{
    application::usercases::reviews::ReviewUseCase,
    domain::{
        repositories::{
            bookings::BookingRepository, directory::DirectoryRepository,
            reviews::ReviewRepository,
        },
        value_objects::{
            pagination::PaginationQuery,
            reviews::{
                CreateReviewCommentModel, CreateReviewHelpfulVoteModel, CreateReviewModel,
                ModerateReviewModel, UpdateReviewModel,
            },
        },
    },
    infrastructure::{
        axum_http::{auth::AuthUser, error_responses::AppError},
        postgres::{
            postgres_connection::PgPoolSquad,
            repositories::{
                bookings::BookingPostgres, directory::DirectoryPostgres, reviews::ReviewPostgres,
            },
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
    let review_repository = ReviewPostgres::new(Arc::clone(&db_pool));
    let booking_repository = BookingPostgres::new(Arc::clone(&db_pool));
    let directory_repository = DirectoryPostgres::new(Arc::clone(&db_pool));
    let usecase = ReviewUseCase::new(
        Arc::new(review_repository),
        Arc::new(booking_repository),
        Arc::new(directory_repository),
    );

    Router::new()
        .route("/reviews", get(list_reviews).post(create_review))
        .route(
            "/reviews/:id",
            get(get_review)
                .put(update_review)
                .patch(update_review)
                .delete(delete_review),
        )
        .route("/reviews/:id/moderate", post(moderate_review))
        .route(
            "/reviews/:id/comments",
            get(list_comments).post(create_comment),
        )
        .route(
            "/reviews/:id/helpful-votes",
            get(list_votes).post(create_vote),
        )
        .route("/users/:id/reviews", get(list_user_reviews))
        .route("/services/:id/reviews", get(list_service_reviews))
        .route("/services/:id/rating", get(service_rating))
        .with_state(Arc::new(usecase))
}

pub async fn list_reviews<R, B, D>(
    State(usecase): State<Arc<ReviewUseCase<R, B, D>>>,
    auth: AuthUser,
    Query(query): Query<PaginationQuery>,
) -> impl IntoResponse
where
    R: ReviewRepository + Send + Sync + 'static,
    B: BookingRepository + Send + Sync + 'static,
    D: DirectoryRepository + Send + Sync + 'static,
{
    match usecase.list(auth.caller(), query).await {
        Ok(reviews) => Json(reviews).into_response(),
        Err(err) => AppError::from(err).into_response(),
    }
}

pub async fn create_review<R, B, D>(
    State(usecase): State<Arc<ReviewUseCase<R, B, D>>>,
    auth: AuthUser,
    Json(create_review_model): Json<CreateReviewModel>,
) -> impl IntoResponse
where
    R: ReviewRepository + Send + Sync + 'static,
    B: BookingRepository + Send + Sync + 'static,
    D: DirectoryRepository + Send + Sync + 'static,
{
    info!(user_id = %auth.user_id, "reviews: create request received");
    match usecase.create(auth.caller(), create_review_model).await {
        Ok(review) => (StatusCode::CREATED, Json(review)).into_response(),
        Err(err) => AppError::from(err).into_response(),
    }
}

pub async fn get_review<R, B, D>(
    State(usecase): State<Arc<ReviewUseCase<R, B, D>>>,
    auth: AuthUser,
    Path(review_id): Path<Uuid>,
) -> impl IntoResponse
where
    R: ReviewRepository + Send + Sync + 'static,
    B: BookingRepository + Send + Sync + 'static,
    D: DirectoryRepository + Send + Sync + 'static,
{
    match usecase.get(auth.caller(), review_id).await {
        Ok(review) => Json(review).into_response(),
        Err(err) => AppError::from(err).into_response(),
    }
}

pub async fn update_review<R, B, D>(
    State(usecase): State<Arc<ReviewUseCase<R, B, D>>>,
    auth: AuthUser,
    Path(review_id): Path<Uuid>,
    Json(update_review_model): Json<UpdateReviewModel>,
) -> impl IntoResponse
where
    R: ReviewRepository + Send + Sync + 'static,
    B: BookingRepository + Send + Sync + 'static,
    D: DirectoryRepository + Send + Sync + 'static,
{
    match usecase
        .update(auth.caller(), review_id, update_review_model)
        .await
    {
        Ok(review) => Json(review).into_response(),
        Err(err) => AppError::from(err).into_response(),
    }
}

pub async fn delete_review<R, B, D>(
    State(usecase): State<Arc<ReviewUseCase<R, B, D>>>,
    auth: AuthUser,
    Path(review_id): Path<Uuid>,
) -> impl IntoResponse
where
    R: ReviewRepository + Send + Sync + 'static,
    B: BookingRepository + Send + Sync + 'static,
    D: DirectoryRepository + Send + Sync + 'static,
{
    match usecase.delete(auth.caller(), review_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => AppError::from(err).into_response(),
    }
}

pub async fn moderate_review<R, B, D>(
    State(usecase): State<Arc<ReviewUseCase<R, B, D>>>,
    auth: AuthUser,
    Path(review_id): Path<Uuid>,
    Json(moderate_review_model): Json<ModerateReviewModel>,
) -> impl IntoResponse
where
    R: ReviewRepository + Send + Sync + 'static,
    B: BookingRepository + Send + Sync + 'static,
    D: DirectoryRepository + Send + Sync + 'static,
{
    match usecase
        .moderate(auth.caller(), review_id, moderate_review_model)
        .await
    {
        Ok(review) => Json(review).into_response(),
        Err(err) => AppError::from(err).into_response(),
    }
}

pub async fn list_comments<R, B, D>(
    State(usecase): State<Arc<ReviewUseCase<R, B, D>>>,
    auth: AuthUser,
    Path(review_id): Path<Uuid>,
    Query(query): Query<PaginationQuery>,
) -> impl IntoResponse
where
    R: ReviewRepository + Send + Sync + 'static,
    B: BookingRepository + Send + Sync + 'static,
    D: DirectoryRepository + Send + Sync + 'static,
{
    match usecase.list_comments(auth.caller(), review_id, query).await {
        Ok(comments) => Json(comments).into_response(),
        Err(err) => AppError::from(err).into_response(),
    }
}

pub async fn create_comment<R, B, D>(
    State(usecase): State<Arc<ReviewUseCase<R, B, D>>>,
    auth: AuthUser,
    Path(review_id): Path<Uuid>,
    Json(create_comment_model): Json<CreateReviewCommentModel>,
) -> impl IntoResponse
where
    R: ReviewRepository + Send + Sync + 'static,
    B: BookingRepository + Send + Sync + 'static,
    D: DirectoryRepository + Send + Sync + 'static,
{
    match usecase
        .create_comment(auth.caller(), review_id, create_comment_model)
        .await
    {
        Ok(comment) => (StatusCode::CREATED, Json(comment)).into_response(),
        Err(err) => AppError::from(err).into_response(),
    }
}

pub async fn list_votes<R, B, D>(
    State(usecase): State<Arc<ReviewUseCase<R, B, D>>>,
    auth: AuthUser,
    Path(review_id): Path<Uuid>,
    Query(query): Query<PaginationQuery>,
) -> impl IntoResponse
where
    R: ReviewRepository + Send + Sync + 'static,
    B: BookingRepository + Send + Sync + 'static,
    D: DirectoryRepository + Send + Sync + 'static,
{
    match usecase.list_votes(auth.caller(), review_id, query).await {
        Ok(votes) => Json(votes).into_response(),
        Err(err) => AppError::from(err).into_response(),
    }
}

pub async fn create_vote<R, B, D>(
    State(usecase): State<Arc<ReviewUseCase<R, B, D>>>,
    auth: AuthUser,
    Path(review_id): Path<Uuid>,
    Json(create_vote_model): Json<CreateReviewHelpfulVoteModel>,
) -> impl IntoResponse
where
    R: ReviewRepository + Send + Sync + 'static,
    B: BookingRepository + Send + Sync + 'static,
    D: DirectoryRepository + Send + Sync + 'static,
{
    match usecase
        .create_vote(auth.caller(), review_id, create_vote_model)
        .await
    {
        Ok(vote) => (StatusCode::CREATED, Json(vote)).into_response(),
        Err(err) => AppError::from(err).into_response(),
    }
}

pub async fn list_user_reviews<R, B, D>(
    State(usecase): State<Arc<ReviewUseCase<R, B, D>>>,
    auth: AuthUser,
    Path(reviewer_id): Path<Uuid>,
    Query(query): Query<PaginationQuery>,
) -> impl IntoResponse
where
    R: ReviewRepository + Send + Sync + 'static,
    B: BookingRepository + Send + Sync + 'static,
    D: DirectoryRepository + Send + Sync + 'static,
{
    match usecase
        .list_for_user(auth.caller(), reviewer_id, query)
        .await
    {
        Ok(reviews) => Json(reviews).into_response(),
        Err(err) => AppError::from(err).into_response(),
    }
}

pub async fn list_service_reviews<R, B, D>(
    State(usecase): State<Arc<ReviewUseCase<R, B, D>>>,
    Path(service_id): Path<Uuid>,
    Query(query): Query<PaginationQuery>,
) -> impl IntoResponse
where
    R: ReviewRepository + Send + Sync + 'static,
    B: BookingRepository + Send + Sync + 'static,
    D: DirectoryRepository + Send + Sync + 'static,
{
    match usecase.list_for_service(service_id, query).await {
        Ok(reviews) => Json(reviews).into_response(),
        Err(err) => AppError::from(err).into_response(),
    }
}

pub async fn service_rating<R, B, D>(
    State(usecase): State<Arc<ReviewUseCase<R, B, D>>>,
    Path(service_id): Path<Uuid>,
) -> impl IntoResponse
where
    R: ReviewRepository + Send + Sync + 'static,
    B: BookingRepository + Send + Sync + 'static,
    D: DirectoryRepository + Send + Sync + 'static,
{
    match usecase.rating_summary(service_id).await {
        Ok(summary) => Json(summary).into_response(),
        Err(err) => AppError::from(err).into_response(),
    }
}
