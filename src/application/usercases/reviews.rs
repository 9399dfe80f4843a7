use std::{collections::HashMap, sync::Arc};

use chrono::Utc;
use thiserror::Error;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::domain::{
    entities::reviews::{InsertReviewEntity, ReviewEntity},
    repositories::{
        bookings::BookingRepository, directory::DirectoryRepository, reviews::ReviewRepository,
    },
    value_objects::{
        caller::Caller,
        enums::{booking_statuses::BookingStatus, review_statuses::ReviewStatus},
        pagination::{Pagination, PaginationQuery},
        reviews::{
            CreateReviewCommentModel, CreateReviewHelpfulVoteModel, CreateReviewModel,
            ModerateReviewModel, RatingSummary, ReviewCommentModel, ReviewHelpfulVoteModel,
            ReviewListFilter, ReviewModel, ReviewVisibility, UpdateReviewModel, is_visible_to,
            validate_rating,
        },
    },
};

#[derive(Debug, Error)]
pub enum ReviewError {
    #[error("{0}")]
    Validation(String),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("you are not allowed to modify this review")]
    Forbidden,
    #[error("{0}")]
    Conflict(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ReviewError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            ReviewError::Validation(_) => StatusCode::BAD_REQUEST,
            ReviewError::NotFound(_) => StatusCode::NOT_FOUND,
            ReviewError::Forbidden => StatusCode::FORBIDDEN,
            ReviewError::Conflict(_) => StatusCode::CONFLICT,
            ReviewError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type UseCaseResult<T> = std::result::Result<T, ReviewError>;

pub struct ReviewUseCase<R, B, D>
where
    R: ReviewRepository + Send + Sync + 'static,
    B: BookingRepository + Send + Sync + 'static,
    D: DirectoryRepository + Send + Sync + 'static,
{
    review_repo: Arc<R>,
    booking_repo: Arc<B>,
    directory_repo: Arc<D>,
}

impl<R, B, D> ReviewUseCase<R, B, D>
where
    R: ReviewRepository + Send + Sync + 'static,
    B: BookingRepository + Send + Sync + 'static,
    D: DirectoryRepository + Send + Sync + 'static,
{
    pub fn new(review_repo: Arc<R>, booking_repo: Arc<B>, directory_repo: Arc<D>) -> Self {
        Self {
            review_repo,
            booking_repo,
            directory_repo,
        }
    }

    pub async fn create(
        &self,
        caller: Caller,
        create_review_model: CreateReviewModel,
    ) -> UseCaseResult<ReviewModel> {
        let user_id = caller.user_id;
        let booking_id = create_review_model.booking_id;
        info!(%user_id, %booking_id, rating = create_review_model.rating, "reviews: create requested");

        validate_rating(create_review_model.rating)
            .map_err(|message| self.rejected(user_id, message))?;

        let booking = self
            .booking_repo
            .find_by_id(booking_id)
            .await
            .map_err(|err| {
                error!(%booking_id, db_error = ?err, "reviews: failed to load booking");
                ReviewError::Internal(err)
            })?
            .ok_or(ReviewError::NotFound("booking"))?;

        if booking.client_id != user_id {
            warn!(
                %user_id,
                %booking_id,
                status = axum::http::StatusCode::FORBIDDEN.as_u16(),
                "reviews: only the booking client may review"
            );
            return Err(ReviewError::Forbidden);
        }
        if booking.status != BookingStatus::Completed.as_str() {
            return Err(self.rejected(
                user_id,
                "only completed bookings can be reviewed".to_string(),
            ));
        }

        let now = Utc::now();
        let insert_review_entity = InsertReviewEntity {
            booking_id,
            reviewer_id: user_id,
            reviewee_id: booking.provider_id,
            service_id: booking.service_id,
            rating: create_review_model.rating,
            title: create_review_model.title.unwrap_or_default(),
            comment: create_review_model.comment.unwrap_or_default(),
            status: ReviewStatus::Pending.to_string(),
            is_anonymous: create_review_model.is_anonymous.unwrap_or(false),
            created_at: now,
            updated_at: now,
        };

        let review = self
            .review_repo
            .create(insert_review_entity)
            .await
            .map_err(|err| {
                error!(%booking_id, db_error = ?err, "reviews: failed to create review");
                ReviewError::Internal(err)
            })?
            .ok_or_else(|| {
                warn!(
                    %booking_id,
                    status = axum::http::StatusCode::CONFLICT.as_u16(),
                    "reviews: booking already reviewed"
                );
                ReviewError::Conflict("booking already has a review".to_string())
            })?;

        info!(%user_id, review_id = %review.id, "reviews: review created");
        self.to_model(review).await
    }

    pub async fn get(&self, caller: Caller, review_id: Uuid) -> UseCaseResult<ReviewModel> {
        let review = self.load_visible(Some(&caller), review_id).await?;
        self.to_model(review).await
    }

    pub async fn list(
        &self,
        caller: Caller,
        query: PaginationQuery,
    ) -> UseCaseResult<Vec<ReviewModel>> {
        let filter = ReviewListFilter {
            visibility: ReviewVisibility::for_caller(&caller),
            reviewer_id: None,
            service_id: None,
            pagination: self.paginate(caller.user_id, query)?,
        };
        self.list_filtered(filter).await
    }

    /// Reviews written by `reviewer_id`. Unapproved ones only show to the
    /// reviewer and staff.
    pub async fn list_for_user(
        &self,
        caller: Caller,
        reviewer_id: Uuid,
        query: PaginationQuery,
    ) -> UseCaseResult<Vec<ReviewModel>> {
        let visibility = if caller.can_act_for(reviewer_id) {
            ReviewVisibility::All
        } else {
            ReviewVisibility::ApprovedOnly
        };
        let filter = ReviewListFilter {
            visibility,
            reviewer_id: Some(reviewer_id),
            service_id: None,
            pagination: self.paginate(caller.user_id, query)?,
        };
        self.list_filtered(filter).await
    }

    pub async fn list_for_service(
        &self,
        service_id: Uuid,
        query: PaginationQuery,
    ) -> UseCaseResult<Vec<ReviewModel>> {
        let pagination = query.validate().map_err(ReviewError::Validation)?;
        let filter = ReviewListFilter {
            visibility: ReviewVisibility::ApprovedOnly,
            reviewer_id: None,
            service_id: Some(service_id),
            pagination,
        };
        self.list_filtered(filter).await
    }

    pub async fn rating_summary(&self, service_id: Uuid) -> UseCaseResult<RatingSummary> {
        let ratings = self
            .review_repo
            .list_approved_ratings(service_id)
            .await
            .map_err(|err| {
                error!(%service_id, db_error = ?err, "reviews: failed to load ratings");
                ReviewError::Internal(err)
            })?;

        let summary = RatingSummary::from_ratings(service_id, &ratings);
        debug!(
            %service_id,
            average_rating = summary.average_rating,
            review_count = summary.review_count,
            "reviews: rating summary computed"
        );
        Ok(summary)
    }

    pub async fn update(
        &self,
        caller: Caller,
        review_id: Uuid,
        update_review_model: UpdateReviewModel,
    ) -> UseCaseResult<ReviewModel> {
        let review = self.load_visible(Some(&caller), review_id).await?;
        if review.reviewer_id != caller.user_id {
            warn!(user_id = %caller.user_id, %review_id, "reviews: only the author may edit");
            return Err(ReviewError::Forbidden);
        }
        if let Some(rating) = update_review_model.rating {
            validate_rating(rating).map_err(|message| self.rejected(caller.user_id, message))?;
        }

        let review = self
            .review_repo
            .update(review_id, update_review_model.to_entity())
            .await
            .map_err(|err| {
                error!(%review_id, db_error = ?err, "reviews: failed to update review");
                ReviewError::Internal(err)
            })?;

        info!(user_id = %caller.user_id, %review_id, "reviews: review updated");
        self.to_model(review).await
    }

    pub async fn delete(&self, caller: Caller, review_id: Uuid) -> UseCaseResult<()> {
        let review = self.load_visible(Some(&caller), review_id).await?;
        if !caller.can_act_for(review.reviewer_id) {
            warn!(user_id = %caller.user_id, %review_id, "reviews: delete denied");
            return Err(ReviewError::Forbidden);
        }

        self.review_repo.delete(review_id).await.map_err(|err| {
            error!(%review_id, db_error = ?err, "reviews: failed to delete review");
            ReviewError::Internal(err)
        })?;

        info!(user_id = %caller.user_id, %review_id, "reviews: review deleted");
        Ok(())
    }

    pub async fn moderate(
        &self,
        caller: Caller,
        review_id: Uuid,
        moderate_review_model: ModerateReviewModel,
    ) -> UseCaseResult<ReviewModel> {
        if !caller.is_staff {
            warn!(user_id = %caller.user_id, %review_id, "reviews: moderation requires staff");
            return Err(ReviewError::Forbidden);
        }
        self.load_visible(Some(&caller), review_id).await?;

        let review = self
            .review_repo
            .update(review_id, moderate_review_model.to_entity(Utc::now()))
            .await
            .map_err(|err| {
                error!(%review_id, db_error = ?err, "reviews: failed to moderate review");
                ReviewError::Internal(err)
            })?;

        info!(
            user_id = %caller.user_id,
            %review_id,
            status = %moderate_review_model.status,
            "reviews: review moderated"
        );
        self.to_model(review).await
    }

    pub async fn list_comments(
        &self,
        caller: Caller,
        review_id: Uuid,
        query: PaginationQuery,
    ) -> UseCaseResult<Vec<ReviewCommentModel>> {
        let pagination = self.paginate(caller.user_id, query)?;
        self.load_visible(Some(&caller), review_id).await?;

        let comments = self
            .review_repo
            .list_comments(review_id, pagination)
            .await
            .map_err(|err| {
                error!(%review_id, db_error = ?err, "reviews: failed to list comments");
                ReviewError::Internal(err)
            })?;

        Ok(comments.into_iter().map(ReviewCommentModel::from).collect())
    }

    pub async fn create_comment(
        &self,
        caller: Caller,
        review_id: Uuid,
        create_comment_model: CreateReviewCommentModel,
    ) -> UseCaseResult<ReviewCommentModel> {
        if create_comment_model.content.trim().is_empty() {
            return Err(self.rejected(caller.user_id, "content must not be empty".to_string()));
        }
        self.load_visible(Some(&caller), review_id).await?;

        let comment = self
            .review_repo
            .create_comment(create_comment_model.to_entity(review_id, caller.user_id))
            .await
            .map_err(|err| {
                error!(%review_id, db_error = ?err, "reviews: failed to create comment");
                ReviewError::Internal(err)
            })?;

        info!(user_id = %caller.user_id, %review_id, comment_id = %comment.id, "reviews: comment added");
        Ok(ReviewCommentModel::from(comment))
    }

    pub async fn list_votes(
        &self,
        caller: Caller,
        review_id: Uuid,
        query: PaginationQuery,
    ) -> UseCaseResult<Vec<ReviewHelpfulVoteModel>> {
        let pagination = self.paginate(caller.user_id, query)?;
        self.load_visible(Some(&caller), review_id).await?;

        let votes = self
            .review_repo
            .list_votes(review_id, pagination)
            .await
            .map_err(|err| {
                error!(%review_id, db_error = ?err, "reviews: failed to list helpful votes");
                ReviewError::Internal(err)
            })?;

        Ok(votes.into_iter().map(ReviewHelpfulVoteModel::from).collect())
    }

    pub async fn create_vote(
        &self,
        caller: Caller,
        review_id: Uuid,
        create_vote_model: CreateReviewHelpfulVoteModel,
    ) -> UseCaseResult<ReviewHelpfulVoteModel> {
        self.load_visible(Some(&caller), review_id).await?;

        let vote = self
            .review_repo
            .create_vote(create_vote_model.to_entity(review_id, caller.user_id))
            .await
            .map_err(|err| {
                error!(%review_id, db_error = ?err, "reviews: failed to record helpful vote");
                ReviewError::Internal(err)
            })?
            .ok_or_else(|| {
                warn!(
                    user_id = %caller.user_id,
                    %review_id,
                    status = axum::http::StatusCode::CONFLICT.as_u16(),
                    "reviews: duplicate helpful vote"
                );
                ReviewError::Conflict("you already voted on this review".to_string())
            })?;

        info!(
            user_id = %caller.user_id,
            %review_id,
            is_helpful = vote.is_helpful,
            "reviews: helpful vote recorded"
        );
        Ok(ReviewHelpfulVoteModel::from(vote))
    }

    /// Hidden reviews read as missing so their existence is not disclosed.
    async fn load_visible(
        &self,
        caller: Option<&Caller>,
        review_id: Uuid,
    ) -> UseCaseResult<ReviewEntity> {
        let review = self
            .review_repo
            .find_by_id(review_id)
            .await
            .map_err(|err| {
                error!(%review_id, db_error = ?err, "reviews: failed to load review");
                ReviewError::Internal(err)
            })?
            .ok_or(ReviewError::NotFound("review"))?;

        if !is_visible_to(&review, caller) {
            debug!(%review_id, "reviews: review hidden from caller");
            return Err(ReviewError::NotFound("review"));
        }

        Ok(review)
    }

    async fn list_filtered(&self, filter: ReviewListFilter) -> UseCaseResult<Vec<ReviewModel>> {
        debug!(?filter, "reviews: listing reviews");
        let reviews = self.review_repo.list(&filter).await.map_err(|err| {
            error!(db_error = ?err, "reviews: failed to list reviews");
            ReviewError::Internal(err)
        })?;
        self.to_models(reviews).await
    }

    async fn to_model(&self, review: ReviewEntity) -> UseCaseResult<ReviewModel> {
        self.to_models(vec![review])
            .await?
            .pop()
            .ok_or_else(|| ReviewError::Internal(anyhow::anyhow!("review model missing")))
    }

    async fn to_models(&self, reviews: Vec<ReviewEntity>) -> UseCaseResult<Vec<ReviewModel>> {
        if reviews.is_empty() {
            return Ok(Vec::new());
        }

        let review_ids = reviews.iter().map(|review| review.id).collect();
        let helpful_counts = self
            .review_repo
            .count_helpful_votes(review_ids)
            .await
            .map_err(|err| {
                error!(db_error = ?err, "reviews: failed to count helpful votes");
                ReviewError::Internal(err)
            })?
            .into_iter()
            .collect::<HashMap<_, _>>();

        let mut reviewer_ids = reviews
            .iter()
            .map(|review| review.reviewer_id)
            .collect::<Vec<_>>();
        reviewer_ids.sort_unstable();
        reviewer_ids.dedup();

        let reviewer_names = self
            .directory_repo
            .list_users_by_ids(reviewer_ids)
            .await
            .map_err(|err| {
                error!(db_error = ?err, "reviews: failed to load reviewers");
                ReviewError::Internal(err)
            })?
            .into_iter()
            .map(|user| (user.id, user.full_name()))
            .collect::<HashMap<_, _>>();

        reviews
            .into_iter()
            .map(|review| {
                let helpful_count = helpful_counts.get(&review.id).copied().unwrap_or(0);
                let reviewer_name = reviewer_names.get(&review.reviewer_id).cloned();
                ReviewModel::from_entity(review, reviewer_name, helpful_count)
                    .map_err(ReviewError::Internal)
            })
            .collect()
    }

    fn paginate(&self, user_id: Uuid, query: PaginationQuery) -> UseCaseResult<Pagination> {
        query
            .validate()
            .map_err(|message| self.rejected(user_id, message))
    }

    fn rejected(&self, user_id: Uuid, message: String) -> ReviewError {
        warn!(
            %user_id,
            reason = message.as_str(),
            status = axum::http::StatusCode::BAD_REQUEST.as_u16(),
            "reviews: request rejected"
        );
        ReviewError::Validation(message)
    }
}
