use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::{
    entities::{
        review_comments::{InsertReviewCommentEntity, ReviewCommentEntity},
        review_helpful_votes::{InsertReviewHelpfulVoteEntity, ReviewHelpfulVoteEntity},
        reviews::{EditReviewEntity, InsertReviewEntity, ReviewEntity},
    },
    value_objects::{pagination::Pagination, reviews::ReviewListFilter},
};

#[automock]
#[async_trait]
pub trait ReviewRepository {
    /// `None` when the booking already has a review.
    async fn create(&self, insert_review_entity: InsertReviewEntity) -> Result<Option<ReviewEntity>>;
    async fn find_by_id(&self, review_id: Uuid) -> Result<Option<ReviewEntity>>;
    async fn list(&self, filter: &ReviewListFilter) -> Result<Vec<ReviewEntity>>;
    async fn update(
        &self,
        review_id: Uuid,
        edit_review_entity: EditReviewEntity,
    ) -> Result<ReviewEntity>;
    async fn delete(&self, review_id: Uuid) -> Result<()>;
    async fn list_approved_ratings(&self, service_id: Uuid) -> Result<Vec<i16>>;
    /// Number of `is_helpful` votes per review; reviews without any are omitted.
    async fn count_helpful_votes(&self, review_ids: Vec<Uuid>) -> Result<Vec<(Uuid, i64)>>;
    async fn list_comments(
        &self,
        review_id: Uuid,
        pagination: Pagination,
    ) -> Result<Vec<ReviewCommentEntity>>;
    async fn create_comment(
        &self,
        insert_comment_entity: InsertReviewCommentEntity,
    ) -> Result<ReviewCommentEntity>;
    async fn list_votes(
        &self,
        review_id: Uuid,
        pagination: Pagination,
    ) -> Result<Vec<ReviewHelpfulVoteEntity>>;
    /// `None` when the user already voted on the review.
    async fn create_vote(
        &self,
        insert_vote_entity: InsertReviewHelpfulVoteEntity,
    ) -> Result<Option<ReviewHelpfulVoteEntity>>;
}
