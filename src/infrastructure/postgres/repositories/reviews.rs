use anyhow::Result;
use async_trait::async_trait;
use diesel::{dsl::count, prelude::*};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain::{
        entities::{
            review_comments::{InsertReviewCommentEntity, ReviewCommentEntity},
            review_helpful_votes::{InsertReviewHelpfulVoteEntity, ReviewHelpfulVoteEntity},
            reviews::{EditReviewEntity, InsertReviewEntity, ReviewEntity},
        },
        repositories::reviews::ReviewRepository,
        value_objects::{
            enums::review_statuses::ReviewStatus,
            pagination::Pagination,
            reviews::{ReviewListFilter, ReviewVisibility},
        },
    },
    infrastructure::postgres::{
        postgres_connection::PgPoolSquad,
        schema::{review_comments, review_helpful_votes, reviews},
    },
};

pub struct ReviewPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl ReviewPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl ReviewRepository for ReviewPostgres {
    async fn create(&self, insert_review_entity: InsertReviewEntity) -> Result<Option<ReviewEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let review = diesel::insert_into(reviews::table)
            .values(&insert_review_entity)
            .on_conflict(reviews::booking_id)
            .do_nothing()
            .returning(ReviewEntity::as_select())
            .get_result::<ReviewEntity>(&mut conn)
            .optional()?;

        Ok(review)
    }

    async fn find_by_id(&self, review_id: Uuid) -> Result<Option<ReviewEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let review = reviews::table
            .find(review_id)
            .select(ReviewEntity::as_select())
            .first::<ReviewEntity>(&mut conn)
            .optional()?;

        Ok(review)
    }

    async fn list(&self, filter: &ReviewListFilter) -> Result<Vec<ReviewEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;
        let approved = ReviewStatus::Approved.to_string();

        let mut query = reviews::table
            .select(ReviewEntity::as_select())
            .into_boxed();

        query = match filter.visibility {
            ReviewVisibility::All => query,
            ReviewVisibility::ApprovedOnly => query.filter(reviews::status.eq(approved)),
            ReviewVisibility::ApprovedOrAuthor(user_id) => query.filter(
                reviews::status
                    .eq(approved)
                    .or(reviews::reviewer_id.eq(user_id)),
            ),
        };

        if let Some(reviewer_id) = filter.reviewer_id {
            query = query.filter(reviews::reviewer_id.eq(reviewer_id));
        }

        if let Some(service_id) = filter.service_id {
            query = query.filter(reviews::service_id.eq(service_id));
        }

        let results = query
            .order(reviews::created_at.desc())
            .limit(filter.pagination.limit)
            .offset(filter.pagination.offset)
            .load::<ReviewEntity>(&mut conn)?;

        Ok(results)
    }

    async fn update(
        &self,
        review_id: Uuid,
        edit_review_entity: EditReviewEntity,
    ) -> Result<ReviewEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let review = diesel::update(reviews::table.find(review_id))
            .set(&edit_review_entity)
            .returning(ReviewEntity::as_select())
            .get_result::<ReviewEntity>(&mut conn)?;

        Ok(review)
    }

    async fn delete(&self, review_id: Uuid) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        diesel::delete(reviews::table.find(review_id)).execute(&mut conn)?;

        Ok(())
    }

    async fn list_approved_ratings(&self, service_id: Uuid) -> Result<Vec<i16>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let ratings = reviews::table
            .filter(reviews::service_id.eq(service_id))
            .filter(reviews::status.eq(ReviewStatus::Approved.to_string()))
            .select(reviews::rating)
            .load::<i16>(&mut conn)?;

        Ok(ratings)
    }

    async fn count_helpful_votes(&self, review_ids: Vec<Uuid>) -> Result<Vec<(Uuid, i64)>> {
        if review_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut conn = Arc::clone(&self.db_pool).get()?;

        let counts = review_helpful_votes::table
            .filter(review_helpful_votes::review_id.eq_any(review_ids))
            .filter(review_helpful_votes::is_helpful.eq(true))
            .group_by(review_helpful_votes::review_id)
            .select((
                review_helpful_votes::review_id,
                count(review_helpful_votes::id),
            ))
            .load::<(Uuid, i64)>(&mut conn)?;

        Ok(counts)
    }

    async fn list_comments(
        &self,
        review_id: Uuid,
        pagination: Pagination,
    ) -> Result<Vec<ReviewCommentEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = review_comments::table
            .filter(review_comments::review_id.eq(review_id))
            .select(ReviewCommentEntity::as_select())
            .order(review_comments::created_at.asc())
            .limit(pagination.limit)
            .offset(pagination.offset)
            .load::<ReviewCommentEntity>(&mut conn)?;

        Ok(results)
    }

    async fn create_comment(
        &self,
        insert_comment_entity: InsertReviewCommentEntity,
    ) -> Result<ReviewCommentEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let comment = diesel::insert_into(review_comments::table)
            .values(&insert_comment_entity)
            .returning(ReviewCommentEntity::as_select())
            .get_result::<ReviewCommentEntity>(&mut conn)?;

        Ok(comment)
    }

    async fn list_votes(
        &self,
        review_id: Uuid,
        pagination: Pagination,
    ) -> Result<Vec<ReviewHelpfulVoteEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = review_helpful_votes::table
            .filter(review_helpful_votes::review_id.eq(review_id))
            .select(ReviewHelpfulVoteEntity::as_select())
            .order(review_helpful_votes::created_at.desc())
            .limit(pagination.limit)
            .offset(pagination.offset)
            .load::<ReviewHelpfulVoteEntity>(&mut conn)?;

        Ok(results)
    }

    async fn create_vote(
        &self,
        insert_vote_entity: InsertReviewHelpfulVoteEntity,
    ) -> Result<Option<ReviewHelpfulVoteEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let vote = diesel::insert_into(review_helpful_votes::table)
            .values(&insert_vote_entity)
            .on_conflict((review_helpful_votes::review_id, review_helpful_votes::user_id))
            .do_nothing()
            .returning(ReviewHelpfulVoteEntity::as_select())
            .get_result::<ReviewHelpfulVoteEntity>(&mut conn)
            .optional()?;

        Ok(vote)
    }
}
