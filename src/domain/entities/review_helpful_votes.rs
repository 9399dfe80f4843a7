use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::review_helpful_votes;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = review_helpful_votes)]
pub struct ReviewHelpfulVoteEntity {
    pub id: Uuid,
    pub review_id: Uuid,
    pub user_id: Uuid,
    pub is_helpful: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = review_helpful_votes)]
pub struct InsertReviewHelpfulVoteEntity {
    pub review_id: Uuid,
    pub user_id: Uuid,
    pub is_helpful: bool,
    pub created_at: DateTime<Utc>,
}
