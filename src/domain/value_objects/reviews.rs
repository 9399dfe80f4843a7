use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    entities::{
        review_comments::{InsertReviewCommentEntity, ReviewCommentEntity},
        review_helpful_votes::{InsertReviewHelpfulVoteEntity, ReviewHelpfulVoteEntity},
        reviews::{EditReviewEntity, ReviewEntity},
    },
    value_objects::{caller::Caller, enums::review_statuses::ReviewStatus, pagination::Pagination},
};

pub const MIN_RATING: i16 = 1;
pub const MAX_RATING: i16 = 5;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReviewModel {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub reviewer_id: Uuid,
    /// Hidden for anonymous reviews.
    pub reviewer_name: Option<String>,
    pub reviewee_id: Uuid,
    pub service_id: Uuid,
    pub rating: i16,
    pub title: String,
    pub comment: String,
    pub status: ReviewStatus,
    pub is_anonymous: bool,
    pub helpful_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub approved_at: Option<DateTime<Utc>>,
    pub rejected_at: Option<DateTime<Utc>>,
}

impl ReviewModel {
    pub fn from_entity(
        entity: ReviewEntity,
        reviewer_name: Option<String>,
        helpful_count: i64,
    ) -> Result<Self> {
        let reviewer_name = if entity.is_anonymous {
            None
        } else {
            reviewer_name
        };

        Ok(Self {
            id: entity.id,
            booking_id: entity.booking_id,
            reviewer_id: entity.reviewer_id,
            reviewer_name,
            reviewee_id: entity.reviewee_id,
            service_id: entity.service_id,
            rating: entity.rating,
            title: entity.title,
            comment: entity.comment,
            status: entity.status.parse()?,
            is_anonymous: entity.is_anonymous,
            helpful_count,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
            approved_at: entity.approved_at,
            rejected_at: entity.rejected_at,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateReviewModel {
    pub booking_id: Uuid,
    pub rating: i16,
    pub title: Option<String>,
    pub comment: Option<String>,
    pub is_anonymous: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UpdateReviewModel {
    pub rating: Option<i16>,
    pub title: Option<String>,
    pub comment: Option<String>,
    pub is_anonymous: Option<bool>,
}

impl UpdateReviewModel {
    pub fn to_entity(&self) -> EditReviewEntity {
        EditReviewEntity {
            rating: self.rating,
            title: self.title.clone(),
            comment: self.comment.clone(),
            is_anonymous: self.is_anonymous,
            status: None,
            approved_at: None,
            rejected_at: None,
            updated_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModerateReviewModel {
    pub status: ReviewStatus,
}

impl ModerateReviewModel {
    pub fn to_entity(&self, now: DateTime<Utc>) -> EditReviewEntity {
        EditReviewEntity {
            rating: None,
            title: None,
            comment: None,
            is_anonymous: None,
            status: Some(self.status.to_string()),
            approved_at: (self.status == ReviewStatus::Approved).then_some(now),
            rejected_at: (self.status == ReviewStatus::Rejected).then_some(now),
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReviewCommentModel {
    pub id: Uuid,
    pub review_id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ReviewCommentEntity> for ReviewCommentModel {
    fn from(entity: ReviewCommentEntity) -> Self {
        Self {
            id: entity.id,
            review_id: entity.review_id,
            user_id: entity.user_id,
            content: entity.content,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateReviewCommentModel {
    pub content: String,
}

impl CreateReviewCommentModel {
    pub fn to_entity(&self, review_id: Uuid, user_id: Uuid) -> InsertReviewCommentEntity {
        let now = Utc::now();
        InsertReviewCommentEntity {
            review_id,
            user_id,
            content: self.content.trim().to_string(),
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReviewHelpfulVoteModel {
    pub id: Uuid,
    pub review_id: Uuid,
    pub user_id: Uuid,
    pub is_helpful: bool,
    pub created_at: DateTime<Utc>,
}

impl From<ReviewHelpfulVoteEntity> for ReviewHelpfulVoteModel {
    fn from(entity: ReviewHelpfulVoteEntity) -> Self {
        Self {
            id: entity.id,
            review_id: entity.review_id,
            user_id: entity.user_id,
            is_helpful: entity.is_helpful,
            created_at: entity.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateReviewHelpfulVoteModel {
    #[serde(default = "helpful_by_default")]
    pub is_helpful: bool,
}

fn helpful_by_default() -> bool {
    true
}

impl CreateReviewHelpfulVoteModel {
    pub fn to_entity(&self, review_id: Uuid, user_id: Uuid) -> InsertReviewHelpfulVoteEntity {
        InsertReviewHelpfulVoteEntity {
            review_id,
            user_id,
            is_helpful: self.is_helpful,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewVisibility {
    All,
    ApprovedOnly,
    /// Approved reviews plus every review written by the given user.
    ApprovedOrAuthor(Uuid),
}

impl ReviewVisibility {
    pub fn for_caller(caller: &Caller) -> Self {
        if caller.is_staff {
            ReviewVisibility::All
        } else {
            ReviewVisibility::ApprovedOrAuthor(caller.user_id)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReviewListFilter {
    pub visibility: ReviewVisibility,
    pub reviewer_id: Option<Uuid>,
    pub service_id: Option<Uuid>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RatingSummary {
    pub service_id: Uuid,
    pub average_rating: f64,
    pub review_count: i64,
}

impl RatingSummary {
    /// Average rounded to two decimals, `0.0` when there are no ratings.
    pub fn from_ratings(service_id: Uuid, ratings: &[i16]) -> Self {
        let review_count = ratings.len() as i64;
        let average_rating = if ratings.is_empty() {
            0.0
        } else {
            let sum: i64 = ratings.iter().map(|rating| i64::from(*rating)).sum();
            let average = sum as f64 / review_count as f64;
            (average * 100.0).round() / 100.0
        };

        Self {
            service_id,
            average_rating,
            review_count,
        }
    }
}

pub fn validate_rating(rating: i16) -> Result<(), String> {
    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(format!(
            "rating must be between {} and {}",
            MIN_RATING, MAX_RATING
        ));
    }
    Ok(())
}

/// Approved reviews are public; anything else only shows to its author and staff.
pub fn is_visible_to(review: &ReviewEntity, caller: Option<&Caller>) -> bool {
    if review.status == ReviewStatus::Approved.as_str() {
        return true;
    }
    caller.is_some_and(|caller| caller.is_staff || caller.user_id == review.reviewer_id)
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn review(reviewer_id: Uuid, status: ReviewStatus) -> ReviewEntity {
        let now = Utc::now();
        ReviewEntity {
            id: Uuid::new_v4(),
            booking_id: Uuid::new_v4(),
            reviewer_id,
            reviewee_id: Uuid::new_v4(),
            service_id: Uuid::new_v4(),
            rating: 4,
            title: "Great session".to_string(),
            comment: "Would book again".to_string(),
            status: status.to_string(),
            is_anonymous: false,
            reported_count: 0,
            created_at: now,
            updated_at: now,
            approved_at: None,
            rejected_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::review;
    use super::*;

    #[test]
    fn rating_summary_of_no_reviews_is_zero() {
        let service_id = Uuid::new_v4();
        let summary = RatingSummary::from_ratings(service_id, &[]);
        assert_eq!(summary.average_rating, 0.0);
        assert_eq!(summary.review_count, 0);
    }

    #[test]
    fn rating_summary_rounds_to_two_decimals() {
        let summary = RatingSummary::from_ratings(Uuid::new_v4(), &[5, 4, 4]);
        assert_eq!(summary.average_rating, 4.33);
        assert_eq!(summary.review_count, 3);
    }

    #[test]
    fn rating_bounds() {
        assert!(validate_rating(1).is_ok());
        assert!(validate_rating(5).is_ok());
        assert!(validate_rating(0).is_err());
        assert!(validate_rating(6).is_err());
    }

    #[test]
    fn pending_review_is_only_visible_to_author_and_staff() {
        let author = Uuid::new_v4();
        let review = review(author, ReviewStatus::Pending);

        assert!(is_visible_to(&review, Some(&Caller::user(author))));
        assert!(is_visible_to(&review, Some(&Caller::staff(Uuid::new_v4()))));
        assert!(!is_visible_to(&review, Some(&Caller::user(Uuid::new_v4()))));
        assert!(!is_visible_to(&review, None));
    }

    #[test]
    fn approved_review_is_public() {
        let review = review(Uuid::new_v4(), ReviewStatus::Approved);
        assert!(is_visible_to(&review, None));
    }

    #[test]
    fn moderation_stamps_matching_timestamp() {
        let now = Utc::now();
        let approved = ModerateReviewModel {
            status: ReviewStatus::Approved,
        }
        .to_entity(now);
        assert_eq!(approved.approved_at, Some(now));
        assert_eq!(approved.rejected_at, None);

        let removed = ModerateReviewModel {
            status: ReviewStatus::Removed,
        }
        .to_entity(now);
        assert_eq!(removed.status.as_deref(), Some("removed"));
        assert_eq!(removed.approved_at, None);
        assert_eq!(removed.rejected_at, None);
    }

    #[test]
    fn anonymous_review_hides_reviewer_name() {
        let mut entity = review(Uuid::new_v4(), ReviewStatus::Approved);
        entity.is_anonymous = true;
        let model = ReviewModel::from_entity(entity, Some("Casey Client".to_string()), 2).unwrap();
        assert_eq!(model.reviewer_name, None);
        assert_eq!(model.helpful_count, 2);
    }
}
