use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    entities::{
        booking_change_logs::{BookingChangeLogEntity, InsertBookingChangeLogEntity},
        bookings::{BookingEntity, EditBookingEntity},
    },
    value_objects::{
        enums::{
            booking_payment_statuses::BookingPaymentStatus,
            booking_statuses::{self, BookingStatus},
            location_types::LocationType,
        },
        pagination::Pagination,
    },
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookingModel {
    pub id: Uuid,
    pub client_id: Uuid,
    pub client_name: String,
    pub provider_id: Uuid,
    pub provider_name: String,
    pub service_id: Uuid,
    pub service_title: String,
    pub status: BookingStatus,
    pub payment_status: BookingPaymentStatus,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration_minutes: i32,
    pub price_minor: i64,
    pub location_type: LocationType,
    pub meeting_link: String,
    pub address: String,
    pub special_requests: String,
    pub cancellation_reason: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub change_logs: Vec<BookingChangeLogModel>,
}

/// Display names of the rows a booking points at, resolved at read time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookingNames {
    pub client_name: String,
    pub provider_name: String,
    pub service_title: String,
}

impl BookingModel {
    pub fn from_entity(
        entity: BookingEntity,
        names: BookingNames,
        change_logs: Vec<BookingChangeLogModel>,
    ) -> Result<Self> {
        Ok(Self {
            id: entity.id,
            client_id: entity.client_id,
            client_name: names.client_name,
            provider_id: entity.provider_id,
            provider_name: names.provider_name,
            service_id: entity.service_id,
            service_title: names.service_title,
            status: entity.status.parse()?,
            payment_status: entity.payment_status.parse()?,
            start_time: entity.start_time,
            end_time: entity.end_time,
            duration_minutes: entity.duration_minutes,
            price_minor: entity.price_minor,
            location_type: entity.location_type.parse()?,
            meeting_link: entity.meeting_link,
            address: entity.address,
            special_requests: entity.special_requests,
            cancellation_reason: entity.cancellation_reason,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
            cancelled_at: entity.cancelled_at,
            change_logs,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookingChangeLogModel {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub previous_status: BookingStatus,
    pub new_status: BookingStatus,
    pub changed_by: Option<Uuid>,
    pub changed_by_name: Option<String>,
    pub reason: String,
    pub timestamp: DateTime<Utc>,
}

impl BookingChangeLogModel {
    pub fn from_entity(
        entity: BookingChangeLogEntity,
        changed_by_name: Option<String>,
    ) -> Result<Self> {
        Ok(Self {
            id: entity.id,
            booking_id: entity.booking_id,
            previous_status: entity.previous_status.parse()?,
            new_status: entity.new_status.parse()?,
            changed_by: entity.changed_by,
            changed_by_name,
            reason: entity.reason,
            timestamp: entity.timestamp,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateBookingModel {
    pub service_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub special_requests: Option<String>,
    pub location_type: Option<LocationType>,
    pub address: Option<String>,
    pub meeting_link: Option<String>,
}

/// Partial update shared by PUT and PATCH.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UpdateBookingModel {
    pub status: Option<BookingStatus>,
    pub reason: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub special_requests: Option<String>,
    pub meeting_link: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UpdateBookingStatusModel {
    pub status: BookingStatus,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CancelBookingModel {
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingScope {
    All,
    /// Bookings where the user is either the client or the provider.
    Party(Uuid),
    Client(Uuid),
    Provider(Uuid),
}

#[derive(Debug, Clone, PartialEq)]
pub struct BookingListFilter {
    pub scope: BookingScope,
    pub status: Option<BookingStatus>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookingListQuery {
    pub status: Option<BookingStatus>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// A requested status move, checked and applied under the booking row lock.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusChange {
    pub new_status: BookingStatus,
    pub changed_by: Uuid,
    pub reason: String,
}

/// What a status change does to a booking currently in some status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusPlan {
    /// Already in the requested status; nothing to log.
    Unchanged,
    Apply { previous_status: BookingStatus },
    Illegal { from: BookingStatus, to: BookingStatus },
}

impl StatusChange {
    pub fn plan(&self, previous_status: BookingStatus) -> StatusPlan {
        if self.new_status == previous_status {
            StatusPlan::Unchanged
        } else if booking_statuses::allowed(previous_status, self.new_status) {
            StatusPlan::Apply { previous_status }
        } else {
            StatusPlan::Illegal {
                from: previous_status,
                to: self.new_status,
            }
        }
    }

    /// Writes the new status into `edit`; cancelling also records the reason
    /// and the cancellation time.
    pub fn stamp(&self, edit: &mut EditBookingEntity, now: DateTime<Utc>) {
        edit.status = Some(self.new_status.to_string());
        if self.new_status == BookingStatus::Cancelled {
            edit.cancellation_reason = Some(self.reason.clone());
            edit.cancelled_at = Some(now);
        }
    }

    pub fn to_log_entity(
        &self,
        booking_id: Uuid,
        previous_status: BookingStatus,
        timestamp: DateTime<Utc>,
    ) -> InsertBookingChangeLogEntity {
        InsertBookingChangeLogEntity {
            booking_id,
            previous_status: previous_status.to_string(),
            new_status: self.new_status.to_string(),
            changed_by: Some(self.changed_by),
            reason: self.reason.clone(),
            timestamp,
        }
    }
}

#[derive(Debug, Clone)]
pub enum BookingUpdateOutcome {
    NotFound,
    Applied {
        booking: BookingEntity,
        change_log: Option<BookingChangeLogEntity>,
    },
    InvalidTransition {
        from: BookingStatus,
        to: BookingStatus,
    },
}

/// Change log timestamps must strictly increase per booking, even when two
/// updates land inside the same clock tick.
pub fn next_change_log_timestamp(
    now: DateTime<Utc>,
    last: Option<DateTime<Utc>>,
) -> DateTime<Utc> {
    match last {
        Some(last) if last >= now => last + Duration::microseconds(1),
        _ => now,
    }
}

pub fn duration_minutes(start_time: DateTime<Utc>, end_time: DateTime<Utc>) -> i32 {
    let minutes = (end_time - start_time).num_minutes();
    i32::try_from(minutes).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn timestamp_uses_clock_when_it_is_ahead() {
        let last = Utc.with_ymd_and_hms(2025, 1, 1, 10, 0, 0).unwrap();
        let now = last + Duration::seconds(5);
        assert_eq!(next_change_log_timestamp(now, Some(last)), now);
        assert_eq!(next_change_log_timestamp(now, None), now);
    }

    #[test]
    fn timestamp_moves_past_last_entry_when_clock_lags() {
        let last = Utc.with_ymd_and_hms(2025, 1, 1, 10, 0, 0).unwrap();
        let next = next_change_log_timestamp(last, Some(last));
        assert!(next > last);

        let skewed = next_change_log_timestamp(last - Duration::seconds(3), Some(last));
        assert_eq!(skewed, last + Duration::microseconds(1));
    }

    fn change_to(new_status: BookingStatus) -> StatusChange {
        StatusChange {
            new_status,
            changed_by: Uuid::new_v4(),
            reason: "provider request".to_string(),
        }
    }

    #[test]
    fn same_status_is_planned_as_unchanged() {
        for status in BookingStatus::ALL {
            assert_eq!(change_to(status).plan(status), StatusPlan::Unchanged);
        }
    }

    #[test]
    fn legal_move_logs_the_pre_update_status() {
        let change = change_to(BookingStatus::Confirmed);
        let plan = change.plan(BookingStatus::Pending);
        assert_eq!(
            plan,
            StatusPlan::Apply {
                previous_status: BookingStatus::Pending
            }
        );

        let StatusPlan::Apply { previous_status } = plan else {
            unreachable!()
        };
        let booking_id = Uuid::new_v4();
        let log = change.to_log_entity(booking_id, previous_status, Utc::now());
        assert_eq!(log.booking_id, booking_id);
        assert_eq!(log.previous_status, "pending");
        assert_eq!(log.new_status, "confirmed");
        assert_eq!(log.changed_by, Some(change.changed_by));
    }

    #[test]
    fn illegal_move_is_planned_as_illegal() {
        assert_eq!(
            change_to(BookingStatus::Pending).plan(BookingStatus::Completed),
            StatusPlan::Illegal {
                from: BookingStatus::Completed,
                to: BookingStatus::Pending,
            }
        );
    }

    #[test]
    fn cancelling_stamps_reason_and_time() {
        let now = Utc::now();
        let change = StatusChange {
            new_status: BookingStatus::Cancelled,
            changed_by: Uuid::new_v4(),
            reason: "client is ill".to_string(),
        };

        let mut edit = EditBookingEntity::default();
        change.stamp(&mut edit, now);

        assert_eq!(edit.status.as_deref(), Some("cancelled"));
        assert_eq!(edit.cancellation_reason.as_deref(), Some("client is ill"));
        assert_eq!(edit.cancelled_at, Some(now));
    }

    #[test]
    fn confirming_leaves_cancellation_fields_alone() {
        let change = StatusChange {
            new_status: BookingStatus::Confirmed,
            changed_by: Uuid::new_v4(),
            reason: String::new(),
        };

        let mut edit = EditBookingEntity::default();
        change.stamp(&mut edit, Utc::now());

        assert_eq!(edit.status.as_deref(), Some("confirmed"));
        assert_eq!(edit.cancelled_at, None);
    }

    #[test]
    fn duration_counts_whole_minutes() {
        let start = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();
        assert_eq!(duration_minutes(start, start + Duration::minutes(90)), 90);
        assert_eq!(duration_minutes(start, start + Duration::seconds(59)), 0);
    }
}
