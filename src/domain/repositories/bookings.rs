use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::{
    entities::{
        booking_change_logs::BookingChangeLogEntity,
        bookings::{BookingEntity, EditBookingEntity, InsertBookingEntity},
    },
    value_objects::bookings::{BookingListFilter, BookingUpdateOutcome, StatusChange},
};

#[automock]
#[async_trait]
pub trait BookingRepository {
    async fn create(&self, insert_booking_entity: InsertBookingEntity) -> Result<BookingEntity>;
    async fn find_by_id(&self, booking_id: Uuid) -> Result<Option<BookingEntity>>;
    async fn list(&self, filter: &BookingListFilter) -> Result<Vec<BookingEntity>>;
    /// Applies `edit` and, when given, the status change under a row lock on
    /// the booking. A status move appends one change log entry in the same
    /// transaction; moving to the current status writes no log.
    async fn update(
        &self,
        booking_id: Uuid,
        edit_booking_entity: EditBookingEntity,
        status_change: Option<StatusChange>,
    ) -> Result<BookingUpdateOutcome>;
    async fn delete(&self, booking_id: Uuid) -> Result<()>;
    /// Change logs of the given bookings, newest first.
    async fn list_change_logs(&self, booking_ids: Vec<Uuid>)
    -> Result<Vec<BookingChangeLogEntity>>;
}
