use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::{dsl::max, prelude::*};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain::{
        entities::{
            booking_change_logs::BookingChangeLogEntity,
            bookings::{BookingEntity, EditBookingEntity, InsertBookingEntity},
        },
        repositories::bookings::BookingRepository,
        value_objects::{
            bookings::{
                BookingListFilter, BookingScope, BookingUpdateOutcome, StatusChange, StatusPlan,
                next_change_log_timestamp,
            },
            enums::booking_statuses::BookingStatus,
        },
    },
    infrastructure::postgres::{
        postgres_connection::PgPoolSquad,
        schema::{booking_change_logs, bookings},
    },
};

pub struct BookingPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl BookingPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl BookingRepository for BookingPostgres {
    async fn create(&self, insert_booking_entity: InsertBookingEntity) -> Result<BookingEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let booking = diesel::insert_into(bookings::table)
            .values(&insert_booking_entity)
            .returning(BookingEntity::as_select())
            .get_result::<BookingEntity>(&mut conn)?;

        Ok(booking)
    }

    async fn find_by_id(&self, booking_id: Uuid) -> Result<Option<BookingEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let booking = bookings::table
            .find(booking_id)
            .select(BookingEntity::as_select())
            .first::<BookingEntity>(&mut conn)
            .optional()?;

        Ok(booking)
    }

    async fn list(&self, filter: &BookingListFilter) -> Result<Vec<BookingEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let mut query = bookings::table
            .select(BookingEntity::as_select())
            .into_boxed();

        query = match filter.scope {
            BookingScope::All => query,
            BookingScope::Party(user_id) => query.filter(
                bookings::client_id
                    .eq(user_id)
                    .or(bookings::provider_id.eq(user_id)),
            ),
            BookingScope::Client(user_id) => query.filter(bookings::client_id.eq(user_id)),
            BookingScope::Provider(user_id) => query.filter(bookings::provider_id.eq(user_id)),
        };

        if let Some(status) = filter.status {
            query = query.filter(bookings::status.eq(status.to_string()));
        }

        let results = query
            .order(bookings::created_at.desc())
            .limit(filter.pagination.limit)
            .offset(filter.pagination.offset)
            .load::<BookingEntity>(&mut conn)?;

        Ok(results)
    }

    async fn update(
        &self,
        booking_id: Uuid,
        edit_booking_entity: EditBookingEntity,
        status_change: Option<StatusChange>,
    ) -> Result<BookingUpdateOutcome> {
        let mut conn = Arc::clone(&self.db_pool).get()?;
        let now = Utc::now();

        let outcome = conn.transaction::<BookingUpdateOutcome, anyhow::Error, _>(|tx| {
            let Some(current) = bookings::table
                .find(booking_id)
                .select(BookingEntity::as_select())
                .for_update()
                .first::<BookingEntity>(tx)
                .optional()?
            else {
                return Ok(BookingUpdateOutcome::NotFound);
            };

            let current_status: BookingStatus = current.status.parse()?;
            let mut edit = edit_booking_entity;

            let mut logged_change = None;
            if let Some(change) = status_change {
                match change.plan(current_status) {
                    StatusPlan::Unchanged => {}
                    StatusPlan::Illegal { from, to } => {
                        return Ok(BookingUpdateOutcome::InvalidTransition { from, to });
                    }
                    StatusPlan::Apply { previous_status } => {
                        change.stamp(&mut edit, now);
                        logged_change = Some((change, previous_status));
                    }
                }
            }

            let booking = diesel::update(bookings::table.find(booking_id))
                .set(&edit)
                .returning(BookingEntity::as_select())
                .get_result::<BookingEntity>(tx)?;

            let change_log = match logged_change {
                Some((change, previous_status)) => {
                    let last = booking_change_logs::table
                        .filter(booking_change_logs::booking_id.eq(booking_id))
                        .select(max(booking_change_logs::timestamp))
                        .first::<Option<DateTime<Utc>>>(tx)?;

                    let log = change.to_log_entity(
                        booking_id,
                        previous_status,
                        next_change_log_timestamp(now, last),
                    );

                    let inserted = diesel::insert_into(booking_change_logs::table)
                        .values(&log)
                        .returning(BookingChangeLogEntity::as_select())
                        .get_result::<BookingChangeLogEntity>(tx)?;
                    Some(inserted)
                }
                None => None,
            };

            Ok(BookingUpdateOutcome::Applied {
                booking,
                change_log,
            })
        })?;

        Ok(outcome)
    }

    async fn delete(&self, booking_id: Uuid) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        diesel::delete(bookings::table.find(booking_id)).execute(&mut conn)?;

        Ok(())
    }

    async fn list_change_logs(
        &self,
        booking_ids: Vec<Uuid>,
    ) -> Result<Vec<BookingChangeLogEntity>> {
        if booking_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = booking_change_logs::table
            .filter(booking_change_logs::booking_id.eq_any(booking_ids))
            .select(BookingChangeLogEntity::as_select())
            .order(booking_change_logs::timestamp.desc())
            .load::<BookingChangeLogEntity>(&mut conn)?;

        Ok(results)
    }
}
