use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain::{
        entities::{
            payments::{EditPaymentEntity, InsertPaymentEntity, PaymentEntity},
            refunds::{InsertRefundEntity, RefundEntity},
        },
        repositories::payments::PaymentRepository,
        value_objects::{
            enums::refund_policies::{RefundDecision, RefundPolicy},
            payments::{
                PaymentListFilter, PaymentScope, RefundCreation, refund_totals, total_refunded,
            },
        },
    },
    infrastructure::postgres::{
        postgres_connection::PgPoolSquad,
        schema::{bookings, payments, refunds},
    },
};

pub struct PaymentPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl PaymentPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl PaymentRepository for PaymentPostgres {
    async fn create(
        &self,
        insert_payment_entity: InsertPaymentEntity,
    ) -> Result<Option<PaymentEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let payment = diesel::insert_into(payments::table)
            .values(&insert_payment_entity)
            .on_conflict(payments::booking_id)
            .do_nothing()
            .returning(PaymentEntity::as_select())
            .get_result::<PaymentEntity>(&mut conn)
            .optional()?;

        Ok(payment)
    }

    async fn find_by_id(&self, payment_id: Uuid) -> Result<Option<PaymentEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let payment = payments::table
            .find(payment_id)
            .select(PaymentEntity::as_select())
            .first::<PaymentEntity>(&mut conn)
            .optional()?;

        Ok(payment)
    }

    async fn find_by_booking(&self, booking_id: Uuid) -> Result<Option<PaymentEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let payment = payments::table
            .filter(payments::booking_id.eq(booking_id))
            .select(PaymentEntity::as_select())
            .first::<PaymentEntity>(&mut conn)
            .optional()?;

        Ok(payment)
    }

    async fn list(&self, filter: &PaymentListFilter) -> Result<Vec<PaymentEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let mut query = payments::table
            .select(PaymentEntity::as_select())
            .into_boxed();

        if let PaymentScope::Party(user_id) = filter.scope {
            let party_bookings = bookings::table
                .filter(
                    bookings::client_id
                        .eq(user_id)
                        .or(bookings::provider_id.eq(user_id)),
                )
                .select(bookings::id);
            query = query.filter(payments::booking_id.eq_any(party_bookings));
        }

        let results = query
            .order(payments::created_at.desc())
            .limit(filter.pagination.limit)
            .offset(filter.pagination.offset)
            .load::<PaymentEntity>(&mut conn)?;

        Ok(results)
    }

    async fn update(
        &self,
        payment_id: Uuid,
        edit_payment_entity: EditPaymentEntity,
    ) -> Result<PaymentEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let payment = diesel::update(payments::table.find(payment_id))
            .set(&edit_payment_entity)
            .returning(PaymentEntity::as_select())
            .get_result::<PaymentEntity>(&mut conn)?;

        Ok(payment)
    }

    async fn list_refunds(&self, payment_ids: Vec<Uuid>) -> Result<Vec<RefundEntity>> {
        if payment_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = refunds::table
            .filter(refunds::payment_id.eq_any(payment_ids))
            .select(RefundEntity::as_select())
            .order(refunds::created_at.asc())
            .load::<RefundEntity>(&mut conn)?;

        Ok(results)
    }

    async fn create_refund(
        &self,
        insert_refund_entity: InsertRefundEntity,
        policy: RefundPolicy,
    ) -> Result<RefundCreation> {
        let mut conn = Arc::clone(&self.db_pool).get()?;
        let payment_id = insert_refund_entity.payment_id;

        let creation = conn.transaction::<RefundCreation, anyhow::Error, _>(|tx| {
            let payment = payments::table
                .find(payment_id)
                .select(PaymentEntity::as_select())
                .for_update()
                .first::<PaymentEntity>(tx)?;

            let existing = refunds::table
                .filter(refunds::payment_id.eq(payment_id))
                .select(RefundEntity::as_select())
                .load::<RefundEntity>(tx)?;
            let refunded_minor = total_refunded(&existing)
                .ok_or_else(|| anyhow!("refunds of payment {} overflow", payment_id))?;

            let amount_minor = match policy.decide(
                insert_refund_entity.amount_minor,
                payment.amount_minor,
                refunded_minor,
            ) {
                RefundDecision::Accept { amount_minor } => amount_minor,
                RefundDecision::Reject { remaining_minor } => {
                    return Ok(RefundCreation::Rejected { remaining_minor });
                }
            };

            let refund = diesel::insert_into(refunds::table)
                .values(&InsertRefundEntity {
                    amount_minor,
                    ..insert_refund_entity
                })
                .returning(RefundEntity::as_select())
                .get_result::<RefundEntity>(tx)?;

            let refunded_minor = refunded_minor
                .checked_add(refund.amount_minor)
                .ok_or_else(|| anyhow!("refunds of payment {} overflow", payment_id))?;
            let totals = refund_totals(
                &payment,
                refunded_minor,
                &refund.reason,
                Utc::now(),
            );
            diesel::update(payments::table.find(payment_id))
                .set(&totals)
                .execute(tx)?;

            Ok(RefundCreation::Created(refund))
        })?;

        Ok(creation)
    }
}
