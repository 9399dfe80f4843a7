use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::{
    entities::{
        payments::{EditPaymentEntity, InsertPaymentEntity, PaymentEntity},
        refunds::{InsertRefundEntity, RefundEntity},
    },
    value_objects::{
        enums::refund_policies::RefundPolicy,
        payments::{PaymentListFilter, RefundCreation},
    },
};

#[automock]
#[async_trait]
pub trait PaymentRepository {
    /// `None` when the booking already has a payment.
    async fn create(&self, insert_payment_entity: InsertPaymentEntity)
    -> Result<Option<PaymentEntity>>;
    async fn find_by_id(&self, payment_id: Uuid) -> Result<Option<PaymentEntity>>;
    async fn find_by_booking(&self, booking_id: Uuid) -> Result<Option<PaymentEntity>>;
    async fn list(&self, filter: &PaymentListFilter) -> Result<Vec<PaymentEntity>>;
    async fn update(
        &self,
        payment_id: Uuid,
        edit_payment_entity: EditPaymentEntity,
    ) -> Result<PaymentEntity>;
    /// Refunds of the given payments, oldest first.
    async fn list_refunds(&self, payment_ids: Vec<Uuid>) -> Result<Vec<RefundEntity>>;
    /// Locks the payment, applies `policy` against the refunds recorded so far,
    /// inserts the refund and rewrites the payment's refund totals.
    async fn create_refund(
        &self,
        insert_refund_entity: InsertRefundEntity,
        policy: RefundPolicy,
    ) -> Result<RefundCreation>;
}
