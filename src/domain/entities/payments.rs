use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::payments;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = payments)]
pub struct PaymentEntity {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub amount_minor: i64,
    pub currency: String,
    pub payment_method: String,
    pub status: String,
    pub transaction_id: Option<String>,
    pub customer_email: String,
    pub customer_name: String,
    pub billing_address: String,
    pub tax_minor: i64,
    pub service_fee_minor: i64,
    pub total_minor: i64,
    pub refund_minor: i64,
    pub is_refunded: bool,
    pub refunded_at: Option<DateTime<Utc>>,
    pub refund_reason: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
    pub failed_at: Option<DateTime<Utc>>,
    pub failure_reason: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = payments)]
pub struct InsertPaymentEntity {
    pub booking_id: Uuid,
    pub amount_minor: i64,
    pub currency: String,
    pub payment_method: String,
    pub status: String,
    pub customer_email: String,
    pub customer_name: String,
    pub billing_address: String,
    pub tax_minor: i64,
    pub service_fee_minor: i64,
    pub total_minor: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, AsChangeset)]
#[diesel(table_name = payments)]
pub struct EditPaymentEntity {
    pub amount_minor: Option<i64>,
    pub currency: Option<String>,
    pub payment_method: Option<String>,
    pub customer_email: Option<String>,
    pub customer_name: Option<String>,
    pub billing_address: Option<String>,
    pub tax_minor: Option<i64>,
    pub service_fee_minor: Option<i64>,
    pub total_minor: Option<i64>,
    pub updated_at: DateTime<Utc>,
}

/// Refund bookkeeping written back onto the payment whenever a refund is added.
#[derive(Debug, Clone, PartialEq, AsChangeset)]
#[diesel(table_name = payments)]
pub struct PaymentRefundTotalsEntity {
    pub refund_minor: i64,
    pub is_refunded: bool,
    pub refunded_at: Option<DateTime<Utc>>,
    pub refund_reason: String,
    pub updated_at: DateTime<Utc>,
}
