use anyhow::{Result, anyhow};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    entities::{
        payments::{EditPaymentEntity, PaymentEntity, PaymentRefundTotalsEntity},
        refunds::RefundEntity,
    },
    value_objects::{
        enums::{
            currencies::Currency, payment_methods::PaymentMethod, payment_statuses::PaymentStatus,
        },
        pagination::Pagination,
    },
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentModel {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub amount_minor: i64,
    pub currency: Currency,
    pub payment_method: PaymentMethod,
    pub status: PaymentStatus,
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
    pub refunds: Vec<RefundModel>,
    pub total_refunded_minor: i64,
    pub balance_remaining_minor: i64,
}

impl PaymentModel {
    /// `refunds` must be every refund row of this payment; the derived totals
    /// are computed from them rather than read from the stored counter.
    pub fn from_entity(entity: PaymentEntity, refunds: Vec<RefundEntity>) -> Result<Self> {
        let total_refunded_minor = total_refunded(&refunds)
            .ok_or_else(|| anyhow!("refunds of payment {} overflow", entity.id))?;
        let balance_remaining_minor = entity
            .amount_minor
            .checked_sub(total_refunded_minor)
            .ok_or_else(|| anyhow!("balance of payment {} overflows", entity.id))?;
        let refunds = refunds
            .into_iter()
            .map(RefundModel::from_entity)
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            id: entity.id,
            booking_id: entity.booking_id,
            amount_minor: entity.amount_minor,
            currency: entity.currency.parse()?,
            payment_method: entity.payment_method.parse()?,
            status: entity.status.parse()?,
            transaction_id: entity.transaction_id,
            customer_email: entity.customer_email,
            customer_name: entity.customer_name,
            billing_address: entity.billing_address,
            tax_minor: entity.tax_minor,
            service_fee_minor: entity.service_fee_minor,
            total_minor: entity.total_minor,
            refund_minor: entity.refund_minor,
            is_refunded: entity.is_refunded,
            refunded_at: entity.refunded_at,
            refund_reason: entity.refund_reason,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
            processed_at: entity.processed_at,
            failed_at: entity.failed_at,
            failure_reason: entity.failure_reason,
            refunds,
            total_refunded_minor,
            balance_remaining_minor,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RefundModel {
    pub id: Uuid,
    pub payment_id: Uuid,
    pub amount_minor: i64,
    pub reason: String,
    pub status: PaymentStatus,
    pub processed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RefundModel {
    pub fn from_entity(entity: RefundEntity) -> Result<Self> {
        Ok(Self {
            id: entity.id,
            payment_id: entity.payment_id,
            amount_minor: entity.amount_minor,
            reason: entity.reason,
            status: entity.status.parse()?,
            processed_at: entity.processed_at,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreatePaymentModel {
    /// Defaults to the booking price.
    pub amount_minor: Option<i64>,
    pub currency: Option<Currency>,
    pub payment_method: PaymentMethod,
    pub customer_email: String,
    pub customer_name: String,
    pub billing_address: Option<String>,
    pub tax_minor: Option<i64>,
    pub service_fee_minor: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UpdatePaymentModel {
    pub amount_minor: Option<i64>,
    pub currency: Option<Currency>,
    pub payment_method: Option<PaymentMethod>,
    pub customer_email: Option<String>,
    pub customer_name: Option<String>,
    pub billing_address: Option<String>,
    pub tax_minor: Option<i64>,
    pub service_fee_minor: Option<i64>,
}

impl UpdatePaymentModel {
    /// Builds the changeset, recomputing the total from the merged amounts.
    pub fn to_entity(&self, current: &PaymentEntity) -> Result<EditPaymentEntity, String> {
        let amount_minor = self.amount_minor.unwrap_or(current.amount_minor);
        let tax_minor = self.tax_minor.unwrap_or(current.tax_minor);
        let service_fee_minor = self.service_fee_minor.unwrap_or(current.service_fee_minor);

        let total = total_minor(amount_minor, tax_minor, service_fee_minor)?;

        Ok(EditPaymentEntity {
            amount_minor: self.amount_minor,
            currency: self.currency.map(|currency| currency.to_string()),
            payment_method: self.payment_method.map(|method| method.to_string()),
            customer_email: self.customer_email.clone(),
            customer_name: self.customer_name.clone(),
            billing_address: self.billing_address.clone(),
            tax_minor: self.tax_minor,
            service_fee_minor: self.service_fee_minor,
            total_minor: Some(total),
            updated_at: Utc::now(),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateRefundModel {
    pub amount_minor: i64,
    pub reason: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentScope {
    All,
    /// Payments of bookings where the user is client or provider.
    Party(Uuid),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PaymentListFilter {
    pub scope: PaymentScope,
    pub pagination: Pagination,
}

#[derive(Debug, Clone)]
pub enum RefundCreation {
    Created(RefundEntity),
    Rejected { remaining_minor: i64 },
}

pub fn total_minor(
    amount_minor: i64,
    tax_minor: i64,
    service_fee_minor: i64,
) -> Result<i64, String> {
    amount_minor
        .checked_add(tax_minor)
        .and_then(|total| total.checked_add(service_fee_minor))
        .ok_or_else(|| "payment total exceeds the largest supported amount".to_string())
}

/// `None` when the refunds no longer fit in an i64.
pub fn total_refunded(refunds: &[RefundEntity]) -> Option<i64> {
    refunds
        .iter()
        .try_fold(0i64, |total, refund| total.checked_add(refund.amount_minor))
}

/// Refund counters stored on the payment after its refunds sum to
/// `refunded_minor`.
pub fn refund_totals(
    payment: &PaymentEntity,
    refunded_minor: i64,
    reason: &str,
    now: DateTime<Utc>,
) -> PaymentRefundTotalsEntity {
    let is_refunded = refunded_minor >= payment.amount_minor;
    let refunded_at = match (payment.refunded_at, is_refunded) {
        (Some(at), _) => Some(at),
        (None, true) => Some(now),
        (None, false) => None,
    };

    PaymentRefundTotalsEntity {
        refund_minor: refunded_minor,
        is_refunded,
        refunded_at,
        refund_reason: reason.to_string(),
        updated_at: now,
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::{payment, refund};
    use super::*;

    #[test]
    fn derived_totals_follow_refund_rows() {
        let payment = payment(Uuid::new_v4(), 8_500);
        let refunds = vec![refund(payment.id, 2_000)];

        let model = PaymentModel::from_entity(payment.clone(), refunds).unwrap();
        assert_eq!(model.total_refunded_minor, 2_000);
        assert_eq!(model.balance_remaining_minor, 6_500);

        let refunds = vec![refund(payment.id, 2_000), refund(payment.id, 7_000)];
        let model = PaymentModel::from_entity(payment, refunds).unwrap();
        assert_eq!(model.total_refunded_minor, 9_000);
        assert_eq!(model.balance_remaining_minor, -500);
        assert_eq!(model.refunds.len(), 2);
    }

    #[test]
    fn refund_totals_mark_payment_refunded_once() {
        let mut payment = payment(Uuid::new_v4(), 8_500);
        let now = Utc::now();

        let partial = refund_totals(&payment, 2_000, "partial", now);
        assert!(!partial.is_refunded);
        assert_eq!(partial.refunded_at, None);

        let full = refund_totals(&payment, 8_500, "rest", now);
        assert!(full.is_refunded);
        assert_eq!(full.refunded_at, Some(now));

        payment.refunded_at = Some(now);
        let later = refund_totals(&payment, 9_000, "extra", now + chrono::Duration::hours(1));
        assert_eq!(later.refunded_at, Some(now));
        assert_eq!(later.refund_reason, "extra");
    }

    #[test]
    fn update_recomputes_total_from_merged_amounts() {
        let mut current = payment(Uuid::new_v4(), 8_500);
        current.tax_minor = 500;

        let update = UpdatePaymentModel {
            service_fee_minor: Some(250),
            ..Default::default()
        };
        let edit = update.to_entity(&current).unwrap();
        assert_eq!(edit.total_minor, Some(9_250));
        assert_eq!(edit.amount_minor, None);
    }

    #[test]
    fn total_at_the_i64_limit_is_refused() {
        assert_eq!(total_minor(i64::MAX - 750, 500, 250), Ok(i64::MAX));
        assert!(total_minor(i64::MAX, 500, 0).is_err());
        assert!(total_minor(i64::MAX - 500, 500, 1).is_err());

        let mut current = payment(Uuid::new_v4(), 8_500);
        current.tax_minor = 500;
        let update = UpdatePaymentModel {
            amount_minor: Some(i64::MAX),
            ..Default::default()
        };
        assert!(update.to_entity(&current).is_err());
    }

    #[test]
    fn overflowing_refund_rows_are_an_error_not_a_panic() {
        let payment = payment(Uuid::new_v4(), 8_500);
        let refunds = vec![refund(payment.id, i64::MAX), refund(payment.id, 1)];

        assert_eq!(total_refunded(&refunds), None);
        assert!(PaymentModel::from_entity(payment, refunds).is_err());
    }
}
