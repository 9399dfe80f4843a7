use std::{collections::HashMap, sync::Arc};

use chrono::Utc;
use thiserror::Error;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::domain::{
    entities::{
        bookings::BookingEntity,
        payments::{InsertPaymentEntity, PaymentEntity},
        refunds::{InsertRefundEntity, RefundEntity},
    },
    repositories::{bookings::BookingRepository, payments::PaymentRepository},
    value_objects::{
        caller::Caller,
        enums::{payment_statuses::PaymentStatus, refund_policies::RefundPolicy},
        pagination::PaginationQuery,
        payments::{
            CreatePaymentModel, CreateRefundModel, PaymentListFilter, PaymentModel, PaymentScope,
            RefundCreation, RefundModel, UpdatePaymentModel, total_minor,
        },
    },
};

#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("{0}")]
    Validation(String),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("you are not allowed to access this payment")]
    Forbidden,
    #[error("{0}")]
    Conflict(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl PaymentError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            PaymentError::Validation(_) => StatusCode::BAD_REQUEST,
            PaymentError::NotFound(_) => StatusCode::NOT_FOUND,
            PaymentError::Forbidden => StatusCode::FORBIDDEN,
            PaymentError::Conflict(_) => StatusCode::CONFLICT,
            PaymentError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type UseCaseResult<T> = std::result::Result<T, PaymentError>;

pub struct PaymentUseCase<P, B>
where
    P: PaymentRepository + Send + Sync + 'static,
    B: BookingRepository + Send + Sync + 'static,
{
    payment_repo: Arc<P>,
    booking_repo: Arc<B>,
    refund_policy: RefundPolicy,
}

impl<P, B> PaymentUseCase<P, B>
where
    P: PaymentRepository + Send + Sync + 'static,
    B: BookingRepository + Send + Sync + 'static,
{
    pub fn new(payment_repo: Arc<P>, booking_repo: Arc<B>, refund_policy: RefundPolicy) -> Self {
        Self {
            payment_repo,
            booking_repo,
            refund_policy,
        }
    }

    pub async fn create_for_booking(
        &self,
        caller: Caller,
        booking_id: Uuid,
        create_payment_model: CreatePaymentModel,
    ) -> UseCaseResult<PaymentModel> {
        info!(user_id = %caller.user_id, %booking_id, "payments: create requested");
        let booking = self.load_booking_for(&caller, booking_id).await?;

        let amount_minor = create_payment_model
            .amount_minor
            .unwrap_or(booking.price_minor);
        let tax_minor = create_payment_model.tax_minor.unwrap_or(0);
        let service_fee_minor = create_payment_model.service_fee_minor.unwrap_or(0);
        self.ensure_non_negative(
            caller.user_id,
            &[
                ("amount_minor", amount_minor),
                ("tax_minor", tax_minor),
                ("service_fee_minor", service_fee_minor),
            ],
        )?;
        if create_payment_model.customer_email.trim().is_empty() {
            return Err(self.rejected(caller.user_id, "customer_email is required".to_string()));
        }
        let payment_total = total_minor(amount_minor, tax_minor, service_fee_minor)
            .map_err(|message| self.rejected(caller.user_id, message))?;

        let now = Utc::now();
        let insert_payment_entity = InsertPaymentEntity {
            booking_id,
            amount_minor,
            currency: create_payment_model.currency.unwrap_or_default().to_string(),
            payment_method: create_payment_model.payment_method.to_string(),
            status: PaymentStatus::Pending.to_string(),
            customer_email: create_payment_model.customer_email,
            customer_name: create_payment_model.customer_name,
            billing_address: create_payment_model.billing_address.unwrap_or_default(),
            tax_minor,
            service_fee_minor,
            total_minor: payment_total,
            created_at: now,
            updated_at: now,
        };

        let payment = self
            .payment_repo
            .create(insert_payment_entity)
            .await
            .map_err(|err| {
                error!(%booking_id, db_error = ?err, "payments: failed to create payment");
                PaymentError::Internal(err)
            })?
            .ok_or_else(|| {
                warn!(
                    %booking_id,
                    status = axum::http::StatusCode::CONFLICT.as_u16(),
                    "payments: booking already has a payment"
                );
                PaymentError::Conflict("booking already has a payment".to_string())
            })?;

        info!(
            %booking_id,
            payment_id = %payment.id,
            amount_minor = payment.amount_minor,
            total_minor = payment.total_minor,
            "payments: payment created"
        );

        PaymentModel::from_entity(payment, Vec::new()).map_err(PaymentError::Internal)
    }

    /// `None` while the booking has no payment yet.
    pub async fn get_for_booking(
        &self,
        caller: Caller,
        booking_id: Uuid,
    ) -> UseCaseResult<Option<PaymentModel>> {
        self.load_booking_for(&caller, booking_id).await?;

        let payment = self
            .payment_repo
            .find_by_booking(booking_id)
            .await
            .map_err(|err| {
                error!(%booking_id, db_error = ?err, "payments: failed to load booking payment");
                PaymentError::Internal(err)
            })?;

        match payment {
            Some(payment) => Ok(self.to_models(vec![payment]).await?.pop()),
            None => {
                debug!(%booking_id, "payments: booking has no payment yet");
                Ok(None)
            }
        }
    }

    pub async fn get(&self, caller: Caller, payment_id: Uuid) -> UseCaseResult<PaymentModel> {
        let payment = self.load_payment_for(&caller, payment_id).await?;
        self.to_model(payment).await
    }

    pub async fn update(
        &self,
        caller: Caller,
        payment_id: Uuid,
        update_payment_model: UpdatePaymentModel,
    ) -> UseCaseResult<PaymentModel> {
        let current = self.load_payment_for(&caller, payment_id).await?;

        let amounts = [
            ("amount_minor", update_payment_model.amount_minor),
            ("tax_minor", update_payment_model.tax_minor),
            ("service_fee_minor", update_payment_model.service_fee_minor),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.map(|value| (field, value)))
        .collect::<Vec<_>>();
        self.ensure_non_negative(caller.user_id, &amounts)?;

        let edit = update_payment_model
            .to_entity(&current)
            .map_err(|message| self.rejected(caller.user_id, message))?;
        let payment = self
            .payment_repo
            .update(payment_id, edit)
            .await
            .map_err(|err| {
                error!(%payment_id, db_error = ?err, "payments: failed to update payment");
                PaymentError::Internal(err)
            })?;

        info!(
            user_id = %caller.user_id,
            %payment_id,
            total_minor = payment.total_minor,
            "payments: payment updated"
        );
        self.to_model(payment).await
    }

    pub async fn list_all(
        &self,
        caller: Caller,
        query: PaginationQuery,
    ) -> UseCaseResult<Vec<PaymentModel>> {
        if !caller.is_staff {
            warn!(user_id = %caller.user_id, "payments: payment list requires staff");
            return Err(PaymentError::Forbidden);
        }
        self.list_scoped(caller, PaymentScope::All, query).await
    }

    pub async fn list_for_user(
        &self,
        caller: Caller,
        user_id: Uuid,
        query: PaginationQuery,
    ) -> UseCaseResult<Vec<PaymentModel>> {
        if !caller.can_act_for(user_id) {
            warn!(caller_id = %caller.user_id, %user_id, "payments: user payment list denied");
            return Err(PaymentError::Forbidden);
        }
        self.list_scoped(caller, PaymentScope::Party(user_id), query)
            .await
    }

    pub async fn list_refunds(
        &self,
        caller: Caller,
        payment_id: Uuid,
    ) -> UseCaseResult<Vec<RefundModel>> {
        self.load_payment_for(&caller, payment_id).await?;

        self.load_refunds(vec![payment_id])
            .await?
            .into_iter()
            .map(|refund| RefundModel::from_entity(refund).map_err(PaymentError::Internal))
            .collect()
    }

    pub async fn create_refund(
        &self,
        caller: Caller,
        payment_id: Uuid,
        create_refund_model: CreateRefundModel,
    ) -> UseCaseResult<RefundModel> {
        info!(
            user_id = %caller.user_id,
            %payment_id,
            amount_minor = create_refund_model.amount_minor,
            policy = %self.refund_policy,
            "payments: refund requested"
        );

        if create_refund_model.amount_minor <= 0 {
            return Err(self.rejected(
                caller.user_id,
                "refund amount must be greater than zero".to_string(),
            ));
        }
        self.load_payment_for(&caller, payment_id).await?;

        let now = Utc::now();
        let insert_refund_entity = InsertRefundEntity {
            payment_id,
            amount_minor: create_refund_model.amount_minor,
            reason: create_refund_model.reason,
            status: PaymentStatus::Pending.to_string(),
            created_at: now,
            updated_at: now,
        };

        let creation = self
            .payment_repo
            .create_refund(insert_refund_entity, self.refund_policy)
            .await
            .map_err(|err| {
                error!(%payment_id, db_error = ?err, "payments: failed to create refund");
                PaymentError::Internal(err)
            })?;

        match creation {
            RefundCreation::Created(refund) => {
                info!(
                    %payment_id,
                    refund_id = %refund.id,
                    amount_minor = refund.amount_minor,
                    "payments: refund recorded"
                );
                RefundModel::from_entity(refund).map_err(PaymentError::Internal)
            }
            RefundCreation::Rejected { remaining_minor } => Err(self.rejected(
                caller.user_id,
                format!(
                    "refund of {} exceeds the remaining balance of {}",
                    create_refund_model.amount_minor, remaining_minor
                ),
            )),
        }
    }

    async fn list_scoped(
        &self,
        caller: Caller,
        scope: PaymentScope,
        query: PaginationQuery,
    ) -> UseCaseResult<Vec<PaymentModel>> {
        let pagination = query
            .validate()
            .map_err(|message| self.rejected(caller.user_id, message))?;

        let filter = PaymentListFilter { scope, pagination };
        let payments = self.payment_repo.list(&filter).await.map_err(|err| {
            error!(user_id = %caller.user_id, db_error = ?err, "payments: failed to list payments");
            PaymentError::Internal(err)
        })?;

        self.to_models(payments).await
    }

    async fn load_booking_for(
        &self,
        caller: &Caller,
        booking_id: Uuid,
    ) -> UseCaseResult<BookingEntity> {
        let booking = self
            .booking_repo
            .find_by_id(booking_id)
            .await
            .map_err(|err| {
                error!(%booking_id, db_error = ?err, "payments: failed to load booking");
                PaymentError::Internal(err)
            })?
            .ok_or(PaymentError::NotFound("booking"))?;

        if !caller.is_staff && !booking.is_party(caller.user_id) {
            warn!(
                user_id = %caller.user_id,
                %booking_id,
                status = axum::http::StatusCode::FORBIDDEN.as_u16(),
                "payments: caller is not a party of the booking"
            );
            return Err(PaymentError::Forbidden);
        }

        Ok(booking)
    }

    async fn load_payment_for(
        &self,
        caller: &Caller,
        payment_id: Uuid,
    ) -> UseCaseResult<PaymentEntity> {
        let payment = self
            .payment_repo
            .find_by_id(payment_id)
            .await
            .map_err(|err| {
                error!(%payment_id, db_error = ?err, "payments: failed to load payment");
                PaymentError::Internal(err)
            })?
            .ok_or(PaymentError::NotFound("payment"))?;

        if !caller.is_staff {
            self.load_booking_for(caller, payment.booking_id).await?;
        }

        Ok(payment)
    }

    async fn load_refunds(&self, payment_ids: Vec<Uuid>) -> UseCaseResult<Vec<RefundEntity>> {
        self.payment_repo
            .list_refunds(payment_ids)
            .await
            .map_err(|err| {
                error!(db_error = ?err, "payments: failed to load refunds");
                PaymentError::Internal(err)
            })
    }

    async fn to_model(&self, payment: PaymentEntity) -> UseCaseResult<PaymentModel> {
        self.to_models(vec![payment])
            .await?
            .pop()
            .ok_or_else(|| PaymentError::Internal(anyhow::anyhow!("payment model missing")))
    }

    async fn to_models(&self, payments: Vec<PaymentEntity>) -> UseCaseResult<Vec<PaymentModel>> {
        if payments.is_empty() {
            return Ok(Vec::new());
        }

        let payment_ids = payments.iter().map(|payment| payment.id).collect();
        let mut refunds_by_payment: HashMap<Uuid, Vec<RefundEntity>> = HashMap::new();
        for refund in self.load_refunds(payment_ids).await? {
            refunds_by_payment
                .entry(refund.payment_id)
                .or_default()
                .push(refund);
        }

        payments
            .into_iter()
            .map(|payment| {
                let refunds = refunds_by_payment.remove(&payment.id).unwrap_or_default();
                PaymentModel::from_entity(payment, refunds).map_err(PaymentError::Internal)
            })
            .collect()
    }

    fn ensure_non_negative(&self, user_id: Uuid, amounts: &[(&str, i64)]) -> UseCaseResult<()> {
        match amounts.iter().find(|(_, value)| *value < 0) {
            Some((field, _)) => Err(self.rejected(user_id, format!("{} must not be negative", field))),
            None => Ok(()),
        }
    }

    fn rejected(&self, user_id: Uuid, message: String) -> PaymentError {
        warn!(
            %user_id,
            reason = message.as_str(),
            status = axum::http::StatusCode::BAD_REQUEST.as_u16(),
            "payments: request rejected"
        );
        PaymentError::Validation(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        application::usercases::bookings::fixtures::booking,
        domain::{
            repositories::{bookings::MockBookingRepository, payments::MockPaymentRepository},
            value_objects::{
                enums::{
                    booking_statuses::BookingStatus, payment_methods::PaymentMethod,
                    refund_policies::RefundDecision,
                },
                payments::fixtures::{payment, refund},
            },
        },
    };
    use mockall::predicate::eq;

    fn usecase(
        payment_repo: MockPaymentRepository,
        booking_repo: MockBookingRepository,
        refund_policy: RefundPolicy,
    ) -> PaymentUseCase<MockPaymentRepository, MockBookingRepository> {
        PaymentUseCase::new(Arc::new(payment_repo), Arc::new(booking_repo), refund_policy)
    }

    fn create_model() -> CreatePaymentModel {
        CreatePaymentModel {
            amount_minor: None,
            currency: None,
            payment_method: PaymentMethod::CreditCard,
            customer_email: "casey@example.com".to_string(),
            customer_name: "Casey Client".to_string(),
            billing_address: None,
            tax_minor: Some(500),
            service_fee_minor: Some(250),
        }
    }

    fn booking_found(booking_repo: &mut MockBookingRepository, booking: BookingEntity) {
        booking_repo
            .expect_find_by_id()
            .with(eq(booking.id))
            .returning(move |_| Ok(Some(booking.clone())));
    }

    #[tokio::test]
    async fn payment_defaults_to_booking_price() {
        let client_id = Uuid::new_v4();
        let booking = booking(client_id, Uuid::new_v4(), Uuid::new_v4(), BookingStatus::Confirmed);
        let booking_id = booking.id;

        let mut booking_repo = MockBookingRepository::new();
        booking_found(&mut booking_repo, booking);

        let mut payment_repo = MockPaymentRepository::new();
        payment_repo
            .expect_create()
            .withf(|insert| {
                insert.amount_minor == 8_500
                    && insert.total_minor == 9_250
                    && insert.status == "pending"
                    && insert.currency == "USD"
            })
            .returning(|insert| {
                let mut created = payment(insert.booking_id, insert.amount_minor);
                created.total_minor = insert.total_minor;
                Ok(Some(created))
            });

        let payment = usecase(payment_repo, booking_repo, RefundPolicy::Allow)
            .create_for_booking(Caller::user(client_id), booking_id, create_model())
            .await
            .unwrap();

        assert_eq!(payment.amount_minor, 8_500);
        assert_eq!(payment.total_minor, 9_250);
        assert_eq!(payment.balance_remaining_minor, 8_500);
    }

    #[tokio::test]
    async fn second_payment_for_booking_conflicts() {
        let client_id = Uuid::new_v4();
        let booking = booking(client_id, Uuid::new_v4(), Uuid::new_v4(), BookingStatus::Confirmed);
        let booking_id = booking.id;

        let mut booking_repo = MockBookingRepository::new();
        booking_found(&mut booking_repo, booking);

        let mut payment_repo = MockPaymentRepository::new();
        payment_repo.expect_create().returning(|_| Ok(None));

        let err = usecase(payment_repo, booking_repo, RefundPolicy::Allow)
            .create_for_booking(Caller::user(client_id), booking_id, create_model())
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), axum::http::StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn payment_total_beyond_i64_is_rejected() {
        let client_id = Uuid::new_v4();
        let booking = booking(client_id, Uuid::new_v4(), Uuid::new_v4(), BookingStatus::Confirmed);
        let booking_id = booking.id;

        let mut booking_repo = MockBookingRepository::new();
        booking_found(&mut booking_repo, booking);

        let mut payment_repo = MockPaymentRepository::new();
        payment_repo.expect_create().never();

        let mut model = create_model();
        model.amount_minor = Some(i64::MAX);

        let err = usecase(payment_repo, booking_repo, RefundPolicy::Allow)
            .create_for_booking(Caller::user(client_id), booking_id, model)
            .await
            .unwrap_err();

        assert!(matches!(err, PaymentError::Validation(_)));
        assert_eq!(err.status_code(), axum::http::StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn payment_update_beyond_i64_is_rejected() {
        let client_id = Uuid::new_v4();
        let booking = booking(client_id, Uuid::new_v4(), Uuid::new_v4(), BookingStatus::Confirmed);
        let mut current = payment(booking.id, 8_500);
        current.tax_minor = 500;
        let payment_id = current.id;

        let mut booking_repo = MockBookingRepository::new();
        booking_found(&mut booking_repo, booking);

        let mut payment_repo = MockPaymentRepository::new();
        payment_repo
            .expect_find_by_id()
            .with(eq(payment_id))
            .returning(move |_| Ok(Some(current.clone())));
        payment_repo.expect_update().never();

        let update = UpdatePaymentModel {
            amount_minor: Some(i64::MAX),
            ..Default::default()
        };

        let result = usecase(payment_repo, booking_repo, RefundPolicy::Allow)
            .update(Caller::user(client_id), payment_id, update)
            .await;

        assert!(matches!(result, Err(PaymentError::Validation(_))));
    }

    #[tokio::test]
    async fn negative_amounts_are_rejected() {
        let client_id = Uuid::new_v4();
        let booking = booking(client_id, Uuid::new_v4(), Uuid::new_v4(), BookingStatus::Confirmed);
        let booking_id = booking.id;

        let mut booking_repo = MockBookingRepository::new();
        booking_found(&mut booking_repo, booking);

        let mut model = create_model();
        model.tax_minor = Some(-1);

        let result = usecase(MockPaymentRepository::new(), booking_repo, RefundPolicy::Allow)
            .create_for_booking(Caller::user(client_id), booking_id, model)
            .await;

        assert!(matches!(result, Err(PaymentError::Validation(_))));
    }

    #[tokio::test]
    async fn booking_without_payment_yields_none() {
        let client_id = Uuid::new_v4();
        let booking = booking(client_id, Uuid::new_v4(), Uuid::new_v4(), BookingStatus::Pending);
        let booking_id = booking.id;

        let mut booking_repo = MockBookingRepository::new();
        booking_found(&mut booking_repo, booking);

        let mut payment_repo = MockPaymentRepository::new();
        payment_repo
            .expect_find_by_booking()
            .with(eq(booking_id))
            .returning(|_| Ok(None));

        let payment = usecase(payment_repo, booking_repo, RefundPolicy::Allow)
            .get_for_booking(Caller::user(client_id), booking_id)
            .await
            .unwrap();

        assert!(payment.is_none());
    }

    #[tokio::test]
    async fn payment_read_reports_refund_totals() {
        let client_id = Uuid::new_v4();
        let booking = booking(client_id, Uuid::new_v4(), Uuid::new_v4(), BookingStatus::Completed);
        let existing = payment(booking.id, 8_500);
        let payment_id = existing.id;

        let mut booking_repo = MockBookingRepository::new();
        booking_found(&mut booking_repo, booking);

        let mut payment_repo = MockPaymentRepository::new();
        payment_repo
            .expect_find_by_id()
            .with(eq(payment_id))
            .returning(move |_| Ok(Some(existing.clone())));
        payment_repo
            .expect_list_refunds()
            .returning(move |_| Ok(vec![refund(payment_id, 2_000)]));

        let payment = usecase(payment_repo, booking_repo, RefundPolicy::Allow)
            .get(Caller::user(client_id), payment_id)
            .await
            .unwrap();

        assert_eq!(payment.total_refunded_minor, 2_000);
        assert_eq!(payment.balance_remaining_minor, 6_500);
    }

    #[tokio::test]
    async fn refund_rejected_by_policy_is_a_bad_request() {
        let client_id = Uuid::new_v4();
        let booking = booking(client_id, Uuid::new_v4(), Uuid::new_v4(), BookingStatus::Completed);
        let existing = payment(booking.id, 8_500);
        let payment_id = existing.id;

        let mut booking_repo = MockBookingRepository::new();
        booking_found(&mut booking_repo, booking);

        let mut payment_repo = MockPaymentRepository::new();
        payment_repo
            .expect_find_by_id()
            .returning(move |_| Ok(Some(existing.clone())));
        payment_repo
            .expect_create_refund()
            .withf(|insert, policy| insert.amount_minor == 7_000 && *policy == RefundPolicy::Reject)
            .returning(|_, _| {
                Ok(RefundCreation::Rejected {
                    remaining_minor: 6_500,
                })
            });

        let err = usecase(payment_repo, booking_repo, RefundPolicy::Reject)
            .create_refund(
                Caller::user(client_id),
                payment_id,
                CreateRefundModel {
                    amount_minor: 7_000,
                    reason: "no show".to_string(),
                },
            )
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), axum::http::StatusCode::BAD_REQUEST);
        assert!(err.to_string().contains("6500"));
    }

    #[tokio::test]
    async fn refund_is_recorded_with_configured_policy() {
        let staff = Caller::staff(Uuid::new_v4());
        let existing = payment(Uuid::new_v4(), 8_500);
        let payment_id = existing.id;

        let mut payment_repo = MockPaymentRepository::new();
        payment_repo
            .expect_find_by_id()
            .returning(move |_| Ok(Some(existing.clone())));
        payment_repo
            .expect_create_refund()
            .withf(|_, policy| *policy == RefundPolicy::Cap)
            .times(1)
            .returning(move |_, _| Ok(RefundCreation::Created(refund(payment_id, 6_500))));

        let refund = usecase(payment_repo, MockBookingRepository::new(), RefundPolicy::Cap)
            .create_refund(
                staff,
                payment_id,
                CreateRefundModel {
                    amount_minor: 7_000,
                    reason: "partial".to_string(),
                },
            )
            .await
            .unwrap();

        assert_eq!(refund.amount_minor, 6_500);
        assert_eq!(refund.status, PaymentStatus::Pending);
    }

    #[tokio::test]
    async fn maximum_refund_under_allow_is_a_bad_request() {
        let staff = Caller::staff(Uuid::new_v4());
        let existing = payment(Uuid::new_v4(), 8_500);
        let payment_id = existing.id;

        let mut payment_repo = MockPaymentRepository::new();
        payment_repo
            .expect_find_by_id()
            .returning(move |_| Ok(Some(existing.clone())));
        // Mirrors the locked refund path: 2_000 already refunded on an 8_500 payment.
        payment_repo
            .expect_create_refund()
            .times(1)
            .returning(move |insert, policy| {
                Ok(match policy.decide(insert.amount_minor, 8_500, 2_000) {
                    RefundDecision::Accept { amount_minor } => {
                        RefundCreation::Created(refund(payment_id, amount_minor))
                    }
                    RefundDecision::Reject { remaining_minor } => {
                        RefundCreation::Rejected { remaining_minor }
                    }
                })
            });

        let err = usecase(payment_repo, MockBookingRepository::new(), RefundPolicy::Allow)
            .create_refund(
                staff,
                payment_id,
                CreateRefundModel {
                    amount_minor: i64::MAX,
                    reason: "everything".to_string(),
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, PaymentError::Validation(_)));
        assert!(err.to_string().contains("6500"));
    }

    #[tokio::test]
    async fn zero_refund_is_rejected_before_touching_storage() {
        let result = usecase(
            MockPaymentRepository::new(),
            MockBookingRepository::new(),
            RefundPolicy::Allow,
        )
        .create_refund(
            Caller::staff(Uuid::new_v4()),
            Uuid::new_v4(),
            CreateRefundModel {
                amount_minor: 0,
                reason: String::new(),
            },
        )
        .await;

        assert!(matches!(result, Err(PaymentError::Validation(_))));
    }

    #[tokio::test]
    async fn payment_list_requires_staff() {
        let result = usecase(
            MockPaymentRepository::new(),
            MockBookingRepository::new(),
            RefundPolicy::Allow,
        )
        .list_all(Caller::user(Uuid::new_v4()), PaginationQuery::default())
        .await;

        assert!(matches!(result, Err(PaymentError::Forbidden)));
    }

    #[tokio::test]
    async fn user_payments_are_scoped_to_their_bookings() {
        let user_id = Uuid::new_v4();
        let mut payment_repo = MockPaymentRepository::new();
        payment_repo
            .expect_list()
            .withf(move |filter| filter.scope == PaymentScope::Party(user_id))
            .times(1)
            .returning(|_| Ok(Vec::new()));

        let payments = usecase(payment_repo, MockBookingRepository::new(), RefundPolicy::Allow)
            .list_for_user(Caller::user(user_id), user_id, PaginationQuery::default())
            .await
            .unwrap();

        assert!(payments.is_empty());
    }
}
