use std::{collections::HashMap, sync::Arc};

use chrono::Utc;
use thiserror::Error;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::domain::{
    entities::bookings::{BookingEntity, EditBookingEntity, InsertBookingEntity},
    repositories::{bookings::BookingRepository, directory::DirectoryRepository},
    value_objects::{
        bookings::{
            BookingChangeLogModel, BookingListFilter, BookingListQuery, BookingModel,
            BookingNames, BookingScope, BookingUpdateOutcome, CancelBookingModel,
            CreateBookingModel, StatusChange, UpdateBookingModel, UpdateBookingStatusModel,
            duration_minutes,
        },
        caller::Caller,
        enums::{
            booking_payment_statuses::BookingPaymentStatus, booking_statuses::BookingStatus,
            location_types::LocationType,
        },
        pagination::PaginationQuery,
    },
};

#[derive(Debug, Error)]
pub enum BookingError {
    #[error("{0}")]
    Validation(String),
    #[error("booking not found")]
    NotFound,
    #[error("you are not allowed to access this booking")]
    Forbidden,
    #[error("cannot change booking status from {from} to {to}")]
    InvalidTransition {
        from: BookingStatus,
        to: BookingStatus,
    },
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl BookingError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            BookingError::Validation(_) => StatusCode::BAD_REQUEST,
            BookingError::NotFound => StatusCode::NOT_FOUND,
            BookingError::Forbidden => StatusCode::FORBIDDEN,
            BookingError::InvalidTransition { .. } => StatusCode::CONFLICT,
            BookingError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type UseCaseResult<T> = std::result::Result<T, BookingError>;

pub struct BookingUseCase<B, D>
where
    B: BookingRepository + Send + Sync + 'static,
    D: DirectoryRepository + Send + Sync + 'static,
{
    booking_repo: Arc<B>,
    directory_repo: Arc<D>,
}

impl<B, D> BookingUseCase<B, D>
where
    B: BookingRepository + Send + Sync + 'static,
    D: DirectoryRepository + Send + Sync + 'static,
{
    pub fn new(booking_repo: Arc<B>, directory_repo: Arc<D>) -> Self {
        Self {
            booking_repo,
            directory_repo,
        }
    }

    pub async fn create(
        &self,
        caller: Caller,
        create_booking_model: CreateBookingModel,
    ) -> UseCaseResult<BookingModel> {
        let user_id = caller.user_id;
        let service_id = create_booking_model.service_id;
        info!(%user_id, %service_id, "bookings: create requested");

        let now = Utc::now();
        if create_booking_model.end_time <= create_booking_model.start_time {
            return Err(self.rejected(user_id, "end_time must be after start_time"));
        }
        if create_booking_model.start_time < now {
            return Err(self.rejected(user_id, "start_time must not be in the past"));
        }

        let service = self
            .directory_repo
            .find_service(service_id)
            .await
            .map_err(|err| {
                error!(%service_id, db_error = ?err, "bookings: failed to load service");
                BookingError::Internal(err)
            })?
            .ok_or_else(|| self.rejected(user_id, "service does not exist"))?;

        if !service.is_available {
            return Err(self.rejected(user_id, "service is not available for booking"));
        }
        if service.provider_id == user_id {
            return Err(self.rejected(user_id, "providers cannot book their own service"));
        }

        let offered: LocationType = service.location_type.parse()?;
        let location_type = offered
            .resolve_for_booking(create_booking_model.location_type)
            .ok_or_else(|| {
                self.rejected(
                    user_id,
                    &format!("service only offers {} appointments", offered),
                )
            })?;

        let insert_booking_entity = InsertBookingEntity {
            client_id: user_id,
            provider_id: service.provider_id,
            service_id,
            status: BookingStatus::Pending.to_string(),
            payment_status: BookingPaymentStatus::Pending.to_string(),
            start_time: create_booking_model.start_time,
            end_time: create_booking_model.end_time,
            duration_minutes: duration_minutes(
                create_booking_model.start_time,
                create_booking_model.end_time,
            ),
            price_minor: service.price_minor,
            location_type: location_type.to_string(),
            meeting_link: create_booking_model.meeting_link.unwrap_or_default(),
            address: create_booking_model.address.unwrap_or_default(),
            special_requests: create_booking_model.special_requests.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        };

        let booking = self
            .booking_repo
            .create(insert_booking_entity)
            .await
            .map_err(|err| {
                error!(%user_id, %service_id, db_error = ?err, "bookings: failed to create booking");
                BookingError::Internal(err)
            })?;

        info!(
            %user_id,
            booking_id = %booking.id,
            price_minor = booking.price_minor,
            "bookings: booking created"
        );

        self.to_model(booking).await
    }

    pub async fn get(&self, caller: Caller, booking_id: Uuid) -> UseCaseResult<BookingModel> {
        let booking = self.load_for(&caller, booking_id).await?;
        self.to_model(booking).await
    }

    pub async fn list(
        &self,
        caller: Caller,
        query: BookingListQuery,
    ) -> UseCaseResult<Vec<BookingModel>> {
        let scope = if caller.is_staff {
            BookingScope::All
        } else {
            BookingScope::Party(caller.user_id)
        };
        self.list_scoped(caller, scope, query).await
    }

    pub async fn list_for_client(
        &self,
        caller: Caller,
        client_id: Uuid,
        query: BookingListQuery,
    ) -> UseCaseResult<Vec<BookingModel>> {
        if !caller.can_act_for(client_id) {
            warn!(user_id = %caller.user_id, %client_id, "bookings: client list denied");
            return Err(BookingError::Forbidden);
        }
        self.list_scoped(caller, BookingScope::Client(client_id), query)
            .await
    }

    pub async fn list_for_provider(
        &self,
        caller: Caller,
        provider_id: Uuid,
        query: BookingListQuery,
    ) -> UseCaseResult<Vec<BookingModel>> {
        if !caller.can_act_for(provider_id) {
            warn!(user_id = %caller.user_id, %provider_id, "bookings: provider list denied");
            return Err(BookingError::Forbidden);
        }
        self.list_scoped(caller, BookingScope::Provider(provider_id), query)
            .await
    }

    pub async fn update(
        &self,
        caller: Caller,
        booking_id: Uuid,
        update_booking_model: UpdateBookingModel,
    ) -> UseCaseResult<BookingModel> {
        let current = self.load_for(&caller, booking_id).await?;
        let now = Utc::now();

        let mut edit = EditBookingEntity {
            special_requests: update_booking_model.special_requests,
            meeting_link: update_booking_model.meeting_link,
            address: update_booking_model.address,
            updated_at: now,
            ..Default::default()
        };

        if update_booking_model.start_time.is_some() || update_booking_model.end_time.is_some() {
            let start_time = update_booking_model.start_time.unwrap_or(current.start_time);
            let end_time = update_booking_model.end_time.unwrap_or(current.end_time);

            if end_time <= start_time {
                return Err(self.rejected(caller.user_id, "end_time must be after start_time"));
            }
            if update_booking_model.start_time.is_some() && start_time < now {
                return Err(self.rejected(caller.user_id, "start_time must not be in the past"));
            }

            edit.start_time = Some(start_time);
            edit.end_time = Some(end_time);
            edit.duration_minutes = Some(duration_minutes(start_time, end_time));
        }

        let status_change = update_booking_model.status.map(|new_status| StatusChange {
            new_status,
            changed_by: caller.user_id,
            reason: update_booking_model.reason.unwrap_or_default(),
        });

        self.apply(caller, booking_id, edit, status_change).await
    }

    pub async fn update_status(
        &self,
        caller: Caller,
        booking_id: Uuid,
        update_status_model: UpdateBookingStatusModel,
    ) -> UseCaseResult<BookingModel> {
        self.load_for(&caller, booking_id).await?;

        let status_change = StatusChange {
            new_status: update_status_model.status,
            changed_by: caller.user_id,
            reason: update_status_model.reason.unwrap_or_default(),
        };

        self.apply(
            caller,
            booking_id,
            EditBookingEntity::default(),
            Some(status_change),
        )
        .await
    }

    pub async fn cancel(
        &self,
        caller: Caller,
        booking_id: Uuid,
        cancel_booking_model: CancelBookingModel,
    ) -> UseCaseResult<BookingModel> {
        self.update_status(
            caller,
            booking_id,
            UpdateBookingStatusModel {
                status: BookingStatus::Cancelled,
                reason: cancel_booking_model.reason,
            },
        )
        .await
    }

    pub async fn delete(&self, caller: Caller, booking_id: Uuid) -> UseCaseResult<()> {
        self.load_for(&caller, booking_id).await?;

        self.booking_repo
            .delete(booking_id)
            .await
            .map_err(|err| {
                error!(%booking_id, db_error = ?err, "bookings: failed to delete booking");
                BookingError::Internal(err)
            })?;

        info!(user_id = %caller.user_id, %booking_id, "bookings: booking deleted");
        Ok(())
    }

    pub async fn change_logs(
        &self,
        caller: Caller,
        booking_id: Uuid,
    ) -> UseCaseResult<Vec<BookingChangeLogModel>> {
        let booking = self.load_for(&caller, booking_id).await?;
        let mut models = self.to_models(vec![booking]).await?;
        Ok(models
            .pop()
            .map(|model| model.change_logs)
            .unwrap_or_default())
    }

    async fn apply(
        &self,
        caller: Caller,
        booking_id: Uuid,
        edit: EditBookingEntity,
        status_change: Option<StatusChange>,
    ) -> UseCaseResult<BookingModel> {
        let requested_status = status_change.as_ref().map(|change| change.new_status);

        let outcome = self
            .booking_repo
            .update(booking_id, edit, status_change)
            .await
            .map_err(|err| {
                error!(%booking_id, db_error = ?err, "bookings: failed to update booking");
                BookingError::Internal(err)
            })?;

        match outcome {
            BookingUpdateOutcome::NotFound => Err(BookingError::NotFound),
            BookingUpdateOutcome::InvalidTransition { from, to } => {
                warn!(
                    user_id = %caller.user_id,
                    %booking_id,
                    %from,
                    %to,
                    status = axum::http::StatusCode::CONFLICT.as_u16(),
                    "bookings: illegal status transition"
                );
                Err(BookingError::InvalidTransition { from, to })
            }
            BookingUpdateOutcome::Applied {
                booking,
                change_log,
            } => {
                match change_log {
                    Some(change_log) => info!(
                        user_id = %caller.user_id,
                        %booking_id,
                        previous_status = change_log.previous_status,
                        new_status = change_log.new_status,
                        "bookings: status changed"
                    ),
                    None if requested_status.is_some() => debug!(
                        %booking_id,
                        "bookings: status unchanged, no change log written"
                    ),
                    None => info!(user_id = %caller.user_id, %booking_id, "bookings: booking updated"),
                }
                self.to_model(booking).await
            }
        }
    }

    async fn list_scoped(
        &self,
        caller: Caller,
        scope: BookingScope,
        query: BookingListQuery,
    ) -> UseCaseResult<Vec<BookingModel>> {
        let pagination = PaginationQuery {
            limit: query.limit,
            offset: query.offset,
        }
        .validate()
        .map_err(|message| self.rejected(caller.user_id, &message))?;

        let filter = BookingListFilter {
            scope,
            status: query.status,
            pagination,
        };
        debug!(user_id = %caller.user_id, ?filter, "bookings: listing bookings");

        let bookings = self.booking_repo.list(&filter).await.map_err(|err| {
            error!(user_id = %caller.user_id, db_error = ?err, "bookings: failed to list bookings");
            BookingError::Internal(err)
        })?;

        self.to_models(bookings).await
    }

    /// Loads a booking the caller is a party of, or any booking for staff.
    async fn load_for(&self, caller: &Caller, booking_id: Uuid) -> UseCaseResult<BookingEntity> {
        let booking = self
            .booking_repo
            .find_by_id(booking_id)
            .await
            .map_err(|err| {
                error!(%booking_id, db_error = ?err, "bookings: failed to load booking");
                BookingError::Internal(err)
            })?
            .ok_or(BookingError::NotFound)?;

        if !caller.is_staff && !booking.is_party(caller.user_id) {
            warn!(
                user_id = %caller.user_id,
                %booking_id,
                status = axum::http::StatusCode::FORBIDDEN.as_u16(),
                "bookings: caller is not a party of the booking"
            );
            return Err(BookingError::Forbidden);
        }

        Ok(booking)
    }

    async fn to_model(&self, booking: BookingEntity) -> UseCaseResult<BookingModel> {
        self.to_models(vec![booking])
            .await?
            .pop()
            .ok_or_else(|| BookingError::Internal(anyhow::anyhow!("booking model missing")))
    }

    /// Resolves display names from the current user and service rows.
    async fn to_models(&self, bookings: Vec<BookingEntity>) -> UseCaseResult<Vec<BookingModel>> {
        if bookings.is_empty() {
            return Ok(Vec::new());
        }

        let booking_ids = bookings.iter().map(|booking| booking.id).collect::<Vec<_>>();
        let change_logs = self
            .booking_repo
            .list_change_logs(booking_ids)
            .await
            .map_err(|err| {
                error!(db_error = ?err, "bookings: failed to load change logs");
                BookingError::Internal(err)
            })?;

        let mut user_ids = bookings
            .iter()
            .flat_map(|booking| [booking.client_id, booking.provider_id])
            .chain(change_logs.iter().filter_map(|log| log.changed_by))
            .collect::<Vec<_>>();
        user_ids.sort_unstable();
        user_ids.dedup();

        let mut service_ids = bookings
            .iter()
            .map(|booking| booking.service_id)
            .collect::<Vec<_>>();
        service_ids.sort_unstable();
        service_ids.dedup();

        let user_names = self
            .directory_repo
            .list_users_by_ids(user_ids)
            .await
            .map_err(|err| {
                error!(db_error = ?err, "bookings: failed to load users");
                BookingError::Internal(err)
            })?
            .into_iter()
            .map(|user| (user.id, user.full_name()))
            .collect::<HashMap<_, _>>();

        let service_titles = self
            .directory_repo
            .list_services_by_ids(service_ids)
            .await
            .map_err(|err| {
                error!(db_error = ?err, "bookings: failed to load services");
                BookingError::Internal(err)
            })?
            .into_iter()
            .map(|service| (service.id, service.title))
            .collect::<HashMap<_, _>>();

        let mut logs_by_booking: HashMap<Uuid, Vec<BookingChangeLogModel>> = HashMap::new();
        for log in change_logs {
            let changed_by_name = log.changed_by.and_then(|id| user_names.get(&id).cloned());
            let booking_id = log.booking_id;
            logs_by_booking
                .entry(booking_id)
                .or_default()
                .push(BookingChangeLogModel::from_entity(log, changed_by_name)?);
        }

        let name_of = |id: &Uuid| user_names.get(id).cloned().unwrap_or_default();

        bookings
            .into_iter()
            .map(|booking| {
                let names = BookingNames {
                    client_name: name_of(&booking.client_id),
                    provider_name: name_of(&booking.provider_id),
                    service_title: service_titles
                        .get(&booking.service_id)
                        .cloned()
                        .unwrap_or_default(),
                };
                let logs = logs_by_booking.remove(&booking.id).unwrap_or_default();
                BookingModel::from_entity(booking, names, logs).map_err(BookingError::Internal)
            })
            .collect()
    }

    fn rejected(&self, user_id: Uuid, message: &str) -> BookingError {
        warn!(
            %user_id,
            reason = message,
            status = axum::http::StatusCode::BAD_REQUEST.as_u16(),
            "bookings: request rejected"
        );
        BookingError::Validation(message.to_string())
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::{DateTime, Duration, Utc};
    use uuid::Uuid;

    use crate::domain::{
        entities::{bookings::BookingEntity, services::ServiceEntity, users::UserEntity},
        value_objects::enums::{
            booking_payment_statuses::BookingPaymentStatus, booking_statuses::BookingStatus,
            location_types::LocationType,
        },
    };

    pub fn service(provider_id: Uuid, price_minor: i64) -> ServiceEntity {
        let now = Utc::now();
        ServiceEntity {
            id: Uuid::new_v4(),
            provider_id,
            category_id: Uuid::new_v4(),
            title: "Deep tissue massage".to_string(),
            description: String::new(),
            price_minor,
            duration_minutes: 60,
            location_type: LocationType::Both.to_string(),
            is_available: true,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn user(id: Uuid, first_name: &str, last_name: &str) -> UserEntity {
        let now = Utc::now();
        UserEntity {
            id,
            email: format!("{}@example.com", first_name.to_lowercase()),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            is_provider: false,
            is_admin: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn booking(
        client_id: Uuid,
        provider_id: Uuid,
        service_id: Uuid,
        status: BookingStatus,
    ) -> BookingEntity {
        let now = Utc::now();
        let start_time: DateTime<Utc> = now + Duration::days(2);
        BookingEntity {
            id: Uuid::new_v4(),
            client_id,
            provider_id,
            service_id,
            status: status.to_string(),
            payment_status: BookingPaymentStatus::Pending.to_string(),
            start_time,
            end_time: start_time + Duration::hours(1),
            duration_minutes: 60,
            price_minor: 8_500,
            location_type: LocationType::InPerson.to_string(),
            meeting_link: String::new(),
            address: String::new(),
            special_requests: String::new(),
            cancellation_reason: String::new(),
            created_at: now,
            updated_at: now,
            cancelled_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::{booking, service, user};
    use super::*;
    use chrono::Duration;
    use mockall::predicate::eq;

    use crate::domain::{
        entities::booking_change_logs::BookingChangeLogEntity,
        repositories::{bookings::MockBookingRepository, directory::MockDirectoryRepository},
    };

    fn usecase(
        booking_repo: MockBookingRepository,
        directory_repo: MockDirectoryRepository,
    ) -> BookingUseCase<MockBookingRepository, MockDirectoryRepository> {
        BookingUseCase::new(Arc::new(booking_repo), Arc::new(directory_repo))
    }

    fn create_model(service_id: Uuid) -> CreateBookingModel {
        let start_time = Utc::now() + Duration::days(1);
        CreateBookingModel {
            service_id,
            start_time,
            end_time: start_time + Duration::minutes(90),
            special_requests: Some("Window seat".to_string()),
            location_type: None,
            address: None,
            meeting_link: None,
        }
    }

    fn names_resolve_to_nothing(
        booking_repo: &mut MockBookingRepository,
        directory_repo: &mut MockDirectoryRepository,
    ) {
        booking_repo
            .expect_list_change_logs()
            .returning(|_| Ok(Vec::new()));
        directory_repo
            .expect_list_users_by_ids()
            .returning(|_| Ok(Vec::new()));
        directory_repo
            .expect_list_services_by_ids()
            .returning(|_| Ok(Vec::new()));
    }

    #[tokio::test]
    async fn create_copies_service_price_and_starts_pending() {
        let client_id = Uuid::new_v4();
        let provider_id = Uuid::new_v4();
        let offered = service(provider_id, 8_500);
        let service_id = offered.id;
        let service_title = offered.title.clone();

        let mut booking_repo = MockBookingRepository::new();
        let mut directory_repo = MockDirectoryRepository::new();

        let found = offered.clone();
        directory_repo
            .expect_find_service()
            .with(eq(service_id))
            .returning(move |_| Ok(Some(found.clone())));

        booking_repo
            .expect_create()
            .withf(move |insert| {
                insert.client_id == client_id
                    && insert.provider_id == provider_id
                    && insert.price_minor == 8_500
                    && insert.status == "pending"
                    && insert.payment_status == "pending"
                    && insert.duration_minutes == 90
                    && insert.location_type == "in_person"
            })
            .returning(move |insert| {
                let mut created = booking(
                    insert.client_id,
                    insert.provider_id,
                    insert.service_id,
                    BookingStatus::Pending,
                );
                created.price_minor = insert.price_minor;
                created.duration_minutes = insert.duration_minutes;
                Ok(created)
            });

        booking_repo
            .expect_list_change_logs()
            .returning(|_| Ok(Vec::new()));
        directory_repo
            .expect_list_users_by_ids()
            .returning(move |_| {
                Ok(vec![
                    user(client_id, "Casey", "Client"),
                    user(provider_id, "Pat", "Provider"),
                ])
            });
        directory_repo
            .expect_list_services_by_ids()
            .returning(move |_| Ok(vec![offered.clone()]));

        let booking = usecase(booking_repo, directory_repo)
            .create(Caller::user(client_id), create_model(service_id))
            .await
            .unwrap();

        assert_eq!(booking.price_minor, 8_500);
        assert_eq!(booking.status, BookingStatus::Pending);
        assert_eq!(booking.client_name, "Casey Client");
        assert_eq!(booking.provider_name, "Pat Provider");
        assert_eq!(booking.service_id, service_id);
        assert_eq!(booking.service_title, service_title);
        assert!(booking.change_logs.is_empty());
    }

    #[tokio::test]
    async fn create_rejects_inverted_time_range() {
        let mut model = create_model(Uuid::new_v4());
        model.end_time = model.start_time - Duration::minutes(5);

        let result = usecase(MockBookingRepository::new(), MockDirectoryRepository::new())
            .create(Caller::user(Uuid::new_v4()), model)
            .await;

        assert!(matches!(result, Err(BookingError::Validation(_))));
    }

    #[tokio::test]
    async fn create_rejects_booking_own_service() {
        let provider_id = Uuid::new_v4();
        let own = service(provider_id, 1_000);
        let service_id = own.id;

        let mut directory_repo = MockDirectoryRepository::new();
        directory_repo
            .expect_find_service()
            .returning(move |_| Ok(Some(own.clone())));

        let result = usecase(MockBookingRepository::new(), directory_repo)
            .create(Caller::user(provider_id), create_model(service_id))
            .await;

        assert!(matches!(result, Err(BookingError::Validation(_))));
    }

    #[tokio::test]
    async fn create_rejects_location_the_service_does_not_offer() {
        let mut online_only = service(Uuid::new_v4(), 1_000);
        online_only.location_type = LocationType::Online.to_string();
        let service_id = online_only.id;

        let mut directory_repo = MockDirectoryRepository::new();
        directory_repo
            .expect_find_service()
            .returning(move |_| Ok(Some(online_only.clone())));

        let mut model = create_model(service_id);
        model.location_type = Some(LocationType::InPerson);

        let result = usecase(MockBookingRepository::new(), directory_repo)
            .create(Caller::user(Uuid::new_v4()), model)
            .await;

        assert!(matches!(result, Err(BookingError::Validation(_))));
    }

    #[tokio::test]
    async fn create_rejects_unavailable_service() {
        let mut unavailable = service(Uuid::new_v4(), 1_000);
        unavailable.is_available = false;
        let service_id = unavailable.id;

        let mut directory_repo = MockDirectoryRepository::new();
        directory_repo
            .expect_find_service()
            .returning(move |_| Ok(Some(unavailable.clone())));

        let result = usecase(MockBookingRepository::new(), directory_repo)
            .create(Caller::user(Uuid::new_v4()), create_model(service_id))
            .await;

        assert!(matches!(result, Err(BookingError::Validation(_))));
    }

    #[tokio::test]
    async fn status_change_returns_new_log_with_previous_status() {
        let client_id = Uuid::new_v4();
        let provider_id = Uuid::new_v4();
        let pending = booking(client_id, provider_id, Uuid::new_v4(), BookingStatus::Pending);
        let booking_id = pending.id;

        let mut booking_repo = MockBookingRepository::new();
        let mut directory_repo = MockDirectoryRepository::new();

        let found = pending.clone();
        booking_repo
            .expect_find_by_id()
            .with(eq(booking_id))
            .returning(move |_| Ok(Some(found.clone())));

        booking_repo
            .expect_update()
            .withf(move |id, _, change| {
                *id == booking_id
                    && change.as_ref().is_some_and(|change| {
                        change.new_status == BookingStatus::Confirmed
                            && change.changed_by == provider_id
                    })
            })
            .times(1)
            .returning(move |id, _, change| {
                let change = change.unwrap();
                let mut confirmed = pending.clone();
                confirmed.status = change.new_status.to_string();
                let log = change.to_log_entity(id, BookingStatus::Pending, Utc::now());
                Ok(BookingUpdateOutcome::Applied {
                    booking: confirmed,
                    change_log: Some(BookingChangeLogEntity {
                        id: Uuid::new_v4(),
                        booking_id: log.booking_id,
                        previous_status: log.previous_status,
                        new_status: log.new_status,
                        changed_by: log.changed_by,
                        reason: log.reason,
                        timestamp: log.timestamp,
                    }),
                })
            });

        booking_repo.expect_list_change_logs().returning(move |_| {
            Ok(vec![BookingChangeLogEntity {
                id: Uuid::new_v4(),
                booking_id,
                previous_status: "pending".to_string(),
                new_status: "confirmed".to_string(),
                changed_by: Some(provider_id),
                reason: String::new(),
                timestamp: Utc::now(),
            }])
        });
        directory_repo
            .expect_list_users_by_ids()
            .returning(move |_| Ok(vec![user(provider_id, "Pat", "Provider")]));
        directory_repo
            .expect_list_services_by_ids()
            .returning(|_| Ok(Vec::new()));

        let updated = usecase(booking_repo, directory_repo)
            .update_status(
                Caller::user(provider_id),
                booking_id,
                UpdateBookingStatusModel {
                    status: BookingStatus::Confirmed,
                    reason: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.status, BookingStatus::Confirmed);
        assert_eq!(updated.change_logs.len(), 1);
        assert_eq!(updated.change_logs[0].previous_status, BookingStatus::Pending);
        assert_eq!(
            updated.change_logs[0].changed_by_name.as_deref(),
            Some("Pat Provider")
        );
    }

    #[tokio::test]
    async fn illegal_transition_is_a_conflict() {
        let client_id = Uuid::new_v4();
        let completed = booking(client_id, Uuid::new_v4(), Uuid::new_v4(), BookingStatus::Completed);
        let booking_id = completed.id;

        let mut booking_repo = MockBookingRepository::new();
        booking_repo
            .expect_find_by_id()
            .returning(move |_| Ok(Some(completed.clone())));
        booking_repo.expect_update().returning(|_, _, _| {
            Ok(BookingUpdateOutcome::InvalidTransition {
                from: BookingStatus::Completed,
                to: BookingStatus::Pending,
            })
        });

        let err = usecase(booking_repo, MockDirectoryRepository::new())
            .update_status(
                Caller::user(client_id),
                booking_id,
                UpdateBookingStatusModel {
                    status: BookingStatus::Pending,
                    reason: None,
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, BookingError::InvalidTransition { .. }));
        assert_eq!(err.status_code(), axum::http::StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn cancel_requests_cancelled_status_with_reason() {
        let client_id = Uuid::new_v4();
        let confirmed = booking(client_id, Uuid::new_v4(), Uuid::new_v4(), BookingStatus::Confirmed);
        let booking_id = confirmed.id;

        let mut booking_repo = MockBookingRepository::new();
        let mut directory_repo = MockDirectoryRepository::new();

        let found = confirmed.clone();
        booking_repo
            .expect_find_by_id()
            .returning(move |_| Ok(Some(found.clone())));
        booking_repo
            .expect_update()
            .withf(|_, _, change| {
                change.as_ref().is_some_and(|change| {
                    change.new_status == BookingStatus::Cancelled && change.reason == "sick"
                })
            })
            .returning(move |_, _, _| {
                let mut cancelled = confirmed.clone();
                cancelled.status = BookingStatus::Cancelled.to_string();
                Ok(BookingUpdateOutcome::Applied {
                    booking: cancelled,
                    change_log: None,
                })
            });
        names_resolve_to_nothing(&mut booking_repo, &mut directory_repo);

        let cancelled = usecase(booking_repo, directory_repo)
            .cancel(
                Caller::user(client_id),
                booking_id,
                CancelBookingModel {
                    reason: Some("sick".to_string()),
                },
            )
            .await
            .unwrap();

        assert_eq!(cancelled.status, BookingStatus::Cancelled);
    }

    #[tokio::test]
    async fn outsiders_cannot_read_a_booking() {
        let stranger = Uuid::new_v4();
        let existing = booking(Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4(), BookingStatus::Pending);
        let booking_id = existing.id;

        let mut booking_repo = MockBookingRepository::new();
        booking_repo
            .expect_find_by_id()
            .returning(move |_| Ok(Some(existing.clone())));

        let result = usecase(booking_repo, MockDirectoryRepository::new())
            .get(Caller::user(stranger), booking_id)
            .await;

        assert!(matches!(result, Err(BookingError::Forbidden)));
    }

    #[tokio::test]
    async fn missing_booking_is_not_found() {
        let mut booking_repo = MockBookingRepository::new();
        booking_repo.expect_find_by_id().returning(|_| Ok(None));

        let result = usecase(booking_repo, MockDirectoryRepository::new())
            .get(Caller::staff(Uuid::new_v4()), Uuid::new_v4())
            .await;

        assert!(matches!(result, Err(BookingError::NotFound)));
    }

    #[tokio::test]
    async fn non_staff_list_is_scoped_to_own_bookings() {
        let user_id = Uuid::new_v4();
        let mut booking_repo = MockBookingRepository::new();
        booking_repo
            .expect_list()
            .withf(move |filter| filter.scope == BookingScope::Party(user_id))
            .times(1)
            .returning(|_| Ok(Vec::new()));

        let bookings = usecase(booking_repo, MockDirectoryRepository::new())
            .list(Caller::user(user_id), BookingListQuery::default())
            .await
            .unwrap();

        assert!(bookings.is_empty());
    }

    #[tokio::test]
    async fn staff_list_sees_everything() {
        let mut booking_repo = MockBookingRepository::new();
        booking_repo
            .expect_list()
            .withf(|filter| filter.scope == BookingScope::All && filter.pagination.limit == 10)
            .times(1)
            .returning(|_| Ok(Vec::new()));

        usecase(booking_repo, MockDirectoryRepository::new())
            .list(
                Caller::staff(Uuid::new_v4()),
                BookingListQuery {
                    limit: Some(10),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn client_list_of_someone_else_is_forbidden() {
        let result = usecase(MockBookingRepository::new(), MockDirectoryRepository::new())
            .list_for_client(
                Caller::user(Uuid::new_v4()),
                Uuid::new_v4(),
                BookingListQuery::default(),
            )
            .await;

        assert!(matches!(result, Err(BookingError::Forbidden)));
    }

    #[tokio::test]
    async fn oversized_page_is_rejected() {
        let result = usecase(MockBookingRepository::new(), MockDirectoryRepository::new())
            .list(
                Caller::user(Uuid::new_v4()),
                BookingListQuery {
                    limit: Some(1_000),
                    ..Default::default()
                },
            )
            .await;

        assert!(matches!(result, Err(BookingError::Validation(_))));
    }

    #[tokio::test]
    async fn reschedule_recomputes_duration() {
        let client_id = Uuid::new_v4();
        let existing = booking(client_id, Uuid::new_v4(), Uuid::new_v4(), BookingStatus::Pending);
        let booking_id = existing.id;
        let new_end = existing.start_time + Duration::minutes(45);

        let mut booking_repo = MockBookingRepository::new();
        let mut directory_repo = MockDirectoryRepository::new();

        let found = existing.clone();
        booking_repo
            .expect_find_by_id()
            .returning(move |_| Ok(Some(found.clone())));
        booking_repo
            .expect_update()
            .withf(move |_, edit, change| {
                edit.end_time == Some(new_end) && edit.duration_minutes == Some(45) && change.is_none()
            })
            .returning(move |_, _, _| {
                Ok(BookingUpdateOutcome::Applied {
                    booking: existing.clone(),
                    change_log: None,
                })
            });
        names_resolve_to_nothing(&mut booking_repo, &mut directory_repo);

        usecase(booking_repo, directory_repo)
            .update(
                Caller::user(client_id),
                booking_id,
                UpdateBookingModel {
                    end_time: Some(new_end),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
    }
}
