use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::{services::ServiceEntity, users::UserEntity};

/// Read-only view of the user and service catalog tables.
#[automock]
#[async_trait]
pub trait DirectoryRepository {
    async fn find_service(&self, service_id: Uuid) -> Result<Option<ServiceEntity>>;
    async fn list_services_by_ids(&self, service_ids: Vec<Uuid>) -> Result<Vec<ServiceEntity>>;
    async fn list_users_by_ids(&self, user_ids: Vec<Uuid>) -> Result<Vec<UserEntity>>;
}
