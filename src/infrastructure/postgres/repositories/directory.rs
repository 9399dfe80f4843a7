use anyhow::Result;
use async_trait::async_trait;
use diesel::prelude::*;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain::{
        entities::{services::ServiceEntity, users::UserEntity},
        repositories::directory::DirectoryRepository,
    },
    infrastructure::postgres::{
        postgres_connection::PgPoolSquad,
        schema::{services, users},
    },
};

pub struct DirectoryPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl DirectoryPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl DirectoryRepository for DirectoryPostgres {
    async fn find_service(&self, service_id: Uuid) -> Result<Option<ServiceEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let service = services::table
            .find(service_id)
            .select(ServiceEntity::as_select())
            .first::<ServiceEntity>(&mut conn)
            .optional()?;

        Ok(service)
    }

    async fn list_services_by_ids(&self, service_ids: Vec<Uuid>) -> Result<Vec<ServiceEntity>> {
        if service_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = services::table
            .filter(services::id.eq_any(service_ids))
            .select(ServiceEntity::as_select())
            .load::<ServiceEntity>(&mut conn)?;

        Ok(results)
    }

    async fn list_users_by_ids(&self, user_ids: Vec<Uuid>) -> Result<Vec<UserEntity>> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = users::table
            .filter(users::id.eq_any(user_ids))
            .select(UserEntity::as_select())
            .load::<UserEntity>(&mut conn)?;

        Ok(results)
    }
}
