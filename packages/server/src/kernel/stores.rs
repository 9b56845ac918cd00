// Postgres-backed stores
//
// Thin adapters from the store traits to the model queries.

use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;

use super::{BaseBusinessStore, BaseRateStore};
use crate::common::{BusinessAccess, BusinessId, UserId};
use crate::domains::businesses::models::{Business, CredentialUpdate, UserRole};
use crate::domains::competitor_rates::models::{CompetitorRate, NewCompetitorRate};

pub struct PostgresRateStore {
    pool: PgPool,
}

impl PostgresRateStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BaseRateStore for PostgresRateStore {
    async fn insert_batch(&self, rows: &[NewCompetitorRate]) -> Result<Vec<CompetitorRate>> {
        CompetitorRate::insert_batch(rows, &self.pool).await
    }

    async fn recent_for_business(
        &self,
        business_id: BusinessId,
        limit: i64,
    ) -> Result<Vec<CompetitorRate>> {
        CompetitorRate::recent_for_business(business_id, limit, &self.pool).await
    }
}

pub struct PostgresBusinessStore {
    pool: PgPool,
}

impl PostgresBusinessStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BaseBusinessStore for PostgresBusinessStore {
    async fn access_for(&self, user_id: UserId, business_id: BusinessId) -> Result<BusinessAccess> {
        UserRole::access_for(user_id, business_id, &self.pool).await
    }

    async fn write_credentials(
        &self,
        business_id: BusinessId,
        update: &CredentialUpdate,
    ) -> Result<()> {
        Business::write_credentials(business_id, update, &self.pool).await
    }
}
