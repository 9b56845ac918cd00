use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::common::{AppRole, BusinessAccess, BusinessId, UserId};

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRole {
    pub id: Uuid,
    pub user_id: UserId,
    pub business_id: BusinessId,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl UserRole {
    pub async fn grant(
        user_id: UserId,
        business_id: BusinessId,
        role: AppRole,
        pool: &PgPool,
    ) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO user_roles (user_id, business_id, role)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, business_id, role) DO UPDATE SET role = EXCLUDED.role
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(business_id)
        .bind(role.as_str())
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    /// Ownership flag and roles of one user on one business.
    pub async fn access_for(
        user_id: UserId,
        business_id: BusinessId,
        pool: &PgPool,
    ) -> Result<BusinessAccess> {
        let (owns, roles) = sqlx::query_as::<_, (bool, Vec<String>)>(
            r#"
            SELECT
                EXISTS (SELECT 1 FROM businesses WHERE id = $2 AND owner_id = $1) AS owns,
                ARRAY(SELECT role FROM user_roles WHERE user_id = $1 AND business_id = $2) AS roles
            "#,
        )
        .bind(user_id)
        .bind(business_id)
        .fetch_one(pool)
        .await?;

        let roles = roles
            .iter()
            .filter_map(|role| match role.parse::<AppRole>() {
                Ok(role) => Some(role),
                Err(e) => {
                    tracing::warn!(user_id = %user_id, error = %e, "Ignoring unknown role");
                    None
                }
            })
            .collect();

        Ok(BusinessAccess { owns, roles })
    }
}
