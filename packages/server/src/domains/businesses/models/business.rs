use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::fmt;
use std::str::FromStr;

use crate::common::{BusinessId, UserId};

/// Property-management system a business connects to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PmsSystem {
    Opera,
    Cloudbeds,
    ChoiceAdvantage,
    Custom,
    None,
}

impl PmsSystem {
    pub fn as_str(&self) -> &'static str {
        match self {
            PmsSystem::Opera => "opera",
            PmsSystem::Cloudbeds => "cloudbeds",
            PmsSystem::ChoiceAdvantage => "choice_advantage",
            PmsSystem::Custom => "custom",
            PmsSystem::None => "none",
        }
    }
}

impl fmt::Display for PmsSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PmsSystem {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "opera" => Ok(PmsSystem::Opera),
            "cloudbeds" => Ok(PmsSystem::Cloudbeds),
            "choice_advantage" => Ok(PmsSystem::ChoiceAdvantage),
            "custom" => Ok(PmsSystem::Custom),
            "none" => Ok(PmsSystem::None),
            other => Err(format!("unknown PMS system: {}", other)),
        }
    }
}

/// Ciphertext and selector written by the vault in one update.
///
/// `None` ciphertext clears the column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CredentialUpdate {
    /// Left unchanged when absent
    pub pms_system: Option<PmsSystem>,
    pub pms_api_key_encrypted: Option<String>,
    pub pms_credentials_encrypted: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Business {
    pub id: BusinessId,
    pub name: String,
    pub owner_id: Option<UserId>,
    pub pms_system: String,
    /// Legacy plaintext, nulled on every vault write
    pub pms_api_key: Option<String>,
    pub pms_api_key_encrypted: Option<String>,
    /// Legacy plaintext, nulled on every vault write
    pub pms_credentials: Option<serde_json::Value>,
    pub pms_credentials_encrypted: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Business Queries
// =============================================================================

impl Business {
    pub async fn create(name: &str, owner_id: Option<UserId>, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO businesses (id, name, owner_id) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(BusinessId::new())
        .bind(name)
        .bind(owner_id)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn find_by_id(id: BusinessId, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>("SELECT * FROM businesses WHERE id = $1")
            .bind(id)
            .fetch_one(pool)
            .await
            .map_err(Into::into)
    }

    /// Write both ciphertext columns and clear both plaintext twins.
    pub async fn write_credentials(
        id: BusinessId,
        update: &CredentialUpdate,
        pool: &PgPool,
    ) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE businesses
            SET pms_api_key_encrypted = $2,
                pms_credentials_encrypted = $3,
                pms_api_key = NULL,
                pms_credentials = NULL,
                pms_system = COALESCE($4, pms_system),
                updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(update.pms_api_key_encrypted.as_deref())
        .bind(update.pms_credentials_encrypted.as_deref())
        .bind(update.pms_system.map(|s| s.as_str()))
        .execute(pool)
        .await?;

        if result.rows_affected() == 0 {
            anyhow::bail!("Business {} not found", id);
        }

        Ok(())
    }
}
