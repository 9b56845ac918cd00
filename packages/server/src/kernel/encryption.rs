// Database-side encryption primitive
//
// Ciphertext is produced by `encrypt_pms_data` inside Postgres; the key only
// travels as a bound parameter and never hits the logs.

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::PgPool;

use super::BaseEncryption;
use crate::common::SecretString;

pub struct PgEncryption {
    pool: PgPool,
}

impl PgEncryption {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BaseEncryption for PgEncryption {
    async fn encrypt(&self, plaintext: &str, key: &SecretString) -> Result<String> {
        sqlx::query_scalar::<_, String>("SELECT encrypt_pms_data($1, $2)")
            .bind(plaintext)
            .bind(key.expose())
            .fetch_one(&self.pool)
            .await
            .context("Failed to encrypt PMS data")
    }
}
