//! PMS credential vault writer.
//!
//! Authorize, encrypt through the database primitive, then overwrite the
//! business's credential columns in one update. Nothing is written before the
//! authorization gate and no secret is returned.

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::info;

use crate::common::{Actor, AuthError, BusinessCapability, BusinessId, SecretString, UserId};
use crate::domains::businesses::models::{CredentialUpdate, PmsSystem};
use crate::kernel::ServerDeps;

/// Connection details submitted for one business.
#[derive(Debug, Clone, Default)]
pub struct CredentialSubmission {
    pub pms_system: Option<PmsSystem>,
    pub pms_api_key: Option<SecretString>,
    pub pms_credentials: Option<Map<String, Value>>,
}

#[derive(Debug, Error)]
pub enum VaultError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("Server configuration error")]
    MissingEncryptionKey,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub async fn store_pms_credentials(
    user_id: UserId,
    business_id: BusinessId,
    submission: CredentialSubmission,
    deps: &ServerDeps,
) -> Result<(), VaultError> {
    Actor::new(user_id)
        .can(BusinessCapability::ManageCredentials)
        .on(business_id)
        .check(deps.business_store.as_ref())
        .await?;

    let key = deps
        .pms_encryption_key
        .as_ref()
        .filter(|key| !key.is_empty())
        .ok_or(VaultError::MissingEncryptionKey)?;

    let pms_api_key_encrypted = match submission.pms_api_key.filter(|k| !k.is_empty()) {
        Some(api_key) => Some(deps.encryption.encrypt(api_key.expose(), key).await?),
        None => None,
    };

    let pms_credentials_encrypted = match submission.pms_credentials.filter(|c| !c.is_empty()) {
        Some(credentials) => {
            let plaintext = SecretString::new(canonical_json(&Value::Object(credentials)));
            Some(deps.encryption.encrypt(plaintext.expose(), key).await?)
        }
        None => None,
    };

    let update = CredentialUpdate {
        pms_system: submission.pms_system,
        pms_api_key_encrypted,
        pms_credentials_encrypted,
    };

    deps.business_store
        .write_credentials(business_id, &update)
        .await?;

    info!(
        user_id = %user_id,
        business_id = %business_id,
        pms_system = ?update.pms_system,
        api_key_stored = update.pms_api_key_encrypted.is_some(),
        credentials_stored = update.pms_credentials_encrypted.is_some(),
        "Stored encrypted PMS credentials"
    );

    Ok(())
}

/// Serialize with object keys sorted at every depth.
pub fn canonical_json(value: &Value) -> String {
    sorted(value).to_string()
}

fn sorted(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            Value::Object(
                keys.into_iter()
                    .map(|k| (k.clone(), sorted(&map[k])))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(items.iter().map(sorted).collect()),
        other => other.clone(),
    }
}
