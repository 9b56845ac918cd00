use axum::extract::rejection::JsonRejection;
use axum::extract::Extension;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::common::{BusinessId, SecretString};
use crate::domains::businesses::{store_pms_credentials, CredentialSubmission, PmsSystem};
use crate::kernel::ServerDeps;
use crate::server::error::ApiError;
use crate::server::middleware::AuthContext;

#[derive(Deserialize)]
pub struct StorePmsCredentialsRequest {
    #[serde(default)]
    pub business_id: Option<String>,
    #[serde(default)]
    pub pms_system: Option<String>,
    #[serde(default)]
    pub pms_api_key: Option<String>,
    #[serde(default)]
    pub pms_credentials: Option<Map<String, Value>>,
}

#[derive(Serialize)]
pub struct StorePmsCredentialsResponse {
    pub success: bool,
}

/// POST /store-pms-credentials
///
/// Order of checks: bearer present, bearer valid, business_id present,
/// access to the business, encryption key configured.
pub async fn store_pms_credentials_handler(
    Extension(deps): Extension<ServerDeps>,
    auth: Option<Extension<AuthContext>>,
    body: Result<Json<StorePmsCredentialsRequest>, JsonRejection>,
) -> Result<Json<StorePmsCredentialsResponse>, ApiError> {
    let user_id = match auth {
        Some(Extension(context)) => context.user()?.user_id,
        None => return Err(ApiError::Unauthorized("Unauthorized".into())),
    };

    let Json(request) = body?;

    let business_id = request
        .business_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::bad_request("business_id is required"))?;
    let business_id = BusinessId::parse(business_id)
        .map_err(|_| ApiError::bad_request("business_id must be a UUID"))?;

    let pms_system = request
        .pms_system
        .as_deref()
        .map(str::parse::<PmsSystem>)
        .transpose()
        .map_err(ApiError::BadRequest)?;

    let submission = CredentialSubmission {
        pms_system,
        pms_api_key: request.pms_api_key.map(SecretString::from),
        pms_credentials: request.pms_credentials,
    };

    store_pms_credentials(user_id, business_id, submission, &deps).await?;

    Ok(Json(StorePmsCredentialsResponse { success: true }))
}
