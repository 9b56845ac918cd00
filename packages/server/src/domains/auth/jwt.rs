use anyhow::Result;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::common::UserId;

/// Audience carried by every signed-in user's access token
pub const AUTHENTICATED_AUDIENCE: &str = "authenticated";

/// JWT Claims - data stored in the access token
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: UserId, // Subject (user id)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub aud: String, // Audience
    pub exp: i64,    // Expiration timestamp
    pub iat: i64,    // Issued at timestamp
    pub iss: String, // Issuer
}

/// JWT Service - verifies access tokens (and signs them for tests and tooling)
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
}

impl JwtService {
    /// Create new JWT service with the shared HS256 secret and expected issuer
    pub fn new(secret: &str, issuer: String) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            issuer,
        }
    }

    /// Create an access token for a user
    ///
    /// Token expires after 1 hour
    pub fn create_token(&self, user_id: UserId, email: Option<String>) -> Result<String> {
        let now = chrono::Utc::now();
        let exp = now + chrono::Duration::hours(1);

        let claims = Claims {
            sub: user_id,
            email,
            aud: AUTHENTICATED_AUDIENCE.to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
            iss: self.issuer.clone(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(Into::into)
    }

    /// Verify and decode an access token
    ///
    /// Returns claims if signature, issuer, audience and expiry all check out
    pub fn verify_token(&self, token: &str) -> Result<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[AUTHENTICATED_AUDIENCE]);

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_verify_token() {
        let service = JwtService::new("test_secret_key", "test_issuer".to_string());
        let user_id = UserId::new();

        let token = service
            .create_token(user_id, Some("gm@acme.example".to_string()))
            .unwrap();

        let claims = service.verify_token(&token).unwrap();
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.email.as_deref(), Some("gm@acme.example"));
        assert_eq!(claims.aud, AUTHENTICATED_AUDIENCE);
        assert_eq!(claims.iss, "test_issuer");
    }

    #[test]
    fn test_invalid_token() {
        let service = JwtService::new("test_secret_key", "test_issuer".to_string());
        assert!(service.verify_token("invalid_token").is_err());
    }

    #[test]
    fn test_wrong_secret() {
        let service1 = JwtService::new("secret1", "test_issuer".to_string());
        let service2 = JwtService::new("secret2", "test_issuer".to_string());

        let token = service1.create_token(UserId::new(), None).unwrap();

        // Token created with secret1 should not verify with secret2
        assert!(service2.verify_token(&token).is_err());
    }

    #[test]
    fn test_wrong_issuer() {
        let signer = JwtService::new("secret", "other".to_string());
        let verifier = JwtService::new("secret", "supabase".to_string());

        let token = signer.create_token(UserId::new(), None).unwrap();
        assert!(verifier.verify_token(&token).is_err());
    }

    #[test]
    fn test_wrong_audience() {
        let service = JwtService::new("secret", "supabase".to_string());
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: UserId::new(),
            email: None,
            aud: "anon".to_string(),
            exp: now + 600,
            iat: now,
            iss: "supabase".to_string(),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"secret"),
        )
        .unwrap();

        assert!(service.verify_token(&token).is_err());
    }

    #[test]
    fn test_expired_token() {
        let service = JwtService::new("secret", "supabase".to_string());
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: UserId::new(),
            email: None,
            aud: AUTHENTICATED_AUDIENCE.to_string(),
            exp: now - 3600,
            iat: now - 7200,
            iss: "supabase".to_string(),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"secret"),
        )
        .unwrap();

        assert!(service.verify_token(&token).is_err());
    }
}
