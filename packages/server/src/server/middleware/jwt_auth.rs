use crate::common::{AuthError, UserId};
use crate::domains::auth::JwtService;
use axum::{middleware::Next, response::Response};
use std::sync::Arc;
use tracing::debug;

/// Authenticated user information from the bearer token
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub user_id: UserId,
    pub email: Option<String>,
}

/// Outcome of bearer verification, stored in request extensions
///
/// Routes decide whether they need a user; the middleware never rejects.
#[derive(Clone, Debug)]
pub enum AuthContext {
    Missing,
    Invalid,
    User(AuthUser),
}

impl AuthContext {
    pub fn user(&self) -> Result<&AuthUser, AuthError> {
        match self {
            AuthContext::User(user) => Ok(user),
            AuthContext::Missing => Err(AuthError::AuthenticationRequired),
            AuthContext::Invalid => Err(AuthError::InvalidToken),
        }
    }
}

/// JWT authentication middleware
///
/// Extracts the token from the Authorization header, verifies it, and adds an
/// AuthContext to request extensions.
pub async fn jwt_auth_middleware(
    jwt_service: Arc<JwtService>,
    mut request: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let context = extract_auth_context(&request, &jwt_service);

    match &context {
        AuthContext::User(user) => debug!(user_id = %user.user_id, "Authenticated user"),
        AuthContext::Invalid => debug!("Bearer token rejected"),
        AuthContext::Missing => {}
    }

    request.extensions_mut().insert(context);
    next.run(request).await
}

/// Extract and verify the bearer token from a request
fn extract_auth_context(
    request: &axum::http::Request<axum::body::Body>,
    jwt_service: &JwtService,
) -> AuthContext {
    let Some(auth_header) = request.headers().get("authorization") else {
        return AuthContext::Missing;
    };
    let Ok(auth_str) = auth_header.to_str() else {
        return AuthContext::Invalid;
    };

    // Handle both "Bearer <token>" and raw token
    let token = auth_str.strip_prefix("Bearer ").unwrap_or(auth_str).trim();
    if token.is_empty() {
        return AuthContext::Missing;
    }

    match jwt_service.verify_token(token) {
        Ok(claims) => AuthContext::User(AuthUser {
            user_id: claims.sub,
            email: claims.email,
        }),
        Err(_) => AuthContext::Invalid,
    }
}
