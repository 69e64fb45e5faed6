use axum::{
    extract::{FromRef, FromRequestParts},
    http::{StatusCode, header, request::Parts},
};
use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};

use crate::{
    config::{AppConfig, Env},
    error::AppError,
    models::SessionUser,
    repository::RepositoryState,
};

/// Claims
///
/// Payload of the bearer tokens issued by the login service. Only validated here.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the `usuarios.id` of the caller.
    pub sub: i32,
    /// Expiration, seconds since the epoch. Always validated.
    pub exp: usize,
    /// Issued at.
    pub iat: usize,
}

/// AuthUser
///
/// The resolved identity of an authenticated request. The role is read from the store on
/// every request so a role change takes effect without reissuing tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub id: i32,
    pub role_id: i32,
}

impl AuthUser {
    /// Rejects callers whose role is not the configured administrator role.
    pub fn require_admin(&self, config: &AppConfig) -> Result<(), AppError> {
        if self.role_id != config.admin_role_id {
            tracing::warn!(user_id = self.id, role_id = self.role_id, "admin route refused");
            return Err(AppError::Forbidden);
        }
        Ok(())
    }
}

impl From<AuthUser> for SessionUser {
    fn from(user: AuthUser) -> Self {
        SessionUser {
            id: user.id,
            role_id: user.role_id,
        }
    }
}

/// AuthUser Extractor
///
/// 1. Local bypass: in `Env::Local`, an `x-user-id` header naming an existing user is accepted.
/// 2. Otherwise `Authorization: Bearer <jwt>` is decoded with the configured secret.
/// 3. The subject is looked up in the store for its current role.
///
/// Rejection: 401 for anything wrong with the credentials, 500 if the lookup itself fails.
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    RepositoryState: FromRef<S>,
    AppConfig: FromRef<S>,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let repo = RepositoryState::from_ref(state);
        let config = AppConfig::from_ref(state);

        let bypass_id = if config.env == Env::Local {
            parts
                .headers
                .get("x-user-id")
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.trim().parse::<i32>().ok())
        } else {
            None
        };

        let user_id = match bypass_id {
            Some(id) => id,
            None => {
                let token = parts
                    .headers
                    .get(header::AUTHORIZATION)
                    .and_then(|value| value.to_str().ok())
                    .and_then(|value| value.strip_prefix("Bearer "))
                    .ok_or(StatusCode::UNAUTHORIZED)?;

                let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());
                let mut validation = Validation::default();
                validation.validate_exp = true;

                let token_data = decode::<Claims>(token, &decoding_key, &validation).map_err(|e| {
                    tracing::debug!("rejected bearer token: {:?}", e.kind());
                    StatusCode::UNAUTHORIZED
                })?;
                token_data.claims.sub
            }
        };

        // A deleted user keeps a valid token until expiry; the lookup shuts them out.
        let user = repo
            .get_user(user_id)
            .await
            .map_err(|e| {
                tracing::error!("auth user lookup failed: {:?}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            })?
            .ok_or(StatusCode::UNAUTHORIZED)?;

        Ok(AuthUser {
            id: user.id,
            role_id: user.role_id,
        })
    }
}
