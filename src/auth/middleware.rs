// Caller identity extraction for mutating routes

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use tracing::debug;

use crate::auth::{error::AuthError, token::TokenService};

/// Authenticated caller, used for attribution only
///
/// Permission checks happen in front of this service; handlers only record
/// who performed an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: i32,
    pub permissions: Vec<String>,
}

#[async_trait]
impl<S> FromRequestParts<S> for Principal
where
    S: Send + Sync,
    TokenService: FromRef<S>,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .ok_or(AuthError::MissingToken)?
            .to_str()
            .map_err(|_| AuthError::InvalidToken)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(AuthError::InvalidToken)?;

        let claims = TokenService::from_ref(state).validate_token(token)?;
        debug!("Authenticated user_id={}", claims.sub);

        Ok(Principal {
            user_id: claims.sub,
            permissions: claims.permissions,
        })
    }
}
