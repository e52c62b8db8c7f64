//! Custom Axum extractors

use std::sync::Arc;

use axum::extract::{FromRequest, FromRequestParts, Path, Query, Request};
use axum::http::request::Parts;
use axum::Json;
use axum_extra::extract::cookie::CookieJar;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::auth::{AuthError, Claims, TOKEN_COOKIE};
use crate::db::repos::UserRepo;
use crate::models::{Email, ValidationError};
use super::error::ApiError;
use super::server::AppState;

/// Extract and validate a UUID from path
pub struct ValidUuid(pub Uuid);

impl<S> FromRequestParts<S> for ValidUuid
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id): Path<String> = Path::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::Validation(ValidationError::Empty { field: "id" }))?;

        let uuid = Uuid::parse_str(&id).map_err(|_| {
            ApiError::Validation(ValidationError::InvalidFormat {
                field: "id",
                reason: "invalid UUID format",
            })
        })?;

        Ok(Self(uuid))
    }
}

/// Extract and validate an email from path
pub struct ValidEmail(pub Email);

impl<S> FromRequestParts<S> for ValidEmail
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(email): Path<String> = Path::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::Validation(ValidationError::Empty { field: "email" }))?;

        Ok(Self(Email::new(&email)?))
    }
}

/// JSON request body; malformed bodies are 400 validation errors
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|rejection| {
            tracing::debug!("rejected JSON body: {}", rejection.body_text());
            ApiError::BadRequest {
                message: rejection.body_text(),
            }
        })?;

        Ok(Self(value))
    }
}

/// Query string; unparseable parameters are 400 validation errors
pub struct ValidQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ValidQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::BadRequest {
                message: rejection.body_text(),
            })?;

        Ok(Self(value))
    }
}

/// Caller holding a valid session cookie.
///
/// Rejects with 401 before any database access.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    pub fn email(&self) -> &str {
        &self.0.email
    }
}

impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = jar.get(TOKEN_COOKIE).ok_or(AuthError::MissingToken).map_err(|e| {
            tracing::debug!(path = %parts.uri.path(), "rejected request: {}", e);
            ApiError::from(e)
        })?;

        let claims = state.tokens.verify(token.value()).map_err(|e| {
            tracing::debug!(path = %parts.uri.path(), "rejected request: {}", e);
            ApiError::from(e)
        })?;

        Ok(Self(claims))
    }
}

/// Caller whose session belongs to an admin.
///
/// 401 without a valid session; 403 when the user is missing or not an admin.
#[derive(Debug, Clone)]
pub struct AdminUser(pub Claims);

impl FromRequestParts<Arc<AppState>> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let AuthUser(claims) = AuthUser::from_request_parts(parts, state).await?;

        let user = UserRepo::new(&state.pool).find_by_email(&claims.email).await?;
        match user {
            Some(user) if user.role.is_admin() => Ok(Self(claims)),
            _ => {
                tracing::debug!(email = %claims.email, "admin access denied");
                Err(ApiError::Forbidden)
            }
        }
    }
}
