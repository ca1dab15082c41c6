use crate::error::SwatchError;
use crate::server::router::SwatchState;
use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, PrivateCookieJar, SameSite};
use swatchbook_schema::{ApiErrorBody, EntityId};
use time::Duration;

/// Private (encrypted) cookie carrying the signed-in user id.
pub const SESSION_COOKIE: &str = "swatchbook_session";

const SESSION_MAX_AGE_DAYS: i64 = 30;

pub fn session_cookie(user_id: EntityId, insecure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, user_id.to_string()))
        .path("/")
        .http_only(true)
        .secure(!insecure)
        .same_site(SameSite::Lax)
        .max_age(Duration::days(SESSION_MAX_AGE_DAYS))
        .build()
}

/// Cookie shape used to clear the session; path must match `session_cookie`.
pub fn expired_session_cookie() -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE).path("/").build()
}

/// The signed-in user, read from the private session cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionUser {
    pub user_id: EntityId,
}

impl FromRequestParts<SwatchState> for SessionUser {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SwatchState,
    ) -> Result<Self, Self::Rejection> {
        let jar = PrivateCookieJar::from_headers(&parts.headers, state.cookie_key.clone());
        let cookie = jar.get(SESSION_COOKIE).ok_or(AuthError::MissingSession)?;
        let user_id = cookie
            .value()
            .parse::<EntityId>()
            .map_err(|_| AuthError::InvalidSession)?;
        Ok(SessionUser { user_id })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    MissingSession,
    InvalidSession,
}

impl AuthError {
    fn reason(self) -> &'static str {
        match self {
            AuthError::MissingSession => "Not signed in",
            AuthError::InvalidSession => "Invalid session",
        }
    }
}

impl From<AuthError> for SwatchError {
    fn from(err: AuthError) -> Self {
        SwatchError::Unauthorized(err.reason().to_string())
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        (
            StatusCode::UNAUTHORIZED,
            Json(ApiErrorBody::new("UNAUTHORIZED", self.reason())),
        )
            .into_response()
    }
}
