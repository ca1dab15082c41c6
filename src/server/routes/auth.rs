use crate::db::UserCreate;
use crate::error::SwatchError;
use crate::server::guards::auth::{SessionUser, expired_session_cookie, session_cookie};
use crate::server::router::SwatchState;
use crate::utils::logging::with_pretty_json_debug;
use crate::utils::password::{hash_password, verify_password};
use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use axum_extra::extract::cookie::PrivateCookieJar;
use swatchbook_schema::{SigninRequest, SignupRequest, UserView};
use tracing::{debug, info};

pub fn router() -> Router<SwatchState> {
    Router::new()
        .route("/api/auth/signup", post(signup))
        .route("/api/auth/signin", post(signin))
        .route("/api/auth/signout", post(signout))
        .route("/api/auth/session", get(session))
}

/// POST /api/auth/signup
///
/// Creates a user. Does not sign in; the client follows up with `signin`.
pub async fn signup(
    State(state): State<SwatchState>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<Response, SwatchError> {
    let Json(req) = payload?;
    with_pretty_json_debug(&req, |pretty_body| {
        debug!(body = %pretty_body, "signup request");
    });

    let username = req.username.trim();
    let email = req.email.trim();
    if username.is_empty() || email.is_empty() || req.password.is_empty() {
        return Err(SwatchError::validation("Missing username, email or password"));
    }

    let password_hash = hash_password(req.password).await?;
    let user = state
        .db
        .create_user(UserCreate {
            username: username.to_string(),
            email: email.to_string(),
            password_hash,
        })
        .await?;
    info!(user_id = user.id, "user signed up");

    Ok((StatusCode::CREATED, Json(user)).into_response())
}

/// POST /api/auth/signin
pub async fn signin(
    State(state): State<SwatchState>,
    jar: PrivateCookieJar,
    payload: Result<Json<SigninRequest>, JsonRejection>,
) -> Result<Response, SwatchError> {
    let Json(req) = payload?;
    let email = req.email.trim();
    if email.is_empty() || req.password.is_empty() {
        return Err(SwatchError::validation("Missing email or password"));
    }

    let Some(user) = state.db.find_user_by_email(email).await? else {
        debug!("signin for unknown email");
        return Err(SwatchError::InvalidCredentials);
    };
    if !verify_password(req.password, user.password_hash.clone()).await? {
        debug!(user_id = user.id, "signin with wrong password");
        return Err(SwatchError::InvalidCredentials);
    }

    let jar = jar.add(session_cookie(user.id, state.insecure_cookie));
    info!(user_id = user.id, "user signed in");
    Ok((jar, Json(UserView::from(user))).into_response())
}

/// POST /api/auth/signout
pub async fn signout(user: SessionUser, jar: PrivateCookieJar) -> Response {
    info!(user_id = user.user_id, "user signed out");
    (jar.remove(expired_session_cookie()), StatusCode::NO_CONTENT).into_response()
}

/// GET /api/auth/session
pub async fn session(
    State(state): State<SwatchState>,
    user: SessionUser,
) -> Result<Json<UserView>, SwatchError> {
    state
        .db
        .get_user(user.user_id)
        .await?
        .map(Json)
        .ok_or_else(|| SwatchError::Unauthorized("Unknown session user".to_string()))
}
