use crate::db::DbActorHandle;
use crate::server::routes::{auth, component, project, value};

use axum::{
    Router,
    extract::{FromRef, Request},
    http::{HeaderName, HeaderValue, StatusCode, Version, header::USER_AGENT},
    middleware::{self, Next},
    response::Response,
};
use axum_extra::extract::cookie::Key;
use base64::Engine as _;
use rand::RngCore;
use std::time::Instant;
use tower_http::decompression::RequestDecompressionLayer;
use tracing::{error, info, warn};

const MAX_REQUEST_ID_LEN: usize = 128;
const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

fn generate_request_id() -> String {
    // 96 bits => 16 chars base64url (no padding).
    let mut bytes = [0u8; 12];
    rand::rng().fill_bytes(&mut bytes);
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

fn format_http_version(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "HTTP/0.9",
        Version::HTTP_10 => "HTTP/1.0",
        Version::HTTP_11 => "HTTP/1.1",
        Version::HTTP_2 => "HTTP/2",
        Version::HTTP_3 => "HTTP/3",
        _ => "HTTP/?",
    }
}

#[derive(Clone)]
pub struct SwatchState {
    pub db: DbActorHandle,
    /// Encryption key for the private session cookie.
    pub cookie_key: Key,
    pub insecure_cookie: bool,
}

impl SwatchState {
    /// `session_secret` must be at least 64 bytes to be used as the cookie key.
    /// Anything shorter falls back to a random per-process key, which logs every
    /// user out on restart.
    pub fn new(db: DbActorHandle, session_secret: &str, insecure_cookie: bool) -> Self {
        let cookie_key = match Key::try_from(session_secret.as_bytes()) {
            Ok(key) => key,
            Err(_) => {
                if !session_secret.is_empty() {
                    warn!("session_secret shorter than 64 bytes, using a random cookie key");
                }
                Key::generate()
            }
        };

        Self {
            db,
            cookie_key,
            insecure_cookie,
        }
    }
}

impl FromRef<SwatchState> for Key {
    fn from_ref(state: &SwatchState) -> Self {
        state.cookie_key.clone()
    }
}

async fn not_found_handler() -> StatusCode {
    StatusCode::NOT_FOUND
}

async fn access_log(req: Request, next: Next) -> Response {
    // Capture request metadata before moving `req` into the handler stack.
    let method = req.method().clone();
    let uri = req.uri().clone();
    let version = req.version();

    let request_id = req
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty() && v.len() <= MAX_REQUEST_ID_LEN)
        .map(str::to_string)
        .unwrap_or_else(generate_request_id);

    let user_agent = req
        .headers()
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
        .to_string();

    let start = Instant::now();
    let mut resp = next.run(req).await;

    // Always reflect `x-request-id`, even if the client didn't send one.
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        resp.headers_mut().insert(X_REQUEST_ID, value);
    }

    let status = resp.status();
    let latency_ms = start.elapsed().as_millis() as u64;
    let path = uri.path();
    let protocol = format_http_version(version);

    if status.is_server_error() {
        error!(
            "| {:>3} | {} | {:^7} | {:<8} | {} | {}ms | {}",
            status.as_u16(),
            request_id,
            method.as_str(),
            protocol,
            path,
            latency_ms,
            user_agent
        );
    } else if status.is_client_error() {
        warn!(
            "| {:>3} | {} | {:^7} | {:<8} | {} | {}ms | {}",
            status.as_u16(),
            request_id,
            method.as_str(),
            protocol,
            path,
            latency_ms,
            user_agent
        );
    } else {
        info!(
            "| {:>3} | {} | {:^7} | {:<8} | {} | {}ms | {}",
            status.as_u16(),
            request_id,
            method.as_str(),
            protocol,
            path,
            latency_ms,
            user_agent
        );
    }

    resp
}

pub fn swatchbook_router(state: SwatchState) -> Router {
    Router::new()
        .merge(auth::router())
        .merge(project::router())
        .merge(value::router())
        .merge(component::router())
        .fallback(not_found_handler)
        .with_state(state)
        .layer(RequestDecompressionLayer::new())
        .layer(middleware::from_fn(access_log))
}
